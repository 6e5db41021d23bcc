//! JSON-file-backed document store.
//!
//! The whole database is one JSON document with four collections, held in
//! memory behind an `RwLock` and mirrored to disk on every committed
//! mutation. Handlers receive a cloned [`Store`] handle and perform their
//! read-modify-write cycles through [`Store::mutate`], which runs the whole
//! cycle under the write lock with no suspension point inside it, so two
//! concurrent mutations of the same record cannot lose an update.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::models::{Course, Role, Session, Teacher, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access store file: {0}")]
    Io(#[from] io::Error),
    #[error("store file is not a valid document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The persisted document: every collection in one file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Document {
    pub users: Vec<User>,
    pub teachers: Vec<Teacher>,
    pub courses: Vec<Course>,
    pub sessions: Vec<Session>,
}

/// The account fields auth and login care about, independent of which
/// collection the account lives in.
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub id: String,
    pub role: Role,
    pub is_banned: bool,
    pub password_hash: String,
}

impl Document {
    /// True if the username exists in either account collection.
    pub fn username_taken(&self, username: &str) -> bool {
        self.users.iter().any(|u| u.username == username)
            || self.teachers.iter().any(|t| t.username == username)
    }

    /// Credential lookup across both account collections, users first.
    pub fn account_by_username(&self, username: &str) -> Option<AccountSummary> {
        self.users
            .iter()
            .find(|u| u.username == username)
            .map(|u| AccountSummary {
                id: u.id.clone(),
                role: u.role,
                is_banned: u.is_banned,
                password_hash: u.password_hash.clone(),
            })
            .or_else(|| {
                self.teachers
                    .iter()
                    .find(|t| t.username == username)
                    .map(|t| AccountSummary {
                        id: t.id.clone(),
                        role: t.role,
                        is_banned: t.is_banned,
                        password_hash: t.password_hash.clone(),
                    })
            })
    }

    /// Account lookup by id across both collections, users first.
    pub fn account_by_id(&self, id: &str) -> Option<AccountSummary> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| AccountSummary {
                id: u.id.clone(),
                role: u.role,
                is_banned: u.is_banned,
                password_hash: u.password_hash.clone(),
            })
            .or_else(|| {
                self.teachers.iter().find(|t| t.id == id).map(|t| AccountSummary {
                    id: t.id.clone(),
                    role: t.role,
                    is_banned: t.is_banned,
                    password_hash: t.password_hash.clone(),
                })
            })
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    pub fn teacher_mut(&mut self, id: &str) -> Option<&mut Teacher> {
        self.teachers.iter_mut().find(|t| t.id == id)
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn course_mut(&mut self, id: &str) -> Option<&mut Course> {
        self.courses.iter_mut().find(|c| c.id == id)
    }

    pub fn session_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Replaces the password hash of the account with this username.
    /// Returns false if no such account exists.
    pub fn set_password_by_username(&mut self, username: &str, password_hash: String) -> bool {
        if let Some(user) = self.users.iter_mut().find(|u| u.username == username) {
            user.password_hash = password_hash;
            return true;
        }
        if let Some(teacher) = self.teachers.iter_mut().find(|t| t.username == username) {
            teacher.password_hash = password_hash;
            return true;
        }
        false
    }
}

/// Handle on the document store. Cheap to clone; all clones share the same
/// in-memory document and file mirror.
#[derive(Clone)]
pub struct Store {
    inner: Arc<RwLock<Document>>,
    path: Option<Arc<PathBuf>>,
}

impl Store {
    /// Opens a file-backed store, creating an empty document (and parent
    /// directories) if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let document = if path.exists() {
            let raw = fs::read(&path)?;
            serde_json::from_slice(&raw)?
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let document = Document::default();
            write_document(&path, &document)?;
            tracing::info!(path = %path.display(), "created empty store file");
            document
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(document)),
            path: Some(Arc::new(path)),
        })
    }

    /// A store with no file mirror. Substituted for the file-backed store in
    /// tests; same engine, nothing persisted.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Document::default())),
            path: None,
        }
    }

    /// Shared snapshot access for read-only handlers.
    pub async fn read(&self) -> RwLockReadGuard<'_, Document> {
        self.inner.read().await
    }

    /// Runs a read-modify-write cycle under the write lock and mirrors the
    /// resulting document to disk before releasing it.
    ///
    /// The closure is synchronous on purpose: nothing can interleave between
    /// the read and the write it performs.
    pub async fn mutate<T>(&self, f: impl FnOnce(&mut Document) -> T) -> Result<T, StoreError> {
        let mut guard = self.inner.write().await;
        let out = f(&mut guard);
        if let Some(path) = &self.path {
            write_document(path, &guard)?;
        }
        Ok(out)
    }
}

/// Full-document rewrite of the store file.
fn write_document(path: &Path, document: &Document) -> Result<(), StoreError> {
    let raw = serde_json::to_vec_pretty(document)?;
    fs::write(path, raw)?;
    Ok(())
}
