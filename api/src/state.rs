//! Application state shared across Axum route handlers.

use db::Store;

/// Central application state: a handle on the document store.
///
/// Cloning is cheap; every clone shares the same in-memory document and file
/// mirror. Route handlers receive it through Axum's `State<T>` extractor.
#[derive(Clone)]
pub struct AppState {
    store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Shared reference to the document store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Cloned store handle, for spawned tasks that need ownership.
    pub fn store_clone(&self) -> Store {
        self.store.clone()
    }
}
