use crate::config;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Global upload root (absolute), from `config::upload_root()`.
/// If relative in env, resolve against current_dir().
pub fn upload_root() -> PathBuf {
    let root = config::upload_root();
    let p = PathBuf::from(root);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// Directory for stored course images: {UPLOAD_ROOT}/courses
pub fn course_image_dir() -> PathBuf {
    upload_root().join("courses")
}

/// Directory for stored session videos: {UPLOAD_ROOT}/videos
pub fn session_video_dir() -> PathBuf {
    upload_root().join("videos")
}

/// Public URL for a stored course image, as persisted on the course record.
pub fn course_image_url(filename: &str) -> String {
    format!("/uploads/courses/{filename}")
}

/// Public URL for a stored session video, as persisted on the session record.
pub fn session_video_url(filename: &str) -> String {
    format!("/uploads/videos/{filename}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_dirs_live_under_the_upload_root() {
        let root = upload_root();
        assert!(course_image_dir().starts_with(&root));
        assert!(session_video_dir().starts_with(&root));
    }

    #[test]
    fn public_urls_are_rooted_at_uploads() {
        assert_eq!(course_image_url("a.png"), "/uploads/courses/a.png");
        assert_eq!(session_video_url("b.mp4"), "/uploads/videos/b.mp4");
    }
}
