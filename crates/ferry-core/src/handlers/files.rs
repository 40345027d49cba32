//! File store backing the `/files/` routes
//!
//! Files live flat in one base directory. Names are single path
//! components; anything that could escape the directory is rejected.
//! Writes go to a hidden temp file first and are renamed into place, so a
//! concurrent reader sees either the old or the new content, never a mix.

use crate::{Error, Response, Result};
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Filesystem adapter rooted at an optional base directory
#[derive(Debug)]
pub struct FileStore {
    root: Option<PathBuf>,
    temp_counter: AtomicU64,
}

impl FileStore {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root,
            temp_counter: AtomicU64::new(0),
        }
    }

    /// Base directory, if configured
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Serve `GET /files/<name>`
    pub async fn retrieve(&self, name: &str) -> Result<Response> {
        let Some(root) = self.root() else {
            return Ok(Response::not_found());
        };
        let name = sanitize_name(name)?;

        if !exists(root, name).await? {
            return Ok(Response::not_found());
        }

        match tokio::fs::read(root.join(name)).await {
            Ok(content) => Ok(Response::octet_stream(content)),
            // Removed between the existence check and the read
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Response::not_found()),
            Err(e) => Err(e.into()),
        }
    }

    /// Serve `POST /files/<name>`: replace the file with `body`
    pub async fn store(&self, name: &str, body: &Bytes) -> Result<Response> {
        let root = self.root().ok_or(Error::DirectoryNotConfigured)?;
        let name = sanitize_name(name)?;

        let target = root.join(name);
        // Temp name length does not depend on `name`
        let temp = root.join(format!(
            ".ferry-{}-{}.tmp",
            std::process::id(),
            self.temp_counter.fetch_add(1, Ordering::Relaxed)
        ));

        if let Err(e) = write_then_rename(&temp, &target, body).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        tracing::debug!(path = %target.display(), bytes = body.len(), "stored file");
        Ok(Response::created())
    }
}

async fn write_then_rename(temp: &Path, target: &Path, body: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(temp, body).await?;
    tokio::fs::rename(temp, target).await
}

/// Directory check, then file check. A missing directory is "not found".
async fn exists(root: &Path, name: &str) -> Result<bool> {
    match tokio::fs::metadata(root).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    }

    match tokio::fs::metadata(root.join(name)).await {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Validate a file name taken from the request path
///
/// Must be one normal path component, not hidden, with no separators.
fn sanitize_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(Error::InvalidPath("empty file name".to_string()));
    }
    if name.starts_with('.') || name.contains(['/', '\\', '\0']) {
        return Err(Error::InvalidPath(name.to_string()));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(Error::InvalidPath(name.to_string())),
    }
}
