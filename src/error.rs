//! Error taxonomy shared by the adapter core and the FUSE layer.
//!
//! Backends report failures as boxed errors at the `ObjectBackend` seam; the
//! adapter folds everything into [`FsError`], and the FUSE layer maps each
//! variant onto a POSIX errno via [`FsError::errno`].

use thiserror::Error;

/// Boxed backend error, the type the `ObjectBackend` trait surfaces.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FsError {
    /// Path or object-store key absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write-buffer offset/capacity violation.
    #[error("offset out of range: {0}")]
    OutOfRange(String),

    /// A store call failed (network, auth, throttling, ...).
    #[error("object store unavailable: {0}")]
    StoreUnavailable(#[source] BackendError),

    /// Operation on a path with no open write buffer or read handle.
    #[error("no open handle for {0}")]
    NoSuchHandle(String),

    /// Path exists but has the wrong kind for the operation.
    #[error("is a directory: {0}")]
    IsDirectory(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),
}

impl FsError {
    /// POSIX errno for this error, as returned to the kernel bridge.
    pub fn errno(&self) -> libc::c_int {
        match self {
            FsError::NotFound(_) => libc::ENOENT,
            FsError::OutOfRange(_) => libc::EINVAL,
            FsError::StoreUnavailable(_) => libc::EIO,
            FsError::NoSuchHandle(_) => libc::EIO,
            FsError::IsDirectory(_) => libc::EISDIR,
            FsError::NotADirectory(_) => libc::ENOTDIR,
        }
    }
}

pub type Result<T> = std::result::Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_mapping_matches_taxonomy() {
        assert_eq!(FsError::NotFound("/x".into()).errno(), libc::ENOENT);
        assert_eq!(FsError::OutOfRange("off".into()).errno(), libc::EINVAL);
        let store = FsError::StoreUnavailable(Box::new(std::io::Error::other("down")));
        assert_eq!(store.errno(), libc::EIO);
        assert_eq!(FsError::NoSuchHandle("/x".into()).errno(), libc::EIO);
    }
}
