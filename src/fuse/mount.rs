//! Mount helpers.
//!
//! Thin wrappers over rfuse3 raw Session APIs; on Linux the mount is
//! unprivileged via fusermount3.

use std::path::Path;

use rfuse3::MountOptions;

use crate::fuse::FuseFs;
use crate::store::client::ObjectBackend;

fn mount_options(volume_label: &str) -> MountOptions {
    let mut mo = MountOptions::default();
    mo.fs_name(volume_label);
    // conservative defaults: no allow_other, mountpoint must be empty
    mo
}

/// Mount the filesystem at `mount_point` using unprivileged mode.
#[cfg(target_os = "linux")]
pub async fn mount_unprivileged<B>(
    fs: FuseFs<B>,
    mount_point: impl AsRef<Path>,
    volume_label: &str,
) -> std::io::Result<rfuse3::raw::MountHandle>
where
    B: ObjectBackend + 'static,
{
    let opts = mount_options(volume_label);
    let session = rfuse3::raw::Session::new(opts);
    session.mount_with_unprivileged(fs, mount_point).await
}

/// Stub for non-Linux targets.
#[cfg(not(target_os = "linux"))]
pub async fn mount_unprivileged<B>(
    _fs: FuseFs<B>,
    _mount_point: impl AsRef<Path>,
    _volume_label: &str,
) -> std::io::Result<rfuse3::raw::MountHandle>
where
    B: ObjectBackend + 'static,
{
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "FUSE mount is only supported on Linux in this build",
    ))
}
