//! Object-store backends.
//!
//! The adapter core consumes the [`client::ObjectBackend`] trait only; the
//! submodules provide the concrete backends:
//! - `s3`: S3-compatible stores via aws-sdk-s3
//! - `localfs`: local directory mock, for tests and the mount-local demo
//! - `memory`: in-memory double with call counters, for unit tests

pub mod client;
pub mod localfs;
pub mod memory;
pub mod s3;
