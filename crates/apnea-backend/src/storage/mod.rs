//! On-disk working directory for uploads and intermediate artifacts

mod workdir;

pub use workdir::{sanitize_filename, WorkDir};
