//! certcheck Storage Library
//!
//! Storage abstraction for uploaded documents. Keys are flat file names inside
//! the upload directory; they must not contain `..`, a path separator, or a
//! leading `/`.

pub mod local;
pub mod traits;

pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
