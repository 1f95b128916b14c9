//! Storage backends standing in for browser storage areas.

pub(crate) mod common;
pub(crate) mod in_memory;
pub(crate) mod local_fs;

pub use common::{Backend, BackendError, BackendResult, BoxedBackend};
pub use in_memory::InMemoryBackend;
pub use local_fs::LocalFsBackend;
