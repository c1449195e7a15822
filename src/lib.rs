pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

pub use application::LedgerModel;
pub use domain::*;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
