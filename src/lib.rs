//! Library crate backing the `filedepot` binary.
//!
//! Modules:
//! - `config`: CLI + TOML configuration
//! - `protocol`: command parser and the file-transfer dispatcher
//! - `runtime`: listener, frame codec, connection sessions, worker pools
//! - `storage`: on-disk file store

pub mod config;
pub mod protocol;
pub mod runtime;
pub mod storage;
