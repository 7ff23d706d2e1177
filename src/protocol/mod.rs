//! File-transfer command protocol.
//!
//! Requests are single text frames with positional arguments:
//! - `UPLOAD_CHUNK <filename> <base64-payload> <offset>`
//! - `GET <filename>`
//! - `LIST`
//!
//! Every response is one JSON document with a `status` field of `OK` or
//! `ERROR`. The parser turns request text into commands; the handler
//! executes them against the file store.

pub mod handler;
pub mod parser;
