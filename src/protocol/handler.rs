//! Command execution against the file store.
//!
//! `FileProtocol` is the dispatcher behind the runtime's `Dispatch`
//! boundary: one request frame in, one JSON response document out.
//! Failures stay on the wire as `status=ERROR` responses; the connection
//! is never torn down over a bad command.

use crate::protocol::parser::{self, Command};
use crate::runtime::Dispatch;
use crate::storage::FileStore;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::json;
use tracing::warn;

pub struct FileProtocol {
    store: FileStore,
}

impl FileProtocol {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    fn upload_chunk(&self, filename: &str, data: &[u8], offset: u64) -> String {
        match self.store.write_at(filename, offset, data) {
            Ok(size) => json!({
                "status": "OK",
                "filename": filename,
                "offset": offset,
                "size": size,
            })
            .to_string(),
            Err(e) => {
                warn!(file = filename, offset, error = %e, "Upload chunk failed");
                error_response(&format!("upload failed: {e}"))
            }
        }
    }

    fn get(&self, filename: &str) -> String {
        match self.store.read(filename) {
            Ok(data) => json!({
                "status": "OK",
                "filename": filename,
                "data": BASE64.encode(&data),
            })
            .to_string(),
            Err(e) => error_response(&format!("get failed: {e}")),
        }
    }

    fn list(&self) -> String {
        match self.store.list() {
            Ok(names) => json!({ "status": "OK", "data": names }).to_string(),
            Err(e) => {
                warn!(error = %e, "List failed");
                error_response(&format!("list failed: {e}"))
            }
        }
    }
}

impl Dispatch for FileProtocol {
    fn dispatch(&self, request: &str) -> String {
        match parser::parse(request) {
            Ok(Command::UploadChunk {
                filename,
                data,
                offset,
            }) => self.upload_chunk(&filename, &data, offset),
            Ok(Command::Get { filename }) => self.get(&filename),
            Ok(Command::List) => self.list(),
            Err(e) => error_response(&e.to_string()),
        }
    }
}

/// Build a `status=ERROR` response document.
pub fn error_response(message: &str) -> String {
    json!({ "status": "ERROR", "message": message }).to_string()
}
