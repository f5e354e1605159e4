//! Attachment sink contract.
//!
//! File storage is an external collaborator: the engine only ever handles
//! opaque location strings. During todo creation, sink failures are logged
//! and skipped so the todo is still created with whatever subset succeeded;
//! the explicit attach operation on an existing todo surfaces the failure.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;
use ulid::Ulid;

use crate::error::{Error, Result};

/// Inline attachment payload as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentUpload {
    pub name: String,
    pub content: String,
}

/// Persists attachment content and returns an opaque location string.
pub trait AttachmentSink: Send + Sync {
    fn store(&self, upload: &AttachmentUpload) -> Result<String>;
}

/// Local-disk sink writing under `<data_dir>/uploads`, returning locations
/// shaped like `/uploads/<file>`.
pub struct DiskSink {
    uploads_dir: PathBuf,
}

impl DiskSink {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }
}

impl AttachmentSink for DiskSink {
    fn store(&self, upload: &AttachmentUpload) -> Result<String> {
        // A name that sanitizes to nothing is a client error, not a sink
        // failure.
        let name = sanitize_name(&upload.name);
        if name.is_empty() {
            return Err(Error::Validation(
                "Please add an attachment name".to_string(),
            ));
        }
        fs::create_dir_all(&self.uploads_dir)?;
        let file_name = format!("{}-{}", Ulid::new(), name);
        fs::write(self.uploads_dir.join(&file_name), upload.content.as_bytes())?;
        Ok(format!("/uploads/{file_name}"))
    }
}

/// Run every upload through the sink, keeping the successes. Failures are
/// logged and dropped; creation must not fail because an attachment did.
pub fn store_best_effort(sink: &dyn AttachmentSink, uploads: &[AttachmentUpload]) -> Vec<String> {
    let mut locations = Vec::new();
    for upload in uploads {
        match sink.store(upload) {
            Ok(location) => locations.push(location),
            Err(err) => warn!(name = %upload.name, error = %err, "attachment upload failed"),
        }
    }
    locations
}

/// Strip path components so a client-supplied name cannot escape the
/// uploads directory.
fn sanitize_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'))
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}
