use super::{writer, Document, DocumentSource};
use crate::SyncError;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Hard limit for a catalog fetch. There is no retry.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A document read from disk, with a flag telling whether it was just created
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub document: Document,
    pub created: bool,
}

/// Load a document from a path or URL
///
/// Every call re-reads the source; nothing is cached.
///
/// # Errors
///
/// Returns an error if:
/// - The path does not exist and `create_if_missing` is false (`NotFound`)
/// - The content is not a JSON object (`MalformedDocument`)
/// - The URL cannot be fetched (`Network`)
pub fn load(source: &DocumentSource, create_if_missing: bool) -> Result<Document, SyncError> {
    match source {
        DocumentSource::Path(path) => read_document(path, create_if_missing).map(|l| l.document),
        DocumentSource::Url(url) => fetch_document(url),
    }
}

/// Read a JSON object document from a file
///
/// When the file is missing and `create_if_missing` is set, an empty `{}`
/// document is written in its place first.
///
/// # Errors
///
/// Returns `NotFound`, `MalformedDocument` or `Io` as described on [`load`].
pub fn read_document<P: AsRef<Path>>(
    path: P,
    create_if_missing: bool,
) -> Result<Loaded, SyncError> {
    let path_ref = path.as_ref();

    match fs::read_to_string(path_ref) {
        Ok(content) => {
            debug!("Read {} byte(s) from {}", content.len(), path_ref.display());
            let document = parse_document(&content, &path_ref.display().to_string())?;
            Ok(Loaded { document, created: false })
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if !create_if_missing {
                return Err(SyncError::NotFound { path: path_ref.to_path_buf() });
            }

            let document = Document::new();
            if writer::create_document(path_ref, &document)? {
                info!("Created empty document at {}", path_ref.display());
                Ok(Loaded { document, created: true })
            } else {
                // Someone else created it between our read and our write
                read_document(path_ref, false)
            }
        },
        Err(e) => Err(e.into()),
    }
}

/// Fetch a JSON object document with a single GET request
///
/// # Errors
///
/// Returns `Network` on transport failure, timeout or a non-success status,
/// and `MalformedDocument` when the body is not a JSON object.
pub fn fetch_document(url: &str) -> Result<Document, SyncError> {
    let network_error =
        |e: reqwest::Error| SyncError::Network { url: url.to_string(), reason: e.to_string() };

    info!("Fetching {url}");
    let client =
        reqwest::blocking::Client::builder().timeout(FETCH_TIMEOUT).build().map_err(network_error)?;

    let body = client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(reqwest::blocking::Response::text)
        .map_err(network_error)?;

    debug!("Fetched {} byte(s) from {url}", body.len());
    parse_document(&body, url)
}

/// Parse text as a JSON object document
///
/// # Errors
///
/// Returns `MalformedDocument` if the text is not valid JSON or the top-level
/// value is not an object.
pub fn parse_document(content: &str, origin: &str) -> Result<Document, SyncError> {
    let value: Value = serde_json::from_str(content).map_err(|e| SyncError::MalformedDocument {
        origin: origin.to_string(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(SyncError::MalformedDocument {
            origin: origin.to_string(),
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
