//! Upload ingestion adapter
//!
//! Decodes an uploaded byte stream into a [`Table`] given a declared
//! filename. The format is taken from the filename extension; extensions
//! outside the supported set are rejected before any bytes are touched.
//!
//! Decoding itself sits behind the [`TableDecoder`] seam so the service can
//! swap or extend readers without touching the dispatch core.

mod decoders;

pub use decoders::{CsvDecoder, ExcelDecoder};

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tabstat_core::{Error, Result, Table};
use tracing::warn;

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// Detect the declared format from a filename extension
    ///
    /// Anything without a `.csv`, `.xlsx`, or `.xls` suffix (case
    /// insensitive) is an [`Error::UnsupportedFormat`].
    pub fn from_filename(filename: &str) -> Result<Self> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx") => Ok(Self::Xlsx),
            Some("xls") => Ok(Self::Xls),
            _ => Err(Error::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// Decodes raw upload bytes into a table
pub trait TableDecoder: Send + Sync {
    /// Formats this decoder can handle
    fn formats(&self) -> &[FileFormat];

    /// Decode the byte stream into a table
    fn decode(&self, bytes: &[u8]) -> Result<Table>;
}

/// Format-keyed registry of decoders
///
/// The default registry wires the CSV and Excel decoders; additional
/// decoders can be registered to override or extend them.
#[derive(Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<FileFormat, Arc<dyn TableDecoder>>,
}

impl DecoderRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registry with the built-in CSV and Excel decoders
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CsvDecoder::default()));
        registry.register(Arc::new(ExcelDecoder::default()));
        registry
    }

    /// Register a decoder for every format it declares
    pub fn register(&mut self, decoder: Arc<dyn TableDecoder>) {
        for format in decoder.formats() {
            self.decoders.insert(*format, Arc::clone(&decoder));
        }
    }

    /// Decode an upload: detect the format, pick a decoder, decode
    ///
    /// Failures are logged before being surfaced so upload problems stay
    /// visible operationally.
    pub fn decode(&self, filename: &str, bytes: &[u8]) -> Result<Table> {
        let format = FileFormat::from_filename(filename).inspect_err(|e| {
            warn!(filename, error = %e, "rejected upload");
        })?;
        let decoder = self.decoders.get(&format).ok_or_else(|| {
            warn!(filename, ?format, "no decoder registered for format");
            Error::UnsupportedFormat(filename.to_string())
        })?;
        decoder.decode(bytes).inspect_err(|e| {
            warn!(filename, ?format, error = %e, "upload decode failed");
        })
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
