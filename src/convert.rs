//! Model-based restoration of noised rows.

use crate::backend::ChatBackend;
use crate::error::Result;
use crate::model::{ConversionResult, Dataset, ParsedReply, Row};
use crate::options::ConvertOptions;
use crate::parse::parse_reply;
use crate::prompt::build_conversation;

/// Restores noised rows by querying a chat backend row by row.
///
/// The backend is acquired once by the caller and owned here for the
/// lifetime of the converter.
///
/// # Example
///
/// ```no_run
/// use noisefix::{HttpBackend, HttpBackendConfig, NoiseConverter, ConvertOptions};
///
/// let backend = HttpBackend::new(HttpBackendConfig::default())?;
/// let converter = NoiseConverter::new(backend, ConvertOptions::default())?;
/// let noised = noisefix::load_dataset("noised.csv")?;
/// let results = converter.convert(&noised)?;
/// noisefix::save_results("restored.csv", &results)?;
/// # Ok::<(), noisefix::Error>(())
/// ```
pub struct NoiseConverter<B> {
    backend: B,
    options: ConvertOptions,
}

impl<B: ChatBackend> NoiseConverter<B> {
    /// Creates a converter, rejecting invalid sampling options.
    pub fn new(backend: B, options: ConvertOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { backend, options })
    }

    /// Returns the sampling options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Restores a single row.
    ///
    /// Backend errors propagate; missing reply fields do not.
    pub fn convert_row(&self, row: &Row) -> Result<ParsedReply> {
        let messages = build_conversation(row);
        let reply = self.backend.generate(&messages, &self.options)?;
        let parsed = parse_reply(&reply);

        if parsed.is_empty() {
            log::warn!("row {}: no fields found in reply", row.id);
        } else if !parsed.reason.is_empty() {
            log::debug!("row {}: {}", row.id, parsed.reason);
        }
        Ok(parsed)
    }

    /// Restores every row in order, one backend call at a time.
    pub fn convert(&self, dataset: &Dataset) -> Result<Vec<ConversionResult>> {
        self.convert_with_progress(dataset, |_, _| {})
    }

    /// Like [`convert`](Self::convert), calling `progress(done, total)`
    /// after each row.
    pub fn convert_with_progress<F>(&self, dataset: &Dataset, mut progress: F) -> Result<Vec<ConversionResult>>
    where
        F: FnMut(usize, usize),
    {
        let total = dataset.len();
        let mut results = Vec::with_capacity(total);

        for (i, row) in dataset.iter().enumerate() {
            let parsed = self.convert_row(row)?;
            results.push(ConversionResult::from_reply(&row.id, &row.text, parsed));
            progress(i + 1, total);
        }

        log::info!("converted {} rows with {}", total, self.options.model);
        Ok(results)
    }

    /// Consumes the converter and returns the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }
}
