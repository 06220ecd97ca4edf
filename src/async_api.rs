//! Async API for non-blocking dataset processing.
//!
//! Enable the `async` feature to use these APIs:
//!
//! ```toml
//! [dependencies]
//! noisefix = { version = "0.1", features = ["async"] }
//! ```
//!
//! Conversion still issues one backend call at a time; the blocking loop
//! runs on Tokio's blocking pool so the caller's executor stays free.

use crate::backend::ChatBackend;
use crate::convert::NoiseConverter;
use crate::error::{Error, Result};
use crate::io::{detect_format_from_path, read_csv, read_jsonl, DataFormat};
use crate::model::{ConversionResult, Dataset};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// Asynchronously loads a dataset, dispatching on the file extension.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> noisefix::Result<()> {
/// let dataset = noisefix::async_api::load_dataset("train.csv").await?;
/// println!("Rows: {}", dataset.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let format = detect_format_from_path(path.as_ref())?;
    let data = fs::read(path).await?;

    match format {
        DataFormat::Csv => read_csv(data.as_slice()),
        DataFormat::JsonLines => read_jsonl(data.as_slice()),
    }
}

/// Asynchronously restores every row of a dataset.
///
/// Results keep input order. The first backend error aborts the run.
pub async fn convert<B>(converter: Arc<NoiseConverter<B>>, dataset: Dataset) -> Result<Vec<ConversionResult>>
where
    B: ChatBackend + Send + Sync + 'static,
{
    tokio::task::spawn_blocking(move || converter.convert(&dataset))
        .await
        .map_err(|e| Error::Join(e.to_string()))?
}
