//! # noisefix
//!
//! Detection and restoration of noisy rows in Korean news-headline
//! datasets.
//!
//! ## Pipeline
//!
//! 1. **Detect**: flag rows whose share of Latin/ASCII-band characters
//!    reaches a threshold ([`AsciiRatioDetector`])
//! 2. **Convert**: send each flagged row through a few-shot prompt to a
//!    chat model and parse the restored text, label and noise flag
//!    ([`NoiseConverter`])
//! 3. **Merge**: fold the restored rows back into the dataset
//!    ([`merge_results`])
//!
//! ## Quick Start
//!
//! ```no_run
//! use noisefix::{AsciiRatioDetector, NoiseDetector};
//!
//! fn main() -> noisefix::Result<()> {
//!     let dataset = noisefix::load_dataset("train.csv")?;
//!
//!     let detector = AsciiRatioDetector::default();
//!     let (noised, clean) = detector.partition(&dataset);
//!
//!     println!("{} noised, {} clean", noised.len(), clean.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `http` (default): OpenAI-compatible chat completions backend
//! - `async`: Async I/O support with Tokio

pub mod backend;
pub mod convert;
pub mod detect;
pub mod error;
pub mod io;
pub mod merge;
pub mod model;
pub mod options;
pub mod parse;
pub mod prompt;

#[cfg(feature = "async")]
pub mod async_api;

// Re-exports
pub use backend::ChatBackend;
#[cfg(feature = "http")]
pub use backend::{HttpBackend, HttpBackendConfig};
pub use convert::NoiseConverter;
pub use detect::{ascii_ratio, AsciiRatioDetector, NoiseDetector};
pub use error::{Error, Result};
pub use io::{detect_format_from_path, load_dataset, save_dataset, save_results, DataFormat};
pub use merge::{merge_at, merge_results, MergeSummary};
pub use model::{ConversionResult, Dataset, Message, ParsedReply, Role, Row};
pub use options::{ConvertOptions, DetectOptions, RatioDenominator};
pub use parse::parse_reply;

use std::path::Path;

/// Outcome of a full clean run.
#[derive(Debug, Clone)]
pub struct CleanReport {
    /// Dataset with restored rows merged in, in input order
    pub dataset: Dataset,
    /// Per-row conversion results for the noised subset
    pub results: Vec<ConversionResult>,
    /// Number of rows judged clean
    pub clean_rows: usize,
    /// Merge counts
    pub merge: MergeSummary,
}

/// Detects noised rows, restores them and merges them back by position.
///
/// # Example
///
/// ```no_run
/// use noisefix::{clean_dataset, AsciiRatioDetector, ConvertOptions, HttpBackend, HttpBackendConfig, NoiseConverter};
///
/// let dataset = noisefix::load_dataset("train.csv")?;
/// let backend = HttpBackend::new(HttpBackendConfig::default())?;
/// let converter = NoiseConverter::new(backend, ConvertOptions::default())?;
///
/// let report = clean_dataset(dataset, &AsciiRatioDetector::default(), &converter)?;
/// noisefix::save_dataset("train_clean.csv", &report.dataset)?;
/// # Ok::<(), noisefix::Error>(())
/// ```
pub fn clean_dataset<D, B>(dataset: Dataset, detector: &D, converter: &NoiseConverter<B>) -> Result<CleanReport>
where
    D: NoiseDetector + ?Sized,
    B: ChatBackend,
{
    clean_dataset_with_progress(dataset, detector, converter, |_, _| {})
}

/// Like [`clean_dataset`], reporting conversion progress.
pub fn clean_dataset_with_progress<D, B, F>(
    mut dataset: Dataset,
    detector: &D,
    converter: &NoiseConverter<B>,
    progress: F,
) -> Result<CleanReport>
where
    D: NoiseDetector + ?Sized,
    B: ChatBackend,
    F: FnMut(usize, usize),
{
    let flags = detector.classify(&dataset);
    let positions: Vec<usize> = flags
        .iter()
        .enumerate()
        .filter_map(|(i, &is_noised)| is_noised.then_some(i))
        .collect();
    let noised = positions
        .iter()
        .map(|&i| dataset.rows[i].clone())
        .collect::<Dataset>()
        .with_field_count(dataset.field_count);
    log::info!("{} of {} rows flagged as noised", noised.len(), dataset.len());

    let results = converter.convert_with_progress(&noised, progress)?;
    let merge = merge::merge_at(&mut dataset, &positions, &results);

    Ok(CleanReport {
        clean_rows: dataset.len() - positions.len(),
        dataset,
        results,
        merge,
    })
}

/// Loads a dataset and returns its `(noised, clean)` split.
pub fn detect_file(path: impl AsRef<Path>, options: DetectOptions) -> Result<(Dataset, Dataset)> {
    let detector = AsciiRatioDetector::new(options)?;
    let dataset = load_dataset(path)?;
    Ok(detector.partition(&dataset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restore(messages: &[Message], _: &ConvertOptions) -> Result<String> {
        let query = &messages[messages.len() - 1].content;
        let reply = if query.contains("한파") {
            "text: '갯벌도 얼려버린 혹한'\nlabel: 0\nnoise: 1"
        } else {
            "text: '이통3사 갤럭시탭S8 오늘부터 사전예약 시작'\nlabel: 4\nnoise: 1\nreason: 숫자 복원"
        };
        Ok(reply.to_string())
    }

    fn dataset() -> Dataset {
        vec![
            Row::new("0", "국토부 공동주택 관리 우수단지에 서울", 5),
            Row::new("1", "이통Y사f갤럭시탭Sr 오늘w터L사전예약 시작", 4),
            Row::new("2", "與 김재수 해임건의안 제출에 옹졸한 정치보복성 공세종합", 2),
        ]
        .into()
    }

    #[test]
    fn test_clean_dataset_restores_noised_rows() {
        let converter = NoiseConverter::new(restore, ConvertOptions::default()).unwrap();
        let report = clean_dataset(dataset(), &AsciiRatioDetector::default(), &converter).unwrap();

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.clean_rows, 2);
        assert_eq!(report.merge.updated, 1);
        assert_eq!(report.dataset.len(), 3);
        assert_eq!(
            report.dataset.rows[1].text,
            "이통3사 갤럭시탭S8 오늘부터 사전예약 시작"
        );
        assert_eq!(report.dataset.rows[0].text, "국토부 공동주택 관리 우수단지에 서울");
    }

    #[test]
    fn test_clean_dataset_with_dyn_detector() {
        let converter = NoiseConverter::new(restore, ConvertOptions::default()).unwrap();
        let detector: Box<dyn NoiseDetector> = Box::new(AsciiRatioDetector::with_threshold(1.0).unwrap());
        let report = clean_dataset(dataset(), detector.as_ref(), &converter).unwrap();

        assert!(report.results.is_empty());
        assert_eq!(report.dataset, dataset());
    }

    #[test]
    fn test_clean_dataset_with_duplicate_ids() {
        let converter = NoiseConverter::new(restore, ConvertOptions::default()).unwrap();
        let dataset: Dataset = vec![
            Row::new("7", "국토부 공동주택 관리 우수단지에 서울", 5),
            Row::new("7", "이통Y사f갤럭시탭Sr 오늘w터L사전예약 시작", 4),
        ]
        .into();
        let report = clean_dataset(dataset, &AsciiRatioDetector::default(), &converter).unwrap();

        assert_eq!(report.merge.updated, 1);
        assert_eq!(report.dataset.rows[0].text, "국토부 공동주택 관리 우수단지에 서울");
        assert_eq!(
            report.dataset.rows[1].text,
            "이통3사 갤럭시탭S8 오늘부터 사전예약 시작"
        );
    }

    #[test]
    fn test_clean_dataset_legacy_ratio_uses_source_columns() {
        let converter = NoiseConverter::new(restore, ConvertOptions::default()).unwrap();
        let dataset = io::read_csv("ID,text,target,split\n0,가나다라a,2,train\n".as_bytes()).unwrap();
        let detector = AsciiRatioDetector::new(DetectOptions::new().with_threshold(0.3).legacy_ratio()).unwrap();

        let report = clean_dataset(dataset, &detector, &converter).unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.clean_rows, 1);
    }

    #[test]
    fn test_detect_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        save_dataset(&path, &dataset()).unwrap();

        let (noised, clean) = detect_file(&path, DetectOptions::default()).unwrap();
        assert_eq!(noised.ids().collect::<Vec<_>>(), vec!["1"]);
        assert_eq!(clean.len(), 2);
    }

    #[test]
    fn test_detect_file_rejects_bad_threshold() {
        let result = detect_file("missing.csv", DetectOptions::new().with_threshold(2.0));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
