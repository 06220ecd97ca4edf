//! Noise detection for dataset rows.
//!
//! Corrupted headlines in the dataset tend to carry stray Latin letters,
//! digits and punctuation in place of Hangul syllables. The detector
//! counts characters in that band and flags rows whose share of them
//! reaches a threshold.

use crate::error::Result;
use crate::model::{Dataset, Row};
use crate::options::{DetectOptions, RatioDenominator};
use rayon::prelude::*;

/// Exclusive lower bound of the counted code point band.
const BAND_LOW: u32 = 31;

/// Exclusive upper bound of the counted code point band.
const BAND_HIGH: u32 = 177;

/// Classifies rows as noised or clean.
pub trait NoiseDetector {
    /// Returns true if the row looks corrupted.
    fn is_noised(&self, row: &Row) -> bool;

    /// Like [`is_noised`](Self::is_noised), for a row read from a source
    /// with `field_count` columns.
    fn is_noised_in(&self, row: &Row, field_count: usize) -> bool {
        let _ = field_count;
        self.is_noised(row)
    }

    /// Classifies every row, in input order.
    fn classify(&self, dataset: &Dataset) -> Vec<bool> {
        dataset
            .iter()
            .map(|row| self.is_noised_in(row, dataset.field_count))
            .collect()
    }

    /// Returns the rows judged noised.
    fn detect(&self, dataset: &Dataset) -> Dataset {
        self.partition(dataset).0
    }

    /// Returns the rows judged clean.
    fn detect_not(&self, dataset: &Dataset) -> Dataset {
        self.partition(dataset).1
    }

    /// Splits the dataset into `(noised, clean)`, keeping relative order.
    fn partition(&self, dataset: &Dataset) -> (Dataset, Dataset) {
        let flags = self.classify(dataset);
        let mut noised = Dataset::new().with_field_count(dataset.field_count);
        let mut clean = Dataset::new().with_field_count(dataset.field_count);

        for (row, is_noised) in dataset.iter().zip(flags) {
            if is_noised {
                noised.push(row.clone());
            } else {
                clean.push(row.clone());
            }
        }

        log::info!(
            "partitioned {} rows: {} noised, {} clean",
            dataset.len(),
            noised.len(),
            clean.len()
        );
        (noised, clean)
    }
}

/// Returns true if the character falls in the counted band.
pub fn is_in_band(c: char) -> bool {
    let code = c as u32;
    BAND_LOW < code && code < BAND_HIGH
}

/// Computes the in-band character ratio of a text.
///
/// `field_count` is only read by [`RatioDenominator::FieldCount`]. A zero
/// denominator yields `0.0`.
pub fn ascii_ratio(text: &str, denominator: RatioDenominator, field_count: usize) -> f64 {
    let in_band = text.chars().filter(|&c| is_in_band(c)).count();
    let total = match denominator {
        RatioDenominator::TextLength => text.chars().count(),
        RatioDenominator::FieldCount => field_count,
    };

    if total == 0 {
        0.0
    } else {
        in_band as f64 / total as f64
    }
}

/// Detector that flags rows by their in-band character ratio.
#[derive(Debug, Clone, Default)]
pub struct AsciiRatioDetector {
    options: DetectOptions,
}

impl AsciiRatioDetector {
    /// Creates a detector, rejecting thresholds the ratio can never reach.
    pub fn new(options: DetectOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Creates a detector with the given threshold and default settings.
    pub fn with_threshold(threshold: f64) -> Result<Self> {
        Self::new(DetectOptions::new().with_threshold(threshold))
    }

    /// Returns the detector options.
    pub fn options(&self) -> &DetectOptions {
        &self.options
    }

    /// Returns the ratio this detector computes for a row with the
    /// standard three columns.
    pub fn ratio(&self, row: &Row) -> f64 {
        self.ratio_in(row, Row::FIELD_COUNT)
    }

    /// Returns the ratio for a row read from a source with `field_count`
    /// columns.
    pub fn ratio_in(&self, row: &Row, field_count: usize) -> f64 {
        ascii_ratio(&row.text, self.options.denominator, field_count)
    }
}

impl NoiseDetector for AsciiRatioDetector {
    fn is_noised(&self, row: &Row) -> bool {
        self.is_noised_in(row, Row::FIELD_COUNT)
    }

    fn is_noised_in(&self, row: &Row, field_count: usize) -> bool {
        self.ratio_in(row, field_count) >= self.options.threshold
    }

    fn classify(&self, dataset: &Dataset) -> Vec<bool> {
        let fields = dataset.field_count;
        if self.options.parallel {
            dataset
                .rows
                .par_iter()
                .map(|row| self.is_noised_in(row, fields))
                .collect()
        } else {
            dataset.iter().map(|row| self.is_noised_in(row, fields)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample() -> Dataset {
        vec![
            Row::new("0", "갯벌도 얼려버린^한파", 0),
            Row::new("1", "cI그1[사령탑이 탐내C 선t는…이재성·이근호", 1),
            Row::new("2", "국토부 공동주택 관리 우수단지에 서울", 5),
            Row::new("3", "이통Y사f갤럭시탭Sr 오늘w터L사전예약 시작", 4),
            Row::new("4", "hello", 3),
            Row::new("5", "", 5),
        ]
        .into()
    }

    #[test]
    fn test_band_bounds() {
        assert!(!is_in_band('\u{1F}'));
        assert!(is_in_band(' '));
        assert!(is_in_band('~'));
        assert!(is_in_band('\u{B0}'));
        assert!(!is_in_band('\u{B1}'));
        assert!(!is_in_band('한'));
        assert!(!is_in_band('與'));
    }

    #[test]
    fn test_all_ascii_is_noised() {
        let detector = AsciiRatioDetector::default();
        let row = Row::new("x", "hello", 0);
        assert_eq!(detector.ratio(&row), 1.0);
        assert!(detector.is_noised(&row));
    }

    #[test]
    fn test_no_in_band_chars_is_clean() {
        let detector = AsciiRatioDetector::default();
        let row = Row::new("x", "갯벌도얼려버린혹한", 0);
        assert_eq!(detector.ratio(&row), 0.0);
        assert!(!detector.is_noised(&row));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 1 in-band char out of 4
        let row = Row::new("x", "가a나다", 0);
        let detector = AsciiRatioDetector::with_threshold(0.25).unwrap();
        assert_eq!(detector.ratio(&row), 0.25);
        assert!(detector.is_noised(&row));

        let stricter = AsciiRatioDetector::with_threshold(0.26).unwrap();
        assert!(!stricter.is_noised(&row));
    }

    #[test]
    fn test_empty_text_is_clean() {
        let detector = AsciiRatioDetector::default();
        assert!(!detector.is_noised(&Row::new("x", "", 0)));
    }

    #[test]
    fn test_field_count_denominator() {
        let detector = AsciiRatioDetector::new(DetectOptions::new().legacy_ratio()).unwrap();
        // 5 in-band chars over 3 fields
        let row = Row::new("x", "ab한cde", 0);
        assert!((detector.ratio(&row) - 5.0 / 3.0).abs() < 1e-9);
        assert!(detector.is_noised(&row));

        // a single in-band char is already 1/3
        assert!(detector.is_noised(&Row::new("y", "가나다라마바사아자차카타a", 0)));
    }

    #[test]
    fn test_field_count_follows_source_columns() {
        let options = DetectOptions::new().with_threshold(0.3).legacy_ratio();
        let detector = AsciiRatioDetector::new(options).unwrap();
        let data = "ID,text,target,split\nynat_0,가나다라a,2,train\n";
        let dataset = crate::io::read_csv(data.as_bytes()).unwrap();

        assert_eq!(dataset.field_count, 4);
        assert_eq!(detector.ratio_in(&dataset.rows[0], dataset.field_count), 0.25);
        assert_eq!(detector.classify(&dataset), vec![false]);

        let (noised, clean) = detector.partition(&dataset);
        assert!(noised.is_empty());
        assert_eq!(clean.field_count, 4);

        // the same row with three columns crosses the threshold
        let three = Dataset::from(dataset.rows.clone());
        assert_eq!(detector.classify(&three), vec![true]);
    }

    #[test]
    fn test_field_count_denominator_allows_threshold_above_one() {
        let options = DetectOptions::new().with_threshold(1.5).legacy_ratio();
        let detector = AsciiRatioDetector::new(options).unwrap();
        assert!(detector.is_noised(&Row::new("x", "ab한cde", 0)));
        assert!(!detector.is_noised(&Row::new("y", "ab한c", 0)));
    }

    #[test]
    fn test_detect_and_detect_not_partition() {
        let dataset = sample();
        let detector = AsciiRatioDetector::default();

        let noised = detector.detect(&dataset);
        let clean = detector.detect_not(&dataset);

        assert_eq!(noised.len() + clean.len(), dataset.len());
        for id in noised.ids() {
            assert!(!clean.ids().any(|c| c == id));
        }
        assert_eq!(noised.ids().collect::<Vec<_>>(), vec!["1", "3", "4"]);
        assert_eq!(clean.ids().collect::<Vec<_>>(), vec!["0", "2", "5"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dataset = sample();
        let parallel = AsciiRatioDetector::default();
        let sequential = AsciiRatioDetector::new(DetectOptions::new().sequential()).unwrap();

        assert_eq!(parallel.classify(&dataset), sequential.classify(&dataset));
        assert_eq!(parallel.partition(&dataset), sequential.partition(&dataset));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        assert!(matches!(
            AsciiRatioDetector::with_threshold(-0.1),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_dataset() {
        let detector = AsciiRatioDetector::default();
        let (noised, clean) = detector.partition(&Dataset::new());
        assert!(noised.is_empty());
        assert!(clean.is_empty());
    }
}
