//! Folding restored rows back into the source dataset.

use crate::model::{ConversionResult, Dataset};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Counts from a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Rows whose text or target changed
    pub updated: usize,
    /// Results that parsed nothing usable
    pub skipped: usize,
    /// Results whose ID matched no row
    pub unmatched: usize,
}

/// Applies conversion results to the dataset by `ID`.
///
/// A non-empty restored text replaces the row text and a parsed label
/// replaces the target. Everything else is left untouched. When IDs
/// repeat, results go to the first row carrying the ID.
pub fn merge_results(dataset: &mut Dataset, results: &[ConversionResult]) -> MergeSummary {
    let mut summary = MergeSummary::default();
    let targets: Vec<(usize, &ConversionResult)> = {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(dataset.len());
        let mut duplicates = 0;
        for (i, row) in dataset.rows.iter().enumerate() {
            match index.entry(row.id.as_str()) {
                Entry::Occupied(_) => duplicates += 1,
                Entry::Vacant(slot) => {
                    slot.insert(i);
                }
            }
        }
        if duplicates > 0 {
            log::warn!(
                "{} rows share an ID with an earlier row; merging into the first occurrence",
                duplicates
            );
        }

        let mut targets = Vec::with_capacity(results.len());
        for result in results {
            let Some(&i) = index.get(result.id.as_str()) else {
                summary.unmatched += 1;
                continue;
            };
            targets.push((i, result));
        }
        targets
    };

    apply(dataset, targets, summary)
}

/// Applies `results[k]` to the row at `positions[k]`, ignoring IDs.
///
/// Positions past the end of the dataset count as unmatched.
pub fn merge_at(dataset: &mut Dataset, positions: &[usize], results: &[ConversionResult]) -> MergeSummary {
    let mut summary = MergeSummary::default();
    let mut targets = Vec::with_capacity(results.len());
    for (&i, result) in positions.iter().zip(results) {
        if i < dataset.len() {
            targets.push((i, result));
        } else {
            summary.unmatched += 1;
        }
    }
    apply(dataset, targets, summary)
}

fn apply(
    dataset: &mut Dataset,
    targets: Vec<(usize, &ConversionResult)>,
    mut summary: MergeSummary,
) -> MergeSummary {
    for (i, result) in targets {
        if result.text.is_empty() && result.target.is_none() {
            summary.skipped += 1;
            continue;
        }

        let row = &mut dataset.rows[i];
        let mut changed = false;

        if !result.text.is_empty() && row.text != result.text {
            row.text = result.text.clone();
            changed = true;
        }
        if let Some(target) = result.target {
            if row.target != target {
                row.target = target;
                changed = true;
            }
        }
        if changed {
            summary.updated += 1;
        }
    }

    log::info!(
        "merged results: {} updated, {} skipped, {} unmatched",
        summary.updated,
        summary.skipped,
        summary.unmatched
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParsedReply, Row};

    fn result(id: &str, text: &str, label: Option<u32>) -> ConversionResult {
        ConversionResult::from_reply(
            id,
            "",
            ParsedReply {
                text: text.to_string(),
                label,
                noise: Some(true),
                reason: String::new(),
            },
        )
    }

    #[test]
    fn test_merge_replaces_text_and_target() {
        let mut dataset: Dataset = vec![
            Row::new("a", "갯벌도 얼려버린^한파", 0),
            Row::new("b", "이녹스 1분기 영업이익 17억원…76% 감소", 3),
        ]
        .into();

        let summary = merge_results(&mut dataset, &[result("a", "갯벌도 얼려버린 혹한", Some(1))]);

        assert_eq!(summary.updated, 1);
        assert_eq!(dataset.rows[0], Row::new("a", "갯벌도 얼려버린 혹한", 1));
        assert_eq!(dataset.rows[1].text, "이녹스 1분기 영업이익 17억원…76% 감소");
    }

    #[test]
    fn test_merge_keeps_text_when_reply_failed() {
        let mut dataset: Dataset = vec![Row::new("a", "깨진^문장", 4)].into();
        let summary = merge_results(
            &mut dataset,
            &[ConversionResult::from_reply("a", "깨진^문장", ParsedReply::default())],
        );

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.updated, 0);
        assert_eq!(dataset.rows[0].text, "깨진^문장");
    }

    #[test]
    fn test_merge_label_only() {
        let mut dataset: Dataset = vec![Row::new("a", "문장", 4)].into();
        let summary = merge_results(&mut dataset, &[result("a", "", Some(2))]);
        assert_eq!(summary.updated, 1);
        assert_eq!(dataset.rows[0], Row::new("a", "문장", 2));
    }

    #[test]
    fn test_merge_counts_unmatched() {
        let mut dataset: Dataset = vec![Row::new("a", "문장", 0)].into();
        let summary = merge_results(&mut dataset, &[result("zzz", "다른 문장", Some(0))]);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(dataset.rows[0].text, "문장");
    }

    #[test]
    fn test_merge_preserves_order_and_length() {
        let mut dataset: Dataset = vec![
            Row::new("a", "하나", 0),
            Row::new("b", "둘^", 1),
            Row::new("c", "셋", 2),
        ]
        .into();
        merge_results(&mut dataset, &[result("b", "둘", Some(1))]);
        assert_eq!(dataset.ids().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_duplicate_ids_use_first_row() {
        let mut dataset: Dataset = vec![
            Row::new("a", "첫째^", 0),
            Row::new("a", "둘째", 1),
        ]
        .into();
        let summary = merge_results(&mut dataset, &[result("a", "첫째", None)]);

        assert_eq!(summary.updated, 1);
        assert_eq!(dataset.rows[0].text, "첫째");
        assert_eq!(dataset.rows[1].text, "둘째");
    }

    #[test]
    fn test_merge_at_ignores_ids() {
        let mut dataset: Dataset = vec![
            Row::new("a", "깨끗한 문장", 0),
            Row::new("a", "깨진^문장", 1),
        ]
        .into();
        let summary = merge_at(
            &mut dataset,
            &[1, 5],
            &[result("a", "깨진 문장", None), result("a", "없는 행", None)],
        );

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(dataset.rows[0].text, "깨끗한 문장");
        assert_eq!(dataset.rows[1].text, "깨진 문장");
    }
}
