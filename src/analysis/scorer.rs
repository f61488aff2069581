// src/analysis/scorer.rs
//! Issue scoring: folds signal documents into a ranked list of deduplicated
//! issues with evidence.
//!
//! One pass over the input, one bucket entry per normalized phrase. Scores
//! accumulate; the category is frozen when the phrase is first seen. The
//! final sort is stable, so equal scores keep first-seen phrase order.

use std::collections::HashMap;

use serde::Serialize;

use crate::analysis::normalize::normalize_kw;
use crate::analysis::taxonomy::classify;
use crate::sources::types::{SignalDoc, SourceTag, TrendKind};

/// Phrases containing any of these are dropped before classification.
/// Distinct from the expander's list: also covers the "영어로" translation
/// artifacts that search snippets produce.
pub const NEGATIVE_PHRASES: &[&str] = &[
    "고양이", "강아지", "신생아", "성인", "군대", "연애", "직장", "영어로", "영어 로",
];

/// Baseline for documents the taxonomy cannot place. Keeps them in the
/// ranking below any classified match instead of dropping them.
const UNCLASSIFIED_FLOOR: f64 = 0.6;

/// Trend-source multipliers (tuning values, part of the scoring contract).
const RISING_BONUS: f64 = 1.35;
const TOP_BONUS: f64 = 1.05;
const TREND_VALUE_CAP: f64 = 100.0;
const TREND_VALUE_DIVISOR: f64 = 600.0;

/// Search endpoints are queried with sort=date, so their hits carry a small
/// freshness bonus.
const DATE_SORT_BONUS: f64 = 1.10;

/// One deduplicated, scored, evidenced topical candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueItem {
    /// Normalized text key; exactly one item exists per phrase per run.
    pub phrase: String,
    /// Category assigned when the phrase was first seen.
    pub category: String,
    pub score: f64,
    /// URL when available, else title; insertion-ordered, no duplicates.
    pub evidence: Vec<String>,
}

/// Fold `docs` into ranked issues, descending by score.
///
/// Missing boost/weight entries default to 1.0; malformed documents degrade
/// to skips. Inputs are not mutated and repeated runs over the same input
/// produce identical output.
pub fn build_issues_from_docs(
    docs: &[SignalDoc],
    taxonomy_boost: &HashMap<String, f64>,
    source_weights: &HashMap<String, f64>,
) -> Vec<IssueItem> {
    // Insertion-ordered bucket: the Vec keeps first-seen order, the map only
    // tracks indices into it.
    let mut items: Vec<IssueItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for doc in docs {
        // Phrase candidate per source: RSS keys on the headline, trends on
        // the keyword text, search sources prefer the title.
        let raw_text = match doc.source {
            SourceTag::RssNews => doc.title.as_str(),
            SourceTag::GoogleTrends => doc.text.as_str(),
            _ => {
                if doc.title.is_empty() {
                    doc.text.as_str()
                } else {
                    doc.title.as_str()
                }
            }
        };

        let text = normalize_kw(raw_text);
        if text.is_empty() {
            continue;
        }
        if NEGATIVE_PHRASES.iter().any(|n| text.contains(n)) {
            continue;
        }

        let (category, raw) = classify(&text);
        let boost = taxonomy_boost.get(category).copied().unwrap_or(1.0);
        let source_weight = source_weights
            .get(doc.source.as_str())
            .copied()
            .unwrap_or(1.0);

        let mut trend_bonus = 1.0;
        if doc.source == SourceTag::GoogleTrends {
            if let Some(trend) = &doc.meta.trend {
                match trend.kind {
                    TrendKind::Rising => trend_bonus *= RISING_BONUS,
                    TrendKind::Top => trend_bonus *= TOP_BONUS,
                }
                if let Some(value) = trend.value {
                    trend_bonus *= 1.0 + value.min(TREND_VALUE_CAP) / TREND_VALUE_DIVISOR;
                }
            }
        }
        if doc.source.is_search() {
            trend_bonus *= DATE_SORT_BONUS;
        }

        let hit_score = if raw > 0.0 { raw } else { UNCLASSIFIED_FLOOR };
        let base_score = hit_score * boost * source_weight * trend_bonus;

        let idx = match index.get(text.as_str()).copied() {
            Some(i) => {
                items[i].score += base_score;
                i
            }
            None => {
                items.push(IssueItem {
                    phrase: text.clone(),
                    category: category.to_string(),
                    score: base_score,
                    evidence: Vec::new(),
                });
                index.insert(text, items.len() - 1);
                items.len() - 1
            }
        };

        let evidence = if doc.url.is_empty() {
            doc.title.as_str()
        } else {
            doc.url.as_str()
        };
        if !evidence.is_empty() && !items[idx].evidence.iter().any(|e| e == evidence) {
            items[idx].evidence.push(evidence.to_string());
        }
    }

    items.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::types::DocMeta;

    fn doc(source: SourceTag, title: &str, text: &str, url: &str) -> SignalDoc {
        SignalDoc {
            source,
            title: title.to_string(),
            text: text.to_string(),
            url: url.to_string(),
            published_at: None,
            meta: DocMeta::default(),
        }
    }

    #[test]
    fn unclassifiable_doc_gets_floor_score() {
        let docs = vec![doc(SourceTag::GoogleTrends, "", "오늘 날씨 좋다", "")];
        let issues =
            build_issues_from_docs(&docs, &HashMap::new(), &HashMap::new());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category, "기타");
        assert!((issues[0].score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn negative_phrase_doc_is_skipped() {
        let docs = vec![
            doc(SourceTag::NaverBlog, "고양이 산만", "", "http://x/1"),
            doc(SourceTag::NaverBlog, "아이 산만", "", "http://x/2"),
        ];
        let issues =
            build_issues_from_docs(&docs, &HashMap::new(), &HashMap::new());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].phrase, "아이 산만");
    }

    #[test]
    fn empty_after_normalize_is_skipped() {
        let docs = vec![doc(SourceTag::NaverNews, "   \n ", "", "http://x/1")];
        let issues =
            build_issues_from_docs(&docs, &HashMap::new(), &HashMap::new());
        assert!(issues.is_empty());
    }

    #[test]
    fn inputs_are_not_mutated_and_runs_are_deterministic() {
        let docs = vec![
            doc(SourceTag::NaverNews, "아이 산만 이유", "", "http://x/1"),
            doc(SourceTag::RssNews, "유치원 등원 거부", "본문", "http://y/1"),
        ];
        let a = build_issues_from_docs(&docs, &HashMap::new(), &HashMap::new());
        let b = build_issues_from_docs(&docs, &HashMap::new(), &HashMap::new());
        assert_eq!(a, b);
    }
}
