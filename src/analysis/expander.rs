// src/analysis/expander.rs
//! Long-tail query expansion.
//!
//! Seed queries from the brand profile are short, head-term phrases; search
//! APIs answer much better to intent-qualified long-tail queries. We keep the
//! first seeds verbatim, cross the base topic list with a set of intent
//! suffixes, then dedup (first occurrence wins), drop off-topic entries and
//! cap the result.

use std::collections::HashSet;

/// Intent suffixes appended to every base topic.
pub const TEMPLATES: &[&str] = &[
    "왜",
    "원인",
    "해결",
    "방법",
    "증상",
    "검사",
    "테스트",
    "체크리스트",
    "병원",
    "상담",
    "훈육",
    "루틴",
];

/// Base topics crossed with [`TEMPLATES`].
pub const BASE_TOPICS: &[&str] = &[
    "5세 산만",
    "6세 산만",
    "7세 산만",
    "초등 1학년 집중",
    "초등 입학 준비",
    "유치원 적응",
    "유치원 등원 거부",
    "분리불안 밤잠",
    "아이 예민 짜증",
    "감정조절 안됨",
    "틱 증상",
    "스마트폰 집착",
    "유튜브 끊기",
    "게임 집착",
    "학습지 하기 싫어",
    "글씨 쓰기 싫어",
    "한글 떼기 스트레스",
];

/// Substrings that disqualify a query outright (unrelated life domains).
pub const NEGATIVE: &[&str] = &["신생아", "고양이", "강아지", "성인", "군대", "연애", "직장"];

pub const DEFAULT_MAX_OUT: usize = 80;

/// How many seed queries are taken verbatim before the generated ones.
const SEED_HEAD: usize = 15;

/// Expand seed queries into a deduplicated, filtered, bounded query list.
///
/// Output guarantees: no duplicates, no [`NEGATIVE`] substring matches,
/// relative first-occurrence order preserved, length <= `max_out`. Never
/// fails; an empty seed list falls back to generated queries only.
pub fn expand_queries(seed_queries: &[String], max_out: usize) -> Vec<String> {
    let mut out: Vec<String> =
        Vec::with_capacity(SEED_HEAD + BASE_TOPICS.len() * TEMPLATES.len());
    out.extend(seed_queries.iter().take(SEED_HEAD).cloned());

    for base in BASE_TOPICS {
        for suffix in TEMPLATES {
            out.push(format!("{base} {suffix}").trim().to_string());
        }
    }

    let mut uniq = Vec::new();
    let mut seen = HashSet::new();
    for q in out {
        if NEGATIVE.iter().any(|n| q.contains(n)) {
            continue;
        }
        if seen.insert(q.clone()) {
            uniq.push(q);
        }
    }

    uniq.truncate(max_out);
    uniq
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn respects_max_out_bound() {
        for k in [0, 1, 10, 80, 10_000] {
            assert!(expand_queries(&seeds(&["아이 예민"]), k).len() <= k);
        }
    }

    #[test]
    fn no_duplicates() {
        let out = expand_queries(&seeds(&["5세 산만 왜", "5세 산만 왜"]), 500);
        let set: HashSet<&String> = out.iter().collect();
        assert_eq!(set.len(), out.len());
    }

    #[test]
    fn negative_substrings_never_appear() {
        let out = expand_queries(&seeds(&["고양이 키우기", "아이 예민"]), 500);
        for q in &out {
            assert!(
                !NEGATIVE.iter().any(|n| q.contains(n)),
                "negative term leaked into {q:?}"
            );
        }
    }

    #[test]
    fn seeds_come_first_in_order() {
        let out = expand_queries(&seeds(&["첫번째 시드", "두번째 시드"]), 80);
        assert_eq!(out[0], "첫번째 시드");
        assert_eq!(out[1], "두번째 시드");
    }

    #[test]
    fn only_first_fifteen_seeds_are_kept() {
        let many: Vec<String> = (0..30).map(|i| format!("시드 {i}")).collect();
        let out = expand_queries(&many, 500);
        assert!(out.contains(&"시드 14".to_string()));
        assert!(!out.contains(&"시드 15".to_string()));
    }

    #[test]
    fn empty_seed_falls_back_to_generated() {
        let out = expand_queries(&[], 80);
        assert!(!out.is_empty());
        assert_eq!(out[0], "5세 산만 왜");
    }
}
