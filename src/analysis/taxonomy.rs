// src/analysis/taxonomy.rs
//! Rule-based taxonomy: category → trigger keywords, cheapest-possible
//! substring matching. Declaration order of the table is the tie-break, so
//! the table is an ordered slice rather than a map.

/// Bucket for text no rule matches.
pub const DEFAULT_CATEGORY: &str = "기타";

/// Ordered rule table. A category scores one point per trigger keyword found
/// (case-insensitive substring) in the input.
pub const TAXONOMY_RULES: &[(&str, &[&str])] = &[
    ("집중/주의", &["집중", "산만", "주의력", "ADHD", "충동", "과잉행동"]),
    ("정서/예민", &["예민", "짜증", "분노", "불안", "감정조절", "떼쓰기", "분리불안"]),
    ("수면/루틴", &["잠", "수면", "밤에", "새벽", "루틴", "등원", "등교", "야뇨"]),
    ("디지털/스크린", &["스마트폰", "유튜브", "게임", "영상", "스크린", "중독"]),
    ("학습/학교적응", &["한글", "수학", "입학", "초등", "유치원", "학교", "숙제", "학습지"]),
    ("또래/사회성", &["친구", "왕따", "관계", "사회성", "놀이"]),
    ("건강/면역", &["감기", "면역", "비염", "알레르기", "아토피", "기침"]),
];

/// Assign `text` to the best-matching category.
///
/// Returns the raw keyword hit count as a float (not a probability); 0.0 with
/// [`DEFAULT_CATEGORY`] when nothing matches. A strictly higher count is
/// required to displace an earlier category, so ties keep table order.
pub fn classify(text: &str) -> (&'static str, f64) {
    let t = text.to_lowercase();
    let mut best_cat = DEFAULT_CATEGORY;
    let mut best_score = 0.0_f64;

    for &(cat, keywords) in TAXONOMY_RULES {
        let hits = keywords
            .iter()
            .filter(|kw| t.contains(kw.to_lowercase().as_str()))
            .count();
        if (hits as f64) > best_score {
            best_cat = cat;
            best_score = hits as f64;
        }
    }

    (best_cat, best_score)
}

/// Every trigger keyword in the table; the ingest layer uses this as a
/// relaxation gate for general-news RSS items.
pub fn gate_keywords() -> impl Iterator<Item = &'static str> {
    TAXONOMY_RULES
        .iter()
        .flat_map(|(_, keywords)| keywords.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_hits_default_bucket() {
        assert_eq!(classify(""), (DEFAULT_CATEGORY, 0.0));
        assert_eq!(classify("오늘 날씨 좋다"), (DEFAULT_CATEGORY, 0.0));
    }

    #[test]
    fn single_keyword_scores_one() {
        let (cat, score) = classify("아이 산만 이유");
        assert_eq!(cat, "집중/주의");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn more_hits_win() {
        // One hit for 집중/주의 ("집중"), two for 디지털/스크린 ("유튜브", "게임").
        let (cat, score) = classify("유튜브 게임 때문에 집중 못함");
        assert_eq!(cat, "디지털/스크린");
        assert_eq!(score, 2.0);
    }

    #[test]
    fn ties_keep_declaration_order() {
        // "산만" (집중/주의) and "짜증" (정서/예민) hit once each.
        let (cat, score) = classify("산만하고 짜증 많음");
        assert_eq!(cat, "집중/주의");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("adhd 의심"), ("집중/주의", 1.0));
        assert_eq!(classify("ADHD 의심"), ("집중/주의", 1.0));
    }

    #[test]
    fn deterministic_across_calls() {
        let t = "초등 입학 준비 유치원";
        assert_eq!(classify(t), classify(t));
    }
}
