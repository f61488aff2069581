// src/report.rs
//! Console rendering of a finished run: the TOP-30 candidate list plus the
//! top issues with their evidence links.

use std::fmt::Write as _;

use crate::analysis::scorer::IssueItem;
use crate::profile::BrandProfile;

const TOP_LIST: usize = 30;
const TOP_DETAIL: usize = 5;
const MAX_EVIDENCE: usize = 5;

/// Render the full report. Pure so tests can assert on the exact output.
pub fn render_report(profile: &BrandProfile, issues: &[IssueItem]) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n[{} - {}] {} / {}",
        profile.brand, profile.product, profile.target, profile.age_range
    );
    let _ = writeln!(out, "최근 관심사/걱정/문제 후보 TOP {TOP_LIST}\n");

    if issues.is_empty() {
        out.push_str("[WARN] 추출된 이슈가 0개입니다.\n");
        out.push_str("- 네이버 API 키가 없거나, 네트워크/요청 제한일 수 있어요.\n");
        out.push_str("- RSS 피드가 일시적으로 비었을 수 있어요.\n");
        return out;
    }

    for (i, it) in issues.iter().take(TOP_LIST).enumerate() {
        let _ = writeln!(
            out,
            "{:02}. ({}) {}  | score={:.2}",
            i + 1,
            it.category,
            it.phrase,
            it.score
        );
    }

    let _ = writeln!(out, "\n상위 {TOP_DETAIL}개 이슈 + 관련 링크(중복 제거)\n");

    for (i, it) in issues.iter().take(TOP_DETAIL).enumerate() {
        let _ = writeln!(
            out,
            "[{}] ({}) {}  | score={:.2}",
            i + 1,
            it.category,
            it.phrase,
            it.score
        );

        let links: Vec<&String> = it
            .evidence
            .iter()
            .filter(|ev| ev.starts_with("http"))
            .collect();

        if !links.is_empty() {
            for (j, url) in links.iter().take(MAX_EVIDENCE).enumerate() {
                let _ = writeln!(out, "   - {}. {}", j + 1, url);
            }
        } else {
            // No landing pages (e.g. trend keywords); show the textual
            // evidence instead.
            for (j, ev) in it.evidence.iter().take(MAX_EVIDENCE).enumerate() {
                let _ = writeln!(out, "   - {}. {}", j + 1, ev);
            }
        }
        out.push('\n');
    }

    out
}

pub fn print_report(profile: &BrandProfile, issues: &[IssueItem]) {
    print!("{}", render_report(profile, issues));
}
