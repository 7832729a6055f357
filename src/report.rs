//! Human-readable rendering of a classification result.

use std::fmt;

use crate::pipeline::types::{ClassificationResult, EmailInput};
use crate::taxonomy::Taxonomy;

const RULE_WIDTH: usize = 60;

/// Marker per urgency rank, most severe first.
const URGENCY_MARKERS: &[&str] = &["🔴", "🟠", "🟢"];
const DEFAULT_URGENCY_MARKER: &str = "⚪";

fn urgency_marker(taxonomy: &Taxonomy, urgency: &str) -> &'static str {
    taxonomy
        .urgency_rank(urgency)
        .and_then(|rank| URGENCY_MARKERS.get(rank).copied())
        .unwrap_or(DEFAULT_URGENCY_MARKER)
}

/// Prefer the backend's explanation, else the taxonomy's description.
fn explanation<'a>(given: &'a str, fallback: Option<&'a str>) -> &'a str {
    if given.is_empty() {
        fallback.unwrap_or_default()
    } else {
        given
    }
}

/// Terminal report for one classified email.
pub struct Report<'a> {
    pub email: &'a EmailInput,
    pub result: &'a ClassificationResult,
    pub taxonomy: &'a Taxonomy,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            email,
            result,
            taxonomy,
        } = self;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "\n{rule}")?;
        writeln!(f, "  코스맥스 이메일 분류 결과")?;
        writeln!(f, "{rule}")?;

        writeln!(f, "\n[이메일 정보]")?;
        writeln!(f, "  제목: {}", email.subject)?;
        if !email.sender.is_empty() {
            writeln!(f, "  발신자: {}", email.sender)?;
        }

        writeln!(f, "\n[분류 결과]")?;
        writeln!(f, "  카테고리: {}", result.category)?;
        writeln!(
            f,
            "  분류 근거: {}",
            explanation(
                &result.category_description,
                taxonomy.category_description(&result.category)
            )
        )?;
        writeln!(
            f,
            "  긴급도: {} {}",
            urgency_marker(taxonomy, &result.urgency),
            result.urgency
        )?;
        writeln!(
            f,
            "  긴급도 근거: {}",
            explanation(
                &result.urgency_reason,
                taxonomy.urgency_description(&result.urgency)
            )
        )?;

        writeln!(f, "\n[요약]")?;
        writeln!(f, "  {}", result.summary)?;

        if !result.key_points.is_empty() {
            writeln!(f, "\n[핵심 포인트]")?;
            for point in &result.key_points {
                writeln!(f, "  • {point}")?;
            }
        }

        writeln!(f, "\n[추천 담당부서]")?;
        let path: Vec<&str> = [
            result.recommended_department.as_str(),
            result.recommended_lab.as_str(),
            result.recommended_team.as_str(),
        ]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
        if path.is_empty() {
            writeln!(f, "  (판별 불가)")?;
        } else {
            writeln!(f, "  {}", path.join(" > "))?;
        }

        if result.recommended_researchers.is_empty() {
            writeln!(f, "\n[추천 담당자]")?;
            writeln!(f, "  매칭되는 담당자를 찾지 못했습니다.")?;
        } else {
            writeln!(f, "\n[추천 담당자 후보]")?;
            for staff in &result.recommended_researchers {
                let r = &staff.record;
                let verified = if r.email_verified { "✓" } else { "✗" };
                writeln!(
                    f,
                    "  [{verified}] {} ({}) | {} > {} > {} | {} | 점수 {}",
                    r.name, r.code, r.department, r.lab, r.team, r.position, staff.match_score
                )?;
                if r.email_verified {
                    writeln!(f, "       이메일: {}", r.email)?;
                }
            }
        }

        if !result.suggested_actions.is_empty() {
            writeln!(f, "\n[추천 액션]")?;
            for (i, action) in result.suggested_actions.iter().enumerate() {
                writeln!(f, "  {}. {action}", i + 1)?;
            }
        }

        writeln!(f, "\n{rule}")
    }
}

/// Render a report for the terminal.
pub fn render_report(email: &EmailInput, result: &ClassificationResult, taxonomy: &Taxonomy) -> String {
    Report {
        email,
        result,
        taxonomy,
    }
    .to_string()
}
