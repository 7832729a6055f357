//! Classification prompt construction.
//!
//! Pure and deterministic: the same email, taxonomy and directory summary
//! always render to the same text.

use crate::pipeline::types::EmailInput;
use crate::taxonomy::Taxonomy;

/// Placeholder for absent optional email fields.
pub const UNKNOWN_MARKER: &str = "(미상)";

/// Build the prompt asking the backend to classify `email` as JSON.
pub fn build_classification_prompt(
    email: &EmailInput,
    taxonomy: &Taxonomy,
    department_summary: &str,
) -> String {
    let mut prompt = String::with_capacity(2048 + email.body.len());

    prompt.push_str("당신은 코스맥스(Cosmax) 화장품 OEM 회사의 이메일 분류 전문가입니다.\n");
    prompt.push_str(
        "코스맥스는 한국의 화장품 OEM/ODM 기업으로, 스킨케어, 메이크업, 선케어 등을 연구·개발·생산합니다.\n\n",
    );
    prompt.push_str("아래 이메일을 분석하여 JSON 형식으로 분류 결과를 반환하세요.\n\n");

    prompt.push_str("=== 이메일 정보 ===\n");
    prompt.push_str(&format!("발신자: {}\n", or_unknown(&email.sender)));
    prompt.push_str(&format!("날짜: {}\n", or_unknown(&email.date)));
    prompt.push_str(&format!("제목: {}\n\n", email.subject));
    prompt.push_str(&format!("본문:\n{}\n\n", email.body));

    prompt.push_str("=== 분류 카테고리 ===\n");
    prompt.push_str(&taxonomy.render_categories());
    prompt.push_str("\n\n=== 긴급도 레벨 ===\n");
    prompt.push_str(&taxonomy.render_urgency_levels());
    prompt.push_str("\n\n=== 코스맥스 연구소 구조 ===\n");
    prompt.push_str(department_summary);

    prompt.push_str("\n\n=== 응답 형식 (반드시 JSON만 반환) ===\n");
    prompt.push_str(&output_schema(taxonomy));

    prompt.push_str("\n\n중요:\n");
    prompt.push_str("- 반드시 유효한 JSON만 반환하세요. 설명이나 마크다운 없이 JSON만 출력하세요.\n");
    prompt.push_str("- 코스맥스 연구소 구조를 참고하여 가장 적합한 부서를 추천하세요.\n");
    prompt.push_str("- 모든 응답은 한국어로 작성하세요.\n");

    prompt
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        UNKNOWN_MARKER
    } else {
        value
    }
}

/// Example object the backend must reproduce field for field.
fn output_schema(taxonomy: &Taxonomy) -> String {
    format!(
        r#"{{
  "category": "카테고리명 (위 목록에서 선택)",
  "category_description": "해당 카테고리로 분류한 이유 (1문장)",
  "urgency": "{urgency}",
  "urgency_reason": "긴급도 판단 근거 (1문장)",
  "summary": "이메일 핵심 내용 요약 (2-3문장)",
  "key_points": ["핵심 포인트1", "핵심 포인트2"],
  "recommended_department": "추천 담당 연구소",
  "recommended_lab": "추천 담당 랩",
  "recommended_team": "추천 담당 팀 (알 수 없으면 빈 문자열)",
  "suggested_actions": ["추천 액션1", "추천 액션2", "추천 액션3"]
}}"#,
        urgency = taxonomy.urgency_choices()
    )
}
