//! Fixed classification taxonomy: categories and urgency levels.
//!
//! Built once at startup and handed to the prompt builder, orchestrator and
//! report renderer as a read-only value.

use serde::{Deserialize, Serialize};

/// A label with its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub label: String,
    pub description: String,
}

impl TaxonomyEntry {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Ordered categories and urgency levels.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    pub categories: Vec<TaxonomyEntry>,
    pub urgency_levels: Vec<TaxonomyEntry>,
    /// Catch-all category used when the backend omits one.
    pub fallback_category: String,
    /// Mid-severity level used when the backend omits one.
    pub default_urgency: String,
}

impl Taxonomy {
    /// Taxonomy for inbound mail at a cosmetics OEM/ODM research centre.
    pub fn cosmetics_oem() -> Self {
        let categories = vec![
            TaxonomyEntry::new("원료_문의", "원료 관련 문의, 원료 스펙, 원료 추천, 원료 변경"),
            TaxonomyEntry::new("처방_요청", "신제품 처방 개발, 처방 변경, 처방 최적화 요청"),
            TaxonomyEntry::new("품질_이슈", "제품 품질 문제, 클레임, 불량, 안정성 이슈"),
            TaxonomyEntry::new("일정_조율", "개발 일정, 납기, 미팅 일정, 샘플 일정"),
            TaxonomyEntry::new("규제_인허가", "인허가, 규제, 성분 규제, 수출 규정, INCI"),
            TaxonomyEntry::new("샘플_요청", "샘플 제작, 샘플 발송, 시제품 요청"),
            TaxonomyEntry::new("기술_검토", "기술 검토, 특허, 기술 자문, 공정 문의"),
            TaxonomyEntry::new("견적_계약", "견적서, 단가, 계약, MOQ, 거래 조건"),
            TaxonomyEntry::new("기타", "위 카테고리에 해당하지 않는 일반 문의"),
        ];
        let urgency_levels = vec![
            TaxonomyEntry::new("긴급", "즉시 대응 필요 (품질 사고, 라인 중단, 클레임 등)"),
            TaxonomyEntry::new("높음", "당일 또는 익일 대응 필요 (납기 임박, 고객 긴급 요청)"),
            TaxonomyEntry::new("보통", "일반적인 업무 처리 (3-5일 내 대응)"),
            TaxonomyEntry::new("낮음", "참고/정보 공유 성격 (일주일 이내 대응)"),
        ];
        Self {
            categories,
            urgency_levels,
            fallback_category: "기타".to_string(),
            default_urgency: "보통".to_string(),
        }
    }

    pub fn category_description(&self, label: &str) -> Option<&str> {
        find(&self.categories, label).map(|e| e.description.as_str())
    }

    pub fn urgency_description(&self, label: &str) -> Option<&str> {
        find(&self.urgency_levels, label).map(|e| e.description.as_str())
    }

    pub fn is_known_category(&self, label: &str) -> bool {
        find(&self.categories, label).is_some()
    }

    pub fn is_known_urgency(&self, label: &str) -> bool {
        find(&self.urgency_levels, label).is_some()
    }

    /// Position of an urgency level, most severe first.
    pub fn urgency_rank(&self, label: &str) -> Option<usize> {
        self.urgency_levels.iter().position(|e| e.label == label)
    }

    /// Category lines for the prompt, in declaration order.
    pub fn render_categories(&self) -> String {
        render(&self.categories)
    }

    /// Urgency lines for the prompt, in declaration order.
    pub fn render_urgency_levels(&self) -> String {
        render(&self.urgency_levels)
    }

    /// Urgency labels joined with `/`, as shown in the output schema.
    pub fn urgency_choices(&self) -> String {
        self.urgency_levels
            .iter()
            .map(|e| e.label.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::cosmetics_oem()
    }
}

fn find<'a>(entries: &'a [TaxonomyEntry], label: &str) -> Option<&'a TaxonomyEntry> {
    entries.iter().find(|e| e.label == label)
}

fn render(entries: &[TaxonomyEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("  - {}: {}", e.label, e.description))
        .collect::<Vec<_>>()
        .join("\n")
}
