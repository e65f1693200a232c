//! Diagnostic Types

use serde::{Deserialize, Serialize};

// ============================================================================
// Severity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

// ============================================================================
// Diagnostic
// ============================================================================

/// 진단 항목
///
/// `start`/`end`는 분석 시점 문서 텍스트의 문자(char) 오프셋이다. 문서가 바뀌면
/// 파이프라인이 통째로 버리고 다시 계산하므로 오프셋을 보정하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub id: String,
    pub start: usize,
    pub end: usize,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_fix_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_code: Option<String>,
}

impl Diagnostic {
    pub fn new(
        id: impl Into<String>,
        start: usize,
        end: usize,
        message: impl Into<String>,
        severity: DiagnosticSeverity,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start,
            end: end.max(start),
            message: message.into(),
            severity,
            source: source.into(),
            quick_fix_title: None,
            replacement_code: None,
        }
    }

    /// quick fix 추가
    pub fn with_quick_fix(mut self, title: impl Into<String>, replacement: Option<String>) -> Self {
        self.quick_fix_title = Some(title.into());
        self.replacement_code = replacement;
        self
    }

    pub fn has_quick_fix(&self) -> bool {
        self.quick_fix_title.is_some()
    }
}
