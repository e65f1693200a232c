//! Built-in Plugins
//!
//! 호스트와 함께 배포되는 플러그인들. 모두 `ExtensionApi`만 사용한다.

mod ai_review;
mod lint;

pub use ai_review::{AiReviewPlugin, AiReviewProvider, AnalysisIssue, CodeAnalyzer};
pub use lint::{ConsoleLogProvider, LintPlugin, TrailingWhitespaceProvider, LINT_RULES};

/// 내장 플러그인이 등록하는 뷰의 component 값
///
/// 호스트는 `ComponentHandle` 안의 값을 보지 않는다. UI 레이어가 이 타입으로
/// downcast 해서 렌더링할 뷰를 고른다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinView {
    ProblemsPanel,
    AiReviewPanel,
}

impl std::fmt::Display for BuiltinView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProblemsPanel => write!(f, "problems"),
            Self::AiReviewPanel => write!(f, "ai-review"),
        }
    }
}
