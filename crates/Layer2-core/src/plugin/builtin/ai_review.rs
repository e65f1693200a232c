//! AI Review Plugin
//!
//! 외부 분석 백엔드(`CodeAnalyzer`)가 돌려준 줄 단위 이슈를 문자 오프셋 진단으로
//! 바꿔서 파이프라인에 넣는다. 백엔드 자체는 호스트 애플리케이션이 주입한다.

use super::BuiltinView;
use crate::diagnostics::{Diagnostic, DiagnosticProvider, DiagnosticSeverity, TextDocument};
use crate::plugin::{ExtensionApi, ExtensionContext, Plugin, PluginManifest};
use crate::registry::{ComponentHandle, ViewContribution};
use async_trait::async_trait;
use kiln_foundation::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const AI_SOURCE: &str = "AI Review";

// ============================================================================
// Analyzer backend
// ============================================================================

/// 분석 백엔드가 돌려주는 이슈
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisIssue {
    /// 1부터 시작하는 줄 번호
    pub line: usize,
    pub message: String,
    pub severity: DiagnosticSeverity,
    /// quick fix 제목
    #[serde(default)]
    pub suggestion: Option<String>,
    /// 줄 내용(들여쓰기 제외)을 대체할 코드
    #[serde(default)]
    pub replacement: Option<String>,
}

/// 불투명한 비동기 분석 함수 `analyze(text) -> issues`
#[async_trait]
pub trait CodeAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Vec<AnalysisIssue>>;
}

// ============================================================================
// Provider
// ============================================================================

/// `CodeAnalyzer`를 감싼 진단 프로바이더
pub struct AiReviewProvider {
    analyzer: Arc<dyn CodeAnalyzer>,
}

impl AiReviewProvider {
    pub fn new(analyzer: Arc<dyn CodeAnalyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl DiagnosticProvider for AiReviewProvider {
    fn name(&self) -> &str {
        "ai-review"
    }

    async fn provide_diagnostics(
        &self,
        document: &TextDocument,
    ) -> Result<Option<Vec<Diagnostic>>> {
        let text = document.get_text();
        if text.trim().is_empty() {
            return Ok(None);
        }

        // 백엔드 에러는 그대로 전파 (파이프라인이 로그 처리)
        let issues = self.analyzer.analyze(text).await?;
        let lines = document.lines();

        let diagnostics = issues
            .into_iter()
            .filter_map(|issue| {
                let Some(line) = issue.line.checked_sub(1).and_then(|i| lines.get(i)) else {
                    debug!("Dropping AI issue for out-of-range line {}", issue.line);
                    return None;
                };

                let indent = line.text.len() - line.text.trim_start().len();
                let diagnostic = Diagnostic::new(
                    format!("ai-{}", Uuid::new_v4()),
                    line.offset_of(indent),
                    line.end(),
                    issue.message,
                    issue.severity,
                    AI_SOURCE,
                );

                Some(match issue.suggestion {
                    Some(title) => diagnostic.with_quick_fix(title, issue.replacement),
                    None => diagnostic,
                })
            })
            .collect();

        Ok(Some(diagnostics))
    }
}

// ============================================================================
// Plugin
// ============================================================================

/// `kiln.ai-review` 플러그인
pub struct AiReviewPlugin {
    provider: Arc<AiReviewProvider>,
}

impl AiReviewPlugin {
    pub const ID: &'static str = "kiln.ai-review";

    pub fn new(analyzer: Arc<dyn CodeAnalyzer>) -> Self {
        Self {
            provider: Arc::new(AiReviewProvider::new(analyzer)),
        }
    }
}

impl Plugin for AiReviewPlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest::new(Self::ID, "AI Review")
            .with_description("Code review diagnostics from an AI analyzer")
            .with_author("Kiln")
            .with_version(env!("CARGO_PKG_VERSION"))
    }

    fn activate(&self, api: &ExtensionApi, ctx: &mut ExtensionContext) -> Result<()> {
        ctx.push(
            api.languages()
                .register_diagnostic_provider(self.provider.clone()),
        );
        ctx.push(api.views().register_sidebar_view(ViewContribution::new(
            "ai-review.panel",
            "AI Review",
            "sparkles",
            ComponentHandle::new(BuiltinView::AiReviewPanel),
        ))?);
        Ok(())
    }
}
