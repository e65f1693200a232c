//! Diagnostic provider trait and concurrent fan-out
//!
//! 프로바이더 하나가 실패하거나 panic 해도 나머지 결과는 그대로 합쳐진다.

use super::document::TextDocument;
use super::types::Diagnostic;
use crate::guard::panic_message;
use async_trait::async_trait;
use futures::future::join_all;
use futures::FutureExt;
use kiln_foundation::{Error, Result};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

// ============================================================================
// DiagnosticProvider Trait
// ============================================================================

/// 진단 프로바이더
///
/// - `Ok(Some(list))`: 진단 결과 (빈 목록 가능)
/// - `Ok(None)`: 이 문서에는 해당 없음. 실패가 아니므로 에러 로그도 없다
/// - `Err(_)`: 실패. 파이프라인이 에러 로그 한 번을 남기고 빈 결과로 처리
#[async_trait]
pub trait DiagnosticProvider: Send + Sync {
    /// 로그/리포트에 쓰이는 이름
    fn name(&self) -> &str {
        "provider"
    }

    async fn provide_diagnostics(&self, document: &TextDocument)
        -> Result<Option<Vec<Diagnostic>>>;
}

// ============================================================================
// Outcome / Report
// ============================================================================

/// 프로바이더 호출 하나의 결과
#[derive(Debug)]
pub enum ProviderOutcome {
    Diagnostics {
        provider: String,
        diagnostics: Vec<Diagnostic>,
    },
    NotApplicable {
        provider: String,
    },
    Failed {
        provider: String,
        error: Error,
    },
}

impl ProviderOutcome {
    pub fn provider(&self) -> &str {
        match self {
            Self::Diagnostics { provider, .. }
            | Self::NotApplicable { provider }
            | Self::Failed { provider, .. } => provider,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// 분석 패스 하나의 프로바이더별 결과 (프로바이더 순서 유지)
#[derive(Debug, Default)]
pub struct GatherReport {
    pub outcomes: Vec<ProviderOutcome>,
}

impl GatherReport {
    /// 프로바이더 순서대로 이어붙인 진단 목록 (중복 제거 없음)
    pub fn merged(&self) -> Vec<Diagnostic> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ProviderOutcome::Diagnostics { diagnostics, .. } => Some(diagnostics.iter()),
                _ => None,
            })
            .flatten()
            .cloned()
            .collect()
    }

    pub fn into_merged(self) -> Vec<Diagnostic> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                ProviderOutcome::Diagnostics { diagnostics, .. } => Some(diagnostics),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn not_applicable_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ProviderOutcome::NotApplicable { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

// ============================================================================
// Fan-out
// ============================================================================

/// 모든 프로바이더를 동시에 호출하고 전부 끝날 때까지 기다린다.
pub async fn collect_diagnostics(
    providers: &[Arc<dyn DiagnosticProvider>],
    document: &TextDocument,
) -> GatherReport {
    let calls = providers
        .iter()
        .map(|provider| invoke_provider(provider.as_ref(), document));
    let outcomes = join_all(calls).await;

    debug!(
        "Gathered diagnostics for {} from {} provider(s)",
        document.uri(),
        outcomes.len()
    );

    GatherReport { outcomes }
}

async fn invoke_provider(
    provider: &dyn DiagnosticProvider,
    document: &TextDocument,
) -> ProviderOutcome {
    let name = provider.name().to_string();

    // 호출 자체(future 생성)에서의 동기 panic
    let result = match catch_unwind(AssertUnwindSafe(|| provider.provide_diagnostics(document))) {
        Ok(future) => match AssertUnwindSafe(future).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(Error::plugin_panic(&name, panic_message(payload.as_ref()))),
        },
        Err(payload) => Err(Error::plugin_panic(&name, panic_message(payload.as_ref()))),
    };

    match result {
        Ok(Some(diagnostics)) => ProviderOutcome::Diagnostics {
            provider: name,
            diagnostics,
        },
        Ok(None) => ProviderOutcome::NotApplicable { provider: name },
        Err(e) => {
            error!(provider = %name, uri = document.uri(), "Diagnostic provider failed: {}", e);
            ProviderOutcome::Failed {
                provider: name,
                error: e,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticSeverity;

    struct Fixed(&'static str, usize);

    #[async_trait]
    impl DiagnosticProvider for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        async fn provide_diagnostics(
            &self,
            _document: &TextDocument,
        ) -> Result<Option<Vec<Diagnostic>>> {
            Ok(Some(
                (0..self.1)
                    .map(|i| {
                        Diagnostic::new(
                            format!("{}-{}", self.0, i),
                            i,
                            i + 1,
                            "m",
                            DiagnosticSeverity::Info,
                            self.0,
                        )
                    })
                    .collect(),
            ))
        }
    }

    struct Failing;

    #[async_trait]
    impl DiagnosticProvider for Failing {
        async fn provide_diagnostics(
            &self,
            _document: &TextDocument,
        ) -> Result<Option<Vec<Diagnostic>>> {
            Err(Error::Provider("backend unavailable".into()))
        }
    }

    struct Panicking;

    #[async_trait]
    impl DiagnosticProvider for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn provide_diagnostics(
            &self,
            _document: &TextDocument,
        ) -> Result<Option<Vec<Diagnostic>>> {
            panic!("provider bug")
        }
    }

    struct Skip;

    #[async_trait]
    impl DiagnosticProvider for Skip {
        async fn provide_diagnostics(
            &self,
            _document: &TextDocument,
        ) -> Result<Option<Vec<Diagnostic>>> {
            Ok(None)
        }
    }

    fn doc() -> TextDocument {
        TextDocument::new("mem://a", "plaintext", "hello")
    }

    #[tokio::test]
    async fn test_merge_keeps_provider_order() {
        let providers: Vec<Arc<dyn DiagnosticProvider>> =
            vec![Arc::new(Fixed("a", 2)), Arc::new(Fixed("b", 1))];
        let report = collect_diagnostics(&providers, &doc()).await;

        let ids: Vec<_> = report.merged().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["a-0", "a-1", "b-0"]);
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let providers: Vec<Arc<dyn DiagnosticProvider>> = vec![
            Arc::new(Fixed("a", 1)),
            Arc::new(Failing),
            Arc::new(Panicking),
            Arc::new(Skip),
            Arc::new(Fixed("c", 1)),
        ];
        let report = collect_diagnostics(&providers, &doc()).await;

        assert_eq!(report.len(), 5);
        assert_eq!(report.failed_count(), 2);
        assert_eq!(report.not_applicable_count(), 1);
        assert_eq!(report.into_merged().len(), 2);
    }

    #[tokio::test]
    async fn test_panic_reported_with_provider_name() {
        let providers: Vec<Arc<dyn DiagnosticProvider>> = vec![Arc::new(Panicking)];
        let report = collect_diagnostics(&providers, &doc()).await;

        match &report.outcomes[0] {
            ProviderOutcome::Failed { provider, error } => {
                assert_eq!(provider, "panicking");
                assert!(error.to_string().contains("provider bug"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_providers() {
        let report = collect_diagnostics(&[], &doc()).await;
        assert!(report.is_empty());
        assert!(report.merged().is_empty());
    }
}
