//! 통합 테스트 공용 도구
//!
//! - `capture_errors`: ERROR 레벨 로그 수집 (thread-local subscriber)
//! - 테스트용 진단 프로바이더

#![allow(dead_code)]

use async_trait::async_trait;
use kiln_core::{Diagnostic, DiagnosticProvider, DiagnosticSeverity, Error, Result, TextDocument};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

// ============================================================================
// Log capture
// ============================================================================

/// ERROR 이벤트의 `provider`/`plugin` 필드 값 (없으면 빈 문자열)
#[derive(Clone, Default)]
pub struct ErrorLog(Arc<Mutex<Vec<String>>>);

impl ErrorLog {
    pub fn count(&self) -> usize {
        self.0.lock().len()
    }

    pub fn owners(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

#[derive(Default)]
struct OwnerVisitor(Option<String>);

impl Visit for OwnerVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if matches!(field.name(), "provider" | "plugin") {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if matches!(field.name(), "provider" | "plugin") {
            self.0 = Some(format!("{:?}", value));
        }
    }
}

impl<S: Subscriber> Layer<S> for ErrorLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            let mut visitor = OwnerVisitor::default();
            event.record(&mut visitor);
            self.0.lock().push(visitor.0.unwrap_or_default());
        }
    }
}

/// 현재 스레드의 ERROR 로그를 수집. guard가 살아 있는 동안 유효
pub fn capture_errors() -> (ErrorLog, tracing::subscriber::DefaultGuard) {
    let log = ErrorLog::default();
    let subscriber = tracing_subscriber::registry().with(log.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (log, guard)
}

// ============================================================================
// Providers
// ============================================================================

pub fn diagnostic(id: &str, source: &str) -> Diagnostic {
    Diagnostic::new(id, 0, 1, id, DiagnosticSeverity::Warning, source)
}

/// 고정된 진단을 돌려준다
pub struct StaticProvider {
    pub name: &'static str,
    pub ids: Vec<&'static str>,
}

impl StaticProvider {
    pub fn new(name: &'static str, ids: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            name,
            ids: ids.to_vec(),
        })
    }
}

#[async_trait]
impl DiagnosticProvider for StaticProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn provide_diagnostics(
        &self,
        _document: &TextDocument,
    ) -> Result<Option<Vec<Diagnostic>>> {
        Ok(Some(
            self.ids.iter().map(|id| diagnostic(id, self.name)).collect(),
        ))
    }
}

/// await 없이 바로 실패
pub struct FailingProvider;

#[async_trait]
impl DiagnosticProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn provide_diagnostics(
        &self,
        _document: &TextDocument,
    ) -> Result<Option<Vec<Diagnostic>>> {
        Err(Error::Provider("rule engine crashed".into()))
    }
}

/// 호출되면 panic
pub struct PanickingProvider;

#[async_trait]
impl DiagnosticProvider for PanickingProvider {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn provide_diagnostics(
        &self,
        _document: &TextDocument,
    ) -> Result<Option<Vec<Diagnostic>>> {
        panic!("index out of bounds in provider")
    }
}

/// future를 만들기 전에 panic (`#[async_trait]` 없이 직접 구현)
pub struct EagerPanickingProvider;

impl DiagnosticProvider for EagerPanickingProvider {
    fn name(&self) -> &str {
        "eager-panicking"
    }

    fn provide_diagnostics<'life0, 'life1, 'async_trait>(
        &'life0 self,
        _document: &'life1 TextDocument,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Vec<Diagnostic>>>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        panic!("provider failed before building its future")
    }
}

/// 항상 해당 없음
pub struct NotApplicableProvider;

#[async_trait]
impl DiagnosticProvider for NotApplicableProvider {
    fn name(&self) -> &str {
        "not-applicable"
    }

    async fn provide_diagnostics(
        &self,
        _document: &TextDocument,
    ) -> Result<Option<Vec<Diagnostic>>> {
        Ok(None)
    }
}

/// 본 문서 내용을 기록하고, `slow_uri` 문서에서는 `delay`만큼 지연
pub struct RecordingProvider {
    pub seen: Mutex<Vec<(String, String)>>,
    pub slow_uri: Option<&'static str>,
    pub delay: Duration,
}

impl RecordingProvider {
    pub fn new() -> Arc<Self> {
        Self::slow_for("", Duration::ZERO)
    }

    pub fn slow_for(uri: &'static str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            slow_uri: (!uri.is_empty()).then_some(uri),
            delay,
        })
    }

    pub fn texts(&self) -> Vec<String> {
        self.seen.lock().iter().map(|(_, text)| text.clone()).collect()
    }
}

#[async_trait]
impl DiagnosticProvider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn provide_diagnostics(
        &self,
        document: &TextDocument,
    ) -> Result<Option<Vec<Diagnostic>>> {
        self.seen
            .lock()
            .push((document.uri().to_string(), document.get_text().to_string()));

        if self.slow_uri == Some(document.uri()) {
            tokio::time::sleep(self.delay).await;
        }

        Ok(Some(vec![Diagnostic::new(
            format!("{}#{}", document.uri(), document.get_text()),
            0,
            document.get_text().chars().count(),
            document.get_text(),
            DiagnosticSeverity::Info,
            "recording",
        )]))
    }
}
