//! Diagnostics Pipeline
//!
//! 활성 문서 변경/내용 변경 알림을 받아 debounce 후 모든 프로바이더를 동시에
//! 호출하고, 합친 결과를 watch 채널로 발행한다.
//!
//! ```text
//!   Idle ──change──▶ DebouncePending ──(window elapsed)──▶ Gathering ──▶ Idle
//!                      ▲        │
//!                      └change──┘  (타이머 재시작, 항상 하나)
//! ```
//!
//! 결과는 계산 당시의 (uri, revision)으로 태그되고, 발행 시점에 현재 상태와
//! 다르면 버려진다. 진행 중인 패스는 취소하지 않는다.

use super::document::{OpenDocument, TextDocument};
use super::provider::{collect_diagnostics, GatherReport};
use super::types::Diagnostic;
use crate::events::{EventBus, EventType, HostEvent};
use crate::registry::ProviderRegistry;
use chrono::{DateTime, Utc};
use kiln_foundation::DiagnosticsConfig;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

// ============================================================================
// Public types
// ============================================================================

/// UI에 전달되는 진단 상태
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsSnapshot {
    /// 이 진단이 속한 문서 (활성 문서 없음이면 `None`)
    pub uri: Option<String>,
    /// 계산에 사용된 문서 revision
    pub revision: u64,
    pub diagnostics: Vec<Diagnostic>,
    /// 분석 완료 시각. 문서 전환으로 비워진 상태면 `None`
    pub computed_at: Option<DateTime<Utc>>,
}

impl DiagnosticsSnapshot {
    fn cleared(uri: Option<String>, revision: u64) -> Self {
        Self {
            uri,
            revision,
            diagnostics: Vec::new(),
            computed_at: None,
        }
    }

    /// 분석 결과가 반영된 스냅샷인지
    pub fn is_computed(&self) -> bool {
        self.computed_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Idle,
    DebouncePending,
    Gathering,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::DebouncePending => write!(f, "debounce-pending"),
            Self::Gathering => write!(f, "gathering"),
        }
    }
}

/// 파이프라인 카운터
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub passes_started: u64,
    pub published: u64,
    pub discarded: u64,
}

// ============================================================================
// Internal state
// ============================================================================

struct DocumentState {
    active: Option<OpenDocument>,
    revision: u64,
    pending: Option<JoinHandle<()>>,
}

struct PipelineInner {
    providers: Arc<ProviderRegistry>,
    config: DiagnosticsConfig,
    events: Arc<EventBus>,
    state: Mutex<DocumentState>,
    in_flight: AtomicUsize,
    passes_started: AtomicU64,
    published: AtomicU64,
    discarded: AtomicU64,
    snapshot_tx: watch::Sender<DiagnosticsSnapshot>,
    last_report: Mutex<Option<Arc<GatherReport>>>,
}

/// in-flight 카운터 해제용
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// DiagnosticsPipeline
// ============================================================================

/// 진단 파이프라인 핸들 (clone 가능, 같은 상태 공유)
///
/// 문서 알림 메서드는 tokio 런타임 안에서 호출해야 한다 (타이머 태스크 생성).
#[derive(Clone)]
pub struct DiagnosticsPipeline {
    inner: Arc<PipelineInner>,
}

impl DiagnosticsPipeline {
    pub fn new(
        providers: Arc<ProviderRegistry>,
        config: DiagnosticsConfig,
        events: Arc<EventBus>,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(DiagnosticsSnapshot::default());
        Self {
            inner: Arc::new(PipelineInner {
                providers,
                config,
                events,
                state: Mutex::new(DocumentState {
                    active: None,
                    revision: 0,
                    pending: None,
                }),
                in_flight: AtomicUsize::new(0),
                passes_started: AtomicU64::new(0),
                published: AtomicU64::new(0),
                discarded: AtomicU64::new(0),
                snapshot_tx,
                last_report: Mutex::new(None),
            }),
        }
    }

    // ========================================================================
    // 문서 알림
    // ========================================================================

    /// 활성 문서 설정
    ///
    /// 다른 문서로 바뀌면 이전 문서의 진단은 즉시 비워진다. `None`이면 대기 중인
    /// 타이머를 취소하고 진단을 비운다. 새 revision을 돌려준다.
    pub fn set_active_document(&self, document: Option<OpenDocument>) -> u64 {
        let inner = &self.inner;
        let mut state = inner.state.lock();

        state.revision += 1;
        let revision = state.revision;
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }

        let old_uri = state.active.as_ref().map(|d| d.uri.clone());
        let new_uri = document.as_ref().map(|d| d.uri.clone());
        if old_uri != new_uri {
            debug!(
                "Active document: {} -> {}",
                old_uri.as_deref().unwrap_or("<none>"),
                new_uri.as_deref().unwrap_or("<none>")
            );
            inner
                .snapshot_tx
                .send_replace(DiagnosticsSnapshot::cleared(new_uri, revision));
        }

        state.active = document;
        if state.active.is_some() && inner.config.enabled {
            state.pending = Some(inner.spawn_timer(revision));
        }

        revision
    }

    /// 활성 문서 내용 변경 알림
    ///
    /// 활성 문서가 아니면 무시하고 `None`. 진단이 꺼져 있으면 내용만 갱신하고
    /// 패스는 예약하지 않는다 (`None`).
    pub fn notify_content_changed(&self, uri: &str, text: impl Into<Arc<str>>) -> Option<u64> {
        let inner = &self.inner;
        let mut state = inner.state.lock();
        let active = match state.active.as_mut() {
            Some(doc) if doc.uri == uri => doc,
            _ => {
                debug!("Ignoring change for inactive document: {}", uri);
                return None;
            }
        };
        active.text = text.into();

        if !inner.config.enabled {
            return None;
        }

        state.revision += 1;
        let revision = state.revision;
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }
        state.pending = Some(inner.spawn_timer(revision));

        Some(revision)
    }

    /// 대기 중인 debounce 타이머 취소 (진행 중인 패스는 그대로)
    pub fn cancel_pending(&self) -> bool {
        match self.inner.state.lock().pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // 조회
    // ========================================================================

    pub fn subscribe(&self) -> watch::Receiver<DiagnosticsSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    pub fn current(&self) -> DiagnosticsSnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    pub fn active_document(&self) -> Option<OpenDocument> {
        self.inner.state.lock().active.clone()
    }

    pub fn revision(&self) -> u64 {
        self.inner.state.lock().revision
    }

    /// 대기 중인 타이머가 우선, 그다음 진행 중인 패스
    pub fn phase(&self) -> PipelinePhase {
        let state = self.inner.state.lock();
        if state.pending.as_ref().is_some_and(|h| !h.is_finished()) {
            PipelinePhase::DebouncePending
        } else if self.inner.in_flight.load(Ordering::SeqCst) > 0 {
            PipelinePhase::Gathering
        } else {
            PipelinePhase::Idle
        }
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            passes_started: self.inner.passes_started.load(Ordering::SeqCst),
            published: self.inner.published.load(Ordering::SeqCst),
            discarded: self.inner.discarded.load(Ordering::SeqCst),
        }
    }

    /// 마지막으로 발행된 패스의 프로바이더별 결과
    pub fn last_report(&self) -> Option<Arc<GatherReport>> {
        self.inner.last_report.lock().clone()
    }

    pub fn config(&self) -> &DiagnosticsConfig {
        &self.inner.config
    }
}

impl PipelineInner {
    fn spawn_timer(self: &Arc<Self>, revision: u64) -> JoinHandle<()> {
        let inner = Arc::clone(self);
        let delay = self.config.debounce();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.run_pass(revision).await;
        })
    }

    /// 타이머가 만료된 패스 시작. 그 사이 revision이 바뀌었으면 아무것도 안 함
    fn begin_pass(&self, revision: u64) -> Option<TextDocument> {
        let mut state = self.state.lock();
        if state.revision != revision {
            return None;
        }
        let document = TextDocument::from(state.active.as_ref()?);

        // 이후 변경이 이 태스크를 abort 하지 않도록 핸들을 떼어낸다
        state.pending = None;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        Some(document)
    }

    async fn run_pass(&self, revision: u64) {
        let Some(document) = self.begin_pass(revision) else {
            return;
        };
        let _in_flight = InFlight(&self.in_flight);

        let providers = self.providers.snapshot();
        self.passes_started.fetch_add(1, Ordering::SeqCst);
        debug!(
            "Diagnostics pass #{} for {} with {} provider(s)",
            revision,
            document.uri(),
            providers.len()
        );

        let report = collect_diagnostics(&providers, &document).await;
        self.publish(document.uri(), revision, report);
    }

    fn publish(&self, uri: &str, revision: u64, report: GatherReport) {
        let count = {
            let state = self.state.lock();
            let current_uri = state.active.as_ref().map(|d| d.uri.as_str());
            if state.revision != revision || current_uri != Some(uri) {
                self.discarded.fetch_add(1, Ordering::SeqCst);
                debug!(
                    "Discarding stale diagnostics for {} (rev {}, current rev {})",
                    uri, revision, state.revision
                );
                return;
            }

            let diagnostics = report.merged();
            let count = diagnostics.len();
            *self.last_report.lock() = Some(Arc::new(report));
            self.snapshot_tx.send_replace(DiagnosticsSnapshot {
                uri: Some(uri.to_string()),
                revision,
                diagnostics,
                computed_at: Some(Utc::now()),
            });
            count
        };

        self.published.fetch_add(1, Ordering::SeqCst);
        info!("Published {} diagnostic(s) for {}", count, uri);
        self.events.publish(HostEvent::new(
            EventType::DiagnosticsPublished,
            serde_json::json!({ "uri": uri, "revision": revision, "count": count }),
            "diagnostics",
        ));
    }
}
