//! Host Events - 호스트 라이프사이클 이벤트
//!
//! UI 레이어는 이 이벤트를 구독해서 레지스트리 스냅샷을 다시 읽을 시점을 안다.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use tokio::sync::broadcast;
use tracing::trace;

// ============================================================================
// HostEvent - 호스트 이벤트 타입
// ============================================================================

/// 호스트 이벤트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostEvent {
    /// 이벤트 타입
    pub event_type: EventType,

    /// 이벤트 데이터
    pub data: Value,

    /// 타임스탬프
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// 소스 (이벤트 발생 위치)
    pub source: String,
}

impl HostEvent {
    /// 새 이벤트 생성
    pub fn new(event_type: EventType, data: Value, source: impl Into<String>) -> Self {
        Self {
            event_type,
            data,
            timestamp: chrono::Utc::now(),
            source: source.into(),
        }
    }

    /// 플러그인 이벤트 생성
    pub fn plugin(event_type: EventType, plugin_id: &str) -> Self {
        Self::new(
            event_type,
            serde_json::json!({ "plugin_id": plugin_id }),
            "plugin_host",
        )
    }

    /// Contribution 변경 이벤트 생성
    pub fn contribution(event_type: EventType, registry: &str, key: &str) -> Self {
        Self::new(
            event_type,
            serde_json::json!({ "registry": registry, "key": key }),
            "registry",
        )
    }
}

/// 이벤트 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    // 플러그인 이벤트
    PluginRegistered,
    PluginActivated,
    PluginActivationFailed,
    PluginDeactivated,

    // Contribution 이벤트
    ContributionAdded,
    ContributionRemoved,

    // 진단 이벤트
    DiagnosticsPublished,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PluginRegistered => write!(f, "plugin_registered"),
            Self::PluginActivated => write!(f, "plugin_activated"),
            Self::PluginActivationFailed => write!(f, "plugin_activation_failed"),
            Self::PluginDeactivated => write!(f, "plugin_deactivated"),
            Self::ContributionAdded => write!(f, "contribution_added"),
            Self::ContributionRemoved => write!(f, "contribution_removed"),
            Self::DiagnosticsPublished => write!(f, "diagnostics_published"),
        }
    }
}

// ============================================================================
// EventBus - 이벤트 버스 (발행/구독)
// ============================================================================

/// 이벤트 버스 - 브로드캐스트 채널 + 최근 이벤트 히스토리
///
/// `publish`는 동기 함수다. 레지스트리 변경과 같은 호출 안에서 바로 발행된다.
pub struct EventBus {
    sender: broadcast::Sender<HostEvent>,
    history: Mutex<VecDeque<HostEvent>>,
    history_size: usize,
}

impl EventBus {
    /// 새 이벤트 버스 생성
    pub fn new() -> Self {
        Self::with_capacity(256, 100)
    }

    /// 용량 지정하여 생성
    pub fn with_capacity(channel_capacity: usize, history_size: usize) -> Self {
        let (sender, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            sender,
            history: Mutex::new(VecDeque::with_capacity(history_size)),
            history_size,
        }
    }

    /// 이벤트 발행
    pub fn publish(&self, event: HostEvent) {
        trace!("Publishing event: {} from {}", event.event_type, event.source);

        {
            let mut history = self.history.lock();
            if self.history_size > 0 {
                if history.len() >= self.history_size {
                    history.pop_front();
                }
                history.push_back(event.clone());
            }
        }

        // 구독자가 없어도 OK
        let _ = self.sender.send(event);
    }

    /// 이벤트 구독
    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.sender.subscribe()
    }

    /// 이벤트 히스토리 조회
    pub fn history(&self) -> Vec<HostEvent> {
        self.history.lock().iter().cloned().collect()
    }

    /// 특정 타입의 이벤트 히스토리 조회
    pub fn history_by_type(&self, event_type: EventType) -> Vec<HostEvent> {
        self.history
            .lock()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// 히스토리 클리어
    pub fn clear_history(&self) {
        self.history.lock().clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
