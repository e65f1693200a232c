//! Plugin traits - 핵심 플러그인 인터페이스

use super::api::ExtensionApi;
use super::manifest::PluginManifest;
use crate::disposable::Disposable;
use kiln_foundation::Result;

// ============================================================================
// ExtensionContext - 활성화 단위 컨텍스트
// ============================================================================

/// 플러그인 활성화 컨텍스트
///
/// 활성화마다 새로 만들어진다. 플러그인은 facade에서 받은 Disposable을
/// `subscriptions`에 넣고, 호스트는 비활성화 때 이를 모두 해제한다.
#[derive(Debug)]
pub struct ExtensionContext {
    plugin_id: String,

    /// 비활성화 때 해제할 핸들
    pub subscriptions: Vec<Disposable>,
}

impl ExtensionContext {
    pub fn new(plugin_id: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            subscriptions: Vec::new(),
        }
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// 정리 핸들 추가
    pub fn push(&mut self, disposable: Disposable) {
        self.subscriptions.push(disposable);
    }

    pub(crate) fn take_subscriptions(&mut self) -> Vec<Disposable> {
        std::mem::take(&mut self.subscriptions)
    }
}

// ============================================================================
// Plugin Trait - 모든 플러그인이 구현해야 하는 인터페이스
// ============================================================================

/// 플러그인 트레이트
///
/// 플러그인은 `activate`에서 받은 `ExtensionApi`로만 호스트와 상호작용한다.
/// `activate`가 에러를 반환하거나 panic 하면 플러그인은 비활성 상태로 남고,
/// 그 전에 등록한 항목은 되돌리지 않는다.
pub trait Plugin: Send + Sync {
    /// 플러그인 매니페스트 반환
    fn manifest(&self) -> PluginManifest;

    /// 플러그인 활성화
    ///
    /// 여기서 명령, 뷰, 진단 프로바이더를 등록합니다.
    fn activate(&self, api: &ExtensionApi, ctx: &mut ExtensionContext) -> Result<()>;

    /// 비활성화 시 호출 (subscriptions 해제 후)
    fn deactivate(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// PluginStatus
// ============================================================================

/// 플러그인 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginStatus {
    /// 등록만 됨 (또는 비활성화됨)
    Inactive,
    /// 활성 컨텍스트 보유
    Active,
    /// 마지막 활성화 시도 실패 (재시도 가능)
    Failed,
    /// 설정에서 비활성화
    Disabled,
}

impl std::fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Active => write!(f, "active"),
            Self::Failed => write!(f, "failed"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}
