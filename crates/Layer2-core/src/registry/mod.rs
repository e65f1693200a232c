//! # Contribution Registries
//!
//! 플러그인이 facade를 통해 추가하는 항목들의 저장소
//!
//! ## 설계 원칙
//!
//! 1. **동기 변경**: 등록/해제는 한 번의 호출 안에서 끝난다 (await 없음)
//! 2. **토큰 기반 해제**: Disposable은 (레지스트리, 토큰) 쌍으로 정확히 그 항목만 지운다
//! 3. **멱등 해제**: 없는 항목 제거는 no-op
//! 4. **스냅샷 조회**: 조회는 항상 그 시점의 복사본
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Contributions                          │
//! │  ┌──────────────────┬──────────────────┬─────────────────┐  │
//! │  │ commands         │ sidebar_views    │ panel_views     │  │
//! │  │ KeyedRegistry    │ KeyedRegistry    │ KeyedRegistry   │  │
//! │  │ <Command>        │ <ViewContrib.>   │ <ViewContrib.>  │  │
//! │  └──────────────────┴──────────────────┴─────────────────┘  │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │ diagnostic_providers: ProviderRegistry (instance set) │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod contribution;
mod keyed;
mod providers;

pub use contribution::{
    Command, CommandAction, CommandSection, ComponentHandle, ContributionKind, ViewContribution,
};
pub use keyed::KeyedRegistry;
pub use providers::ProviderRegistry;

use crate::events::EventBus;
use kiln_foundation::CollisionPolicy;
use std::sync::Arc;

/// 네 개의 contribution 레지스트리 묶음
pub struct Contributions {
    commands: Arc<KeyedRegistry<Command>>,
    sidebar_views: Arc<KeyedRegistry<ViewContribution>>,
    panel_views: Arc<KeyedRegistry<ViewContribution>>,
    diagnostic_providers: Arc<ProviderRegistry>,
}

impl Contributions {
    pub fn new(policy: CollisionPolicy, events: Arc<EventBus>) -> Self {
        Self {
            commands: Arc::new(KeyedRegistry::new(
                ContributionKind::Command,
                policy,
                Arc::clone(&events),
            )),
            sidebar_views: Arc::new(KeyedRegistry::new(
                ContributionKind::SidebarView,
                policy,
                Arc::clone(&events),
            )),
            panel_views: Arc::new(KeyedRegistry::new(
                ContributionKind::PanelView,
                policy,
                Arc::clone(&events),
            )),
            diagnostic_providers: Arc::new(ProviderRegistry::new(events)),
        }
    }

    pub fn commands(&self) -> &Arc<KeyedRegistry<Command>> {
        &self.commands
    }

    pub fn sidebar_views(&self) -> &Arc<KeyedRegistry<ViewContribution>> {
        &self.sidebar_views
    }

    pub fn panel_views(&self) -> &Arc<KeyedRegistry<ViewContribution>> {
        &self.panel_views
    }

    pub fn diagnostic_providers(&self) -> &Arc<ProviderRegistry> {
        &self.diagnostic_providers
    }

    /// 레지스트리별 항목 수
    pub fn stats(&self) -> ContributionStats {
        ContributionStats {
            commands: self.commands.len(),
            sidebar_views: self.sidebar_views.len(),
            panel_views: self.panel_views.len(),
            diagnostic_providers: self.diagnostic_providers.len(),
        }
    }
}

/// 레지스트리 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContributionStats {
    pub commands: usize,
    pub sidebar_views: usize,
    pub panel_views: usize,
    pub diagnostic_providers: usize,
}
