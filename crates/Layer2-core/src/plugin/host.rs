//! Plugin Host - 플러그인 라이프사이클 관리
//!
//! 플러그인 등록/활성화/비활성화와 facade 배선을 담당한다. 전역 싱글턴이 아니라
//! 명시적으로 만들어서 필요한 곳에 주입한다.

use super::api::ExtensionApi;
use super::manifest::PluginManifest;
use super::traits::{ExtensionContext, Plugin, PluginStatus};
use crate::diagnostics::{DiagnosticProvider, DiagnosticsPipeline};
use crate::disposable::Disposable;
use crate::events::{EventBus, EventType, HostEvent};
use crate::guard::guarded;
use crate::registry::{Command, CommandSection, ContributionStats, Contributions, ViewContribution};
use indexmap::IndexMap;
use kiln_foundation::{Error, HostConfig, Result};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

struct PluginRecord {
    plugin: Arc<dyn Plugin>,
    manifest: PluginManifest,
    status: PluginStatus,
}

/// 플러그인 정보 (조회용)
#[derive(Debug, Clone)]
pub struct PluginInfo {
    pub manifest: PluginManifest,
    pub status: PluginStatus,
    /// 활성 컨텍스트의 subscription 수
    pub subscriptions: usize,
}

/// 플러그인 시스템 요약
#[derive(Debug, Clone)]
pub struct PluginSummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub failed: usize,
    pub disabled: usize,
    pub contributions: ContributionStats,
}

/// 익스텐션 호스트
pub struct PluginHost {
    /// 등록 순서대로 보관, 제거되지 않음
    plugins: RwLock<IndexMap<String, PluginRecord>>,

    /// 활성 컨텍스트. lifecycle 연산은 이 락으로 직렬화된다
    contexts: Mutex<IndexMap<String, ExtensionContext>>,

    contributions: Arc<Contributions>,
    api: ExtensionApi,
    events: Arc<EventBus>,
    pipeline: DiagnosticsPipeline,
    config: HostConfig,
}

impl PluginHost {
    /// 새 호스트 생성 (facade는 여기서 한 번만 배선된다)
    pub fn new(config: HostConfig) -> Self {
        let events = Arc::new(EventBus::new());
        let contributions = Arc::new(Contributions::new(
            config.contributions.collision_policy,
            Arc::clone(&events),
        ));
        let api = ExtensionApi::new(Arc::clone(&contributions));
        let pipeline = DiagnosticsPipeline::new(
            Arc::clone(contributions.diagnostic_providers()),
            config.diagnostics.clone(),
            Arc::clone(&events),
        );

        Self {
            plugins: RwLock::new(IndexMap::new()),
            contexts: Mutex::new(IndexMap::new()),
            contributions,
            api,
            events,
            pipeline,
            config,
        }
    }

    // ========================================================================
    // 등록 / 활성화
    // ========================================================================

    /// 플러그인 등록 후 바로 활성화
    ///
    /// 같은 id가 이미 있으면 경고만 남기고 `false`. 설정에서 비활성화된 id는
    /// 등록만 한다.
    pub fn register_plugin(&self, plugin: Arc<dyn Plugin>) -> bool {
        let manifest = match guarded("<unregistered>", || Ok(plugin.manifest())) {
            Ok(manifest) => manifest,
            Err(e) => {
                error!("Failed to read plugin manifest: {}", e);
                return false;
            }
        };
        let id = manifest.id.clone();
        let disabled = self.config.plugins.is_disabled(&id);

        {
            let mut plugins = self.plugins.write();
            if plugins.contains_key(&id) {
                warn!(plugin = %id, "Plugin already registered, ignoring duplicate");
                return false;
            }

            info!("Registering plugin: {} (v{})", id, manifest.version);
            let status = if disabled {
                PluginStatus::Disabled
            } else {
                PluginStatus::Inactive
            };
            plugins.insert(
                id.clone(),
                PluginRecord {
                    plugin,
                    manifest,
                    status,
                },
            );
        }
        self.events
            .publish(HostEvent::plugin(EventType::PluginRegistered, &id));

        if disabled {
            info!(plugin = %id, "Plugin disabled by configuration, not activating");
            return true;
        }

        self.activate_plugin(&id);
        true
    }

    /// 플러그인 활성화
    ///
    /// 이미 활성 컨텍스트가 있으면 no-op. 실패하면 에러 로그를 남기고 컨텍스트
    /// 없이 남는다 (다시 시도 가능, 부분 등록은 되돌리지 않음).
    /// 활성 상태가 되었으면 `true`.
    pub fn activate_plugin(&self, id: &str) -> bool {
        let plugin = {
            let plugins = self.plugins.read();
            match plugins.get(id) {
                Some(record) if record.status == PluginStatus::Disabled => {
                    warn!(plugin = %id, "Plugin is disabled by configuration");
                    return false;
                }
                Some(record) => Arc::clone(&record.plugin),
                None => {
                    warn!(plugin = %id, "Cannot activate unknown plugin");
                    return false;
                }
            }
        };

        let mut contexts = self.contexts.lock();
        if contexts.contains_key(id) {
            debug!(plugin = %id, "Plugin already active");
            return true;
        }

        let mut ctx = ExtensionContext::new(id);
        let result = guarded(id, || plugin.activate(&self.api, &mut ctx));

        match result {
            Ok(()) => {
                let subscriptions = ctx.subscriptions.len();
                contexts.insert(id.to_string(), ctx);
                drop(contexts);

                self.set_status(id, PluginStatus::Active);
                info!(plugin = %id, "Plugin activated ({} subscription(s))", subscriptions);
                self.events
                    .publish(HostEvent::plugin(EventType::PluginActivated, id));
                true
            }
            Err(e) => {
                drop(contexts);

                error!(plugin = %id, "Failed to activate plugin: {}", e);
                self.set_status(id, PluginStatus::Failed);
                let mut event = HostEvent::plugin(EventType::PluginActivationFailed, id);
                event.data["error"] = Value::String(e.to_string());
                self.events.publish(event);
                false
            }
        }
    }

    // ========================================================================
    // 비활성화
    // ========================================================================

    /// 플러그인 비활성화
    ///
    /// subscription을 하나씩 해제하고(각각 실패 격리) `deactivate`를 호출한다.
    /// 활성 컨텍스트가 없었으면 `false`.
    pub fn deactivate_plugin(&self, id: &str) -> bool {
        let ctx = self.contexts.lock().shift_remove(id);
        let Some(mut ctx) = ctx else {
            debug!(plugin = %id, "Plugin not active, nothing to deactivate");
            return false;
        };

        for (index, disposable) in ctx.take_subscriptions().into_iter().enumerate() {
            if let Err(e) = guarded(id, || disposable.dispose()) {
                error!(plugin = %id, "Failed to dispose subscription #{}: {}", index, e);
            }
        }

        let plugin = self.plugins.read().get(id).map(|r| Arc::clone(&r.plugin));
        if let Some(plugin) = plugin {
            if let Err(e) = guarded(id, || plugin.deactivate()) {
                error!(plugin = %id, "Plugin deactivate failed: {}", e);
            }
        }

        self.set_status(id, PluginStatus::Inactive);
        info!(plugin = %id, "Plugin deactivated");
        self.events
            .publish(HostEvent::plugin(EventType::PluginDeactivated, id));
        true
    }

    /// 모든 활성 플러그인 비활성화. 비활성화한 수 반환
    pub fn deactivate_all(&self) -> usize {
        let ids: Vec<String> = self.contexts.lock().keys().cloned().collect();
        ids.iter().filter(|id| self.deactivate_plugin(id)).count()
    }

    fn set_status(&self, id: &str, status: PluginStatus) {
        if let Some(record) = self.plugins.write().get_mut(id) {
            record.status = status;
        }
    }

    // ========================================================================
    // 조회
    // ========================================================================

    pub fn is_active(&self, id: &str) -> bool {
        self.contexts.lock().contains_key(id)
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.plugins.read().contains_key(id)
    }

    pub fn status(&self, id: &str) -> Option<PluginStatus> {
        self.plugins.read().get(id).map(|r| r.status)
    }

    /// 등록된 플러그인 목록 (등록 순서)
    pub fn plugins(&self) -> Vec<PluginInfo> {
        let contexts = self.contexts.lock();
        self.plugins
            .read()
            .values()
            .map(|r| PluginInfo {
                manifest: r.manifest.clone(),
                status: r.status,
                subscriptions: contexts
                    .get(&r.manifest.id)
                    .map(|c| c.subscriptions.len())
                    .unwrap_or(0),
            })
            .collect()
    }

    pub fn summary(&self) -> PluginSummary {
        let plugins = self.plugins.read();
        let count = |status: PluginStatus| plugins.values().filter(|r| r.status == status).count();

        PluginSummary {
            total: plugins.len(),
            active: count(PluginStatus::Active),
            inactive: count(PluginStatus::Inactive),
            failed: count(PluginStatus::Failed),
            disabled: count(PluginStatus::Disabled),
            contributions: self.contributions.stats(),
        }
    }

    // ========================================================================
    // Contribution 스냅샷
    // ========================================================================

    pub fn commands(&self) -> Vec<Command> {
        self.contributions.commands().snapshot()
    }

    pub fn sidebar_views(&self) -> Vec<ViewContribution> {
        self.contributions.sidebar_views().snapshot()
    }

    pub fn panel_views(&self) -> Vec<ViewContribution> {
        self.contributions.panel_views().snapshot()
    }

    pub fn diagnostic_providers(&self) -> Vec<Arc<dyn DiagnosticProvider>> {
        self.contributions.diagnostic_providers().snapshot()
    }

    // ========================================================================
    // 명령
    // ========================================================================

    /// 호스트 애플리케이션 자체 명령 등록 (Core / Navigation)
    pub fn register_core_command(
        &self,
        id: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
        section: CommandSection,
        action: impl Fn(&[Value]) + Send + Sync + 'static,
    ) -> Result<Disposable> {
        let command = Command::new(id, label, icon, section, action);
        self.contributions
            .commands()
            .register(command.id.clone(), command)
    }

    /// 명령 실행 (action의 panic은 에러로 변환)
    pub fn execute_command(&self, id: &str, args: &[Value]) -> Result<()> {
        let command = self
            .contributions
            .commands()
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("command '{}'", id)))?;

        debug!("Executing command: {} ({} arg(s))", id, args.len());
        guarded(id, || {
            command.run(args);
            Ok(())
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn api(&self) -> &ExtensionApi {
        &self.api
    }

    pub fn contributions(&self) -> &Arc<Contributions> {
        &self.contributions
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// 호스트가 소유한 단일 진단 파이프라인
    pub fn diagnostics_pipeline(&self) -> &DiagnosticsPipeline {
        &self.pipeline
    }
}

impl Default for PluginHost {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}
