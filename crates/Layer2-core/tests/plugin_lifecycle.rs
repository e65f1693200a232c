//! 플러그인 라이프사이클 통합 테스트
//!
//! 등록 / 활성화 / 비활성화와 Disposable 해제 규칙 검증

mod common;

use common::{capture_errors, StaticProvider};
use kiln_core::{
    ComponentHandle, Disposable, Error, ExtensionApi, ExtensionContext, HostConfig, Plugin,
    PluginHost, PluginManifest, PluginStatus, Result, ViewContribution,
};
use kiln_foundation::CollisionPolicy;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Fixtures
// ============================================================================

/// 활성화 때 명령 / 사이드바 / 패널 / 프로바이더 / 콜백을 하나씩 등록
#[derive(Default)]
struct FullPlugin {
    id: &'static str,
    activations: AtomicUsize,
    cleanups: Arc<AtomicUsize>,
    handed_out: Mutex<Vec<Disposable>>,
}

impl FullPlugin {
    fn new(id: &'static str) -> Arc<Self> {
        Arc::new(Self {
            id,
            ..Default::default()
        })
    }
}

impl Plugin for FullPlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest::new(self.id, "Full").with_version("1.0.0")
    }

    fn activate(&self, api: &ExtensionApi, ctx: &mut ExtensionContext) -> Result<()> {
        self.activations.fetch_add(1, Ordering::SeqCst);

        let cleanups = Arc::clone(&self.cleanups);
        let disposables = vec![
            api.commands()
                .register_command(format!("{}.run", self.id), "Run", "play", |_| {})?,
            api.views().register_sidebar_view(ViewContribution::new(
                format!("{}.side", self.id),
                "Side",
                "eye",
                ComponentHandle::new(()),
            ))?,
            api.panels().register_bottom_panel_view(ViewContribution::new(
                format!("{}.panel", self.id),
                "Panel",
                "terminal",
                ComponentHandle::new(()),
            ))?,
            api.languages()
                .register_diagnostic_provider(StaticProvider::new("full", &["f1"])),
            Disposable::from_fn(move || {
                cleanups.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        ];

        for d in &disposables {
            ctx.push(d.clone());
        }
        self.handed_out.lock().extend(disposables);
        Ok(())
    }
}

/// 사이드바 뷰 "x" 하나만 등록
struct SidebarX(&'static str, &'static str);

impl Plugin for SidebarX {
    fn manifest(&self) -> PluginManifest {
        PluginManifest::new(self.0, self.0)
    }

    fn activate(&self, api: &ExtensionApi, ctx: &mut ExtensionContext) -> Result<()> {
        ctx.push(api.views().register_sidebar_view(ViewContribution::new(
            "x",
            self.1,
            "box",
            ComponentHandle::new(self.1),
        ))?);
        Ok(())
    }
}

/// 명령 하나 등록 후 실패 (두 번째 시도부터 성공)
#[derive(Default)]
struct FlakyPlugin {
    attempts: AtomicUsize,
    panic_instead: AtomicBool,
}

impl Plugin for FlakyPlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest::new("test.flaky", "Flaky")
    }

    fn activate(&self, api: &ExtensionApi, ctx: &mut ExtensionContext) -> Result<()> {
        ctx.push(api.commands().register_command("flaky.partial", "Partial", "x", |_| {})?);
        if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            if self.panic_instead.load(Ordering::SeqCst) {
                panic!("activation bug");
            }
            return Err(Error::Plugin("missing configuration".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn duplicate_plugin_id_is_ignored() {
    let host = PluginHost::default();
    let first = FullPlugin::new("test.full");
    let second = FullPlugin::new("test.full");

    assert!(host.register_plugin(first.clone()));
    assert!(!host.register_plugin(second.clone()));

    assert_eq!(host.plugins().len(), 1);
    assert_eq!(host.summary().active, 1);
    assert_eq!(first.activations.load(Ordering::SeqCst), 1);
    assert_eq!(second.activations.load(Ordering::SeqCst), 0);

    // 이미 활성 상태면 다시 활성화해도 no-op
    assert!(host.activate_plugin("test.full"));
    assert_eq!(first.activations.load(Ordering::SeqCst), 1);
}

#[test]
fn deactivate_all_disposes_each_subscription_once() {
    let host = PluginHost::default();
    let plugin = FullPlugin::new("test.full");
    host.register_plugin(plugin.clone());

    let stats = host.contributions().stats();
    assert_eq!(
        (stats.commands, stats.sidebar_views, stats.panel_views, stats.diagnostic_providers),
        (1, 1, 1, 1)
    );

    assert_eq!(host.deactivate_all(), 1);

    let handed_out = plugin.handed_out.lock().clone();
    assert_eq!(handed_out.len(), 5);
    assert!(handed_out.iter().all(Disposable::is_disposed));
    assert_eq!(plugin.cleanups.load(Ordering::SeqCst), 1);
    assert_eq!(host.contributions().stats(), Default::default());

    // 다시 해제해도 실패하지 않고 콜백도 다시 실행되지 않는다
    for d in &handed_out {
        d.dispose().unwrap();
    }
    assert_eq!(plugin.cleanups.load(Ordering::SeqCst), 1);
    assert_eq!(host.deactivate_all(), 0);
    assert_eq!(host.status("test.full"), Some(PluginStatus::Inactive));
}

#[test]
fn failing_subscription_does_not_stop_the_rest() {
    struct Fragile(Arc<AtomicUsize>);

    impl Plugin for Fragile {
        fn manifest(&self) -> PluginManifest {
            PluginManifest::new("test.fragile", "Fragile")
        }

        fn activate(&self, _api: &ExtensionApi, ctx: &mut ExtensionContext) -> Result<()> {
            let before = Arc::clone(&self.0);
            let after = Arc::clone(&self.0);
            ctx.push(Disposable::from_fn(move || {
                before.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }));
            ctx.push(Disposable::from_fn(|| Err(Error::Plugin("socket already closed".into()))));
            ctx.push(Disposable::from_fn(|| panic!("double free")));
            ctx.push(Disposable::from_fn(move || {
                after.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }));
            Ok(())
        }

        fn deactivate(&self) -> Result<()> {
            Err(Error::Plugin("deactivate failed".into()))
        }
    }

    let (errors, _guard) = capture_errors();
    let host = PluginHost::default();
    let released = Arc::new(AtomicUsize::new(0));
    host.register_plugin(Arc::new(Fragile(Arc::clone(&released))));

    assert!(host.deactivate_plugin("test.fragile"));
    assert_eq!(released.load(Ordering::SeqCst), 2);
    // 실패한 dispose 두 번 + deactivate 한 번
    assert_eq!(errors.count(), 3);
    assert!(errors.owners().iter().all(|o| o == "test.fragile"));
    assert!(!host.is_active("test.fragile"));
}

// ============================================================================
// Collisions
// ============================================================================

#[test]
fn sidebar_id_collision_keeps_the_last_registration() {
    let host = PluginHost::default();
    host.register_plugin(Arc::new(SidebarX("test.first", "First")));
    host.register_plugin(Arc::new(SidebarX("test.second", "Second")));

    let views = host.sidebar_views();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].id, "x");
    assert_eq!(views[0].title, "Second");
    assert_eq!(views[0].component.downcast_ref::<&str>(), Some(&"Second"));

    // 덮어쓰인 쪽을 비활성화해도 대체한 뷰는 남는다
    host.deactivate_plugin("test.first");
    assert_eq!(host.sidebar_views()[0].title, "Second");

    host.deactivate_plugin("test.second");
    assert!(host.sidebar_views().is_empty());
}

#[test]
fn reject_policy_fails_the_second_activation() {
    let (errors, _guard) = capture_errors();
    let host =
        PluginHost::new(HostConfig::default().with_collision_policy(CollisionPolicy::Reject));
    host.register_plugin(Arc::new(SidebarX("test.first", "First")));
    host.register_plugin(Arc::new(SidebarX("test.second", "Second")));

    assert_eq!(host.sidebar_views()[0].title, "First");
    assert_eq!(host.status("test.second"), Some(PluginStatus::Failed));
    assert_eq!(errors.count(), 1);
}

// ============================================================================
// Activation failures
// ============================================================================

#[test]
fn failed_activation_leaves_partial_registrations() {
    let (errors, _guard) = capture_errors();
    let host = PluginHost::default();
    let plugin = Arc::new(FlakyPlugin::default());

    assert!(host.register_plugin(plugin.clone()));
    assert!(!host.is_active("test.flaky"));
    assert_eq!(host.status("test.flaky"), Some(PluginStatus::Failed));
    assert_eq!(errors.count(), 1);

    // 롤백 없음
    assert_eq!(host.commands().len(), 1);

    // 컨텍스트가 없으므로 다시 활성화할 수 있다
    assert!(host.activate_plugin("test.flaky"));
    assert_eq!(host.status("test.flaky"), Some(PluginStatus::Active));
    assert_eq!(host.commands().len(), 1);
}

#[test]
fn panicking_activation_is_contained() {
    let (errors, _guard) = capture_errors();
    let host = PluginHost::default();
    let plugin = Arc::new(FlakyPlugin::default());
    plugin.panic_instead.store(true, Ordering::SeqCst);

    host.register_plugin(plugin.clone());
    host.register_plugin(FullPlugin::new("test.after"));

    assert!(!host.is_active("test.flaky"));
    assert!(host.is_active("test.after"));
    assert_eq!(errors.owners(), vec!["test.flaky".to_string()]);

    let summary = host.summary();
    assert_eq!((summary.total, summary.active, summary.failed), (2, 1, 1));
}

#[test]
fn hosts_are_independent() {
    let a = PluginHost::default();
    let b = PluginHost::default();
    a.register_plugin(FullPlugin::new("test.full"));

    assert!(a.is_active("test.full"));
    assert!(!b.is_registered("test.full"));
    assert!(b.commands().is_empty());
}
