//! Extension API - 플러그인에 노출되는 유일한 facade
//!
//! `PluginHost`가 자신의 레지스트리로 한 번 만들어서 `activate`에 빌려준다.
//! 외부에서는 생성할 수 없고, 필드도 바꿀 수 없다.
//!
//! ```ignore
//! fn activate(&self, api: &ExtensionApi, ctx: &mut ExtensionContext) -> Result<()> {
//!     ctx.push(api.commands().register_command("demo.hello", "Hello", "hand", |_| {})?);
//!     ctx.push(api.languages().register_diagnostic_provider(Arc::new(MyProvider)));
//!     Ok(())
//! }
//! ```

use crate::diagnostics::DiagnosticProvider;
use crate::disposable::Disposable;
use crate::registry::{Command, CommandSection, Contributions, ViewContribution};
use kiln_foundation::Result;
use serde_json::Value;
use std::sync::Arc;

/// 플러그인 facade
#[derive(Clone)]
pub struct ExtensionApi {
    contributions: Arc<Contributions>,
}

impl ExtensionApi {
    pub(crate) fn new(contributions: Arc<Contributions>) -> Self {
        Self { contributions }
    }

    pub fn commands(&self) -> CommandsApi<'_> {
        CommandsApi {
            contributions: &self.contributions,
        }
    }

    pub fn languages(&self) -> LanguagesApi<'_> {
        LanguagesApi {
            contributions: &self.contributions,
        }
    }

    pub fn views(&self) -> ViewsApi<'_> {
        ViewsApi {
            contributions: &self.contributions,
        }
    }

    pub fn panels(&self) -> PanelsApi<'_> {
        PanelsApi {
            contributions: &self.contributions,
        }
    }
}

impl std::fmt::Debug for ExtensionApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionApi").finish_non_exhaustive()
    }
}

// ============================================================================
// Namespaces
// ============================================================================

/// `commands` 네임스페이스
pub struct CommandsApi<'a> {
    contributions: &'a Contributions,
}

impl CommandsApi<'_> {
    /// 명령 등록. 섹션은 항상 `CommandSection::Plugin`
    pub fn register_command(
        &self,
        id: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
        action: impl Fn(&[Value]) + Send + Sync + 'static,
    ) -> Result<Disposable> {
        let command = Command::new(id, label, icon, CommandSection::Plugin, action);
        self.contributions
            .commands()
            .register(command.id.clone(), command)
    }
}

/// `languages` 네임스페이스
pub struct LanguagesApi<'a> {
    contributions: &'a Contributions,
}

impl LanguagesApi<'_> {
    /// 진단 프로바이더 등록 (같은 인스턴스는 한 번만)
    pub fn register_diagnostic_provider(
        &self,
        provider: Arc<dyn DiagnosticProvider>,
    ) -> Disposable {
        self.contributions.diagnostic_providers().register(provider)
    }
}

/// `views` 네임스페이스 (사이드바)
pub struct ViewsApi<'a> {
    contributions: &'a Contributions,
}

impl ViewsApi<'_> {
    pub fn register_sidebar_view(&self, view: ViewContribution) -> Result<Disposable> {
        self.contributions
            .sidebar_views()
            .register(view.id.clone(), view)
    }
}

/// `panels` 네임스페이스 (하단 패널)
pub struct PanelsApi<'a> {
    contributions: &'a Contributions,
}

impl PanelsApi<'_> {
    pub fn register_bottom_panel_view(&self, view: ViewContribution) -> Result<Disposable> {
        self.contributions
            .panel_views()
            .register(view.id.clone(), view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use crate::registry::ComponentHandle;
    use kiln_foundation::CollisionPolicy;

    fn api() -> (ExtensionApi, Arc<Contributions>) {
        let contributions = Arc::new(Contributions::new(
            CollisionPolicy::Overwrite,
            Arc::new(EventBus::new()),
        ));
        (ExtensionApi::new(Arc::clone(&contributions)), contributions)
    }

    #[test]
    fn test_register_command_tags_plugin_section() {
        let (api, contributions) = api();
        let disposable = api
            .commands()
            .register_command("demo.hello", "Hello", "hand", |_| {})
            .unwrap();

        let commands = contributions.commands().snapshot();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].section, CommandSection::Plugin);

        disposable.dispose().unwrap();
        assert!(contributions.commands().is_empty());
    }

    #[test]
    fn test_views_and_panels_are_separate_registries() {
        let (api, contributions) = api();
        let view = || ViewContribution::new("x", "X", "i", ComponentHandle::new(()));
        api.views().register_sidebar_view(view()).unwrap();
        api.panels().register_bottom_panel_view(view()).unwrap();

        let stats = contributions.stats();
        assert_eq!(stats.sidebar_views, 1);
        assert_eq!(stats.panel_views, 1);
        assert_eq!(stats.commands, 0);
    }
}
