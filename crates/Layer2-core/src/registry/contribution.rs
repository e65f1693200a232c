//! Contribution 타입 - 플러그인이 호스트에 추가하는 항목들

use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

// ============================================================================
// ContributionKind
// ============================================================================

/// 레지스트리 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContributionKind {
    Command,
    SidebarView,
    PanelView,
    DiagnosticProvider,
}

impl ContributionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "commands",
            Self::SidebarView => "sidebar views",
            Self::PanelView => "panel views",
            Self::DiagnosticProvider => "diagnostic providers",
        }
    }
}

impl std::fmt::Display for ContributionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Command
// ============================================================================

/// 명령 실행 함수
pub type CommandAction = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// 명령 팔레트 섹션
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandSection {
    Core,
    Navigation,
    /// 플러그인 facade로 등록된 명령은 항상 이 섹션
    Plugin,
}

impl std::fmt::Display for CommandSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Core => write!(f, "Core"),
            Self::Navigation => write!(f, "Navigation"),
            Self::Plugin => write!(f, "Plugin Commands"),
        }
    }
}

/// 명령
#[derive(Clone)]
pub struct Command {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub action: CommandAction,
    pub section: CommandSection,
}

impl Command {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
        section: CommandSection,
        action: impl Fn(&[Value]) + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: icon.into(),
            action: Arc::new(action),
            section,
        }
    }

    /// 명령 실행
    pub fn run(&self, args: &[Value]) {
        (self.action)(args)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("section", &self.section)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// View contributions
// ============================================================================

/// UI 레이어의 렌더링 핸들
///
/// 호스트는 내용을 들여다보지 않고 UI에 그대로 돌려준다.
#[derive(Clone)]
pub struct ComponentHandle(Arc<dyn Any + Send + Sync>);

impl ComponentHandle {
    pub fn new<T: Any + Send + Sync>(component: T) -> Self {
        Self(Arc::new(component))
    }

    /// UI 쪽에서 원래 타입으로 꺼내기
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ComponentHandle(..)")
    }
}

/// 사이드바 / 하단 패널 뷰
#[derive(Debug, Clone)]
pub struct ViewContribution {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub component: ComponentHandle,
}

impl ViewContribution {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        icon: impl Into<String>,
        component: ComponentHandle,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: icon.into(),
            component,
        }
    }
}
