//! # Plugin System
//!
//! Kiln 익스텐션 호스트의 플러그인 시스템
//!
//! ## 개요
//!
//! 플러그인은 `activate`에서 받은 `ExtensionApi`로만 호스트를 확장한다:
//! - 명령 (명령 팔레트, "Plugin Commands" 섹션)
//! - 사이드바 뷰 / 하단 패널 뷰
//! - 진단 프로바이더
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       PluginHost                            │
//! │  ┌──────────────────────┐   ┌─────────────────────────────┐ │
//! │  │ plugins (id → record)│   │ contexts (id → ExtensionCtx)│ │
//! │  └──────────────────────┘   └─────────────────────────────┘ │
//! │                 │ activate(api, ctx)                         │
//! │                 ▼                                            │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │ ExtensionApi (commands / languages / views / panels)  │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │                 │ register → Disposable                      │
//! │                 ▼                                            │
//! │           Contributions (registries)                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 예시
//!
//! ```ignore
//! struct MyPlugin;
//!
//! impl Plugin for MyPlugin {
//!     fn manifest(&self) -> PluginManifest {
//!         PluginManifest::new("my.plugin", "My Plugin")
//!     }
//!
//!     fn activate(&self, api: &ExtensionApi, ctx: &mut ExtensionContext) -> Result<()> {
//!         ctx.push(api.commands().register_command("my.hello", "Hello", "hand", |_| {})?);
//!         Ok(())
//!     }
//! }
//!
//! let host = PluginHost::new(HostConfig::default());
//! host.register_plugin(Arc::new(MyPlugin));
//! ```

mod api;
pub mod builtin;
mod host;
mod manifest;
mod traits;

pub use api::{CommandsApi, ExtensionApi, LanguagesApi, PanelsApi, ViewsApi};
pub use host::{PluginHost, PluginInfo, PluginSummary};
pub use manifest::PluginManifest;
pub use traits::{ExtensionContext, Plugin, PluginStatus};
