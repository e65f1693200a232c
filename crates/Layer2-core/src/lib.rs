//! kiln-core: Extension host for Kiln
//!
//! Layer2 - 플러그인 라이프사이클, contribution 레지스트리, 진단 파이프라인
//!
//! # 주요 모듈
//!
//! - `plugin`: PluginHost, ExtensionApi facade, 내장 플러그인
//! - `registry`: 명령 / 사이드바 뷰 / 하단 패널 뷰 / 진단 프로바이더 레지스트리
//! - `disposable`: 등록 해제 핸들
//! - `diagnostics`: 문서 추상화, 프로바이더 trait, debounce 파이프라인
//! - `events`: 호스트 이벤트 버스
//!
//! # 사용 예시
//!
//! ```ignore
//! use kiln_core::{DiagnosticsPipeline, OpenDocument, PluginHost};
//! use kiln_core::plugin::builtin::LintPlugin;
//!
//! let host = PluginHost::new(HostConfig::default());
//! host.register_plugin(Arc::new(LintPlugin::new()));
//!
//! let pipeline = host.diagnostics_pipeline();
//! let mut rx = pipeline.subscribe();
//! pipeline.set_active_document(Some(OpenDocument::new("file:///a.js", "javascript", text)));
//! rx.changed().await?;
//! ```

pub mod diagnostics;
pub mod disposable;
pub mod events;
mod guard;
pub mod plugin;
pub mod registry;

// Re-exports: Plugin
pub use plugin::{
    ExtensionApi, ExtensionContext, Plugin, PluginHost, PluginInfo, PluginManifest, PluginStatus,
    PluginSummary,
};

// Re-exports: Registry
pub use registry::{
    Command, CommandAction, CommandSection, ComponentHandle, ContributionKind, ContributionStats,
    Contributions, ViewContribution,
};

// Re-exports: Disposable
pub use disposable::{Disposable, RegistrationToken};

// Re-exports: Diagnostics
pub use diagnostics::{
    collect_diagnostics, Diagnostic, DiagnosticProvider, DiagnosticSeverity, DiagnosticsPipeline,
    DiagnosticsSnapshot, GatherReport, OpenDocument, PipelinePhase, PipelineStats,
    ProviderOutcome, TextDocument,
};

// Re-exports: Events
pub use events::{EventBus, EventType, HostEvent};

// Re-exports: Foundation
pub use kiln_foundation::{Error, HostConfig, Result};
