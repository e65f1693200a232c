//! # kiln-foundation
//!
//! Foundation layer for Kiln:
//! - Error: 공통 에러 타입과 `Result` alias
//! - Config: 익스텐션 호스트 설정 (`HostConfig`) 및 계층형 설정 로더
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  kiln-cli (host application assembly)                   │
//! │                     │                                   │
//! │                     ▼                                   │
//! │  kiln-core  (PluginHost, ExtensionApi, Diagnostics)     │
//! │                     │                                   │
//! │                     ▼                                   │
//! │  kiln-foundation (Error, HostConfig, ConfigLoader)      │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    load_config_from_file, CollisionPolicy, ConfigLoader, ContributionsConfig, DiagnosticsConfig,
    HostConfig, PluginsConfig, CONFIG_DIR_NAME, DEFAULT_DEBOUNCE_MS,
};
