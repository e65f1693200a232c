//! Error types for Kiln
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Kiln 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // Plugin 관련
    // ========================================================================
    #[error("Plugin error: {0}")]
    Plugin(String),

    #[error("Plugin {plugin} panicked: {message}")]
    PluginPanic { plugin: String, message: String },

    // ========================================================================
    // Contribution 관련
    // ========================================================================
    #[error("Contribution conflict: {registry} already has '{id}'")]
    Conflict { registry: String, id: String },

    // ========================================================================
    // Diagnostic provider 관련
    // ========================================================================
    #[error("Provider error: {0}")]
    Provider(String),

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Contribution id 충돌 에러 생성 헬퍼
    pub fn conflict(registry: impl Into<String>, id: impl Into<String>) -> Self {
        Error::Conflict {
            registry: registry.into(),
            id: id.into(),
        }
    }

    /// 플러그인 panic 에러 생성 헬퍼
    pub fn plugin_panic(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Error::PluginPanic {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
