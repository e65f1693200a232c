//! Configuration 타입 정의
//!
//! 익스텐션 호스트 설정 스키마 (`settings.json`)

use serde::{Deserialize, Serialize};

/// 기본 debounce 시간 (ms)
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

// ============================================================================
// HostConfig - 통합 설정
// ============================================================================

/// 익스텐션 호스트 통합 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    /// 진단 파이프라인 설정
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    /// Contribution 레지스트리 설정
    #[serde(default)]
    pub contributions: ContributionsConfig,

    /// 플러그인 설정
    #[serde(default)]
    pub plugins: PluginsConfig,
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// debounce 시간 오버라이드
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.diagnostics.debounce_ms = debounce_ms;
        self
    }

    /// 충돌 정책 오버라이드
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.contributions.collision_policy = policy;
        self
    }

    /// 특정 플러그인 비활성화
    pub fn with_disabled_plugin(mut self, id: impl Into<String>) -> Self {
        self.plugins.disabled.push(id.into());
        self
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsConfig {
    /// false면 문서 변경 알림을 무시
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 마지막 변경 후 분석까지 대기 시간 (ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl DiagnosticsConfig {
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

// ============================================================================
// Contributions
// ============================================================================

/// 같은 id로 두 번 등록될 때의 처리 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// 나중 등록이 이전 등록을 조용히 대체
    #[default]
    Overwrite,
    /// 나중 등록을 `Error::Conflict`로 거부
    Reject,
}

impl std::fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsConfig {
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
}

// ============================================================================
// Plugins
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginsConfig {
    /// 등록은 하되 활성화하지 않을 플러그인 id
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl PluginsConfig {
    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled.iter().any(|d| d == id)
    }
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HostConfig::default();
        assert!(config.diagnostics.enabled);
        assert_eq!(config.diagnostics.debounce_ms, 500);
        assert_eq!(config.contributions.collision_policy, CollisionPolicy::Overwrite);
        assert!(config.plugins.disabled.is_empty());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: HostConfig =
            serde_json::from_str(r#"{"diagnostics": {"debounceMs": 250}}"#).unwrap();
        assert_eq!(config.diagnostics.debounce_ms, 250);
        assert!(config.diagnostics.enabled);
        assert_eq!(config.contributions.collision_policy, CollisionPolicy::Overwrite);
    }

    #[test]
    fn test_collision_policy_serde() {
        let config: HostConfig =
            serde_json::from_str(r#"{"contributions": {"collisionPolicy": "reject"}}"#).unwrap();
        assert_eq!(config.contributions.collision_policy, CollisionPolicy::Reject);
        assert_eq!(CollisionPolicy::Reject.to_string(), "reject");
    }

    #[test]
    fn test_builder_helpers() {
        let config = HostConfig::new()
            .with_debounce_ms(10)
            .with_disabled_plugin("kiln.lint");
        assert_eq!(config.diagnostics.debounce(), std::time::Duration::from_millis(10));
        assert!(config.plugins.is_disabled("kiln.lint"));
        assert!(!config.plugins.is_disabled("kiln.ai-review"));
    }
}
