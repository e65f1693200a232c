//! Configuration Loader
//!
//! Kiln 전용 설정 로더 (`.kiln` 폴더)
//!
//! ## 검색 우선순위
//!
//! 1. User-level: `~/.kiln/settings.json`
//! 2. Project-level: `.kiln/settings.json`
//! 3. Local (gitignored): `.kiln/settings.local.json`
//!
//! 각 레벨의 설정이 이전 레벨을 오버라이드합니다. 병합은 JSON 객체 단위로
//! 재귀적으로 이루어지므로, 하위 레벨은 바꾸고 싶은 키만 적으면 됩니다.

use super::types::HostConfig;
use crate::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 설정 폴더 이름
pub const CONFIG_DIR_NAME: &str = ".kiln";

// ============================================================================
// ConfigLoader - 설정 로더
// ============================================================================

/// 설정 로더
pub struct ConfigLoader {
    /// 검색 경로 (우선순위 오름차순)
    search_paths: Vec<ConfigPath>,
}

/// 설정 파일 경로 정보
#[derive(Debug, Clone)]
struct ConfigPath {
    path: PathBuf,
    /// 높을수록 우선
    priority: u8,
    description: &'static str,
}

impl ConfigLoader {
    /// 새 로더 생성 (기본 검색 경로)
    pub fn new(working_dir: &Path) -> Self {
        let mut paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            paths.push(ConfigPath {
                path: home.join(CONFIG_DIR_NAME).join("settings.json"),
                priority: 10,
                description: "User settings",
            });
        }

        paths.push(ConfigPath {
            path: working_dir.join(CONFIG_DIR_NAME).join("settings.json"),
            priority: 20,
            description: "Project settings",
        });

        paths.push(ConfigPath {
            path: working_dir.join(CONFIG_DIR_NAME).join("settings.local.json"),
            priority: 30,
            description: "Local settings",
        });

        paths.sort_by_key(|p| p.priority);

        Self { search_paths: paths }
    }

    /// 모든 경로에서 설정 로드하여 병합
    ///
    /// 읽을 수 없거나 잘못된 파일은 경고 후 건너뜁니다.
    pub fn load_all(&self) -> Result<HostConfig> {
        let mut merged = Value::Object(Default::default());

        for config_path in &self.search_paths {
            if !config_path.path.exists() {
                continue;
            }
            match read_json_file(&config_path.path) {
                Ok(value) => {
                    info!(
                        "Loaded {} from: {}",
                        config_path.description,
                        config_path.path.display()
                    );
                    merge_values(&mut merged, value);
                }
                Err(e) => {
                    warn!(
                        "Failed to load settings from {}: {}",
                        config_path.path.display(),
                        e
                    );
                }
            }
        }

        let config: HostConfig = serde_json::from_value(merged)
            .map_err(|e| Error::Config(format!("merged settings are invalid: {}", e)))?;

        debug!(
            "Host config: debounce={}ms, collision={}, disabled plugins={}",
            config.diagnostics.debounce_ms,
            config.contributions.collision_policy,
            config.plugins.disabled.len()
        );

        Ok(config)
    }
}

// ============================================================================
// 유틸리티 함수
// ============================================================================

/// 파일에서 설정 로드 (단일 파일)
pub fn load_config_from_file(path: &Path) -> Result<HostConfig> {
    let value = read_json_file(path)?;
    serde_json::from_value(value).map_err(|e| {
        Error::InvalidInput(format!("Invalid settings at {}: {}", path.display(), e))
    })
}

fn read_json_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    let content = strip_json_comments(&content);
    let value: Value = serde_json::from_str(&content)?;
    if !value.is_object() {
        return Err(Error::InvalidInput(format!(
            "{} must contain a JSON object",
            path.display()
        )));
    }
    Ok(value)
}

/// `later`를 `earlier` 위에 재귀적으로 병합
fn merge_values(earlier: &mut Value, later: Value) {
    match (earlier, later) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// JSON 주석 제거 (// 및 /* */)
fn strip_json_comments(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(c) = chars.next() {
        if escape_next {
            output.push(c);
            escape_next = false;
            continue;
        }

        if c == '\\' && in_string {
            output.push(c);
            escape_next = true;
            continue;
        }

        if c == '"' {
            in_string = !in_string;
            output.push(c);
            continue;
        }

        if !in_string && c == '/' {
            match chars.peek() {
                Some('/') => {
                    for c in chars.by_ref() {
                        if c == '\n' {
                            output.push(c);
                            break;
                        }
                    }
                    continue;
                }
                Some('*') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '*' && chars.peek() == Some(&'/') {
                            chars.next();
                            break;
                        }
                    }
                    continue;
                }
                _ => {}
            }
        }

        output.push(c);
    }

    output
}

// ============================================================================
// 테스트
// ============================================================================
