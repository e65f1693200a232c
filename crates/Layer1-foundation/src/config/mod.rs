//! Config - 익스텐션 호스트 설정
//!
//! - `types.rs` - `HostConfig` 스키마
//! - `loader.rs` - user/project/local 계층 로더

mod loader;
mod types;

pub use loader::{load_config_from_file, ConfigLoader, CONFIG_DIR_NAME};
pub use types::{
    CollisionPolicy, ContributionsConfig, DiagnosticsConfig, HostConfig, PluginsConfig,
    DEFAULT_DEBOUNCE_MS,
};
