//! Host application assembly
//!
//! 설정 로드 → PluginHost 생성 → 코어 명령과 내장 플러그인 등록

use anyhow::Context;
use kiln_core::plugin::builtin::LintPlugin;
use kiln_core::{CommandSection, PluginHost};
use kiln_foundation::{load_config_from_file, ConfigLoader, HostConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// 설정 로드
///
/// `--config`가 있으면 그 파일만 읽고 잘못된 파일은 에러, 없으면
/// 사용자/프로젝트/로컬 설정을 병합한다.
pub fn load_config(
    working_dir: &Path,
    explicit: Option<PathBuf>,
    debounce_ms: Option<u64>,
) -> anyhow::Result<HostConfig> {
    let mut config = match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            load_config_from_file(&path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?
        }
        None => ConfigLoader::new(working_dir)
            .load_all()
            .context("Failed to load settings")?,
    };
    if let Some(ms) = debounce_ms {
        config = config.with_debounce_ms(ms);
    }
    Ok(config)
}

/// 호스트 생성 및 기본 구성
pub fn build_host(config: HostConfig) -> anyhow::Result<PluginHost> {
    let host = PluginHost::new(config);

    host.register_core_command(
        "core.about",
        "About Kiln",
        "info",
        CommandSection::Core,
        |_| println!("Kiln extension host v{}", env!("CARGO_PKG_VERSION")),
    )?;

    host.register_plugin(Arc::new(LintPlugin::new()));

    let summary = host.summary();
    debug!(
        "Host ready: {} plugin(s), {} active, {} command(s)",
        summary.total, summary.active, summary.contributions.commands
    );
    Ok(host)
}
