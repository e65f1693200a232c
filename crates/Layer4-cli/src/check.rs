//! `kiln check` - 파일을 차례로 활성 문서로 열고 진단 결과 출력

use anyhow::{anyhow, Context};
use kiln_core::{Diagnostic, DiagnosticSeverity, OpenDocument, PluginHost};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// debounce 이후 분석을 기다리는 최대 시간
const GATHER_TIMEOUT: Duration = Duration::from_secs(30);

/// 파일 결과
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl CheckSummary {
    fn add(&mut self, diagnostics: &[Diagnostic]) {
        self.files += 1;
        for d in diagnostics {
            match d.severity {
                DiagnosticSeverity::Error => self.errors += 1,
                DiagnosticSeverity::Warning => self.warnings += 1,
                DiagnosticSeverity::Info => self.infos += 1,
            }
        }
    }
}

pub async fn run(host: &PluginHost, files: &[PathBuf]) -> anyhow::Result<CheckSummary> {
    let pipeline = host.diagnostics_pipeline();
    let mut summary = CheckSummary::default();

    if !pipeline.config().enabled {
        warn!("Diagnostics are disabled by configuration");
        return Ok(summary);
    }

    let wait = pipeline.config().debounce() + GATHER_TIMEOUT;
    let mut rx = pipeline.subscribe();

    for path in files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let document = OpenDocument::new(file_uri(path), language_for(path), text.as_str());
        let revision = pipeline.set_active_document(Some(document));

        // Ref는 바로 clone 해서 놓는다 (다음 set_active_document가 쓰기 락을 잡음)
        let snapshot = tokio::time::timeout(
            wait,
            rx.wait_for(|s| s.revision == revision && s.is_computed()),
        )
        .await
        .map_err(|_| anyhow!("Timed out waiting for diagnostics on {}", path.display()))?
        .context("Diagnostics pipeline closed")?
        .clone();

        print_diagnostics(path, &text, &snapshot.diagnostics);
        summary.add(&snapshot.diagnostics);
    }

    pipeline.set_active_document(None);
    println!(
        "\n{} file(s): {} error(s), {} warning(s), {} info",
        summary.files, summary.errors, summary.warnings, summary.infos
    );
    Ok(summary)
}

fn print_diagnostics(path: &Path, text: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        println!("{}: no problems", path.display());
        return;
    }

    for d in diagnostics {
        let (line, column) = line_column(text, d.start);
        println!(
            "{}:{}:{}: {}: {} [{}]",
            path.display(),
            line,
            column,
            d.severity,
            d.message,
            d.source
        );
        if let Some(title) = &d.quick_fix_title {
            println!("    quick fix: {}", title);
        }
    }
}

/// 문자 오프셋 → 1부터 시작하는 (줄, 열)
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for c in text.chars().take(offset) {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

fn file_uri(path: &Path) -> String {
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}

/// 확장자로 language id 추정
fn language_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("js" | "mjs" | "cjs") => "javascript",
        Some("jsx") => "javascriptreact",
        Some("ts" | "mts" | "cts") => "typescript",
        Some("tsx") => "typescriptreact",
        Some("rs") => "rust",
        Some("py") => "python",
        Some("json") => "json",
        Some("md") => "markdown",
        _ => "plaintext",
    }
}
