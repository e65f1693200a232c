//! Lint Plugin - 가벼운 텍스트 기반 lint 규칙

use super::BuiltinView;
use crate::diagnostics::{Diagnostic, DiagnosticProvider, DiagnosticSeverity, TextDocument};
use crate::plugin::{ExtensionApi, ExtensionContext, Plugin, PluginManifest};
use crate::registry::{ComponentHandle, ViewContribution};
use async_trait::async_trait;
use kiln_foundation::Result;
use std::sync::Arc;
use tracing::info;

const LINT_SOURCE: &str = "lint";
const CONSOLE_LOG: &str = "console.log(";
const JS_LANGUAGES: &[&str] = &["javascript", "typescript", "javascriptreact", "typescriptreact"];

/// (규칙 이름, 설명)
pub const LINT_RULES: &[(&str, &str)] = &[
    ("trailing-whitespace", "Lines must not end with spaces or tabs"),
    ("no-console-log", "console.log calls in JavaScript/TypeScript"),
];

// ============================================================================
// Trailing whitespace
// ============================================================================

/// 줄 끝 공백 검사 (모든 언어)
#[derive(Debug, Default)]
pub struct TrailingWhitespaceProvider;

#[async_trait]
impl DiagnosticProvider for TrailingWhitespaceProvider {
    fn name(&self) -> &str {
        "trailing-whitespace"
    }

    async fn provide_diagnostics(
        &self,
        document: &TextDocument,
    ) -> Result<Option<Vec<Diagnostic>>> {
        let mut diagnostics = Vec::new();

        for line in document.lines() {
            let trimmed = line.text.trim_end_matches(|c| c == ' ' || c == '\t');
            if trimmed.len() == line.text.len() {
                continue;
            }

            diagnostics.push(
                Diagnostic::new(
                    format!("trailing-whitespace:{}", line.index + 1),
                    line.offset_of(trimmed.len()),
                    line.end(),
                    "Trailing whitespace",
                    DiagnosticSeverity::Warning,
                    LINT_SOURCE,
                )
                .with_quick_fix("Remove trailing whitespace", Some(String::new())),
            );
        }

        Ok(Some(diagnostics))
    }
}

// ============================================================================
// console.log
// ============================================================================

/// `console.log(...)` 검사 (JS/TS 전용, 그 외 언어는 `None`)
#[derive(Debug, Default)]
pub struct ConsoleLogProvider;

#[async_trait]
impl DiagnosticProvider for ConsoleLogProvider {
    fn name(&self) -> &str {
        "no-console-log"
    }

    async fn provide_diagnostics(
        &self,
        document: &TextDocument,
    ) -> Result<Option<Vec<Diagnostic>>> {
        if !JS_LANGUAGES.iter().any(|l| *l == document.language_id()) {
            return Ok(None);
        }

        let mut diagnostics = Vec::new();
        for line in document.lines() {
            if line.text.trim_start().starts_with("//") {
                continue;
            }

            let mut search_from = 0;
            while let Some(found) = line.text[search_from..].find(CONSOLE_LOG) {
                let begin = search_from + found;
                let end = call_end(line.text, begin + CONSOLE_LOG.len());
                let start = line.offset_of(begin);

                diagnostics.push(
                    Diagnostic::new(
                        format!("no-console-log:{}:{}", line.index + 1, start - line.start + 1),
                        start,
                        line.offset_of(end),
                        "Unexpected console.log statement",
                        DiagnosticSeverity::Info,
                        LINT_SOURCE,
                    )
                    .with_quick_fix("Remove console.log", Some(String::new())),
                );
                search_from = end;
            }
        }

        Ok(Some(diagnostics))
    }
}

/// 여는 괄호 바로 뒤(`from`)에서 시작해 대응하는 `)`(와 뒤따르는 `;`) 다음
/// 바이트 위치. 줄 안에서 닫히지 않으면 줄 끝.
fn call_end(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut quote: Option<u8> = None;
    let mut i = from;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        let end = i + 1;
                        return if bytes.get(end) == Some(&b';') { end + 1 } else { end };
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    bytes.len()
}

// ============================================================================
// Plugin
// ============================================================================

/// `kiln.lint` 플러그인
pub struct LintPlugin {
    trailing_whitespace: Arc<TrailingWhitespaceProvider>,
    console_log: Arc<ConsoleLogProvider>,
}

impl LintPlugin {
    pub const ID: &'static str = "kiln.lint";

    pub fn new() -> Self {
        Self {
            trailing_whitespace: Arc::new(TrailingWhitespaceProvider),
            console_log: Arc::new(ConsoleLogProvider),
        }
    }
}

impl Default for LintPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for LintPlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest::new(Self::ID, "Lint")
            .with_description("Built-in lint rules for whitespace and debug output")
            .with_author("Kiln")
            .with_version(env!("CARGO_PKG_VERSION"))
    }

    fn activate(&self, api: &ExtensionApi, ctx: &mut ExtensionContext) -> Result<()> {
        let languages = api.languages();
        ctx.push(languages.register_diagnostic_provider(self.trailing_whitespace.clone()));
        ctx.push(languages.register_diagnostic_provider(self.console_log.clone()));

        ctx.push(api.panels().register_bottom_panel_view(ViewContribution::new(
            "lint.problems",
            "Problems",
            "alert-triangle",
            ComponentHandle::new(BuiltinView::ProblemsPanel),
        ))?);

        ctx.push(api.commands().register_command(
            "lint.listRules",
            "Lint: List Rules",
            "list",
            |_| {
                for (rule, description) in LINT_RULES {
                    info!("{}: {}", rule, description);
                }
            },
        )?);

        Ok(())
    }
}
