//! # Diagnostics
//!
//! - `document`: 프로바이더에 넘기는 읽기 전용 문서
//! - `types`: `Diagnostic`, `DiagnosticSeverity`
//! - `provider`: `DiagnosticProvider` trait과 동시 호출/병합
//! - `pipeline`: debounce + 오래된 결과 폐기 + 발행

mod document;
mod pipeline;
mod provider;
mod types;

pub use document::{LineSpan, OpenDocument, TextDocument};
pub use pipeline::{DiagnosticsPipeline, DiagnosticsSnapshot, PipelinePhase, PipelineStats};
pub use provider::{collect_diagnostics, DiagnosticProvider, GatherReport, ProviderOutcome};
pub use types::{Diagnostic, DiagnosticSeverity};
