//! Document abstraction
//!
//! `OpenDocument`는 UI가 파이프라인에 알려주는 편집 중 버퍼 상태,
//! `TextDocument`는 분석 패스 하나를 위해 만들어지는 읽기 전용 스냅샷이다.

use std::sync::Arc;

/// UI 쪽 활성 문서 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    pub uri: String,
    pub language_id: String,
    pub text: Arc<str>,
}

impl OpenDocument {
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        text: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            text: text.into(),
        }
    }
}

/// 프로바이더에 전달되는 읽기 전용 문서
///
/// 패스마다 새로 만들어지고 절대 변경되지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    uri: String,
    language_id: String,
    text: Arc<str>,
}

impl TextDocument {
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        text: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            text: text.into(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn get_text(&self) -> &str {
        &self.text
    }

    /// 줄 단위 순회 (문자 오프셋 포함)
    pub fn lines(&self) -> Vec<LineSpan<'_>> {
        line_spans(&self.text)
    }
}

impl From<&OpenDocument> for TextDocument {
    fn from(doc: &OpenDocument) -> Self {
        Self {
            uri: doc.uri.clone(),
            language_id: doc.language_id.clone(),
            text: Arc::clone(&doc.text),
        }
    }
}

/// 한 줄의 위치 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan<'a> {
    /// 0부터 시작하는 줄 번호
    pub index: usize,
    /// 줄 시작의 문자 오프셋
    pub start: usize,
    /// 줄 내용 (개행 문자 제외, `\r` 제외)
    pub text: &'a str,
}

impl LineSpan<'_> {
    /// 줄 끝의 문자 오프셋 (개행 직전)
    pub fn end(&self) -> usize {
        self.start + self.text.chars().count()
    }

    /// 줄 안의 바이트 위치를 문서 전체 문자 오프셋으로 변환
    pub fn offset_of(&self, byte_index: usize) -> usize {
        self.start + self.text[..byte_index].chars().count()
    }
}

fn line_spans(text: &str) -> Vec<LineSpan<'_>> {
    let mut spans = Vec::new();
    let mut start = 0;

    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        spans.push(LineSpan {
            index,
            start,
            text: line,
        });
        start += raw.chars().count() + 1;
    }

    spans
}
