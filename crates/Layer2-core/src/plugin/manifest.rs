//! Plugin Manifest - 플러그인 메타데이터 정의

use serde::{Deserialize, Serialize};

/// 플러그인 매니페스트
///
/// `id`가 플러그인의 정체성이다. 등록 후에는 바뀌지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// 고유 플러그인 ID (예: "kiln.lint")
    pub id: String,

    /// 표시 이름
    pub name: String,

    /// 설명
    #[serde(default)]
    pub description: String,

    /// 작성자
    #[serde(default)]
    pub author: String,

    /// 버전 (표시용, 호환성 검사 없음)
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl PluginManifest {
    /// 새 매니페스트 생성
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            author: String::new(),
            version: default_version(),
        }
    }

    /// 빌더 패턴: 설명 설정
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// 빌더 패턴: 작성자 설정
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// 빌더 패턴: 버전 설정
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}
