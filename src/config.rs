use crate::Result;
use crate::models::SectionKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SECTION_KEYWORDS: [&str; 10] = [
    "자격요건",
    "주요업무",
    "담당업무",
    "우대사항",
    "복리후생",
    "기술스택",
    "개발환경",
    "근무조건",
    "모집부문",
    "전형절차",
];

const SHARED_TERMINATORS: [&str; 4] = [
    r"복리\s*후생",
    r"근무\s*조건",
    r"전형\s*절차",
    r"접수\s*기간",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakStyle {
    /// `\n\n자격요건`
    #[default]
    Plain,
    /// `\n\n=== 자격요건 ===`
    Labeled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizerConfig {
    /// 문단 구분을 넣을 키워드 (순서대로 적용)
    pub section_keywords: Vec<String>,
    /// `\n- `로 바꿀 글머리 기호
    pub bullet_symbols: String,
    /// 공백으로 지울 잡기호
    pub noise_symbols: String,
    pub break_style: BreakStyle,
    /// 한글과 숫자 사이에도 띄어쓰기를 넣을지 여부
    pub space_digits: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            section_keywords: DEFAULT_SECTION_KEYWORDS.map(String::from).to_vec(),
            bullet_symbols: "•·ㆍ∙‧-■□▪▫●○◦◆◇►".to_string(),
            noise_symbols: "|※".to_string(),
            break_style: BreakStyle::Plain,
            space_digits: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionPatterns {
    /// 섹션 시작을 알리는 정규식
    pub start_patterns: Vec<String>,
    /// 섹션을 끝내는 정규식. 다른 섹션의 시작 패턴은 자동으로 포함된다.
    pub end_patterns: Vec<String>,
}

impl SectionPatterns {
    fn new(start: &[&str]) -> Self {
        Self {
            start_patterns: start.iter().map(|p| p.to_string()).collect(),
            end_patterns: SHARED_TERMINATORS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionKeywordSet {
    pub responsibilities: SectionPatterns,
    pub qualifications: SectionPatterns,
    pub preferred: SectionPatterns,
}

impl SectionKeywordSet {
    pub fn get(&self, kind: SectionKind) -> &SectionPatterns {
        match kind {
            SectionKind::Responsibilities => &self.responsibilities,
            SectionKind::Qualifications => &self.qualifications,
            SectionKind::Preferred => &self.preferred,
        }
    }
}

impl Default for SectionKeywordSet {
    fn default() -> Self {
        Self {
            responsibilities: SectionPatterns::new(&[
                r"담당\s*업무",
                r"주요\s*업무",
                r"업무\s*내용",
            ]),
            qualifications: SectionPatterns::new(&[
                r"자격\s*요건",
                r"지원\s*자격",
                r"필수\s*역량",
            ]),
            preferred: SectionPatterns::new(&[r"우대\s*사항", r"우대\s*조건"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    pub normalizer: NormalizerConfig,
    pub sections: SectionKeywordSet,
    /// 헤더 블록 분류 시 앞에서부터 검사할 글자 수
    pub heading_window: usize,
    /// 병렬 처리에 사용할 스레드 개수
    pub thread_count: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            sections: SectionKeywordSet::default(),
            heading_window: 10,
            thread_count: 4,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{
                "normalizer": { "sectionKeywords": ["자격요건"], "breakStyle": "labeled" },
                "threadCount": 2
            }"#,
        )
        .unwrap();

        assert_eq!(config.normalizer.section_keywords, vec!["자격요건"]);
        assert_eq!(config.normalizer.break_style, BreakStyle::Labeled);
        assert_eq!(config.normalizer.noise_symbols, "|※");
        assert_eq!(config.thread_count, 2);
        assert_eq!(config.heading_window, 10);
        assert_eq!(config.sections, SectionKeywordSet::default());
    }

    #[test]
    fn section_patterns_from_json() {
        let config = PipelineConfig::from_json_str(
            r#"{ "sections": { "preferred": { "startPatterns": ["가산점"], "endPatterns": [] } } }"#,
        )
        .unwrap();

        let preferred = config.sections.get(SectionKind::Preferred);
        assert_eq!(preferred.start_patterns, vec!["가산점"]);
        assert!(preferred.end_patterns.is_empty());
        assert_eq!(
            config.sections.get(SectionKind::Responsibilities),
            &SectionKeywordSet::default().responsibilities
        );
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = PipelineConfig::from_json_str("{ threadCount: }").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "headingWindow": 6 }}"#).unwrap();

        let config = PipelineConfig::from_path(file.path()).unwrap();
        assert_eq!(config.heading_window, 6);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PipelineConfig::from_path("/nonexistent/jd-cleaner.json").unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
