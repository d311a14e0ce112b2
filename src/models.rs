use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    /// 담당업무 / 주요업무
    Responsibilities,
    /// 자격요건 / 지원자격
    Qualifications,
    /// 우대사항
    Preferred,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [
        Self::Responsibilities,
        Self::Qualifications,
        Self::Preferred,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Responsibilities => "responsibilities",
            Self::Qualifications => "qualifications",
            Self::Preferred => "preferred",
        }
    }
}

/// 상세 페이지에서 넘겨받은 가공 전 공고.
#[derive(Debug, Clone, Default)]
pub struct RawPosting {
    pub source: String,
    pub keyword: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub link: String,
    pub html: String,
    pub inner_text: String,
}

impl RawPosting {
    pub fn new(title: String, company: String, link: String) -> Self {
        Self {
            title,
            company,
            link,
            ..Default::default()
        }
    }

    pub fn with_body(mut self, html: impl Into<String>, inner_text: impl Into<String>) -> Self {
        self.html = html.into();
        self.inner_text = inner_text.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobPosting {
    pub source: String,
    pub keyword: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub link: String,
    pub responsibilities: String,
    pub qualifications: String,
    pub preferred: String,
}

impl JobPosting {
    pub fn from_raw(raw: &RawPosting) -> Self {
        Self {
            source: raw.source.clone(),
            keyword: raw.keyword.clone(),
            title: raw.title.trim().to_string(),
            company: raw.company.trim().to_string(),
            location: raw.location.as_ref().map(|l| l.trim().to_string()),
            link: raw.link.clone(),
            ..Default::default()
        }
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> &mut String {
        match kind {
            SectionKind::Responsibilities => &mut self.responsibilities,
            SectionKind::Qualifications => &mut self.qualifications,
            SectionKind::Preferred => &mut self.preferred,
        }
    }
}

/// 헤더 단위로 나눈 상세 내용. 각 항목은 글머리 기호 하나에 해당한다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobSections {
    pub responsibilities: Vec<String>,
    pub qualifications: Vec<String>,
    pub preferred: Vec<String>,
}

impl JobSections {
    pub fn get(&self, kind: SectionKind) -> &[String] {
        match kind {
            SectionKind::Responsibilities => &self.responsibilities,
            SectionKind::Qualifications => &self.qualifications,
            SectionKind::Preferred => &self.preferred,
        }
    }

    pub fn set(&mut self, kind: SectionKind, items: Vec<String>) {
        match kind {
            SectionKind::Responsibilities => self.responsibilities = items,
            SectionKind::Qualifications => self.qualifications = items,
            SectionKind::Preferred => self.preferred = items,
        }
    }

    pub fn is_empty(&self) -> bool {
        SectionKind::ALL.iter().all(|kind| self.get(*kind).is_empty())
    }
}
