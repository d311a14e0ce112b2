use crate::Result;
use crate::config::{BreakStyle, NormalizerConfig};
use crate::patterns::compile;
use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};
use tracing::trace;

static EMOJI: Lazy<Regex> = Lazy::new(|| {
    let pictograph = r"\p{Extended_Pictographic}(?:\x{FE0F}|[\x{1F3FB}-\x{1F3FF}])*";
    let pattern = [
        r"[0-9#*]\x{FE0F}?\x{20E3}".to_string(),
        r"[\x{1F1E6}-\x{1F1FF}]".to_string(),
        format!(r"{pictograph}(?:\x{{200D}}{pictograph})*"),
        r"[\x{FE0F}\x{20E3}\x{1F3FB}-\x{1F3FF}]".to_string(),
    ]
    .join("|");
    Regex::new(&pattern).unwrap()
});

static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").unwrap());
static ELLIPSIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());
static COMMAS: Lazy<Regex> = Lazy::new(|| Regex::new(r",{2,}").unwrap());
static QUESTIONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?{2,}").unwrap());
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

static DEFAULT: Lazy<Normalizer> = Lazy::new(|| {
    Normalizer::new(&NormalizerConfig::default()).expect("default normalizer config is valid")
});

const BULLET: &str = "\n- ";

/// Cleans `text` with the default Korean job-posting configuration.
pub fn clean(text: &str) -> String {
    DEFAULT.clean(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    StripEmoji,
    Bullets,
    Whitespace,
    NoiseSymbols,
    Punctuation,
    ScriptSpacing,
    SectionBreaks,
    BlankLines,
    Trim,
}

impl Stage {
    /// Order matters: later stages rely on the whitespace shape left by earlier ones.
    pub const PIPELINE: [Stage; 9] = [
        Self::StripEmoji,
        Self::Bullets,
        Self::Whitespace,
        Self::NoiseSymbols,
        Self::Punctuation,
        Self::ScriptSpacing,
        Self::SectionBreaks,
        Self::BlankLines,
        Self::Trim,
    ];
}

#[derive(Debug)]
struct SectionBreak {
    pattern: Regex,
    replacement: String,
}

/// Ordered rewrite pipeline for scraped posting text.
///
/// Holds only compiled regexes, so one instance can be shared across threads.
#[derive(Debug)]
pub struct Normalizer {
    bullets: Option<Regex>,
    noise: Option<Regex>,
    hangul_then_latin: Regex,
    latin_then_hangul: Regex,
    section_breaks: Vec<SectionBreak>,
}

impl Normalizer {
    pub fn new(config: &NormalizerConfig) -> Result<Self> {
        let bullets = symbol_class(&config.bullet_symbols)
            .map(|class| compile(&format!(r"\s*(?:{class}+\s*)+")))
            .transpose()?;
        let noise = symbol_class(&config.noise_symbols)
            .map(|class| compile(&format!(r"\s*(?:{class}+\s*)+")))
            .transpose()?;

        let latin = if config.space_digits {
            "A-Za-z0-9"
        } else {
            "A-Za-z"
        };
        let hangul_then_latin = compile(&format!("([가-힣])([{latin}])"))?;
        let latin_then_hangul = compile(&format!("([{latin}])([가-힣])"))?;

        let section_breaks = config
            .section_keywords
            .iter()
            .filter(|kw| !kw.trim().is_empty())
            .map(|kw| {
                let escaped = regex::escape(kw);
                // a label only opens at a line start, so the previous label's closing `===` stays put
                let (pattern, replacement) = match config.break_style {
                    BreakStyle::Plain => (
                        format!(r"(?:\s*\n-)?\s*{escaped}"),
                        format!("\n\n{kw}"),
                    ),
                    BreakStyle::Labeled => (
                        format!(r"(?:\s*\n-)?\s*(?:(?m:^)=== )?{escaped}(?: ===)?"),
                        format!("\n\n=== {kw} ==="),
                    ),
                };
                Ok(SectionBreak {
                    pattern: compile(&pattern)?,
                    replacement,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            bullets,
            noise,
            hangul_then_latin,
            latin_then_hangul,
            section_breaks,
        })
    }

    pub fn clean(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        Stage::PIPELINE
            .iter()
            .fold(text.to_string(), |acc, stage| {
                let out = self.apply(*stage, &acc);
                trace!(?stage, before = acc.len(), after = out.len(), "정제 단계 적용");
                out
            })
    }

    /// Runs a single stage in isolation.
    pub fn apply(&self, stage: Stage, text: &str) -> String {
        match stage {
            Stage::StripEmoji => EMOJI.replace_all(text, "").into_owned(),
            Stage::Bullets => match &self.bullets {
                Some(re) => re.replace_all(text, BULLET).into_owned(),
                None => text.to_string(),
            },
            Stage::Whitespace => {
                let text = NEWLINE_RUN.replace_all(text, "\n");
                SPACE_RUN.replace_all(&text, " ").into_owned()
            }
            Stage::NoiseSymbols => self.strip_noise(text),
            Stage::Punctuation => {
                let text = ELLIPSIS.replace_all(text, "…");
                let text = COMMAS.replace_all(&text, ",");
                QUESTIONS.replace_all(&text, "?").into_owned()
            }
            Stage::ScriptSpacing => {
                let text = self.hangul_then_latin.replace_all(text, "${1} ${2}");
                self.latin_then_hangul
                    .replace_all(&text, "${1} ${2}")
                    .into_owned()
            }
            Stage::SectionBreaks => self
                .section_breaks
                .iter()
                .fold(text.to_string(), |acc, brk| {
                    brk.pattern
                        .replace_all(&acc, NoExpand(&brk.replacement))
                        .into_owned()
                }),
            Stage::BlankLines => BLANK_LINES.replace_all(text, "\n\n").into_owned(),
            Stage::Trim => text.trim().to_string(),
        }
    }

    fn strip_noise(&self, text: &str) -> String {
        let Some(re) = &self.noise else {
            return text.to_string();
        };

        let text = re.replace_all(text, |caps: &Captures| {
            if caps[0].contains('\n') {
                "\n"
            } else {
                " "
            }
        });

        // dropped symbols can leave a marker with no item or two markers side by side
        match &self.bullets {
            Some(bullets) => bullets.replace_all(&text, BULLET).into_owned(),
            None => text.into_owned(),
        }
    }
}

pub(crate) fn symbol_class(symbols: &str) -> Option<String> {
    if symbols.is_empty() {
        return None;
    }
    let escaped: String = symbols
        .chars()
        .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
        .collect();
    Some(format!("[{escaped}]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(&NormalizerConfig::default()).unwrap()
    }

    #[test]
    fn empty_input_short_circuits() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   \n\t "), "");
    }

    #[test]
    fn bullet_and_section_break() {
        let cleaned = clean("담당업무 서버 개발•배포 자격요건 3년 이상");

        assert_eq!(cleaned, "담당업무 서버 개발\n- 배포\n\n자격요건 3 년 이상");
    }

    #[test]
    fn strips_emoji_sequences() {
        let n = normalizer();
        assert_eq!(n.apply(Stage::StripEmoji, "🚀 개발"), " 개발");
        assert_eq!(n.apply(Stage::StripEmoji, "팀👨‍👩‍👧원"), "팀원");
        assert_eq!(n.apply(Stage::StripEmoji, "👍🏻좋아요"), "좋아요");
        assert_eq!(n.apply(Stage::StripEmoji, "🇰🇷 근무"), " 근무");
        assert_eq!(n.apply(Stage::StripEmoji, "1️⃣ 서류"), " 서류");
        assert_eq!(n.apply(Stage::StripEmoji, "❤️ 3년"), " 3년");
    }

    #[test]
    fn keeps_plain_digits_and_symbols() {
        let n = normalizer();
        assert_eq!(n.apply(Stage::StripEmoji, "3년 #Rust *필수"), "3년 #Rust *필수");
    }

    #[test]
    fn bullet_runs_collapse_into_one_marker() {
        let n = normalizer();
        assert_eq!(n.apply(Stage::Bullets, "업무 • ■ 배포"), "업무\n- 배포");
        assert_eq!(n.apply(Stage::Bullets, "ㆍ설계ㆍ구현"), "\n- 설계\n- 구현");
    }

    #[test]
    fn whitespace_keeps_bullet_newlines() {
        let n = normalizer();
        assert_eq!(n.apply(Stage::Whitespace, "개발  \n- 배포\t\t운영"), "개발\n- 배포 운영");
        assert_eq!(n.apply(Stage::Whitespace, "a  b"), "a b");
    }

    #[test]
    fn noise_symbols_become_space() {
        let n = normalizer();
        assert_eq!(n.apply(Stage::NoiseSymbols, "서울 | 경기"), "서울 경기");
        assert_eq!(n.apply(Stage::NoiseSymbols, "※마감 임박"), " 마감 임박");
        assert_eq!(n.apply(Stage::NoiseSymbols, "서울|\n경기"), "서울\n경기");
    }

    #[test]
    fn noise_does_not_empty_a_bullet() {
        let n = normalizer();
        assert_eq!(n.apply(Stage::NoiseSymbols, "업무\n- |\n배포"), "업무\n- 배포");
    }

    #[test]
    fn noise_between_bullets_merges_markers() {
        let n = normalizer();
        assert_eq!(n.apply(Stage::NoiseSymbols, "\n- |\n- "), "\n- ");
        assert_eq!(clean("•|•"), "-");
        assert_eq!(clean("• 서버 | • 배포"), "- 서버\n- 배포");
        assert_eq!(clean(&clean("•|•")), "-");
    }

    #[test]
    fn spaced_noise_run_is_one_gap() {
        let n = normalizer();
        assert_eq!(n.apply(Stage::NoiseSymbols, "급여 ※  | 협의"), "급여 협의");
    }

    #[test]
    fn punctuation_runs() {
        let n = normalizer();
        assert_eq!(n.apply(Stage::Punctuation, "..."), "…");
        assert_eq!(n.apply(Stage::Punctuation, "??"), "?");
        assert_eq!(n.apply(Stage::Punctuation, "네,,, 좋아요"), "네, 좋아요");
        assert_eq!(n.apply(Stage::Whitespace, "  "), " ");
    }

    #[test]
    fn script_boundaries_get_spaces() {
        let n = normalizer();
        assert_eq!(n.apply(Stage::ScriptSpacing, "Java개발자"), "Java 개발자");
        assert_eq!(n.apply(Stage::ScriptSpacing, "경력3년React"), "경력 3 년 React");
    }

    #[test]
    fn digits_can_be_left_alone() {
        let config = NormalizerConfig {
            space_digits: false,
            ..Default::default()
        };
        let n = Normalizer::new(&config).unwrap();
        assert_eq!(n.apply(Stage::ScriptSpacing, "3년Go언어"), "3년 Go 언어");
    }

    #[test]
    fn bullet_before_keyword_folds_into_break() {
        assert_eq!(clean("개발 • 우대사항 Rust"), "개발\n\n우대사항 Rust");
    }

    #[test]
    fn labeled_breaks_are_stable() {
        let config = NormalizerConfig {
            break_style: BreakStyle::Labeled,
            ..Default::default()
        };
        let n = Normalizer::new(&config).unwrap();

        let once = n.clean("주요업무 API 설계 우대사항 AWS 경험");
        assert_eq!(once, "=== 주요업무 === API 설계\n\n=== 우대사항 === AWS 경험");
        assert_eq!(n.clean(&once), once);
    }

    #[test]
    fn labeled_adjacent_headers_keep_both_labels() {
        let config = NormalizerConfig {
            break_style: BreakStyle::Labeled,
            ..Default::default()
        };
        let n = Normalizer::new(&config).unwrap();

        let once = n.clean("주요업무 담당업무");
        assert_eq!(once, "=== 주요업무 ===\n\n=== 담당업무 ===");
        assert_eq!(n.clean(&once), once);

        let once = n.clean("안내 === 자격요건 학사");
        assert_eq!(once, "안내 ===\n\n=== 자격요건 === 학사");
        assert_eq!(n.clean(&once), once);
    }

    #[test]
    fn plain_breaks_keep_literal_equals() {
        let once = clean("담당업무 ===a");
        assert_eq!(once, "담당업무 ===a");
        assert_eq!(clean(&once), once);
        assert_eq!(clean("안내 === 자격요건"), "안내 ===\n\n자격요건");
    }

    #[test]
    fn keyword_with_regex_metacharacters_is_literal() {
        let config = NormalizerConfig {
            section_keywords: vec!["[필수]".to_string()],
            ..Default::default()
        };
        let n = Normalizer::new(&config).unwrap();
        assert_eq!(n.clean("안내 [필수] 포트폴리오"), "안내\n\n[필수] 포트폴리오");
    }

    #[test]
    fn blank_lines_are_capped() {
        let n = normalizer();
        assert_eq!(n.apply(Stage::BlankLines, "a\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn without_symbol_sets_the_stages_pass_through() {
        let config = NormalizerConfig {
            bullet_symbols: String::new(),
            noise_symbols: String::new(),
            ..Default::default()
        };
        let n = Normalizer::new(&config).unwrap();
        assert_eq!(n.apply(Stage::Bullets, "a • b"), "a • b");
        assert_eq!(n.apply(Stage::NoiseSymbols, "a | b"), "a | b");
    }

    #[test]
    fn realistic_posting_is_idempotent() {
        let raw = "📌 담당업무\n• 결제 서버 개발 및 운영\n• MSA 전환...\n\n\n※ 자격요건 | Java/Spring 3년이상??\n- AWS경험 우대사항 Kotlin";
        let once = clean(raw);

        assert_eq!(clean(&once), once);
        assert!(!once.contains("\n\n\n"));
        assert!(once.contains("\n\n자격요건"));
        assert!(once.contains("\n\n우대사항"));
        assert!(once.contains("운영\n- MSA 전환…"));
    }
}
