use crate::Result;
use crate::config::SectionKeywordSet;
use crate::document::Node;
use crate::models::{JobSections, SectionKind};
use crate::normalizer::symbol_class;
use crate::patterns::{PatternSet, compile};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

const HEADING_TAGS: [&str; 6] = ["h2", "h3", "h4", "h5", "strong", "b"];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static LEADING_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\s:：\]】)>]+").unwrap());

/// Splits a posting body at heading-like tags and sorts the blocks into sections.
#[derive(Debug)]
pub struct HeadingSplitter {
    starts: HashMap<SectionKind, PatternSet>,
    bullets: Option<Regex>,
    window: usize,
}

impl HeadingSplitter {
    pub fn new(keywords: &SectionKeywordSet, bullet_symbols: &str, window: usize) -> Result<Self> {
        let starts = SectionKind::ALL
            .iter()
            .map(|kind| Ok((*kind, PatternSet::new(&keywords.get(*kind).start_patterns)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        // ※ marks a list item in headed blocks even though the normalizer treats it as noise
        let bullets = symbol_class(&format!("{bullet_symbols}※"))
            .map(|class| compile(&format!("{class}+")))
            .transpose()?;

        Ok(Self {
            starts,
            bullets,
            window,
        })
    }

    pub fn split(&self, root: &Node, fallback: &str) -> JobSections {
        let mut sections = JobSections::default();

        for block in blocks(root) {
            if let Some(kind) = self.classify(&block) {
                sections.set(kind, self.items(kind, &block));
            }
        }

        if sections.is_empty() {
            debug!("분류된 헤더 블록이 없어 전체 텍스트를 담당업무로 사용");
            sections.set(
                SectionKind::Responsibilities,
                self.items(SectionKind::Responsibilities, fallback),
            );
        }

        sections
    }

    /// Kind of the first section whose start pattern appears in the block's head.
    pub fn classify(&self, block: &str) -> Option<SectionKind> {
        let head: String = block.chars().take(self.window).collect();
        SectionKind::ALL
            .into_iter()
            .find(|kind| self.starts[kind].is_match(&head))
    }

    /// Bullet items of a block, without the leading section header.
    pub fn items(&self, kind: SectionKind, block: &str) -> Vec<String> {
        let body = match self.starts[&kind].find(block) {
            Some(header) if is_decoration(&block[..header.start]) => &block[header.end..],
            _ => block,
        };
        let body = LEADING_SEPARATOR.replace(body, "");
        let body = match &self.bullets {
            Some(re) => re.replace_all(&body, "\n").into_owned(),
            None => body.into_owned(),
        };

        body.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Markers like `📌` or `[` in front of a header.
fn is_decoration(prefix: &str) -> bool {
    prefix.chars().all(|c| !c.is_alphanumeric())
}

/// Whitespace-collapsed text blocks, each starting at a heading-like tag.
pub fn blocks(root: &Node) -> Vec<String> {
    let mut raw = vec![String::new()];
    collect_blocks(root, &mut raw);

    raw.iter()
        .map(|block| WHITESPACE.replace_all(block, " ").trim().to_string())
        .filter(|block| !block.is_empty())
        .collect()
}

fn collect_blocks(node: &Node, blocks: &mut Vec<String>) {
    match node {
        Node::Text(text) => {
            if let Some(current) = blocks.last_mut() {
                current.push_str(text);
            }
        }
        Node::Element(element) => {
            if HEADING_TAGS.contains(&element.tag.as_str()) {
                blocks.push(String::new());
            }
            if let Some(current) = blocks.last_mut() {
                current.push(' ');
            }
            for child in &element.children {
                collect_blocks(child, blocks);
            }
            if let Some(current) = blocks.last_mut() {
                current.push(' ');
            }
        }
    }
}
