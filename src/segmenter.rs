use crate::Result;
use crate::config::SectionKeywordSet;
use crate::document::{Document, Node};
use crate::models::SectionKind;
use crate::patterns::PatternSet;
use std::collections::HashMap;
use tracing::debug;

/// Returns the text between the first start anchor and the next end anchor.
///
/// A markup tree is tried first: the sibling nodes following the anchor are
/// collected until one of them matches an end pattern. When that yields
/// nothing, the flattened text is searched instead. If no start pattern
/// matches anywhere, `fallback` comes back unchanged.
pub fn extract_section(
    document: Document<'_>,
    start: &PatternSet,
    end: &PatternSet,
    fallback: &str,
) -> String {
    if let Document::Tree(root) = document {
        if let Some(text) = extract_from_tree(root, start, end) {
            debug!(mode = "tree", len = text.len(), "섹션 추출");
            return text;
        }
    }

    let flat = document.flatten();
    match extract_from_text(&flat, start, end) {
        Some(text) => {
            debug!(mode = "text", len = text.len(), "섹션 추출");
            text.to_string()
        }
        None => {
            debug!("시작 키워드를 찾지 못해 원문 사용");
            fallback.to_string()
        }
    }
}

/// String mode: the exact slice after the earliest start match, cut before
/// the earliest end match. `None` when there is no start match or the slice
/// is blank.
pub fn extract_from_text<'a>(text: &'a str, start: &PatternSet, end: &PatternSet) -> Option<&'a str> {
    let start_match = start.find(text)?;
    let after = &text[start_match.end..];

    let section = match end.find(after) {
        Some(end_match) => &after[..end_match.start],
        None => after,
    };

    (!section.trim().is_empty()).then_some(section)
}

fn extract_from_tree(root: &Node, start: &PatternSet, end: &PatternSet) -> Option<String> {
    let path = anchor_path(root, start)?;

    // climb from the innermost anchor until some level has content after it
    for depth in (1..=path.len()).rev() {
        let parent = node_at(root, &path[..depth - 1]);
        let anchor_idx = path[depth - 1];
        let parts = collect_siblings(&parent.children()[anchor_idx + 1..], end);
        if !parts.is_empty() {
            return Some(parts.join("\n"));
        }
    }

    None
}

/// Child indices leading to the innermost node on the first path whose text
/// matches a start pattern.
fn anchor_path(root: &Node, start: &PatternSet) -> Option<Vec<usize>> {
    if !matches_text(root, start) {
        return None;
    }

    let mut path = Vec::new();
    let mut current = root;
    while let Some((idx, child)) = current
        .children()
        .iter()
        .enumerate()
        .find(|(_, child)| matches_text(child, start))
    {
        path.push(idx);
        current = child;
    }

    Some(path)
}

fn matches_text(node: &Node, patterns: &PatternSet) -> bool {
    !node.is_blank() && patterns.is_match(&node.text_content())
}

fn node_at<'a>(root: &'a Node, path: &[usize]) -> &'a Node {
    path.iter().fold(root, |node, idx| &node.children()[*idx])
}

fn collect_siblings(siblings: &[Node], end: &PatternSet) -> Vec<String> {
    let mut parts = Vec::new();
    for sibling in siblings.iter().filter(|s| !s.is_blank()) {
        if end.is_match(&sibling.text_content()) {
            break;
        }
        parts.push(sibling.stripped_text());
    }
    parts
}

#[derive(Debug)]
struct SectionAnchors {
    start: PatternSet,
    end: PatternSet,
}

/// Section extractor bound to a [`SectionKeywordSet`].
///
/// A section ends at its own terminators or where any other section starts.
#[derive(Debug)]
pub struct Segmenter {
    anchors: HashMap<SectionKind, SectionAnchors>,
}

impl Segmenter {
    pub fn new(keywords: &SectionKeywordSet) -> Result<Self> {
        let starts = SectionKind::ALL
            .iter()
            .map(|kind| Ok((*kind, PatternSet::new(&keywords.get(*kind).start_patterns)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        let mut anchors = HashMap::new();
        for kind in SectionKind::ALL {
            let others = SectionKind::ALL
                .iter()
                .filter(|other| **other != kind)
                .flat_map(|other| starts[other].sources().iter());
            let end = PatternSet::new(keywords.get(kind).end_patterns.iter().chain(others))?;

            anchors.insert(
                kind,
                SectionAnchors {
                    start: starts[&kind].clone(),
                    end,
                },
            );
        }

        Ok(Self { anchors })
    }

    pub fn start_patterns(&self, kind: SectionKind) -> &PatternSet {
        &self.anchors[&kind].start
    }

    pub fn end_patterns(&self, kind: SectionKind) -> &PatternSet {
        &self.anchors[&kind].end
    }

    pub fn extract(&self, kind: SectionKind, document: Document<'_>, fallback: &str) -> String {
        let anchors = &self.anchors[&kind];
        extract_section(document, &anchors.start, &anchors.end, fallback)
    }
}
