use scraper::{ElementRef, Html};
use std::borrow::Cow;

/// Tags whose text never reaches the reader.
const SKIPPED_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Self::Element(Element {
            tag: tag.into(),
            children,
        })
    }

    /// Parses an HTML fragment (e.g. the `inner_html` of a detail page body).
    pub fn parse_html(html: &str) -> Self {
        let fragment = Html::parse_fragment(html);
        convert_element(fragment.root_element())
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Self::Element(element) => &element.children,
            Self::Text(_) => &[],
        }
    }

    /// All descendant text concatenated as-is.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Descendant strings trimmed, blanks dropped, joined with `\n`.
    pub fn stripped_text(&self) -> String {
        let mut parts = Vec::new();
        self.collect_stripped(&mut parts);
        parts.join("\n")
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Element(element) => element.children.iter().all(Node::is_blank),
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => element
                .children
                .iter()
                .for_each(|child| child.collect_text(out)),
        }
    }

    fn collect_stripped<'a>(&'a self, parts: &mut Vec<&'a str>) {
        match self {
            Self::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed);
                }
            }
            Self::Element(element) => element
                .children
                .iter()
                .for_each(|child| child.collect_stripped(parts)),
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

fn convert_element(element: ElementRef<'_>) -> Node {
    let mut children = Vec::new();

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if SKIPPED_TAGS.contains(&child_element.value().name()) {
                continue;
            }
            children.push(convert_element(child_element));
        } else if let Some(text) = child.value().as_text() {
            children.push(Node::Text(text.to_string()));
        }
    }

    Node::element(element.value().name(), children)
}

/// Input handed over by the scraper: flat text or a parsed markup tree.
#[derive(Debug, Clone, Copy)]
pub enum Document<'a> {
    Text(&'a str),
    Tree(&'a Node),
}

impl Document<'_> {
    pub fn flatten(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Tree(node) => Cow::Owned(node.text_content()),
        }
    }
}

impl<'a> From<&'a str> for Document<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a Node> for Document<'a> {
    fn from(node: &'a Node) -> Self {
        Self::Tree(node)
    }
}
