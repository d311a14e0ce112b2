use crate::Result;
use crate::config::PipelineConfig;
use crate::document::{Document, Node};
use crate::models::{JobPosting, JobSections, RawPosting, SectionKind};
use crate::normalizer::Normalizer;
use crate::sections::HeadingSplitter;
use crate::segmenter::Segmenter;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info};

/// Segments and cleans the detail body of scraped postings.
///
/// Every pattern is compiled once in [`CleaningPipeline::new`]; processing
/// itself cannot fail.
#[derive(Debug)]
pub struct CleaningPipeline {
    normalizer: Normalizer,
    segmenter: Segmenter,
    splitter: HeadingSplitter,
    thread_count: usize,
}

impl CleaningPipeline {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::new(&config.normalizer)?,
            segmenter: Segmenter::new(&config.sections)?,
            splitter: HeadingSplitter::new(
                &config.sections,
                &config.normalizer.bullet_symbols,
                config.heading_window,
            )?,
            thread_count: config.thread_count,
        })
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    pub fn process(&self, raw: &RawPosting) -> JobPosting {
        let tree = parse_body(raw);
        let document = match &tree {
            Some(root) => Document::Tree(root),
            None => Document::Text(&raw.inner_text),
        };

        let mut posting = JobPosting::from_raw(raw);
        for kind in SectionKind::ALL {
            // 담당업무를 못 찾으면 본문 전체라도 남긴다
            let fallback = match kind {
                SectionKind::Responsibilities => raw.inner_text.as_str(),
                _ => "",
            };
            let section = self.segmenter.extract(kind, document, fallback);
            debug!(section = kind.as_str(), len = section.len(), "섹션 정제");
            *posting.section_mut(kind) = self.normalizer.clean(&section);
        }

        debug!(title = %posting.title, "공고 정제 완료");
        posting
    }

    pub fn split_sections(&self, raw: &RawPosting) -> JobSections {
        match parse_body(raw) {
            Some(root) => self.splitter.split(&root, &raw.inner_text),
            None => self
                .splitter
                .split(&Node::element("body", vec![]), &raw.inner_text),
        }
    }

    /// Processes postings on a dedicated pool of `thread_count` workers.
    /// Output order follows input order.
    pub fn process_batch(&self, raws: &[RawPosting]) -> Result<Vec<JobPosting>> {
        info!("상세 내용 정제 시작: {}건", raws.len());

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.thread_count)
            .build()?;
        let postings: Vec<JobPosting> =
            pool.install(|| raws.par_iter().map(|raw| self.process(raw)).collect());

        info!("상세 내용 정제 완료: {}건", postings.len());
        Ok(postings)
    }
}

fn parse_body(raw: &RawPosting) -> Option<Node> {
    (!raw.html.trim().is_empty()).then(|| Node::parse_html(&raw.html))
}
