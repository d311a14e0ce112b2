pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod patterns;
pub mod pipeline;
pub mod sections;
pub mod segmenter;

pub use config::{
    BreakStyle, NormalizerConfig, PipelineConfig, SectionKeywordSet, SectionPatterns,
};
pub use document::{Document, Element, Node};
pub use error::{Error, Result};
pub use models::{JobPosting, JobSections, RawPosting, SectionKind};
pub use normalizer::{Normalizer, Stage, clean};
pub use patterns::PatternSet;
pub use pipeline::CleaningPipeline;
pub use sections::HeadingSplitter;
pub use segmenter::{Segmenter, extract_section};
