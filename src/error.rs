use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("잘못된 패턴 `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("설정 파싱 실패: {0}")]
    Config(#[from] serde_json::Error),

    #[error("설정 파일 읽기 실패: {0}")]
    Io(#[from] std::io::Error),

    #[error("스레드 풀 생성 실패: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
