use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocsError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("cache I/O error at {path}: {source}")]
    Cache {
        path: String,
        source: std::io::Error,
    },

    #[error(
        "malformed parameter table for '{member}' on page {page}: {types} type cell(s) vs {names} name cell(s)"
    )]
    ParamTableShape {
        member: String,
        page: String,
        types: usize,
        names: usize,
    },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DocsError>;
