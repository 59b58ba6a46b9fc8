use thiserror::Error;

#[derive(Debug, Error)]
pub enum StubError {
    #[error("invalid module snapshot: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Docs(#[from] mobu_docs::DocsError),

    #[error("plugin '{plugin}' pass failed: {}", .failures.join("; "))]
    PluginPass {
        plugin: String,
        failures: Vec<String>,
    },

    #[error(
        "dependency sort did not converge after {iterations} iterations; implicated classes: {}",
        .names.join(", ")
    )]
    DependencyCycle {
        iterations: usize,
        names: Vec<String>,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Output {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StubError>;
