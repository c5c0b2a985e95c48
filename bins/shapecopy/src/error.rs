use shapecopy::CopyError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),

    #[error("unknown converter '{name}' (available: {available})")]
    UnknownConverter { name: String, available: String },

    #[error("input error: {0}")]
    Input(String),

    #[error("copy error: {0}")]
    Copy(#[from] CopyError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Add context to the error.
    ///
    /// Prepended to `Config` and `Input` messages, other variants are
    /// returned unchanged.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            CliError::Config(msg) => CliError::Config(format!("{ctx}: {msg}")),
            CliError::Input(msg) => CliError::Input(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}
