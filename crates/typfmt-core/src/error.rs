use typfmt_syntax::SyntaxError;

/// Alias for `Result<T, FormatError>`.
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors that prevent a document from being formatted.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The document does not parse. Formatting it could change its meaning.
    #[error("the document has {} syntax error(s)", .0.len())]
    Syntax(Vec<SyntaxError>),

    /// A configuration file could not be read.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
