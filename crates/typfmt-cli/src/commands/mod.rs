pub mod format;
pub mod format_all;

use std::path::Path;

use colored::Colorize;
use typfmt_core::{Config, FormatError, Formatter};
use typfmt_syntax::{Diagnostic, render_diagnostics};

/// Build the configuration: the JSON file if given, then flag overrides.
pub fn load_config(
    path: Option<&Path>,
    column: Option<usize>,
    tab_width: Option<usize>,
) -> Result<Config, String> {
    let mut config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read config '{}': {e}", path.display()))?;
            Config::from_json_str(&json).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(column) = column {
        config = config.with_width(column);
    }
    if let Some(tab_width) = tab_width {
        config = config.with_tab_spaces(tab_width);
    }
    Ok(config)
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Already formatted.
    Unchanged,
    /// Formatting changes the text. Holds the new text.
    Changed(String),
    /// The document has syntax errors and was left alone.
    Failed,
}

/// Format `source`, rendering syntax errors to stderr.
pub fn format_source(formatter: &Formatter, source: &str, name: &str) -> Outcome {
    match formatter.format_source(source) {
        Ok(formatted) if formatted == source => Outcome::Unchanged,
        Ok(formatted) => Outcome::Changed(formatted),
        Err(FormatError::Syntax(errors)) => {
            let diagnostics: Vec<Diagnostic> = errors.iter().map(Diagnostic::from).collect();
            eprint!("{}", render_diagnostics(source, name, &diagnostics));
            Outcome::Failed
        }
        Err(e) => {
            eprintln!("{} {name}: {e}", "error:".red().bold());
            Outcome::Failed
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
