//! typfmt-core: the Typst source formatter.
//!
//! Parses a document with [`typfmt_syntax`], computes per-node attributes
//! and prints the tree through a `pretty` document. Formatting is
//! idempotent and keeps every comment.

/// Per-node attributes computed before printing.
pub mod attr;
/// Formatter options.
pub mod config;
/// Errors returned by the formatter.
pub mod error;
mod printer;

pub use attr::{AttrStore, FORMAT_OFF_MARKER};
pub use config::Config;
pub use error::{FormatError, FormatResult};

use typfmt_syntax::SyntaxNode;

use printer::Printer;

/// Formats Typst sources with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: Config,
}

impl Formatter {
    /// Create a formatter.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse and format `text`.
    pub fn format_source(&self, text: &str) -> FormatResult<String> {
        let root = typfmt_syntax::parse(text);
        self.format_tree(&root)
    }

    /// Format an already parsed document. Fails if the tree has errors.
    pub fn format_tree(&self, root: &SyntaxNode) -> FormatResult<String> {
        if root.erroneous() {
            return Err(FormatError::Syntax(root.errors()));
        }
        let printer = Printer::new(self.config.clone(), AttrStore::new(root));
        let doc = printer.convert_markup(root);
        let out = doc.pretty(self.config.max_width).to_string();
        Ok(strip_trailing_whitespace(&out))
    }
}

/// Format `text` with the default configuration and the given width.
/// Documents with syntax errors come back unchanged.
pub fn format_with_width(text: &str, width: usize) -> String {
    Formatter::new(Config::default().with_width(width))
        .format_source(text)
        .unwrap_or_else(|_| text.to_owned())
}

/// Remove trailing whitespace from every line and end with one newline.
pub fn strip_trailing_whitespace(s: &str) -> String {
    let mut out = s
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_whitespace() {
        assert_eq!(strip_trailing_whitespace("a  \nb\t\n\n\n"), "a\nb\n");
        assert_eq!(strip_trailing_whitespace(""), "\n");
        assert_eq!(strip_trailing_whitespace("x"), "x\n");
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = Formatter::default().format_source("#f(a").unwrap_err();
        match err {
            FormatError::Syntax(errors) => assert!(!errors.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn erroneous_input_is_returned_unchanged() {
        assert_eq!(format_with_width("#let = ", 80), "#let = ");
    }

    #[test]
    fn plain_markup_is_kept() {
        let text = "= Heading\n\nSome *bold* and _emph_ text.\n\n- item\n+ other\n";
        assert_eq!(format_with_width(text, 80), text);
    }

    #[test]
    fn math_is_verbatim() {
        let text = "$ x  =   y^2 $\n\n#let f(x) = $  x +1 $\n";
        assert_eq!(format_with_width(text, 80), text);
    }

    #[test]
    fn format_off_keeps_the_next_expression() {
        let text = "// @typfmt off\n#f(a,b)\n#g(a,b)\n";
        assert_eq!(format_with_width(text, 80), "// @typfmt off\n#f(a,b)\n#g(a, b)\n");
    }

    #[test]
    fn formatting_is_idempotent_on_samples() {
        let samples = [
            "#let a = (1,2,3)\n#{ let b = a.map(x=>x*2).filter(x=>x>2).sum() }\n",
            "#set text(size: 11pt)\n#show heading: it => [#it.body]\n",
            "#table(columns: 3, [a], [b], [c], [d])\n",
        ];
        let formatter = Formatter::new(Config::default().with_width(40));
        for sample in samples {
            let once = formatter.format_source(sample).unwrap();
            let twice = formatter.format_source(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }
}
