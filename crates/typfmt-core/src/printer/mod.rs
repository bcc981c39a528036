//! Conversion of a syntax tree into a `pretty` document.
//!
//! Markup is kept as written except for embedded code on lines without
//! text. Code is re-laid out: comma lists fold onto one line when they fit,
//! code blocks put one statement per line, and tables follow their column
//! count.

mod call;
mod code;
mod flow;
mod list;
mod style;
mod table;

use std::cell::Cell;

use pretty::{Arena, DocAllocator, DocBuilder};
use typfmt_syntax::{SyntaxKind, SyntaxNode};

use crate::{AttrStore, Config};
use style::FoldStyle;

pub(crate) type ArenaDoc<'a> = DocBuilder<'a, Arena<'a>>;

/// Where the node being printed sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Embedded in markup. Line breaks would end the expression.
    Markup,
    /// Inside a code block or delimiters. Line breaks are free.
    Code,
}

/// Holds the document arena and the printing state for one tree.
pub(crate) struct Printer<'a> {
    config: Config,
    attrs: AttrStore,
    arena: Arena<'a>,
    mode: Cell<Mode>,
    indent: Cell<isize>,
}

impl<'a> Printer<'a> {
    pub(crate) fn new(config: Config, attrs: AttrStore) -> Self {
        Self {
            config,
            attrs,
            arena: Arena::new(),
            mode: Cell::new(Mode::Markup),
            indent: Cell::new(0),
        }
    }

    fn mode(&self) -> Mode {
        self.mode.get()
    }

    fn with_mode<T>(&self, mode: Mode, f: impl FnOnce() -> T) -> T {
        let saved = self.mode.replace(mode);
        let out = f();
        self.mode.set(saved);
        out
    }

    /// Build a document one indentation level deeper.
    fn indented(&'a self, build: impl FnOnce() -> ArenaDoc<'a>) -> ArenaDoc<'a> {
        self.nested(self.config.tab_spaces as isize, build)
    }

    /// All nesting goes through here so that verbatim line breaks can undo
    /// it exactly.
    fn nested(&'a self, amount: isize, build: impl FnOnce() -> ArenaDoc<'a>) -> ArenaDoc<'a> {
        self.indent.set(self.indent.get() + amount);
        let doc = build();
        self.indent.set(self.indent.get() - amount);
        doc.nest(amount)
    }

    /// A line break that ignores the current indentation.
    ///
    /// `pretty` indents a hard line by the nesting of the document that
    /// follows it, so a zero-width marker carries the undone nesting.
    fn raw_newline(&'a self) -> ArenaDoc<'a> {
        let marker = self.arena.column(move |_| self.arena.nil().into_doc());
        (self.arena.hardline() + marker).nest(-self.indent.get())
    }

    fn fold_style(&self, node: &SyntaxNode) -> FoldStyle {
        if self.attrs.is_multiline(node) {
            FoldStyle::Never
        } else {
            FoldStyle::Fit
        }
    }

    /// Text printed exactly as written, line breaks included.
    fn verbatim(&'a self, text: &str) -> ArenaDoc<'a> {
        let mut doc = self.arena.nil();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                doc += self.raw_newline();
            }
            if !line.is_empty() {
                doc += self.arena.text(line.to_owned());
            }
        }
        doc
    }

    fn verbatim_node(&'a self, node: &'a SyntaxNode) -> ArenaDoc<'a> {
        if node.is_leaf() {
            self.convert_leaf(node)
        } else {
            self.verbatim(&node.full_text())
        }
    }

    fn convert_leaf(&'a self, node: &'a SyntaxNode) -> ArenaDoc<'a> {
        let text = node.text();
        if text.contains('\n') {
            self.verbatim(text)
        } else {
            self.arena.text(text)
        }
    }

    fn convert_comment(&'a self, node: &'a SyntaxNode) -> ArenaDoc<'a> {
        self.convert_leaf(node)
    }

    /// Print a `Markup` node line by line.
    ///
    /// A line holding any text is kept verbatim. On other lines, embedded
    /// code is formatted and everything else is kept. Markup indentation is
    /// written verbatim, so code breaking over several lines is nested from
    /// the column its line starts at.
    pub(crate) fn convert_markup(&'a self, markup: &'a SyntaxNode) -> ArenaDoc<'a> {
        self.with_mode(Mode::Markup, || {
            let mut doc = self.arena.nil();
            let mut line_indent = self.indent.get();
            for line in markup_lines(markup) {
                let has_text = line.iter().any(|node| is_text_like(node.kind()));
                for &node in &line {
                    doc += if has_text || node.is_leaf() {
                        self.verbatim_node(node)
                    } else {
                        let shift = line_indent - self.indent.get();
                        self.nested(shift, || self.convert_expr(node))
                    };
                }
                line_indent = line.last().map_or(line_indent, |last| trailing_indent(last.text()));
            }
            doc
        })
    }

    pub(crate) fn convert_expr(&'a self, node: &'a SyntaxNode) -> ArenaDoc<'a> {
        if self.attrs.is_format_disabled(node) {
            return self.verbatim_node(node);
        }
        match node.kind() {
            SyntaxKind::Markup => self.convert_markup(node),
            SyntaxKind::CodeBlock => self.convert_code_block(node),
            SyntaxKind::ContentBlock => self.convert_content_block(node),
            SyntaxKind::Parenthesized
            | SyntaxKind::Array
            | SyntaxKind::Dict
            | SyntaxKind::Destructuring
            | SyntaxKind::Params => self.convert_list(node),
            SyntaxKind::ImportItems => self.convert_import_items(node),
            SyntaxKind::FuncCall => self.convert_func_call(node),
            SyntaxKind::FieldAccess => self.convert_field_access(node),
            kind if flow::is_flow(kind) => self.convert_flow(node),
            _ if node.is_leaf() => self.convert_leaf(node),
            _ => self.verbatim_node(node),
        }
    }

    fn convert_content_block(&'a self, block: &'a SyntaxNode) -> ArenaDoc<'a> {
        self.with_mode(Mode::Markup, || {
            let mut doc = self.arena.nil();
            for child in block.children() {
                doc += match child.kind() {
                    SyntaxKind::Markup => self.convert_markup(child),
                    _ => self.verbatim_node(child),
                };
            }
            doc
        })
    }
}

/// Split markup children into lines. Whitespace containing a newline ends
/// the line it belongs to.
fn markup_lines(markup: &SyntaxNode) -> Vec<Vec<&SyntaxNode>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    for node in markup.children() {
        current.push(node);
        let breaks = matches!(node.kind(), SyntaxKind::Space | SyntaxKind::Parbreak)
            && node.text().contains('\n');
        if breaks {
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Width of the indentation that ends `space`, or zero if it is not made
/// of blanks.
fn trailing_indent(space: &str) -> isize {
    let tail = space.rsplit('\n').next().unwrap_or_default();
    if tail.chars().all(|c| c == ' ' || c == '\t') {
        tail.len() as isize
    } else {
        0
    }
}

/// Nodes whose presence keeps a markup line verbatim.
fn is_text_like(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Text
            | SyntaxKind::Star
            | SyntaxKind::Underscore
            | SyntaxKind::Escape
            | SyntaxKind::Shorthand
            | SyntaxKind::SmartQuote
            | SyntaxKind::Link
            | SyntaxKind::Ref
            | SyntaxKind::Raw
            | SyntaxKind::HeadingMarker
            | SyntaxKind::ListMarker
            | SyntaxKind::EnumMarker
            | SyntaxKind::TermMarker
            | SyntaxKind::Linebreak
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use typfmt_syntax::parse;

    fn print(text: &str, width: usize) -> String {
        let root = parse(text);
        let printer = Printer::new(Config::default(), AttrStore::new(&root));
        let doc = printer.convert_markup(&root);
        doc.pretty(width).to_string()
    }

    #[test]
    fn markup_lines_split_at_newlines() {
        let root = parse("a #f(x)\n#g(y)\n\nb");
        let lines = markup_lines(&root);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].iter().any(|n| n.kind() == SyntaxKind::Text));
        assert!(!lines[1].iter().any(|n| is_text_like(n.kind())));
    }

    #[test]
    fn text_lines_are_verbatim() {
        assert_eq!(print("Some  text #f(a,b)", 120), "Some  text #f(a,b)");
    }

    #[test]
    fn code_lines_are_formatted() {
        assert_eq!(print("#f(a,b)\nText", 120), "#f(a, b)\nText");
    }

    #[test]
    fn verbatim_keeps_indentation_when_nested() {
        let text = "#{\n  [\n      deep\n  ]\n}";
        assert_eq!(print(text, 120), text);
    }

    #[test]
    fn embedded_code_follows_line_indentation() {
        let text = "#[\n  #f(aaaa, bbbb)\n]";
        assert_eq!(print(text, 12), "#[\n  #f(\n    aaaa,\n    bbbb,\n  )\n]");
    }

    #[test]
    fn trailing_indent_width() {
        assert_eq!(trailing_indent("\n    "), 4);
        assert_eq!(trailing_indent("\n\n"), 0);
        assert_eq!(trailing_indent(" "), 1);
    }

    #[test]
    fn raw_blocks_are_untouched() {
        let text = "```\n  a   b\n```";
        assert_eq!(print(text, 120), text);
    }
}
