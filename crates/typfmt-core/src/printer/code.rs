use pretty::DocAllocator;
use typfmt_syntax::{SyntaxKind, SyntaxNode};

use super::style::FoldStyle;
use super::{ArenaDoc, Mode, Printer};

impl<'a> Printer<'a> {
    /// `{ ... }` with one statement per line.
    ///
    /// A single statement without comments folds to `{ x }` when it fits
    /// and the source did not break the line after `{`.
    pub(super) fn convert_code_block(&'a self, block: &'a SyntaxNode) -> ArenaDoc<'a> {
        self.with_mode(Mode::Code, || {
            let nodes = code_nodes(block);
            if nodes.is_empty() {
                return self.arena.text("{}");
            }

            let statements = nodes.iter().filter(|node| is_statement(node)).count();
            let has_comment = nodes.iter().any(|node| node.kind().is_comment());
            let style = if statements == 1 && !has_comment {
                self.fold_style(block)
            } else {
                FoldStyle::Never
            };

            match style {
                FoldStyle::Fit => {
                    let body = self.indented(|| {
                        let mut doc = self.arena.line();
                        for line in self.code_lines(&nodes).into_iter().flatten() {
                            doc += line;
                        }
                        doc
                    });
                    (self.arena.text("{") + body + self.arena.line() + self.arena.text("}"))
                        .group()
                }
                FoldStyle::Never => {
                    let body = self.indented(|| {
                        let lines = self
                            .code_lines(&nodes)
                            .into_iter()
                            .map(|line| line.unwrap_or_else(|| self.arena.nil()));
                        self.arena.hardline()
                            + self.arena.intersperse(lines, self.arena.hardline())
                    });
                    self.arena.text("{") + body + self.arena.hardline() + self.arena.text("}")
                }
            }
        })
    }

    /// One entry per output line. `None` marks a kept blank line.
    ///
    /// Comments on the same line as the statement before them stay there.
    /// Semicolons are dropped since every statement gets its own line.
    fn code_lines(&'a self, nodes: &[&'a SyntaxNode]) -> Vec<Option<ArenaDoc<'a>>> {
        let bound = self.config.blank_lines_upper_bound;
        let mut lines: Vec<Option<ArenaDoc<'a>>> = Vec::new();
        let mut attach = false;

        for &node in nodes {
            match node.kind() {
                SyntaxKind::Space => {
                    let newlines = node.text().matches('\n').count();
                    if newlines > 0 {
                        if !lines.is_empty() {
                            let blanks = (newlines - 1).min(bound);
                            lines.extend(std::iter::repeat_with(|| None).take(blanks));
                        }
                        attach = false;
                    }
                }
                SyntaxKind::Semicolon => {}
                SyntaxKind::LineComment | SyntaxKind::BlockComment => {
                    let comment = self.convert_comment(node);
                    match lines.last_mut() {
                        Some(Some(last)) if attach => {
                            let prev = std::mem::replace(last, self.arena.nil());
                            *last = prev + self.arena.text(" ") + comment;
                        }
                        _ => lines.push(Some(comment)),
                    }
                    attach = node.kind() == SyntaxKind::BlockComment;
                }
                _ => {
                    lines.push(Some(self.convert_expr(node)));
                    attach = true;
                }
            }
        }

        while matches!(lines.last(), Some(None)) {
            lines.pop();
        }
        lines
    }
}

/// The children of the block's `Code` node without surrounding whitespace
/// and trailing semicolons.
fn code_nodes(block: &SyntaxNode) -> Vec<&SyntaxNode> {
    let Some(code) = block.child(SyntaxKind::Code) else {
        return Vec::new();
    };
    let mut nodes: Vec<&SyntaxNode> = code
        .children()
        .skip_while(|node| node.kind() == SyntaxKind::Space)
        .collect();
    while nodes
        .last()
        .is_some_and(|node| matches!(node.kind(), SyntaxKind::Space | SyntaxKind::Semicolon))
    {
        nodes.pop();
    }
    nodes
}

fn is_statement(node: &SyntaxNode) -> bool {
    !node.kind().is_trivia() && node.kind() != SyntaxKind::Semicolon
}
