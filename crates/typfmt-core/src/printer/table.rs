use pretty::DocAllocator;
use typfmt_syntax::{SyntaxKind, SyntaxNode};

use super::{ArenaDoc, Mode, Printer};

const TABLE_FUNCS: [&str; 2] = ["table", "grid"];
const ROW_BREAKERS: [&str; 4] = ["header", "footer", "hline", "vline"];

/// The callee is `table`, `grid` or a field access ending in one of them.
pub(super) fn is_table(callee: &SyntaxNode) -> bool {
    callee_name(callee).is_some_and(|name| TABLE_FUNCS.contains(&name))
}

fn callee_name(callee: &SyntaxNode) -> Option<&str> {
    match callee.kind() {
        SyntaxKind::Ident => Some(callee.text()),
        SyntaxKind::FieldAccess => callee.significant_children().last().map(SyntaxNode::text),
        _ => None,
    }
}

/// Column count when the table can be laid out in rows.
///
/// Needs `columns` as an integer or an array literal, and no comments,
/// spreads or cells spanning several rows or columns.
pub(super) fn column_count(args: &SyntaxNode) -> Option<usize> {
    let mut columns = None;
    for child in args.children() {
        match child.kind() {
            SyntaxKind::LineComment | SyntaxKind::BlockComment | SyntaxKind::Spread => {
                return None;
            }
            SyntaxKind::Named => {
                if contains_comment(child) {
                    return None;
                }
                let mut parts = child.significant_children();
                let name = parts.next().map(SyntaxNode::text);
                let value = parts.last();
                if name == Some("columns") {
                    columns = Some(value.and_then(columns_value)?);
                }
            }
            SyntaxKind::FuncCall if is_spanning_cell(child) => return None,
            _ => {}
        }
    }
    columns.filter(|&n| n > 0)
}

fn columns_value(value: &SyntaxNode) -> Option<usize> {
    match value.kind() {
        SyntaxKind::Int => value.text().parse().ok(),
        SyntaxKind::Array => Some(
            value
                .significant_children()
                .filter(|c| {
                    !matches!(
                        c.kind(),
                        SyntaxKind::LeftParen | SyntaxKind::RightParen | SyntaxKind::Comma
                    )
                })
                .count(),
        ),
        _ => None,
    }
}

/// `cell(colspan: ..)` or `table.cell(rowspan: ..)`.
fn is_spanning_cell(call: &SyntaxNode) -> bool {
    let callee = call.children().next();
    if callee.and_then(callee_name) != Some("cell") {
        return false;
    }
    call.child(SyntaxKind::Args).is_some_and(|args| {
        args.children()
            .filter(|c| c.kind() == SyntaxKind::Named)
            .filter_map(|named| named.children().next())
            .any(|name| matches!(name.text(), "colspan" | "rowspan"))
    })
}

fn breaks_row(node: &SyntaxNode) -> bool {
    node.kind() == SyntaxKind::FuncCall
        && node
            .children()
            .next()
            .and_then(callee_name)
            .is_some_and(|name| ROW_BREAKERS.contains(&name))
}

fn contains_comment(node: &SyntaxNode) -> bool {
    node.children()
        .any(|child| child.kind().is_comment() || contains_comment(child))
}

impl<'a> Printer<'a> {
    /// One named argument per line, then the cells `columns` per row.
    pub(super) fn convert_table(
        &'a self,
        paren: &[&'a SyntaxNode],
        columns: usize,
    ) -> ArenaDoc<'a> {
        self.with_mode(Mode::Code, || {
            let body = self.indented(|| {
                let mut lines = Vec::new();
                let mut row = Vec::new();
                let flush = |row: &mut Vec<ArenaDoc<'a>>, lines: &mut Vec<ArenaDoc<'a>>| {
                    if !row.is_empty() {
                        let cells = std::mem::take(row);
                        lines.push(
                            self.arena.intersperse(cells, self.arena.text(", "))
                                + self.arena.text(","),
                        );
                    }
                };

                for node in paren.iter().copied().filter(|node| is_table_item(node)) {
                    let doc = self.convert_expr(node);
                    if node.kind() == SyntaxKind::Named || breaks_row(node) {
                        flush(&mut row, &mut lines);
                        lines.push(doc + self.arena.text(","));
                    } else {
                        row.push(doc);
                        if row.len() == columns {
                            flush(&mut row, &mut lines);
                        }
                    }
                }
                flush(&mut row, &mut lines);

                self.arena.hardline() + self.arena.intersperse(lines, self.arena.hardline())
            });
            self.arena.text("(") + body + self.arena.hardline() + self.arena.text(")")
        })
    }

    /// Arguments of a table that cannot be laid out in rows. Commas, spaces
    /// and line breaks stay where they are. Only indentation changes.
    pub(super) fn convert_args_as_is(&'a self, paren: &[&'a SyntaxNode]) -> ArenaDoc<'a> {
        self.with_mode(Mode::Code, || {
            let inner: Vec<&SyntaxNode> = paren
                .iter()
                .copied()
                .filter(|node| !matches!(node.kind(), SyntaxKind::LeftParen | SyntaxKind::RightParen))
                .collect();
            let (inner, closing_break) = match inner.split_last() {
                Some((last, rest))
                    if last.kind() == SyntaxKind::Space && last.text().contains('\n') =>
                {
                    (rest, true)
                }
                _ => (inner.as_slice(), false),
            };

            let body = self.indented(|| {
                let mut doc = self.arena.nil();
                for &node in inner {
                    doc += match node.kind() {
                        SyntaxKind::Space => self.convert_args_space(node),
                        SyntaxKind::Comma => self.arena.text(","),
                        SyntaxKind::LineComment | SyntaxKind::BlockComment => {
                            self.convert_comment(node)
                        }
                        _ => self.convert_expr(node),
                    };
                }
                doc
            });

            let mut doc = self.arena.text("(") + body;
            if closing_break {
                doc += self.arena.hardline();
            }
            doc + self.arena.text(")")
        })
    }

    fn convert_args_space(&'a self, space: &'a SyntaxNode) -> ArenaDoc<'a> {
        let newlines = space.text().matches('\n').count();
        if newlines == 0 {
            return self.arena.text(" ");
        }
        let blanks = newlines.min(self.config.blank_lines_upper_bound + 1);
        self.arena
            .concat(std::iter::repeat_with(|| self.arena.hardline()).take(blanks))
    }
}

fn is_table_item(node: &SyntaxNode) -> bool {
    !node.kind().is_trivia()
        && !matches!(
            node.kind(),
            SyntaxKind::LeftParen | SyntaxKind::RightParen | SyntaxKind::Comma
        )
}
