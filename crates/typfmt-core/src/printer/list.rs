use pretty::DocAllocator;
use typfmt_syntax::{SyntaxKind, SyntaxNode};

use super::style::FoldStyle;
use super::{ArenaDoc, Mode, Printer};

/// One comma-separated entry with the comments that belong to it.
#[derive(Debug, Default)]
struct Entry<'a> {
    /// Usually one node. Dotted import paths span several.
    nodes: Vec<&'a SyntaxNode>,
    /// Comments on their own lines before the entry.
    leading: Vec<&'a SyntaxNode>,
    /// Block comments between the entry and its comma.
    before_comma: Vec<&'a SyntaxNode>,
    /// Comments after the comma on the same line, plus any line comment
    /// that ended the entry's line.
    after_comma: Vec<&'a SyntaxNode>,
}

impl Entry<'_> {
    fn has_comments(&self) -> bool {
        !(self.leading.is_empty() && self.before_comma.is_empty() && self.after_comma.is_empty())
    }

    fn is_spread(&self) -> bool {
        matches!(self.nodes.as_slice(), [node] if node.kind() == SyntaxKind::Spread)
    }
}

#[derive(Debug, Default)]
struct ParsedList<'a> {
    entries: Vec<Entry<'a>>,
    /// Comments after the last entry on their own lines.
    dangling: Vec<&'a SyntaxNode>,
    has_line_comment: bool,
}

impl ParsedList<'_> {
    fn has_comments(&self) -> bool {
        !self.dangling.is_empty() || self.entries.iter().any(Entry::has_comments)
    }
}

/// Split the children between the parentheses into entries.
///
/// A comment belongs to the entry before it when no line break came in
/// between. Otherwise it leads the next entry, as does a block comment
/// wedged between a comma and the next entry without any space.
fn parse_list<'a>(children: &[&'a SyntaxNode]) -> ParsedList<'a> {
    let mut list = ParsedList::default();
    let mut pending = Vec::new();
    let mut seen_comma = false;
    let mut newline = false;
    // Entries separated only by dots belong together.
    let mut joining = false;

    for (i, &child) in children.iter().enumerate() {
        let after_comma = i > 0 && children[i - 1].kind() == SyntaxKind::Comma;
        match child.kind() {
            SyntaxKind::LeftParen | SyntaxKind::RightParen | SyntaxKind::Colon => {}
            SyntaxKind::Space => newline |= child.text().contains('\n'),
            SyntaxKind::Comma => {
                seen_comma = true;
                joining = false;
            }
            SyntaxKind::LineComment | SyntaxKind::BlockComment => {
                let line_comment = child.kind() == SyntaxKind::LineComment;
                list.has_line_comment |= line_comment;
                let wedged = !line_comment
                    && after_comma
                    && children
                        .get(i + 1)
                        .is_some_and(|next| starts_entry(next.kind()));
                if wedged {
                    pending.push(child);
                    continue;
                }
                match list.entries.last_mut() {
                    Some(last) if !newline && pending.is_empty() => {
                        if seen_comma || line_comment {
                            last.after_comma.push(child);
                        } else {
                            last.before_comma.push(child);
                        }
                    }
                    _ => pending.push(child),
                }
            }
            SyntaxKind::Dot => {
                if let Some(last) = list.entries.last_mut() {
                    last.nodes.push(child);
                }
                joining = true;
            }
            _ if joining => {
                if let Some(last) = list.entries.last_mut() {
                    last.nodes.push(child);
                }
                joining = false;
            }
            _ => {
                list.entries.push(Entry {
                    nodes: vec![child],
                    leading: std::mem::take(&mut pending),
                    ..Entry::default()
                });
                seen_comma = false;
                newline = false;
            }
        }
    }

    list.dangling = pending;
    list
}

fn starts_entry(kind: SyntaxKind) -> bool {
    !matches!(
        kind,
        SyntaxKind::Space
            | SyntaxKind::Comma
            | SyntaxKind::RightParen
            | SyntaxKind::LineComment
            | SyntaxKind::BlockComment
    )
}

impl<'a> Printer<'a> {
    /// Arrays, dictionaries, parenthesized expressions, destructuring
    /// patterns and parameter lists.
    pub(super) fn convert_list(&'a self, node: &'a SyntaxNode) -> ArenaDoc<'a> {
        let children: Vec<_> = node.children().collect();
        if node.kind() == SyntaxKind::Params && node.child(SyntaxKind::LeftParen).is_none() {
            return self.with_mode(Mode::Code, || {
                self.arena.concat(children.iter().map(|&child| self.convert_expr(child)))
            });
        }
        self.convert_delimited(node, &children)
    }

    pub(super) fn convert_import_items(&'a self, node: &'a SyntaxNode) -> ArenaDoc<'a> {
        if node.child(SyntaxKind::LeftParen).is_none() {
            return self.convert_bare_import_items(node);
        }
        let children: Vec<_> = node.children().collect();
        self.convert_delimited(node, &children)
    }

    /// The parenthesized part of call arguments.
    pub(super) fn convert_paren_args(
        &'a self,
        args: &'a SyntaxNode,
        children: &[&'a SyntaxNode],
    ) -> ArenaDoc<'a> {
        let list = parse_list(children);
        if let [entry] = list.entries.as_slice() {
            if !list.has_comments() && can_hug(entry) {
                return self.with_mode(Mode::Code, || {
                    self.arena.text("(") + self.convert_entry_nodes(entry) + self.arena.text(")")
                });
            }
        }
        self.print_list(args, list)
    }

    fn convert_delimited(
        &'a self,
        node: &'a SyntaxNode,
        children: &[&'a SyntaxNode],
    ) -> ArenaDoc<'a> {
        self.print_list(node, parse_list(children))
    }

    fn print_list(&'a self, node: &'a SyntaxNode, list: ParsedList<'a>) -> ArenaDoc<'a> {
        self.with_mode(Mode::Code, || {
            let kind = node.kind();
            if list.entries.is_empty() && list.dangling.is_empty() {
                return self.arena.text(if kind == SyntaxKind::Dict { "(:)" } else { "()" });
            }
            if list.entries.is_empty() && !list.has_line_comment {
                let comments = list.dangling.iter().map(|&c| self.convert_comment(c));
                return self.arena.text("(")
                    + self.arena.intersperse(comments, self.arena.text(" "))
                    + self.arena.text(")");
            }

            let style = if list.has_line_comment || !list.dangling.is_empty() {
                FoldStyle::Never
            } else {
                self.fold_style(node)
            };

            let last = list.entries.len().saturating_sub(1);
            let always_trailing = matches!(kind, SyntaxKind::Array | SyntaxKind::Destructuring)
                && list.entries.len() == 1
                && !list.entries[0].is_spread();
            let trailing = |doc: ArenaDoc<'a>| -> ArenaDoc<'a> {
                match (kind, style) {
                    (SyntaxKind::Parenthesized, _) => doc,
                    _ if always_trailing => doc + self.arena.text(","),
                    (_, FoldStyle::Never) => doc + self.arena.text(","),
                    (_, FoldStyle::Fit) => doc + self.arena.text(",").flat_alt(self.arena.nil()),
                }
            };

            match style {
                FoldStyle::Fit => {
                    let body = self.indented(|| {
                        let entries = list.entries.iter().enumerate().map(|(i, entry)| {
                            self.convert_entry(entry, |doc| {
                                if i == last {
                                    trailing(doc)
                                } else {
                                    doc + self.arena.text(",")
                                }
                            })
                        });
                        self.arena.line_() + self.arena.intersperse(entries, self.arena.line())
                    });
                    (self.arena.text("(") + body + self.arena.line_() + self.arena.text(")"))
                        .group()
                }
                FoldStyle::Never => {
                    let body = self.indented(|| {
                        let mut lines: Vec<ArenaDoc<'a>> = list
                            .entries
                            .iter()
                            .enumerate()
                            .map(|(i, entry)| {
                                self.convert_entry(entry, |doc| {
                                    if i == last {
                                        trailing(doc)
                                    } else {
                                        doc + self.arena.text(",")
                                    }
                                })
                            })
                            .collect();
                        lines.extend(list.dangling.iter().map(|&c| self.convert_comment(c)));
                        self.arena.hardline()
                            + self.arena.intersperse(lines, self.arena.hardline())
                    });
                    self.arena.text("(") + body + self.arena.hardline() + self.arena.text(")")
                }
            }
        })
    }

    /// Print an entry with its comments. `separate` appends the comma.
    fn convert_entry(
        &'a self,
        entry: &Entry<'a>,
        separate: impl FnOnce(ArenaDoc<'a>) -> ArenaDoc<'a>,
    ) -> ArenaDoc<'a> {
        let mut doc = self.arena.nil();
        for &comment in &entry.leading {
            doc += self.convert_comment(comment);
            doc += if comment.kind() == SyntaxKind::LineComment {
                self.arena.hardline()
            } else {
                self.arena.text(" ")
            };
        }
        doc += self.convert_entry_nodes(entry);
        for &comment in &entry.before_comma {
            doc += self.arena.text(" ") + self.convert_comment(comment);
        }
        doc = separate(doc);
        for &comment in &entry.after_comma {
            doc += self.arena.text(" ") + self.convert_comment(comment);
        }
        doc
    }

    fn convert_entry_nodes(&'a self, entry: &Entry<'a>) -> ArenaDoc<'a> {
        self.arena
            .concat(entry.nodes.iter().map(|&node| self.convert_expr(node)))
    }
}

/// A lone argument is written directly inside the parentheses unless it is
/// itself a call.
fn can_hug(entry: &Entry<'_>) -> bool {
    let [node] = entry.nodes.as_slice() else {
        return false;
    };
    let value = if node.kind() == SyntaxKind::Named {
        node.significant_children().last()
    } else {
        Some(*node)
    };
    !matches!(
        value.map(SyntaxNode::kind),
        Some(SyntaxKind::FuncCall | SyntaxKind::Spread) | None
    )
}
