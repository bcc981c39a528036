use pretty::DocAllocator;
use typfmt_syntax::{SyntaxKind, SyntaxNode};

use super::{ArenaDoc, Mode, Printer, table};

/// One `.field` or `.method(args)` link of a dot chain.
struct Segment<'a> {
    field: &'a SyntaxNode,
    args: Option<&'a SyntaxNode>,
}

impl<'a> Printer<'a> {
    pub(super) fn convert_func_call(&'a self, node: &'a SyntaxNode) -> ArenaDoc<'a> {
        if self.attrs.is_unformattable(node) {
            return self.verbatim_node(node);
        }
        if let Some(doc) = self.convert_chain(node) {
            return doc;
        }

        let mut doc = self.arena.nil();
        let mut callee = None;
        for child in node.children() {
            match child.kind() {
                SyntaxKind::Args => {
                    doc += self.convert_args(child, callee.unwrap_or(child));
                }
                _ => {
                    callee = Some(child);
                    doc += self.convert_expr(child);
                }
            }
        }
        doc
    }

    pub(super) fn convert_field_access(&'a self, node: &'a SyntaxNode) -> ArenaDoc<'a> {
        if self.attrs.is_unformattable(node) {
            return self.verbatim_node(node);
        }
        if let Some(doc) = self.convert_chain(node) {
            return doc;
        }
        self.arena
            .concat(node.children().map(|child| self.convert_expr(child)))
    }

    /// Arguments: the parenthesized list followed by trailing content
    /// blocks.
    fn convert_args(&'a self, args: &'a SyntaxNode, callee: &'a SyntaxNode) -> ArenaDoc<'a> {
        let children: Vec<&SyntaxNode> = args.children().collect();
        let paren_end = children
            .iter()
            .position(|child| child.kind() == SyntaxKind::RightParen)
            .map_or(0, |i| i + 1);
        let (paren, rest) = children.split_at(paren_end);

        let mut doc = if paren.is_empty() {
            self.arena.nil()
        } else if table::is_table(callee) {
            match table::column_count(args) {
                Some(columns) => self.convert_table(paren, columns),
                None => self.convert_args_as_is(paren),
            }
        } else {
            self.convert_paren_args(args, paren)
        };

        for &child in rest {
            doc += self.convert_expr(child);
        }
        doc
    }

    /// Method chains with at least two calls break before each dot when
    /// they do not fit. Only done where line breaks are free.
    fn convert_chain(&'a self, node: &'a SyntaxNode) -> Option<ArenaDoc<'a>> {
        if self.mode() != Mode::Code {
            return None;
        }
        let (root, segments) = resolve_chain(node);
        let calls = segments.iter().filter(|s| s.args.is_some()).count();
        if calls < 2 {
            return None;
        }
        let chain_nodes = std::iter::successors(Some(node), |n| n.children().next())
            .take_while(|n| matches!(n.kind(), SyntaxKind::FuncCall | SyntaxKind::FieldAccess));
        for link in chain_nodes {
            if self.attrs.is_unformattable(link) {
                return None;
            }
        }

        let root_doc = self.convert_expr(root);
        let links = self.indented(|| {
            self.arena.concat(segments.iter().map(|segment| {
                let mut doc = self.arena.line_()
                    + self.arena.text(".")
                    + self.convert_expr(segment.field);
                if let Some(args) = segment.args {
                    doc += self.convert_args(args, segment.field);
                }
                doc
            }))
        });
        Some(root_doc + links.group())
    }
}

/// Walk down a chain of field accesses and calls. Returns the innermost
/// target and the links in source order.
fn resolve_chain(node: &SyntaxNode) -> (&SyntaxNode, Vec<Segment<'_>>) {
    let mut segments = Vec::new();
    let mut pending_args = None;
    let mut current = node;

    loop {
        let mut significant = current.significant_children();
        match current.kind() {
            SyntaxKind::FuncCall => {
                let Some(callee) = significant.next() else { break };
                if callee.kind() != SyntaxKind::FieldAccess {
                    break;
                }
                pending_args = current.child(SyntaxKind::Args);
                current = callee;
            }
            SyntaxKind::FieldAccess => {
                let (Some(target), Some(field)) = (significant.next(), significant.last()) else {
                    break;
                };
                segments.push(Segment {
                    field,
                    args: pending_args.take(),
                });
                current = target;
            }
            _ => break,
        }
    }

    segments.reverse();
    (current, segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Formatter};
    use typfmt_syntax::parse;

    fn format_width(text: &str, width: usize) -> String {
        Formatter::new(Config::default().with_width(width))
            .format_source(text)
            .unwrap()
    }

    #[test]
    fn chain_segments_in_order() {
        let root = parse("#{ a.b(1).c.d(2) }");
        let block = root.children().nth(1).unwrap();
        let code = block.child(SyntaxKind::Code).unwrap();
        let call = code.significant_children().next().unwrap();
        let (target, segments) = resolve_chain(call);
        assert_eq!(target.text(), "a");
        let fields: Vec<_> = segments.iter().map(|s| s.field.text()).collect();
        assert_eq!(fields, vec!["b", "c", "d"]);
        let calls: Vec<_> = segments.iter().map(|s| s.args.is_some()).collect();
        assert_eq!(calls, vec![true, false, true]);
    }

    #[test]
    fn long_chains_break_in_code() {
        assert_eq!(
            format_width("#{\n  value.first(alpha).second(beta).third(gamma)\n}", 30),
            "#{\n  value\n    .first(alpha)\n    .second(beta)\n    .third(gamma)\n}\n"
        );
    }

    #[test]
    fn short_chains_stay_flat() {
        assert_eq!(
            format_width("#{\n  a.b(1).c(2)\n}", 80),
            "#{\n  a.b(1).c(2)\n}\n"
        );
    }

    #[test]
    fn chains_in_markup_never_break() {
        let text = "#value.first(alpha).second(beta).third(gamma)\n";
        assert_eq!(format_width(text, 20), text);
    }

    #[test]
    fn trailing_content_blocks() {
        assert_eq!(
            format_width("#f(a,b)[x][y]", 80),
            "#f(a, b)[x][y]\n"
        );
    }

    #[test]
    fn comment_in_chain_keeps_source() {
        let text = "#{\n  a\n    // note\n    .b()\n}\n";
        assert_eq!(format_width(text, 80), text);
    }
}
