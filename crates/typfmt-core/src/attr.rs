use std::collections::HashMap;

use typfmt_syntax::{SyntaxKind, SyntaxNode};

/// Marker that turns formatting off for the node following the comment.
pub const FORMAT_OFF_MARKER: &str = "@typfmt off";

type NodeKey = (SyntaxKind, usize, usize);

fn key(node: &SyntaxNode) -> NodeKey {
    let span = node.span();
    (node.kind(), span.start, span.end)
}

#[derive(Debug, Default, Clone, Copy)]
struct Attrs {
    format_disabled: bool,
    multiline: bool,
    unformattable: bool,
}

/// Per-node facts computed once before printing.
#[derive(Debug, Default)]
pub struct AttrStore {
    attrs: HashMap<NodeKey, Attrs>,
}

impl AttrStore {
    /// Walk `root` and record the attributes of every node.
    pub fn new(root: &SyntaxNode) -> Self {
        let mut store = Self::default();
        store.compute(root);
        store
    }

    /// The node follows a `@typfmt off` comment and is printed verbatim.
    pub fn is_format_disabled(&self, node: &SyntaxNode) -> bool {
        self.get(node).format_disabled
    }

    /// The source breaks the line right after the node's opening delimiter.
    pub fn is_multiline(&self, node: &SyntaxNode) -> bool {
        self.get(node).multiline
    }

    /// The node holds comments in places the printer cannot keep them.
    pub fn is_unformattable(&self, node: &SyntaxNode) -> bool {
        self.get(node).unformattable
    }

    fn get(&self, node: &SyntaxNode) -> Attrs {
        self.attrs.get(&key(node)).copied().unwrap_or_default()
    }

    fn entry(&mut self, node: &SyntaxNode) -> &mut Attrs {
        self.attrs.entry(key(node)).or_default()
    }

    fn compute(&mut self, node: &SyntaxNode) {
        if node.is_leaf() {
            return;
        }

        if opens_multiline(node) {
            self.entry(node).multiline = true;
        }

        if matches!(node.kind(), SyntaxKind::FieldAccess | SyntaxKind::FuncCall)
            && node.children().any(|child| child.kind().is_comment())
        {
            self.entry(node).unformattable = true;
        }

        let mut disable_next = false;
        for child in node.children() {
            if child.kind().is_comment() {
                disable_next |= child.text().contains(FORMAT_OFF_MARKER);
                continue;
            }
            if child.kind().is_trivia() {
                continue;
            }
            if disable_next {
                self.entry(child).format_disabled = true;
                // `#` only introduces the expression that follows it.
                disable_next = child.kind() == SyntaxKind::Hash;
                continue;
            }
            self.compute(child);
        }
    }
}

/// Whether the whitespace right after the node's opening delimiter contains
/// a newline.
fn opens_multiline(node: &SyntaxNode) -> bool {
    let opener = match node.kind() {
        SyntaxKind::CodeBlock => SyntaxKind::LeftBrace,
        kind if kind.is_list() && kind != SyntaxKind::Parenthesized => SyntaxKind::LeftParen,
        _ => return false,
    };

    let mut children = node.children().skip_while(|child| child.kind() != opener);
    if children.next().is_none() {
        return false;
    }
    let next = match children.next() {
        Some(code) if code.kind() == SyntaxKind::Code => code.children().next(),
        next => next,
    };
    next.is_some_and(|space| space.kind() == SyntaxKind::Space && space.text().contains('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use typfmt_syntax::parse;

    fn find<'a>(node: &'a SyntaxNode, kind: SyntaxKind) -> Option<&'a SyntaxNode> {
        if node.kind() == kind {
            return Some(node);
        }
        node.children().find_map(|child| find(child, kind))
    }

    #[test]
    fn multiline_args() {
        let root = parse("#f(\n  a, b)\n#g(a,\n  b)");
        let store = AttrStore::new(&root);
        let calls: Vec<_> = root
            .children()
            .filter(|c| c.kind() == SyntaxKind::FuncCall)
            .collect();
        let first = find(calls[0], SyntaxKind::Args).unwrap();
        let second = find(calls[1], SyntaxKind::Args).unwrap();
        assert!(store.is_multiline(first));
        assert!(!store.is_multiline(second));
    }

    #[test]
    fn multiline_code_block() {
        let root = parse("#{\n  x\n}");
        let store = AttrStore::new(&root);
        let block = find(&root, SyntaxKind::CodeBlock).unwrap();
        assert!(store.is_multiline(block));

        let root = parse("#{ x }");
        let store = AttrStore::new(&root);
        let block = find(&root, SyntaxKind::CodeBlock).unwrap();
        assert!(!store.is_multiline(block));
    }

    #[test]
    fn format_off_disables_next_expression() {
        let root = parse("// @typfmt off\n#f(a,b)\n#g(a,b)");
        let store = AttrStore::new(&root);
        let calls: Vec<_> = root
            .children()
            .filter(|c| c.kind() == SyntaxKind::FuncCall)
            .collect();
        assert!(store.is_format_disabled(calls[0]));
        assert!(!store.is_format_disabled(calls[1]));
    }

    #[test]
    fn format_off_in_code_block() {
        let root = parse("#{\n  /* @typfmt off */\n  let x = (1,2)\n  let y = 3\n}");
        let store = AttrStore::new(&root);
        let code = find(&root, SyntaxKind::Code).unwrap();
        let lets: Vec<_> = code
            .children()
            .filter(|c| c.kind() == SyntaxKind::LetBinding)
            .collect();
        assert!(store.is_format_disabled(lets[0]));
        assert!(!store.is_format_disabled(lets[1]));
    }

    #[test]
    fn comment_inside_chain_is_unformattable() {
        let root = parse("#{\n  a\n  // note\n  .b()\n}");
        let store = AttrStore::new(&root);
        let access = find(&root, SyntaxKind::FieldAccess).unwrap();
        assert!(store.is_unformattable(access));
    }
}
