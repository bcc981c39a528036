use std::fmt;
use std::ops::Range;

use crate::kind::SyntaxKind;

/// Byte range of a node in the source text.
pub type Span = Range<usize>;

/// A syntax error located in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte range of the offending input.
    pub span: Span,
    /// Human-readable description of the problem.
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

/// A node in the lossless syntax tree.
///
/// Concatenating the text of all leaves in order reproduces the source
/// exactly, trivia and malformed input included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    kind: SyntaxKind,
    span: Span,
    repr: Repr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Repr {
    Leaf(String),
    Inner(Vec<SyntaxNode>),
    Error { text: String, message: String },
}

impl SyntaxNode {
    /// Create a token.
    pub fn leaf(kind: SyntaxKind, text: impl Into<String>, offset: usize) -> Self {
        let text = text.into();
        Self {
            kind,
            span: offset..offset + text.len(),
            repr: Repr::Leaf(text),
        }
    }

    /// Create an inner node. `offset` is only used when `children` is empty.
    pub fn inner(kind: SyntaxKind, children: Vec<SyntaxNode>, offset: usize) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => first.span.start..last.span.end,
            _ => offset..offset,
        };
        Self {
            kind,
            span,
            repr: Repr::Inner(children),
        }
    }

    /// Create an error node covering `text`, which may be empty.
    pub fn error(text: impl Into<String>, message: impl Into<String>, offset: usize) -> Self {
        let text = text.into();
        Self {
            kind: SyntaxKind::Error,
            span: offset..offset + text.len(),
            repr: Repr::Error {
                text,
                message: message.into(),
            },
        }
    }

    /// The node's kind.
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// Byte range covered by the node.
    pub fn span(&self) -> Span {
        self.span.clone()
    }

    /// Length of the covered text in bytes.
    pub fn len(&self) -> usize {
        self.span.end - self.span.start
    }

    /// Whether the node covers no text at all.
    pub fn is_empty(&self) -> bool {
        self.span.start == self.span.end
    }

    /// Whether this is a token or error rather than an inner node.
    pub fn is_leaf(&self) -> bool {
        !matches!(self.repr, Repr::Inner(_))
    }

    /// The text of a token or error. Inner nodes return `""`; use
    /// [`full_text`](Self::full_text) for those.
    pub fn text(&self) -> &str {
        match &self.repr {
            Repr::Leaf(text) | Repr::Error { text, .. } => text,
            Repr::Inner(_) => "",
        }
    }

    /// Direct children. Empty for leaves.
    pub fn children(&self) -> std::slice::Iter<'_, SyntaxNode> {
        match &self.repr {
            Repr::Inner(children) => children.iter(),
            _ => Default::default(),
        }
    }

    pub(crate) fn convert_to(&mut self, kind: SyntaxKind) {
        self.kind = kind;
    }

    pub(crate) fn children_mut(&mut self) -> &mut [SyntaxNode] {
        match &mut self.repr {
            Repr::Inner(children) => children,
            _ => &mut [],
        }
    }

    /// Children that are not whitespace or comments.
    pub fn significant_children(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children().filter(|child| !child.kind.is_trivia())
    }

    /// The first direct child of the given kind.
    pub fn child(&self, kind: SyntaxKind) -> Option<&SyntaxNode> {
        self.children().find(|child| child.kind == kind)
    }

    /// The source text covered by this node and its descendants.
    pub fn full_text(&self) -> String {
        let mut out = String::with_capacity(self.len());
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match &self.repr {
            Repr::Leaf(text) | Repr::Error { text, .. } => out.push_str(text),
            Repr::Inner(children) => {
                for child in children {
                    child.write_text(out);
                }
            }
        }
    }

    /// Whether the covered source text contains a newline.
    pub fn contains_newline(&self) -> bool {
        match &self.repr {
            Repr::Leaf(text) | Repr::Error { text, .. } => text.contains('\n'),
            Repr::Inner(children) => children.iter().any(SyntaxNode::contains_newline),
        }
    }

    /// Whether the node or any descendant is an error.
    pub fn erroneous(&self) -> bool {
        match &self.repr {
            Repr::Error { .. } => true,
            Repr::Leaf(_) => false,
            Repr::Inner(children) => children.iter().any(SyntaxNode::erroneous),
        }
    }

    /// All errors in the subtree, in source order.
    pub fn errors(&self) -> Vec<SyntaxError> {
        let mut errors = Vec::new();
        self.collect_errors(&mut errors);
        errors
    }

    fn collect_errors(&self, errors: &mut Vec<SyntaxError>) {
        match &self.repr {
            Repr::Error { message, .. } => errors.push(SyntaxError {
                span: self.span.clone(),
                message: message.clone(),
            }),
            Repr::Leaf(_) => {}
            Repr::Inner(children) => {
                for child in children {
                    child.collect_errors(errors);
                }
            }
        }
    }

    /// All leaves of the subtree, in source order.
    pub fn leaves(&self) -> Vec<&SyntaxNode> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a SyntaxNode>) {
        match &self.repr {
            Repr::Inner(children) => {
                for child in children {
                    child.collect_leaves(leaves);
                }
            }
            _ => leaves.push(self),
        }
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let span = format!("{}..{}", self.span.start, self.span.end);
        match &self.repr {
            Repr::Leaf(text) => writeln!(f, "{indent}{:?}: {span} {text:?}", self.kind),
            Repr::Error { text, message } => {
                writeln!(f, "{indent}Error: {span} {text:?} ({message})")
            }
            Repr::Inner(children) => {
                writeln!(f, "{indent}{:?}: {span}", self.kind)?;
                for child in children {
                    child.fmt_tree(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Indented tree dump, one node per line.
impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxNode {
        let callee = SyntaxNode::leaf(SyntaxKind::Ident, "f", 1);
        let args = SyntaxNode::inner(
            SyntaxKind::Args,
            vec![
                SyntaxNode::leaf(SyntaxKind::LeftParen, "(", 2),
                SyntaxNode::leaf(SyntaxKind::Int, "1", 3),
                SyntaxNode::leaf(SyntaxKind::RightParen, ")", 4),
            ],
            2,
        );
        SyntaxNode::inner(
            SyntaxKind::Markup,
            vec![
                SyntaxNode::leaf(SyntaxKind::Hash, "#", 0),
                SyntaxNode::inner(SyntaxKind::FuncCall, vec![callee, args], 1),
            ],
            0,
        )
    }

    #[test]
    fn inner_span_covers_children() {
        let root = sample();
        assert_eq!(root.span(), 0..5);
        assert_eq!(root.full_text(), "#f(1)");
    }

    #[test]
    fn empty_inner_node_is_zero_width() {
        let node = SyntaxNode::inner(SyntaxKind::Markup, vec![], 7);
        assert_eq!(node.span(), 7..7);
        assert!(node.is_empty());
    }

    #[test]
    fn errors_are_collected() {
        let root = SyntaxNode::inner(
            SyntaxKind::Markup,
            vec![
                SyntaxNode::leaf(SyntaxKind::Text, "a", 0),
                SyntaxNode::error("]", "unexpected closing bracket", 1),
            ],
            0,
        );
        assert!(root.erroneous());
        let errors = root.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, 1..2);
        assert_eq!(errors[0].message, "unexpected closing bracket");
    }

    #[test]
    fn leaves_in_order() {
        let root = sample();
        let texts: Vec<_> = root.leaves().iter().map(|leaf| leaf.text()).collect();
        assert_eq!(texts, vec!["#", "f", "(", "1", ")"]);
    }

    #[test]
    fn tree_dump() {
        let dump = sample().to_string();
        assert!(dump.starts_with("Markup: 0..5\n"));
        assert!(dump.contains("  FuncCall: 1..5\n"));
        assert!(dump.contains("      Int: 3..4 \"1\"\n"));
    }
}
