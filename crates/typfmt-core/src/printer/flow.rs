use pretty::DocAllocator;
use typfmt_syntax::{SyntaxKind, SyntaxNode};

use super::{ArenaDoc, Printer};

/// Nodes printed as a space-separated run of their children.
pub(super) fn is_flow(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Closure
            | SyntaxKind::Unary
            | SyntaxKind::Binary
            | SyntaxKind::Named
            | SyntaxKind::Keyed
            | SyntaxKind::Spread
            | SyntaxKind::LetBinding
            | SyntaxKind::SetRule
            | SyntaxKind::ShowRule
            | SyntaxKind::Contextual
            | SyntaxKind::Conditional
            | SyntaxKind::WhileLoop
            | SyntaxKind::ForLoop
            | SyntaxKind::ModuleImport
            | SyntaxKind::RenamedImportItem
            | SyntaxKind::ModuleInclude
            | SyntaxKind::LoopBreak
            | SyntaxKind::LoopContinue
            | SyntaxKind::FuncReturn
    )
}

/// A child of a flow node and whether it wants spaces around it.
///
/// Two neighbours are separated by a space only when both agree.
pub(super) struct FlowItem<'a> {
    doc: ArenaDoc<'a>,
    space_before: bool,
    space_after: bool,
}

impl<'a> FlowItem<'a> {
    fn new(doc: ArenaDoc<'a>, space_before: bool, space_after: bool) -> Self {
        Self {
            doc,
            space_before,
            space_after,
        }
    }

    fn spaced(doc: ArenaDoc<'a>) -> Self {
        Self::new(doc, true, true)
    }

    fn tight(doc: ArenaDoc<'a>) -> Self {
        Self::new(doc, false, false)
    }

    fn spaced_tight(doc: ArenaDoc<'a>) -> Self {
        Self::new(doc, true, false)
    }

    fn tight_spaced(doc: ArenaDoc<'a>) -> Self {
        Self::new(doc, false, true)
    }
}

impl<'a> Printer<'a> {
    pub(super) fn convert_flow(&'a self, node: &'a SyntaxNode) -> ArenaDoc<'a> {
        let named_closure =
            node.kind() == SyntaxKind::Closure && node.child(SyntaxKind::Eq).is_some();
        self.join_flow(node.children().filter_map(|child| {
            if matches!(child.kind(), SyntaxKind::Space | SyntaxKind::Parbreak) {
                None
            } else {
                Some((child, self.flow_item(node, child, named_closure)))
            }
        }))
    }

    /// Import items written without parentheses: `a, b.c as d`.
    pub(super) fn convert_bare_import_items(&'a self, node: &'a SyntaxNode) -> ArenaDoc<'a> {
        self.join_flow(node.children().filter_map(|child| {
            if child.kind() == SyntaxKind::Space {
                None
            } else {
                Some((child, self.flow_item(node, child, false)))
            }
        }))
    }

    fn join_flow(
        &'a self,
        items: impl Iterator<Item = (&'a SyntaxNode, FlowItem<'a>)>,
    ) -> ArenaDoc<'a> {
        let mut doc = self.arena.nil();
        let mut prev: Option<(bool, bool)> = None;
        let mut after_line_comment = false;

        for (child, item) in items {
            let is_comment = child.kind().is_comment();
            if let Some((space_after, prev_comment)) = prev {
                if after_line_comment {
                    doc += self.arena.hardline();
                } else if (space_after && item.space_before) || prev_comment || is_comment {
                    doc += self.arena.text(" ");
                }
            }
            doc += item.doc;
            prev = Some((item.space_after, is_comment));
            after_line_comment = child.kind() == SyntaxKind::LineComment;
        }

        if after_line_comment {
            doc += self.arena.hardline();
        }
        doc
    }

    fn flow_item(
        &'a self,
        parent: &'a SyntaxNode,
        child: &'a SyntaxNode,
        named_closure: bool,
    ) -> FlowItem<'a> {
        if child.kind().is_comment() {
            return FlowItem::spaced(self.convert_comment(child));
        }

        let doc = self.convert_expr(child);
        match child.kind() {
            SyntaxKind::Colon | SyntaxKind::Comma => FlowItem::tight_spaced(doc),
            SyntaxKind::Dots => FlowItem::spaced_tight(doc),
            SyntaxKind::Dot => FlowItem::tight(doc),
            SyntaxKind::Plus | SyntaxKind::Minus if parent.kind() == SyntaxKind::Unary => {
                FlowItem::spaced_tight(doc)
            }
            SyntaxKind::Ident if named_closure => FlowItem::spaced_tight(doc),
            SyntaxKind::Params if named_closure => FlowItem::tight_spaced(doc),
            _ => FlowItem::spaced(doc),
        }
    }
}
