/// How a delimited construct may be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FoldStyle {
    /// On one line when it fits, otherwise one item per line.
    Fit,
    /// Always one item per line.
    Never,
}
