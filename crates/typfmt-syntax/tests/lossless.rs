//! Lossless parsing tests.

use proptest::prelude::*;
use typfmt_syntax::{SyntaxKind, parse};

const SAMPLES: &[&str] = &[
    "= Heading\n\nSome *strong* and _emph_ text.\n",
    "#let f(x, y: 1) = x + y\n#f(1, y: 2)\n",
    "#table(\n  columns: 3,\n  [a], [b], [c],\n)\n",
    "#for ((x, y), c) in pts { line(start: x, end: y, stroke: c) }\n",
    "#{\n  let a = (1, 2)\n  a.map(x => x * 2).sum()\n}\n",
    "#import \"util.typ\": (a, b as c)\n",
    "```rust\nfn main() {}\n```\n$ a^2 + b^2 = c^2 $\n",
    "#f(a /* one */, b: /* two */ 3) // trailing\n",
];

#[test]
fn samples_round_trip() {
    for sample in SAMPLES {
        let root = parse(sample);
        assert_eq!(root.full_text(), *sample);
        assert_eq!(root.kind(), SyntaxKind::Markup);
        assert!(!root.erroneous(), "unexpected errors in {sample:?}: {:?}", root.errors());
    }
}

#[test]
fn spans_are_contiguous() {
    for sample in SAMPLES {
        let root = parse(sample);
        let mut offset = 0;
        for leaf in root.leaves() {
            assert_eq!(leaf.span().start, offset);
            offset = leaf.span().end;
        }
        assert_eq!(offset, sample.len());
    }
}

proptest! {
    #[test]
    fn parse_is_lossless(text in "[a-z0-9 #()\\[\\]{}:,.;\"$*_=+/<>@`\\\\\n\t字-]{0,80}") {
        let root = parse(&text);
        prop_assert_eq!(root.full_text(), text);
    }

    #[test]
    fn parse_is_lossless_for_code(body in "[a-z0-9 ()\\[\\]{}:,.;=+*/<>\"\n-]{0,60}") {
        let text = format!("#{{{body}}}");
        let root = parse(&text);
        prop_assert_eq!(root.full_text(), text);
    }
}
