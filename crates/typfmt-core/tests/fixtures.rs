//! Formatter fixture and property tests.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use typfmt_core::{Config, Formatter};
use typfmt_syntax::{SyntaxKind, parse};

const COMMENT_ARGS: &str = include_str!("fixtures/comment-args.typ");
const CUBE: &str = include_str!("fixtures/cube.typ");

fn fixtures() -> [(&'static str, &'static str); 2] {
    [("comment-args.typ", COMMENT_ARGS), ("cube.typ", CUBE)]
}

fn format(text: &str, width: usize) -> String {
    Formatter::new(Config::default().with_width(width))
        .format_source(text)
        .unwrap()
}

/// Tokens that carry meaning. Whitespace is re-laid out, trailing commas
/// are added and semicolons dropped, so those are left out.
fn semantic_tokens(text: &str) -> Vec<(SyntaxKind, String)> {
    parse(text)
        .leaves()
        .into_iter()
        .filter(|leaf| {
            !matches!(
                leaf.kind(),
                SyntaxKind::Space | SyntaxKind::Parbreak | SyntaxKind::Comma | SyntaxKind::Semicolon
            )
        })
        .map(|leaf| (leaf.kind(), leaf.text().to_string()))
        .collect()
}

#[test]
fn fixtures_parse_without_errors() {
    for (name, text) in fixtures() {
        let root = parse(text);
        assert!(!root.erroneous(), "{name}: {:?}", root.errors());
        assert_eq!(root.full_text(), text);
    }
}

#[test]
fn fixtures_are_idempotent() {
    for width in [120, 80, 40] {
        for (name, text) in fixtures() {
            let once = format(text, width);
            let twice = format(&once, width);
            assert_eq!(once, twice, "{name} at width {width}");
        }
    }
}

#[test]
fn fixtures_keep_their_tokens() {
    for width in [120, 40] {
        for (name, text) in fixtures() {
            let formatted = format(text, width);
            assert_eq!(
                semantic_tokens(text),
                semantic_tokens(&formatted),
                "{name} at width {width}"
            );
        }
    }
}

#[test]
fn fixture_lines_fit() {
    for (name, text) in fixtures() {
        let formatted = format(text, 120);
        for line in formatted.lines() {
            assert!(line.chars().count() <= 120, "{name}: {line}");
        }
    }
}

#[test]
fn comments_stay_next_to_their_arguments() {
    let formatted = format(COMMENT_ARGS, 120);
    for expected in [
        "#f(1 /* first */, b: /* value */ 2)",
        "#f(/* leading */ 1, c: 3 /* after */)",
        "#f(1, /* between */ b: none)",
        "#let ignored(x, ignored: /* nothing */ none) = x",
        "#ignored(1, ignored: /* still bound */ 2)",
    ] {
        assert!(
            formatted.lines().any(|line| line == expected),
            "missing {expected:?} in\n{formatted}"
        );
    }
}

#[test]
fn table_is_laid_out_in_rows() {
    let formatted = format(COMMENT_ARGS, 120);
    let table = "#table(
  columns: 4,
  align: (left, center, center, right),
  column-gutter: (1em, 2em, 1em),
  row-gutter: (4pt,),
  [*Name*], [*A*], [*B*], [*Total*],
  [x], [1], [2], [3],
  [y], [4], [5], [9],
)
";
    assert!(formatted.ends_with(table), "got\n{formatted}");
}

#[test]
fn cube_loops_are_normalized() {
    let formatted = format(CUBE, 120);
    insta::assert_snapshot!(formatted, @r#"
    // Edges of a cube seen in oblique projection. Every corner spawns one edge
    // per axis by flipping the sign of that coordinate.
    #let corners = (((1, 1, 1), red), ((-1, 1, 1), green), ((1, -1, 1), blue), ((1, 1, -1), black))

    #let project((x, y, z)) = (x + z * 0.5, y + z * 0.3)

    #let edges = {
      let lines = ()
      for ((x, y, z), color) in corners {
        for (dx, dy, dz) in ((-2 * x, 0, 0), (0, -2 * y, 0), (0, 0, -2 * z)) {
          lines.push((project((x, y, z)), project((x + dx, y + dy, z + dz)), color))
        }
      }


      lines
    }

    #for (start, end, color) in edges [
      #line(start: start.map(v => v * 1cm), end: end.map(v => v * 1cm), stroke: color)
    ]

    #let größe = 3
    #for (i, wert) in range(größe).enumerate() {
      [Eintrag #i: #wert \ ]
    }
    "#);
}

#[test]
fn narrow_width_breaks_lists() {
    let formatted = format(CUBE, 60);
    assert!(formatted.contains(
        "#let corners = (\n  ((1, 1, 1), red),\n  ((-1, 1, 1), green),\n  ((1, -1, 1), blue),\n  ((1, 1, -1), black),\n)\n"
    ));
}

#[test]
fn multiline_leaves_in_code_are_kept() {
    for text in [
        "#{\n  let s = \"a\nb\"\n  s\n}\n",
        "#{\n  let r = ```\nx\n  y\n```\n  r\n}\n",
        "#{\n  [\n      deep\n  ]\n}\n",
        "#{\n  (\n    \"one\n two\",\n    [a\n  b],\n  )\n}\n",
    ] {
        for width in [80, 10] {
            assert_eq!(format(text, width), text, "at width {width}");
        }
    }
}

#[test]
fn multiline_comment_in_arguments_is_kept() {
    let text = "#f(a, /* multi\n line */ b)\n";
    let once = format(text, 80);
    assert_eq!(format(&once, 80), once);
    assert_eq!(semantic_tokens(text), semantic_tokens(&once));
    assert!(once.contains("/* multi\n line */"), "got\n{once}");
}

#[test]
fn embedded_context_ends_at_its_body() {
    let text = "#context x+1\n";
    assert_eq!(format(text, 80), text);
    let root = parse(text);
    assert!(root.children().any(|node| node.kind() == SyntaxKind::Text));
}

const KEYWORDS: [&str; 22] = [
    "none", "auto", "true", "false", "not", "and", "or", "let", "set", "show", "context", "if",
    "else", "for", "in", "while", "break", "continue", "return", "import", "include", "as",
];

fn value_source() -> impl Strategy<Value = String> {
    let ident = "[a-z]{1,6}".prop_filter("keywords are not identifiers", |s: &String| {
        !KEYWORDS.contains(&s.as_str())
    });
    let leaf = prop_oneof![
        ident,
        (0u32..1000).prop_map(|n| n.to_string()),
        Just("\"p\nq\"".to_string()),
        Just("```\nx\n  y\n```".to_string()),
        Just("[a]".to_string()),
        Just("[a\n  b]".to_string()),
    ];
    let tree = leaf.prop_recursive(3, 24, 5, |inner| {
        let separators = prop::sample::select(vec![" ", "", "\n  "]);
        let list = (prop::collection::vec(inner.clone(), 0..5), separators)
            .prop_map(|(items, sep)| {
                if items.is_empty() {
                    "()".to_string()
                } else {
                    format!("({},)", items.join(&format!(",{sep}")))
                }
            });
        let block = prop::collection::vec(inner, 0..4)
            .prop_map(|statements| format!("{{{}}}", statements.join("\n")));
        prop_oneof![list, block]
    });
    tree.prop_map(|value| format!("#let x = {value}\n"))
}

proptest! {
    #[test]
    fn formatting_nested_values_is_idempotent(source in value_source(), width in 10usize..100) {
        let once = format(&source, width);
        let twice = format(&once, width);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(semantic_tokens(&source), semantic_tokens(&once));
    }
}
