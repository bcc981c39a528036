use logos::Logos;

use crate::kind::SyntaxKind;

/// A single token with its byte range in the source.
///
/// Lexing never fails: malformed input becomes a token of kind
/// [`SyntaxKind::Error`] (or a terminated-by-EOF token) carrying `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: SyntaxKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// Description of the problem, if the token is malformed.
    pub error: Option<&'static str>,
}

impl Token {
    fn new(kind: SyntaxKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            error: None,
        }
    }

    fn malformed(kind: SyntaxKind, start: usize, end: usize, error: &'static str) -> Self {
        Self {
            kind,
            start,
            end,
            error: Some(error),
        }
    }

    /// The slice of `text` this token covers.
    pub fn text<'s>(&self, text: &'s str) -> &'s str {
        &text[self.start..self.end]
    }
}

/// Internal logos token for code mode. Converted to [`SyntaxKind`] by
/// [`lex_code`], which also handles the tokens logos cannot express
/// (nested block comments, equations, non-ASCII identifiers).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum CodeToken {
    #[regex(r"[ \t\r\n]+")]
    Space,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*")]
    BlockCommentStart,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token(".")]
    Dot,

    #[token("..")]
    Dots,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("=")]
    Eq,

    #[token("==")]
    EqEq,

    #[token("!=")]
    ExclEq,

    #[token("<")]
    Lt,

    #[token("<=")]
    LtEq,

    #[token(">")]
    Gt,

    #[token(">=")]
    GtEq,

    #[token("+=")]
    PlusEq,

    #[token("-=")]
    HyphEq,

    #[token("*=")]
    StarEq,

    #[token("/=")]
    SlashEq,

    #[token("=>")]
    Arrow,

    #[token("_", priority = 3)]
    Underscore,

    #[token("#")]
    Hash,

    #[token("$")]
    Dollar,

    #[regex(r#""([^"\\]|\\.)*""#)]
    Str,

    #[regex(r#""([^"\\]|\\.)*"#)]
    UnclosedStr,

    #[regex(r"[0-9]+")]
    #[regex(r"0x[0-9a-fA-F]+")]
    #[regex(r"0o[0-7]+")]
    #[regex(r"0b[01]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[regex(r"([0-9]+(\.[0-9]+)?|\.[0-9]+)([eE][+-]?[0-9]+)?(pt|mm|cm|in|em|deg|rad|fr|%)")]
    Numeric,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[token("none")]
    None,

    #[token("auto")]
    Auto,

    #[token("true")]
    #[token("false")]
    Bool,

    #[token("not")]
    Not,

    #[token("and")]
    And,

    #[token("or")]
    Or,

    #[token("let")]
    Let,

    #[token("set")]
    Set,

    #[token("show")]
    Show,

    #[token("context")]
    Context,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("for")]
    For,

    #[token("in")]
    In,

    #[token("while")]
    While,

    #[token("break")]
    Break,

    #[token("continue")]
    Continue,

    #[token("return")]
    Return,

    #[token("import")]
    Import,

    #[token("include")]
    Include,

    #[token("as")]
    As,
}

impl CodeToken {
    fn kind(self) -> SyntaxKind {
        match self {
            CodeToken::Space => SyntaxKind::Space,
            CodeToken::LineComment => SyntaxKind::LineComment,
            CodeToken::BlockCommentStart => SyntaxKind::BlockComment,
            CodeToken::LeftBrace => SyntaxKind::LeftBrace,
            CodeToken::RightBrace => SyntaxKind::RightBrace,
            CodeToken::LeftBracket => SyntaxKind::LeftBracket,
            CodeToken::RightBracket => SyntaxKind::RightBracket,
            CodeToken::LeftParen => SyntaxKind::LeftParen,
            CodeToken::RightParen => SyntaxKind::RightParen,
            CodeToken::Comma => SyntaxKind::Comma,
            CodeToken::Semicolon => SyntaxKind::Semicolon,
            CodeToken::Colon => SyntaxKind::Colon,
            CodeToken::Dot => SyntaxKind::Dot,
            CodeToken::Dots => SyntaxKind::Dots,
            CodeToken::Plus => SyntaxKind::Plus,
            CodeToken::Minus => SyntaxKind::Minus,
            CodeToken::Star => SyntaxKind::Star,
            CodeToken::Slash => SyntaxKind::Slash,
            CodeToken::Eq => SyntaxKind::Eq,
            CodeToken::EqEq => SyntaxKind::EqEq,
            CodeToken::ExclEq => SyntaxKind::ExclEq,
            CodeToken::Lt => SyntaxKind::Lt,
            CodeToken::LtEq => SyntaxKind::LtEq,
            CodeToken::Gt => SyntaxKind::Gt,
            CodeToken::GtEq => SyntaxKind::GtEq,
            CodeToken::PlusEq => SyntaxKind::PlusEq,
            CodeToken::HyphEq => SyntaxKind::HyphEq,
            CodeToken::StarEq => SyntaxKind::StarEq,
            CodeToken::SlashEq => SyntaxKind::SlashEq,
            CodeToken::Arrow => SyntaxKind::Arrow,
            CodeToken::Underscore => SyntaxKind::Underscore,
            CodeToken::Hash => SyntaxKind::Hash,
            CodeToken::Dollar => SyntaxKind::Equation,
            CodeToken::Str | CodeToken::UnclosedStr => SyntaxKind::Str,
            CodeToken::Int => SyntaxKind::Int,
            CodeToken::Float => SyntaxKind::Float,
            CodeToken::Numeric => SyntaxKind::Numeric,
            CodeToken::Ident => SyntaxKind::Ident,
            CodeToken::None => SyntaxKind::None,
            CodeToken::Auto => SyntaxKind::Auto,
            CodeToken::Bool => SyntaxKind::Bool,
            CodeToken::Not => SyntaxKind::Not,
            CodeToken::And => SyntaxKind::And,
            CodeToken::Or => SyntaxKind::Or,
            CodeToken::Let => SyntaxKind::Let,
            CodeToken::Set => SyntaxKind::Set,
            CodeToken::Show => SyntaxKind::Show,
            CodeToken::Context => SyntaxKind::Context,
            CodeToken::If => SyntaxKind::If,
            CodeToken::Else => SyntaxKind::Else,
            CodeToken::For => SyntaxKind::For,
            CodeToken::In => SyntaxKind::In,
            CodeToken::While => SyntaxKind::While,
            CodeToken::Break => SyntaxKind::Break,
            CodeToken::Continue => SyntaxKind::Continue,
            CodeToken::Return => SyntaxKind::Return,
            CodeToken::Import => SyntaxKind::Import,
            CodeToken::Include => SyntaxKind::Include,
            CodeToken::As => SyntaxKind::As,
        }
    }
}

/// Lex one code-mode token starting at `offset`.
///
/// Returns a token of kind [`SyntaxKind::End`] at the end of input.
pub fn lex_code(text: &str, offset: usize) -> Token {
    let rest = &text[offset..];
    let Some(first) = rest.chars().next() else {
        return Token::new(SyntaxKind::End, offset, offset);
    };

    let mut lexer = CodeToken::lexer(rest);
    let raw = match lexer.next() {
        Some(Ok(raw)) => raw,
        None => return Token::new(SyntaxKind::End, offset, offset),
        Some(Err(())) => {
            if is_id_start(first) {
                return Token::new(SyntaxKind::Ident, offset, offset + scan_ident(rest, 0));
            }
            if first.is_whitespace() {
                return Token::new(SyntaxKind::Space, offset, offset + scan_space(rest).0);
            }
            if first == '`' {
                return raw(rest, offset);
            }
            return Token::malformed(
                SyntaxKind::Error,
                offset,
                offset + first.len_utf8(),
                "unexpected character",
            );
        }
    };

    let end = offset + lexer.span().end;
    let kind = raw.kind();
    match raw {
        CodeToken::BlockCommentStart => block_comment(rest, offset),
        CodeToken::Dollar => equation(rest, offset),
        CodeToken::UnclosedStr => Token::malformed(kind, offset, end, "unclosed string"),
        CodeToken::Lt => {
            let len = scan_label_name(&rest[1..]);
            if len > 0 && rest[1 + len..].starts_with('>') {
                Token::new(SyntaxKind::Label, offset, offset + len + 2)
            } else {
                Token::new(kind, offset, end)
            }
        }
        CodeToken::Ident => Token::new(kind, offset, offset + scan_ident(rest, end - offset)),
        _ if kind.is_keyword() => {
            // `letä` is one identifier, not `let` followed by `ä`.
            let extended = scan_ident(rest, end - offset);
            if extended > end - offset {
                Token::new(SyntaxKind::Ident, offset, offset + extended)
            } else {
                Token::new(kind, offset, end)
            }
        }
        _ => Token::new(kind, offset, end),
    }
}

/// Lex one markup-mode token starting at `offset`.
///
/// Markup lexing depends on context that a regular lexer cannot see, such as
/// whether the token starts a line, so it is written by hand.
pub fn lex_markup(text: &str, offset: usize) -> Token {
    let rest = &text[offset..];
    let Some(c) = rest.chars().next() else {
        return Token::new(SyntaxKind::End, offset, offset);
    };
    let next = rest[c.len_utf8()..].chars().next();
    let at_line_start = at_line_start(text, offset);

    let single = |kind| Token::new(kind, offset, offset + c.len_utf8());

    match c {
        c if c.is_whitespace() => {
            let (len, newlines) = scan_space(rest);
            let kind = if newlines >= 2 {
                SyntaxKind::Parbreak
            } else {
                SyntaxKind::Space
            };
            Token::new(kind, offset, offset + len)
        }
        '/' if next == Some('/') => line_comment(rest, offset),
        '/' if next == Some('*') => block_comment(rest, offset),
        '/' if at_line_start && next.is_none_or(char::is_whitespace) => {
            single(SyntaxKind::TermMarker)
        }
        '\\' => escape(rest, offset),
        '`' => raw(rest, offset),
        '$' => equation(rest, offset),
        '#' if next.is_some_and(starts_embedded_code) => single(SyntaxKind::Hash),
        '[' => single(SyntaxKind::LeftBracket),
        ']' => single(SyntaxKind::RightBracket),
        '*' | '_' => {
            let prev = text[..offset].chars().next_back();
            let in_word = prev.is_some_and(char::is_alphanumeric)
                && next.is_some_and(char::is_alphanumeric);
            if in_word {
                single(SyntaxKind::Text)
            } else if c == '*' {
                single(SyntaxKind::Star)
            } else {
                single(SyntaxKind::Underscore)
            }
        }
        '<' => {
            let len = scan_label_name(&rest[1..]);
            if len > 0 && rest[1 + len..].starts_with('>') {
                Token::new(SyntaxKind::Label, offset, offset + len + 2)
            } else {
                single(SyntaxKind::Text)
            }
        }
        '@' => {
            let mut len = scan_label_name(&rest[1..]);
            while len > 0 && rest[1..1 + len].ends_with(['.', ':']) {
                len -= 1;
            }
            if len > 0 {
                Token::new(SyntaxKind::Ref, offset, offset + len + 1)
            } else {
                single(SyntaxKind::Text)
            }
        }
        '=' if at_line_start => {
            let len = rest.len() - rest.trim_start_matches('=').len();
            if rest[len..].chars().next().is_none_or(char::is_whitespace) {
                Token::new(SyntaxKind::HeadingMarker, offset, offset + len)
            } else {
                Token::new(SyntaxKind::Text, offset, offset + len)
            }
        }
        '-' if rest.starts_with("---") => Token::new(SyntaxKind::Shorthand, offset, offset + 3),
        '-' if rest.starts_with("--") => Token::new(SyntaxKind::Shorthand, offset, offset + 2),
        '-' if rest.starts_with("-?") => Token::new(SyntaxKind::Shorthand, offset, offset + 2),
        '-' if at_line_start && next.is_none_or(char::is_whitespace) => {
            single(SyntaxKind::ListMarker)
        }
        '+' if at_line_start && next.is_none_or(char::is_whitespace) => {
            single(SyntaxKind::EnumMarker)
        }
        '0'..='9' if at_line_start => {
            let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            let after = &rest[digits..];
            if after.starts_with('.') && after[1..].chars().next().is_none_or(char::is_whitespace)
            {
                Token::new(SyntaxKind::EnumMarker, offset, offset + digits + 1)
            } else {
                text_run(rest, offset)
            }
        }
        '.' if rest.starts_with("...") => Token::new(SyntaxKind::Shorthand, offset, offset + 3),
        '~' => single(SyntaxKind::Shorthand),
        '\'' | '"' => single(SyntaxKind::SmartQuote),
        'h' if rest.starts_with("http://") || rest.starts_with("https://") => link(rest, offset),
        '#' | '-' | '+' | '.' | '=' | '/' => single(SyntaxKind::Text),
        _ => text_run(rest, offset),
    }
}

/// Whether `c` can follow `#` to start embedded code.
fn starts_embedded_code(c: char) -> bool {
    is_id_start(c) || matches!(c, '(' | '{' | '[' | '"' | '$') || c.is_ascii_digit()
}

/// Whether `c` can start an identifier.
pub fn is_id_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Whether `c` can continue an identifier.
pub fn is_id_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Whether `text` is a valid identifier.
pub fn is_ident(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(is_id_start) && chars.all(is_id_continue)
}

fn at_line_start(text: &str, offset: usize) -> bool {
    text[..offset]
        .chars()
        .rev()
        .take_while(|&c| c != '\n')
        .all(|c| c == ' ' || c == '\t')
}

/// Extend an identifier whose first `start` bytes are already accepted.
fn scan_ident(rest: &str, start: usize) -> usize {
    let tail = &rest[start..];
    let len = tail.len() - tail.trim_start_matches(is_id_continue).len();
    start + len
}

/// Length of leading whitespace and the number of newlines in it.
/// `\r\n` counts as a single newline.
fn scan_space(rest: &str) -> (usize, usize) {
    let len = rest.len() - rest.trim_start().len();
    let space = &rest[..len];
    let newlines = space.matches('\n').count() + space.matches('\r').count()
        - space.matches("\r\n").count();
    (len, newlines)
}

fn scan_label_name(rest: &str) -> usize {
    rest.len()
        - rest
            .trim_start_matches(|c: char| is_id_continue(c) || c == '.' || c == ':')
            .len()
}

fn line_comment(rest: &str, offset: usize) -> Token {
    let len = rest.find('\n').unwrap_or(rest.len());
    // A `\r` before the newline belongs to the line break, not the comment.
    let len = if rest[..len].ends_with('\r') { len - 1 } else { len };
    Token::new(SyntaxKind::LineComment, offset, offset + len)
}

fn block_comment(rest: &str, offset: usize) -> Token {
    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return Token::new(SyntaxKind::BlockComment, offset, offset + i);
                }
            }
            _ => i += 1,
        }
    }
    Token::malformed(
        SyntaxKind::BlockComment,
        offset,
        offset + rest.len(),
        "unclosed block comment",
    )
}

fn escape(rest: &str, offset: usize) -> Token {
    let mut chars = rest[1..].chars();
    match chars.next() {
        None => Token::new(SyntaxKind::Linebreak, offset, offset + 1),
        Some(c) if c.is_whitespace() => Token::new(SyntaxKind::Linebreak, offset, offset + 1),
        Some('u') if rest[2..].starts_with('{') => match rest.find('}') {
            Some(close) => Token::new(SyntaxKind::Escape, offset, offset + close + 1),
            None => Token::malformed(
                SyntaxKind::Escape,
                offset,
                offset + rest.len(),
                "unclosed unicode escape sequence",
            ),
        },
        Some(c) => Token::new(SyntaxKind::Escape, offset, offset + 1 + c.len_utf8()),
    }
}

fn raw(rest: &str, offset: usize) -> Token {
    let fence = rest.len() - rest.trim_start_matches('`').len();
    if fence == 2 {
        return Token::new(SyntaxKind::Raw, offset, offset + 2);
    }
    let delimiter = &rest[..fence];
    match rest[fence..].find(delimiter) {
        Some(close) => Token::new(SyntaxKind::Raw, offset, offset + fence + close + fence),
        None => Token::malformed(
            SyntaxKind::Raw,
            offset,
            offset + rest.len(),
            "unclosed raw text",
        ),
    }
}

fn equation(rest: &str, offset: usize) -> Token {
    let mut chars = rest.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => {
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => break,
                        _ => {}
                    }
                }
            }
            '$' => return Token::new(SyntaxKind::Equation, offset, offset + i + 1),
            _ => {}
        }
    }
    Token::malformed(
        SyntaxKind::Equation,
        offset,
        offset + rest.len(),
        "unclosed equation",
    )
}

fn link(rest: &str, offset: usize) -> Token {
    let mut len = rest.len()
        - rest
            .trim_start_matches(|c: char| !c.is_whitespace() && !matches!(c, '<' | '>' | '"' | '[' | ']'))
            .len();
    while len > 0 && rest[..len].ends_with(['.', ',', ';', ':', '!', '?', ')']) {
        len -= 1;
    }
    Token::new(SyntaxKind::Link, offset, offset + len)
}

fn text_run(rest: &str, offset: usize) -> Token {
    let first = rest.chars().next().map_or(0, char::len_utf8);
    let tail = &rest[first..];
    let len = tail.len()
        - tail
            .trim_start_matches(|c: char| {
                !c.is_whitespace()
                    && !matches!(
                        c,
                        '\\' | '/'
                            | '['
                            | ']'
                            | '#'
                            | '$'
                            | '*'
                            | '_'
                            | '<'
                            | '@'
                            | '~'
                            | '\''
                            | '"'
                            | '`'
                            | '-'
                            | '.'
                    )
            })
            .len();
    Token::new(SyntaxKind::Text, offset, offset + first + len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_kinds(text: &str) -> Vec<(SyntaxKind, &str)> {
        let mut offset = 0;
        let mut out = Vec::new();
        loop {
            let token = lex_code(text, offset);
            if token.kind == SyntaxKind::End {
                break;
            }
            out.push((token.kind, token.text(text)));
            offset = token.end;
        }
        out
    }

    fn markup_kinds(text: &str) -> Vec<(SyntaxKind, &str)> {
        let mut offset = 0;
        let mut out = Vec::new();
        loop {
            let token = lex_markup(text, offset);
            if token.kind == SyntaxKind::End {
                break;
            }
            out.push((token.kind, token.text(text)));
            offset = token.end;
        }
        out
    }

    #[test]
    fn lex_call_with_comment() {
        use SyntaxKind::*;
        assert_eq!(
            code_kinds("f(a /* c */, b: 1)"),
            vec![
                (Ident, "f"),
                (LeftParen, "("),
                (Ident, "a"),
                (Space, " "),
                (BlockComment, "/* c */"),
                (Comma, ","),
                (Space, " "),
                (Ident, "b"),
                (Colon, ":"),
                (Space, " "),
                (Int, "1"),
                (RightParen, ")"),
            ]
        );
    }

    #[test]
    fn lex_numbers() {
        use SyntaxKind::*;
        assert_eq!(
            code_kinds("1 2.5 12pt 50% 1fr 0xff 1e3"),
            vec![
                (Int, "1"),
                (Space, " "),
                (Float, "2.5"),
                (Space, " "),
                (Numeric, "12pt"),
                (Space, " "),
                (Numeric, "50%"),
                (Space, " "),
                (Numeric, "1fr"),
                (Space, " "),
                (Int, "0xff"),
                (Space, " "),
                (Float, "1e3"),
            ]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        use SyntaxKind::*;
        assert_eq!(
            code_kinds("let letter not-x in"),
            vec![
                (Let, "let"),
                (Space, " "),
                (Ident, "letter"),
                (Space, " "),
                (Ident, "not-x"),
                (Space, " "),
                (In, "in"),
            ]
        );
    }

    #[test]
    fn lone_underscore_is_a_placeholder() {
        use SyntaxKind::*;
        assert_eq!(
            code_kinds("_ _x x_"),
            vec![
                (Underscore, "_"),
                (Space, " "),
                (Ident, "_x"),
                (Space, " "),
                (Ident, "x_"),
            ]
        );
    }

    #[test]
    fn unicode_identifiers() {
        use SyntaxKind::*;
        assert_eq!(
            code_kinds("for 字 in 数组"),
            vec![
                (For, "for"),
                (Space, " "),
                (Ident, "字"),
                (Space, " "),
                (In, "in"),
                (Space, " "),
                (Ident, "数组"),
            ]
        );
        assert_eq!(code_kinds("café"), vec![(Ident, "café")]);
        assert_eq!(code_kinds("letä"), vec![(Ident, "letä")]);
    }

    #[test]
    fn code_labels_and_raw() {
        use SyntaxKind::*;
        assert_eq!(
            code_kinds("show <intro>: `x`"),
            vec![
                (Show, "show"),
                (Space, " "),
                (Label, "<intro>"),
                (Colon, ":"),
                (Space, " "),
                (Raw, "`x`"),
            ]
        );
        assert_eq!(
            code_kinds("a<b"),
            vec![(Ident, "a"), (Lt, "<"), (Ident, "b")]
        );
    }

    #[test]
    fn nested_block_comment() {
        let token = lex_code("/* a /* b */ c */ x", 0);
        assert_eq!(token.kind, SyntaxKind::BlockComment);
        assert_eq!(token.end, 17);
        assert!(token.error.is_none());
    }

    #[test]
    fn unclosed_tokens_report_errors() {
        assert_eq!(lex_code("/* open", 0).error, Some("unclosed block comment"));
        assert_eq!(lex_code("\"open", 0).error, Some("unclosed string"));
        assert_eq!(lex_markup("`open", 0).error, Some("unclosed raw text"));
        assert_eq!(lex_markup("$x + 1", 0).error, Some("unclosed equation"));
    }

    #[test]
    fn strings_with_escapes() {
        let token = lex_code(r#""a \" b" x"#, 0);
        assert_eq!(token.kind, SyntaxKind::Str);
        assert_eq!(token.end, 8);
    }

    #[test]
    fn equation_skips_strings_and_escapes() {
        let token = lex_code(r#"$ "$" \$ x $ rest"#, 0);
        assert_eq!(token.kind, SyntaxKind::Equation);
        assert_eq!(token.end, 12);
    }

    #[test]
    fn markup_line_markers() {
        use SyntaxKind::*;
        assert_eq!(
            markup_kinds("= Title\n- item"),
            vec![
                (HeadingMarker, "="),
                (Space, " "),
                (Text, "Title"),
                (Space, "\n"),
                (ListMarker, "-"),
                (Space, " "),
                (Text, "item"),
            ]
        );
    }

    #[test]
    fn markup_hash_and_brackets() {
        use SyntaxKind::*;
        assert_eq!(
            markup_kinds("a #f[b] # c"),
            vec![
                (Text, "a"),
                (Space, " "),
                (Hash, "#"),
                (Text, "f"),
                (LeftBracket, "["),
                (Text, "b"),
                (RightBracket, "]"),
                (Space, " "),
                (Text, "#"),
                (Space, " "),
                (Text, "c"),
            ]
        );
    }

    #[test]
    fn markup_parbreak_and_comments() {
        use SyntaxKind::*;
        assert_eq!(
            markup_kinds("a // note\n\nb /* x */"),
            vec![
                (Text, "a"),
                (Space, " "),
                (LineComment, "// note"),
                (Parbreak, "\n\n"),
                (Text, "b"),
                (Space, " "),
                (BlockComment, "/* x */"),
            ]
        );
    }

    #[test]
    fn markup_raw_fences() {
        let text = "```rust\nlet x = `a`;\n``` after";
        let token = lex_markup(text, 0);
        assert_eq!(token.kind, SyntaxKind::Raw);
        assert_eq!(token.text(text), "```rust\nlet x = `a`;\n```");
        assert_eq!(lex_markup("`` x", 0).end, 2);
    }

    #[test]
    fn markup_escapes_and_linebreaks() {
        use SyntaxKind::*;
        assert_eq!(
            markup_kinds(r"\# \u{41}\ x"),
            vec![
                (Escape, r"\#"),
                (Space, " "),
                (Escape, r"\u{41}"),
                (Linebreak, r"\"),
                (Space, " "),
                (Text, "x"),
            ]
        );
    }

    #[test]
    fn markup_labels_refs_and_links() {
        use SyntaxKind::*;
        assert_eq!(
            markup_kinds("<fig:a> @fig:a. https://typst.app."),
            vec![
                (Label, "<fig:a>"),
                (Space, " "),
                (Ref, "@fig:a"),
                (Text, "."),
                (Space, " "),
                (Link, "https://typst.app"),
                (Text, "."),
            ]
        );
    }

    #[test]
    fn underscores_inside_words_are_text() {
        use SyntaxKind::*;
        assert_eq!(
            markup_kinds("snake_case _em_"),
            vec![
                (Text, "snake"),
                (Text, "_"),
                (Text, "case"),
                (Space, " "),
                (Underscore, "_"),
                (Text, "em"),
                (Underscore, "_"),
            ]
        );
    }

    #[test]
    fn identifier_helpers() {
        assert!(is_ident("column-gutter"));
        assert!(is_ident("字"));
        assert!(!is_ident("1x"));
        assert!(!is_ident(""));
    }
}
