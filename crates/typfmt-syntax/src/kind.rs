use std::fmt;

/// Every token and node kind in a document tree.
///
/// Leaves (tokens) and inner nodes share one enum so that a [`SyntaxNode`]
/// can be matched on a single value regardless of its shape.
///
/// [`SyntaxNode`]: crate::SyntaxNode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SyntaxKind {
    /// End of input, or the end of an embedded statement at a newline.
    End,
    /// Malformed input.
    Error,

    // Trivia
    /// Whitespace with at most one newline.
    Space,
    /// Whitespace with two or more newlines in markup.
    Parbreak,
    /// `// ...` up to the end of the line.
    LineComment,
    /// `/* ... */`, possibly nested.
    BlockComment,

    // Markup tokens
    /// A run of plain text.
    Text,
    /// A backslash followed by whitespace.
    Linebreak,
    /// An escape sequence like `\#` or `\u{1F600}`.
    Escape,
    /// A shorthand like `~`, `--` or `...`.
    Shorthand,
    /// A straight quote that becomes a typographic one.
    SmartQuote,
    /// `*`: strong delimiter in markup, multiplication in code.
    Star,
    /// `_`: emphasis delimiter in markup, placeholder in code.
    Underscore,
    /// Inline or block raw text, fences included.
    Raw,
    /// A bare URL.
    Link,
    /// `<label>`.
    Label,
    /// `@reference`.
    Ref,
    /// `=`, `==`, ... at the start of a line.
    HeadingMarker,
    /// `-` at the start of a line.
    ListMarker,
    /// `+` or `1.` at the start of a line.
    EnumMarker,
    /// `/` at the start of a line.
    TermMarker,
    /// `$ ... $`, kept verbatim.
    Equation,
    /// `#`, introducing embedded code.
    Hash,

    // Code tokens
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `..`
    Dots,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `/`
    Slash,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    ExclEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `+=`
    PlusEq,
    /// `-=`
    HyphEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `=>`
    Arrow,
    /// An identifier.
    Ident,
    /// `none`
    None,
    /// `auto`
    Auto,
    /// `true` or `false`
    Bool,
    /// An integer literal.
    Int,
    /// A floating-point literal.
    Float,
    /// A number with a unit, like `12pt` or `50%`.
    Numeric,
    /// A quoted string.
    Str,
    /// `not`
    Not,
    /// `and`
    And,
    /// `or`
    Or,
    /// `let`
    Let,
    /// `set`
    Set,
    /// `show`
    Show,
    /// `context`
    Context,
    /// `if`
    If,
    /// `else`
    Else,
    /// `for`
    For,
    /// `in`
    In,
    /// `while`
    While,
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `return`
    Return,
    /// `import`
    Import,
    /// `include`
    Include,
    /// `as`
    As,

    // Inner nodes
    /// A sequence of markup tokens and embedded code.
    Markup,
    /// Statements inside a code block.
    Code,
    /// `{ ... }`
    CodeBlock,
    /// `[ ... ]`
    ContentBlock,
    /// `(expr)`
    Parenthesized,
    /// `(a, b)`
    Array,
    /// `(a: 1)` or `(:)`
    Dict,
    /// `name: value`
    Named,
    /// `"key": value`
    Keyed,
    /// `..expr` or a bare `..` sink.
    Spread,
    /// `-x`, `+x`, `not x`
    Unary,
    /// `a + b`
    Binary,
    /// `target.field`
    FieldAccess,
    /// `callee(args)[content]`
    FuncCall,
    /// The argument list of a call.
    Args,
    /// `(params) => body` or `name(params) = body`.
    Closure,
    /// Closure parameters.
    Params,
    /// A destructuring pattern, `(a, ..rest)`.
    Destructuring,
    /// `let pattern = value`
    LetBinding,
    /// `set target(args) if cond`
    SetRule,
    /// `show selector: transform`
    ShowRule,
    /// `context expr`
    Contextual,
    /// `if cond body else body`
    Conditional,
    /// `while cond body`
    WhileLoop,
    /// `for pattern in iterable body`
    ForLoop,
    /// `import source: items`
    ModuleImport,
    /// The item list of an import.
    ImportItems,
    /// `path as name` inside an import list.
    RenamedImportItem,
    /// `include source`
    ModuleInclude,
    /// `break`
    LoopBreak,
    /// `continue`
    LoopContinue,
    /// `return value`
    FuncReturn,
}

impl SyntaxKind {
    /// Whitespace and comments.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Space | Self::Parbreak | Self::LineComment | Self::BlockComment
        )
    }

    /// Line or block comment.
    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Reserved words of the code grammar.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::Not
                | Self::And
                | Self::Or
                | Self::Let
                | Self::Set
                | Self::Show
                | Self::Context
                | Self::If
                | Self::Else
                | Self::For
                | Self::In
                | Self::While
                | Self::Break
                | Self::Continue
                | Self::Return
                | Self::Import
                | Self::Include
                | Self::As
                | Self::None
                | Self::Auto
                | Self::Bool
        )
    }

    /// Keywords that introduce an expression with its own grammar.
    pub fn starts_keyword_expr(self) -> bool {
        matches!(
            self,
            Self::Let
                | Self::Set
                | Self::Show
                | Self::Context
                | Self::If
                | Self::For
                | Self::While
                | Self::Break
                | Self::Continue
                | Self::Return
                | Self::Import
                | Self::Include
        )
    }

    /// Keywords of statements. Embedded in markup, a statement runs to the
    /// end of the line and may be closed by `;`. Every other embedded
    /// expression is atomic.
    pub fn is_stmt_keyword(self) -> bool {
        matches!(
            self,
            Self::Let | Self::Set | Self::Show | Self::Import | Self::Include | Self::Return
        )
    }

    /// Comma-separated nodes enclosed in parentheses.
    pub fn is_list(self) -> bool {
        matches!(
            self,
            Self::Parenthesized
                | Self::Array
                | Self::Dict
                | Self::Params
                | Self::Destructuring
                | Self::Args
                | Self::ImportItems
        )
    }

    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::End => "end of input",
            Self::Error => "syntax error",
            Self::Space => "space",
            Self::Parbreak => "paragraph break",
            Self::LineComment => "line comment",
            Self::BlockComment => "block comment",
            Self::Text => "text",
            Self::Linebreak => "linebreak",
            Self::Escape => "escape sequence",
            Self::Shorthand => "shorthand",
            Self::SmartQuote => "smart quote",
            Self::Star => "star",
            Self::Underscore => "underscore",
            Self::Raw => "raw block",
            Self::Link => "link",
            Self::Label => "label",
            Self::Ref => "reference",
            Self::HeadingMarker => "heading marker",
            Self::ListMarker => "list marker",
            Self::EnumMarker => "enum marker",
            Self::TermMarker => "term list marker",
            Self::Equation => "equation",
            Self::Hash => "hash",
            Self::LeftBrace => "opening brace",
            Self::RightBrace => "closing brace",
            Self::LeftBracket => "opening bracket",
            Self::RightBracket => "closing bracket",
            Self::LeftParen => "opening paren",
            Self::RightParen => "closing paren",
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::Colon => "colon",
            Self::Dot => "dot",
            Self::Dots => "dots",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Slash => "slash",
            Self::Eq => "assignment operator",
            Self::EqEq => "equality operator",
            Self::ExclEq => "inequality operator",
            Self::Lt => "less-than operator",
            Self::LtEq => "less-than or equal operator",
            Self::Gt => "greater-than operator",
            Self::GtEq => "greater-than or equal operator",
            Self::PlusEq => "add-assign operator",
            Self::HyphEq => "subtract-assign operator",
            Self::StarEq => "multiply-assign operator",
            Self::SlashEq => "divide-assign operator",
            Self::Arrow => "arrow",
            Self::Ident => "identifier",
            Self::None => "`none`",
            Self::Auto => "`auto`",
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Numeric => "numeric value",
            Self::Str => "string",
            Self::Not => "keyword `not`",
            Self::And => "keyword `and`",
            Self::Or => "keyword `or`",
            Self::Let => "keyword `let`",
            Self::Set => "keyword `set`",
            Self::Show => "keyword `show`",
            Self::Context => "keyword `context`",
            Self::If => "keyword `if`",
            Self::Else => "keyword `else`",
            Self::For => "keyword `for`",
            Self::In => "keyword `in`",
            Self::While => "keyword `while`",
            Self::Break => "keyword `break`",
            Self::Continue => "keyword `continue`",
            Self::Return => "keyword `return`",
            Self::Import => "keyword `import`",
            Self::Include => "keyword `include`",
            Self::As => "keyword `as`",
            Self::Markup => "markup",
            Self::Code => "code",
            Self::CodeBlock => "code block",
            Self::ContentBlock => "content block",
            Self::Parenthesized => "group",
            Self::Array => "array",
            Self::Dict => "dictionary",
            Self::Named => "named pair",
            Self::Keyed => "keyed pair",
            Self::Spread => "spread",
            Self::Unary => "unary expression",
            Self::Binary => "binary expression",
            Self::FieldAccess => "field access",
            Self::FuncCall => "function call",
            Self::Args => "call arguments",
            Self::Closure => "closure",
            Self::Params => "closure parameters",
            Self::Destructuring => "destructuring pattern",
            Self::LetBinding => "`let` expression",
            Self::SetRule => "`set` expression",
            Self::ShowRule => "`show` expression",
            Self::Contextual => "`context` expression",
            Self::Conditional => "`if` expression",
            Self::WhileLoop => "while-loop expression",
            Self::ForLoop => "for-loop expression",
            Self::ModuleImport => "`import` expression",
            Self::ImportItems => "import items",
            Self::RenamedImportItem => "renamed import item",
            Self::ModuleInclude => "`include` expression",
            Self::LoopBreak => "`break` expression",
            Self::LoopContinue => "`continue` expression",
            Self::FuncReturn => "`return` expression",
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
