//! Recursive-descent parser producing a lossless [`SyntaxNode`] tree.
//!
//! The parser works on one token at a time, lexing on demand so that it can
//! switch between markup and code mode at `#`, `[` and `{`. Whitespace and
//! comments are flushed into whichever node is being built when the next
//! significant token is consumed, so every byte of the input ends up in the
//! tree.

use crate::kind::SyntaxKind;
use crate::lexer::{Token, lex_code, lex_markup};
use crate::node::SyntaxNode;

/// Parse a whole document into a `Markup` root node.
pub fn parse(text: &str) -> SyntaxNode {
    let mut p = Parser::new(text);
    markup(&mut p, false);
    SyntaxNode::inner(SyntaxKind::Markup, p.nodes, 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexMode {
    Markup,
    Code,
}

/// How newlines in trivia affect the expression being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NewlineMode {
    /// Embedded statement in markup: a newline ends it.
    Stop,
    /// Statement in a code block: a newline ends it unless the next line
    /// continues with `else` or `.`.
    Continue,
    /// Inside delimiters: newlines are plain whitespace.
    Ignore,
}

struct Parser<'s> {
    text: &'s str,
    pos: usize,
    mode: LexMode,
    newlines: NewlineMode,
    nodes: Vec<SyntaxNode>,
}

impl<'s> Parser<'s> {
    fn new(text: &'s str) -> Self {
        Self {
            text,
            pos: 0,
            mode: LexMode::Markup,
            newlines: NewlineMode::Ignore,
            nodes: Vec::new(),
        }
    }

    fn lex(&self, pos: usize) -> Token {
        match self.mode {
            LexMode::Markup => lex_markup(self.text, pos),
            LexMode::Code => lex_code(self.text, pos),
        }
    }

    /// The next significant token at or after `pos`.
    ///
    /// Returns an `End` token positioned at the offending newline when the
    /// newline mode says the current expression stops there.
    fn peek_from(&self, mut pos: usize) -> Token {
        let mut newline_at = None;
        loop {
            let token = self.lex(pos);
            if token.kind.is_trivia() {
                let is_space = matches!(token.kind, SyntaxKind::Space | SyntaxKind::Parbreak);
                if newline_at.is_none() && is_space && token.text(self.text).contains('\n') {
                    newline_at = Some(token.start);
                }
                pos = token.end;
                continue;
            }
            if let Some(at) = newline_at {
                let stops = match self.newlines {
                    NewlineMode::Stop => true,
                    NewlineMode::Continue => {
                        !matches!(token.kind, SyntaxKind::Else | SyntaxKind::Dot)
                    }
                    NewlineMode::Ignore => false,
                };
                if stops {
                    return Token {
                        kind: SyntaxKind::End,
                        start: at,
                        end: at,
                        error: None,
                    };
                }
            }
            return token;
        }
    }

    fn peek(&self) -> Token {
        self.peek_from(self.pos)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.peek().kind == kind
    }

    /// Whether the very next token, with no trivia in between, has `kind`.
    fn directly_at(&self, kind: SyntaxKind) -> bool {
        self.lex(self.pos).kind == kind
    }

    /// Push trivia up to the next significant token, or up to the newline
    /// that ends the current expression.
    fn flush_trivia(&mut self) {
        let target = self.peek().start;
        while self.pos < target {
            let token = self.lex(self.pos);
            self.bump(token);
        }
    }

    fn bump(&mut self, token: Token) {
        let text = token.text(self.text);
        let node = match token.error {
            Some(message) => SyntaxNode::error(text, message, token.start),
            None => SyntaxNode::leaf(token.kind, text, token.start),
        };
        self.nodes.push(node);
        self.pos = token.end;
    }

    /// Consume the next significant token.
    fn eat(&mut self) {
        self.flush_trivia();
        let token = self.lex(self.pos);
        self.bump(token);
    }

    fn eat_if(&mut self, kind: SyntaxKind) -> bool {
        let at = self.at(kind);
        if at {
            self.eat();
        }
        at
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        let at = self.eat_if(kind);
        if !at {
            self.expected(kind.name());
        }
        at
    }

    fn expect_closing(&mut self, kind: SyntaxKind) {
        if !self.eat_if(kind) {
            self.error_here(format!("unclosed delimiter, expected {}", kind.name()));
        }
    }

    /// Zero-width error at the current position.
    fn error_here(&mut self, message: impl Into<String>) {
        self.nodes.push(SyntaxNode::error("", message, self.pos));
    }

    /// Report that `what` was expected. Consumes the offending token unless
    /// it closes an enclosing construct.
    fn expected(&mut self, what: &str) {
        let token = self.peek();
        match token.kind {
            SyntaxKind::End
            | SyntaxKind::RightParen
            | SyntaxKind::RightBracket
            | SyntaxKind::RightBrace => self.error_here(format!("expected {what}")),
            kind => self.eat_error(format!("expected {what}, found {kind}")),
        }
    }

    fn eat_error(&mut self, message: impl Into<String>) {
        self.flush_trivia();
        let token = self.lex(self.pos);
        self.nodes.push(SyntaxNode::error(
            token.text(self.text),
            message,
            token.start,
        ));
        self.pos = token.end;
    }

    /// Flushes pending trivia and returns the index the next node will get.
    fn marker(&mut self) -> usize {
        self.flush_trivia();
        self.nodes.len()
    }

    /// Wrap the nodes pushed since `m` into an inner node, leaving trailing
    /// trivia outside of it.
    fn wrap(&mut self, m: usize, kind: SyntaxKind) {
        let mut end = self.nodes.len();
        while end > m && self.nodes[end - 1].kind().is_trivia() {
            end -= 1;
        }
        let trailing = self.nodes.split_off(end);
        self.wrap_all(m, kind);
        self.nodes.extend(trailing);
    }

    /// Wrap every node pushed since `m`, trivia included.
    fn wrap_all(&mut self, m: usize, kind: SyntaxKind) {
        let m = m.min(self.nodes.len());
        let children = self.nodes.split_off(m);
        self.nodes.push(SyntaxNode::inner(kind, children, self.pos));
    }

    fn with_modes<T>(
        &mut self,
        mode: LexMode,
        newlines: NewlineMode,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = (self.mode, self.newlines);
        self.mode = mode;
        self.newlines = newlines;
        let out = f(self);
        (self.mode, self.newlines) = saved;
        out
    }
}

/// Markup up to the end of input, or up to an unbalanced `]` when inside a
/// content block. Brackets inside markup are plain text.
fn markup(p: &mut Parser, in_block: bool) {
    let mut depth = 0usize;
    loop {
        let token = lex_markup(p.text, p.pos);
        match token.kind {
            SyntaxKind::End => break,
            SyntaxKind::RightBracket if depth == 0 => {
                if in_block {
                    break;
                }
                p.nodes.push(SyntaxNode::error(
                    token.text(p.text),
                    "unexpected closing bracket",
                    token.start,
                ));
                p.pos = token.end;
            }
            SyntaxKind::LeftBracket | SyntaxKind::RightBracket => {
                if token.kind == SyntaxKind::LeftBracket {
                    depth += 1;
                } else {
                    depth -= 1;
                }
                p.bump(Token {
                    kind: SyntaxKind::Text,
                    ..token
                });
            }
            SyntaxKind::Hash => {
                p.bump(token);
                embedded_code(p);
            }
            _ => p.bump(token),
        }
    }
}

/// Code following `#` in markup.
fn embedded_code(p: &mut Parser) {
    p.with_modes(LexMode::Code, NewlineMode::Stop, |p| {
        let stmt = p.lex(p.pos).kind.is_stmt_keyword();
        code_expr_prec(p, true, 0);
        let semi = if stmt {
            p.at(SyntaxKind::Semicolon)
        } else {
            p.directly_at(SyntaxKind::Semicolon)
        };
        if semi {
            p.eat();
        }
    });
}

fn content_block(p: &mut Parser) {
    let m = p.marker();
    p.eat();
    p.with_modes(LexMode::Markup, NewlineMode::Ignore, |p| {
        let inner = p.nodes.len();
        markup(p, true);
        p.wrap_all(inner, SyntaxKind::Markup);
        let token = lex_markup(p.text, p.pos);
        if token.kind == SyntaxKind::RightBracket {
            p.bump(token);
        } else {
            p.error_here("unclosed delimiter, expected closing bracket");
        }
    });
    p.wrap(m, SyntaxKind::ContentBlock);
}

fn code_block(p: &mut Parser) {
    let m = p.marker();
    p.with_modes(LexMode::Code, NewlineMode::Ignore, |p| {
        p.eat();
        code(p);
        p.expect_closing(SyntaxKind::RightBrace);
    });
    p.wrap(m, SyntaxKind::CodeBlock);
}

/// Statements up to the closing brace, separated by newlines or `;`.
fn code(p: &mut Parser) {
    let m = p.nodes.len();
    loop {
        p.newlines = NewlineMode::Ignore;
        match p.peek().kind {
            SyntaxKind::End | SyntaxKind::RightBrace => break,
            SyntaxKind::Semicolon => {
                p.eat();
                continue;
            }
            _ => {}
        }

        p.flush_trivia();
        p.newlines = NewlineMode::Continue;
        code_expr(p);
        match p.peek().kind {
            SyntaxKind::End | SyntaxKind::Semicolon | SyntaxKind::RightBrace => {}
            _ => p.eat_error("expected end of expression"),
        }
    }
    p.flush_trivia();
    p.wrap_all(m, SyntaxKind::Code);
}

fn code_expr(p: &mut Parser) {
    code_expr_prec(p, false, 0);
}

fn code_expr_prec(p: &mut Parser, atomic: bool, min_prec: u8) {
    let m = p.marker();
    let token = p.peek();

    if token.kind.starts_keyword_expr() {
        keyword_expr(p, token.kind, atomic);
        return;
    }

    if let Some(prec) = unary_prec(token.kind).filter(|_| !atomic) {
        p.eat();
        code_expr_prec(p, false, prec);
        p.wrap(m, SyntaxKind::Unary);
    } else {
        code_primary(p, atomic);
    }

    loop {
        if p.directly_at(SyntaxKind::LeftParen) || p.directly_at(SyntaxKind::LeftBracket) {
            args(p);
            p.wrap(m, SyntaxKind::FuncCall);
            continue;
        }

        let field_access = if atomic {
            p.directly_at(SyntaxKind::Dot) && p.lex(p.pos + 1).kind == SyntaxKind::Ident
        } else {
            p.at(SyntaxKind::Dot)
        };
        if field_access {
            p.eat();
            p.expect(SyntaxKind::Ident);
            p.wrap(m, SyntaxKind::FieldAccess);
            continue;
        }

        break;
    }

    if atomic {
        return;
    }

    loop {
        let token = p.peek();
        let (prec, not_in) = match binary_prec(token.kind) {
            Some(prec) => (prec, false),
            None if token.kind == SyntaxKind::Not
                && p.peek_from(token.end).kind == SyntaxKind::In =>
            {
                (4, true)
            }
            None => break,
        };
        if prec < min_prec {
            break;
        }

        p.eat();
        if not_in {
            p.eat();
        }
        let next = if is_right_assoc(token.kind) {
            prec
        } else {
            prec + 1
        };
        code_expr_prec(p, false, next);
        p.wrap(m, SyntaxKind::Binary);
    }
}

fn unary_prec(kind: SyntaxKind) -> Option<u8> {
    match kind {
        SyntaxKind::Plus | SyntaxKind::Minus => Some(7),
        SyntaxKind::Not => Some(4),
        _ => None,
    }
}

fn binary_prec(kind: SyntaxKind) -> Option<u8> {
    match kind {
        SyntaxKind::Star | SyntaxKind::Slash => Some(6),
        SyntaxKind::Plus | SyntaxKind::Minus => Some(5),
        SyntaxKind::EqEq
        | SyntaxKind::ExclEq
        | SyntaxKind::Lt
        | SyntaxKind::LtEq
        | SyntaxKind::Gt
        | SyntaxKind::GtEq
        | SyntaxKind::In => Some(4),
        SyntaxKind::And => Some(3),
        SyntaxKind::Or => Some(2),
        SyntaxKind::Eq
        | SyntaxKind::PlusEq
        | SyntaxKind::HyphEq
        | SyntaxKind::StarEq
        | SyntaxKind::SlashEq => Some(1),
        _ => None,
    }
}

fn is_right_assoc(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Eq
            | SyntaxKind::PlusEq
            | SyntaxKind::HyphEq
            | SyntaxKind::StarEq
            | SyntaxKind::SlashEq
    )
}

fn code_primary(p: &mut Parser, atomic: bool) {
    let m = p.marker();
    let token = p.peek();
    match token.kind {
        SyntaxKind::Ident | SyntaxKind::Underscore => {
            p.eat();
            if !atomic && p.at(SyntaxKind::Arrow) {
                p.wrap(m, SyntaxKind::Params);
                p.eat();
                code_expr(p);
                p.wrap(m, SyntaxKind::Closure);
            }
        }
        SyntaxKind::LeftParen => {
            collection(p);
            if !atomic && p.at(SyntaxKind::Arrow) {
                into_params(p);
                p.eat();
                code_expr(p);
                p.wrap(m, SyntaxKind::Closure);
            }
        }
        SyntaxKind::LeftBrace => code_block(p),
        SyntaxKind::LeftBracket => content_block(p),
        SyntaxKind::None
        | SyntaxKind::Auto
        | SyntaxKind::Bool
        | SyntaxKind::Int
        | SyntaxKind::Float
        | SyntaxKind::Numeric
        | SyntaxKind::Str
        | SyntaxKind::Label
        | SyntaxKind::Raw
        | SyntaxKind::Equation => p.eat(),
        _ => p.expected("expression"),
    }
}

/// Summary of a delimited comma list, used to classify collections.
#[derive(Debug, Default)]
struct Items {
    count: usize,
    commas: usize,
    named: bool,
    spread: bool,
}

/// `(` items `)`. The opening paren must be the next token.
fn delimited_items(p: &mut Parser) -> Items {
    let mut items = Items::default();
    p.with_modes(LexMode::Code, NewlineMode::Ignore, |p| {
        p.eat();
        if p.at(SyntaxKind::Colon) && p.peek_from(p.peek().end).kind == SyntaxKind::RightParen {
            p.eat();
            items.named = true;
        }

        loop {
            match p.peek().kind {
                SyntaxKind::End | SyntaxKind::RightParen => break,
                SyntaxKind::RightBracket | SyntaxKind::RightBrace => {
                    p.eat_error("unexpected closing delimiter");
                    continue;
                }
                _ => {}
            }

            match item(p) {
                SyntaxKind::Named | SyntaxKind::Keyed => items.named = true,
                SyntaxKind::Spread => items.spread = true,
                _ => {}
            }
            items.count += 1;

            match p.peek().kind {
                SyntaxKind::RightParen | SyntaxKind::End => break,
                SyntaxKind::Comma => {
                    p.eat();
                    items.commas += 1;
                }
                _ => p.error_here("expected comma"),
            }
        }

        p.expect_closing(SyntaxKind::RightParen);
    });
    items
}

/// One entry of a comma list: an expression, `name: value`, `"key": value`
/// or `..spread`.
fn item(p: &mut Parser) -> SyntaxKind {
    let m = p.marker();

    if p.at(SyntaxKind::Dots) {
        p.eat();
        if !matches!(
            p.peek().kind,
            SyntaxKind::Comma | SyntaxKind::RightParen | SyntaxKind::End
        ) {
            code_expr(p);
        }
        p.wrap(m, SyntaxKind::Spread);
        return SyntaxKind::Spread;
    }

    code_expr(p);
    if !p.at(SyntaxKind::Colon) {
        return p.nodes.get(m).map_or(SyntaxKind::Error, SyntaxNode::kind);
    }

    let kind = match p.nodes.get(m).map(SyntaxNode::kind) {
        Some(SyntaxKind::Str) => SyntaxKind::Keyed,
        Some(SyntaxKind::Ident) => SyntaxKind::Named,
        _ => {
            p.error_here("expected identifier or string before colon");
            SyntaxKind::Named
        }
    };
    p.eat();
    code_expr(p);
    p.wrap(m, kind);
    kind
}

/// A parenthesized expression, array or dictionary.
fn collection(p: &mut Parser) {
    let m = p.marker();
    let items = delimited_items(p);
    let kind = if items.named {
        SyntaxKind::Dict
    } else if items.count == 1 && items.commas == 0 && !items.spread {
        SyntaxKind::Parenthesized
    } else {
        SyntaxKind::Array
    };
    p.wrap(m, kind);
}

/// Call arguments: an optional parenthesized list followed by any number of
/// directly adjacent content blocks.
fn args(p: &mut Parser) {
    let m = p.marker();
    if p.directly_at(SyntaxKind::LeftParen) {
        delimited_items(p);
    }
    while p.directly_at(SyntaxKind::LeftBracket) {
        content_block(p);
    }
    p.wrap(m, SyntaxKind::Args);
}

/// Turn the collection just parsed into closure parameters.
fn into_params(p: &mut Parser) {
    let Some(node) = last_significant(p) else {
        return;
    };
    node.convert_to(SyntaxKind::Params);
    for child in node.children_mut() {
        into_pattern(child);
    }
}

/// Turn collections inside a binding pattern into destructuring patterns.
fn into_pattern(node: &mut SyntaxNode) {
    match node.kind() {
        SyntaxKind::Array | SyntaxKind::Dict => {
            node.convert_to(SyntaxKind::Destructuring);
            for child in node.children_mut() {
                into_pattern(child);
            }
        }
        SyntaxKind::Parenthesized => {
            for child in node.children_mut() {
                into_pattern(child);
            }
        }
        _ => {}
    }
}

fn last_significant<'a>(p: &'a mut Parser) -> Option<&'a mut SyntaxNode> {
    p.nodes
        .iter_mut()
        .rev()
        .find(|node| !node.kind().is_trivia())
}

/// A binding pattern for `let` and `for`.
fn pattern(p: &mut Parser) {
    match p.peek().kind {
        SyntaxKind::Ident | SyntaxKind::Underscore => p.eat(),
        SyntaxKind::LeftParen => {
            collection(p);
            if let Some(node) = last_significant(p) {
                into_pattern(node);
            }
        }
        _ => p.expected("pattern"),
    }
}

fn keyword_expr(p: &mut Parser, kind: SyntaxKind, atomic: bool) {
    match kind {
        SyntaxKind::Let => let_binding(p),
        SyntaxKind::Set => set_rule(p),
        SyntaxKind::Show => show_rule(p),
        SyntaxKind::Context => contextual(p, atomic),
        SyntaxKind::If => conditional(p),
        SyntaxKind::While => while_loop(p),
        SyntaxKind::For => for_loop(p),
        SyntaxKind::Import => module_import(p),
        SyntaxKind::Include => module_include(p),
        SyntaxKind::Break => keyword_only(p, SyntaxKind::LoopBreak),
        SyntaxKind::Continue => keyword_only(p, SyntaxKind::LoopContinue),
        SyntaxKind::Return => func_return(p),
        _ => p.expected("keyword"),
    }
}

fn let_binding(p: &mut Parser) {
    let m = p.marker();
    p.eat();

    let name = p.peek();
    let is_closure =
        name.kind == SyntaxKind::Ident && p.lex(name.end).kind == SyntaxKind::LeftParen;
    if is_closure {
        let closure = p.marker();
        p.eat();
        collection(p);
        into_params(p);
        if p.expect(SyntaxKind::Eq) {
            code_expr(p);
        }
        p.wrap(closure, SyntaxKind::Closure);
    } else {
        pattern(p);
        if p.eat_if(SyntaxKind::Eq) {
            code_expr(p);
        }
    }

    p.wrap(m, SyntaxKind::LetBinding);
}

fn set_rule(p: &mut Parser) {
    let m = p.marker();
    p.eat();
    code_expr_prec(p, true, 0);
    if p.eat_if(SyntaxKind::If) {
        code_expr(p);
    }
    p.wrap(m, SyntaxKind::SetRule);
}

fn show_rule(p: &mut Parser) {
    let m = p.marker();
    p.eat();
    if !p.at(SyntaxKind::Colon) {
        code_expr(p);
    }
    if p.expect(SyntaxKind::Colon) {
        code_expr(p);
    }
    p.wrap(m, SyntaxKind::ShowRule);
}

/// The body of an embedded `context` is atomic, like any other embedded
/// expression.
fn contextual(p: &mut Parser, atomic: bool) {
    let m = p.marker();
    p.eat();
    code_expr_prec(p, atomic, 0);
    p.wrap(m, SyntaxKind::Contextual);
}

fn conditional(p: &mut Parser) {
    let m = p.marker();
    p.eat();
    code_expr(p);
    block(p);
    if p.eat_if(SyntaxKind::Else) {
        if p.at(SyntaxKind::If) {
            conditional(p);
        } else {
            block(p);
        }
    }
    p.wrap(m, SyntaxKind::Conditional);
}

fn while_loop(p: &mut Parser) {
    let m = p.marker();
    p.eat();
    code_expr(p);
    block(p);
    p.wrap(m, SyntaxKind::WhileLoop);
}

fn for_loop(p: &mut Parser) {
    let m = p.marker();
    p.eat();
    pattern(p);
    if p.expect(SyntaxKind::In) {
        code_expr(p);
        block(p);
    }
    p.wrap(m, SyntaxKind::ForLoop);
}

/// The body of a conditional or loop.
fn block(p: &mut Parser) {
    match p.peek().kind {
        SyntaxKind::LeftBrace => code_block(p),
        SyntaxKind::LeftBracket => content_block(p),
        _ => p.expected("block"),
    }
}

fn module_import(p: &mut Parser) {
    let m = p.marker();
    p.eat();
    code_expr(p);
    if p.eat_if(SyntaxKind::As) {
        p.expect(SyntaxKind::Ident);
    }
    if p.eat_if(SyntaxKind::Colon) {
        if p.at(SyntaxKind::Star) {
            p.eat();
        } else {
            import_items(p);
        }
    }
    p.wrap(m, SyntaxKind::ModuleImport);
}

fn import_items(p: &mut Parser) {
    let m = p.marker();
    let parenthesized = p.at(SyntaxKind::LeftParen);
    let newlines = if parenthesized {
        NewlineMode::Ignore
    } else {
        p.newlines
    };
    p.with_modes(LexMode::Code, newlines, |p| {
        if parenthesized {
            p.eat();
        }
        loop {
            match p.peek().kind {
                SyntaxKind::End | SyntaxKind::RightParen => break,
                SyntaxKind::Ident => import_item(p),
                _ => p.expected("import item"),
            }
            if !p.eat_if(SyntaxKind::Comma) {
                break;
            }
        }
        if parenthesized {
            p.expect_closing(SyntaxKind::RightParen);
        }
    });
    p.wrap(m, SyntaxKind::ImportItems);
}

fn import_item(p: &mut Parser) {
    let m = p.marker();
    p.eat();
    while p.at(SyntaxKind::Dot) {
        p.eat();
        p.expect(SyntaxKind::Ident);
    }
    if p.eat_if(SyntaxKind::As) {
        p.expect(SyntaxKind::Ident);
        p.wrap(m, SyntaxKind::RenamedImportItem);
    }
}

fn module_include(p: &mut Parser) {
    let m = p.marker();
    p.eat();
    code_expr(p);
    p.wrap(m, SyntaxKind::ModuleInclude);
}

fn keyword_only(p: &mut Parser, kind: SyntaxKind) {
    let m = p.marker();
    p.eat();
    p.wrap(m, kind);
}

fn func_return(p: &mut Parser) {
    let m = p.marker();
    p.eat();
    let has_value = !matches!(
        p.peek().kind,
        SyntaxKind::End
            | SyntaxKind::Semicolon
            | SyntaxKind::RightBrace
            | SyntaxKind::RightParen
            | SyntaxKind::RightBracket
            | SyntaxKind::Comma
    );
    if has_value {
        code_expr(p);
    }
    p.wrap(m, SyntaxKind::FuncReturn);
}
