//! Recursive-descent grammar for the Pick BASIC dialect.
//!
//! The parser never fails: tokens it cannot place end up inside `ERROR`
//! nodes and tokens it expected but did not find become zero-width missing
//! nodes, so every source text yields a tree that covers it.

use crate::lexer::{Token, TokenKind, tokenize};
use pickscope_syntax::{Field, NodeKind, SyntaxTree, TreeBuilder};

/// Words that open a statement with its own syntax.
const STATEMENT_WORDS: &[&str] = &[
    "SUBROUTINE", "SUB", "EQU", "EQUATE", "DIM", "DIMENSION", "COMMON", "COM", "FOR", "LOOP",
    "IF", "BEGIN", "GOTO", "GO", "GOSUB", "ON", "CALL", "RETURN", "PRINT", "CRT", "DISPLAY",
    "END", "REM",
];

/// Words that open a statement parsed as keyword plus operand list.
const GENERIC_WORDS: &[&str] = &[
    "ABORT", "BREAK", "CHAIN", "CLEAR", "CLEARDATA", "CLEARFILE", "CLEARSELECT", "CLOSE",
    "CONVERT", "CONTINUE", "DATA", "DEBUG", "DEL", "DELETE", "DELETELIST", "ECHO", "ENTER",
    "ERROR", "EXECUTE", "EXIT", "FILELOCK", "FILEUNLOCK", "FOOTING", "FUNCTION", "GETLIST",
    "HEADING", "INCLUDE", "INPUT", "INPUTCLEAR", "INPUTERR", "INPUTNULL", "INPUTTRAP", "INS",
    "LOCATE", "LOCK", "MAT", "MATBUILD", "MATPARSE", "MATREAD", "MATREADL", "MATREADU",
    "MATWRITE", "MATWRITEU", "NULL", "OPEN", "OPENSEQ", "PAGE", "PERFORM", "PRECISION",
    "PRINTER", "PRINTERR", "PROCREAD", "PROCWRITE", "PROGRAM", "PROMPT", "READ", "READBLK",
    "READL", "READLIST", "READNEXT", "READSEQ", "READT", "READU", "READV", "READVL", "READVU",
    "RELEASE", "REMOVE", "RQM", "SELECT", "SELECTE", "SLEEP", "STOP", "UNLOCK", "WEOF",
    "WEOFSEQ", "WRITE", "WRITEBLK", "WRITELIST", "WRITESEQ", "WRITET", "WRITEU", "WRITEV",
    "WRITEVU",
];

/// Words that may appear between the operands of a keyword statement.
const CLAUSE_WORDS: &[&str] = &[
    "TO", "FROM", "ON", "SETTING", "IN", "BY", "CAPTURING", "RETURNING", "USING", "WITH",
    "ERROR", "PASSLIST", "RTNLIST", "AT", "APPEND", "BEFORE",
];

/// Words that close a branch or block and so never start an operand.
const STOP_WORDS: &[&str] = &[
    "THEN", "ELSE", "LOCKED", "TO", "STEP", "DO", "REPEAT", "UNTIL", "WHILE", "FROM",
    "SETTING", "IN", "CAPTURING", "RETURNING", "GOTO", "GOSUB", "GO", "NEXT", "END", "AND",
    "OR", "CAT", "EQ", "NE", "LT", "GT", "LE", "GE", "MATCH", "MATCHES", "ON", "BY", "USING",
];

/// Words that have no meaning at the start of a statement.
const STRAY_WORDS: &[&str] = &[
    "THEN", "ELSE", "LOCKED", "NEXT", "REPEAT", "UNTIL", "WHILE", "DO", "CASE", "TO", "STEP",
];

const BRANCH_WORDS: &[&str] = &["THEN", "ELSE", "LOCKED"];

/// Deepest expression or block nesting parsed; anything deeper on the line
/// becomes an `ERROR` node.
pub const MAX_NESTING: usize = 256;

fn is_word_in(set: &[&str], word: &str) -> bool {
    set.iter().any(|candidate| candidate.eq_ignore_ascii_case(word))
}

/// Parses a complete document.
pub fn parse_source(source: &str) -> SyntaxTree {
    let mut parser = GrammarParser::new(source);
    parser.source_file();
    parser.builder.finish()
}

struct GrammarParser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    builder: TreeBuilder,
    /// End of the last consumed token; where missing nodes are placed.
    last_end: usize,
    /// Inside `X<...>`: `>` closes the reference rather than comparing.
    no_gt: bool,
    depth: usize,
}

impl<'s> GrammarParser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
            builder: TreeBuilder::new(source, NodeKind::SourceFile),
            last_end: 0,
            no_gt: false,
            depth: 0,
        }
    }

    // ---- token access -------------------------------------------------

    fn nth(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn peek(&self) -> TokenKind {
        self.nth(0)
    }

    fn nth_text(&self, n: usize) -> &'s str {
        let source = self.source;
        self.tokens
            .get(self.pos + n)
            .map(|t| &source[t.range.clone()])
            .unwrap_or("")
    }

    fn at_word(&self, word: &str) -> bool {
        self.nth_word_is(0, word)
    }

    fn nth_word_is(&self, n: usize, word: &str) -> bool {
        self.nth(n) == TokenKind::Ident && self.nth_text(n).eq_ignore_ascii_case(word)
    }

    fn at_word_in(&self, set: &[&str]) -> bool {
        self.peek() == TokenKind::Ident && is_word_in(set, self.nth_text(0))
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0
            || self
                .tokens
                .get(self.pos - 1)
                .is_some_and(|t| t.kind == TokenKind::Newline)
    }

    fn at_statement_end(&self) -> bool {
        self.peek().ends_statement()
    }

    fn advance(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.last_end = token.range.end;
            self.pos += 1;
        }
    }

    fn bump_as(&mut self, kind: NodeKind, field: Option<Field>) {
        if let Some(token) = self.tokens.get(self.pos) {
            let range = token.range.clone();
            self.builder.leaf(kind, field, range);
            self.advance();
        }
    }

    fn bump(&mut self) {
        self.bump_as(NodeKind::Token, None);
    }

    /// Consumes the keyword when present, otherwise records it as missing.
    fn expect_word(&mut self, word: &'static str) {
        if self.at_word(word) {
            self.bump();
        } else {
            self.builder
                .missing(NodeKind::Token, None, Some(word), self.last_end);
        }
    }

    fn expect(&mut self, kind: TokenKind, text: &'static str) {
        if self.peek() == kind {
            self.bump();
        } else {
            self.builder
                .missing(NodeKind::Token, None, Some(text), self.last_end);
        }
    }

    fn identifier(&mut self, field: Option<Field>) {
        if self.peek() == TokenKind::Ident && !is_word_in(STOP_WORDS, self.nth_text(0)) {
            self.bump_as(NodeKind::Identifier, field);
        } else {
            self.builder
                .missing(NodeKind::Identifier, field, None, self.last_end);
        }
    }

    /// Runs `parse` one nesting level down, or swallows the rest of the
    /// line once [`MAX_NESTING`] is reached.
    fn nested(&mut self, parse: impl FnOnce(&mut Self)) {
        if self.depth >= MAX_NESTING {
            self.error_until_line_end();
            return;
        }
        self.depth += 1;
        parse(self);
        self.depth -= 1;
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), TokenKind::Newline | TokenKind::Semicolon) {
            self.advance();
        }
    }

    // ---- structure ----------------------------------------------------

    fn source_file(&mut self) {
        self.block(|_| false);
    }

    /// Statements and labels until `stop` holds at a statement start.
    fn block(&mut self, stop: fn(&Self) -> bool) {
        self.nested(|parser| parser.block_items(stop));
    }

    fn block_items(&mut self, stop: fn(&Self) -> bool) {
        loop {
            self.skip_separators();
            if self.peek() == TokenKind::Eof {
                break;
            }
            if self.at_line_start() && self.at_label() {
                self.label();
                continue;
            }
            if stop(self) {
                break;
            }
            self.statement(false);
        }
    }

    fn at_label(&self) -> bool {
        match self.peek() {
            TokenKind::Number => true,
            TokenKind::Ident => {
                let word = self.nth_text(0);
                self.nth(1) == TokenKind::Colon
                    && !is_word_in(STATEMENT_WORDS, word)
                    && !is_word_in(GENERIC_WORDS, word)
                    && !is_word_in(STRAY_WORDS, word)
            }
            _ => false,
        }
    }

    fn label(&mut self) {
        self.builder.open(NodeKind::Label, None);
        if self.peek() == TokenKind::Number {
            self.bump_as(NodeKind::Number, Some(Field::Name));
        } else {
            self.bump_as(NodeKind::LabelName, Some(Field::Name));
        }
        if self.peek() == TokenKind::Colon {
            self.bump();
        }
        self.builder.close();
    }

    /// One statement plus any junk that follows it on the same line.
    /// `inline_branch` lets a trailing `ELSE` end the statement.
    fn statement(&mut self, inline_branch: bool) {
        self.nested(Self::statement_body);
        if self.at_statement_end() || (inline_branch && self.at_word("ELSE")) {
            return;
        }
        self.error_until_line_end();
    }

    fn statement_body(&mut self) {
        if self.at_comment_start() {
            self.comment();
        } else if self.peek() == TokenKind::Ident {
            self.word_statement();
        } else {
            self.error_until_line_end();
        }
    }

    fn at_comment_start(&self) -> bool {
        match self.peek() {
            TokenKind::Star | TokenKind::Power | TokenKind::Bang | TokenKind::StarEq => true,
            TokenKind::Ident => self.at_word("REM") && !self.nth(1).is_assignment(),
            _ => false,
        }
    }

    fn at_expression_start(&self) -> bool {
        match self.peek() {
            TokenKind::Number
            | TokenKind::String
            | TokenKind::LParen
            | TokenKind::Minus
            | TokenKind::Plus => true,
            TokenKind::Ident => !is_word_in(STOP_WORDS, self.nth_text(0)),
            _ => false,
        }
    }

    fn word_statement(&mut self) {
        let word = self.nth_text(0).to_ascii_uppercase();
        if self.nth(1).is_assignment() {
            self.assignment();
            return;
        }
        match word.as_str() {
            "REM" => self.comment(),
            "SUBROUTINE" | "SUB" => self.subroutine(),
            "EQU" | "EQUATE" => self.equate(),
            "DIM" | "DIMENSION" => self.dim(),
            "COMMON" | "COM" => self.common(),
            "FOR" => self.for_loop(),
            "LOOP" => self.loop_statement(),
            "IF" => self.if_statement(),
            "BEGIN" if self.nth_word_is(1, "CASE") => self.case_statement(),
            "GOTO" | "GO" => self.jump(NodeKind::GotoStatement),
            "GOSUB" => self.jump(NodeKind::GosubStatement),
            "ON" => self.on_goto(),
            "CALL" => self.call(),
            "RETURN" => self.return_statement(),
            "PRINT" | "CRT" | "DISPLAY" => self.print(),
            "END" => {
                self.builder.open(NodeKind::EndStatement, None);
                self.bump();
                self.builder.close();
            }
            w if is_word_in(STRAY_WORDS, w) => self.error_until_line_end(),
            w if is_word_in(GENERIC_WORDS, w) || w == "BEGIN" => self.keyword_statement(),
            _ => self.assignment(),
        }
    }

    fn comment(&mut self) {
        let start = self.tokens[self.pos].range.start;
        let end = self.source[start..]
            .find(['\r', '\n'])
            .map_or(self.source.len(), |offset| start + offset);
        self.builder.leaf(NodeKind::Comment, None, start..end);
        while self.pos < self.tokens.len() && self.tokens[self.pos].range.start < end {
            self.advance();
        }
        self.last_end = end;
    }

    fn error_until_line_end(&mut self) {
        self.builder.open(NodeKind::Error, None);
        while !matches!(self.peek(), TokenKind::Newline | TokenKind::Eof) {
            let kind = match self.peek() {
                TokenKind::Ident => NodeKind::Identifier,
                TokenKind::Number => NodeKind::Number,
                TokenKind::String => NodeKind::String,
                _ => NodeKind::Token,
            };
            self.bump_as(kind, None);
        }
        self.builder.close();
    }

    // ---- declarations -------------------------------------------------

    fn subroutine(&mut self) {
        self.builder.open(NodeKind::SubroutineStatement, None);
        self.bump();
        if self.peek() == TokenKind::Ident {
            self.bump_as(NodeKind::Identifier, Some(Field::Name));
        }
        if self.peek() == TokenKind::LParen {
            self.bump();
            while !matches!(self.peek(), TokenKind::RParen) && !self.at_statement_end() {
                match self.peek() {
                    TokenKind::Comma => self.bump(),
                    TokenKind::Ident if self.at_word("MAT") => self.bump(),
                    TokenKind::Ident => self.bump_as(NodeKind::Identifier, None),
                    _ => break,
                }
            }
            self.expect(TokenKind::RParen, ")");
        }
        self.builder.close();
    }

    fn equate(&mut self) {
        self.builder.open(NodeKind::EquateStatement, None);
        self.bump();
        loop {
            self.identifier(Some(Field::Name));
            if self.at_word("TO") || self.at_word("LIT") || self.at_word("LITERALLY") {
                self.bump();
            } else {
                self.expect_word("TO");
            }
            self.expression(Some(Field::Value));
            if self.peek() != TokenKind::Comma {
                break;
            }
            self.bump();
        }
        self.builder.close();
    }

    fn dim(&mut self) {
        self.builder.open(NodeKind::DimStatement, None);
        self.bump();
        loop {
            self.builder.open(NodeKind::DimSpec, None);
            self.identifier(Some(Field::Name));
            if self.peek() == TokenKind::LParen {
                self.bump();
                self.argument_list();
                self.expect(TokenKind::RParen, ")");
            }
            self.builder.close();
            if self.peek() != TokenKind::Comma {
                break;
            }
            self.bump();
        }
        self.builder.close();
    }

    fn common(&mut self) {
        self.builder.open(NodeKind::CommonStatement, None);
        self.bump();
        if self.peek() == TokenKind::Slash {
            self.bump();
            self.identifier(Some(Field::Name));
            self.expect(TokenKind::Slash, "/");
        }
        loop {
            self.identifier(Some(Field::Name));
            if self.peek() == TokenKind::LParen {
                self.bump();
                self.argument_list();
                self.expect(TokenKind::RParen, ")");
            }
            if self.peek() != TokenKind::Comma {
                break;
            }
            self.bump();
        }
        self.builder.close();
    }

    // ---- control flow -------------------------------------------------

    fn for_loop(&mut self) {
        self.builder.open(NodeKind::ForStatement, None);
        self.bump();
        self.identifier(Some(Field::Variable));
        self.expect(TokenKind::Eq, "=");
        self.expression(None);
        self.expect_word("TO");
        self.expression(None);
        if self.at_word("STEP") {
            self.bump();
            self.expression(None);
        }
        if self.at_word("WHILE") || self.at_word("UNTIL") {
            self.bump();
            self.expression(Some(Field::Condition));
        }
        self.block(|p| p.at_word("NEXT"));
        self.expect_word("NEXT");
        if self.peek() == TokenKind::Ident {
            self.bump_as(NodeKind::Identifier, None);
        }
        self.builder.close();
    }

    fn loop_statement(&mut self) {
        self.builder.open(NodeKind::LoopStatement, None);
        self.bump();
        self.block(|p| p.at_word("WHILE") || p.at_word("UNTIL") || p.at_word("REPEAT"));
        if self.at_word("WHILE") || self.at_word("UNTIL") {
            self.bump();
            self.expression(Some(Field::Condition));
            if self.at_word("DO") {
                self.bump();
            }
            self.block(|p| p.at_word("REPEAT"));
        }
        self.expect_word("REPEAT");
        self.builder.close();
    }

    fn if_statement(&mut self) {
        self.builder.open(NodeKind::IfStatement, None);
        self.bump();
        self.expression(Some(Field::Condition));
        if !self.at_word("THEN") && !self.at_word("ELSE") {
            self.expect_word("THEN");
        }
        self.branches();
        self.builder.close();
    }

    /// `THEN`, `ELSE` and `LOCKED` clauses, each either inline or a block
    /// closed by `END`.
    fn branches(&mut self) {
        while self.at_word_in(BRANCH_WORDS) {
            self.bump();
            if self.at_comment_start() {
                self.comment();
            }
            if matches!(self.peek(), TokenKind::Newline | TokenKind::Eof) {
                self.block(|p| p.at_word("END"));
                self.expect_word("END");
            } else {
                loop {
                    self.statement(true);
                    if self.peek() != TokenKind::Semicolon {
                        break;
                    }
                    self.advance();
                    if matches!(self.peek(), TokenKind::Newline | TokenKind::Eof) {
                        break;
                    }
                }
            }
        }
    }

    fn case_statement(&mut self) {
        self.builder.open(NodeKind::CaseStatement, None);
        self.bump();
        self.bump();
        loop {
            self.skip_separators();
            if self.peek() == TokenKind::Eof {
                self.expect_word("END");
                break;
            }
            if self.at_word("END") && self.nth_word_is(1, "CASE") {
                self.bump();
                self.bump();
                break;
            }
            if self.at_word("CASE") {
                self.case_clause();
            } else if self.at_line_start() && self.at_label() {
                self.label();
            } else {
                self.statement(false);
            }
        }
        self.builder.close();
    }

    fn case_clause(&mut self) {
        self.builder.open(NodeKind::CaseClause, None);
        self.bump();
        self.expression(Some(Field::Condition));
        self.block(|p| p.at_word("CASE") || (p.at_word("END") && p.nth_word_is(1, "CASE")));
        self.builder.close();
    }

    /// `GOTO`, `GO [TO]` and `GOSUB` with one target.
    fn jump(&mut self, kind: NodeKind) {
        self.builder.open(kind, None);
        if self.at_word("GO") {
            self.bump();
            if self.at_word("TO") {
                self.bump();
            }
        } else {
            self.bump();
        }
        self.target();
        self.builder.close();
    }

    fn target(&mut self) {
        match self.peek() {
            TokenKind::Number => self.bump_as(NodeKind::Number, None),
            TokenKind::Ident => self.bump_as(NodeKind::LabelName, None),
            _ => self
                .builder
                .missing(NodeKind::LabelName, None, None, self.last_end),
        }
    }

    fn on_goto(&mut self) {
        self.builder.open(NodeKind::OnGotoStatement, None);
        self.bump();
        self.expression(None);
        if self.at_word("GOTO") || self.at_word("GOSUB") {
            self.bump();
        } else if self.at_word("GO") {
            self.bump();
            if self.at_word("TO") {
                self.bump();
            }
        } else {
            self.expect_word("GOTO");
        }
        self.target();
        while self.peek() == TokenKind::Comma {
            self.bump();
            self.target();
        }
        self.builder.close();
    }

    fn call(&mut self) {
        self.builder.open(NodeKind::CallStatement, None);
        self.bump();
        if self.peek() == TokenKind::At {
            self.bump();
        }
        self.identifier(Some(Field::Name));
        if self.peek() == TokenKind::LParen {
            self.bump();
            self.argument_list();
            self.expect(TokenKind::RParen, ")");
        }
        self.builder.close();
    }

    fn return_statement(&mut self) {
        self.builder.open(NodeKind::ReturnStatement, None);
        self.bump();
        if self.at_word("TO") {
            self.bump();
            self.target();
        }
        self.builder.close();
    }

    fn print(&mut self) {
        self.builder.open(NodeKind::PrintStatement, None);
        self.bump();
        if self.at_word("ON") {
            self.bump();
            self.expression(None);
        }
        while !self.at_statement_end() && !self.at_word_in(BRANCH_WORDS) {
            match self.peek() {
                TokenKind::Comma | TokenKind::Colon => self.bump(),
                _ if self.at_expression_start() => self.expression(None),
                _ => break,
            }
        }
        self.builder.close();
    }

    fn keyword_statement(&mut self) {
        self.builder.open(NodeKind::KeywordStatement, None);
        self.bump();
        while !self.at_statement_end() && !self.at_word_in(BRANCH_WORDS) {
            if self.at_word_in(CLAUSE_WORDS) || self.peek() == TokenKind::Comma {
                self.bump();
            } else if self.at_expression_start() {
                self.expression(None);
            } else {
                break;
            }
        }
        self.branches();
        self.builder.close();
    }

    fn assignment(&mut self) {
        self.builder.open(NodeKind::AssignmentStatement, None);
        self.lvalue();
        if self.peek().is_assignment() {
            self.bump();
        } else {
            self.builder
                .missing(NodeKind::Token, None, Some("="), self.last_end);
        }
        self.expression(Some(Field::Value));
        self.builder.close();
    }

    fn lvalue(&mut self) {
        self.builder.open(NodeKind::Lvalue, None);
        self.bump_as(NodeKind::Identifier, None);
        if self.peek() == TokenKind::LParen {
            self.bump();
            self.argument_list();
            self.expect(TokenKind::RParen, ")");
        }
        if self.peek() == TokenKind::Lt {
            self.bump();
            let saved = std::mem::replace(&mut self.no_gt, true);
            self.argument_list();
            self.no_gt = saved;
            self.expect(TokenKind::Gt, ">");
        }
        self.builder.close();
    }

    // ---- expressions --------------------------------------------------

    fn argument_list(&mut self) {
        if matches!(self.peek(), TokenKind::RParen | TokenKind::RBracket) {
            return;
        }
        loop {
            self.expression(None);
            if !matches!(self.peek(), TokenKind::Comma | TokenKind::Semicolon) {
                break;
            }
            self.bump();
        }
    }

    fn expression(&mut self, field: Option<Field>) {
        let checkpoint = self.builder.checkpoint();
        self.nested(|parser| parser.binary(1));
        self.builder.set_field_at(checkpoint, field);
    }

    /// Precedence climbing; all operators are left-associative.
    fn binary(&mut self, min_precedence: u8) {
        let checkpoint = self.builder.checkpoint();
        self.unary();
        while let Some(precedence) = self.binary_precedence() {
            if precedence < min_precedence {
                break;
            }
            self.builder
                .open_at(checkpoint, NodeKind::BinaryExpression, None);
            self.bump();
            self.binary(precedence + 1);
            self.builder.close();
        }
    }

    fn binary_precedence(&self) -> Option<u8> {
        let precedence = match self.peek() {
            TokenKind::Ident => {
                let word = self.nth_text(0).to_ascii_uppercase();
                match word.as_str() {
                    "AND" | "OR" => 1,
                    "EQ" | "NE" | "LT" | "GT" | "LE" | "GE" | "MATCH" | "MATCHES" => 2,
                    "CAT" => 3,
                    _ => return None,
                }
            }
            TokenKind::Amp | TokenKind::Bang => 1,
            TokenKind::Gt if self.no_gt => return None,
            TokenKind::Eq
            | TokenKind::Hash
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq => 2,
            // A trailing colon belongs to PRINT, not to a concatenation.
            TokenKind::Colon if self.nth(1).ends_statement() || self.nth(1) == TokenKind::Comma => {
                return None;
            }
            TokenKind::Colon => 3,
            TokenKind::Plus | TokenKind::Minus => 4,
            TokenKind::Star | TokenKind::Slash => 5,
            TokenKind::Caret | TokenKind::Power => 6,
            _ => return None,
        };
        Some(precedence)
    }

    fn unary(&mut self) {
        if matches!(self.peek(), TokenKind::Minus | TokenKind::Plus) {
            self.builder.open(NodeKind::UnaryExpression, None);
            self.bump();
            self.nested(Self::unary);
            self.builder.close();
        } else {
            self.postfix();
        }
    }

    fn postfix(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.primary();
        while self.peek() == TokenKind::LBracket {
            self.builder
                .open_at(checkpoint, NodeKind::SubstringExpression, None);
            self.bump();
            let saved = std::mem::replace(&mut self.no_gt, false);
            self.argument_list();
            self.no_gt = saved;
            self.expect(TokenKind::RBracket, "]");
            self.builder.close();
        }
    }

    fn primary(&mut self) {
        match self.peek() {
            TokenKind::Number => self.bump_as(NodeKind::Number, None),
            TokenKind::String => self.bump_as(NodeKind::String, None),
            TokenKind::LParen => {
                self.builder.open(NodeKind::ParenthesizedExpression, None);
                self.bump();
                let saved = std::mem::replace(&mut self.no_gt, false);
                self.expression(None);
                self.no_gt = saved;
                self.expect(TokenKind::RParen, ")");
                self.builder.close();
            }
            TokenKind::Ident if !is_word_in(STOP_WORDS, self.nth_text(0)) => {
                if self.nth(1) == TokenKind::LParen {
                    self.function_call();
                } else {
                    self.bump_as(NodeKind::Identifier, None);
                }
            }
            _ => self
                .builder
                .missing(NodeKind::Identifier, None, None, self.last_end),
        }
    }

    fn function_call(&mut self) {
        self.builder.open(NodeKind::FunctionCall, None);
        self.bump_as(NodeKind::Identifier, Some(Field::Name));
        self.bump();
        let saved = std::mem::replace(&mut self.no_gt, false);
        self.argument_list();
        self.no_gt = saved;
        self.expect(TokenKind::RParen, ")");
        self.builder.close();
    }
}
