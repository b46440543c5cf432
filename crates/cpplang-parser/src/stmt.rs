//! Statement syntax: compound statements, control flow, `try`/`catch`,
//! and the expression-vs-declaration-statement disambiguation.

use crate::Parser;
use cpplang_ast::{CatchClauseAst, DeclarationAst, ExpressionAst, InitDeclaratorAst, StatementAst};
use cpplang_common::Span;
use cpplang_lexer::TokenKind;

impl<'a, 'ctrl> Parser<'a, 'ctrl> {
    pub(crate) fn parse_compound_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.pos;
        self.expect(TokenKind::LeftBrace, "'{' opening compound statement");
        let mut statements = self.arena.new_list();
        while !self.at(TokenKind::RightBrace) && !self.at_eof() {
            let before = self.pos;
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            if self.pos == before {
                self.bump();
            }
        }
        let end = self.expect(TokenKind::RightBrace, "'}' closing compound statement");
        Some(self.arena.alloc(StatementAst::Compound {
            span: Span::new(start, end + 1),
            statements: statements.into_bump_slice(),
        }))
    }

    pub(crate) fn parse_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        if !self.enter() {
            self.leave();
            return None;
        }
        let result = self.parse_statement_inner();
        self.leave();
        if result.is_none() {
            self.recover_to_statement_boundary();
        }
        result
    }

    fn parse_statement_inner(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        if self.at(TokenKind::LeftBrace) {
            return self.parse_compound_statement();
        }
        if self.at_qt_construct() {
            return self.parse_qt_statement();
        }
        let node = match self.kind() {
            TokenKind::Semicolon => {
                let index = self.bump();
                StatementAst::Expression { span: Span::at(index), expression: None }
            }
            TokenKind::KwIf => return self.parse_if_statement(),
            TokenKind::KwWhile => return self.parse_while_statement(),
            TokenKind::KwDo => return self.parse_do_while_statement(),
            TokenKind::KwFor => return self.parse_for_statement(),
            TokenKind::KwSwitch => return self.parse_switch_statement(),
            TokenKind::KwCase => return self.parse_case_statement(),
            TokenKind::KwDefault => return self.parse_default_statement(),
            TokenKind::KwBreak => {
                let start = self.bump();
                let end = self.expect(TokenKind::Semicolon, "';' after 'break'");
                StatementAst::Break(Span::new(start, end + 1))
            }
            TokenKind::KwContinue => {
                let start = self.bump();
                let end = self.expect(TokenKind::Semicolon, "';' after 'continue'");
                StatementAst::Continue(Span::new(start, end + 1))
            }
            TokenKind::KwReturn => return self.parse_return_statement(),
            TokenKind::KwGoto => return self.parse_goto_statement(),
            TokenKind::KwTry => return self.parse_try_statement(),
            TokenKind::KwAtThrow => {
                let start = self.bump();
                let value = if self.at(TokenKind::Semicolon) { None } else { self.parse_expression() };
                let end = self.expect(TokenKind::Semicolon, "';' after '@throw'");
                let span = Span::new(start, end + 1);
                let throw_expr: &ExpressionAst = self.arena.alloc(ExpressionAst::Throw { span, operand: value });
                StatementAst::Expression { span, expression: Some(throw_expr) }
            }
            TokenKind::KwAtTry => return self.parse_objc_try_statement(),
            TokenKind::KwAtAutoreleasepool => {
                self.bump();
                return self.parse_compound_statement();
            }
            TokenKind::KwEmit => {
                // Qt's `emit signal(args);` prefix carries no separate AST
                // shape; the call expression underneath is what matters.
                self.bump();
                return self.parse_expression_statement();
            }
            TokenKind::Identifier if self.kind_at(1) == TokenKind::Colon && self.spelling() != "default" => {
                return self.parse_labeled_statement();
            }
            _ if self.starts_decl_specifier_at(0) || (self.at(TokenKind::Identifier) && self.looks_like_type_name()) => {
                return self.parse_declaration_statement();
            }
            _ => return self.parse_expression_statement(),
        };
        Some(self.arena.alloc(node))
    }

    fn parse_if_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after 'if'");
        let condition = self.parse_condition_expression()?;
        self.expect(TokenKind::RightParen, "')' closing 'if' condition");
        let then_branch = self.parse_statement()?;
        let else_branch = if self.eat(TokenKind::KwElse).is_some() { Some(self.parse_statement()?) } else { None };
        Some(self.arena.alloc(StatementAst::If { span: Span::new(start, self.pos), condition, then_branch, else_branch }))
    }

    fn parse_condition_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        self.parse_expression()
    }

    fn parse_while_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after 'while'");
        let condition = self.parse_condition_expression()?;
        self.expect(TokenKind::RightParen, "')' closing 'while' condition");
        let body = self.parse_statement()?;
        Some(self.arena.alloc(StatementAst::While { span: Span::new(start, self.pos), condition, body }))
    }

    fn parse_do_while_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.bump();
        let body = self.parse_statement()?;
        self.expect(TokenKind::KwWhile, "'while' after 'do' body");
        self.expect(TokenKind::LeftParen, "'(' after 'while'");
        let condition = self.parse_condition_expression()?;
        self.expect(TokenKind::RightParen, "')' closing 'do'/'while' condition");
        let end = self.expect(TokenKind::Semicolon, "';' after 'do'/'while' statement");
        Some(self.arena.alloc(StatementAst::DoWhile { span: Span::new(start, end + 1), body, condition }))
    }

    fn parse_for_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after 'for'");
        if self.looks_like_range_based_for() {
            let declaration = self.arena.alloc(self.parse_simple_declarator_for_range()?);
            self.expect(TokenKind::Colon, "':' in range-based 'for'");
            let range = self.parse_expression()?;
            self.expect(TokenKind::RightParen, "')' closing range-based 'for'");
            let body = self.parse_statement()?;
            return Some(self.arena.alloc(StatementAst::RangeBasedFor { span: Span::new(start, self.pos), declaration, range, body }));
        }
        let init = if self.at(TokenKind::Semicolon) {
            self.bump();
            None
        } else if self.starts_decl_specifier_at(0) || (self.at(TokenKind::Identifier) && self.looks_like_type_name()) {
            Some(self.parse_declaration_statement()?)
        } else {
            Some(self.parse_expression_statement()?)
        };
        let condition = if self.at(TokenKind::Semicolon) { None } else { self.parse_expression() };
        self.expect(TokenKind::Semicolon, "';' after 'for' condition");
        let step = if self.at(TokenKind::RightParen) { None } else { self.parse_expression() };
        self.expect(TokenKind::RightParen, "')' closing 'for'");
        let body = self.parse_statement()?;
        Some(self.arena.alloc(StatementAst::For { span: Span::new(start, self.pos), init, condition, step, body }))
    }

    /// Bounded lookahead for `for ( decl-specifiers declarator : ...`: scans
    /// past a plausible decl-specifier-seq and declarator core, then checks
    /// for the range-for's tell-tale bare `:` (as opposed to `;` for a
    /// classic for-loop or `::` inside a qualified name).
    fn looks_like_range_based_for(&self) -> bool {
        if !(self.starts_decl_specifier_at(0) || (self.at(TokenKind::Identifier) && self.looks_like_type_name())) {
            return false;
        }
        let mut offset = 0u32;
        let mut depth = 0i32;
        loop {
            match self.kind_at(offset) {
                TokenKind::LeftParen | TokenKind::LeftBracket => depth += 1,
                TokenKind::RightParen if depth == 0 => return false,
                TokenKind::RightParen | TokenKind::RightBracket => depth -= 1,
                TokenKind::Semicolon | TokenKind::Eof => return false,
                TokenKind::Colon if depth == 0 => return true,
                _ => {}
            }
            offset += 1;
            if offset > 512 {
                return false;
            }
        }
    }

    fn parse_simple_declarator_for_range(&mut self) -> Option<DeclarationAst<'ctrl>> {
        let start = self.pos;
        let specifiers = self.parse_decl_specifier_seq();
        let declarator = self.parse_declarator()?;
        let span = Span::new(start, self.pos);
        let declarators = {
            let mut list = self.arena.new_list();
            list.push(InitDeclaratorAst { span, declarator, initializer: None });
            list.into_bump_slice()
        };
        Some(DeclarationAst::Simple { span, specifiers, declarators })
    }

    fn parse_switch_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after 'switch'");
        let condition = self.parse_condition_expression()?;
        self.expect(TokenKind::RightParen, "')' closing 'switch' condition");
        let body = self.parse_statement()?;
        Some(self.arena.alloc(StatementAst::Switch { span: Span::new(start, self.pos), condition, body }))
    }

    fn parse_case_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.bump();
        let value = self.parse_expression()?;
        self.expect(TokenKind::Colon, "':' after 'case' value");
        let body = self.parse_statement()?;
        Some(self.arena.alloc(StatementAst::Case { span: Span::new(start, self.pos), value, body }))
    }

    fn parse_default_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::Colon, "':' after 'default'");
        let body = self.parse_statement()?;
        Some(self.arena.alloc(StatementAst::Default { span: Span::new(start, self.pos), body }))
    }

    fn parse_labeled_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.bump();
        self.bump();
        let body = self.parse_statement()?;
        Some(self.arena.alloc(StatementAst::Labeled { span: Span::new(start, self.pos), label: Span::at(start), body }))
    }

    fn parse_return_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.bump();
        let value = if self.at(TokenKind::Semicolon) { None } else { self.parse_expression() };
        let end = self.expect(TokenKind::Semicolon, "';' after 'return'");
        Some(self.arena.alloc(StatementAst::Return { span: Span::new(start, end + 1), value }))
    }

    fn parse_goto_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.bump();
        let label = self.expect(TokenKind::Identifier, "label name after 'goto'");
        let end = self.expect(TokenKind::Semicolon, "';' after 'goto'");
        Some(self.arena.alloc(StatementAst::Goto { span: Span::new(start, end + 1), label: Span::at(label) }))
    }

    fn parse_try_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.bump();
        let body = self.parse_compound_statement()?;
        let mut handlers = self.arena.new_list();
        while self.at(TokenKind::KwCatch) {
            handlers.push(self.parse_catch_clause()?);
        }
        Some(self.arena.alloc(StatementAst::Try { span: Span::new(start, self.pos), body, handlers: handlers.into_bump_slice() }))
    }

    pub(crate) fn parse_catch_clause(&mut self) -> Option<CatchClauseAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after 'catch'");
        let exception_declaration = if self.eat(TokenKind::Ellipsis).is_some() {
            None
        } else {
            let decl_start = self.pos;
            let specifiers = self.parse_decl_specifier_seq();
            let declarator = self.parse_declarator();
            let declarators = match declarator {
                Some(declarator) => {
                    let mut list = self.arena.new_list();
                    list.push(InitDeclaratorAst { span: Span::new(decl_start, self.pos), declarator, initializer: None });
                    list.into_bump_slice()
                }
                None => &[],
            };
            Some(self.arena.alloc(DeclarationAst::Simple { span: Span::new(decl_start, self.pos), specifiers, declarators }))
        };
        self.expect(TokenKind::RightParen, "')' closing 'catch' declaration");
        let body = self.parse_compound_statement()?;
        Some(CatchClauseAst { span: Span::new(start, self.pos), exception_declaration, body })
    }

    /// `@try { } @catch (Type *e) { } @finally { }`. Reuses `StatementAst::Try`
    /// exactly as the C++ form does; the `@finally` block is parsed to keep
    /// the cursor correctly positioned but its contents have nowhere to live,
    /// since `StatementAst::Try` carries no finally-slot.
    fn parse_objc_try_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.bump();
        let body = self.parse_compound_statement()?;
        let mut handlers = self.arena.new_list();
        while self.at(TokenKind::KwAtCatch) {
            handlers.push(self.parse_objc_catch_clause()?);
        }
        if self.eat(TokenKind::KwAtFinally).is_some() {
            self.parse_compound_statement();
        }
        Some(self.arena.alloc(StatementAst::Try { span: Span::new(start, self.pos), body, handlers: handlers.into_bump_slice() }))
    }

    fn parse_objc_catch_clause(&mut self) -> Option<CatchClauseAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after '@catch'");
        let decl_start = self.pos;
        let specifiers = self.parse_decl_specifier_seq();
        let declarator = self.parse_declarator();
        let exception_declaration = match declarator {
            Some(declarator) => {
                let mut list = self.arena.new_list();
                list.push(InitDeclaratorAst { span: Span::new(decl_start, self.pos), declarator, initializer: None });
                Some(self.arena.alloc(DeclarationAst::Simple { span: Span::new(decl_start, self.pos), specifiers, declarators: list.into_bump_slice() }))
            }
            None => None,
        };
        self.expect(TokenKind::RightParen, "')' closing '@catch' declaration");
        let body = self.parse_compound_statement()?;
        Some(CatchClauseAst { span: Span::new(start, self.pos), exception_declaration, body })
    }

    fn parse_declaration_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.pos;
        let declaration = self.arena.alloc(self.parse_declaration()?);
        Some(self.arena.alloc(StatementAst::Declaration { span: Span::new(start, self.pos), declaration }))
    }

    fn parse_expression_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.pos;
        let expression = if self.at(TokenKind::Semicolon) { None } else { self.parse_expression() };
        let end = self.expect(TokenKind::Semicolon, "';' after expression statement");
        Some(self.arena.alloc(StatementAst::Expression { span: Span::new(start, end + 1), expression }))
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_translation_unit;
    use cpplang_arena::Arena;
    use cpplang_ast::{DeclarationAst, StatementAst};
    use cpplang_common::FrontendOptions;
    use cpplang_control::Control;
    use cpplang_tu::TranslationUnit;

    macro_rules! parse {
        ($ast:ident, $source:expr) => {
            let arena = Arena::new();
            let control = Control::new(&arena);
            let options = FrontendOptions::default();
            let mut tu = TranslationUnit::new("test.cpp", $source, &control, options.lexer_flags);
            let $ast = parse_translation_unit(&mut tu, &control);
        };
    }

    fn body_of(ast: &cpplang_ast::TranslationUnitAst) -> &StatementAst {
        match ast.declarations[0] {
            DeclarationAst::FunctionDefinition { body, .. } => body,
            ref other => panic!("unexpected declaration: {other:?}"),
        }
    }

    #[test]
    fn if_else_statement_parses() {
        parse!(ast, "void f() { if (x) { y(); } else { z(); } }");
        match body_of(&ast) {
            StatementAst::Compound { statements, .. } => {
                assert_eq!(statements.len(), 1);
                assert!(matches!(statements[0], StatementAst::If { else_branch: Some(_), .. }));
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn range_based_for_parses() {
        parse!(ast, "void f() { for (auto x : items) { use(x); } }");
        match body_of(&ast) {
            StatementAst::Compound { statements, .. } => {
                assert!(matches!(statements[0], StatementAst::RangeBasedFor { .. }));
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn classic_for_with_declaration_parses() {
        parse!(ast, "void f() { for (int i = 0; i < 10; i++) { use(i); } }");
        match body_of(&ast) {
            StatementAst::Compound { statements, .. } => {
                assert!(matches!(statements[0], StatementAst::For { .. }));
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn try_catch_with_handler_parses() {
        parse!(ast, "void f() { try { risky(); } catch (const Error &e) { handle(e); } }");
        match body_of(&ast) {
            StatementAst::Compound { statements, .. } => match statements[0] {
                StatementAst::Try { handlers, .. } => assert_eq!(handlers.len(), 1),
                other => panic!("unexpected statement: {other:?}"),
            },
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn switch_with_cases_parses() {
        parse!(ast, "void f() { switch (x) { case 1: break; default: break; } }");
        match body_of(&ast) {
            StatementAst::Compound { statements, .. } => {
                assert!(matches!(statements[0], StatementAst::Switch { .. }));
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
