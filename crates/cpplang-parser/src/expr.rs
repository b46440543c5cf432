//! Expression parsing: precedence climbing over the binary/assignment
//! operators, plus the unary/postfix/primary productions (casts, `new`/
//! `delete`, `sizeof`, lambdas, braced-init-lists).

use crate::Parser;
use cpplang_ast::{
    DesignatedInitializerAst, DesignatorAst, ExpressionAst, LambdaCaptureAst, LambdaExpressionAst, SizeofOperandAst,
};
use cpplang_common::{Span, SpanBuilder};
use cpplang_control::OperatorKind;
use cpplang_lexer::TokenKind;

impl<'a, 'ctrl> Parser<'a, 'ctrl> {
    /// The full comma-expression production: what appears in a `for`
    /// init/step slot or as a statement's top-level expression.
    pub(crate) fn parse_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let first = self.parse_assignment_expression()?;
        let mut left = first;
        while self.at(TokenKind::Comma) {
            let builder = SpanBuilder::start(left.span().start);
            self.bump();
            let right = self.parse_assignment_expression()?;
            let span = builder.end(right.span().end);
            left = self.arena.alloc(ExpressionAst::Comma { span, left, right });
        }
        Some(left)
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        if !self.enter() {
            self.leave();
            return None;
        }
        let result = self.parse_assignment_expression_inner();
        self.leave();
        result
    }

    fn parse_assignment_expression_inner(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        if self.at(TokenKind::KwThrow) {
            return self.parse_throw_expression();
        }
        let target = self.parse_conditional_expression()?;
        if let Some(operator) = assignment_operator(self.kind()) {
            let builder = SpanBuilder::start(target.span().start);
            self.bump();
            let value = self.parse_assignment_expression()?;
            let span = builder.end(value.span().end);
            return Some(self.arena.alloc(ExpressionAst::Assignment { span, operator, target, value }));
        }
        Some(target)
    }

    fn parse_throw_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.bump();
        let builder = SpanBuilder::start(start);
        let operand = if self.starts_expression() {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        let end = operand.map_or(start + 1, |e| e.span().end);
        Some(self.arena.alloc(ExpressionAst::Throw { span: builder.end(end), operand }))
    }

    fn parse_conditional_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let condition = self.parse_binary_expression(0)?;
        if self.eat(TokenKind::Question).is_some() {
            let builder = SpanBuilder::start(condition.span().start);
            let then_branch = self.parse_expression()?;
            self.expect(TokenKind::Colon, "':' in conditional expression");
            let else_branch = self.parse_assignment_expression()?;
            let span = builder.end(else_branch.span().end);
            return Some(self.arena.alloc(ExpressionAst::Conditional {
                span,
                condition,
                then_branch,
                else_branch,
            }));
        }
        Some(condition)
    }

    /// Precedence-climbing over the binary operator ladder. `min_level`
    /// is the lowest-precedence level this call is allowed to consume;
    /// recursive calls raise it so tighter-binding operators nest inside.
    fn parse_binary_expression(&mut self, min_level: u8) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let mut left = self.parse_pm_expression()?;
        loop {
            let Some((operator, level)) = binary_operator(self.kind()) else {
                break;
            };
            if level < min_level {
                break;
            }
            let builder = SpanBuilder::start(left.span().start);
            self.bump();
            let right = self.parse_binary_expression(level + 1)?;
            let span = builder.end(right.span().end);
            left = self.arena.alloc(ExpressionAst::Binary { span, operator, left, right });
        }
        Some(left)
    }

    /// `.*` / `->*`, binding tighter than any other binary operator.
    fn parse_pm_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let mut left = self.parse_unary_expression()?;
        loop {
            // `OperatorKind` has no dedicated `.*` member; `->*` and `.*`
            // share `ArrowStar` since the binder only needs to tell this
            // family apart from ordinary binary operators, not from each
            // other.
            let operator = match self.kind() {
                TokenKind::DotStar | TokenKind::ArrowStar => OperatorKind::ArrowStar,
                _ => break,
            };
            let builder = SpanBuilder::start(left.span().start);
            self.bump();
            let right = self.parse_unary_expression()?;
            let span = builder.end(right.span().end);
            left = self.arena.alloc(ExpressionAst::Binary { span, operator, left, right });
        }
        Some(left)
    }

    pub(crate) fn parse_unary_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        if !self.enter() {
            self.leave();
            return None;
        }
        let result = self.parse_unary_expression_inner();
        self.leave();
        result
    }

    fn parse_unary_expression_inner(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.pos;
        let operator = match self.kind() {
            TokenKind::PlusPlus => Some(OperatorKind::PlusPlus),
            TokenKind::MinusMinus => Some(OperatorKind::MinusMinus),
            TokenKind::Amp => Some(OperatorKind::Amp),
            TokenKind::Star => Some(OperatorKind::Star),
            TokenKind::Plus => Some(OperatorKind::Plus),
            TokenKind::Minus => Some(OperatorKind::Minus),
            TokenKind::Bang => Some(OperatorKind::Bang),
            TokenKind::Tilde => Some(OperatorKind::Tilde),
            _ => None,
        };
        if let Some(operator) = operator {
            self.bump();
            let operand = self.parse_unary_expression()?;
            let span = Span::new(start, operand.span().end);
            return Some(self.arena.alloc(ExpressionAst::Unary { span, operator, operand }));
        }

        match self.kind() {
            TokenKind::KwSizeof => self.parse_sizeof_expression(),
            TokenKind::KwNew => self.parse_new_expression(),
            TokenKind::KwDelete => self.parse_delete_expression(),
            TokenKind::ColonColon if self.kind_at(1) == TokenKind::KwDelete => {
                self.bump();
                self.parse_delete_expression()
            }
            TokenKind::KwConstCast
            | TokenKind::KwStaticCast
            | TokenKind::KwDynamicCast
            | TokenKind::KwReinterpretCast => self.parse_named_cast(),
            TokenKind::LeftParen if self.looks_like_c_style_cast() => self.parse_c_style_cast(),
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_sizeof_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.bump();
        if self.at(TokenKind::Ellipsis) {
            self.bump();
            self.expect(TokenKind::LeftParen, "'(' after 'sizeof...'");
            let pack = self.pos;
            self.bump();
            let end = self.expect(TokenKind::RightParen, "')' closing 'sizeof...'");
            return Some(self.arena.alloc(ExpressionAst::Sizeof {
                span: Span::new(start, end + 1),
                operand: SizeofOperandAst::VariadicPack(Span::at(pack)),
            }));
        }
        if self.at(TokenKind::LeftParen) && self.looks_like_type_id_in_parens() {
            self.bump();
            let type_id = self.parse_type_id();
            let end = self.expect(TokenKind::RightParen, "')' closing 'sizeof'");
            return Some(self.arena.alloc(ExpressionAst::Sizeof {
                span: Span::new(start, end + 1),
                operand: SizeofOperandAst::Type(type_id),
            }));
        }
        let operand = self.parse_unary_expression()?;
        let span = Span::new(start, operand.span().end);
        Some(self.arena.alloc(ExpressionAst::Sizeof { span, operand: SizeofOperandAst::Expression(operand) }))
    }

    fn parse_new_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.bump();
        let mut placement_list = self.arena.new_list();
        if self.at(TokenKind::LeftParen) && !self.looks_like_type_id_in_parens() {
            self.bump();
            if !self.at(TokenKind::RightParen) {
                loop {
                    placement_list.push(self.parse_assignment_expression()?);
                    if self.eat(TokenKind::Comma).is_none() {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RightParen, "')' closing new-placement");
        }
        let parenthesized_type = self.eat(TokenKind::LeftParen).is_some();
        let type_id = self.parse_type_id();
        if parenthesized_type {
            self.expect(TokenKind::RightParen, "')' closing new type-id");
        }
        let initializer = if self.at(TokenKind::LeftParen) || self.at(TokenKind::LeftBrace) {
            Some(self.parse_braced_or_paren_initializer()?)
        } else {
            None
        };
        let end = initializer.map_or(type_id.span.end, |e| e.span().end);
        Some(self.arena.alloc(ExpressionAst::New {
            span: Span::new(start, end),
            placement: placement_list.into_bump_slice(),
            type_id,
            initializer,
        }))
    }

    pub(crate) fn parse_braced_or_paren_initializer(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        if self.at(TokenKind::LeftBrace) {
            return self.parse_braced_init_list();
        }
        let start = self.bump();
        let mut arguments = self.arena.new_list();
        if !self.at(TokenKind::RightParen) {
            loop {
                arguments.push(self.parse_assignment_expression()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        let end = self.expect(TokenKind::RightParen, "')' closing initializer");
        Some(self.arena.alloc(ExpressionAst::BracedInitList {
            span: Span::new(start, end + 1),
            elements: arguments.into_bump_slice(),
        }))
    }

    fn parse_delete_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.bump();
        let is_array = if self.at(TokenKind::LeftBracket) {
            self.bump();
            self.expect(TokenKind::RightBracket, "']' in 'delete[]'");
            true
        } else {
            false
        };
        let operand = self.parse_unary_expression()?;
        let span = Span::new(start, operand.span().end);
        Some(self.arena.alloc(ExpressionAst::Delete { span, is_array, operand }))
    }

    fn parse_named_cast(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::Less, "'<' after cast keyword");
        let type_id = self.parse_type_id();
        self.expect_angle_close("'>' closing cast type");
        self.expect(TokenKind::LeftParen, "'(' before cast operand");
        let operand = self.parse_expression()?;
        let end = self.expect(TokenKind::RightParen, "')' closing cast");
        Some(self.arena.alloc(ExpressionAst::Cast { span: Span::new(start, end + 1), type_id, operand }))
    }

    fn parse_c_style_cast(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.bump();
        let type_id = self.parse_type_id();
        self.expect(TokenKind::RightParen, "')' closing cast");
        let operand = self.parse_unary_expression()?;
        let span = Span::new(start, operand.span().end);
        Some(self.arena.alloc(ExpressionAst::Cast { span, type_id, operand }))
    }

    /// A conservative guess at whether `(` starts a C-style cast rather
    /// than a parenthesized expression: the parenthesized content must
    /// look like a type-id (a decl-specifier keyword or a known type
    /// name) and be immediately followed by something that can start a
    /// unary expression.
    fn looks_like_c_style_cast(&self) -> bool {
        self.looks_like_type_id_in_parens() && !matches!(self.kind_at(1), TokenKind::RightParen)
    }

    fn looks_like_type_id_in_parens(&self) -> bool {
        self.starts_decl_specifier_at(1)
    }

    fn parse_postfix_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let mut expr = self.parse_primary_expression()?;
        loop {
            expr = match self.kind() {
                TokenKind::LeftBracket => {
                    let builder = SpanBuilder::start(expr.span().start);
                    self.bump();
                    let index = self.parse_expression()?;
                    let end = self.expect(TokenKind::RightBracket, "']' closing subscript");
                    self.arena.alloc(ExpressionAst::ArraySubscript { span: builder.end(end + 1), object: expr, index })
                }
                TokenKind::LeftParen => {
                    let builder = SpanBuilder::start(expr.span().start);
                    self.bump();
                    let mut arguments = self.arena.new_list();
                    if !self.at(TokenKind::RightParen) {
                        loop {
                            arguments.push(self.parse_assignment_expression()?);
                            if self.eat(TokenKind::Comma).is_none() {
                                break;
                            }
                        }
                    }
                    let end = self.expect(TokenKind::RightParen, "')' closing call");
                    self.arena.alloc(ExpressionAst::Call {
                        span: builder.end(end + 1),
                        callee: expr,
                        arguments: arguments.into_bump_slice(),
                    })
                }
                TokenKind::Dot | TokenKind::Arrow => {
                    let is_arrow = self.at(TokenKind::Arrow);
                    let builder = SpanBuilder::start(expr.span().start);
                    self.bump();
                    let is_template = self.eat(TokenKind::KwTemplate).is_some();
                    let name = self.parse_id_expression_name()?;
                    self.arena.alloc(ExpressionAst::Member {
                        span: builder.end(name.span().end),
                        object: expr,
                        is_arrow,
                        is_template,
                        name,
                    })
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let is_increment = self.at(TokenKind::PlusPlus);
                    let builder = SpanBuilder::start(expr.span().start);
                    let end = self.bump();
                    self.arena.alloc(ExpressionAst::PostIncrDecr { span: builder.end(end + 1), is_increment, operand: expr })
                }
                _ => break,
            };
        }
        Some(expr)
    }

    fn parse_primary_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        match self.kind() {
            TokenKind::IntegerLiteral
            | TokenKind::FloatLiteral
            | TokenKind::CharLiteral
            | TokenKind::StringLiteral
            | TokenKind::WideStringLiteral
            | TokenKind::Utf8StringLiteral
            | TokenKind::Utf16StringLiteral
            | TokenKind::Utf32StringLiteral
            | TokenKind::RawStringLiteral
            | TokenKind::KwTrue
            | TokenKind::KwFalse
            | TokenKind::KwNullptr => {
                let index = self.bump();
                Some(self.arena.alloc(ExpressionAst::Literal(Span::at(index))))
            }
            TokenKind::KwThis => {
                let index = self.bump();
                Some(self.arena.alloc(ExpressionAst::This(Span::at(index))))
            }
            TokenKind::LeftParen => {
                let start = self.bump();
                let inner = self.parse_expression()?;
                let end = self.expect(TokenKind::RightParen, "')' closing parenthesized expression");
                Some(self.arena.alloc(ExpressionAst::Nested { span: Span::new(start, end + 1), inner }))
            }
            TokenKind::LeftBrace => self.parse_braced_init_list(),
            TokenKind::LeftBracket => self.parse_bracket_primary(),
            TokenKind::KwAtSelector => self.parse_objc_selector_expression(),
            TokenKind::KwAtEncode => self.parse_objc_encode_expression(),
            TokenKind::KwAtProtocol => self.parse_objc_protocol_expression(),
            TokenKind::Identifier | TokenKind::ColonColon | TokenKind::KwOperator | TokenKind::Tilde => {
                let name = self.parse_id_expression_name()?;
                let span = name.span();
                Some(self.arena.alloc(ExpressionAst::IdExpression { span, name }))
            }
            _ => {
                self.error(self.pos, "expected an expression");
                None
            }
        }
    }

    pub(crate) fn parse_braced_init_list(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.bump();
        if self.at(TokenKind::RightBrace) {
            let end = self.bump();
            return Some(self.arena.alloc(ExpressionAst::BracedInitList { span: Span::new(start, end + 1), elements: &[] }));
        }
        let mut elements = self.arena.new_list();
        loop {
            let element = self.parse_designated_or_assignment_expression()?;
            elements.push(element);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            if self.at(TokenKind::RightBrace) {
                break;
            }
        }
        let end = self.expect(TokenKind::RightBrace, "'}' closing brace-init-list");
        Some(self.arena.alloc(ExpressionAst::BracedInitList {
            span: Span::new(start, end + 1),
            elements: elements.into_bump_slice(),
        }))
    }

    fn parse_designated_or_assignment_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        if !matches!(self.kind(), TokenKind::Dot | TokenKind::LeftBracket) {
            return self.parse_assignment_expression();
        }
        let start = self.pos;
        let mut designators = self.arena.new_list();
        loop {
            match self.kind() {
                TokenKind::Dot => {
                    let dot = self.bump();
                    let name = self.expect(TokenKind::Identifier, "field name in designator");
                    designators.push(DesignatorAst::Dot { span: Span::new(dot, name + 1), name: Span::at(name) });
                }
                TokenKind::LeftBracket => {
                    let open = self.bump();
                    let index = self.parse_expression()?;
                    let end = self.expect(TokenKind::RightBracket, "']' closing designator");
                    designators.push(DesignatorAst::Bracket { span: Span::new(open, end + 1), index });
                }
                _ => break,
            }
        }
        self.expect(TokenKind::Assign, "'=' in designated initializer");
        let value = self.parse_assignment_expression()?;
        let span = Span::new(start, value.span().end);
        Some(self.arena.alloc(ExpressionAst::DesignatedInitializer(DesignatedInitializerAst {
            span,
            designators: designators.into_bump_slice(),
            value,
        })))
    }

    pub(crate) fn parse_lambda_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.bump();
        let mut captures = self.arena.new_list();
        if !self.at(TokenKind::RightBracket) {
            loop {
                let capture_start = self.pos;
                let by_reference = self.eat(TokenKind::Amp).is_some();
                let name = if self.at(TokenKind::Identifier) {
                    let index = self.bump();
                    Some(Span::at(index))
                } else {
                    None
                };
                captures.push(LambdaCaptureAst {
                    span: Span::new(capture_start, self.pos),
                    by_reference,
                    name,
                });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightBracket, "']' closing lambda-introducer");

        let mut parameters = self.arena.new_list();
        if self.eat(TokenKind::LeftParen).is_some() {
            if !self.at(TokenKind::RightParen) {
                loop {
                    parameters.push(self.parse_parameter()?);
                    if self.eat(TokenKind::Comma).is_none() {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RightParen, "')' closing lambda parameter list");
        }

        let is_mutable = self.at_identifier("mutable");
        if is_mutable {
            self.bump();
        }

        let trailing_return_type = if self.eat(TokenKind::Arrow).is_some() {
            Some(self.parse_type_id())
        } else {
            None
        };

        let body = self.parse_compound_statement()?;
        let span = Span::new(start, body.span().end);
        Some(self.arena.alloc(ExpressionAst::Lambda(LambdaExpressionAst {
            span,
            captures: captures.into_bump_slice(),
            parameters: parameters.into_bump_slice(),
            is_mutable,
            trailing_return_type,
            body,
        })))
    }

    pub(crate) fn starts_expression(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::CharLiteral
                | TokenKind::StringLiteral
                | TokenKind::WideStringLiteral
                | TokenKind::Utf8StringLiteral
                | TokenKind::Utf16StringLiteral
                | TokenKind::Utf32StringLiteral
                | TokenKind::RawStringLiteral
                | TokenKind::KwTrue
                | TokenKind::KwFalse
                | TokenKind::KwNullptr
                | TokenKind::KwThis
                | TokenKind::Identifier
                | TokenKind::ColonColon
                | TokenKind::KwOperator
                | TokenKind::LeftParen
                | TokenKind::LeftBrace
                | TokenKind::LeftBracket
                | TokenKind::Tilde
                | TokenKind::Bang
                | TokenKind::Amp
                | TokenKind::Star
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::KwSizeof
                | TokenKind::KwNew
                | TokenKind::KwDelete
                | TokenKind::KwThrow
                | TokenKind::KwConstCast
                | TokenKind::KwStaticCast
                | TokenKind::KwDynamicCast
                | TokenKind::KwReinterpretCast
        )
    }
}

fn assignment_operator(kind: TokenKind) -> Option<OperatorKind> {
    Some(match kind {
        TokenKind::Assign => OperatorKind::Assign,
        TokenKind::PlusAssign => OperatorKind::PlusAssign,
        TokenKind::MinusAssign => OperatorKind::MinusAssign,
        TokenKind::StarAssign => OperatorKind::StarAssign,
        TokenKind::SlashAssign => OperatorKind::SlashAssign,
        TokenKind::PercentAssign => OperatorKind::PercentAssign,
        TokenKind::AmpAssign => OperatorKind::AmpAssign,
        TokenKind::PipeAssign => OperatorKind::PipeAssign,
        TokenKind::CaretAssign => OperatorKind::CaretAssign,
        TokenKind::LeftShiftAssign => OperatorKind::LeftShiftAssign,
        TokenKind::RightShiftAssign => OperatorKind::RightShiftAssign,
        _ => return None,
    })
}

/// Binary operator and its precedence level (higher binds tighter).
/// Matches the usual C++ ladder: logical-or, logical-and, bitor, bitxor,
/// bitand, equality, relational, shift, additive, multiplicative.
fn binary_operator(kind: TokenKind) -> Option<(OperatorKind, u8)> {
    Some(match kind {
        TokenKind::PipePipe => (OperatorKind::PipePipe, 1),
        TokenKind::AmpAmp => (OperatorKind::AmpAmp, 2),
        TokenKind::Pipe => (OperatorKind::Pipe, 3),
        TokenKind::Caret => (OperatorKind::Caret, 4),
        TokenKind::Amp => (OperatorKind::Amp, 5),
        TokenKind::EqualEqual => (OperatorKind::Equal, 6),
        TokenKind::NotEqual => (OperatorKind::NotEqual, 6),
        TokenKind::Less => (OperatorKind::Less, 7),
        TokenKind::Greater => (OperatorKind::Greater, 7),
        TokenKind::LessEqual => (OperatorKind::LessEqual, 7),
        TokenKind::GreaterEqual => (OperatorKind::GreaterEqual, 7),
        TokenKind::LeftShift => (OperatorKind::LeftShift, 8),
        TokenKind::GreaterGreater => (OperatorKind::RightShift, 8),
        TokenKind::Plus => (OperatorKind::Plus, 9),
        TokenKind::Minus => (OperatorKind::Minus, 9),
        TokenKind::Star => (OperatorKind::Star, 10),
        TokenKind::Slash => (OperatorKind::Slash, 10),
        TokenKind::Percent => (OperatorKind::Percent, 10),
        _ => return None,
    })
}
