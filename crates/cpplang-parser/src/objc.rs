//! Objective-C syntax: `@interface`/`@implementation`/`@protocol`,
//! methods, properties, instance variables, and message-send/`@selector`/
//! `@encode`/`@protocol` expressions. Also owns the `[` disambiguation
//! between a lambda introducer and a message send, since both start
//! identically.

use crate::Parser;
use cpplang_arena::List;
use cpplang_ast::{
    CoreDeclaratorAst, DeclarationAst, ExpressionAst, NameAst, ObjcDeclarationAst, ObjcInstanceVariableAst,
    ObjcMessageArgumentAst, ObjcMethodParameterAst, ObjcMethodPrototypeAst, ObjcVisibility,
};
use cpplang_common::Span;
use cpplang_lexer::TokenKind;

impl<'a, 'ctrl> Parser<'a, 'ctrl> {
    pub(crate) fn at_objc_declaration(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::KwAtInterface
                | TokenKind::KwAtImplementation
                | TokenKind::KwAtProtocol
                | TokenKind::KwAtClass
                | TokenKind::KwAtProperty
                | TokenKind::KwAtSynthesize
                | TokenKind::KwAtDynamic
                | TokenKind::KwAtEnd
        )
    }

    pub(crate) fn parse_objc_declaration(&mut self) -> Option<DeclarationAst<'ctrl>> {
        let node = match self.kind() {
            TokenKind::KwAtInterface => self.parse_objc_class_interface()?,
            TokenKind::KwAtImplementation => self.parse_objc_class_implementation()?,
            TokenKind::KwAtProtocol => self.parse_objc_protocol_or_forward()?,
            TokenKind::KwAtClass => self.parse_objc_class_forward()?,
            TokenKind::KwAtProperty => self.parse_objc_property_declaration()?,
            TokenKind::KwAtSynthesize => self.parse_objc_synthesize_single()?,
            TokenKind::KwAtDynamic => self.parse_objc_dynamic_single()?,
            TokenKind::KwAtEnd => {
                let index = self.bump();
                return Some(DeclarationAst::Empty(Span::at(index)));
            }
            _ => return None,
        };
        Some(DeclarationAst::Objc(node))
    }

    fn parse_objc_class_interface(&mut self) -> Option<ObjcDeclarationAst<'ctrl>> {
        let start = self.bump();
        let name = self.expect(TokenKind::Identifier, "interface name");
        let category = self.parse_optional_category();
        let superclass = if category.is_none() && self.eat(TokenKind::Colon).is_some() { self.parse_name() } else { None };
        let protocols = self.parse_optional_protocol_list();
        let instance_variables = if self.at(TokenKind::LeftBrace) { self.parse_objc_ivar_block() } else { &[] };
        let members = self.parse_objc_member_list();
        Some(ObjcDeclarationAst::ClassInterface {
            span: Span::new(start, self.pos()),
            name: Span::at(name),
            category,
            superclass,
            protocols,
            instance_variables,
            members,
        })
    }

    fn parse_objc_class_implementation(&mut self) -> Option<ObjcDeclarationAst<'ctrl>> {
        let start = self.bump();
        let name = self.expect(TokenKind::Identifier, "implementation name");
        let category = self.parse_optional_category();
        if category.is_none() && self.eat(TokenKind::Colon).is_some() {
            // `@implementation Foo : Base` repeats information the
            // interface already carries; parsed for token balance, not
            // represented (`ClassImplementation` has no superclass field).
            let _ = self.parse_name();
        }
        let instance_variables = if self.at(TokenKind::LeftBrace) { self.parse_objc_ivar_block() } else { &[] };
        let members = self.parse_objc_member_list();
        Some(ObjcDeclarationAst::ClassImplementation {
            span: Span::new(start, self.pos()),
            name: Span::at(name),
            category,
            instance_variables,
            members,
        })
    }

    fn parse_optional_category(&mut self) -> Option<Span> {
        if self.eat(TokenKind::LeftParen).is_none() {
            return None;
        }
        let category = self.eat(TokenKind::Identifier).map(Span::at);
        self.expect(TokenKind::RightParen, "')' closing category name");
        category
    }

    fn parse_optional_protocol_list(&mut self) -> &'ctrl [Span] {
        if self.eat(TokenKind::Less).is_none() {
            return &[];
        }
        let mut protocols = self.arena.new_list();
        loop {
            protocols.push(Span::at(self.expect(TokenKind::Identifier, "protocol name")));
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect_angle_close("'>' closing protocol list");
        protocols.into_bump_slice()
    }

    fn parse_objc_ivar_block(&mut self) -> &'ctrl [ObjcInstanceVariableAst<'ctrl>] {
        self.expect(TokenKind::LeftBrace, "'{' opening instance-variable block");
        let mut ivars = self.arena.new_list();
        let mut visibility = None;
        while !self.at(TokenKind::RightBrace) && !self.at_eof() {
            let before = self.pos();
            if let Some((marker, tokens)) = self.objc_visibility_marker() {
                visibility = Some(marker);
                for _ in 0..tokens {
                    self.bump();
                }
                continue;
            }
            let start = self.pos();
            let specifiers = self.parse_decl_specifier_seq();
            if let Some(declarator) = self.parse_declarator() {
                if let CoreDeclaratorAst::Id(name) = declarator.core {
                    ivars.push(ObjcInstanceVariableAst { span: Span::new(start, self.pos()), visibility, specifiers, name: name.span() });
                }
            }
            self.eat(TokenKind::Semicolon);
            if self.pos() == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RightBrace, "'}' closing instance-variable block");
        ivars.into_bump_slice()
    }

    /// `@private`/`@protected`/`@public` lex as a bare `@` followed by the
    /// ordinary C++ keyword token; `@package` has its own dedicated token
    /// since C++ has no bare `package` keyword to reuse. Returns the
    /// visibility and how many tokens it spans, so the caller can consume
    /// exactly that many.
    fn objc_visibility_marker(&self) -> Option<(ObjcVisibility, u32)> {
        if self.at(TokenKind::KwAtPackage) {
            return Some((ObjcVisibility::Package, 1));
        }
        if self.at(TokenKind::At) {
            let visibility = match self.kind_at(1) {
                TokenKind::KwPrivate => ObjcVisibility::Private,
                TokenKind::KwProtected => ObjcVisibility::Protected,
                TokenKind::KwPublic => ObjcVisibility::Public,
                _ => return None,
            };
            return Some((visibility, 2));
        }
        None
    }

    pub(crate) fn parse_objc_member_list(&mut self) -> &'ctrl [&'ctrl DeclarationAst<'ctrl>] {
        let mut members: List<'ctrl, &'ctrl DeclarationAst<'ctrl>> = self.arena.new_list();
        while !self.at(TokenKind::KwAtEnd) && !self.at_eof() {
            let before = self.pos();
            if self.at(TokenKind::KwAtSynthesize) {
                self.parse_objc_synthesize_group(&mut members);
            } else if self.at(TokenKind::KwAtDynamic) {
                self.parse_objc_dynamic_group(&mut members);
            } else if matches!(self.kind(), TokenKind::KwAtOptional | TokenKind::KwAtRequired) {
                self.bump();
            } else if let Some((visibility, tokens)) = self.objc_visibility_marker() {
                let start = self.pos();
                for _ in 0..tokens {
                    self.bump();
                }
                members.push(self.arena.alloc(DeclarationAst::Objc(ObjcDeclarationAst::VisibilityMarker {
                    span: Span::new(start, self.pos()),
                    visibility,
                })));
            } else if matches!(self.kind(), TokenKind::Plus | TokenKind::Minus) {
                if let Some(method) = self.parse_objc_method() {
                    members.push(self.arena.alloc(DeclarationAst::Objc(method)));
                }
            } else if let Some(label) = self.parse_access_label_if_present() {
                members.push(self.arena.alloc(label));
            } else if self.at_objc_declaration() {
                if let Some(decl) = self.parse_objc_declaration() {
                    members.push(self.arena.alloc(decl));
                }
            } else if let Some(decl) = self.parse_declaration() {
                members.push(self.arena.alloc(decl));
            }
            if self.pos() == before {
                self.bump();
            }
        }
        self.eat(TokenKind::KwAtEnd);
        members.into_bump_slice()
    }

    /// Pushes one `PropertySynthesize` node per comma-separated property,
    /// since the AST node only models a single property.
    fn parse_objc_synthesize_group(&mut self, members: &mut List<'ctrl, &'ctrl DeclarationAst<'ctrl>>) {
        self.bump();
        loop {
            let Some(prop_index) = self.eat(TokenKind::Identifier) else { break };
            let backing_ivar = if self.eat(TokenKind::Assign).is_some() { self.eat(TokenKind::Identifier).map(Span::at) } else { None };
            members.push(self.arena.alloc(DeclarationAst::Objc(ObjcDeclarationAst::PropertySynthesize {
                span: Span::new(prop_index, self.pos()),
                property: Span::at(prop_index),
                backing_ivar,
            })));
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Semicolon, "';' after '@synthesize'");
    }

    fn parse_objc_dynamic_group(&mut self, members: &mut List<'ctrl, &'ctrl DeclarationAst<'ctrl>>) {
        self.bump();
        loop {
            let Some(prop_index) = self.eat(TokenKind::Identifier) else { break };
            members.push(self.arena.alloc(DeclarationAst::Objc(ObjcDeclarationAst::PropertyDynamic {
                span: Span::at(prop_index),
                property: Span::at(prop_index),
            })));
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Semicolon, "';' after '@dynamic'");
    }

    fn parse_objc_synthesize_single(&mut self) -> Option<ObjcDeclarationAst<'ctrl>> {
        let start = self.bump();
        let prop_index = self.expect(TokenKind::Identifier, "property name after '@synthesize'");
        let backing_ivar = if self.eat(TokenKind::Assign).is_some() { self.eat(TokenKind::Identifier).map(Span::at) } else { None };
        while self.eat(TokenKind::Comma).is_some() {
            self.eat(TokenKind::Identifier);
            if self.eat(TokenKind::Assign).is_some() {
                self.eat(TokenKind::Identifier);
            }
        }
        let end = self.expect(TokenKind::Semicolon, "';' after '@synthesize'");
        Some(ObjcDeclarationAst::PropertySynthesize { span: Span::new(start, end + 1), property: Span::at(prop_index), backing_ivar })
    }

    fn parse_objc_dynamic_single(&mut self) -> Option<ObjcDeclarationAst<'ctrl>> {
        let start = self.bump();
        let prop_index = self.expect(TokenKind::Identifier, "property name after '@dynamic'");
        while self.eat(TokenKind::Comma).is_some() {
            self.eat(TokenKind::Identifier);
        }
        let end = self.expect(TokenKind::Semicolon, "';' after '@dynamic'");
        Some(ObjcDeclarationAst::PropertyDynamic { span: Span::new(start, end + 1), property: Span::at(prop_index) })
    }

    fn parse_objc_property_declaration(&mut self) -> Option<ObjcDeclarationAst<'ctrl>> {
        let start = self.bump();
        let mut attributes = self.arena.new_list();
        if self.eat(TokenKind::LeftParen).is_some() {
            if !self.at(TokenKind::RightParen) {
                loop {
                    attributes.push(Span::at(self.expect(TokenKind::Identifier, "property attribute")));
                    if self.eat(TokenKind::Assign).is_some() {
                        self.expect(TokenKind::Identifier, "property attribute value");
                    }
                    if self.eat(TokenKind::Comma).is_none() {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RightParen, "')' closing property attributes");
        }
        let type_id = self.parse_type_id();
        let name = self.expect(TokenKind::Identifier, "property name");
        let end = self.expect(TokenKind::Semicolon, "';' after '@property' declaration");
        Some(ObjcDeclarationAst::PropertyDeclaration {
            span: Span::new(start, end + 1),
            attributes: attributes.into_bump_slice(),
            type_id,
            name: Span::at(name),
        })
    }

    fn parse_objc_method_prototype(&mut self) -> Option<ObjcMethodPrototypeAst<'ctrl>> {
        let start = self.pos();
        let is_class_method = self.at(TokenKind::Plus);
        self.bump();
        let return_type = if self.eat(TokenKind::LeftParen).is_some() {
            let type_id = self.parse_type_id();
            self.expect(TokenKind::RightParen, "')' closing method return type");
            Some(type_id)
        } else {
            None
        };
        let mut parameters = self.arena.new_list();
        let mut is_variadic = false;
        if self.at(TokenKind::Identifier) && self.kind_at(1) == TokenKind::Colon {
            loop {
                let sel_index = self.bump();
                self.expect(TokenKind::Colon, "':' in method selector");
                let type_id = if self.eat(TokenKind::LeftParen).is_some() {
                    let type_id = self.parse_type_id();
                    self.expect(TokenKind::RightParen, "')' closing parameter type");
                    Some(type_id)
                } else {
                    None
                };
                let name = self.eat(TokenKind::Identifier).map(Span::at);
                parameters.push(ObjcMethodParameterAst {
                    span: Span::new(sel_index, self.pos()),
                    selector_part: Some(Span::at(sel_index)),
                    type_id,
                    name,
                });
                if self.at(TokenKind::Comma) && self.kind_at(1) == TokenKind::Ellipsis {
                    self.bump();
                    self.bump();
                    is_variadic = true;
                    break;
                }
                if !(self.at(TokenKind::Identifier) && self.kind_at(1) == TokenKind::Colon) {
                    break;
                }
            }
        } else if self.at(TokenKind::Identifier) {
            let sel_index = self.bump();
            parameters.push(ObjcMethodParameterAst {
                span: Span::at(sel_index),
                selector_part: Some(Span::at(sel_index)),
                type_id: None,
                name: None,
            });
        }
        Some(ObjcMethodPrototypeAst {
            span: Span::new(start, self.pos()),
            is_class_method,
            return_type,
            parameters: parameters.into_bump_slice(),
            is_variadic,
        })
    }

    fn parse_objc_method(&mut self) -> Option<ObjcDeclarationAst<'ctrl>> {
        let start = self.pos();
        let prototype = self.parse_objc_method_prototype()?;
        if self.at(TokenKind::LeftBrace) {
            let body = self.parse_compound_statement()?;
            return Some(ObjcDeclarationAst::MethodDefinition { span: Span::new(start, self.pos()), prototype, body });
        }
        self.expect(TokenKind::Semicolon, "';' after method declaration");
        Some(ObjcDeclarationAst::MethodDeclaration(prototype))
    }

    fn parse_objc_protocol_or_forward(&mut self) -> Option<ObjcDeclarationAst<'ctrl>> {
        let start = self.bump();
        let first = self.expect(TokenKind::Identifier, "protocol name");
        if matches!(self.kind(), TokenKind::Comma | TokenKind::Semicolon) {
            let mut names = self.arena.new_list();
            names.push(Span::at(first));
            while self.eat(TokenKind::Comma).is_some() {
                names.push(Span::at(self.expect(TokenKind::Identifier, "protocol name")));
            }
            let end = self.expect(TokenKind::Semicolon, "';' after protocol forward declaration");
            return Some(ObjcDeclarationAst::ProtocolForwardDeclaration {
                span: Span::new(start, end + 1),
                names: names.into_bump_slice(),
            });
        }
        let protocols = self.parse_optional_protocol_list();
        let members = self.parse_objc_member_list();
        Some(ObjcDeclarationAst::ProtocolDeclaration { span: Span::new(start, self.pos()), name: Span::at(first), protocols, members })
    }

    fn parse_objc_class_forward(&mut self) -> Option<ObjcDeclarationAst<'ctrl>> {
        let start = self.bump();
        let mut names = self.arena.new_list();
        names.push(Span::at(self.expect(TokenKind::Identifier, "class name")));
        while self.eat(TokenKind::Comma).is_some() {
            names.push(Span::at(self.expect(TokenKind::Identifier, "class name")));
        }
        let end = self.expect(TokenKind::Semicolon, "';' after '@class' forward declaration");
        Some(ObjcDeclarationAst::ClassForwardDeclaration { span: Span::new(start, end + 1), names: names.into_bump_slice() })
    }

    // --- expressions ------------------------------------------------------

    /// `[` starts either a lambda or a message send; both look identical up
    /// to the matching `]`. A lambda is always immediately followed by a
    /// parameter list or a body; a message send, being a complete primary
    /// expression, never is.
    pub(crate) fn parse_bracket_primary(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        if self.looks_like_lambda_introducer() {
            self.parse_lambda_expression()
        } else {
            self.parse_objc_message_expression()
        }
    }

    fn looks_like_lambda_introducer(&self) -> bool {
        let mut offset = 1u32;
        let mut depth = 1i32;
        loop {
            match self.kind_at(offset) {
                TokenKind::LeftBracket => depth += 1,
                TokenKind::RightBracket => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Semicolon | TokenKind::Eof => return false,
                _ => {}
            }
            offset += 1;
            if offset > 512 {
                return false;
            }
        }
        offset += 1;
        matches!(self.kind_at(offset), TokenKind::LeftParen | TokenKind::LeftBrace | TokenKind::KwMutable)
    }

    fn parse_objc_message_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.bump();
        let receiver = self.parse_unary_expression()?;
        let mut arguments = self.arena.new_list();
        if self.at(TokenKind::Identifier) && self.kind_at(1) == TokenKind::Colon {
            loop {
                let sel_index = self.bump();
                self.bump();
                let value = self.parse_assignment_expression()?;
                arguments.push(ObjcMessageArgumentAst { selector_part: Some(Span::at(sel_index)), value: Some(value) });
                if !(self.at(TokenKind::Identifier) && self.kind_at(1) == TokenKind::Colon) {
                    break;
                }
            }
        } else if self.at(TokenKind::Identifier) {
            let sel_index = self.bump();
            arguments.push(ObjcMessageArgumentAst { selector_part: Some(Span::at(sel_index)), value: None });
        }
        let end = self.expect(TokenKind::RightBracket, "']' closing message expression");
        Some(self.arena.alloc(ExpressionAst::ObjcMessageExpression {
            span: Span::new(start, end + 1),
            receiver,
            arguments: arguments.into_bump_slice(),
        }))
    }

    pub(crate) fn parse_objc_selector_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after '@selector'");
        let selector = self.parse_selector_name()?;
        let end = self.expect(TokenKind::RightParen, "')' closing '@selector'");
        Some(self.arena.alloc(ExpressionAst::ObjcSelectorExpression { span: Span::new(start, end + 1), selector }))
    }

    fn parse_selector_name(&mut self) -> Option<&'ctrl NameAst<'ctrl>> {
        let start = self.pos();
        let mut parts = self.arena.new_list();
        let has_arguments = self.kind_at(1) == TokenKind::Colon;
        if has_arguments {
            loop {
                parts.push(Span::at(self.expect(TokenKind::Identifier, "selector keyword")));
                self.expect(TokenKind::Colon, "':' in selector");
                if !(self.at(TokenKind::Identifier) && self.kind_at(1) == TokenKind::Colon) {
                    if self.at(TokenKind::RightParen) {
                        break;
                    }
                    continue;
                }
            }
        } else {
            parts.push(Span::at(self.expect(TokenKind::Identifier, "selector name")));
        }
        Some(self.arena.alloc(NameAst::Selector { span: Span::new(start, self.pos()), parts: parts.into_bump_slice(), has_arguments }))
    }

    pub(crate) fn parse_objc_encode_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after '@encode'");
        let type_id = self.parse_type_id();
        let end = self.expect(TokenKind::RightParen, "')' closing '@encode'");
        Some(self.arena.alloc(ExpressionAst::ObjcEncode { span: Span::new(start, end + 1), type_id }))
    }

    pub(crate) fn parse_objc_protocol_expression(&mut self) -> Option<&'ctrl ExpressionAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after '@protocol'");
        let name = self.expect(TokenKind::Identifier, "protocol name");
        let end = self.expect(TokenKind::RightParen, "')' closing '@protocol'");
        Some(self.arena.alloc(ExpressionAst::ObjcProtocolExpression { span: Span::new(start, end + 1), name: Span::at(name) }))
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_translation_unit;
    use cpplang_arena::Arena;
    use cpplang_ast::{DeclarationAst, ExpressionAst, ObjcDeclarationAst, StatementAst};
    use cpplang_common::FrontendOptions;
    use cpplang_control::Control;
    use cpplang_tu::TranslationUnit;

    macro_rules! parse {
        ($ast:ident, $source:expr) => {
            let arena = Arena::new();
            let control = Control::new(&arena);
            let options = FrontendOptions::default();
            let mut tu = TranslationUnit::new("test.m", $source, &control, options.lexer_flags);
            let $ast = parse_translation_unit(&mut tu, &control);
        };
    }

    #[test]
    fn class_interface_with_ivars_and_property_parses() {
        parse!(
            ast,
            "@interface Widget : NSObject { int _count; } @property (nonatomic) NSString *name; - (void)tick; @end"
        );
        assert_eq!(ast.declarations.len(), 1);
        match ast.declarations[0] {
            DeclarationAst::Objc(ObjcDeclarationAst::ClassInterface { instance_variables, members, .. }) => {
                assert_eq!(instance_variables.len(), 1);
                assert!(members.len() >= 2);
            }
            ref other => panic!("unexpected declaration: {other:?}"),
        }
    }

    #[test]
    fn method_definition_with_keyword_selector_parses() {
        parse!(
            ast,
            "@implementation Widget - (void)setWidth:(int)w height:(int)h { self->width = w; } @end"
        );
        match ast.declarations[0] {
            DeclarationAst::Objc(ObjcDeclarationAst::ClassImplementation { members, .. }) => {
                assert_eq!(members.len(), 1);
                match *members[0] {
                    DeclarationAst::Objc(ObjcDeclarationAst::MethodDefinition { ref prototype, .. }) => {
                        assert_eq!(prototype.parameters.len(), 2);
                    }
                    ref other => panic!("unexpected member: {other:?}"),
                }
            }
            ref other => panic!("unexpected declaration: {other:?}"),
        }
    }

    #[test]
    fn message_send_with_keyword_selector_parses() {
        parse!(ast, "void f() { [view setFrame:frame animated:yes]; }");
        match ast.declarations[0] {
            DeclarationAst::FunctionDefinition { body, .. } => match *body {
                StatementAst::Compound { statements, .. } => match statements[0] {
                    StatementAst::Expression { expression: Some(expr), .. } => {
                        assert!(matches!(expr, ExpressionAst::ObjcMessageExpression { arguments, .. } if arguments.len() == 2));
                    }
                    ref other => panic!("unexpected statement: {other:?}"),
                },
                ref other => panic!("unexpected body: {other:?}"),
            },
            ref other => panic!("unexpected declaration: {other:?}"),
        }
    }

    #[test]
    fn lambda_still_parses_alongside_message_sends() {
        parse!(ast, "void f() { auto add = [](int a, int b) { return a + b; }; }");
        match ast.declarations[0] {
            DeclarationAst::FunctionDefinition { .. } => {}
            ref other => panic!("unexpected declaration: {other:?}"),
        }
    }

    #[test]
    fn synthesize_with_multiple_properties_expands() {
        parse!(ast, "@implementation Widget @synthesize name, age; @end");
        match ast.declarations[0] {
            DeclarationAst::Objc(ObjcDeclarationAst::ClassImplementation { members, .. }) => {
                assert_eq!(members.len(), 2);
            }
            ref other => panic!("unexpected declaration: {other:?}"),
        }
    }
}
