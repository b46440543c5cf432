//! Qt MOC macro syntax: `Q_OBJECT`, `Q_PROPERTY`, `Q_ENUMS`/`Q_FLAGS`,
//! `Q_PRIVATE_SLOT`, and the `Q_D`/`Q_Q` private-implementation pointer
//! macros. None of these lex as dedicated keyword tokens; they're plain
//! identifiers recognized by spelling, the same way the preprocessor
//! leaves them for the parser to make sense of.

use crate::Parser;
use cpplang_ast::{DeclarationAst, QtDeclarationAst, QtPropertyDeclarationAst, QtPropertyFlags, StatementAst};
use cpplang_common::Span;
use cpplang_lexer::TokenKind;

impl<'a, 'ctrl> Parser<'a, 'ctrl> {
    pub(crate) fn at_qt_construct(&self) -> bool {
        self.at(TokenKind::Identifier)
            && matches!(
                self.spelling(),
                "Q_OBJECT"
                    | "Q_PROPERTY"
                    | "Q_ENUMS"
                    | "Q_FLAGS"
                    | "Q_PRIVATE_SLOT"
                    | "Q_D"
                    | "Q_Q"
            )
    }

    pub(crate) fn parse_qt_declaration(&mut self) -> Option<DeclarationAst<'ctrl>> {
        let node = self.parse_qt_construct()?;
        Some(DeclarationAst::Qt(node))
    }

    pub(crate) fn parse_qt_statement(&mut self) -> Option<&'ctrl StatementAst<'ctrl>> {
        let start = self.pos();
        let node = self.parse_qt_construct()?;
        let declaration = self.arena.alloc(DeclarationAst::Qt(node));
        Some(self.arena.alloc(StatementAst::Declaration { span: Span::new(start, self.pos()), declaration }))
    }

    fn parse_qt_construct(&mut self) -> Option<QtDeclarationAst<'ctrl>> {
        match self.spelling() {
            "Q_OBJECT" => {
                let index = self.bump();
                Some(QtDeclarationAst::Object(Span::at(index)))
            }
            "Q_PROPERTY" => self.parse_q_property(),
            "Q_ENUMS" => self.parse_q_name_list(true),
            "Q_FLAGS" => self.parse_q_name_list(false),
            "Q_PRIVATE_SLOT" => self.parse_q_private_slot(),
            "Q_D" => self.parse_q_d_or_q_q(true),
            "Q_Q" => self.parse_q_d_or_q_q(false),
            _ => None,
        }
    }

    fn parse_q_property(&mut self) -> Option<QtDeclarationAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after 'Q_PROPERTY'");
        let type_id = self.parse_type_id();
        let name = self.expect(TokenKind::Identifier, "property name in 'Q_PROPERTY'");
        let mut flags = QtPropertyFlags::empty();
        let mut read = None;
        let mut write = None;
        let mut reset = None;
        let mut notify = None;
        while self.at(TokenKind::Identifier) {
            match self.spelling() {
                "READ" => {
                    self.bump();
                    flags |= QtPropertyFlags::READ;
                    read = self.eat(TokenKind::Identifier).map(Span::at);
                }
                "WRITE" => {
                    self.bump();
                    flags |= QtPropertyFlags::WRITE;
                    write = self.eat(TokenKind::Identifier).map(Span::at);
                }
                "RESET" => {
                    self.bump();
                    flags |= QtPropertyFlags::RESET;
                    reset = self.eat(TokenKind::Identifier).map(Span::at);
                }
                "NOTIFY" => {
                    self.bump();
                    flags |= QtPropertyFlags::NOTIFY;
                    notify = self.eat(TokenKind::Identifier).map(Span::at);
                }
                "DESIGNABLE" => {
                    self.bump();
                    flags |= QtPropertyFlags::DESIGNABLE;
                    self.eat_q_property_argument();
                }
                "SCRIPTABLE" => {
                    self.bump();
                    flags |= QtPropertyFlags::SCRIPTABLE;
                    self.eat_q_property_argument();
                }
                "STORED" => {
                    self.bump();
                    flags |= QtPropertyFlags::STORED;
                    self.eat_q_property_argument();
                }
                "CONSTANT" => {
                    self.bump();
                    flags |= QtPropertyFlags::CONSTANT;
                }
                "FINAL" => {
                    self.bump();
                    flags |= QtPropertyFlags::FINAL;
                }
                "MEMBER" => {
                    self.bump();
                    flags |= QtPropertyFlags::MEMBER;
                    self.eat(TokenKind::Identifier);
                }
                "USER" => {
                    self.bump();
                    flags |= QtPropertyFlags::USER;
                    self.eat_q_property_argument();
                }
                _ => break,
            }
        }
        let end = self.expect(TokenKind::RightParen, "')' closing 'Q_PROPERTY'");
        Some(QtDeclarationAst::Property(QtPropertyDeclarationAst {
            span: Span::new(start, end + 1),
            type_id,
            name: Span::at(name),
            flags,
            read,
            write,
            reset,
            notify,
        }))
    }

    /// `DESIGNABLE`/`SCRIPTABLE`/`STORED`/`USER` may take a bare `true`/
    /// `false` or an identifier naming an accessor; either way, it's a
    /// single token we don't otherwise represent.
    fn eat_q_property_argument(&mut self) {
        if matches!(self.kind(), TokenKind::Identifier | TokenKind::KwTrue | TokenKind::KwFalse) {
            self.bump();
        }
    }

    fn parse_q_name_list(&mut self, is_enums: bool) -> Option<QtDeclarationAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after Qt name-list macro");
        let mut names = self.arena.new_list();
        while self.at(TokenKind::Identifier) {
            names.push(Span::at(self.bump()));
        }
        let end = self.expect(TokenKind::RightParen, "')' closing Qt name-list macro");
        let span = Span::new(start, end + 1);
        let names = names.into_bump_slice();
        Some(if is_enums { QtDeclarationAst::Enums { span, names } } else { QtDeclarationAst::Flags { span, names } })
    }

    fn parse_q_private_slot(&mut self) -> Option<QtDeclarationAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after 'Q_PRIVATE_SLOT'");
        let object = self.expect(TokenKind::Identifier, "private-implementation pointer in 'Q_PRIVATE_SLOT'");
        self.expect(TokenKind::Comma, "',' in 'Q_PRIVATE_SLOT'");
        let signature_start = self.pos();
        let mut depth = 0i32;
        while !(depth == 0 && self.at(TokenKind::RightParen)) && !self.at_eof() {
            match self.kind() {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                _ => {}
            }
            self.bump();
        }
        let end = self.expect(TokenKind::RightParen, "')' closing 'Q_PRIVATE_SLOT'");
        Some(QtDeclarationAst::PrivateSlot {
            span: Span::new(start, end + 1),
            object: Span::at(object),
            signature: Span::new(signature_start, end),
        })
    }

    fn parse_q_d_or_q_q(&mut self, is_d: bool) -> Option<QtDeclarationAst<'ctrl>> {
        let start = self.bump();
        self.expect(TokenKind::LeftParen, "'(' after Qt private-implementation macro");
        let class_name = self.expect(TokenKind::Identifier, "class name in Qt private-implementation macro");
        let end = self.expect(TokenKind::RightParen, "')' closing Qt private-implementation macro");
        let span = Span::new(start, end + 1);
        let class_name = Span::at(class_name);
        Some(if is_d { QtDeclarationAst::PrivatePointer { span, class_name } } else { QtDeclarationAst::QPointer { span, class_name } })
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_translation_unit;
    use cpplang_arena::Arena;
    use cpplang_ast::{DeclarationAst, QtDeclarationAst, StatementAst};
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

    #[test]
    fn q_object_macro_inside_class_body_parses() {
        parse!(ast, "class Widget { Q_OBJECT public: Widget(); };");
        match ast.declarations[0] {
            DeclarationAst::Simple { .. } => {}
            ref other => panic!("unexpected declaration: {other:?}"),
        }
    }

    #[test]
    fn q_property_with_read_write_notify_parses() {
        parse!(
            ast,
            "class Widget { Q_PROPERTY(int width READ width WRITE setWidth NOTIFY widthChanged) };"
        );
        match ast.declarations[0] {
            DeclarationAst::Simple { .. } => {}
            ref other => panic!("unexpected declaration: {other:?}"),
        }
    }

    #[test]
    fn q_d_inside_method_body_parses_as_statement() {
        parse!(ast, "void Widget::resize() { Q_D(Widget); d->doResize(); }");
        match ast.declarations[0] {
            DeclarationAst::FunctionDefinition { body, .. } => match *body {
                StatementAst::Compound { statements, .. } => {
                    assert!(matches!(
                        statements[0],
                        StatementAst::Declaration { declaration: DeclarationAst::Qt(QtDeclarationAst::PrivatePointer { .. }), .. }
                    ));
                }
                ref other => panic!("unexpected body: {other:?}"),
            },
            ref other => panic!("unexpected declaration: {other:?}"),
        }
    }
}
