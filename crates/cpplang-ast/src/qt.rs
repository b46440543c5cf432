//! Qt MOC declaration syntax: `Q_OBJECT`, `Q_PROPERTY`, `Q_ENUMS`/
//! `Q_FLAGS`, and the `Q_D`/`Q_Q` private-implementation pointer macros.

use cpplang_common::Span;

bitflags::bitflags! {
    /// Mirrors the attributes a `Q_PROPERTY` declaration can carry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct QtPropertyFlags: u16 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const RESET = 1 << 2;
        const NOTIFY = 1 << 3;
        const DESIGNABLE = 1 << 4;
        const SCRIPTABLE = 1 << 5;
        const STORED = 1 << 6;
        const CONSTANT = 1 << 7;
        const FINAL = 1 << 8;
        const MEMBER = 1 << 9;
        const USER = 1 << 10;
    }
}

#[derive(Debug)]
pub struct QtPropertyDeclarationAst<'a> {
    pub span: Span,
    pub type_id: &'a crate::types::TypeIdAst<'a>,
    pub name: Span,
    pub flags: QtPropertyFlags,
    pub read: Option<Span>,
    pub write: Option<Span>,
    pub reset: Option<Span>,
    pub notify: Option<Span>,
}

#[derive(Debug)]
pub enum QtDeclarationAst<'a> {
    /// `Q_OBJECT`.
    Object(Span),
    Property(QtPropertyDeclarationAst<'a>),
    /// `Q_ENUMS(Name...)`.
    Enums {
        span: Span,
        names: &'a [Span],
    },
    /// `Q_FLAGS(Name...)`.
    Flags {
        span: Span,
        names: &'a [Span],
    },
    /// `Q_PRIVATE_SLOT(d, signature)`.
    PrivateSlot {
        span: Span,
        object: Span,
        signature: Span,
    },
    /// `Q_D(ClassName)`.
    PrivatePointer {
        span: Span,
        class_name: Span,
    },
    /// `Q_Q(ClassName)`.
    QPointer {
        span: Span,
        class_name: Span,
    },
}

impl<'a> QtDeclarationAst<'a> {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            QtDeclarationAst::Object(span) => *span,
            QtDeclarationAst::Property(prop) => prop.span,
            QtDeclarationAst::Enums { span, .. }
            | QtDeclarationAst::Flags { span, .. }
            | QtDeclarationAst::PrivateSlot { span, .. }
            | QtDeclarationAst::PrivatePointer { span, .. }
            | QtDeclarationAst::QPointer { span, .. } => *span,
        }
    }
}
