//! Tree walking. `Visitor` gets one pre/post hook pair per node family
//! rather than one pair per concrete variant; `pre_visit_*` returning
//! `false` prunes descent into that node's children. The free `walk_*`
//! functions do the actual recursion and are what a `Visitor` impl calls
//! back into for any children it wants to keep visiting.

use crate::declarations::{DeclarationAst, InitDeclaratorAst, TemplateParameterAst};
use crate::declarators::{CoreDeclaratorAst, DeclaratorAst, PostfixDeclaratorAst};
use crate::expressions::ExpressionAst;
use crate::names::NameAst;
use crate::objc::ObjcDeclarationAst;
use crate::qt::QtDeclarationAst;
use crate::specifiers::SpecifierAst;
use crate::statements::StatementAst;

pub trait Visitor {
    fn pre_visit_declaration(&mut self, _node: &DeclarationAst<'_>) -> bool {
        true
    }
    fn post_visit_declaration(&mut self, _node: &DeclarationAst<'_>) {}

    fn pre_visit_statement(&mut self, _node: &StatementAst<'_>) -> bool {
        true
    }
    fn post_visit_statement(&mut self, _node: &StatementAst<'_>) {}

    fn pre_visit_expression(&mut self, _node: &ExpressionAst<'_>) -> bool {
        true
    }
    fn post_visit_expression(&mut self, _node: &ExpressionAst<'_>) {}

    fn pre_visit_specifier(&mut self, _node: &SpecifierAst<'_>) -> bool {
        true
    }
    fn post_visit_specifier(&mut self, _node: &SpecifierAst<'_>) {}

    fn pre_visit_declarator(&mut self, _node: &DeclaratorAst<'_>) -> bool {
        true
    }
    fn post_visit_declarator(&mut self, _node: &DeclaratorAst<'_>) {}

    fn pre_visit_name(&mut self, _node: &NameAst<'_>) -> bool {
        true
    }
    fn post_visit_name(&mut self, _node: &NameAst<'_>) {}

    fn pre_visit_objc(&mut self, _node: &ObjcDeclarationAst<'_>) -> bool {
        true
    }
    fn post_visit_objc(&mut self, _node: &ObjcDeclarationAst<'_>) {}

    fn pre_visit_qt(&mut self, _node: &QtDeclarationAst<'_>) -> bool {
        true
    }
    fn post_visit_qt(&mut self, _node: &QtDeclarationAst<'_>) {}
}

pub fn walk_declaration<'a, V: Visitor + ?Sized>(visitor: &mut V, node: &DeclarationAst<'a>) {
    if !visitor.pre_visit_declaration(node) {
        return;
    }
    match node {
        DeclarationAst::Simple { specifiers, declarators, .. } => {
            walk_specifiers(visitor, specifiers);
            for init in declarators {
                walk_init_declarator(visitor, init);
            }
        }
        DeclarationAst::FunctionDefinition {
            specifiers,
            declarator,
            member_initializers,
            body,
            ..
        } => {
            walk_specifiers(visitor, specifiers);
            walk_declarator(visitor, declarator);
            for initializer in member_initializers {
                walk_name(visitor, initializer.name);
                for argument in initializer.arguments {
                    walk_expression(visitor, argument);
                }
            }
            walk_statement(visitor, body);
        }
        DeclarationAst::Template { parameters, declaration, .. } => {
            walk_template_parameters(visitor, parameters);
            walk_declaration(visitor, declaration);
        }
        DeclarationAst::Namespace { members, .. } | DeclarationAst::LinkageSpecification { members, .. } => {
            for member in members {
                walk_declaration(visitor, member);
            }
        }
        DeclarationAst::NamespaceAlias { target, .. } => walk_name(visitor, target),
        DeclarationAst::UsingDeclaration { name, .. } | DeclarationAst::UsingDirective { name, .. } => walk_name(visitor, name),
        DeclarationAst::Asm(_) | DeclarationAst::Empty(_) => {}
        DeclarationAst::Objc(objc) => walk_objc(visitor, objc),
        DeclarationAst::Qt(_) => {}
    }
    visitor.post_visit_declaration(node);
}

fn walk_init_declarator<'a, V: Visitor + ?Sized>(visitor: &mut V, init: &InitDeclaratorAst<'a>) {
    walk_declarator(visitor, init.declarator);
    if let Some(value) = init.initializer {
        walk_expression(visitor, value);
    }
}

fn walk_template_parameters<'a, V: Visitor + ?Sized>(visitor: &mut V, parameters: &[TemplateParameterAst<'a>]) {
    for parameter in parameters {
        match parameter {
            TemplateParameterAst::Type { default_value, .. } => {
                if let Some(type_id) = default_value {
                    walk_specifiers(visitor, type_id.specifiers);
                    if let Some(declarator) = type_id.declarator {
                        walk_declarator(visitor, declarator);
                    }
                }
            }
            TemplateParameterAst::NonType { parameter, .. } => {
                walk_specifiers(visitor, parameter.specifiers);
                if let Some(declarator) = parameter.declarator {
                    walk_declarator(visitor, declarator);
                }
            }
            TemplateParameterAst::Template { parameters, .. } => walk_template_parameters(visitor, parameters),
        }
    }
}

fn walk_specifiers<'a, V: Visitor + ?Sized>(visitor: &mut V, specifiers: &[&'a SpecifierAst<'a>]) {
    for specifier in specifiers {
        walk_specifier(visitor, specifier);
    }
}

pub fn walk_specifier<'a, V: Visitor + ?Sized>(visitor: &mut V, node: &SpecifierAst<'a>) {
    if !visitor.pre_visit_specifier(node) {
        return;
    }
    match node {
        SpecifierAst::Simple(_) | SpecifierAst::Attribute(_) | SpecifierAst::ElaboratedType { .. } => {}
        SpecifierAst::NamedType { name, .. } => walk_name(visitor, name),
        SpecifierAst::Class(class) => {
            for base in class.bases {
                walk_name(visitor, base.name);
            }
            for member in class.members {
                walk_declaration(visitor, member);
            }
        }
        SpecifierAst::Enum(en) => {
            for enumerator in en.enumerators {
                if let Some(expression) = enumerator.expression {
                    walk_expression(visitor, expression);
                }
            }
        }
        SpecifierAst::Typeof { expression, .. } => walk_expression(visitor, expression),
    }
    visitor.post_visit_specifier(node);
}

pub fn walk_declarator<'a, V: Visitor + ?Sized>(visitor: &mut V, node: &DeclaratorAst<'a>) {
    if !visitor.pre_visit_declarator(node) {
        return;
    }
    match &node.core {
        CoreDeclaratorAst::Id(name) => walk_name(visitor, name),
        CoreDeclaratorAst::Nested(inner) => walk_declarator(visitor, inner),
        CoreDeclaratorAst::Abstract => {}
    }
    for postfix in node.postfix {
        match postfix {
            PostfixDeclaratorAst::Array { size, .. } => {
                if let Some(expression) = size {
                    walk_expression(visitor, expression);
                }
            }
            PostfixDeclaratorAst::Function { parameters, .. } => {
                for parameter in parameters {
                    walk_specifiers(visitor, parameter.specifiers);
                    if let Some(declarator) = parameter.declarator {
                        walk_declarator(visitor, declarator);
                    }
                    if let Some(default_value) = parameter.default_value {
                        walk_expression(visitor, default_value);
                    }
                }
            }
        }
    }
    visitor.post_visit_declarator(node);
}

pub fn walk_name<'a, V: Visitor + ?Sized>(visitor: &mut V, node: &NameAst<'a>) {
    if !visitor.pre_visit_name(node) {
        return;
    }
    match node {
        NameAst::Simple(_) | NameAst::Operator { .. } | NameAst::Selector { .. } => {}
        NameAst::Destructor { name, .. } => walk_name(visitor, name),
        NameAst::TemplateId { arguments, .. } => {
            for argument in arguments {
                if let Some(declarator) = argument.declarator {
                    walk_declarator(visitor, declarator);
                }
                walk_specifiers(visitor, argument.specifiers);
            }
        }
        NameAst::ConversionFunctionId { type_id, .. } => {
            walk_specifiers(visitor, type_id.specifiers);
            if let Some(declarator) = type_id.declarator {
                walk_declarator(visitor, declarator);
            }
        }
        NameAst::Qualified { base, name, .. } => {
            if let Some(base) = base {
                walk_name(visitor, base);
            }
            walk_name(visitor, name);
        }
    }
    visitor.post_visit_name(node);
}

pub fn walk_statement<'a, V: Visitor + ?Sized>(visitor: &mut V, node: &StatementAst<'a>) {
    if !visitor.pre_visit_statement(node) {
        return;
    }
    match node {
        StatementAst::Compound { statements, .. } => {
            for statement in statements {
                walk_statement(visitor, statement);
            }
        }
        StatementAst::Expression { expression, .. } => {
            if let Some(expression) = expression {
                walk_expression(visitor, expression);
            }
        }
        StatementAst::Declaration { declaration, .. } => walk_declaration(visitor, declaration),
        StatementAst::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            walk_expression(visitor, condition);
            walk_statement(visitor, then_branch);
            if let Some(else_branch) = else_branch {
                walk_statement(visitor, else_branch);
            }
        }
        StatementAst::While { condition, body, .. } => {
            walk_expression(visitor, condition);
            walk_statement(visitor, body);
        }
        StatementAst::DoWhile { body, condition, .. } => {
            walk_statement(visitor, body);
            walk_expression(visitor, condition);
        }
        StatementAst::For {
            init,
            condition,
            step,
            body,
            ..
        } => {
            if let Some(init) = init {
                walk_statement(visitor, init);
            }
            if let Some(condition) = condition {
                walk_expression(visitor, condition);
            }
            if let Some(step) = step {
                walk_expression(visitor, step);
            }
            walk_statement(visitor, body);
        }
        StatementAst::RangeBasedFor { declaration, range, body, .. } => {
            walk_declaration(visitor, declaration);
            walk_expression(visitor, range);
            walk_statement(visitor, body);
        }
        StatementAst::Switch { condition, body, .. } => {
            walk_expression(visitor, condition);
            walk_statement(visitor, body);
        }
        StatementAst::Case { value, body, .. } => {
            walk_expression(visitor, value);
            walk_statement(visitor, body);
        }
        StatementAst::Default { body, .. } | StatementAst::Labeled { body, .. } => walk_statement(visitor, body),
        StatementAst::Break(_) | StatementAst::Continue(_) | StatementAst::Goto { .. } => {}
        StatementAst::Return { value, .. } => {
            if let Some(value) = value {
                walk_expression(visitor, value);
            }
        }
        StatementAst::Try { body, handlers, .. } => {
            walk_statement(visitor, body);
            for handler in handlers {
                if let Some(declaration) = handler.exception_declaration {
                    walk_declaration(visitor, declaration);
                }
                walk_statement(visitor, handler.body);
            }
        }
    }
    visitor.post_visit_statement(node);
}

pub fn walk_expression<'a, V: Visitor + ?Sized>(visitor: &mut V, node: &ExpressionAst<'a>) {
    if !visitor.pre_visit_expression(node) {
        return;
    }
    match node {
        ExpressionAst::Literal(_) | ExpressionAst::This(_) | ExpressionAst::ObjcProtocolExpression { .. } => {}
        ExpressionAst::IdExpression { name, .. } => walk_name(visitor, name),
        ExpressionAst::Nested { inner, .. } => walk_expression(visitor, inner),
        ExpressionAst::Unary { operand, .. } => walk_expression(visitor, operand),
        ExpressionAst::Binary { left, right, .. } | ExpressionAst::Comma { left, right, .. } => {
            walk_expression(visitor, left);
            walk_expression(visitor, right);
        }
        ExpressionAst::Assignment { target, value, .. } => {
            walk_expression(visitor, target);
            walk_expression(visitor, value);
        }
        ExpressionAst::Conditional {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            walk_expression(visitor, condition);
            walk_expression(visitor, then_branch);
            walk_expression(visitor, else_branch);
        }
        ExpressionAst::Call { callee, arguments, .. } => {
            walk_expression(visitor, callee);
            for argument in arguments {
                walk_expression(visitor, argument);
            }
        }
        ExpressionAst::ArraySubscript { object, index, .. } => {
            walk_expression(visitor, object);
            walk_expression(visitor, index);
        }
        ExpressionAst::Member { object, name, .. } => {
            walk_expression(visitor, object);
            walk_name(visitor, name);
        }
        ExpressionAst::PostIncrDecr { operand, .. } | ExpressionAst::Delete { operand, .. } => walk_expression(visitor, operand),
        ExpressionAst::Cast { type_id, operand, .. } => {
            walk_specifiers(visitor, type_id.specifiers);
            walk_expression(visitor, operand);
        }
        ExpressionAst::FunctionalCast { type_id, arguments, .. } => {
            walk_specifiers(visitor, type_id.specifiers);
            for argument in arguments {
                walk_expression(visitor, argument);
            }
        }
        ExpressionAst::Sizeof { operand, .. } => match operand {
            crate::expressions::SizeofOperandAst::Expression(expression) => walk_expression(visitor, expression),
            crate::expressions::SizeofOperandAst::Type(type_id) => walk_specifiers(visitor, type_id.specifiers),
            crate::expressions::SizeofOperandAst::VariadicPack(_) => {}
        },
        ExpressionAst::TypeId { type_id, .. } => walk_specifiers(visitor, type_id.specifiers),
        ExpressionAst::New {
            placement,
            type_id,
            initializer,
            ..
        } => {
            for expression in placement {
                walk_expression(visitor, expression);
            }
            walk_specifiers(visitor, type_id.specifiers);
            if let Some(initializer) = initializer {
                walk_expression(visitor, initializer);
            }
        }
        ExpressionAst::Throw { operand, .. } => {
            if let Some(operand) = operand {
                walk_expression(visitor, operand);
            }
        }
        ExpressionAst::BracedInitList { elements, .. } => {
            for element in elements {
                walk_expression(visitor, element);
            }
        }
        ExpressionAst::DesignatedInitializer(designated) => {
            for designator in designated.designators {
                if let crate::designators::DesignatorAst::Bracket { index, .. } = designator {
                    walk_expression(visitor, index);
                }
            }
            walk_expression(visitor, designated.value);
        }
        ExpressionAst::Lambda(lambda) => {
            for parameter in lambda.parameters {
                walk_specifiers(visitor, parameter.specifiers);
                if let Some(declarator) = parameter.declarator {
                    walk_declarator(visitor, declarator);
                }
            }
            walk_statement(visitor, lambda.body);
        }
        ExpressionAst::ObjcMessageExpression { receiver, arguments, .. } => {
            walk_expression(visitor, receiver);
            for argument in arguments {
                if let Some(value) = argument.value {
                    walk_expression(visitor, value);
                }
            }
        }
        ExpressionAst::ObjcEncode { type_id, .. } => walk_specifiers(visitor, type_id.specifiers),
        ExpressionAst::ObjcSelectorExpression { selector, .. } => walk_name(visitor, selector),
    }
    visitor.post_visit_expression(node);
}

pub fn walk_objc<'a, V: Visitor + ?Sized>(visitor: &mut V, node: &ObjcDeclarationAst<'a>) {
    if !visitor.pre_visit_objc(node) {
        return;
    }
    match node {
        ObjcDeclarationAst::ClassInterface { superclass, members, .. } => {
            if let Some(superclass) = superclass {
                walk_name(visitor, superclass);
            }
            for member in members {
                walk_declaration(visitor, member);
            }
        }
        ObjcDeclarationAst::ClassImplementation { members, .. } | ObjcDeclarationAst::ProtocolDeclaration { members, .. } => {
            for member in members {
                walk_declaration(visitor, member);
            }
        }
        ObjcDeclarationAst::MethodDefinition { body, .. } => walk_statement(visitor, body),
        ObjcDeclarationAst::ClassForwardDeclaration { .. }
        | ObjcDeclarationAst::ProtocolForwardDeclaration { .. }
        | ObjcDeclarationAst::MethodDeclaration(_)
        | ObjcDeclarationAst::PropertyDeclaration { .. }
        | ObjcDeclarationAst::PropertySynthesize { .. }
        | ObjcDeclarationAst::PropertyDynamic { .. }
        | ObjcDeclarationAst::VisibilityMarker { .. } => {}
    }
    visitor.post_visit_objc(node);
}
