//! Type reflection.
//!
//! Turns type nodes of the model into runtime descriptor expressions in the
//! working arena: `number` becomes `t.number()`, `string[]` becomes
//! `t.array(t.string())`, and so on. Reflection never fails; anything it does
//! not understand reflects as `t.any()`.

use crate::context::MutationContext;
use crate::semantics::{NodeRef, SymbolFlags};
use tsr_emitter::print_node;
use tsr_parser::{ModifierFlags, Node, NodeIndex, NodeList};
use tsr_scanner::{SyntaxKind, keyword_to_text};

/// Globals whose runtime value is the constructor to check against.
const REFERENCE_GLOBALS: &[&str] = &[
    "Date",
    "RegExp",
    "Error",
    "EvalError",
    "RangeError",
    "ReferenceError",
    "SyntaxError",
    "TypeError",
    "URIError",
    "Map",
    "Set",
    "WeakMap",
    "WeakSet",
    "Promise",
];

/// Reflect the type node at `ty`.
pub fn reflect_type(ctx: &mut MutationContext<'_, '_>, ty: NodeRef) -> NodeIndex {
    let model = ctx.model();
    let Some(node) = model.node(ty) else {
        return any(ctx);
    };
    let at = |index: NodeIndex| NodeRef::new(ty.unit, index);

    match node {
        Node::KeywordType { keyword } => reflect_keyword(ctx, *keyword),
        Node::LiteralType { literal } => reflect_literal(ctx, at(*literal)),
        Node::ArrayType { element_type } => {
            let element = reflect_type(ctx, at(*element_type));
            ctx.factory().lib_call("array", vec![element])
        }
        Node::TupleType { elements } => {
            let elements = reflect_list(ctx, ty, elements);
            ctx.factory().lib_call("tuple", elements)
        }
        Node::UnionType { types } => {
            let types = reflect_list(ctx, ty, types);
            ctx.factory().lib_call("union", types)
        }
        Node::IntersectionType { types } => {
            let types = reflect_list(ctx, ty, types);
            ctx.factory().lib_call("intersect", types)
        }
        Node::TypeLiteral { members } => {
            let members: Vec<NodeRef> = members.iter().map(|&member| at(member)).collect();
            reflect_object(ctx, &members)
        }
        Node::FunctionType {
            parameters,
            type_annotation,
            ..
        } => {
            let parameters: Vec<NodeRef> = parameters.iter().map(|&param| at(param)).collect();
            reflect_signature(ctx, &parameters, type_annotation.to_option().map(at))
        }
        Node::ParenthesizedType { type_node } => reflect_type(ctx, at(*type_node)),
        Node::TypeOperator {
            operator: SyntaxKind::ReadonlyKeyword,
            type_node,
        } => reflect_type(ctx, at(*type_node)),
        Node::TypeOperator { .. } => any(ctx),
        Node::TypeQuery { expr_name } => {
            let target = entity_expression(ctx, at(*expr_name));
            ctx.factory().lib_call("typeOf", vec![target])
        }
        Node::TypeReference {
            type_name,
            type_arguments,
        } => reflect_reference(ctx, ty, at(*type_name), type_arguments.as_ref()),
        _ => any(ctx),
    }
}

/// Reflect a declared annotation. Without `strictNullChecks` the result
/// also accepts `null` and `undefined`.
pub fn reflect_annotation(ctx: &mut MutationContext<'_, '_>, ty: NodeRef) -> NodeIndex {
    let reflection = reflect_type(ctx, ty);
    if ctx.options().compiler_options.strict_null_checks() {
        return reflection;
    }
    let accepts_null = matches!(
        ctx.model().node(ty),
        Some(Node::KeywordType {
            keyword: SyntaxKind::AnyKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::UndefinedKeyword
                | SyntaxKind::VoidKeyword
                | SyntaxKind::NeverKeyword
        })
    );
    if accepts_null {
        reflection
    } else {
        ctx.factory().nullable(reflection)
    }
}

/// A reference to a named type, either a type reference or a heritage
/// clause entry. `reference` is the node the name is resolved at.
pub fn reflect_reference(
    ctx: &mut MutationContext<'_, '_>,
    reference: NodeRef,
    type_name: NodeRef,
    type_arguments: Option<&NodeList>,
) -> NodeIndex {
    let model = ctx.model();
    let arena = &model.unit(reference.unit).arena;
    let Some(name) = arena.identifier_text(type_name.node) else {
        // Qualified names are not followed.
        return any(ctx);
    };
    let arguments: Vec<NodeRef> = type_arguments
        .map(|list| {
            list.iter()
                .map(|&arg| NodeRef::new(reference.unit, arg))
                .collect()
        })
        .unwrap_or_default();

    let symbol = model
        .symbol_at(reference)
        .map(|id| model.symbol(model.resolve_alias(id)));
    let symbol = symbol.filter(|info| !info.has_any(SymbolFlags::BUILTIN));

    let Some(info) = symbol else {
        return reflect_global(ctx, name, &arguments);
    };

    if info.has_any(SymbolFlags::TYPE_PARAMETER) {
        return any(ctx);
    }
    if ctx.is_self_reference(reference) {
        return ctx.factory().identifier(name);
    }
    if info.has_any(SymbolFlags::CLASS) {
        let class = ctx.factory().identifier(name);
        let mut args = vec![class];
        for argument in arguments {
            args.push(reflect_type(ctx, argument));
        }
        return ctx.factory().lib_call("ref", args);
    }
    if info.has_any(SymbolFlags::INTERFACE | SymbolFlags::TYPE_ALIAS) {
        if ctx.is_declared_before_use(reference) {
            return ctx.factory().identifier(name);
        }
        return ctx.factory().tdz(name);
    }
    any(ctx)
}

fn reflect_global(
    ctx: &mut MutationContext<'_, '_>,
    name: &str,
    arguments: &[NodeRef],
) -> NodeIndex {
    match name {
        "Array" | "ReadonlyArray" => {
            let element = match arguments.first() {
                Some(&argument) => reflect_type(ctx, argument),
                None => any(ctx),
            };
            ctx.factory().lib_call("array", vec![element])
        }
        "Function" => ctx.factory().lib_call("function", Vec::new()),
        "Object" => ctx.factory().lib_call("object", Vec::new()),
        _ if REFERENCE_GLOBALS.contains(&name) => {
            let global = ctx.factory().identifier(name);
            ctx.factory().lib_call("ref", vec![global])
        }
        _ => any(ctx),
    }
}

fn reflect_keyword(ctx: &mut MutationContext<'_, '_>, keyword: SyntaxKind) -> NodeIndex {
    match keyword_to_text(keyword) {
        Some("this") | None => any(ctx),
        Some(text) => ctx.factory().lib_call(text, Vec::new()),
    }
}

fn reflect_literal(ctx: &mut MutationContext<'_, '_>, literal: NodeRef) -> NodeIndex {
    let model = ctx.model();
    let arena = &model.unit(literal.unit).arena;
    let mut factory = ctx.factory();
    match arena.get(literal.node) {
        Some(Node::StringLiteral { text }) => {
            let value = factory.string(text);
            factory.lib_call("string", vec![value])
        }
        Some(Node::NumericLiteral { text }) => {
            let value = factory.number(text);
            factory.lib_call("number", vec![value])
        }
        Some(Node::PrefixUnary { operand, .. }) => {
            let digits = arena.get(*operand).map_or("0", |operand| match operand {
                Node::NumericLiteral { text } => text.as_str(),
                _ => "0",
            });
            let value = factory.negative_number(digits);
            factory.lib_call("number", vec![value])
        }
        Some(Node::BooleanLiteral { value }) => {
            let value = factory.boolean(*value);
            factory.lib_call("boolean", vec![value])
        }
        _ => factory.lib_call("any", Vec::new()),
    }
}

fn reflect_list(ctx: &mut MutationContext<'_, '_>, owner: NodeRef, list: &NodeList) -> Vec<NodeIndex> {
    list.iter()
        .map(|&ty| reflect_type(ctx, NodeRef::new(owner.unit, ty)))
        .collect()
}

/// `t.object(...members)`
pub fn reflect_object(ctx: &mut MutationContext<'_, '_>, members: &[NodeRef]) -> NodeIndex {
    let members = reflect_members(ctx, members);
    ctx.factory().lib_call("object", members)
}

/// Member descriptors of a type literal, interface or class body.
///
/// Static members, constructors, set accessors, construct signatures and
/// members with computed names have no descriptor.
pub fn reflect_members(ctx: &mut MutationContext<'_, '_>, members: &[NodeRef]) -> Vec<NodeIndex> {
    members
        .iter()
        .filter_map(|&member| reflect_member(ctx, member))
        .collect()
}

fn reflect_member(ctx: &mut MutationContext<'_, '_>, member: NodeRef) -> Option<NodeIndex> {
    let model = ctx.model();
    let node = model.node(member)?;
    if node.modifiers().contains(ModifierFlags::STATIC) {
        return None;
    }
    let arena = &model.unit(member.unit).arena;
    let at = |index: NodeIndex| NodeRef::new(member.unit, index);

    match node {
        Node::PropertySignature {
            name,
            question,
            type_annotation,
            ..
        }
        | Node::PropertyDeclaration {
            name,
            question,
            type_annotation,
            ..
        } => {
            let name = arena.property_name_text(*name)?;
            let ty = annotation_or_any(ctx, type_annotation.to_option().map(at));
            Some(property(ctx, name, ty, *question))
        }
        Node::MethodSignature(sig) => {
            let name = arena.property_name_text(sig.name)?;
            let parameters: Vec<NodeRef> = sig.parameters.iter().map(|&p| at(p)).collect();
            let ty = reflect_signature(ctx, &parameters, sig.type_annotation.to_option().map(at));
            Some(property(ctx, name, ty, sig.question))
        }
        Node::MethodDeclaration(func) => {
            let name = arena.property_name_text(func.name)?;
            let parameters: Vec<NodeRef> = func.parameters.iter().map(|&p| at(p)).collect();
            let ty = reflect_signature(ctx, &parameters, func.type_annotation.to_option().map(at));
            Some(property(ctx, name, ty, func.question))
        }
        Node::GetAccessor(func) => {
            let name = arena.property_name_text(func.name)?;
            let ty = annotation_or_any(ctx, func.type_annotation.to_option().map(at));
            Some(property(ctx, name, ty, false))
        }
        Node::IndexSignature {
            parameters,
            type_annotation,
            ..
        } => {
            let &key = parameters.nodes.first()?;
            let Some(Node::Parameter {
                name,
                type_annotation: key_type,
                ..
            }) = arena.get(key)
            else {
                return None;
            };
            let key_name = arena.identifier_text(*name).unwrap_or("key");
            let key_type = annotation_or_any(ctx, key_type.to_option().map(at));
            let value_type = annotation_or_any(ctx, type_annotation.to_option().map(at));
            let mut factory = ctx.factory();
            let key_name = factory.string(key_name);
            Some(factory.lib_call("indexer", vec![key_name, key_type, value_type]))
        }
        Node::CallSignature(sig) => {
            let parameters: Vec<NodeRef> = sig.parameters.iter().map(|&p| at(p)).collect();
            let function =
                reflect_signature(ctx, &parameters, sig.type_annotation.to_option().map(at));
            Some(ctx.factory().lib_call("callProperty", vec![function]))
        }
        _ => None,
    }
}

fn property(ctx: &mut MutationContext<'_, '_>, name: &str, ty: NodeIndex, optional: bool) -> NodeIndex {
    let mut factory = ctx.factory();
    let mut arguments = vec![factory.string(name), ty];
    if optional {
        arguments.push(factory.boolean(true));
    }
    factory.lib_call("property", arguments)
}

fn annotation_or_any(ctx: &mut MutationContext<'_, '_>, ty: Option<NodeRef>) -> NodeIndex {
    match ty {
        Some(ty) => reflect_annotation(ctx, ty),
        None => any(ctx),
    }
}

/// `t.function(t.param(..), t.rest(..), t.return(..))`
pub fn reflect_signature(
    ctx: &mut MutationContext<'_, '_>,
    parameters: &[NodeRef],
    return_type: Option<NodeRef>,
) -> NodeIndex {
    let mut arguments = Vec::with_capacity(parameters.len() + 1);
    for &parameter in parameters {
        if let Some(descriptor) = reflect_parameter(ctx, parameter) {
            arguments.push(descriptor);
        }
    }
    let returns = annotation_or_any(ctx, return_type);
    arguments.push(ctx.factory().lib_call("return", vec![returns]));
    ctx.factory().lib_call("function", arguments)
}

/// `t.param("a", T[, true])` or `t.rest("a", T)`; `this` parameters have
/// no descriptor.
fn reflect_parameter(ctx: &mut MutationContext<'_, '_>, parameter: NodeRef) -> Option<NodeIndex> {
    let model = ctx.model();
    let Some(Node::Parameter {
        dot_dot_dot,
        name,
        question,
        type_annotation,
        initializer,
        ..
    }) = model.node(parameter)
    else {
        return None;
    };
    let arena = &model.unit(parameter.unit).arena;
    let name_text = match arena.identifier_text(*name) {
        Some("this") => return None,
        Some(text) => text.to_string(),
        None => print_node(arena, *name),
    };
    let ty = annotation_or_any(
        ctx,
        type_annotation
            .to_option()
            .map(|ty| NodeRef::new(parameter.unit, ty)),
    );
    let mut factory = ctx.factory();
    let label = factory.string(&name_text);
    if *dot_dot_dot {
        return Some(factory.lib_call("rest", vec![label, ty]));
    }
    let mut arguments = vec![label, ty];
    if *question || initializer.is_some() {
        arguments.push(factory.boolean(true));
    }
    Some(factory.lib_call("param", arguments))
}

/// `a.b.c` as an expression, for `typeof a.b.c`.
fn entity_expression(ctx: &mut MutationContext<'_, '_>, entity: NodeRef) -> NodeIndex {
    let model = ctx.model();
    match model.node(entity) {
        Some(Node::Identifier { text }) => ctx.factory().identifier(text),
        Some(Node::QualifiedName { left, right }) => {
            let left = entity_expression(ctx, NodeRef::new(entity.unit, *left));
            let right = model
                .unit(entity.unit)
                .arena
                .identifier_text(*right)
                .unwrap_or_default();
            ctx.factory().property_access(left, right)
        }
        _ => any(ctx),
    }
}

fn any(ctx: &mut MutationContext<'_, '_>) -> NodeIndex {
    ctx.factory().lib_call("any", Vec::new())
}
