//! Pattern-matched views over the TypeScript declaration and type nodes both
//! extractors care about.

use swc_common::{BytePos, Spanned};
use swc_ecma_ast::{
    Decl, DefaultDecl, Expr, Lit, MemberProp, Module, ModuleDecl, ModuleItem, Stmt, TsEntityName,
    TsInterfaceDecl, TsPropertySignature, TsType, TsTypeAliasDecl, TsTypeElement, TsTypeLit,
    TsUnionOrIntersectionType,
};

/// A named type declaration.
#[derive(Debug, Clone, Copy)]
pub enum TypeDecl<'a> {
    Interface(&'a TsInterfaceDecl),
    Alias(&'a TsTypeAliasDecl),
}

impl<'a> TypeDecl<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            TypeDecl::Interface(iface) => iface.id.sym.as_str(),
            TypeDecl::Alias(alias) => alias.id.sym.as_str(),
        }
    }
}

/// A type declaration found at module top level.
#[derive(Debug, Clone, Copy)]
pub struct TopLevelDecl<'a> {
    pub decl: TypeDecl<'a>,
    pub exported: bool,
    /// Position leading comments of the whole declaration are attached to.
    pub pos: BytePos,
}

impl<'a> TopLevelDecl<'a> {
    pub fn name(&self) -> &'a str {
        self.decl.name()
    }
}

/// Type aliases and interfaces declared at module top level, in source order.
pub fn top_level_decls(module: &Module) -> Vec<TopLevelDecl<'_>> {
    let mut decls = Vec::new();

    for item in &module.body {
        let (decl, exported, pos) = match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                (type_decl(&export.decl), true, export.span.lo)
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => {
                let decl = match &export.decl {
                    DefaultDecl::TsInterfaceDecl(iface) => Some(TypeDecl::Interface(iface)),
                    _ => None,
                };
                (decl, true, export.span.lo)
            }
            ModuleItem::Stmt(Stmt::Decl(decl)) => (type_decl(decl), false, decl.span().lo),
            _ => continue,
        };

        if let Some(decl) = decl {
            decls.push(TopLevelDecl { decl, exported, pos });
        }
    }

    decls
}

fn type_decl(decl: &Decl) -> Option<TypeDecl<'_>> {
    match decl {
        Decl::TsInterface(iface) => Some(TypeDecl::Interface(iface)),
        Decl::TsTypeAlias(alias) => Some(TypeDecl::Alias(alias)),
        _ => None,
    }
}

/// The type node shapes the extractors distinguish. Parentheses are looked through.
#[derive(Debug, Clone, Copy)]
pub enum TypeNode<'a> {
    Object(&'a TsTypeLit),
    Intersection(&'a [Box<TsType>]),
    Array(&'a TsType),
    Reference {
        name: &'a TsEntityName,
        args: &'a [Box<TsType>],
    },
    Other(&'a TsType),
}

pub fn classify(ty: &TsType) -> TypeNode<'_> {
    match ty {
        TsType::TsParenthesizedType(paren) => classify(&paren.type_ann),
        TsType::TsTypeLit(lit) => TypeNode::Object(lit),
        TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(
            intersection,
        )) => TypeNode::Intersection(&intersection.types),
        TsType::TsArrayType(array) => TypeNode::Array(&array.elem_type),
        TsType::TsTypeRef(reference) => TypeNode::Reference {
            name: &reference.type_name,
            args: reference
                .type_params
                .as_ref()
                .map(|params| params.params.as_slice())
                .unwrap_or(&[]),
        },
        _ => TypeNode::Other(ty),
    }
}

/// Dotted text of an entity name: `Foo` or `ns.Foo`.
pub fn entity_name(name: &TsEntityName) -> String {
    match name {
        TsEntityName::Ident(ident) => ident.sym.to_string(),
        TsEntityName::TsQualifiedName(qualified) => {
            format!("{}.{}", entity_name(&qualified.left), qualified.right.sym)
        }
    }
}

/// Dotted text of an `extends` clause expression: `Base` or `ns.Base`.
pub fn expr_entity_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Member(member) => {
            let object = expr_entity_name(&member.obj)?;
            match &member.prop {
                MemberProp::Ident(prop) => Some(format!("{}.{}", object, prop.sym)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Property signatures among the members of an interface body or type literal,
/// each paired with the earliest position its doc comment may start at: the
/// end of the previous member, or `body_start` for the first one.
pub fn documented_properties(
    members: &[TsTypeElement],
    body_start: BytePos,
) -> Vec<(&TsPropertySignature, BytePos)> {
    let mut doc_start = body_start;
    let mut props = Vec::new();
    for member in members {
        if let TsTypeElement::TsPropertySignature(prop) = member {
            props.push((prop, doc_start));
        }
        doc_start = member.span().hi;
    }
    props
}

/// Name of a property signature, or `None` when it cannot be resolved statically.
pub fn property_name(prop: &TsPropertySignature) -> Option<String> {
    let name = match &*prop.key {
        Expr::Ident(ident) if !prop.computed => ident.sym.to_string(),
        Expr::Lit(Lit::Str(s)) => s.value.as_str()?.to_string(),
        Expr::Lit(Lit::Num(n)) if !prop.computed => n.value.to_string(),
        _ => return None,
    };
    (!name.is_empty()).then_some(name)
}
