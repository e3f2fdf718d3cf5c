//! Property enumeration and type-text expansion over a [`TypeProgram`].

use std::collections::HashMap;

use swc_common::{BytePos, Spanned};
use swc_ecma_ast::{
    Pat, TsEntityName, TsIndexedAccessType, TsLit, TsType, TsTypeElement, TsTypeLit,
    TsTypeOperatorOp, TsTypeParamDecl, TsUnionOrIntersectionType,
};

use crate::core::decls::{
    TypeNode, classify, documented_properties, entity_name, expr_entity_name, property_name,
};
use crate::core::semantic::program::{FileId, Symbol, SymbolDecl, TypeProgram};
use crate::core::shape::{TypeShape, push_unique};

/// Upper bound on nested alias/interface expansions.
const MAX_EXPANSION_DEPTH: usize = 12;

/// Type parameter bindings in effect while walking a generic declaration.
#[derive(Debug, Clone, Default)]
struct Scope {
    bindings: HashMap<String, Binding>,
}

/// A type argument together with the context it must be read in.
#[derive(Debug, Clone)]
struct Binding {
    file: FileId,
    ty: TsType,
    scope: Scope,
}

impl Scope {
    fn get(&self, name: &TsEntityName, args: &[Box<TsType>]) -> Option<&Binding> {
        match name {
            TsEntityName::Ident(ident) if args.is_empty() => self.bindings.get(ident.sym.as_str()),
            _ => None,
        }
    }
}

pub struct Resolver<'p> {
    program: &'p TypeProgram,
    /// Symbols currently being expanded, for cycle detection.
    stack: Vec<(FileId, String)>,
}

impl<'p> Resolver<'p> {
    pub fn new(program: &'p TypeProgram) -> Self {
        Self {
            program,
            stack: Vec::new(),
        }
    }

    /// All properties of a named type, including inherited and merged members.
    pub fn symbol_properties(&mut self, symbol: Symbol<'p>) -> Vec<TypeShape> {
        self.expand_symbol_properties(symbol, &[], symbol.file, &Scope::default())
    }

    fn expand_symbol_properties(
        &mut self,
        symbol: Symbol<'p>,
        args: &[Box<TsType>],
        arg_file: FileId,
        arg_scope: &Scope,
    ) -> Vec<TypeShape> {
        if !self.enter(symbol) {
            return Vec::new();
        }

        let mut shapes = Vec::new();
        for decl in symbol.decls {
            match decl {
                SymbolDecl::Interface(iface) => {
                    let scope = bind_params(
                        iface.type_params.as_deref(),
                        args,
                        arg_file,
                        arg_scope,
                        symbol.file,
                    );
                    for shape in
                        self.members(symbol.file, &iface.body.body, iface.body.span.lo, &scope)
                    {
                        push_unique(&mut shapes, shape);
                    }
                    for parent in &iface.extends {
                        let Some(parent_name) = expr_entity_name(&parent.expr) else {
                            continue;
                        };
                        let parent_args = parent
                            .type_args
                            .as_ref()
                            .map(|params| params.params.as_slice())
                            .unwrap_or(&[]);
                        for shape in
                            self.named_properties(symbol.file, &parent_name, parent_args, &scope)
                        {
                            push_unique(&mut shapes, shape);
                        }
                    }
                }
                SymbolDecl::Alias(alias) => {
                    let scope = bind_params(
                        alias.type_params.as_deref(),
                        args,
                        arg_file,
                        arg_scope,
                        symbol.file,
                    );
                    for shape in self.properties(symbol.file, &alias.type_ann, &scope) {
                        push_unique(&mut shapes, shape);
                    }
                }
            }
        }

        self.leave();
        shapes
    }

    /// Properties of an arbitrary type node. Non-object types have none.
    fn properties(&mut self, file: FileId, ty: &TsType, scope: &Scope) -> Vec<TypeShape> {
        match classify(ty) {
            TypeNode::Object(lit) => self.members(file, &lit.members, lit.span.lo, scope),
            TypeNode::Intersection(branches) => {
                let mut shapes = Vec::new();
                for branch in branches {
                    for shape in self.properties(file, branch, scope) {
                        push_unique(&mut shapes, shape);
                    }
                }
                shapes
            }
            TypeNode::Reference { name, args } => {
                if let Some(binding) = scope.get(name, args) {
                    let binding = binding.clone();
                    return self.properties(binding.file, &binding.ty, &binding.scope);
                }
                self.named_properties(file, &entity_name(name), args, scope)
            }
            TypeNode::Other(TsType::TsTypeOperator(op)) if op.op == TsTypeOperatorOp::ReadOnly => {
                self.properties(file, &op.type_ann, scope)
            }
            TypeNode::Array(_) | TypeNode::Other(_) => Vec::new(),
        }
    }

    /// Properties of a type referenced by name from inside `file`.
    fn named_properties(
        &mut self,
        file: FileId,
        name: &str,
        args: &[Box<TsType>],
        scope: &Scope,
    ) -> Vec<TypeShape> {
        if let Some(symbol) = self.program.lookup(file, name) {
            return self.expand_symbol_properties(symbol, args, file, scope);
        }
        self.utility_properties(file, name, args, scope)
            .unwrap_or_default()
    }

    /// Built-in mapped utility types. `None` when `name` is not one of them.
    fn utility_properties(
        &mut self,
        file: FileId,
        name: &str,
        args: &[Box<TsType>],
        scope: &Scope,
    ) -> Option<Vec<TypeShape>> {
        let target = args.first()?;
        let mut shapes = match name {
            "Partial" | "Required" | "Readonly" | "Pick" | "Omit" => {
                self.properties(file, target, scope)
            }
            _ => return None,
        };

        match name {
            "Partial" => shapes.iter_mut().for_each(|shape| shape.optional = true),
            "Required" => shapes.iter_mut().for_each(|shape| shape.optional = false),
            "Pick" | "Omit" => {
                let keys = self.literal_keys(file, args.get(1)?, scope);
                let keep = name == "Pick";
                shapes.retain(|shape| keys.contains(&shape.name) == keep);
            }
            _ => {}
        }

        Some(shapes)
    }

    /// String literal members of a key type such as `"a" | "b"`.
    fn literal_keys(&mut self, file: FileId, ty: &TsType, scope: &Scope) -> Vec<String> {
        match ty {
            TsType::TsLitType(lit) => match &lit.lit {
                TsLit::Str(s) => s.value.as_str().map(str::to_string).into_iter().collect(),
                _ => Vec::new(),
            },
            TsType::TsParenthesizedType(paren) => self.literal_keys(file, &paren.type_ann, scope),
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
                union
                    .types
                    .iter()
                    .flat_map(|member| self.literal_keys(file, member, scope))
                    .collect()
            }
            TsType::TsTypeRef(reference) => {
                let args = reference
                    .type_params
                    .as_ref()
                    .map(|params| params.params.as_slice())
                    .unwrap_or(&[]);
                if let Some(binding) = scope.get(&reference.type_name, args) {
                    let binding = binding.clone();
                    return self.literal_keys(binding.file, &binding.ty, &binding.scope);
                }
                let name = entity_name(&reference.type_name);
                let Some(symbol) = self.program.lookup(file, &name) else {
                    return Vec::new();
                };
                let Some(SymbolDecl::Alias(alias)) = symbol.decls.first() else {
                    return Vec::new();
                };
                if !self.enter(symbol) {
                    return Vec::new();
                }
                let keys = self.literal_keys(symbol.file, &alias.type_ann, &Scope::default());
                self.leave();
                keys
            }
            _ => Vec::new(),
        }
    }

    fn members(
        &mut self,
        file: FileId,
        members: &[TsTypeElement],
        body_start: BytePos,
        scope: &Scope,
    ) -> Vec<TypeShape> {
        let mut shapes = Vec::new();
        for (prop, doc_start) in documented_properties(members, body_start) {
            let Some(name) = property_name(prop) else {
                continue;
            };
            let type_text = match &prop.type_ann {
                Some(ann) => self.print(file, &ann.type_ann, scope),
                None => "any".to_string(),
            };
            let doc = self
                .program
                .file(file)
                .parsed
                .comments
                .doc_between(doc_start, prop.span.lo);

            push_unique(
                &mut shapes,
                TypeShape {
                    name,
                    type_text,
                    optional: prop.optional,
                    doc,
                },
            );
        }
        shapes
    }

    /// Fully expanded text of a type as seen from inside `file`.
    fn print(&mut self, file: FileId, ty: &TsType, scope: &Scope) -> String {
        match ty {
            TsType::TsTypeRef(reference) => {
                let args = reference
                    .type_params
                    .as_ref()
                    .map(|params| params.params.as_slice())
                    .unwrap_or(&[]);
                self.print_reference(file, &reference.type_name, args, scope)
            }
            TsType::TsTypeLit(lit) => self.print_object(file, lit, scope),
            TsType::TsArrayType(array) => {
                format!("{}[]", self.print_operand(file, &array.elem_type, scope))
            }
            TsType::TsTupleType(tuple) => {
                let elems: Vec<String> = tuple
                    .elem_types
                    .iter()
                    .map(|elem| {
                        let text = self.print(file, &elem.ty, scope);
                        match &elem.label {
                            Some(Pat::Ident(label)) => format!("{}: {}", label.id.sym, text),
                            _ => text,
                        }
                    })
                    .collect();
                format!("[{}]", elems.join(", "))
            }
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
                let members: Vec<String> = union
                    .types
                    .iter()
                    .map(|member| {
                        let text = self.print(file, member, scope);
                        wrap_if(text, |c| c == "=>")
                    })
                    .collect();
                members.join(" | ")
            }
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(
                intersection,
            )) => {
                let members: Vec<String> = intersection
                    .types
                    .iter()
                    .map(|member| self.print_operand(file, member, scope))
                    .collect();
                members.join(" & ")
            }
            TsType::TsParenthesizedType(paren) => {
                format!("({})", self.print(file, &paren.type_ann, scope))
            }
            TsType::TsTypeOperator(op) => {
                let operator = match op.op {
                    TsTypeOperatorOp::KeyOf => "keyof",
                    TsTypeOperatorOp::Unique => "unique",
                    TsTypeOperatorOp::ReadOnly => "readonly",
                };
                format!("{} {}", operator, self.print_operand(file, &op.type_ann, scope))
            }
            TsType::TsOptionalType(optional) => {
                format!("{}?", self.print_operand(file, &optional.type_ann, scope))
            }
            TsType::TsRestType(rest) => format!("...{}", self.print(file, &rest.type_ann, scope)),
            TsType::TsIndexedAccessType(access) => self
                .print_indexed_access(file, access, scope)
                .unwrap_or_else(|| self.snippet(file, ty)),
            TsType::TsLitType(lit) => match &lit.lit {
                TsLit::Str(s) => match s.value.as_str() {
                    Some(value) => format!("\"{value}\""),
                    None => self.snippet(file, ty),
                },
                TsLit::Bool(b) => b.value.to_string(),
                _ => self.snippet(file, ty),
            },
            _ => self.snippet(file, ty),
        }
    }

    /// Member type of `Obj["key"]` (or a union of literal keys). `None` when
    /// the keys are not literals or a key is not a property of the object.
    fn print_indexed_access(
        &mut self,
        file: FileId,
        access: &TsIndexedAccessType,
        scope: &Scope,
    ) -> Option<String> {
        let keys = self.literal_keys(file, &access.index_type, scope);
        if keys.is_empty() {
            return None;
        }
        let shapes = self.properties(file, &access.obj_type, scope);

        let mut members: Vec<String> = Vec::new();
        for key in &keys {
            let shape = shapes.iter().find(|shape| &shape.name == key)?;
            let text = wrap_if(shape.type_text.clone(), |c| c == "=>");
            if !members.contains(&text) {
                members.push(text);
            }
        }
        Some(members.join(" | "))
    }

    /// Text of a type used where a lower-precedence type needs parentheses.
    fn print_operand(&mut self, file: FileId, ty: &TsType, scope: &Scope) -> String {
        let text = self.print(file, ty, scope);
        wrap_if(text, |c| c == "|" || c == "&" || c == "=>")
    }

    fn print_reference(
        &mut self,
        file: FileId,
        name: &TsEntityName,
        args: &[Box<TsType>],
        scope: &Scope,
    ) -> String {
        if let Some(binding) = scope.get(name, args) {
            let binding = binding.clone();
            return self.print(binding.file, &binding.ty, &binding.scope);
        }

        let dotted = entity_name(name);
        let as_written = |resolver: &mut Self| {
            if args.is_empty() {
                dotted.clone()
            } else {
                let args: Vec<String> = args
                    .iter()
                    .map(|arg| resolver.print(file, arg, scope))
                    .collect();
                format!("{}<{}>", dotted, args.join(", "))
            }
        };

        let Some(symbol) = self.program.lookup(file, &dotted) else {
            return as_written(self);
        };
        if self.is_expanding(symbol) || self.stack.len() >= MAX_EXPANSION_DEPTH {
            return as_written(self);
        }

        match symbol.decls.first() {
            Some(SymbolDecl::Alias(alias)) => {
                let scope = bind_params(alias.type_params.as_deref(), args, file, scope, symbol.file);
                self.enter(symbol);
                let text = self.print(symbol.file, &alias.type_ann, &scope);
                self.leave();
                text
            }
            Some(SymbolDecl::Interface(_)) => {
                let shapes = self.expand_symbol_properties(symbol, args, file, scope);
                object_text(&shapes, &[])
            }
            None => as_written(self),
        }
    }

    fn print_object(&mut self, file: FileId, lit: &TsTypeLit, scope: &Scope) -> String {
        let shapes = self.members(file, &lit.members, lit.span.lo, scope);
        // Methods, index and call signatures are kept verbatim.
        let extra: Vec<String> = lit
            .members
            .iter()
            .filter(|member| !matches!(member, TsTypeElement::TsPropertySignature(_)))
            .filter_map(|member| self.program.file(file).parsed.snippet(member.span()))
            .map(|text| text.trim_end_matches([';', ',']).trim().to_string())
            .collect();
        object_text(&shapes, &extra)
    }

    fn snippet(&self, file: FileId, ty: &TsType) -> String {
        self.program
            .file(file)
            .parsed
            .snippet(ty.span())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn is_expanding(&self, symbol: Symbol<'_>) -> bool {
        self.stack
            .iter()
            .any(|(file, name)| *file == symbol.file && name == symbol.name)
    }

    /// Push `symbol` onto the expansion stack; `false` if it is already being
    /// expanded or the depth limit is reached.
    fn enter(&mut self, symbol: Symbol<'_>) -> bool {
        if self.is_expanding(symbol) || self.stack.len() >= MAX_EXPANSION_DEPTH {
            return false;
        }
        self.stack.push((symbol.file, symbol.name.to_string()));
        true
    }

    fn leave(&mut self) {
        self.stack.pop();
    }
}

/// Bind a declaration's type parameters to the arguments of one reference.
/// Missing arguments fall back to parameter defaults; otherwise stay unbound.
fn bind_params(
    params: Option<&TsTypeParamDecl>,
    args: &[Box<TsType>],
    arg_file: FileId,
    arg_scope: &Scope,
    decl_file: FileId,
) -> Scope {
    let mut scope = Scope::default();
    let Some(params) = params else {
        return scope;
    };

    for (index, param) in params.params.iter().enumerate() {
        let binding = match (args.get(index), &param.default) {
            (Some(arg), _) => Binding {
                file: arg_file,
                ty: (**arg).clone(),
                scope: arg_scope.clone(),
            },
            (None, Some(default)) => Binding {
                file: decl_file,
                ty: (**default).clone(),
                scope: scope.clone(),
            },
            (None, None) => continue,
        };
        scope.bindings.insert(param.name.sym.to_string(), binding);
    }

    scope
}

/// `{ a: string; b?: number; }` for a list of properties.
fn object_text(shapes: &[TypeShape], extra: &[String]) -> String {
    if shapes.is_empty() && extra.is_empty() {
        return "{}".to_string();
    }
    let mut parts: Vec<String> = shapes
        .iter()
        .map(|shape| {
            format!(
                "{}{}: {};",
                quote_property(&shape.name),
                if shape.optional { "?" } else { "" },
                shape.type_text
            )
        })
        .collect();
    parts.extend(extra.iter().map(|text| format!("{text};")));
    format!("{{ {} }}", parts.join(" "))
}

fn quote_property(name: &str) -> String {
    let is_identifier = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if is_identifier || name.parse::<f64>().is_ok() {
        name.to_string()
    } else {
        format!("\"{name}\"")
    }
}

/// Wrap `text` in parentheses when it contains a top-level token matching `needs`.
fn wrap_if(text: String, needs: impl Fn(&str) -> bool) -> String {
    if has_top_level_token(&text, needs) {
        format!("({text})")
    } else {
        text
    }
}

/// Whether `text` contains `|`, `&` or `=>` outside brackets and string literals,
/// filtered by `accept`.
fn has_top_level_token(text: &str, accept: impl Fn(&str) -> bool) -> bool {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
        } else {
            match b {
                b'"' | b'\'' | b'`' => quote = Some(b),
                b'(' | b'[' | b'{' | b'<' => depth += 1,
                b')' | b']' | b'}' => depth -= 1,
                b'>' if i > 0 && bytes[i - 1] == b'=' => {
                    if depth == 0 && accept("=>") {
                        return true;
                    }
                }
                b'>' => depth -= 1,
                b'|' if depth == 0 && accept("|") => return true,
                b'&' if depth == 0 && accept("&") => return true,
                _ => {}
            }
        }
        i += 1;
    }
    false
}
