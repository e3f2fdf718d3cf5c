//! Custom-element registration calls.
//!
//! Recognizes `customElements.define("x-tag", XTag)` and the configured
//! aliases of it. Only the call shape is checked; nothing is evaluated.

use std::path::Path;

use anyhow::Result;
use swc_ecma_ast::{CallExpr, Callee, Expr, Lit, MemberProp};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::parsers::ts::{SourceKind, parse_typescript_source};

pub const DEFAULT_REGISTER_FUNCTIONS: [&str; 3] = [
    "customElements.define",
    "window.customElements.define",
    "defineElement",
];

/// A recognized element registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub tag_name: String,
    /// `None` for anonymous class expressions.
    pub class_name: Option<String>,
}

impl Registration {
    pub fn new(tag_name: impl Into<String>, class_name: Option<&str>) -> Self {
        Self {
            tag_name: tag_name.into(),
            class_name: class_name.map(str::to_string),
        }
    }
}

/// Find every registration call in a module, in source order.
pub fn find_registrations(
    source: &str,
    path: &Path,
    register_functions: &[String],
) -> Result<Vec<Registration>> {
    let parsed = parse_typescript_source(
        source.to_string(),
        &path.to_string_lossy(),
        SourceKind::from_path(path),
    )?;

    let mut collector = RegistrationCollector {
        register_functions,
        found: Vec::new(),
    };
    parsed.module.visit_with(&mut collector);
    Ok(collector.found)
}

struct RegistrationCollector<'a> {
    register_functions: &'a [String],
    found: Vec<Registration>,
}

impl Visit for RegistrationCollector<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(callee) = &node.callee
            && let Some(callee_text) = callee_text(callee)
            && self.register_functions.iter().any(|f| *f == callee_text)
            && let Some(registration) = registration_args(node)
        {
            self.found.push(registration);
        }
        node.visit_children_with(self);
    }
}

/// `ident` or a dotted member chain such as `window.customElements.define`.
fn callee_text(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Member(member) => {
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            let object = callee_text(&member.obj)?;
            Some(format!("{object}.{}", prop.sym))
        }
        Expr::This(_) => Some("this".to_string()),
        Expr::Paren(paren) => callee_text(&paren.expr),
        _ => None,
    }
}

fn registration_args(call: &CallExpr) -> Option<Registration> {
    let [tag_arg, class_arg, ..] = call.args.as_slice() else {
        return None;
    };
    if tag_arg.spread.is_some() || class_arg.spread.is_some() {
        return None;
    }

    let tag_name = match &*tag_arg.expr {
        Expr::Lit(Lit::Str(s)) => s.value.as_str()?.to_string(),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|q| q.cooked.as_ref())
            .and_then(|s| s.as_str().map(|s| s.to_string()))?,
        _ => return None,
    };

    let class_name = match &*class_arg.expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Class(class) => class.ident.as_ref().map(|ident| ident.sym.to_string()),
        _ => return None,
    };

    Some(Registration {
        tag_name,
        class_name,
    })
}
