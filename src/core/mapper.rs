//! Type shapes → manifest attributes.
//!
//! Both inferences work on type text alone, so they behave the same whichever
//! extraction strategy produced the shape. Checks run in a fixed priority
//! order and the first match wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::manifest::{Attribute, AttributeType, SerializedAs, TypeSummary};
use crate::core::naming::to_attribute_name;
use crate::core::shape::TypeShape;

/// Array, generic collection or object literal syntax.
static STRUCTURED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\]|\b(?:readonlyarray|array|record|weakmap|map|weakset|set)\s*<|\{").unwrap()
});

pub fn map_shapes(shapes: &[TypeShape]) -> Vec<Attribute> {
    shapes.iter().map(map_shape).collect()
}

pub fn map_shape(shape: &TypeShape) -> Attribute {
    Attribute {
        name: to_attribute_name(&shape.name),
        ty: AttributeType {
            text: shape.type_text.clone(),
            summary: infer_summary(&shape.type_text),
        },
        serialized_as: infer_serialization(&shape.type_text),
        description: shape
            .doc
            .clone()
            .unwrap_or_else(|| fallback_description(&shape.type_text)),
        optional: shape.optional,
    }
}

pub fn fallback_description(type_text: &str) -> String {
    format!("Configuration property of type `{type_text}`.")
}

/// Primitive summary of a type text.
///
/// Array syntax is recognized before the keyword checks so `string[]` is an
/// array rather than a string.
pub fn infer_summary(type_text: &str) -> TypeSummary {
    let text = mask_literals(&type_text.trim().to_lowercase());
    let members = non_nullish_members(&text);

    if let [single] = members.as_slice()
        && is_array_syntax(single)
    {
        return TypeSummary::Array;
    }

    if text.contains("string") {
        TypeSummary::String
    } else if text.contains("number") {
        TypeSummary::Number
    } else if text.contains("boolean") {
        TypeSummary::Boolean
    } else if text.contains("array") || text.ends_with("[]") || text.contains("readonly") {
        TypeSummary::Array
    } else if text.contains("object") || text.contains('{') || text.contains("record") {
        TypeSummary::Object
    } else {
        TypeSummary::Unknown
    }
}

/// Attribute serialization strategy of a type text.
pub fn infer_serialization(type_text: &str) -> SerializedAs {
    let text = mask_literals(&type_text.trim().to_lowercase());
    let members = non_nullish_members(&text);

    if STRUCTURED_REGEX.is_match(&text) || members.iter().any(|m| is_tuple(m)) {
        return SerializedAs::Json;
    }

    let all_members = |pred: fn(&str) -> bool| !members.is_empty() && members.iter().all(|m| pred(m));

    if all_members(|m| matches!(m, "boolean" | "true" | "false")) && !text.contains("object") {
        SerializedAs::BooleanAttr
    } else if all_members(|m| m == "number" || m.parse::<f64>().is_ok()) && !text.contains("string")
    {
        SerializedAs::Number
    } else if text.contains("string")
        || text.contains("null")
        || text.contains("undefined")
        || text.contains('|')
    {
        SerializedAs::String
    } else {
        SerializedAs::PropertyOnly
    }
}

/// Empty the contents of string literal types so brackets and keywords inside
/// them are not mistaken for syntax. Template literal types become `string`.
fn mask_literals(text: &str) -> String {
    let mut masked = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in text.chars() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => {
                if q != '`' {
                    masked.push(c);
                }
                quote = None;
            }
            Some(_) => {}
            None => match c {
                '`' => {
                    masked.push_str("string");
                    quote = Some(c);
                }
                '"' | '\'' => {
                    masked.push(c);
                    quote = Some(c);
                }
                _ => masked.push(c),
            },
        }
    }
    masked
}

fn is_array_syntax(member: &str) -> bool {
    member.ends_with("[]")
        || member.starts_with("array<")
        || member.starts_with("readonlyarray<")
        || member.starts_with("readonly ")
        || is_tuple(member)
}

fn is_tuple(member: &str) -> bool {
    member.starts_with('[') && member.ends_with(']')
}

/// Top-level union members of `text`, without `null` and `undefined`.
fn non_nullish_members(text: &str) -> Vec<&str> {
    split_top_level_union(text)
        .into_iter()
        .map(str::trim)
        .filter(|member| !member.is_empty() && !matches!(*member, "null" | "undefined"))
        .collect()
}

/// Split on `|` outside brackets and string literals.
fn split_top_level_union(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    let mut prev = '\0';

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
        } else {
            match c {
                '"' | '\'' | '`' => quote = Some(c),
                '(' | '[' | '{' | '<' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                '>' if prev != '=' => depth -= 1,
                '|' if depth == 0 => {
                    parts.push(&text[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        prev = c;
    }
    parts.push(&text[start..]);
    parts
}
