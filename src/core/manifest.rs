//! Component manifest data model.
//!
//! The engine mutates a [`ModuleDocument`] owned by its caller; the project
//! analyzer gathers module documents into a [`PackageManifest`] and the CLI
//! serializes it.

use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Primitive kind inferred from a property's type text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeSummary {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Unknown,
}

/// How a property is encoded when exposed as a markup attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SerializedAs {
    /// JSON text.
    Json,
    /// Attribute presence.
    BooleanAttr,
    /// Numeric string.
    Number,
    /// Plain string.
    String,
    /// Not representable as an attribute.
    PropertyOnly,
}

impl SerializedAs {
    /// Manifest spelling of the strategy.
    pub fn as_str(self) -> &'static str {
        match self {
            SerializedAs::Json => "json",
            SerializedAs::BooleanAttr => "boolean-attr",
            SerializedAs::Number => "number",
            SerializedAs::String => "string",
            SerializedAs::PropertyOnly => "property-only",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeType {
    pub text: String,
    pub summary: TypeSummary,
}

/// A manifest-ready configurable attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Kebab-case attribute name, unique within its declaration.
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AttributeType,
    pub serialized_as: SerializedAs,
    pub description: String,
    pub optional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclarationKind {
    Class,
    CustomElement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub kind: DeclarationKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Declaration {
    pub fn class(name: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            kind: DeclarationKind::Class,
            name: Some(name.into()),
            tag_name: Some(tag_name.into()),
            attributes: Vec::new(),
        }
    }

    pub fn custom_element(tag_name: impl Into<String>) -> Self {
        Self {
            kind: DeclarationKind::CustomElement,
            name: None,
            tag_name: Some(tag_name.into()),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

/// Manifest fragment for one analyzed source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDocument {
    pub kind: String,
    pub path: String,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl ModuleDocument {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            kind: "javascript-module".to_string(),
            path: path.into(),
            declarations: Vec::new(),
        }
    }
}

/// The whole manifest written by `tagmeta analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub schema_version: String,
    pub modules: Vec<ModuleDocument>,
}

impl PackageManifest {
    /// Manifest of the modules that declared something, sorted by path.
    pub fn from_modules(modules: impl IntoIterator<Item = ModuleDocument>) -> Self {
        let mut modules: Vec<_> = modules
            .into_iter()
            .filter(|module| !module.declarations.is_empty())
            .collect();
        modules.sort_by(|a, b| a.path.cmp(&b.path));

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            modules,
        }
    }

    pub fn declaration_count(&self) -> usize {
        self.modules.iter().map(|m| m.declarations.len()).sum()
    }

    pub fn attribute_count(&self) -> usize {
        self.modules
            .iter()
            .flat_map(|m| &m.declarations)
            .map(|d| d.attributes.len())
            .sum()
    }
}
