//! Declaration upsert and attribute merge on a module document.

use crate::core::manifest::{Attribute, Declaration, ModuleDocument};
use crate::core::registration::Registration;

/// Make sure a declaration exists for `registration`.
///
/// A class registration updates the class declaration with the same name, or
/// appends one. An anonymous registration always appends a custom-element
/// declaration.
pub fn upsert_declaration(doc: &mut ModuleDocument, registration: &Registration) {
    let Some(class_name) = registration.class_name.as_deref() else {
        doc.declarations
            .push(Declaration::custom_element(&registration.tag_name));
        return;
    };

    match doc
        .declarations
        .iter_mut()
        .find(|decl| decl.name.as_deref() == Some(class_name))
    {
        Some(existing) => existing.tag_name = Some(registration.tag_name.clone()),
        None => doc
            .declarations
            .push(Declaration::class(class_name, &registration.tag_name)),
    }
}

/// Append the attributes a declaration does not have yet.
///
/// The declaration is found by class name, falling back to tag name. Existing
/// attributes win over new ones with the same name. Returns how many were
/// appended; zero when no declaration matched.
pub fn merge_attributes(
    doc: &mut ModuleDocument,
    class_name: Option<&str>,
    tag_name: Option<&str>,
    attributes: Vec<Attribute>,
) -> usize {
    let Some(decl) = find_declaration(doc, class_name, tag_name) else {
        return 0;
    };

    let mut added = 0;
    for attribute in attributes {
        if decl.attribute(&attribute.name).is_none() {
            decl.attributes.push(attribute);
            added += 1;
        }
    }
    added
}

fn find_declaration<'d>(
    doc: &'d mut ModuleDocument,
    class_name: Option<&str>,
    tag_name: Option<&str>,
) -> Option<&'d mut Declaration> {
    let by_class = class_name.and_then(|name| {
        doc.declarations
            .iter()
            .position(|decl| decl.name.as_deref() == Some(name))
    });
    let index = by_class.or_else(|| {
        tag_name.and_then(|tag| {
            doc.declarations
                .iter()
                .position(|decl| decl.tag_name.as_deref() == Some(tag))
        })
    })?;
    doc.declarations.get_mut(index)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::manifest::{AttributeType, DeclarationKind, SerializedAs, TypeSummary};

    fn attribute(name: &str, text: &str) -> Attribute {
        Attribute {
            name: name.to_string(),
            ty: AttributeType {
                text: text.to_string(),
                summary: TypeSummary::String,
            },
            serialized_as: SerializedAs::String,
            description: String::new(),
            optional: false,
        }
    }

    #[test]
    fn test_upsert_appends_class_declaration() {
        let mut doc = ModuleDocument::new("src/x-toggle.ts");
        upsert_declaration(&mut doc, &Registration::new("x-toggle", Some("XToggle")));

        assert_eq!(doc.declarations, vec![Declaration::class("XToggle", "x-toggle")]);
    }

    #[test]
    fn test_upsert_updates_existing_class() {
        let mut doc = ModuleDocument::new("src/x-toggle.ts");
        doc.declarations.push(Declaration {
            kind: DeclarationKind::Class,
            name: Some("XToggle".to_string()),
            tag_name: None,
            attributes: vec![attribute("label", "string")],
        });

        upsert_declaration(&mut doc, &Registration::new("x-toggle", Some("XToggle")));

        assert_eq!(doc.declarations.len(), 1);
        assert_eq!(doc.declarations[0].tag_name.as_deref(), Some("x-toggle"));
        assert_eq!(doc.declarations[0].attributes.len(), 1);
    }

    #[test]
    fn test_upsert_anonymous_appends_custom_element() {
        let mut doc = ModuleDocument::new("src/x-anon.ts");
        upsert_declaration(&mut doc, &Registration::new("x-anon", None));
        upsert_declaration(&mut doc, &Registration::new("x-anon", None));

        assert_eq!(
            doc.declarations,
            vec![
                Declaration::custom_element("x-anon"),
                Declaration::custom_element("x-anon"),
            ]
        );
    }

    #[test]
    fn test_merge_keeps_existing_attribute() {
        let mut doc = ModuleDocument::new("src/x-toggle.ts");
        let mut decl = Declaration::class("XToggle", "x-toggle");
        decl.attributes.push(attribute("label", "'Custom'"));
        doc.declarations.push(decl);

        let added = merge_attributes(
            &mut doc,
            Some("XToggle"),
            Some("x-toggle"),
            vec![attribute("label", "string"), attribute("is-open", "boolean")],
        );

        assert_eq!(added, 1);
        let attrs = &doc.declarations[0].attributes;
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].ty.text, "'Custom'");
        assert_eq!(attrs[1].name, "is-open");
    }

    #[test]
    fn test_merge_falls_back_to_tag_name() {
        let mut doc = ModuleDocument::new("src/x-anon.ts");
        upsert_declaration(&mut doc, &Registration::new("x-anon", None));

        let added = merge_attributes(
            &mut doc,
            None,
            Some("x-anon"),
            vec![attribute("label", "string")],
        );

        assert_eq!(added, 1);
        assert_eq!(doc.declarations[0].attributes.len(), 1);
    }

    #[test]
    fn test_merge_without_declaration() {
        let mut doc = ModuleDocument::new("src/empty.ts");
        let added = merge_attributes(
            &mut doc,
            Some("Missing"),
            Some("x-missing"),
            vec![attribute("label", "string")],
        );
        assert_eq!(added, 0);
        assert!(doc.declarations.is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut doc = ModuleDocument::new("src/x-toggle.ts");
        upsert_declaration(&mut doc, &Registration::new("x-toggle", Some("XToggle")));

        let attrs = vec![attribute("label", "string"), attribute("is-open", "boolean")];
        assert_eq!(merge_attributes(&mut doc, Some("XToggle"), None, attrs.clone()), 2);
        let snapshot = doc.clone();
        assert_eq!(merge_attributes(&mut doc, Some("XToggle"), None, attrs), 0);
        assert_eq!(doc, snapshot);
    }
}
