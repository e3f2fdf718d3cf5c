//! Name normalization between TypeScript identifiers and markup attributes.

use std::sync::LazyLock;

use regex::Regex;

/// Suffix every conventional configuration type name ends with.
pub const CONFIG_TYPE_SUFFIX: &str = "ConfigType";

static CASE_BOUNDARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

static SEPARATOR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_]+").unwrap());

/// Convert an identifier-style property name to an attribute name.
///
/// ```
/// use tagmeta::core::naming::to_attribute_name;
///
/// assert_eq!(to_attribute_name("isOpen"), "is-open");
/// assert_eq!(to_attribute_name("max_length"), "max-length");
/// assert_eq!(to_attribute_name("is-open"), "is-open");
/// ```
pub fn to_attribute_name(property_name: &str) -> String {
    let hyphenated = CASE_BOUNDARY_REGEX.replace_all(property_name, "$1-$2");
    let separated = SEPARATOR_REGEX.replace_all(&hyphenated, "-");
    separated.to_lowercase()
}

/// Conventional configuration type name for a module base name.
///
/// ```
/// use tagmeta::core::naming::default_config_type_name;
///
/// assert_eq!(default_config_type_name("date-picker"), "DatePickerConfigType");
/// ```
pub fn default_config_type_name(module_base_name: &str) -> String {
    let mut name: String = module_base_name
        .split(['-', '_', '.'])
        .filter(|segment| !segment.is_empty())
        .map(pascal_segment)
        .collect();
    name.push_str(CONFIG_TYPE_SUFFIX);
    name
}

fn pascal_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
