//! Serializable descriptions of elements, for extending the built-in
//! database from JSON files.

use std::collections::BTreeMap;

use kstring::KString;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    /// Boolean attribute, may be given without a value (`required`).
    Bool,
    Text,
    /// Only the listed values are allowed (compared ASCII
    /// case-insensitively).
    Enumerable(Vec<KString>),
}

impl AttributeType {
    pub fn is_bool(&self) -> bool {
        matches!(self, AttributeType::Bool)
    }

    pub fn allows_value(&self, val: &str) -> bool {
        match self {
            AttributeType::Bool => true,
            AttributeType::Text => true,
            AttributeType::Enumerable(vals) =>
                vals.iter().any(|v| v.eq_ignore_ascii_case(val)),
        }
    }
}

/// One element definition as found in an extension file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementDef {
    pub tag_name: KString,
    /// Whether the global attributes (`id`, `class`, ...) apply.
    #[serde(default = "default_true")]
    pub has_global_attributes: bool,
    #[serde(default = "default_true")]
    pub has_closing_tag: bool,
    #[serde(default = "default_true")]
    pub allows_child_text: bool,
    #[serde(default)]
    pub attributes: BTreeMap<KString, AttributeType>,
    /// `None` means any child element is accepted.
    #[serde(default)]
    pub child_elements: Option<Vec<KString>>,
}

fn default_true() -> bool {
    true
}

/// Contents of a file given via `SPHC_META_DB_JSON`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetaDbExtension {
    #[serde(default)]
    pub global_attribute_names: Vec<KString>,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
}
