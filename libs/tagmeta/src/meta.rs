//! Indexed element data for DOM correctness verification while
//! building tag trees.

use std::{collections::{HashMap, HashSet},
          path::Path,
          env, str::FromStr, fmt::Display};
use anyhow::{anyhow, bail, Context, Result};
use kstring::KString;

use crate::types::{AttributeType, ElementDef, MetaDbExtension};

// https://developer.mozilla.org/en-US/docs/Web/HTML/Global_attributes
const GLOBAL_ATTRIBUTE_NAMES: &[&str] = &[
    "accesskey",
    "autocapitalize",
    "autofocus",
    "class",
    "contenteditable",
    "dir",
    "draggable",
    "enterkeyhint",
    "hidden",
    "id",
    "inert",
    "inputmode",
    "is",
    "itemid",
    "itemprop",
    "itemref",
    "itemscope",
    "itemtype",
    "lang",
    "nonce",
    "part",
    "popover",
    "role",
    "slot",
    "spellcheck",
    "style",
    "tabindex",
    "title",
    "translate",
];

// Those of the above that can be given without a value.
const GLOBAL_BOOL_ATTRIBUTE_NAMES: &[&str] = &[
    "autofocus", "hidden", "inert", "itemscope",
];

const EVENT_HANDLER_ATTRIBUTE_NAMES: &[&str] = &[
    "onabort", "onblur", "oncancel", "onchange", "onclick", "onclose",
    "oncontextmenu", "ondblclick", "ondrag", "ondragend", "ondragenter",
    "ondragleave", "ondragover", "ondragstart", "ondrop", "onerror", "onfocus",
    "oninput", "oninvalid", "onkeydown", "onkeypress", "onkeyup", "onload",
    "onmousedown", "onmouseenter", "onmouseleave", "onmousemove", "onmouseout",
    "onmouseover", "onmouseup", "onreset", "onresize", "onscroll", "onselect",
    "onsubmit", "ontoggle",
];

// =============================================================================
// Static element table

enum StaticAttributeType {
    Bool,
    Text,
    Enumerable(&'static [&'static str]),
}
use StaticAttributeType::{Bool, Text, Enumerable};

struct StaticElementMeta {
    tag_name: &'static str,
    has_closing_tag: bool,
    allows_child_text: bool,
    attributes: &'static [(&'static str, StaticAttributeType)],
    // None: any element allowed
    child_elements: Option<&'static [&'static str]>,
}

const fn elt(
    tag_name: &'static str,
    attributes: &'static [(&'static str, StaticAttributeType)],
) -> StaticElementMeta {
    StaticElementMeta {
        tag_name,
        has_closing_tag: true,
        allows_child_text: true,
        attributes,
        child_elements: None,
    }
}

const fn void(
    tag_name: &'static str,
    attributes: &'static [(&'static str, StaticAttributeType)],
) -> StaticElementMeta {
    StaticElementMeta {
        tag_name,
        has_closing_tag: false,
        allows_child_text: false,
        attributes,
        child_elements: Some(&[]),
    }
}

const fn structural(
    tag_name: &'static str,
    attributes: &'static [(&'static str, StaticAttributeType)],
    child_elements: &'static [&'static str],
) -> StaticElementMeta {
    StaticElementMeta {
        tag_name,
        has_closing_tag: true,
        allows_child_text: false,
        attributes,
        child_elements: Some(child_elements),
    }
}

const FORM_METHODS: &[&str] = &["get", "post", "dialog"];
const INPUT_TYPES: &[&str] = &[
    "button", "checkbox", "color", "date", "datetime-local", "email", "file",
    "hidden", "image", "month", "number", "password", "radio", "range",
    "reset", "search", "submit", "tel", "text", "time", "url", "week",
];
const BUTTON_TYPES: &[&str] = &["submit", "reset", "button"];
const CROSSORIGIN: &[&str] = &["anonymous", "use-credentials", ""];

const HEAD_CHILDREN: &[&str] = &[
    "base", "link", "meta", "noscript", "script", "style", "title",
];
const TABLE_CHILDREN: &[&str] = &["caption", "thead", "tbody", "tfoot", "tr"];
const TR_CHILDREN: &[&str] = &["th", "td"];

static STATIC_ELEMENTS: &[StaticElementMeta] = &[
    structural("html", &[("xmlns", Text)], &["head", "body"]),
    structural("head", &[], HEAD_CHILDREN),
    elt("title", &[]),
    void("meta", &[
        ("charset", Text), ("content", Text), ("http-equiv", Text), ("name", Text),
    ]),
    void("link", &[
        ("as", Text), ("crossorigin", Enumerable(CROSSORIGIN)), ("href", Text),
        ("hreflang", Text), ("integrity", Text), ("media", Text),
        ("referrerpolicy", Text), ("rel", Text), ("sizes", Text), ("type", Text),
    ]),
    void("base", &[("href", Text), ("target", Text)]),
    elt("style", &[("media", Text), ("type", Text)]),
    elt("script", &[
        ("async", Bool), ("crossorigin", Enumerable(CROSSORIGIN)), ("defer", Bool),
        ("integrity", Text), ("nomodule", Bool), ("referrerpolicy", Text),
        ("src", Text), ("type", Text),
    ]),
    elt("noscript", &[]),
    elt("body", &[]),
    elt("header", &[]),
    elt("footer", &[]),
    elt("nav", &[]),
    elt("main", &[]),
    elt("section", &[]),
    elt("article", &[]),
    elt("aside", &[]),
    elt("div", &[]),
    elt("span", &[]),
    elt("p", &[]),
    elt("pre", &[]),
    elt("code", &[]),
    elt("em", &[]),
    elt("strong", &[]),
    elt("small", &[]),
    elt("h1", &[]),
    elt("h2", &[]),
    elt("h3", &[]),
    elt("h4", &[]),
    elt("h5", &[]),
    elt("h6", &[]),
    void("br", &[]),
    void("hr", &[]),
    elt("a", &[
        ("download", Text), ("href", Text), ("hreflang", Text), ("ping", Text),
        ("referrerpolicy", Text), ("rel", Text), ("target", Text), ("type", Text),
    ]),
    void("img", &[
        ("alt", Text), ("crossorigin", Enumerable(CROSSORIGIN)), ("decoding", Text),
        ("height", Text), ("ismap", Bool), ("loading", Text), ("sizes", Text),
        ("src", Text), ("srcset", Text), ("usemap", Text), ("width", Text),
    ]),
    structural("ul", &[], &["li"]),
    structural("ol", &[("reversed", Bool), ("start", Text), ("type", Text)], &["li"]),
    elt("li", &[("value", Text)]),
    structural("table", &[], TABLE_CHILDREN),
    elt("caption", &[]),
    structural("thead", &[], &["tr"]),
    structural("tbody", &[], &["tr"]),
    structural("tfoot", &[], &["tr"]),
    structural("tr", &[], TR_CHILDREN),
    elt("th", &[
        ("abbr", Text), ("colspan", Text), ("headers", Text), ("rowspan", Text),
        ("scope", Text),
    ]),
    elt("td", &[("colspan", Text), ("headers", Text), ("rowspan", Text)]),
    elt("form", &[
        ("accept-charset", Text), ("action", Text), ("autocomplete", Text),
        ("enctype", Text), ("method", Enumerable(FORM_METHODS)), ("name", Text),
        ("novalidate", Bool), ("rel", Text), ("target", Text),
    ]),
    elt("fieldset", &[("disabled", Bool), ("form", Text), ("name", Text)]),
    elt("legend", &[]),
    elt("label", &[("for", Text), ("form", Text)]),
    void("input", &[
        ("accept", Text), ("alt", Text), ("autocomplete", Text), ("checked", Bool),
        ("dirname", Text), ("disabled", Bool), ("form", Text), ("formaction", Text),
        ("formenctype", Text), ("formmethod", Enumerable(FORM_METHODS)),
        ("formnovalidate", Bool), ("formtarget", Text), ("height", Text),
        ("list", Text), ("max", Text), ("maxlength", Text), ("min", Text),
        ("minlength", Text), ("multiple", Bool), ("name", Text), ("pattern", Text),
        ("placeholder", Text), ("readonly", Bool), ("required", Bool),
        ("size", Text), ("src", Text), ("step", Text),
        ("type", Enumerable(INPUT_TYPES)), ("value", Text), ("width", Text),
    ]),
    elt("textarea", &[
        ("autocomplete", Text), ("cols", Text), ("dirname", Text),
        ("disabled", Bool), ("form", Text), ("maxlength", Text),
        ("minlength", Text), ("name", Text), ("placeholder", Text),
        ("readonly", Bool), ("required", Bool), ("rows", Text), ("wrap", Text),
    ]),
    structural("select", &[
        ("autocomplete", Text), ("disabled", Bool), ("form", Text),
        ("multiple", Bool), ("name", Text), ("required", Bool), ("size", Text),
    ], &["option", "optgroup"]),
    structural("optgroup", &[("disabled", Bool), ("label", Text)], &["option"]),
    elt("option", &[
        ("disabled", Bool), ("label", Text), ("selected", Bool), ("value", Text),
    ]),
    elt("button", &[
        ("disabled", Bool), ("form", Text), ("formaction", Text),
        ("formenctype", Text), ("formmethod", Enumerable(FORM_METHODS)),
        ("formnovalidate", Bool), ("formtarget", Text), ("name", Text),
        ("type", Enumerable(BUTTON_TYPES)), ("value", Text),
    ]),
];

// =============================================================================
// Database representation

#[derive(Debug)]
pub struct ElementMeta {
    pub tag_name: KString,
    pub has_global_attributes: bool,
    pub has_closing_tag: bool,
    pub attributes: HashMap<KString, AttributeType>,
    pub allows_child_text: bool,
    /// `None` means that any element is accepted as a child.
    pub child_elements: Option<HashSet<KString>>,
}

impl PartialEq for ElementMeta {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.tag_name == other.tag_name
    }
}

impl Eq for ElementMeta {}

impl ElementMeta {
    /// Whether `child` (a tag name) may appear in the body.
    pub fn allows_child_element(&self, child: &str) -> bool {
        match &self.child_elements {
            None => true,
            Some(set) => set.contains(child),
        }
    }

    /// Sorted list of the permitted child tag names, for error
    /// messages.
    pub fn child_element_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.child_elements.iter()
            .flat_map(|set| set.iter().map(|k| k.as_str()))
            .collect();
        names.sort();
        names
    }
}

impl From<&StaticElementMeta> for ElementMeta {
    fn from(s: &StaticElementMeta) -> Self {
        ElementMeta {
            tag_name: KString::from_static(s.tag_name),
            has_global_attributes: true,
            has_closing_tag: s.has_closing_tag,
            attributes: s.attributes.iter().map(|(name, ty)| {
                let ty = match ty {
                    StaticAttributeType::Bool => AttributeType::Bool,
                    StaticAttributeType::Text => AttributeType::Text,
                    StaticAttributeType::Enumerable(vals) => AttributeType::Enumerable(
                        vals.iter().map(|v| KString::from_static(*v)).collect()),
                };
                (KString::from_static(*name), ty)
            }).collect(),
            allows_child_text: s.allows_child_text,
            child_elements: s.child_elements.map(
                |names| names.iter().map(|n| KString::from_static(*n)).collect()),
        }
    }
}

impl From<ElementDef> for ElementMeta {
    fn from(d: ElementDef) -> Self {
        ElementMeta {
            tag_name: d.tag_name,
            has_global_attributes: d.has_global_attributes,
            has_closing_tag: d.has_closing_tag,
            attributes: d.attributes.into_iter().collect(),
            allows_child_text: d.allows_child_text,
            child_elements: d.child_elements.map(|v| v.into_iter().collect()),
        }
    }
}


#[derive(Debug)]
pub struct MetaDb {
    pub global_attribute_names: HashSet<KString>,
    pub global_bool_attribute_names: HashSet<KString>,
    pub elementmeta: HashMap<KString, ElementMeta>,
}

impl MetaDb {
    /// The database compiled into the binary.
    pub fn builtin() -> MetaDb {
        let mut global_attribute_names: HashSet<KString> = HashSet::new();
        for n in GLOBAL_ATTRIBUTE_NAMES.iter().chain(EVENT_HANDLER_ATTRIBUTE_NAMES) {
            global_attribute_names.insert(KString::from_static(*n));
        }
        MetaDb {
            global_attribute_names,
            global_bool_attribute_names: GLOBAL_BOOL_ATTRIBUTE_NAMES.iter().map(
                |n| KString::from_static(*n)).collect(),
            elementmeta: STATIC_ELEMENTS.iter().map(
                |s| (KString::from_static(s.tag_name), ElementMeta::from(s))).collect(),
        }
    }

    pub fn get(&self, tag_name: &str) -> Option<&ElementMeta> {
        self.elementmeta.get(tag_name)
    }

    pub fn try_get(&self, tag_name: &str) -> Result<&ElementMeta> {
        self.get(tag_name).ok_or_else(
            || anyhow!("unknown element {tag_name:?}"))
    }

    /// Whether `name` may be used on an element with meta `meta`. If
    /// `as_flag` is true, checks whether it may appear without value.
    pub fn allows_attribute(&self, meta: &ElementMeta, name: &str, as_flag: bool) -> bool {
        if name.starts_with("data-") {
            return true
        }
        if name.starts_with("aria-") {
            return !as_flag
        }
        if let Some(ty) = meta.attributes.get(name) {
            return !as_flag || ty.is_bool()
        }
        if meta.has_global_attributes && self.global_attribute_names.contains(name) {
            return !as_flag || self.global_bool_attribute_names.contains(name)
        }
        false
    }

    /// Sorted list of the attribute names valid for `meta`, for error
    /// messages.
    pub fn attribute_names<'a>(&'a self, meta: &'a ElementMeta) -> Vec<&'a str> {
        let mut names: HashSet<&str> = meta.attributes.keys().map(|k| k.as_str()).collect();
        if meta.has_global_attributes {
            names.extend(self.global_attribute_names.iter().map(|k| k.as_str()));
        }
        let mut names: Vec<&str> = names.into_iter().collect();
        names.sort();
        names
    }

    /// Add or replace element definitions and add global attribute
    /// names.
    pub fn extend(&mut self, ext: MetaDbExtension) {
        self.global_attribute_names.extend(ext.global_attribute_names);
        for def in ext.elements {
            self.elementmeta.insert(def.tag_name.clone(), ElementMeta::from(def));
        }
    }
}


pub fn read_meta_db_extension(path: &Path) -> Result<MetaDbExtension> {
    (|| -> Result<MetaDbExtension> {
        let file = std::fs::File::open(path)?;
        let ext: MetaDbExtension = serde_json::from_reader(std::io::BufReader::new(file))?;
        for def in &ext.elements {
            if def.tag_name.is_empty() {
                bail!("element definition with empty tag_name")
            }
            if !def.has_closing_tag && def.allows_child_text {
                bail!("element {:?}: elements without closing tag can't \
                       have text content", def.tag_name.as_str())
            }
        }
        Ok(ext)
    })().with_context(|| anyhow!("reading meta db extension from {path:?}"))
}

// once again, XX move to lib
fn opt_get_env<T: FromStr>(varname: &str) -> Result<Option<T>>
    where T::Err: Display
{
    match env::var(varname) {
        Ok(s) => {
            Ok(Some(s.parse().map_err(
                |e| anyhow!("could not parse {varname:?} env var with contents {s:?}: {e}"))?))
        },
        Err(e) => match e {
            env::VarError::NotPresent => Ok(None),
            env::VarError::NotUnicode(_) => bail!("could not decode {varname:?} env var: {e}")
        }
    }
}

fn get_env_bool(varname: &str) -> Result<bool> {
    Ok(opt_get_env(varname)?.unwrap_or(false))
}

/// The builtin database, extended from the JSON file given in the
/// `SPHC_META_DB_JSON` env var if set.
pub fn read_meta_db() -> Result<MetaDb> {
    let debug = get_env_bool("SPHC_META_DEBUG")?;
    let mut metadb = MetaDb::builtin();
    if let Some(path) = opt_get_env::<String>("SPHC_META_DB_JSON")? {
        if debug { eprintln!("extending meta db from {path:?}") };
        metadb.extend(read_meta_db_extension(path.as_ref())?);
    } else {
        if debug { eprintln!("using builtin meta db") };
    }
    Ok(metadb)
}
