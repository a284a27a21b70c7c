//! The tag tree: `Node`s and the `Tag` elements among them.

use anyhow::{bail, Result};
use backtrace::Backtrace;
use kstring::KString;
use tagmeta::meta::{ElementMeta, MetaDb};

use crate::{myfrom::MyFrom, ToBody};

fn all_whitespace(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_whitespace())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttValue {
    Value(KString),
    /// Attribute given without value, like `required`.
    Flag,
}

impl AttValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttValue::Value(v) => Some(v.as_str()),
            AttValue::Flag => None,
        }
    }
}

pub type Att = (KString, AttValue);


#[derive(Debug, Clone)]
pub enum Node {
    Element(Tag),
    String(KString),
    /// Text that is printed without escaping, e.g. script bodies.
    Raw(KString),
    None,
}

impl From<Tag> for Node {
    fn from(tag: Tag) -> Self {
        Node::Element(tag)
    }
}

impl Node {
    pub fn as_element(&self) -> Option<&Tag> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Tag> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn try_element(&self) -> Result<&Tag> {
        match self {
            Node::Element(e) => Ok(e),
            _ => bail!("not a Node::Element, but {}", self.kind_name()),
        }
    }

    pub fn try_element_mut(&mut self) -> Result<&mut Tag> {
        match self {
            Node::Element(e) => Ok(e),
            _ => bail!("not a Node::Element, but {}", self.kind_name()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Element(_) => "Node::Element",
            Node::String(_) => "Node::String",
            Node::Raw(_) => "Node::Raw",
            Node::None => "Node::None",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Node::None)
    }
}


/// An HTML element. Attribute and body changes are checked against
/// the `MetaDb` if the creating `TagFactory` was verifying.
#[derive(Debug, Clone)]
pub struct Tag {
    pub(crate) meta: &'static ElementMeta,
    pub(crate) attrs: Vec<Att>,
    pub(crate) body: Vec<Node>,
    // Present iff verification is enabled
    pub(crate) metadb: Option<&'static MetaDb>,
}

pub(crate) fn verify_attribute(
    metadb: &MetaDb,
    meta: &ElementMeta,
    i: usize,
    (name, val): &Att,
) -> Result<()> {
    let as_flag = *val == AttValue::Flag;
    if !metadb.allows_attribute(meta, name, as_flag) {
        if as_flag && metadb.allows_attribute(meta, name, false) {
            bail!("attribute #{i} {:?} for element {:?} needs a value\n{:?}",
                  name.as_str(),
                  meta.tag_name.as_str(),
                  Backtrace::new())
        }
        bail!("invalid attribute #{i} {:?} for element {:?} (valid: {:?})\n{:?}",
              name.as_str(),
              meta.tag_name.as_str(),
              metadb.attribute_names(meta),
              Backtrace::new())
    }
    if let AttValue::Value(v) = val {
        if let Some(ty) = meta.attributes.get(name.as_str()) {
            if !ty.allows_value(v) {
                bail!("invalid value {:?} for attribute {:?} of element {:?} \
                       (valid: {:?})",
                      v.as_str(),
                      name.as_str(),
                      meta.tag_name.as_str(),
                      ty)
            }
        }
    }
    Ok(())
}

pub(crate) fn verify_child(meta: &ElementMeta, i: usize, node: &Node) -> Result<()> {
    let describe_allowed = || {
        format!("{:?}{}",
                meta.child_element_names(),
                if meta.allows_child_text {
                    " as well as text"
                } else {
                    " (no text)"
                })
    };
    if !meta.has_closing_tag && !node.is_none() {
        bail!("content value #{i}: element {:?} can't have content\n{:?}",
              meta.tag_name.as_str(),
              Backtrace::new())
    }
    match node {
        Node::Element(child) => {
            if !meta.allows_child_element(&child.meta.tag_name) {
                bail!("content value #{i}: element {:?} not allowed as \
                       a child of element {:?}, only: {}\n{:?}",
                      child.meta.tag_name.as_str(),
                      meta.tag_name.as_str(),
                      describe_allowed(),
                      Backtrace::new())
            }
        }
        Node::String(s) => {
            if !meta.allows_child_text && !all_whitespace(s) {
                bail!("content value #{i}: text is not allowed as \
                       a child of element {:?}, only: {}\n{:?}",
                      meta.tag_name.as_str(),
                      describe_allowed(),
                      Backtrace::new())
            }
        }
        // Can't look inside, accepted wherever there's a closing tag
        Node::Raw(_) => {}
        Node::None => {}
    }
    Ok(())
}

impl Tag {
    pub(crate) fn new_verified(
        meta: &'static ElementMeta,
        attrs: Vec<Att>,
        body: Vec<Node>,
        metadb: Option<&'static MetaDb>,
    ) -> Result<Tag> {
        if let Some(metadb) = metadb {
            for (i, att) in attrs.iter().enumerate() {
                verify_attribute(metadb, meta, i, att)?;
            }
            for (i, node) in body.iter().enumerate() {
                verify_child(meta, i, node)?;
            }
        }
        Ok(Tag { meta, attrs, body, metadb })
    }

    pub fn meta(&self) -> &'static ElementMeta { self.meta }
    pub fn tag_name(&self) -> &str { &self.meta.tag_name }
    pub fn attrs(&self) -> &[Att] { &self.attrs }
    pub fn body(&self) -> &[Node] { &self.body }

    fn position(&self, name: &str) -> Option<usize> {
        self.attrs.iter().position(|(k, _)| k.as_str() == name)
    }

    /// The value of attribute `name`; `None` if missing or if it is a
    /// flag.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.position(name).and_then(|i| self.attrs[i].1.as_str())
    }

    /// Whether attribute `name` is present with a value.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Whether attribute `name` is present without a value.
    pub fn has_flag(&self, name: &str) -> bool {
        self.position(name).map_or(false, |i| self.attrs[i].1 == AttValue::Flag)
    }

    fn set_att(&mut self, att: Att) -> Result<()> {
        let i = self.position(&att.0);
        if let Some(metadb) = self.metadb {
            verify_attribute(metadb, self.meta, i.unwrap_or(self.attrs.len()), &att)?;
        }
        match i {
            Some(i) => self.attrs[i] = att,
            None => self.attrs.push(att),
        }
        Ok(())
    }

    /// Set attribute `key` to `val`, replacing an existing value or
    /// flag of the same name in place.
    pub fn set_attribute<K, V>(&mut self, key: K, val: V) -> Result<()>
    where KString: MyFrom<K> + MyFrom<V>
    {
        self.set_att((KString::myfrom(key), AttValue::Value(KString::myfrom(val))))
    }

    pub fn set_flag<K>(&mut self, key: K) -> Result<()>
    where KString: MyFrom<K>
    {
        self.set_att((KString::myfrom(key), AttValue::Flag))
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<AttValue> {
        self.position(name).map(|i| self.attrs.remove(i).1)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attribute("class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Add CSS classes, skipping those already present. A `class`
    /// attribute is created (at the end) if there isn't one yet.
    pub fn add_classes<I, S>(&mut self, classes: I)
    where I: IntoIterator<Item = S>,
          S: AsRef<str>
    {
        let mut new: Vec<KString> = Vec::new();
        for class in classes {
            for c in class.as_ref().split_ascii_whitespace() {
                if !self.has_class(c) && !new.iter().any(|n| n.as_str() == c) {
                    new.push(KString::from_ref(c));
                }
            }
        }
        if new.is_empty() {
            return
        }
        let added = new.join(" ");
        match self.position("class") {
            Some(i) => {
                let joined = match self.attrs[i].1.as_str() {
                    Some(old) if !all_whitespace(old) => format!("{old} {added}"),
                    _ => added,
                };
                self.attrs[i].1 = AttValue::Value(KString::from_string(joined));
            }
            None => self.attrs.push((KString::from_static("class"),
                                     AttValue::Value(KString::from_string(added)))),
        }
    }

    pub fn push(&mut self, node: Node) -> Result<()> {
        if self.metadb.is_some() {
            verify_child(self.meta, self.body.len(), &node)?;
        }
        self.body.push(node);
        Ok(())
    }

    pub fn extend_body(&mut self, body: impl ToBody) -> Result<()> {
        for node in body.to_body() {
            self.push(node)?;
        }
        Ok(())
    }

    pub fn set_body(&mut self, body: impl ToBody) -> Result<()> {
        let body = body.to_body();
        if self.metadb.is_some() {
            for (i, node) in body.iter().enumerate() {
                verify_child(self.meta, i, node)?;
            }
        }
        self.body = body;
        Ok(())
    }
}
