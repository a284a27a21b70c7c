use anyhow::Result;
use kstring::KString;
use tagmeta::meta::{ElementMeta, MetaDb};

use crate::{myfrom::MyFrom, node::{Node, Tag, Att}, Print, ToAttrs, ToBody, METADB};
use crate::warn;

/// Creates the nodes of a tag tree. Elements are checked against the
/// `MetaDb` when verification is enabled.
pub struct TagFactory {
    metadb: &'static MetaDb,
    verify: bool,
}

impl Default for TagFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl TagFactory {
    /// A verifying factory using the global `METADB`.
    pub fn new() -> Self {
        Self::new_with_metadb(&*METADB, true)
    }

    pub fn new_unverified() -> Self {
        Self::new_with_metadb(&*METADB, false)
    }

    pub fn new_with_metadb(metadb: &'static MetaDb, verify: bool) -> Self {
        TagFactory { metadb, verify }
    }

    pub fn metadb(&self) -> &'static MetaDb {
        self.metadb
    }

    pub fn verifies(&self) -> bool {
        self.verify
    }

    /// Look up the metadata of `tag_name`. Not `meta`, that's the
    /// element constructor.
    pub fn element_meta(&self, tag_name: &str) -> Result<&'static ElementMeta> {
        self.metadb.try_get(tag_name)
    }

    /// But also see `element` method for more comfort.
    pub fn new_element(
        &self,
        meta: &'static ElementMeta,
        attrs: Vec<Att>,
        body: Vec<Node>,
    ) -> Result<Node> {
        let metadb = if self.verify { Some(self.metadb) } else { None };
        Ok(Node::Element(Tag::new_verified(meta, attrs, body, metadb)?))
    }

    /// Create an element from arrays or vectors, for nice to use
    /// syntax.
    pub fn element(
        &self,
        meta: &'static ElementMeta,
        attrs: impl ToAttrs,
        body: impl ToBody,
    ) -> Result<Node> {
        self.new_element(meta, attrs.to_attrs(), body.to_body())
    }

    pub fn element_by_name(
        &self,
        tag_name: &str,
        attrs: impl ToAttrs,
        body: impl ToBody,
    ) -> Result<Node> {
        self.element(self.element_meta(tag_name)?, attrs, body)
    }

    pub fn text<T>(&self, s: T) -> Node
    where KString: MyFrom<T>
    {
        Node::String(KString::myfrom(s))
    }

    pub fn str(&self, s: &str) -> Node {
        Node::String(KString::from_ref(s))
    }

    pub fn staticstr(&self, s: &'static str) -> Node {
        Node::String(KString::from_static(s))
    }

    pub fn string(&self, s: String) -> Node {
        Node::String(KString::from_string(s))
    }

    pub fn opt_string(&self, s: Option<String>) -> Node {
        match s {
            Some(s) => self.string(s),
            None => self.empty_node(),
        }
    }

    /// Text that is printed verbatim, without HTML escaping. The
    /// caller is responsible for it being valid in its place.
    pub fn raw<T>(&self, s: T) -> Node
    where KString: MyFrom<T>
    {
        Node::Raw(KString::myfrom(s))
    }

    pub fn empty_node(&self) -> Node {
        Node::None
    }

    /// A text node with just a non-breaking space.
    pub fn nbsp(&self) -> Node {
        self.staticstr(crate::NBSP)
    }

    /// Serialize `node`, prefixed with `doctype` if given.
    pub fn to_html_string(&self, node: &Node, doctype: Option<&str>) -> Result<String> {
        if let Node::Raw(_) = node {
            warn!("to_html_string: printing of a Node::Raw at the top level")
        }
        let mut s = String::from(doctype.unwrap_or(""));
        s.push_str(&node.to_html_fragment_string()?);
        Ok(s)
    }
}

macro_rules! def_elements {
    ($($name:ident),* $(,)?) => {
        impl TagFactory {
            $(
                pub fn $name(&self, attrs: impl ToAttrs, body: impl ToBody) -> Result<Node> {
                    self.element_by_name(stringify!($name), attrs, body)
                }
            )*
        }
    }
}

def_elements!(
    html, head, title, meta, link, base, style, script, noscript,
    body, header, footer, nav, main, section, article, aside,
    div, span, p, pre, code, em, strong, small,
    h1, h2, h3, h4, h5, h6, br, hr, a, img,
    ul, ol, li, table, caption, thead, tbody, tfoot, tr, th, td,
    form, fieldset, legend, label, input, textarea, select, optgroup, option, button,
);


#[cfg(test)]
mod tests {
    use crate::{att, flag, Print};
    use super::*;

    #[test]
    fn t_unverified() {
        let html = TagFactory::new_unverified();
        let div = html.div([att("href", "/")], [html.str("x")]).unwrap();
        assert_eq!(div.to_html_fragment_string().unwrap(), "<div href=\"/\">x</div>");
        assert!(TagFactory::new().div([att("href", "/")], []).is_err());
    }

    #[test]
    fn t_verify_values() {
        let html = TagFactory::new();
        assert!(html.form([att("method", "POST")], []).is_ok());
        assert!(html.form([att("method", "PUT")], []).is_err());
        assert!(html.input([att("type", "texte")], []).is_err());
        assert!(html.input([flag("required"), att("aria-label", "Name")], []).is_ok());
        assert!(html.input([flag("aria-hidden")], []).is_err());
        assert!(html.element_by_name("blink", [], []).is_err());
    }

    #[test]
    fn t_meta_element_and_lookup() {
        let html = TagFactory::new();
        let meta = html.meta([att("charset", "utf-8")], []).unwrap();
        assert_eq!(meta.to_html_fragment_string().unwrap(), "<meta charset=\"utf-8\">");
        let m = html.element_meta("meta").unwrap();
        assert!(!m.has_closing_tag);
        assert!(html.element(m, [att("name", "x"), att("content", "y")], []).is_ok());
        assert!(html.element_meta("blink").is_err());
    }

    #[test]
    fn t_doctype() {
        let html = TagFactory::new();
        let p = html.p([], [html.staticstr("hi")]).unwrap();
        assert_eq!(html.to_html_string(&p, Some("<!DOCTYPE html>")).unwrap(),
                   "<!DOCTYPE html><p>hi</p>");
        assert_eq!(html.to_html_string(&p, None).unwrap(), "<p>hi</p>");
    }
}
