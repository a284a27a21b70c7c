use anyhow::Result;
use tagfactory::{att, warn, Node, TagFactory, ToAttrs, TryCollectBody};

use crate::config::{NavEntry, NavLink};

pub trait ToHtml {
    fn to_html(&self, html: &TagFactory) -> Result<Node>;
}

impl ToHtml for NavLink {
    fn to_html(&self, html: &TagFactory) -> Result<Node> {
        let mut attrs = [att("href", &self.href)].to_attrs();
        attrs.extend(self.attrs.iter()
                     .filter(|(k, _)| k.as_str() != "href")
                     .filter_map(|(k, v)| att(k, v)));
        html.a(attrs, [html.str(&self.label)])
    }
}

impl NavEntry {
    /// The heading linking to `url`, and the box with the options;
    /// both get marked when `current` is this entry's label.
    pub fn to_html_pair(&self, html: &TagFactory, current: &str) -> Result<[Node; 2]> {
        let mut header = html.h2(
            [],
            [html.a([att("href", &self.url)],
                    [html.str(&self.label)])?])?;
        let mut opts_box = html.div(
            [att("class", "nav-opt")],
            self.options.iter().flatten().map(|opt| {
                html.div([att("class", "nav-opt-item")],
                         [opt.to_html(html)?])
            }).try_collect_body()?)?;
        if self.label == current {
            header.try_element_mut()?.add_classes(["nav-current"]);
            opts_box.try_element_mut()?.add_classes(["nav-opt-current"]);
        }
        Ok([header, opts_box])
    }
}

/// The navigation menu: headings and option boxes of all entries,
/// interleaved in menu order, all directly inside one `<nav>`.
pub struct Nav<'t> {
    pub entries: &'t [NavEntry],
    /// Label of the current entry, or empty.
    pub current: &'t str,
}

impl<'t> ToHtml for Nav<'t> {
    fn to_html(&self, html: &TagFactory) -> Result<Node> {
        if self.entries.is_empty() {
            return Ok(html.empty_node())
        }
        if !self.current.is_empty()
            && !self.entries.iter().any(|e| e.label == self.current)
        {
            warn!("current nav {:?} does not match any entry", self.current);
        }
        let mut menu = Vec::with_capacity(self.entries.len() * 2);
        for entry in self.entries {
            menu.extend(entry.to_html_pair(html, self.current)?);
        }
        html.nav([], menu)
    }
}


#[cfg(test)]
mod tests {
    use tagfactory::Print;
    use super::*;

    fn menu() -> Vec<NavEntry> {
        vec![
            NavEntry::with_options("Home", "#home", vec![
                NavLink::new("Home Option 1", "/home/opt_1"),
                NavLink::new("Home Option 2", "/home/opt_2"),
            ]),
            NavEntry::new("About", "/about"),
        ]
    }

    #[test]
    fn t_empty() {
        let html = TagFactory::new();
        let nav = Nav { entries: &[], current: "Home" }.to_html(&html).unwrap();
        assert!(nav.is_none());
        assert_eq!(nav.to_html_fragment_string().unwrap(), "");
    }

    #[test]
    fn t_interleaved() {
        let html = TagFactory::new();
        let entries = menu();
        let nav = Nav { entries: &entries, current: "" }.to_html(&html).unwrap();
        let tag = nav.try_element().unwrap();
        assert_eq!(tag.tag_name(), "nav");
        let names: Vec<&str> = tag.body().iter()
            .map(|n| n.try_element().unwrap().tag_name())
            .collect();
        assert_eq!(names, ["h2", "div", "h2", "div"]);
        assert_eq!(
            nav.to_html_fragment_string().unwrap(),
            "<nav><h2><a href=\"#home\">Home</a></h2>\
             <div class=\"nav-opt\">\
             <div class=\"nav-opt-item\"><a href=\"/home/opt_1\">Home Option 1</a></div>\
             <div class=\"nav-opt-item\"><a href=\"/home/opt_2\">Home Option 2</a></div>\
             </div>\
             <h2><a href=\"/about\">About</a></h2><div class=\"nav-opt\"></div></nav>");
    }

    #[test]
    fn t_link_attrs() {
        let html = TagFactory::new();
        let link = NavLink::new("Docs", "/docs")
            .with_attr("target", "_blank")
            .with_attr("class", "ext")
            .with_attr("href", "/ignored");
        assert_eq!(link.to_html(&html).unwrap().to_html_fragment_string().unwrap(),
                   "<a href=\"/docs\" class=\"ext\" target=\"_blank\">Docs</a>");
        let bad = NavLink::new("X", "/x").with_attr("colspan", "2");
        assert!(bad.to_html(&html).is_err());
    }

    #[test]
    fn t_current() {
        let html = TagFactory::new();
        let entries = menu();
        let nav = Nav { entries: &entries, current: "About" }.to_html(&html).unwrap();
        let body = nav.try_element().unwrap().body();
        assert!(!body[0].try_element().unwrap().has_class("nav-current"));
        assert!(!body[1].try_element().unwrap().has_class("nav-opt-current"));
        assert!(body[2].try_element().unwrap().has_class("nav-current"));
        let opts = body[3].try_element().unwrap();
        assert!(opts.has_class("nav-opt-current"));
        assert!(opts.has_class("nav-opt"));
        assert_eq!(opts.get_attribute("class"), Some("nav-opt nav-opt-current"));
    }
}
