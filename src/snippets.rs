//! Small ready-made elements.

use std::path::Path;

use anyhow::Result;
use tagfactory::{att, Node, TagFactory};

use crate::io_util::my_read_to_string;

pub const DEFAULT_JQUERY_VERSION: &str = "1.6.2";
pub const DEFAULT_JQUERY_UI_VERSION: &str = "1.8.14";

pub const DEFAULT_CSS_LINKS: &[&str] = &[
    "https://github.com/thatcoolguy/gridless-boilerplate/raw/master/assets/css/main.css",
];

/// The CDN URLs of jQuery and jQuery UI, in that order. `None` picks
/// the default version.
pub fn gen_jquery_urls(
    jquery_version: Option<&str>,
    jquery_ui_version: Option<&str>,
) -> [String; 2] {
    [
        format!("https://ajax.googleapis.com/ajax/libs/jquery/{}/jquery.min.js",
                jquery_version.unwrap_or(DEFAULT_JQUERY_VERSION)),
        format!("http://ajax.googleapis.com/ajax/libs/jqueryui/{}/jquery-ui.min.js",
                jquery_ui_version.unwrap_or(DEFAULT_JQUERY_UI_VERSION)),
    ]
}

// XX should be a `clear`/`clearfix` CSS class instead of inline style
pub fn clear(html: &TagFactory) -> Result<Node> {
    html.br([att("style", "clear:both")], [])
}

/// An inert script block holding a client-side template.
pub fn jq_tmpl(html: &TagFactory, id: &str) -> Result<Node> {
    html.script([att("id", id), att("type", "text/x-jquery-tmpl")], [])
}

/// A script element with the contents of the file at `path` as its
/// body, unescaped.
pub fn script_fromfile(html: &TagFactory, path: &Path) -> Result<Node> {
    let code = my_read_to_string(path)?;
    html.script([att("type", "text/javascript")], [html.raw(code)])
}


#[cfg(test)]
mod tests {
    use tagfactory::Print;
    use super::*;

    #[test]
    fn t_gen_jquery_urls() {
        let [jq, ui] = gen_jquery_urls(None, None);
        assert_eq!(jq, "https://ajax.googleapis.com/ajax/libs/jquery/1.6.2/jquery.min.js");
        assert_eq!(ui, "http://ajax.googleapis.com/ajax/libs/jqueryui/1.8.14/jquery-ui.min.js");
        let [jq, ui] = gen_jquery_urls(Some("3.7.1"), Some("1.13.2"));
        assert!(jq.contains("/jquery/3.7.1/"));
        assert!(ui.contains("/jqueryui/1.13.2/"));
    }

    #[test]
    fn t_clear_and_tmpl() {
        let html = TagFactory::new();
        assert_eq!(clear(&html).unwrap().to_html_fragment_string().unwrap(),
                   "<br style=\"clear:both\">");
        assert_eq!(jq_tmpl(&html, "row").unwrap().to_html_fragment_string().unwrap(),
                   "<script id=\"row\" type=\"text/x-jquery-tmpl\"></script>");
    }

    #[test]
    fn t_script_fromfile() {
        let html = TagFactory::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.js");
        std::fs::write(&path, "if (a < b && c) { go(\"x\"); }").unwrap();
        assert_eq!(script_fromfile(&html, &path).unwrap().to_html_fragment_string().unwrap(),
                   "<script type=\"text/javascript\">if (a < b && c) { go(\"x\"); }</script>");
        assert!(script_fromfile(&html, &dir.path().join("missing.js")).is_err());
    }
}
