//! HTML5 page skeleton, loosely based on HTML5 Boilerplate.

use std::path::Path;

use anyhow::Result;
use tagfactory::{att, Node, TagFactory};

use crate::{config::PageConfig,
            io_util::write_creating_dirs,
            nav::{Nav, ToHtml},
            snippets::script_fromfile,
            template::{safe_substitute, TemplateData}};

/// A complete HTML5 document. Implementors provide the configuration
/// and override the hooks for the zones they fill; `render` and
/// `write` assemble the document in a fixed order:
///
/// ```text
/// <html>
///   <head> charset, title, jslibs, css_links, style </head>
///   <body>
///     topbar
///     <div class="container">
///       nav, header, <div id="main" role="main"> main </div>, footer
///     </div>
///     bottombar
///     <script> contents of the `script` file </script>
///   </body>
/// </html>
/// ```
pub trait Html5Page {
    fn config(&self) -> &PageConfig;

    /// Contents of an inline `<style>` in the head. `None` or an
    /// empty string leave it out.
    fn style(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn header(&self, html: &TagFactory) -> Result<Node> {
        html.header([], [])
    }

    fn footer(&self, html: &TagFactory) -> Result<Node> {
        html.footer([], [])
    }

    fn topbar(&self, html: &TagFactory) -> Result<Node> {
        Ok(html.empty_node())
    }

    fn bottombar(&self, html: &TagFactory) -> Result<Node> {
        Ok(html.empty_node())
    }

    fn main(&self, html: &TagFactory) -> Result<Node> {
        Ok(html.empty_node())
    }

    fn nav(&self, html: &TagFactory) -> Result<Node> {
        let config = self.config();
        Nav {
            entries: &config.nav_menu,
            current: &config.current_nav,
        }.to_html(html)
    }

    fn head(&self, html: &TagFactory) -> Result<Node> {
        let config = self.config();
        let mut body = vec![
            html.meta([att("charset", "utf-8")], [])?,
            html.title([], [html.str(&config.title)])?,
        ];
        for src in &config.jslibs {
            body.push(html.script([att("src", src)], [])?);
        }
        for href in &config.css_links {
            body.push(html.link([att("rel", "stylesheet"), att("href", href)], [])?);
        }
        if let Some(style) = self.style()? {
            if !style.is_empty() {
                // CSS is raw text, `>` in selectors must stay
                body.push(html.style([], [html.raw(style)])?);
            }
        }
        html.head([], body)
    }

    /// The document tree, without doctype.
    fn document(&self, html: &TagFactory) -> Result<Node> {
        let config = self.config();
        let mut body = vec![
            self.topbar(html)?,
            html.div(
                [att("class", "container")],
                [
                    self.nav(html)?,
                    self.header(html)?,
                    html.div([att("id", "main"), att("role", "main")],
                             [self.main(html)?])?,
                    self.footer(html)?,
                ])?,
            self.bottombar(html)?,
        ];
        if let Some(script) = &config.script {
            body.push(script_fromfile(html, script)?);
        }
        html.html(
            [],
            [
                self.head(html)?,
                html.body([], body)?,
            ])
    }

    /// The doctype followed by the serialized document, with the
    /// placeholders that `data` has values for substituted.
    fn render(&self, html: &TagFactory, data: Option<&TemplateData>) -> Result<String> {
        let out = html.to_html_string(&self.document(html)?, None)?;
        let out = match data {
            Some(data) => safe_substitute(&out, data),
            None => safe_substitute(&out, &TemplateData::new()),
        };
        // the doctype is not subject to substitution
        let doctype = &self.config().doctype;
        let mut s = String::with_capacity(doctype.len() + out.len());
        s.push_str(doctype);
        s.push_str(&out);
        Ok(s)
    }

    /// Render to `outpath`, creating missing parent directories.
    fn write(&self, html: &TagFactory, outpath: &Path, data: Option<&TemplateData>) -> Result<()> {
        let out = self.render(html, data)?;
        write_creating_dirs(outpath, &out)
    }
}


/// A page carrying its own substitution data, with all zones left
/// at their defaults.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub config: PageConfig,
    pub data: TemplateData,
}

impl Page {
    pub fn new(config: PageConfig) -> Self {
        Page { config, data: TemplateData::new() }
    }

    pub fn with_data(config: PageConfig, data: TemplateData) -> Self {
        Page { config, data }
    }

    pub fn render_own_data(&self, html: &TagFactory) -> Result<String> {
        self.render(html, Some(&self.data))
    }

    pub fn write_own_data(&self, html: &TagFactory, outpath: &Path) -> Result<()> {
        self.write(html, outpath, Some(&self.data))
    }
}

impl Html5Page for Page {
    fn config(&self) -> &PageConfig {
        &self.config
    }
}
