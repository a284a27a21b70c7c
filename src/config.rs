//! Page configuration, loadable from JSON.

use std::{collections::BTreeMap, path::{Path, PathBuf}};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{io_util::my_read_to_string,
            snippets::{gen_jquery_urls, DEFAULT_CSS_LINKS}};

/// A link shown as an option below a navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    /// More attributes for the `<a>`, like `target` or `class`. An
    /// `href` in here is ignored.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

impl NavLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        NavLink { label: label.into(), href: href.into(), attrs: BTreeMap::new() }
    }

    pub fn with_attr(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), val.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub options: Option<Vec<NavLink>>,
}

impl NavEntry {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        NavEntry { label: label.into(), url: url.into(), options: None }
    }

    pub fn with_options(
        label: impl Into<String>,
        url: impl Into<String>,
        options: Vec<NavLink>,
    ) -> Self {
        NavEntry { label: label.into(), url: url.into(), options: Some(options) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Printed verbatim before the `<html>` element.
    pub doctype: String,
    /// Script URLs, loaded in order from the head.
    pub jslibs: Vec<String>,
    pub css_links: Vec<String>,
    pub title: String,
    pub nav_menu: Vec<NavEntry>,
    /// Label of the `nav_menu` entry to mark as current; empty for
    /// none.
    pub current_nav: String,
    /// File whose contents are appended to the body as inline script.
    pub script: Option<PathBuf>,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            doctype: "<!DOCTYPE html>".into(),
            jslibs: gen_jquery_urls(None, None).to_vec(),
            css_links: DEFAULT_CSS_LINKS.iter().map(|s| s.to_string()).collect(),
            title: "Common case HTML5 template".into(),
            nav_menu: Vec::new(),
            current_nav: String::new(),
            script: None,
        }
    }
}

impl PageConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file; relative `script` paths are taken
    /// relative to the directory containing the file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::from_json_str(&my_read_to_string(path)?)
            .with_context(|| anyhow!("parsing page config {path:?}"))?;
        if let (Some(script), Some(dir)) = (&config.script, path.parent()) {
            if script.is_relative() {
                config.script = Some(dir.join(script));
            }
        }
        Ok(config)
    }
}
