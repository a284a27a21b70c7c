use std::{io::Write, path::PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser as ClapParser;
use sphc::{config::PageConfig,
           io_util::my_read_to_string,
           page::Html5Page,
           template::TemplateData};
use tagfactory::{Node, TagFactory};


fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, val) = s.split_once('=').ok_or_else(
        || format!("expecting key=value, got {s:?}"))?;
    if key.is_empty() {
        return Err(format!("empty key in {s:?}"))
    }
    Ok((key.into(), val.into()))
}

#[derive(clap::Parser, Debug)]
/// Render an HTML5 page from a JSON page configuration.
struct Args {
    /// Path to the JSON file with the page configuration (doctype,
    /// jslibs, css_links, title, nav_menu, current_nav, script).
    #[clap(long)]
    config: PathBuf,

    /// File with the HTML to insert as the main content, unescaped.
    #[clap(long)]
    main: Option<PathBuf>,

    /// File with CSS to inline in the head.
    #[clap(long)]
    style: Option<PathBuf>,

    /// Value for a `${key}` placeholder in the output; can be given
    /// multiple times.
    #[clap(long, parse(try_from_str = parse_key_val))]
    set: Vec<(String, String)>,

    /// Write to this path, creating missing directories, instead of
    /// stdout.
    #[clap(long)]
    out: Option<PathBuf>,

    /// Don't check elements and attributes against the element
    /// database.
    #[clap(long)]
    no_verify: bool,
}

struct CliPage {
    config: PageConfig,
    main: Option<String>,
    style: Option<String>,
}

impl Html5Page for CliPage {
    fn config(&self) -> &PageConfig {
        &self.config
    }

    fn style(&self) -> Result<Option<String>> {
        Ok(self.style.clone())
    }

    fn main(&self, html: &TagFactory) -> Result<Node> {
        Ok(match &self.main {
            Some(main) => html.raw(main),
            None => html.empty_node(),
        })
    }
}

impl CliPage {
    fn from_args(args: &Args) -> Result<Self> {
        Ok(CliPage {
            config: PageConfig::from_json_file(&args.config)?,
            main: args.main.as_ref().map(my_read_to_string).transpose()?,
            style: args.style.as_ref().map(my_read_to_string).transpose()?,
        })
    }
}

fn run(args: Args, outp: &mut impl Write) -> Result<()> {
    let page = CliPage::from_args(&args)?;
    let html = if args.no_verify {
        TagFactory::new_unverified()
    } else {
        TagFactory::new()
    };
    let data: TemplateData = args.set.into_iter().collect();

    if let Some(out) = &args.out {
        page.write(&html, out, Some(&data))
    } else {
        let s = page.render(&html, Some(&data))?;
        outp.write_all(s.as_bytes())
            .and_then(|()| outp.write_all(b"\n"))
            .and_then(|()| outp.flush())
            .map_err(|e| anyhow!("writing output: {e}"))
    }
}

fn main() -> Result<()> {
    run(Args::parse(), &mut std::io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_parse_key_val() {
        assert_eq!(parse_key_val("site=Shop").unwrap(), ("site".into(), "Shop".into()));
        assert_eq!(parse_key_val("q=a=b").unwrap(), ("q".into(), "a=b".into()));
        assert_eq!(parse_key_val("empty=").unwrap(), ("empty".into(), "".into()));
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn t_args() {
        let args = Args::try_parse_from([
            "sphc", "--config", "page.json", "--set", "a=1", "--set", "b=2", "--no-verify",
        ]).unwrap();
        assert_eq!(args.config, PathBuf::from("page.json"));
        assert_eq!(args.set, vec![("a".to_string(), "1".to_string()),
                                  ("b".to_string(), "2".to_string())]);
        assert!(args.no_verify);
        assert!(args.out.is_none());
        assert!(Args::try_parse_from(["sphc", "--config", "p.json", "--set", "x"]).is_err());
        assert!(Args::try_parse_from(["sphc"]).is_err());
    }

    fn write_inputs(dir: &std::path::Path) {
        std::fs::write(dir.join("page.json"), r#"{
            "title": "${site}",
            "jslibs": [],
            "css_links": [],
            "nav_menu": [{"label": "Home", "url": "/"}],
            "current_nav": "Home"
        }"#).unwrap();
        std::fs::write(dir.join("main.html"), "<p class=\"lead\">Hi ${who} & co</p>").unwrap();
        std::fs::write(dir.join("style.css"), "p > a { color: red }").unwrap();
    }

    fn args_in(dir: &std::path::Path, extra: &[&str]) -> Args {
        let config = dir.join("page.json");
        let main = dir.join("main.html");
        let style = dir.join("style.css");
        let mut argv = vec![
            "sphc",
            "--config", config.to_str().unwrap(),
            "--main", main.to_str().unwrap(),
            "--style", style.to_str().unwrap(),
            "--set", "site=Shop",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn t_run_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let mut out = Vec::new();
        run(args_in(dir.path(), &[]), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
                                 <title>Shop</title><style>p > a { color: red }</style></head>"));
        assert!(out.contains("<div id=\"main\" role=\"main\">\
                              <p class=\"lead\">Hi ${who} & co</p></div>"));
        assert!(out.contains("<h2 class=\"nav-current\"><a href=\"/\">Home</a></h2>"));
        assert!(out.ends_with("</html>\n"));
    }

    #[test]
    fn t_run_to_file() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let outpath = dir.path().join("public/x/index.html");
        let mut stdout = Vec::new();
        run(args_in(dir.path(), &["--out", outpath.to_str().unwrap()]), &mut stdout).unwrap();
        assert!(stdout.is_empty());
        let written = std::fs::read_to_string(&outpath).unwrap();
        let page = CliPage::from_args(&args_in(dir.path(), &[])).unwrap();
        let data: TemplateData = [("site".to_string(), "Shop".to_string())].into_iter().collect();
        assert_eq!(written, page.render(&TagFactory::new(), Some(&data)).unwrap());
    }

    #[test]
    fn t_run_missing_main() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        std::fs::remove_file(dir.path().join("main.html")).unwrap();
        let e = run(args_in(dir.path(), &[]), &mut Vec::new()).unwrap_err();
        assert!(format!("{e:#}").contains("main.html"));
    }
}
