//! Html dom abstraction, with runtime typing.

pub mod warn;
pub mod myfrom;
pub mod node;
pub mod factory;

use std::io::Write;

use anyhow::{bail, Result};
use kstring::KString;
use lazy_static::lazy_static;
use tagmeta::meta::{MetaDb, read_meta_db};

pub use node::{Node, Tag, Att, AttValue};
pub use factory::TagFactory;
pub use tagmeta::meta::ElementMeta;
use crate::myfrom::MyFrom;

pub const NBSP: &str = "\u{00A0}";

lazy_static!{
    pub static ref METADB: MetaDb = read_meta_db().expect(
        "element meta database should be readable");
}


pub trait Print {
    /// Print serialized HTML.
    fn print_html_fragment(&self, out: &mut impl Write) -> Result<()>;

    /// Print plain text, completely *ignoring* HTML markup. Can
    /// currently only give an error if encountering raw HTML.
    fn print_plain(&self, out: &mut String) -> Result<()>;

    fn to_html_fragment_string(&self) -> Result<String> {
        let mut s = Vec::new();
        self.print_html_fragment(&mut s)?;
        Ok(String::from_utf8(s)?)
    }

    fn to_plain_string(&self) -> Result<String> {
        let mut s = String::new();
        self.print_plain(&mut s)?;
        Ok(s)
    }
}

/// Write `bytes` with the characters special in HTML text and
/// attribute values escaped.
pub fn write_html_escaped(out: &mut impl Write, bytes: &[u8]) -> std::io::Result<()> {
    let mut start = 0;
    for (i, b) in bytes.iter().enumerate() {
        let replacement: &[u8] = match b {
            b'&' => b"&amp;",
            b'<' => b"&lt;",
            b'>' => b"&gt;",
            b'"' => b"&quot;",
            b'\'' => b"&#39;",
            _ => continue,
        };
        out.write_all(&bytes[start..i])?;
        out.write_all(replacement)?;
        start = i + 1;
    }
    out.write_all(&bytes[start..])
}

impl Print for [Node] {
    fn print_html_fragment(&self, out: &mut impl Write) -> Result<()> {
        for node in self {
            node.print_html_fragment(out)?;
        }
        Ok(())
    }

    fn print_plain(&self, out: &mut String) -> Result<()> {
        for node in self {
            node.print_plain(out)?;
        }
        Ok(())
    }
}

impl Print for Att {
    fn print_html_fragment(&self, out: &mut impl Write) -> Result<()> {
        out.write_all(self.0.as_bytes())?; // XX no escape ever needed?
        if let AttValue::Value(v) = &self.1 {
            out.write_all(b"=\"")?;
            write_html_escaped(out, v.as_bytes())?;
            out.write_all(b"\"")?;
        }
        Ok(())
    }

    fn print_plain(&self, _out: &mut String) -> Result<()> {
        panic!("attributes are never printed in print_plain for Node:s")
    }
}

impl Print for Node {
    fn print_html_fragment(&self, out: &mut impl Write) -> Result<()> {
        Ok(match self {
            Node::Element(e) => e.print_html_fragment(out)?,
            Node::String(s) => write_html_escaped(out, s.as_bytes())?,
            Node::Raw(s) => out.write_all(s.as_bytes())?,
            Node::None => (),
        })
    }

    fn print_plain(&self, out: &mut String) -> Result<()> {
        match self {
            Node::Element(e) => e.print_plain(out),
            Node::String(s) => Ok(out.push_str(s.as_str())),
            Node::Raw(_) =>
                // would require parsing
                bail!("print_plain: cannot (currently) print raw HTML as plain text"),
            Node::None => Ok(()),
        }
    }
}

impl Print for Tag {
    fn print_html_fragment(&self, out: &mut impl Write) -> Result<()> {
        let meta = self.meta;
        out.write_all(b"<")?;
        out.write_all(meta.tag_name.as_bytes())?;
        for att in &self.attrs {
            out.write_all(b" ")?;
            att.print_html_fragment(out)?;
        }
        out.write_all(b">")?;
        self.body.print_html_fragment(out)?;
        if meta.has_closing_tag {
            out.write_all(b"</")?;
            out.write_all(meta.tag_name.as_bytes())?;
            out.write_all(b">")?;
        }
        Ok(())
    }

    fn print_plain(&self, out: &mut String) -> Result<()> {
        self.body.print_plain(out)
    }
}


fn ks<T>(s: T) -> KString
where KString: MyFrom<T>
{
    KString::myfrom(s)
}

pub fn att<T, U>(key: T, val: U) -> Option<Att>
    where KString: MyFrom<T> + MyFrom<U>
{
    Some((ks(key), AttValue::Value(ks(val))))
}

pub fn opt_att<T, U>(key: T, val: Option<U>) -> Option<Att>
    where KString: MyFrom<T> + MyFrom<U>
{
    val.map(|val| (ks(key), AttValue::Value(ks(val))))
}

/// An attribute without value, like `required`.
pub fn flag<T>(key: T) -> Option<Att>
    where KString: MyFrom<T>
{
    Some((ks(key), AttValue::Flag))
}

pub fn opt_flag<T>(key: T, on: bool) -> Option<Att>
    where KString: MyFrom<T>
{
    if on { flag(key) } else { None }
}


pub trait ToAttrs {
    fn to_attrs(self) -> Vec<Att>;
}

// Only one array impl, so that `[]` can be typed without annotation.
impl<const N: usize> ToAttrs for [Option<Att>; N] {
    fn to_attrs(self) -> Vec<Att> {
        self.into_iter().flatten().collect()
    }
}

impl ToAttrs for Vec<Att> {
    fn to_attrs(self) -> Vec<Att> {
        self
    }
}

impl ToAttrs for &[Att] {
    fn to_attrs(self) -> Vec<Att> {
        self.to_vec()
    }
}


pub trait ToBody {
    fn to_body(self) -> Vec<Node>;
}

impl<const N: usize> ToBody for [Node; N] {
    fn to_body(self) -> Vec<Node> {
        Vec::from(self)
    }
}

impl ToBody for Vec<Node> {
    fn to_body(self) -> Vec<Node> {
        self
    }
}

impl ToBody for &[Node] {
    fn to_body(self) -> Vec<Node> {
        self.to_vec()
    }
}

impl ToBody for Node {
    fn to_body(self) -> Vec<Node> {
        vec![self]
    }
}


pub trait TryCollectBody {
    fn try_collect_body(&mut self) -> Result<Vec<Node>>;
}

impl<I: Iterator<Item = Result<Node>>> TryCollectBody for I {
    fn try_collect_body(&mut self) -> Result<Vec<Node>> {
        let mut v = Vec::new();
        for item in self {
            v.push(item?);
        }
        Ok(v)
    }
}
