//! `$`-placeholder substitution on rendered output.
//!
//! Placeholders are `${name}` or `$name`, where name matches
//! `[_A-Za-z][_A-Za-z0-9]*`, and `$$` stands for a literal `$`. Any
//! other `$` is not a placeholder.

use std::collections::BTreeMap;

use tagfactory::nowarn as warn;

use crate::def_boxed_thiserror;

pub type TemplateData = BTreeMap<String, String>;

def_boxed_thiserror!(TemplateError, pub enum TemplateErrorKind {
    #[error("no value for placeholder {0:?}")]
    MissingKey(String),
    #[error("invalid placeholder in string: line {line}, col {col}")]
    InvalidPlaceholder { line: usize, col: usize },
});

#[derive(Debug, PartialEq, Eq)]
enum Placeholder<'t> {
    /// `$$`
    Escape,
    /// `$name` or `${name}`
    Named(&'t str),
    Invalid,
}

fn is_ident_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

fn is_ident_continue(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

fn ident_len(s: &[u8]) -> usize {
    match s.first() {
        Some(b) if is_ident_start(*b) =>
            1 + s[1..].iter().take_while(|b| is_ident_continue(**b)).count(),
        _ => 0
    }
}

/// `s` must start with `$`. Returns the placeholder and the number
/// of bytes it occupies (1 for `Invalid`).
fn parse_placeholder(s: &str) -> (Placeholder, usize) {
    let b = s.as_bytes();
    debug_assert_eq!(b[0], b'$');
    match b.get(1) {
        Some(b'$') => (Placeholder::Escape, 2),
        Some(b'{') => {
            let n = ident_len(&b[2..]);
            if n > 0 && b.get(2 + n) == Some(&b'}') {
                (Placeholder::Named(&s[2..2 + n]), n + 3)
            } else {
                (Placeholder::Invalid, 1)
            }
        }
        Some(_) => {
            let n = ident_len(&b[1..]);
            if n > 0 {
                (Placeholder::Named(&s[1..1 + n]), n + 1)
            } else {
                (Placeholder::Invalid, 1)
            }
        }
        None => (Placeholder::Invalid, 1),
    }
}

fn line_and_col(s: &str, pos: usize) -> (usize, usize) {
    let before = &s[..pos];
    let line = before.matches('\n').count() + 1;
    let col = pos - before.rfind('\n').map_or(0, |i| i + 1) + 1;
    (line, col)
}

fn substitute_with(
    template: &str,
    mut missing: impl FnMut(&str, usize) -> Result<(), TemplateError>,
    data: &TemplateData,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;
    while let Some(i) = template[pos..].find('$') {
        let start = pos + i;
        out.push_str(&template[pos..start]);
        let (placeholder, len) = parse_placeholder(&template[start..]);
        match placeholder {
            Placeholder::Escape => out.push('$'),
            Placeholder::Named(name) => {
                if let Some(val) = data.get(name) {
                    out.push_str(val);
                } else {
                    missing(name, start)?;
                    out.push_str(&template[start..start + len]);
                }
            }
            Placeholder::Invalid => {
                // an empty name reports a `$` that isn't a placeholder
                missing("", start)?;
                out.push('$');
            }
        }
        pos = start + len;
    }
    out.push_str(&template[pos..]);
    Ok(out)
}

/// Replace the placeholders for which `data` has a value; all others
/// stay in the output literally.
pub fn safe_substitute(template: &str, data: &TemplateData) -> String {
    substitute_with(
        template,
        |_name, _pos| {
            warn!("leaving placeholder {_name:?} unreplaced");
            Ok(())
        },
        data,
    ).expect("never fails since the missing handler never fails")
}

/// Like `safe_substitute` but fails on the first placeholder without
/// a value in `data`, or on a `$` that doesn't start a placeholder.
pub fn substitute(template: &str, data: &TemplateData) -> Result<String, TemplateError> {
    substitute_with(
        template,
        |name, pos| {
            let kind = if name.is_empty() {
                let (line, col) = line_and_col(template, pos);
                TemplateErrorKind::InvalidPlaceholder { line, col }
            } else {
                TemplateErrorKind::MissingKey(name.into())
            };
            Err(TemplateError::from(kind))
        },
        data,
    )
}


#[cfg(test)]
mod tests {
    use super::*;

    fn data(kvs: &[(&str, &str)]) -> TemplateData {
        kvs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn t_parse_placeholder() {
        assert_eq!(parse_placeholder("$$x"), (Placeholder::Escape, 2));
        assert_eq!(parse_placeholder("${ab_1}c"), (Placeholder::Named("ab_1"), 7));
        assert_eq!(parse_placeholder("$ab_1.c"), (Placeholder::Named("ab_1"), 5));
        assert_eq!(parse_placeholder("${ab"), (Placeholder::Invalid, 1));
        assert_eq!(parse_placeholder("${1a}"), (Placeholder::Invalid, 1));
        assert_eq!(parse_placeholder("$("), (Placeholder::Invalid, 1));
        assert_eq!(parse_placeholder("$"), (Placeholder::Invalid, 1));
        assert_eq!(parse_placeholder("$ü"), (Placeholder::Invalid, 1));
    }

    #[test]
    fn t_safe_substitute() {
        let d = data(&[("name", "World"), ("x", "1")]);
        assert_eq!(safe_substitute("Hello ${name}!", &d), "Hello World!");
        assert_eq!(safe_substitute("Hello $name!", &d), "Hello World!");
        assert_eq!(safe_substitute("${missing} and $missing", &d), "${missing} and $missing");
        assert_eq!(safe_substitute("$$name costs $$5", &d), "$name costs $5");
        assert_eq!(safe_substitute("$(\"#a\").hide(); $", &d), "$(\"#a\").hide(); $");
        assert_eq!(safe_substitute("${x}${x}$x", &d), "111");
        assert_eq!(safe_substitute("", &d), "");
        assert_eq!(safe_substitute("ü${x}ü", &d), "ü1ü");
    }

    #[test]
    fn t_safe_substitute_idempotent_for_unknown() {
        let empty = TemplateData::new();
        let once = safe_substitute("<p>${missing}</p>", &empty);
        assert_eq!(once, "<p>${missing}</p>");
        assert_eq!(safe_substitute(&once, &empty), once);
    }

    #[test]
    fn t_substitute() {
        let d = data(&[("name", "World")]);
        assert_eq!(substitute("Hi ${name} $$", &d).unwrap(), "Hi World $");
        let e = substitute("Hi ${nobody}", &d).unwrap_err();
        assert!(matches!(e.kind(), TemplateErrorKind::MissingKey(k) if k == "nobody"));
        let e = substitute("a\nbc $(", &d).unwrap_err();
        assert!(matches!(e.kind(), TemplateErrorKind::InvalidPlaceholder { line: 2, col: 4 }));
        assert_eq!(e.to_string(), "invalid placeholder in string: line 2, col 4");
    }
}
