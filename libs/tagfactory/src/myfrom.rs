use std::borrow::Cow;

use kstring::KString;

// `From` can't be used here: KString already has From impls that
// would conflict with the ones needed for the `att` helpers.
pub trait MyFrom<T> {
    fn myfrom(s: T) -> Self;
}

impl MyFrom<&str> for KString {
    fn myfrom(s: &str) -> Self {
        KString::from_ref(s)
    }
}

impl MyFrom<&&str> for KString {
    fn myfrom(s: &&str) -> Self {
        KString::from_ref(*s)
    }
}

impl MyFrom<&String> for KString {
    fn myfrom(s: &String) -> Self {
        KString::from_ref(s)
    }
}

impl MyFrom<String> for KString {
    fn myfrom(s: String) -> Self {
        KString::from_string(s)
    }
}

impl MyFrom<&KString> for KString {
    fn myfrom(s: &KString) -> Self {
        s.clone()
    }
}

impl MyFrom<KString> for KString {
    fn myfrom(s: KString) -> Self {
        s
    }
}

impl<'t> MyFrom<Cow<'t, str>> for KString {
    fn myfrom(s: Cow<'t, str>) -> Self {
        KString::from_ref(s.as_ref())
    }
}

impl MyFrom<usize> for KString {
    fn myfrom(val: usize) -> Self {
        KString::from_string(val.to_string())
    }
}

impl MyFrom<i64> for KString {
    fn myfrom(val: i64) -> Self {
        KString::from_string(val.to_string())
    }
}


#[cfg(test)]
mod tests {
    use crate::{att, AttValue, ToAttrs};

    #[test]
    fn t_att_values() {
        let rows: usize = 4;
        let attrs = [att("rows", rows), att("tabindex", -1i64),
                     att(String::from("title"), std::borrow::Cow::from("x"))].to_attrs();
        let vals: Vec<&str> = attrs.iter().filter_map(|(_, v)| v.as_str()).collect();
        assert_eq!(vals, ["4", "-1", "x"]);
        assert_eq!(attrs[2].1, AttValue::Value("x".into()));
    }
}
