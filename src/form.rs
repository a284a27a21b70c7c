//! Forms and fieldsets made of labeled input fields.
//!
//! CSS classes used:
//!
//! | element                       | class          |
//! |-------------------------------|----------------|
//! | box around one field          | `field`        |
//! | box around the label          | `field-label`  |
//! | box around the input          | `field-input`  |
//! | the input itself              | `input`        |
//! | help text                     | `field-help`   |
//! | placeholder for status output | `action-status`|
//! | box around the buttons        | `buttons`      |

use std::marker::PhantomData;

use anyhow::Result;
use kstring::KString;
use tagfactory::{att, Att, Node, TagFactory, ToAttrs, ToBody};

use crate::def_boxed_thiserror;

def_boxed_thiserror!(FieldError, pub enum FieldErrorKind {
    #[error("add_field: input must be an element, got a {0}")]
    InputNotElement(&'static str),
});


/// What distinguishes the containers: their root element and its
/// default attributes.
pub trait ContainerKind {
    const TAG_NAME: &'static str;

    fn default_attrs() -> Vec<Att> {
        Vec::new()
    }
}

#[derive(Debug, Clone)]
pub struct FormKind;

impl ContainerKind for FormKind {
    const TAG_NAME: &'static str = "form";

    fn default_attrs() -> Vec<Att> {
        [att("method", "POST")].to_attrs()
    }
}

#[derive(Debug, Clone)]
pub struct FieldsetKind;

impl ContainerKind for FieldsetKind {
    const TAG_NAME: &'static str = "fieldset";
}

pub type Form = FieldContainer<FormKind>;
pub type Fieldset = FieldContainer<FieldsetKind>;


#[derive(Debug, Clone)]
pub enum FieldEntry {
    Node(Node),
    /// Built when the containing container is built.
    Fieldset(Fieldset),
}

impl From<Node> for FieldEntry {
    fn from(node: Node) -> Self {
        FieldEntry::Node(node)
    }
}

impl From<Fieldset> for FieldEntry {
    fn from(fieldset: Fieldset) -> Self {
        FieldEntry::Fieldset(fieldset)
    }
}


#[derive(Debug, Clone)]
pub struct FieldContainer<K: ContainerKind> {
    classes: Vec<KString>,
    attrs: Vec<Att>,
    legend: Option<KString>,
    fields: Vec<FieldEntry>,
    btns: Vec<Node>,
    kind: PhantomData<fn() -> K>,
}

impl<K: ContainerKind> Default for FieldContainer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ContainerKind> FieldContainer<K> {
    pub fn new() -> Self {
        FieldContainer {
            classes: Vec::new(),
            attrs: K::default_attrs(),
            legend: None,
            fields: Vec::new(),
            btns: Vec::new(),
            kind: PhantomData,
        }
    }

    /// `attrs` override the default attributes of the kind, keeping
    /// their position.
    pub fn with(classes: &[&str], attrs: impl ToAttrs) -> Self {
        let mut c = Self::new();
        c.classes = classes.iter().map(|s| KString::from_ref(s)).collect();
        for att in attrs.to_attrs() {
            match c.attrs.iter_mut().find(|(k, _)| *k == att.0) {
                Some(old) => *old = att,
                None => c.attrs.push(att),
            }
        }
        c
    }

    pub fn classes(&self) -> &[KString] { &self.classes }
    pub fn attrs(&self) -> &[Att] { &self.attrs }
    pub fn legend(&self) -> Option<&str> { self.legend.as_deref() }
    pub fn fields(&self) -> &[FieldEntry] { &self.fields }
    pub fn btns(&self) -> &[Node] { &self.btns }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k.as_str() == name)
            .and_then(|(_, v)| v.as_str())
    }

    /// Rendered as a `<legend>` before the fields.
    pub fn set_legend(&mut self, legend: &str) {
        self.legend = Some(KString::from_ref(legend));
    }

    /// Append `node` to the fields as is.
    pub fn add(&mut self, node: Node) -> &mut Node {
        self.fields.push(FieldEntry::Node(node));
        match self.fields.last_mut() {
            Some(FieldEntry::Node(node)) => node,
            _ => unreachable!(),
        }
    }

    pub fn add_fieldset(&mut self, fieldset: Fieldset) -> &mut Fieldset {
        self.fields.push(FieldEntry::Fieldset(fieldset));
        match self.fields.last_mut() {
            Some(FieldEntry::Fieldset(fieldset)) => fieldset,
            _ => unreachable!(),
        }
    }

    /// Append a field box holding `label` (if non-empty), `input`
    /// and `fhelp` (if non-empty). If there's a label and `input`
    /// has no `id`, it gets `{container id or "form"}-{input name}`
    /// to link the label to it. A `required` flag on the input adds
    /// an asterisk after it.
    pub fn add_field(
        &mut self,
        html: &TagFactory,
        label: &str,
        mut input: Node,
        fhelp: Option<&str>,
        container_classes: &[&str],
    ) -> Result<()> {
        if input.as_element().is_none() {
            Err(FieldError::from(FieldErrorKind::InputNotElement(input.kind_name())))?
        }
        let input_tag = input.try_element_mut()?;

        let mut label_body = Vec::new();
        if !label.is_empty() {
            let input_id = match input_tag.get_attribute("id") {
                Some(id) => id.to_string(),
                None => match input_tag.get_attribute("name") {
                    Some(name) => format!("{}-{}",
                                          self.attribute("id").unwrap_or("form"),
                                          name),
                    None => String::new(),
                },
            };
            if !input_id.is_empty() && !input_tag.has_attribute("id") {
                input_tag.set_attribute("id", &input_id)?;
            }
            label_body.push(html.label([att("for", input_id)], [html.str(label)])?);
        }

        input_tag.add_classes(["input"]);
        let required = input_tag.has_flag("required");
        let mut input_body = vec![input];
        if required {
            input_body.push(html.staticstr(" *"));
        }

        let mut field_body = vec![
            html.div([att("class", "field-label")], label_body)?,
            html.div([att("class", "field-input")], input_body)?,
        ];
        if let Some(fhelp) = fhelp.filter(|s| !s.is_empty()) {
            field_body.push(html.span([att("class", "field-help")], [html.str(fhelp)])?);
        }
        let mut field_box = html.div([att("class", "field")], field_body)?;
        field_box.try_element_mut()?.add_classes(container_classes);
        self.fields.push(FieldEntry::Node(field_box));
        Ok(())
    }

    /// Replaces the buttons added previously.
    pub fn add_buttons(&mut self, btns: impl ToBody) {
        self.btns = btns.to_body();
    }

    /// A fresh element tree from the current fields and buttons;
    /// nested fieldsets are built recursively.
    pub fn build(&self, html: &TagFactory) -> Result<Node> {
        let mut body = Vec::with_capacity(self.fields.len() + 3);
        if let Some(legend) = &self.legend {
            body.push(html.legend([], [html.text(legend)])?);
        }
        for field in &self.fields {
            body.push(match field {
                FieldEntry::Node(node) => node.clone(),
                FieldEntry::Fieldset(fieldset) => fieldset.build(html)?,
            });
        }
        if !self.btns.is_empty() {
            body.push(html.div([att("class", "action-status")], [])?);
            body.push(html.div([att("class", "buttons")], self.btns.as_slice())?);
        }
        let mut container = html.element_by_name(K::TAG_NAME, self.attrs.as_slice(), body)?;
        container.try_element_mut()?.add_classes(&self.classes);
        Ok(container)
    }
}


#[cfg(test)]
mod tests {
    use tagfactory::{flag, Print};
    use super::*;

    fn email_input(html: &TagFactory) -> Node {
        html.input([att("name", "email"), att("type", "email"), flag("required")], [])
            .unwrap()
    }

    #[test]
    fn t_form_defaults() {
        let html = TagFactory::new();
        let form = Form::new();
        assert_eq!(form.build(&html).unwrap().to_html_fragment_string().unwrap(),
                   "<form method=\"POST\"></form>");
        let form = Form::with(&["login"], [att("id", "login"), att("method", "get")]);
        assert_eq!(form.build(&html).unwrap().to_html_fragment_string().unwrap(),
                   "<form method=\"get\" id=\"login\" class=\"login\"></form>");
        assert_eq!(Fieldset::new().build(&html).unwrap().to_html_fragment_string().unwrap(),
                   "<fieldset></fieldset>");
    }

    #[test]
    fn t_add_field() {
        let html = TagFactory::new();
        let mut form = Form::with(&[], [att("id", "signup")]);
        form.add_field(&html, "Email", email_input(&html), Some("Never shared"), &["wide"])
            .unwrap();
        let FieldEntry::Node(field) = &form.fields()[0] else { panic!() };
        assert_eq!(
            field.to_html_fragment_string().unwrap(),
            "<div class=\"field wide\">\
             <div class=\"field-label\"><label for=\"signup-email\">Email</label></div>\
             <div class=\"field-input\">\
             <input name=\"email\" type=\"email\" required id=\"signup-email\" class=\"input\"> *\
             </div>\
             <span class=\"field-help\">Never shared</span></div>");
    }

    #[test]
    fn t_synthesized_id() {
        let html = TagFactory::new();
        let id_of = |form: &mut Form, input: Node| -> String {
            form.add_field(&html, "L", input, None, &[]).unwrap();
            let FieldEntry::Node(field) = form.fields().last().unwrap() else { panic!() };
            let input_box = &field.try_element().unwrap().body()[1];
            let input = &input_box.try_element().unwrap().body()[0];
            input.try_element().unwrap().get_attribute("id").unwrap().to_string()
        };
        let mut a = Form::with(&[], [att("id", "f")]);
        let mut b = Form::with(&[], [att("id", "f")]);
        assert_eq!(id_of(&mut a, email_input(&html)), "f-email");
        assert_eq!(id_of(&mut b, email_input(&html)), "f-email");
        assert_eq!(id_of(&mut Form::new(), email_input(&html)), "form-email");
        let explicit = html.input([att("id", "mine"), att("name", "email")], []).unwrap();
        assert_eq!(id_of(&mut a, explicit), "mine");
    }

    #[test]
    fn t_field_without_label() {
        let html = TagFactory::new();
        let mut fs = Fieldset::new();
        let input = html.input([att("name", "q")], []).unwrap();
        fs.add_field(&html, "", input, Some(""), &[]).unwrap();
        let input = html.textarea([], []).unwrap();
        fs.add_field(&html, "Notes", input, None, &[]).unwrap();
        assert_eq!(
            fs.build(&html).unwrap().to_html_fragment_string().unwrap(),
            "<fieldset>\
             <div class=\"field\"><div class=\"field-label\"></div>\
             <div class=\"field-input\"><input name=\"q\" class=\"input\"></div></div>\
             <div class=\"field\"><div class=\"field-label\"><label for=\"\">Notes</label></div>\
             <div class=\"field-input\"><textarea class=\"input\"></textarea></div></div>\
             </fieldset>");
    }

    #[test]
    fn t_input_not_element() {
        let html = TagFactory::new();
        let mut form = Form::new();
        let e = form.add_field(&html, "Name", html.str("x"), None, &[]).unwrap_err();
        let e = e.downcast_ref::<FieldError>().unwrap();
        assert!(matches!(e.kind(), FieldErrorKind::InputNotElement(k) if *k == "Node::String"));
        assert!(form.fields().is_empty());
    }

    #[test]
    fn t_buttons() {
        let html = TagFactory::new();
        let mut form = Form::new();
        form.add_buttons([html.button([], [html.str("Old")]).unwrap()]);
        form.add_buttons([html.button([att("type", "submit")], [html.str("Save")]).unwrap()]);
        assert_eq!(form.btns().len(), 1);
        let s = form.build(&html).unwrap().to_html_fragment_string().unwrap();
        assert_eq!(s, "<form method=\"POST\"><div class=\"action-status\"></div>\
                       <div class=\"buttons\"><button type=\"submit\">Save</button></div></form>");
        assert_eq!(form.build(&html).unwrap().to_html_fragment_string().unwrap(), s);
    }

    #[test]
    fn t_nested_fieldsets() {
        let html = TagFactory::new();
        let mut inner = Fieldset::with(&["street"], []);
        inner.add(html.p([], [html.str("inner")]).unwrap());
        let mut outer = Fieldset::new();
        outer.set_legend("Address");
        outer.add_fieldset(inner);
        let mut form = Form::new();
        form.add_fieldset(outer).add(html.hr([], []).unwrap());
        let added = form.add(html.p([], []).unwrap());
        added.try_element_mut().unwrap().add_classes(["last"]);
        assert_eq!(
            form.build(&html).unwrap().to_html_fragment_string().unwrap(),
            "<form method=\"POST\"><fieldset><legend>Address</legend>\
             <fieldset class=\"street\"><p>inner</p></fieldset><hr></fieldset>\
             <p class=\"last\"></p></form>");
    }
}
