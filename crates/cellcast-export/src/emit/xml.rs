use cellcast_common::{Fields, Value};
use once_cell::sync::Lazy;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use regex::Regex;

use crate::error::ExportError;
use crate::record::Record;

static XML_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][\w.-]*$").expect("xml name pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: Option<String>,
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    fn set_attribute(&mut self, name: &str, value: String) {
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }
}

/// Element tree with a single root, filled through [`XmlDocument::set_root`].
#[derive(Debug, Clone, Default)]
pub struct XmlDocument {
    root: Option<XmlElement>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_root(&mut self, element: XmlElement) {
        self.root = Some(element);
    }

    pub fn root(&self) -> Option<&XmlElement> {
        self.root.as_ref()
    }

    /// Build the document for `value` with `name` as root tag. Keys that are
    /// not XML names (integer map keys among them) are rejected.
    pub fn from_value(name: &str, value: &Value) -> Result<Self, ExportError> {
        let mut holder = XmlElement::new("");
        build(&mut holder, name, value, name)?;
        let root = holder
            .children
            .pop()
            .ok_or_else(|| ExportError::Xml(format!("`{name}` has no element content")))?;
        let mut doc = Self::new();
        doc.set_root(root);
        Ok(doc)
    }

    pub fn to_xml_string(&self) -> Result<String, ExportError> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| ExportError::Xml("document has no root element".to_string()))?;
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(xml_err)?;
        write_element(&mut writer, root)?;
        String::from_utf8(writer.into_inner()).map_err(xml_err)
    }
}

/// Item records are wrapped as `{item + "s": data}` under the record root.
pub fn to_xml(record: &Record) -> Result<String, ExportError> {
    let doc = match &record.item {
        Some(item) => {
            let mut wrapper = Fields::new();
            wrapper.insert(format!("{item}s").into(), record.data.clone());
            XmlDocument::from_value(&record.root, &Value::Object(wrapper))?
        }
        None => XmlDocument::from_value(&record.root, &record.data)?,
    };
    doc.to_xml_string()
}

/// Scalars become attributes, except under a plural parent (`tags` ->
/// `<tag>text</tag>`). List children drop the last character of the list
/// name.
fn build(parent: &mut XmlElement, name: &str, value: &Value, root: &str) -> Result<(), ExportError> {
    if !XML_NAME.is_match(name) {
        return Err(ExportError::Xml(format!(
            "`{name}` in `{root}` is not a valid XML name"
        )));
    }
    match value {
        Value::Scalar(s) => {
            if parent.tag == format!("{name}s") {
                let mut child = XmlElement::new(name);
                child.text = Some(s.to_string());
                parent.children.push(child);
            } else {
                parent.set_attribute(name, s.to_string());
            }
        }
        Value::List(items) => {
            let mut element = XmlElement::new(name);
            let mut child_name = name.to_string();
            child_name.pop();
            for item in items {
                build(&mut element, &child_name, item, root)?;
            }
            parent.children.push(element);
        }
        Value::Object(fields) => {
            let mut element = XmlElement::new(name);
            for (key, item) in fields {
                build(&mut element, &key.to_string(), item, root)?;
            }
            parent.children.push(element);
        }
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), ExportError> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (k, v) in &element.attributes {
        start.push_attribute((k.as_str(), v.as_str()));
    }
    if element.children.is_empty() && element.text.is_none() {
        writer.write_event(Event::Empty(start)).map_err(xml_err)?;
        return Ok(());
    }
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_err)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.tag.as_str())))
        .map_err(xml_err)?;
    Ok(())
}

fn xml_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Xml(e.to_string())
}
