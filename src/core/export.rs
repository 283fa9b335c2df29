//! Structured writers used by the export hook.
//!
//! A writer receives a flat stream of element events. [`JsonWriter`] turns it
//! into a `serde_json::Value`, [`XmlWriter`] into an XML fragment. Lists are
//! a separate event: JSON keeps them as arrays, XML nests `Item` elements.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::{Map, Value as JsonValue};

use crate::core::error::ExportError;
use crate::core::value::Value;

/// Element name used for the items of a list value
pub const LIST_ITEM_ELEMENT: &str = "Item";

/// Target of a structured export
pub trait StructuredWriter {
    /// Opens a nested element
    fn begin_element(&mut self, name: &str) -> Result<(), ExportError>;

    /// Writes a named element holding one scalar value
    fn write_scalar(&mut self, name: &str, value: &Value) -> Result<(), ExportError>;

    /// Closes the most recently opened element
    fn end_element(&mut self) -> Result<(), ExportError>;

    /// Writes a list rooted at `name`, null items included
    fn write_list(&mut self, name: &str, items: &[Value]) -> Result<(), ExportError>;
}

/// Writes `value` rooted at `name`: scalars as one element, lists and maps
/// as nested elements. Nulls are skipped.
pub fn write_value(
    writer: &mut dyn StructuredWriter,
    name: &str,
    value: &Value,
) -> Result<(), ExportError> {
    match value {
        Value::Null => Ok(()),
        Value::List(items) => writer.write_list(name, items),
        Value::Map(entries) => {
            writer.begin_element(name)?;
            for (key, entry) in entries {
                write_value(writer, key, entry)?;
            }
            writer.end_element()
        }
        scalar => writer.write_scalar(name, scalar),
    }
}

/// Builds a JSON object; repeated sibling names collapse into an array and
/// list values stay arrays whatever their length
#[derive(Debug, Default)]
pub struct JsonWriter {
    root: Map<String, JsonValue>,
    open: Vec<(String, Map<String, JsonValue>)>,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self) -> &mut Map<String, JsonValue> {
        match self.open.last_mut() {
            Some((_, map)) => map,
            None => &mut self.root,
        }
    }

    fn insert(map: &mut Map<String, JsonValue>, name: &str, value: JsonValue) {
        match map.get_mut(name) {
            Some(JsonValue::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = JsonValue::Array(vec![first, value]);
            }
            None => {
                map.insert(name.to_string(), value);
            }
        }
    }

    /// Returns the finished document, failing if an element is still open
    pub fn finish(self) -> Result<JsonValue, ExportError> {
        if let Some((name, _)) = self.open.last() {
            return Err(ExportError::Nesting(format!("element '{name}' was never closed")));
        }
        Ok(JsonValue::Object(self.root))
    }
}

impl StructuredWriter for JsonWriter {
    fn begin_element(&mut self, name: &str) -> Result<(), ExportError> {
        if name.is_empty() {
            return Err(ExportError::EmptyName);
        }
        self.open.push((name.to_string(), Map::new()));
        Ok(())
    }

    fn write_scalar(&mut self, name: &str, value: &Value) -> Result<(), ExportError> {
        if name.is_empty() {
            return Err(ExportError::EmptyName);
        }
        let json = serde_json::to_value(value)?;
        Self::insert(self.current(), name, json);
        Ok(())
    }

    fn end_element(&mut self) -> Result<(), ExportError> {
        let (name, map) = self
            .open
            .pop()
            .ok_or_else(|| ExportError::Nesting("no element is open".to_string()))?;
        Self::insert(self.current(), &name, JsonValue::Object(map));
        Ok(())
    }

    fn write_list(&mut self, name: &str, items: &[Value]) -> Result<(), ExportError> {
        if name.is_empty() {
            return Err(ExportError::EmptyName);
        }
        let items = items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Self::insert(self.current(), name, JsonValue::Array(items));
        Ok(())
    }
}

/// Writes an unindented XML fragment without declaration
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
    open: Vec<String>,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            open: Vec::new(),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), ExportError> {
        self.writer
            .write_event(event)
            .map_err(|e| ExportError::Xml(e.to_string()))
    }

    /// Returns the written fragment, failing if an element is still open
    pub fn finish(self) -> Result<String, ExportError> {
        if let Some(name) = self.open.last() {
            return Err(ExportError::Nesting(format!("element '{name}' was never closed")));
        }
        String::from_utf8(self.writer.into_inner()).map_err(|e| ExportError::Xml(e.to_string()))
    }
}

impl StructuredWriter for XmlWriter {
    fn begin_element(&mut self, name: &str) -> Result<(), ExportError> {
        check_xml_name(name)?;
        self.emit(Event::Start(BytesStart::new(name)))?;
        self.open.push(name.to_string());
        Ok(())
    }

    fn write_scalar(&mut self, name: &str, value: &Value) -> Result<(), ExportError> {
        check_xml_name(name)?;
        if value.is_null() {
            return self.emit(Event::Empty(BytesStart::new(name)));
        }
        let text = value.to_string();
        self.emit(Event::Start(BytesStart::new(name)))?;
        self.emit(Event::Text(BytesText::new(&text)))?;
        self.emit(Event::End(BytesEnd::new(name)))
    }

    fn end_element(&mut self) -> Result<(), ExportError> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| ExportError::Nesting("no element is open".to_string()))?;
        self.emit(Event::End(BytesEnd::new(name)))
    }

    /// One [`LIST_ITEM_ELEMENT`] per item; null items stay as empty elements
    fn write_list(&mut self, name: &str, items: &[Value]) -> Result<(), ExportError> {
        self.begin_element(name)?;
        for item in items {
            if item.is_null() {
                self.write_scalar(LIST_ITEM_ELEMENT, item)?;
            } else {
                write_value(self, LIST_ITEM_ELEMENT, item)?;
            }
        }
        self.end_element()
    }
}

/// Element names must be XML names without a namespace prefix
fn check_xml_name(name: &str) -> Result<(), ExportError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(ExportError::EmptyName);
    };
    if !is_name_start_char(first) || !chars.all(is_name_char) {
        return Err(ExportError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}
