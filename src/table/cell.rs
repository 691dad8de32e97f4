//! Cell values produced by column accessors.
//!
//! A cell is a primitive, a structured JSON value, or a rendered node tree. Export and
//! filtering read every variant through [`CellValue::to_text`], so there is no runtime type
//! sniffing anywhere downstream.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Plain scalar cell content.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Text(String),
    Number(Number),
    Bool(bool),
}

/// A rendered fragment, such as a status badge or a link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Renderable {
    Text {
        text: String,
    },
    Element {
        tag: String,
        #[serde(skip_serializing_if = "Map::is_empty")]
        props: Map<String, Value>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<Renderable>,
    },
}

impl Renderable {
    pub fn text(text: impl Into<String>) -> Self {
        Renderable::Text { text: text.into() }
    }

    pub fn element(tag: impl Into<String>) -> Self {
        Renderable::Element {
            tag: tag.into(),
            props: Map::new(),
            children: Vec::new(),
        }
    }

    /// Element wrapping a single text node, e.g. `badge("Paid")`.
    pub fn labelled(tag: impl Into<String>, label: impl Into<String>) -> Self {
        Self::element(tag).child(Self::text(label))
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Renderable::Element { props, .. } = &mut self {
            props.insert(key.into(), value.into());
        }
        self
    }

    pub fn child(mut self, node: Renderable) -> Self {
        if let Renderable::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    /// Concatenated text of all text nodes, or `None` when the tree has none.
    pub fn text_content(&self) -> Option<String> {
        match self {
            Renderable::Text { text } => Some(text.clone()),
            Renderable::Element { children, .. } => {
                let mut parts = children.iter().filter_map(Renderable::text_content).peekable();
                parts.peek()?;
                Some(parts.collect())
            }
        }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Value of one cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Primitive(Primitive),
    Structured(Value),
    Renderable(Renderable),
}

impl CellValue {
    pub fn text(text: impl Into<String>) -> Self {
        CellValue::Primitive(Primitive::Text(text.into()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Human-readable text of the cell.
    ///
    /// Primitives print plainly, structured values as compact JSON, renderables as their
    /// text content (or compact JSON when they carry no text). `Empty` is `""`.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Primitive(Primitive::Text(text)) => text.clone(),
            CellValue::Primitive(Primitive::Number(n)) => n.to_string(),
            CellValue::Primitive(Primitive::Bool(b)) => b.to_string(),
            CellValue::Structured(value) => value.to_string(),
            CellValue::Renderable(node) => node.text_content().unwrap_or_else(|| node.to_json()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Primitive(Primitive::Bool(_)) => 1,
            CellValue::Primitive(Primitive::Number(_)) => 2,
            CellValue::Primitive(Primitive::Text(_)) => 3,
            CellValue::Renderable(_) => 4,
            CellValue::Structured(_) => 5,
        }
    }

    /// Sort comparison: numbers numerically, text lexicographically, mixed kinds by kind.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (
                CellValue::Primitive(Primitive::Number(a)),
                CellValue::Primitive(Primitive::Number(b)),
            ) => compare_numbers(a, b),
            (CellValue::Primitive(Primitive::Text(a)), CellValue::Primitive(Primitive::Text(b))) => {
                a.cmp(b)
            }
            (CellValue::Primitive(Primitive::Bool(a)), CellValue::Primitive(Primitive::Bool(b))) => {
                a.cmp(b)
            }
            (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
            (a, b) if a.rank() == b.rank() => a.to_text().cmp(&b.to_text()),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

/// Integers compare exactly; only floats go through `f64`.
fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a.cmp(&b);
    }
    // Negative i64 against a u64 above i64::MAX.
    if a.is_i64() && b.is_u64() {
        return Ordering::Less;
    }
    if a.is_u64() && b.is_i64() {
        return Ordering::Greater;
    }
    let a = a.as_f64().unwrap_or(0.0);
    let b = b.as_f64().unwrap_or(0.0);
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Primitive(Primitive::Text(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Primitive(Primitive::Text(value.to_string()))
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        CellValue::from(value.as_str())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Primitive(Primitive::Bool(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(n) => CellValue::Primitive(Primitive::Number(n)),
            None => CellValue::Empty,
        }
    }
}

macro_rules! cell_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CellValue {
                fn from(value: $ty) -> Self {
                    CellValue::Primitive(Primitive::Number(Number::from(value)))
                }
            }
        )*
    };
}

cell_from_int!(i32, i64, u32, u64, usize);

impl From<Renderable> for CellValue {
    fn from(node: Renderable) -> Self {
        CellValue::Renderable(node)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl From<&Value> for CellValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(b) => CellValue::Primitive(Primitive::Bool(*b)),
            Value::Number(n) => CellValue::Primitive(Primitive::Number(n.clone())),
            Value::String(s) => CellValue::Primitive(Primitive::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => CellValue::Structured(value.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_text() {
        assert_eq!(CellValue::from(50).to_text(), "50");
        assert_eq!(CellValue::from(12.5).to_text(), "12.5");
        assert_eq!(CellValue::from("12.50").to_text(), "12.50");
        assert_eq!(CellValue::from(true).to_text(), "true");
        assert_eq!(CellValue::from(None::<String>).to_text(), "");
        assert_eq!(CellValue::from(f64::NAN), CellValue::Empty);
    }

    #[test]
    fn test_structured_serializes_as_json() {
        let cell = CellValue::from(&json!({ "men": 3, "women": 4 }));
        assert_eq!(cell.to_text(), r#"{"men":3,"women":4}"#);
        assert_eq!(CellValue::from(&Value::Null).to_text(), "");
    }

    #[test]
    fn test_renderable_extracts_text() {
        let badge = Renderable::element("badge")
            .prop("variant", "success")
            .child(Renderable::text("Paid"))
            .child(Renderable::labelled("small", " (cash)"));
        assert_eq!(CellValue::from(badge).to_text(), "Paid (cash)");
    }

    #[test]
    fn test_renderable_without_text_falls_back_to_json() {
        let icon = Renderable::element("icon").prop("name", "check");
        assert_eq!(
            CellValue::from(icon).to_text(),
            r#"{"kind":"element","tag":"icon","props":{"name":"check"}}"#
        );
    }

    #[test]
    fn test_compare() {
        assert_eq!(CellValue::from(9).compare(&CellValue::from(10)), Ordering::Less);
        assert_eq!(CellValue::from("9").compare(&CellValue::from("10")), Ordering::Greater);
        assert_eq!(CellValue::Empty.compare(&CellValue::from(0)), Ordering::Less);
        assert_eq!(
            CellValue::from(Renderable::labelled("b", "Alpha"))
                .compare(&CellValue::from(Renderable::labelled("b", "Beta"))),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_large_integers_exactly() {
        // Equal once rounded to f64.
        let above = CellValue::from(9_007_199_254_740_993u64);
        let below = CellValue::from(9_007_199_254_740_992u64);
        assert_eq!(above.compare(&below), Ordering::Greater);
        assert_eq!(below.compare(&above), Ordering::Less);

        assert_eq!(CellValue::from(-1).compare(&CellValue::from(u64::MAX)), Ordering::Less);
        assert_eq!(CellValue::from(2).compare(&CellValue::from(2.5)), Ordering::Less);
    }
}
