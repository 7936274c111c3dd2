//! Parameter documentation for tool methods
//!
//! A [`MethodKey`] describes one argument a tool accepts. Keys are used for
//! help output and schemas only; handlers still validate their own inputs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// JSON type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    /// String
    String,
    /// Any number
    Number,
    /// Whole number
    Integer,
    /// Boolean
    Boolean,
    /// Array (vectors are `[x, y, z]`)
    Array,
    /// Object
    Object,
}

impl KeyKind {
    /// Lower-case type name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// Documented tool parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodKey {
    /// Argument name
    pub key: String,
    /// Human-readable description
    pub desc: String,
    /// Whether the argument may be omitted
    pub optional: bool,
    /// JSON type
    #[serde(rename = "type")]
    pub kind: KeyKind,
    /// Example values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    /// Accepted values when the argument is an enumeration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Value used when the argument is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl MethodKey {
    /// Optional parameter of the given kind
    #[must_use]
    pub fn new(key: impl Into<String>, desc: impl Into<String>, kind: KeyKind) -> Self {
        Self {
            key: key.into(),
            desc: desc.into(),
            optional: true,
            kind,
            examples: Vec::new(),
            enum_values: Vec::new(),
            default: None,
        }
    }

    /// Optional string parameter
    #[must_use]
    pub fn string(key: impl Into<String>, desc: impl Into<String>) -> Self {
        Self::new(key, desc, KeyKind::String)
    }

    /// Optional integer parameter
    #[must_use]
    pub fn integer(key: impl Into<String>, desc: impl Into<String>) -> Self {
        Self::new(key, desc, KeyKind::Integer)
    }

    /// Optional boolean parameter
    #[must_use]
    pub fn boolean(key: impl Into<String>, desc: impl Into<String>) -> Self {
        Self::new(key, desc, KeyKind::Boolean)
    }

    /// Optional `[x, y, z]` parameter
    #[must_use]
    pub fn vector(key: impl Into<String>, desc: impl Into<String>) -> Self {
        Self::new(key, desc, KeyKind::Array)
    }

    /// Mark as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }

    /// With example values
    #[must_use]
    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples.extend(examples.into_iter().map(Into::into));
        self
    }

    /// With accepted enumeration values
    #[must_use]
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values.extend(values.into_iter().map(Into::into));
        self
    }

    /// With default value
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// JSON-schema fragment for this parameter
    #[must_use]
    pub fn schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), json!(self.kind.as_str()));
        schema.insert("description".into(), json!(self.desc));
        if !self.enum_values.is_empty() {
            schema.insert("enum".into(), json!(self.enum_values));
        }
        if !self.examples.is_empty() {
            schema.insert("examples".into(), json!(self.examples));
        }
        if let Some(default) = &self.default {
            schema.insert("default".into(), default.clone());
        }
        Value::Object(schema)
    }
}

/// JSON-schema object for a full parameter list
#[must_use]
pub fn schema(keys: &[MethodKey]) -> Value {
    let properties: Map<String, Value> = keys.iter().map(|k| (k.key.clone(), k.schema())).collect();
    let required: Vec<&str> = keys.iter().filter(|k| !k.optional).map(|k| k.key.as_str()).collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Plain-text parameter table used by tool previews
#[must_use]
pub fn render_table(keys: &[MethodKey]) -> String {
    let width = keys.iter().map(|k| k.key.len()).max().unwrap_or(0);
    let mut out = String::from("Parameters:\n");
    for k in keys {
        let flag = if k.optional { "optional" } else { "required" };
        out.push_str(&format!(
            "  {:width$}  {:8} {:8}  {}",
            k.key,
            k.kind.as_str(),
            flag,
            k.desc,
        ));
        if !k.enum_values.is_empty() {
            out.push_str(&format!(" [{}]", k.enum_values.join(", ")));
        }
        if let Some(default) = &k.default {
            out.push_str(&format!(" (default: {default})"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<MethodKey> {
        vec![
            MethodKey::string("action", "Action type").required().with_enum(["get", "clear"]),
            MethodKey::integer("count", "Maximum entries").with_default(10),
        ]
    }

    #[test]
    fn schema_lists_required_keys() {
        let s = schema(&keys());
        assert_eq!(s["required"], json!(["action"]));
        assert_eq!(s["properties"]["action"]["enum"], json!(["get", "clear"]));
        assert_eq!(s["properties"]["count"]["type"], json!("integer"));
        assert_eq!(s["properties"]["count"]["default"], json!(10));
    }

    #[test]
    fn table_rows() {
        let table = render_table(&keys());
        assert!(table.starts_with("Parameters:\n"));
        assert!(table.contains("action  string   required  Action type [get, clear]"));
        assert!(table.contains("count   integer  optional  Maximum entries (default: 10)"));
    }

    #[test]
    fn serializes_kind_as_type() {
        let v = serde_json::to_value(MethodKey::boolean("active", "Active state")).unwrap();
        assert_eq!(v["type"], json!("boolean"));
        assert_eq!(v["optional"], json!(true));
        assert!(v.get("examples").is_none());
    }
}
