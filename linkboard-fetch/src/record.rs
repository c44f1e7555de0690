use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

const PARENT: &str = "parent";

/// One checked hyperlink as reported by the link checker API.
///
/// Only `parent` is interpreted. Every other field is kept in `extra` and
/// written back unchanged, so a record survives a decode/encode cycle
/// without the client knowing the server's schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkRecord {
    /// Grouping key for the page the link was found on.
    ///
    /// A string `parent` is used as is. Any other JSON value is kept verbatim
    /// in `extra["parent"]` and only its truthy form lands here: `true` and
    /// non-zero numbers become their text, while `null`, `false`, `0`, arrays
    /// and objects give `None`.
    pub parent: Option<String>,

    pub extra: Map<String, Value>,
}

/// Text key for a non-string `parent`, or `None` when it cannot group.
fn parent_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for LinkRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::<String, Value>::deserialize(deserializer)?;

        let parent = match extra.remove(PARENT) {
            None => None,
            Some(Value::String(parent)) => Some(parent),
            Some(other) => {
                let parent = parent_from_value(&other);
                extra.insert(PARENT.to_string(), other);
                parent
            }
        };

        Ok(Self { parent, extra })
    }
}

impl Serialize for LinkRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // A raw non-string parent in `extra` wins over the derived key
        let parent = self
            .parent
            .as_ref()
            .filter(|_| !self.extra.contains_key(PARENT));

        let mut map = serializer.serialize_map(Some(self.extra.len() + usize::from(parent.is_some())))?;
        if let Some(parent) = parent {
            map.serialize_entry(PARENT, parent)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl LinkRecord {
    pub fn new(parent: Option<&str>) -> Self {
        Self {
            parent: parent.map(str::to_string),
            extra: Map::new(),
        }
    }

    /// Builder-style helper for attaching an opaque field.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// The grouping key: the parent, but only when it is present and non-empty.
    pub fn parent_key(&self) -> Option<&str> {
        self.parent.as_deref().filter(|parent| !parent.is_empty())
    }

    pub fn url(&self) -> Option<&str> {
        self.text_field("url")
    }

    pub fn start_url(&self) -> Option<&str> {
        self.text_field("start_url")
    }

    pub fn content_type(&self) -> Option<&str> {
        self.text_field("content_type")
    }

    pub fn response_reason(&self) -> Option<&str> {
        self.text_field("response_reason")
    }

    pub fn date(&self) -> Option<&str> {
        self.text_field("date")
    }

    pub fn response_code(&self) -> Option<u16> {
        self.number_field("response_code")
            .and_then(|code| u16::try_from(code).ok())
    }

    /// Request duration in seconds.
    pub fn duration(&self) -> Option<f64> {
        match self.extra.get("duration")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Response size in bytes.
    pub fn size(&self) -> Option<u64> {
        self.number_field("size")
    }

    fn text_field(&self, key: &str) -> Option<&str> {
        // The checker stringifies nulls, so "None" means no value
        match self.extra.get(key)? {
            Value::String(s) if !s.is_empty() && s != "None" => Some(s.as_str()),
            _ => None,
        }
    }

    fn number_field(&self, key: &str) -> Option<u64> {
        match self.extra.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
