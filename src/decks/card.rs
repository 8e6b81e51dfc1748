use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default, deserialize_with = "null_as_default")]
    pub learned: bool,
    #[serde(rename = "imagePath", default)]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<Vec<Definition>>,
    /// Fields this server does not interpret (`id`, `name`, ...), kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Definitions are passed through untouched, `imagePath` included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Card {
    pub fn reset(&mut self) {
        self.learned = false;
        self.image_path = None;
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
