use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Multi-locale text field. The API keys translations by locale code plus a
/// catch-all `all` entry; only `all` is consumed here.
#[derive(Debug, Clone, Default)]
pub struct LocalizedText {
    pub all: Option<String>,
}

impl LocalizedText {
    /// Total accessor: absent text reads as empty, never as "undefined".
    pub fn get(&self) -> &str {
        self.all.as_deref().unwrap_or_default()
    }

    pub fn get_non_empty(&self) -> Option<&str> {
        self.all.as_deref().filter(|text| !text.is_empty())
    }
}

// The API is inconsistent about the shape of text fields: usually an object
// of locale keys, occasionally a bare string, sometimes null.
impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let all = match Value::deserialize(d)? {
            Value::Object(mut map) => match map.remove("all") {
                Some(Value::String(text)) => Some(text),
                _ => None,
            },
            Value::String(text) => Some(text),
            _ => None,
        };

        Ok(Self { all })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub text_display_title: LocalizedText,
    #[serde(default)]
    pub text_sinopse: LocalizedText,
    #[serde(default)]
    pub image_image: LocalizedText,
    #[serde(default)]
    pub datetime_start_date: String,
    #[serde(default)]
    pub datetime_end_date: String,
    #[serde(default)]
    pub ref_seccao: Option<String>,
    #[serde(default)]
    pub ref_local: Option<String>,
}

/// A venue or section record referenced by events through `ref_local` /
/// `ref_seccao`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedEntity {
    #[serde(rename = "_title", default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub text_morada: LocalizedText,
    #[serde(default)]
    pub text_description: LocalizedText,
    #[serde(default)]
    pub image_image: LocalizedText,
    #[serde(default)]
    pub link_website: LocalizedText,
    #[serde(default)]
    pub link_google_maps: LocalizedText,
}
