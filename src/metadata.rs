use crate::error::ExifToolError;
use crate::tag::{Tag, TagValue};
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Tag values read from one file.
///
/// Only holds tags that were requested *and* present in the file. Values are the
/// text ExifTool printed; [`value`](ImageMeta::value) converts them on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageMeta {
    values: HashMap<Tag, String>,
}

impl ImageMeta {
    pub(crate) fn new(values: HashMap<Tag, String>) -> Self {
        Self { values }
    }

    pub fn get(&self, tag: Tag) -> Option<&str> {
        self.values.get(&tag).map(String::as_str)
    }

    /// Typed value, `None` if the tag is absent or its text doesn't fit its kind.
    pub fn value(&self, tag: Tag) -> Option<TagValue> {
        self.get(tag).and_then(|raw| tag.parse_value(raw))
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.values.contains_key(&tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tag, &str)> {
        self.values.iter().map(|(tag, value)| (*tag, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> HashMap<Tag, String> {
        self.values
    }

    /// JSON object keyed by ExifTool tag name, using typed scalars where the text parses.
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .values
            .iter()
            .map(|(tag, raw)| {
                let value = match tag.parse_value(raw) {
                    Some(TagValue::Integer(i)) => Value::from(i),
                    Some(TagValue::Real(f)) => Value::from(f),
                    Some(TagValue::Boolean(b)) => Value::from(b),
                    _ => Value::from(raw.as_str()),
                };
                (tag.name().to_string(), value)
            })
            .collect();
        Value::Object(object)
    }

    /// Deserializes the values into `T`, whose fields are named after ExifTool tags.
    ///
    /// ```
    /// # use exiftool_process::{ExifToolError, ImageMeta};
    /// #[derive(serde::Deserialize)]
    /// #[serde(rename_all = "PascalCase")]
    /// struct Camera {
    ///     make: Option<String>,
    ///     image_width: Option<u32>,
    /// }
    ///
    /// # fn main() -> Result<(), ExifToolError> {
    /// let camera: Camera = ImageMeta::default().deserialize()?;
    /// assert!(camera.make.is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ExifToolError> {
        serde_path_to_error::deserialize(self.to_json()).map_err(ExifToolError::from)
    }
}

impl Serialize for ImageMeta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut sorted: Vec<_> = self.values.iter().collect();
        sorted.sort_by_key(|(tag, _)| tag.name());

        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (tag, value) in sorted {
            map.serialize_entry(tag.name(), value)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a ImageMeta {
    type Item = (&'a Tag, &'a String);
    type IntoIter = std::collections::hash_map::Iter<'a, Tag, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
