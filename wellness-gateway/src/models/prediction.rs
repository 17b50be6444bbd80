use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Output of the ML inference server.
///
/// The server also sends `risk` and `confidence`; they are not needed to
/// build an assessment and are ignored here.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictionResult {
    pub probability: f64,
    #[serde(default)]
    pub feature_importance: FeatureImportance,
}

/// Feature name → importance weight, in the order the server sent them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureImportance(pub Vec<(String, f64)>);

impl FeatureImportance {
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(name, weight)| (name.as_str(), *weight))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FeatureImportance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, weight) in &self.0 {
            map.serialize_entry(name, weight)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeatureImportance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor;

        impl<'de> Visitor<'de> for OrderedMapVisitor {
            type Value = FeatureImportance;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of feature names to numeric weights")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, weight)) = access.next_entry::<String, f64>()? {
                    entries.push((name, weight));
                }
                Ok(FeatureImportance(entries))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(FeatureImportance::default())
            }
        }

        deserializer.deserialize_any(OrderedMapVisitor)
    }
}
