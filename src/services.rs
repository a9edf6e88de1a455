//! The services lists of the grooming shop, one document per locale.

use std::{fmt, path::Path};

use anyhow::Context;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::{error::SeedError, seeder::SeedBatch};

/// The services lists shipped with the seeder, keyed by locale tag.
const BUNDLED_SERVICES: &str = include_str!("../data/services_list.json");

/// A single service: its display label and its weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub key: String,
    pub value: i64,
}

impl ServiceItem {
    pub fn new(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// The body of one services list document. Item order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicesList {
    pub items: Vec<ServiceItem>,
}

/// The bundled `en` and `he` services lists.
pub fn bundled() -> Result<SeedBatch<ServicesList>, SeedError> {
    from_json_str(BUNDLED_SERVICES)
}

/// Services lists keyed by locale, in the order they appear in the data.
struct ServicesByLocale(SeedBatch<ServicesList>);

impl<'de> Deserialize<'de> for ServicesByLocale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LocaleVisitor;

        impl<'de> Visitor<'de> for LocaleVisitor {
            type Value = ServicesByLocale;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a mapping of locale to services list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut batch = SeedBatch::new();
                while let Some((locale, list)) = map.next_entry::<String, ServicesList>()? {
                    batch.insert(locale, list).map_err(de::Error::custom)?;
                }
                Ok(ServicesByLocale(batch))
            }
        }

        deserializer.deserialize_map(LocaleVisitor)
    }
}

/// Parses services lists from a JSON object mapping locale tags to
/// `{ "items": [...] }` bodies. Documents keep the order of the file, and a
/// locale that appears twice is an error.
pub fn from_json_str(json: &str) -> Result<SeedBatch<ServicesList>, SeedError> {
    let ServicesByLocale(batch) = serde_json::from_str(json)
        .context("Services data is not a mapping of locale to services list")
        .map_err(SeedError::Data)?;

    Ok(batch)
}

pub fn from_file(path: impl AsRef<Path>) -> Result<SeedBatch<ServicesList>, SeedError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read services data file '{}'", path.display()))
        .map_err(SeedError::Data)?;

    from_json_str(&json)
}
