//! JSON layout of the cache file
//!
//! Subfields keyed by name are written as JSON objects, entries in the order
//! gpac listed them:
//!
//! ```text
//! "args":        { "inspect": { "deep": "bool", "mode": "enum" } }
//! "protocols":   { "http": { "input": ["httpin"], "output": ["httpout"] } }
//! "enum_values": { "inspect": { "raw": "mode" } }
//! ```
//!
//! The in-memory records stay typed; the functions here are plugged into
//! [`SchemaData`](super::cache::SchemaData) with `#[serde(with = ...)]`.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{ArgType, ArgumentSpec, EnumShorthand, Protocol};

/// JSON object whose entry order survives a read and a write
struct Ordered<V>(Vec<(String, V)>);

impl<V: Serialize> Serialize for Ordered<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, value)| (key, value)))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Ordered<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = Ordered<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(Ordered(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

/// `filter -> { arg: type }`
pub(super) mod args {
    use super::*;

    pub fn serialize<S: Serializer>(
        args: &BTreeMap<String, Vec<ArgumentSpec>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(args.iter().map(|(filter, specs)| {
            let entries = specs
                .iter()
                .map(|spec| (spec.name.clone(), spec.kind.clone()))
                .collect();
            (filter, Ordered(entries))
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Vec<ArgumentSpec>>, D::Error> {
        let raw = BTreeMap::<String, Ordered<ArgType>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(filter, Ordered(entries))| {
                let specs = entries
                    .into_iter()
                    .map(|(name, kind)| ArgumentSpec { name, kind })
                    .collect();
                (filter, specs)
            })
            .collect())
    }
}

#[derive(Serialize, Deserialize)]
struct Directions {
    #[serde(default)]
    input: Vec<String>,
    #[serde(default)]
    output: Vec<String>,
}

/// `scheme -> { input: [...], output: [...] }`
pub(super) mod protocols {
    use super::*;

    pub fn serialize<S: Serializer>(
        protocols: &Option<Vec<Protocol>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let Some(protocols) = protocols else {
            return serializer.serialize_none();
        };
        let entries = protocols
            .iter()
            .map(|p| {
                let directions = Directions {
                    input: p.input.clone(),
                    output: p.output.clone(),
                };
                (p.name.clone(), directions)
            })
            .collect();
        Ordered(entries).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<Protocol>>, D::Error> {
        let Ordered(entries) = Ordered::<Directions>::deserialize(deserializer)?;
        Ok(Some(
            entries
                .into_iter()
                .map(|(name, d)| Protocol {
                    name,
                    input: d.input,
                    output: d.output,
                })
                .collect(),
        ))
    }
}

/// `filter -> { literal: arg }`
pub(super) mod enum_values {
    use super::*;

    pub fn serialize<S: Serializer>(
        values: &BTreeMap<String, Vec<EnumShorthand>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(values.iter().map(|(filter, shorthands)| {
            let entries = shorthands
                .iter()
                .map(|s| (s.value.clone(), s.argument.clone()))
                .collect();
            (filter, Ordered(entries))
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Vec<EnumShorthand>>, D::Error> {
        let raw = BTreeMap::<String, Ordered<String>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(filter, Ordered(entries))| {
                let shorthands = entries
                    .into_iter()
                    .map(|(value, argument)| EnumShorthand { value, argument })
                    .collect();
                (filter, shorthands)
            })
            .collect())
    }
}
