//! Schema of the target tool
//!
//! Typed records describing what gpac knows about: filters, their arguments
//! and argument types, enumerated values, protocols and global properties.
//! The [`SchemaCache`] keeps a version-stamped snapshot of these records on
//! disk and fills it lazily through a [`ToolAdapter`].

mod adapter;
mod cache;
mod scrape;
mod wire;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use adapter::{GpacBinary, ToolAdapter};
pub use cache::{SchemaCache, Snapshot};

/// Primitive type tag of a filter argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArgType {
    Bool,
    Sint,
    Uint,
    Lsint,
    Luint,
    Flt,
    Dbl,
    Frac,
    Lfrac,
    Str,
    Cstr,
    Strl,
    Uintl,
    Sintl,
    FourCc,
    FourCcList,
    Vec2d,
    Vec2i,
    Vec3i,
    Vec4i,
    Enum,
    /// A tag this crate does not know about, kept verbatim
    Other(String),
}

impl ArgType {
    /// Parse a type tag as printed by the tool
    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "bool" => ArgType::Bool,
            "sint" => ArgType::Sint,
            "uint" => ArgType::Uint,
            "lsint" => ArgType::Lsint,
            "luint" => ArgType::Luint,
            "flt" => ArgType::Flt,
            "dbl" => ArgType::Dbl,
            "frac" => ArgType::Frac,
            "lfrac" => ArgType::Lfrac,
            "str" => ArgType::Str,
            "cstr" => ArgType::Cstr,
            "strl" => ArgType::Strl,
            "uintl" => ArgType::Uintl,
            "sintl" => ArgType::Sintl,
            "4cc" => ArgType::FourCc,
            "4ccl" => ArgType::FourCcList,
            "v2d" => ArgType::Vec2d,
            "v2di" => ArgType::Vec2i,
            "v3di" => ArgType::Vec3i,
            "v4di" => ArgType::Vec4i,
            "enum" => ArgType::Enum,
            other => ArgType::Other(other.to_string()),
        }
    }

    /// The tag as printed by the tool
    pub fn as_str(&self) -> &str {
        match self {
            ArgType::Bool => "bool",
            ArgType::Sint => "sint",
            ArgType::Uint => "uint",
            ArgType::Lsint => "lsint",
            ArgType::Luint => "luint",
            ArgType::Flt => "flt",
            ArgType::Dbl => "dbl",
            ArgType::Frac => "frac",
            ArgType::Lfrac => "lfrac",
            ArgType::Str => "str",
            ArgType::Cstr => "cstr",
            ArgType::Strl => "strl",
            ArgType::Uintl => "uintl",
            ArgType::Sintl => "sintl",
            ArgType::FourCc => "4cc",
            ArgType::FourCcList => "4ccl",
            ArgType::Vec2d => "v2d",
            ArgType::Vec2i => "v2di",
            ArgType::Vec3i => "v3di",
            ArgType::Vec4i => "v4di",
            ArgType::Enum => "enum",
            ArgType::Other(tag) => tag,
        }
    }
}

impl From<String> for ArgType {
    fn from(tag: String) -> Self {
        ArgType::parse(&tag)
    }
}

impl From<ArgType> for String {
    fn from(kind: ArgType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One argument of a filter, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: String,
    pub kind: ArgType,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>, kind: ArgType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Resolved type of a `filter.arg` pair; `values` is only filled for enums
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDetail {
    #[serde(rename = "type")]
    pub kind: Option<ArgType>,
    #[serde(default)]
    pub values: Vec<String>,
}

impl ArgumentDetail {
    pub fn new(kind: ArgType, values: Vec<String>) -> Self {
        Self {
            kind: Some(kind),
            values,
        }
    }

    /// Detail of an argument the tool could not describe
    pub fn unknown() -> Self {
        Self {
            kind: None,
            values: Vec::new(),
        }
    }
}

/// A bare enum literal usable in place of `argument=literal`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumShorthand {
    pub value: String,
    pub argument: String,
}

/// A URL scheme and the filters able to read or write it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protocol {
    pub name: String,
    pub input: Vec<String>,
    pub output: Vec<String>,
}

impl Protocol {
    pub fn can_read(&self) -> bool {
        !self.input.is_empty()
    }

    pub fn can_write(&self) -> bool {
        !self.output.is_empty()
    }
}

/// Schema accessors used by the completion engine.
///
/// Every accessor may hit the external tool, so every accessor is fallible;
/// `&mut self` lets implementations memoize what they fetched.
pub trait SchemaProvider {
    /// All filter names
    fn filters(&mut self) -> crate::Result<Vec<String>>;

    /// All module identifiers
    fn modules(&mut self) -> crate::Result<Vec<String>>;

    /// Global property names usable as `#Prop`
    fn props(&mut self) -> crate::Result<Vec<String>>;

    /// Arguments of a filter, in declaration order
    fn filter_args(&mut self, filter: &str) -> crate::Result<Vec<ArgumentSpec>>;

    /// Type (and enum values) of one argument
    fn argument(&mut self, filter: &str, arg: &str) -> crate::Result<ArgumentDetail>;

    /// Unambiguous enum literals of a filter, mapped to their owning argument
    fn enum_shorthands(&mut self, filter: &str) -> crate::Result<Vec<EnumShorthand>>;

    /// All protocols with their input and output filters
    fn protocols(&mut self) -> crate::Result<Vec<Protocol>>;
}
