//! Persistent, version-gated schema cache
//!
//! Querying gpac is the expensive step of a completion request (each query
//! is a process spawn), so everything learned from it is kept in a JSON file
//! tagged with the tool's version string. The rules:
//!
//! - the snapshot is valid only while its version equals the live version;
//!   on mismatch *every* subfield is dropped, not just the one asked for
//! - subfields are filled one at a time, on first use
//! - the whole file is rewritten after each fill
//! - an unreadable or corrupt file is the same as no file

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::adapter::ToolAdapter;
use super::wire;
use super::{ArgType, ArgumentDetail, ArgumentSpec, EnumShorthand, Protocol, SchemaProvider};
use crate::error::Result;

/// On-disk record: the tool version and everything cached for it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: Option<String>,
    #[serde(default)]
    pub cache: SchemaData,
}

/// Cached subfields; absent entries have simply not been asked for yet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", with = "wire::args")]
    pub args: BTreeMap<String, Vec<ArgumentSpec>>,

    /// Keyed by `filter.arg`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_arg_filter: BTreeMap<String, ArgumentDetail>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire::protocols")]
    pub protocols: Option<Vec<Protocol>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", with = "wire::enum_values")]
    pub enum_values: BTreeMap<String, Vec<EnumShorthand>>,
}

impl Snapshot {
    /// Read a snapshot from disk; any failure is reported as `None`
    pub fn load(path: &Path) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("no usable schema cache at {}: {e}", path.display());
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("discarding corrupt schema cache {}: {e}", path.display());
                None
            }
        }
    }

    /// Write the snapshot to disk, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Lazily populated schema backed by a [`ToolAdapter`]
pub struct SchemaCache {
    /// Where the snapshot is persisted; `None` keeps it in memory only
    path: Option<PathBuf>,
    snapshot: Snapshot,
    adapter: Box<dyn ToolAdapter>,
    /// Live tool version, asked for once per cache instance
    live_version: Option<Option<String>>,
}

impl SchemaCache {
    /// Open the cache file at `path`.
    ///
    /// A missing or corrupt file is replaced by an empty snapshot stamped
    /// with the live version, which is written out immediately.
    pub fn open(path: impl Into<PathBuf>, adapter: Box<dyn ToolAdapter>) -> Result<Self> {
        let path = path.into();

        if let Some(snapshot) = Snapshot::load(&path) {
            return Ok(Self {
                path: Some(path),
                snapshot,
                adapter,
                live_version: None,
            });
        }

        let version = adapter.version()?;
        let cache = Self {
            path: Some(path),
            snapshot: Snapshot {
                version: version.clone(),
                cache: SchemaData::default(),
            },
            adapter,
            live_version: Some(version),
        };
        cache.persist();
        Ok(cache)
    }

    /// A cache that never touches the disk
    pub fn in_memory(adapter: Box<dyn ToolAdapter>) -> Self {
        Self {
            path: None,
            snapshot: Snapshot::default(),
            adapter,
            live_version: None,
        }
    }

    /// Current snapshot, as it would be written to disk
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Drop everything cached if the snapshot does not match the live tool
    fn ensure_current(&mut self) -> Result<()> {
        let live = match &self.live_version {
            Some(version) => version.clone(),
            None => {
                let version = self.adapter.version()?;
                self.live_version = Some(version.clone());
                version
            }
        };

        if self.snapshot.version != live {
            debug!(
                "schema cache version {:?} does not match tool version {:?}, resetting",
                self.snapshot.version, live
            );
            self.snapshot = Snapshot {
                version: live,
                cache: SchemaData::default(),
            };
        }
        Ok(())
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = self.snapshot.save(path) {
            warn!("failed to write schema cache {}: {e}", path.display());
        }
    }

    /// Return the value in `slot`, fetching and persisting it on first use
    fn memoize<T, S, F>(&mut self, slot: S, fetch: F) -> Result<T>
    where
        T: Clone,
        S: Fn(&mut SchemaData) -> &mut Option<T>,
        F: FnOnce(&dyn ToolAdapter) -> Result<T>,
    {
        self.ensure_current()?;
        if let Some(value) = slot(&mut self.snapshot.cache) {
            return Ok(value.clone());
        }

        let value = fetch(self.adapter.as_ref())?;
        *slot(&mut self.snapshot.cache) = Some(value.clone());
        self.persist();
        Ok(value)
    }

    /// Derive the unambiguous enum literals of `filter`.
    ///
    /// A literal listed under two different enum arguments is dropped
    /// entirely, and a literal spelled like one of the filter's arguments is
    /// never used.
    fn derive_shorthands(&mut self, filter: &str) -> Result<Vec<EnumShorthand>> {
        let args = self.filter_args(filter)?;
        let mut shorthands: Vec<EnumShorthand> = Vec::new();
        let mut ambiguous: HashSet<String> = HashSet::new();

        for spec in args.iter().filter(|a| a.kind == ArgType::Enum) {
            let detail = self.argument(filter, &spec.name)?;
            for value in detail.values {
                if ambiguous.contains(&value) {
                    continue;
                }
                match shorthands.iter().position(|s| s.value == value) {
                    Some(pos) if shorthands[pos].argument != spec.name => {
                        shorthands.remove(pos);
                        ambiguous.insert(value);
                    }
                    Some(_) => {}
                    None if args.iter().any(|a| a.name == value) => {}
                    None => shorthands.push(EnumShorthand {
                        value,
                        argument: spec.name.clone(),
                    }),
                }
            }
        }

        Ok(shorthands)
    }
}

impl SchemaProvider for SchemaCache {
    fn filters(&mut self) -> Result<Vec<String>> {
        self.memoize(|data| &mut data.filters, |tool| tool.filters())
    }

    fn modules(&mut self) -> Result<Vec<String>> {
        self.memoize(|data| &mut data.modules, |tool| tool.modules())
    }

    fn props(&mut self) -> Result<Vec<String>> {
        self.memoize(|data| &mut data.props, |tool| tool.props())
    }

    fn protocols(&mut self) -> Result<Vec<Protocol>> {
        self.memoize(|data| &mut data.protocols, |tool| tool.protocols())
    }

    fn filter_args(&mut self, filter: &str) -> Result<Vec<ArgumentSpec>> {
        self.ensure_current()?;
        if let Some(args) = self.snapshot.cache.args.get(filter) {
            return Ok(args.clone());
        }

        let args = self.adapter.filter_args(filter)?;
        self.snapshot
            .cache
            .args
            .insert(filter.to_string(), args.clone());
        self.persist();
        Ok(args)
    }

    fn argument(&mut self, filter: &str, arg: &str) -> Result<ArgumentDetail> {
        self.ensure_current()?;
        let key = format!("{filter}.{arg}");
        if let Some(detail) = self.snapshot.cache.type_arg_filter.get(&key) {
            return Ok(detail.clone());
        }

        // The argument listing already carries the type; only enum values
        // need a dedicated query.
        let declared = self
            .filter_args(filter)?
            .into_iter()
            .find(|spec| spec.name == arg)
            .map(|spec| spec.kind);

        // Enums, and arguments the listing does not declare, are asked for.
        let detail = match declared {
            Some(kind) if kind != ArgType::Enum => ArgumentDetail::new(kind, Vec::new()),
            _ => self.adapter.argument(filter, arg)?,
        };

        self.snapshot
            .cache
            .type_arg_filter
            .insert(key, detail.clone());
        self.persist();
        Ok(detail)
    }

    fn enum_shorthands(&mut self, filter: &str) -> Result<Vec<EnumShorthand>> {
        self.ensure_current()?;
        if let Some(shorthands) = self.snapshot.cache.enum_values.get(filter) {
            return Ok(shorthands.clone());
        }

        let shorthands = self.derive_shorthands(filter)?;
        self.snapshot
            .cache
            .enum_values
            .insert(filter.to_string(), shorthands.clone());
        self.persist();
        Ok(shorthands)
    }
}
