//! In-memory stand-in for the gpac binary, with per-query call counters

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{ArgType, ArgumentDetail, ArgumentSpec, Protocol, ToolAdapter};
use crate::error::{AdapterError, Result};

#[derive(Clone)]
pub(crate) struct FakeGpac {
    version: Option<String>,
    filters: Vec<(String, Vec<ArgumentSpec>)>,
    enums: HashMap<(String, String), Vec<String>>,
    protocols: Vec<Protocol>,
    props: Vec<String>,
    modules: Vec<String>,
    failing: bool,
    calls: Rc<RefCell<HashMap<&'static str, usize>>>,
}

fn args(list: &[(&str, ArgType)]) -> Vec<ArgumentSpec> {
    list.iter()
        .map(|(name, kind)| ArgumentSpec::new(*name, kind.clone()))
        .collect()
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn protocol(name: &str, input: &[&str], output: &[&str]) -> Protocol {
    Protocol {
        name: name.to_string(),
        input: strings(input),
        output: strings(output),
    }
}

impl FakeGpac {
    /// A small gpac with a handful of realistic filters
    pub(crate) fn sample() -> Self {
        use ArgType::*;

        let filters = vec![
            (
                "inspect".to_string(),
                args(&[
                    ("log", Str),
                    ("mode", Enum),
                    ("interleave", Bool),
                    ("deep", Bool),
                    ("fmt", Str),
                    ("hdr", Bool),
                    ("allp", Bool),
                    ("full", Bool),
                    ("speed", Dbl),
                    ("dur", Frac),
                    ("analyze", Enum),
                    ("test", Enum),
                ]),
            ),
            (
                "routein".to_string(),
                args(&[
                    ("src", Str),
                    ("ifce", Str),
                    ("repair", Enum),
                    ("repair_urls", Strl),
                    ("max_segs", Uint),
                ]),
            ),
            ("fin".to_string(), args(&[("src", Str), ("block_size", Uint)])),
            ("fout".to_string(), args(&[("dst", Str), ("append", Bool)])),
            ("httpin".to_string(), Vec::new()),
            ("httpout".to_string(), args(&[("port", Uint), ("rdirs", Strl)])),
            ("jsf".to_string(), args(&[("js", Cstr)])),
            ("reframer".to_string(), args(&[("exporter", Bool), ("rt", Enum)])),
        ];

        let enums = [
            (("inspect", "mode"), &["raw", "pck", "frame", "blk"][..]),
            (("inspect", "analyze"), &["no", "on", "bs", "full"][..]),
            (
                ("inspect", "test"),
                &["no", "noprop", "network", "netx", "encode", "encx", "nocrc"][..],
            ),
            (("routein", "repair"), &["no", "simple", "strict", "full"][..]),
            (("reframer", "rt"), &["off", "on", "sync"][..]),
        ]
        .into_iter()
        .map(|((f, a), values)| ((f.to_string(), a.to_string()), strings(values)))
        .collect();

        Self {
            version: Some("2.4.0".to_string()),
            filters,
            enums,
            protocols: vec![
                protocol("http", &["httpin"], &["httpout"]),
                protocol("https", &["httpin"], &["httpout"]),
                protocol("rtsp", &["rtpin"], &[]),
                protocol("route", &["routein"], &["routeout"]),
                protocol("gfio", &["fin"], &["fout"]),
                protocol("pipe", &["pipein"], &["pipeout"]),
                protocol("rtp", &["rtpin"], &["rtpout"]),
            ],
            props: strings(&["DataRef", "DashMode", "Bitrate", "ID"]),
            modules: strings(&["gm_alsa.so", "gm_x11_out.so", "validator"]),
            failing: false,
            calls: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Same tool reporting another version; call counters are shared
    pub(crate) fn with_version(&self, version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            ..self.clone()
        }
    }

    /// A tool whose every query exits with a failure status
    pub(crate) fn failing(self) -> Self {
        Self {
            failing: true,
            ..self
        }
    }

    pub(crate) fn filter_names(&self) -> Vec<String> {
        self.filters.iter().map(|(name, _)| name.clone()).collect()
    }

    pub(crate) fn calls(&self, query: &str) -> usize {
        self.calls.borrow().get(query).copied().unwrap_or(0)
    }

    fn record(&self, query: &'static str) -> Result<()> {
        *self.calls.borrow_mut().entry(query).or_insert(0) += 1;
        if self.failing {
            return Err(AdapterError::ExitStatus {
                command: format!("gpac {query}"),
                code: Some(1),
            }
            .into());
        }
        Ok(())
    }
}

impl ToolAdapter for FakeGpac {
    fn version(&self) -> Result<Option<String>> {
        self.record("version")?;
        Ok(self.version.clone())
    }

    fn filters(&self) -> Result<Vec<String>> {
        self.record("filters")?;
        Ok(self.filter_names())
    }

    fn modules(&self) -> Result<Vec<String>> {
        self.record("modules")?;
        Ok(self.modules.clone())
    }

    fn filter_args(&self, filter: &str) -> Result<Vec<ArgumentSpec>> {
        self.record("filter_args")?;
        Ok(self
            .filters
            .iter()
            .find(|(name, _)| name == filter)
            .map(|(_, args)| args.clone())
            .unwrap_or_default())
    }

    fn argument(&self, filter: &str, arg: &str) -> Result<ArgumentDetail> {
        self.record("argument")?;
        let declared = self
            .filters
            .iter()
            .find(|(name, _)| name == filter)
            .and_then(|(_, args)| args.iter().find(|a| a.name == arg));

        Ok(match declared {
            Some(spec) => {
                let values = self
                    .enums
                    .get(&(filter.to_string(), arg.to_string()))
                    .cloned()
                    .unwrap_or_default();
                ArgumentDetail::new(spec.kind.clone(), values)
            }
            None => ArgumentDetail::unknown(),
        })
    }

    fn protocols(&self) -> Result<Vec<Protocol>> {
        self.record("protocols")?;
        Ok(self.protocols.clone())
    }

    fn props(&self) -> Result<Vec<String>> {
        self.record("props")?;
        Ok(self.props.clone())
    }
}
