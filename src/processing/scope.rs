//! Address scope classification.
//!
//! Scope flags come from a table of well-known reserved ranges. The built-in
//! table is embedded JSON; a replacement can be loaded at runtime.

use crate::error::Error;
use crate::models::{Family, Network};
use itertools::Itertools;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

const BUILTIN_SCOPE_TABLE: &str = include_str!("scope_ranges.json");

lazy_static! {
    static ref BUILTIN: ScopeTable =
        ScopeTable::from_json(BUILTIN_SCOPE_TABLE).expect("Invalid built-in scope table?");
}

/// A registry classification tag. Ordering is display order.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeFlag {
    #[serde(rename = "MCAST")]
    Multicast,
    Private,
    Global,
    Unspecified,
    Reserved,
    Loopback,
    LinkLocal,
}

impl ScopeFlag {
    pub fn name(self) -> &'static str {
        match self {
            ScopeFlag::Multicast => "MCAST",
            ScopeFlag::Private => "PRIVATE",
            ScopeFlag::Global => "GLOBAL",
            ScopeFlag::Unspecified => "UNSPECIFIED",
            ScopeFlag::Reserved => "RESERVED",
            ScopeFlag::Loopback => "LOOPBACK",
            ScopeFlag::LinkLocal => "LINK_LOCAL",
        }
    }
}

impl fmt::Display for ScopeFlag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of flags describing one network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScopeFlags(BTreeSet<ScopeFlag>);

impl ScopeFlags {
    pub fn contains(&self, flag: ScopeFlag) -> bool {
        self.0.contains(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ScopeFlag> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for ScopeFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

/// One row of the scope table.
///
/// With `assign: false` the row removes `flag` for addresses inside `cidr`,
/// carving an exception out of a wider range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeRange {
    pub cidr: Network,
    pub flag: ScopeFlag,
    #[serde(default = "default_assign")]
    pub assign: bool,
    #[serde(default)]
    pub source: Option<String>,
}

fn default_assign() -> bool {
    true
}

/// Ordered list of reserved ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeTable {
    pub ranges: Vec<ScopeRange>,
}

impl ScopeTable {
    /// The table shipped with the crate.
    pub fn builtin() -> &'static ScopeTable {
        &BUILTIN
    }

    /// Parse a table from JSON, reporting the path of the offending field.
    pub fn from_json(json: &str) -> Result<ScopeTable, Error> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
            Error::Config(format!(
                "Error parsing scope table: path={} error={}",
                e.path(),
                e.inner()
            ))
        })
    }

    /// Read a table from a JSON file.
    pub fn load(path: &Path) -> Result<ScopeTable, Error> {
        log::info!("Reading scope table from {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Error reading scope table {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&json)
    }

    /// How the rows of `flag` judge one address: `None` when no row covers
    /// it, `Some(false)` when an exception row does, else `Some(true)`.
    fn judge(&self, flag: ScopeFlag, family: Family, address: u128) -> Option<bool> {
        let mut verdict = None;
        for range in self
            .ranges
            .iter()
            .filter(|r| r.flag == flag && r.cidr.contains_address(family, address))
        {
            if !range.assign {
                return Some(false);
            }
            verdict = Some(true);
        }
        verdict
    }

    /// Classify a network.
    ///
    /// The network address and the broadcast address are judged separately;
    /// a flag is set when both carry it. A network may therefore span
    /// several adjacent rows of the same flag. GLOBAL, unless both ends are
    /// decided by GLOBAL rows, is the absence of PRIVATE.
    pub fn classify(&self, network: &Network) -> ScopeFlags {
        let family = network.family();
        let ends = [network.base_address(), network.broadcast_address()];
        let verdicts = |flag| ends.map(|address| self.judge(flag, family, address));

        let mut flags: BTreeSet<ScopeFlag> = self
            .ranges
            .iter()
            .map(|r| r.flag)
            .filter(|flag| *flag != ScopeFlag::Global)
            .unique()
            .filter(|flag| verdicts(*flag) == [Some(true); 2])
            .collect();

        let global = match verdicts(ScopeFlag::Global) {
            [Some(true), Some(true)] => true,
            [Some(false), Some(false)] => false,
            _ => !flags.contains(&ScopeFlag::Private),
        };
        if global {
            flags.insert(ScopeFlag::Global);
        }

        log::trace!("classify({network}) = {flags:?}");
        ScopeFlags(flags)
    }
}
