//! Build environment components and the `--filter` set.

use anyhow::{bail, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Default value of `--filter`.
pub const DEFAULT_FILTER: &str = "svaluer,jtl";

/// A buildable part of the problem build environment.
///
/// Variant order is build order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    /// Standalone valuer binary, built with cargo.
    Svaluer,
    /// Judge testlib, built and installed with CMake.
    Jtl,
}

impl Component {
    pub fn name(self) -> &'static str {
        match self {
            Component::Svaluer => "svaluer",
            Component::Jtl => "jtl",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Component {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "svaluer" => Ok(Component::Svaluer),
            "jtl" => Ok(Component::Jtl),
            other => bail!("unknown component '{}'", other),
        }
    }
}

/// Set of components selected with `--filter`.
///
/// Names that are not components are remembered so they can be reported, but
/// they never select anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentFilter {
    selected: BTreeSet<Component>,
    unknown: Vec<String>,
}

impl ComponentFilter {
    /// Parse a comma-separated component list. Whitespace around names and
    /// empty entries are ignored.
    pub fn parse(spec: &str) -> Self {
        let mut filter = Self::default();
        for name in spec.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match name.parse::<Component>() {
                Ok(component) => {
                    filter.selected.insert(component);
                }
                Err(_) => filter.unknown.push(name.to_string()),
            }
        }
        filter
    }

    pub fn contains(&self, component: Component) -> bool {
        self.selected.contains(&component)
    }

    /// Selected components in build order.
    pub fn components(&self) -> impl Iterator<Item = Component> + '_ {
        self.selected.iter().copied()
    }

    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl fmt::Display for ComponentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.components().map(Component::name).collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for ComponentFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
