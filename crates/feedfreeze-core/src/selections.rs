//! Resolver output: the `<selections>` document produced by `0install select --xml`.

use std::path::Path;

use feedfreeze_util::errors::FreezeError;

use crate::xml::{Document, Element};

/// Prefix of `from-feed` values for packages provided by the host distribution.
pub const DISTRIBUTION_PREFIX: &str = "distribution:";

/// One resolved component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub interface: String,
    pub from_feed: Option<String>,
    pub version: String,
    pub id: Option<String>,
    pub package: Option<String>,
}

impl Selection {
    fn from_element(el: &Element) -> Result<Self, FreezeError> {
        let owned = |key: &str| el.attr(key).filter(|v| !v.is_empty()).map(str::to_string);

        let interface = owned("interface").ok_or_else(|| FreezeError::Xml {
            message: "<selection> without an interface attribute".to_string(),
        })?;
        let version = owned("version").ok_or_else(|| FreezeError::Xml {
            message: format!("selection for {interface} has no version"),
        })?;

        Ok(Self {
            from_feed: owned("from-feed"),
            id: owned("id"),
            package: owned("package"),
            interface,
            version,
        })
    }

    /// The feed this selection was taken from.
    pub fn feed_url(&self) -> &str {
        self.from_feed.as_deref().unwrap_or(&self.interface)
    }

    /// Whether the host's package manager provides this selection.
    pub fn is_distribution(&self) -> bool {
        self.package.is_some()
            || self.feed_url().starts_with(DISTRIBUTION_PREFIX)
            || self.id.as_deref().is_some_and(|id| id.starts_with("package:"))
    }

    /// Whether the selection comes from a feed on the local filesystem.
    pub fn is_local_feed(&self) -> bool {
        !self.is_distribution() && Path::new(self.feed_url()).is_absolute()
    }

    /// A human-readable name for log messages about distribution packages.
    pub fn package_name(&self) -> &str {
        self.package
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or(&self.interface)
    }
}

/// A complete resolution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selections {
    /// The interface that was resolved.
    pub interface: String,
    /// The command the resolution was made for, if any.
    pub command: Option<String>,
    pub selections: Vec<Selection>,
}

impl Selections {
    pub fn parse(xml: &str) -> Result<Self, FreezeError> {
        let doc = Document::parse(xml)?;
        let root = &doc.root;
        if root.name != "selections" {
            return Err(FreezeError::Xml {
                message: format!("expected <selections>, found <{}>", root.name),
            });
        }
        let interface = root
            .attr("interface")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| FreezeError::Xml {
                message: "<selections> without an interface attribute".to_string(),
            })?
            .to_string();

        let selections = root
            .child_elements()
            .filter(|e| e.name == "selection")
            .map(Selection::from_element)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            interface,
            command: root.attr("command").map(str::to_string),
            selections,
        })
    }

    /// The selection for the resolved interface itself.
    pub fn root_selection(&self) -> Result<&Selection, FreezeError> {
        let mut matches = self
            .selections
            .iter()
            .filter(|s| s.interface == self.interface);
        match (matches.next(), matches.count()) {
            (Some(sel), 0) => Ok(sel),
            (first, rest) => Err(FreezeError::Lookup {
                what: format!("selection with interface={}", self.interface),
                count: usize::from(first.is_some()) + rest,
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.selections.iter()
    }
}
