use std::fmt;

use serde::de::{Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A reference that is either the `"all"` sentinel or a concrete entity id.
///
/// Used in three places: a folder's owning company (`All` = shown under
/// every company), a card's folder membership, and the two active view
/// filters. Serialized as the plain string `"all"` or the raw id, which
/// is the wire form the persisted blob uses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    Id(String),
}

impl Scope {
    pub fn id(id: impl Into<String>) -> Self {
        Scope::Id(id.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Scope::All)
    }

    /// True when this scope admits the given entity id.
    pub fn matches(&self, id: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Id(s) => s == id,
        }
    }

    /// The concrete id, if any.
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Scope::All => None,
            Scope::Id(s) => Some(s.as_str()),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => f.write_str("all"),
            Scope::Id(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scope {
    fn from(s: &str) -> Self {
        if s == "all" {
            Scope::All
        } else {
            Scope::Id(s.to_string())
        }
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scope::All => serializer.serialize_str("all"),
            Scope::Id(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Err(D::Error::custom("empty scope id"));
        }
        Ok(Scope::from(s.as_str()))
    }
}

/// The active company + folder filter pair that defines the visible view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewFilter {
    pub company: Scope,
    pub folder: Scope,
}

impl ViewFilter {
    pub fn new(company: Scope, folder: Scope) -> Self {
        ViewFilter { company, folder }
    }
}

/// How the visible card sequence is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Pinned cards first, then ascending manual order.
    #[default]
    Default,
    /// By trimmed question text.
    Alphabetical,
    /// Fresh shuffle on every derivation.
    Random,
    /// By combined question + answer length, shortest first.
    Length,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Default,
        SortMode::Alphabetical,
        SortMode::Random,
        SortMode::Length,
    ];

    /// Manual reordering only makes sense when a stable manual order is
    /// what's on screen.
    pub fn allows_reorder(self) -> bool {
        self == SortMode::Default
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Default => "default",
            SortMode::Alphabetical => "alphabetical",
            SortMode::Random => "random",
            SortMode::Length => "length",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortMode::Default => SortMode::Alphabetical,
            SortMode::Alphabetical => SortMode::Random,
            SortMode::Random => SortMode::Length,
            SortMode::Length => SortMode::Default,
        }
    }
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(SortMode::Default),
            "alphabetical" => Ok(SortMode::Alphabetical),
            "random" => Ok(SortMode::Random),
            "length" => Ok(SortMode::Length),
            other => Err(format!("unknown sort mode: {}", other)),
        }
    }
}
