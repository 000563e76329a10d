//! Collection names and version counters

use std::fmt;

/// One of the three independently persisted collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Projects,
    Settings,
    TeamMembers,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Projects,
        Collection::Settings,
        Collection::TeamMembers,
    ];

    /// Storage key suffix, appended to the configured prefix
    pub fn key_suffix(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Settings => "settings",
            Self::TeamMembers => "team_members",
        }
    }

    /// Top-level field name in export/import snapshots
    pub fn snapshot_field(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Settings => "settings",
            Self::TeamMembers => "teamMembers",
        }
    }

    /// Full storage key for the collection data
    pub fn key(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.key_suffix())
    }

    /// Storage key holding the collection's version counter
    pub fn version_key(&self, prefix: &str) -> String {
        format!("{}.version", self.key(prefix))
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.snapshot_field())
    }
}

/// Write counter of a collection; 0 means never written
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version(pub u64);

impl Version {
    pub const INITIAL: Version = Version(0);

    pub fn next(self) -> Version {
        Version(self.0.saturating_add(1))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
