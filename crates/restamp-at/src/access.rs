//! Access levels, finality changes, and the transforms that combine them.

use std::fmt;

/// Java visibility levels, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessLevel {
    /// The `private` keyword.
    Private,
    /// No visibility keyword at all.
    PackagePrivate,
    /// The `protected` keyword.
    Protected,
    /// The `public` keyword.
    Public,
}

impl AccessLevel {
    /// Returns the keyword spelling this level, or `None` for package-private.
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Private => Some("private"),
            Self::PackagePrivate => None,
            Self::Protected => Some("protected"),
            Self::Public => Some("public"),
        }
    }

    /// Maps a Java visibility keyword onto its level.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "private" => Some(Self::Private),
            "protected" => Some(Self::Protected),
            "public" => Some(Self::Public),
            _ => None,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("default"))
    }
}

/// Requested change to the `final` modifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FinalityChange {
    /// Leave `final` as it is.
    #[default]
    NoChange,
    /// Ensure `final` is present.
    Add,
    /// Ensure `final` is absent.
    Remove,
}

/// Target visibility plus finality change for one declaration.
///
/// An access of `None` leaves visibility untouched. The empty transform (no
/// access change, no finality change) doubles as the "consumed" marker inside
/// the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AccessTransform {
    access: Option<AccessLevel>,
    finality: FinalityChange,
}

impl AccessTransform {
    /// The transform that changes nothing.
    pub const EMPTY: Self = Self::new(None, FinalityChange::NoChange);

    /// Creates a transform from its two components.
    #[must_use]
    pub const fn new(access: Option<AccessLevel>, finality: FinalityChange) -> Self {
        Self { access, finality }
    }

    /// Creates a transform that only changes visibility.
    #[must_use]
    pub const fn access_only(access: AccessLevel) -> Self {
        Self::new(Some(access), FinalityChange::NoChange)
    }

    /// Creates a transform that only changes finality.
    #[must_use]
    pub const fn finality_only(finality: FinalityChange) -> Self {
        Self::new(None, finality)
    }

    /// Returns the requested visibility, if any.
    #[must_use]
    pub const fn access(self) -> Option<AccessLevel> {
        self.access
    }

    /// Returns the requested finality change.
    #[must_use]
    pub const fn finality(self) -> FinalityChange {
        self.finality
    }

    /// Returns true when the transform requests no change at all.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.access.is_none() && matches!(self.finality, FinalityChange::NoChange)
    }

    /// Combines two transforms addressing the same declaration.
    ///
    /// No-op components act as identities. Conflicting visibilities resolve
    /// to the wider level and conflicting finality changes resolve to
    /// [`FinalityChange::Remove`], so merging only ever relaxes access.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let access = match (self.access, other.access) {
            (None, level) | (level, None) => level,
            (Some(left), Some(right)) => Some(left.max(right)),
        };
        let finality = match (self.finality, other.finality) {
            (FinalityChange::NoChange, change) | (change, FinalityChange::NoChange) => change,
            (left, right) if left == right => left,
            _ => FinalityChange::Remove,
        };
        Self::new(access, finality)
    }
}

impl fmt::Display for AccessTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(access) = self.access {
            write!(f, "{access}")?;
        } else if self.is_empty() {
            f.write_str("unchanged")?;
        }
        match self.finality {
            FinalityChange::NoChange => Ok(()),
            FinalityChange::Add => f.write_str("+f"),
            FinalityChange::Remove => f.write_str("-f"),
        }
    }
}
