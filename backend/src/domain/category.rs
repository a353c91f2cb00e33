//! Resource collection naming.
//!
//! The generic collection is always called [`NOTES_COLLECTION`]; category
//! collections are `ac_<Category>` with the remote category used verbatim.

use std::fmt;

/// Name of the generic notes collection.
pub const NOTES_COLLECTION: &str = "notes";

/// Prefix shared by every category collection.
pub const CATEGORY_COLLECTION_PREFIX: &str = "ac_";

/// Categories the remote taxonomy is known to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownCategory {
    Unknown,
    Anchorage,
    Hazard,
    Marina,
    LocalKnowledge,
    Navigational,
    BoatRamp,
    Business,
    Inlet,
    Bridge,
    Lock,
    Dam,
    Ferry,
    Airport,
}

impl KnownCategory {
    /// Every known category, in registration order.
    pub const ALL: [Self; 14] = [
        Self::Unknown,
        Self::Anchorage,
        Self::Hazard,
        Self::Marina,
        Self::LocalKnowledge,
        Self::Navigational,
        Self::BoatRamp,
        Self::Business,
        Self::Inlet,
        Self::Bridge,
        Self::Lock,
        Self::Dam,
        Self::Ferry,
        Self::Airport,
    ];

    /// Category string as the remote service spells it.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Anchorage => "Anchorage",
            Self::Hazard => "Hazard",
            Self::Marina => "Marina",
            Self::LocalKnowledge => "LocalKnowledge",
            Self::Navigational => "Navigational",
            Self::BoatRamp => "BoatRamp",
            Self::Business => "Business",
            Self::Inlet => "Inlet",
            Self::Bridge => "Bridge",
            Self::Lock => "Lock",
            Self::Dam => "Dam",
            Self::Ferry => "Ferry",
            Self::Airport => "Airport",
        }
    }

    /// Collection name for this category.
    pub fn collection_name(self) -> String {
        category_collection_name(self.as_str())
    }
}

impl fmt::Display for KnownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collection name for a raw category. The category is not normalised.
///
/// ```
/// use poi_sync::domain::category::category_collection_name;
///
/// assert_eq!(category_collection_name("Marina"), "ac_Marina");
/// assert_eq!(category_collection_name("marina"), "ac_marina");
/// ```
pub fn category_collection_name(category: &str) -> String {
    format!("{CATEGORY_COLLECTION_PREFIX}{category}")
}
