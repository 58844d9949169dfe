//! Response models
//!
//! Request-scoped view objects. Field names are the wire names served to
//! clients; none of these types outlive a single response.

use serde::{Deserialize, Serialize};

/// A single Bible verse with the references that point at it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub reference: String,
    pub text: String,
    /// Always present; empty when nothing is related
    #[serde(default)]
    pub related: Vec<String>,
}

/// The primary verse row, before related references are attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRow {
    pub reference: String,
    pub text: String,
}

impl VerseRow {
    /// Combine with the related references into the served verse
    pub fn with_related(self, related: Vec<String>) -> Verse {
        Verse {
            reference: self.reference,
            text: self.text,
            related,
        }
    }
}

/// A county with its AHCB identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct County {
    pub county_ahcb: String,
    #[serde(rename = "name")]
    pub county: String,
}

/// A populated place with its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub place_id: i32,
    pub place: String,
}

/// Full detail for a single populated place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceDetail {
    pub place_id: i32,
    pub place: String,
    pub county: String,
    pub county_ahcb: String,
    pub state: String,
}

impl PlaceDetail {
    /// The list-row view of this place
    pub fn summary(&self) -> Place {
        Place {
            place_id: self.place_id,
            place: self.place.clone(),
        }
    }
}
