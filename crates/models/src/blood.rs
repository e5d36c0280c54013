//! Blood stock domain types shared by the API client, the synthetic
//! generator and the search flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ModelError;

/// The 8 ABO/Rh donor-compatibility categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APos,
    #[serde(rename = "A-")]
    ANeg,
    #[serde(rename = "B+")]
    BPos,
    #[serde(rename = "B-")]
    BNeg,
    #[serde(rename = "AB+")]
    AbPos,
    #[serde(rename = "AB-")]
    AbNeg,
    #[serde(rename = "O+")]
    OPos,
    #[serde(rename = "O-")]
    ONeg,
}

impl BloodType {
    /// Canonical wire order, matching the backend's `/blood-types` list.
    pub const ALL: [BloodType; 8] = [
        BloodType::APos,
        BloodType::ANeg,
        BloodType::BPos,
        BloodType::BNeg,
        BloodType::AbPos,
        BloodType::AbNeg,
        BloodType::OPos,
        BloodType::ONeg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APos => "A+",
            BloodType::ANeg => "A-",
            BloodType::BPos => "B+",
            BloodType::BNeg => "B-",
            BloodType::AbPos => "AB+",
            BloodType::AbNeg => "AB-",
            BloodType::OPos => "O+",
            BloodType::ONeg => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A+" => Ok(BloodType::APos),
            "A-" => Ok(BloodType::ANeg),
            "B+" => Ok(BloodType::BPos),
            "B-" => Ok(BloodType::BNeg),
            "AB+" => Ok(BloodType::AbPos),
            "AB-" => Ok(BloodType::AbNeg),
            "O+" => Ok(BloodType::OPos),
            "O-" => Ok(BloodType::ONeg),
            other => Err(ModelError::Parse(format!("unknown blood type: {other}"))),
        }
    }
}

/// Stock level for one blood type at one hospital.
///
/// Always derived from the unit count; never stored or transmitted as an
/// independent fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Critical,
    Low,
    Adequate,
}

impl StockStatus {
    /// `Critical` iff units <= 3, `Low` iff 4..=8, `Adequate` otherwise.
    pub fn from_units(units: u32) -> Self {
        match units {
            0..=3 => StockStatus::Critical,
            4..=8 => StockStatus::Low,
            _ => StockStatus::Adequate,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Critical => "Critical",
            StockStatus::Low => "Low",
            StockStatus::Adequate => "Adequate",
        }
    }
}

/// Units of one blood type available at a hospital.
#[derive(Debug, Clone, Serialize)]
pub struct BloodStockEntry {
    pub blood_type: BloodType,
    pub units_available: u32,
    pub status: StockStatus,
    pub last_updated: DateTime<Utc>,
}

impl BloodStockEntry {
    /// Build an entry with the status derived from the unit count.
    pub fn new(blood_type: BloodType, units_available: u32, last_updated: DateTime<Utc>) -> Self {
        Self {
            blood_type,
            units_available,
            status: StockStatus::from_units(units_available),
            last_updated,
        }
    }
}

// Manual deserialization so an inconsistent or missing `status` on the wire
// can never diverge from the unit count.
impl<'de> Deserialize<'de> for BloodStockEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            blood_type: BloodType,
            units_available: u32,
            #[serde(default)]
            last_updated: Option<DateTime<Utc>>,
        }

        let wire = Wire::deserialize(deserializer)?;
        Ok(BloodStockEntry::new(
            wire.blood_type,
            wire.units_available,
            wire.last_updated.unwrap_or_else(Utc::now),
        ))
    }
}

/// One hospital's stock listing with contact details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalStock {
    pub name: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub stock: Vec<BloodStockEntry>,
}

/// Location-scoped stock query with an optional blood-type filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationQuery {
    pub county: String,
    pub constituency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<BloodType>,
}
