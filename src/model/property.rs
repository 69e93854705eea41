use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Resource;

/// Kind of property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    Room,
    Office,
    Industrial,
    TownHouse,
    Bungalow,
}

impl PropertyType {
    pub const ALL: [PropertyType; 6] = [
        PropertyType::Apartment,
        PropertyType::Room,
        PropertyType::Office,
        PropertyType::Industrial,
        PropertyType::TownHouse,
        PropertyType::Bungalow,
    ];

    /// Wire names, in the same order as [`PropertyType::ALL`]
    pub const NAMES: [&'static str; 6] = [
        "apartment",
        "room",
        "office",
        "industrial",
        "town_house",
        "bungalow",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::Room => "room",
            PropertyType::Office => "office",
            PropertyType::Industrial => "industrial",
            PropertyType::TownHouse => "town_house",
            PropertyType::Bungalow => "bungalow",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::Room => "Room",
            PropertyType::Office => "Office",
            PropertyType::Industrial => "Industrial",
            PropertyType::TownHouse => "Town house",
            PropertyType::Bungalow => "Bungalow",
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("unknown property type: {s}"))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    Rented,
    UnderRenovation,
}

impl PropertyStatus {
    pub const ALL: [PropertyStatus; 3] = [
        PropertyStatus::Available,
        PropertyStatus::Rented,
        PropertyStatus::UnderRenovation,
    ];

    pub const NAMES: [&'static str; 3] = ["available", "rented", "under_renovation"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Rented => "rented",
            PropertyStatus::UnderRenovation => "under_renovation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "Available",
            PropertyStatus::Rented => "Rented",
            PropertyStatus::UnderRenovation => "Under renovation",
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("unknown property status: {s}"))
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property owned by the logged-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub address: String,
    #[serde(default)]
    pub description: Option<String>,
    pub property_type: PropertyType,
    pub status: PropertyStatus,
    /// Floor area in square metres
    pub area: BigDecimal,
    pub num_of_rooms: u32,
}

/// Body of a property create/update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyPayload {
    pub address: String,
    pub description: Option<String>,
    pub property_type: PropertyType,
    pub status: PropertyStatus,
    pub area: BigDecimal,
    pub num_of_rooms: u32,
}

impl Resource for Property {
    const NOUN: &'static str = "property";

    fn collection_path() -> String {
        "/properties/api/".to_string()
    }

    fn item_path(id: i64) -> String {
        format!("/properties/api/{id}/")
    }

    fn id(&self) -> i64 {
        self.id
    }
}
