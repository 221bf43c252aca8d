//! Listing records as produced by the external cleaning pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MietkarteError;

/// Kind of property advertised in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Apartment,
    House,
    SharedApartment,
    TemporaryLiving,
    HolidayHouseApartment,
}

impl ObjectType {
    pub const ALL: [ObjectType; 5] = [
        ObjectType::Apartment,
        ObjectType::House,
        ObjectType::SharedApartment,
        ObjectType::TemporaryLiving,
        ObjectType::HolidayHouseApartment,
    ];

    /// Category label as it appears in the datasets and model summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Apartment => "APARTMENT",
            ObjectType::House => "HOUSE",
            ObjectType::SharedApartment => "SHARED_APARTMENT",
            ObjectType::TemporaryLiving => "TEMPORARY_LIVING",
            ObjectType::HolidayHouseApartment => "HOLIDAY_HOUSE_APARTMENT",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = MietkarteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| MietkarteError::InvalidParameter(format!("unknown object type: {s}")))
    }
}

/// Room count category.
///
/// The cleaning pipeline collapses unknown counts into `Missing` and
/// rooms in shared flats into `Shared`; everything else is a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Rooms {
    Missing,
    Shared,
    Count(u8),
}

/// Display order of the room categories on every room axis.
pub const ROOM_ORDER: [Rooms; 7] = [
    Rooms::Missing,
    Rooms::Shared,
    Rooms::Count(1),
    Rooms::Count(2),
    Rooms::Count(3),
    Rooms::Count(4),
    Rooms::Count(5),
];

impl fmt::Display for Rooms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rooms::Missing => f.write_str("Missing"),
            Rooms::Shared => f.write_str("Shared"),
            Rooms::Count(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for Rooms {
    type Err = MietkarteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Missing" => Ok(Rooms::Missing),
            "Shared" => Ok(Rooms::Shared),
            other => other
                .parse::<u8>()
                .map(Rooms::Count)
                .map_err(|_| MietkarteError::InvalidParameter(format!("unknown rooms category: {s}"))),
        }
    }
}

impl TryFrom<String> for Rooms {
    type Error = MietkarteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rooms> for String {
    fn from(value: Rooms) -> Self {
        value.to_string()
    }
}

/// A single rental or sale listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Asking price in EUR (monthly rent or purchase price).
    pub price: f64,
    #[serde(default)]
    pub square_meters: Option<f64>,
    pub rooms: Rooms,
    pub object_type: ObjectType,
    pub private_offer: bool,
    pub zip_code: String,
    /// `true` for rentals, `false` for sales.
    pub to_rent: bool,
}
