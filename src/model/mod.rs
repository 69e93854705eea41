//! API records
//!
//! Typed mirrors of the server's JSON. Responses are parsed into these
//! types at the fetch boundary; a body that does not fit is an error, not
//! a partially filled record.

mod lease;
mod payment;
mod property;
mod user;

pub use lease::{Lease, LeaseDetail, LeasePayload, PropertyRef, PropertySummary};
pub use payment::{Payment, PaymentPayload};
pub use property::{Property, PropertyPayload, PropertyStatus, PropertyType};
pub use user::{Credentials, RegisterPayload, TokenPair, User};

pub use bigdecimal::BigDecimal;
pub use chrono::NaiveDate;

use serde::de::DeserializeOwned;

/// A server collection with per-item endpoints
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    /// Singular noun used in messages ("property")
    const NOUN: &'static str;

    /// Path of the collection endpoint
    fn collection_path() -> String;

    /// Path of a single item
    fn item_path(id: i64) -> String;

    fn id(&self) -> i64;
}

/// Date fields: `YYYY-MM-DD`, tolerating a trailing time part
pub(crate) mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
        let date = raw.trim().split('T').next().unwrap_or_default();
        NaiveDate::parse_from_str(date, FORMAT)
    }
}
