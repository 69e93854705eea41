use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{date_format, Payment, PropertyStatus, PropertyType, Resource};

/// A lease of a property to a tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lease {
    pub id: i64,
    #[serde(default)]
    pub property: Option<PropertyRef>,
    #[serde(default)]
    pub tenant: Option<i64>,
    #[serde(with = "date_format")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    pub end_date: NaiveDate,
    pub rate_amount: BigDecimal,
    #[serde(default)]
    pub active_lease: bool,
}

/// The leased property: a bare id in lists, an object on the detail endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyRef {
    Id(i64),
    Embedded(PropertySummary),
}

/// Property fields as embedded in a lease; the server may leave any of them out
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
}

impl PropertyRef {
    pub fn id(&self) -> Option<i64> {
        match self {
            PropertyRef::Id(id) => Some(*id),
            PropertyRef::Embedded(summary) => summary.id,
        }
    }

    /// Address when embedded, otherwise the id
    pub fn describe(&self) -> String {
        match self {
            PropertyRef::Embedded(summary) if !summary.address.is_empty() => summary.address.clone(),
            other => other.id().map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
        }
    }
}

impl Lease {
    pub fn property_id(&self) -> Option<i64> {
        self.property.as_ref().and_then(PropertyRef::id)
    }
}

/// A lease with its payments embedded, as served by the detail endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseDetail {
    #[serde(flatten)]
    pub lease: Lease,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// Body of a lease create/update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeasePayload {
    pub property: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<i64>,
    #[serde(with = "date_format")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    pub end_date: NaiveDate,
    pub rate_amount: BigDecimal,
    pub active_lease: bool,
}

impl Resource for Lease {
    const NOUN: &'static str = "lease";

    fn collection_path() -> String {
        "/properties/api/leases/".to_string()
    }

    fn item_path(id: i64) -> String {
        format!("/properties/api/leases/{id}/")
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl LeaseDetail {
    /// Path of the contract PDF preview
    pub fn contract_path(id: i64) -> String {
        format!("/properties/leases/{id}/contract/")
    }
}
