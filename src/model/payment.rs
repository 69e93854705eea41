use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{date_format, Resource};

/// A rent payment against a lease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    #[serde(default)]
    pub lease: Option<i64>,
    pub amount: BigDecimal,
    #[serde(with = "date_format")]
    pub payment_date: NaiveDate,
    #[serde(default)]
    pub is_paid: bool,
}

/// Body of a payment create/update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentPayload {
    pub lease: i64,
    pub amount: BigDecimal,
    #[serde(with = "date_format")]
    pub payment_date: NaiveDate,
    pub is_paid: bool,
}

impl Resource for Payment {
    const NOUN: &'static str = "payment";

    fn collection_path() -> String {
        "/properties/api/payments/".to_string()
    }

    fn item_path(id: i64) -> String {
        format!("/properties/api/payments/{id}/")
    }

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_date_is_truncated() {
        let payment: Payment = serde_json::from_value(serde_json::json!({
            "id": 4,
            "amount": 900,
            "payment_date": "2025-02-10T12:30:00Z"
        }))
        .unwrap();

        assert_eq!(payment.payment_date, NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
        assert_eq!(payment.lease, None);
        assert!(!payment.is_paid);
    }

    #[test]
    fn test_missing_amount_is_an_error() {
        let result = serde_json::from_value::<Payment>(serde_json::json!({
            "id": 4,
            "payment_date": "2025-02-10"
        }));
        assert!(result.is_err());
    }
}
