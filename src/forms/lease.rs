use bigdecimal::BigDecimal;

use super::{
    parse_date, parse_field, EntityFields, FieldSpec, FormMode, FormState, Rule, Snapshot,
    ValidationErrors,
};
use crate::model::date_format::FORMAT;
use crate::model::{Lease, LeasePayload};

pub const PROPERTY: &str = "property";
pub const TENANT: &str = "tenant";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const RATE_AMOUNT: &str = "rate_amount";
pub const ACTIVE_LEASE: &str = "active_lease";

const PROPERTY_FIELD: FieldSpec = FieldSpec {
    name: PROPERTY,
    label: "Property",
    rules: &[Rule::Required, Rule::Integer],
};
const START_DATE_FIELD: FieldSpec = FieldSpec {
    name: START_DATE,
    label: "Start Date",
    rules: &[Rule::Required, Rule::Date],
};
const END_DATE_FIELD: FieldSpec = FieldSpec {
    name: END_DATE,
    label: "End Date",
    rules: &[Rule::Required, Rule::Date],
};
const RATE_AMOUNT_FIELD: FieldSpec = FieldSpec {
    name: RATE_AMOUNT,
    label: "Rate Amount",
    rules: &[Rule::Required, Rule::NonNegative],
};

const CREATE_FIELDS: &[FieldSpec] = &[
    PROPERTY_FIELD,
    FieldSpec {
        name: TENANT,
        label: "Tenant",
        rules: &[Rule::Required, Rule::Integer],
    },
    START_DATE_FIELD,
    END_DATE_FIELD,
    RATE_AMOUNT_FIELD,
];

// The tenant of an existing lease is kept unless changed
const EDIT_FIELDS: &[FieldSpec] = &[
    PROPERTY_FIELD,
    FieldSpec {
        name: TENANT,
        label: "Tenant",
        rules: &[Rule::Integer],
    },
    START_DATE_FIELD,
    END_DATE_FIELD,
    RATE_AMOUNT_FIELD,
];

/// Lease form schema
pub struct LeaseFields;

impl EntityFields for LeaseFields {
    type Record = Lease;
    type Payload = LeasePayload;

    fn fields(mode: FormMode) -> &'static [FieldSpec] {
        match mode {
            FormMode::Create => CREATE_FIELDS,
            FormMode::Edit(_) => EDIT_FIELDS,
        }
    }

    fn payload(state: &FormState, _mode: FormMode) -> Result<LeasePayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let property = parse_field::<i64>(state, PROPERTY, &mut errors);
        let tenant = match state.trimmed(TENANT) {
            Some(_) => parse_field::<i64>(state, TENANT, &mut errors),
            None => None,
        };
        let start_date = parse_date(state, START_DATE, &mut errors);
        let end_date = parse_date(state, END_DATE, &mut errors);
        let rate_amount = parse_field::<BigDecimal>(state, RATE_AMOUNT, &mut errors);

        match (property, start_date, end_date, rate_amount) {
            (Some(property), Some(start_date), Some(end_date), Some(rate_amount))
                if errors.is_empty() =>
            {
                Ok(LeasePayload {
                    property,
                    tenant,
                    start_date,
                    end_date,
                    rate_amount,
                    active_lease: state.flag(ACTIVE_LEASE),
                })
            }
            _ => Err(errors),
        }
    }

    fn snapshot(lease: &Lease) -> Snapshot {
        let optional = |id: Option<i64>| id.map(|id| id.to_string()).unwrap_or_default();
        Snapshot::default()
            .text(PROPERTY, optional(lease.property_id()))
            .text(TENANT, optional(lease.tenant))
            .text(START_DATE, lease.start_date.format(FORMAT))
            .text(END_DATE, lease.end_date.format(FORMAT))
            .text(RATE_AMOUNT, &lease.rate_amount)
            .flag(ACTIVE_LEASE, lease.active_lease)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{validate, FormAction, LeaseForm, SubmitError};
    use crate::model::NaiveDate;
    use crate::testing::{self, fixtures};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    fn filled() -> FormState {
        FormState::new()
            .with_text(PROPERTY, "2")
            .with_text(TENANT, "5")
            .with_text(START_DATE, "2025-01-01")
            .with_text(END_DATE, "2025-12-31")
            .with_text(RATE_AMOUNT, "2400")
            .with_flag(ACTIVE_LEASE, true)
    }

    #[tokio::test]
    async fn test_invalid_lease_reports_exact_fields_without_requests() {
        let api = testing::spawn(Router::new()).await;
        let mut form = LeaseForm::create(api.context());
        form.dispatch(FormAction::text(TENANT, "5"));
        form.dispatch(FormAction::text(END_DATE, "2025-12-31"));
        form.dispatch(FormAction::text(RATE_AMOUNT, "-5"));

        let err = form.submit().await.unwrap_err();
        let SubmitError::Invalid(errors) = err else {
            panic!("expected validation errors");
        };

        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec![PROPERTY, RATE_AMOUNT, START_DATE]);
        assert_eq!(errors.get(PROPERTY), Some("Property is required"));
        assert_eq!(errors.get(START_DATE), Some("Start Date is required"));
        assert_eq!(errors.get(RATE_AMOUNT), Some("Rate Amount cannot be negative"));
        assert_eq!(form.errors(), &errors);
        assert_eq!(api.recorder.count(), 0);
    }

    #[test]
    fn test_tenant_required_only_on_create() {
        let state = filled().with_text(TENANT, "");
        assert_eq!(
            validate(LeaseFields::fields(FormMode::Create), &state).get(TENANT),
            Some("Tenant is required")
        );
        assert!(validate(LeaseFields::fields(FormMode::Edit(1)), &state).is_empty());

        let payload = LeaseFields::payload(&state, FormMode::Edit(1)).unwrap();
        assert_eq!(payload.tenant, None);
    }

    #[test]
    fn test_bad_date_reported_on_field() {
        let errors = validate(CREATE_FIELDS, &filled().with_text(END_DATE, "31.12.2025"));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(END_DATE));
    }

    #[test]
    fn test_payload_from_state() {
        let payload = LeaseFields::payload(&filled(), FormMode::Create).unwrap();
        assert_eq!(payload.property, 2);
        assert_eq!(payload.tenant, Some(5));
        assert_eq!(payload.end_date, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert!(payload.active_lease);
    }

    #[tokio::test]
    async fn test_edit_round_trips_record_fields() {
        let api = testing::spawn(
            Router::new().route(
                "/properties/api/leases/:id/",
                get(|| async { Json(fixtures::lease(9, 2)) })
                    .put(|Json(body): Json<serde_json::Value>| async move {
                        assert_eq!(body["start_date"], "2025-01-01");
                        assert_eq!(body["active_lease"], false);
                        Json(fixtures::lease(9, 2))
                    }),
            ),
        )
        .await;

        let mut form = LeaseForm::edit(api.context(), 9).await.unwrap();
        assert_eq!(form.state().text(PROPERTY), "2");
        assert_eq!(form.state().text(TENANT), "5");
        assert!(form.state().flag(ACTIVE_LEASE));

        form.dispatch(FormAction::flag(ACTIVE_LEASE, false));
        form.submit().await.unwrap();
        assert_eq!(api.recorder.count_method("PUT"), 1);
    }

    #[tokio::test]
    async fn test_create_failure_banner_includes_server_detail() {
        let api = testing::spawn(Router::new().route(
            "/properties/api/leases/",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"detail": "Property is not available"})),
                )
            }),
        ))
        .await;

        let mut form = LeaseForm::create(api.context());
        for (field, value) in [
            (PROPERTY, "2"),
            (TENANT, "5"),
            (START_DATE, "2025-01-01"),
            (END_DATE, "2025-12-31"),
            (RATE_AMOUNT, "2400"),
        ] {
            form.dispatch(FormAction::text(field, value));
        }

        form.submit().await.unwrap_err();
        assert_eq!(
            form.banner(),
            Some("Failed to create lease. Property is not available")
        );
    }

    #[tokio::test]
    async fn test_expired_session_on_submit_redirects() {
        let api = testing::spawn(Router::new().route(
            "/properties/api/leases/",
            post(|| async { StatusCode::UNAUTHORIZED }),
        ))
        .await;

        let mut form = LeaseForm::create(api.context());
        form.dispatch(
            Snapshot::default()
                .text(PROPERTY, 2)
                .text(TENANT, 5)
                .text(START_DATE, "2025-01-01")
                .text(END_DATE, "2025-12-31")
                .text(RATE_AMOUNT, 0)
                .into_action(),
        );

        let err = form.submit().await.unwrap_err();
        assert_eq!(err.redirect(), Some(crate::routes::Route::Login));
        assert_eq!(form.banner(), None);
    }
}
