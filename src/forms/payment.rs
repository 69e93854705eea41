use bigdecimal::BigDecimal;

use super::{
    parse_date, parse_field, EntityFields, FieldSpec, Form, FormAction, FormMode, FormState, Rule,
    Snapshot, ValidationErrors,
};
use crate::context::AppContext;
use crate::model::date_format::FORMAT;
use crate::model::{Payment, PaymentPayload};

pub const LEASE: &str = "lease";
pub const AMOUNT: &str = "amount";
pub const PAYMENT_DATE: &str = "payment_date";
pub const IS_PAID: &str = "is_paid";

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: LEASE,
        label: "Lease",
        rules: &[Rule::Required, Rule::Integer],
    },
    FieldSpec {
        name: AMOUNT,
        label: "Amount",
        rules: &[Rule::Required, Rule::NonNegative],
    },
    FieldSpec {
        name: PAYMENT_DATE,
        label: "Payment Date",
        rules: &[Rule::Required, Rule::Date],
    },
];

/// Payment form schema
pub struct PaymentFields;

impl EntityFields for PaymentFields {
    type Record = Payment;
    type Payload = PaymentPayload;

    fn fields(_mode: FormMode) -> &'static [FieldSpec] {
        FIELDS
    }

    fn payload(state: &FormState, _mode: FormMode) -> Result<PaymentPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let lease = parse_field::<i64>(state, LEASE, &mut errors);
        let amount = parse_field::<BigDecimal>(state, AMOUNT, &mut errors);
        let payment_date = parse_date(state, PAYMENT_DATE, &mut errors);

        match (lease, amount, payment_date) {
            (Some(lease), Some(amount), Some(payment_date)) => Ok(PaymentPayload {
                lease,
                amount,
                payment_date,
                is_paid: state.flag(IS_PAID),
            }),
            _ => Err(errors),
        }
    }

    fn snapshot(payment: &Payment) -> Snapshot {
        Snapshot::default()
            .text(LEASE, payment.lease.map(|id| id.to_string()).unwrap_or_default())
            .text(AMOUNT, &payment.amount)
            .text(PAYMENT_DATE, payment.payment_date.format(FORMAT))
            .flag(IS_PAID, payment.is_paid)
    }
}

impl Form<PaymentFields> {
    /// New payment with the lease preselected, as reached from a lease page
    pub fn for_lease(ctx: AppContext, lease: Option<i64>) -> Self {
        let mut form = Self::create(ctx);
        if let Some(lease) = lease {
            form.dispatch(FormAction::text(LEASE, lease.to_string()));
        }
        form
    }
}
