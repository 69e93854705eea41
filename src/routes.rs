//! Navigation targets
//!
//! Routes name the screens a form or guard can send the user to. Only
//! their identity and path matter here; presenting them is up to the
//! front end.

use std::fmt;

/// A screen of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    PropertyAdd,
    PropertyEdit(i64),
    LeaseAdd,
    LeaseDetail(i64),
    LeaseEdit(i64),
    PaymentAdd { lease: Option<i64> },
    PaymentEdit(i64),
}

impl Route {
    /// Whether the route needs a valid session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    /// URL path of the route
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::PropertyAdd => "/properties/add".to_string(),
            Route::PropertyEdit(id) => format!("/properties/{id}/edit"),
            Route::LeaseAdd => "/leases/add".to_string(),
            Route::LeaseDetail(id) => format!("/leases/{id}"),
            Route::LeaseEdit(id) => format!("/leases/{id}/edit"),
            Route::PaymentAdd { lease: None } => "/payments/add".to_string(),
            Route::PaymentAdd { lease: Some(id) } => format!("/payments/add?leaseId={id}"),
            Route::PaymentEdit(id) => format!("/payments/{id}/edit"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
