//! Response construction.
//!
//! # Responsibilities
//! - Turn a canonicalization redirect into a 301 with `Location`
//! - Render a match outcome as the dispatch document (JSON)
//!
//! # Design Decisions
//! - Status comes from the outcome itself (200 / 403 / 404)
//! - A method mismatch still reports the route, for diagnostics

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::routing::{MatchOutcome, Params, Redirect, Resolution};

/// What the dispatch layer needs to run a handler.
#[derive(Debug, Serialize)]
pub struct DispatchDocument<'a> {
    pub status: u16,
    pub controller: Option<&'a str>,
    pub name: Option<&'a str>,
    pub language: Option<&'a str>,
    pub methods: Vec<&'a str>,
    pub middleware: &'a [String],
    pub params: Option<&'a Params>,
    pub base_url: Option<&'a str>,
}

impl<'a> DispatchDocument<'a> {
    pub fn from_outcome(outcome: &'a MatchOutcome<'_>) -> Self {
        let status = outcome.status().as_u16();
        match outcome.route_match() {
            Some(m) => Self {
                status,
                controller: Some(m.controller()),
                name: m.name(),
                language: Some(m.language()),
                methods: m.route().methods().iter().map(String::as_str).collect(),
                middleware: m.route().middleware(),
                params: Some(m.params()),
                base_url: Some(m.base_url()),
            },
            None => Self {
                status,
                controller: None,
                name: None,
                language: None,
                methods: Vec::new(),
                middleware: &[],
                params: None,
                base_url: None,
            },
        }
    }
}

/// 301 response for a non-canonical path.
pub fn redirect_response(redirect: &Redirect) -> Response {
    match HeaderValue::from_str(redirect.location()) {
        Ok(location) => (redirect.status(), [(header::LOCATION, location)]).into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, "Invalid request path").into_response(),
    }
}

/// Response for a resolved request.
pub fn resolution_response(resolution: &Resolution<'_>) -> Response {
    match resolution {
        Resolution::Redirect(redirect) => redirect_response(redirect),
        Resolution::Outcome(outcome) => {
            (outcome.status(), Json(DispatchDocument::from_outcome(outcome))).into_response()
        }
    }
}
