//! Origin/destination query for matatu route advice.

use shared::{
    error::FailureReason,
    protocol::{RouteRequest, RouteResponse},
};
use tracing::{info, warn};

use crate::{
    outcome::Outcome,
    transport::{self, Transport},
};

pub const ROUTE_FALLBACK_ERROR: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteQuery {
    origin: String,
    destination: String,
    outcome: Outcome<String>,
    in_flight: bool,
}

impl RouteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.origin = origin.into();
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.destination = destination.into();
    }

    pub fn outcome(&self) -> &Outcome<String> {
        &self.outcome
    }

    pub fn advice(&self) -> Option<&str> {
        self.outcome.result().map(String::as_str)
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.error()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn can_submit(&self) -> bool {
        !self.in_flight && !self.origin.trim().is_empty() && !self.destination.trim().is_empty()
    }

    /// Starts a round-trip. Returns the request to dispatch, or `None` when
    /// a field is blank or a request is already outstanding.
    pub fn submit(&mut self) -> Option<RouteRequest> {
        if !self.can_submit() {
            return None;
        }
        self.outcome.clear();
        self.in_flight = true;
        Some(RouteRequest {
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
        })
    }

    pub fn complete(&mut self, result: Result<RouteResponse, FailureReason>) {
        if !self.in_flight {
            warn!("route completion arrived with no request outstanding; ignoring");
            return;
        }
        self.in_flight = false;
        self.outcome = Outcome::settle(result.map(|response| response.advice), ROUTE_FALLBACK_ERROR);
        info!(succeeded = self.outcome.result().is_some(), "route query settled");
    }

    /// `submit` + transport call + `complete`. Returns whether a request went out.
    pub async fn submit_with(&mut self, transport: &dyn Transport) -> bool {
        let Some(request) = self.submit() else {
            return false;
        };
        let result = transport::find_route(transport, &request).await;
        self.complete(result);
        true
    }

    /// Exchanges both fields in one step. A result computed for the previous
    /// pair stays in place.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
    }

    pub fn reset(&mut self) {
        self.origin.clear();
        self.destination.clear();
        self.outcome.clear();
    }

    pub fn dismiss_error(&mut self) {
        self.outcome.dismiss_error();
    }
}

#[cfg(test)]
#[path = "tests/route_tests.rs"]
mod tests;
