//! Fetch state container — request lifecycle with latest-request-wins settling.

use chrono::{DateTime, Utc};

use super::{FetchResult, RequestId};
use crate::domain::market_chart::PriceSeries;
use crate::error::FetchError;
use crate::shared::Endpoint;

/// Instruction to start one network request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
    pub request: RequestId,
    pub endpoint: Endpoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    request: RequestId,
    endpoint: Endpoint,
}

/// Lifecycle of the requests for the current endpoint.
///
/// Only the most recently issued request may settle the result; every older
/// token is stale and its outcome is dropped.
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    result: FetchResult,
    last_issued: RequestId,
    in_flight: Option<InFlight>,
    last_series: Option<PriceSeries>,
    updated_at: Option<DateTime<Utc>>,
}

impl FetchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a request for a new endpoint.
    ///
    /// Returns `None` when the latest request already targets `endpoint` and
    /// has not settled yet.
    pub fn on_endpoint_changed(&mut self, endpoint: &Endpoint) -> Option<FetchCommand> {
        if let Some(current) = &self.in_flight {
            if &current.endpoint == endpoint {
                tracing::debug!(request = %current.request, "Request for {} already in flight", endpoint);
                return None;
            }
        }
        Some(self.issue(endpoint))
    }

    /// Poll: unconditionally re-issue a request for `endpoint`.
    pub fn tick(&mut self, endpoint: &Endpoint) -> FetchCommand {
        self.issue(endpoint)
    }

    /// Apply the outcome of `request`. Returns `false` if the token is stale.
    pub fn settle(&mut self, request: RequestId, outcome: Result<PriceSeries, FetchError>) -> bool {
        match &self.in_flight {
            Some(current) if current.request == request => {}
            _ => {
                tracing::debug!(request = %request, "Discarding stale response");
                return false;
            }
        }
        self.in_flight = None;

        match outcome {
            Ok(series) => {
                self.last_series = Some(series.clone());
                self.updated_at = Some(Utc::now());
                self.result = FetchResult::Success(series);
            }
            Err(e) => {
                self.result = FetchResult::Error(e);
            }
        }
        true
    }

    /// Forget the outstanding request so any later settle is a no-op.
    pub fn cancel(&mut self) {
        self.in_flight = None;
    }

    pub fn result(&self) -> &FetchResult {
        &self.result
    }

    /// Token of the most recently issued request, if any was issued.
    pub fn latest_request(&self) -> Option<RequestId> {
        (self.last_issued != RequestId::default()).then_some(self.last_issued)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Last successful series, kept while a newer attempt loads or fails.
    pub fn last_series(&self) -> Option<&PriceSeries> {
        self.last_series.as_ref()
    }

    /// When the last successful series was applied.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn issue(&mut self, endpoint: &Endpoint) -> FetchCommand {
        self.last_issued = self.last_issued.next();
        self.in_flight = Some(InFlight {
            request: self.last_issued,
            endpoint: endpoint.clone(),
        });
        self.result = FetchResult::Loading;
        tracing::debug!(request = %self.last_issued, "Issuing request for {}", endpoint);
        FetchCommand {
            request: self.last_issued,
            endpoint: endpoint.clone(),
        }
    }
}
