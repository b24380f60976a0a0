//! Controller — composition root.
//!
//! Filter-change events become explicit state transitions:
//! [`reduce`]`(model, event) -> (model, command)`. The only side effect a
//! transition can request is [`Command::Fetch`]; executing it is the job of the
//! [`runtime`] (or of a test driving the reducer by hand).

pub mod runtime;

pub use runtime::{Controller, ControllerBuilder, ControllerConfig};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::fetch::{FetchCommand, FetchResult, FetchState, RequestId};
use crate::domain::filter::FilterState;
use crate::domain::market_chart::{extract_series, EndpointBuilder, PriceSeries};
use crate::error::{FetchError, HttpError};
use crate::shared::{Endpoint, FilterField};

/// Inputs to the controller state machine.
#[derive(Debug, Clone)]
pub enum Event {
    /// Controller attached: issue the first fetch.
    Mount,
    /// Raised by the filter-selection UI.
    FilterChanged { field: FilterField, value: String },
    /// Poll timer fired (or a manual refresh was requested).
    Tick,
    /// A request finished, successfully or not.
    FetchSettled {
        request: RequestId,
        payload: Result<serde_json::Value, HttpError>,
    },
    /// Controller detached: nothing may mutate state afterwards.
    Unmount,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch { request: RequestId, endpoint: Endpoint },
}

impl From<FetchCommand> for Command {
    fn from(cmd: FetchCommand) -> Self {
        Command::Fetch {
            request: cmd.request,
            endpoint: cmd.endpoint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

/// Controller state: filters, the endpoint derived from them, and the fetch lifecycle.
///
/// `endpoint == builder.build(&filters)` holds after every transition.
#[derive(Debug, Clone)]
pub struct Model {
    builder: EndpointBuilder,
    filters: FilterState,
    endpoint: Endpoint,
    fetch: FetchState,
    lifecycle: Lifecycle,
}

impl Model {
    pub fn new(builder: EndpointBuilder, filters: FilterState) -> Self {
        let endpoint = builder.build(&filters);
        Self {
            builder,
            filters,
            endpoint,
            fetch: FetchState::new(),
            lifecycle: Lifecycle::Created,
        }
    }

    /// Apply one event in place.
    pub fn update(&mut self, event: Event) -> Option<Command> {
        if self.lifecycle == Lifecycle::Unmounted {
            return None;
        }

        match event {
            Event::Mount => {
                if self.lifecycle == Lifecycle::Mounted {
                    return None;
                }
                self.lifecycle = Lifecycle::Mounted;
                self.fetch.on_endpoint_changed(&self.endpoint).map(Command::from)
            }
            Event::FilterChanged { field, value } => {
                if !self.filters.apply_filter_change(field, value) {
                    return None;
                }
                tracing::info!("Filter {} changed to {:?}", field, self.filters.get(field));
                self.endpoint = self.builder.build(&self.filters);
                if self.lifecycle != Lifecycle::Mounted {
                    return None;
                }
                self.fetch.on_endpoint_changed(&self.endpoint).map(Command::from)
            }
            Event::Tick => {
                if self.lifecycle != Lifecycle::Mounted {
                    return None;
                }
                Some(self.fetch.tick(&self.endpoint).into())
            }
            Event::FetchSettled { request, payload } => {
                let outcome = payload
                    .map_err(FetchError::from)
                    .and_then(|body| extract_series(&body));
                if let Err(e) = &outcome {
                    if self.fetch.latest_request() == Some(request) {
                        tracing::warn!(request = %request, "Fetch failed: {}", e);
                    }
                }
                self.fetch.settle(request, outcome);
                None
            }
            Event::Unmount => {
                self.lifecycle = Lifecycle::Unmounted;
                self.fetch.cancel();
                None
            }
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn result(&self) -> &FetchResult {
        self.fetch.result()
    }

    pub fn fetch(&self) -> &FetchState {
        &self.fetch
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            filters: self.filters.clone(),
            endpoint: self.endpoint.clone(),
            result: self.fetch.result().clone(),
            last_series: self.fetch.last_series().cloned(),
            updated_at: self.fetch.updated_at(),
        }
    }
}

/// Pure transition: `(model, event) -> (model, command)`.
pub fn reduce(mut model: Model, event: Event) -> (Model, Option<Command>) {
    let command = model.update(event);
    (model, command)
}

// ─── View state ──────────────────────────────────────────────────────────────

/// Everything the view layer may observe, published after every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub filters: FilterState,
    pub endpoint: Endpoint,
    pub result: FetchResult,
    pub last_series: Option<PriceSeries>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn chart_props(&self) -> ChartProps {
        let series = self
            .result
            .series()
            .or(self.last_series.as_ref())
            .map(|s| s.as_slice().to_vec())
            .unwrap_or_default();
        ChartProps {
            is_loading: self.result.is_loading(),
            is_success: self.result.is_success(),
            series,
        }
    }

    pub fn placeholder_props(&self) -> PlaceholderProps {
        PlaceholderProps {
            is_loading: self.result.is_loading(),
        }
    }
}

/// Props for the charting collaborator.
///
/// While loading or failed, `series` holds the last successful series (or is empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartProps {
    pub is_loading: bool,
    pub is_success: bool,
    pub series: Vec<f64>,
}

/// Props for the loading-placeholder collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderProps {
    pub is_loading: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fetch::FetchStatus;
    use serde_json::json;

    fn model() -> Model {
        Model::new(EndpointBuilder::new("http://h"), FilterState::default())
    }

    fn fetch_of(cmd: Option<Command>) -> (RequestId, Endpoint) {
        match cmd {
            Some(Command::Fetch { request, endpoint }) => (request, endpoint),
            None => panic!("expected a fetch command"),
        }
    }

    fn settled(request: RequestId, prices: serde_json::Value) -> Event {
        Event::FetchSettled {
            request,
            payload: Ok(json!({ "prices": prices })),
        }
    }

    fn market(value: &str) -> Event {
        Event::FilterChanged {
            field: FilterField::Market,
            value: value.into(),
        }
    }

    #[test]
    fn test_mount_scenario() {
        let m = model();
        assert_eq!(m.result().status(), FetchStatus::Idle);

        let (m, cmd) = reduce(m, Event::Mount);
        let (request, endpoint) = fetch_of(cmd);
        assert_eq!(
            endpoint.as_str(),
            "http://h/bitcoin/market_chart?vs_currency=usd&days=1&interval=hourly"
        );
        assert_eq!(m.result().status(), FetchStatus::Loading);

        let (m, cmd) = reduce(m, settled(request, json!([[0, 100.5], [1, 101.25]])));
        assert!(cmd.is_none());
        assert_eq!(m.result().status(), FetchStatus::Success);
        assert_eq!(m.result().series().unwrap().as_slice(), &[100.5, 101.25]);
    }

    #[test]
    fn test_second_mount_is_noop() {
        let (m, _) = reduce(model(), Event::Mount);
        let (_, cmd) = reduce(m, Event::Mount);
        assert!(cmd.is_none());
    }

    #[test]
    fn test_market_change_mid_flight_discards_late_usd_response() {
        let (m, cmd) = reduce(model(), Event::Mount);
        let (usd_request, _) = fetch_of(cmd);

        let (m, cmd) = reduce(m, market("eur"));
        let (eur_request, eur_endpoint) = fetch_of(cmd);
        assert!(eur_endpoint.as_str().contains("vs_currency=eur"));
        assert_eq!(m.result().status(), FetchStatus::Loading);

        let (m, _) = reduce(m, settled(eur_request, json!([[0, 0.9]])));
        let (m, _) = reduce(m, settled(usd_request, json!([[0, 1.0]])));
        assert_eq!(m.result().series().unwrap().as_slice(), &[0.9]);
        assert_eq!(m.filters().market(), "eur");
    }

    #[test]
    fn test_endpoint_tracks_filters_after_every_event() {
        let builder = EndpointBuilder::new("http://h");
        let mut m = Model::new(builder.clone(), FilterState::default());
        let events = vec![
            Event::FilterChanged {
                field: FilterField::Days,
                value: "14".into(),
            },
            Event::Mount,
            Event::FilterChanged {
                field: FilterField::Symbol,
                value: "ethereum".into(),
            },
            Event::Tick,
            Event::FilterChanged {
                field: FilterField::Interval,
                value: "daily".into(),
            },
            Event::Unmount,
        ];
        for event in events {
            m.update(event);
            assert_eq!(m.endpoint(), &builder.build(m.filters()));
        }
    }

    #[test]
    fn test_unchanged_filter_value_issues_nothing() {
        let (m, cmd) = reduce(model(), Event::Mount);
        let (request, _) = fetch_of(cmd);
        let (m, _) = reduce(m, settled(request, json!([[0, 1]])));

        let (m, cmd) = reduce(m, market("usd"));
        assert!(cmd.is_none());
        assert_eq!(m.result().status(), FetchStatus::Success);
    }

    #[test]
    fn test_filter_change_before_mount_only_updates_endpoint() {
        let (m, cmd) = reduce(model(), market("gbp"));
        assert!(cmd.is_none());
        assert_eq!(m.result().status(), FetchStatus::Idle);
        assert!(m.endpoint().as_str().contains("vs_currency=gbp"));

        let (_, cmd) = reduce(m, Event::Mount);
        let (_, endpoint) = fetch_of(cmd);
        assert!(endpoint.as_str().contains("vs_currency=gbp"));
    }

    #[test]
    fn test_tick_from_success_keeps_filters() {
        let (m, cmd) = reduce(model(), Event::Mount);
        let (request, _) = fetch_of(cmd);
        let (m, _) = reduce(m, settled(request, json!([[0, 1]])));
        let filters_before = m.filters().clone();

        let (m, cmd) = reduce(m, Event::Tick);
        let (tick_request, endpoint) = fetch_of(cmd);
        assert_eq!(&endpoint, m.endpoint());
        assert_eq!(m.result().status(), FetchStatus::Loading);

        let (m, _) = reduce(m, settled(tick_request, json!([[0, 2]])));
        assert_eq!(m.result().status(), FetchStatus::Success);
        assert_eq!(m.filters(), &filters_before);
    }

    #[test]
    fn test_tick_before_mount_is_ignored() {
        let (m, cmd) = reduce(model(), Event::Tick);
        assert!(cmd.is_none());
        assert_eq!(m.result().status(), FetchStatus::Idle);
    }

    #[test]
    fn test_network_error_surfaces_as_error_status() {
        let (m, cmd) = reduce(model(), Event::Mount);
        let (request, _) = fetch_of(cmd);
        let (m, _) = reduce(
            m,
            Event::FetchSettled {
                request,
                payload: Err(HttpError::ServerError {
                    status: 502,
                    body: "bad gateway".into(),
                }),
            },
        );
        assert!(matches!(m.result().error(), Some(FetchError::Network(_))));

        // Polling continues after an error.
        let (m, cmd) = reduce(m, Event::Tick);
        assert!(cmd.is_some());
        assert_eq!(m.result().status(), FetchStatus::Loading);
    }

    #[test]
    fn test_malformed_payload_surfaces_as_error_status() {
        let (m, cmd) = reduce(model(), Event::Mount);
        let (request, _) = fetch_of(cmd);
        let (m, _) = reduce(
            m,
            Event::FetchSettled {
                request,
                payload: Ok(json!({})),
            },
        );
        assert!(matches!(
            m.result().error(),
            Some(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_unmount_blocks_later_mutation() {
        let (m, cmd) = reduce(model(), Event::Mount);
        let (request, _) = fetch_of(cmd);
        let (m, _) = reduce(m, Event::Unmount);

        let (m, _) = reduce(m, settled(request, json!([[0, 1]])));
        assert_eq!(m.result().status(), FetchStatus::Loading);
        let (m, cmd) = reduce(m, Event::Tick);
        assert!(cmd.is_none());
        let (m, cmd) = reduce(m, market("eur"));
        assert!(cmd.is_none());
        assert_eq!(m.filters().market(), "usd");
        assert!(!m.is_mounted());
    }

    #[test]
    fn test_chart_props_keep_last_series_while_reloading() {
        let (m, cmd) = reduce(model(), Event::Mount);
        let (request, _) = fetch_of(cmd);
        let loading = m.snapshot().chart_props();
        assert_eq!(loading, ChartProps { is_loading: true, is_success: false, series: vec![] });
        assert!(m.snapshot().placeholder_props().is_loading);

        let (m, _) = reduce(m, settled(request, json!([[0, 5], [1, 6]])));
        let ok = m.snapshot().chart_props();
        assert_eq!(ok, ChartProps { is_loading: false, is_success: true, series: vec![5.0, 6.0] });

        let (m, _) = reduce(m, Event::Tick);
        let reloading = m.snapshot().chart_props();
        assert!(reloading.is_loading);
        assert!(!reloading.is_success);
        assert_eq!(reloading.series, vec![5.0, 6.0]);
    }

    #[test]
    fn test_chart_props_serialize_camel_case() {
        let props = ChartProps {
            is_loading: false,
            is_success: true,
            series: vec![1.5],
        };
        assert_eq!(
            serde_json::to_value(&props).unwrap(),
            json!({ "isLoading": false, "isSuccess": true, "series": [1.5] })
        );
    }
}
