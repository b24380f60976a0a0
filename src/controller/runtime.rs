//! Controller runtime — a background tokio task that owns the [`Model`].
//!
//! - One task, one logical thread: every event is applied in sequence
//! - Poll timer re-issues the current request every `poll_interval`
//! - In-flight requests complete concurrently and are fed back tagged with their token
//! - A [`Snapshot`] is published on a `watch` channel after every transition
//! - Teardown drops the task, its timer, and every in-flight request

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::{ChartProps, Command, Event, Model, PlaceholderProps, Snapshot};
use crate::domain::fetch::RequestId;
use crate::domain::filter::FilterState;
use crate::domain::market_chart::EndpointBuilder;
use crate::error::{ControllerError, HttpError, SdkError};
use crate::http::MarketChartSource;
use crate::shared::FilterField;

type Settled = (RequestId, Result<serde_json::Value, HttpError>);

// ─── Inputs from public API to background task ───────────────────────────────

enum Input {
    FilterChanged { field: FilterField, value: String },
    Refresh,
    Unmount,
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Configuration for a [`Controller`].
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub initial_filters: FilterState,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            poll_interval: Duration::from_millis(crate::network::DEFAULT_POLL_INTERVAL_MS),
            request_timeout: Duration::from_millis(crate::network::DEFAULT_REQUEST_TIMEOUT_MS),
            initial_filters: FilterState::default(),
        }
    }
}

// ─── Background task state ───────────────────────────────────────────────────

struct TaskState {
    model: Model,
    source: Arc<dyn MarketChartSource>,
    input_rx: mpsc::Receiver<Input>,
    snapshot_tx: watch::Sender<Snapshot>,
    poll_interval: Duration,
    in_flight: FuturesUnordered<BoxFuture<'static, Settled>>,
}

impl TaskState {
    fn apply(&mut self, event: Event) {
        if let Some(command) = self.model.update(event) {
            self.dispatch(command);
        }
        self.publish();
    }

    fn dispatch(&mut self, command: Command) {
        match command {
            Command::Fetch { request, endpoint } => {
                let source = Arc::clone(&self.source);
                self.in_flight.push(
                    async move {
                        let payload = source.fetch_market_chart(&endpoint).await;
                        (request, payload)
                    }
                    .boxed(),
                );
            }
        }
    }

    fn publish(&self) {
        let next = self.model.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

// ─── Public Controller ───────────────────────────────────────────────────────

/// Market chart query controller.
///
/// Created unmounted; [`mount`](Self::mount) spawns the background task and
/// issues the first request. The public API talks to the task over a channel.
pub struct Controller {
    input_tx: Option<mpsc::Sender<Input>>,
    snapshot_rx: watch::Receiver<Snapshot>,
    pending: Option<(TaskState, mpsc::Sender<Input>)>,
    task_handle: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::default()
    }

    pub fn new(config: ControllerConfig, source: Arc<dyn MarketChartSource>) -> Self {
        let model = Model::new(
            EndpointBuilder::new(&config.base_url),
            config.initial_filters,
        );
        let (snapshot_tx, snapshot_rx) = watch::channel(model.snapshot());
        let (input_tx, input_rx) = mpsc::channel(64);

        let state = TaskState {
            model,
            source,
            input_rx,
            snapshot_tx,
            poll_interval: config.poll_interval.max(Duration::from_millis(1)),
            in_flight: FuturesUnordered::new(),
        };

        Self {
            input_tx: None,
            snapshot_rx,
            pending: Some((state, input_tx)),
            task_handle: None,
        }
    }

    /// Spawn the background task and issue the first request.
    ///
    /// Mounting twice is a no-op; a controller cannot be mounted again after
    /// [`unmount`](Self::unmount).
    pub async fn mount(&mut self) -> Result<(), ControllerError> {
        if self.input_tx.is_some() {
            return Ok(());
        }
        let (state, input_tx) = self.pending.take().ok_or(ControllerError::NotRunning)?;

        self.input_tx = Some(input_tx);
        self.task_handle = Some(tokio::spawn(run_task(state)));
        Ok(())
    }

    /// Tear down: stop polling and ignore every outstanding response.
    pub async fn unmount(&mut self) {
        self.pending = None;

        if let Some(tx) = self.input_tx.take() {
            let _ = tx.send(Input::Unmount).await;
        }

        if let Some(handle) = self.task_handle.take() {
            let abort = handle.abort_handle();
            if tokio::time::timeout(Duration::from_secs(5), handle).await.is_err() {
                tracing::warn!("Controller task did not stop in time, aborting");
                abort.abort();
            }
        }
    }

    /// Filter-change entry point for the selection UI.
    pub fn filter_changed(
        &self,
        field: FilterField,
        value: impl Into<String>,
    ) -> Result<(), ControllerError> {
        self.send(Input::FilterChanged {
            field,
            value: value.into(),
        })
    }

    /// Same as [`filter_changed`](Self::filter_changed) with the field given by name.
    ///
    /// Unknown names fail with `SdkError::Validation`.
    pub fn filter_changed_str(&self, name: &str, value: impl Into<String>) -> Result<(), SdkError> {
        let field: FilterField = name.parse()?;
        Ok(self.filter_changed(field, value)?)
    }

    /// Re-issue the current request now, as a poll tick would.
    pub fn refresh(&self) -> Result<(), ControllerError> {
        self.send(Input::Refresh)
    }

    pub fn is_mounted(&self) -> bool {
        self.input_tx.is_some()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Watch every published state.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_rx.clone()
    }

    pub fn chart_props(&self) -> ChartProps {
        self.snapshot_rx.borrow().chart_props()
    }

    pub fn placeholder_props(&self) -> PlaceholderProps {
        self.snapshot_rx.borrow().placeholder_props()
    }

    fn send(&self, input: Input) -> Result<(), ControllerError> {
        match &self.input_tx {
            Some(tx) => tx.try_send(input).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => ControllerError::ChannelFull,
                mpsc::error::TrySendError::Closed(_) => ControllerError::NotRunning,
            }),
            None => Err(ControllerError::NotRunning),
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task(mut state: TaskState) {
    tracing::info!("Controller mounted at {}", state.model.endpoint());
    state.apply(Event::Mount);

    let period = state.poll_interval;
    let mut poll = tokio::time::interval_at(Instant::now() + period, period);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let event = tokio::select! {
            input = state.input_rx.recv() => match input {
                Some(Input::FilterChanged { field, value }) => Event::FilterChanged { field, value },
                Some(Input::Refresh) => Event::Tick,
                // Controller dropped or unmounted
                Some(Input::Unmount) | None => break,
            },

            _ = poll.tick() => Event::Tick,

            Some((request, payload)) = state.in_flight.next(), if !state.in_flight.is_empty() => {
                Event::FetchSettled { request, payload }
            }
        };
        state.apply(event);
    }

    state.apply(Event::Unmount);
    tracing::info!(
        "Controller unmounted, dropping {} in-flight request(s)",
        state.in_flight.len()
    );
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct ControllerBuilder {
    config: ControllerConfig,
}

impl ControllerBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.to_string();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn initial_filters(mut self, filters: FilterState) -> Self {
        self.config.initial_filters = filters;
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Build with the reqwest transport.
    #[cfg(feature = "http")]
    pub fn build(self) -> Controller {
        let source = Arc::new(crate::http::ChartHttp::new(self.config.request_timeout));
        Controller::new(self.config, source)
    }

    /// Build with a caller-supplied transport.
    pub fn build_with_source(self, source: Arc<dyn MarketChartSource>) -> Controller {
        Controller::new(self.config, source)
    }
}
