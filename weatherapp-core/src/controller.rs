//! Observable UI state driven by user actions.
//!
//! [`WeatherController`] owns a [`UiState`] behind a `watch` channel. Only its
//! action handlers write to it; a UI layer reads snapshots or subscribes.

use std::{future::Future, sync::Arc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    error::ErrorKind,
    model::LookupOutcome,
    service::WeatherService,
};

/// Shown when a city search task faults.
pub const SEARCH_FAULT_MESSAGE: &str = "Failed to load weather data.";
/// Shown when the device location cannot be used.
pub const LOCATION_FAILURE_MESSAGE: &str = "Failed to get location or weather data.";
/// Shown in place of a reading when the last lookup failed.
pub const OUTCOME_FAILURE_MESSAGE: &str = "Failed to load the weather data.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub is_loading: bool,
    pub last_outcome: Option<LookupOutcome>,
    pub error_message: Option<String>,
}

impl UiState {
    /// Screen text for a failed last outcome.
    pub fn failure_message(&self) -> Option<&'static str> {
        match self.last_outcome {
            Some(Err(_)) => Some(OUTCOME_FAILURE_MESSAGE),
            _ => None,
        }
    }
}

/// Per-controller settings that every action needs.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub api_key: String,
    pub fallback_city: String,
}

#[derive(Clone)]
pub struct WeatherController {
    inner: Arc<Inner>,
}

struct Inner {
    service: Arc<WeatherService>,
    settings: ControllerSettings,
    state: watch::Sender<UiState>,
    shutdown: CancellationToken,
}

/// How a settled action reports failures through `error_message`.
#[derive(Clone, Copy)]
enum Action {
    Search,
    CurrentLocation,
}

impl Action {
    fn fault_message(self) -> &'static str {
        match self {
            Action::Search => SEARCH_FAULT_MESSAGE,
            Action::CurrentLocation => LOCATION_FAILURE_MESSAGE,
        }
    }

    fn failure_message(self, outcome: &LookupOutcome) -> Option<&'static str> {
        match (self, outcome) {
            (Action::CurrentLocation, Err(err))
                if matches!(err.kind(), ErrorKind::Permission | ErrorKind::Provider) =>
            {
                Some(LOCATION_FAILURE_MESSAGE)
            }
            _ => None,
        }
    }
}

impl WeatherController {
    pub fn new(service: Arc<WeatherService>, settings: ControllerSettings) -> Self {
        let (state, _) = watch::channel(UiState::default());

        Self {
            inner: Arc::new(Inner {
                service,
                settings,
                state,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> UiState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.inner.state.subscribe()
    }

    pub async fn search(&self, city: &str) {
        let service = Arc::clone(&self.inner.service);
        let city = city.to_owned();
        let api_key = self.inner.settings.api_key.clone();

        self.drive(Action::Search, async move {
            Some(service.lookup_by_city(&city, &api_key).await)
        })
        .await;
    }

    pub async fn use_current_location(&self) {
        let service = Arc::clone(&self.inner.service);
        let ControllerSettings { api_key, fallback_city } = self.inner.settings.clone();

        self.drive(Action::CurrentLocation, async move {
            Some(service.lookup_current_location(&api_key, &fallback_city).await)
        })
        .await;
    }

    /// Repeat the last successful search. Leaves the state alone when no city
    /// has been saved yet.
    pub async fn load_last_searched(&self) {
        // The loading flag must not flicker when there is nothing to repeat.
        if self.inner.service.last_searched_city().is_none() {
            return;
        }

        let service = Arc::clone(&self.inner.service);
        let api_key = self.inner.settings.api_key.clone();

        self.drive(Action::Search, async move {
            service.load_last_searched_city(&api_key).await
        })
        .await;
    }

    /// Tear the controller down. Pending actions stop and never touch the
    /// state again.
    pub fn close(&self) {
        self.inner.shutdown.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Raise the loading flag and hand the lookup to a controller-owned task.
    ///
    /// The task settles the state even if the caller stops awaiting the action.
    async fn drive<F>(&self, action: Action, lookup: F)
    where
        F: Future<Output = Option<LookupOutcome>> + Send + 'static,
    {
        if self.is_closed() {
            return;
        }

        self.inner.state.send_modify(|state| state.is_loading = true);

        let inner = Arc::clone(&self.inner);
        let settle = tokio::spawn(async move { inner.settle(action, lookup).await });

        if let Err(err) = settle.await {
            error!(error = %err, "weather action task failed");
        }
    }
}

impl Inner {
    async fn settle<F>(&self, action: Action, lookup: F)
    where
        F: Future<Output = Option<LookupOutcome>> + Send + 'static,
    {
        // Separate task so a panicking lookup surfaces as a JoinError.
        let mut task = tokio::spawn(lookup);
        let joined = tokio::select! {
            _ = self.shutdown.cancelled() => {
                task.abort();
                return;
            }
            joined = &mut task => joined,
        };

        self.state.send_modify(|state| {
            match joined {
                Ok(Some(outcome)) => {
                    state.error_message = action.failure_message(&outcome).map(str::to_owned);
                    state.last_outcome = Some(outcome);
                }
                // Saved city vanished between the check and the lookup.
                Ok(None) => {}
                Err(err) => {
                    error!(error = %err, "weather lookup task failed");
                    state.error_message = Some(action.fault_message().to_owned());
                }
            }
            state.is_loading = false;
        });
    }
}
