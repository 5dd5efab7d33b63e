//! Device location resolution.
//!
//! Platforms expose the last known fix through a callback API guarded by a
//! permission check. [`PlatformLocationProvider`] turns that pair into a single
//! awaitable that resolves exactly once.

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{error, warn};

use crate::{error::LocationError, model::DeviceLocation};

/// Fine and coarse location grants, as reported by the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationPermissions {
    pub fine: bool,
    pub coarse: bool,
}

impl LocationPermissions {
    pub const GRANTED: Self = Self { fine: true, coarse: true };
    pub const DENIED: Self = Self { fine: false, coarse: false };

    pub fn any_granted(&self) -> bool {
        self.fine || self.coarse
    }
}

/// Synchronous view of the current permission state.
pub trait PermissionCheck: Send + Sync {
    fn location_permissions(&self) -> LocationPermissions;
}

impl PermissionCheck for LocationPermissions {
    fn location_permissions(&self) -> LocationPermissions {
        *self
    }
}

/// What a platform "last known location" query reports: a fix, no fix, or a
/// failure of the query itself.
pub type LastLocationReply = Result<Option<DeviceLocation>, String>;

pub type LastLocationCallback = Box<dyn FnOnce(LastLocationReply) + Send + 'static>;

/// Callback-style platform location query.
pub trait LastLocationSource: Send + Sync {
    /// Ask for the last known fix. `on_complete` is invoked at most once,
    /// possibly from another thread.
    fn request_last_location(&self, on_complete: LastLocationCallback);
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Result<DeviceLocation, LocationError>;
}

/// Bridges a [`PermissionCheck`] and a [`LastLocationSource`] into a
/// [`LocationProvider`].
///
/// Dropping the pending future drops the receiving half of the bridge, so a
/// callback that fires afterwards delivers nothing.
#[derive(Debug, Clone)]
pub struct PlatformLocationProvider<P, S> {
    permissions: P,
    source: S,
}

impl<P, S> PlatformLocationProvider<P, S>
where
    P: PermissionCheck,
    S: LastLocationSource,
{
    pub fn new(permissions: P, source: S) -> Self {
        Self { permissions, source }
    }
}

#[async_trait]
impl<P, S> LocationProvider for PlatformLocationProvider<P, S>
where
    P: PermissionCheck,
    S: LastLocationSource,
{
    async fn current_location(&self) -> Result<DeviceLocation, LocationError> {
        if !self.permissions.location_permissions().any_granted() {
            return Err(LocationError::PermissionDenied);
        }

        let (tx, rx) = oneshot::channel();
        self.source.request_last_location(Box::new(move |reply| {
            // The receiver is gone if the caller stopped waiting.
            let _ = tx.send(reply);
        }));

        match rx.await {
            Ok(Ok(Some(location))) => Ok(location),
            Ok(Ok(None)) => {
                warn!("Location is unavailable");
                Err(LocationError::Unavailable)
            }
            Ok(Err(cause)) => {
                error!(%cause, "Failed to fetch location");
                Err(LocationError::Provider(cause))
            }
            Err(_) => {
                error!("Location source dropped the request without answering");
                Err(LocationError::Provider(
                    "location request was dropped without a reply".to_string(),
                ))
            }
        }
    }
}

/// Answers every query with a fixed reply, delivered from a spawned task the
/// way a platform callback would be.
///
/// Must be queried from within a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLocationSource {
    fix: Option<DeviceLocation>,
}

impl StaticLocationSource {
    pub fn new(fix: Option<DeviceLocation>) -> Self {
        Self { fix }
    }
}

impl LastLocationSource for StaticLocationSource {
    fn request_last_location(&self, on_complete: LastLocationCallback) {
        let fix = self.fix;
        tokio::spawn(async move { on_complete(Ok(fix)) });
    }
}
