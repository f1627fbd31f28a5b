use std::sync::Arc;
use std::time::Duration;

use crate::provider::{InputShape, Provider, ProviderError, ProviderFuture, ProviderRequest};
use crate::ProviderId;

/// Caps a single provider call. An elapsed call fails with a timeout error,
/// which the chain treats like any other provider failure.
#[derive(Clone)]
pub struct TimeoutProvider {
    inner: Arc<dyn Provider>,
    timeout: Duration,
}

impl TimeoutProvider {
    pub fn new(inner: Arc<dyn Provider>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Provider for TimeoutProvider {
    fn id(&self) -> ProviderId {
        self.inner.id()
    }

    fn inputs(&self) -> InputShape {
        self.inner.inputs()
    }

    fn fetch<'a>(&'a self, request: ProviderRequest) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            match tokio::time::timeout(self.timeout, self.inner.fetch(request)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::timeout(
                    u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                )),
            }
        })
    }
}
