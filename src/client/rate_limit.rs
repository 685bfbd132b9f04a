//! Outbound request throttling
//!
//! Every keystroke in a search box can become a registry request. A direct
//! governor limiter caps the rate at which they actually leave the process.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;

/// Shared request limiter for one upstream
#[derive(Clone)]
pub struct RequestLimiter {
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    per_second: u32,
}

impl RequestLimiter {
    /// Create a limiter allowing `per_second` requests; zero is treated as one.
    pub fn per_second(per_second: u32) -> Self {
        let rate = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(rate))),
            per_second: rate.get(),
        }
    }

    /// Wait until a request may be sent
    pub async fn until_ready(&self) {
        if self.limiter.check().is_err() {
            debug!("Rate limit reached ({}/s), waiting", self.per_second);
            self.limiter.until_ready().await;
        }
    }

    pub fn rate(&self) -> u32 {
        self.per_second
    }
}

impl std::fmt::Debug for RequestLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLimiter")
            .field("per_second", &self.per_second)
            .finish()
    }
}
