use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
};
use std::time::Duration;

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Spaces request starts at least `delay` apart: one cell per period,
/// no burst. The first request goes out immediately. A zero delay
/// disables pacing.
pub struct Pacer {
    limiter: Option<Limiter>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            limiter: Quota::with_period(delay).map(RateLimiter::direct),
        }
    }

    /// Waits for the next request slot and claims it.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Claims the next slot only if it is already free.
    #[cfg(test)]
    fn try_claim(&self) -> bool {
        self.limiter
            .as_ref()
            .is_none_or(|limiter| limiter.check().is_ok())
    }
}
