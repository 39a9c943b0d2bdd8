//! Check Rate Limit Use Case

use platform::rate_limit::{Clock, RateLimitPolicy};
use std::sync::Arc;

use crate::domain::entities::Decision;
use crate::domain::repository::CounterStore;
use crate::domain::services::decide;
use crate::domain::value_objects::Identity;
use crate::error::StoreResult;

/// Record a request for an identity and decide whether it may proceed
pub struct CheckRateLimitUseCase<S>
where
    S: CounterStore,
{
    store: Arc<S>,
    policy: Arc<RateLimitPolicy>,
    clock: Arc<dyn Clock>,
}

impl<S> CheckRateLimitUseCase<S>
where
    S: CounterStore + Send + Sync,
{
    pub fn new(store: Arc<S>, policy: Arc<RateLimitPolicy>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }

    pub async fn execute(&self, identity: &Identity) -> StoreResult<Decision> {
        let now = self.clock.now();

        let snapshot = self
            .store
            .increment_and_read(identity, now, &self.policy)
            .await?;

        Ok(decide(snapshot, &self.policy, self.store.backend()))
    }
}
