use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::Error;

#[async_trait]
pub trait BaseDbTrait: Send + Sync + Debug + 'static {
    /// Checks that the backing store is reachable.
    /// ---
    /// Called once at startup, before the server binds.
    async fn ping(&self) -> Result<(), Error>;
}
