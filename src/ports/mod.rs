// Ports - Interface definitions (contracts)

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for the shared progress map
///
/// Implementations must be safe for concurrent `get`/`set` without callers
/// taking any lock.
pub trait ProgressPort: Send + Sync {
    /// Store `value` for `identity`, replacing whatever was there
    fn set(&self, identity: &VideoIdentity, value: f64);

    /// Current value for `identity`, 0.0 when unknown
    fn get(&self, identity: &VideoIdentity) -> f64;

    /// All known entries
    fn snapshot(&self) -> Vec<(VideoIdentity, f64)>;
}

/// Port for launching the external trim tool
#[async_trait]
pub trait TrimPort: Send + Sync {
    /// Start the tool for `invocation`
    async fn spawn(&self, invocation: &TrimInvocation) -> Result<Box<dyn TrimProcess>, DomainError>;
}

/// A running trim tool
#[async_trait]
pub trait TrimProcess: Send {
    /// Next line of combined stdout/stderr, `None` once both streams closed
    async fn next_line(&mut self) -> Option<String>;

    /// Wait for exit and return the exit code (`None` when killed by a signal)
    async fn wait(&mut self) -> Result<Option<i32>, DomainError>;

    /// Terminate the tool and reap it
    async fn kill(&mut self) -> Result<(), DomainError>;
}
