//! Capability interface for named fake value commands.

use crate::error::FakeError;
use rand::RngCore;
use serde_json::Value;

/// Produces scalar values for named commands such as `word`, `uuid` or
/// `randomFloat`.
///
/// Implementations dispatch through an explicit registry. The RNG is passed in
/// by the caller so generation stays reproducible under a fixed seed.
pub trait FakeValueProvider: Send + Sync {
    /// Invoke `command` with positional `arguments`.
    fn invoke(
        &self,
        command: &str,
        arguments: &[Value],
        rng: &mut dyn RngCore,
    ) -> Result<Value, FakeError>;

    /// Whether `command` is known to this provider.
    fn supports(&self, command: &str) -> bool;
}
