//! Counter abstraction.
//!
//! A counter declares which gNMI paths to subscribe to and converts a decoded
//! [`FlatMap`] into a typed statistics record, accumulating every record it
//! is given. A client session is bound to exactly one counter for its whole
//! lifetime.

use crate::decode::FlatMap;
use crate::error::DecodeResult;

/// Capability set every subscribable counter provides.
pub trait Counter: Send + 'static {
    /// Record produced from one notification.
    type Stat: Clone + Send + std::fmt::Debug + 'static;

    /// Counter family tag. The session only accepts [`crate::pbr::PBR_TAG`].
    fn tag(&self) -> &str;

    /// Origin string responses must carry in their prefix.
    fn path_origin(&self) -> &str;

    /// Subscription path strings, one per configured key, in order.
    fn subscription_paths(&self) -> Vec<String>;

    /// Builds a record from a decoded notification.
    ///
    /// Absent keys default to zero or empty. A present but non-numeric value
    /// for a numeric field fails with [`crate::DecodeError::Conversion`].
    fn from_map(&self, map: &FlatMap) -> DecodeResult<Self::Stat>;

    /// Appends a record to the accumulated sequence.
    fn accumulate(&mut self, stat: Self::Stat);

    /// Records accumulated so far, in arrival order.
    fn stats(&self) -> &[Self::Stat];
}
