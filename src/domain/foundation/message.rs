//! Message identity for bus routing.
//!
//! Commands and events are closed enums. Each enum is paired with a
//! fieldless `Kind` enum naming its variants; the kind is the routing key
//! used by the bus registries.

use std::fmt;
use std::hash::Hash;

/// A message that can be routed by kind.
pub trait Message: Send + Sync + 'static {
    /// Closed set of kinds this message family can take.
    type Kind: MessageKind;

    /// Returns the routing tag for this message instance.
    fn kind(&self) -> Self::Kind;
}

/// A routing tag: cheap to copy, hashable and printable.
pub trait MessageKind:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Stable wire name of this kind.
    fn name(&self) -> &'static str;
}
