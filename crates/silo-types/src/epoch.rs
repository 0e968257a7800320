use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Logical network time.
///
/// Epochs replace wall-clock deadlines for expiry decisions: a session that
/// expires at epoch `N` is unusable once the node's current epoch reaches
/// `N`. Epochs only move forward.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Epoch(pub u64);

impl Epoch {
    /// The genesis epoch.
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The following epoch (saturating).
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Debug for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Epoch({})", self.0)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Epoch {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Source of the node's current logical epoch.
pub trait EpochSource: Send + Sync {
    fn current_epoch(&self) -> Epoch;
}

/// Shared, lock-free epoch counter for the local node.
#[derive(Debug, Default)]
pub struct NetworkState {
    epoch: AtomicU64,
}

impl NetworkState {
    pub fn new(epoch: Epoch) -> Self {
        Self {
            epoch: AtomicU64::new(epoch.0),
        }
    }

    /// Move the epoch forward to `epoch`. Older values are ignored.
    pub fn set_epoch(&self, epoch: Epoch) -> Epoch {
        let prev = self.epoch.fetch_max(epoch.0, Ordering::AcqRel);
        Epoch(prev.max(epoch.0))
    }

    /// Advance to the next epoch and return it.
    pub fn tick(&self) -> Epoch {
        let prev = self.epoch.fetch_add(1, Ordering::AcqRel);
        Epoch(prev + 1)
    }
}

impl EpochSource for NetworkState {
    fn current_epoch(&self) -> Epoch {
        Epoch(self.epoch.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_value() {
        assert!(Epoch::new(1) < Epoch::new(2));
        assert!(Epoch::ZERO < Epoch::new(1));
    }

    #[test]
    fn next_saturates() {
        assert_eq!(Epoch::new(u64::MAX).next(), Epoch::new(u64::MAX));
        assert_eq!(Epoch::new(4).next(), Epoch::new(5));
    }

    #[test]
    fn tick_advances() {
        let state = NetworkState::new(Epoch::new(10));
        assert_eq!(state.tick(), Epoch::new(11));
        assert_eq!(state.current_epoch(), Epoch::new(11));
    }

    #[test]
    fn set_epoch_never_goes_back() {
        let state = NetworkState::new(Epoch::new(10));
        assert_eq!(state.set_epoch(Epoch::new(3)), Epoch::new(10));
        assert_eq!(state.current_epoch(), Epoch::new(10));
        assert_eq!(state.set_epoch(Epoch::new(12)), Epoch::new(12));
        assert_eq!(state.current_epoch(), Epoch::new(12));
    }

    #[test]
    fn serde_roundtrip() {
        let epoch = Epoch::new(77);
        let json = serde_json::to_string(&epoch).unwrap();
        assert_eq!(json, "77");
        let parsed: Epoch = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, epoch);
    }
}
