//! request state and supersession tokens
//!
//! every async operation captures a [`Generation`] when it starts. the core
//! applies its completion only if that generation is still the current one,
//! so results that arrive out of order are dropped.

use serde::{Deserialize, Serialize};

/// token captured by an async operation at start
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Generation(u64);

/// monotonic source of generations for one kind of operation
#[derive(Clone, Debug, Default)]
pub struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// start a new operation, superseding all earlier ones
    pub fn advance(&mut self) -> Generation {
        self.current = Generation(self.current.0 + 1);
        self.current
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.current == generation
    }
}

/// lifecycle of one independent operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestState<T, E = String> {
    Idle,
    Pending,
    Resolved(T),
    Failed(E),
}

impl<T, E> Default for RequestState<T, E> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<T, E> RequestState<T, E> {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn resolved(&self) -> Option<&T> {
        match self {
            RequestState::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn failed(&self) -> Option<&E> {
        match self {
            RequestState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl<T, E> From<Result<T, E>> for RequestState<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => RequestState::Resolved(value),
            Err(error) => RequestState::Failed(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_supersedes() {
        let mut counter = GenerationCounter::new();
        let first = counter.advance();
        let second = counter.advance();
        assert_ne!(first, second);
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
    }

    #[test]
    fn test_request_state_accessors() {
        let ok: RequestState<u32> = Ok(7).into();
        assert_eq!(ok.resolved(), Some(&7));
        assert!(ok.failed().is_none());

        let err: RequestState<u32> = Err("boom".to_string()).into();
        assert_eq!(err.failed().map(String::as_str), Some("boom"));
        assert!(RequestState::<u32>::Pending.is_pending());
    }
}
