//! Stale-response guard.
//!
//! A [`Slot`] holds the latest result for one view position (the property
//! list of the selected type, the values of the open entity, ...). Every
//! fetch takes a [`Ticket`] first; when the fetch completes, its result is
//! applied only if no newer ticket was issued since and the ticket's input
//! is still the slot's current input.

use parking_lot::Mutex;

/// Proof of which request a completion belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    generation: u64,
    input: K,
}

impl<K> Ticket<K> {
    pub fn input(&self) -> &K {
        &self.input
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct SlotState<K, T> {
    generation: u64,
    input: Option<K>,
    value: Option<T>,
}

/// Latest-wins holder for one asynchronously loaded value.
pub struct Slot<K, T> {
    state: Mutex<SlotState<K, T>>,
}

impl<K, T> Default for Slot<K, T> {
    fn default() -> Self {
        Self { state: Mutex::new(SlotState { generation: 0, input: None, value: None }) }
    }
}

impl<K: Clone + PartialEq, T: Clone> Slot<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `input`. Supersedes every earlier ticket.
    pub fn begin(&self, input: K) -> Ticket<K> {
        let mut state = self.state.lock();
        state.generation += 1;
        state.input = Some(input.clone());
        Ticket { generation: state.generation, input }
    }

    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        let state = self.state.lock();
        state.generation == ticket.generation && state.input.as_ref() == Some(&ticket.input)
    }

    /// Store `value` if `ticket` is still current. Returns whether it was applied.
    pub fn complete(&self, ticket: &Ticket<K>, value: T) -> bool {
        let mut state = self.state.lock();
        if state.generation != ticket.generation || state.input.as_ref() != Some(&ticket.input) {
            tracing::debug!(
                ticket = ticket.generation,
                current = state.generation,
                "discarding stale response"
            );
            return false;
        }
        state.value = Some(value);
        true
    }

    /// Forget the current value and invalidate outstanding tickets.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.input = None;
        state.value = None;
    }

    pub fn get(&self) -> Option<T> {
        self.state.lock().value.clone()
    }

    pub fn current_input(&self) -> Option<K> {
        self.state.lock().input.clone()
    }
}
