use super::error::{StoreError, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HydrationState {
    #[default]
    Uninitialized,
    Hydrating,
    Valid,
    ResetToDefault,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationEvent {
    Begin,
    Validated,
    Corrupted,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationTransition {
    pub from: HydrationState,
    pub event: HydrationEvent,
    pub to: HydrationState,
}

impl HydrationTransition {
    pub const fn new(from: HydrationState, event: HydrationEvent, to: HydrationState) -> Self {
        Self { from, event, to }
    }
}

/// `Uninitialized → Hydrating → { Valid | ResetToDefault } → Ready`.
///
/// `Ready` accepts `Begin` again so a store can be re-hydrated.
#[derive(Debug)]
pub struct HydrationMachine {
    state: HydrationState,
    transition_history: Vec<HydrationTransition>,
}

impl HydrationMachine {
    pub fn new() -> Self {
        Self {
            state: HydrationState::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> HydrationState {
        self.state
    }

    pub fn history(&self) -> &[HydrationTransition] {
        &self.transition_history
    }

    pub fn can_transition(&self, event: HydrationEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: HydrationEvent) -> Option<HydrationState> {
        use HydrationEvent::*;
        match (self.state, event) {
            (HydrationState::Uninitialized, Begin) => Some(HydrationState::Hydrating),
            (HydrationState::Ready, Begin) => Some(HydrationState::Hydrating),
            (HydrationState::Hydrating, Validated) => Some(HydrationState::Valid),
            (HydrationState::Hydrating, Corrupted) => Some(HydrationState::ResetToDefault),
            (HydrationState::Valid, Finish) => Some(HydrationState::Ready),
            (HydrationState::ResetToDefault, Finish) => Some(HydrationState::Ready),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: HydrationEvent) -> StoreResult<HydrationState> {
        tracing::debug!(from = ?self.state, event = ?event, "request hydration transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid hydration transition requested");
            StoreError::InvalidTransition { from, event }
        })?;

        self.transition_history
            .push(HydrationTransition::new(self.state, event, next));
        self.state = next;

        Ok(self.state)
    }
}

impl Default for HydrationMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HydrationMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HydrationState::{:?}", self.state)
    }
}
