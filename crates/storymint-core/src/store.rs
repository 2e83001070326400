//! Ordered message store for the active session.
//!
//! Append-only except for targeted registration-status patches.  Patching an
//! unknown id is a silent no-op: a registration completion may race a UI
//! action that already dropped the turn, and that race is tolerated by
//! contract rather than treated as an error.

use tracing::{debug, warn};

use crate::turn::{ChatTurn, RegistrationRecord, RegistrationState, Role, TurnId};

/// Targeted update to one turn's registration lifecycle.
///
/// A [`RegistrationRecord`] can only travel together with the `Confirmed`
/// transition, which keeps the "record iff confirmed" invariant structural.
#[derive(Debug, Clone)]
pub enum TurnPatch {
    SetPending,
    SetConfirmed(RegistrationRecord),
    SetFailed,
}

impl TurnPatch {
    fn target_state(&self) -> RegistrationState {
        match self {
            TurnPatch::SetPending => RegistrationState::Pending,
            TurnPatch::SetConfirmed(_) => RegistrationState::Confirmed,
            TurnPatch::SetFailed => RegistrationState::Failed,
        }
    }
}

/// The ordered sequence of [`ChatTurn`]s for one session.
#[derive(Debug, Default)]
pub struct MessageStore {
    turns: Vec<ChatTurn>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end.  Never reorders.
    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// Apply `patch` to the turn with the given id.
    ///
    /// Returns `true` when the patch was applied.  Unknown ids and illegal
    /// registration transitions are dropped without touching any state.
    pub fn update(&mut self, id: TurnId, patch: TurnPatch) -> bool {
        let Some(turn) = self.turns.iter_mut().find(|t| t.id == id) else {
            debug!(turn = %id, "patch for unknown turn ignored");
            return false;
        };
        let next = patch.target_state();
        if !turn.registration.may_become(next) {
            warn!(
                turn = %id,
                from = %turn.registration,
                to = %next,
                "illegal registration transition ignored"
            );
            return false;
        }
        match patch {
            TurnPatch::SetPending => turn.registration = RegistrationState::Pending,
            TurnPatch::SetConfirmed(record) => {
                turn.registration = RegistrationState::Confirmed;
                turn.record = Some(record);
            }
            TurnPatch::SetFailed => turn.registration = RegistrationState::Failed,
        }
        true
    }

    pub fn find(&self, id: TurnId) -> Option<&ChatTurn> {
        self.turns.iter().find(|t| t.id == id)
    }

    /// The nearest user turn preceding `id`, scanning backward from the
    /// turn's position toward the start of history.
    ///
    /// `None` when `id` is unknown or no user turn precedes it (e.g. the
    /// assistant turn is first in history).
    pub fn last_user_turn_before(&self, id: TurnId) -> Option<&ChatTurn> {
        let pos = self.turns.iter().position(|t| t.id == id)?;
        self.turns[..pos].iter().rev().find(|t| t.role == Role::User)
    }

    /// Ordered view over all turns.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;

    fn record() -> RegistrationRecord {
        RegistrationRecord {
            title: "t".into(),
            confirmed_at: Utc::now(),
            chain_reference: "0xabc".into(),
        }
    }

    #[test]
    fn append_preserves_call_order() {
        let mut store = MessageStore::new();
        for i in 0..50u64 {
            let turn = if i % 2 == 0 {
                ChatTurn::user(TurnId(i), format!("u{i}"), None)
            } else {
                ChatTurn::assistant(TurnId(i), format!("a{i}"))
            };
            store.append(turn);
        }
        let ids: Vec<u64> = store.turns().iter().map(|t| t.id.0).collect();
        assert_eq!(ids, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut store = MessageStore::new();
        store.append(ChatTurn::assistant(TurnId(1), "a".into()));
        assert!(!store.update(TurnId(999), TurnPatch::SetPending));
        assert_eq!(store.find(TurnId(1)).unwrap().registration, RegistrationState::Unregistered);
    }

    #[test]
    fn update_rejects_backward_transitions() {
        let mut store = MessageStore::new();
        store.append(ChatTurn::assistant(TurnId(1), "a".into()));

        // Straight to confirmed skips pending: rejected.
        assert!(!store.update(TurnId(1), TurnPatch::SetConfirmed(record())));
        assert!(store.find(TurnId(1)).unwrap().record.is_none());

        assert!(store.update(TurnId(1), TurnPatch::SetPending));
        assert!(store.update(TurnId(1), TurnPatch::SetConfirmed(record())));

        // Confirmed is terminal.
        assert!(!store.update(TurnId(1), TurnPatch::SetPending));
        assert!(!store.update(TurnId(1), TurnPatch::SetFailed));
        let turn = store.find(TurnId(1)).unwrap();
        assert_eq!(turn.registration, RegistrationState::Confirmed);
        assert!(turn.record.is_some());
    }

    #[test]
    fn record_present_iff_confirmed() {
        let mut store = MessageStore::new();
        store.append(ChatTurn::assistant(TurnId(1), "a".into()));
        store.append(ChatTurn::assistant(TurnId(2), "b".into()));

        store.update(TurnId(1), TurnPatch::SetPending);
        store.update(TurnId(1), TurnPatch::SetFailed);
        store.update(TurnId(2), TurnPatch::SetPending);
        store.update(TurnId(2), TurnPatch::SetConfirmed(record()));

        for turn in store.turns() {
            assert_eq!(
                turn.record.is_some(),
                turn.registration == RegistrationState::Confirmed,
                "turn {}",
                turn.id
            );
        }
    }

    #[test]
    fn last_user_turn_before_finds_nearest_preceding() {
        let mut store = MessageStore::new();
        store.append(ChatTurn::user(TurnId(1), "A".into(), None));
        store.append(ChatTurn::assistant(TurnId(2), "B".into()));
        store.append(ChatTurn::user(TurnId(3), "C".into(), None));
        store.append(ChatTurn::assistant(TurnId(4), "D".into()));

        assert_eq!(store.last_user_turn_before(TurnId(2)).unwrap().id, TurnId(1));
        assert_eq!(store.last_user_turn_before(TurnId(4)).unwrap().id, TurnId(3));
    }

    #[test]
    fn last_user_turn_before_handles_missing_predecessor() {
        let mut store = MessageStore::new();
        store.append(ChatTurn::assistant(TurnId(1), "first".into()));
        assert!(store.last_user_turn_before(TurnId(1)).is_none());
        assert!(store.last_user_turn_before(TurnId(42)).is_none());
    }
}
