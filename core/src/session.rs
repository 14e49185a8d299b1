//! The session synchronizer — one authoritative world per session id,
//! mirrored across every connected participant.
//!
//! Reconciliation is deliberately last-writer-wins at snapshot
//! granularity: a committed snapshot replaces the session state
//! wholesale and is rebroadcast to every other member. There is no
//! operation-level merge; two participants committing in the same
//! interval race, and the later snapshot wins. The broadcast seam is
//! the SessionTransport trait so a sequencer could replace it without
//! touching the action API.
//!
//! Lifecycle: EMPTY -> ACTIVE on first join; ACTIVE while members > 0;
//! back to EMPTY (state discarded) when the last member leaves.
//! Sessions are ephemeral — nothing survives the process.

use crate::error::{SimError, SimResult};
use crate::state::WorldState;
use crate::types::SessionId;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

/// One connected participant, as known to the synchronizer.
pub type ParticipantId = Uuid;

/// Outbound side of the session event channel. The transport is an
/// external collaborator; per-pair delivery is assumed FIFO.
pub trait SessionTransport: Send + Sync {
    /// A committed snapshot to deliver to `to`.
    fn state_changed(&self, session_id: &str, to: ParticipantId, snapshot: &WorldState);

    /// Membership size changed; delivered to every member. Drivers use
    /// this to gate the tick loop (zero members = no time advance).
    fn member_count(&self, session_id: &str, count: usize);
}

struct Session {
    state: WorldState,
    members: HashSet<ParticipantId>,
}

/// Owns the session registry. All transitions (join, commit, leave)
/// take the registry lock, so membership and state never tear.
pub struct SessionManager<T: SessionTransport> {
    sessions: Mutex<HashMap<SessionId, Session>>,
    transport: T,
}

impl<T: SessionTransport> SessionManager<T> {
    pub fn new(transport: T) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            transport,
        }
    }

    /// Join a session. The first participant seeds it with their own
    /// initial snapshot; later participants receive the session's
    /// current state. Returns the snapshot the joiner must adopt.
    pub fn join(
        &self,
        session_id: &str,
        participant: ParticipantId,
        seed_snapshot: WorldState,
    ) -> WorldState {
        let mut sessions = self.sessions.lock().expect("session registry poisoned");
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                log::info!("session {session_id}: created by {participant}");
                Session {
                    state: seed_snapshot,
                    members: HashSet::new(),
                }
            });
        session.members.insert(participant);
        let count = session.members.len();
        let snapshot = session.state.clone();
        drop(sessions);

        log::debug!("session {session_id}: {participant} joined, {count} member(s)");
        self.transport.member_count(session_id, count);
        snapshot
    }

    /// Commit a participant's snapshot: last writer wins, broadcast to
    /// every member except the origin.
    pub fn commit(
        &self,
        session_id: &str,
        origin: ParticipantId,
        snapshot: WorldState,
    ) -> SimResult<()> {
        let mut sessions = self.sessions.lock().expect("session registry poisoned");
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SimError::SessionNotFound { id: session_id.to_string() })?;
        session.state = snapshot;
        let recipients: Vec<ParticipantId> = session
            .members
            .iter()
            .copied()
            .filter(|m| *m != origin)
            .collect();
        let state = session.state.clone();
        drop(sessions);

        for member in recipients {
            self.transport.state_changed(session_id, member, &state);
        }
        Ok(())
    }

    /// Remove a participant from every session; discard sessions whose
    /// membership becomes empty.
    pub fn leave(&self, participant: ParticipantId) {
        let mut sessions = self.sessions.lock().expect("session registry poisoned");
        let mut counts: Vec<(SessionId, usize)> = Vec::new();
        sessions.retain(|session_id, session| {
            if !session.members.remove(&participant) {
                return true;
            }
            if session.members.is_empty() {
                log::info!("session {session_id}: last member left, state discarded");
                false
            } else {
                counts.push((session_id.clone(), session.members.len()));
                true
            }
        });
        drop(sessions);

        for (session_id, count) in counts {
            self.transport.member_count(&session_id, count);
        }
    }

    /// Tick gate for drivers: time advances only while the session has
    /// at least one member. Check this before every tick.
    pub fn should_tick(&self, session_id: &str) -> bool {
        self.member_count(session_id) > 0
    }

    /// Current membership size; 0 for unknown sessions. A session with
    /// zero members must never be ticked.
    pub fn member_count(&self, session_id: &str) -> usize {
        self.sessions
            .lock()
            .expect("session registry poisoned")
            .get(session_id)
            .map(|s| s.members.len())
            .unwrap_or(0)
    }

    /// The session's current snapshot, if the session exists.
    pub fn current_state(&self, session_id: &str) -> Option<WorldState> {
        self.sessions
            .lock()
            .expect("session registry poisoned")
            .get(session_id)
            .map(|s| s.state.clone())
    }
}
