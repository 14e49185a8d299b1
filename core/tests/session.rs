//! Session lifecycle and last-writer-wins snapshot reconciliation.

use shopsim_core::{
    catalog::Catalog,
    engine::{SessionMode, SimEngine},
    session::{ParticipantId, SessionManager, SessionTransport},
    state::WorldState,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Captures every outbound call so tests can assert on delivery.
#[derive(Default)]
struct RecordingTransport {
    snapshots: Mutex<Vec<(String, ParticipantId, f64)>>, // (session, to, money)
    counts: Mutex<Vec<(String, usize)>>,
}

impl SessionTransport for RecordingTransport {
    fn state_changed(&self, session_id: &str, to: ParticipantId, snapshot: &WorldState) {
        self.snapshots
            .lock()
            .unwrap()
            .push((session_id.to_string(), to, snapshot.money));
    }

    fn member_count(&self, session_id: &str, count: usize) {
        self.counts.lock().unwrap().push((session_id.to_string(), count));
    }
}

fn shared_state() -> WorldState {
    WorldState::new_shared(&Catalog::builtin())
}

fn manager() -> SessionManager<Shared> {
    SessionManager::new(Shared::default())
}

/// Local newtype so the shared recorder can implement the foreign
/// `SessionTransport` trait without tripping the orphan rule.
#[derive(Clone, Default)]
struct Shared(Arc<RecordingTransport>);

impl SessionTransport for Shared {
    fn state_changed(&self, session_id: &str, to: ParticipantId, snapshot: &WorldState) {
        self.0.state_changed(session_id, to, snapshot)
    }

    fn member_count(&self, session_id: &str, count: usize) {
        self.0.member_count(session_id, count)
    }
}

#[test]
fn first_joiner_seeds_the_session() {
    let mgr = manager();
    let alice = Uuid::new_v4();

    let mut seed = shared_state();
    seed.money = 123.0;
    let adopted = mgr.join("room-1", alice, seed);

    assert_eq!(adopted.money, 123.0);
    assert_eq!(mgr.member_count("room-1"), 1);
}

#[test]
fn later_joiners_adopt_the_session_state_not_their_seed() {
    let mgr = manager();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let mut first = shared_state();
    first.money = 111.0;
    mgr.join("room-1", alice, first);

    let mut second = shared_state();
    second.money = 999.0;
    let adopted = mgr.join("room-1", bob, second);

    assert_eq!(adopted.money, 111.0, "joiner must adopt, not overwrite");
    assert_eq!(mgr.member_count("room-1"), 2);
}

#[test]
fn commit_broadcasts_to_everyone_except_the_origin() {
    let transport = Arc::new(RecordingTransport::default());
    let mgr = SessionManager::new(Shared(Arc::clone(&transport)));
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let carol = Uuid::new_v4();
    mgr.join("room-1", alice, shared_state());
    mgr.join("room-1", bob, shared_state());
    mgr.join("room-1", carol, shared_state());

    let mut snapshot = shared_state();
    snapshot.money = 777.0;
    mgr.commit("room-1", alice, snapshot).unwrap();

    let delivered = transport.snapshots.lock().unwrap();
    let recipients: Vec<ParticipantId> = delivered.iter().map(|(_, to, _)| *to).collect();
    assert_eq!(delivered.len(), 2);
    assert!(recipients.contains(&bob));
    assert!(recipients.contains(&carol));
    assert!(!recipients.contains(&alice), "origin must not echo");
    assert!(delivered.iter().all(|(_, _, money)| *money == 777.0));
}

#[test]
fn last_writer_wins() {
    let mgr = manager();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    mgr.join("room-1", alice, shared_state());
    mgr.join("room-1", bob, shared_state());

    let mut a = shared_state();
    a.money = 100.0;
    let mut b = shared_state();
    b.money = 200.0;
    mgr.commit("room-1", alice, a).unwrap();
    mgr.commit("room-1", bob, b).unwrap();

    assert_eq!(mgr.current_state("room-1").unwrap().money, 200.0);
}

#[test]
fn commit_to_unknown_session_is_an_error() {
    let mgr = manager();
    let err = mgr.commit("nowhere", Uuid::new_v4(), shared_state());
    assert!(err.is_err());
}

#[test]
fn leaving_updates_counts_and_the_last_leaver_discards_state() {
    let transport = Arc::new(RecordingTransport::default());
    let mgr = SessionManager::new(Shared(Arc::clone(&transport)));
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    mgr.join("room-1", alice, shared_state());
    mgr.join("room-1", bob, shared_state());

    mgr.leave(alice);
    assert_eq!(mgr.member_count("room-1"), 1);
    assert!(mgr.current_state("room-1").is_some());

    mgr.leave(bob);
    assert_eq!(mgr.member_count("room-1"), 0);
    assert!(mgr.current_state("room-1").is_none(), "state must be discarded");

    // Re-joining after a discard starts from the joiner's seed again.
    let mut fresh = shared_state();
    fresh.money = 5.0;
    let adopted = mgr.join("room-1", Uuid::new_v4(), fresh);
    assert_eq!(adopted.money, 5.0);
}

#[test]
fn leave_only_touches_sessions_the_participant_is_in() {
    let mgr = manager();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    mgr.join("room-1", alice, shared_state());
    mgr.join("room-2", bob, shared_state());

    mgr.leave(alice);
    assert_eq!(mgr.member_count("room-1"), 0);
    assert_eq!(mgr.member_count("room-2"), 1);
}

#[test]
fn tick_gate_follows_membership() {
    let mgr = manager();
    let alice = Uuid::new_v4();

    assert!(!mgr.should_tick("room-1"), "unknown session must not tick");
    mgr.join("room-1", alice, shared_state());
    assert!(mgr.should_tick("room-1"));
    mgr.leave(alice);
    assert!(!mgr.should_tick("room-1"), "empty session must not tick");
}

/// The driver loop pattern: gate every tick on membership so nobody is
/// charged simulated time while the session is empty.
#[test]
fn gated_driver_stops_time_when_the_session_empties() {
    let mgr = manager();
    let alice = Uuid::new_v4();
    let mut engine = SimEngine::new(
        "room-1".into(),
        1,
        Arc::new(Catalog::builtin()),
        SessionMode::Shared,
    );
    mgr.join("room-1", alice, engine.state().clone());

    for _ in 0..3 {
        if mgr.should_tick("room-1") {
            engine.tick();
        }
    }
    assert_eq!(engine.state().hour, 11);

    mgr.leave(alice);
    for _ in 0..3 {
        if mgr.should_tick("room-1") {
            engine.tick();
        }
    }
    assert_eq!(engine.state().hour, 11, "no time may pass for an empty session");
}

#[test]
fn sessions_are_isolated_from_each_other() {
    let mgr = manager();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let mut a = shared_state();
    a.money = 1.0;
    let mut b = shared_state();
    b.money = 2.0;
    mgr.join("room-1", alice, a);
    mgr.join("room-2", bob, b);

    let mut update = shared_state();
    update.money = 42.0;
    mgr.commit("room-1", alice, update).unwrap();

    assert_eq!(mgr.current_state("room-1").unwrap().money, 42.0);
    assert_eq!(mgr.current_state("room-2").unwrap().money, 2.0);
}
