//! Debounced autosave scheduling.
//!
//! The scheduler never touches storage. It decides *when* a snapshot should
//! be written and hands out [`SaveJob`]s; whoever performs the write reports
//! back through [`AutoSaveScheduler::complete`]. At most one job is out at a
//! time, and requests that arrive meanwhile collapse into a single pending
//! snapshot.

use chrono::{DateTime, TimeDelta, Utc};
use game_core::{GameState, Position};

use crate::repository::RepositoryError;
use crate::snapshot::GameSnapshot;

/// The parts of a state whose change makes a save worthwhile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveFingerprint {
    pub move_count: u64,
    pub position: Position,
    pub hp: u32,
    pub monsters: usize,
    pub kills: u32,
    pub hide_charges: u32,
    pub jaunt_charges: u32,
    /// Completed sub-games plus created waypoints.
    pub milestones: usize,
}

impl SaveFingerprint {
    pub fn of(state: &GameState) -> Self {
        Self {
            move_count: state.turn.move_count,
            position: state.player.position,
            hp: state.player.hp,
            monsters: state.monsters.len(),
            kills: state.run.monsters_killed,
            hide_charges: state.player.hide.charges,
            jaunt_charges: state.player.jaunt.charges,
            milestones: state
                .progress
                .sub_games_completed
                .values()
                .filter(|done| **done)
                .count()
                + state.progress.waypoints_created.len(),
        }
    }
}

/// A snapshot ready to be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveJob {
    pub id: u64,
    pub slot: String,
    pub snapshot: GameSnapshot,
    pub fingerprint: SaveFingerprint,
}

#[derive(Clone, Debug)]
struct PendingSave {
    snapshot: GameSnapshot,
    fingerprint: SaveFingerprint,
    due: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AutoSaveScheduler {
    slot: String,
    throttle: TimeDelta,
    pending: Option<PendingSave>,
    in_flight: Option<u64>,
    last_written: Option<SaveFingerprint>,
    next_job: u64,
}

impl AutoSaveScheduler {
    pub fn new(slot: impl Into<String>, throttle: TimeDelta) -> Self {
        Self {
            slot: slot.into(),
            throttle,
            pending: None,
            in_flight: None,
            last_written: None,
            next_job: 0,
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn throttle(&self) -> TimeDelta {
        self.throttle
    }

    /// A write is out and has not been completed yet.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending snapshot becomes due, if there is one.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Asks for `state` to be saved `throttle` from now.
    ///
    /// A request made while another is pending replaces its snapshot but
    /// keeps the earlier due time. Returns whether a save is now pending
    /// for this state.
    pub fn request(&mut self, state: &GameState, now: DateTime<Utc>) -> bool {
        if !Self::is_saveable(state) {
            return false;
        }
        let fingerprint = SaveFingerprint::of(state);
        if self.pending.is_none() && self.last_written == Some(fingerprint) {
            tracing::trace!("autosave skipped, nothing persistent changed");
            return false;
        }

        let snapshot = GameSnapshot::capture(state, now);
        match &mut self.pending {
            Some(pending) => {
                pending.snapshot = snapshot;
                pending.fingerprint = fingerprint;
            }
            None => {
                self.pending = Some(PendingSave {
                    snapshot,
                    fingerprint,
                    due: now + self.throttle,
                });
            }
        }
        true
    }

    /// Hands out the pending snapshot once it is due and no write is out.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Option<SaveJob> {
        if self.is_busy() || self.pending.as_ref().is_none_or(|p| p.due > now) {
            return None;
        }
        let pending = self.pending.take()?;
        Some(self.start_job(pending.snapshot, pending.fingerprint))
    }

    /// Saves `state` immediately, skipping the throttle.
    ///
    /// Still refused while a write is out; the request is then left pending
    /// and due at once. A pending autosave is superseded.
    pub fn force(&mut self, state: &GameState, now: DateTime<Utc>) -> Option<SaveJob> {
        if !Self::is_saveable(state) {
            return None;
        }
        let snapshot = GameSnapshot::capture(state, now);
        let fingerprint = SaveFingerprint::of(state);
        if self.is_busy() {
            self.pending = Some(PendingSave {
                snapshot,
                fingerprint,
                due: now,
            });
            return None;
        }
        self.pending = None;
        Some(self.start_job(snapshot, fingerprint))
    }

    /// Clears the busy flag for `job`. A failed write leaves the fingerprint
    /// untouched so the next request is not suppressed.
    pub fn complete(&mut self, job: &SaveJob, result: &Result<(), RepositoryError>) {
        if self.in_flight != Some(job.id) {
            tracing::warn!(job = job.id, in_flight = ?self.in_flight, "completion for a job that is not in flight");
            return;
        }
        self.in_flight = None;
        match result {
            Ok(()) => {
                self.last_written = Some(job.fingerprint);
                tracing::info!(slot = %job.slot, moves = job.fingerprint.move_count, "autosaved");
            }
            Err(error) => tracing::warn!(slot = %job.slot, %error, "autosave failed"),
        }
    }

    /// Drops the pending request. A write already out is unaffected.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("pending autosave cancelled");
        }
    }

    /// Marks `state` as what storage already holds, e.g. right after a load.
    pub fn mark_written(&mut self, state: &GameState) {
        self.last_written = Some(SaveFingerprint::of(state));
    }

    /// Dead runs and runs with no turns taken are never saved.
    pub fn is_saveable(state: &GameState) -> bool {
        !state.is_game_over() && state.turn.move_count > 0
    }

    fn start_job(&mut self, snapshot: GameSnapshot, fingerprint: SaveFingerprint) -> SaveJob {
        self.next_job += 1;
        self.in_flight = Some(self.next_job);
        SaveJob {
            id: self.next_job,
            slot: self.slot.clone(),
            snapshot,
            fingerprint,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use game_core::GameConfig;

    use super::*;

    fn t(ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + TimeDelta::milliseconds(ms)
    }

    fn state_after(moves: u64) -> GameState {
        let mut state = GameState::new(&GameConfig::default(), 1);
        state.turn.move_count = moves;
        state.player.position = Position::new(300, 200 + moves as i32);
        state
    }

    fn scheduler() -> AutoSaveScheduler {
        AutoSaveScheduler::new("autosave", TimeDelta::milliseconds(500))
    }

    #[test]
    fn overlapping_requests_collapse_into_one_job() {
        let mut autosave = scheduler();
        assert!(autosave.request(&state_after(1), t(0)));
        assert!(autosave.request(&state_after(2), t(200)));
        assert!(autosave.request(&state_after(3), t(400)));
        assert_eq!(autosave.next_due(), Some(t(500)));

        assert!(autosave.take_due(t(499)).is_none());
        let job = autosave.take_due(t(500)).unwrap();
        assert_eq!(job.snapshot.state.turn.move_count, 3, "latest state wins");
        assert!(autosave.take_due(t(10_000)).is_none());
    }

    #[test]
    fn busy_flag_holds_back_the_next_job() {
        let mut autosave = scheduler();
        autosave.request(&state_after(1), t(0));
        let job = autosave.take_due(t(500)).unwrap();
        assert!(autosave.is_busy());

        autosave.request(&state_after(2), t(600));
        assert!(autosave.take_due(t(2_000)).is_none(), "still writing");
        assert!(autosave.force(&state_after(3), t(2_000)).is_none());

        autosave.complete(&job, &Ok(()));
        assert!(!autosave.is_busy());
        let next = autosave.take_due(t(2_000)).unwrap();
        assert_eq!(next.snapshot.state.turn.move_count, 3);
    }

    #[test]
    fn dead_or_fresh_runs_are_not_saved() {
        let mut autosave = scheduler();
        assert!(!autosave.request(&state_after(0), t(0)));

        let config = GameConfig::default();
        let mut dead = state_after(4);
        dead.enter_game_over("abhuman", "Slain.", &config);
        assert!(!autosave.request(&dead, t(0)));
        assert!(autosave.force(&dead, t(0)).is_none());
        assert!(!autosave.has_pending());
    }

    #[test]
    fn unchanged_fingerprint_is_not_saved_twice() {
        let mut autosave = scheduler();
        let state = state_after(5);
        autosave.request(&state, t(0));
        let job = autosave.take_due(t(500)).unwrap();
        autosave.complete(&job, &Ok(()));

        let mut cosmetic = state.clone();
        cosmetic.ui.inventory_open = true;
        assert!(!autosave.request(&cosmetic, t(1_000)));

        let mut milestone = state.clone();
        milestone
            .progress
            .sub_games_completed
            .insert("tesseract".into(), true);
        assert!(autosave.request(&milestone, t(1_000)));
        assert!(autosave.request(&state_after(6), t(1_000)));
    }

    #[test]
    fn failed_write_does_not_suppress_the_retry() {
        let mut autosave = scheduler();
        let state = state_after(5);
        let job = autosave.force(&state, t(0)).unwrap();
        let failure = Err(RepositoryError::Io(std::io::Error::other("disk full")));
        autosave.complete(&job, &failure);

        assert!(autosave.request(&state, t(100)));
    }

    #[test]
    fn cancel_drops_the_pending_request() {
        let mut autosave = scheduler();
        autosave.request(&state_after(1), t(0));
        autosave.cancel();
        assert!(autosave.take_due(t(1_000)).is_none());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut autosave = scheduler();
        let first = autosave.force(&state_after(1), t(0)).unwrap();
        let mut forged = first.clone();
        forged.id += 7;
        autosave.complete(&forged, &Ok(()));
        assert!(autosave.is_busy());
        autosave.complete(&first, &Ok(()));
        assert!(!autosave.is_busy());
    }
}
