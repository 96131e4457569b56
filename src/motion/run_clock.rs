//! Active-time accounting for a run.
//!
//! Elapsed active time is wall-clock time since the run started minus every
//! paused interval.

use crate::config::Millis;

/// Run start time and pause bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunClock {
    /// When the run started.
    started_at: Millis,
    /// Set while paused.
    paused_at: Option<Millis>,
    /// Sum of all completed pauses.
    paused_total: Millis,
    /// Set once the run reached its target.
    finished_at: Option<Millis>,
}

impl RunClock {
    /// Start a run at `now` with no pause history.
    pub fn start(now: Millis) -> Self {
        Self {
            started_at: now,
            paused_at: None,
            paused_total: Millis(0),
            finished_at: None,
        }
    }

    /// Record the start of a pause. Returns `false` if already paused.
    pub fn pause(&mut self, now: Millis) -> bool {
        if self.paused_at.is_some() {
            return false;
        }
        self.paused_at = Some(now);
        true
    }

    /// End the current pause and fold its length into the paused total.
    ///
    /// Returns the pause length, or `None` if not paused.
    pub fn resume(&mut self, now: Millis) -> Option<Millis> {
        let paused_at = self.paused_at.take()?;
        let span = now.since(paused_at);
        self.paused_total += span;
        Some(span)
    }

    /// Freeze the active time at `now`; later pauses and resumes are ignored.
    pub fn finish(&mut self, now: Millis) {
        if self.finished_at.is_none() {
            self.finished_at = Some(self.paused_at.unwrap_or(now));
        }
    }

    /// Active time at `now`. Frozen at the pause instant while paused and at
    /// the finish instant once finished.
    pub fn elapsed_active(&self, now: Millis) -> Millis {
        let end = self.finished_at.or(self.paused_at).unwrap_or(now);
        end.since(self.started_at).since(self.paused_total)
    }

    /// When the run started.
    #[inline]
    pub fn started_at(&self) -> Millis {
        self.started_at
    }

    /// Total time spent paused so far, excluding a pause in progress.
    #[inline]
    pub fn paused_total(&self) -> Millis {
        self.paused_total
    }

    /// Whether a pause is in progress.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_excludes_pauses() {
        let mut clock = RunClock::start(Millis(1_000));

        assert_eq!(clock.elapsed_active(Millis(3_000)), Millis(2_000));

        assert!(clock.pause(Millis(3_000)));
        // Frozen while paused
        assert_eq!(clock.elapsed_active(Millis(5_500)), Millis(2_000));

        assert_eq!(clock.resume(Millis(6_000)), Some(Millis(3_000)));
        assert_eq!(clock.paused_total(), Millis(3_000));
        assert_eq!(clock.elapsed_active(Millis(9_000)), Millis(5_000));
    }

    #[test]
    fn test_finish_freezes_elapsed() {
        let mut clock = RunClock::start(Millis(0));

        clock.finish(Millis(5_000));
        assert_eq!(clock.elapsed_active(Millis(60_000)), Millis(5_000));
    }

    #[test]
    fn test_double_pause_and_resume() {
        let mut clock = RunClock::start(Millis(0));

        assert!(clock.pause(Millis(100)));
        assert!(!clock.pause(Millis(200)));
        assert_eq!(clock.resume(Millis(300)), Some(Millis(200)));
        assert_eq!(clock.resume(Millis(400)), None);
        assert_eq!(clock.paused_total(), Millis(200));
    }
}
