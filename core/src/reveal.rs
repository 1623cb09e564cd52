use core::time::Duration;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::{Day, GRID_DAYS, StorageKey, UnlockProgress};

/// Days the visitor has opened, in the order they were opened. Only grows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpenedDays(Vec<Day>);

impl OpenedDays {
    /// Keeps grid days only, first occurrence wins.
    pub fn sanitized(self) -> Self {
        let mut days: Vec<Day> = Vec::with_capacity(self.0.len());
        for day in self.0 {
            if (1..=GRID_DAYS).contains(&day) && !days.contains(&day) {
                days.push(day);
            }
        }
        Self(days)
    }

    pub fn contains(&self, day: Day) -> bool {
        self.0.contains(&day)
    }

    /// Returns whether `day` was newly added.
    fn insert(&mut self, day: Day) -> bool {
        if self.contains(day) {
            false
        } else {
            self.0.push(day);
            true
        }
    }

    pub fn as_slice(&self) -> &[Day] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Day> for OpenedDays {
    fn from_iter<I: IntoIterator<Item = Day>>(iter: I) -> Self {
        Self(iter.into_iter().collect()).sanitized()
    }
}

impl StorageKey for OpenedDays {
    const KEY: &'static str = "advent:opened-days";
}

/// How a grid cell should be displayed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DayState {
    Locked,
    ClosedUnseen,
    Animating,
    OpenedSeen,
}

impl DayState {
    pub const fn is_clickable(self) -> bool {
        matches!(self, Self::ClosedUnseen | Self::OpenedSeen)
    }
}

/// What to do when a first-time click lands while another day is animating.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrentReveal {
    /// The new day takes over the animation slot; the old one snaps to opened.
    #[default]
    Supersede,
    /// The click is ignored until the running animation finishes.
    Reject,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RevealConfig {
    pub duration: Duration,
    pub concurrent: ConcurrentReveal,
}

impl RevealConfig {
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(700);
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            duration: Self::DEFAULT_DURATION,
            concurrent: ConcurrentReveal::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RevealPhase {
    #[default]
    Idle,
    Animating { day: Day, deadline: Instant },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    Locked,
    Animating,
    Busy,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored(IgnoreReason),
    /// The day was opened before; show its detail right away.
    ShowDetail(Day),
    /// The day was opened just now; its detail follows once `deadline` passes.
    RevealStarted { day: Day, deadline: Instant },
}

impl ClickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

/// Single-slot controller for the open animation.
#[derive(Clone, Debug, Default)]
pub struct RevealMachine {
    config: RevealConfig,
    phase: RevealPhase,
}

impl RevealMachine {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            phase: RevealPhase::Idle,
        }
    }

    pub fn config(&self) -> RevealConfig {
        self.config
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn animating_day(&self) -> Option<Day> {
        match self.phase {
            RevealPhase::Idle => None,
            RevealPhase::Animating { day, .. } => Some(day),
        }
    }

    pub fn day_state(&self, day: Day, progress: UnlockProgress, opened: &OpenedDays) -> DayState {
        if !progress.is_unlocked(day) {
            DayState::Locked
        } else if self.animating_day() == Some(day) {
            DayState::Animating
        } else if opened.contains(day) {
            DayState::OpenedSeen
        } else {
            DayState::ClosedUnseen
        }
    }

    /// Applies a click. A first-time click adds `day` to `opened`; the caller
    /// must persist `opened` before yielding back to the event loop.
    pub fn click(
        &mut self,
        day: Day,
        progress: UnlockProgress,
        opened: &mut OpenedDays,
        now: Instant,
    ) -> ClickOutcome {
        match self.day_state(day, progress, opened) {
            DayState::Locked => ClickOutcome::Ignored(IgnoreReason::Locked),
            DayState::Animating => ClickOutcome::Ignored(IgnoreReason::Animating),
            DayState::OpenedSeen => ClickOutcome::ShowDetail(day),
            DayState::ClosedUnseen => {
                if let Some(current) = self.animating_day() {
                    match self.config.concurrent {
                        ConcurrentReveal::Reject => {
                            log::debug!("day {} rejected, day {} still animating", day, current);
                            return ClickOutcome::Ignored(IgnoreReason::Busy);
                        }
                        ConcurrentReveal::Supersede => {
                            log::debug!("day {} supersedes animation of day {}", day, current);
                        }
                    }
                }
                opened.insert(day);
                let deadline = now + self.config.duration;
                self.phase = RevealPhase::Animating { day, deadline };
                log::debug!("revealing day {}", day);
                ClickOutcome::RevealStarted { day, deadline }
            }
        }
    }

    /// Timer callback for `day`. Returns the day whose detail should be
    /// shown, or `None` when the timer is stale.
    pub fn reveal_elapsed(&mut self, day: Day) -> Option<Day> {
        match self.phase {
            RevealPhase::Animating { day: current, .. } if current == day => {
                self.phase = RevealPhase::Idle;
                Some(day)
            }
            _ => {
                log::trace!("stale reveal timer for day {}", day);
                None
            }
        }
    }

    /// Clock-driven variant of [`Self::reveal_elapsed`].
    pub fn expire(&mut self, now: Instant) -> Option<Day> {
        match self.phase {
            RevealPhase::Animating { day, deadline } if now >= deadline => {
                self.reveal_elapsed(day)
            }
            _ => None,
        }
    }

    /// Drops a pending reveal without signalling its detail.
    pub fn cancel(&mut self) -> Option<Day> {
        let day = self.animating_day();
        self.phase = RevealPhase::Idle;
        day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(through: Day) -> (RevealMachine, UnlockProgress, OpenedDays, Instant) {
        (
            RevealMachine::default(),
            UnlockProgress::new(through),
            OpenedDays::default(),
            Instant::now(),
        )
    }

    fn assert_invariant(opened: &OpenedDays, progress: UnlockProgress) {
        assert!(opened.as_slice().iter().all(|&day| progress.is_unlocked(day)));
    }

    #[test]
    fn initial_states_follow_unlock_and_history() {
        let (machine, progress, _, _) = setup(10);
        let opened: OpenedDays = [3].into_iter().collect();

        assert_eq!(machine.day_state(11, progress, &opened), DayState::Locked);
        assert_eq!(machine.day_state(3, progress, &opened), DayState::OpenedSeen);
        assert_eq!(machine.day_state(4, progress, &opened), DayState::ClosedUnseen);
    }

    #[test]
    fn locked_click_changes_nothing() {
        let (mut machine, progress, mut opened, now) = setup(5);

        for day in 6..=GRID_DAYS {
            let outcome = machine.click(day, progress, &mut opened, now);
            assert_eq!(outcome, ClickOutcome::Ignored(IgnoreReason::Locked));
        }
        assert!(opened.is_empty());
        assert_eq!(machine.phase(), RevealPhase::Idle);
    }

    #[test]
    fn first_click_animates_then_shows_detail() {
        let (mut machine, progress, mut opened, now) = setup(28);

        let outcome = machine.click(1, progress, &mut opened, now);
        let deadline = now + RevealConfig::DEFAULT_DURATION;

        assert_eq!(outcome, ClickOutcome::RevealStarted { day: 1, deadline });
        assert_eq!(opened.as_slice(), &[1]);
        assert_eq!(machine.day_state(1, progress, &opened), DayState::Animating);

        assert_eq!(machine.expire(now + Duration::from_millis(699)), None);
        assert_eq!(machine.expire(deadline), Some(1));
        assert_eq!(machine.day_state(1, progress, &opened), DayState::OpenedSeen);
    }

    #[test]
    fn clicking_animating_day_is_ignored() {
        let (mut machine, progress, mut opened, now) = setup(28);
        machine.click(2, progress, &mut opened, now);

        let outcome = machine.click(2, progress, &mut opened, now);

        assert_eq!(outcome, ClickOutcome::Ignored(IgnoreReason::Animating));
        assert_eq!(opened.as_slice(), &[2]);
    }

    #[test]
    fn opened_day_clicks_are_idempotent() {
        let (mut machine, progress, _, now) = setup(28);
        let mut opened: OpenedDays = [5].into_iter().collect();

        for _ in 0..3 {
            assert_eq!(
                machine.click(5, progress, &mut opened, now),
                ClickOutcome::ShowDetail(5)
            );
        }
        assert_eq!(opened.as_slice(), &[5]);
        assert_eq!(machine.animating_day(), None);
    }

    #[test]
    fn supersede_reassigns_slot_and_ignores_stale_timer() {
        let (mut machine, progress, mut opened, now) = setup(28);
        machine.click(1, progress, &mut opened, now);
        let outcome = machine.click(2, progress, &mut opened, now);

        assert!(matches!(outcome, ClickOutcome::RevealStarted { day: 2, .. }));
        assert_eq!(opened.as_slice(), &[1, 2]);
        assert_eq!(machine.day_state(1, progress, &opened), DayState::OpenedSeen);
        assert_eq!(machine.reveal_elapsed(1), None);
        assert_eq!(machine.animating_day(), Some(2));
        assert_eq!(machine.reveal_elapsed(2), Some(2));
    }

    #[test]
    fn reject_policy_ignores_second_first_time_click() {
        let mut machine = RevealMachine::new(RevealConfig {
            concurrent: ConcurrentReveal::Reject,
            ..Default::default()
        });
        let progress = UnlockProgress::new(28);
        let mut opened = OpenedDays::default();
        let now = Instant::now();

        machine.click(1, progress, &mut opened, now);
        let outcome = machine.click(2, progress, &mut opened, now);

        assert_eq!(outcome, ClickOutcome::Ignored(IgnoreReason::Busy));
        assert_eq!(opened.as_slice(), &[1]);
        assert_eq!(machine.day_state(2, progress, &opened), DayState::ClosedUnseen);
    }

    #[test]
    fn cancel_drops_pending_reveal_without_detail() {
        let (mut machine, progress, mut opened, now) = setup(28);
        machine.click(3, progress, &mut opened, now);

        assert_eq!(machine.cancel(), Some(3));
        assert_eq!(machine.reveal_elapsed(3), None);
        assert_eq!(machine.day_state(3, progress, &opened), DayState::OpenedSeen);
    }

    #[test]
    fn opened_days_grow_monotonically_within_unlocked_range() {
        let (mut machine, progress, mut opened, now) = setup(12);
        let clicks = [4, 20, 4, 12, 13, 1, 12, 0, 28, 7];

        let mut last_len = 0;
        for (i, &day) in clicks.iter().enumerate() {
            machine.click(day, progress, &mut opened, now);
            if i % 2 == 0 {
                machine.expire(now + RevealConfig::DEFAULT_DURATION);
            }
            assert!(opened.len() >= last_len);
            last_len = opened.len();
            assert_invariant(&opened, progress);
        }
        assert_eq!(opened.as_slice(), &[4, 12, 1, 7]);
    }

    #[test]
    fn sanitized_drops_out_of_grid_and_duplicate_days() {
        let opened = OpenedDays(vec![0, 3, 3, 29, 28, 1]).sanitized();
        assert_eq!(opened.as_slice(), &[3, 28, 1]);
    }
}
