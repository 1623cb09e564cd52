use chrono::{Datelike, NaiveDate};
use core::cmp::Ordering;
use serde::{Deserialize, Serialize};

use crate::{Day, GRID_DAYS};

/// Maps a calendar date onto how many grid days are open.
///
/// The policy is anchored to a single year/month: before it nothing is open,
/// during it one more day opens each day, after it the whole grid is open.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockPolicy {
    pub anchor_year: i32,
    pub anchor_month: u32,
    pub last_day: Day,
}

impl UnlockPolicy {
    pub const fn new(anchor_year: i32, anchor_month: u32) -> Self {
        Self {
            anchor_year,
            anchor_month,
            last_day: GRID_DAYS,
        }
    }

    pub fn unlocked_through(&self, today: NaiveDate) -> Day {
        let current = (today.year(), today.month());
        match current.cmp(&(self.anchor_year, self.anchor_month)) {
            Ordering::Less => 0,
            // day() is at most 31, so the narrowing is lossless before the cap
            Ordering::Equal => (today.day() as Day).min(self.last_day),
            Ordering::Greater => self.last_day,
        }
    }

    pub fn progress(&self, today: NaiveDate) -> UnlockProgress {
        UnlockProgress {
            through: self.unlocked_through(today),
        }
    }
}

impl Default for UnlockPolicy {
    fn default() -> Self {
        Self::new(2025, 2)
    }
}

/// Snapshot of the unlock boundary for one evaluation date.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnlockProgress {
    through: Day,
}

impl UnlockProgress {
    pub const fn new(through: Day) -> Self {
        Self { through }
    }

    pub const fn through(self) -> Day {
        self.through
    }

    pub const fn is_unlocked(self, day: Day) -> bool {
        day >= 1 && day <= self.through
    }

    /// Whether `day` is the most recently unlocked boundary day.
    ///
    /// After the anchor month this stays on the last grid day forever, so it
    /// is not a calendar-accurate "today".
    pub const fn is_today(self, day: Day) -> bool {
        day >= 1 && day == self.through
    }
}
