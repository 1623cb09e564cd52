use chrono::NaiveDate;
use web_time::Instant;

use crate::*;

/// The advent calendar's state: unlock policy, reveal slot, and everything
/// persisted through the storage port.
#[derive(Debug)]
pub struct Calendar<P> {
    store: CalendarStore<P>,
    policy: UnlockPolicy,
    reveal: RevealMachine,
    opened: OpenedDays,
    identity: Option<Identity>,
    verses: VerseList,
    submission: SubmissionGate,
}

impl<P: StoragePort> Calendar<P> {
    /// Restores persisted state. Corrupt values fall back to empty state.
    pub fn open(port: P, policy: UnlockPolicy, config: RevealConfig) -> Self {
        let store = CalendarStore::new(port);
        let opened = store.load_or_default::<OpenedDays>().sanitized();
        let verses: VerseList = store.load_or_default();
        let identity = match store.load::<Identity>() {
            Loaded::Found(_) if verses.is_empty() => {
                log::warn!("stored identity has no verses, asking again");
                None
            }
            loaded => loaded.found(),
        };
        log::debug!(
            "restored {} opened days, {} verses, identity: {}",
            opened.len(),
            verses.len(),
            identity.is_some()
        );
        Self {
            store,
            policy,
            reveal: RevealMachine::new(config),
            opened,
            identity,
            verses,
            submission: SubmissionGate::default(),
        }
    }

    pub fn store(&self) -> &CalendarStore<P> {
        &self.store
    }

    pub fn policy(&self) -> UnlockPolicy {
        self.policy
    }

    pub fn progress(&self, today: NaiveDate) -> UnlockProgress {
        self.policy.progress(today)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn verses(&self) -> &VerseList {
        &self.verses
    }

    pub fn verse(&self, day: Day) -> Option<&VerseEntry> {
        self.verses.get(day)
    }

    pub fn opened_days(&self) -> &OpenedDays {
        &self.opened
    }

    pub fn animating_day(&self) -> Option<Day> {
        self.reveal.animating_day()
    }

    pub fn day_state(&self, day: Day, today: NaiveDate) -> DayState {
        self.reveal.day_state(day, self.progress(today), &self.opened)
    }

    /// Handles a click on `day`. A first-time open is persisted before this
    /// returns, so a reload mid-animation still counts the day as opened.
    pub fn click(&mut self, day: Day, today: NaiveDate, now: Instant) -> ClickOutcome {
        let progress = self.progress(today);
        let outcome = self.reveal.click(day, progress, &mut self.opened, now);
        if let ClickOutcome::RevealStarted { .. } = outcome {
            if let Err(err) = self.store.save(&self.opened) {
                log::error!("Could not save opened days: {}", err);
            }
        }
        outcome
    }

    pub fn reveal_elapsed(&mut self, day: Day) -> Option<Day> {
        self.reveal.reveal_elapsed(day)
    }

    pub fn expire_reveal(&mut self, now: Instant) -> Option<Day> {
        self.reveal.expire(now)
    }

    pub fn cancel_reveal(&mut self) -> Option<Day> {
        self.reveal.cancel()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_in_flight()
    }

    pub fn begin_submission(&mut self, identity: Identity) -> Result<VerseQuery, SubmitError> {
        self.submission.begin(identity)
    }

    /// Completes the outstanding submission. Nothing is stored unless the
    /// fetch succeeded with at least one usable verse.
    pub fn finish_submission(
        &mut self,
        result: Result<VerseListResponse, FetchError>,
    ) -> Result<(), FetchError> {
        let Some(identity) = self.submission.finish() else {
            log::warn!("verse response arrived with no submission in flight");
            return Ok(());
        };
        let verses = VerseList::from_response(result?);
        if verses.is_empty() {
            return Err(FetchError::NotFound);
        }
        log::info!(
            "loaded {} verses for {} {}",
            verses.len(),
            identity.temple,
            identity.name
        );
        if let Err(err) = self.store.save(&verses) {
            log::error!("Could not save verses: {}", err);
        }
        if let Err(err) = self.store.save(&identity) {
            log::error!("Could not save identity: {}", err);
        }
        self.verses = verses;
        self.identity = Some(identity);
        Ok(())
    }

    /// Forgets identity, verses and progress.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.reveal.cancel();
        self.store.clear::<OpenedDays>()?;
        self.store.clear::<Identity>()?;
        self.store.clear::<VerseList>()?;
        self.opened = OpenedDays::default();
        self.identity = None;
        self.verses = VerseList::default();
        Ok(())
    }
}
