use advent_core::{
    Calendar, ClickOutcome, ConcurrentReveal, Day, DayState, FetchError, GRID_DAYS, Identity,
    RevealConfig, UnlockPolicy, VerseListResponse, VerseSource,
};
use bitflags::bitflags;
use chrono::NaiveDate;
use clap::Args;
use gloo::timers::callback::{Interval, Timeout};
use web_time::Instant;
use yew::prelude::*;

use crate::api::HttpVerseSource;
use crate::identity_form::IdentityForm;
use crate::storage::BrowserStorage;
use crate::utils::local_today;
use crate::verse_modal::VerseModal;

pub(crate) const DEFAULT_API_BASE: &str = "https://api.gntc-youth.com";

/// How often the clock is checked for a date change.
const DATE_CHECK_MS: u32 = 30_000;

const WEEKDAYS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

/// Capsule colours `(left, right)`, cycled by day.
const PILL_COLORS: [(&str, &str); 7] = [
    ("#F6D76B", "#DFA23C"),
    ("#F2A9A9", "#D44B4B"),
    ("#9FC0FF", "#3C64F4"),
    ("#A7E9B2", "#44B85A"),
    ("#C7B5FF", "#6D4CF4"),
    ("#F5C18D", "#E07A2E"),
    ("#F2A7E5", "#C94AA6"),
];

fn pill_colors(day: Day) -> (&'static str, &'static str) {
    PILL_COLORS[usize::from(day.saturating_sub(1)) % PILL_COLORS.len()]
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct CellFlags: u8 {
        const UNLOCKED  = 1;
        const TODAY     = 1 << 1;
        const OPENED    = 1 << 2;
        const ANIMATING = 1 << 3;
    }
}

impl CellFlags {
    fn new(state: DayState, is_today: bool) -> Self {
        let mut flags = match state {
            DayState::Locked => CellFlags::empty(),
            DayState::ClosedUnseen => CellFlags::UNLOCKED,
            DayState::Animating => CellFlags::UNLOCKED | CellFlags::OPENED | CellFlags::ANIMATING,
            DayState::OpenedSeen => CellFlags::UNLOCKED | CellFlags::OPENED,
        };
        flags.set(CellFlags::TODAY, is_today);
        flags
    }

    fn classes(self) -> Classes {
        let mut class = classes!("day");
        for (flag, name) in [
            (CellFlags::UNLOCKED, "unlocked"),
            (CellFlags::TODAY, "today"),
            (CellFlags::OPENED, "opened"),
            (CellFlags::ANIMATING, "animating"),
        ] {
            if self.contains(flag) {
                class.push(name);
            }
        }
        if !self.contains(CellFlags::UNLOCKED) {
            class.push("locked");
        }
        class
    }
}

/// Where the unlock date comes from: the `--today` override, else the clock.
#[derive(Copy, Clone, Debug)]
struct DateSource {
    fixed: Option<NaiveDate>,
    clock: fn() -> NaiveDate,
}

impl DateSource {
    fn today(&self) -> NaiveDate {
        self.fixed.unwrap_or_else(self.clock)
    }
}

/// Remembers the date the grid was last rendered for.
#[derive(Copy, Clone, Debug, PartialEq)]
struct DateWatch {
    shown: NaiveDate,
}

impl DateWatch {
    /// Returns whether `today` differs from the rendered date.
    fn observe(&mut self, today: NaiveDate) -> bool {
        if self.shown == today {
            false
        } else {
            log::debug!("date changed: {} -> {}", self.shown, today);
            self.shown = today;
            true
        }
    }
}

#[derive(Properties, Clone, PartialEq)]
struct DayCellProps {
    day: Day,
    state: DayState,
    #[prop_or_default]
    today: bool,
    callback: Callback<Day>,
}

#[function_component(DayCell)]
fn day_cell(props: &DayCellProps) -> Html {
    let DayCellProps {
        day,
        state,
        today,
        callback,
    } = props.clone();

    let class = CellFlags::new(state, today).classes();
    let (left, right) = pill_colors(day);
    let style = format!("--pill-left: {}; --pill-right: {}", left, right);
    let capsule = html! {
        <div class="capsule">
            <span class="left"/>
            <span class="right"/>
        </div>
    };
    let badge = match state {
        DayState::Locked => Some("🔒"),
        DayState::ClosedUnseen if today => Some("✨"),
        _ => None,
    };

    let content = html! {
        <>
            <span class="num">{day.to_string()}</span>
            {capsule}
            if let Some(badge) = badge {
                <small class="badge">{badge}</small>
            }
        </>
    };

    if state.is_clickable() {
        let onclick = Callback::from(move |_: MouseEvent| {
            log::trace!("day {} clicked", day);
            callback.emit(day);
        });
        html! { <button {class} {style} {onclick}>{content}</button> }
    } else {
        html! { <div {class} {style}>{content}</div> }
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct CalendarProps {
    /// Evaluate unlocks as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Base URL of the verse API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Forget identity, verses and opened days before starting
    #[arg(long)]
    pub reset: bool,

    /// Ignore first-time clicks while another day is still opening
    #[arg(long)]
    pub reject_concurrent: bool,
}

impl CalendarProps {
    fn reveal_config(&self) -> RevealConfig {
        RevealConfig {
            concurrent: if self.reject_concurrent {
                ConcurrentReveal::Reject
            } else {
                ConcurrentReveal::Supersede
            },
            ..Default::default()
        }
    }
}

#[derive(Debug)]
pub(crate) enum Msg {
    DayClicked(Day),
    RevealElapsed(Day),
    CloseVerse,
    Submit(Identity),
    VersesFetched(Result<VerseListResponse, FetchError>),
    DismissError,
    CheckDate,
}

pub(crate) struct CalendarView {
    calendar: Calendar<BrowserStorage>,
    source: HttpVerseSource,
    dates: DateSource,
    date_watch: DateWatch,
    selected: Option<Day>,
    error: Option<FetchError>,
    reveal_timer: Option<Timeout>,
    _date_interval: Interval,
}

impl CalendarView {
    fn schedule_reveal(&mut self, ctx: &Context<Self>, day: Day, delay_ms: u32) {
        let link = ctx.link().clone();
        // replacing the handle drops, and so cancels, any superseded timer
        self.reveal_timer = Some(Timeout::new(delay_ms, move || {
            link.send_message(Msg::RevealElapsed(day))
        }));
    }

    fn create_date_check(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(DATE_CHECK_MS, move || link.send_message(Msg::CheckDate))
    }

    fn click(&mut self, ctx: &Context<Self>, day: Day) -> bool {
        let now = Instant::now();
        let today = self.dates.today();
        self.date_watch.observe(today);
        match self.calendar.click(day, today, now) {
            ClickOutcome::Ignored(reason) => {
                log::trace!("click on day {} ignored: {:?}", day, reason);
                false
            }
            ClickOutcome::ShowDetail(day) => {
                self.selected = Some(day);
                true
            }
            ClickOutcome::RevealStarted { day, deadline } => {
                let delay_ms = u32::try_from((deadline - now).as_millis()).unwrap_or(u32::MAX);
                self.schedule_reveal(ctx, day, delay_ms);
                true
            }
        }
    }

    fn submit(&mut self, ctx: &Context<Self>, identity: Identity) -> bool {
        match self.calendar.begin_submission(identity) {
            Ok(query) => {
                self.error = None;
                let source = self.source.clone();
                ctx.link().send_future(async move {
                    Msg::VersesFetched(source.fetch_verses(&query).await)
                });
                true
            }
            Err(err) => {
                log::debug!("submit ignored: {}", err);
                false
            }
        }
    }

    fn view_loading(&self) -> Html {
        html! {
            <div class="advent loading">
                <div class="mascot">{"🦅"}</div>
                <p>{"로딩중..."}</p>
            </div>
        }
    }

    fn view_error(&self, ctx: &Context<Self>, error: &FetchError) -> Html {
        let onclick = ctx.link().callback(|_: MouseEvent| Msg::DismissError);
        let (icon, message) = if error.is_not_found() {
            ("🔍", "해당 청년의 간증 내용이 검색되지 않았습니다.")
        } else {
            ("😢", "오류가 발생했습니다.")
        };
        html! {
            <div class="advent error">
                <div class="mascot">{icon}</div>
                <p><strong>{message}</strong></p>
                if error.is_not_found() {
                    <p>{"각 성전에 문의 부탁드립니다."}</p>
                }
                <button {onclick}>{"다시 시도"}</button>
            </div>
        }
    }

    fn view_header(&self) -> Html {
        html! {
            <header>
                <div class="mascot">{"🦅"}</div>
                <h1>{"독수리 의원"}</h1>
                <p>{"✨ 하루 한 말씀, 독수리처럼 날아오르기 ✨"}</p>
                if let Some(identity) = self.calendar.identity() {
                    <p class="identity">
                        {format!("{} {}기 {}", identity.temple, identity.generation, identity.name)}
                    </p>
                }
            </header>
        }
    }

    fn view_grid(&self, ctx: &Context<Self>) -> Html {
        let today = self.dates.today();
        let progress = self.calendar.progress(today);
        let callback = ctx.link().callback(Msg::DayClicked);
        html! {
            <main>
                <ol class="weekdays">
                    { for WEEKDAYS.iter().map(|weekday| html! { <li>{*weekday}</li> }) }
                </ol>
                <ol class="days">
                    {
                        for (1..=GRID_DAYS).map(|day| {
                            let state = self.calendar.day_state(day, today);
                            let today = progress.is_today(day);
                            let callback = callback.clone();
                            html! {
                                <li key={day.to_string()}><DayCell {day} {state} {today} {callback}/></li>
                            }
                        })
                    }
                </ol>
            </main>
        }
    }
}

impl Component for CalendarView {
    type Message = Msg;
    type Properties = CalendarProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let mut calendar =
            Calendar::open(BrowserStorage, UnlockPolicy::default(), props.reveal_config());
        if props.reset {
            log::info!("resetting stored calendar state");
            if let Err(err) = calendar.reset() {
                log::error!("Could not reset storage: {}", err);
            }
        }
        let dates = DateSource {
            fixed: props.today,
            clock: local_today,
        };
        let today = dates.today();
        log::debug!(
            "today: {}, unlocked through day {}",
            today,
            calendar.progress(today).through()
        );
        Self {
            calendar,
            source: HttpVerseSource::new(props.api_base.clone()),
            dates,
            date_watch: DateWatch { shown: today },
            selected: None,
            error: None,
            reveal_timer: None,
            _date_interval: CalendarView::create_date_check(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            DayClicked(day) => self.click(ctx, day),
            RevealElapsed(day) => {
                self.reveal_timer = None;
                if let Some(day) = self.calendar.reveal_elapsed(day) {
                    self.selected = Some(day);
                }
                true
            }
            CloseVerse => self.selected.take().is_some(),
            Submit(identity) => self.submit(ctx, identity),
            VersesFetched(result) => {
                if let Err(err) = self.calendar.finish_submission(result) {
                    log::error!("verse fetch failed: {}", err);
                    self.error = Some(err);
                }
                true
            }
            DismissError => self.error.take().is_some(),
            CheckDate => self.date_watch.observe(self.dates.today()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if self.calendar.is_submitting() {
            return self.view_loading();
        }
        if let (Some(error), None) = (&self.error, self.calendar.identity()) {
            return self.view_error(ctx, error);
        }

        let verse = self.selected.and_then(|day| self.calendar.verse(day).cloned());
        let on_close = ctx.link().callback(|_: ()| Msg::CloseVerse);
        let on_submit = ctx.link().callback(Msg::Submit);

        html! {
            <div class="advent">
                {self.view_header()}
                {self.view_grid(ctx)}
                if self.calendar.identity().is_none() {
                    <IdentityForm {on_submit}/>
                }
                <VerseModal {verse} {on_close}/>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(day) = self.calendar.cancel_reveal() {
            log::debug!("cancelled pending reveal of day {}", day);
        }
        self.reveal_timer.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_flags_follow_day_state() {
        assert_eq!(CellFlags::new(DayState::Locked, false), CellFlags::empty());
        assert_eq!(
            CellFlags::new(DayState::ClosedUnseen, true),
            CellFlags::UNLOCKED | CellFlags::TODAY
        );
        assert!(CellFlags::new(DayState::Animating, false).contains(CellFlags::ANIMATING));
        assert!(!CellFlags::new(DayState::OpenedSeen, false).contains(CellFlags::ANIMATING));
    }

    #[test]
    fn locked_cells_get_locked_class() {
        let classes = CellFlags::new(DayState::Locked, false).classes();
        assert!(classes.contains("locked"));
        assert!(!classes.contains("unlocked"));
    }

    #[test]
    fn pill_colors_cycle_weekly() {
        assert_eq!(pill_colors(1), PILL_COLORS[0]);
        assert_eq!(pill_colors(8), PILL_COLORS[0]);
        assert_eq!(pill_colors(28), PILL_COLORS[6]);
    }

    thread_local! {
        static CLOCK: std::cell::Cell<NaiveDate> = std::cell::Cell::new(date(2025, 2, 10));
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_clock() -> NaiveDate {
        CLOCK.with(|clock| clock.get())
    }

    #[test]
    fn clock_date_is_read_on_every_call() {
        let dates = DateSource {
            fixed: None,
            clock: test_clock,
        };
        CLOCK.with(|clock| clock.set(date(2025, 2, 10)));
        assert_eq!(dates.today(), date(2025, 2, 10));

        CLOCK.with(|clock| clock.set(date(2025, 2, 11)));
        assert_eq!(dates.today(), date(2025, 2, 11));
    }

    #[test]
    fn override_date_ignores_clock() {
        let dates = DateSource {
            fixed: Some(date(2025, 2, 15)),
            clock: test_clock,
        };
        CLOCK.with(|clock| clock.set(date(2025, 3, 1)));
        assert_eq!(dates.today(), date(2025, 2, 15));
    }

    #[test]
    fn date_watch_rerenders_only_when_date_changes() {
        let mut watch = DateWatch {
            shown: date(2025, 2, 10),
        };
        assert!(!watch.observe(date(2025, 2, 10)));
        assert!(watch.observe(date(2025, 2, 11)));
        assert!(!watch.observe(date(2025, 2, 11)));
    }

    #[test]
    fn reject_flag_selects_reject_policy() {
        let mut props = CalendarProps {
            today: None,
            api_base: DEFAULT_API_BASE.to_string(),
            reset: false,
            reject_concurrent: false,
        };
        assert_eq!(props.reveal_config().concurrent, ConcurrentReveal::Supersede);

        props.reject_concurrent = true;
        assert_eq!(props.reveal_config().concurrent, ConcurrentReveal::Reject);
        assert_eq!(props.reveal_config().duration, RevealConfig::DEFAULT_DURATION);
    }
}
