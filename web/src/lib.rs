use clap::Parser;
use wasm_bindgen::prelude::*;

mod api;
mod calendar;
mod identity_form;
mod storage;
mod utils;
mod verse_modal;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    calendar: calendar::CalendarProps,
}

/// Parses start-up options out of the location hash, e.g. `#-vvv&--today=2025-02-15`.
fn parse_hash_args(hash: &str) -> Result<Args, clap::Error> {
    Args::try_parse_from(hash.split(['#', '&']))
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = parse_hash_args(&location_hash).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("args: {:?}", args.calendar);

    let root = document()
        .get_element_by_id("calendar")
        .expect("Could not find id=\"calendar\" element");

    log::debug!("App started");
    yew::Renderer::<calendar::CalendarView>::with_root_and_props(root, args.calendar).render();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_hash_uses_defaults() {
        let args = parse_hash_args("").unwrap();

        assert_eq!(args.calendar.today, None);
        assert_eq!(args.calendar.api_base, calendar::DEFAULT_API_BASE);
        assert!(!args.calendar.reset);
        assert!(!args.calendar.reject_concurrent);
    }

    #[test]
    fn hash_options_are_split_on_ampersand() {
        let args = parse_hash_args("#-vvv&--today=2025-02-15&--reset").unwrap();

        assert_eq!(args.calendar.today, NaiveDate::from_ymd_opt(2025, 2, 15));
        assert!(args.calendar.reset);
        assert_eq!(args.verbose.log_level(), Some(log::Level::Debug));
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(parse_hash_args("#--today=yesterday").is_err());
    }
}
