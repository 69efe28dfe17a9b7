//! The interactive terminal session.
//!
//! Stands in for the browser page: each input line is one user event
//! (a map click, a form edit, a submit, a delete), applied to the
//! application context exactly as a widget event handler would.

use std::io::{self, BufRead, Write};

use waymark::activity::{ActivityId, ActivityKind, Coords};
use waymark::error::{Error, Result};
use waymark::App;

use crate::format_entry;

/// Help text printed at session start and on `help`.
pub const HELP: &str = "\
commands:
  click LAT LNG     open the form at a point on the map
  kind KIND         select eating or shopping
  cost N            set the cost field
  duration N        set the duration field
  meals N           set the meals field (eating)
  items N           set the items field (shopping)
  submit            log the activity
  cancel            discard the form
  list              show all activities
  goto ID           pan the map to an activity
  remove ID         remove one activity
  clear             remove all activities
  quit              end the session";

/// One parsed line of session input.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    /// A click on the map surface.
    Click(Coords),
    /// Kind selection.
    Kind(ActivityKind),
    /// Raw cost field edit.
    Cost(String),
    /// Raw duration field edit.
    Duration(String),
    /// Raw meals field edit.
    Meals(String),
    /// Raw items field edit.
    Items(String),
    /// Submit the form.
    Submit,
    /// Discard the form.
    Cancel,
    /// Pan the map to an activity.
    Goto(ActivityId),
    /// Remove one activity.
    Remove(ActivityId),
    /// Remove all activities.
    Clear,
    /// Show all activities.
    List,
    /// Print the help text.
    Help,
    /// End the session.
    Quit,
    /// Blank line.
    Empty,
}

/// Parse one line of session input.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for an unknown command or malformed
/// arguments.
pub fn parse_input(line: &str) -> Result<SessionInput> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(SessionInput::Empty);
    };
    let rest: Vec<&str> = words.collect();

    match command {
        "click" => {
            let [lat, lng] = rest.as_slice() else {
                return Err(Error::invalid_input("usage: click LAT LNG"));
            };
            let coords = Coords::new(
                lat.parse()
                    .map_err(|_| Error::invalid_input("usage: click LAT LNG"))?,
                lng.parse()
                    .map_err(|_| Error::invalid_input("usage: click LAT LNG"))?,
            );
            if !coords.is_valid() {
                return Err(Error::invalid_input(format!("{coords} is not on the map")));
            }
            Ok(SessionInput::Click(coords))
        }
        "kind" => {
            let [kind] = rest.as_slice() else {
                return Err(Error::invalid_input("usage: kind eating|shopping"));
            };
            Ok(SessionInput::Kind(kind.parse()?))
        }
        "cost" => Ok(SessionInput::Cost(rest.join(" "))),
        "duration" => Ok(SessionInput::Duration(rest.join(" "))),
        "meals" => Ok(SessionInput::Meals(rest.join(" "))),
        "items" => Ok(SessionInput::Items(rest.join(" "))),
        "submit" => Ok(SessionInput::Submit),
        "cancel" => Ok(SessionInput::Cancel),
        "goto" => {
            let [id] = rest.as_slice() else {
                return Err(Error::invalid_input("usage: goto ID"));
            };
            Ok(SessionInput::Goto(ActivityId::from(*id)))
        }
        "remove" => {
            let [id] = rest.as_slice() else {
                return Err(Error::invalid_input("usage: remove ID"));
            };
            Ok(SessionInput::Remove(ActivityId::from(*id)))
        }
        "clear" => Ok(SessionInput::Clear),
        "list" => Ok(SessionInput::List),
        "help" => Ok(SessionInput::Help),
        "quit" | "exit" => Ok(SessionInput::Quit),
        other => Err(Error::invalid_input(format!(
            "unknown command '{other}' (try 'help')"
        ))),
    }
}

/// Apply one input to the application. Returns `false` when the session
/// should end.
///
/// # Errors
///
/// Returns an error if storage or a surface fails; user mistakes come
/// back as user errors for the loop to report.
pub fn apply(app: &mut App, input: &SessionInput) -> Result<bool> {
    match input {
        SessionInput::Click(coords) => app.click(*coords)?,
        SessionInput::Kind(kind) => app.form_mut().select_kind(*kind),
        SessionInput::Cost(raw) => app.form_mut().set_cost(raw),
        SessionInput::Duration(raw) => app.form_mut().set_duration(raw),
        SessionInput::Meals(raw) => app.form_mut().set_meals(raw),
        SessionInput::Items(raw) => app.form_mut().set_items(raw),
        SessionInput::Submit => app.submit()?,
        SessionInput::Cancel => app.form_mut().cancel(),
        SessionInput::Goto(id) => app.recenter_on(id)?,
        SessionInput::Remove(id) => app.remove(id)?,
        SessionInput::Clear => app.remove_all()?,
        SessionInput::List => {
            if app.store().is_empty() {
                println!("no activities logged");
            } else {
                // Newest first, matching the on-screen list order.
                for activity in app.store().iter().rev() {
                    println!("{}", format_entry(activity));
                }
            }
        }
        SessionInput::Help => println!("{HELP}"),
        SessionInput::Quit => return Ok(false),
        SessionInput::Empty => {}
    }
    Ok(true)
}

/// Run the interactive loop over stdin until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading input fails or a non-user error comes back
/// from the application.
pub fn run(app: &mut App) -> Result<()> {
    println!("{HELP}");
    let stdin = io::stdin();
    let mut out = io::stdout();

    loop {
        print!("> ");
        out.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(err) => {
                eprintln!("⚠  {err}");
                continue;
            }
        };

        match apply(app, &input) {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(err) if err.is_user_error() => eprintln!("⚠  {err}"),
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_click() {
        assert_eq!(
            parse_input("click 10.5 -20.25").unwrap(),
            SessionInput::Click(Coords::new(10.5, -20.25))
        );
    }

    #[test]
    fn test_parse_click_rejects_bad_args() {
        assert!(parse_input("click").is_err());
        assert!(parse_input("click 10").is_err());
        assert!(parse_input("click ten twenty").is_err());
        assert!(parse_input("click 95 0").is_err());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(
            parse_input("kind shopping").unwrap(),
            SessionInput::Kind(ActivityKind::Shopping)
        );
        assert!(parse_input("kind swimming").is_err());
    }

    #[test]
    fn test_parse_field_edits_keep_raw_text() {
        assert_eq!(
            parse_input("cost 15").unwrap(),
            SessionInput::Cost("15".to_string())
        );
        // Unparseable values still reach the form; the store rejects them
        // at submit so the user can correct in place.
        assert_eq!(
            parse_input("duration soon").unwrap(),
            SessionInput::Duration("soon".to_string())
        );
    }

    #[test]
    fn test_parse_singletons() {
        assert_eq!(parse_input("submit").unwrap(), SessionInput::Submit);
        assert_eq!(parse_input("cancel").unwrap(), SessionInput::Cancel);
        assert_eq!(parse_input("clear").unwrap(), SessionInput::Clear);
        assert_eq!(parse_input("list").unwrap(), SessionInput::List);
        assert_eq!(parse_input("help").unwrap(), SessionInput::Help);
        assert_eq!(parse_input("quit").unwrap(), SessionInput::Quit);
        assert_eq!(parse_input("exit").unwrap(), SessionInput::Quit);
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(
            parse_input("remove 1234567890").unwrap(),
            SessionInput::Remove(ActivityId::from("1234567890"))
        );
        assert_eq!(
            parse_input("goto 1234567890").unwrap(),
            SessionInput::Goto(ActivityId::from("1234567890"))
        );
        assert!(parse_input("remove").is_err());
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(parse_input("   ").unwrap(), SessionInput::Empty);
        assert!(parse_input("fly 1 2").is_err());
    }

    mod apply {
        use super::*;
        use waymark::storage::Storage;
        use waymark::store::ActivityStore;
        use waymark::surface::DEFAULT_ZOOM;
        use crate::{FixedGeolocator, TermList, TermMap, TermNotifier};

        fn app() -> App {
            App::new(
                ActivityStore::new(Storage::open_in_memory().unwrap()),
                Box::new(TermMap::new("https://tiles.example/{z}/{x}/{y}.png")),
                Box::new(TermList::new()),
                Box::new(FixedGeolocator::fixed(Coords::new(0.0, 0.0))),
                Box::new(TermNotifier),
                DEFAULT_ZOOM,
            )
        }

        fn drive(app: &mut App, lines: &[&str]) {
            for line in lines {
                let input = parse_input(line).unwrap();
                apply(app, &input).unwrap();
            }
        }

        #[test]
        fn test_full_create_flow() {
            let mut app = app();
            app.start().unwrap();

            drive(
                &mut app,
                &[
                    "click 10 20",
                    "kind eating",
                    "cost 15",
                    "duration 30",
                    "meals 2",
                    "submit",
                ],
            );

            assert_eq!(app.store().len(), 1);
            let act = app.store().iter().next().unwrap();
            assert_eq!(act.coords, Coords::new(10.0, 20.0));
            assert_eq!(act.quantity(), 2);
        }

        #[test]
        fn test_invalid_submit_keeps_form_open() {
            let mut app = app();
            app.start().unwrap();

            drive(
                &mut app,
                &[
                    "click 1 2",
                    "kind shopping",
                    "cost 10",
                    "duration -5",
                    "items 3",
                    "submit",
                ],
            );

            assert_eq!(app.store().len(), 0);
            assert!(app.form().is_open());
        }

        #[test]
        fn test_submit_without_click_is_reported_not_fatal() {
            let mut app = app();
            app.start().unwrap();

            // No form is open; this is a user mistake, not a crash.
            assert!(apply(&mut app, &SessionInput::Submit).unwrap());
            assert_eq!(app.store().len(), 0);
        }

        #[test]
        fn test_quit_stops_loop() {
            let mut app = app();
            assert!(!apply(&mut app, &SessionInput::Quit).unwrap());
        }

        #[test]
        fn test_clear_flow() {
            let mut app = app();
            app.start().unwrap();
            drive(
                &mut app,
                &["click 1 2", "cost 5", "duration 10", "meals 1", "submit", "clear"],
            );
            assert!(app.store().is_empty());
        }
    }
}
