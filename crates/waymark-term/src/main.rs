//! `waymark` - CLI for the map-based activity logger.
//!
//! This binary wires the core application context to the terminal surface
//! backend and dispatches the CLI commands.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use waymark::activity::{ActivityDetails, ActivityId, Coords};
use waymark::cli::{Cli, ClearCommand, Command, ConfigCommand, ListCommand, LogCommand, RemoveCommand};
use waymark::storage::Storage;
use waymark::store::ActivityStore;
use waymark::{init_logging, App, Config, Error};

use waymark_term::{format_entry, FixedGeolocator, TermList, TermMap, TermNotifier};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Session(_) => run_session(&config),
        Command::Log(cmd) => handle_log(&config, &cmd),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Remove(cmd) => handle_remove(&config, &cmd),
        Command::Clear(cmd) => handle_clear(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<ActivityStore> {
    let storage = Storage::open(config.database_path())
        .with_context(|| format!("opening {}", config.database_path().display()))?;
    let mut store = ActivityStore::new(storage);
    store.restore()?;
    Ok(store)
}

fn run_session(config: &Config) -> anyhow::Result<()> {
    let storage = Storage::open(config.database_path())?;
    let mut app = App::new(
        ActivityStore::new(storage),
        Box::new(TermMap::new(config.map.tile_url.clone())),
        Box::new(TermList::new()),
        Box::new(FixedGeolocator::from_env_or(
            config.geolocation.fixed_position,
        )),
        Box::new(TermNotifier),
        config.map.zoom_level,
    );

    app.start()?;
    waymark_term::session::run(&mut app)?;
    Ok(())
}

fn handle_log(config: &Config, cmd: &LogCommand) -> anyhow::Result<()> {
    let kind = cmd.kind.parse()?;
    let details = match (kind, cmd.meals, cmd.items) {
        (waymark::ActivityKind::Eating, Some(meals), None) => ActivityDetails::Eating { meals },
        (waymark::ActivityKind::Shopping, None, Some(items)) => {
            ActivityDetails::Shopping { items }
        }
        (waymark::ActivityKind::Eating, ..) => {
            return Err(Error::invalid_input("eating takes --meals (and not --items)").into());
        }
        (waymark::ActivityKind::Shopping, ..) => {
            return Err(Error::invalid_input("shopping takes --items (and not --meals)").into());
        }
    };

    let mut store = open_store(config)?;
    let activity = store.create(details, Coords::new(cmd.lat, cmd.lng), cmd.duration, cmd.cost)?;
    println!("Logged {} [id {}]", activity.description, activity.id);
    store.persist()?;
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;

    if cmd.json {
        let activities: Vec<_> = store.iter().collect();
        println!("{}", serde_json::to_string_pretty(&activities)?);
        return Ok(());
    }

    if store.is_empty() {
        println!("no activities logged");
        return Ok(());
    }

    // Newest first, matching the on-screen list order.
    for activity in store.iter().rev() {
        println!("{}", format_entry(activity));
    }
    Ok(())
}

fn handle_remove(config: &Config, cmd: &RemoveCommand) -> anyhow::Result<()> {
    let mut store = open_store(config)?;
    if store.remove(&ActivityId::from(cmd.id.as_str()))? {
        println!("Removed {}", cmd.id);
    } else {
        println!("No activity with id {}", cmd.id);
    }
    Ok(())
}

fn handle_clear(config: &Config, cmd: &ClearCommand) -> anyhow::Result<()> {
    let mut store = open_store(config)?;
    if !cmd.yes {
        println!(
            "This will remove all {} activities. Use --yes to confirm.",
            store.len()
        );
        return Ok(());
    }
    store.remove_all()?;
    println!("Removed all activities.");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:   {}", config.database_path().display());
                println!();
                println!("[Map]");
                println!("  Zoom level:      {}", config.map.zoom_level);
                println!("  Tile URL:        {}", config.map.tile_url);
                println!();
                println!("[Geolocation]");
                match config.geolocation.fixed_position {
                    Some(position) => println!("  Fixed position:  {position}"),
                    None => println!("  Fixed position:  (unset)"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
