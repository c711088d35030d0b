//! `schools` - CLI for schoolbook
//!
//! This binary provides the command-line interface for adding, listing and
//! inspecting schools kept in the local register.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use schoolbook::cli::{AddCommand, Cli, Command, ConfigCommand, ListCommand, StatusCommand};
use schoolbook::render;
use schoolbook::shell::Shell;
use schoolbook::{
    add_school, init_logging, open_store, Config, Dashboard, Error, Field, RecordStore, Slot,
    SqliteSlot, Storage,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult {
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Add(add_cmd) => handle_add(&config, add_cmd),
        Command::List(list_cmd) => handle_list(&config, &list_cmd),
        Command::Show(show_cmd) => handle_show(&config, show_cmd.position),
        Command::Shell => handle_shell(&config),
        Command::Status(status_cmd) => handle_status(&config, &status_cmd),
        Command::Clear(clear_cmd) => handle_clear(&config, clear_cmd.yes),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_add(config: &Config, cmd: AddCommand) -> CliResult {
    let values = [
        (Field::Name, cmd.name),
        (Field::Address, cmd.address),
        (Field::City, cmd.city),
        (Field::State, cmd.state),
        (Field::Contact, cmd.contact),
        (Field::EmailId, cmd.email),
    ]
    .map(|(field, value)| (field, value.unwrap_or_default()));

    let mut store = open_store(config);
    match add_school(&mut store, values, cmd.image.as_deref(), &config.images) {
        Ok(submitted) => {
            let school = &store.list()[submitted.index];
            println!("Added {} (#{})", school.name, submitted.index + 1);
            if submitted.persisted.is_err() {
                println!("Warning: the school could not be saved and is not kept after this run.");
            }
            Ok(())
        }
        Err(rejection) => {
            let mut stderr = io::stderr().lock();
            writeln!(stderr, "Cannot add school:")?;
            render::rejection(&mut stderr, &rejection)?;
            Err(Error::from(rejection).into())
        }
    }
}

fn handle_list(config: &Config, cmd: &ListCommand) -> CliResult {
    let store = open_store(config);
    let mut stdout = io::stdout().lock();
    render::list(&mut stdout, store.list(), cmd.format)?;
    Ok(())
}

fn handle_show(config: &Config, position: u64) -> CliResult {
    let store = open_store(config);
    let position = usize::try_from(position).unwrap_or(usize::MAX);
    let school = store
        .get(position.saturating_sub(1))
        .ok_or(Error::NotFound {
            position,
            len: store.len(),
        })?;

    let mut stdout = io::stdout().lock();
    render::detail(&mut stdout, position, school)?;
    Ok(())
}

fn handle_shell(config: &Config) -> CliResult {
    let store = open_store(config);
    let mut shell = Shell::new(Dashboard::new(store), config.images.clone());

    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    shell.run(stdin, &mut stdout)?;
    debug!(
        "Shell session ended with {} schools",
        shell.dashboard().store().len()
    );
    Ok(())
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> CliResult {
    let db_path = config.database_path();
    let key = config.slot_key();

    let (info, db_size, slot_health) = match Storage::open_existing(&db_path) {
        Ok(None) => (None, 0, "no database yet".to_string()),
        Ok(Some(storage)) => {
            let info = storage.info(key)?;
            let size = storage.db_size_bytes();
            let (store, loaded) = RecordStore::load(SqliteSlot::new(storage, key));
            let health = match loaded {
                Ok(()) => format!("ok ({} schools)", store.len()),
                Err(e) => format!("unreadable: {e}"),
            };
            (info, size, health)
        }
        Err(e) => (None, 0, format!("database unavailable: {e}")),
    };

    if cmd.json {
        let status = serde_json::json!({
            "database_path": db_path,
            "database_bytes": db_size,
            "slot_key": key,
            "slot_bytes": info.as_ref().map(|i| i.value_bytes),
            "slot_updated_at": info.as_ref().and_then(|i| i.updated_at).map(|t| t.to_rfc3339()),
            "slot": slot_health,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("schools status");
        println!("--------------");
        println!("Database:      {} ({} bytes)", db_path.display(), db_size);
        println!("Slot key:      {key}");
        match &info {
            Some(info) => {
                println!("Slot size:     {} bytes", info.value_bytes);
                if let Some(updated_at) = info.updated_at {
                    println!("Last saved:    {}", updated_at.to_rfc3339());
                }
            }
            None => println!("Slot size:     (empty)"),
        }
        println!("Slot:          {slot_health}");
    }
    Ok(())
}

fn handle_clear(config: &Config, yes: bool) -> CliResult {
    if !yes {
        println!("This will remove every saved school.");
        println!("Use --yes to confirm.");
        return Ok(());
    }

    let storage = Storage::open(config.database_path())?;
    let mut slot = SqliteSlot::new(storage, config.slot_key());
    slot.clear()?;
    println!("Removed all saved schools.");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Slot key:           {}", config.slot_key());
                println!();
                println!("[Images]");
                println!("  Max bytes:          {}", config.images.max_bytes);
                println!("  Extensions:         {}", config.images.extensions.join(", "));
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
