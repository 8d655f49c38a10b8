//! `certrack` - CLI for tracking certifications
//!
//! This binary opens the local slot database, loads the certificate list and
//! runs one command against it.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use certrack::cli::{
    interactive, AddCommand, Cli, Command, ConfigCommand, ListCommand, OutputFormat,
    SummaryCommand,
};
use certrack::{
    init_logging, view, Certificate, Config, RecordStore, SqliteSlot, Status, Summary, Tracker,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config_path = cli.config;
    match cli.command {
        Command::Add(add_cmd) => handle_add(&load_config(config_path)?, &add_cmd),
        Command::List(list_cmd) => handle_list(&load_config(config_path)?, &list_cmd),
        Command::Summary(summary_cmd) => {
            handle_summary(&load_config(config_path)?, &summary_cmd)
        }
        Command::Config(config_cmd) => handle_config(config_path, config_cmd),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("loading configuration")
}

fn open_tracker(config: &Config) -> anyhow::Result<Tracker<SqliteSlot>> {
    let path = config.database_path();
    let slot = SqliteSlot::open(&path)
        .with_context(|| format!("opening certificate database {}", path.display()))?;
    let store = RecordStore::load(slot, &config.storage.slot_key, config.storage.on_corrupt)
        .context("loading certificates")?;
    Ok(Tracker::new(store))
}

fn handle_add(config: &Config, cmd: &AddCommand) -> anyhow::Result<()> {
    let mut tracker = open_tracker(config)?;

    tracker.open_form();
    for field in cmd.fields() {
        tracker.set_field(field)?;
    }
    tracker.add_files(cmd.file_names())?;

    let record = if cmd.interactive {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        match interactive::run_form(&mut tracker, stdin.lock(), &mut stdout)? {
            Some(record) => record,
            None => {
                println!("Cancelled; nothing was saved.");
                return Ok(());
            }
        }
    } else {
        tracker.submit()?.clone()
    };

    print_records(std::slice::from_ref(&record), cmd.format, config)
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let tracker = open_tracker(config)?;

    let records: Vec<Certificate> = match cmd.status {
        Some(status) => {
            let status: Status = status.into();
            tracker
                .records()
                .iter()
                .filter(|r| r.status == status)
                .cloned()
                .collect()
        }
        None => tracker.records().to_vec(),
    };

    print_records(&records, cmd.format, config)
}

fn print_records(
    records: &[Certificate],
    format: OutputFormat,
    config: &Config,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Plain => print!("{}", view::render_list(records, &config.view)),
        OutputFormat::Table => print!("{}", view::render_table(records)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
    }
    Ok(())
}

fn handle_summary(config: &Config, cmd: &SummaryCommand) -> anyhow::Result<()> {
    let tracker = open_tracker(config)?;
    let today = chrono::Local::now().date_naive();
    let summary = Summary::from_records(tracker.records(), today);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Slot key:           {}", config.storage.slot_key);
                println!("  On corrupt slot:    {:?}", config.storage.on_corrupt);
                println!();
                println!("[View]");
                println!("  Progress bar width: {}", config.view.progress_bar_width);
                println!("  Show empty sections: {}", config.view.show_empty_sections);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            validate_config_file(&path)?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

/// Load `path` through the full configuration stack and validate it.
fn validate_config_file(path: &Path) -> anyhow::Result<Config> {
    Config::load_from(Some(path.to_path_buf()))
        .with_context(|| format!("configuration error in {}", path.display()))
}
