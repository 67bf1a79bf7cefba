mod args;
mod config;
mod paths;
mod render;
mod source;

use std::fs;
use std::fs::File;
use std::io;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use grouped_grid_lib::DatasetUpdate;
use grouped_grid_lib::GridConfig;
use grouped_grid_lib::GridController;
use grouped_grid_lib::GridService;
use grouped_grid_lib::MetadataHost;
use grouped_grid_lib::host::StaticDataset;
use grouped_grid_lib::host::StaticHost;
use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SharedLogger;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::args::Cli;
use crate::args::Command;
use crate::args::GridArgs;
use crate::config::Settings;
use crate::source::Source;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    init_logging(&cli, &settings);

    match cli.command {
        Command::Render {
            source,
            grid,
            columns,
            top,
        } => {
            let config = settings.grid_config(&grid)?;
            match Source::open(&source, &settings)? {
                Source::Snapshot(snapshot) => {
                    let host = StaticHost::from_snapshot(&snapshot);
                    let entity = snapshot.entity.clone();
                    render_grid(host, entity, snapshot.into(), config, &grid).await
                }
                Source::WebApi { host, entity } => {
                    let update = source::fetch_update(&host, &entity, &columns, top).await?;
                    render_grid(host, entity, update, config, &grid).await
                }
            }
        }
        Command::Options { source, column } => match Source::open(&source, &settings)? {
            Source::Snapshot(snapshot) => {
                let entity = snapshot.entity.clone();
                print_options(StaticHost::from_snapshot(&snapshot), entity, &column).await
            }
            Source::WebApi { host, entity } => print_options(host, entity, &column).await,
        },
        Command::Lookup {
            source,
            column,
            text,
        } => match Source::open(&source, &settings)? {
            Source::Snapshot(snapshot) => {
                let entity = snapshot.entity.clone();
                print_lookup(StaticHost::from_snapshot(&snapshot), entity, &column, &text).await
            }
            Source::WebApi { host, entity } => print_lookup(host, entity, &column, &text).await,
        },
        Command::Open { source, target, id } => match Source::open(&source, &settings)? {
            Source::Snapshot(snapshot) => {
                let entity = target.unwrap_or_else(|| snapshot.entity.clone());
                let host = StaticHost::from_snapshot(&snapshot);
                host.open_form(&entity, &id).await?;
                Ok(())
            }
            Source::WebApi { host, entity } => {
                let service = GridService::new(Arc::new(host), entity);
                service.navigate_to_item(target.as_deref().or(Some(service.entity())), &id).await?;
                Ok(())
            }
        },
    }
}

// =============================================================================
// Commands
// =============================================================================

async fn render_grid<H: MetadataHost>(
    host: H,
    entity: String,
    mut update: DatasetUpdate,
    config: GridConfig,
    args: &GridArgs,
) -> anyhow::Result<()> {
    // A file or a one-off query has no further pages to pull.
    update.paging.has_next_page = false;

    let service = GridService::new(Arc::new(host), entity);
    let mut grid = GridController::new(service, StaticDataset::default(), config)?;
    grid.update(update).await;
    for key in &args.toggles {
        grid.toggle_collapse(key);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let value = render::to_json(grid.store(), &grid.footer());
        serde_json::to_writer_pretty(&mut out, &value)?;
        writeln!(out)?;
    } else {
        render::write_text(&mut out, grid.store(), &grid.footer(), grid.resources())?;
    }
    Ok(())
}

async fn print_options<H: MetadataHost>(host: H, entity: String, column: &str) -> anyhow::Result<()> {
    let service = GridService::new(Arc::new(host), entity);
    for option in service.get_option_set(column, None).await? {
        match &option.color {
            Some(color) => println!("{:>6}  {}  [{}]", option.value, option.label, color),
            None => println!("{:>6}  {}", option.value, option.label),
        }
    }
    Ok(())
}

async fn print_lookup<H: MetadataHost>(
    host: H,
    entity: String,
    column: &str,
    text: &str,
) -> anyhow::Result<()> {
    let service = GridService::new(Arc::new(host), entity);
    let items = service.search_lookup(column, text).await?;
    if items.is_empty() {
        println!("No matches");
    }
    for item in items {
        println!("{}  {}", item.id, item.name);
    }
    Ok(())
}

// =============================================================================
// Logging
// =============================================================================

fn init_logging(cli: &Cli, settings: &Settings) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        settings
            .log_level
            .as_deref()
            .and_then(|level| LevelFilter::from_str(level).ok())
            .unwrap_or(LevelFilter::Warn)
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = cli.log_file.clone().or_else(paths::log_file) {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match File::create(&path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file)),
            Err(e) => eprintln!("Failed to create log file {}: {}", path.display(), e),
        }
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Failed to initialize logger: {}", e);
    }
}
