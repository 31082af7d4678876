//! `hymnal` command-line browser.
//!
//! # Responsibility
//! - Load a hymnal from a dataset file or a local store and print lists,
//!   single hymns and sections.
//! - Import datasets into the store and toggle stored favorites.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use hymnal_core::db::open_db;
use hymnal_core::{
    default_log_level, get_all_verses, init_logging, load_dataset_file, number_matches,
    HymnFilter, HymnIndex, HymnRecord, HymnalService, SearchSummary, SectionId,
    SqliteHymnRepository,
};
use log::info;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "hymnal", version, about = "Browse and search a bundled hymnal")]
struct Cli {
    /// Bundled hymnal JSON (`{ "hymns": [...], "sections": [...] }`).
    #[arg(long, global = true, env = "HYMNAL_DATASET")]
    dataset: Option<PathBuf>,

    /// Local SQLite hymn store. Takes precedence over `--dataset` for reads.
    #[arg(long, global = true, env = "HYMNAL_DB")]
    db: Option<PathBuf>,

    #[arg(long, global = true, env = "HYMNAL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute log directory. Defaults to the platform data directory.
    #[arg(long, global = true, env = "HYMNAL_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List hymns, optionally filtered by section and free text.
    List {
        #[arg(long)]
        section: Option<String>,
        query: Option<String>,
    },
    /// Print every hymn printed under NUMBER.
    Show { number: u32 },
    /// List sections.
    Sections,
    /// Copy `--dataset` into the `--db` store.
    Import,
    /// Toggle the stored favorite flag of hymn ID.
    Favorite { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    start_logging(&cli);

    match &cli.command {
        Command::List { section, query } => {
            let index = load_index(&cli)?;
            let filter = HymnFilter {
                section: section.as_deref().map(SectionId::from),
                query: query.clone().unwrap_or_default(),
            };
            print_list(&index, &filter);
        }
        Command::Show { number } => {
            let index = load_index(&cli)?;
            let hymns = index.by_number(*number);
            if hymns.is_empty() {
                bail!("no hymn numbered {number}");
            }
            for hymn in hymns {
                print_hymn(&index, hymn);
            }
        }
        Command::Sections => {
            let index = load_index(&cli)?;
            for section in index.sections() {
                println!("{}\t{}\t{}", section.id, section.title, section.description);
            }
        }
        Command::Import => {
            let (Some(dataset), Some(db)) = (&cli.dataset, &cli.db) else {
                bail!("import needs both --dataset and --db");
            };
            let collection = load_dataset_file(dataset)
                .with_context(|| format!("failed to load dataset {}", dataset.display()))?;
            let conn = open_store(db)?;
            HymnalService::new(SqliteHymnRepository::new(&conn))
                .import(&collection)
                .context("failed to import dataset")?;
            println!(
                "Imported {} hymns and {} sections ({} hymns skipped).",
                collection.report.hymns_loaded,
                collection.report.sections_loaded,
                collection.report.hymns_skipped
            );
        }
        Command::Favorite { id } => {
            let Some(db) = &cli.db else {
                bail!("favorite needs --db");
            };
            let conn = open_store(db)?;
            let favorited = HymnalService::new(SqliteHymnRepository::new(&conn))
                .toggle_favorite(id)
                .with_context(|| format!("failed to toggle favorite for {id}"))?;
            println!("{id}: {}", if favorited { "favorited" } else { "not favorited" });
        }
    }

    Ok(())
}

fn start_logging(cli: &Cli) {
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let Some(log_dir) = cli.log_dir.clone().or_else(default_log_dir) else {
        return;
    };
    if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn default_log_dir() -> Option<PathBuf> {
    ProjectDirs::from("org", "hymnal", "hymnal").map(|dirs| dirs.data_local_dir().join("logs"))
}

fn open_store(path: &Path) -> Result<Connection> {
    open_db(path).with_context(|| format!("failed to open hymn store {}", path.display()))
}

fn load_index(cli: &Cli) -> Result<HymnIndex> {
    if let Some(db) = &cli.db {
        let conn = open_store(db)?;
        let index = HymnalService::new(SqliteHymnRepository::new(&conn))
            .load_index()
            .context("failed to read hymn store")?;
        info!("event=cli_load module=cli status=ok source=db hymns={}", index.len());
        return Ok(index);
    }

    let Some(dataset) = &cli.dataset else {
        bail!("pass --dataset or --db (or set HYMNAL_DATASET / HYMNAL_DB)");
    };
    let collection = load_dataset_file(dataset)
        .with_context(|| format!("failed to load dataset {}", dataset.display()))?;
    info!(
        "event=cli_load module=cli status=ok source=dataset hymns={}",
        collection.hymns.len()
    );
    Ok(HymnIndex::from_collection(collection))
}

fn print_list(index: &HymnIndex, filter: &HymnFilter) {
    if filter.query.is_empty() {
        if let Some(section) = index.current_section(filter) {
            println!("== {} ==", section.title);
            if !section.description.is_empty() {
                println!("{}", section.description);
            }
        }
    }

    let hits = index.filter(filter);
    for hymn in &hits {
        let marker = if number_matches(hymn, &filter.query) { "*" } else { "" };
        println!(
            "{marker}{}. {} [{}]",
            hymn.number,
            hymn.title,
            index.section_info(&hymn.section).title
        );
        let preview = hymn.preview_line();
        if !preview.is_empty() {
            println!("    {preview}");
        }
    }
    println!("{}", SearchSummary::new(hits.len(), &filter.query).message);
}

fn print_hymn(index: &HymnIndex, hymn: &HymnRecord) {
    let section = index.section_info(&hymn.section);
    println!("== {} ==", section.title);
    if !section.description.is_empty() {
        println!("{}", section.description);
    }
    println!();
    println!(
        "Hymn #{} {}{}",
        hymn.number,
        hymn.title,
        if hymn.favorited { " (favorite)" } else { "" }
    );

    if let Some(refrain) = &hymn.refrain {
        println!();
        println!("Refrain");
        for line in refrain.lines() {
            println!("  {line}");
        }
    }

    for verse in get_all_verses(hymn)
        .into_iter()
        .filter(|verse| !verse.text.trim().is_empty())
    {
        println!();
        println!("Verse {}", verse.number);
        for line in verse.text.lines() {
            println!("  {line}");
        }
    }
    println!();
}
