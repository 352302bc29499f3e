//! CLI entry point for sigil-shortcuts
//!
//! Inspects and edits a shortcut store file: list bindings, check for
//! conflicts, assign/clear/reset bindings, and try the key normaliser
//! on synthetic key events.

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use sigil_shortcuts::{
    config::FileStore,
    core::{translator_for, Key, KeySequence, ModifierSet, Platform, RawKeyEvent},
    ui::{view, AssignmentController},
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sigil-shortcuts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the shortcut store file
    #[arg(short, long, global = true, default_value = "~/.config/sigil/shortcuts.conf")]
    store: PathBuf,

    /// Platform conventions for key translation and display
    #[arg(short, long, global = true, value_enum)]
    platform: Option<PlatformArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    Generic,
    Macos,
    Windows,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Generic => Platform::Generic,
            PlatformArg::Macos => Platform::MacOs,
            PlatformArg::Windows => Platform::Windows,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all shortcuts
    List {
        /// Only show shortcuts whose name, description or sequence match
        #[arg(short, long)]
        filter: Option<String>,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check for shortcut conflicts
    Check,

    /// Bind a sequence to a shortcut, unbinding its previous holder
    Assign {
        /// Shortcut id
        id: String,
        /// Sequence in portable text, e.g. "Ctrl+Shift+K"
        sequence: String,
    },

    /// Unbind a shortcut
    Clear {
        /// Shortcut id
        id: String,
    },

    /// Restore a shortcut's default binding
    Reset {
        /// Shortcut id
        id: String,
    },

    /// Restore every shortcut's default binding
    ResetAll,

    /// Normalise a synthetic key event
    Normalize {
        /// Key name, e.g. "K", "2", "F5", "Backspace"
        #[arg(short, long)]
        key: String,

        /// Held modifiers: ctrl, alt, meta, shift, altgr
        #[arg(short, long, value_delimiter = ',')]
        mods: Vec<String>,

        /// Text the key press produced
        #[arg(short, long, default_value = "")]
        text: String,

        /// Native virtual-key code (Windows)
        #[arg(long, default_value_t = 0)]
        vk: u32,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let platform = cli.platform.map(Platform::from).unwrap_or_else(Platform::current);

    match cli.command {
        Commands::List { filter, json } => list_shortcuts(&cli.store, platform, filter, json)?,
        Commands::Check => check_conflicts(&cli.store, platform)?,
        Commands::Assign { id, sequence } => assign(&cli.store, platform, &id, &sequence)?,
        Commands::Clear { id } => edit(&cli.store, platform, &id, Edit::Clear)?,
        Commands::Reset { id } => edit(&cli.store, platform, &id, Edit::Reset)?,
        Commands::ResetAll => reset_all(&cli.store, platform)?,
        Commands::Normalize { key, mods, text, vk } => {
            normalize(platform, &key, &mods, &text, vk)?
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `SIGIL_SHORTCUTS_LOG` (default: warn)
fn init_logging() {
    let filter = EnvFilter::try_from_env("SIGIL_SHORTCUTS_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Expand tilde and open the store
fn open_store(store_path: &Path) -> anyhow::Result<FileStore> {
    let expanded_path = shellexpand::tilde(
        store_path
            .to_str()
            .ok_or_else(|| anyhow!("Invalid path encoding"))?,
    );
    let path = PathBuf::from(expanded_path.as_ref());

    FileStore::open(path.clone())
        .with_context(|| format!("Failed to open shortcut store {}", path.display()))
}

/// List all shortcuts in the store
fn list_shortcuts(
    store_path: &Path,
    platform: Platform,
    filter: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let store = open_store(store_path)?;
    let mut controller = AssignmentController::load(&store, platform);
    if let Some(query) = filter {
        controller.set_filter(&query);
    }

    let rows = view::rows(&controller);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", format!("Shortcuts from: {}\n", store.path().display()).bold());

    for row in &rows {
        let sequence = if row.sequence.is_empty() {
            "(unbound)".dimmed()
        } else if row.conflict {
            row.sequence.red().bold()
        } else {
            row.sequence.cyan().bold()
        };

        println!("{:<32} {} {}", row.name, sequence, row.description.dimmed());
    }

    println!(
        "\n{} Showing {} of {} shortcuts",
        "✓".green(),
        rows.len(),
        controller.registry().len()
    );

    Ok(())
}

/// Check the store for shortcut conflicts
fn check_conflicts(store_path: &Path, platform: Platform) -> anyhow::Result<()> {
    let store = open_store(store_path)?;

    println!("{} Checking store: {}", "→".cyan(), store.path().display());

    let controller = AssignmentController::load(&store, platform);
    let registry = controller.registry();

    println!("{} Found {} shortcuts\n", "✓".green(), registry.len());

    let conflicts = controller.detector().find_conflicts();

    if conflicts.is_empty() {
        println!("{} {}", "✓".green().bold(), "No conflicts detected!".bold());
        return Ok(());
    }

    println!(
        "{} Found {} conflict{}:\n",
        "✗".red().bold(),
        conflicts.len(),
        if conflicts.len() == 1 { "" } else { "s" }
    );

    for (i, conflict) in conflicts.iter().enumerate() {
        println!(
            "{} {}",
            format!("Conflict {}", i + 1).yellow().bold(),
            conflict.sequence.display_text(platform).cyan()
        );

        for (idx, id) in conflict.ids.iter().enumerate() {
            let name = registry.get(id).map(|entry| entry.name.as_str()).unwrap_or("");
            println!("  {} {} ({})", format!("{}.", idx + 1).dimmed(), name, id.magenta());
        }
        println!();
    }

    println!("{}", "⚠ These shortcuts will conflict in Sigil!".yellow());
    std::process::exit(1);
}

/// Bind `sequence` to `id` and save
fn assign(store_path: &Path, platform: Platform, id: &str, sequence: &str) -> anyhow::Result<()> {
    let sequence: KeySequence = sequence
        .parse()
        .with_context(|| format!("Invalid key sequence '{}'", sequence))?;

    let mut store = open_store(store_path)?;
    let mut controller = AssignmentController::load(&store, platform);
    select(&mut controller, id)?;

    controller.stage(sequence.clone());
    let cleared = controller.commit();

    for cleared_id in &cleared {
        let name = controller
            .registry()
            .get(cleared_id)
            .map(|entry| entry.name.clone())
            .unwrap_or_default();
        println!("{} Unbound {} ({})", "⚠".yellow(), name, cleared_id.magenta());
    }

    save(&mut controller, &mut store)?;
    println!(
        "{} {} = {}",
        "✓".green(),
        id,
        sequence.display_text(platform).cyan().bold()
    );

    Ok(())
}

enum Edit {
    Clear,
    Reset,
}

/// Clear or reset a single shortcut and save
fn edit(store_path: &Path, platform: Platform, id: &str, edit: Edit) -> anyhow::Result<()> {
    let mut store = open_store(store_path)?;
    let mut controller = AssignmentController::load(&store, platform);
    select(&mut controller, id)?;

    match edit {
        Edit::Clear => controller.remove(),
        Edit::Reset => controller.reset_selected(),
    }

    save(&mut controller, &mut store)?;

    let text = view::target_text(&controller);
    if text.is_empty() {
        println!("{} {} is unbound", "✓".green(), id);
    } else {
        println!("{} {} = {}", "✓".green(), id, text.cyan().bold());
    }

    Ok(())
}

/// Restore every default and save
fn reset_all(store_path: &Path, platform: Platform) -> anyhow::Result<()> {
    let mut store = open_store(store_path)?;
    let mut controller = AssignmentController::load(&store, platform);

    controller.reset_all();
    save(&mut controller, &mut store)?;

    println!(
        "{} Restored defaults for {} shortcuts",
        "✓".green(),
        controller.registry().len()
    );

    Ok(())
}

fn select(controller: &mut AssignmentController, id: &str) -> anyhow::Result<()> {
    if !controller.select(Some(id)) {
        bail!("Unknown shortcut id '{}'", id);
    }
    Ok(())
}

fn save(controller: &mut AssignmentController, store: &mut FileStore) -> anyhow::Result<()> {
    let outcome = controller
        .save(store)
        .context("Failed to save shortcut store")?;

    if let Some(backup) = store.last_backup() {
        println!("{} {}", "Backup:".dimmed(), backup.display());
    }
    if outcome.restart_required {
        println!("{}", "Restart Sigil for the AltGr setting to take effect.".yellow());
    }
    Ok(())
}

/// Run the platform translator on a synthetic event
fn normalize(
    platform: Platform,
    key: &str,
    mods: &[String],
    text: &str,
    vk: u32,
) -> anyhow::Result<()> {
    let mut modifiers = ModifierSet::empty();
    for name in mods {
        let flag = match name.trim().to_lowercase().as_str() {
            "ctrl" | "control" => ModifierSet::CTRL,
            "alt" | "option" => ModifierSet::ALT,
            "meta" | "cmd" | "super" => ModifierSet::META,
            "shift" => ModifierSet::SHIFT,
            "altgr" => ModifierSet::GROUP_SWITCH,
            other => bail!("Unknown modifier '{}'", other),
        };
        modifiers |= flag;
    }

    let event = RawKeyEvent::new(Key::from_name(key), modifiers, text).with_virtual_key(vk);
    let translator = translator_for(platform);

    match translator.normalize(&event) {
        Ok(sequence) => {
            println!("{} {}", "portable:".dimmed(), sequence.to_string().cyan().bold());
            println!("{} {}", "display: ".dimmed(), sequence.display_text(platform));
        }
        Err(rejection) => {
            println!("{} {}", "rejected:".yellow(), rejection);
        }
    }

    Ok(())
}
