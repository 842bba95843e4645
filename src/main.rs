use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod archive;
mod backup;
mod cache;
mod cli;
mod client;
mod config;
mod engine;
mod error;
mod log;
mod plug;
mod prefs;
mod render;
mod selection;
mod ui;

#[cfg(test)]
mod tests;

use cli::CliHandler;
use engine::{Collection, ColorMatch, FileKind, SortKey};
use render::{DetailPane, ViewMode};

#[derive(Parser)]
#[command(
    name = "printbay",
    about = "PrintBay farm archive and device management tool",
    long_about = "PrintBay - print farm archive browser and device control

OVERVIEW:
  Browse, filter, tag and bulk-edit your farm's print archive, read the
  print log, switch smart plugs and manage backup settings.

QUICK START:
  printbay list --collection week --sort date-desc   # browse recent prints
  printbay list --material PLA --hide-failed         # filtered list
  printbay favorite --ids 12,15                      # mark favorites
  printbay delete --all-filtered --search test       # bulk delete a view
  printbay log --printer 2 --limit 25                # server-side log page
  printbay plugs                                     # smart plug states
  printbay status                                    # connectivity check",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the archive with filters, collections and view modes
    #[command(aliases = &["ls"])]
    List(ListArgs),

    /// Show one archive in detail
    Show(ShowArgs),

    /// Set or clear the favorite flag on selected archives
    #[command(aliases = &["fav"])]
    Favorite(FavoriteArgs),

    /// Replace the tags of selected archives
    Tag(TagArgs),

    /// Assign selected archives to a project (or detach them)
    Assign(AssignArgs),

    /// Delete selected archives from the server
    #[command(aliases = &["rm"])]
    Delete(DeleteArgs),

    /// Export the current filtered view as JSON
    Export(ExportArgs),

    /// Query the server-side print log
    Log(LogArgs),

    /// List smart plugs and their states
    Plugs,

    /// Switch a smart plug on or off
    Plug(PlugArgs),

    /// Show or change backup settings
    Backup(BackupArgs),

    /// Configure settings
    #[command(aliases = &["cfg"])]
    Config(ConfigArgs),

    /// Show connectivity and configuration status
    #[command(aliases = &["st"])]
    Status,
}

/// Shared filter flags; the same view narrows `list`, `export` and every
/// `--all-filtered` bulk command.
#[derive(Args, Clone, Default)]
pub struct FilterArgs {
    /// Categorical collection (all, recent, week, month, favorites, failed, duplicates)
    #[arg(long)]
    pub collection: Option<Collection>,

    /// Case-insensitive substring match on the display name
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only archives printed on this printer id
    #[arg(long)]
    pub printer: Option<i64>,

    /// Only archives using this material (e.g. PLA)
    #[arg(long)]
    pub material: Option<String>,

    /// Filter by color; repeat for multiple colors
    #[arg(long = "color")]
    pub colors: Vec<String>,

    /// Require all selected colors instead of any
    #[arg(long)]
    pub match_all_colors: bool,

    /// Only favorites
    #[arg(long)]
    pub favorites: bool,

    /// Hide failed and aborted prints
    #[arg(long)]
    pub hide_failed: bool,

    /// Only archives carrying this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Only sliced gcode or only source files
    #[arg(long)]
    pub kind: Option<FileKind>,

    /// Sort order
    #[arg(long)]
    pub sort: Option<SortKey>,
}

impl FilterArgs {
    /// True when any flag was provided, i.e. the command line defines its
    /// own view instead of the persisted one.
    pub fn is_explicit(&self) -> bool {
        self.collection.is_some()
            || self.search.is_some()
            || self.printer.is_some()
            || self.material.is_some()
            || !self.colors.is_empty()
            || self.match_all_colors
            || self.favorites
            || self.hide_failed
            || self.tag.is_some()
            || self.kind.is_some()
            || self.sort.is_some()
    }

    pub fn to_view(&self) -> engine::ArchiveView {
        engine::ArchiveView {
            collection: self.collection.unwrap_or_default(),
            filters: engine::FilterSet {
                search: self.search.clone(),
                printer_id: self.printer,
                material: self.material.clone(),
                colors: self.colors.clone(),
                color_match: if self.match_all_colors {
                    ColorMatch::All
                } else {
                    ColorMatch::Any
                },
                favorites_only: self.favorites,
                hide_failed: self.hide_failed,
                tag: self.tag.clone(),
                file_kind: self.kind,
            },
            sort: self.sort.unwrap_or_default(),
        }
    }
}

/// Target selection shared by bulk commands.
#[derive(Args, Clone, Default)]
pub struct SelectArgs {
    /// Explicit archive ids (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<i64>,

    /// Select every archive in the current filtered view
    #[arg(long)]
    pub all_filtered: bool,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Layout: grid, list or calendar
    #[arg(long)]
    pub view: Option<ViewMode>,

    /// Persist the resolved view as the new default
    #[arg(long)]
    pub save_prefs: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: i64,

    /// Which detail pane to display
    #[arg(long, default_value = "summary")]
    pub pane: DetailPane,
}

#[derive(Args)]
pub struct FavoriteArgs {
    #[command(flatten)]
    pub select: SelectArgs,

    /// Clear the flag instead of setting it
    #[arg(long)]
    pub unset: bool,
}

#[derive(Args)]
pub struct TagArgs {
    /// New comma-separated tag list (replaces existing tags)
    pub tags: String,

    #[command(flatten)]
    pub select: SelectArgs,
}

#[derive(Args)]
pub struct AssignArgs {
    /// Target project id; omit together with --detach to clear
    #[arg(required_unless_present = "detach")]
    pub project_id: Option<i64>,

    /// Detach the archives from their project
    #[arg(long, conflicts_with = "project_id")]
    pub detach: bool,

    #[command(flatten)]
    pub select: SelectArgs,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub select: SelectArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output file
    #[arg(short, long, default_value = "printbay-export.json")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct LogArgs {
    /// Substring match on the job name (server-side)
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long)]
    pub printer: Option<i64>,

    #[arg(long)]
    pub username: Option<String>,

    /// completed, failed, aborted or printing
    #[arg(long)]
    pub status: Option<String>,

    /// Only entries started on/after this instant (RFC 3339)
    #[arg(long)]
    pub from: Option<chrono::DateTime<chrono::Utc>>,

    /// Only entries started before this instant (RFC 3339)
    #[arg(long)]
    pub to: Option<chrono::DateTime<chrono::Utc>>,

    #[arg(long, default_value_t = log::DEFAULT_PAGE_SIZE)]
    pub limit: u32,

    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

#[derive(Args)]
pub struct PlugArgs {
    pub id: i64,

    /// Switch on
    #[arg(long, conflicts_with = "off")]
    pub on: bool,

    /// Switch off
    #[arg(long)]
    pub off: bool,
}

#[derive(Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupCommand,
}

#[derive(Subcommand)]
pub enum BackupCommand {
    /// Show the current backup settings
    Show,
    /// Update backup settings (only provided fields change)
    Set {
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        interval_hours: Option<u32>,
        #[arg(long)]
        keep_copies: Option<u32>,
        #[arg(long)]
        target_dir: Option<String>,
    },
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    SetEndpoint { url: String },
    SetTimeout { seconds: u64 },
    SetApiKey { key: String },
    SetDefaultPrinter { printer_id: i64 },
    ClearDefaultPrinter,
    Reset,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(format!("printbay={}", log_level));
    subscriber.init();

    let mut handler = CliHandler::new(None);

    if let Err(e) = handler.execute(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
