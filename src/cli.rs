use chrono::Utc;
use dialoguer::Confirm;
use std::path::PathBuf;
use std::sync::Arc;

use printbay_protocol::api::{PrintLogQuery, UpdateBackupSettingsRequest};
use printbay_protocol::Archive;

use crate::archive::ArchiveService;
use crate::backup::{export_archives, BackupService};
use crate::cache::ResourceCache;
use crate::client::{ApiClient, HttpClient};
use crate::config::{default_config_path, AppConfig};
use crate::engine::{self, ArchiveView};
use crate::error::{PrintBayError, Result};
use crate::log::LogService;
use crate::plug::PlugService;
use crate::prefs::{default_prefs_path, ViewPrefs};
use crate::render;
use crate::selection::{BulkAction, BulkService, SelectionSet};
use crate::ui::UI;
use crate::{
    AssignArgs, BackupCommand, Commands, ConfigCommand, DeleteArgs, ExportArgs, FavoriteArgs,
    FilterArgs, ListArgs, LogArgs, PlugArgs, SelectArgs, ShowArgs, TagArgs,
};

/// Resolve the effective view: explicit flags define the whole view,
/// otherwise the persisted preferences apply unchanged.
pub fn resolve_view(prefs: &ViewPrefs, filter: &FilterArgs) -> ArchiveView {
    if filter.is_explicit() {
        filter.to_view()
    } else {
        prefs.view.clone()
    }
}

/// CLI handler for processing commands
pub struct CliHandler {
    config_path: Option<PathBuf>,
    cache: ResourceCache,
    ui: UI,
}

impl CliHandler {
    /// Create a new CLI handler with an optional custom config path
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            cache: ResourceCache::default(),
            ui: UI::new(),
        }
    }

    async fn load_config(&self) -> Result<AppConfig> {
        AppConfig::load(self.config_path.as_deref()).await
    }

    async fn build_client(&self) -> Result<HttpClient> {
        let config = self.load_config().await?;
        HttpClient::new(config.to_client_config())
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::List(args) => self.handle_list(args).await,
            Commands::Show(args) => self.handle_show(args).await,
            Commands::Favorite(args) => self.handle_favorite(args).await,
            Commands::Tag(args) => self.handle_tag(args).await,
            Commands::Assign(args) => self.handle_assign(args).await,
            Commands::Delete(args) => self.handle_delete(args).await,
            Commands::Export(args) => self.handle_export(args).await,
            Commands::Log(args) => self.handle_log(args).await,
            Commands::Plugs => self.handle_plugs().await,
            Commands::Plug(args) => self.handle_plug(args).await,
            Commands::Backup(args) => self.handle_backup(args.command).await,
            Commands::Config(args) => self.handle_config(args.command).await,
            Commands::Status => self.handle_status().await,
        }
    }

    /// Fetch the archive list and apply the current view to it.
    async fn filtered_archives<C: ApiClient>(
        &mut self,
        client: &C,
        view: &ArchiveView,
        default_printer: Option<i64>,
    ) -> Result<Vec<Archive>> {
        let service = ArchiveService::new(client);
        // A printer filter scopes the fetch itself so the server does the
        // cheap part; everything else filters client-side.
        let printer_scope = view.filters.printer_id.or(default_printer);
        let archives = service.list(&mut self.cache, printer_scope).await?;
        Ok(engine::apply(&archives, view, Utc::now()))
    }

    /// Handle list command
    async fn handle_list(&mut self, args: ListArgs) -> Result<()> {
        let config = self.load_config().await?;
        let client = HttpClient::new(config.to_client_config())?;

        let prefs_path = default_prefs_path();
        let prefs = ViewPrefs::load(&prefs_path).await;
        let view = resolve_view(&prefs, &args.filter);
        let mode = args.view.unwrap_or(prefs.view_mode);

        let filtered = self
            .filtered_archives(&client, &view, config.default_printer)
            .await?;
        render::render_archives(&self.ui, &filtered, mode, Utc::now());

        if args.save_prefs {
            let new_prefs = ViewPrefs {
                view_mode: mode,
                view,
            };
            new_prefs.save(&prefs_path).await?;
            self.ui.info("View preferences saved");
        }
        Ok(())
    }

    /// Handle show command
    async fn handle_show(&mut self, args: ShowArgs) -> Result<()> {
        let client = self.build_client().await?;
        let service = ArchiveService::new(&client);
        let archive = service.get(args.id).await?;
        render::render_detail(&self.ui, &archive, args.pane);
        Ok(())
    }

    /// Build the selection for a bulk command: explicit ids, or the whole
    /// filtered view when --all-filtered is given.
    async fn build_selection<C: ApiClient>(
        &mut self,
        client: &C,
        select: &SelectArgs,
        default_printer: Option<i64>,
    ) -> Result<SelectionSet> {
        let mut selection = SelectionSet::new();

        if select.all_filtered {
            let prefs = ViewPrefs::load(&default_prefs_path()).await;
            let view = resolve_view(&prefs, &select.filter);
            let filtered = self
                .filtered_archives(client, &view, default_printer)
                .await?;
            selection.select_all(&filtered);
        } else {
            if select.ids.is_empty() {
                return Err(PrintBayError::invalid_input(
                    "Provide --ids or --all-filtered",
                ));
            }
            selection.extend(select.ids.iter().copied());
        }

        Ok(selection)
    }

    async fn run_bulk(
        &mut self,
        select: &SelectArgs,
        action: BulkAction,
    ) -> Result<()> {
        let config = self.load_config().await?;
        let client = Arc::new(HttpClient::new(config.to_client_config())?);

        let selection = self
            .build_selection(client.as_ref(), select, config.default_printer)
            .await?;

        let service = BulkService::new(client, true);
        service.dispatch(&selection, action, &mut self.cache).await?;
        Ok(())
    }

    /// Handle favorite command
    async fn handle_favorite(&mut self, args: FavoriteArgs) -> Result<()> {
        self.run_bulk(&args.select, BulkAction::SetFavorite(!args.unset))
            .await
    }

    /// Handle tag command
    async fn handle_tag(&mut self, args: TagArgs) -> Result<()> {
        self.run_bulk(&args.select, BulkAction::SetTags(args.tags.clone()))
            .await
    }

    /// Handle assign command
    async fn handle_assign(&mut self, args: AssignArgs) -> Result<()> {
        let project_id = if args.detach { None } else { args.project_id };
        self.run_bulk(&args.select, BulkAction::AssignProject(project_id))
            .await
    }

    /// Handle delete command - destructive, so confirm first
    async fn handle_delete(&mut self, args: DeleteArgs) -> Result<()> {
        let config = self.load_config().await?;
        let client = Arc::new(HttpClient::new(config.to_client_config())?);

        let selection = self
            .build_selection(client.as_ref(), &args.select, config.default_printer)
            .await?;

        if !args.force {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Delete {} archive(s)? This cannot be undone",
                    selection.len()
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                return Err(PrintBayError::user_cancelled());
            }
        }

        let service = BulkService::new(client, true);
        service
            .dispatch(&selection, BulkAction::Delete, &mut self.cache)
            .await?;
        Ok(())
    }

    /// Handle export command
    async fn handle_export(&mut self, args: ExportArgs) -> Result<()> {
        let config = self.load_config().await?;
        let client = HttpClient::new(config.to_client_config())?;

        let prefs = ViewPrefs::load(&default_prefs_path()).await;
        let view = resolve_view(&prefs, &args.filter);
        let filtered = self
            .filtered_archives(&client, &view, config.default_printer)
            .await?;

        let count = export_archives(&filtered, &args.output).await?;
        self.ui.success(&format!(
            "Exported {} archive(s) to {}",
            count,
            args.output.display()
        ));
        Ok(())
    }

    /// Handle log command
    async fn handle_log(&mut self, args: LogArgs) -> Result<()> {
        let client = self.build_client().await?;
        let service = LogService::new(&client);

        let query = PrintLogQuery {
            search: args.search,
            printer_id: args.printer,
            username: args.username,
            status: args.status,
            from: args.from,
            to: args.to,
            limit: args.limit,
            offset: args.offset,
        };
        let page = service.page(&query).await?;
        render::render_log_page(&self.ui, &page);
        Ok(())
    }

    /// Handle plugs command
    async fn handle_plugs(&mut self) -> Result<()> {
        let client = self.build_client().await?;
        let service = PlugService::new(&client);
        let plugs = service.list().await?;
        render::render_plugs(&self.ui, &plugs);
        Ok(())
    }

    /// Handle plug command
    async fn handle_plug(&mut self, args: PlugArgs) -> Result<()> {
        if args.on == args.off {
            return Err(PrintBayError::invalid_input("Specify either --on or --off"));
        }

        let client = self.build_client().await?;
        let service = PlugService::new(&client);
        let plug = service.set_state(args.id, args.on).await?;
        self.ui.success(&format!(
            "Plug {} ({}) is now {}",
            plug.id,
            plug.name,
            self.ui.format_plug_state(plug.on)
        ));
        Ok(())
    }

    /// Handle backup command
    async fn handle_backup(&mut self, command: BackupCommand) -> Result<()> {
        let client = self.build_client().await?;
        let service = BackupService::new(&client);

        let settings = match command {
            BackupCommand::Show => service.settings().await?,
            BackupCommand::Set {
                enabled,
                interval_hours,
                keep_copies,
                target_dir,
            } => {
                let request = UpdateBackupSettingsRequest {
                    enabled,
                    interval_hours,
                    keep_copies,
                    target_dir,
                };
                service.update(&request).await?
            }
        };

        self.ui.card(
            "Backup",
            vec![
                ("Enabled", settings.enabled.to_string()),
                ("Interval", format!("{} h", settings.interval_hours)),
                ("Keep copies", settings.keep_copies.to_string()),
                ("Target", settings.target_dir.clone()),
                (
                    "Last backup",
                    settings
                        .last_backup_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "never".to_string()),
                ),
            ],
        );
        Ok(())
    }

    /// Handle config command
    async fn handle_config(&mut self, command: ConfigCommand) -> Result<()> {
        let path = self
            .config_path
            .clone()
            .unwrap_or_else(default_config_path);
        let mut config = self.load_config().await?;

        match command {
            ConfigCommand::Show => {
                self.ui.card(
                    "Configuration",
                    vec![
                        ("Endpoint", config.endpoint.clone()),
                        ("Timeout", format!("{} s", config.timeout)),
                        (
                            "API key",
                            if config.api_key.is_some() {
                                "set".to_string()
                            } else {
                                "not set".to_string()
                            },
                        ),
                        (
                            "Default printer",
                            config
                                .default_printer
                                .map(|id| id.to_string())
                                .unwrap_or_else(|| "-".to_string()),
                        ),
                        ("Config file", path.display().to_string()),
                    ],
                );
                return Ok(());
            }
            ConfigCommand::SetEndpoint { url } => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(PrintBayError::invalid_input(
                        "Endpoint must be an http(s) URL",
                    ));
                }
                config.endpoint = url;
            }
            ConfigCommand::SetTimeout { seconds } => {
                if seconds == 0 {
                    return Err(PrintBayError::invalid_input("Timeout must be positive"));
                }
                config.timeout = seconds;
            }
            ConfigCommand::SetApiKey { key } => config.api_key = Some(key),
            ConfigCommand::SetDefaultPrinter { printer_id } => {
                config.default_printer = Some(printer_id)
            }
            ConfigCommand::ClearDefaultPrinter => config.default_printer = None,
            ConfigCommand::Reset => config = AppConfig::default(),
        }

        config.save(&path).await?;
        self.ui.success("Configuration updated");
        Ok(())
    }

    /// Handle status command
    async fn handle_status(&mut self) -> Result<()> {
        let config = self.load_config().await?;
        let client = HttpClient::new(config.to_client_config())?;

        let (server_connected, server_msg) = match client.ping().await {
            Ok(()) => (true, String::new()),
            Err(e) => (false, e.to_string()),
        };

        let server = if server_connected {
            self.ui.format_server_status(true)
        } else {
            format!("{} ({})", self.ui.format_server_status(false), server_msg)
        };

        self.ui.card(
            "Status",
            vec![
                ("Version", env!("CARGO_PKG_VERSION").to_string()),
                ("Endpoint", config.endpoint.clone()),
                ("Server", server),
                (
                    "Default printer",
                    config
                        .default_printer
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                (
                    "Preferences",
                    default_prefs_path().display().to_string(),
                ),
            ],
        );
        Ok(())
    }
}
