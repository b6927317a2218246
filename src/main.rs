//! newfile-template CLI entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use newfile_template::config::{JsonFileStore, Settings, SettingsStore, Trigger};
use newfile_template::host::ViewMode;
use newfile_template::plugin::{NewFileTemplatePlugin, CREATE_COMMAND_ID};
use newfile_template::template::{Clock, FixedClock, SystemClock};
use newfile_template::vault::FsVault;
use newfile_template::{template, ui};

#[derive(Parser)]
#[command(name = "newfile-template")]
#[command(about = "Insert a dated template into new notes")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to ~/.newfile-template/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Render dates at this RFC 3339 time instead of now
    #[arg(long, global = true)]
    at: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new note from the template (Untitled.md, Untitled 1.md, ...)
    New {
        /// Vault directory
        #[arg(short, long, default_value = ".")]
        vault: PathBuf,
    },

    /// Open a note, filling it with the template if it is empty
    Open {
        /// Note to open, relative to the vault or absolute
        file: PathBuf,

        /// Vault directory
        #[arg(short, long, default_value = ".")]
        vault: PathBuf,

        /// Open in reading view (templates are only inserted in source mode)
        #[arg(long)]
        preview: bool,
    },

    /// Print a rendered template
    Render {
        /// Template text (defaults to the configured template)
        #[arg(short, long)]
        template: Option<String>,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the current settings
    Show,

    /// Print the settings file path
    Path,

    /// Set the template from an argument or a file
    Set {
        /// New template text
        value: Option<String>,

        /// Read the template from this file
        #[arg(short, long, conflicts_with = "value")]
        file: Option<PathBuf>,
    },

    /// Choose the active flow: on-open, command or both
    Trigger { value: Trigger },

    /// Restore default settings
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = match &cli.config {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::default_location(),
    };

    let clock: Arc<dyn Clock> = match &cli.at {
        Some(at) => Arc::new(FixedClock::parse(at)?),
        None => Arc::new(SystemClock),
    };

    match cli.command {
        Commands::New { vault } => {
            let plugin = NewFileTemplatePlugin::load(Box::new(store), clock)?;
            let mut vault = FsVault::new(vault);

            let created = plugin.run_command(CREATE_COMMAND_ID, &mut vault).await?;
            match vault.active_editor() {
                Some(editor) if created => {
                    ui::print_success(&format!("Created {}", editor.path().display()));
                    ui::print_step(&format!("Vault: {}", vault.root().display()));
                }
                _ => {
                    ui::print_error("No free Untitled name left in this vault");
                    bail!("could not create a new note");
                }
            }
            plugin.unload();
        }

        Commands::Open { file, vault, preview } => {
            let plugin = NewFileTemplatePlugin::load(Box::new(store), clock)?;
            let mode = if preview { ViewMode::Preview } else { ViewMode::Source };
            let mut vault = FsVault::new(vault).with_view_mode(mode);

            let entry = vault
                .open(&file)
                .await
                .with_context(|| format!("failed to open {}", file.display()))?;

            if plugin.on_file_open(Some(&entry), &mut vault).await? {
                ui::print_success(&format!("Filled {} from template", entry.path.display()));
                if let Some(cursor) = vault.active_editor().and_then(|e| e.cursor) {
                    ui::print_step(&format!("Cursor at line {}, column {}", cursor.line, cursor.ch));
                }
            } else {
                ui::print_step(&format!("{} left unchanged", entry.path.display()));
            }
            plugin.unload();
        }

        Commands::Render { template: text } => {
            let text = match text {
                Some(text) => text,
                None => store.load()?.template,
            };
            print!("{}", template::render(&text, &clock.now()));
        }

        Commands::Config { action } => run_config(action, store, clock)?,
    }

    Ok(())
}

fn run_config(action: ConfigAction, store: JsonFileStore, clock: Arc<dyn Clock>) -> Result<()> {
    use inquire::Confirm;

    match action {
        ConfigAction::Show => {
            let path = store.path().to_path_buf();
            let mut plugin = NewFileTemplatePlugin::load(Box::new(store), clock)?;
            let trigger = plugin.settings().trigger;
            let input = plugin.settings_tab().display();

            ui::print_header("Settings");
            ui::print_step(&format!("File: {}", path.display()));
            ui::print_step(&format!("Trigger: {:?}", trigger));
            ui::print_step(&format!("Date tokens: {}", template::count_tokens(&input.value)));
            ui::print_step(&input.description.replace('\n', " - "));
            ui::print_block(input.name, &input.value);
        }

        ConfigAction::Path => {
            println!("{}", store.path().display());
        }

        ConfigAction::Set { value, file } => {
            let value = match (value, file) {
                (Some(value), None) => value,
                (None, Some(file)) => std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?,
                _ => bail!("pass the template text or --file"),
            };

            let mut plugin = NewFileTemplatePlugin::load(Box::new(store), clock)?;
            plugin.settings_tab().on_change(&value)?;
            ui::print_success("Template saved");
        }

        ConfigAction::Trigger { value } => {
            let mut plugin = NewFileTemplatePlugin::load(Box::new(store), clock)?;
            let settings = Settings { trigger: value, ..plugin.settings().clone() };
            plugin.update_settings(settings)?;
            ui::print_success(&format!("Trigger set to {:?}", value));
        }

        ConfigAction::Reset { yes } => {
            ui::print_warning("This restores the default template.");

            let confirmed = yes
                || Confirm::new("Reset settings to defaults?")
                    .with_default(false)
                    .prompt()
                    .context("prompt failed")?;

            if confirmed {
                if store.remove()? {
                    ui::print_success("Settings reset.");
                } else {
                    ui::print_step("No settings file found.");
                }
            } else {
                ui::print_step("Reset cancelled.");
            }
        }
    }

    Ok(())
}
