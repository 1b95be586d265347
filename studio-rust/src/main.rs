use clap::{Args, Parser, Subcommand};
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;
use uigen::{Dispatcher, GeneratedArtifact, Provider};
use uigen_studio::{
    export, find_suggestion, FileStore, SessionStore, Studio, StudioConfig, StudioError,
    SUGGESTIONS,
};

#[derive(Parser)]
#[command(version, about = "Generate UI components from natural-language prompts")]
struct Cli {
    /// Directory holding history and settings (overrides UIGEN_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a component and add it to the history.
    Generate {
        #[arg(required_unless_present = "suggestion", num_args = 1..)]
        prompt: Vec<String>,
        /// Use a starter prompt, by number or label (see `suggestions`).
        #[arg(long, short, conflicts_with = "prompt")]
        suggestion: Option<String>,
    },
    /// List starter prompts.
    Suggestions,
    /// List generated components, most recent first.
    History,
    /// Print a generated component.
    Show {
        id: String,
        /// Print only the component source.
        #[arg(long, conflicts_with = "preview")]
        code: bool,
        /// Print only the preview document.
        #[arg(long)]
        preview: bool,
    },
    /// Remove a component from the history.
    Delete { id: String },
    /// Write a component to disk.
    Export {
        id: String,
        /// Write a project archive instead of a single source file.
        #[arg(long)]
        archive: bool,
        /// Also write the preview document.
        #[arg(long)]
        preview: bool,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// List supported providers and their default models.
    Providers,
    /// Inspect or change the provider settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    Set(SetSettings),
}

#[derive(Args)]
struct SetSettings {
    /// Switching provider also resets the model to that provider's default.
    #[arg(long)]
    provider: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long, conflicts_with = "clear_base_url")]
    base_url: Option<String>,
    #[arg(long)]
    clear_base_url: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), StudioError> {
    let mut config = StudioConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let store = SessionStore::new(FileStore::open(&config.data_dir)?);
    let studio = Studio::open(
        Dispatcher::with_defaults(config.dispatcher_options()),
        store,
    );

    match cli.command {
        Command::Generate { prompt, suggestion } => {
            let prompt = match suggestion {
                Some(key) => find_suggestion(&key)
                    .map(|suggestion| suggestion.prompt.to_string())
                    .ok_or(StudioError::UnknownSuggestion(key))?,
                None => prompt.join(" "),
            };
            let artifact = studio.generate(&prompt).await?;
            println!("{}  {}", artifact.id, artifact.name);
            println!("{}", artifact.description);
        }
        Command::History => {
            for artifact in studio.history().iter() {
                println!(
                    "{}  {}  {}",
                    artifact.id, artifact.timestamp, artifact.name
                );
            }
        }
        Command::Show { id, code, preview } => {
            let artifact = studio.select(&id)?;
            if code {
                println!("{}", artifact.code);
            } else if preview {
                println!("{}", artifact.preview_html);
            } else {
                print_artifact(&artifact);
            }
        }
        Command::Delete { id } => {
            let removed = studio.delete(&id)?;
            println!("Deleted {}  {}", removed.id, removed.name);
        }
        Command::Export {
            id,
            archive,
            preview,
            out,
        } => {
            let artifact = studio.find(&id)?;
            let path = if archive {
                export::export_archive(&artifact, &out)?
            } else {
                export::export_source(&artifact, &out)?
            };
            println!("{}", path.display());
            if preview {
                println!("{}", export::export_preview(&artifact, &out)?.display());
            }
        }
        Command::Suggestions => {
            for (position, suggestion) in SUGGESTIONS.iter().enumerate() {
                println!(
                    "{:>2}. {:<16} {}",
                    position + 1,
                    suggestion.label,
                    suggestion.prompt
                );
            }
        }
        Command::Providers => {
            for provider in Provider::BUILT_IN {
                println!(
                    "{:<10} {:<20} {}",
                    provider.as_str(),
                    provider.display_name(),
                    provider.default_model().unwrap_or_default()
                );
            }
        }
        Command::Settings(SettingsCommand::Show) => print_settings(&studio.settings()),
        Command::Settings(SettingsCommand::Set(set)) => {
            let mut settings = studio.settings();
            if let Some(provider) = set.provider {
                settings = settings.with_provider(Provider::from(provider));
            }
            if let Some(api_key) = set.api_key {
                settings.api_key = api_key;
            }
            if let Some(model) = set.model {
                settings.model = model;
            }
            if let Some(base_url) = set.base_url {
                settings.base_url = Some(base_url);
            }
            if set.clear_base_url {
                settings.base_url = None;
            }
            studio.update_settings(settings.clone())?;
            print_settings(&settings);
        }
    }

    Ok(())
}

fn print_artifact(artifact: &GeneratedArtifact) {
    println!("{}", artifact.name);
    println!("id: {}", artifact.id);
    println!("created: {}", artifact.timestamp);
    println!();
    println!("{}", artifact.description);
    println!();
    println!("{}", artifact.code);
}

fn print_settings(settings: &uigen::ProviderConfiguration) {
    println!("provider: {}", settings.provider);
    println!(
        "api key:  {}",
        if settings.api_key.is_empty() {
            "(not set)"
        } else {
            "(set)"
        }
    );
    println!("model:    {}", settings.model);
    println!(
        "base url: {}",
        settings.base_url.as_deref().unwrap_or("(default)")
    );
}
