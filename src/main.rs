// Exclude entire file from coverage - binary entry point cannot be unit tested
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use metadict_client::backend::{BackendAccess, BackendError, HttpBackend};
use metadict_client::config::{ClientConfig, ConfigError};
use metadict_client::dictionary::{CatalogError, DictionarySelectionManager};
use metadict_client::events::{AppEvent, BroadcastEmitter};
use metadict_client::history::{HistoryError, HistoryPager};
use metadict_client::location::{parameters, Location, MemoryLocation};
use metadict_client::model::{flag_icon_class, Credentials, QueryResponse, RegistrationData};
use metadict_client::search::{SearchError, SearchService};
use metadict_client::session::{SessionError, SessionManager};
use metadict_client::storage::{FileStorage, LocalStorage, StorageError};
use metadict_client::{debug, error, warn};

#[derive(Parser, Debug)]
#[command(name = "metadict", version, about = "Query a Metadict dictionary backend")]
struct Cli {
    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL of the Metadict REST API
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// Local storage file remembering the last selection and session
    #[arg(long, value_name = "FILE")]
    storage: Option<PathBuf>,

    /// Dictionary selection to start from, e.g. "de-en,de-no_ny"
    #[arg(long, value_name = "SELECTION")]
    dictionaries: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the dictionaries offered by the backend
    List,
    /// Show the selected dictionaries
    Selected,
    /// Toggle the selection of one or more dictionaries
    Toggle {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Query the selected dictionaries
    Search {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Show previously executed queries
    History {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Show version and uptime of the backend
    Status,
    /// Log in to access the query history
    Login {
        name: String,
        #[arg(long, env = "METADICT_PASSWORD", hide_env_values = true)]
        password: String,
        /// Request a long-running session
        #[arg(long)]
        stay_logged_in: bool,
    },
    /// End the current session
    Logout,
    /// Create a new account
    Register {
        name: String,
        #[arg(long, env = "METADICT_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Show the logged in user
    Whoami,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

fn init_logging() {
    let default_level = if cfg!(debug_assertions) { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Components wired together for one invocation
struct Client {
    backend: Arc<dyn BackendAccess>,
    location: Arc<MemoryLocation>,
    selection: Arc<DictionarySelectionManager>,
}

fn build_client(cli: &Cli, emitter: &BroadcastEmitter) -> Result<Client, CliError> {
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.backend_url {
        config.backend_url = url.clone();
    }
    if let Some(path) = &cli.storage {
        config.storage_path = Some(path.clone());
    }
    debug!("Using configuration {:?}", config);

    let storage: Arc<dyn LocalStorage> = Arc::new(match &config.storage_path {
        Some(path) => FileStorage::open(path.clone())?,
        None => FileStorage::with_default_path()?,
    });
    let backend: Arc<dyn BackendAccess> = Arc::new(
        HttpBackend::new(&config.backend_url, config.request_timeout())?
            .with_emitter(Arc::new(emitter.clone()))
            .with_session_storage(storage.clone()),
    );

    let location = Arc::new(MemoryLocation::new());
    if let Some(selection) = &cli.dictionaries {
        location.set_search_param(parameters::DICTIONARIES, selection);
    }

    let selection = Arc::new(DictionarySelectionManager::new(
        backend.clone(),
        storage,
        location.clone(),
        Arc::new(emitter.clone()),
    ));
    selection.initialize();

    Ok(Client {
        backend,
        location,
        selection,
    })
}

/// Print events the library reports while a command runs
fn watch_events(emitter: &BroadcastEmitter) {
    let mut events = emitter.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                AppEvent::TooManyRequests => {
                    eprintln!("The backend received too many requests, please wait a moment.")
                }
                other => debug!("Event '{}'", other.name()),
            }
        }
    });
}

/// Reload the catalog for commands that can continue without it
async fn reload_best_effort(selection: &DictionarySelectionManager) {
    if let Err(e) = selection.reload_catalog().await {
        warn!("Continuing without dictionary catalog: {}", e);
    }
}

fn print_response(response: &QueryResponse) {
    if response.entry_count() == 0 {
        println!("No results for '{}'", response.request_string);
        return;
    }
    for group in &response.grouped_bilingual_entries {
        println!("[{}]", group.group_identifier);
        for entry in &group.result_entries {
            println!(
                "  {} -> {}",
                entry.source.general_form, entry.target.general_form
            );
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let emitter = BroadcastEmitter::new();
    watch_events(&emitter);
    let client = build_client(&cli, &emitter)?;
    let selection = &client.selection;

    match cli.command {
        Command::List => {
            for dictionary in selection.reload_catalog().await? {
                let marker = if selection.is_selected(&dictionary.query_string_with_dialect) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {:<12} {} ({}) - {} ({})",
                    marker,
                    dictionary.query_string_with_dialect,
                    dictionary.source.display_name,
                    flag_icon_class(&dictionary.source),
                    dictionary.target.display_name,
                    flag_icon_class(&dictionary.target),
                );
            }
        }
        Command::Selected => {
            reload_best_effort(selection).await;
            if selection.is_catalog_loaded() {
                for dictionary in selection.selected_dictionaries() {
                    println!(
                        "{} - {}",
                        dictionary.source.display_name, dictionary.target.display_name
                    );
                }
            } else {
                for key in selection.selected_keys() {
                    println!("{}", key);
                }
            }
        }
        Command::Toggle { keys } => {
            reload_best_effort(selection).await;
            for key in &keys {
                let state = if selection.toggle(key) {
                    "selected"
                } else {
                    "not selected"
                };
                println!("{}: {}", key, state);
            }
            println!("?{}", client.location.query_string());
        }
        Command::Search { words } => {
            reload_best_effort(selection).await;
            let search = SearchService::new(
                selection.clone(),
                client.backend.clone(),
                client.location.clone(),
            );
            let response = search.run_bilingual_query(&words.join(" ")).await?;
            print_response(&response);
        }
        Command::History { pages } => {
            let sessions = SessionManager::new(client.backend.clone());
            if sessions.refresh().await?.is_none() {
                println!("The query history is only available after 'metadict login'");
                return Ok(());
            }
            let pager = HistoryPager::new(client.backend.clone());
            for _ in 0..pages {
                if !pager.has_more() {
                    break;
                }
                pager.load_more().await?;
            }
            if pager.is_empty() {
                println!("No queries recorded yet");
            }
            for entry in pager.entries() {
                println!(
                    "{}  {}",
                    entry.request_time.format("%Y-%m-%d %H:%M:%S"),
                    entry.query_string
                );
            }
        }
        Command::Status => {
            let status = client.backend.query_system_status().await?;
            println!("Version:  {} ({})", status.version, status.revision);
            println!("Started:  {}", status.start_time);
            println!("Uptime:   {}", status.uptime);
        }
        Command::Login {
            name,
            password,
            stay_logged_in,
        } => {
            let sessions = SessionManager::new(client.backend.clone());
            let credentials = Credentials {
                name,
                password,
                stay_logged_in,
            };
            let session = sessions.login(&credentials).await?;
            println!("Logged in as {}", session.name);
        }
        Command::Logout => {
            SessionManager::new(client.backend.clone()).logout().await?;
            println!("Logged out");
        }
        Command::Register {
            name,
            password,
            confirm_password,
        } => {
            let sessions = SessionManager::new(client.backend.clone());
            let registration = RegistrationData {
                name,
                password,
                confirm_password,
            };
            sessions.register(&registration).await?;
            println!("Registered {}, log in with 'metadict login'", registration.name);
        }
        Command::Whoami => match SessionManager::new(client.backend.clone()).refresh().await? {
            Some(session) => println!("{}", session.name),
            None => println!("Not logged in"),
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
