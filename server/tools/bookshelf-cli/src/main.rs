// FICHIER : server/tools/bookshelf-cli/src/main.rs

use clap::{Parser, Subcommand};

mod commands;

use bookshelf::utils::{init_logging, AppConfig};
use bookshelf::AppState;

#[derive(Parser)]
#[command(name = "bookshelf-cli")]
#[command(about = "Administration locale du service Bookshelf", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Journal des révisions du catalogue
    Revisions(commands::revisions::RevisionsArgs),

    /// Collections (lecture, réindexation)
    Collection(commands::collection::CollectionArgs),

    /// Comptes éditeurs
    Editor(commands::editor::EditorArgs),
}

#[tokio::main]
async fn main() {
    // 1. Configuration (CRITIQUE)
    if let Err(e) = AppConfig::init() {
        eprintln!("❌ CRITICAL ERROR: Impossible d'initialiser la configuration.");
        eprintln!("   Détails : {}", e);
        std::process::exit(1);
    }

    // 2. Logger
    init_logging();

    // 3. Parsing & Dispatch
    let cli = Cli::parse();
    if let Err(e) = execute_command(cli.command).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }

    tracing::debug!("Fin de l'exécution du CLI");
}

async fn execute_command(cmd: Commands) -> anyhow::Result<()> {
    let config = AppConfig::get()?.clone();
    let state = AppState::bootstrap(config).await?;

    match cmd {
        Commands::Revisions(args) => commands::revisions::handle(args, &state).await,
        Commands::Collection(args) => commands::collection::handle(args, &state).await,
        Commands::Editor(args) => commands::editor::handle(args, &state).await,
    }
}
