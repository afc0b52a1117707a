use clap::{Args, Subcommand};

use bookshelf::catalog::Editor;
use bookshelf::AppState;

#[derive(Args, Debug, Clone)]
pub struct EditorArgs {
    #[command(subcommand)]
    pub command: EditorCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum EditorCommands {
    /// Crée ou renomme un éditeur
    Add {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
    },
}

pub async fn handle(args: EditorArgs, state: &AppState) -> anyhow::Result<()> {
    match args.command {
        EditorCommands::Add { id, name } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                anyhow::bail!("le nom de l'éditeur est vide");
            }
            state
                .collections()
                .repository()
                .save_editor(&Editor { id, name })
                .await?;
            println!("✅ Éditeur {} enregistré", id);
            Ok(())
        }
    }
}
