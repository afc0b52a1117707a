use clap::{Args, Subcommand};

use bookshelf::AppState;

use super::print_json;

#[derive(Args, Debug, Clone)]
pub struct CollectionArgs {
    #[command(subcommand)]
    pub command: CollectionCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CollectionCommands {
    /// Affiche une collection et ses collaborateurs
    Show {
        #[arg(long)]
        id: String,
        /// Éditeur consultant (les collections privées sont masquées sinon)
        #[arg(long, env = "BOOKSHELF_EDITOR_ID")]
        editor: Option<i64>,
    },
    /// Renvoie toutes les collections à l'indexeur configuré
    Reindex,
}

pub async fn handle(args: CollectionArgs, state: &AppState) -> anyhow::Result<()> {
    let service = state.collections();
    match args.command {
        CollectionCommands::Show { id, editor } => {
            let collection = service.show(editor, &id).await?;
            print_json(&collection)
        }
        CollectionCommands::Reindex => {
            let count = service.reindex_all().await?;
            println!(
                "🔎 {} collection(s) envoyée(s) à l'indexeur '{}'",
                count,
                state.indexer.name()
            );
            Ok(())
        }
    }
}
