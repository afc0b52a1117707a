use clap::{Args, Subcommand};

use bookshelf::catalog::EntityType;
use bookshelf::revisions::{list_page, NewRevision, PageParams};
use bookshelf::AppState;
use chrono::{DateTime, Utc};

use super::print_json;

#[derive(Args, Debug, Clone)]
pub struct RevisionsArgs {
    #[command(subcommand)]
    pub command: RevisionsCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RevisionsCommands {
    /// Page de révisions, toutes entités confondues
    List {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        size: Option<String>,
    },
    /// Ajoute une révision (import, jeu de démonstration)
    Append {
        /// Author, Work, Edition, EditionGroup, Publisher (casse libre)
        #[arg(long = "type")]
        entity_type: String,
        #[arg(long)]
        bbid: String,
        #[arg(long)]
        author: i64,
        #[arg(long)]
        note: Option<String>,
        /// Date RFC3339, maintenant par défaut
        #[arg(long)]
        at: Option<String>,
    },
}

pub async fn handle(args: RevisionsArgs, state: &AppState) -> anyhow::Result<()> {
    match args.command {
        RevisionsCommands::List { from, size } => {
            let page = PageParams::parse(
                from.as_deref(),
                size.as_deref(),
                &state.config.revisions,
            )?;
            let revisions = list_page(&state.revisions(), page).await?;
            print_json(&revisions)
        }
        RevisionsCommands::Append {
            entity_type,
            bbid,
            author,
            note,
            at,
        } => {
            let created_at = at
                .as_deref()
                .map(DateTime::parse_from_rfc3339)
                .transpose()?
                .map(|dt| dt.with_timezone(&Utc));
            let revision = state
                .revisions()
                .append(NewRevision {
                    entity_type: EntityType::parse(&entity_type)?,
                    entity_bbid: bbid,
                    author_id: author,
                    note,
                    created_at,
                })
                .await?;
            println!("✅ Révision {} ajoutée", revision.id);
            print_json(&revision)
        }
    }
}
