// Un fichier par famille de sous-commandes

pub mod collection;
pub mod editor;
pub mod revisions;

/// Affiche une valeur en JSON indenté sur la sortie standard.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
