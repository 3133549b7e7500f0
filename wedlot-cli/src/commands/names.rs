use super::{position_to_index, Session};
use anyhow::Context;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum NamesCommands {
    /// Show the name pool
    List,
    /// Add a name
    Add {
        /// Name to add
        name: String,
    },
    /// Rename the entry at a position
    Edit {
        /// Position as shown by `names list`
        position: usize,
        /// New name
        name: String,
    },
    /// Remove the entry at a position
    Remove {
        /// Position as shown by `names list`
        position: usize,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Find names containing a term (case-insensitive)
    Search {
        /// Text to look for
        term: String,
    },
    /// Replace the whole pool from a file, one name per line
    Import {
        /// Text file with the names
        file: PathBuf,
    },
    /// Restore the default names
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_names_command(cmd: NamesCommands, session: &Session) -> anyhow::Result<()> {
    match cmd {
        NamesCommands::List => {
            let loaded = session.editor.list().await;
            let ledger = session.winners.load().await.ledger;

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["#", "Name", "Status"]);
            for (i, name) in loaded.pool.iter().enumerate() {
                let status = if ledger.contains(name) { "Won" } else { "Eligible" };
                table.add_row(vec![(i + 1).to_string(), name.clone(), status.to_string()]);
            }

            println!("{}", table);
            println!("{}", loaded.message());
            println!(
                "{} of {} names still eligible",
                loaded.pool.eligible(&ledger).len(),
                loaded.pool.len()
            );
        }

        NamesCommands::Add { name } => {
            let outcome = session.editor.add(&name).await?;
            println!("{} ({} names)", outcome.summary, outcome.pool.len());
        }

        NamesCommands::Edit { position, name } => {
            let outcome = session
                .editor
                .rename(position_to_index(position)?, &name)
                .await?;
            println!("{}", outcome.summary);
        }

        NamesCommands::Remove { position, force } => {
            let index = position_to_index(position)?;
            if !force {
                let pool = session.editor.list().await.pool;
                if let Some(name) = pool.names().get(index) {
                    let confirm = Confirm::new()
                        .with_prompt(format!("Remove '{}' from the pool?", name))
                        .default(false)
                        .interact()?;

                    if !confirm {
                        println!("Removal cancelled.");
                        return Ok(());
                    }
                }
            }

            let outcome = session.editor.remove(index).await?;
            println!("{} ({} names left)", outcome.summary, outcome.pool.len());
        }

        NamesCommands::Search { term } => {
            let hits = session.editor.search(&term).await;
            if hits.is_empty() {
                println!("No names match '{}'.", term);
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["#", "Name"]);
            for (i, name) in hits {
                table.add_row(vec![(i + 1).to_string(), name]);
            }
            println!("{}", table);
        }

        NamesCommands::Import { file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let lines: Vec<&str> = content.lines().collect();

            let receipt = session.names.save(&lines).await?;
            println!("Saved {} names from {}", receipt.count, file.display());
        }

        NamesCommands::Reset { force } => {
            if !force {
                let confirm = Confirm::new()
                    .with_prompt("Replace the pool with the default names?")
                    .default(false)
                    .interact()?;

                if !confirm {
                    println!("Reset cancelled.");
                    return Ok(());
                }
            }

            let outcome = session.editor.reset_to_default().await?;
            println!("{} ({} names)", outcome.summary, outcome.receipt.count);
        }
    }

    Ok(())
}
