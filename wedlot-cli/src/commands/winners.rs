use super::Session;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;
use wedlot_core::DataSource;

#[derive(Subcommand)]
pub enum WinnersCommands {
    /// Show everyone who has won so far
    List,
    /// Clear the winner history so everyone can win again
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_winners_command(cmd: WinnersCommands, session: &Session) -> anyhow::Result<()> {
    match cmd {
        WinnersCommands::List => {
            let loaded = session.winners.load().await;
            if loaded.source == DataSource::Error {
                anyhow::bail!(
                    "{}: {}",
                    loaded.message(),
                    loaded.detail.unwrap_or_default()
                );
            }

            if loaded.ledger.is_empty() {
                println!("No winners yet.");
                println!("Draw with: wedlot draw");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["#", "Winner"]);
            for (i, name) in loaded.ledger.iter().enumerate() {
                table.add_row(vec![(i + 1).to_string(), name.clone()]);
            }
            println!("{}", table);
            println!("{}", loaded.message());
        }

        WinnersCommands::Reset { force } => {
            if !force {
                let confirm = Confirm::new()
                    .with_prompt("Clear all winners? This cannot be undone.")
                    .default(false)
                    .interact()?;

                if !confirm {
                    println!("Reset cancelled.");
                    return Ok(());
                }
            }

            let receipt = session.winners.reset().await?;
            if receipt.cleared {
                println!("Winner history cleared.");
            } else {
                println!("Winner history was already empty.");
            }
        }
    }

    Ok(())
}
