use wedlot_core::{AnnounceOutcome, Announcer};

pub async fn handle_announce_command(announcer: &Announcer, names: &[String]) -> anyhow::Result<()> {
    match announcer.announce(names).await {
        AnnounceOutcome::Provider => println!("Announced through the speech provider."),
        AnnounceOutcome::Fallback => println!("Announced with on-device speech."),
        AnnounceOutcome::Skipped => {
            anyhow::bail!("No speech path is available (set provider credentials or install espeak-ng)")
        }
    }
    Ok(())
}
