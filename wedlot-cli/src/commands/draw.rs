use super::Session;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::time::Duration;
use wedlot_core::{AnnounceOutcome, Announcer};
use wedlot_draw::DrawSnapshot;

/// The spinning display shows this many random pairs before the result.
pub const SPIN_FRAMES: usize = 20;
pub const SPIN_INTERVAL: Duration = Duration::from_millis(100);

pub async fn handle_draw_command(
    session: &Session,
    announcer: Option<Announcer>,
    spin: bool,
) -> anyhow::Result<()> {
    // Fails before any animation when the draw is not possible.
    let snapshot = session.engine.snapshot().await?;
    println!(
        "Drawing from {} eligible names ({} already won)",
        snapshot.eligible.len(),
        snapshot.ledger.len()
    );

    if spin {
        spin_preview(&snapshot).await?;
    }

    let result = session.engine.draw().await?;
    println!("Winners: {} and {}", result.winners[0], result.winners[1]);
    println!(
        "{} winners so far, {} names still eligible",
        result.total_winners, result.remaining
    );

    if let Some(announcer) = announcer {
        match announcer.announce(&result.winners).await {
            AnnounceOutcome::Provider => tracing::debug!("Announced through the speech provider"),
            AnnounceOutcome::Fallback => tracing::debug!("Announced with on-device speech"),
            AnnounceOutcome::Skipped => println!("(announcement unavailable)"),
        }
    }

    Ok(())
}

async fn spin_preview(snapshot: &DrawSnapshot) -> std::io::Result<()> {
    let mut rng = StdRng::from_entropy();
    let mut ticker = tokio::time::interval(SPIN_INTERVAL);
    let mut stdout = std::io::stdout();

    for _ in 0..SPIN_FRAMES {
        ticker.tick().await;
        if let Some([a, b]) = snapshot.preview(&mut rng) {
            write!(stdout, "\r  {}  ·  {}      ", a, b)?;
            stdout.flush()?;
        }
    }
    writeln!(stdout, "\r{:width$}\r", "", width = 40)?;
    Ok(())
}
