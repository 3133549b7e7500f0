use crate::{DrawError, Result};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use wedlot_core::{DataSource, NamePool, NameStore, WedlotError, WinnerLedger, WinnerStore};

/// Names still eligible for `pool` given `ledger`, or the reason a draw
/// cannot happen.
pub fn check_policy(pool: &NamePool, ledger: &WinnerLedger) -> Result<Vec<String>> {
    if pool.is_empty() {
        return Err(DrawError::EmptyPool);
    }

    let eligible = pool.eligible(ledger);
    match eligible.len() {
        0 => Err(DrawError::PoolExhausted {
            pool_size: pool.len(),
        }),
        1 => Err(DrawError::InsufficientRemaining { remaining: 1 }),
        _ => Ok(eligible),
    }
}

/// Two distinct names, each pair equally likely.
pub fn pick_pair<R: Rng + ?Sized>(eligible: &[String], rng: &mut R) -> Result<[String; 2]> {
    let mut picked = eligible.choose_multiple(rng, 2).cloned();
    match (picked.next(), picked.next()) {
        (Some(first), Some(second)) => Ok([first, second]),
        _ => Err(DrawError::InsufficientRemaining {
            remaining: eligible.len(),
        }),
    }
}

/// Pure draw over a snapshot: policy check, then a uniform pair.
pub fn plan_draw<R: Rng + ?Sized>(
    pool: &NamePool,
    ledger: &WinnerLedger,
    rng: &mut R,
) -> Result<[String; 2]> {
    let eligible = check_policy(pool, ledger)?;
    pick_pair(&eligible, rng)
}

/// Pool and ledger as read at the start of a draw.
#[derive(Debug, Clone)]
pub struct DrawSnapshot {
    pub pool: NamePool,
    pub ledger: WinnerLedger,
    pub eligible: Vec<String>,
}

impl DrawSnapshot {
    /// Cosmetic pair for the spinning display. Never recorded.
    pub fn preview<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<[String; 2]> {
        pick_pair(&self.eligible, rng).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResult {
    pub winners: [String; 2],
    pub drawn_at: DateTime<Utc>,
    pub total_winners: usize,
    pub remaining: usize,
}

#[derive(Clone)]
pub struct DrawEngine {
    names: NameStore,
    winners: WinnerStore,
}

impl DrawEngine {
    pub fn new(names: NameStore, winners: WinnerStore) -> Self {
        Self { names, winners }
    }

    /// Reads the pool and ledger and applies the draw policy.
    ///
    /// An unreadable ledger aborts here instead of being treated as empty,
    /// otherwise a past winner could be drawn again.
    pub async fn snapshot(&self) -> Result<DrawSnapshot> {
        let names = self.names.load().await;
        if names.source != DataSource::Persisted {
            tracing::debug!("Drawing from {} names", names.source.as_str());
        }

        let winners = self.winners.load().await;
        if winners.source == DataSource::Error {
            return Err(DrawError::Core(WedlotError::storage_unavailable(
                winners
                    .detail
                    .unwrap_or_else(|| "winner history unavailable".to_string()),
            )));
        }

        let eligible = check_policy(&names.pool, &winners.ledger)?;
        Ok(DrawSnapshot {
            pool: names.pool,
            ledger: winners.ledger,
            eligible,
        })
    }

    pub async fn draw(&self) -> Result<DrawResult> {
        let mut rng = StdRng::from_entropy();
        self.draw_with(&mut rng).await
    }

    /// Picks two winners and records them. Nothing is recorded when the
    /// policy rejects the draw; if recording fails the pair is discarded.
    /// Once the ledger write lands the draw succeeds, even if the
    /// bookkeeping stamp after it does not.
    pub async fn draw_with<R: Rng + Send>(&self, rng: &mut R) -> Result<DrawResult> {
        let snapshot = self.snapshot().await?;
        let winners = pick_pair(&snapshot.eligible, rng)?;

        let receipt = self.winners.append(&winners).await?;
        if receipt.added.len() != winners.len() {
            tracing::warn!(
                "Ledger already held {} of the drawn names",
                winners.len() - receipt.added.len()
            );
        }

        let remaining = snapshot.pool.eligible(&receipt.ledger).len();
        tracing::info!(
            "Drew {} and {}, {} names remaining",
            winners[0],
            winners[1],
            remaining
        );

        Ok(DrawResult {
            winners,
            drawn_at: Utc::now(),
            total_winners: receipt.total,
            remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use wedlot_core::storage::WINNERS_KEY;
    use wedlot_core::{KvStore, MemoryStore};

    fn pool(names: &[&str]) -> NamePool {
        NamePool::from_raw(names.iter())
    }

    fn ledger(names: &[&str]) -> WinnerLedger {
        WinnerLedger::from_raw(names.iter())
    }

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// Memory store whose ledger writes can be switched off.
    #[derive(Default)]
    struct LedgerWriteFails {
        inner: MemoryStore,
        failing: AtomicBool,
        failing_stamp: AtomicBool,
    }

    #[async_trait]
    impl KvStore for LedgerWriteFails {
        async fn get(&self, key: &str) -> wedlot_core::Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> wedlot_core::Result<()> {
            if key == WINNERS_KEY && self.failing.load(Ordering::SeqCst) {
                return Err(WedlotError::storage_unavailable("write refused"));
            }
            if key == format!("{}_updated", WINNERS_KEY) && self.failing_stamp.load(Ordering::SeqCst)
            {
                return Err(WedlotError::storage_unavailable("write refused"));
            }
            self.inner.set(key, value).await
        }

        async fn delete(&self, key: &str) -> wedlot_core::Result<bool> {
            self.inner.delete(key).await
        }

        fn backend(&self) -> &'static str {
            "test"
        }
    }

    async fn engine_over(kv: Arc<dyn KvStore>, names: &[&str]) -> DrawEngine {
        let name_store = NameStore::new(kv.clone());
        name_store.save(names).await.unwrap();
        DrawEngine::new(name_store, WinnerStore::new(kv))
    }

    #[test]
    fn test_policy_table() {
        assert!(matches!(
            check_policy(&NamePool::new(), &WinnerLedger::new()),
            Err(DrawError::EmptyPool)
        ));
        assert!(matches!(
            check_policy(&pool(&["A", "B"]), &ledger(&["A", "B"])),
            Err(DrawError::PoolExhausted { pool_size: 2 })
        ));
        assert!(matches!(
            check_policy(&pool(&["A", "B", "C"]), &ledger(&["A", "B"])),
            Err(DrawError::InsufficientRemaining { remaining: 1 })
        ));
        assert!(matches!(
            check_policy(&pool(&["A"]), &WinnerLedger::new()),
            Err(DrawError::InsufficientRemaining { remaining: 1 })
        ));
        assert_eq!(
            check_policy(&pool(&["A", "B", "C"]), &ledger(&["B", "Z"])).unwrap(),
            vec!["A", "C"]
        );
    }

    #[test]
    fn test_pair_is_distinct_and_eligible() {
        let pool = pool(&["A", "B", "C", "D", "E"]);
        let ledger = ledger(&["C"]);
        let mut rng = seeded();

        for _ in 0..200 {
            let [a, b] = plan_draw(&pool, &ledger, &mut rng).unwrap();
            assert_ne!(a, b);
            assert_ne!(a, "C");
            assert_ne!(b, "C");
            assert!(pool.contains(&a) && pool.contains(&b));
        }
    }

    #[test]
    fn test_every_pair_can_come_up() {
        let eligible: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        let mut rng = seeded();
        let mut counts: HashMap<(String, String), usize> = HashMap::new();

        for _ in 0..6000 {
            let [a, b] = pick_pair(&eligible, &mut rng).unwrap();
            let key = if a < b { (a, b) } else { (b, a) };
            *counts.entry(key).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        for count in counts.values() {
            assert!((700..1300).contains(count), "skewed pair count {}", count);
        }
    }

    #[test]
    fn test_preview_never_fails_loudly() {
        let snapshot = DrawSnapshot {
            pool: pool(&["A"]),
            ledger: WinnerLedger::new(),
            eligible: vec!["A".to_string()],
        };
        assert!(snapshot.preview(&mut seeded()).is_none());
    }

    #[tokio::test]
    async fn test_draws_never_repeat_until_exhausted() {
        let names = ["A", "B", "C", "D", "E", "F"];
        let engine = engine_over(Arc::new(MemoryStore::new()), &names).await;
        let mut rng = seeded();
        let mut seen = HashSet::new();

        for round in 1..=3 {
            let result = engine.draw_with(&mut rng).await.unwrap();
            for winner in &result.winners {
                assert!(seen.insert(winner.clone()), "{} drawn twice", winner);
            }
            assert_eq!(result.total_winners, round * 2);
            assert_eq!(result.remaining, names.len() - round * 2);
        }

        assert!(matches!(
            engine.draw_with(&mut rng).await,
            Err(DrawError::PoolExhausted { pool_size: 6 })
        ));
    }

    #[tokio::test]
    async fn test_three_names_then_one_left() {
        let engine = engine_over(Arc::new(MemoryStore::new()), &["A", "B", "C"]).await;
        let mut rng = seeded();

        let first = engine.draw_with(&mut rng).await.unwrap();
        assert_eq!(first.total_winners, 2);
        assert_eq!(first.remaining, 1);

        let err = engine.draw_with(&mut rng).await.unwrap_err();
        assert!(matches!(err, DrawError::InsufficientRemaining { remaining: 1 }));
        assert!(err.is_rejection());
        assert_eq!(engine.winners.load().await.ledger.len(), 2);
    }

    #[tokio::test]
    async fn test_reset_makes_everyone_eligible_again() {
        let engine = engine_over(Arc::new(MemoryStore::new()), &["A", "B"]).await;
        let mut rng = seeded();

        engine.draw_with(&mut rng).await.unwrap();
        assert!(engine.draw_with(&mut rng).await.is_err());

        engine.winners.reset().await.unwrap();
        let again = engine.draw_with(&mut rng).await.unwrap();
        assert_eq!(again.remaining, 0);
    }

    #[tokio::test]
    async fn test_failed_ledger_write_records_nothing() {
        let kv = Arc::new(LedgerWriteFails::default());
        let engine = engine_over(kv.clone(), &["A", "B", "C", "D"]).await;
        kv.failing.store(true, Ordering::SeqCst);

        let err = engine.draw_with(&mut seeded()).await.unwrap_err();
        assert!(matches!(err, DrawError::Core(_)));
        assert!(!err.is_rejection());
        assert_eq!(err.kind(), "storage");

        kv.failing.store(false, Ordering::SeqCst);
        assert!(engine.winners.load().await.ledger.is_empty());
    }

    #[tokio::test]
    async fn test_failed_stamp_keeps_recorded_draw() {
        let kv = Arc::new(LedgerWriteFails::default());
        let engine = engine_over(kv.clone(), &["A", "B", "C", "D"]).await;
        kv.failing_stamp.store(true, Ordering::SeqCst);

        let result = engine.draw_with(&mut seeded()).await.unwrap();
        assert_eq!(result.remaining, 2);

        let recorded = engine.winners.load().await.ledger;
        assert_eq!(recorded.names(), result.winners);
        assert_eq!(
            kv.get(&format!("{}_updated", WINNERS_KEY)).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_defaults_are_drawable() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let engine = DrawEngine::new(NameStore::new(kv.clone()), WinnerStore::new(kv));

        let snapshot = engine.snapshot().await.unwrap();
        assert_eq!(snapshot.eligible.len(), 20);

        let result = engine.draw().await.unwrap();
        assert_eq!(result.remaining, 18);
    }
}
