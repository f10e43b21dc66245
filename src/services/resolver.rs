use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use metrics::{counter, histogram};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tokio::time::interval;
use uuid::Uuid;

use crate::db::{bet_repo, lock_repo, run_repo};
use crate::markets::{evaluate, normalize_market_key, MatchFacts, Outcome};
use crate::models::{Bet, BetStatus};
use crate::services::audit;
use crate::sportsdata::FixtureClient;

/// Scheduler tuning, threaded in explicitly so tests never touch the
/// environment.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Max bets taken per run.
    pub batch_size: i64,
    /// Max concurrent fixture fetches.
    pub fetch_concurrency: usize,
    /// How long after kickoff a bet becomes eligible. Covers regulation
    /// time, stoppage, extra time and penalties.
    pub grace: Duration,
    /// Lock TTL; comfortably longer than a worst-case run.
    pub lock_ttl: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            fetch_concurrency: 5,
            grace: Duration::from_secs(150 * 60),
            lock_ttl: Duration::from_secs(9 * 60),
        }
    }
}

/// Statistics for one resolver run; written to the audit log verbatim.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunStats {
    pub run_id: Uuid,
    pub bets_found: i32,
    pub bets_processed: i32,
    pub bets_resolved: i32,
    pub bets_skipped: i32,
    pub errors: i32,
    pub duration_ms: i64,
    pub notes: Vec<String>,
}

impl RunStats {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            bets_found: 0,
            bets_processed: 0,
            bets_resolved: 0,
            bets_skipped: 0,
            errors: 0,
            duration_ms: 0,
            notes: Vec::new(),
        }
    }

    fn note(&mut self, line: String) {
        self.notes.push(line);
    }
}

enum SettleAction {
    Resolved(BetStatus),
    StillPending,
    Skipped,
}

/// Execute one resolution run.
///
/// The run is idempotent: settlements only land through a conditional
/// update that requires the bet to still be pending, so re-running over
/// an already-settled batch changes nothing. Whatever happens inside
/// (lock contention, per-fixture failures, a fatal query error), exactly
/// one audit record is written before this returns.
pub async fn run_resolution(
    pool: &PgPool,
    client: &FixtureClient,
    config: &ResolverConfig,
) -> RunStats {
    let run_id = Uuid::new_v4();
    let started = Instant::now();
    let mut stats = RunStats::new(run_id);

    counter!("resolution_runs_total").increment(1);
    tracing::info!(run_id = %run_id, "Resolution run starting");

    // Fail-open on lock storage errors: a transient fault must not
    // silence the resolver permanently. Worst case is a doubled run,
    // which the conditional settlement writes absorb.
    let acquired = match lock_repo::try_acquire(pool, run_id, config.lock_ttl).await {
        Ok(a) => a,
        Err(e) => {
            tracing::warn!(error = %e, run_id = %run_id, "Lock storage error — proceeding without lock");
            stats.note(format!("lock acquire error, proceeded fail-open: {e:#}"));
            true
        }
    };

    if !acquired {
        tracing::info!(run_id = %run_id, "Resolver lock held by another run — skipping");
        counter!("resolution_runs_locked_total").increment(1);
        stats.note("skipped: locked".into());
        stats.duration_ms = started.elapsed().as_millis() as i64;
        audit::record_run(pool, &stats).await;
        return stats;
    }

    if let Err(e) = resolve_batch(pool, client, config, &mut stats).await {
        tracing::error!(error = %e, run_id = %run_id, "Resolution run aborted");
        stats.errors += 1;
        stats.note(format!("fatal: {e:#}"));
    }

    // Best-effort; the TTL self-heals a missed release.
    if let Err(e) = lock_repo::release(pool).await {
        tracing::warn!(error = %e, run_id = %run_id, "Failed to release resolver lock");
    }

    stats.duration_ms = started.elapsed().as_millis() as i64;
    histogram!("resolution_run_duration_seconds").record(started.elapsed().as_secs_f64());

    audit::record_run(pool, &stats).await;

    tracing::info!(
        run_id = %run_id,
        found = stats.bets_found,
        resolved = stats.bets_resolved,
        skipped = stats.bets_skipped,
        errors = stats.errors,
        duration_ms = stats.duration_ms,
        "Resolution run finished"
    );

    stats
}

/// The run body: everything after lock acquisition and before release.
/// Only a failure to even select the batch escapes as an error; one bad
/// fixture or bet is counted and stepped over.
async fn resolve_batch(
    pool: &PgPool,
    client: &FixtureClient,
    config: &ResolverConfig,
    stats: &mut RunStats,
) -> anyhow::Result<()> {
    let cutoff = Utc::now() - chrono::Duration::from_std(config.grace)?;
    let bets = bet_repo::get_resolvable_bets(pool, cutoff, config.batch_size).await?;
    stats.bets_found = bets.len() as i32;

    if bets.is_empty() {
        tracing::debug!("No resolvable bets");
        return Ok(());
    }

    // Bets on the same fixture share one fetch.
    let mut by_fixture: HashMap<i64, Vec<Bet>> = HashMap::new();
    for bet in bets {
        if let Some(fixture_id) = bet.fixture_id {
            by_fixture.entry(fixture_id).or_default().push(bet);
        }
    }

    let fixture_ids: Vec<i64> = by_fixture.keys().copied().collect();
    let facts_by_fixture: HashMap<i64, Option<MatchFacts>> = stream::iter(fixture_ids)
        .map(|fixture_id| async move { (fixture_id, client.fetch_result(fixture_id).await) })
        .buffer_unordered(config.fetch_concurrency)
        .collect()
        .await;

    for (fixture_id, fixture_bets) in by_fixture {
        let Some(facts) = facts_by_fixture.get(&fixture_id).and_then(|f| f.as_ref()) else {
            // Fetch failed; bets stay pending and retry next run.
            counter!("fixture_fetch_failures_total").increment(1);
            stats.errors += 1;
            stats.note(format!("fixture {fixture_id}: result unavailable"));
            continue;
        };

        for bet in &fixture_bets {
            stats.bets_processed += 1;
            match settle_one(pool, bet, facts).await {
                Ok(SettleAction::Resolved(status)) => {
                    stats.bets_resolved += 1;
                    counter!("bets_settled_total").increment(1);
                    stats.note(format!("bet {}: {} -> {}", bet.id, bet.market, status));
                    tracing::info!(
                        bet_id = %bet.id,
                        fixture_id,
                        market = %bet.market,
                        status = %status,
                        "Bet settled"
                    );
                }
                Ok(SettleAction::StillPending) => {
                    tracing::debug!(bet_id = %bet.id, fixture_id, "Match not final yet");
                }
                Ok(SettleAction::Skipped) => {
                    stats.bets_skipped += 1;
                    tracing::debug!(bet_id = %bet.id, "Bet no longer pending — skipped");
                }
                Err(e) => {
                    stats.errors += 1;
                    stats.note(format!("bet {}: {e:#}", bet.id));
                    tracing::error!(error = %e, bet_id = %bet.id, "Failed to settle bet");
                }
            }
        }
    }

    Ok(())
}

/// Settle a single bet against fetched facts.
async fn settle_one(
    pool: &PgPool,
    bet: &Bet,
    facts: &MatchFacts,
) -> anyhow::Result<SettleAction> {
    // Re-read right before writing: the user may have cashed out or
    // edited the bet since the batch was selected.
    match bet_repo::get_bet_status(pool, bet.id).await? {
        Some(status) if status == BetStatus::Pending.as_str() => {}
        _ => return Ok(SettleAction::Skipped),
    }

    let canonical = normalize_market_key(&bet.market);
    let status = match evaluate(&canonical, facts) {
        Outcome::Pending => return Ok(SettleAction::StillPending),
        Outcome::Won => BetStatus::Won,
        Outcome::Lost => BetStatus::Lost,
        Outcome::Void => BetStatus::Void,
    };

    let profit_loss = bet.stake.map(|stake| profit_for(status, stake, bet.odds));

    // Conditional write: a concurrent settlement between the re-read
    // and here loses nothing, the update simply matches zero rows.
    if bet_repo::settle_bet(pool, bet.id, status, profit_loss).await? {
        Ok(SettleAction::Resolved(status))
    } else {
        Ok(SettleAction::Skipped)
    }
}

/// Profit/loss for a settled bet with a known stake.
fn profit_for(status: BetStatus, stake: Decimal, odds: Decimal) -> Decimal {
    match status {
        BetStatus::Won => stake * (odds - Decimal::ONE),
        BetStatus::Lost => -stake,
        _ => Decimal::ZERO,
    }
}

/// Recent audit rows for the API.
pub async fn recent_runs(
    pool: &PgPool,
    limit: i64,
) -> anyhow::Result<Vec<crate::models::ResolutionRun>> {
    run_repo::get_recent_runs(pool, limit).await
}

/// Drive resolution runs on a fixed period.
pub async fn run_resolution_loop(
    pool: PgPool,
    client: FixtureClient,
    config: ResolverConfig,
    interval_secs: u64,
) {
    tracing::info!(interval_secs, "Resolution loop started");
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;
        run_resolution(&pool, &client, &config).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_profit_for_won() {
        assert_eq!(profit_for(BetStatus::Won, dec!(100), dec!(1.85)), dec!(85.00));
    }

    #[test]
    fn test_profit_for_lost() {
        assert_eq!(profit_for(BetStatus::Lost, dec!(100), dec!(1.85)), dec!(-100));
    }

    #[test]
    fn test_profit_for_void() {
        assert_eq!(profit_for(BetStatus::Void, dec!(100), dec!(1.85)), Decimal::ZERO);
    }

    #[test]
    fn test_default_config_bounds() {
        let config = ResolverConfig::default();
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.fetch_concurrency, 5);
        assert!(config.lock_ttl > Duration::from_secs(5 * 60));
    }
}
