use std::time::Duration;

use sqlx::PgPool;
use tokio::time::sleep;

use crate::db::run_repo;
use crate::services::resolver::RunStats;

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_STEP: Duration = Duration::from_millis(250);
const MAX_NOTES_CHARS: usize = 4000;

/// Write the audit record for a run. Never fails to the caller: this is
/// the last line of operational visibility, so exhausted retries are
/// logged locally and swallowed.
pub async fn record_run(pool: &PgPool, stats: &RunStats) {
    let notes = join_notes(&stats.notes);

    for attempt in 1..=MAX_ATTEMPTS {
        let result = run_repo::insert_run(
            pool,
            stats.run_id,
            stats.bets_found,
            stats.bets_processed,
            stats.bets_resolved,
            stats.bets_skipped,
            stats.errors,
            stats.duration_ms,
            notes.as_deref(),
        )
        .await;

        match result {
            Ok(()) => return,
            Err(e) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(
                    error = %e,
                    run_id = %stats.run_id,
                    attempt,
                    "Audit write failed — retrying"
                );
                sleep(BACKOFF_STEP * attempt).await;
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    run_id = %stats.run_id,
                    "Audit write failed after {MAX_ATTEMPTS} attempts — run stats lost"
                );
            }
        }
    }
}

fn join_notes(notes: &[String]) -> Option<String> {
    if notes.is_empty() {
        return None;
    }

    let mut joined = notes.join("; ");
    if joined.len() > MAX_NOTES_CHARS {
        let mut cut = MAX_NOTES_CHARS;
        while !joined.is_char_boundary(cut) {
            cut -= 1;
        }
        joined.truncate(cut);
        joined.push_str("…[truncated]");
    }
    Some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_notes_empty() {
        assert_eq!(join_notes(&[]), None);
    }

    #[test]
    fn test_join_notes_joins() {
        let notes = vec!["a".to_string(), "b".to_string()];
        assert_eq!(join_notes(&notes).as_deref(), Some("a; b"));
    }

    #[test]
    fn test_join_notes_truncates() {
        let notes = vec!["x".repeat(MAX_NOTES_CHARS + 100)];
        let joined = join_notes(&notes).expect("notes present");
        assert!(joined.len() <= MAX_NOTES_CHARS + "…[truncated]".len());
        assert!(joined.ends_with("[truncated]"));
    }
}
