use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use crate::markets::MatchFacts;

use super::types::{ApiEnvelope, ApiFixtureEntry, ApiTeamStatistics};

const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";
const CORNER_KICKS: &str = "Corner Kicks";

/// Explicit provider settings, threaded in at construction.
#[derive(Debug, Clone)]
pub struct SportsApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for SportsApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Error)]
pub enum FixtureClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Client for the fixture-result provider.
#[derive(Debug, Clone)]
pub struct FixtureClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl FixtureClient {
    pub fn new(config: &SportsApiConfig) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch result facts for a fixture.
    ///
    /// Returns `None` on timeout, non-2xx, malformed payload or an
    /// unknown fixture id. `None` means "could not resolve this run,
    /// retry later"; callers must never settle a bet from it.
    pub async fn fetch_result(&self, fixture_id: i64) -> Option<MatchFacts> {
        let mut facts = match self.get_fixture(fixture_id).await {
            Ok(Some(f)) => f,
            Ok(None) => {
                tracing::warn!(fixture_id, "Provider returned no entry for fixture");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, fixture_id, "Fixture fetch failed — will retry next run");
                return None;
            }
        };

        // Corners are best-effort enrichment: a failure here only means
        // corner markets stay unsettleable, never that the run loses the
        // primary result.
        match self.get_corner_counts(fixture_id).await {
            Ok((home, away)) => {
                facts.corners_home = home;
                facts.corners_away = away;
            }
            Err(e) => {
                tracing::debug!(error = %e, fixture_id, "Corner statistics unavailable");
            }
        }

        Some(facts)
    }

    async fn get_fixture(&self, fixture_id: i64) -> Result<Option<MatchFacts>, FixtureClientError> {
        let url = format!("{}/fixtures", self.base_url);
        let resp = self
            .http
            .get(&url)
            .header("x-apisports-key", &self.api_key)
            .query(&[("id", fixture_id)])
            .send()
            .await?
            .error_for_status()?;

        let envelope: ApiEnvelope<ApiFixtureEntry> = resp.json().await?;
        let Some(entry) = envelope.response.into_iter().next() else {
            return Ok(None);
        };

        if entry.fixture.id != fixture_id {
            return Err(FixtureClientError::Unexpected(format!(
                "asked for fixture {fixture_id}, got {}",
                entry.fixture.id
            )));
        }

        let halftime = entry.score.and_then(|s| s.halftime);

        Ok(Some(MatchFacts {
            status: entry.fixture.status.short,
            home_goals: entry.goals.home,
            away_goals: entry.goals.away,
            ht_home_goals: halftime.as_ref().and_then(|ht| ht.home),
            ht_away_goals: halftime.as_ref().and_then(|ht| ht.away),
            corners_home: None,
            corners_away: None,
            corners_total: None,
        }))
    }

    /// (home, away) corner counts; either side may be missing.
    async fn get_corner_counts(
        &self,
        fixture_id: i64,
    ) -> Result<(Option<i32>, Option<i32>), FixtureClientError> {
        let url = format!("{}/fixtures/statistics", self.base_url);
        let resp = self
            .http
            .get(&url)
            .header("x-apisports-key", &self.api_key)
            .query(&[("fixture", fixture_id)])
            .send()
            .await?
            .error_for_status()?;

        let envelope: ApiEnvelope<ApiTeamStatistics> = resp.json().await?;

        let mut sides = envelope.response.into_iter().map(|team| {
            team.statistics
                .iter()
                .find(|s| s.kind == CORNER_KICKS)
                .and_then(|s| s.as_i32())
        });

        let home = sides.next().flatten();
        let away = sides.next().flatten();
        Ok((home, away))
    }
}
