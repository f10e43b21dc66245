use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Database row for the bets table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bet {
    pub id: Uuid,
    /// Where the bet was logged from: "chat", "daily_picks" or "manual".
    pub source: String,
    pub home_team: String,
    pub away_team: String,
    /// External fixture id from the sports-data provider, if known.
    pub fixture_id: Option<i64>,
    pub league: Option<String>,
    pub kickoff_at: Option<DateTime<Utc>>,
    /// Market key as logged. Normalized at evaluation time, not at rest.
    pub market: String,
    pub odds: Decimal,
    pub stake: Option<Decimal>,
    pub status: String,
    pub profit_loss: Option<Decimal>,
    pub note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub settled_at: Option<DateTime<Utc>>,
}

/// Bet lifecycle status.
///
/// `Cashout` is a manual terminal state set by the user; the resolver
/// never produces it and never touches a bet that already carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
    Void,
    Cashout,
}

impl BetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetStatus::Pending => "pending",
            BetStatus::Won => "won",
            BetStatus::Lost => "lost",
            BetStatus::Void => "void",
            BetStatus::Cashout => "cashout",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BetStatus::Pending),
            "won" => Some(BetStatus::Won),
            "lost" => Some(BetStatus::Lost),
            "void" => Some(BetStatus::Void),
            "cashout" => Some(BetStatus::Cashout),
            _ => None,
        }
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
