use serde::Deserialize;

/// Envelope shared by all provider endpoints.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub response: Vec<T>,
}

// ---------------------------------------------------------------------------
// /fixtures?id=
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ApiFixtureEntry {
    pub fixture: ApiFixture,
    #[serde(default)]
    pub goals: ApiGoals,
    #[serde(default)]
    pub score: Option<ApiScore>,
}

#[derive(Debug, Deserialize)]
pub struct ApiFixture {
    pub id: i64,
    pub status: ApiStatus,
}

#[derive(Debug, Deserialize)]
pub struct ApiStatus {
    /// Short code: NS, 1H, HT, 2H, FT, AET, PEN, CANC, PST, ...
    #[serde(default)]
    pub short: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiGoals {
    pub home: Option<i32>,
    pub away: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ApiScore {
    #[serde(default)]
    pub halftime: Option<ApiGoals>,
}

// ---------------------------------------------------------------------------
// /fixtures/statistics?fixture=
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ApiTeamStatistics {
    #[serde(default)]
    pub statistics: Vec<ApiStatistic>,
}

#[derive(Debug, Deserialize)]
pub struct ApiStatistic {
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Number, string or null depending on the statistic.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl ApiStatistic {
    pub fn as_i32(&self) -> Option<i32> {
        match self.value.as_ref()? {
            serde_json::Value::Number(n) => n.as_i64().map(|v| v as i32),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
