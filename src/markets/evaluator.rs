use std::fmt;

use serde::{Deserialize, Serialize};

/// Snapshot of a fixture's result facts, as reported by the data provider.
///
/// Everything beyond the raw status is nullable: goals are unknown until
/// the provider publishes them, half-time and corner figures are often
/// missing entirely for smaller leagues. The evaluator treats a missing
/// field as "cannot settle this market", never as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchFacts {
    /// Raw provider status short-code (FT, 1H, CANC, ...).
    pub status: String,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub ht_home_goals: Option<i32>,
    pub ht_away_goals: Option<i32>,
    pub corners_home: Option<i32>,
    pub corners_away: Option<i32>,
    pub corners_total: Option<i32>,
}

impl MatchFacts {
    /// Total corner count, from the explicit total or the per-side sum.
    pub fn corner_total(&self) -> Option<i32> {
        self.corners_total.or_else(|| {
            match (self.corners_home, self.corners_away) {
                (Some(h), Some(a)) => Some(h + a),
                _ => None,
            }
        })
    }
}

/// Settlement outcome for a single (market, facts) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won,
    Lost,
    Void,
    Pending,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Won => "won",
            Outcome::Lost => "lost",
            Outcome::Void => "void",
            Outcome::Pending => "pending",
        };
        f.write_str(s)
    }
}

/// Match not yet played or still in play: settle nothing.
const IN_PROGRESS_STATUSES: &[&str] =
    &["NS", "TBD", "1H", "HT", "2H", "ET", "BT", "P", "INT", "LIVE"];

/// Match will never finish normally: void everything.
const ABNORMAL_STATUSES: &[&str] = &["CANC", "ABD", "PST", "SUSP", "AWD", "WO"];

/// Match reached a final result.
const FINAL_STATUSES: &[&str] = &["FT", "AET", "PEN"];

enum StatusClass {
    InProgress,
    Abnormal,
    Final,
    Unknown,
}

fn classify_status(status: &str) -> StatusClass {
    if IN_PROGRESS_STATUSES.contains(&status) {
        StatusClass::InProgress
    } else if ABNORMAL_STATUSES.contains(&status) {
        StatusClass::Abnormal
    } else if FINAL_STATUSES.contains(&status) {
        StatusClass::Final
    } else {
        StatusClass::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DoubleChance {
    HomeOrDraw,
    DrawOrAway,
    HomeOrAway,
}

/// Closed enumeration of canonical markets.
///
/// Goal-line variants carry the whole part of the N.5 threshold, so
/// `OverFullTime(2)` is "over 2.5 full time".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Market {
    OverFullTime(i32),
    UnderFullTime(i32),
    BttsYes,
    BttsNo,
    HomeWin,
    Draw,
    AwayWin,
    DoubleChance(DoubleChance),
    OverHalfTime(i32),
    CornersOver(i32),
}

impl Market {
    /// Parse a canonical key. `None` for anything outside the supported
    /// vocabulary; the caller voids those explicitly.
    fn from_key(key: &str) -> Option<Market> {
        let market = match key {
            "home_win_ft" => Market::HomeWin,
            "draw_ft" => Market::Draw,
            "away_win_ft" => Market::AwayWin,
            "btts_yes_ft" => Market::BttsYes,
            "btts_no_ft" => Market::BttsNo,
            "dc_1x_ft" => Market::DoubleChance(DoubleChance::HomeOrDraw),
            "dc_x2_ft" => Market::DoubleChance(DoubleChance::DrawOrAway),
            "dc_12_ft" => Market::DoubleChance(DoubleChance::HomeOrAway),
            "over_0_5_ft" => Market::OverFullTime(0),
            "over_1_5_ft" => Market::OverFullTime(1),
            "over_2_5_ft" => Market::OverFullTime(2),
            "over_3_5_ft" => Market::OverFullTime(3),
            "under_0_5_ft" => Market::UnderFullTime(0),
            "under_1_5_ft" => Market::UnderFullTime(1),
            "under_2_5_ft" => Market::UnderFullTime(2),
            "under_3_5_ft" => Market::UnderFullTime(3),
            "over_0_5_ht" => Market::OverHalfTime(0),
            "over_1_5_ht" => Market::OverHalfTime(1),
            "corners_over_8_5_ft" => Market::CornersOver(8),
            "corners_over_9_5_ft" => Market::CornersOver(9),
            _ => return None,
        };
        Some(market)
    }
}

fn win_if(cond: bool) -> Outcome {
    if cond {
        Outcome::Won
    } else {
        Outcome::Lost
    }
}

/// Evaluate one canonical market key against match facts.
///
/// Status gate first: in-play or unrecognized statuses stay `Pending`
/// (never guess on unknown status), abnormal terminations are `Void`,
/// only final statuses reach market rules. Any market whose required
/// facts are missing is `Void`, never `Won`/`Lost`.
pub fn evaluate(canonical_key: &str, facts: &MatchFacts) -> Outcome {
    match classify_status(&facts.status) {
        StatusClass::InProgress | StatusClass::Unknown => return Outcome::Pending,
        StatusClass::Abnormal => return Outcome::Void,
        StatusClass::Final => {}
    }

    let (Some(home), Some(away)) = (facts.home_goals, facts.away_goals) else {
        // Final status but no score published: cannot settle anything.
        return Outcome::Void;
    };

    let Some(market) = Market::from_key(canonical_key) else {
        return Outcome::Void;
    };

    let total = home + away;
    let diff = home - away;

    match market {
        Market::OverFullTime(n) => win_if(total > n),
        Market::UnderFullTime(n) => win_if(total <= n),
        Market::BttsYes => win_if(home >= 1 && away >= 1),
        Market::BttsNo => win_if(home == 0 || away == 0),
        Market::HomeWin => win_if(diff > 0),
        Market::Draw => win_if(diff == 0),
        Market::AwayWin => win_if(diff < 0),
        Market::DoubleChance(dc) => match dc {
            DoubleChance::HomeOrDraw => win_if(diff >= 0),
            DoubleChance::DrawOrAway => win_if(diff <= 0),
            DoubleChance::HomeOrAway => win_if(diff != 0),
        },
        Market::OverHalfTime(n) => match (facts.ht_home_goals, facts.ht_away_goals) {
            (Some(h), Some(a)) => win_if(h + a > n),
            _ => Outcome::Void,
        },
        Market::CornersOver(n) => match facts.corner_total() {
            Some(c) => win_if(c > n),
            None => Outcome::Void,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MARKETS: &[&str] = &[
        "home_win_ft",
        "draw_ft",
        "away_win_ft",
        "btts_yes_ft",
        "btts_no_ft",
        "dc_1x_ft",
        "dc_x2_ft",
        "dc_12_ft",
        "over_0_5_ft",
        "over_1_5_ft",
        "over_2_5_ft",
        "over_3_5_ft",
        "under_0_5_ft",
        "under_1_5_ft",
        "under_2_5_ft",
        "under_3_5_ft",
        "over_0_5_ht",
        "over_1_5_ht",
        "corners_over_8_5_ft",
        "corners_over_9_5_ft",
    ];

    fn final_facts(home: i32, away: i32) -> MatchFacts {
        MatchFacts {
            status: "FT".into(),
            home_goals: Some(home),
            away_goals: Some(away),
            ..Default::default()
        }
    }

    #[test]
    fn test_over_under_thresholds() {
        // total = 3
        let facts = final_facts(2, 1);
        assert_eq!(evaluate("over_2_5_ft", &facts), Outcome::Won);
        assert_eq!(evaluate("under_2_5_ft", &facts), Outcome::Lost);
        assert_eq!(evaluate("over_3_5_ft", &facts), Outcome::Lost);
        assert_eq!(evaluate("under_3_5_ft", &facts), Outcome::Won);
    }

    #[test]
    fn test_over_under_are_complements() {
        // For every threshold and every plausible scoreline, over and
        // under on the same line disagree exactly.
        for threshold in 0..=3 {
            let over = format!("over_{threshold}_5_ft");
            let under = format!("under_{threshold}_5_ft");
            for home in 0..=5 {
                for away in 0..=5 {
                    let facts = final_facts(home, away);
                    let o = evaluate(&over, &facts);
                    let u = evaluate(&under, &facts);
                    match o {
                        Outcome::Won => assert_eq!(u, Outcome::Lost),
                        Outcome::Lost => assert_eq!(u, Outcome::Won),
                        other => panic!("unexpected outcome {other} for {over}"),
                    }
                }
            }
        }
    }

    #[test]
    fn test_btts_complement() {
        for home in 0..=3 {
            for away in 0..=3 {
                let facts = final_facts(home, away);
                let yes = evaluate("btts_yes_ft", &facts);
                let no = evaluate("btts_no_ft", &facts);
                assert_ne!(yes, no, "btts outcomes must be complementary");
            }
        }

        // Goals unknown: both void, never complementary guesses.
        let facts = MatchFacts {
            status: "FT".into(),
            ..Default::default()
        };
        assert_eq!(evaluate("btts_yes_ft", &facts), Outcome::Void);
        assert_eq!(evaluate("btts_no_ft", &facts), Outcome::Void);
    }

    #[test]
    fn test_result_markets() {
        let home_win = final_facts(2, 1);
        assert_eq!(evaluate("home_win_ft", &home_win), Outcome::Won);
        assert_eq!(evaluate("draw_ft", &home_win), Outcome::Lost);
        assert_eq!(evaluate("away_win_ft", &home_win), Outcome::Lost);

        let draw = final_facts(1, 1);
        assert_eq!(evaluate("home_win_ft", &draw), Outcome::Lost);
        assert_eq!(evaluate("draw_ft", &draw), Outcome::Won);
        assert_eq!(evaluate("away_win_ft", &draw), Outcome::Lost);
    }

    #[test]
    fn test_double_chance() {
        let draw = final_facts(0, 0);
        assert_eq!(evaluate("dc_1x_ft", &draw), Outcome::Won);
        assert_eq!(evaluate("dc_x2_ft", &draw), Outcome::Won);
        assert_eq!(evaluate("dc_12_ft", &draw), Outcome::Lost);

        let away_win = final_facts(0, 2);
        assert_eq!(evaluate("dc_1x_ft", &away_win), Outcome::Lost);
        assert_eq!(evaluate("dc_x2_ft", &away_win), Outcome::Won);
        assert_eq!(evaluate("dc_12_ft", &away_win), Outcome::Won);
    }

    #[test]
    fn test_half_time_markets() {
        let mut facts = final_facts(3, 1);
        facts.ht_home_goals = Some(1);
        facts.ht_away_goals = Some(0);
        assert_eq!(evaluate("over_0_5_ht", &facts), Outcome::Won);
        assert_eq!(evaluate("over_1_5_ht", &facts), Outcome::Lost);
    }

    #[test]
    fn test_half_time_missing_is_void() {
        // FT goals known, half-time breakdown absent.
        let facts = final_facts(1, 1);
        assert_eq!(evaluate("over_0_5_ht", &facts), Outcome::Void);
        assert_eq!(evaluate("over_1_5_ht", &facts), Outcome::Void);
    }

    #[test]
    fn test_corners_markets() {
        let mut facts = final_facts(1, 0);
        facts.corners_total = Some(10);
        assert_eq!(evaluate("corners_over_8_5_ft", &facts), Outcome::Won);
        assert_eq!(evaluate("corners_over_9_5_ft", &facts), Outcome::Won);

        facts.corners_total = Some(9);
        assert_eq!(evaluate("corners_over_8_5_ft", &facts), Outcome::Won);
        assert_eq!(evaluate("corners_over_9_5_ft", &facts), Outcome::Lost);
    }

    #[test]
    fn test_corners_from_side_counts() {
        let mut facts = final_facts(1, 0);
        facts.corners_home = Some(6);
        facts.corners_away = Some(3);
        assert_eq!(evaluate("corners_over_8_5_ft", &facts), Outcome::Lost);

        facts.corners_away = Some(4);
        assert_eq!(evaluate("corners_over_8_5_ft", &facts), Outcome::Won);
    }

    #[test]
    fn test_corners_missing_is_void() {
        let facts = final_facts(2, 2);
        assert_eq!(evaluate("corners_over_8_5_ft", &facts), Outcome::Void);
        assert_eq!(evaluate("corners_over_9_5_ft", &facts), Outcome::Void);
    }

    #[test]
    fn test_in_progress_statuses_stay_pending() {
        for status in ["NS", "1H", "HT", "2H", "ET", "BT", "P", "INT", "LIVE"] {
            let facts = MatchFacts {
                status: status.into(),
                home_goals: Some(4),
                away_goals: Some(0),
                ..Default::default()
            };
            for market in ALL_MARKETS {
                assert_eq!(
                    evaluate(market, &facts),
                    Outcome::Pending,
                    "{market} must stay pending under status {status}"
                );
            }
        }
    }

    #[test]
    fn test_abnormal_statuses_void_everything() {
        for status in ["CANC", "ABD", "PST", "SUSP", "AWD", "WO"] {
            let facts = MatchFacts {
                status: status.into(),
                home_goals: Some(3),
                away_goals: Some(2),
                ..Default::default()
            };
            for market in ALL_MARKETS {
                assert_eq!(
                    evaluate(market, &facts),
                    Outcome::Void,
                    "{market} must be void under status {status}"
                );
            }
        }
    }

    #[test]
    fn test_unknown_status_stays_pending() {
        let facts = MatchFacts {
            status: "???".into(),
            home_goals: Some(2),
            away_goals: Some(0),
            ..Default::default()
        };
        assert_eq!(evaluate("home_win_ft", &facts), Outcome::Pending);
    }

    #[test]
    fn test_final_without_goals_is_void() {
        let facts = MatchFacts {
            status: "FT".into(),
            home_goals: Some(1),
            away_goals: None,
            ..Default::default()
        };
        for market in ALL_MARKETS {
            assert_eq!(evaluate(market, &facts), Outcome::Void);
        }
    }

    #[test]
    fn test_unknown_market_is_void() {
        let facts = final_facts(2, 1);
        assert_eq!(evaluate("first_goalscorer", &facts), Outcome::Void);
        assert_eq!(evaluate("over_4_5_ft", &facts), Outcome::Void);
        assert_eq!(evaluate("", &facts), Outcome::Void);
    }

    #[test]
    fn test_after_extra_time_and_penalties_settle() {
        for status in ["AET", "PEN"] {
            let facts = MatchFacts {
                status: status.into(),
                home_goals: Some(2),
                away_goals: Some(2),
                ..Default::default()
            };
            assert_eq!(evaluate("draw_ft", &facts), Outcome::Won);
            assert_eq!(evaluate("over_3_5_ft", &facts), Outcome::Won);
        }
    }

    #[test]
    fn test_scenario_two_one() {
        let facts = final_facts(2, 1);
        assert_eq!(evaluate("over_2_5_ft", &facts), Outcome::Won);
        assert_eq!(evaluate("under_2_5_ft", &facts), Outcome::Lost);
        assert_eq!(evaluate("btts_yes_ft", &facts), Outcome::Won);
        assert_eq!(evaluate("home_win_ft", &facts), Outcome::Won);
        assert_eq!(evaluate("dc_1x_ft", &facts), Outcome::Won);
        assert_eq!(evaluate("draw_ft", &facts), Outcome::Lost);
    }

    #[test]
    fn test_scenario_goalless_draw() {
        let facts = final_facts(0, 0);
        assert_eq!(evaluate("btts_no_ft", &facts), Outcome::Won);
        assert_eq!(evaluate("over_0_5_ft", &facts), Outcome::Lost);
        assert_eq!(evaluate("under_0_5_ft", &facts), Outcome::Won);
        assert_eq!(evaluate("draw_ft", &facts), Outcome::Won);
    }

    #[test]
    fn test_scenario_postponed() {
        let facts = MatchFacts {
            status: "PST".into(),
            ..Default::default()
        };
        for market in ALL_MARKETS {
            assert_eq!(evaluate(market, &facts), Outcome::Void);
        }
    }
}
