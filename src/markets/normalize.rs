/// Canonicalize a raw market key into the evaluator's vocabulary.
///
/// Market keys arrive from inconsistent producers (chat parsing, UI
/// dropdowns, legacy rows): mixed case, Portuguese aliases, missing
/// period suffixes. This is the single tolerant boundary: the output
/// either matches a canonical key or passes through unchanged so the
/// evaluator can reject it explicitly.
///
/// Pure and total: never fails, never logs.
pub fn normalize_market_key(raw: &str) -> String {
    let key = canonical_tokens(raw);

    if let Some(alias) = translate_alias(&key) {
        return alias.to_string();
    }

    // Already period-qualified, trust it.
    if key.ends_with("_ft") || key.ends_with("_ht") {
        return key;
    }

    // over_2_5 / under_1_5 with no period suffix → full time
    if is_goal_line(&key) {
        return format!("{key}_ft");
    }

    // Bare result / BTTS / double-chance / corners tokens → full time
    if matches!(
        key.as_str(),
        "home_win"
            | "draw"
            | "away_win"
            | "btts_yes"
            | "btts_no"
            | "dc_1x"
            | "dc_x2"
            | "dc_12"
            | "corners_over_8_5"
            | "corners_over_9_5"
    ) {
        return format!("{key}_ft");
    }

    key
}

/// Lowercase, trim, fold diacritics and collapse separators to `_`.
fn canonical_tokens(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_sep = true; // swallow leading separators

    for c in raw.trim().to_lowercase().chars() {
        let folded = fold_diacritic(c);
        if folded.is_ascii_alphanumeric() {
            out.push(folded);
            last_sep = false;
        } else if !last_sep {
            out.push('_');
            last_sep = true;
        }
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}

/// Localized and shorthand aliases for full-time markets.
fn translate_alias(key: &str) -> Option<&'static str> {
    let canonical = match key {
        "home" | "1" | "casa" | "vitoria_casa" | "vitoria_da_casa" => "home_win_ft",
        "x" | "empate" => "draw_ft",
        "away" | "2" | "fora" | "vitoria_fora" | "vitoria_do_visitante" => "away_win_ft",
        "btts" | "both_teams_score" | "both_teams_score_yes" | "both_teams_to_score_yes"
        | "ambas_marcam" | "ambas_marcam_sim" => "btts_yes_ft",
        "both_teams_score_no" | "both_teams_to_score_no" | "ambas_marcam_nao" => "btts_no_ft",
        "double_chance_1x" | "dupla_chance_1x" | "1x" => "dc_1x_ft",
        "double_chance_x2" | "dupla_chance_x2" | "x2" => "dc_x2_ft",
        "double_chance_12" | "dupla_chance_12" | "12" => "dc_12_ft",
        "escanteios_over_8_5" => "corners_over_8_5_ft",
        "escanteios_over_9_5" => "corners_over_9_5_ft",
        _ => return None,
    };
    Some(canonical)
}

/// Matches `over_<int>_<int>` / `under_<int>_<int>` with nothing after.
fn is_goal_line(key: &str) -> bool {
    let parts: Vec<&str> = key.split('_').collect();
    matches!(parts.as_slice(),
        [side, whole, frac]
            if matches!(*side, "over" | "under")
                && whole.chars().all(|c| c.is_ascii_digit())
                && !whole.is_empty()
                && frac.chars().all(|c| c.is_ascii_digit())
                && !frac.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_keys_pass_through() {
        assert_eq!(normalize_market_key("over_2_5_ft"), "over_2_5_ft");
        assert_eq!(normalize_market_key("over_0_5_ht"), "over_0_5_ht");
        assert_eq!(normalize_market_key("btts_yes_ft"), "btts_yes_ft");
        assert_eq!(normalize_market_key("corners_over_9_5_ft"), "corners_over_9_5_ft");
    }

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(normalize_market_key("  Over_2_5_FT "), "over_2_5_ft");
        assert_eq!(normalize_market_key("Over 2.5"), "over_2_5_ft");
        assert_eq!(normalize_market_key("BTTS Yes"), "btts_yes_ft");
    }

    #[test]
    fn test_goal_line_gets_ft_suffix() {
        assert_eq!(normalize_market_key("over_2_5"), "over_2_5_ft");
        assert_eq!(normalize_market_key("under_1_5"), "under_1_5_ft");
        assert_eq!(normalize_market_key("over_0_5"), "over_0_5_ft");
    }

    #[test]
    fn test_bare_tokens_get_ft_suffix() {
        assert_eq!(normalize_market_key("home_win"), "home_win_ft");
        assert_eq!(normalize_market_key("draw"), "draw_ft");
        assert_eq!(normalize_market_key("btts_no"), "btts_no_ft");
        assert_eq!(normalize_market_key("dc_1x"), "dc_1x_ft");
        assert_eq!(normalize_market_key("corners_over_8_5"), "corners_over_8_5_ft");
    }

    #[test]
    fn test_portuguese_aliases() {
        assert_eq!(normalize_market_key("Vitória Casa"), "home_win_ft");
        assert_eq!(normalize_market_key("Empate"), "draw_ft");
        assert_eq!(normalize_market_key("Ambas Marcam Sim"), "btts_yes_ft");
        assert_eq!(normalize_market_key("ambas marcam não"), "btts_no_ft");
        assert_eq!(normalize_market_key("Dupla Chance 1X"), "dc_1x_ft");
        assert_eq!(normalize_market_key("escanteios over 8.5"), "corners_over_8_5_ft");
    }

    #[test]
    fn test_english_aliases() {
        assert_eq!(normalize_market_key("Home"), "home_win_ft");
        assert_eq!(normalize_market_key("both teams to score yes"), "btts_yes_ft");
        assert_eq!(normalize_market_key("Double Chance X2"), "dc_x2_ft");
    }

    #[test]
    fn test_unrecognized_passes_through() {
        assert_eq!(normalize_market_key("handicap_-1_5"), "handicap_1_5");
        assert_eq!(normalize_market_key("first_goalscorer"), "first_goalscorer");
        assert_eq!(normalize_market_key(""), "");
    }

    #[test]
    fn test_ht_suffix_not_rewritten() {
        // Half-time keys must never be coerced to full time.
        assert_eq!(normalize_market_key("over_1_5_ht"), "over_1_5_ht");
    }
}
