use crate::config::PipelineConfig;

/// Outcome of matching one candidate against the configured highway set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// An exclusion-list literal appeared in the text; the candidate belongs
    /// to a nearby unrelated road and is dropped.
    Excluded(String),
    /// No alias of any configured highway matched.
    Unmatched,
    Highway(String),
}

/// Classify a candidate by its uppercased full text and, when the markup
/// provides one, its structural identifier. Highways are tried in configured
/// order and the first alias hit wins; alias lists can overlap across
/// highways, so table order is the tiebreak.
pub fn classify(cfg: &PipelineConfig, text: &str, hint: Option<&str>) -> Classification {
    if let Some(term) = cfg.excluded_terms.iter().find(|t| text.contains(t.as_str())) {
        return Classification::Excluded(term.clone());
    }

    for highway in &cfg.highways {
        let hit = highway.aliases.iter().any(|alias| {
            // Structural identifier first, free text as fallback.
            hint.is_some_and(|h| h.contains(alias.as_str())) || text.contains(alias.as_str())
        });
        if hit {
            return Classification::Highway(highway.code.clone());
        }
    }

    Classification::Unmatched
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn alias_in_text_matches() {
        let c = classify(&cfg(), "TRÁFEGO NORMAL NA MOGI-BERTIOGA KM 60", None);
        assert_eq!(c, Classification::Highway("SP 098".into()));
    }

    #[test]
    fn hint_matches_without_text_mention() {
        let c = classify(&cfg(), "LENTIDÃO KM 20 AO 25", Some("SP 070"));
        assert_eq!(c, Classification::Highway("SP 070".into()));
    }

    #[test]
    fn exclusion_beats_alias_match() {
        // RANGONI cards mention SP 055 aliases but belong to another road.
        let c = classify(&cfg(), "RODOVIA CÔNEGO DOMÊNICO RANGONI ACESSO RIO-SANTOS", None);
        assert_eq!(c, Classification::Excluded("CÔNEGO DOMÊNICO".into()));
    }

    #[test]
    fn unknown_road_is_unmatched() {
        let c = classify(&cfg(), "SP 150 ANCHIETA FLUXO NORMAL", None);
        assert_eq!(c, Classification::Unmatched);
    }

    #[test]
    fn first_match_wins_in_table_order() {
        // Text mentioning two monitored highways resolves to the one listed
        // first in the configured table.
        let c = classify(&cfg(), "SP 055 COM REFLEXO NA MOGI-BERTIOGA", None);
        assert_eq!(c, Classification::Highway("SP 098".into()));
    }
}
