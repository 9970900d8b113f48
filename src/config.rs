use std::collections::HashMap;

/// One monitored highway: canonical code plus the literal strings that
/// identify it in page text or structural identifiers.
#[derive(Debug, Clone)]
pub struct HighwayEntry {
    pub code: String,
    pub aliases: Vec<String>,
}

/// Static tables driving the pipeline. Injected at construction so tests
/// (or a future highway set) can substitute their own.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Ordered: classification is first-match-wins in this order, since
    /// alias lists can overlap across highways.
    pub highways: Vec<HighwayEntry>,
    /// Any hit anywhere in a candidate's text drops the whole candidate.
    /// These are nearby roads whose names overlap lexically with targets.
    pub excluded_terms: Vec<String>,
    /// (highway code, raw direction token) → display place name.
    pub direction_names: HashMap<(String, String), String>,
    /// Generic roadway words that must never be taken as a direction.
    pub direction_stopwords: Vec<String>,
}

impl PipelineConfig {
    pub fn highway_codes(&self) -> Vec<&str> {
        self.highways.iter().map(|h| h.code.as_str()).collect()
    }

    /// Translate a raw direction token for a highway. Pairs without an
    /// entry pass through unchanged, so the call is idempotent.
    pub fn direction_name(&self, highway: &str, raw: &str) -> String {
        self.direction_names
            .get(&(highway.to_string(), raw.to_string()))
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }
}

fn entry(code: &str, aliases: &[&str]) -> HighwayEntry {
    HighwayEntry {
        code: code.to_string(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
    }
}

impl Default for PipelineConfig {
    /// The SP coastal/metropolitan set monitored by the CCI ARTESP panel.
    fn default() -> Self {
        let highways = vec![
            entry("SP 098", &["SP 098", "MOGI-BERTIOGA", "DOM PAULO"]),
            entry(
                "SP 055",
                &["SP 055", "RIO-SANTOS", "MANOEL HYPPOLITO", "RIO SANTOS"],
            ),
            entry("SP 065", &["SP 065", "DOM PEDRO"]),
            entry("SP 070", &["SP 070", "AYRTON SENNA", "CARVALHO PINTO"]),
            entry("SP 088", &["SP 088", "MOGI DUTRA"]),
        ];

        let excluded_terms = [
            "CÔNEGO DOMÊNICO",
            "CONEGO DOMENICO",
            "RANGONI",
            "PADRE MANOEL",
            "NÓBREGA",
            "NOBREGA",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let direction_names = [
            (("SP 098", "BERTIOGA"), "Bertioga"),
            (("SP 098", "MOGI"), "Mogi das Cruzes"),
            (("SP 098", "SUL"), "Bertioga"),
            (("SP 098", "NORTE"), "Mogi das Cruzes"),
            (("SP 055", "NORTE"), "Guarujá"),
            (("SP 055", "SUL"), "Praia Grande"),
            (("SP 055", "SANTOS"), "Santos"),
            (("SP 065", "NORTE"), "Campinas"),
            (("SP 065", "SUL"), "Jacareí"),
            (("SP 070", "LESTE"), "Taubaté"),
            (("SP 070", "OESTE"), "São Paulo"),
            (("SP 088", "NORTE"), "Dutra"),
            (("SP 088", "SUL"), "Mogi das Cruzes"),
        ]
        .iter()
        .map(|((hw, raw), name)| ((hw.to_string(), raw.to_string()), name.to_string()))
        .collect();

        let direction_stopwords = ["RODOVIA", "PISTA", "MARGINAL", "TRECHO", "SP"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        PipelineConfig {
            highways,
            excluded_terms,
            direction_names,
            direction_stopwords,
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_covers_monitored_set() {
        let cfg = PipelineConfig::default();
        assert_eq!(
            cfg.highway_codes(),
            vec!["SP 098", "SP 055", "SP 065", "SP 070", "SP 088"]
        );
        assert!(cfg.excluded_terms.iter().any(|t| t == "RANGONI"));
    }

    #[test]
    fn direction_name_translates_known_pair() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.direction_name("SP 055", "NORTE"), "Guarujá");
    }

    #[test]
    fn direction_name_passes_unknown_through() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.direction_name("SP 055", "CARAGUATATUBA"), "CARAGUATATUBA");
        // Idempotent: an already-translated name matches no raw token key.
        assert_eq!(cfg.direction_name("SP 055", "Guarujá"), "Guarujá");
    }
}
