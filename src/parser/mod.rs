pub mod classify;
pub mod extract;
pub mod locate;
pub mod report;

use scraper::Html;
use tracing::debug;

use crate::config::PipelineConfig;
use classify::Classification;
pub use report::TrafficRecord;

/// Four-stage pipeline: locate candidates → classify highway → extract raw
/// fields → normalize, dedupe and sort. A pure function of (document,
/// config); heuristic misses degrade to fewer records, never to an error,
/// and an empty report is a normal outcome.
pub fn parse_report(cfg: &PipelineConfig, html: &str) -> Vec<TrafficRecord> {
    let doc = Html::parse_document(html);
    let candidates = locate::locate_candidates(&doc);
    debug!(candidates = candidates.len(), "candidates located");

    let mut raw = Vec::new();
    for cand in &candidates {
        let text = extract::card_text(&cand.root);
        match classify::classify(cfg, &text, cand.hint.as_deref()) {
            Classification::Excluded(term) => {
                debug!(%term, "candidate dropped by exclusion list");
            }
            Classification::Unmatched => {
                debug!("candidate matches no configured highway");
            }
            Classification::Highway(code) => {
                let Some(highway) = cfg.highways.iter().find(|h| h.code == code) else {
                    continue;
                };
                for rec in extract::extract_records(cfg, highway, cand) {
                    raw.push((code.clone(), rec));
                }
            }
        }
    }

    report::build_report(cfg, raw)
}

// ── Tests ──
