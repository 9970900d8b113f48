use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::extract::{RawRecord, Status};
use crate::config::PipelineConfig;

/// Segment label when a per-alert record has no usable km bounds.
pub const SEGMENT_UNKNOWN: &str = "Trecho não identificado";
/// Segment label when a whole-card record has no km range in its text.
pub const SEGMENT_WHOLE: &str = "Trecho total";

/// One row of the final report.
#[derive(Debug, Clone, Serialize)]
pub struct TrafficRecord {
    pub icon: &'static str,
    pub highway: String,
    pub status: Status,
    pub direction: String,
    pub segment: String,
    pub updated_at: String,
}

/// Identity under which two extracted records describe the same real-world
/// alert. The source page repeats alerts across DOM locations; the first
/// occurrence in document order survives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupKey {
    Alert {
        highway: String,
        direction: String,
        km_start: String,
        km_end: String,
        status: Status,
    },
    Card {
        highway: String,
        direction: String,
    },
}

/// Normalize directions, collapse duplicates, sort. Sorting is highway asc,
/// direction asc, then status label descending so the more notable status
/// surfaces first within a direction group (an accepted approximation of
/// severity, not a true ranking).
pub fn build_report(cfg: &PipelineConfig, raw: Vec<(String, RawRecord)>) -> Vec<TrafficRecord> {
    let updated_at = chrono::Local::now().format("%H:%M").to_string();

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (highway, rec) in raw {
        // A raw token without a translation entry passes through unchanged,
        // which also keeps the "-" sentinel as-is.
        let direction = cfg.direction_name(&highway, &rec.direction_raw);

        let key = if rec.per_alert {
            let (km_start, km_end) = rec.km.clone().unwrap_or_default();
            DedupKey::Alert {
                highway: highway.clone(),
                direction: direction.clone(),
                km_start,
                km_end,
                status: rec.status,
            }
        } else {
            DedupKey::Card {
                highway: highway.clone(),
                direction: direction.clone(),
            }
        };
        if !seen.insert(key) {
            debug!(%highway, %direction, "duplicate report dropped");
            continue;
        }

        let segment = match (&rec.km, rec.per_alert) {
            (Some((start, end)), _) => format!("Km {} ao {}", start, end),
            (None, true) => SEGMENT_UNKNOWN.to_string(),
            (None, false) => SEGMENT_WHOLE.to_string(),
        };

        records.push(TrafficRecord {
            icon: rec.status.icon(),
            highway,
            status: rec.status,
            direction,
            segment,
            updated_at: updated_at.clone(),
        });
    }

    records.sort_by(|a, b| {
        a.highway
            .cmp(&b.highway)
            .then(a.direction.cmp(&b.direction))
            .then(b.status.label().cmp(a.status.label()))
    });
    records
}

// ── Tests ──
