use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use serde::Serialize;
use tracing::debug;

use super::locate::Candidate;
use crate::config::{HighwayEntry, PipelineConfig};

static KM_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"KM INICIAL:?\s*([0-9][0-9.,]*)\s*.*?KM FINAL:?\s*([0-9][0-9.,]*)").unwrap()
});
static TITLE_COMPASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((NORTE|SUL|LESTE|OESTE)\)").unwrap());
static BARE_COMPASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(NORTE|SUL|LESTE|OESTE)\b").unwrap());

/// Sentinel for a direction no heuristic could determine.
pub const NO_DIRECTION: &str = "-";

/// Traffic condition of one segment. Labels and icons are the display pairs
/// shown by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "Lento")]
    Slow,
    #[serde(rename = "Congestionado")]
    Congested,
    #[serde(rename = "Parado Total")]
    Stopped,
    #[serde(rename = "Pare e Siga")]
    StopAndGo,
    #[serde(rename = "Interditado")]
    Closed,
    #[serde(rename = "Acidente")]
    Accident,
    #[serde(rename = "Obras")]
    Roadwork,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Normal => "Normal",
            Status::Slow => "Lento",
            Status::Congested => "Congestionado",
            Status::Stopped => "Parado Total",
            Status::StopAndGo => "Pare e Siga",
            Status::Closed => "Interditado",
            Status::Accident => "Acidente",
            Status::Roadwork => "Obras",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Status::Normal => "🟢",
            Status::Slow => "🟡",
            Status::Congested => "🔴",
            Status::Stopped => "⚫",
            Status::StopAndGo => "⛔",
            Status::Closed => "⛔",
            Status::Accident => "⚠️",
            Status::Roadwork => "🚧",
        }
    }

    pub fn is_problem(self) -> bool {
        self != Status::Normal
    }
}

/// Keyword → status table, scanned top to bottom over the full text.
const STATUS_KEYWORDS: &[(&str, Status)] = &[
    ("LENTO", Status::Slow),
    ("CONGESTIONADO", Status::Congested),
    ("PARADO", Status::Stopped),
    ("PARE E SIGA", Status::StopAndGo),
    ("INTERDIÇÃO", Status::Closed),
    ("INTERDITAD", Status::Closed),
    ("ACIDENTE", Status::Accident),
    ("OBRAS", Status::Roadwork),
];

/// Resolve the status of a text. The scan is not mutually exclusive: every
/// matching keyword overwrites the previous one, so the last matching table
/// entry wins. Last-match-wins is the panel's established behavior for texts
/// carrying several condition words; absence of all keywords means Normal.
pub fn resolve_status(text: &str) -> Status {
    let mut status = Status::Normal;
    for (keyword, mapped) in STATUS_KEYWORDS {
        if text.contains(keyword) {
            status = *mapped;
        }
    }
    status
}

/// Raw field set pulled from one candidate (or one nested alert).
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub status: Status,
    /// (start, end) km bounds as printed on the page, e.g. ("32,000", "40,000").
    pub km: Option<(String, String)>,
    pub direction_raw: String,
    /// True when extracted from a nested alert sub-container, false when the
    /// whole card was treated as one report.
    pub per_alert: bool,
}

/// Candidate text with whitespace collapsed and case normalized, the form
/// every downstream heuristic matches against.
pub fn card_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Extract zero or more raw records from a classified candidate. Alerts are
/// processed one record each when present; otherwise the whole card yields a
/// single record. An alert with unusable km attributes is skipped, never
/// half-emitted.
pub fn extract_records(
    cfg: &PipelineConfig,
    highway: &HighwayEntry,
    cand: &Candidate,
) -> Vec<RawRecord> {
    let container_title = cand.root.value().attr("title").map(str::to_uppercase);

    if cand.alerts.is_empty() {
        let text = card_text(&cand.root);
        return vec![RawRecord {
            status: resolve_status(&text),
            km: km_from_text(&text),
            direction_raw: extract_direction(&DirectionCx {
                text: &text,
                title: container_title.as_deref(),
                highway,
                stopwords: &cfg.direction_stopwords,
            }),
            per_alert: false,
        }];
    }

    cand.alerts
        .iter()
        .filter_map(|alert| extract_alert(cfg, highway, alert, container_title.as_deref()))
        .collect()
}

fn extract_alert(
    cfg: &PipelineConfig,
    highway: &HighwayEntry,
    alert: &ElementRef,
    container_title: Option<&str>,
) -> Option<RawRecord> {
    let text = card_text(alert);

    let km = match km_from_attrs(alert) {
        Ok(Some(km)) => Some(km),
        Ok(None) => km_from_text(&text),
        Err(bad) => {
            debug!(
                highway = %highway.code,
                value = %bad,
                "alert carries non-numeric km attribute, skipped"
            );
            return None;
        }
    };

    let alert_title = alert.value().attr("title").map(str::to_uppercase);
    let direction_raw = extract_direction(&DirectionCx {
        text: &text,
        title: alert_title.as_deref().or(container_title),
        highway,
        stopwords: &cfg.direction_stopwords,
    });

    Some(RawRecord {
        status: resolve_status(&text),
        km,
        direction_raw,
        per_alert: true,
    })
}

/// Machine-readable km bounds. Both attributes present and numeric → bounds;
/// either missing → structural miss, caller falls back to the text regex;
/// present but non-numeric → hard skip for this alert.
fn km_from_attrs(alert: &ElementRef) -> Result<Option<(String, String)>, String> {
    let start = alert.value().attr("data-km-inicial");
    let end = alert.value().attr("data-km-final");
    match (start, end) {
        (Some(s), Some(e)) => {
            let s = s.trim();
            let e = e.trim();
            for v in [s, e] {
                if v.is_empty() || !v.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
                    return Err(v.to_string());
                }
            }
            Ok(Some((s.to_string(), e.to_string())))
        }
        _ => Ok(None),
    }
}

fn km_from_text(text: &str) -> Option<(String, String)> {
    KM_RANGE_RE
        .captures(text)
        .map(|c| (c[1].to_string(), c[2].to_string()))
}

struct DirectionCx<'a> {
    text: &'a str,
    title: Option<&'a str>,
    highway: &'a HighwayEntry,
    stopwords: &'a [String],
}

/// Prioritized direction heuristics; evaluated in order, first success wins.
/// Rule names show up in diagnostic logs.
const DIRECTION_RULES: &[(&str, fn(&DirectionCx) -> Option<String>)] = &[
    ("titulo", direction_from_title),
    ("destino", direction_from_destino),
    ("compass", direction_from_compass),
];

fn extract_direction(cx: &DirectionCx) -> String {
    for (rule, extractor) in DIRECTION_RULES {
        if let Some(direction) = extractor(cx) {
            debug!(highway = %cx.highway.code, rule, %direction, "direction resolved");
            return direction;
        }
    }
    NO_DIRECTION.to_string()
}

/// Parenthesized compass token in the dedicated title field, e.g.
/// `SP 070 (LESTE)`.
fn direction_from_title(cx: &DirectionCx) -> Option<String> {
    let title = cx.title?;
    TITLE_COMPASS_RE
        .captures(title)
        .map(|c| c[1].to_string())
}

/// `DESTINO(S):` labeled field: text up to the next km label, first
/// "/"-separated clause. Tokens that are just the highway's own name or a
/// generic roadway word are not directions and are rejected.
fn direction_from_destino(cx: &DirectionCx) -> Option<String> {
    let start = ["DESTINO(S):", "DESTINOS:", "DESTINO:"]
        .iter()
        .find_map(|label| cx.text.find(label).map(|pos| pos + label.len()))?;

    let mut rest = &cx.text[start..];
    for boundary in ["KM INICIAL", "KM FINAL"] {
        if let Some(pos) = rest.find(boundary) {
            rest = &rest[..pos];
        }
    }

    let token = rest
        .split('/')
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches(|c: char| ".,;:".contains(c))
        .trim()
        .to_string();

    if token.is_empty()
        || cx.highway.aliases.iter().any(|a| a == &token)
        || cx.stopwords.iter().any(|s| s == &token)
    {
        return None;
    }
    Some(token)
}

/// Bare compass word anywhere in the text, final fallback.
fn direction_from_compass(cx: &DirectionCx) -> Option<String> {
    BARE_COMPASS_RE
        .captures(cx.text)
        .map(|c| c[1].to_string())
}

// ── Tests ──
