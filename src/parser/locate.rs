use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// Phrase that marks a segment card in the marker-based markup shape.
const KM_MARKER: &str = "km inicial";

/// How many element ancestors above the marker's own element enclose the
/// full segment card in the marker-based shape.
const MARKER_ANCESTOR_LEVELS: usize = 4;

static HIGHWAY_CONTAINER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-rodovia]").unwrap());
static ALERT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".ocorrencia").unwrap());

/// One markup subtree hypothesized to describe a single segment's report.
pub struct Candidate<'a> {
    pub root: ElementRef<'a>,
    /// Nested alert sub-containers (attribute-based shape only). Empty means
    /// the whole card is treated as one report downstream.
    pub alerts: Vec<ElementRef<'a>>,
    /// Structural identifier carried by the container, when the markup
    /// provides one (`data-rodovia`), uppercased.
    pub hint: Option<String>,
}

/// Locate candidate subtrees in document order. Tries the attribute-based
/// shape first and falls back to the marker-based shape; an empty result is
/// a normal outcome (markup changed, or no active reports).
pub fn locate_candidates(doc: &Html) -> Vec<Candidate<'_>> {
    let by_attribute = locate_by_attribute(doc);
    if !by_attribute.is_empty() {
        return by_attribute;
    }
    locate_by_marker(doc)
}

/// Containers carrying a highway identifier attribute, each with its nested
/// alert entries.
fn locate_by_attribute(doc: &Html) -> Vec<Candidate<'_>> {
    doc.select(&HIGHWAY_CONTAINER_SEL)
        .map(|root| {
            let alerts: Vec<ElementRef> = root.select(&ALERT_SEL).collect();
            let hint = root
                .value()
                .attr("data-rodovia")
                .map(|v| v.trim().to_uppercase());
            Candidate { root, alerts, hint }
        })
        .collect()
}

/// Leaf text nodes containing the km marker phrase, walked up a fixed number
/// of ancestor levels to the enclosing card. Cards reached from more than
/// one marker are emitted once, first marker wins.
fn locate_by_marker(doc: &Html) -> Vec<Candidate<'_>> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for node in doc.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if !text.to_lowercase().contains(KM_MARKER) {
            continue;
        }
        // First element ancestor is the marker's own element; the card is a
        // fixed number of levels above it.
        let Some(root) = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .take(MARKER_ANCESTOR_LEVELS + 1)
            .last()
        else {
            continue;
        };
        if seen.insert(root.id()) {
            candidates.push(Candidate {
                root,
                alerts: Vec::new(),
                hint: None,
            });
        }
    }

    candidates
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_no_candidates() {
        let doc = Html::parse_document("<html><body><p>nada por aqui</p></body></html>");
        assert!(locate_candidates(&doc).is_empty());
    }

    #[test]
    fn marker_shape_walks_up_to_card() {
        let html = r#"
            <div id="card">
              <div><div><div><span>Km Inicial: 32,000</span></div></div></div>
              <p>SP 098 fluxo normal</p>
            </div>"#;
        let doc = Html::parse_document(html);
        let cands = locate_candidates(&doc);
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].root.value().attr("id"), Some("card"));
        assert!(cands[0].alerts.is_empty());
        assert!(cands[0].hint.is_none());
    }

    #[test]
    fn repeated_markers_in_one_card_emit_once() {
        let html = r#"
            <div id="card">
              <div><div><div><span>KM INICIAL: 10,000</span></div></div></div>
              <div><div><div><span>km inicial: 12,000</span></div></div></div>
            </div>"#;
        let doc = Html::parse_document(html);
        assert_eq!(locate_candidates(&doc).len(), 1);
    }

    #[test]
    fn attribute_shape_collects_alerts_and_hint() {
        let html = r#"
            <section data-rodovia="sp 070" title="SP 070 (LESTE)">
              <div class="ocorrencia">LENTO km inicial: 20,000</div>
              <div class="ocorrencia">PARADO</div>
            </section>"#;
        let doc = Html::parse_document(html);
        let cands = locate_candidates(&doc);
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].alerts.len(), 2);
        assert_eq!(cands[0].hint.as_deref(), Some("SP 070"));
    }

    #[test]
    fn attribute_shape_wins_over_marker_shape() {
        // A marker phrase elsewhere must not add a second candidate when
        // attribute containers are present.
        let html = r#"
            <section data-rodovia="SP 065"><div class="ocorrencia">OBRAS</div></section>
            <div><div><div><div><span>km inicial: 5,000</span></div></div></div></div>"#;
        let doc = Html::parse_document(html);
        let cands = locate_candidates(&doc);
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].hint.as_deref(), Some("SP 065"));
    }
}
