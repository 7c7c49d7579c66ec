use axum::http::{header::ACCEPT, HeaderMap};
use mime::Mime;
use std::cmp::Ordering;

/// One entry of an `Accept` header
#[derive(Debug)]
pub struct MediaRange {
    mime: Mime,
    quality: f32,
}

impl MediaRange {
    /// 2 for `type/subtype`, 1 for `type/*`, 0 for `*/*`, `None` if it doesn't
    /// cover `offer` at all
    fn specificity(&self, offer: &Mime) -> Option<u8> {
        if self.mime.type_() == mime::STAR {
            return Some(0);
        }
        if self.mime.type_() != offer.type_() {
            return None;
        }
        if self.mime.subtype() == mime::STAR {
            return Some(1);
        }
        (self.mime.subtype() == offer.subtype()).then_some(2)
    }
}

/// Every media range the client listed, across all `Accept` headers.
/// Unparseable entries are skipped.
pub fn accepted(headers: &HeaderMap) -> Vec<MediaRange> {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|item| item.trim().parse::<Mime>().ok())
        .map(|mime| {
            let quality = mime
                .get_param("q")
                .and_then(|q| q.as_str().parse::<f32>().ok())
                .unwrap_or(1.0)
                .clamp(0.0, 1.0);
            MediaRange { mime, quality }
        })
        .collect()
}

/// Quality the client gives to `offer`: the highest one among the most
/// specific matching ranges, or 0
pub fn quality(ranges: &[MediaRange], offer: &Mime) -> f32 {
    ranges
        .iter()
        .filter_map(|range| range.specificity(offer).map(|s| (s, range.quality)))
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .map(|(_, quality)| quality)
        .unwrap_or(0.0)
}

/// The offer the client prefers. Ties go to the earlier offer.
pub fn best_match<'a>(ranges: &[MediaRange], offers: &'a [Mime]) -> Option<&'a Mime> {
    let mut best: Option<(&Mime, f32)> = None;

    for offer in offers {
        let q = quality(ranges, offer);
        if q > 0.0 && best.map_or(true, |(_, best_q)| q > best_q) {
            best = Some((offer, q));
        }
    }

    best.map(|(offer, _)| offer)
}

/// Does the request prefer an HTML page over a JSON document?
///
/// `*/*` alone is not enough, HTML must be strictly preferred.
pub fn request_wants_html(headers: &HeaderMap) -> bool {
    let ranges = accepted(headers);
    let offers = [mime::APPLICATION_JSON, mime::TEXT_HTML];

    match best_match(&ranges, &offers) {
        Some(best) if *best == mime::TEXT_HTML => {
            quality(&ranges, &mime::TEXT_HTML) > quality(&ranges, &mime::APPLICATION_JSON)
        }
        _ => false,
    }
}
