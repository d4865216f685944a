use chrono::NaiveDate;
use farescout_shared::CandidateOffer;
use url::Url;

use crate::lookup::QuoteRequest;
use crate::vendor::{RawOffer, RawSegment};

/// Builds affiliate booking links from vendor booking tokens
#[derive(Debug, Clone)]
pub struct BookingLinks {
    base_url: String,
    currency: String,
    locale: String,
    partner_id: Option<String>,
}

impl BookingLinks {
    pub fn new(base_url: &str, currency: &str, locale: &str, partner_id: Option<String>) -> Self {
        Self {
            base_url: base_url.to_string(),
            currency: currency.to_string(),
            locale: locale.to_string(),
            partner_id: partner_id.filter(|p| !p.is_empty()),
        }
    }

    /// `{base}?token=..&currency=..&lang=..[&partner=..]`, or `None` when the
    /// base URL does not parse
    pub fn link(&self, token: &str) -> Option<String> {
        let mut params = vec![
            ("token", token),
            ("currency", self.currency.as_str()),
            ("lang", self.locale.as_str()),
        ];
        if let Some(partner) = &self.partner_id {
            params.push(("partner", partner.as_str()));
        }

        Url::parse_with_params(&self.base_url, &params)
            .ok()
            .map(String::from)
    }
}

impl Default for BookingLinks {
    fn default() -> Self {
        Self::new("https://www.kiwi.com/deep", "EUR", "fr", None)
    }
}

/// Maps a vendor offer onto the canonical offer shape
pub fn normalize_offer(
    raw: &RawOffer,
    request: &QuoteRequest,
    currency: &str,
    links: &BookingLinks,
) -> CandidateOffer {
    let segments = raw.route.len() as u32;
    let stops = if request.is_round_trip() {
        (segments / 2).saturating_sub(1)
    } else {
        segments.saturating_sub(1)
    };

    let outbound_date = raw
        .route
        .first()
        .and_then(segment_date)
        .unwrap_or(request.outbound);

    let return_date = if request.is_round_trip() {
        first_return_segment(&raw.route)
            .and_then(segment_date)
            .or(request.return_date)
    } else {
        None
    };

    let booking_link = raw
        .booking_token
        .as_deref()
        .and_then(|token| links.link(token))
        .or_else(|| raw.deep_link.clone())
        .unwrap_or_default();

    CandidateOffer {
        id: raw.id.clone(),
        price: raw.price.round() as i32,
        currency: currency.to_string(),
        origin: raw.fly_from.clone(),
        destination: raw.fly_to.clone(),
        outbound_date,
        return_date,
        duration_minutes: (raw.duration.total / 60) as u32,
        stops,
        airlines: carriers(raw),
        booking_link,
        deep_link: raw.deep_link.clone(),
    }
}

fn segment_date(segment: &RawSegment) -> Option<NaiveDate> {
    let day = segment.local_departure.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn first_return_segment(route: &[RawSegment]) -> Option<&RawSegment> {
    route
        .iter()
        .find(|s| s.return_leg == 1)
        .or_else(|| route.get(route.len() / 2).filter(|_| route.len() >= 2))
}

/// Offer-level carriers then segment carriers, first occurrence wins
fn carriers(raw: &RawOffer) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let all = raw
        .airlines
        .iter()
        .chain(raw.route.iter().map(|s| &s.airline));
    for code in all {
        if !code.is_empty() && !seen.contains(code) {
            seen.push(code.clone());
        }
    }
    seen
}
