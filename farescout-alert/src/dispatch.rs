use async_trait::async_trait;
use farescout_core::notifier::Notifier;
use farescout_core::{CoreError, CoreResult};
use farescout_shared::CandidateOffer;
use serde::Serialize;
use std::time::Duration;

const FALLBACK_BOOKING_URL: &str = "https://www.google.com/flights";

pub fn alert_subject(offer: &CandidateOffer, price_change: Option<i32>) -> String {
    let kind = match price_change {
        Some(change) if change < 0 => "Price drop",
        _ => "New flight",
    };
    format!(
        "{}: {} → {} at {}€",
        kind, offer.origin, offer.destination, offer.price
    )
}

fn stops_label(stops: u32) -> String {
    match stops {
        0 => "Direct flight".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    }
}

fn booking_url(offer: &CandidateOffer) -> &str {
    if offer.booking_link.is_empty() {
        FALLBACK_BOOKING_URL
    } else {
        &offer.booking_link
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn alert_html(search_name: &str, offer: &CandidateOffer, price_change: Option<i32>) -> String {
    let badge = match price_change {
        Some(change) if change < 0 => format!(
            r#"<p style="text-align:center"><span style="background:#10b981;color:#fff;padding:4px 12px;border-radius:12px">Price down {}%</span></p>"#,
            change.abs()
        ),
        _ => String::new(),
    };
    let return_line = match offer.return_date {
        Some(date) => format!("Return: {}", date),
        None => "One way".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family:-apple-system,'Segoe UI',sans-serif;line-height:1.6;color:#333">
    <div style="max-width:600px;margin:0 auto;padding:20px">
      <h1>FareScout</h1>
      <p>{search}</p>
      {badge}
      <div style="background:#f9fafb;border-left:4px solid #3b82f6;padding:20px">
        <h2>{origin} → {destination}</h2>
        <p style="font-size:36px;font-weight:bold;color:#3b82f6">{price} {currency}</p>
        <p>Departure: {outbound}<br>{return_line}</p>
        <p>Duration: {duration}</p>
        <p>Airlines: {airlines}</p>
        <p>{stops}</p>
      </div>
      <p style="text-align:center">
        <a href="{link}" style="background:#3b82f6;color:#fff;padding:14px 28px;border-radius:6px;text-decoration:none">See details and book</a>
      </p>
      <p style="color:#6b7280;font-size:14px">You receive this email because alerts are enabled for "{search}".</p>
    </div>
  </body>
</html>"#,
        search = escape_html(search_name),
        badge = badge,
        origin = escape_html(&offer.origin),
        destination = escape_html(&offer.destination),
        price = offer.price,
        currency = escape_html(&offer.currency),
        outbound = offer.outbound_date,
        return_line = return_line,
        duration = escape_html(&offer.duration_label()),
        airlines = escape_html(&offer.airlines.join(", ")),
        stops = stops_label(offer.stops),
        link = escape_html(booking_url(offer)),
    )
}

pub fn alert_text(search_name: &str, offer: &CandidateOffer, price_change: Option<i32>) -> String {
    let mut lines = vec![
        format!("FareScout alert for \"{}\"", search_name),
        format!("{} → {}: {} {}", offer.origin, offer.destination, offer.price, offer.currency),
    ];
    if let Some(change) = price_change.filter(|c| *c < 0) {
        lines.push(format!("Price down {}%", change.abs()));
    }
    lines.push(format!("Departure: {}", offer.outbound_date));
    if let Some(date) = offer.return_date {
        lines.push(format!("Return: {}", date));
    }
    lines.push(format!("Duration: {}", offer.duration_label()));
    lines.push(format!("Airlines: {}", offer.airlines.join(", ")));
    lines.push(stops_label(offer.stops));
    lines.push(format!("Book: {}", booking_url(offer)));
    lines.join("\n")
}

pub fn welcome_html(search_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family:-apple-system,'Segoe UI',sans-serif;line-height:1.6;color:#333">
    <div style="max-width:600px;margin:0 auto;padding:20px">
      <h1>Welcome to FareScout!</h1>
      <p>Your search "<strong>{}</strong>" is now active.</p>
      <p>We will watch fares matching your criteria and email you as soon as an interesting opportunity shows up.</p>
    </div>
  </body>
</html>"#,
        escape_html(search_name)
    )
}

#[derive(Debug, Clone)]
pub struct ResendConfig {
    /// e.g. `https://api.resend.com/emails`
    pub api_url: String,
    pub api_key: String,
    pub from: String,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: String,
    html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// Email delivery over a Resend-compatible HTTP API
pub struct ResendNotifier {
    http: reqwest::Client,
    config: ResendConfig,
}

impl ResendNotifier {
    pub fn new(config: ResendConfig) -> CoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CoreError::DispatchFailure(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn deliver(&self, payload: EmailPayload<'_>) -> CoreResult<()> {
        if self.config.api_key.is_empty() {
            return Err(CoreError::DispatchFailure("email.api_key is not configured".to_string()));
        }

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CoreError::DispatchFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::DispatchFailure(format!("{}: {}", status, body)));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send_alert(
        &self,
        to: &str,
        search_name: &str,
        offer: &CandidateOffer,
        price_change: Option<i32>,
    ) -> CoreResult<()> {
        self.deliver(EmailPayload {
            from: &self.config.from,
            to: vec![to],
            subject: alert_subject(offer, price_change),
            html: alert_html(search_name, offer, price_change),
            text: Some(alert_text(search_name, offer, price_change)),
        })
        .await
    }

    async fn send_welcome(&self, to: &str, search_name: &str) -> CoreResult<()> {
        self.deliver(EmailPayload {
            from: &self.config.from,
            to: vec![to],
            subject: "Your search is active!".to_string(),
            html: welcome_html(search_name),
            text: None,
        })
        .await
    }
}
