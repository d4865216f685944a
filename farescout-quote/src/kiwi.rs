use async_trait::async_trait;
use std::time::Duration;

use crate::lookup::{LookupError, PriceLookup, QuoteRequest};
use crate::vendor::VendorResponse;

#[derive(Debug, Clone)]
pub struct KiwiConfig {
    /// Full search endpoint, e.g. `https://api.tequila.kiwi.com/v2/search`
    pub base_url: String,
    pub api_key: String,
    pub partner_id: Option<String>,
    pub currency: String,
    pub locale: String,
    pub limit: usize,
    pub timeout: Duration,
}

/// HTTP client for the Tequila search API
pub struct KiwiClient {
    http: reqwest::Client,
    config: KiwiConfig,
}

impl KiwiClient {
    pub fn new(config: KiwiConfig) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn query(&self, request: &QuoteRequest) -> Vec<(&'static str, String)> {
        let outbound = request.outbound.format("%d/%m/%Y").to_string();
        let mut params = vec![
            ("fly_from", request.origin.clone()),
            ("fly_to", request.destination.clone()),
            ("date_from", outbound.clone()),
            ("date_to", outbound),
        ];

        match request.return_date {
            Some(back) => {
                let back = back.format("%d/%m/%Y").to_string();
                params.push(("return_from", back.clone()));
                params.push(("return_to", back));
                params.push(("flight_type", "round".to_string()));
            }
            None => params.push(("flight_type", "oneway".to_string())),
        }

        if let Some(max) = request.max_price {
            params.push(("price_to", max.to_string()));
        }

        params.extend([
            ("adults", "1".to_string()),
            ("curr", self.config.currency.clone()),
            ("locale", self.config.locale.clone()),
            ("limit", self.config.limit.to_string()),
            ("sort", "price".to_string()),
        ]);

        if let Some(partner) = self.config.partner_id.as_ref().filter(|p| !p.is_empty()) {
            params.push(("partner", partner.clone()));
        }

        params
    }
}

#[async_trait]
impl PriceLookup for KiwiClient {
    async fn lookup(&self, request: &QuoteRequest) -> Result<VendorResponse, LookupError> {
        if self.config.api_key.is_empty() {
            return Err(LookupError::NotConfigured("provider.api_key is empty".to_string()));
        }

        tracing::debug!(
            origin = %request.origin,
            destination = %request.destination,
            outbound = %request.outbound,
            "Querying price provider"
        );

        let response = self
            .http
            .get(&self.config.base_url)
            .header("apikey", &self.config.api_key)
            .header("Accept", "application/json")
            .query(&self.query(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<VendorResponse>()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn client(api_key: &str) -> KiwiClient {
        KiwiClient::new(KiwiConfig {
            base_url: "https://api.tequila.kiwi.com/v2/search".to_string(),
            api_key: api_key.to_string(),
            partner_id: Some("scout".to_string()),
            currency: "EUR".to_string(),
            locale: "fr".to_string(),
            limit: 10,
            timeout: Duration::from_secs(15),
        })
        .unwrap()
    }

    #[test]
    fn test_query_parameters() {
        let request = QuoteRequest::round_trip(
            "CDG",
            "TBS",
            NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
        )
        .with_max_price(Some(300));

        let params = client("key").query(&request);
        let get = |k: &str| params.iter().find(|(name, _)| *name == k).map(|(_, v)| v.as_str());
        assert_eq!(get("date_from"), Some("07/03/2025"));
        assert_eq!(get("return_to"), Some("09/03/2025"));
        assert_eq!(get("flight_type"), Some("round"));
        assert_eq!(get("price_to"), Some("300"));
        assert_eq!(get("partner"), Some("scout"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let request = QuoteRequest::round_trip(
            "CDG",
            "TBS",
            NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
        );
        let err = client("").lookup(&request).await.unwrap_err();
        assert!(matches!(err, LookupError::NotConfigured(_)));
    }
}
