//! KAMIS client (Korean agricultural market price service)
//!
//! Fetches daily wholesale quotes for a product so retailers can see vendor
//! offers next to the government market price. Quotes are fetched per
//! request and never persisted.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::KamisConfig;
use crate::models::{MarketPrice, MarketPriceReport};

/// Upstream code for a successful lookup.
const CODE_OK: &str = "000";
/// Upstream code for "query was fine, no rows" — not an error.
const CODE_NO_DATA: &str = "200";

/// Anything that can answer a market-price lookup. The API server holds a
/// `dyn MarketPriceSource` so tests can swap in a stub upstream.
#[async_trait]
pub trait MarketPriceSource: Send + Sync {
    /// Never fails: upstream timeouts, network errors and malformed bodies
    /// all collapse into the empty report. A timeout is indistinguishable
    /// from a legitimate zero-result response.
    async fn market_report(&self, product_name: &str, region: Option<&str>) -> MarketPriceReport;
}

pub struct KamisClient {
    client: Client,
    base_url: String,
    cert_id: Option<String>,
    cert_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KamisResponse {
    #[serde(default)]
    data: KamisData,
}

#[derive(Debug, Default, Deserialize)]
struct KamisData {
    #[serde(default)]
    error_code: String,
    #[serde(default)]
    item: Vec<KamisItem>,
}

/// Raw row as KAMIS ships it: prices are comma-grouped strings, a dash means
/// no quote for that market/day.
#[derive(Debug, Deserialize)]
struct KamisItem {
    #[serde(default)]
    item_name: String,
    #[serde(default)]
    market_name: String,
    #[serde(default)]
    county_name: String,
    #[serde(default)]
    rank: String,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    regday: String,
    #[serde(default)]
    dpr1: String,
}

impl KamisClient {
    pub fn new(config: &KamisConfig) -> Self {
        // The timeout is the whole point of this client; a fallback without
        // one would be worse than failing loudly at startup.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Garak/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            cert_id: config.cert_id.clone(),
            cert_key: config.cert_key.clone(),
        }
    }

    /// Fetch and normalize quotes for a product. Upstream "no data" is
    /// `Ok(vec![])`; transport and parse failures are `Err` and handled by
    /// `market_report`.
    pub async fn fetch_prices(
        &self,
        product_name: &str,
        region: Option<&str>,
    ) -> Result<Vec<MarketPrice>> {
        let url = format!("{}/service/price/json.do", self.base_url);

        let mut query: Vec<(&str, &str)> = vec![
            ("action", "dailyPriceList"),
            ("p_returntype", "json"),
            ("p_itemname", product_name),
        ];
        if let Some(id) = self.cert_id.as_deref() {
            query.push(("p_cert_id", id));
        }
        if let Some(key) = self.cert_key.as_deref() {
            query.push(("p_cert_key", key));
        }
        if let Some(r) = region {
            query.push(("p_countyname", r));
        }

        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("KAMIS request failed")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("KAMIS returned HTTP {}", status));
        }

        let body: KamisResponse = resp.json().await.context("KAMIS body was not valid JSON")?;
        parse_items(body, region)
    }
}

#[async_trait]
impl MarketPriceSource for KamisClient {
    async fn market_report(&self, product_name: &str, region: Option<&str>) -> MarketPriceReport {
        match self.fetch_prices(product_name, region).await {
            Ok(prices) => {
                debug!(
                    "KAMIS returned {} quotes for '{}'",
                    prices.len(),
                    product_name
                );
                MarketPriceReport::from_prices(prices)
            }
            Err(e) => {
                // Timeout, network failure, malformed body: the caller gets
                // the same empty report as a genuine zero-result lookup.
                warn!("KAMIS lookup failed for '{}': {:#}", product_name, e);
                MarketPriceReport::empty()
            }
        }
    }
}

/// Normalize the upstream envelope into `MarketPrice` rows.
fn parse_items(body: KamisResponse, region: Option<&str>) -> Result<Vec<MarketPrice>> {
    match body.data.error_code.as_str() {
        CODE_OK | "" => {}
        CODE_NO_DATA => return Ok(Vec::new()),
        code => return Err(anyhow!("KAMIS error code {}", code)),
    }

    let prices = body
        .data
        .item
        .into_iter()
        .filter(|item| {
            // The upstream sometimes ignores the county filter; enforce it here
            match region {
                Some(r) => item.county_name.eq_ignore_ascii_case(r),
                None => true,
            }
        })
        .filter_map(|item| {
            let price = parse_price(&item.dpr1)?;
            let region = if item.county_name.is_empty() {
                None
            } else {
                Some(item.county_name)
            };
            Some(MarketPrice {
                market_name: item.market_name,
                product_name: item.item_name,
                price,
                grade: item.rank,
                unit: item.unit,
                date: item.regday,
                region,
            })
        })
        .collect();

    Ok(prices)
}

/// KAMIS prices arrive as `"3,240"`; `"-"` and empty mean no quote.
fn parse_price(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> KamisResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_price_strings() {
        assert_eq!(parse_price("3,240"), Some(3240.0));
        assert_eq!(parse_price("1,234,500"), Some(1234500.0));
        assert_eq!(parse_price("980"), Some(980.0));
        assert_eq!(parse_price("-"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("n/a"), None);
    }

    #[test]
    fn test_parse_items_skips_unquoted_rows() {
        let resp = body(
            r#"{"data":{"error_code":"000","item":[
                {"item_name":"사과","market_name":"가락","county_name":"서울","rank":"상품","unit":"10kg","regday":"11/14","dpr1":"32,400"},
                {"item_name":"사과","market_name":"구리","county_name":"경기","rank":"상품","unit":"10kg","regday":"11/14","dpr1":"-"},
                {"item_name":"사과","market_name":"엄궁","county_name":"부산","rank":"상품","unit":"10kg","regday":"11/14","dpr1":"31,800"}
            ]}}"#,
        );

        let prices = parse_items(resp, None).unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].price, 32400.0);
        assert_eq!(prices[1].price, 31800.0);
    }

    #[test]
    fn test_parse_items_region_filter() {
        let resp = body(
            r#"{"data":{"error_code":"000","item":[
                {"item_name":"사과","market_name":"가락","county_name":"서울","rank":"상품","unit":"10kg","regday":"11/14","dpr1":"32,400"},
                {"item_name":"사과","market_name":"엄궁","county_name":"부산","rank":"상품","unit":"10kg","regday":"11/14","dpr1":"31,800"}
            ]}}"#,
        );

        let prices = parse_items(resp, Some("부산")).unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].market_name, "엄궁");
        assert_eq!(prices[0].region.as_deref(), Some("부산"));
    }

    #[test]
    fn test_no_data_code_is_empty_not_error() {
        let resp = body(r#"{"data":{"error_code":"200","item":[]}}"#);
        assert!(parse_items(resp, None).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_error_code_is_error() {
        let resp = body(r#"{"data":{"error_code":"900","item":[]}}"#);
        assert!(parse_items(resp, None).is_err());
    }

    #[test]
    fn test_missing_data_block_parses_empty() {
        let resp = body(r#"{"condition":[]}"#);
        assert!(parse_items(resp, None).unwrap().is_empty());
    }

    fn unreachable_client() -> KamisClient {
        // Nothing listens on port 9; connection failure stands in for any
        // upstream outage, including a timeout
        KamisClient::new(&KamisConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            cert_id: None,
            cert_key: None,
            timeout_secs: 1,
        })
    }

    #[tokio::test]
    async fn test_fetch_prices_surfaces_transport_error() {
        let client = unreachable_client();
        assert!(client.fetch_prices("사과", None).await.is_err());
    }

    #[tokio::test]
    async fn test_report_absorbs_upstream_failure() {
        // The caller must not be able to tell an outage from a legitimate
        // zero-result lookup
        let client = unreachable_client();
        let report = client.market_report("사과", None).await;
        assert!(report.prices.is_empty());
        assert_eq!(report.average_price, 0.0);
        assert_eq!(report.count, 0);
    }
}
