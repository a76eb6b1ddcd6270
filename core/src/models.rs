// Shared models for the Garak marketplace services
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Orders
// ============================================================================

/// Lifecycle state of an order. Orders are append-only: rows are created and
/// status-mutated, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    /// Legal transitions: pending can be confirmed or cancelled, a confirmed
    /// order can still be cancelled. Nothing leaves cancelled, and no status
    /// moves back to pending.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Confirmed, OrderStatus::Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub product_id: Uuid,
    pub retailer_id: String,
    pub vendor_id: String,
    pub quantity: i32,
    /// Total in KRW.
    pub total_price: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Vendor listings & price comparison
// ============================================================================

/// A vendor's offer for a raw product. `standard_name` groups equivalent
/// offers from different vendors for comparison; `original_name` is whatever
/// the vendor typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorListing {
    pub id: Uuid,
    pub vendor_id: String,
    pub vendor_name: String,
    pub original_name: String,
    pub standard_name: String,
    /// KRW per `unit`.
    pub price: i64,
    pub unit: String,
    pub stock: i32,
    pub image_url: Option<String>,
}

/// A listing annotated with the comparison result. Derived per read, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedListing {
    #[serde(flatten)]
    pub listing: VendorListing,
    pub is_lowest: bool,
}

/// Per-product comparison summary: the minimum price across current vendor
/// listings and how many vendors offer the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowestPrice {
    pub standard_name: String,
    pub lowest_price: i64,
    pub vendor_count: usize,
}

// ============================================================================
// External market prices (KAMIS)
// ============================================================================

/// One quote from the government market-price API. Not persisted; fetched
/// per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPrice {
    pub market_name: String,
    pub product_name: String,
    pub price: f64,
    pub grade: String,
    pub unit: String,
    pub date: String,
    pub region: Option<String>,
}

/// What the market-price endpoint hands back. Always well-formed: an upstream
/// failure produces the empty report, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPriceReport {
    pub prices: Vec<MarketPrice>,
    pub average_price: f64,
    pub count: usize,
}

impl MarketPriceReport {
    pub fn empty() -> Self {
        Self {
            prices: Vec::new(),
            average_price: 0.0,
            count: 0,
        }
    }

    /// Build a report from raw quotes, computing the exact arithmetic mean.
    pub fn from_prices(prices: Vec<MarketPrice>) -> Self {
        if prices.is_empty() {
            return Self::empty();
        }
        let sum: f64 = prices.iter().map(|p| p.price).sum();
        let count = prices.len();
        Self {
            average_price: sum / count as f64,
            count,
            prices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("shipped"), None);
    }

    #[test]
    fn test_report_mean_is_exact() {
        let quote = |price: f64| MarketPrice {
            market_name: "가락시장".to_string(),
            product_name: "apple".to_string(),
            price,
            grade: "상".to_string(),
            unit: "kg".to_string(),
            date: "2025-11-14".to_string(),
            region: None,
        };
        let report = MarketPriceReport::from_prices(vec![quote(1000.0), quote(1200.0), quote(1100.0)]);
        assert_eq!(report.count, 3);
        assert_eq!(report.average_price, 1100.0);
    }

    #[test]
    fn test_empty_report_is_zeroed() {
        let report = MarketPriceReport::from_prices(Vec::new());
        assert!(report.prices.is_empty());
        assert_eq!(report.average_price, 0.0);
        assert_eq!(report.count, 0);
    }
}
