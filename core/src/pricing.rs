//! Price comparison across vendor listings.
//!
//! Pure read-side aggregation: given the current listings for a standardized
//! product, flag the cheapest offer(s) and summarize the spread. Nothing here
//! touches the database or the network.

use std::collections::BTreeMap;

use crate::models::{LowestPrice, PricedListing, VendorListing};

/// Annotate each listing with whether its price equals the minimum over the
/// whole input. All ties carry the flag; an empty input yields an empty
/// result rather than an error.
pub fn flag_lowest(listings: Vec<VendorListing>) -> Vec<PricedListing> {
    let min_price = match listings.iter().map(|l| l.price).min() {
        Some(min) => min,
        None => return Vec::new(),
    };

    listings
        .into_iter()
        .map(|listing| {
            let is_lowest = listing.price == min_price;
            PricedListing { listing, is_lowest }
        })
        .collect()
}

/// Minimum price and vendor count for one standardized product. `None` when
/// no vendor currently lists it.
pub fn lowest_price_summary(listings: &[VendorListing]) -> Option<LowestPrice> {
    let lowest_price = listings.iter().map(|l| l.price).min()?;
    let standard_name = listings[0].standard_name.clone();
    Some(LowestPrice {
        standard_name,
        lowest_price,
        vendor_count: listings.len(),
    })
}

/// Group a heterogeneous set of listings by standardized name and summarize
/// each group. Output is sorted by name so the overview renders stably.
pub fn summarize_all(listings: &[VendorListing]) -> Vec<LowestPrice> {
    let mut groups: BTreeMap<&str, Vec<&VendorListing>> = BTreeMap::new();
    for listing in listings {
        groups
            .entry(listing.standard_name.as_str())
            .or_default()
            .push(listing);
    }

    groups
        .into_iter()
        .map(|(name, group)| LowestPrice {
            standard_name: name.to_string(),
            // group is non-empty by construction
            lowest_price: group.iter().map(|l| l.price).min().unwrap_or(0),
            vendor_count: group.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_listing(vendor: &str, standard_name: &str, price: i64) -> VendorListing {
        VendorListing {
            id: Uuid::new_v4(),
            vendor_id: vendor.to_string(),
            vendor_name: format!("{} 상회", vendor),
            original_name: format!("{} (raw)", standard_name),
            standard_name: standard_name.to_string(),
            price,
            unit: "kg".to_string(),
            stock: 100,
            image_url: None,
        }
    }

    #[test]
    fn test_single_minimum_flagged() {
        let flagged = flag_lowest(vec![
            make_listing("v1", "사과", 3200),
            make_listing("v2", "사과", 2900),
            make_listing("v3", "사과", 3500),
        ]);

        let lowest: Vec<_> = flagged.iter().filter(|p| p.is_lowest).collect();
        assert_eq!(lowest.len(), 1);
        assert_eq!(lowest[0].listing.vendor_id, "v2");
        assert_eq!(lowest[0].listing.price, 2900);
    }

    #[test]
    fn test_ties_all_flagged() {
        let flagged = flag_lowest(vec![
            make_listing("v1", "사과", 2900),
            make_listing("v2", "사과", 2900),
            make_listing("v3", "사과", 3500),
        ]);

        let lowest: Vec<_> = flagged.iter().filter(|p| p.is_lowest).collect();
        assert_eq!(lowest.len(), 2);
        assert!(flagged.iter().all(|p| p.is_lowest == (p.listing.price == 2900)));
    }

    #[test]
    fn test_empty_input_is_valid() {
        assert!(flag_lowest(Vec::new()).is_empty());
        assert!(lowest_price_summary(&[]).is_none());
        assert!(summarize_all(&[]).is_empty());
    }

    #[test]
    fn test_summary_counts_vendors() {
        let listings = vec![
            make_listing("v1", "사과", 3200),
            make_listing("v2", "사과", 2900),
        ];
        let summary = lowest_price_summary(&listings).unwrap();
        assert_eq!(summary.standard_name, "사과");
        assert_eq!(summary.lowest_price, 2900);
        assert_eq!(summary.vendor_count, 2);
    }

    #[test]
    fn test_summarize_all_groups_by_name() {
        let listings = vec![
            make_listing("v1", "사과", 3200),
            make_listing("v2", "배", 5100),
            make_listing("v3", "사과", 2900),
            make_listing("v4", "배", 4800),
            make_listing("v5", "감자", 1700),
        ];

        let summaries = summarize_all(&listings);
        assert_eq!(summaries.len(), 3);
        // BTreeMap keeps output sorted by name
        let names: Vec<_> = summaries.iter().map(|s| s.standard_name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let apples = summaries.iter().find(|s| s.standard_name == "사과").unwrap();
        assert_eq!(apples.lowest_price, 2900);
        assert_eq!(apples.vendor_count, 2);
    }
}
