//! Vendor listing queries.
//!
//! Listings are read per request; the comparison flags in `pricing` are
//! computed from these rows at read time and never written back.

use anyhow::Result;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::models::VendorListing;
use crate::standardize;

#[derive(Debug, FromRow)]
struct ListingRow {
    id: Uuid,
    vendor_id: String,
    vendor_name: String,
    original_name: String,
    standard_name: String,
    price: i64,
    unit: String,
    stock: i32,
    image_url: Option<String>,
}

impl From<ListingRow> for VendorListing {
    fn from(row: ListingRow) -> Self {
        VendorListing {
            id: row.id,
            vendor_id: row.vendor_id,
            vendor_name: row.vendor_name,
            original_name: row.original_name,
            standard_name: row.standard_name,
            price: row.price,
            unit: row.unit,
            stock: row.stock,
            image_url: row.image_url,
        }
    }
}

/// All current listings for one standardized product, cheapest first.
pub async fn fetch_by_standard_name(pool: &PgPool, name: &str) -> Result<Vec<VendorListing>> {
    let rows: Vec<ListingRow> = sqlx::query_as(
        r#"
        SELECT id, vendor_id, vendor_name, original_name, standard_name,
               price, unit, stock, image_url
        FROM vendor_listings
        WHERE standard_name = $1
        ORDER BY price ASC
        "#,
    )
    .bind(name)
    .fetch_all(pool)
    .await?;

    debug!("Fetched {} listings for '{}'", rows.len(), name);
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Every current listing, for the marketplace overview.
pub async fn fetch_all(pool: &PgPool) -> Result<Vec<VendorListing>> {
    let rows: Vec<ListingRow> = sqlx::query_as(
        r#"
        SELECT id, vendor_id, vendor_name, original_name, standard_name,
               price, unit, stock, image_url
        FROM vendor_listings
        ORDER BY standard_name, price ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Fields a vendor supplies when listing a product. The standardized name is
/// resolved here, not by the vendor.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub vendor_id: String,
    pub vendor_name: String,
    pub original_name: String,
    pub price: i64,
    pub unit: String,
    pub stock: i32,
    pub image_url: Option<String>,
}

/// Insert a vendor listing. Raw names the catalog does not cover keep their
/// original name and therefore never group with other vendors' offers.
pub async fn insert_listing(pool: &PgPool, new: NewListing) -> Result<VendorListing> {
    let standard_name = standardize::standardize(&new.original_name)
        .map(str::to_string)
        .unwrap_or_else(|| new.original_name.clone());

    let listing = VendorListing {
        id: Uuid::new_v4(),
        vendor_id: new.vendor_id,
        vendor_name: new.vendor_name,
        original_name: new.original_name,
        standard_name,
        price: new.price,
        unit: new.unit,
        stock: new.stock,
        image_url: new.image_url,
    };

    sqlx::query(
        r#"
        INSERT INTO vendor_listings (
            id, vendor_id, vendor_name, original_name, standard_name,
            price, unit, stock, image_url
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(listing.id)
    .bind(&listing.vendor_id)
    .bind(&listing.vendor_name)
    .bind(&listing.original_name)
    .bind(&listing.standard_name)
    .bind(listing.price)
    .bind(&listing.unit)
    .bind(listing.stock)
    .bind(&listing.image_url)
    .execute(pool)
    .await?;

    Ok(listing)
}
