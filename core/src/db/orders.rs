//! Order persistence.
//!
//! Orders are append-only: created on checkout and status-mutated through
//! the legal transition set, never deleted. Status strings in the database
//! always round-trip through `OrderStatus`.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::{Order, OrderStatus};

#[derive(Debug, Error)]
pub enum OrderStoreError {
    #[error("order {0} not found")]
    NotFound(Uuid),
    #[error("cannot move order from {} to {}", from.as_str(), to.as_str())]
    IllegalTransition { from: OrderStatus, to: OrderStatus },
    #[error("order row has unknown status '{0}'")]
    CorruptStatus(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    product_id: Uuid,
    retailer_id: String,
    vendor_id: String,
    quantity: i32,
    total_price: i64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = OrderStoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::parse(&row.status)
            .ok_or_else(|| OrderStoreError::CorruptStatus(row.status.clone()))?;
        Ok(Order {
            id: row.id,
            product_id: row.product_id,
            retailer_id: row.retailer_id,
            vendor_id: row.vendor_id,
            quantity: row.quantity,
            total_price: row.total_price,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Checkout payload. Status always starts at `pending`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub product_id: Uuid,
    pub retailer_id: String,
    pub vendor_id: String,
    pub quantity: i32,
    pub total_price: i64,
}

pub async fn insert_order(pool: &PgPool, new: NewOrder) -> Result<Order, OrderStoreError> {
    let now = Utc::now();
    let order = Order {
        id: Uuid::new_v4(),
        product_id: new.product_id,
        retailer_id: new.retailer_id,
        vendor_id: new.vendor_id,
        quantity: new.quantity,
        total_price: new.total_price,
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO orders (
            id, product_id, retailer_id, vendor_id, quantity,
            total_price, status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(order.id)
    .bind(order.product_id)
    .bind(&order.retailer_id)
    .bind(&order.vendor_id)
    .bind(order.quantity)
    .bind(order.total_price)
    .bind(order.status.as_str())
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(pool)
    .await?;

    info!("Created order {} ({})", order.id, order.status.as_str());
    Ok(order)
}

pub async fn fetch_order(pool: &PgPool, id: Uuid) -> Result<Option<Order>, OrderStoreError> {
    let row: Option<OrderRow> = sqlx::query_as(
        r#"
        SELECT id, product_id, retailer_id, vendor_id, quantity,
               total_price, status, created_at, updated_at
        FROM orders
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Order::try_from).transpose()
}

/// All orders a retailer has placed, newest first.
pub async fn fetch_orders_for_retailer(
    pool: &PgPool,
    retailer_id: &str,
) -> Result<Vec<Order>, OrderStoreError> {
    let rows: Vec<OrderRow> = sqlx::query_as(
        r#"
        SELECT id, product_id, retailer_id, vendor_id, quantity,
               total_price, status, created_at, updated_at
        FROM orders
        WHERE retailer_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(retailer_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Order::try_from).collect()
}

/// Move an order to a new status, enforcing the legal transition set before
/// touching the row. The UPDATE re-checks the current status so a racing
/// transition loses instead of clobbering.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    next: OrderStatus,
) -> Result<Order, OrderStoreError> {
    let current = fetch_order(pool, id)
        .await?
        .ok_or(OrderStoreError::NotFound(id))?;

    if !current.status.can_transition_to(next) {
        return Err(OrderStoreError::IllegalTransition {
            from: current.status,
            to: next,
        });
    }

    let row: Option<OrderRow> = sqlx::query_as(
        r#"
        UPDATE orders
        SET status = $1, updated_at = NOW()
        WHERE id = $2 AND status = $3
        RETURNING id, product_id, retailer_id, vendor_id, quantity,
                  total_price, status, created_at, updated_at
        "#,
    )
    .bind(next.as_str())
    .bind(id)
    .bind(current.status.as_str())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            info!(
                "Order {} moved {} -> {}",
                id,
                current.status.as_str(),
                next.as_str()
            );
            Order::try_from(row)
        }
        // Row changed under us between the read and the guarded update
        None => Err(OrderStoreError::IllegalTransition {
            from: current.status,
            to: next,
        }),
    }
}
