//! Reduction of raw item rows into per-name display summaries.
//!
//! With the canonical schema every `(name, room)` group is a single row,
//! but the fold also handles legacy data where one item was stored as
//! several per-status rows: quantities and counts are summed per name and
//! the display status is re-derived from the summed counts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{Item, ItemStatus};

/// One display record per item name.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ItemSummary {
    /// Id of the most recently updated row in the group, for edit/delete
    /// actions against the live table.
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub status: ItemStatus,
    pub maintenance_count: i32,
    pub replacement_count: i32,
    pub good_count: i32,
    pub updated_at: DateTime<Utc>,
}

/// Groups rows by name and sums quantity and counts. Pure and
/// order-independent: the result depends only on the multiset of input
/// rows, and summaries come out sorted by name.
pub fn summarize(rows: &[Item]) -> Vec<ItemSummary> {
    let mut groups: BTreeMap<&str, ItemSummary> = BTreeMap::new();

    for row in rows {
        groups
            .entry(row.name.as_str())
            .and_modify(|summary| {
                summary.quantity += row.quantity;
                summary.maintenance_count += row.maintenance_count;
                summary.replacement_count += row.replacement_count;
                // Carry the identity of the freshest row; ties broken by id
                // so the fold stays deterministic for any input order.
                if (row.updated_at, row.id) > (summary.updated_at, summary.id) {
                    summary.id = row.id;
                    summary.updated_at = row.updated_at;
                }
            })
            .or_insert_with(|| ItemSummary {
                id: row.id,
                name: row.name.clone(),
                quantity: row.quantity,
                status: row.status,
                maintenance_count: row.maintenance_count,
                replacement_count: row.replacement_count,
                good_count: 0,
                updated_at: row.updated_at,
            });
    }

    groups
        .into_values()
        .map(|mut summary| {
            summary.status =
                ItemStatus::derive(summary.maintenance_count, summary.replacement_count);
            summary.good_count =
                (summary.quantity - summary.maintenance_count - summary.replacement_count).max(0);
            summary
        })
        .collect()
}
