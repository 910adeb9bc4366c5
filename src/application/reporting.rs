use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{AppState, Cents, Material, ServiceRecord};

/// Counters for the dashboard cards. All derived from a single state
/// snapshot; nothing here mutates or caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_revenue: Cents,
    pub customer_count: usize,
    pub service_count: usize,
    pub low_stock_count: usize,
}

/// Sum of `totalValue` over all service records, recomputed from scratch.
pub fn total_revenue(state: &AppState) -> Cents {
    state.services.iter().map(|s| s.total_value).sum()
}

pub fn dashboard_stats(state: &AppState) -> DashboardStats {
    DashboardStats {
        total_revenue: total_revenue(state),
        customer_count: state.customers.len(),
        service_count: state.services.len(),
        low_stock_count: low_stock(state).len(),
    }
}

/// Materials below the general restock threshold (< 10), lowest stock
/// first. Criticals (< 5) are a subset, flagged separately by the caller
/// via `Material::is_critical_stock`.
pub fn low_stock(state: &AppState) -> Vec<&Material> {
    let mut materials: Vec<&Material> = state
        .materials
        .iter()
        .filter(|m| m.is_low_stock())
        .collect();
    materials.sort_by_key(|m| m.stock);
    materials
}

/// Materials below the urgent threshold (< 5).
pub fn critical_stock(state: &AppState) -> Vec<&Material> {
    state
        .materials
        .iter()
        .filter(|m| m.is_critical_stock())
        .collect()
}

/// The last `limit` service records in insertion order, most recent first.
pub fn recent_services(state: &AppState, limit: usize) -> Vec<&ServiceRecord> {
    state.services.iter().rev().take(limit).collect()
}

/// Records whose calendar date matches exactly.
pub fn services_on(state: &AppState, date: NaiveDate) -> Vec<&ServiceRecord> {
    state.services.iter().filter(|s| s.date == date).collect()
}

/// Records of a given month grouped by day, for calendar rendering.
pub fn services_in_month(
    state: &AppState,
    year: i32,
    month: u32,
) -> BTreeMap<NaiveDate, Vec<&ServiceRecord>> {
    let mut days: BTreeMap<NaiveDate, Vec<&ServiceRecord>> = BTreeMap::new();
    for service in &state.services {
        if service.date.year() == year && service.date.month() == month {
            days.entry(service.date).or_default().push(service);
        }
    }
    days
}
