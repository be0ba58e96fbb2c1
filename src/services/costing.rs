//! Cost allocation: what one unit of output cost to produce in a period.
//!
//! Fixed costs are amortized per distinct month touched, not per calendar
//! day: a batch brewed any day of a month pulls in that whole month's fixed
//! costs once, and further batches in the same month do not count it again.
//!
//! The aggregate and per-product formulas are intentionally independent.
//! The aggregate counts each distinct month once across all selected batches;
//! each product counts the months its own batches touch. When two products
//! share a month, the per-product amortizations therefore add up to more than
//! the aggregate one. That inconsistency is inherited behavior and is kept
//! as-is rather than silently unified.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::{MonthKey, Period, ProductionBatch, Settings};
use crate::ledger::Snapshot;

/// Full audit trail of one cost-per-unit computation. A report renders every
/// intermediate sum, not just the final figure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub cost_per_unit: f64,
    pub units_produced: f64,
    pub variable_cost: f64,
    pub labor_cost: f64,
    pub fixed_cost_amortization: f64,
    pub total_cost: f64,
    pub months_counted: usize,
    pub monthly_fixed_costs: f64,
}

/// Per-product costing row with pricing guidance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCosting {
    pub product_name: String,
    pub batches: usize,
    pub units_produced: f64,
    pub total_cost: f64,
    pub cost_per_unit: f64,
    pub recommended_price: f64,
    pub margin_multiplier: f64,
}

pub struct CostingService;

impl CostingService {
    /// Aggregate cost per unit for the period. An empty selection yields an
    /// all-zero breakdown; division by zero never happens.
    pub fn cost_per_unit(snapshot: &Snapshot, period: Period) -> CostBreakdown {
        let batches = period.filter(&snapshot.production);
        if batches.is_empty() {
            return CostBreakdown::default();
        }
        breakdown_for(&batches, &snapshot.settings)
    }

    /// Independent cost-per-unit runs per product, sorted by product name.
    /// Grouping is by exact name; trimming and case folding are deliberately
    /// not applied.
    pub fn cost_per_unit_by_product(snapshot: &Snapshot, period: Period) -> Vec<ProductCosting> {
        let batches = period.filter(&snapshot.production);
        let mut groups: IndexMap<&str, Vec<&ProductionBatch>> = IndexMap::new();
        for batch in &batches {
            groups
                .entry(batch.product_name.as_str())
                .or_default()
                .push(batch);
        }

        let multiplier = snapshot.settings.profit_margin_multiplier;
        let mut rows: Vec<ProductCosting> = groups
            .into_iter()
            .map(|(name, group)| {
                let breakdown = breakdown_for(&group, &snapshot.settings);
                ProductCosting {
                    product_name: name.to_string(),
                    batches: group.len(),
                    units_produced: breakdown.units_produced,
                    total_cost: breakdown.total_cost,
                    cost_per_unit: breakdown.cost_per_unit,
                    recommended_price: breakdown.cost_per_unit * multiplier,
                    margin_multiplier: multiplier,
                }
            })
            .collect();

        // Case-insensitive ordering standing in for locale collation.
        rows.sort_by(|a, b| {
            let left = a.product_name.to_lowercase();
            let right = b.product_name.to_lowercase();
            left.cmp(&right)
                .then_with(|| a.product_name.cmp(&b.product_name))
        });
        rows
    }
}

fn breakdown_for(batches: &[&ProductionBatch], settings: &Settings) -> CostBreakdown {
    let variable_cost: f64 = batches.iter().map(|batch| batch.ingredient_cost).sum();
    let labor_hours: f64 = batches.iter().map(|batch| batch.labor_hours).sum();
    let labor_cost = labor_hours * settings.labor_rate;

    let months_counted = distinct_months(batches);
    let monthly_fixed_costs = settings.monthly_fixed_costs();
    let fixed_cost_amortization = monthly_fixed_costs * months_counted as f64;

    let total_cost = variable_cost + labor_cost + fixed_cost_amortization;
    let units_produced: f64 = batches.iter().map(|batch| batch.volume_produced).sum();
    let cost_per_unit = if units_produced > 0.0 {
        total_cost / units_produced
    } else {
        0.0
    };

    CostBreakdown {
        cost_per_unit,
        units_produced,
        variable_cost,
        labor_cost,
        fixed_cost_amortization,
        total_cost,
        months_counted,
        monthly_fixed_costs,
    }
}

/// Batches whose date cannot be bucketed contribute cost but no month count.
fn distinct_months(batches: &[&ProductionBatch]) -> usize {
    batches
        .iter()
        .filter_map(|batch| MonthKey::of(&batch.date))
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn march_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.settings.labor_rate = 150.0;
        snapshot.settings.monthly_rent = 1000.0;
        snapshot.settings.monthly_salaries = 2000.0;
        snapshot.settings.monthly_utilities = 500.0;
        snapshot.production = vec![
            ProductionBatch::new(date(2024, 3, 5), "IPA", 100.0, 10.0, 500.0),
            ProductionBatch::new(date(2024, 3, 20), "IPA", 50.0, 5.0, 250.0),
        ];
        snapshot
    }

    #[test]
    fn single_month_breakdown_matches_reference_figures() {
        let snapshot = march_snapshot();
        let breakdown = CostingService::cost_per_unit(&snapshot, Period::month_of(2024, 3));
        assert_eq!(breakdown.variable_cost, 750.0);
        assert_eq!(breakdown.labor_cost, 2250.0);
        assert_eq!(breakdown.fixed_cost_amortization, 3500.0);
        assert_eq!(breakdown.months_counted, 1);
        assert_eq!(breakdown.total_cost, 6500.0);
        assert_eq!(breakdown.units_produced, 150.0);
        assert!((breakdown.cost_per_unit - 6500.0 / 150.0).abs() < 1e-9);
    }

    #[test]
    fn empty_period_yields_all_zero_breakdown() {
        let snapshot = march_snapshot();
        let breakdown = CostingService::cost_per_unit(&snapshot, Period::month_of(2025, 1));
        assert_eq!(breakdown, CostBreakdown::default());
    }

    #[test]
    fn amortization_counts_each_touched_month_once() {
        let mut snapshot = march_snapshot();
        snapshot
            .production
            .push(ProductionBatch::new(date(2024, 4, 2), "IPA", 30.0, 3.0, 90.0));
        let breakdown = CostingService::cost_per_unit(&snapshot, Period::year_of(2024));
        assert_eq!(breakdown.months_counted, 2);
        assert_eq!(breakdown.fixed_cost_amortization, 7000.0);
    }

    #[test]
    fn zero_volume_batch_adds_cost_without_allocation_base() {
        let mut snapshot = Snapshot::default();
        snapshot.settings.labor_rate = 100.0;
        snapshot.production = vec![ProductionBatch::new(date(2024, 5, 1), "Pilot", 0.0, 2.0, 80.0)];
        let breakdown = CostingService::cost_per_unit(&snapshot, Period::all());
        assert_eq!(breakdown.total_cost, 280.0);
        assert_eq!(breakdown.units_produced, 0.0);
        assert_eq!(breakdown.cost_per_unit, 0.0);
    }

    #[test]
    fn per_product_rows_are_sorted_and_priced() {
        let mut snapshot = march_snapshot();
        snapshot.settings.profit_margin_multiplier = 3.0;
        snapshot
            .production
            .push(ProductionBatch::new(date(2024, 3, 8), "Amber", 40.0, 4.0, 160.0));
        let rows = CostingService::cost_per_unit_by_product(&snapshot, Period::month_of(2024, 3));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_name, "Amber");
        assert_eq!(rows[1].product_name, "IPA");
        assert_eq!(rows[1].batches, 2);
        for row in &rows {
            assert!((row.recommended_price - row.cost_per_unit * 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn per_product_amortization_uses_each_products_own_months() {
        // Two products in the same month: each row carries the full monthly
        // fixed cost, so the per-product amortizations exceed the aggregate.
        let mut snapshot = Snapshot::default();
        snapshot.settings.labor_rate = 0.0;
        snapshot.settings.monthly_rent = 1000.0;
        snapshot.production = vec![
            ProductionBatch::new(date(2024, 6, 1), "IPA", 100.0, 0.0, 0.0),
            ProductionBatch::new(date(2024, 6, 15), "Stout", 100.0, 0.0, 0.0),
        ];
        let aggregate = CostingService::cost_per_unit(&snapshot, Period::all());
        assert_eq!(aggregate.fixed_cost_amortization, 1000.0);

        let rows = CostingService::cost_per_unit_by_product(&snapshot, Period::all());
        let per_product_total: f64 = rows.iter().map(|row| row.total_cost).sum();
        assert_eq!(per_product_total, 2000.0);
    }

    #[test]
    fn grouping_is_case_sensitive_exact_match() {
        let mut snapshot = Snapshot::default();
        snapshot.production = vec![
            ProductionBatch::new(date(2024, 6, 1), "ipa", 10.0, 0.0, 0.0),
            ProductionBatch::new(date(2024, 6, 2), "IPA", 10.0, 0.0, 0.0),
        ];
        let rows = CostingService::cost_per_unit_by_product(&snapshot, Period::all());
        assert_eq!(rows.len(), 2);
    }
}
