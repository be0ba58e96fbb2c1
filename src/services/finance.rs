//! Period aggregation over the cash ledger and sales.
//!
//! Sales records and income-kind ledger entries are two independent revenue
//! sources and are added together; nothing deduplicates them, so the same
//! money must not be recorded in both collections.

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::Period;
use crate::ledger::Snapshot;
use crate::services::costing::CostingService;

/// Expense total with its per-category breakdown in first-seen order. The
/// breakdown values always sum to the total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub total: f64,
    pub breakdown: IndexMap<String, f64>,
}

/// One month of the yearly chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: u32,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub units_produced: f64,
    pub cost_per_unit: f64,
}

pub struct FinanceService;

impl FinanceService {
    /// Income-kind ledger entries plus sales revenue for the period.
    pub fn total_revenue(snapshot: &Snapshot, period: Period) -> f64 {
        let ledger: f64 = period
            .filter(&snapshot.transactions)
            .into_iter()
            .filter(|txn| txn.kind.is_income())
            .map(|txn| txn.amount)
            .sum();
        let sales: f64 = period
            .filter(&snapshot.sales)
            .into_iter()
            .map(|sale| sale.revenue)
            .sum();
        ledger + sales
    }

    pub fn total_expenses(snapshot: &Snapshot, period: Period) -> ExpenseSummary {
        let mut summary = ExpenseSummary::default();
        for txn in period.filter(&snapshot.transactions) {
            if txn.kind.is_expense() {
                summary.total += txn.amount;
                *summary.breakdown.entry(txn.category.clone()).or_insert(0.0) += txn.amount;
            }
        }
        summary
    }

    /// Revenue minus expenses; negative for a loss.
    pub fn profit(snapshot: &Snapshot, period: Period) -> f64 {
        Self::total_revenue(snapshot, period) - Self::total_expenses(snapshot, period).total
    }

    /// Profit as a percentage of revenue; zero whenever revenue is zero.
    pub fn profit_margin(snapshot: &Snapshot, period: Period) -> f64 {
        let revenue = Self::total_revenue(snapshot, period);
        if revenue > 0.0 {
            Self::profit(snapshot, period) / revenue * 100.0
        } else {
            0.0
        }
    }

    pub fn units_produced(snapshot: &Snapshot, period: Period) -> f64 {
        period
            .filter(&snapshot.production)
            .into_iter()
            .map(|batch| batch.volume_produced)
            .sum()
    }

    pub fn units_sold(snapshot: &Snapshot, period: Period) -> f64 {
        period
            .filter(&snapshot.sales)
            .into_iter()
            .map(|sale| sale.volume_sold)
            .sum()
    }

    pub fn average_price_per_unit(snapshot: &Snapshot, period: Period) -> f64 {
        let sold = Self::units_sold(snapshot, period);
        if sold > 0.0 {
            Self::total_revenue(snapshot, period) / sold
        } else {
            0.0
        }
    }

    /// Chart series for one calendar year: always exactly twelve entries in
    /// month order, zero-filled where no data exists.
    pub fn monthly_series(snapshot: &Snapshot, year: i32) -> Vec<MonthlySummary> {
        (1..=12)
            .map(|month| {
                let period = Period::month_of(year, month);
                let revenue = Self::total_revenue(snapshot, period);
                let expenses = Self::total_expenses(snapshot, period).total;
                MonthlySummary {
                    month,
                    revenue,
                    expenses,
                    profit: revenue - expenses,
                    units_produced: Self::units_produced(snapshot, period),
                    cost_per_unit: CostingService::cost_per_unit(snapshot, period).cost_per_unit,
                }
            })
            .collect()
    }
}
