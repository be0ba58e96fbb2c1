use brewbooks::domain::{
    CashTransaction, Period, ProductionBatch, SaleRecord, TransactionKind,
};
use brewbooks::ledger::Snapshot;
use brewbooks::services::{CostingService, FinanceService};
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn taproom_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::default();
    snapshot.settings.labor_rate = 150.0;
    snapshot.settings.monthly_rent = 1000.0;
    snapshot.settings.monthly_salaries = 2000.0;
    snapshot.settings.monthly_utilities = 500.0;
    snapshot.settings.profit_margin_multiplier = 3.0;

    snapshot.production = vec![
        ProductionBatch::new(date(2024, 3, 5), "IPA", 100.0, 10.0, 500.0),
        ProductionBatch::new(date(2024, 3, 20), "IPA", 50.0, 5.0, 250.0),
        ProductionBatch::new(date(2024, 4, 2), "Stout", 60.0, 6.0, 300.0),
    ];
    snapshot.transactions = vec![
        CashTransaction::new(
            date(2024, 3, 1),
            "Distributor order",
            1000.0,
            TransactionKind::Income,
            "sales",
        ),
        CashTransaction::new(
            date(2024, 3, 3),
            "March rent",
            300.0,
            TransactionKind::Expense,
            "rent",
        ),
        CashTransaction::new(
            date(2024, 3, 28),
            "Electricity",
            100.0,
            TransactionKind::Expense,
            "utilities",
        ),
    ];
    snapshot.sales = vec![SaleRecord::new(date(2024, 3, 16), 450.0, 90.0)];
    snapshot
}

#[test]
fn march_profit_and_loss_reads_end_to_end() {
    let snapshot = taproom_snapshot();
    let march = Period::month_of(2024, 3);

    let revenue = FinanceService::total_revenue(&snapshot, march);
    assert_eq!(revenue, 1450.0);

    let expenses = FinanceService::total_expenses(&snapshot, march);
    assert_eq!(expenses.total, 400.0);
    let sum: f64 = expenses.breakdown.values().sum();
    assert!((sum - expenses.total).abs() < 1e-9);

    assert_eq!(FinanceService::profit(&snapshot, march), 1050.0);
    let margin = FinanceService::profit_margin(&snapshot, march);
    assert!((margin - 1050.0 / 1450.0 * 100.0).abs() < 1e-9);

    let costs = CostingService::cost_per_unit(&snapshot, march);
    assert_eq!(costs.variable_cost, 750.0);
    assert_eq!(costs.labor_cost, 2250.0);
    assert_eq!(costs.fixed_cost_amortization, 3500.0);
    assert_eq!(costs.total_cost, 6500.0);
    assert_eq!(costs.units_produced, 150.0);
    assert!((costs.cost_per_unit - 43.333333).abs() < 1e-4);
}

#[test]
fn yearly_costing_amortizes_each_month_once_in_aggregate() {
    let snapshot = taproom_snapshot();
    let year = Period::year_of(2024);

    let aggregate = CostingService::cost_per_unit(&snapshot, year);
    assert_eq!(aggregate.months_counted, 2);
    assert_eq!(aggregate.fixed_cost_amortization, 7000.0);

    // Per-product rows amortize the months each product touches, so the two
    // single-month products carry 3500 each; this matches the aggregate here
    // only because they touch different months.
    let rows = CostingService::cost_per_unit_by_product(&snapshot, year);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].product_name, "IPA");
    assert_eq!(rows[1].product_name, "Stout");
    for row in &rows {
        assert!((row.recommended_price - row.cost_per_unit * 3.0).abs() < 1e-9);
    }
}

#[test]
fn unbounded_period_returns_collections_unchanged() {
    let snapshot = taproom_snapshot();
    let all = Period::all();
    let production = all.filter(&snapshot.production);
    assert_eq!(production.len(), snapshot.production.len());
    for (selected, original) in production.iter().zip(snapshot.production.iter()) {
        assert_eq!(*selected, original);
    }
}

#[test]
fn monthly_series_is_chart_ready() {
    let snapshot = taproom_snapshot();
    let series = FinanceService::monthly_series(&snapshot, 2024);
    assert_eq!(series.len(), 12);
    for (index, entry) in series.iter().enumerate() {
        assert_eq!(entry.month as usize, index + 1);
        assert!((entry.profit - (entry.revenue - entry.expenses)).abs() < 1e-9);
    }
    // March carries all the cash activity; February is zero-filled.
    assert_eq!(series[2].revenue, 1450.0);
    assert_eq!(series[2].expenses, 400.0);
    assert_eq!(series[1].revenue, 0.0);
    assert_eq!(series[1].cost_per_unit, 0.0);
    // The empty year is still a full series.
    let empty = FinanceService::monthly_series(&snapshot, 2019);
    assert_eq!(empty.len(), 12);
    assert!(empty.iter().all(|entry| entry.revenue == 0.0));
}

#[test]
fn all_years_cover_every_collection() {
    let mut snapshot = taproom_snapshot();
    snapshot
        .sales
        .push(SaleRecord::new(date(2022, 12, 31), 120.0, 30.0));
    assert_eq!(snapshot.all_years(), vec![2024, 2022]);
}
