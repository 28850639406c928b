// ═══════════════════════════════════════════════════════════════════
// Integration Tests — FinanceTracker facade end to end
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::Mutex;

use finance_snapshot_core::errors::CoreError;
use finance_snapshot_core::insights::rule_based::RuleBasedInsightGenerator;
use finance_snapshot_core::insights::traits::InsightGenerator;
use finance_snapshot_core::models::asset::AssetType;
use finance_snapshot_core::models::month::YearMonth;
use finance_snapshot_core::models::settings::InsightThresholds;
use finance_snapshot_core::models::snapshot::FinancialSnapshot;
use finance_snapshot_core::models::transaction::{DateSource, Transaction, TransactionType};
use finance_snapshot_core::FinanceTracker;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
}

/// The sample data a fresh account is seeded with, spread over three months.
fn seeded_tracker() -> FinanceTracker {
    let mut t = FinanceTracker::create_new();

    t.add_transaction(TransactionType::Income, "Salary", 5000.0, d(2025, 1, 25)).unwrap();
    t.add_transaction(TransactionType::Expense, "Groceries", 250.0, d(2025, 1, 8)).unwrap();
    t.add_transaction(TransactionType::Expense, "Rent", 1500.0, d(2025, 1, 1)).unwrap();

    t.add_transaction(TransactionType::Income, "Salary", 5000.0, d(2025, 2, 25)).unwrap();
    t.add_transaction(TransactionType::Expense, "Groceries", 300.0, d(2025, 2, 8)).unwrap();
    t.add_transaction(TransactionType::Expense, "Rent", 1500.0, d(2025, 2, 1)).unwrap();

    t.add_transaction_with_notes(TransactionType::Income, "Salary", 5000.0, d(2025, 3, 1), "Monthly pay").unwrap();
    t.add_transaction_with_notes(TransactionType::Expense, "Groceries", 350.75, d(2025, 3, 2), "Weekly shopping").unwrap();
    t.add_transaction_with_notes(TransactionType::Expense, "Rent", 1500.0, d(2025, 3, 3), "Apartment rent").unwrap();
    t.add_transaction_with_notes(TransactionType::Expense, "Utilities", 120.50, d(2025, 3, 4), "Electricity and water").unwrap();
    t.add_transaction_with_notes(TransactionType::Investment, "Stock", 1000.0, d(2025, 3, 5), "Invested in AAPL").unwrap();
    t.add_transaction_with_notes(TransactionType::Investment, "Crypto", 500.0, d(2025, 3, 6), "Bought Bitcoin").unwrap();
    t.add_transaction_with_notes(TransactionType::Expense, "Dining Out", 75.20, d(2025, 3, 7), "Dinner with friends").unwrap();

    t.add_asset(AssetType::Cash, "Checking Account", 10000.0, 10000.0).unwrap();
    t.add_asset(AssetType::Stock, "AAPL", 5000.0, 7500.0).unwrap();
    t.add_asset(AssetType::Stock, "GOOGL", 8000.0, 9200.0).unwrap();
    t.add_asset(AssetType::Crypto, "Bitcoin", 2000.0, 4500.0).unwrap();
    t.add_asset(AssetType::Crypto, "Ethereum", 3000.0, 3800.0).unwrap();
    t.add_asset(AssetType::Forex, "EUR/USD", 1000.0, 1150.0).unwrap();

    t
}

/// Records the snapshot it was asked about.
struct RecordingGenerator {
    seen: Mutex<Option<FinancialSnapshot>>,
}

#[async_trait]
impl InsightGenerator for RecordingGenerator {
    fn name(&self) -> &str {
        "Recording"
    }

    async fn generate(&self, snapshot: &FinancialSnapshot) -> Result<Vec<String>, CoreError> {
        *self.seen.lock().unwrap() = Some(snapshot.clone());
        Ok(vec!["ok".into()])
    }
}

struct UnavailableGenerator;

#[async_trait]
impl InsightGenerator for UnavailableGenerator {
    fn name(&self) -> &str {
        "Unavailable"
    }

    async fn generate(&self, _snapshot: &FinancialSnapshot) -> Result<Vec<String>, CoreError> {
        Err(CoreError::Insights {
            generator: "Unavailable".into(),
            message: "503 Service Unavailable".into(),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════
// Dashboard figures
// ═══════════════════════════════════════════════════════════════════

mod dashboard {
    use super::*;

    #[test]
    fn net_worth_and_month_summary() {
        let t = seeded_tracker();
        assert_eq!(t.net_worth(), 36150.0);

        let s = t.current_month_summary_at(now());
        assert_eq!(s.income, 5000.0);
        assert!((s.expenses - 2046.45).abs() < 1e-9);
        assert!((s.profit_loss - 2953.55).abs() < 1e-9);
    }

    #[test]
    fn monthly_performance_series() {
        let t = seeded_tracker();
        let series = t.monthly_performance();
        let labels: Vec<&str> = series.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 25", "Feb 25", "Mar 25"]);
        assert_eq!(series[0].net, 3250.0);
        assert_eq!(series[1].net, 3200.0);
    }

    #[test]
    fn recent_transactions_use_configured_limit() {
        let mut t = seeded_tracker();
        let recent = t.recent_transactions();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].category, "Dining Out");

        t.set_recent_transactions_limit(2).unwrap();
        assert_eq!(t.recent_transactions().len(), 2);
        assert!(t.set_recent_transactions_limit(0).is_err());
    }

    #[test]
    fn transactions_newest_first_and_by_type() {
        let t = seeded_tracker();
        let all = t.get_transactions();
        assert_eq!(all.len(), t.transaction_count());
        assert!(all
            .windows(2)
            .all(|w| w[0].timestamp() >= w[1].timestamp()));

        let investments = t.get_transactions_by_type(TransactionType::Investment);
        assert_eq!(investments.len(), 2);
        assert_eq!(investments[0].category, "Crypto");
    }

    #[test]
    fn allocation_and_asset_performance() {
        let t = seeded_tracker();
        let slices = t.portfolio_allocation();
        assert_eq!(slices.len(), 4);
        assert_eq!(slices[0].name, AssetType::Cash);

        let rows = t.asset_performance();
        let aapl = rows.iter().find(|r| r.asset_name == "AAPL").unwrap();
        assert_eq!(aapl.gain_loss, 2500.0);
    }

    #[test]
    fn contiguous_series_fills_gaps() {
        let mut t = FinanceTracker::create_new();
        t.add_transaction(TransactionType::Expense, "Rent", 1.0, d(2025, 1, 1)).unwrap();
        t.add_transaction(TransactionType::Expense, "Rent", 1.0, d(2025, 4, 1)).unwrap();
        assert_eq!(t.monthly_performance().len(), 2);

        let filled = t.monthly_performance_contiguous();
        assert_eq!(filled.len(), 4);
        assert_eq!(filled[1].month, YearMonth::new(2025, 2).unwrap());
        assert_eq!(filled[1].expenses, 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Snapshot
// ═══════════════════════════════════════════════════════════════════

mod snapshot {
    use super::*;

    #[test]
    fn seeded_snapshot() {
        let t = seeded_tracker();
        let s = t.financial_snapshot_at(now());

        assert_eq!(s.current_month.income, 5000.0);
        assert_eq!(s.previous_month.expenses, 1800.0);
        assert_eq!(s.net_worth, 36150.0);

        let groceries = s
            .spending_by_category
            .iter()
            .find(|c| c.category == "Groceries")
            .unwrap();
        assert!((groceries.change - (350.75 - 300.0) / 300.0).abs() < 1e-9);

        let utilities = s
            .spending_by_category
            .iter()
            .find(|c| c.category == "Utilities")
            .unwrap();
        assert_eq!(utilities.change, 1.0);

        let rent = s
            .spending_by_category
            .iter()
            .find(|c| c.category == "Rent")
            .unwrap();
        assert_eq!(rent.change, 0.0);

        assert_eq!(s.portfolio_allocation[0].asset_type, AssetType::Stock);
        let total: f64 = s.portfolio_allocation.iter().map(|a| a.percentage).sum();
        assert!((total - 1.0).abs() < 1e-9);

        // Jan 1750 < Feb 1800 < Mar 2046.45
        assert_eq!(s.trends.expense_growth_streak, 3);
    }

    #[test]
    fn snapshot_is_deterministic() {
        let t = seeded_tracker();
        let a = serde_json::to_string(&t.financial_snapshot_at(now())).unwrap();
        let b = serde_json::to_string(&t.financial_snapshot_at(now())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_records_do_not_break_snapshot() {
        let mut t = FinanceTracker::create_new();
        t.add_transaction(TransactionType::Expense, "Rent", 1500.0, DateSource::Missing).unwrap();
        t.add_transaction(TransactionType::Income, "Salary", 10.0, DateSource::Invalid("n/a".into()))
            .unwrap();
        t.add_transaction(TransactionType::Expense, "Rent", 1.0, DateSource::EpochSeconds(i64::MIN))
            .unwrap();
        t.add_asset(AssetType::Other, "Art", 100.0, 0.0).unwrap();

        let s = t.financial_snapshot_at(now());
        assert!(s.spending_by_category.is_empty());
        assert_eq!(s.trends.expense_growth_streak, 0);
        assert_eq!(s.portfolio_allocation[0].percentage, 0.0);
        assert_eq!(s.net_worth, 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Insights
// ═══════════════════════════════════════════════════════════════════

mod insights {
    use super::*;

    #[tokio::test]
    async fn generator_receives_current_snapshot() {
        let t = seeded_tracker();
        let generator = RecordingGenerator {
            seen: Mutex::new(None),
        };
        let insights = t.generate_insights_at(&generator, now()).await.unwrap();
        assert_eq!(insights, vec!["ok".to_string()]);

        let seen = generator.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen, t.financial_snapshot_at(now()));
    }

    #[tokio::test]
    async fn rule_based_insights_on_seeded_data() {
        let t = seeded_tracker();
        let insights = t
            .generate_insights_at(&RuleBasedInsightGenerator::new(), now())
            .await
            .unwrap();
        assert_eq!(insights.len(), 3);
        assert!(insights[0].contains("3 consecutive months"));
        // equal changes keep category name order
        assert!(insights[1].contains("Dining Out"));
        assert!(insights[2].contains("Utilities"));
    }

    #[tokio::test]
    async fn failing_generator_reports_unavailable() {
        let t = seeded_tracker();
        let err = t
            .generate_insights_at(&UnavailableGenerator, now())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InsightsUnavailable));
        assert_eq!(
            err.to_string(),
            "Failed to generate insights. Please try again later."
        );
    }

    #[tokio::test]
    async fn max_insights_setting_caps_output() {
        let mut t = seeded_tracker();
        t.set_insight_thresholds(InsightThresholds {
            max_insights: 1,
            ..InsightThresholds::default()
        })
        .unwrap();
        let insights = t
            .generate_insights_at(&RuleBasedInsightGenerator::new(), now())
            .await
            .unwrap();
        assert_eq!(insights.len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Ledger editing, settings, export/import
// ═══════════════════════════════════════════════════════════════════

mod ledger {
    use super::*;

    #[test]
    fn new_tracker_is_clean() {
        let t = FinanceTracker::create_new();
        assert!(!t.has_unsaved_changes());
        assert_eq!(t.net_worth(), 0.0);
    }

    #[test]
    fn edits_mark_dirty_until_saved() {
        let mut t = FinanceTracker::create_new();
        t.add_transaction(TransactionType::Expense, "Rent", 1.0, d(2025, 3, 1)).unwrap();
        assert!(t.has_unsaved_changes());
        t.mark_saved();
        assert!(!t.has_unsaved_changes());
    }

    #[test]
    fn failed_edit_leaves_clean_state() {
        let mut t = FinanceTracker::create_new();
        assert!(t
            .add_transaction(TransactionType::Expense, "Rent", -1.0, d(2025, 3, 1))
            .is_err());
        assert!(!t.has_unsaved_changes());
        assert_eq!(t.transaction_count(), 0);
    }

    #[test]
    fn transaction_edits() {
        let mut t = FinanceTracker::create_new();
        let id = t
            .add_transaction(TransactionType::Expense, "Rent", 1500.0, d(2025, 3, 1))
            .unwrap();
        t.set_transaction_notes(id, Some("March".into())).unwrap();
        assert_eq!(t.get_transaction(id).unwrap().notes.as_deref(), Some("March"));

        let removed = t.remove_transaction(id).unwrap();
        assert_eq!(removed.category, "Rent");
        assert!(t.get_transaction(id).is_none());
        assert!(t.remove_transaction(id).is_err());
    }

    #[test]
    fn asset_edits_flow_into_net_worth() {
        let mut t = FinanceTracker::create_new();
        let id = t.add_asset(AssetType::Crypto, "Bitcoin", 2000.0, 4500.0).unwrap();
        assert_eq!(t.net_worth(), 4500.0);

        t.update_asset_value(id, 3000.0).unwrap();
        assert_eq!(t.net_worth(), 3000.0);
        assert_eq!(t.get_asset(id).unwrap().gain_loss(), 1000.0);

        t.remove_asset(id).unwrap();
        assert!(t.get_assets().is_empty());
    }

    #[test]
    fn bulk_add_is_all_or_nothing() {
        let mut t = FinanceTracker::create_new();
        let batch = vec![
            Transaction::expense("Rent", 1.0, d(2025, 3, 1)),
            Transaction::expense("", 1.0, d(2025, 3, 1)),
        ];
        assert!(t.add_transactions(batch).is_err());
        assert_eq!(t.transaction_count(), 0);

        let batch = vec![
            Transaction::expense("Rent", 1.0, d(2025, 3, 1)),
            Transaction::income("Salary", 2.0, d(2025, 3, 1)),
        ];
        let ids = t.add_transactions(batch).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(t.transaction_count(), 2);
    }

    #[test]
    fn import_transactions_from_json() {
        let mut t = FinanceTracker::create_new();
        let json = r#"[
            {"id": "11111111-1111-4111-8111-111111111111", "type": "income", "category": "Salary", "amount": 5000, "date": "2025-03-01T00:00:00Z"},
            {"id": "22222222-2222-4222-8222-222222222222", "type": "expense", "category": "Rent", "amount": 1500, "date": 1740787200},
            {"id": "33333333-3333-4333-8333-333333333333", "type": "expense", "category": "Misc", "amount": 20, "date": null}
        ]"#;
        assert_eq!(t.import_transactions_from_json(json).unwrap(), 3);

        let s = t.current_month_summary_at(now());
        assert_eq!(s.income, 5000.0);
        assert_eq!(s.expenses, 1500.0);
    }

    #[test]
    fn import_rejects_malformed_json() {
        let mut t = FinanceTracker::create_new();
        let err = t.import_transactions_from_json("not json").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn ledger_json_round_trip_preserves_snapshot() {
        let mut t = seeded_tracker();
        t.set_default_currency("eur".into()).unwrap();
        let json = t.to_json().unwrap();

        let restored = FinanceTracker::import_from_json(&json).unwrap();
        assert!(!restored.has_unsaved_changes());
        assert_eq!(restored.ledger(), t.ledger());
        assert_eq!(restored.get_settings().default_currency, "EUR");
        assert_eq!(
            restored.financial_snapshot_at(now()),
            t.financial_snapshot_at(now())
        );
    }

    #[test]
    fn import_rejects_ledger_with_invalid_records() {
        let tx = |id: &str, kind: &str, category: &str, amount: f64| {
            format!(
                r#"{{"id": "{id}", "type": "{kind}", "category": "{category}", "amount": {amount}, "date": "2025-03-02T00:00:00Z"}}"#
            )
        };
        let asset = |id: &str, kind: &str, value: f64| {
            format!(
                r#"{{"id": "{id}", "assetType": "{kind}", "assetName": "Holding", "investedAmount": 0, "currentValue": {value}}}"#
            )
        };
        let ledger = |txs: Vec<String>, assets: Vec<String>| {
            format!(
                r#"{{"transactions": [{}], "assets": [{}]}}"#,
                txs.join(","),
                assets.join(",")
            )
        };
        let a = "11111111-1111-4111-8111-111111111111";
        let b = "22222222-2222-4222-8222-222222222222";

        let bad = [
            ledger(vec![tx(a, "expense", "Rent", -50.0)], vec![]),
            ledger(vec![tx(a, "expense", "   ", 20.0)], vec![]),
            ledger(
                vec![tx(a, "expense", "Rent", 20.0), tx(a, "income", "Salary", 50.0)],
                vec![],
            ),
            ledger(vec![], vec![asset(a, "Cash", -100.0), asset(b, "Stock", 300.0)]),
            ledger(vec![], vec![asset(a, "Cash", 100.0), asset(a, "Stock", 300.0)]),
        ];
        for json in bad {
            let err = FinanceTracker::import_from_json(&json).unwrap_err();
            assert!(matches!(err, CoreError::ValidationError(_)), "{json}");
        }

        let good = ledger(
            vec![tx(a, "expense", "Rent", 20.0), tx(b, "income", "Salary", 50.0)],
            vec![asset(a, "Cash", 100.0), asset(b, "Stock", 300.0)],
        );
        let t = FinanceTracker::import_from_json(&good).unwrap();
        assert_eq!(t.transaction_count(), 2);
        let shares = t.financial_snapshot_at(now()).portfolio_allocation;
        assert!(shares.iter().all(|s| (0.0..=1.0).contains(&s.percentage)));
    }

    #[test]
    fn from_ledger_rejects_negative_asset_value() {
        let mut ledger = seeded_tracker().ledger().clone();
        ledger.assets[0].current_value = -1.0;
        let err = FinanceTracker::from_ledger(ledger).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));

        let ok = FinanceTracker::from_ledger(seeded_tracker().ledger().clone()).unwrap();
        assert!(!ok.has_unsaved_changes());
    }

    #[test]
    fn currency_validation() {
        let mut t = FinanceTracker::create_new();
        assert!(t.set_default_currency("usd ".into()).is_ok());
        assert_eq!(t.get_settings().default_currency, "USD");
        assert!(t.set_default_currency("US".into()).is_err());
        assert!(t.set_default_currency("U$D".into()).is_err());
    }

    #[test]
    fn threshold_validation() {
        let mut t = FinanceTracker::create_new();
        assert!(t
            .set_insight_thresholds(InsightThresholds {
                category_increase: f64::NAN,
                ..InsightThresholds::default()
            })
            .is_err());
        assert!(t
            .set_insight_thresholds(InsightThresholds {
                max_insights: 0,
                ..InsightThresholds::default()
            })
            .is_err());
        assert_eq!(t.get_settings().insight_thresholds, InsightThresholds::default());
    }
}
