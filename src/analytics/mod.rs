//! Report aggregations over period-filtered records.
//!
//! Every function here takes records that have already been narrowed to the
//! selected period (see [`crate::period`]) and accepts both owned slices and
//! slices of references, so `filter_dated` output can be passed straight in.

use std::borrow::Borrow;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, TimeZone};

use crate::models::{Activity, Expense, ExpenseCategory, Order, OrderStatus, ProfitCalculation};
use crate::period::{day_start, Period};
use crate::types::Money;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_value: Money,
    pub received_value: Money,
    pub pending_value: Money,
    /// Orders neither delivered nor cancelled
    pub active_orders: usize,
    pub ready_for_pickup: usize,
    /// Orders without a nota fiscal, cancelled ones excluded
    pub missing_nota_fiscal: usize,
    pub total_orders: usize,
}

/// Financial KPIs for the analytics view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kpis {
    pub total_revenue: Money,
    pub total_received: Money,
    pub total_pending: Money,
    pub order_count: usize,
    pub average_ticket: Money,
    /// Share of revenue already paid, in percent
    pub receipt_rate: f64,
}

/// Received and pending amounts for one timeline bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePoint {
    /// `YYYY-MM` for the all-time view, `YYYY-MM-DD` otherwise
    pub bucket: String,
    pub received: Money,
    pub pending: Money,
}

/// Expense totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseSummary {
    pub total: Money,
    pub count: usize,
    /// Per-category totals, largest first
    pub by_category: Vec<(ExpenseCategory, Money)>,
}

/// Activity completion counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivitySummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Pending activities scheduled before today
    pub overdue: usize,
}

/// Cost, profit and margin of one or more profit calculations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfitBreakdown {
    pub revenue: Money,
    pub total_cost: Money,
    pub profit: Money,
    /// Profit over revenue, in percent
    pub margin: f64,
}

/// Compute dashboard stats.
#[must_use]
pub fn dashboard_stats<O: Borrow<Order>>(orders: &[O]) -> DashboardStats {
    let mut stats = DashboardStats::default();
    for order in orders.iter().map(Borrow::<Order>::borrow) {
        stats.total_value += order.total_value;
        stats.received_value += order.paid_value;
        if order.status.is_active() {
            stats.active_orders += 1;
        }
        if order.status == OrderStatus::Ready {
            stats.ready_for_pickup += 1;
        }
        if !order.nota_fiscal_issued && order.status != OrderStatus::Cancelled {
            stats.missing_nota_fiscal += 1;
        }
    }
    stats.pending_value = stats.total_value - stats.received_value;
    stats.total_orders = orders.len();
    stats
}

/// Compute revenue KPIs.
#[must_use]
pub fn kpis<O: Borrow<Order>>(orders: &[O]) -> Kpis {
    let total_revenue: Money = orders.iter().map(|o| Borrow::<Order>::borrow(o).total_value).sum();
    let total_received: Money = orders.iter().map(|o| Borrow::<Order>::borrow(o).paid_value).sum();
    Kpis {
        total_revenue,
        total_received,
        total_pending: total_revenue - total_received,
        order_count: orders.len(),
        average_ticket: total_revenue.per(orders.len()),
        receipt_rate: total_received.percent_of(total_revenue),
    }
}

/// Count orders per status, in workflow order, omitting empty statuses.
#[must_use]
pub fn status_distribution<O: Borrow<Order>>(orders: &[O]) -> Vec<(OrderStatus, usize)> {
    let mut counts: HashMap<OrderStatus, usize> = HashMap::new();
    for order in orders {
        *counts.entry(Borrow::<Order>::borrow(order).status).or_insert(0) += 1;
    }
    OrderStatus::all()
        .iter()
        .filter_map(|status| counts.get(status).map(|&n| (*status, n)))
        .collect()
}

/// Received and pending amounts over time.
///
/// The all-time view is bucketed by month, any narrower period by day, using
/// the order's local creation date. Buckets come back in date order.
#[must_use]
pub fn financial_timeline<O, Tz>(orders: &[O], period: &Period, tz: &Tz) -> Vec<TimelinePoint>
where
    O: Borrow<Order>,
    Tz: TimeZone,
{
    let bucket_format = if period.is_all() { "%Y-%m" } else { "%Y-%m-%d" };
    let mut buckets: BTreeMap<String, (Money, Money)> = BTreeMap::new();

    for order in orders.iter().map(Borrow::<Order>::borrow) {
        let Some(date) = order.created_at.local_date(tz) else {
            continue;
        };
        let entry = buckets
            .entry(date.format(bucket_format).to_string())
            .or_default();
        entry.0 += order.paid_value;
        entry.1 += order.pending_value();
    }

    buckets
        .into_iter()
        .map(|(bucket, (received, pending))| TimelinePoint {
            bucket,
            received,
            pending,
        })
        .collect()
}

/// Total and per-category expenses.
#[must_use]
pub fn expense_summary<E: Borrow<Expense>>(expenses: &[E]) -> ExpenseSummary {
    let mut by_category: HashMap<ExpenseCategory, Money> = HashMap::new();
    for expense in expenses.iter().map(Borrow::<Expense>::borrow) {
        *by_category.entry(expense.category).or_default() += expense.value;
    }

    let mut by_category: Vec<_> = by_category.into_iter().collect();
    by_category.sort_by(|a, b| b.1.get().total_cmp(&a.1.get()).then(a.0.cmp(&b.0)));

    ExpenseSummary {
        total: by_category.iter().map(|(_, m)| *m).sum(),
        count: expenses.len(),
        by_category,
    }
}

/// Completion counts for activities as of `today` in `tz`.
///
/// A pending activity is overdue once its date falls before the start of
/// `today`; anything scheduled for today itself is not overdue yet.
#[must_use]
pub fn activity_summary<A, Tz>(activities: &[A], today: NaiveDate, tz: &Tz) -> ActivitySummary
where
    A: Borrow<Activity>,
    Tz: TimeZone,
{
    let cutoff = day_start(today, tz);
    let mut summary = ActivitySummary {
        total: activities.len(),
        ..ActivitySummary::default()
    };
    for activity in activities.iter().map(Borrow::<Activity>::borrow) {
        if activity.completed {
            summary.completed += 1;
        } else {
            summary.pending += 1;
            if cutoff.is_some_and(|start| activity.date < start) {
                summary.overdue += 1;
            }
        }
    }
    summary
}

/// Order orders newest first. Equal timestamps keep their relative order.
pub fn sort_orders<O: Borrow<Order>>(orders: &mut [O]) {
    orders.sort_by_key(|o| Reverse(Borrow::<Order>::borrow(o).created_at));
}

/// Order expenses newest first. Equal dates keep their relative order.
pub fn sort_expenses<E: Borrow<Expense>>(expenses: &mut [E]) {
    expenses.sort_by_key(|e| Reverse(Borrow::<Expense>::borrow(e).date));
}

/// Order activities with pending ones first, each group by date ascending.
pub fn sort_activities<A: Borrow<Activity>>(activities: &mut [A]) {
    activities.sort_by_key(|a| {
        let activity = Borrow::<Activity>::borrow(a);
        (activity.completed, activity.date)
    });
}

/// Profit and margin across the given calculations.
#[must_use]
pub fn profit_breakdown<P: Borrow<ProfitCalculation>>(calculations: &[P]) -> ProfitBreakdown {
    let revenue: Money = calculations.iter().map(|c| Borrow::<ProfitCalculation>::borrow(c).revenue).sum();
    let total_cost: Money = calculations.iter().map(|c| Borrow::<ProfitCalculation>::borrow(c).total_cost()).sum();
    let profit = revenue - total_cost;
    ProfitBreakdown {
        revenue,
        total_cost,
        profit,
        margin: profit.percent_of(revenue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderType;
    use crate::period::{filter_records, Granularity};
    use crate::types::TimestampMs;
    use chrono::FixedOffset;

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn ts(y: i32, m: u32, d: u32) -> TimestampMs {
        TimestampMs::from_datetime(&brt().with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    fn order(id: &str, total: f64, paid: f64, status: OrderStatus, nf: bool, created: TimestampMs) -> Order {
        Order {
            id: id.to_string(),
            order_type: OrderType::Casa,
            customer_name: format!("Cliente {id}"),
            customer_phone: String::new(),
            description: String::new(),
            items_details: String::new(),
            total_value: Money::new(total),
            paid_value: Money::new(paid),
            created_at: created,
            delivery_date: created,
            status,
            nota_fiscal_issued: nf,
            notes: None,
            remaining_payment_date: None,
            created_by: None,
        }
    }

    fn sample() -> Vec<Order> {
        vec![
            order("1", 100.0, 100.0, OrderStatus::Delivered, true, ts(2024, 1, 5)),
            order("2", 200.0, 50.0, OrderStatus::Ready, false, ts(2024, 1, 5)),
            order("3", 300.0, 0.0, OrderStatus::Cancelled, false, ts(2024, 1, 20)),
            order("4", 400.0, 100.0, OrderStatus::Pending, false, ts(2024, 2, 2)),
        ]
    }

    #[test]
    fn test_dashboard_stats() {
        let stats = dashboard_stats(&sample());
        assert_eq!(stats.total_value, Money::new(1000.0));
        assert_eq!(stats.received_value, Money::new(250.0));
        assert_eq!(stats.pending_value, Money::new(750.0));
        assert_eq!(stats.active_orders, 2);
        assert_eq!(stats.ready_for_pickup, 1);
        assert_eq!(stats.missing_nota_fiscal, 2);
        assert_eq!(stats.total_orders, 4);
    }

    #[test]
    fn test_dashboard_over_filtered_references() {
        let orders = sample();
        let january = filter_records(
            &orders,
            |o| o.created_at,
            &Period::Month { year: 2024, month: 1 },
            &brt(),
        );
        let stats = dashboard_stats(&january);
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_value, Money::new(600.0));
    }

    #[test]
    fn test_kpis() {
        let kpis = kpis(&sample());
        assert_eq!(kpis.order_count, 4);
        assert_eq!(kpis.average_ticket, Money::new(250.0));
        assert!((kpis.receipt_rate - 25.0).abs() < 1e-9);

        let empty: Vec<Order> = Vec::new();
        let none = super::kpis(&empty);
        assert_eq!(none.average_ticket, Money::ZERO);
        assert!(none.receipt_rate.abs() < 1e-9);
    }

    #[test]
    fn test_status_distribution_order() {
        let dist = status_distribution(&sample());
        assert_eq!(
            dist,
            vec![
                (OrderStatus::Pending, 1),
                (OrderStatus::Ready, 1),
                (OrderStatus::Delivered, 1),
                (OrderStatus::Cancelled, 1),
            ]
        );
    }

    #[test]
    fn test_timeline_by_month_for_all_time() {
        let timeline = financial_timeline(&sample(), &Period::All, &brt());
        let buckets: Vec<_> = timeline.iter().map(|p| p.bucket.as_str()).collect();
        assert_eq!(buckets, vec!["2024-01", "2024-02"]);
        assert_eq!(timeline[0].received, Money::new(150.0));
        assert_eq!(timeline[0].pending, Money::new(450.0));
    }

    #[test]
    fn test_timeline_by_day_for_narrow_period() {
        let period = Period::parse(Granularity::Month, "2024-01").unwrap();
        let timeline = financial_timeline(&sample(), &period, &brt());
        let buckets: Vec<_> = timeline.iter().map(|p| p.bucket.as_str()).collect();
        assert_eq!(buckets, vec!["2024-01-05", "2024-01-20", "2024-02-02"]);
    }

    #[test]
    fn test_expense_summary() {
        let expense = |value: f64, category| Expense {
            id: String::new(),
            description: String::new(),
            value: Money::new(value),
            category,
            date: ts(2024, 1, 1),
            created_by: String::new(),
        };
        let expenses = vec![
            expense(100.0, ExpenseCategory::Material),
            expense(1500.0, ExpenseCategory::Rent),
            expense(50.0, ExpenseCategory::Material),
        ];
        let summary = expense_summary(&expenses);
        assert_eq!(summary.total, Money::new(1650.0));
        assert_eq!(summary.count, 3);
        assert_eq!(
            summary.by_category,
            vec![
                (ExpenseCategory::Rent, Money::new(1500.0)),
                (ExpenseCategory::Material, Money::new(150.0)),
            ]
        );
    }

    fn activity(title: &str, completed: bool, date: TimestampMs) -> Activity {
        Activity {
            id: title.to_string(),
            title: title.to_string(),
            description: None,
            date,
            priority: crate::models::ActivityPriority::Low,
            completed,
            created_by: None,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> TimestampMs {
        TimestampMs::from_datetime(&brt().with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_activity_summary() {
        let activities = vec![
            activity("done", true, ts(2024, 5, 1)),
            activity("late", false, ts(2024, 5, 1)),
            activity("later", false, ts(2024, 7, 1)),
        ];
        assert_eq!(
            activity_summary(&activities, day(2024, 6, 1), &brt()),
            ActivitySummary {
                total: 3,
                completed: 1,
                pending: 2,
                overdue: 1,
            }
        );
    }

    #[test]
    fn test_activity_earlier_today_is_not_overdue() {
        let activities = vec![
            activity("this_morning", false, at(2024, 6, 1, 9)),
            activity("at_midnight", false, at(2024, 6, 1, 0)),
            activity("last_night", false, at(2024, 5, 31, 23)),
        ];
        let summary = activity_summary(&activities, day(2024, 6, 1), &brt());
        assert_eq!(summary.pending, 3);
        assert_eq!(summary.overdue, 1);
    }

    #[test]
    fn test_overdue_cutoff_uses_local_midnight() {
        // 01:00 UTC on June 1st is still May 31st in UTC-3
        let utc_one_am =
            TimestampMs::from_datetime(&chrono::Utc.with_ymd_and_hms(2024, 6, 1, 1, 0, 0).unwrap());
        let activities = vec![activity("x", false, utc_one_am)];
        assert_eq!(activity_summary(&activities, day(2024, 6, 1), &brt()).overdue, 1);
        assert_eq!(activity_summary(&activities, day(2024, 6, 1), &chrono::Utc).overdue, 0);
    }

    #[test]
    fn test_sort_orders_newest_first() {
        let mut orders = vec![
            order("old", 10.0, 0.0, OrderStatus::Pending, false, ts(2024, 1, 1)),
            order("new", 10.0, 0.0, OrderStatus::Pending, false, ts(2024, 3, 1)),
            order("mid_a", 10.0, 0.0, OrderStatus::Pending, false, ts(2024, 2, 1)),
            order("mid_b", 10.0, 0.0, OrderStatus::Pending, false, ts(2024, 2, 1)),
        ];
        sort_orders(&mut orders);
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid_a", "mid_b", "old"]);
    }

    #[test]
    fn test_sort_keeps_newest_within_limit() {
        let orders: Vec<Order> = (1..=5)
            .map(|d| order(&d.to_string(), 1.0, 0.0, OrderStatus::Pending, false, ts(2024, 1, d)))
            .collect();
        let mut shown: Vec<&Order> = orders.iter().collect();
        sort_orders(&mut shown);
        let ids: Vec<&str> = shown.iter().take(2).map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["5", "4"]);
    }

    #[test]
    fn test_sort_expenses_newest_first() {
        let expense = |id: &str, date| Expense {
            id: id.to_string(),
            description: String::new(),
            value: Money::new(1.0),
            category: ExpenseCategory::Other,
            date,
            created_by: String::new(),
        };
        let mut expenses = vec![
            expense("jan", ts(2024, 1, 5)),
            expense("mar", ts(2024, 3, 5)),
            expense("feb", ts(2024, 2, 5)),
        ];
        sort_expenses(&mut expenses);
        let ids: Vec<&str> = expenses.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["mar", "feb", "jan"]);
    }

    #[test]
    fn test_sort_activities_pending_first_then_by_date() {
        let mut activities = vec![
            activity("done_early", true, ts(2024, 1, 1)),
            activity("pending_late", false, ts(2024, 3, 1)),
            activity("done_late", true, ts(2024, 4, 1)),
            activity("pending_early", false, ts(2024, 2, 1)),
        ];
        sort_activities(&mut activities);
        let titles: Vec<&str> = activities.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["pending_early", "pending_late", "done_early", "done_late"]);
    }

    #[test]
    fn test_profit_breakdown() {
        let calc = ProfitCalculation {
            order_id: "1".to_string(),
            revenue: Money::new(200.0),
            cost_fabric: Money::new(60.0),
            cost_sewing: Money::new(30.0),
            cost_print: Money::new(20.0),
            cost_misc: Money::new(10.0),
            last_updated: ts(2024, 1, 1),
        };
        let breakdown = profit_breakdown(&[calc]);
        assert_eq!(breakdown.total_cost, Money::new(120.0));
        assert_eq!(breakdown.profit, Money::new(80.0));
        assert!((breakdown.margin - 40.0).abs() < 1e-9);
    }
}
