//! Display utilities for formatting reports in the terminal.
//!
//! # Functions
//!
//! - [`truncate`] - Truncate strings to a maximum length with ellipsis
//! - [`make_bar`] - Create visual bar charts for relative values
//! - [`format_money`] / [`format_date`] - Format amounts and timestamps
//! - [`print_section`] / [`print_section_simple`] - Print section headers
//! - [`display_dashboard`] / [`display_orders`] / etc. - Display formatted reports

use chrono::TimeZone;

use crate::analytics::{
    ActivitySummary, DashboardStats, ExpenseSummary, Kpis, ProfitBreakdown, TimelinePoint,
};
use crate::models::{Activity, ChatMessage, Expense, Order, OrderStatus};
use crate::types::{Money, TimestampMs};

/// Truncate a string to a maximum length, adding "..." if truncated.
///
/// Counts characters rather than bytes. For `max_len < 3`, truncates without
/// ellipsis since there's no room for "...".
///
/// # Examples
///
/// ```
/// use estampa_gestor::display::truncate;
///
/// assert_eq!(truncate("hello", 10), "hello");
/// assert_eq!(truncate("hello world", 8), "hello...");
/// assert_eq!(truncate("hello", 2), "he");
/// ```
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len < 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}

/// Create a visual bar for displaying relative values.
///
/// # Arguments
///
/// * `value` - The value to represent (negative values treated as 0)
/// * `max_value` - The maximum value (determines 100% width)
/// * `width` - The total width of the bar in characters
#[must_use]
pub fn make_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }
    let ratio = (value / max_value).clamp(0.0, 1.0);
    let filled = (ratio * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Format an amount with a currency prefix.
#[must_use]
pub fn format_money(amount: Money, currency: &str) -> String {
    format!("{currency} {amount}")
}

/// Format a timestamp as a local `dd/mm/yyyy` date.
#[must_use]
pub fn format_date<Tz: TimeZone>(ts: TimestampMs, tz: &Tz) -> String {
    ts.local_date(tz)
        .map_or_else(|| "??/??/????".to_string(), |d| d.format("%d/%m/%Y").to_string())
}

/// Print a section header with equals signs.
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(50));
    println!("  {title}");
    println!("{}", "=".repeat(50));
}

/// Print a simple section header with dashes.
pub fn print_section_simple(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(30));
}

/// Display dashboard statistics.
pub fn display_dashboard(stats: &DashboardStats, currency: &str) {
    println!("  Total value:      {:>14}", format_money(stats.total_value, currency));
    println!("  Received:         {:>14}", format_money(stats.received_value, currency));
    println!("  Pending:          {:>14}", format_money(stats.pending_value, currency));
    println!("  Orders:           {:>14}", stats.total_orders);
    println!("  Active orders:    {:>14}", stats.active_orders);
    println!("  Ready for pickup: {:>14}", stats.ready_for_pickup);
    println!("  Missing NF:       {:>14}", stats.missing_nota_fiscal);
}

/// Display analytics KPIs.
pub fn display_kpis(kpis: &Kpis, currency: &str) {
    println!("  Average ticket:   {:>14}", format_money(kpis.average_ticket, currency));
    println!("  Receipt rate:     {:>13.1}%", kpis.receipt_rate);
}

/// Display the order count per status.
pub fn display_status_distribution(distribution: &[(OrderStatus, usize)]) {
    let max = distribution.iter().map(|(_, n)| *n).max().unwrap_or(1);
    for (status, count) in distribution {
        let bar = make_bar(*count as f64, max as f64, 20);
        println!("  {:<12} {bar} {count:>4}", status.display_name());
    }
}

/// Display the received/pending timeline.
pub fn display_timeline(points: &[TimelinePoint], currency: &str) {
    for point in points {
        println!(
            "  {:<10}  received {:>14}  pending {:>14}",
            point.bucket,
            format_money(point.received, currency),
            format_money(point.pending, currency)
        );
    }
}

/// Display an order list.
pub fn display_orders<Tz: TimeZone>(orders: &[&Order], currency: &str, tz: &Tz) {
    for order in orders {
        println!(
            "  {}  {:<24} {:<12} {:>14}  paid {:>14}",
            format_date(order.created_at, tz),
            truncate(&order.customer_name, 24),
            order.status.display_name(),
            format_money(order.total_value, currency),
            format_money(order.paid_value, currency)
        );
    }
}

/// Display an expense list followed by per-category totals.
pub fn display_expenses<Tz: TimeZone>(
    expenses: &[&Expense],
    summary: &ExpenseSummary,
    currency: &str,
    tz: &Tz,
) {
    for expense in expenses {
        println!(
            "  {}  {:<30} {:<12} {:>14}",
            format_date(expense.date, tz),
            truncate(&expense.description, 30),
            expense.category.display_name(),
            format_money(expense.value, currency)
        );
    }

    print_section_simple("BY CATEGORY");
    let max = summary.by_category.first().map_or(1.0, |(_, m)| m.get());
    for (category, amount) in &summary.by_category {
        let bar = make_bar(amount.get(), max, 20);
        println!(
            "  {:<12} {bar} {:>14}",
            category.display_name(),
            format_money(*amount, currency)
        );
    }
    println!("  {:<33} {:>14}", "Total", format_money(summary.total, currency));
}

/// Display an activity list and its completion summary.
pub fn display_activities<Tz: TimeZone>(activities: &[&Activity], summary: &ActivitySummary, tz: &Tz) {
    for activity in activities {
        let mark = if activity.completed { "x" } else { " " };
        println!(
            "  [{mark}] {}  {:<40}",
            format_date(activity.date, tz),
            truncate(&activity.title, 40)
        );
    }
    println!(
        "\n  {} total, {} done, {} pending ({} overdue)",
        summary.total, summary.completed, summary.pending, summary.overdue
    );
}

/// Display chat messages, media shown by kind only.
pub fn display_messages<Tz: TimeZone>(messages: &[&ChatMessage], tz: &Tz) {
    for message in messages {
        let body = match message.kind {
            crate::models::MessageType::Text => truncate(&message.content, 60),
            other => format!("<{other:?}>").to_lowercase(),
        };
        let edited = if message.edited { " (edited)" } else { "" };
        println!(
            "  {}  {:<12} {body}{edited}",
            format_date(message.timestamp, tz),
            truncate(&message.sender, 12)
        );
    }
}

/// Display a profit breakdown.
pub fn display_profit(breakdown: &ProfitBreakdown, currency: &str) {
    println!("  Revenue:          {:>14}", format_money(breakdown.revenue, currency));
    println!("  Costs:            {:>14}", format_money(breakdown.total_cost, currency));
    println!("  Profit:           {:>14}", format_money(breakdown.profit, currency));
    println!("  Margin:           {:>13.1}%", breakdown.margin);
}
