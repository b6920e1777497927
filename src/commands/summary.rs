use crate::commands::{describe, Out};
use crate::day_group::CollapsedDays;
use crate::model::Amount;
use crate::selection::{Selection, WeekView};
use crate::session::Session;
use crate::{Config, Mode, Result};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// Shows the standing of the selected week segment: the totals of its calendar month, the expense
/// of the segment itself, and its transactions grouped by day.
///
/// # Arguments
/// - `week` - The key of the segment to show. When `None`, the segment containing today (or the
///   first half of the current week if it crosses into a new month).
/// - `expand` - Whether to list the transactions under each day header.
pub async fn summary(
    config: Config,
    mode: Mode,
    week: Option<NaiveDate>,
    expand: bool,
) -> Result<Out<WeekView>> {
    let selection = match week {
        Some(key) => Selection::new(key),
        None => Selection::current(chrono::Local::now().date_naive()),
    };
    let session = Session::open(&config, mode).await?;
    let view = WeekView::derive(session.transactions(), &selection);
    debug!(
        "Week {} has {} transactions on {} days",
        view.segment,
        view.transaction_count(),
        view.days.len()
    );

    let mut collapsed = CollapsedDays::default();
    collapsed.sync(view.key, &view.days);
    if expand {
        collapsed.expand_all();
    }
    let message = render(&view, &collapsed, config.currency());
    Ok(Out::new(message, view))
}

fn money(value: Decimal, currency: &str) -> String {
    Amount::new(value).display_with(currency)
}

fn render(view: &WeekView, collapsed: &CollapsedDays, currency: &str) -> String {
    let s = &view.summary;
    let percent = s
        .spent_percentage
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

    let mut lines = vec![
        format!("Week of {}", view.label),
        format!("Monthly income:  {}", money(s.monthly_income, currency)),
        format!("Monthly expense: {}", money(s.monthly_expense, currency)),
        format!("Weekly expense:  {}", money(s.weekly_expense, currency)),
        format!("Balance:         {}", money(s.balance, currency)),
        format!("Spent:           {percent:.1}% of income ({})", s.severity),
        String::new(),
    ];

    if view.days.is_empty() {
        lines.push("No transactions in this week".to_string());
        return lines.join("\n");
    }
    for day in &view.days {
        let count = day.transactions().len();
        let folded = collapsed.is_collapsed(day.date());
        lines.push(format!(
            "[{}] {}, {} ({count} transaction{})",
            if folded { "+" } else { "-" },
            day.weekday(),
            day.label(),
            if count == 1 { "" } else { "s" }
        ));
        if !folded {
            lines.extend(
                day.transactions()
                    .iter()
                    .map(|t| format!("      {}", describe(t, currency))),
            );
        }
    }
    lines.join("\n")
}
