//! Sums transaction amounts by type over a calendar month or a week segment.

use crate::calendar::WeekSegment;
use crate::model::{Transaction, TransactionType};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sums the amounts of the transactions that match `predicate`.
pub fn sum<'a, I, P>(transactions: I, predicate: P) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
    P: Fn(&Transaction) -> bool,
{
    transactions
        .into_iter()
        .filter(|t| predicate(*t))
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount().value()))
}

/// Matches transactions of `kind` dated within the given calendar month.
pub fn in_month(kind: TransactionType, year: i32, month: u32) -> impl Fn(&Transaction) -> bool {
    move |t| {
        t.is(kind)
            && t
                .date()
                .is_some_and(|d| d.year() == year && d.month() == month)
    }
}

/// Matches transactions of `kind` dated within `segment`, inclusive of both ends.
pub fn in_segment(kind: TransactionType, segment: WeekSegment) -> impl Fn(&Transaction) -> bool {
    move |t| t.is(kind) && t.date().is_some_and(|d| segment.contains(d))
}

/// Returns monthly expense as a percentage of monthly income, clamped to `[0, 100]`. Zero when
/// there is no income.
pub fn spent_percentage(monthly_income: Decimal, monthly_expense: Decimal) -> Decimal {
    if monthly_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let percent = monthly_expense
        .checked_div(monthly_income)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        // The ratio can only overflow when expense dwarfs income.
        .unwrap_or(Decimal::ONE_HUNDRED);
    percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// How alarming the spent percentage is.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Below 70%.
    Low,
    /// Below 90%.
    Medium,
    /// 90% or more.
    High,
}

serde_plain::derive_display_from_serialize!(Severity);

impl Severity {
    pub fn of(percent: Decimal) -> Self {
        if percent < Decimal::from(70) {
            Severity::Low
        } else if percent < Decimal::from(90) {
            Severity::Medium
        } else {
            Severity::High
        }
    }
}

/// The standing totals for a selected segment. Income and expense are scoped to the segment's
/// whole calendar month. Weekly expense is scoped to the segment itself.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Summary {
    pub monthly_income: Decimal,
    pub monthly_expense: Decimal,
    pub weekly_expense: Decimal,
    pub balance: Decimal,
    pub spent_percentage: Decimal,
    pub severity: Severity,
}

impl Summary {
    pub fn compute(transactions: &[Transaction], segment: WeekSegment) -> Self {
        let (year, month) = segment.year_month();
        let monthly_income = sum(transactions, in_month(TransactionType::Income, year, month));
        let monthly_expense = sum(transactions, in_month(TransactionType::Expense, year, month));
        let weekly_expense = sum(transactions, in_segment(TransactionType::Expense, segment));
        let spent = spent_percentage(monthly_income, monthly_expense);
        Self {
            monthly_income,
            monthly_expense,
            weekly_expense,
            balance: monthly_income.saturating_sub(monthly_expense),
            spent_percentage: spent,
            severity: Severity::of(spent),
        }
    }
}
