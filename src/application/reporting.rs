use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{
    aggregate, category_breakdown, CategoryTotal, Entry, Period, Summary,
};

/// Everything a monthly view shows, computed fresh from one select.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub period: Period,
    pub from_date: NaiveDate,
    /// Last day of the month, inclusive
    pub to_date: NaiveDate,
    pub entries: Vec<Entry>,
    pub summary: Summary,
    pub categories: Vec<CategoryTotal>,
    /// Savings as a percentage of income, absent when there is no income
    pub savings_rate: Option<f64>,
    pub savings_target_percent: f64,
    pub meets_savings_target: bool,
}

impl MonthlyReport {
    /// Build the report for `period` from entries already filtered to it.
    pub fn build(period: Period, entries: Vec<Entry>, savings_target_percent: f64) -> Self {
        let summary = aggregate(&entries);
        let categories = category_breakdown(&entries);
        let savings_rate = summary.savings_rate();
        let meets_savings_target = savings_rate.is_some_and(|r| r >= savings_target_percent);

        Self {
            period,
            from_date: period.start(),
            to_date: period.last_day(),
            entries,
            summary,
            categories,
            savings_rate,
            savings_target_percent,
            meets_savings_target,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Summaries of two consecutive months side by side.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodComparison {
    pub current_period: Period,
    pub current: Summary,
    pub previous_period: Period,
    pub previous: Summary,
    /// current.net - previous.net
    pub net_change: i64,
}

impl PeriodComparison {
    pub fn new(current_period: Period, current: Summary, previous: Summary) -> Self {
        Self {
            current_period,
            current,
            previous_period: current_period.previous(),
            previous,
            net_change: current.net.saturating_sub(previous.net),
        }
    }
}
