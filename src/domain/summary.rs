use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Cents, Entry, EntryType};

/// Totals for a set of entries. Every field is zero for an empty set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub income: Cents,
    pub expense: Cents,
    pub savings: Cents,
    /// income - expense - savings
    pub net: Cents,
}

impl Summary {
    /// Savings as a percentage of income, `None` when there is no income.
    pub fn savings_rate(&self) -> Option<f64> {
        if self.income == 0 {
            None
        } else {
            Some(self.savings as f64 * 100.0 / self.income as f64)
        }
    }

    /// Total for one entry type.
    pub fn total(&self, entry_type: EntryType) -> Cents {
        match entry_type {
            EntryType::Income => self.income,
            EntryType::Expense => self.expense,
            EntryType::Savings => self.savings,
        }
    }
}

/// Sum income, expense and savings over the given entries.
pub fn aggregate<'a, I>(entries: I) -> Summary
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut summary = Summary::default();
    for entry in entries {
        let slot = match entry.entry_type {
            EntryType::Income => &mut summary.income,
            EntryType::Expense => &mut summary.expense,
            EntryType::Savings => &mut summary.savings,
        };
        *slot = slot.saturating_add(entry.amount_cents);
    }
    summary.net = summary
        .income
        .saturating_sub(summary.expense)
        .saturating_sub(summary.savings);
    summary
}

/// Totals for a single category within one entry type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub category: String,
    pub total: Cents,
    pub count: i64,
    /// Share of this category within its entry type, in percent
    pub percentage: f64,
}

/// Group entries by (type, category), largest totals first.
pub fn category_breakdown<'a, I>(entries: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut groups: BTreeMap<(EntryType, &'a str), (Cents, i64)> = BTreeMap::new();
    for entry in entries {
        let slot = groups
            .entry((entry.entry_type, entry.category.as_str()))
            .or_insert((0, 0));
        slot.0 = slot.0.saturating_add(entry.amount_cents);
        slot.1 += 1;
    }

    let mut type_totals: BTreeMap<EntryType, Cents> = BTreeMap::new();
    for ((entry_type, _), (total, _)) in &groups {
        let sum = type_totals.entry(*entry_type).or_insert(0);
        *sum = sum.saturating_add(*total);
    }

    let mut breakdown: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|((entry_type, category), (total, count))| {
            let type_total = type_totals.get(&entry_type).copied().unwrap_or(0);
            let percentage = if type_total > 0 {
                total as f64 * 100.0 / type_total as f64
            } else {
                0.0
            };
            CategoryTotal {
                entry_type,
                category: category.to_string(),
                total,
                count,
                percentage,
            }
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.entry_type.cmp(&b.entry_type))
    });
    breakdown
}
