//! Category statistics over a computed ledger.

use std::collections::BTreeMap;

use serde::Serialize;

use cashflow_domain::{LedgerEntry, Money};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryComparison {
    pub category: String,
    pub real: Money,
    pub budget: Money,
}

impl CategoryComparison {
    /// Positive when the real outflow exceeds the budget.
    pub fn overspend(&self) -> Money {
        self.real - self.budget
    }
}

/// Magnitude of outflows per category, largest first.
pub fn category_outflows(ledger: &[LedgerEntry]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
    for entry in ledger {
        let amount = entry.effective_amount();
        if !amount.is_negative() {
            continue;
        }
        *totals.entry(entry.category.as_str()).or_default() += amount.abs();
    }
    let mut rows: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    rows
}

/// Pairs real and budget outflows by category, real order first.
pub fn compare_categories(real: &[CategoryTotal], budget: &[CategoryTotal]) -> Vec<CategoryComparison> {
    let lookup = |rows: &[CategoryTotal], category: &str| {
        rows.iter()
            .find(|row| row.category == category)
            .map(|row| row.total)
            .unwrap_or_default()
    };
    let mut rows: Vec<CategoryComparison> = real
        .iter()
        .map(|row| CategoryComparison {
            category: row.category.clone(),
            real: row.total,
            budget: lookup(budget, &row.category),
        })
        .collect();
    for row in budget {
        if rows.iter().any(|existing| existing.category == row.category) {
            continue;
        }
        rows.push(CategoryComparison {
            category: row.category.clone(),
            real: Money::ZERO,
            budget: row.total,
        });
    }
    rows
}
