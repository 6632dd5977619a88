//! Everything a session displays for one window, computed from scratch.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use cashflow_domain::{DailyBalancePoint, DateWindow, LedgerEntry, Money, OneOff, Profile};

use crate::{
    aggregation::{build_budget_ledger, build_real_ledger},
    balance::{balance_on, daily_balance},
    calibration::calibrate_offset,
    provision::{provisions, Provision},
    reconciliation::{build_adjustments, AdjustmentPolicy},
    summary::{category_outflows, compare_categories, CategoryComparison, CategoryTotal},
    CoreError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Per-call session state threaded explicitly into every computation.
pub struct SessionContext {
    pub window: DateWindow,
    pub policy: AdjustmentPolicy,
    pub budget: Option<String>,
    pub today: NaiveDate,
}

impl SessionContext {
    pub fn new(window: DateWindow, today: NaiveDate) -> Self {
        Self {
            window,
            policy: AdjustmentPolicy::default(),
            budget: None,
            today,
        }
    }

    pub fn with_policy(mut self, policy: AdjustmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_budget(mut self, budget: Option<String>) -> Self {
        self.budget = budget;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetView {
    pub name: String,
    pub ledger: Vec<LedgerEntry>,
    pub balance: Vec<DailyBalancePoint>,
}

#[derive(Debug, Clone, Serialize)]
/// Ledgers, balances and derived figures for the session window.
pub struct CashflowView {
    pub window: DateWindow,
    pub adjustments: Vec<OneOff>,
    pub offset: Money,
    pub ledger: Vec<LedgerEntry>,
    pub balance: Vec<DailyBalancePoint>,
    pub budget: Option<BudgetView>,
    pub provisions: Vec<Provision>,
    pub period_net: Money,
    /// Balance on the session's current day when it falls inside the window.
    pub today_balance: Option<Money>,
}

impl CashflowView {
    pub fn compute(profile: &Profile, ctx: &SessionContext) -> Result<Self, CoreError> {
        let window = ctx.window;
        let adjustments = build_adjustments(
            &profile.checkpoints.for_window(&window),
            &profile.series,
            &profile.one_offs,
            &profile.overrides,
            &ctx.policy,
        )?;

        let mut one_offs = profile.one_offs.clone();
        one_offs.extend(adjustments.iter().cloned());

        let offset = match profile.checkpoints.latest() {
            Some(anchor) => calibrate_offset(
                anchor.date,
                anchor.net_position,
                window.start,
                &profile.series,
                &one_offs,
                &profile.overrides,
            )?,
            None => Money::ZERO,
        };

        let ledger = build_real_ledger(&window, &profile.series, &one_offs, &profile.overrides);
        let balance = daily_balance(&window, &ledger, offset);

        let budget = match ctx.budget.as_deref() {
            Some(name) => {
                let plan = profile
                    .budget(name)
                    .ok_or_else(|| CoreError::BudgetNotFound(name.to_string()))?;
                let ledger = build_budget_ledger(&window, &profile.series, &plan.series, &plan.one_offs);
                let balance = daily_balance(&window, &ledger, offset);
                Some(BudgetView {
                    name: name.to_string(),
                    ledger,
                    balance,
                })
            }
            None => None,
        };

        let provisions = provisions(&window, &profile.series, &profile.overrides)?;
        let period_net = balance
            .last()
            .map(|point| point.balance - offset)
            .unwrap_or_default();
        let today_balance = if window.contains(ctx.today) {
            balance_on(&balance, ctx.today)
        } else {
            None
        };

        debug!(
            profile = %profile.name,
            entries = ledger.len(),
            adjustments = adjustments.len(),
            %offset,
            "computed view for {window}"
        );

        Ok(Self {
            window,
            adjustments,
            offset,
            ledger,
            balance,
            budget,
            provisions,
            period_net,
            today_balance,
        })
    }

    /// Balance at the end of the window.
    pub fn closing_balance(&self) -> Money {
        self.balance
            .last()
            .map(|point| point.balance)
            .unwrap_or(self.offset)
    }

    pub fn category_outflows(&self) -> Vec<CategoryTotal> {
        category_outflows(&self.ledger)
    }

    /// Real outflows against the active budget, if any.
    pub fn category_comparison(&self) -> Option<Vec<CategoryComparison>> {
        self.budget.as_ref().map(|budget| {
            compare_categories(&self.category_outflows(), &category_outflows(&budget.ledger))
        })
    }
}
