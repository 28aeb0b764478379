use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use finback_core::{DomainError, DomainResult, TenantId};
use finback_forecast::SeriesType;

/// High-level account kind (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountKind {
    /// Assets and expenses grow on the debit side.
    pub fn is_debit_normal(self) -> bool {
        matches!(self, AccountKind::Asset | AccountKind::Expense)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub code: String, // e.g. "4000"
    pub name: String, // e.g. "Subscription revenue"
    pub kind: AccountKind,
}

/// One posted ledger line (immutable once recorded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: Uuid,
    pub tenant_id: TenantId,
    pub account: Account,
    /// Positive amount in smallest unit (e.g., cents).
    pub amount: i64,
    /// true = debit, false = credit.
    pub is_debit: bool,
    pub occurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LedgerEntry {
    pub fn validate(&self) -> DomainResult<()> {
        if self.amount <= 0 {
            return Err(DomainError::validation("amount must be positive"));
        }
        if self.account.code.trim().is_empty() {
            return Err(DomainError::validation("account code must not be empty"));
        }
        Ok(())
    }

    /// Signed contribution of this entry to a series, or `None` if the entry
    /// does not belong to it.
    ///
    /// - revenue: revenue accounts, credits positive
    /// - expense: expense accounts, debits positive
    /// - account: the referenced account, normal balance side positive
    pub fn signed_amount_for(&self, series_type: SeriesType, account_ref: Option<&str>) -> Option<i64> {
        let debit_positive = match series_type {
            SeriesType::Revenue if self.account.kind == AccountKind::Revenue => false,
            SeriesType::Expense if self.account.kind == AccountKind::Expense => true,
            SeriesType::Account if account_ref == Some(self.account.code.as_str()) => {
                self.account.kind.is_debit_normal()
            }
            _ => return None,
        };

        if self.is_debit == debit_positive {
            Some(self.amount)
        } else {
            Some(-self.amount)
        }
    }
}
