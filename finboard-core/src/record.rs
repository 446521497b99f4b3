//! Financial statement records and the in-memory table.
//!
//! One `FinancialRecord` per entity (user). The numeric fields are addressed
//! through the closed `Metric` enum so aggregators and chart builders can be
//! written once over any column.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Header of the identifier column.
pub const USER_ID_COLUMN: &str = "UserID";

/// A numeric column of the statement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Revenue,
    #[serde(rename = "COGS")]
    Cogs,
    GrossProfit,
    NetProfit,
    NetProfitMargin,
    GrossProfitMargin,
    OperatingExpenseRatio,
    TotalAssets,
    TotalLiabilities,
    CashAndBankBalance,
    AccountReceivables,
    Inventory,
    DepositsAdvancesPrepayments,
    AccountPayables,
    WagesPayable,
    ProvisionsAccruals,
    OtherPayables,
}

impl Metric {
    pub const COUNT: usize = 17;

    /// All metrics in spreadsheet column order.
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Revenue,
        Metric::Cogs,
        Metric::GrossProfit,
        Metric::NetProfit,
        Metric::NetProfitMargin,
        Metric::GrossProfitMargin,
        Metric::OperatingExpenseRatio,
        Metric::TotalAssets,
        Metric::TotalLiabilities,
        Metric::CashAndBankBalance,
        Metric::AccountReceivables,
        Metric::Inventory,
        Metric::DepositsAdvancesPrepayments,
        Metric::AccountPayables,
        Metric::WagesPayable,
        Metric::ProvisionsAccruals,
        Metric::OtherPayables,
    ];

    /// Exact spreadsheet header for this column.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::Revenue => "Revenue",
            Metric::Cogs => "COGS",
            Metric::GrossProfit => "GrossProfit",
            Metric::NetProfit => "NetProfit",
            Metric::NetProfitMargin => "NetProfitMargin",
            Metric::GrossProfitMargin => "GrossProfitMargin",
            Metric::OperatingExpenseRatio => "OperatingExpenseRatio",
            Metric::TotalAssets => "TotalAssets",
            Metric::TotalLiabilities => "TotalLiabilities",
            Metric::CashAndBankBalance => "CashAndBankBalance",
            Metric::AccountReceivables => "AccountReceivables",
            Metric::Inventory => "Inventory",
            Metric::DepositsAdvancesPrepayments => "DepositsAdvancesPrepayments",
            Metric::AccountPayables => "AccountPayables",
            Metric::WagesPayable => "WagesPayable",
            Metric::ProvisionsAccruals => "ProvisionsAccruals",
            Metric::OtherPayables => "OtherPayables",
        }
    }

    /// True for ratio columns that are displayed as percentages.
    pub fn is_ratio(self) -> bool {
        matches!(
            self,
            Metric::NetProfitMargin | Metric::GrossProfitMargin | Metric::OperatingExpenseRatio
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric column '{0}'")]
pub struct UnknownMetric(pub String);

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.column_name() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

/// One row of per-entity financial statement data.
///
/// Missing numeric cells are stored as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FinancialRecord {
    #[serde(rename = "UserID")]
    pub user_id: String,
    pub revenue: f64,
    #[serde(rename = "COGS")]
    pub cogs: f64,
    pub gross_profit: f64,
    pub net_profit: f64,
    pub net_profit_margin: f64,
    pub gross_profit_margin: f64,
    pub operating_expense_ratio: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub cash_and_bank_balance: f64,
    pub account_receivables: f64,
    pub inventory: f64,
    pub deposits_advances_prepayments: f64,
    pub account_payables: f64,
    pub wages_payable: f64,
    pub provisions_accruals: f64,
    pub other_payables: f64,
}

impl FinancialRecord {
    /// Build a record from values laid out in `Metric::ALL` order.
    pub fn from_values(user_id: impl Into<String>, values: [f64; Metric::COUNT]) -> Self {
        let [
            revenue,
            cogs,
            gross_profit,
            net_profit,
            net_profit_margin,
            gross_profit_margin,
            operating_expense_ratio,
            total_assets,
            total_liabilities,
            cash_and_bank_balance,
            account_receivables,
            inventory,
            deposits_advances_prepayments,
            account_payables,
            wages_payable,
            provisions_accruals,
            other_payables,
        ] = values;
        Self {
            user_id: user_id.into(),
            revenue,
            cogs,
            gross_profit,
            net_profit,
            net_profit_margin,
            gross_profit_margin,
            operating_expense_ratio,
            total_assets,
            total_liabilities,
            cash_and_bank_balance,
            account_receivables,
            inventory,
            deposits_advances_prepayments,
            account_payables,
            wages_payable,
            provisions_accruals,
            other_payables,
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Revenue => self.revenue,
            Metric::Cogs => self.cogs,
            Metric::GrossProfit => self.gross_profit,
            Metric::NetProfit => self.net_profit,
            Metric::NetProfitMargin => self.net_profit_margin,
            Metric::GrossProfitMargin => self.gross_profit_margin,
            Metric::OperatingExpenseRatio => self.operating_expense_ratio,
            Metric::TotalAssets => self.total_assets,
            Metric::TotalLiabilities => self.total_liabilities,
            Metric::CashAndBankBalance => self.cash_and_bank_balance,
            Metric::AccountReceivables => self.account_receivables,
            Metric::Inventory => self.inventory,
            Metric::DepositsAdvancesPrepayments => self.deposits_advances_prepayments,
            Metric::AccountPayables => self.account_payables,
            Metric::WagesPayable => self.wages_payable,
            Metric::ProvisionsAccruals => self.provisions_accruals,
            Metric::OtherPayables => self.other_payables,
        }
    }
}

/// Read-only table of financial records, in original row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialTable {
    records: Vec<FinancialRecord>,
}

impl FinancialTable {
    pub fn new(records: Vec<FinancialRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FinancialRecord> {
        self.records.iter()
    }

    /// UserIDs that occur on more than one row, each reported once.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashMap::<&str, usize>::new();
        let mut dupes = Vec::new();
        for record in &self.records {
            let count = seen.entry(record.user_id.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                dupes.push(record.user_id.as_str());
            }
        }
        dupes
    }
}

impl<'a> IntoIterator for &'a FinancialTable {
    type Item = &'a FinancialRecord;
    type IntoIter = std::slice::Iter<'a, FinancialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
