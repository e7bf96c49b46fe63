//! Statement kinds and their fixed descriptors.
//!
//! Every per-statement decision in the pipeline (file names, provider report,
//! field mapping, mandatory numeric columns) is resolved by matching on
//! [`StatementKind`], so adding a statement type is a compile-time change.

use crate::columns::*;
use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Financial statement types handled by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Income statement (利润表)
    Income,
    /// Cash flow statement (现金流量表)
    CashFlow,
    /// Balance sheet (资产负债表)
    Balance,
    /// Dividend plans (分红配送)
    Dividend,
}

impl StatementKind {
    /// All statement kinds in pipeline order.
    pub const ALL: [Self; 4] = [Self::Income, Self::CashFlow, Self::Balance, Self::Dividend];

    /// Directory name and file prefix for this kind.
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Income => "income_statement",
            Self::CashFlow => "cash_flow_statement",
            Self::Balance => "balance_sheet",
            Self::Dividend => "dividend",
        }
    }

    /// Human readable name.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Income => "利润表",
            Self::CashFlow => "现金流量表",
            Self::Balance => "资产负债表",
            Self::Dividend => "分红配送",
        }
    }

    /// File name of the consolidated clean table.
    pub fn clean_file_name(&self) -> String {
        format!("{}_clean.csv", self.slug())
    }

    /// File name of the analysis table.
    pub fn analysis_file_name(&self) -> String {
        format!("{}_analysis.csv", self.slug())
    }

    /// File name of one raw per-date table.
    pub fn raw_file_name(&self, report_date: &str) -> String {
        format!("{}_{}.csv", self.slug(), report_date)
    }

    /// Eastmoney data-center report backing this statement.
    pub const fn provider_report(&self) -> &'static str {
        match self {
            Self::Income => "RPT_DMSK_FN_INCOME",
            Self::CashFlow => "RPT_DMSK_FN_CASHFLOW",
            Self::Balance => "RPT_DMSK_FN_BALANCE",
            Self::Dividend => "RPT_SHAREBONUS_DET",
        }
    }

    /// Column the provider sorts the report by.
    pub const fn provider_sort_column(&self) -> &'static str {
        match self {
            Self::Dividend => "PLAN_NOTICE_DATE",
            _ => "NOTICE_DATE,SECURITY_CODE",
        }
    }

    /// Whether the provider filter restricts to listed A-share securities.
    pub const fn filters_security_type(&self) -> bool {
        !matches!(self, Self::Dividend)
    }

    /// Provider field name to table column, in output column order.
    pub const fn field_map(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Income => &[
                ("SECURITY_CODE", STOCK_CODE),
                ("SECURITY_NAME_ABBR", STOCK_NAME),
                ("PARENT_NETPROFIT", NET_PROFIT),
                ("PARENT_NETPROFIT_RATIO", NET_PROFIT_YOY),
                ("TOTAL_OPERATE_INCOME", TOTAL_REVENUE),
                ("TOI_RATIO", TOTAL_REVENUE_YOY),
                ("OPERATE_COST", OPERATING_EXPENSE),
                ("SALE_EXPENSE", SELLING_EXPENSE),
                ("MANAGE_EXPENSE", ADMIN_EXPENSE),
                ("FINANCE_EXPENSE", FINANCIAL_EXPENSE),
                ("TOTAL_OPERATE_COST", TOTAL_EXPENSE),
                ("OPERATE_PROFIT", OPERATING_PROFIT),
                ("TOTAL_PROFIT", TOTAL_PROFIT),
                ("NOTICE_DATE", NOTICE_DATE),
            ],
            Self::CashFlow => &[
                ("SECURITY_CODE", STOCK_CODE),
                ("SECURITY_NAME_ABBR", STOCK_NAME),
                ("CCE_ADD", NET_CASH_FLOW),
                ("CCE_ADD_RATIO", NET_CASH_FLOW_YOY),
                ("NETCASH_OPERATE", OPERATING_CASH_FLOW),
                ("NETCASH_OPERATE_RATIO", OPERATING_CASH_SHARE),
                ("NETCASH_INVEST", INVESTING_CASH_FLOW),
                ("NETCASH_INVEST_RATIO", INVESTING_CASH_SHARE),
                ("NETCASH_FINANCE", FINANCING_CASH_FLOW),
                ("NETCASH_FINANCE_RATIO", FINANCING_CASH_SHARE),
                ("NOTICE_DATE", NOTICE_DATE),
            ],
            Self::Balance => &[
                ("SECURITY_CODE", STOCK_CODE),
                ("SECURITY_NAME_ABBR", STOCK_NAME),
                ("MONETARYFUNDS", CASH),
                ("ACCOUNTS_RECE", RECEIVABLES),
                ("INVENTORY", INVENTORY),
                ("TOTAL_ASSETS", TOTAL_ASSETS),
                ("TOTAL_ASSETS_RATIO", TOTAL_ASSETS_YOY),
                ("ACCOUNTS_PAYABLE", PAYABLES),
                ("ADVANCE_RECEIVABLES", ADVANCE_RECEIPTS),
                ("TOTAL_LIABILITIES", TOTAL_LIABILITIES),
                ("TOTAL_LIAB_RATIO", TOTAL_LIABILITIES_YOY),
                ("DEBT_ASSET_RATIO", DEBT_TO_ASSET_PCT),
                ("TOTAL_EQUITY", TOTAL_EQUITY),
                ("NOTICE_DATE", NOTICE_DATE),
            ],
            // The dividend report keeps the legacy code/name headers; the
            // cleaner renames them.
            Self::Dividend => &[
                ("SECURITY_CODE", LEGACY_CODE),
                ("SECURITY_NAME_ABBR", LEGACY_NAME),
                ("BONUS_IT_RATIO", BONUS_TOTAL_RATIO),
                ("BONUS_RATIO", BONUS_RATIO),
                ("IT_RATIO", TRANSFER_RATIO),
                ("PRETAX_BONUS_RMB", CASH_DIVIDEND_RATIO),
                ("DIVIDENT_RATIO", CASH_DIVIDEND_YIELD),
                ("BASIC_EPS", EPS),
                ("BVPS", BOOK_VALUE_PER_SHARE),
                ("PER_CAPITAL_RESERVE", RESERVE_PER_SHARE),
                ("PER_UNASSIGN_PROFIT", UNDISTRIBUTED_PER_SHARE),
                ("PNP_YOY_RATIO", NET_PROFIT_GROWTH),
                ("TOTAL_SHARES", TOTAL_SHARES),
                ("PLAN_NOTICE_DATE", PLAN_NOTICE_DATE),
                ("EQUITY_RECORD_DATE", RECORD_DATE),
                ("EX_DIVIDEND_DATE", EX_DIVIDEND_DATE),
                ("ASSIGN_PROGRESS", PLAN_PROGRESS),
                ("NOTICE_DATE", LATEST_NOTICE_DATE),
            ],
        }
    }

    /// Monetary and ratio columns that must be numeric in the clean table.
    pub const fn numeric_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Income => &[
                NET_PROFIT,
                NET_PROFIT_YOY,
                TOTAL_REVENUE,
                TOTAL_REVENUE_YOY,
                OPERATING_EXPENSE,
                SELLING_EXPENSE,
                ADMIN_EXPENSE,
                FINANCIAL_EXPENSE,
                TOTAL_EXPENSE,
                OPERATING_PROFIT,
                TOTAL_PROFIT,
                COST_OF_REVENUE,
            ],
            Self::CashFlow => &[
                NET_CASH_FLOW,
                NET_CASH_FLOW_YOY,
                OPERATING_CASH_FLOW,
                OPERATING_CASH_SHARE,
                INVESTING_CASH_FLOW,
                INVESTING_CASH_SHARE,
                FINANCING_CASH_FLOW,
                FINANCING_CASH_SHARE,
            ],
            Self::Balance => &[
                CASH,
                RECEIVABLES,
                INVENTORY,
                TOTAL_ASSETS,
                TOTAL_ASSETS_YOY,
                PAYABLES,
                ADVANCE_RECEIPTS,
                TOTAL_LIABILITIES,
                TOTAL_LIABILITIES_YOY,
                DEBT_TO_ASSET_PCT,
                TOTAL_EQUITY,
            ],
            Self::Dividend => &[
                BONUS_TOTAL_RATIO,
                BONUS_RATIO,
                TRANSFER_RATIO,
                CASH_DIVIDEND_RATIO,
                CASH_DIVIDEND_YIELD,
                EPS,
                BOOK_VALUE_PER_SHARE,
                RESERVE_PER_SHARE,
                UNDISTRIBUTED_PER_SHARE,
                NET_PROFIT_GROWTH,
                TOTAL_SHARES,
            ],
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for StatementKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");

        let kind = match normalized.as_str() {
            "income" | "income_statement" | "lrb" => Self::Income,
            "cash_flow" | "cash_flow_statement" | "cashflow" | "xjll" => Self::CashFlow,
            "balance" | "balance_sheet" | "zcfz" => Self::Balance,
            "dividend" | "fhps" => Self::Dividend,
            _ => return Err(DataError::UnknownKind(s.to_string())),
        };

        Ok(kind)
    }
}
