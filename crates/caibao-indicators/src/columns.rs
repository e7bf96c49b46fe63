//! Names of derived indicator columns.

#![allow(missing_docs)]

// Income
pub const REVENUE: &str = "营业收入";
pub const GROSS_MARGIN: &str = "毛利率";
pub const FINANCIAL_EXPENSE_ADJ: &str = "财务费用调整";
pub const EXPENSE_TOTAL: &str = "费用总额";
pub const EXPENSE_RATIO: &str = "费用率";
pub const OPERATING_MARGIN: &str = "营业利润率";
pub const EXPENSE_TO_GROSS_PROFIT: &str = "毛利润费用占比";

// Cash flow, in units of 10,000
pub const OPERATING_CASH_NET: &str = "经营活动现金流净额";
pub const INVESTING_CASH_NET: &str = "投资活动现金流净额";
pub const FINANCING_CASH_NET: &str = "融资活动现金流净额";
pub const OWN_OPERATING_CASH_NET: &str = "自有经营现金净额";

// Balance sheet, amounts in units of 10,000
pub const ASSETS: &str = "资产总额";
pub const LIABILITIES: &str = "负债总额";
pub const EQUITY: &str = "股东权益";
pub const DEBT_RATIO: &str = "资产负债率";
pub const EQUITY_RATIO: &str = "产权比率";
pub const CURRENT_RATIO: &str = "流动比率";
pub const QUICK_RATIO: &str = "速动比率";
pub const CASH_RATIO: &str = "现金比率";

// Dividend
pub const DIVIDEND_PER_SHARE: &str = "每股股利";
pub const DIVIDEND_YIELD: &str = "股息率";
pub const PAYOUT_RATIO: &str = "股利支付率";
pub const DIVIDEND_COVER: &str = "股息覆盖率";
pub const DIVIDEND_GROWTH: &str = "分红增长率";

// Company-scale ranking
pub const ASSET_RANK: &str = "资产规模排名";
pub const EQUITY_RANK: &str = "净资产排名";
pub const REVENUE_RANK: &str = "营业收入排名";
pub const COMPOSITE_RANK: &str = "综合排名";

// Screen
pub const PASS_COUNT: &str = "满足条件次数";
