//! Column names shared by raw and clean statement tables.
//!
//! Column names follow the provider's Chinese headers so that raw files
//! written by other tools can be cleaned without a mapping step.

#![allow(missing_docs)]

/// Six-digit company code.
pub const STOCK_CODE: &str = "股票代码";
/// Company short name.
pub const STOCK_NAME: &str = "股票简称";
/// Eight-digit report date (`YYYYMMDD`).
pub const REPORT_DATE: &str = "报告期";

/// Join key shared by every statement table.
pub const KEY_COLUMNS: [&str; 3] = [STOCK_CODE, STOCK_NAME, REPORT_DATE];

/// Legacy code header used by the dividend report.
pub const LEGACY_CODE: &str = "代码";
/// Legacy name header used by the dividend report.
pub const LEGACY_NAME: &str = "名称";

// Income statement
pub const NET_PROFIT: &str = "净利润";
pub const NET_PROFIT_YOY: &str = "净利润同比";
pub const TOTAL_REVENUE: &str = "营业总收入";
pub const TOTAL_REVENUE_YOY: &str = "营业总收入同比";
pub const OPERATING_EXPENSE: &str = "营业总支出-营业支出";
pub const SELLING_EXPENSE: &str = "营业总支出-销售费用";
pub const ADMIN_EXPENSE: &str = "营业总支出-管理费用";
pub const FINANCIAL_EXPENSE: &str = "营业总支出-财务费用";
pub const TOTAL_EXPENSE: &str = "营业总支出-营业总支出";
pub const OPERATING_PROFIT: &str = "营业利润";
pub const TOTAL_PROFIT: &str = "利润总额";
pub const COST_OF_REVENUE: &str = "营业成本";
pub const NOTICE_DATE: &str = "公告日期";

// Cash flow statement
pub const NET_CASH_FLOW: &str = "净现金流-净现金流";
pub const NET_CASH_FLOW_YOY: &str = "净现金流-同比增长";
pub const OPERATING_CASH_FLOW: &str = "经营性现金流-现金流量净额";
pub const OPERATING_CASH_SHARE: &str = "经营性现金流-净现金流占比";
pub const INVESTING_CASH_FLOW: &str = "投资性现金流-现金流量净额";
pub const INVESTING_CASH_SHARE: &str = "投资性现金流-净现金流占比";
pub const FINANCING_CASH_FLOW: &str = "融资性现金流-现金流量净额";
pub const FINANCING_CASH_SHARE: &str = "融资性现金流-净现金流占比";

// Balance sheet
pub const CASH: &str = "资产-货币资金";
pub const RECEIVABLES: &str = "资产-应收账款";
pub const INVENTORY: &str = "资产-存货";
pub const TOTAL_ASSETS: &str = "资产-总资产";
pub const TOTAL_ASSETS_YOY: &str = "资产-总资产同比";
pub const PAYABLES: &str = "负债-应付账款";
pub const ADVANCE_RECEIPTS: &str = "负债-预收账款";
pub const TOTAL_LIABILITIES: &str = "负债-总负债";
pub const TOTAL_LIABILITIES_YOY: &str = "负债-总负债同比";
pub const DEBT_TO_ASSET_PCT: &str = "资产负债率";
pub const TOTAL_EQUITY: &str = "股东权益合计";

// Dividend
pub const BONUS_TOTAL_RATIO: &str = "送转股份-送转总比例";
pub const BONUS_RATIO: &str = "送转股份-送转比例";
pub const TRANSFER_RATIO: &str = "送转股份-转股比例";
pub const CASH_DIVIDEND_RATIO: &str = "现金分红-现金分红比例";
pub const CASH_DIVIDEND_YIELD: &str = "现金分红-股息率";
pub const EPS: &str = "每股收益";
pub const BOOK_VALUE_PER_SHARE: &str = "每股净资产";
pub const RESERVE_PER_SHARE: &str = "每股公积金";
pub const UNDISTRIBUTED_PER_SHARE: &str = "每股未分配利润";
pub const NET_PROFIT_GROWTH: &str = "净利润同比增长";
pub const TOTAL_SHARES: &str = "总股本";
pub const PLAN_NOTICE_DATE: &str = "预案公告日";
pub const RECORD_DATE: &str = "股权登记日";
pub const EX_DIVIDEND_DATE: &str = "除权除息日";
pub const PLAN_PROGRESS: &str = "方案进度";
pub const LATEST_NOTICE_DATE: &str = "最新公告日期";
