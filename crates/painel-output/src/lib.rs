#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/painel-vendas/painel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;
pub mod views;

pub use export::{ExportError, ExportFormat, Exporter};
pub use report::{Report, ReportBuilder, ReportError};
pub use summary::DashboardSummary;
pub use views::{
    ProductProfit, ProductShare, RegionDistribution, SellerCategorySales, StateCount,
    customers_by_state, product_mix, profit_report, profit_rows, region_distribution,
    sales_by_seller,
};
