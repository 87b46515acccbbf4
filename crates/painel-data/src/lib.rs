#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/painel-vendas/painel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod cache;
pub mod columns;
pub mod config;
pub mod error;
mod loader;
pub mod month;
pub mod pipeline;
pub mod source;

pub use aggregate::{ProfitByProduct, aggregate_profit_by_product};
pub use cache::PipelineCache;
pub use config::{ColumnNames, JoinMode, SourceConfig, SourceFiles};
pub use error::{DataError, Result};
pub use month::{MonthKey, distinct_months, filter_by_month, first_month};
pub use pipeline::{UnifiedRecords, load_all};
pub use source::{SourceFingerprint, SourceKind};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
