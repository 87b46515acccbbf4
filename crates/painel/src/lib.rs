#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/painel-vendas/painel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dashboard;

// Re-export main types from sub-crates
pub use painel_data as data;
pub use painel_output as output;

pub use dashboard::Dashboard;
pub use painel_data::{DataError, JoinMode, MonthKey, SourceConfig, UnifiedRecords};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
