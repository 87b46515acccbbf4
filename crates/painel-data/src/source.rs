//! Input sources and their on-disk identity.

use crate::config::SourceConfig;
use crate::error::{DataError, Result};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// The five tabular inputs of the dashboard.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Sales fact table, one row per transaction line
    #[display("sales")]
    Sales,

    /// Product reference table
    #[display("product")]
    Product,

    /// Customer reference table
    #[display("customer")]
    Customer,

    /// Seller reference table
    #[display("seller")]
    Seller,

    /// Supplier reference table
    #[display("supplier")]
    Supplier,
}

impl SourceKind {
    /// Returns all sources, fact table first, in join order.
    pub const fn all() -> [Self; 5] {
        [
            Self::Sales,
            Self::Product,
            Self::Customer,
            Self::Seller,
            Self::Supplier,
        ]
    }

    /// Returns the four reference sources in join order.
    pub const fn references() -> [Self; 4] {
        [Self::Product, Self::Customer, Self::Seller, Self::Supplier]
    }

    /// Suffix given to pass-through columns of this source that collide with
    /// columns already present on the left side of the join.
    pub const fn join_suffix(&self) -> &'static str {
        match self {
            Self::Sales => "_sales",
            Self::Product => "_product",
            Self::Customer => "_customer",
            Self::Seller => "_seller",
            Self::Supplier => "_supplier",
        }
    }
}

/// Size and modification time of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileStamp {
    /// Resolved path
    pub path: PathBuf,
    /// File length in bytes
    pub len: u64,
    /// Last modification time, when the platform reports one
    pub modified: Option<SystemTime>,
}

/// Identity of a complete set of inputs.
///
/// Two fingerprints are equal when every file has the same path, length and
/// modification time and the configuration that shapes the unified record set
/// is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFingerprint {
    config: SourceConfig,
    stamps: Vec<FileStamp>,
}

impl SourceFingerprint {
    /// Stat every configured source file.
    ///
    /// Fails with [`DataError::Load`] for the first file that does not exist.
    pub fn capture(config: &SourceConfig) -> Result<Self> {
        let stamps = SourceKind::all()
            .into_iter()
            .map(|kind| {
                let path = config.path(kind);
                let meta = std::fs::metadata(&path)
                    .map_err(|e| DataError::load(kind, path.clone(), e))?;
                Ok(FileStamp {
                    len: meta.len(),
                    modified: meta.modified().ok(),
                    path,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config: config.clone(),
            stamps,
        })
    }

    /// Per-file stamps, in [`SourceKind::all`] order.
    pub fn stamps(&self) -> &[FileStamp] {
        &self.stamps
    }
}
