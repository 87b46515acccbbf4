//! Source configuration.
//!
//! Every field has a default matching the layout of the original sales
//! export, so an empty configuration file (or none at all) works against a
//! directory holding `fato_vendas.csv` and the four `dim_*.csv` tables.

use crate::columns;
use crate::error::{DataError, Result};
use crate::source::SourceKind;
use polars::prelude::JoinType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How fact rows without a matching reference row are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    /// Drop fact rows whose foreign key has no match
    #[default]
    Inner,
    /// Keep every fact row, leaving reference attributes null on a miss
    Left,
}

impl JoinMode {
    /// Polars join type for this mode.
    pub const fn join_type(&self) -> JoinType {
        match self {
            Self::Inner => JoinType::Inner,
            Self::Left => JoinType::Left,
        }
    }
}

impl FromStr for JoinMode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "inner" => Ok(Self::Inner),
            "left" => Ok(Self::Left),
            other => Err(DataError::Config(config::ConfigError::Message(format!(
                "unknown join mode '{other}', expected 'inner' or 'left'"
            )))),
        }
    }
}

/// File names of the five sources, relative to [`SourceConfig::data_dir`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    /// Sales fact table
    pub sales: String,
    /// Product reference table
    pub products: String,
    /// Customer reference table
    pub customers: String,
    /// Seller reference table
    pub sellers: String,
    /// Supplier reference table
    pub suppliers: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            sales: "fato_vendas.csv".to_string(),
            products: "dim_produtos.csv".to_string(),
            customers: "dim_clientes.csv".to_string(),
            sellers: "dim_vendedores.csv".to_string(),
            suppliers: "dim_fornecedores.csv".to_string(),
        }
    }
}

impl SourceFiles {
    /// File name configured for a source.
    pub fn name(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Sales => &self.sales,
            SourceKind::Product => &self.products,
            SourceKind::Customer => &self.customers,
            SourceKind::Seller => &self.sellers,
            SourceKind::Supplier => &self.suppliers,
        }
    }
}

/// Names of the columns consumed from the sources.
///
/// Ids are shared between the fact table and the reference table they point
/// to, so each id is configured once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Product id (sales, product)
    pub product_id: String,
    /// Customer id (sales, customer)
    pub customer_id: String,
    /// Seller id (sales, seller)
    pub seller_id: String,
    /// Supplier id (sales, supplier)
    pub supplier_id: String,
    /// Transaction date (sales)
    pub date: String,
    /// Quantity (sales)
    pub quantity: String,
    /// Unit price (sales)
    pub unit_price: String,
    /// Total price (sales)
    pub total_price: String,
    /// Product name (product)
    pub product_name: String,
    /// Product category (product)
    pub category: String,
    /// Customer state (customer)
    pub customer_state: String,
    /// Seller name (seller)
    pub seller_name: String,
    /// Region column, passed through the join under this exact name
    pub region: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            product_id: "id_produto".to_string(),
            customer_id: "id_cliente".to_string(),
            seller_id: "id_vendedor".to_string(),
            supplier_id: "fornecedor_id".to_string(),
            date: "data".to_string(),
            quantity: "quantidade".to_string(),
            unit_price: "preco_unitario".to_string(),
            total_price: "preco_total".to_string(),
            product_name: "nome_produto".to_string(),
            category: "categoria".to_string(),
            customer_state: "estado".to_string(),
            seller_name: "nome_vendedor".to_string(),
            region: "região".to_string(),
        }
    }
}

impl ColumnNames {
    /// Columns a source must carry, as `(configured, canonical)` pairs.
    pub fn required(&self, kind: SourceKind) -> Vec<(&str, &'static str)> {
        match kind {
            SourceKind::Sales => vec![
                (self.product_id.as_str(), columns::PRODUCT_ID),
                (self.customer_id.as_str(), columns::CUSTOMER_ID),
                (self.seller_id.as_str(), columns::SELLER_ID),
                (self.supplier_id.as_str(), columns::SUPPLIER_ID),
                (self.date.as_str(), columns::DATE),
                (self.quantity.as_str(), columns::QUANTITY),
                (self.unit_price.as_str(), columns::UNIT_PRICE),
                (self.total_price.as_str(), columns::TOTAL_PRICE),
            ],
            SourceKind::Product => vec![
                (self.product_id.as_str(), columns::PRODUCT_ID),
                (self.product_name.as_str(), columns::PRODUCT_NAME),
                (self.category.as_str(), columns::CATEGORY),
            ],
            SourceKind::Customer => vec![
                (self.customer_id.as_str(), columns::CUSTOMER_ID),
                (self.customer_state.as_str(), columns::CUSTOMER_STATE),
            ],
            SourceKind::Seller => vec![
                (self.seller_id.as_str(), columns::SELLER_ID),
                (self.seller_name.as_str(), columns::SELLER_NAME),
            ],
            SourceKind::Supplier => vec![(self.supplier_id.as_str(), columns::SUPPLIER_ID)],
        }
    }
}

/// Where the five sources live and how they are read and joined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory holding the source files
    pub data_dir: PathBuf,
    /// Source file names
    pub files: SourceFiles,
    /// Source column names
    pub columns: ColumnNames,
    /// Join semantics for unmatched foreign keys
    pub join_mode: JoinMode,
    /// strftime pattern of the date column; inferred from the data when unset
    pub date_format: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            files: SourceFiles::default(),
            columns: ColumnNames::default(),
            join_mode: JoinMode::default(),
            date_format: None,
        }
    }
}

impl SourceConfig {
    /// Load configuration from an optional TOML file.
    ///
    /// Without a file every field takes its default.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the join mode.
    pub const fn with_join_mode(mut self, mode: JoinMode) -> Self {
        self.join_mode = mode;
        self
    }

    /// Set the date format.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Resolved path of a source file.
    pub fn path(&self, kind: SourceKind) -> PathBuf {
        self.data_dir.join(self.files.name(kind))
    }
}
