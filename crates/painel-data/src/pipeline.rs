//! The load → join → derive pipeline.
//!
//! The sales table drives four sequential joins against the product,
//! customer, seller and supplier tables. Two columns are then derived on the
//! joined rows:
//!
//! - `month`: the transaction date truncated to `YYYY-MM`
//! - `profit`: `total_price - quantity * unit_price`
//!
//! The profit formula is kept exactly as the dashboard has always computed
//! it. It only measures profit when `total_price` carries something beyond
//! `quantity * unit_price` (a markup, tax or discount); on data where the
//! two agree it is zero, and it is not a cost-based margin.

use crate::columns;
use crate::config::SourceConfig;
use crate::error::{DataError, Result};
use crate::loader::read_source;
use crate::month::MONTH_FORMAT;
use crate::source::SourceKind;
use polars::prelude::*;
use tracing::{debug, warn};

/// Temporary column holding the sales row position across the joins.
const ROW_INDEX: &str = "__sales_row";

/// A read-only set of unified sales records.
///
/// Wraps a DataFrame holding the union of all source columns plus
/// [`columns::MONTH`] and [`columns::PROFIT`]. Cloning is cheap; the column
/// buffers are shared.
#[derive(Debug, Clone)]
pub struct UnifiedRecords {
    frame: DataFrame,
}

impl UnifiedRecords {
    /// Wrap a DataFrame, checking that the derived columns are present.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingColumn`] if `month` or `profit` is absent.
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        for name in [columns::MONTH, columns::PROFIT] {
            if frame.get_column_index(name).is_none() {
                return Err(DataError::MissingColumn(name.to_string()));
            }
        }
        Ok(Self { frame })
    }

    /// Underlying DataFrame.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume into the underlying DataFrame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    /// Whether the set holds no records.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Sum of the profit column. Nulls count as zero.
    pub fn total_profit(&self) -> Result<f64> {
        Ok(self
            .frame
            .column(columns::PROFIT)?
            .f64()?
            .sum()
            .unwrap_or(0.0))
    }

    /// Column accessor that reports a missing column as
    /// [`DataError::MissingColumn`].
    pub fn require(&self, name: &str) -> Result<&Column> {
        self.frame
            .column(name)
            .map_err(|_| DataError::MissingColumn(name.to_string()))
    }
}

impl PartialEq for UnifiedRecords {
    fn eq(&self, other: &Self) -> bool {
        self.frame.equals_missing(&other.frame)
    }
}

/// Load the five sources, join them and derive `month` and `profit`.
///
/// Rows keep the order of the sales table. Under [`JoinMode::Inner`]
/// sales rows whose foreign keys have no match are dropped; the number
/// dropped is logged.
///
/// [`JoinMode::Inner`]: crate::config::JoinMode::Inner
///
/// # Errors
///
/// - [`DataError::Load`] if a file is missing, unreadable or malformed, or
///   its dates do not parse.
/// - [`DataError::Schema`] if a declared column is absent.
pub fn load_all(config: &SourceConfig) -> Result<UnifiedRecords> {
    let sales = read_source(config, SourceKind::Sales)?;
    let sales_rows = sales.height();

    let references = SourceKind::references()
        .into_iter()
        .map(|kind| read_source(config, kind).map(|df| (kind, df)))
        .collect::<Result<Vec<_>>>()?;

    let frame = join_and_derive(sales, references, config)?;

    if frame.height() < sales_rows {
        warn!(
            dropped = sales_rows - frame.height(),
            sales_rows,
            "sales rows without a matching reference row were dropped"
        );
    }
    debug!(
        rows = frame.height(),
        columns = frame.width(),
        join_mode = ?config.join_mode,
        "unified records ready"
    );

    UnifiedRecords::from_frame(frame)
}

/// Join the reference tables onto the sales table and derive the computed
/// columns.
fn join_and_derive(
    sales: DataFrame,
    references: Vec<(SourceKind, DataFrame)>,
    config: &SourceConfig,
) -> Result<DataFrame> {
    let join_type = config.join_mode.join_type();

    let mut lf = sales.lazy().with_row_index(ROW_INDEX, None);

    for (kind, reference) in references {
        let key = match kind {
            SourceKind::Product => columns::PRODUCT_ID,
            SourceKind::Customer => columns::CUSTOMER_ID,
            SourceKind::Seller => columns::SELLER_ID,
            SourceKind::Supplier => columns::SUPPLIER_ID,
            SourceKind::Sales => continue,
        };
        lf = lf.join(
            reference.lazy(),
            [col(key)],
            [col(key)],
            JoinArgs::new(join_type.clone()).with_suffix(Some(kind.join_suffix().into())),
        );
    }

    let profit = col(columns::TOTAL_PRICE).cast(DataType::Float64)
        - col(columns::QUANTITY).cast(DataType::Float64)
            * col(columns::UNIT_PRICE).cast(DataType::Float64);

    let frame = lf
        .sort([ROW_INDEX], SortMultipleOptions::default())
        .with_columns([
            col(columns::DATE)
                .dt()
                .strftime(MONTH_FORMAT)
                .alias(columns::MONTH),
            profit.alias(columns::PROFIT),
        ])
        .collect()?
        .drop(ROW_INDEX)?;

    Ok(frame)
}
