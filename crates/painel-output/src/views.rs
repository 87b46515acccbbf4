//! Chart views of the dashboard.
//!
//! Each builder reduces a record set to the rows one chart needs. Builders
//! never fail on an empty record set; they return no rows.

use painel_data::{
    ProfitByProduct, Result, UnifiedRecords, aggregate_profit_by_product, columns,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Count column of the customer distribution.
const RECORDS: &str = "records";

/// Total sales of one seller in one product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SellerCategorySales {
    /// Seller name.
    pub seller_name: String,

    /// Product category.
    pub category: String,

    /// Sum of `total_price`.
    pub total_sales: f64,
}

/// Quantity sold of one product and its share of all quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductShare {
    /// Product name.
    pub product_name: String,

    /// Sum of `quantity`.
    pub quantity: f64,

    /// Percentage of the total quantity (0 to 100).
    pub share_pct: f64,
}

/// Number of records for one customer state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateCount {
    /// Customer state.
    pub state: String,

    /// Number of sales records.
    pub records: u64,
}

/// Summed profit of one product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductProfit {
    /// Product name.
    pub product_name: String,

    /// Sum of `profit`.
    pub profit: f64,
}

/// Distribution of `total_price` within one region.
///
/// Quartiles use linear interpolation between closest ranks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionDistribution {
    /// Region name.
    pub region: String,

    /// Number of records.
    pub count: usize,

    /// Smallest value.
    pub min: f64,

    /// First quartile.
    pub q1: f64,

    /// Median.
    pub median: f64,

    /// Third quartile.
    pub q3: f64,

    /// Largest value.
    pub max: f64,

    /// Arithmetic mean.
    pub mean: f64,
}

impl RegionDistribution {
    /// Summarise a non-empty sample. Returns `None` for an empty one.
    pub fn from_values(region: String, mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;

        Some(Self {
            region,
            count,
            min: values[0],
            q1: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q3: quantile(&values, 0.75),
            max: values[count - 1],
            mean,
        })
    }

    /// Interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Linear-interpolated quantile of sorted, non-empty values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Pull a `(key, value)` pair of columns as strings and floats, skipping
/// rows where either is null.
fn keyed_values(
    records: &UnifiedRecords,
    key: &str,
    value: &str,
) -> Result<Vec<(String, f64)>> {
    records.require(key)?;
    records.require(value)?;

    let df = records
        .frame()
        .clone()
        .lazy()
        .select([
            col(key).cast(DataType::String),
            col(value).cast(DataType::Float64),
        ])
        .collect()?;

    let keys = df.column(key)?.str()?;
    let values = df.column(value)?.f64()?;

    Ok(keys
        .into_iter()
        .zip(values)
        .filter_map(|(k, v)| Some((k?.to_string(), v?)))
        .collect())
}

/// Total sales per seller and category.
///
/// Used with the month-filtered record set. Rows are ordered by seller then
/// category.
pub fn sales_by_seller(records: &UnifiedRecords) -> Result<Vec<SellerCategorySales>> {
    records.require(columns::SELLER_NAME)?;
    records.require(columns::CATEGORY)?;
    records.require(columns::TOTAL_PRICE)?;

    let df = records
        .frame()
        .clone()
        .lazy()
        .filter(
            col(columns::SELLER_NAME)
                .is_not_null()
                .and(col(columns::CATEGORY).is_not_null()),
        )
        .group_by([
            col(columns::SELLER_NAME).cast(DataType::String),
            col(columns::CATEGORY).cast(DataType::String),
        ])
        .agg([col(columns::TOTAL_PRICE).cast(DataType::Float64).sum()])
        .sort(
            [columns::SELLER_NAME, columns::CATEGORY],
            SortMultipleOptions::default(),
        )
        .collect()?;

    let sellers = df.column(columns::SELLER_NAME)?.str()?;
    let categories = df.column(columns::CATEGORY)?.str()?;
    let totals = df.column(columns::TOTAL_PRICE)?.f64()?;

    Ok(sellers
        .into_iter()
        .zip(categories)
        .zip(totals)
        .filter_map(|((seller, category), total)| {
            Some(SellerCategorySales {
                seller_name: seller?.to_string(),
                category: category?.to_string(),
                total_sales: total.unwrap_or(0.0),
            })
        })
        .collect())
}

/// Quantity sold per product with its share, ordered by product name.
pub fn product_mix(records: &UnifiedRecords) -> Result<Vec<ProductShare>> {
    records.require(columns::PRODUCT_NAME)?;
    records.require(columns::QUANTITY)?;

    let df = records
        .frame()
        .clone()
        .lazy()
        .filter(col(columns::PRODUCT_NAME).is_not_null())
        .group_by([col(columns::PRODUCT_NAME).cast(DataType::String)])
        .agg([col(columns::QUANTITY).cast(DataType::Float64).sum()])
        .sort([columns::PRODUCT_NAME], SortMultipleOptions::default())
        .collect()?;

    let names = df.column(columns::PRODUCT_NAME)?.str()?;
    let quantities = df.column(columns::QUANTITY)?.f64()?;
    let grand_total = quantities.sum().unwrap_or(0.0);

    Ok(names
        .into_iter()
        .zip(quantities)
        .filter_map(|(name, quantity)| {
            let quantity = quantity.unwrap_or(0.0);
            Some(ProductShare {
                product_name: name?.to_string(),
                share_pct: if grand_total.abs() > 1e-10 {
                    quantity / grand_total * 100.0
                } else {
                    0.0
                },
                quantity,
            })
        })
        .collect())
}

/// Record count per customer state, ordered by state.
pub fn customers_by_state(records: &UnifiedRecords) -> Result<Vec<StateCount>> {
    records.require(columns::CUSTOMER_STATE)?;

    let df = records
        .frame()
        .clone()
        .lazy()
        .filter(col(columns::CUSTOMER_STATE).is_not_null())
        .group_by([col(columns::CUSTOMER_STATE).cast(DataType::String)])
        .agg([len().cast(DataType::UInt64).alias(RECORDS)])
        .sort([columns::CUSTOMER_STATE], SortMultipleOptions::default())
        .collect()?;

    let states = df.column(columns::CUSTOMER_STATE)?.str()?;
    let counts = df.column(RECORDS)?.u64()?;

    Ok(states
        .into_iter()
        .zip(counts)
        .filter_map(|(state, records)| {
            Some(StateCount {
                state: state?.to_string(),
                records: records?,
            })
        })
        .collect())
}

/// Profit per product as chart rows, ordered by product name.
pub fn profit_report(records: &UnifiedRecords) -> Result<Vec<ProductProfit>> {
    Ok(profit_rows(aggregate_profit_by_product(records)?))
}

/// Convert a profit aggregate into chart rows.
pub fn profit_rows(profit: ProfitByProduct) -> Vec<ProductProfit> {
    profit
        .into_iter()
        .map(|(product_name, profit)| ProductProfit {
            product_name,
            profit,
        })
        .collect()
}

/// Distribution of `total_price` per region, ordered by region.
///
/// `region_column` is the name the region column carries in the records.
pub fn region_distribution(
    records: &UnifiedRecords,
    region_column: &str,
) -> Result<Vec<RegionDistribution>> {
    let mut samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (region, price) in keyed_values(records, region_column, columns::TOTAL_PRICE)? {
        samples.entry(region).or_default().push(price);
    }

    Ok(samples
        .into_iter()
        .filter_map(|(region, values)| RegionDistribution::from_values(region, values))
        .collect())
}
