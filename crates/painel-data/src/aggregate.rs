//! Profit aggregation.

use crate::columns;
use crate::error::Result;
use crate::pipeline::UnifiedRecords;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Summed profit keyed by product name.
pub type ProfitByProduct = BTreeMap<String, f64>;

/// Sum `profit` per distinct product name.
///
/// Sums stay in the precision of the profit column; nothing is rounded.
/// Records with a null product name (possible only under a left join) are
/// not attributed to any product. An empty input yields an empty map.
///
/// # Errors
///
/// Returns [`DataError::MissingColumn`](crate::DataError::MissingColumn) if
/// the records carry no `product_name` column.
pub fn aggregate_profit_by_product(records: &UnifiedRecords) -> Result<ProfitByProduct> {
    records.require(columns::PRODUCT_NAME)?;

    let grouped = records
        .frame()
        .clone()
        .lazy()
        .filter(col(columns::PRODUCT_NAME).is_not_null())
        .group_by([col(columns::PRODUCT_NAME).cast(DataType::String)])
        .agg([col(columns::PROFIT).sum()])
        .collect()?;

    let names = grouped.column(columns::PRODUCT_NAME)?.str()?;
    let sums = grouped.column(columns::PROFIT)?.f64()?;

    Ok(names
        .into_iter()
        .zip(sums)
        .filter_map(|(name, sum)| name.map(|n| (n.to_string(), sum.unwrap_or(0.0))))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn records(names: &[Option<&str>], profit: &[f64]) -> UnifiedRecords {
        let months = vec!["2024-01"; names.len()];
        let frame = df!(
            columns::MONTH => months,
            columns::PRODUCT_NAME => names,
            columns::PROFIT => profit,
        )
        .unwrap();
        UnifiedRecords::from_frame(frame).unwrap()
    }

    #[test]
    fn test_sums_per_product() {
        let input = records(
            &[Some("Pen"), Some("Notebook"), Some("Pen"), Some("Ink")],
            &[40.0, 2.5, -10.0, 0.0],
        );
        let profit = aggregate_profit_by_product(&input).unwrap();

        assert_eq!(profit.len(), 3);
        assert_relative_eq!(profit["Pen"], 30.0);
        assert_relative_eq!(profit["Notebook"], 2.5);
        assert_relative_eq!(profit["Ink"], 0.0);
    }

    #[test]
    fn test_total_matches_profit_column() {
        let input = records(
            &[Some("A"), Some("B"), Some("A"), Some("C"), Some("B")],
            &[1.25, 2.5, 3.75, -4.0, 10.0],
        );
        let profit = aggregate_profit_by_product(&input).unwrap();

        let total: f64 = profit.values().sum();
        assert_relative_eq!(total, input.total_profit().unwrap(), epsilon = 1e-9);
    }

    #[test]
    fn test_empty_input_yields_empty_map() {
        let input = records(&[], &[]);
        assert!(aggregate_profit_by_product(&input).unwrap().is_empty());
    }

    #[test]
    fn test_null_product_names_are_skipped() {
        let input = records(&[Some("A"), None], &[1.0, 2.0]);
        let profit = aggregate_profit_by_product(&input).unwrap();
        assert_eq!(profit.len(), 1);
        assert_relative_eq!(profit["A"], 1.0);
    }

    #[test]
    fn test_missing_product_column() {
        let frame = df!(columns::MONTH => ["2024-01"], columns::PROFIT => [1.0]).unwrap();
        let input = UnifiedRecords::from_frame(frame).unwrap();
        assert!(aggregate_profit_by_product(&input).is_err());
    }
}
