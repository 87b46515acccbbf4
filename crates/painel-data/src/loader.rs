//! Reading a single source into a DataFrame.

use crate::columns;
use crate::config::SourceConfig;
use crate::error::{DataError, Result};
use crate::source::SourceKind;
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Join-key columns of a source, by canonical name.
fn key_columns(kind: SourceKind) -> &'static [&'static str] {
    match kind {
        SourceKind::Sales => &columns::FOREIGN_KEYS,
        SourceKind::Product => &[columns::PRODUCT_ID],
        SourceKind::Customer => &[columns::CUSTOMER_ID],
        SourceKind::Seller => &[columns::SELLER_ID],
        SourceKind::Supplier => &[columns::SUPPLIER_ID],
    }
}

const fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int32
            | DataType::Int64
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Read one source, validate its declared columns and rename them to their
/// canonical names.
///
/// Join keys are cast to strings so that a key read as an integer in one
/// file and as text in another still matches. For the sales table the date
/// column is parsed into a calendar date and the measures are checked to be
/// numeric.
pub(crate) fn read_source(config: &SourceConfig, kind: SourceKind) -> Result<DataFrame> {
    let path = config.path(kind);
    if !path.is_file() {
        return Err(DataError::load(kind, path, "file not found"));
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.clone()))
        .and_then(|reader| reader.finish())
        .map_err(|e| DataError::load(kind, path.clone(), e))?;

    let required = config.columns.required(kind);
    if let Some((missing, _)) = required
        .iter()
        .find(|(configured, _)| df.get_column_index(configured).is_none())
    {
        return Err(DataError::Schema {
            kind,
            column: (*missing).to_string(),
        });
    }

    let timestamps = kind == SourceKind::Sales
        && date_has_time(&df, &config.columns.date, config.date_format.as_deref())?;

    let (existing, renamed): (Vec<&str>, Vec<&str>) = required
        .into_iter()
        .filter(|(configured, canonical)| configured != canonical)
        .unzip();

    let keys: Vec<Expr> = key_columns(kind)
        .iter()
        .map(|key| col(*key).cast(DataType::String))
        .collect();
    let mut lf = df.lazy().rename(existing, renamed, true).with_columns(keys);

    if kind == SourceKind::Sales {
        lf = prepare_sales(lf, config, &path, timestamps)?;
    }

    let df = lf
        .collect()
        .map_err(|e| DataError::load(kind, path.clone(), e))?;

    if kind == SourceKind::Sales {
        let undated = df.column(columns::DATE)?.null_count();
        if undated > 0 {
            return Err(DataError::load(
                kind,
                path,
                format!("{undated} row(s) have an empty date"),
            ));
        }
    }

    debug!(
        source = %kind,
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded source"
    );

    Ok(df)
}

/// strftime specifiers that carry a time of day.
const TIME_SPECIFIERS: [&str; 7] = ["%H", "%I", "%M", "%S", "%T", "%R", "%c"];

/// Whether the date column holds timestamps rather than plain dates.
///
/// With an explicit format this is read off the format; otherwise from the
/// first non-empty cell, the same value format inference looks at.
fn date_has_time(df: &DataFrame, column: &str, format: Option<&str>) -> Result<bool> {
    if let Some(format) = format {
        return Ok(TIME_SPECIFIERS.iter().any(|spec| format.contains(spec)));
    }

    let Some(dates) = df.column(column).ok() else {
        return Ok(false);
    };
    let dates = dates.cast(&DataType::String)?;
    let first = dates.str()?.into_iter().flatten().next();
    Ok(first.is_some_and(|value| value.contains(':')))
}

/// Parse the date column and check the measures of the sales table.
///
/// Timestamps are truncated to their calendar date.
fn prepare_sales(
    lf: LazyFrame,
    config: &SourceConfig,
    path: &Path,
    timestamps: bool,
) -> Result<LazyFrame> {
    let mut lf = lf;
    let schema = lf
        .collect_schema()
        .map_err(|e| DataError::load(SourceKind::Sales, path, e))?;

    // A header-only file infers every column as text.
    let empty = schema
        .iter()
        .all(|(_, dtype)| matches!(dtype, DataType::String | DataType::Null));

    let mut exprs = Vec::with_capacity(columns::MEASURES.len() + 1);
    for name in columns::MEASURES {
        let dtype = schema.get(name).cloned().unwrap_or(DataType::Null);
        if is_numeric(&dtype) {
            continue;
        }
        if empty {
            exprs.push(col(name).cast(DataType::Float64));
        } else {
            return Err(DataError::load(
                SourceKind::Sales,
                path,
                format!("column '{name}' is not numeric ({dtype})"),
            ));
        }
    }

    let options = StrptimeOptions {
        format: config.date_format.as_deref().map(Into::into),
        ..Default::default()
    };
    let date = if timestamps {
        col(columns::DATE)
            .str()
            .to_datetime(None, None, options, lit("raise"))
            .dt()
            .date()
    } else {
        col(columns::DATE).str().to_date(options)
    };
    exprs.push(date.alias(columns::DATE));

    Ok(lf.with_columns(exprs))
}
