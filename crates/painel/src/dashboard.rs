//! The dashboard facade.
//!
//! [`Dashboard`] owns the source configuration, a [`PipelineCache`] and the
//! current month selection, and hands each chart its view. The unified
//! record set is loaded once and reused until a source file changes; the
//! month-filtered subset and the aggregates are recomputed on every call.

use painel_data::{
    DataError, MonthKey, PipelineCache, ProfitByProduct, Result, SourceConfig, UnifiedRecords,
    aggregate_profit_by_product, distinct_months, filter_by_month, first_month,
};
use painel_output::{
    DashboardSummary, ProductProfit, ProductShare, RegionDistribution, SellerCategorySales,
    StateCount, views,
};
use tracing::warn;

/// Month-filterable sales dashboard over five CSV sources.
#[derive(Debug)]
pub struct Dashboard {
    config: SourceConfig,
    cache: PipelineCache,
    selected: Option<MonthKey>,
}

impl Dashboard {
    /// Create a dashboard. Nothing is read until a view is requested.
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            cache: PipelineCache::new(),
            selected: None,
        }
    }

    /// Source configuration.
    pub const fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// The pipeline cache backing this dashboard.
    pub const fn cache(&self) -> &PipelineCache {
        &self.cache
    }

    /// Unified records, loaded on first use and cached afterwards.
    pub fn records(&self) -> Result<UnifiedRecords> {
        self.cache.get_or_load(&self.config)
    }

    /// Drop the cached records so the next view reloads the sources.
    pub fn reload(&self) {
        self.cache.invalidate();
    }

    /// Months available for selection, chronological.
    pub fn months(&self) -> Result<Vec<MonthKey>> {
        distinct_months(&self.records()?)
    }

    /// Select the month used by the sales summary.
    pub const fn select_month(&mut self, month: MonthKey) {
        self.selected = Some(month);
    }

    /// Clear the selection, falling back to the first month in the data.
    pub const fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected month, or the month of the first record when nothing
    /// was selected. `None` only when there are no records.
    pub fn selected_month(&self) -> Result<Option<MonthKey>> {
        match self.selected {
            Some(month) => Ok(Some(month)),
            None => first_month(&self.records()?),
        }
    }

    /// Records of the selected month.
    pub fn month_records(&self) -> Result<UnifiedRecords> {
        let records = self.records()?;
        match self.selected_month()? {
            Some(month) => filter_by_month(&records, &month),
            None => Ok(records),
        }
    }

    /// Sales per seller and category in the selected month.
    pub fn sales_summary(&self) -> Result<Vec<SellerCategorySales>> {
        views::sales_by_seller(&self.month_records()?)
    }

    /// Quantity share per product over all records.
    pub fn product_mix(&self) -> Result<Vec<ProductShare>> {
        views::product_mix(&self.records()?)
    }

    /// Records per customer state over all records.
    pub fn customer_distribution(&self) -> Result<Vec<StateCount>> {
        views::customers_by_state(&self.records()?)
    }

    /// Summed profit per product over all records.
    pub fn profit_by_product(&self) -> Result<ProfitByProduct> {
        aggregate_profit_by_product(&self.records()?)
    }

    /// Profit per product as chart rows.
    pub fn profit_report(&self) -> Result<Vec<ProductProfit>> {
        Ok(views::profit_rows(self.profit_by_product()?))
    }

    /// Sales distribution per region over all records.
    pub fn region_distribution(&self) -> Result<Vec<RegionDistribution>> {
        views::region_distribution(&self.records()?, &self.config.columns.region)
    }

    /// Every view for the current selection.
    ///
    /// A missing region column leaves the region view empty instead of
    /// failing the whole dashboard.
    pub fn summary(&self) -> Result<DashboardSummary> {
        let records = self.records()?;

        let regions = match self.region_distribution() {
            Ok(rows) => rows,
            Err(DataError::MissingColumn(column)) => {
                warn!(%column, "region column not found, skipping region distribution");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        Ok(DashboardSummary {
            months: distinct_months(&records)?,
            selected_month: self.selected_month()?,
            total_records: records.len(),
            sales: self.sales_summary()?,
            product_mix: self.product_mix()?,
            customers: self.customer_distribution()?,
            profit: self.profit_report()?,
            regions,
        })
    }
}
