//! Text rendering of a complete dashboard.
//!
//! A [`DashboardSummary`] gathers every view for one month selection and
//! formats it as an ASCII table for the terminal or as Markdown.

use crate::views::{ProductProfit, ProductShare, RegionDistribution, SellerCategorySales, StateCount};
use painel_data::MonthKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All dashboard views for one month selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    /// Months available for selection, chronological.
    pub months: Vec<MonthKey>,

    /// Month the sales summary is filtered to, `None` when there is no data.
    pub selected_month: Option<MonthKey>,

    /// Number of unified records.
    pub total_records: usize,

    /// Sales per seller and category in the selected month.
    pub sales: Vec<SellerCategorySales>,

    /// Quantity share per product.
    pub product_mix: Vec<ProductShare>,

    /// Records per customer state.
    pub customers: Vec<StateCount>,

    /// Profit per product.
    pub profit: Vec<ProductProfit>,

    /// Sales distribution per region. Empty when the records carry no region.
    pub regions: Vec<RegionDistribution>,
}

impl DashboardSummary {
    /// Total profit across products.
    pub fn total_profit(&self) -> f64 {
        self.profit.iter().fold(0.0, |acc, p| acc + p.profit)
    }

    /// Total sales of the selected month.
    pub fn month_sales(&self) -> f64 {
        self.sales.iter().fold(0.0, |acc, s| acc + s.total_sales)
    }

    fn selected_label(&self) -> String {
        self.selected_month
            .map_or_else(|| "-".to_string(), |m| m.to_string())
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nSales Dashboard\n");
        output.push_str(&format!(
            "Records: {}   Months: {}   Selected: {}\n",
            self.total_records,
            self.months.len(),
            self.selected_label()
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str(&format!("\nSales by Seller ({}):\n", self.selected_label()));
        output.push_str(&"-".repeat(80));
        output.push('\n');
        if self.sales.is_empty() {
            output.push_str("  (no sales)\n");
        } else {
            output.push_str(&format!(
                "{:<30} {:<30} {:>18}\n",
                "Seller", "Category", "Total Sales"
            ));
            for row in &self.sales {
                output.push_str(&format!(
                    "{:<30} {:<30} {:>18.2}\n",
                    row.seller_name, row.category, row.total_sales
                ));
            }
            output.push_str(&format!("{:<61} {:>18.2}\n", "Total", self.month_sales()));
        }

        output.push_str("\nProduct Mix:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        if self.product_mix.is_empty() {
            output.push_str("  (no products)\n");
        } else {
            output.push_str(&format!(
                "{:<40} {:>18} {:>19}\n",
                "Product", "Quantity", "Share"
            ));
            for row in &self.product_mix {
                output.push_str(&format!(
                    "{:<40} {:>18.2} {:>18.2}%\n",
                    row.product_name, row.quantity, row.share_pct
                ));
            }
        }

        output.push_str("\nCustomers by State:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        if self.customers.is_empty() {
            output.push_str("  (no customers)\n");
        } else {
            for row in &self.customers {
                output.push_str(&format!("{:<20} {:>10}\n", row.state, row.records));
            }
        }

        output.push_str("\nProfit by Product:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        if self.profit.is_empty() {
            output.push_str("  (no profit data)\n");
        } else {
            for row in &self.profit {
                output.push_str(&format!("{:<40} {:>18.2}\n", row.product_name, row.profit));
            }
            output.push_str(&format!("{:<40} {:>18.2}\n", "Total", self.total_profit()));
        }

        if !self.regions.is_empty() {
            output.push_str("\nSales Distribution by Region:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!(
                "{:<16} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
                "Region", "N", "Min", "Q1", "Median", "Q3", "Max"
            ));
            for row in &self.regions {
                output.push_str(&format!(
                    "{:<16} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}\n",
                    row.region, row.count, row.min, row.q1, row.median, row.q3, row.max
                ));
            }
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');
        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Sales Dashboard\n\n");
        output.push_str(&format!("- **Records:** {}\n", self.total_records));
        output.push_str(&format!(
            "- **Months:** {}\n",
            self.months
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));
        output.push_str(&format!("- **Selected month:** {}\n\n", self.selected_label()));

        output.push_str(&format!("## Sales by Seller ({})\n\n", self.selected_label()));
        output.push_str("| Seller | Category | Total Sales |\n");
        output.push_str("|--------|----------|------------:|\n");
        for row in &self.sales {
            output.push_str(&format!(
                "| {} | {} | {:.2} |\n",
                row.seller_name, row.category, row.total_sales
            ));
        }

        output.push_str("\n## Product Mix\n\n");
        output.push_str("| Product | Quantity | Share |\n");
        output.push_str("|---------|---------:|------:|\n");
        for row in &self.product_mix {
            output.push_str(&format!(
                "| {} | {:.2} | {:.2}% |\n",
                row.product_name, row.quantity, row.share_pct
            ));
        }

        output.push_str("\n## Customers by State\n\n");
        output.push_str("| State | Records |\n");
        output.push_str("|-------|--------:|\n");
        for row in &self.customers {
            output.push_str(&format!("| {} | {} |\n", row.state, row.records));
        }

        output.push_str("\n## Profit by Product\n\n");
        output.push_str("| Product | Profit |\n");
        output.push_str("|---------|-------:|\n");
        for row in &self.profit {
            output.push_str(&format!("| {} | {:.2} |\n", row.product_name, row.profit));
        }

        if !self.regions.is_empty() {
            output.push_str("\n## Sales Distribution by Region\n\n");
            output.push_str("| Region | N | Min | Q1 | Median | Q3 | Max |\n");
            output.push_str("|--------|--:|----:|---:|-------:|---:|----:|\n");
            for row in &self.regions {
                output.push_str(&format!(
                    "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
                    row.region, row.count, row.min, row.q1, row.median, row.q3, row.max
                ));
            }
        }

        output
    }
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dashboard: {} records, {} months, selected {}, profit {:.2}",
            self.total_records,
            self.months.len(),
            self.selected_label(),
            self.total_profit()
        )
    }
}
