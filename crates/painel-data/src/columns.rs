//! Canonical column names of the unified record set.
//!
//! Configured source columns are renamed to these on load; every other source
//! column passes through under its own name.

/// Product id
pub const PRODUCT_ID: &str = "product_id";
/// Customer id
pub const CUSTOMER_ID: &str = "customer_id";
/// Seller id
pub const SELLER_ID: &str = "seller_id";
/// Supplier id
pub const SUPPLIER_ID: &str = "supplier_id";
/// Transaction date, parsed to a calendar date
pub const DATE: &str = "date";
/// Quantity sold
pub const QUANTITY: &str = "quantity";
/// Unit price
pub const UNIT_PRICE: &str = "unit_price";
/// Total price of the transaction line
pub const TOTAL_PRICE: &str = "total_price";
/// Product name
pub const PRODUCT_NAME: &str = "product_name";
/// Product category
pub const CATEGORY: &str = "category";
/// State of the customer
pub const CUSTOMER_STATE: &str = "customer_state";
/// Seller name
pub const SELLER_NAME: &str = "seller_name";

/// Derived `YYYY-MM` month key
pub const MONTH: &str = "month";
/// Derived `total_price - quantity * unit_price`
pub const PROFIT: &str = "profit";

/// Foreign keys carried by the sales table.
pub const FOREIGN_KEYS: [&str; 4] = [PRODUCT_ID, CUSTOMER_ID, SELLER_ID, SUPPLIER_ID];

/// Numeric columns of the sales table.
pub const MEASURES: [&str; 3] = [QUANTITY, UNIT_PRICE, TOTAL_PRICE];
