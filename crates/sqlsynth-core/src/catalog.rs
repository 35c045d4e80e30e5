//! Table catalog: column lists and estimated sizes.
//!
//! The catalog is read-only during generation. Table order is significant:
//! the sampler walks tables in insertion order, and the first column of a
//! table is its fallback join key.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sqlsynth_lang::{is_bare_identifier, TableSizes};

use crate::error::Error;

/// Row count assumed for tables missing from the catalog.
pub const DEFAULT_ROW_COUNT: u64 = 1000;

/// Column assumed for tables missing from the catalog.
pub const DEFAULT_COLUMN: &str = "id";

/// A table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    /// Table name.
    pub name: String,
    /// Ordered column names. The first column is the fallback join key.
    pub columns: Vec<String>,
    /// Estimated row count.
    pub rows: u64,
}

impl TableDef {
    /// Create a new table definition.
    pub fn new(name: impl Into<String>, rows: u64, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    tables: Vec<TableDef>,
}

/// Ordered table catalog with a name index.
#[derive(Debug, Clone)]
pub struct TableCatalog {
    tables: Vec<TableDef>,
    index: HashMap<String, usize>,
    default_columns: Vec<String>,
}

impl TableCatalog {
    /// Build a catalog from table definitions.
    ///
    /// Rejects an empty table list, duplicate names, tables without columns,
    /// and names that would not read back as plain identifiers in generated
    /// SQL (keywords such as `order`, or names needing quotes).
    pub fn new(tables: Vec<TableDef>) -> Result<Self, Error> {
        if tables.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        let mut index = HashMap::with_capacity(tables.len());
        for (position, table) in tables.iter().enumerate() {
            if !is_bare_identifier(&table.name) {
                return Err(Error::Catalog(format!(
                    "table name '{}' is not a plain identifier",
                    table.name
                )));
            }
            if let Some(column) = table.columns.iter().find(|c| !is_bare_identifier(c)) {
                return Err(Error::Catalog(format!(
                    "column '{}' of table '{}' is not a plain identifier",
                    column, table.name
                )));
            }
            if table.columns.is_empty() {
                return Err(Error::Catalog(format!(
                    "table '{}' has no columns",
                    table.name
                )));
            }
            if index.insert(table.name.clone(), position).is_some() {
                return Err(Error::Catalog(format!(
                    "duplicate table '{}'",
                    table.name
                )));
            }
        }

        Ok(Self {
            tables,
            index,
            default_columns: vec![DEFAULT_COLUMN.to_string()],
        })
    }

    /// Parse a catalog from JSON: `{"tables": [{"name", "columns", "rows"}, ...]}`.
    pub fn from_json(source: &str) -> Result<Self, Error> {
        let file: CatalogFile = serde_json::from_str(source)?;
        Self::new(file.tables)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// The built-in e-commerce and analytics catalog.
    ///
    /// Sizes range from a few dozen rows to hundreds of millions so every
    /// sampling bias and every size tier of the scorer is reachable.
    pub fn builtin() -> Self {
        let tables = vec![
            TableDef::new(
                "users",
                1_200_000,
                &["user_id", "email", "country", "signup_date", "last_login_at", "status"],
            ),
            TableDef::new(
                "orders",
                25_000_000,
                &["order_id", "user_id", "order_date", "status", "total_amount", "shipping_fee"],
            ),
            TableDef::new(
                "order_items",
                80_000_000,
                &["order_id", "product_id", "qty", "price", "discount"],
            ),
            TableDef::new(
                "products",
                150_000,
                &["product_id", "category_id", "name", "price", "stock", "created_at"],
            ),
            TableDef::new("categories", 500, &["category_id", "name", "parent_id"]),
            TableDef::new(
                "inventory",
                3_000_000,
                &["product_id", "warehouse_id", "stock", "updated_at"],
            ),
            TableDef::new("warehouses", 40, &["warehouse_id", "region", "capacity"]),
            TableDef::new(
                "payments",
                24_000_000,
                &["payment_id", "order_id", "user_id", "amount", "method", "paid_at"],
            ),
            TableDef::new(
                "shipments",
                18_000_000,
                &["shipment_id", "order_id", "carrier", "shipped_ts", "delivered_ts"],
            ),
            TableDef::new(
                "reviews",
                6_000_000,
                &["review_id", "product_id", "user_id", "rating", "review_date"],
            ),
            TableDef::new(
                "sessions",
                90_000_000,
                &["session_id", "user_id", "device", "started_at", "duration"],
            ),
            TableDef::new(
                "events",
                300_000_000,
                &["event_id", "session_id", "user_id", "event_type", "event_ts"],
            ),
            TableDef::new(
                "promotions",
                2_000,
                &["promo_id", "name", "discount", "start_date", "end_date"],
            ),
            TableDef::new("currencies", 180, &["currency_code", "name", "rate"]),
            TableDef::new("countries", 250, &["country_code", "name", "region"]),
        ];

        let index = tables
            .iter()
            .enumerate()
            .map(|(position, table)| (table.name.clone(), position))
            .collect();

        Self {
            tables,
            index,
            default_columns: vec![DEFAULT_COLUMN.to_string()],
        }
    }

    /// All tables in catalog order.
    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the catalog has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Look up a table by exact name.
    pub fn get(&self, name: &str) -> Option<&TableDef> {
        self.index.get(name).map(|&position| &self.tables[position])
    }

    /// Columns of `name`, or `["id"]` if the table is unknown.
    pub fn columns(&self, name: &str) -> &[String] {
        self.get(name)
            .map(|table| table.columns.as_slice())
            .unwrap_or(&self.default_columns)
    }

    /// Estimated row count of `name`, or 1000 if the table is unknown.
    pub fn row_count(&self, name: &str) -> u64 {
        self.get(name)
            .map(|table| table.rows)
            .unwrap_or(DEFAULT_ROW_COUNT)
    }
}

impl Default for TableCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TableSizes for TableCatalog {
    fn estimated_rows(&self, table: &str) -> u64 {
        self.row_count(table)
    }
}
