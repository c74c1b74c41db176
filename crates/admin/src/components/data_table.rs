//! Data table component types.
//!
//! These types define the configuration for the admin panel's entity
//! tables; the templates render headers, search box, and empty state
//! from them.

/// Column definition for a data table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
}

impl TableColumn {
    /// Create a new column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Search placeholder text.
    pub search_placeholder: String,
    /// Title for empty state.
    pub empty_title: String,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            search_placeholder: "Search...".to_string(),
            empty_title: "No items found".to_string(),
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = placeholder.to_string();
        self
    }

    /// Set empty state title.
    #[must_use]
    pub fn empty_title(mut self, title: &str) -> Self {
        self.empty_title = title.to_string();
        self
    }
}

/// Build the products table configuration.
#[must_use]
pub fn products_table_config() -> DataTableConfig {
    DataTableConfig::new("products")
        .column(TableColumn::new("name", "Product"))
        .column(TableColumn::new("price", "Price"))
        .column(TableColumn::new("stock", "Stock"))
        .column(TableColumn::new("status", "Status"))
        .column(TableColumn::new("actions", "Actions"))
        .search_placeholder("Filter this page by name...")
        .empty_title("No products found")
}

/// Build the users table configuration.
#[must_use]
pub fn users_table_config() -> DataTableConfig {
    DataTableConfig::new("users")
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::new("email", "Email"))
        .column(TableColumn::new("role", "Role"))
        .column(TableColumn::new("status", "Status"))
        .column(TableColumn::new("actions", "Actions"))
        .search_placeholder("Filter this page by name...")
        .empty_title("No users found")
}
