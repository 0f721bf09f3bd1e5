use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Product with its stock counters, as listed on the stock overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStockSummary {
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub model_no: String,
    pub spec: String,
    pub manufacturer: String,
    pub stock: i64,
    pub incoming: i64,
    pub sold: i64,
    pub shipped: i64,
}

/// Product specification. `product_id` is absent when creating a new spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    pub model_no: String,
    pub category: String,
    pub product_name: String,
    pub spec: String,
    pub manufacturer: String,
}

/// A single serial-numbered item in stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStockDetail {
    pub id: i64,
    pub product_id: i64,
    pub serial_no: String,
    pub entry_time: String,
    #[serde(default)]
    pub purchase_order: Option<String>,
    #[serde(default)]
    pub sale_order: Option<String>,
    #[serde(default)]
    pub customization: Option<String>,
    #[serde(default)]
    pub customized_by: Option<String>,
    #[serde(default)]
    pub deliver_time: Option<String>,
    #[serde(default)]
    pub deliver_method: Option<String>,
    #[serde(default)]
    pub deliver_order: Option<String>,
    pub status: String,
}

/// Stock entry: serial numbers received for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub product_id: i64,
    pub sn_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_no: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Ordered,
    Shipped,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordered => "ordered",
            Self::Shipped => "shipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub order_no: String,
    pub product_id: i64,
    pub order_time: NaiveDateTime,
    pub eta: NaiveDateTime,
    pub supplier_rep: String,
    pub purchase_rep: String,
    #[serde(default)]
    pub fulfill_time: Option<NaiveDateTime>,
    pub ordered_quantity: i64,
    pub shipped_quantity: i64,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrder {
    pub order_no: String,
    pub product_id: i64,
    pub order_time: NaiveDateTime,
    pub eta: NaiveDateTime,
    pub customer_entity: String,
    pub customer_rep: String,
    pub sales_rep: String,
    #[serde(default)]
    pub fulfill_time: Option<NaiveDateTime>,
    pub ordered_quantity: i64,
    pub shipped_quantity: i64,
    pub status: OrderStatus,
}

/// Paged listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: i64,
    pub data: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            total: 0,
            data: Vec::new(),
        }
    }
}

/// Customization note attached to a stock item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customization {
    pub customization: String,
    pub customized_by: String,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserNameUpdate {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordUpdate {
    pub current_password: String,
    pub new_password: String,
}
