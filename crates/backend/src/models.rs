//! Response payloads and query parameters for the backend routes.

use serde::{Deserialize, Serialize};

pub const SERVICE_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

impl Health {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: SERVICE_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// `GET /products` body. The `value` envelope matches OData-style list responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductList {
    pub value: Vec<Product>,
}

impl ProductList {
    #[must_use]
    pub fn catalog() -> Self {
        Self {
            value: vec![
                Product {
                    id: 1,
                    name: "Laptop".to_string(),
                    price: 1299.99,
                },
                Product {
                    id: 2,
                    name: "Phone".to_string(),
                    price: 699.00,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub cart_id: i64,
    pub user_id: i64,
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartList {
    pub carts: Vec<Cart>,
}

impl CartList {
    /// The single fixed cart, owned by whichever user asked for it.
    #[must_use]
    pub fn for_user(user_id: i64) -> Self {
        Self {
            carts: vec![Cart {
                cart_id: 1,
                user_id,
                items: vec![
                    CartItem {
                        product_id: 1,
                        quantity: 2,
                    },
                    CartItem {
                        product_id: 2,
                        quantity: 1,
                    },
                ],
            }],
        }
    }
}

fn default_id() -> i64 {
    1
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProductsQuery {
    #[serde(default = "default_id")]
    pub channel_id: i64,
    #[serde(default = "default_id")]
    pub catalog_id: i64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CartsQuery {
    #[serde(default = "default_id")]
    pub user_id: i64,
}
