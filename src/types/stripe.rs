use serde::Deserialize;

/// `product` is a bare id unless the request expanded it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProductRef {
    Expanded(Product),
    Id(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Price {
    pub id: String,
    #[serde(default)]
    pub lookup_key: Option<String>,
    /// Minor currency units (cents).
    #[serde(default)]
    pub unit_amount: Option<i64>,
    pub currency: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub product: Option<ProductRef>,
}

impl Price {
    pub fn product_name(&self) -> Option<&str> {
        match self.product.as_ref()? {
            ProductRef::Expanded(p) => p.name.as_deref(),
            ProductRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceList {
    pub data: Vec<Price>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page; absent for embedded sessions.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub client_reference_id: Option<String>,
}
