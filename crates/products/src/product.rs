use serde::{Deserialize, Serialize};

use marketerp_core::{AggregateRoot, DomainError, DomainResult};

marketerp_core::uuid_newtype!(
    /// Product identifier.
    ProductId,
    "ProductId"
);

/// Aggregate root: Product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    sku: Option<String>,
    image_url: Option<String>,
    /// List price in the smallest currency unit (informational; sales carry their own prices).
    list_price: Option<u64>,
    version: u64,
}

impl Product {
    pub fn register(id: ProductId, cmd: &RegisterProduct) -> DomainResult<Self> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_argument("product name cannot be empty"));
        }
        Ok(Self {
            id,
            name: name.to_string(),
            sku: non_blank(cmd.sku.as_deref()),
            image_url: non_blank(cmd.image_url.as_deref()),
            list_price: cmd.list_price,
            version: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn list_price(&self) -> Option<u64> {
        self.list_price
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;
    const KIND: &'static str = "product";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

/// Command: RegisterProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterProduct {
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub list_price: Option<u64>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(name: &str) -> RegisterProduct {
        RegisterProduct {
            name: name.to_string(),
            sku: Some("  SKU-1 ".to_string()),
            image_url: Some("   ".to_string()),
            list_price: Some(1_250),
        }
    }

    #[test]
    fn register_trims_fields_and_drops_blank_optionals() {
        let product = Product::register(ProductId::new(), &cmd("  Arroz 1kg ")).unwrap();
        assert_eq!(product.name(), "Arroz 1kg");
        assert_eq!(product.sku(), Some("SKU-1"));
        assert_eq!(product.image_url(), None);
        assert_eq!(product.version(), 0);
    }

    #[test]
    fn register_rejects_blank_name() {
        let err = Product::register(ProductId::new(), &cmd("  ")).unwrap_err();
        match err {
            DomainError::InvalidArgument(msg) if msg.contains("name") => {}
            _ => panic!("Expected InvalidArgument for blank name"),
        }
    }
}
