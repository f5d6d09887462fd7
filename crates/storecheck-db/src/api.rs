use crate::error::VerifyError;
use crate::product::{NewProduct, ProductId};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

/// The storefront's product API.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Create a product and return the id the backend assigned to it.
    async fn create_product(&self, product: &NewProduct) -> Result<ProductId, VerifyError>;
}

/// `POST {base}/api/products` with a JSON body.
pub struct HttpProductApi {
    client: reqwest::Client,
    base: String,
}

impl HttpProductApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.into(),
        }
    }

    pub fn products_url(&self) -> String {
        format!("{}/api/products", self.base.trim_end_matches('/'))
    }
}

#[async_trait]
impl ProductApi for HttpProductApi {
    async fn create_product(&self, product: &NewProduct) -> Result<ProductId, VerifyError> {
        let url = self.products_url();
        debug!(url = %url, name = %product.name, "Creating product");

        let response = self.client.post(&url).json(product).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(VerifyError::Api {
                status: status.as_u16(),
                body,
            });
        }
        parse_created_id(&body)
    }
}

/// Extract the `id` field of a create response; numbers and strings are accepted.
pub fn parse_created_id(body: &str) -> Result<ProductId, VerifyError> {
    let value: Value =
        serde_json::from_str(body).map_err(|_| VerifyError::MissingId(body.to_string()))?;
    match value.get("id") {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(ProductId::Int)
            .ok_or_else(|| VerifyError::MissingId(body.to_string())),
        Some(Value::String(s)) if !s.is_empty() => Ok(ProductId::Text(s.clone())),
        _ => Err(VerifyError::MissingId(body.to_string())),
    }
}
