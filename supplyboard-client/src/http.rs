//! HTTP client for the upstream commerce API

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::models::{Category, Customer, Order, Product, ProductStock, Supplier, Warehouse};

/// HTTP client for the upstream commerce REST API
///
/// Every collection endpoint returns a bare JSON array.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut request = self.client.get(&url);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        tracing::debug!(url = %url, "Fetching upstream resource");
        let response = request.send().await?;
        Self::handle_response(path, response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            tracing::warn!(path = %path, status = %status, "Upstream request failed");
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(path.to_string())),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(format!("{}: {}", status, text))),
            };
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::InvalidResponse(format!("{}: {}", path, e))
        })
    }

    // ========== Commerce API ==========

    pub async fn orders(&self) -> ClientResult<Vec<Order>> {
        self.get("/api/orders").await
    }

    pub async fn products(&self) -> ClientResult<Vec<Product>> {
        self.get("/api/products").await
    }

    pub async fn customers(&self) -> ClientResult<Vec<Customer>> {
        self.get("/api/customers").await
    }

    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.get("/api/categories").await
    }

    pub async fn warehouses(&self) -> ClientResult<Vec<Warehouse>> {
        self.get("/api/warehouses").await
    }

    pub async fn suppliers(&self) -> ClientResult<Vec<Supplier>> {
        self.get("/api/suppliers").await
    }

    pub async fn products_stock(&self) -> ClientResult<Vec<ProductStock>> {
        self.get("/api/products_stock").await
    }

    pub async fn supplier_products(&self) -> ClientResult<Vec<Product>> {
        self.get("/api/supplier_products").await
    }
}
