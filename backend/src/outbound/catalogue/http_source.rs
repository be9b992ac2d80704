//! Reqwest-backed product source.
//!
//! Calls `GET {base}/products/{id}` once per lookup. A 404 is the only answer
//! treated as definitive absence.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};

use super::dto::ProductDto;
use crate::domain::ports::{ProductSource, ProductSourceError};
use crate::domain::{Product, ProductId};
use crate::outbound::upstream::{
    SuccessEnvelope, UpstreamClientError, client_with_timeout, endpoint, status_message,
};

/// Product source calling the catalogue service over HTTP.
pub struct HttpProductSource {
    client: Client,
    base_url: Url,
}

impl HttpProductSource {
    /// Build a source for the catalogue rooted at `base_url`. `timeout`
    /// bounds each individual attempt.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or
    /// `base_url` cannot carry a path.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, UpstreamClientError> {
        // Fail at start-up rather than on the first lookup.
        endpoint(base_url, &["products"])?;
        Ok(Self {
            client: client_with_timeout(timeout)?,
            base_url: base_url.clone(),
        })
    }

    fn product_url(&self, id: ProductId) -> Result<Url, ProductSourceError> {
        endpoint(&self.base_url, &["products", &id.to_string()])
            .map_err(|err| ProductSourceError::transport(err.to_string()))
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    async fn fetch_product(&self, id: ProductId) -> Result<Product, ProductSourceError> {
        let response = self
            .client
            .get(self.product_url(id)?)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(id, status, body.as_ref()));
        }
        parse_product(body.as_ref())
    }
}

fn parse_product(body: &[u8]) -> Result<Product, ProductSourceError> {
    let envelope: SuccessEnvelope<ProductDto> = serde_json::from_slice(body).map_err(|error| {
        ProductSourceError::decode(format!("invalid catalogue payload: {error}"))
    })?;
    envelope
        .data
        .into_domain()
        .map_err(ProductSourceError::decode)
}

fn map_transport_error(error: reqwest::Error) -> ProductSourceError {
    if error.is_timeout() {
        ProductSourceError::timeout(error.to_string())
    } else {
        ProductSourceError::transport(error.to_string())
    }
}

fn map_status_error(id: ProductId, status: StatusCode, body: &[u8]) -> ProductSourceError {
    if status == StatusCode::NOT_FOUND {
        return ProductSourceError::not_found(id);
    }
    ProductSourceError::status(status_message(status, body))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network catalogue mapping helpers.

    use rstest::rstest;

    use super::*;

    fn id(raw: i32) -> ProductId {
        ProductId::new(raw).expect("valid id")
    }

    #[rstest]
    fn decodes_the_success_envelope() {
        let body = r#"{"SuccesData":{"id":10,"name":"Kettle","price":39.9,"stock":12}}"#;

        let product = parse_product(body.as_bytes()).expect("payload decodes");

        assert_eq!(
            product,
            Product {
                id: id(10),
                name: "Kettle".to_owned(),
                price: 39.9,
                stock: 12,
            }
        );
    }

    #[rstest]
    #[case(r#"{"SuccesData":{"id":10,"name":"Kettle"}}"#)]
    #[case(r#"{"SuccesData":{"id":-1,"name":"Kettle","price":1.0,"stock":1}}"#)]
    #[case("not json")]
    fn undecodable_payloads_are_decode_errors(#[case] body: &str) {
        let error = parse_product(body.as_bytes()).expect_err("payload is rejected");
        assert!(matches!(error, ProductSourceError::Decode { .. }));
    }

    #[rstest]
    fn not_found_is_definitive() {
        let error = map_status_error(id(5), StatusCode::NOT_FOUND, b"");
        assert_eq!(error, ProductSourceError::not_found(id(5)));
        assert!(!error.is_retryable());
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(StatusCode::BAD_GATEWAY)]
    fn other_statuses_are_retryable(#[case] status: StatusCode) {
        let error = map_status_error(id(5), status, b"upstream hiccup");
        assert!(matches!(error, ProductSourceError::Status { .. }));
        assert!(error.is_retryable());
    }

    #[rstest]
    fn product_urls_append_the_id() {
        let base = Url::parse("http://catalogue.internal:8081/api").expect("valid url");
        let source = HttpProductSource::new(&base, Duration::from_secs(5)).expect("client builds");
        assert_eq!(
            source.product_url(id(77)).expect("url").as_str(),
            "http://catalogue.internal:8081/api/products/77"
        );
    }
}
