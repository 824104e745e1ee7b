use anyhow::Result;
use reqwest::{header, Client, Method, StatusCode, Url};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::models::*;
use crate::visualize::{Image, ImageFormat};

/// HTTP client for a running element registry
pub struct RegistryClient {
    base_url: String,
    client: Client,
}

impl RegistryClient {
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of one element, with the id percent-encoded as a single path segment
    fn element_url(&self, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("'{}' cannot be used as a base URL", self.base_url))?
            .pop_if_empty()
            .push("element")
            .push(id);
        Ok(url)
    }

    /// Send an arbitrary request and return the status with the decoded JSON body.
    /// Bodies that are not JSON decode to `Value::Null`.
    pub async fn invoke(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, self.url(endpoint));
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        Ok((status, serde_json::from_slice(&bytes).unwrap_or(Value::Null)))
    }

    /// Remove all elements
    pub async fn clear_elements(&self) -> Result<()> {
        let resp = self.client.delete(self.url("/elements")).send().await?;
        expect_status(resp.status(), StatusCode::OK, "DELETE /elements")?;
        Ok(())
    }

    /// List all elements
    pub async fn get_elements(&self) -> Result<Vec<Element>> {
        let resp = self.client.get(self.url("/elements")).send().await?;
        expect_status(resp.status(), StatusCode::OK, "GET /elements")?;
        let list: ElementList = resp.json().await?;
        Ok(list.elements)
    }

    /// Add one element; None if the id already exists
    pub async fn add_element(&self, element: &Element) -> Result<Option<String>> {
        let resp = self
            .client
            .post(self.url("/element"))
            .json(element)
            .send()
            .await?;
        if resp.status() == StatusCode::BAD_REQUEST {
            return Ok(None);
        }
        expect_status(resp.status(), StatusCode::CREATED, "POST /element")?;

        let mut paths: BTreeMap<String, String> = resp.json().await?;
        paths
            .remove(&element.id)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("POST /element response is missing '{}'", element.id))
    }

    /// Bulk upsert elements; None if the registry processed nothing
    pub async fn upload_elements(
        &self,
        elements: &[Element],
    ) -> Result<Option<BTreeMap<String, String>>> {
        let resp = self
            .client
            .post(self.url("/elements"))
            .json(elements)
            .send()
            .await?;
        if resp.status() == StatusCode::FORBIDDEN {
            return Ok(None);
        }
        expect_status(resp.status(), StatusCode::CREATED, "POST /elements")?;
        Ok(Some(resp.json().await?))
    }

    /// Replace an existing element; false if it does not exist
    pub async fn update_element(&self, element: &Element) -> Result<bool> {
        let resp = self
            .client
            .put(self.element_url(&element.id)?)
            .json(element)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        expect_status(resp.status(), StatusCode::OK, "PUT /element")?;
        Ok(true)
    }

    /// Fetch one element; None if it does not exist
    pub async fn get_element(&self, id: &str) -> Result<Option<Element>> {
        let resp = self.client.get(self.element_url(id)?).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        expect_status(resp.status(), StatusCode::OK, "GET /element")?;
        Ok(Some(resp.json().await?))
    }

    /// Delete one element; false if it does not exist
    pub async fn delete_element(&self, id: &str) -> Result<bool> {
        let resp = self.client.delete(self.element_url(id)?).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        expect_status(resp.status(), StatusCode::OK, "DELETE /element")?;
        Ok(true)
    }

    /// Fetch the visualization; the content type must be PNG or JPEG
    pub async fn get_image(&self) -> Result<Image> {
        let resp = self.client.get(self.url("/image")).send().await?;
        expect_status(resp.status(), StatusCode::OK, "GET /image")?;

        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let format = ImageFormat::from_content_type(&content_type).ok_or_else(|| {
            anyhow::anyhow!("GET /image returned invalid Content-Type '{}'", content_type)
        })?;

        let bytes = resp.bytes().await?.to_vec();
        Ok(Image { format, bytes })
    }
}

fn expect_status(actual: StatusCode, expected: StatusCode, request: &str) -> Result<()> {
    if actual != expected {
        return Err(anyhow::anyhow!("{} returned {}", request, actual.as_u16()));
    }
    Ok(())
}
