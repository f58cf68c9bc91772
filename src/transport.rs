//! The one place that touches the network.
//!
//! Each method performs exactly one HTTP round trip; there are no retries
//! anywhere in this crate. Builders and the normalizer never see I/O.

use std::time::Duration;

use reqwest::Client as ReqwestClient;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use url::Url;

use crate::Result;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Clone, Debug)]
pub(crate) struct Transport {
    client: ReqwestClient,
}

impl Transport {
    pub(crate) fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub(crate) fn with_client(client: ReqwestClient) -> Self {
        Self { client }
    }

    pub(crate) async fn get_text(&self, mut url: Url, query: &[(&str, String)]) -> Result<String> {
        for (name, value) in query {
            url.query_pairs_mut().append_pair(name, value);
        }
        let response = self.client.get(url).send().await?;
        Ok(response.text().await?)
    }

    pub(crate) async fn post_form_text(&self, url: Url, form: &impl Serialize) -> Result<String> {
        Ok(self.post_form(url, form).await?.text().await?)
    }

    pub(crate) async fn post_form_bytes(
        &self,
        url: Url,
        form: &impl Serialize,
    ) -> Result<Vec<u8>> {
        Ok(self.post_form(url, form).await?.bytes().await?.to_vec())
    }

    async fn post_form(&self, url: Url, form: &impl Serialize) -> Result<reqwest::Response> {
        let body = serde_html_form::to_string(form)?;
        Ok(self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?)
    }

    pub(crate) async fn post_json(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<serde_json::Value> {
        let response = self.client.post(url).json(body).send().await?;
        Ok(response.json().await?)
    }
}
