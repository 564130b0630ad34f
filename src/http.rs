// HTTP client wrapper.
// Sends GET/POST requests, decodes JSON, and turns non-2xx responses into errors.

use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{DatekitError, Result};

/// Shared HTTP client. Cloning is cheap; the connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("datekit/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }

    /// GET a URL with query parameters and decode the JSON body.
    pub async fn get_json<Q, T>(&self, url: &str, params: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        decode(check_response(response).await?).await
    }

    /// POST a JSON body with extra headers and decode the JSON response.
    pub async fn post_json<B, T>(&self, url: &str, headers: HeaderMap, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        decode(check_response(response).await?).await
    }
}

// Request URLs may carry credentials, so they are stripped from every error.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    Ok(response.json().await.map_err(reqwest::Error::without_url)?)
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(DatekitError::Status {
        status,
        body: response.text().await.unwrap_or_default(),
    })
}
