//! networking module
//! function:
//! - resolve the heartbeat base address from settings, full url wins over host + port
//! - non 2xx responses and undecodable bodies both surface as TerminalClientError
//! - the remote speaks plain json bodies, no envelope

use std::time::Duration;
use super::setting::Settings;
use lazy_static::lazy_static;
use serde::Serialize;
use serde::de::DeserializeOwned;
use super::error::{TerminalClientError, ClientErrorCode};

const REQUEST_TIMEOUT_SECS: u64 = 10;

lazy_static! {
    static ref SETTINGS: &'static Settings = Settings::get();
    static ref BASEURL: String = SETTINGS.base_url();
    static ref CLIENT: reqwest::Client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .expect("cannot build http client");
}

/// wrapper for get api
pub async fn api_get<T: DeserializeOwned>(api_url: &str) -> Result<T, TerminalClientError> {
    let resp = CLIENT
        .get(format!("{}/{}", BASEURL.as_str(), api_url).as_str())
        .send()
        .await
        .map_err(|e| TerminalClientError {
            code: ClientErrorCode::HttpError,
            msg: format!("http get {} failed: {}", api_url, e),
        })?;
    decode_response(api_url, resp).await
}

/// wrapper for post api, body is serialized to json
pub async fn api_post<B: Serialize, T: DeserializeOwned>(api_url: &str, data: &B) -> Result<T, TerminalClientError> {
    let resp = CLIENT
        .post(format!("{}/{}", BASEURL.as_str(), api_url).as_str())
        .json(data)
        .send()
        .await
        .map_err(|e| TerminalClientError {
            code: ClientErrorCode::HttpError,
            msg: format!("http post {} failed: {}", api_url, e),
        })?;
    decode_response(api_url, resp).await
}

async fn decode_response<T: DeserializeOwned>(api_url: &str, resp: reqwest::Response) -> Result<T, TerminalClientError> {
    let resp = resp.error_for_status().map_err(|e| TerminalClientError {
        code: ClientErrorCode::HttpError,
        msg: format!("remote returned error status for {}: {}", api_url, e),
    })?;
    resp.json::<T>().await.map_err(|e| TerminalClientError {
        code: ClientErrorCode::PayloadError,
        msg: format!("cannot decode response of {}: {}", api_url, e),
    })
}
