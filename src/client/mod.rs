// This file is part of the terraform-provider-datadog project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Datadog REST client.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::join_all;
use reqwest::{Method, Response};
use serde::Deserialize;
use serde_json::{json, Value as Json};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info};

mod error;

pub use error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "https://api.datadoghq.com";

/// Write lock of dashboard list membership.
pub const DASHBOARD_LIST_LOCK: &str = "dashboard_list";

const VALIDATE_PATH: &str = "/api/v1/validate";
const POLL_ATTEMPTS: usize = 3;
const POLL_DELAY: Duration = Duration::from_secs(1);

/// Client shared by the provider and its resources, set by `configure`.
pub type SharedClient = Arc<RwLock<Option<Arc<DatadogClient>>>>;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<Json>,
}

#[derive(Deserialize)]
struct ValidateBody {
    #[serde(default)]
    valid: bool,
}

pub struct DatadogClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    app_key: String,
    poll_delay: Duration,
    locks: Mutex<HashMap<&'static str, Arc<AsyncMutex<()>>>>,
}

impl std::fmt::Debug for DatadogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatadogClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl DatadogClient {
    pub fn new(api_url: &str, api_key: &str, app_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            app_key: app_key.to_owned(),
            poll_delay: POLL_DELAY,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Delay between two attempts of [`DatadogClient::poll_until_found`].
    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Serialize writes of one resource kind.
    ///
    /// Locks are created on first use and live as long as the client.
    pub async fn write_lock(&self, kind: &'static str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(kind).or_default().clone()
        };
        lock.lock_owned().await
    }

    pub async fn send(&self, method: Method, path: &str, body: Option<&Json>) -> Result<Json> {
        let url = format!("{}{}", self.api_url, path);
        debug!(%method, %url, "datadog request");
        let mut builder = self
            .http
            .request(method, &url)
            .header("DD-API-KEY", &self.api_key)
            .header("DD-APPLICATION-KEY", &self.app_key)
            .header("Accept", "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        decode(response, url).await
    }

    pub async fn get(&self, path: &str) -> Result<Json> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Json) -> Result<Json> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Json> {
        self.send(Method::DELETE, path, None).await
    }

    /// GET `path`, retrying while the API answers 404.
    ///
    /// Freshly created objects are not always readable right away.
    pub async fn poll_until_found(&self, path: &str) -> Result<Json> {
        for attempt in 1..=POLL_ATTEMPTS {
            match self.get(path).await {
                Err(err) if err.is_not_found() => {
                    debug!(attempt, path, "not readable yet");
                    if attempt < POLL_ATTEMPTS {
                        tokio::time::sleep(self.poll_delay).await;
                    }
                }
                result => return result,
            }
        }
        Err(ClientError::MaxRetriesExceeded(POLL_ATTEMPTS))
    }

    /// Check the API key against the validation endpoint.
    pub async fn validate_credentials(&self) -> Result<()> {
        let body = self.get(VALIDATE_PATH).await?;
        let validated: ValidateBody = serde_json::from_value(body)?;
        if validated.valid {
            info!(api_url = %self.api_url, "API key validated");
            Ok(())
        } else {
            Err(ClientError::InvalidResponse(
                "the API key was not reported as valid".to_owned(),
            ))
        }
    }

    /// Add a dashboard to manual dashboard lists.
    ///
    /// Failures are logged and ignored.
    pub async fn add_to_dashboard_lists(&self, dashboard_id: &str, item_type: &str, lists: &[i64]) {
        self.update_dashboard_lists(Method::POST, dashboard_id, item_type, lists)
            .await
    }

    /// Remove a dashboard from manual dashboard lists.
    ///
    /// Failures are logged and ignored.
    pub async fn remove_from_dashboard_lists(
        &self,
        dashboard_id: &str,
        item_type: &str,
        lists: &[i64],
    ) {
        self.update_dashboard_lists(Method::DELETE, dashboard_id, item_type, lists)
            .await
    }

    async fn update_dashboard_lists(
        &self,
        method: Method,
        dashboard_id: &str,
        item_type: &str,
        lists: &[i64],
    ) {
        if lists.is_empty() {
            return;
        }
        let body = json!({
            "dashboards": [{"id": dashboard_id, "type": item_type}],
        });
        let _guard = self.write_lock(DASHBOARD_LIST_LOCK).await;
        let updates = lists.iter().map(|list_id| {
            let path = format!("/api/v2/dashboard/lists/manual/{list_id}/dashboards");
            let method = method.clone();
            let body = &body;
            async move {
                if let Err(err) = self.send(method.clone(), &path, Some(body)).await {
                    debug!(list_id, dashboard_id, %method, error = %err, "dashboard list update failed");
                }
            }
        });
        join_all(updates).await;
    }
}

async fn decode(response: Response, url: String) -> Result<Json> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound { url });
    }
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::Api {
            status: status.as_u16(),
            url,
            message: error_message(text),
        });
    }
    if text.trim().is_empty() {
        return Ok(Json::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Datadog reports errors as `{"errors": [...]}`; anything else is passed through.
fn error_message(body: String) -> String {
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .iter()
            .map(|err| match err {
                Json::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => body,
    }
}
