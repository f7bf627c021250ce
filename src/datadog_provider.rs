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

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::info;

use tf_provider::value::{Value, ValueEmpty};
use tf_provider::schema::Schema;
use tf_provider::{map, AttributePath, Diagnostics, Provider};

use crate::client::{DatadogClient, SharedClient, DEFAULT_API_URL};
use crate::mapping::field::FieldSpec;
use crate::mapping::schema;
use crate::resource::{Dashboard, DatadogResource, Powerpack};

const API_KEY_ENV: &str = "DD_API_KEY";
const APP_KEY_ENV: &str = "DD_APP_KEY";
const API_URL_ENV: &str = "DD_HOST";

fn fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("api_key")
            .sensitive()
            .describe("(Required unless validate is false) Datadog API key. This can also be set via the DD_API_KEY environment variable."),
        FieldSpec::string("app_key")
            .sensitive()
            .describe("(Required unless validate is false) Datadog APP key. This can also be set via the DD_APP_KEY environment variable."),
        FieldSpec::string("api_url").describe("The API URL. This can also be set using the DD_HOST environment variable. Note that this URL must not end with the `/api/` path. For example, `https://api.datadoghq.com/` is a correct value, while `https://api.datadoghq.com/api/` is not."),
        FieldSpec::bool("validate").describe("Enables validation of the provided API key during provider initialization. Valid values are [`true`, `false`]. Default is true. When false, api_key won't be checked."),
    ]
}

lazy_static! {
    static ref FIELDS: Vec<FieldSpec> = fields();
}

pub fn provider_fields() -> &'static [FieldSpec] {
    &FIELDS
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatadogConfig {
    #[serde(default)]
    pub api_key: Value<String>,
    #[serde(default)]
    pub app_key: Value<String>,
    #[serde(default)]
    pub api_url: Value<String>,
    #[serde(default)]
    pub validate: Value<bool>,
}

/// Configured value, or the environment fallback.
fn setting(value: &Value<String>, env: Option<String>) -> Option<String> {
    match value {
        Value::Value(value) if !value.is_empty() => Some(value.clone()),
        _ => env.filter(|value| !value.is_empty()),
    }
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[derive(Debug, Default, Clone)]
pub struct DatadogProvider {
    client: SharedClient,
}

impl DatadogProvider {
    async fn connect(
        &self,
        diags: &mut Diagnostics,
        config: &DatadogConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<()> {
        let api_key = setting(&config.api_key, env(API_KEY_ENV));
        let app_key = setting(&config.app_key, env(APP_KEY_ENV));
        let api_url = setting(&config.api_url, env(API_URL_ENV))
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());

        for (key, value, var) in [
            ("api_key", &api_key, API_KEY_ENV),
            ("app_key", &app_key, APP_KEY_ENV),
        ] {
            if value.is_none() {
                diags.error(
                    format!("Missing `{key}`"),
                    format!("Set `{key}` in the provider configuration or the {var} environment variable."),
                    AttributePath::new(key),
                );
            }
        }
        let (Some(api_key), Some(app_key)) = (api_key, app_key) else {
            return None;
        };

        let client = match DatadogClient::new(&api_url, &api_key, &app_key) {
            Ok(client) => client,
            Err(err) => {
                diags.root_error("Failed to build the Datadog client", err.to_string());
                return None;
            }
        };
        if !matches!(config.validate, Value::Value(false)) {
            if let Err(err) = client.validate_credentials().await {
                diags.error(
                    "Invalid Datadog credentials",
                    err.to_string(),
                    AttributePath::new("api_key"),
                );
                return None;
            }
        }

        info!(%api_url, "Datadog client configured");
        *self.client.write().await = Some(Arc::new(client));
        Some(())
    }
}

#[async_trait]
impl Provider for DatadogProvider {
    type Config<'a> = DatadogConfig;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: schema::block(&FIELDS, "datadog"),
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        if let Value::Value(url) = &config.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                diags.error(
                    "Invalid `api_url`",
                    format!("`{url}` is not an http(s) URL."),
                    AttributePath::new("api_url"),
                );
            } else if url.trim_end_matches('/').ends_with("/api") {
                diags.error(
                    "Invalid `api_url`",
                    "The URL must not end with the `/api/` path.",
                    AttributePath::new("api_url"),
                );
            }
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        info!(%terraform_version, "configuring the Datadog provider");
        self.connect(diags, &config, env).await
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn tf_provider::DynamicResource>>> {
        Some(map! {
            "datadog_dashboard_v2" => DatadogResource::<Dashboard>::new(self.client.clone()),
            "datadog_powerpack_v2" => DatadogResource::<Powerpack>::new(self.client.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn tf_provider::DynamicDataSource>>> {
        Some(HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::mapping::widgets::validate_tables;

    #[test]
    fn provider_table_is_consistent() {
        validate_tables([("provider", provider_fields())]).unwrap();
    }

    fn config(api_url: &str, validate: bool) -> DatadogConfig {
        DatadogConfig {
            api_key: Value::Value("api-key".to_owned()),
            app_key: Value::Null,
            api_url: Value::Value(api_url.to_owned()),
            validate: Value::Value(validate),
        }
    }

    #[test]
    fn settings_fall_back_to_environment() {
        assert_eq!(
            setting(&Value::Value("set".to_owned()), Some("env".to_owned())),
            Some("set".to_owned())
        );
        assert_eq!(
            setting(&Value::Null, Some("env".to_owned())),
            Some("env".to_owned())
        );
        assert_eq!(setting(&Value::Value(String::new()), None), None);
        assert_eq!(setting(&Value::Null, Some(String::new())), None);
    }

    #[tokio::test]
    async fn configure_validates_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/validate"))
            .and(header("DD-APPLICATION-KEY", "app-from-env"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
            .expect(1)
            .mount(&server)
            .await;

        let provider = DatadogProvider::default();
        let mut diags = Diagnostics::default();
        let env = |name: &str| (name == APP_KEY_ENV).then(|| "app-from-env".to_owned());
        provider
            .connect(&mut diags, &config(&server.uri(), true), env)
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        let client = provider.client.read().await.clone().unwrap();
        assert_eq!(client.api_url(), server.uri());
    }

    #[tokio::test]
    async fn missing_keys_are_reported() {
        let provider = DatadogProvider::default();
        let mut diags = Diagnostics::default();
        let connected = provider
            .connect(&mut diags, &config("https://api.datadoghq.eu", false), |_| None)
            .await;
        assert!(connected.is_none());
        assert_eq!(diags.errors.len(), 1);
        assert!(provider.client.read().await.is_none());
    }

    #[tokio::test]
    async fn api_url_must_be_a_base_url() {
        let provider = DatadogProvider::default();
        let mut diags = Diagnostics::default();
        let valid = provider
            .validate(&mut diags, config("https://api.datadoghq.com/api/", false))
            .await;
        assert!(valid.is_none());

        let mut diags = Diagnostics::default();
        let valid = provider
            .validate(&mut diags, config("https://api.datadoghq.eu/", false))
            .await;
        assert!(valid.is_some());
    }

    #[test]
    fn both_resources_are_served() {
        let provider = DatadogProvider::default();
        let mut diags = Diagnostics::default();
        let resources = provider.get_resources(&mut diags).unwrap();
        assert!(resources.contains_key("datadog_dashboard_v2"));
        assert!(resources.contains_key("datadog_powerpack_v2"));
        let schema = provider.schema(&mut diags).unwrap();
        assert!(schema.block.attributes["api_key"].sensitive);
    }
}
