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

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tf_provider::serve;

mod client;
mod datadog_provider;
mod mapping;
mod resource;

use datadog_provider::{provider_fields, DatadogProvider};
use mapping::widgets::{catalog, validate_tables};

const LOG_ENV: &str = "TF_LOG_PROVIDER_DATADOG";

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the plugin handshake
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let tables = catalog()
        .validate()
        .and_then(|()| validate_tables([("provider", provider_fields())]));
    if let Err(err) = tables {
        tracing::error!(error = %err, "field tables are inconsistent");
        return Err(err);
    }

    serve("datadog", DatadogProvider::default()).await
}
