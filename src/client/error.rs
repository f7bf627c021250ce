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

//! Errors of the Datadog HTTP client.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-success response other than 404.
    #[error("API error ({status}) at {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resource not found at {url}")]
    NotFound { url: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Could not decode response: {0}")]
    Serde(#[from] serde_json::Error),

    /// A resource was used before the provider was configured.
    #[error("The Datadog provider is not configured")]
    NotConfigured,

    #[error("Resource still not found after {0} attempts")]
    MaxRetriesExceeded(usize),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
