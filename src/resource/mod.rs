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

//! Terraform resources backed by one Datadog REST collection.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value as Json;
use tf_provider::schema::Schema;
use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics};

use crate::client::{ClientError, DatadogClient, SharedClient};
use crate::mapping::field::FieldSpec;
use crate::mapping::value::Node;
use crate::mapping::{MappingError, Object, TfValue, TfValueExt};

mod dashboard;
mod datadog_resource;
mod powerpack;

pub use dashboard::Dashboard;
pub use datadog_resource::DatadogResource;
pub use powerpack::Powerpack;

/// A Datadog document managed through create/get/update/delete calls.
#[async_trait]
pub trait ApiDocument: Send + Sync + 'static + Default + Debug {
    /// Name used in diagnostics and logs.
    const NAME: &'static str;
    /// Collection path; items live at `<COLLECTION>/<id>`.
    const COLLECTION: &'static str;

    fn update_method(&self) -> Method;

    fn schema(&self) -> Schema;

    fn fields(&self) -> &'static [FieldSpec];

    /// Request body of a create or update.
    fn build(&self, state: &Object) -> Result<Json, MappingError>;

    /// Id of the document in a create response.
    fn id(&self, doc: &Json) -> Result<String, MappingError>;

    /// State of a document. `prior` holds the attributes the API does not return.
    fn flatten(&self, doc: &Json, prior: Option<&Object>) -> Result<Object, MappingError>;

    /// Adjust a planned state once defaults are filled. `prior` is `None` on create.
    fn plan(&self, _planned: &mut Object, _prior: Option<&Object>) {}

    /// Side writes after the document itself was written.
    async fn after_write(&self, _client: &DatadogClient, _id: &str, _planned: &Object) {}

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", Self::COLLECTION, id)
    }
}

pub(crate) fn as_object_mut(state: &mut TfValue) -> Option<&mut Object> {
    match state {
        Value::Value(Node::Object(obj)) => Some(obj),
        _ => None,
    }
}

/// `id` of a known state.
pub(crate) fn state_id(diags: &mut Diagnostics, state: &TfValue) -> Option<String> {
    match state
        .as_object()
        .and_then(|obj| obj.get("id"))
        .and_then(TfValueExt::as_str)
    {
        Some(id) if !id.is_empty() => Some(id.to_owned()),
        _ => {
            diags.error_short("Resource has no id", AttributePath::new("id"));
            None
        }
    }
}

pub(crate) async fn connected(
    diags: &mut Diagnostics,
    client: &SharedClient,
) -> Option<Arc<DatadogClient>> {
    let client = client.read().await.clone();
    if client.is_none() {
        diags.root_error(
            "Datadog client unavailable",
            ClientError::NotConfigured.to_string(),
        );
    }
    client
}
