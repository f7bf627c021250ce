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

use async_trait::async_trait;
use tracing::{debug, info, warn};

use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{schema::Schema, AttributePath, Diagnostics, Resource};

use crate::client::SharedClient;
use crate::mapping::field::FieldSpec;
use crate::mapping::plan::normalize_object;
use crate::mapping::validate::validate_object;
use crate::mapping::value::{object, string};
use crate::mapping::{FieldPath, Object, TfValue, TfValueExt};

use super::{as_object_mut, connected, state_id, ApiDocument};

#[derive(Debug, Default)]
pub struct DatadogResource<T: ApiDocument> {
    pub(super) client: SharedClient,
    pub(super) document: T,
}

impl<T: ApiDocument> DatadogResource<T> {
    pub fn new(client: SharedClient) -> Self {
        Self {
            client,
            document: T::default(),
        }
    }
}

/// Top level attributes whose change forces a new resource.
fn replaced(fields: &[FieldSpec], prior: &Object, planned: &Object) -> Vec<AttributePath> {
    fields
        .iter()
        .filter(|field| field.force_new && prior.get(field.hcl_key) != planned.get(field.hcl_key))
        .map(|field| AttributePath::new(field.hcl_key))
        .collect()
}

#[async_trait]
impl<T: ApiDocument> Resource for DatadogResource<T> {
    type State<'a> = TfValue;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(self.document.schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        // The whole configuration may be unknown during plan
        if let Some(config) = config.as_object() {
            for err in validate_object(self.document.fields(), config, &FieldPath::root()) {
                err.report(diags, "Invalid configuration");
            }
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let id = state_id(diags, &state)?;
        let client = connected(diags, &self.client).await?;

        match client.get(&self.document.item_path(&id)).await {
            Ok(doc) => match self.document.flatten(&doc, state.as_object()) {
                Ok(read) => Some((object(read), private_state)),
                Err(err) => {
                    err.report(diags, &format!("Failed to read {} response", T::NAME));
                    None
                }
            },
            Err(err) if err.is_not_found() => {
                warn!(%id, kind = T::NAME, "resource no longer exists, removing it from state");
                Some((Value::Null, private_state))
            }
            Err(err) => {
                diags.root_error(format!("Failed to read {}", T::NAME), err.to_string());
                None
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        if let Some(planned) = as_object_mut(&mut state) {
            normalize_object(self.document.fields(), planned);
            planned.insert("id".to_owned(), Value::Unknown);
            self.document.plan(planned, None);
        }

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<tf_provider::AttributePath>,
    )> {
        let mut state = proposed_state;
        let mut trigger_replace = Vec::new();
        if let Some(planned) = as_object_mut(&mut state) {
            normalize_object(self.document.fields(), planned);
            self.document.plan(planned, prior_state.as_object());
            if let Some(prior) = prior_state.as_object() {
                trigger_replace = replaced(self.document.fields(), prior, planned);
            }
        }

        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let planned = planned_state.as_object().cloned().unwrap_or_default();
        let body = match self.document.build(&planned) {
            Ok(body) => body,
            Err(err) => {
                err.report(diags, &format!("Failed to build {} request", T::NAME));
                return None;
            }
        };
        let client = connected(diags, &self.client).await?;

        let created = match client.post(T::COLLECTION, &body).await {
            Ok(created) => created,
            Err(err) => {
                diags.root_error(format!("Failed to create {}", T::NAME), err.to_string());
                return None;
            }
        };
        let id = match self.document.id(&created) {
            Ok(id) => id,
            Err(err) => {
                err.report(diags, &format!("Failed to read {} response", T::NAME));
                return None;
            }
        };
        info!(%id, kind = T::NAME, "created");

        let doc = match client.poll_until_found(&self.document.item_path(&id)).await {
            Ok(doc) => doc,
            Err(err) => {
                diags.root_error(
                    format!("Failed to read {} after creation", T::NAME),
                    err.to_string(),
                );
                return None;
            }
        };

        self.document.after_write(&client, &id, &planned).await;

        match self.document.flatten(&doc, Some(&planned)) {
            Ok(state) => Some((object(state), private_state)),
            Err(err) => {
                err.report(diags, &format!("Failed to read {} response", T::NAME));
                None
            }
        }
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let id = state_id(diags, &prior_state)?;
        let planned = planned_state.as_object().cloned().unwrap_or_default();
        let body = match self.document.build(&planned) {
            Ok(body) => body,
            Err(err) => {
                err.report(diags, &format!("Failed to build {} request", T::NAME));
                return None;
            }
        };
        let client = connected(diags, &self.client).await?;

        let path = self.document.item_path(&id);
        let updated = match client
            .send(self.document.update_method(), &path, Some(&body))
            .await
        {
            Ok(updated) => updated,
            Err(err) => {
                diags.root_error(format!("Failed to update {}", T::NAME), err.to_string());
                return None;
            }
        };
        info!(%id, kind = T::NAME, "updated");

        self.document.after_write(&client, &id, &planned).await;

        match self.document.flatten(&updated, Some(&planned)) {
            Ok(state) => Some((object(state), private_state)),
            Err(err) => {
                err.report(diags, &format!("Failed to read {} response", T::NAME));
                None
            }
        }
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let id = state_id(diags, &state)?;
        let client = connected(diags, &self.client).await?;

        match client.delete(&self.document.item_path(&id)).await {
            Ok(_) => {
                info!(%id, kind = T::NAME, "deleted");
                Some(())
            }
            Err(err) if err.is_not_found() => {
                debug!(%id, kind = T::NAME, "already deleted");
                Some(())
            }
            Err(err) => {
                diags.root_error(format!("Failed to delete {}", T::NAME), err.to_string());
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = Object::new();
        state.insert("id".to_owned(), string(id));
        Some((object(state), Default::default()))
    }
}
