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
use reqwest::Method;
use serde_json::Value as Json;
use tf_provider::schema::Schema;

use crate::mapping::dashboard::plan_widget_ids;
use crate::mapping::field::FieldSpec;
use crate::mapping::powerpack::{self, POWERPACK_PATH};
use crate::mapping::{MappingError, Object};

use super::ApiDocument;

#[derive(Debug, Default, Clone, Copy)]
pub struct Powerpack;

#[async_trait]
impl ApiDocument for Powerpack {
    const NAME: &'static str = "powerpack";
    const COLLECTION: &'static str = POWERPACK_PATH;

    fn update_method(&self) -> Method {
        Method::PATCH
    }

    fn schema(&self) -> Schema {
        powerpack::schema()
    }

    fn fields(&self) -> &'static [FieldSpec] {
        powerpack::powerpack_fields()
    }

    fn build(&self, state: &Object) -> Result<Json, MappingError> {
        powerpack::build_powerpack(state)
    }

    fn id(&self, doc: &Json) -> Result<String, MappingError> {
        powerpack::parse_envelope(doc).map(|(id, _)| id)
    }

    fn flatten(&self, doc: &Json, _prior: Option<&Object>) -> Result<Object, MappingError> {
        powerpack::flatten_powerpack(doc)
    }

    fn plan(&self, planned: &mut Object, prior: Option<&Object>) {
        plan_widget_ids(planned, prior, "widget");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use tf_provider::value::Value;
    use tf_provider::{Diagnostics, Resource};
    use tokio::sync::RwLock;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::client::DatadogClient;
    use crate::mapping::value::{list, object, single_block, string};
    use crate::mapping::TfValueExt;
    use crate::resource::DatadogResource;

    const ID: &str = "d9d1fd26-b6cd-11ee-93c4-da7ad0900002";

    fn resource(server: &MockServer) -> DatadogResource<Powerpack> {
        let client = DatadogClient::new(&server.uri(), "api-key", "app-key")
            .unwrap()
            .with_poll_delay(Duration::ZERO);
        DatadogResource::new(Arc::new(RwLock::new(Some(Arc::new(client)))))
    }

    fn planned(name: &str) -> Object {
        let mut definition = Object::new();
        definition.insert("text".into(), string("Powerpack text"));
        let mut widget = Object::new();
        widget.insert("free_text_definition".into(), single_block(definition));
        let mut state = Object::new();
        state.insert("name".into(), string(name));
        state.insert("tags".into(), list(vec![string("tag:foo1")]));
        state.insert("widget".into(), list(vec![object(widget)]));
        state
    }

    fn envelope(name: &str) -> Json {
        json!({
            "data": {
                "id": ID,
                "type": "powerpack",
                "attributes": {
                    "name": name,
                    "tags": ["tag:foo1"],
                    "template_variables": [],
                    "group_widget": {
                        "definition": {
                            "type": "group",
                            "layout_type": "ordered",
                            "title": name,
                            "show_title": true,
                            "widgets": [
                                {"definition": {"type": "free_text", "text": "Powerpack text"}}
                            ]
                        }
                    }
                }
            }
        })
    }

    #[tokio::test]
    async fn create_and_update_use_json_api_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/powerpacks"))
            .and(body_partial_json(json!({
                "data": {"type": "powerpack", "attributes": {"name": "Sample"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope("Sample")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/api/v2/powerpacks/{ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope("Sample")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path(format!("/api/v2/powerpacks/{ID}")))
            .and(body_partial_json(json!({
                "data": {"attributes": {"group_widget": {"definition": {"title": "Renamed"}}}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope("Renamed")))
            .expect(1)
            .mount(&server)
            .await;

        let resource = resource(&server);
        let mut diags = Diagnostics::default();
        let state = object(planned("Sample"));
        let (created, _) = resource
            .create(&mut diags, state.clone(), state, Default::default(), Default::default())
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(created.as_object().unwrap()["id"], string(ID));

        let renamed = object(planned("Renamed"));
        let (updated, _) = resource
            .update(
                &mut diags,
                created,
                renamed.clone(),
                renamed,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(updated.as_object().unwrap()["name"], string("Renamed"));
    }

    #[tokio::test]
    async fn malformed_response_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/powerpacks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"type": "powerpack"}})))
            .mount(&server)
            .await;

        let resource = resource(&server);
        let mut diags = Diagnostics::default();
        let state = object(planned("Sample"));
        let created = resource
            .create(&mut diags, state.clone(), state, Default::default(), Default::default())
            .await;
        assert!(created.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn read_and_destroy_tolerate_missing_powerpack() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/powerpacks/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v2/powerpacks/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let resource = resource(&server);
        let mut diags = Diagnostics::default();
        let (state, _) = resource.import(&mut diags, "gone".to_owned()).await.unwrap();
        let (read, _) = resource
            .read(&mut diags, state.clone(), Default::default(), Default::default())
            .await
            .unwrap();
        assert_eq!(read, Value::Null);
        resource
            .destroy(&mut diags, state, Default::default(), Default::default())
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
    }
}
