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
use tf_provider::value::Value;

use crate::client::DatadogClient;
use crate::mapping::dashboard::{self, DASHBOARD_PATH};
use crate::mapping::error::type_mismatch;
use crate::mapping::field::FieldSpec;
use crate::mapping::value::list;
use crate::mapping::{FieldPath, MappingError, Object, TfValueExt};

use super::ApiDocument;

#[derive(Debug, Default, Clone, Copy)]
pub struct Dashboard;

#[async_trait]
impl ApiDocument for Dashboard {
    const NAME: &'static str = "dashboard";
    const COLLECTION: &'static str = DASHBOARD_PATH;

    fn update_method(&self) -> Method {
        Method::PUT
    }

    fn schema(&self) -> Schema {
        dashboard::schema()
    }

    fn fields(&self) -> &'static [FieldSpec] {
        dashboard::dashboard_fields()
    }

    fn build(&self, state: &Object) -> Result<Json, MappingError> {
        dashboard::build_dashboard(state).map(Json::Object)
    }

    fn id(&self, doc: &Json) -> Result<String, MappingError> {
        match doc.get("id") {
            Some(Json::String(id)) if !id.is_empty() => Ok(id.clone()),
            _ => Err(MappingError::MissingRequired {
                path: FieldPath::root().attr("id"),
            }),
        }
    }

    fn flatten(&self, doc: &Json, prior: Option<&Object>) -> Result<Object, MappingError> {
        match doc {
            Json::Object(doc) => dashboard::flatten_dashboard(doc, prior),
            other => Err(type_mismatch(&FieldPath::root(), "object", other)),
        }
    }

    fn plan(&self, planned: &mut Object, prior: Option<&Object>) {
        let (url, removed) = match prior {
            Some(prior) => (
                prior.get("url").cloned().unwrap_or(Value::Unknown),
                dashboard::lists_removed(Some(prior), planned),
            ),
            None => (Value::Unknown, list(Vec::new())),
        };
        planned.insert("url".to_owned(), url);
        planned.insert("dashboard_lists_removed".to_owned(), removed);
        dashboard::plan_widget_ids(planned, prior, "widget");
    }

    async fn after_write(&self, client: &DatadogClient, id: &str, planned: &Object) {
        let layout_type = planned
            .get("layout_type")
            .and_then(TfValueExt::as_str)
            .unwrap_or_default();
        let item_type = dashboard::list_item_type(layout_type);
        client
            .add_to_dashboard_lists(id, item_type, &dashboard::list_ids(planned, "dashboard_lists"))
            .await;
        client
            .remove_from_dashboard_lists(
                id,
                item_type,
                &dashboard::list_ids(planned, "dashboard_lists_removed"),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use tf_provider::{Diagnostics, Resource};
    use tokio::sync::RwLock;
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::mapping::value::{boolean, int, object, single_block, string};
    use crate::mapping::TfValue;
    use crate::resource::DatadogResource;

    fn resource(server: &MockServer) -> DatadogResource<Dashboard> {
        let client = DatadogClient::new(&server.uri(), "api-key", "app-key")
            .unwrap()
            .with_poll_delay(Duration::ZERO);
        DatadogResource::new(Arc::new(RwLock::new(Some(Arc::new(client)))))
    }

    fn note(content: &str) -> TfValue {
        let mut definition = Object::new();
        definition.insert("content".into(), string(content));
        let mut widget = Object::new();
        widget.insert("id".into(), Value::Null);
        widget.insert("note_definition".into(), single_block(definition));
        object(widget)
    }

    fn planned(lists: Vec<i64>) -> Object {
        let mut state = Object::new();
        state.insert("title".into(), string("Ordered Layout Dashboard"));
        state.insert("layout_type".into(), string("ordered"));
        state.insert("widget".into(), list(vec![note("hello")]));
        state.insert("dashboard_lists".into(), list(lists.into_iter().map(int).collect()));
        state
    }

    fn response(id: &str) -> Json {
        json!({
            "id": id,
            "title": "Ordered Layout Dashboard",
            "layout_type": "ordered",
            "url": format!("/dashboard/{id}/ordered-layout-dashboard"),
            "widgets": [
                {"id": 5436370674582587u64, "definition": {"type": "note", "content": "hello"}}
            ]
        })
    }

    #[tokio::test]
    async fn create_posts_polls_and_joins_lists() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/dashboard"))
            .and(body_partial_json(json!({
                "title": "Ordered Layout Dashboard",
                "widgets": [{"definition": {"type": "note", "content": "hello"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(response("qc9-tuk-9kv")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/dashboard/qc9-tuk-9kv"))
            .respond_with(ResponseTemplate::new(404))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/dashboard/qc9-tuk-9kv"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response("qc9-tuk-9kv")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v2/dashboard/lists/manual/42/dashboards"))
            .and(body_json(json!({
                "dashboards": [{"id": "qc9-tuk-9kv", "type": "custom_timeboard"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let resource = resource(&server);
        let mut diags = Diagnostics::default();
        let planned = object(planned(vec![42]));
        let (state, _) = resource
            .create(&mut diags, planned.clone(), planned, Default::default(), Default::default())
            .await
            .unwrap();
        assert!(diags.errors.is_empty());

        let state = state.as_object().unwrap();
        assert_eq!(state["id"], string("qc9-tuk-9kv"));
        assert_eq!(
            state["url"],
            string("/dashboard/qc9-tuk-9kv/ordered-layout-dashboard")
        );
        assert_eq!(state["dashboard_lists"], list(vec![int(42)]));
        assert_eq!(state["dashboard_lists_removed"], list(vec![]));
        let widget = state["widget"].as_list().unwrap()[0].as_object().unwrap();
        assert_eq!(widget["id"], int(5436370674582587));
    }

    #[tokio::test]
    async fn update_puts_and_leaves_removed_lists() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/dashboard/qc9-tuk-9kv"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response("qc9-tuk-9kv")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v2/dashboard/lists/manual/7/dashboards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let resource = resource(&server);
        let mut diags = Diagnostics::default();
        let mut prior = planned(vec![7]);
        prior.insert("id".into(), string("qc9-tuk-9kv"));
        let prior = object(prior);

        let (planned, _, replace) = resource
            .plan_update(
                &mut diags,
                prior.clone(),
                object(planned(vec![])),
                object(planned(vec![])),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(replace.is_empty());
        assert_eq!(
            planned.as_object().unwrap()["dashboard_lists_removed"],
            list(vec![int(7)])
        );

        let (state, _) = resource
            .update(
                &mut diags,
                prior,
                planned.clone(),
                planned,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(
            state.as_object().unwrap()["dashboard_lists_removed"],
            list(vec![])
        );
    }

    #[tokio::test]
    async fn plan_update_marks_new_widget_computed_unknown() {
        let server = MockServer::start().await;
        let resource = resource(&server);
        let mut diags = Diagnostics::default();

        let styled = |font_size: TfValue| {
            let mut definition = Object::new();
            definition.insert("content".into(), string("hello"));
            definition.insert("font_size".into(), font_size);
            definition.insert("has_padding".into(), Value::Null);
            let mut widget = Object::new();
            widget.insert("id".into(), Value::Null);
            widget.insert("note_definition".into(), single_block(definition));
            object(widget)
        };
        let mut prior = planned(vec![]);
        prior.insert("id".into(), string("qc9-tuk-9kv"));
        prior.insert("widget".into(), list(vec![styled(string("14"))]));
        let mut proposed = prior.clone();
        proposed.insert(
            "widget".into(),
            list(vec![styled(string("14")), styled(Value::Null)]),
        );
        let proposed = object(proposed);

        let (planned, _, replace) = resource
            .plan_update(
                &mut diags,
                object(prior),
                proposed.clone(),
                proposed,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert!(replace.is_empty());

        let widgets = planned.as_object().unwrap()["widget"].as_list().unwrap();
        let definition = |i: usize| {
            widgets[i].as_object().unwrap()["note_definition"]
                .as_list()
                .unwrap()[0]
                .as_object()
                .unwrap()
                .clone()
        };
        assert_eq!(definition(0)["font_size"], string("14"));
        assert_eq!(definition(1)["font_size"], Value::Unknown);
        assert_eq!(definition(1)["has_padding"], boolean(true));
        assert_eq!(widgets[1].as_object().unwrap()["id"], Value::Unknown);
    }

    #[tokio::test]
    async fn read_of_deleted_dashboard_removes_it() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/dashboard/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": ["Not found"]})))
            .mount(&server)
            .await;

        let resource = resource(&server);
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .import(&mut diags, "gone".to_owned())
            .await
            .unwrap();
        let (state, _) = resource
            .read(&mut diags, state, Default::default(), Default::default())
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(state, Value::Null);
    }

    #[tokio::test]
    async fn read_errors_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/dashboard/abc"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"errors": ["Forbidden"]})))
            .mount(&server)
            .await;

        let resource = resource(&server);
        let mut diags = Diagnostics::default();
        let (state, _) = resource.import(&mut diags, "abc".to_owned()).await.unwrap();
        let read = resource
            .read(&mut diags, state, Default::default(), Default::default())
            .await;
        assert!(read.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn destroy_accepts_missing_dashboard() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/dashboard/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let resource = resource(&server);
        let mut diags = Diagnostics::default();
        let (state, _) = resource.import(&mut diags, "gone".to_owned()).await.unwrap();
        resource
            .destroy(&mut diags, state, Default::default(), Default::default())
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn plan_create_marks_computed_unknown() {
        let server = MockServer::start().await;
        let resource = resource(&server);
        let mut diags = Diagnostics::default();
        let proposed = object(planned(vec![]));
        let (planned, _) = resource
            .plan_create(&mut diags, proposed.clone(), proposed, Default::default())
            .await
            .unwrap();
        let planned = planned.as_object().unwrap();
        assert_eq!(planned["id"], Value::Unknown);
        assert_eq!(planned["url"], Value::Unknown);
        assert_eq!(planned["dashboard_lists_removed"], list(vec![]));
        let widget = planned["widget"].as_list().unwrap()[0].as_object().unwrap();
        assert_eq!(widget["id"], Value::Unknown);
    }

    #[tokio::test]
    async fn validate_reports_two_definitions() {
        let server = MockServer::start().await;
        let resource = resource(&server);
        let mut state = planned(vec![]);
        let mut definition = Object::new();
        definition.insert("text".into(), string("hello"));
        let mut widget = Object::new();
        widget.insert("note_definition".into(), single_block({
            let mut note = Object::new();
            note.insert("content".into(), string("x"));
            note
        }));
        widget.insert("free_text_definition".into(), single_block(definition));
        state.insert("widget".into(), list(vec![object(widget)]));

        let mut diags = Diagnostics::default();
        let valid = resource.validate(&mut diags, object(state)).await;
        assert!(valid.is_none());
        assert!(!diags.errors.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_provider_is_an_error() {
        let resource = DatadogResource::<Dashboard>::default();
        let mut diags = Diagnostics::default();
        let (state, _) = resource.import(&mut diags, "abc".to_owned()).await.unwrap();
        let read = resource
            .read(&mut diags, state, Default::default(), Default::default())
            .await;
        assert!(read.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
