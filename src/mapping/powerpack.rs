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

//! Powerpack document.
//!
//! A powerpack is a group widget wrapped in a JSON:API envelope. Field JSON
//! paths are relative to `data.attributes`.

use lazy_static::lazy_static;
use serde_json::{json, Value as Json};
use tf_provider::schema::Schema;

use super::build::{build_object, insert_at, JsonMap};
use super::error::{FieldPath, MappingError};
use super::field::{FieldSpec, WidgetScope};
use super::flatten::{flatten_object, lookup};
use super::schema;
use super::value::{list, string, Object, TfValueExt};

pub const POWERPACK_PATH: &str = "/api/v2/powerpacks";

const WIDGETS_PATH: [&str; 3] = ["group_widget", "definition", "widgets"];
const TITLE_PATH: [&str; 3] = ["group_widget", "definition", "title"];

const DESCRIPTION: &str = "Provides a Datadog powerpack resource. This can be used to create and manage Datadog powerpacks.";

pub fn fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("id")
            .computed()
            .schema_only()
            .describe("The ID of this resource."),
        FieldSpec::string("name").describe("The name for the powerpack."),
        FieldSpec::string("description").describe("The description of the powerpack."),
        FieldSpec::string("live_span")
            .path("group_widget.live_span")
            .describe("The timeframe to use when displaying the powerpack."),
        FieldSpec::bool("show_title")
            .path("group_widget.definition.show_title")
            .describe("Whether or not title should be displayed in the powerpack."),
        FieldSpec::string_list("tags")
            .set()
            .describe("List of tags to identify this powerpack."),
        FieldSpec::block_list(
            "template_variables",
            vec![
                FieldSpec::string("name")
                    .required()
                    .describe("The name of the powerpack template variable."),
                FieldSpec::string_list("defaults")
                    .omit_empty()
                    .describe("One or many default values for powerpack template variables on load."),
            ],
        )
        .keep_empty()
        .describe("The list of template variables for this powerpack."),
        FieldSpec::widgets("widget", WidgetScope::Powerpack)
            .path("group_widget.definition.widgets")
            .keep_empty()
            .describe("The list of widgets to display in the powerpack."),
        FieldSpec::block(
            "layout",
            vec![
                FieldSpec::int("x").describe("The position of the widget on the x (horizontal) axis."),
                FieldSpec::int("y").describe("The position of the widget on the y (vertical) axis."),
                FieldSpec::int("width").describe("The width of the widget."),
                FieldSpec::int("height").describe("The height of the widget."),
            ],
        )
        .path("group_widget.layout")
        .describe("The layout of the powerpack on a free-form dashboard."),
        FieldSpec::injected("type", "group").path("group_widget.definition.type"),
        FieldSpec::injected("layout_type", "ordered").path("group_widget.definition.layout_type"),
    ]
}

lazy_static! {
    static ref FIELDS: Vec<FieldSpec> = fields();
}

pub fn powerpack_fields() -> &'static [FieldSpec] {
    &FIELDS
}

pub fn schema() -> Schema {
    Schema {
        version: 1,
        block: schema::block(powerpack_fields(), DESCRIPTION),
    }
}

/// JSON:API request body of a powerpack create or update.
pub fn build_powerpack(state: &Object) -> Result<Json, MappingError> {
    let mut attributes = build_object(powerpack_fields(), state, &FieldPath::root())?;
    attributes
        .entry("tags")
        .or_insert_with(|| Json::Array(Vec::new()));
    attributes
        .entry("template_variables")
        .or_insert_with(|| Json::Array(Vec::new()));
    if lookup(&attributes, &WIDGETS_PATH).is_none() {
        insert_at(&mut attributes, &WIDGETS_PATH, Json::Array(Vec::new()));
    }
    // the group title mirrors the powerpack name
    if let Some(name) = state.get("name").and_then(TfValueExt::as_str) {
        insert_at(&mut attributes, &TITLE_PATH, Json::from(name));
    }
    Ok(json!({
        "data": {
            "type": "powerpack",
            "attributes": attributes,
        }
    }))
}

/// Id and attributes of a JSON:API powerpack response.
pub fn parse_envelope(doc: &Json) -> Result<(String, &JsonMap), MappingError> {
    let data = FieldPath::root().attr("data");
    let id = match doc.pointer("/data/id") {
        Some(Json::String(id)) => id.clone(),
        Some(Json::Number(id)) => id.to_string(),
        _ => {
            return Err(MappingError::MissingRequired {
                path: data.attr("id"),
            })
        }
    };
    let attributes = doc
        .pointer("/data/attributes")
        .and_then(Json::as_object)
        .ok_or_else(|| MappingError::MissingRequired {
            path: data.attr("attributes"),
        })?;
    Ok((id, attributes))
}

/// State of a powerpack from its JSON:API response.
pub fn flatten_powerpack(doc: &Json) -> Result<Object, MappingError> {
    let (id, attributes) = parse_envelope(doc)?;
    let mut state = flatten_object(powerpack_fields(), attributes, &FieldPath::root())?;
    state.insert("id".to_owned(), string(id));
    if let Some(tags) = state.get_mut("tags").filter(|tags| tags.is_null()) {
        *tags = list(Vec::new());
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::value::{boolean, int, object, single_block};
    use tf_provider::value::Value;

    fn free_text(text: &str) -> Object {
        let mut definition = Object::new();
        definition.insert("text".into(), string(text));
        let mut widget = Object::new();
        widget.insert("free_text_definition".into(), single_block(definition));
        widget
    }

    #[test]
    fn body_is_a_group_widget_envelope() {
        let mut layout = Object::new();
        layout.insert("x".into(), int(0));
        layout.insert("y".into(), int(0));
        layout.insert("width".into(), int(6));
        layout.insert("height".into(), int(3));
        let mut state = Object::new();
        state.insert("id".into(), Value::Unknown);
        state.insert("name".into(), string("Sample"));
        state.insert("show_title".into(), boolean(true));
        state.insert("live_span".into(), string("1h"));
        state.insert("layout".into(), single_block(layout));
        state.insert("widget".into(), list(vec![object(free_text("hello"))]));

        let body = build_powerpack(&state).unwrap();
        assert_eq!(
            body,
            json!({
                "data": {
                    "type": "powerpack",
                    "attributes": {
                        "name": "Sample",
                        "tags": [],
                        "template_variables": [],
                        "group_widget": {
                            "live_span": "1h",
                            "layout": {"x": 0, "y": 0, "width": 6, "height": 3},
                            "definition": {
                                "type": "group",
                                "layout_type": "ordered",
                                "show_title": true,
                                "title": "Sample",
                                "widgets": [
                                    {"definition": {"type": "free_text", "text": "hello"}}
                                ]
                            }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn empty_powerpack_still_sends_widgets() {
        let body = build_powerpack(&Object::new()).unwrap();
        assert_eq!(
            body.pointer("/data/attributes/group_widget/definition/widgets"),
            Some(&json!([]))
        );
    }

    #[test]
    fn response_round_trips_into_state() {
        let response = json!({
            "data": {
                "id": "00000000-0000-0000-0000-000000000001",
                "type": "powerpack",
                "attributes": {
                    "name": "Sample",
                    "description": "desc",
                    "tags": ["tag:foo"],
                    "template_variables": [{"name": "env", "defaults": ["prod"]}],
                    "group_widget": {
                        "definition": {
                            "type": "group",
                            "layout_type": "ordered",
                            "show_title": false,
                            "title": "Sample",
                            "widgets": [
                                {"definition": {"type": "note", "content": "x"}, "layout": {"x": 0, "y": 0, "width": 2, "height": 2}}
                            ]
                        },
                        "layout": {"x": 1, "y": 2, "width": 3, "height": 4}
                    }
                }
            }
        });
        let state = flatten_powerpack(&response).unwrap();
        assert_eq!(state["id"], string("00000000-0000-0000-0000-000000000001"));
        assert_eq!(state["show_title"], boolean(false));
        assert_eq!(state["live_span"], Value::Null);
        let layout = state["layout"].as_list().unwrap()[0].as_object().unwrap();
        assert_eq!(layout["height"], int(4));
        let widget = state["widget"].as_list().unwrap()[0].as_object().unwrap();
        assert!(widget["note_definition"].has_elements());
        assert!(!widget.contains_key("powerpack_definition"));
        assert!(widget.contains_key("group_definition"));
    }

    #[test]
    fn envelope_without_data_is_rejected() {
        let err = flatten_powerpack(&json!({"data": {"type": "powerpack"}})).unwrap_err();
        assert_eq!(
            err,
            MappingError::MissingRequired {
                path: FieldPath::root().attr("data").attr("id")
            }
        );
        let err = flatten_powerpack(&json!({"data": {"id": "x"}})).unwrap_err();
        assert!(matches!(err, MappingError::MissingRequired { .. }));
    }
}
