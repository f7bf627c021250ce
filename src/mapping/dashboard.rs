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

//! Dashboard document: top-level fields, request body and state.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use serde_json::Value as Json;
use tf_provider::schema::Schema;
use tf_provider::value::Value;

use super::build::{build_object, JsonMap};
use super::error::{FieldPath, MappingError};
use super::field::{FieldSpec, WidgetScope};
use super::flatten::flatten_object;
use super::schema;
use super::value::{boolean, int, list, string, Node, Object, TfValue, TfValueExt};

pub const DASHBOARD_PATH: &str = "/api/v1/dashboard";

const DESCRIPTION: &str = "Provides a Datadog dashboard resource. This can be used to create and manage Datadog dashboards.\n\n!> The `is_read_only` field is deprecated and non-functional. Use `restricted_roles` instead to define which roles are required to edit the dashboard.";

fn template_variable_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("name")
            .required()
            .describe("The name of the variable."),
        FieldSpec::string("prefix").describe("The tag prefix associated with the variable. Only tags with this prefix appear in the variable dropdown."),
        FieldSpec::string("default")
            .omit_empty()
            .deprecated("Use `defaults` instead.")
            .describe("The default value for the template variable on dashboard load. Cannot be used in conjunction with `defaults`."),
        FieldSpec::string_list("defaults")
            .omit_empty()
            .describe("One or many default values for template variables on load. If more than one default is specified, they will be unioned together with `OR`. Cannot be used in conjunction with `default`."),
        FieldSpec::string_list("available_values")
            .omit_empty()
            .describe("The list of values that the template variable drop-down is be limited to"),
    ]
}

fn template_variable_preset_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("name")
            .omit_empty()
            .describe("The name of the preset."),
        FieldSpec::block_list(
            "template_variable",
            vec![
                FieldSpec::string("name")
                    .omit_empty()
                    .describe("The name of the template variable"),
                FieldSpec::string("value")
                    .omit_empty()
                    .deprecated("Use `values` instead.")
                    .describe("The value that should be assumed by the template variable in this preset. Cannot be used in conjunction with `values`."),
                FieldSpec::string_list("values")
                    .omit_empty()
                    .describe("One or many template variable values within the saved view, which will be unioned together using `OR` if more than one is specified. Cannot be used in conjunction with `value`."),
            ],
        )
        .json("template_variables")
        .keep_empty()
        .describe("The template variable names and assumed values under the given preset"),
    ]
}

pub fn fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("id")
            .computed()
            .describe("The ID of this resource."),
        FieldSpec::string("title")
            .required()
            .describe("The title of the dashboard."),
        FieldSpec::string("description").describe("The description of the dashboard."),
        FieldSpec::string("layout_type")
            .required()
            .describe("The layout type of the dashboard.")
            .valid(&["ordered", "free"]),
        FieldSpec::string("reflow_type")
            .omit_empty()
            .describe("The reflow type of a new dashboard layout. Set this only when layout type is `ordered`. If set to `fixed`, the dashboard expects all widgets to have a layout, and if it's set to `auto`, widgets should not have layouts.")
            .valid(&["auto", "fixed"]),
        FieldSpec::string_list("notify_list")
            .set()
            .describe("The list of handles for the users to notify when changes are made to this dashboard."),
        FieldSpec::string_list("tags")
            .describe("A list of tags assigned to the Dashboard. Only team names of the form `team:<name>` are supported."),
        FieldSpec::block_list("template_variable", template_variable_fields())
            .json("template_variables")
            .keep_empty()
            .describe("The list of template variables for this dashboard."),
        FieldSpec::block_list("template_variable_preset", template_variable_preset_fields())
            .json("template_variable_presets")
            .keep_empty()
            .describe("The list of selectable template variable presets for this dashboard."),
        FieldSpec::string_list("restricted_roles")
            .set()
            .omit_empty()
            .describe("UUIDs of roles whose associated users are authorized to edit the dashboard."),
        FieldSpec::bool("is_read_only")
            .omit_empty()
            .deprecated("Prefer using `restricted_roles` to define which roles are required to edit the dashboard.")
            .describe("Whether this dashboard is read-only."),
        FieldSpec::string("url")
            .computed()
            .schema_only()
            .describe("The URL of the dashboard."),
        FieldSpec::int_list("dashboard_lists")
            .set()
            .schema_only()
            .describe("A list of dashboard lists this dashboard belongs to. This attribute should not be set if managing the corresponding dashboard lists using Terraform as it causes inconsistent behavior."),
        FieldSpec::int_list("dashboard_lists_removed")
            .set()
            .computed()
            .schema_only()
            .describe("A list of dashboard lists this dashboard should be removed from. Internal only."),
        FieldSpec::widgets("widget", WidgetScope::Dashboard)
            .json("widgets")
            .keep_empty()
            .describe("The list of widgets to display on the dashboard."),
    ]
}

lazy_static! {
    static ref FIELDS: Vec<FieldSpec> = fields();
}

pub fn dashboard_fields() -> &'static [FieldSpec] {
    &FIELDS
}

pub fn schema() -> Schema {
    Schema {
        version: 1,
        block: schema::block(dashboard_fields(), DESCRIPTION),
    }
}

/// Request body of a dashboard create or update.
pub fn build_dashboard(state: &Object) -> Result<JsonMap, MappingError> {
    let mut doc = build_object(dashboard_fields(), state, &FieldPath::root())?;
    doc.entry("widgets")
        .or_insert_with(|| Json::Array(Vec::new()));
    Ok(doc)
}

/// State of a dashboard from its API document.
///
/// `dashboard_lists` is not returned by the API and is carried over from
/// `prior`. Removals have been applied once a document is read back, so
/// `dashboard_lists_removed` is always empty.
pub fn flatten_dashboard(doc: &JsonMap, prior: Option<&Object>) -> Result<Object, MappingError> {
    let mut state = flatten_object(dashboard_fields(), doc, &FieldPath::root())?;

    if let Some(url) = doc.get("url").and_then(Json::as_str) {
        state.insert("url".to_owned(), string(url));
    }

    // `restricted_roles` takes precedence over the deprecated `is_read_only`
    let read_only = match doc.get("restricted_roles") {
        Some(Json::Array(_)) => false,
        _ => doc
            .get("is_read_only")
            .and_then(Json::as_bool)
            .unwrap_or(false),
    };
    state.insert("is_read_only".to_owned(), boolean(read_only));

    for key in ["notify_list", "tags"] {
        if let Some(value) = state.get_mut(key).filter(|value| value.is_null()) {
            *value = list(Vec::new());
        }
    }

    if let Some(variables) = state.get_mut("template_variable") {
        prefer_plural(variables, "defaults", "default");
    }
    if let Some(Value::Value(Node::List(presets))) = state.get_mut("template_variable_preset") {
        for preset in presets {
            if let Value::Value(Node::Object(preset)) = preset {
                if let Some(values) = preset.get_mut("template_variable") {
                    prefer_plural(values, "values", "value");
                }
            }
        }
    }

    let lists = prior
        .and_then(|prior| prior.get("dashboard_lists"))
        .cloned()
        .unwrap_or(Value::Null);
    state.insert("dashboard_lists".to_owned(), lists);
    state.insert("dashboard_lists_removed".to_owned(), list(Vec::new()));
    Ok(state)
}

/// The API fills the singular field from the plural one. Keep only the plural
/// one when it is populated.
fn prefer_plural(items: &mut TfValue, plural: &str, singular: &str) {
    let Value::Value(Node::List(items)) = items else {
        return;
    };
    for item in items {
        let Value::Value(Node::Object(obj)) = item else {
            continue;
        };
        if obj.get(plural).is_some_and(TfValueExt::has_elements) {
            obj.insert(singular.to_owned(), Value::Null);
        }
    }
}

fn int_set(value: Option<&TfValue>) -> BTreeSet<i64> {
    value
        .and_then(TfValueExt::as_list)
        .unwrap_or_default()
        .iter()
        .filter_map(TfValueExt::as_number)
        .map(|n| n as i64)
        .collect()
}

/// Lists the dashboard belonged to in `prior` and no longer belongs to in
/// `planned`. Unknown while the planned lists are unknown.
pub fn lists_removed(prior: Option<&Object>, planned: &Object) -> TfValue {
    if matches!(planned.get("dashboard_lists"), Some(Value::Unknown)) {
        return Value::Unknown;
    }
    let before = int_set(prior.and_then(|prior| prior.get("dashboard_lists")));
    let after = int_set(planned.get("dashboard_lists"));
    list(before.difference(&after).map(|id| int(*id)).collect())
}

/// Dashboard list ids of a state attribute.
pub fn list_ids(state: &Object, key: &str) -> Vec<i64> {
    int_set(state.get(key)).into_iter().collect()
}

/// Dashboard list item type for a layout.
pub fn list_item_type(layout_type: &str) -> &'static str {
    if layout_type == "ordered" {
        "custom_timeboard"
    } else {
        "custom_screenboard"
    }
}

fn strip_ids(value: &mut TfValue) {
    match value {
        Value::Value(Node::List(items)) => items.iter_mut().for_each(strip_ids),
        Value::Value(Node::Object(obj)) => {
            obj.remove("id");
            obj.values_mut().for_each(strip_ids);
        }
        _ => {}
    }
}

fn mark_ids_unknown(value: &mut TfValue) {
    match value {
        Value::Value(Node::List(items)) => items.iter_mut().for_each(mark_ids_unknown),
        Value::Value(Node::Object(obj)) => {
            if let Some(id) = obj.get_mut("id") {
                *id = Value::Unknown;
            }
            obj.values_mut()
                .filter(|v| v.as_list().is_some())
                .for_each(mark_ids_unknown);
        }
        _ => {}
    }
}

/// Widget ids are matched to the prior state by position. Any change to the
/// widget list, ids aside, makes every planned widget id unknown.
pub fn plan_widget_ids(planned: &mut Object, prior: Option<&Object>, key: &str) {
    let Some(widgets) = planned.get_mut(key) else {
        return;
    };
    let unchanged = prior.and_then(|prior| prior.get(key)).is_some_and(|before| {
        let mut before = before.clone();
        let mut after = widgets.clone();
        strip_ids(&mut before);
        strip_ids(&mut after);
        before == after
    });
    if !unchanged {
        mark_ids_unknown(widgets);
    }
}
