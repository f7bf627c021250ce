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

//! JSON payload to Terraform tree.
//!
//! Every object produced here carries all the keys of its schema: absent JSON
//! values become `Null`, or an empty block list for nested blocks.

use serde_json::Value as Json;
use tf_provider::value::Value;

use super::build::{integral, JsonMap};
use super::error::{type_mismatch, FieldPath, MappingError};
use super::field::{FieldKind, FieldSpec};
use super::value::{list, object, Node, Object, TfValue};
use super::widgets;

/// Flatten the JSON object `doc` into the Terraform object described by `fields`.
pub fn flatten_object(
    fields: &[FieldSpec],
    doc: &JsonMap,
    path: &FieldPath,
) -> Result<Object, MappingError> {
    let mut out = Object::new();
    for field in fields {
        if field.is_injected() {
            continue;
        }
        let json = if field.schema_only {
            None
        } else {
            lookup(doc, &field.json_segments())
        };
        let value = match json {
            Some(json) => flatten_field(field, json, &path.attr(field.hcl_key))?,
            None => field.null_value(),
        };
        out.insert(field.hcl_key.to_owned(), value);
    }
    Ok(out)
}

/// Value at a dotted location. JSON `null` counts as absent.
pub fn lookup<'a>(doc: &'a JsonMap, segments: &[&str]) -> Option<&'a Json> {
    let (last, parents) = segments.split_last()?;
    let mut current = doc;
    for segment in parents {
        current = current.get(*segment)?.as_object()?;
    }
    current.get(*last).filter(|v| !v.is_null())
}

fn flatten_field(field: &FieldSpec, json: &Json, path: &FieldPath) -> Result<TfValue, MappingError> {
    let node = match &field.kind {
        FieldKind::String => Node::String(scalar_string(json, path)?),
        FieldKind::Bool => match json {
            Json::Bool(b) => Node::Bool(*b),
            _ => return Err(type_mismatch(path, "bool", json)),
        },
        FieldKind::Int => Node::Int(json_int(json, path)?),
        FieldKind::Float => match json.as_f64() {
            Some(f) => Node::Float(f),
            None => return Err(type_mismatch(path, "number", json)),
        },
        FieldKind::StringList | FieldKind::IntList => {
            let items = expect_array(json, path)?;
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = path.index(i);
                out.push(match item {
                    Json::Null => Value::Null,
                    _ if field.kind == FieldKind::IntList => {
                        Value::Value(Node::Int(json_int(item, &item_path)?))
                    }
                    _ => Value::Value(Node::String(scalar_string(item, &item_path)?)),
                });
            }
            Node::List(out)
        }
        FieldKind::Block => {
            let doc = expect_object(json, path)?;
            Node::List(vec![object(flatten_object(
                &field.children,
                doc,
                &path.index(0),
            )?)])
        }
        FieldKind::OneOf => {
            let doc = expect_object(json, path)?;
            match flatten_variant(field, doc, &path.index(0))? {
                Some(obj) => Node::List(vec![object(obj)]),
                None => Node::List(Vec::new()),
            }
        }
        FieldKind::WidgetDefinition(scope) => {
            let doc = expect_object(json, path)?;
            Node::List(vec![object(widgets::flatten_definition(
                *scope,
                doc,
                &path.index(0),
            )?)])
        }
        FieldKind::BlockList | FieldKind::OneOfList | FieldKind::Matrix | FieldKind::Widgets(_) => {
            let items = expect_array(json, path)?;
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = path.index(i);
                match &field.kind {
                    FieldKind::BlockList => out.push(object(flatten_object(
                        &field.children,
                        expect_object(item, &item_path)?,
                        &item_path,
                    )?)),
                    FieldKind::OneOfList => {
                        let doc = expect_object(item, &item_path)?;
                        let obj = flatten_variant(field, doc, &item_path)?
                            .unwrap_or_else(|| empty_variants(field));
                        out.push(object(obj));
                    }
                    FieldKind::Matrix => out.push(flatten_row(field, item, &item_path)?),
                    FieldKind::Widgets(scope) => out.push(object(widgets::flatten_widget(
                        *scope,
                        expect_object(item, &item_path)?,
                        &item_path,
                    )?)),
                    _ => {}
                }
            }
            Node::List(out)
        }
        FieldKind::Injected(_) => return Ok(Value::Null),
    };
    Ok(Value::Value(node))
}

/// Select the variant designated by the discriminator and leave the others
/// empty. `None` when no variant matches.
fn flatten_variant(
    field: &FieldSpec,
    doc: &JsonMap,
    path: &FieldPath,
) -> Result<Option<Object>, MappingError> {
    let discriminator = field
        .discriminator
        .and_then(|key| doc.get(key))
        .and_then(Json::as_str);
    let matched = discriminator.and_then(|tag| {
        field
            .children
            .iter()
            .find(|v| v.variant.as_ref().is_some_and(|m| m.matches(tag)))
    });
    let chosen = matched.or_else(|| {
        field
            .children
            .iter()
            .find(|v| v.variant.as_ref().is_some_and(|m| m.default_variant))
    });
    let Some(chosen) = chosen else {
        tracing::warn!(
            path = %path,
            discriminator = discriminator.unwrap_or("<missing>"),
            "unsupported variant, leaving its blocks empty"
        );
        return Ok(None);
    };

    let mut out = Object::new();
    for variant in &field.children {
        let value = if variant.hcl_key == chosen.hcl_key {
            let inner = flatten_object(&variant.children, doc, &path.attr(variant.hcl_key).index(0))?;
            list(vec![object(inner)])
        } else {
            variant.null_value()
        };
        out.insert(variant.hcl_key.to_owned(), value);
    }
    Ok(Some(out))
}

/// A oneof element with every variant left empty. Keeps list positions stable
/// when the server returns a variant this provider does not know.
fn empty_variants(field: &FieldSpec) -> Object {
    field
        .children
        .iter()
        .map(|variant| (variant.hcl_key.to_owned(), variant.null_value()))
        .collect()
}

fn flatten_row(field: &FieldSpec, json: &Json, path: &FieldPath) -> Result<TfValue, MappingError> {
    let mut out = Object::new();
    if let Some(inner) = field.children.first() {
        let cells = expect_array(json, path)?;
        let inner_path = path.attr(inner.hcl_key);
        let mut rows = Vec::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            let cell_path = inner_path.index(i);
            rows.push(object(flatten_object(
                &inner.children,
                expect_object(cell, &cell_path)?,
                &cell_path,
            )?));
        }
        out.insert(inner.hcl_key.to_owned(), list(rows));
    }
    Ok(object(out))
}

fn scalar_string(json: &Json, path: &FieldPath) -> Result<String, MappingError> {
    match json {
        Json::String(s) => Ok(s.clone()),
        Json::Number(n) => Ok(n.to_string()),
        Json::Bool(b) => Ok(b.to_string()),
        _ => Err(type_mismatch(path, "string", json)),
    }
}

/// `3.0` is accepted as `3`; `3.5` is an error.
fn json_int(json: &Json, path: &FieldPath) -> Result<i64, MappingError> {
    let Json::Number(n) = json else {
        return Err(type_mismatch(path, "integer", json));
    };
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    match n.as_f64() {
        Some(f) => integral(f, path),
        None => Err(type_mismatch(path, "integer", json)),
    }
}

fn expect_array<'a>(json: &'a Json, path: &FieldPath) -> Result<&'a Vec<Json>, MappingError> {
    json.as_array()
        .ok_or_else(|| type_mismatch(path, "array", json))
}

fn expect_object<'a>(json: &'a Json, path: &FieldPath) -> Result<&'a JsonMap, MappingError> {
    json.as_object()
        .ok_or_else(|| type_mismatch(path, "object", json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::build::build_object;
    use crate::mapping::value::{boolean, int, string, TfValueExt};
    use serde_json::json;

    fn flatten(fields: &[FieldSpec], doc: Json) -> Result<Object, MappingError> {
        let Json::Object(doc) = doc else {
            panic!("test document must be an object");
        };
        flatten_object(fields, &doc, &FieldPath::root())
    }

    fn legend_field() -> FieldSpec {
        FieldSpec::one_of(
            "legend",
            vec![
                FieldSpec::block(
                    "legend_table",
                    vec![FieldSpec::string("type").required()],
                )
                .matches(&["table", "none"]),
                FieldSpec::block(
                    "legend_inline",
                    vec![
                        FieldSpec::string("type").required(),
                        FieldSpec::bool("hide_value"),
                        FieldSpec::bool("hide_percent"),
                    ],
                )
                .matches(&["inline", "automatic"]),
            ],
        )
        .discriminated_by("type")
    }

    #[test]
    fn absent_keys_flatten_to_typed_nulls() {
        let fields = vec![
            FieldSpec::string("title"),
            FieldSpec::string_list("tags"),
            FieldSpec::block("style", vec![FieldSpec::string("palette")]),
            FieldSpec::block_list("marker", vec![FieldSpec::string("value")]).json("markers"),
        ];
        let out = flatten(&fields, json!({})).unwrap();
        assert_eq!(out["title"], Value::Null);
        assert_eq!(out["tags"], Value::Null);
        assert_eq!(out["style"], list(vec![]));
        assert_eq!(out["marker"], list(vec![]));
    }

    #[test]
    fn json_null_is_treated_as_absent() {
        let fields = vec![FieldSpec::string("title")];
        let out = flatten(&fields, json!({"title": null})).unwrap();
        assert_eq!(out["title"], Value::Null);
    }

    #[test]
    fn integral_floats_become_integers() {
        let fields = vec![FieldSpec::int("precision")];
        let out = flatten(&fields, json!({"precision": 3.0})).unwrap();
        assert_eq!(out["precision"], int(3));

        let err = flatten(&fields, json!({"precision": 3.5})).unwrap_err();
        assert!(matches!(err, MappingError::FractionalInteger { value, .. } if value == 3.5));
    }

    #[test]
    fn strings_accept_json_scalars() {
        let fields = vec![FieldSpec::string("min"), FieldSpec::string("max")];
        let out = flatten(&fields, json!({"min": 0, "max": true})).unwrap();
        assert_eq!(out["min"], string("0"));
        assert_eq!(out["max"], string("true"));

        let err = flatten(&fields, json!({"min": {"x": 1}})).unwrap_err();
        assert!(matches!(err, MappingError::TypeMismatch { .. }));
    }

    #[test]
    fn oneof_selects_variant_from_discriminator_values() {
        let out = flatten(
            &[legend_field()],
            json!({"legend": {"type": "automatic", "hide_percent": true}}),
        )
        .unwrap();
        let legend = out["legend"].as_list().unwrap()[0].as_object().unwrap();
        assert_eq!(legend["legend_table"], list(vec![]));
        let inline = legend["legend_inline"].as_list().unwrap()[0]
            .as_object()
            .unwrap();
        assert_eq!(inline["type"], string("automatic"));
        assert_eq!(inline["hide_percent"], boolean(true));
        assert_eq!(inline["hide_value"], Value::Null);
    }

    #[test]
    fn unknown_discriminator_yields_no_variant() {
        let out = flatten(&[legend_field()], json!({"legend": {"type": "sideways"}})).unwrap();
        assert_eq!(out["legend"], list(vec![]));
    }

    #[test]
    fn unknown_list_variant_keeps_its_position() {
        let query = FieldSpec::one_of_list(
            "query",
            vec![
                FieldSpec::block(
                    "metric_query",
                    vec![FieldSpec::string("name"), FieldSpec::string("query")],
                )
                .variant("metrics"),
                FieldSpec::block(
                    "event_query",
                    vec![FieldSpec::string("name"), FieldSpec::string("data_source")],
                )
                .variant("logs"),
            ],
        )
        .discriminated_by("data_source");
        let out = flatten(
            &[query],
            json!({"query": [
                {"data_source": "metrics", "name": "a", "query": "avg:cpu{*}"},
                {"data_source": "slo", "name": "b"},
                {"data_source": "logs", "name": "c"}
            ]}),
        )
        .unwrap();
        let items = out["query"].as_list().unwrap();
        assert_eq!(items.len(), 3);

        let first = items[0].as_object().unwrap();
        assert!(first["metric_query"].has_elements());
        let middle = items[1].as_object().unwrap();
        assert_eq!(middle["metric_query"], list(vec![]));
        assert_eq!(middle["event_query"], list(vec![]));
        let last = items[2].as_object().unwrap();
        let event = last["event_query"].as_list().unwrap()[0].as_object().unwrap();
        assert_eq!(event["name"], string("c"));
    }

    #[test]
    fn default_variant_applies_without_discriminator() {
        let time = FieldSpec::one_of(
            "time",
            vec![
                FieldSpec::block("legacy", vec![FieldSpec::string("live_span")]).default_variant(),
                FieldSpec::block(
                    "live",
                    vec![
                        FieldSpec::int("value").required(),
                        FieldSpec::string("unit").required(),
                    ],
                )
                .variant("live"),
            ],
        )
        .discriminated_by("type");
        let out = flatten(&[time], json!({"time": {"live_span": "5m"}})).unwrap();
        let time = out["time"].as_list().unwrap()[0].as_object().unwrap();
        assert!(time["legacy"].has_elements());
        assert!(!time["live"].has_elements());
    }

    #[test]
    fn empty_list_round_trips_distinct_from_unset() {
        let fields = vec![FieldSpec::block(
            "namespace_filters",
            vec![
                FieldSpec::string_list("include_only"),
                FieldSpec::string_list("exclude_only"),
            ],
        )];
        let mut filters = Object::new();
        filters.insert("include_only".into(), Value::Null);
        filters.insert("exclude_only".into(), list(vec![]));
        let mut state = Object::new();
        state.insert("namespace_filters".into(), list(vec![object(filters)]));

        let payload = build_object(&fields, &state, &FieldPath::root()).unwrap();
        assert_eq!(
            Json::Object(payload.clone()),
            json!({"namespace_filters": {"exclude_only": []}})
        );

        let back = flatten_object(&fields, &payload, &FieldPath::root()).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn populated_values_round_trip() {
        let fields = vec![
            FieldSpec::string("title"),
            FieldSpec::string("live_span").path("time.live_span"),
            FieldSpec::bool("show_legend"),
            FieldSpec::int("precision"),
            FieldSpec::string_list("tags"),
            FieldSpec::int_list("ids"),
            FieldSpec::block_list(
                "marker",
                vec![FieldSpec::string("value"), FieldSpec::string("label")],
            )
            .json("markers"),
            legend_field(),
        ];
        let mut marker = Object::new();
        marker.insert("value".into(), string("y > 1"));
        marker.insert("label".into(), string("high"));
        let mut inline = Object::new();
        inline.insert("type".into(), string("inline"));
        inline.insert("hide_value".into(), boolean(true));
        inline.insert("hide_percent".into(), boolean(false));
        let mut legend = Object::new();
        legend.insert("legend_table".into(), list(vec![]));
        legend.insert("legend_inline".into(), list(vec![object(inline)]));

        let mut state = Object::new();
        state.insert("title".into(), string("Latency"));
        state.insert("live_span".into(), string("1h"));
        state.insert("show_legend".into(), boolean(true));
        state.insert("precision".into(), int(2));
        state.insert("tags".into(), list(vec![string("env:prod")]));
        state.insert("ids".into(), list(vec![int(4), int(2)]));
        state.insert("marker".into(), list(vec![object(marker)]));
        state.insert("legend".into(), list(vec![object(legend)]));

        let payload = build_object(&fields, &state, &FieldPath::root()).unwrap();
        let back = flatten_object(&fields, &payload, &FieldPath::root()).unwrap();
        assert_eq!(back, state);
    }
}
