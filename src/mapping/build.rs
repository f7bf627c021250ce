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

//! Terraform tree to JSON payload.
//!
//! Null and unknown values never produce a JSON key. Explicitly empty lists are
//! kept as `[]` unless the field is flagged `omit_empty`.

use serde_json::{Map, Number, Value as Json};
use tf_provider::value::Value;

use super::error::{FieldPath, MappingError};
use super::field::{FieldKind, FieldSpec};
use super::value::{Node, Object, TfValue, TfValueExt};
use super::widgets;

pub type JsonMap = Map<String, Json>;

/// Build the JSON object described by `fields` from a Terraform object.
pub fn build_object(
    fields: &[FieldSpec],
    obj: &Object,
    path: &FieldPath,
) -> Result<JsonMap, MappingError> {
    let mut out = JsonMap::new();
    for field in fields {
        if field.schema_only || field.is_injected() {
            continue;
        }
        let Some(value) = obj.get(field.hcl_key) else {
            continue;
        };
        if let Some(json) = build_field(field, value, &path.attr(field.hcl_key))? {
            insert_at(&mut out, &field.json_segments(), json);
        }
    }
    for field in fields {
        if let FieldKind::Injected(literal) = &field.kind {
            let present = field.present_when.is_empty()
                || field.present_when.iter().any(|key| out.contains_key(*key));
            if present {
                insert_at(&mut out, &field.json_segments(), literal.to_json());
            }
        }
    }
    Ok(out)
}

/// Set `value` at a dotted location, creating intermediate objects.
pub fn insert_at(doc: &mut JsonMap, segments: &[&str], value: Json) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = doc;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Json::Object(JsonMap::new()));
        if !entry.is_object() {
            *entry = Json::Object(JsonMap::new());
        }
        let Json::Object(next) = entry else {
            return;
        };
        current = next;
    }
    current.insert(last.to_string(), value);
}

fn build_field(
    field: &FieldSpec,
    value: &TfValue,
    path: &FieldPath,
) -> Result<Option<Json>, MappingError> {
    let Some(node) = value.node() else {
        return Ok(None);
    };
    let json = match &field.kind {
        FieldKind::String => {
            let s = expect_str(node, path)?;
            if field.omit_empty && s.is_empty() {
                return Ok(None);
            }
            Json::String(s.to_owned())
        }
        FieldKind::Bool => {
            let b = expect_bool(node, path)?;
            if field.omit_empty && !b {
                return Ok(None);
            }
            Json::Bool(b)
        }
        FieldKind::Int => {
            let i = expect_int(node, path)?;
            if field.omit_empty && i == 0 {
                return Ok(None);
            }
            Json::from(i)
        }
        FieldKind::Float => {
            let f = expect_float(node, path)?;
            if field.omit_empty && f == 0.0 {
                return Ok(None);
            }
            Json::Number(float_number(f, path)?)
        }
        FieldKind::StringList | FieldKind::IntList => {
            let items = expect_list(node, path)?;
            if field.omit_empty && items.is_empty() {
                return Ok(None);
            }
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = path.index(i);
                let Some(item) = element(item, &item_path)? else {
                    continue;
                };
                out.push(if field.kind == FieldKind::IntList {
                    Json::from(expect_int(item, &item_path)?)
                } else {
                    Json::String(expect_str(item, &item_path)?.to_owned())
                });
            }
            Json::Array(out)
        }
        FieldKind::Block => match first_object(node, path)? {
            Some(obj) => Json::Object(build_object(&field.children, obj, &path.index(0))?),
            None => return Ok(None),
        },
        FieldKind::OneOf => match first_object(node, path)? {
            Some(obj) => Json::Object(build_variant(field, obj, &path.index(0))?),
            None => return Ok(None),
        },
        FieldKind::WidgetDefinition(scope) => match first_object(node, path)? {
            Some(obj) => Json::Object(widgets::build_definition(*scope, obj, &path.index(0))?),
            None => return Ok(None),
        },
        FieldKind::BlockList
        | FieldKind::OneOfList
        | FieldKind::Matrix
        | FieldKind::Widgets(_) => {
            let items = expect_list(node, path)?;
            if field.omit_empty && items.is_empty() {
                return Ok(None);
            }
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = path.index(i);
                let obj = match element(item, &item_path)? {
                    Some(Node::Object(obj)) => obj,
                    Some(other) => return Err(mismatch(&item_path, "object", other)),
                    None => continue,
                };
                out.push(match &field.kind {
                    FieldKind::BlockList => {
                        Json::Object(build_object(&field.children, obj, &item_path)?)
                    }
                    FieldKind::OneOfList => Json::Object(build_variant(field, obj, &item_path)?),
                    FieldKind::Matrix => build_row(field, obj, &item_path)?,
                    FieldKind::Widgets(scope) => widgets::build_widget(*scope, obj, &item_path)?,
                    _ => continue,
                });
            }
            Json::Array(out)
        }
        FieldKind::Injected(literal) => literal.to_json(),
    };
    Ok(Some(json))
}

/// Emit the single populated variant of a oneof block, tagged with its
/// discriminator value when it has one.
fn build_variant(
    field: &FieldSpec,
    obj: &Object,
    path: &FieldPath,
) -> Result<JsonMap, MappingError> {
    let populated: Vec<&FieldSpec> = field
        .children
        .iter()
        .filter(|variant| obj.get(variant.hcl_key).is_some_and(TfValueExt::has_elements))
        .collect();
    let [variant] = populated.as_slice() else {
        return Err(MappingError::OneOfVariant {
            path: path.clone(),
            variants: variant_names(field),
            found: populated.len(),
        });
    };
    let variant_path = path.attr(variant.hcl_key).index(0);
    let mut out = match obj
        .get(variant.hcl_key)
        .and_then(TfValueExt::as_list)
        .and_then(|items| items.first())
        .and_then(TfValueExt::as_object)
    {
        Some(inner) => build_object(&variant.children, inner, &variant_path)?,
        None => JsonMap::new(),
    };
    let tag = variant.variant.as_ref().and_then(|m| m.value);
    if let (Some(key), Some(tag)) = (field.discriminator, tag) {
        out.insert(key.to_owned(), Json::String(tag.to_owned()));
    }
    Ok(out)
}

/// One row of a matrix: the inner block list becomes a bare JSON array.
fn build_row(field: &FieldSpec, obj: &Object, path: &FieldPath) -> Result<Json, MappingError> {
    let mut out = Vec::new();
    if let Some(inner) = field.children.first() {
        let items = obj
            .get(inner.hcl_key)
            .and_then(TfValueExt::as_list)
            .unwrap_or_default();
        let inner_path = path.attr(inner.hcl_key);
        for (i, item) in items.iter().enumerate() {
            if let Some(cell) = item.as_object() {
                out.push(Json::Object(build_object(
                    &inner.children,
                    cell,
                    &inner_path.index(i),
                )?));
            }
        }
    }
    Ok(Json::Array(out))
}

pub(crate) fn variant_names(field: &FieldSpec) -> String {
    field
        .children
        .iter()
        .map(|v| format!("`{}`", v.hcl_key))
        .collect::<Vec<_>>()
        .join(", ")
}

fn first_object<'a>(node: &'a Node, path: &FieldPath) -> Result<Option<&'a Object>, MappingError> {
    Ok(expect_list(node, path)?
        .first()
        .and_then(TfValueExt::as_object))
}

fn mismatch(path: &FieldPath, expected: &'static str, node: &Node) -> MappingError {
    MappingError::TypeMismatch {
        path: path.clone(),
        expected,
        found: node.type_name().to_owned(),
    }
}

fn expect_str<'a>(node: &'a Node, path: &FieldPath) -> Result<&'a str, MappingError> {
    match node {
        Node::String(s) => Ok(s),
        _ => Err(mismatch(path, "string", node)),
    }
}

fn expect_bool(node: &Node, path: &FieldPath) -> Result<bool, MappingError> {
    match node {
        Node::Bool(b) => Ok(*b),
        _ => Err(mismatch(path, "bool", node)),
    }
}

fn expect_float(node: &Node, path: &FieldPath) -> Result<f64, MappingError> {
    match node {
        Node::Int(i) => Ok(*i as f64),
        Node::Float(f) => Ok(*f),
        Node::String(s) => s.parse().map_err(|_| mismatch(path, "number", node)),
        _ => Err(mismatch(path, "number", node)),
    }
}

fn expect_int(node: &Node, path: &FieldPath) -> Result<i64, MappingError> {
    match node {
        Node::Int(i) => Ok(*i),
        _ => integral(expect_float(node, path)?, path),
    }
}

/// Truncation is never silent: a fractional value is rejected.
pub(crate) fn integral(value: f64, path: &FieldPath) -> Result<i64, MappingError> {
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(MappingError::FractionalInteger {
            path: path.clone(),
            value,
        });
    }
    Ok(value as i64)
}

fn float_number(value: f64, path: &FieldPath) -> Result<Number, MappingError> {
    Number::from_f64(value).ok_or_else(|| MappingError::TypeMismatch {
        path: path.clone(),
        expected: "finite number",
        found: value.to_string(),
    })
}

/// A list element. Null elements cannot be sent; unknown ones never reach apply.
fn element<'a>(item: &'a TfValue, path: &FieldPath) -> Result<Option<&'a Node>, MappingError> {
    match item {
        Value::Value(node) => Ok(Some(node)),
        Value::Null => Err(MappingError::NullElement { path: path.clone() }),
        Value::Unknown => Ok(None),
    }
}

fn expect_list<'a>(node: &'a Node, path: &FieldPath) -> Result<&'a [TfValue], MappingError> {
    match node {
        Node::List(items) => Ok(items),
        _ => Err(mismatch(path, "list", node)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::value::{boolean, float, int, list, object, single_block, string};
    use serde_json::json;

    fn obj(entries: Vec<(&str, TfValue)>) -> Object {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect()
    }

    fn unit_field() -> FieldSpec {
        FieldSpec::one_of(
            "unit",
            vec![
                FieldSpec::block(
                    "canonical",
                    vec![
                        FieldSpec::string("per_unit_name"),
                        FieldSpec::string("unit_name").required(),
                    ],
                )
                .variant("canonical_unit"),
                FieldSpec::block("custom", vec![FieldSpec::string("label").required()])
                    .variant("custom_unit_label"),
            ],
        )
        .discriminated_by("type")
    }

    #[test]
    fn null_and_unknown_fields_are_omitted() {
        let fields = vec![
            FieldSpec::string("title"),
            FieldSpec::bool("show_legend"),
            FieldSpec::int("precision"),
            FieldSpec::string_list("tags"),
        ];
        let input = obj(vec![
            ("title", Value::Null),
            ("show_legend", Value::Unknown),
            ("precision", Value::Null),
            ("tags", Value::Null),
        ]);
        let out = build_object(&fields, &input, &FieldPath::root()).unwrap();
        assert!(out.is_empty(), "unexpected keys: {out:?}");
    }

    #[test]
    fn explicit_empty_list_is_kept() {
        let fields = vec![FieldSpec::string_list("exclude_only")];
        let empty = obj(vec![("exclude_only", list(vec![]))]);
        let out = build_object(&fields, &empty, &FieldPath::root()).unwrap();
        assert_eq!(Json::Object(out), json!({"exclude_only": []}));

        let unset = obj(vec![("exclude_only", Value::Null)]);
        let out = build_object(&fields, &unset, &FieldPath::root()).unwrap();
        assert!(!out.contains_key("exclude_only"));
    }

    #[test]
    fn null_list_elements_are_rejected() {
        let fields = vec![
            FieldSpec::string_list("tags"),
            FieldSpec::block_list("marker", vec![FieldSpec::string("value")]),
        ];
        let tags = obj(vec![("tags", list(vec![string("env:prod"), Value::Null]))]);
        assert_eq!(
            build_object(&fields, &tags, &FieldPath::root()),
            Err(MappingError::NullElement {
                path: FieldPath::root().attr("tags").index(1)
            })
        );

        let markers = obj(vec![(
            "marker",
            list(vec![Value::Null, object(obj(vec![("value", string("y = 4"))]))]),
        )]);
        assert_eq!(
            build_object(&fields, &markers, &FieldPath::root()),
            Err(MappingError::NullElement {
                path: FieldPath::root().attr("marker").index(0)
            })
        );
    }

    #[test]
    fn omit_empty_drops_populated_empties() {
        let fields = vec![
            FieldSpec::string_list("restricted_roles").omit_empty(),
            FieldSpec::bool("is_read_only").omit_empty(),
            FieldSpec::block_list("marker", vec![FieldSpec::string("value")]),
        ];
        let input = obj(vec![
            ("restricted_roles", list(vec![])),
            ("is_read_only", boolean(false)),
            ("marker", list(vec![])),
        ]);
        let out = build_object(&fields, &input, &FieldPath::root()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn json_path_creates_nested_objects() {
        let fields = vec![
            FieldSpec::string("live_span").path("time.live_span"),
            FieldSpec::string("search_query").path("search.query"),
        ];
        let input = obj(vec![
            ("live_span", string("1h")),
            ("search_query", string("status:error")),
        ]);
        let out = build_object(&fields, &input, &FieldPath::root()).unwrap();
        assert_eq!(
            Json::Object(out),
            json!({"time": {"live_span": "1h"}, "search": {"query": "status:error"}})
        );
    }

    #[test]
    fn numbers_keep_their_json_type() {
        let fields = vec![FieldSpec::int("precision"), FieldSpec::float("value")];
        let input = obj(vec![("precision", float(2.0)), ("value", int(4))]);
        let out = build_object(&fields, &input, &FieldPath::root()).unwrap();
        assert_eq!(out["precision"], json!(2));
        assert_eq!(out["value"].as_f64(), Some(4.0));

        let input = obj(vec![("precision", float(2.5))]);
        let err = build_object(&fields, &input, &FieldPath::root()).unwrap_err();
        assert!(matches!(err, MappingError::FractionalInteger { .. }));
    }

    #[test]
    fn oneof_injects_discriminator_of_the_populated_variant() {
        let fields = vec![unit_field()];
        let input = obj(vec![(
            "unit",
            single_block(obj(vec![
                (
                    "canonical",
                    single_block(obj(vec![
                        ("per_unit_name", string("second")),
                        ("unit_name", string("byte")),
                    ])),
                ),
                ("custom", list(vec![])),
            ])),
        )]);
        let out = build_object(&fields, &input, &FieldPath::root()).unwrap();
        assert_eq!(
            Json::Object(out),
            json!({"unit": {"type": "canonical_unit", "per_unit_name": "second", "unit_name": "byte"}})
        );
    }

    #[test]
    fn oneof_rejects_zero_or_several_variants() {
        let fields = vec![unit_field()];
        let none = obj(vec![(
            "unit",
            single_block(obj(vec![("canonical", list(vec![])), ("custom", list(vec![]))])),
        )]);
        let err = build_object(&fields, &none, &FieldPath::root()).unwrap_err();
        assert!(matches!(err, MappingError::OneOfVariant { found: 0, .. }));

        let both = obj(vec![(
            "unit",
            single_block(obj(vec![
                (
                    "canonical",
                    single_block(obj(vec![("unit_name", string("byte"))])),
                ),
                ("custom", single_block(obj(vec![("label", string("req"))]))),
            ])),
        )]);
        let err = build_object(&fields, &both, &FieldPath::root()).unwrap_err();
        assert!(matches!(err, MappingError::OneOfVariant { found: 2, .. }));
    }

    #[test]
    fn empty_variant_block_still_emits_its_tag() {
        let display = FieldSpec::one_of(
            "display",
            vec![
                FieldSpec::block("stacked", vec![FieldSpec::string("legend")]).variant("stacked"),
                FieldSpec::block("flat", vec![]).variant("flat"),
            ],
        )
        .discriminated_by("type");
        let input = obj(vec![(
            "display",
            single_block(obj(vec![
                ("stacked", list(vec![])),
                ("flat", single_block(Object::new())),
            ])),
        )]);
        let out = build_object(&[display], &input, &FieldPath::root()).unwrap();
        assert_eq!(Json::Object(out), json!({"display": {"type": "flat"}}));
    }

    #[test]
    fn injected_literal_depends_on_siblings() {
        let fields = vec![
            FieldSpec::block_list("formula", vec![FieldSpec::string("formula_expression")])
                .json("formulas"),
            FieldSpec::injected("response_format", "timeseries")
                .when_present(&["formulas", "queries"]),
        ];
        let with = obj(vec![(
            "formula",
            list(vec![object(obj(vec![("formula_expression", string("a"))]))]),
        )]);
        let out = build_object(&fields, &with, &FieldPath::root()).unwrap();
        assert_eq!(out["response_format"], json!("timeseries"));

        let without = obj(vec![("formula", list(vec![]))]);
        let out = build_object(&fields, &without, &FieldPath::root()).unwrap();
        assert!(!out.contains_key("response_format"));
    }

    #[test]
    fn matrix_rows_become_nested_arrays() {
        let fields = vec![FieldSpec::matrix(
            "static_splits",
            FieldSpec::block_list(
                "split_vector",
                vec![
                    FieldSpec::string("tag_key"),
                    FieldSpec::string_list("tag_values"),
                ],
            ),
        )];
        let input = obj(vec![(
            "static_splits",
            list(vec![object(obj(vec![(
                "split_vector",
                list(vec![object(obj(vec![
                    ("tag_key", string("service")),
                    ("tag_values", list(vec![string("web")])),
                ]))]),
            )]))]),
        )]);
        let out = build_object(&fields, &input, &FieldPath::root()).unwrap();
        assert_eq!(
            Json::Object(out),
            json!({"static_splits": [[{"tag_key": "service", "tag_values": ["web"]}]]})
        );
    }

    #[test]
    fn schema_only_fields_never_reach_json() {
        let fields = vec![FieldSpec::int_list("dashboard_lists").schema_only()];
        let input = obj(vec![("dashboard_lists", list(vec![int(1)]))]);
        assert!(build_object(&fields, &input, &FieldPath::root())
            .unwrap()
            .is_empty());
    }
}
