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

//! Widget catalog.
//!
//! A widget is an object holding a computed `id`, an optional `widget_layout`
//! and one `<kind>_definition` block per widget kind allowed in its scope.
//! Exactly one definition block is set; its JSON carries the kind's `type`.

use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use serde_json::Value as Json;
use tf_provider::schema::Block;
use tf_provider::value::Value;

use super::build::{build_object, JsonMap};
use super::dashboard::dashboard_fields;
use super::error::{type_mismatch, FieldPath, MappingError};
use super::field::{FieldKind, FieldSpec, Presence, WidgetScope};
use super::flatten::flatten_object;
use super::plan::normalize_object;
use super::powerpack::powerpack_fields;
use super::schema;
use super::validate::check_object;
use super::value::{list, single_block, Object, TfValue, TfValueExt};

mod complex;
pub mod fields;
mod requests;
mod simple;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    AlertGraph,
    AlertValue,
    Change,
    CheckStatus,
    Distribution,
    EventStream,
    EventTimeline,
    FreeText,
    Geomap,
    Group,
    Heatmap,
    Hostmap,
    Iframe,
    Image,
    ListStream,
    LogStream,
    ManageStatus,
    Note,
    Powerpack,
    QueryTable,
    QueryValue,
    RunWorkflow,
    Scatterplot,
    Servicemap,
    ServiceLevelObjective,
    SloList,
    SplitGraph,
    Sunburst,
    Timeseries,
    Toplist,
    TopologyMap,
    TraceService,
    Treemap,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 33] = [
        WidgetKind::AlertGraph,
        WidgetKind::AlertValue,
        WidgetKind::Change,
        WidgetKind::CheckStatus,
        WidgetKind::Distribution,
        WidgetKind::EventStream,
        WidgetKind::EventTimeline,
        WidgetKind::FreeText,
        WidgetKind::Geomap,
        WidgetKind::Group,
        WidgetKind::Heatmap,
        WidgetKind::Hostmap,
        WidgetKind::Iframe,
        WidgetKind::Image,
        WidgetKind::ListStream,
        WidgetKind::LogStream,
        WidgetKind::ManageStatus,
        WidgetKind::Note,
        WidgetKind::Powerpack,
        WidgetKind::QueryTable,
        WidgetKind::QueryValue,
        WidgetKind::RunWorkflow,
        WidgetKind::Scatterplot,
        WidgetKind::Servicemap,
        WidgetKind::ServiceLevelObjective,
        WidgetKind::SloList,
        WidgetKind::SplitGraph,
        WidgetKind::Sunburst,
        WidgetKind::Timeseries,
        WidgetKind::Toplist,
        WidgetKind::TopologyMap,
        WidgetKind::TraceService,
        WidgetKind::Treemap,
    ];

    /// Name of the Terraform definition block.
    pub fn hcl_key(self) -> &'static str {
        match self {
            WidgetKind::AlertGraph => "alert_graph_definition",
            WidgetKind::AlertValue => "alert_value_definition",
            WidgetKind::Change => "change_definition",
            WidgetKind::CheckStatus => "check_status_definition",
            WidgetKind::Distribution => "distribution_definition",
            WidgetKind::EventStream => "event_stream_definition",
            WidgetKind::EventTimeline => "event_timeline_definition",
            WidgetKind::FreeText => "free_text_definition",
            WidgetKind::Geomap => "geomap_definition",
            WidgetKind::Group => "group_definition",
            WidgetKind::Heatmap => "heatmap_definition",
            WidgetKind::Hostmap => "hostmap_definition",
            WidgetKind::Iframe => "iframe_definition",
            WidgetKind::Image => "image_definition",
            WidgetKind::ListStream => "list_stream_definition",
            WidgetKind::LogStream => "log_stream_definition",
            WidgetKind::ManageStatus => "manage_status_definition",
            WidgetKind::Note => "note_definition",
            WidgetKind::Powerpack => "powerpack_definition",
            WidgetKind::QueryTable => "query_table_definition",
            WidgetKind::QueryValue => "query_value_definition",
            WidgetKind::RunWorkflow => "run_workflow_definition",
            WidgetKind::Scatterplot => "scatterplot_definition",
            WidgetKind::Servicemap => "servicemap_definition",
            WidgetKind::ServiceLevelObjective => "service_level_objective_definition",
            WidgetKind::SloList => "slo_list_definition",
            WidgetKind::SplitGraph => "split_graph_definition",
            WidgetKind::Sunburst => "sunburst_definition",
            WidgetKind::Timeseries => "timeseries_definition",
            WidgetKind::Toplist => "toplist_definition",
            WidgetKind::TopologyMap => "topology_map_definition",
            WidgetKind::TraceService => "trace_service_definition",
            WidgetKind::Treemap => "treemap_definition",
        }
    }

    /// Value of the definition `type` in the API payload.
    pub fn json_type(self) -> &'static str {
        match self {
            WidgetKind::ServiceLevelObjective => "slo",
            WidgetKind::SplitGraph => "split_group",
            kind => kind
                .hcl_key()
                .strip_suffix("_definition")
                .unwrap_or(kind.hcl_key()),
        }
    }

    pub fn from_json_type(json_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.json_type() == json_type)
    }

    pub fn description(self) -> &'static str {
        match self {
            WidgetKind::AlertGraph => "The definition for a Alert Graph widget.",
            WidgetKind::AlertValue => "The definition for an Alert Value widget.",
            WidgetKind::Change => "The definition for a Change widget.",
            WidgetKind::CheckStatus => "The definition for a Check Status widget.",
            WidgetKind::Distribution => "The definition for a Distribution widget.",
            WidgetKind::EventStream => "The definition for an Event Stream widget.",
            WidgetKind::EventTimeline => "The definition for an Event Timeline widget.",
            WidgetKind::FreeText => "The definition for a Free Text widget.",
            WidgetKind::Geomap => "The definition for a Geomap widget.",
            WidgetKind::Group => "The definition for a Group widget.",
            WidgetKind::Heatmap => "The definition for a Heatmap widget.",
            WidgetKind::Hostmap => "The definition for a Hostmap widget.",
            WidgetKind::Iframe => "The definition for an Iframe widget.",
            WidgetKind::Image => "The definition for an Image widget.",
            WidgetKind::ListStream => "The definition for a List Stream widget.",
            WidgetKind::LogStream => "The definition for an Log Stream widget.",
            WidgetKind::ManageStatus => "The definition for an Manage Status widget.",
            WidgetKind::Note => "The definition for a Note widget.",
            WidgetKind::Powerpack => "The definition for a Powerpack widget.",
            WidgetKind::QueryTable => "The definition for a Query Table widget.",
            WidgetKind::QueryValue => "The definition for a Query Value widget.",
            WidgetKind::RunWorkflow => "The definition for a Run Workflow widget.",
            WidgetKind::Scatterplot => "The definition for a Scatterplot widget.",
            WidgetKind::Servicemap => "The definition for a Service Map widget.",
            WidgetKind::ServiceLevelObjective => {
                "The definition for a Service Level Objective widget."
            }
            WidgetKind::SloList => "The definition for an SLO (Service Level Objective) List widget.",
            WidgetKind::SplitGraph => "The definition for a Split Graph widget.",
            WidgetKind::Sunburst => "The definition for a Sunburst widget.",
            WidgetKind::Timeseries => "The definition for a Timeseries widget.",
            WidgetKind::Toplist => "The definition for a Toplist widget.",
            WidgetKind::TopologyMap => "The definition for a Topology Map widget.",
            WidgetKind::TraceService => "The definition for a Trace Service widget.",
            WidgetKind::Treemap => "The definition for a Treemap widget.",
        }
    }

    /// Whether the kind may appear in widget lists of `scope`.
    pub fn in_scope(self, scope: WidgetScope) -> bool {
        match scope {
            WidgetScope::Dashboard => true,
            WidgetScope::Group | WidgetScope::SplitSource => !matches!(
                self,
                WidgetKind::Group | WidgetKind::Powerpack | WidgetKind::SplitGraph
            ),
            WidgetScope::Powerpack => {
                !matches!(self, WidgetKind::Powerpack | WidgetKind::SplitGraph)
            }
        }
    }

    fn own_fields(self) -> Vec<FieldSpec> {
        match self {
            WidgetKind::AlertGraph => simple::alert_graph(),
            WidgetKind::AlertValue => simple::alert_value(),
            WidgetKind::Change => requests::change(),
            WidgetKind::CheckStatus => simple::check_status(),
            WidgetKind::Distribution => requests::distribution(),
            WidgetKind::EventStream => simple::event_stream(),
            WidgetKind::EventTimeline => simple::event_timeline(),
            WidgetKind::FreeText => simple::free_text(),
            WidgetKind::Geomap => requests::geomap(),
            WidgetKind::Group => complex::group(),
            WidgetKind::Heatmap => requests::heatmap(),
            WidgetKind::Hostmap => requests::hostmap(),
            WidgetKind::Iframe => simple::iframe(),
            WidgetKind::Image => simple::image(),
            WidgetKind::ListStream => complex::list_stream(),
            WidgetKind::LogStream => simple::log_stream(),
            WidgetKind::ManageStatus => simple::manage_status(),
            WidgetKind::Note => simple::note(),
            WidgetKind::Powerpack => complex::powerpack(),
            WidgetKind::QueryTable => complex::query_table(),
            WidgetKind::QueryValue => requests::query_value(),
            WidgetKind::RunWorkflow => simple::run_workflow(),
            WidgetKind::Scatterplot => requests::scatterplot(),
            WidgetKind::Servicemap => simple::servicemap(),
            WidgetKind::ServiceLevelObjective => simple::service_level_objective(),
            WidgetKind::SloList => complex::slo_list(),
            WidgetKind::SplitGraph => complex::split_graph(),
            WidgetKind::Sunburst => requests::sunburst(),
            WidgetKind::Timeseries => requests::timeseries(),
            WidgetKind::Toplist => requests::toplist(),
            WidgetKind::TopologyMap => requests::topology_map(),
            WidgetKind::TraceService => simple::trace_service(),
            WidgetKind::Treemap => requests::treemap(),
        }
    }

    /// Common widget fields followed by the kind's own fields.
    fn fields(self) -> Vec<FieldSpec> {
        let mut fields = fields::common_widget_fields();
        fields.extend(self.own_fields());
        fields
    }
}

const SCOPES: [WidgetScope; 4] = [
    WidgetScope::Dashboard,
    WidgetScope::Group,
    WidgetScope::Powerpack,
    WidgetScope::SplitSource,
];

/// Field tables of every widget kind, per scope.
pub struct Catalog {
    kinds: HashMap<WidgetKind, Vec<FieldSpec>>,
    /// One definition block per kind allowed in the scope.
    definitions: HashMap<WidgetScope, Vec<FieldSpec>>,
    /// Widget-level fields (`id`, `widget_layout`).
    widget: Vec<FieldSpec>,
}

lazy_static! {
    static ref CATALOG: Catalog = Catalog::new();
}

pub fn catalog() -> &'static Catalog {
    &CATALOG
}

fn widget_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::int("id")
            .computed()
            .describe("The ID of the widget."),
        FieldSpec::block(
            "widget_layout",
            vec![
                FieldSpec::int("x")
                    .required()
                    .describe("The position of the widget on the x (horizontal) axis. Should be greater than or equal to 0."),
                FieldSpec::int("y")
                    .required()
                    .describe("The position of the widget on the y (vertical) axis. Should be greater than or equal to 0."),
                FieldSpec::int("width")
                    .required()
                    .describe("The width of the widget."),
                FieldSpec::int("height")
                    .required()
                    .describe("The height of the widget."),
                FieldSpec::bool("is_column_break")
                    .omit_empty()
                    .describe("Whether the widget should be the first one on the second column in high density or not. Only one widget in the dashboard should have this property set to `true`."),
            ],
        )
        .json("layout")
        .describe("The layout of the widget on a 'free' dashboard."),
    ]
}

impl Catalog {
    fn new() -> Self {
        let kinds: HashMap<WidgetKind, Vec<FieldSpec>> = WidgetKind::ALL
            .into_iter()
            .map(|kind| (kind, kind.fields()))
            .collect();
        let definitions = SCOPES
            .into_iter()
            .map(|scope| {
                let blocks = WidgetKind::ALL
                    .into_iter()
                    .filter(|kind| kind.in_scope(scope))
                    .map(|kind| {
                        FieldSpec::block(kind.hcl_key(), kinds[&kind].clone())
                            .describe(kind.description())
                    })
                    .collect();
                (scope, blocks)
            })
            .collect();
        Self {
            kinds,
            definitions,
            widget: widget_fields(),
        }
    }

    /// Fields of a widget definition, common fields included.
    pub fn fields(&self, kind: WidgetKind) -> &[FieldSpec] {
        self.kinds.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn definitions(&self, scope: WidgetScope) -> &[FieldSpec] {
        self.definitions
            .get(&scope)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn widget_fields(&self) -> &[FieldSpec] {
        &self.widget
    }

    /// Kinds allowed in `scope`, in catalog order.
    pub fn kinds_in(&self, scope: WidgetScope) -> impl Iterator<Item = WidgetKind> {
        WidgetKind::ALL
            .into_iter()
            .filter(move |kind| kind.in_scope(scope))
    }

    /// Check the widget tables and the resource tables embedding them.
    pub fn validate(&self) -> Result<()> {
        let definitions = WidgetKind::ALL
            .into_iter()
            .map(|kind| (kind.hcl_key(), self.fields(kind)));
        validate_tables(
            [
                ("dashboard", dashboard_fields()),
                ("powerpack", powerpack_fields()),
                ("widget", self.widget.as_slice()),
            ]
            .into_iter()
            .chain(definitions),
        )
    }
}

/// Check named field tables for inconsistencies, reporting the first defect.
pub fn validate_tables<'a>(
    tables: impl IntoIterator<Item = (&'a str, &'a [FieldSpec])>,
) -> Result<()> {
    let mut defects = Vec::new();
    for (path, fields) in tables {
        check_table(fields, path, &mut defects);
    }
    match defects.as_slice() {
        [] => Ok(()),
        [first, ..] => Err(anyhow!(
            "{} defect(s) in the field tables, first: {first}",
            defects.len()
        )),
    }
}

fn check_table(fields: &[FieldSpec], path: &str, defects: &mut Vec<MappingError>) {
    let mut seen = HashSet::new();
    let mut seen_json = HashSet::new();
    for field in fields {
        let mut found = Vec::new();
        if !seen.insert(field.hcl_key) {
            found.push((field.hcl_key, "duplicate key"));
        }
        if !field.schema_only && !seen_json.insert(field.json_segments().join(".")) {
            found.push((field.hcl_key, "duplicate json key"));
        }
        if field.presence == Presence::Required && field.default.is_some() {
            found.push((field.hcl_key, "required field with a default"));
        }
        match &field.kind {
            FieldKind::Block | FieldKind::BlockList
                if field.children.is_empty() && field.variant.is_none() =>
            {
                found.push((field.hcl_key, "block without fields"));
            }
            FieldKind::OneOf | FieldKind::OneOfList => {
                if field.discriminator.is_none() {
                    found.push((field.hcl_key, "oneof without discriminator"));
                }
                if field.children.is_empty() {
                    found.push((field.hcl_key, "oneof without variants"));
                }
                for variant in &field.children {
                    if variant.kind != FieldKind::Block || variant.variant.is_none() {
                        found.push((variant.hcl_key, "oneof variant must be a matched block"));
                    }
                }
            }
            FieldKind::Matrix => {
                if !matches!(field.children.as_slice(), [row] if row.kind == FieldKind::BlockList)
                {
                    found.push((field.hcl_key, "matrix must wrap exactly one block list"));
                }
            }
            FieldKind::Injected(_) if !field.children.is_empty() => {
                found.push((field.hcl_key, "injected field with children"));
            }
            _ => {}
        }
        defects.extend(found.into_iter().map(|(key, reason)| MappingError::SpecDefect {
            path: format!("{path}.{key}"),
            reason: reason.to_owned(),
        }));
        if !field.children.is_empty() {
            check_table(&field.children, &format!("{path}.{}", field.hcl_key), defects);
        }
    }
}

fn definition_of<'a>(obj: &'a Object, kind: WidgetKind) -> Option<&'a Object> {
    obj.get(kind.hcl_key())
        .and_then(TfValueExt::as_list)
        .and_then(|items| items.first())
        .and_then(TfValueExt::as_object)
}

/// Build the API payload of the single definition set in `obj`.
pub fn build_definition(
    scope: WidgetScope,
    obj: &Object,
    path: &FieldPath,
) -> Result<JsonMap, MappingError> {
    let catalog = catalog();
    let populated: Vec<WidgetKind> = catalog
        .kinds_in(scope)
        .filter(|kind| obj.get(kind.hcl_key()).is_some_and(TfValueExt::has_elements))
        .collect();
    let [kind] = populated.as_slice() else {
        return Err(MappingError::WidgetDefinition {
            path: path.clone(),
            found: populated.len(),
        });
    };
    let def_path = path.attr(kind.hcl_key()).index(0);
    let mut doc = match definition_of(obj, *kind) {
        Some(def) => build_object(catalog.fields(*kind), def, &def_path)?,
        None => JsonMap::new(),
    };
    doc.insert("type".to_owned(), Json::from(kind.json_type()));
    Ok(doc)
}

/// Build `{"definition": ..., "id": ..., "layout": ...}` from a widget object.
pub fn build_widget(scope: WidgetScope, obj: &Object, path: &FieldPath) -> Result<Json, MappingError> {
    let definition = build_definition(scope, obj, path)?;
    let mut widget = build_object(catalog().widget_fields(), obj, path)?;
    widget.insert("definition".to_owned(), Json::Object(definition));
    Ok(Json::Object(widget))
}

/// Flatten a definition payload into one block per kind of `scope`; only the
/// block matching the payload `type` is populated.
pub fn flatten_definition(
    scope: WidgetScope,
    doc: &JsonMap,
    path: &FieldPath,
) -> Result<Object, MappingError> {
    let catalog = catalog();
    let json_type = doc.get("type").and_then(Json::as_str);
    let kind = json_type
        .and_then(WidgetKind::from_json_type)
        .filter(|kind| kind.in_scope(scope));
    if kind.is_none() {
        tracing::warn!(
            path = %path,
            widget_type = json_type.unwrap_or("<missing>"),
            "unsupported widget type, leaving its definition empty"
        );
    }

    let mut out = Object::new();
    for candidate in catalog.kinds_in(scope) {
        let value: TfValue = if Some(candidate) == kind {
            let def_path = path.attr(candidate.hcl_key()).index(0);
            single_block(flatten_object(catalog.fields(candidate), doc, &def_path)?)
        } else {
            list(Vec::new())
        };
        out.insert(candidate.hcl_key().to_owned(), value);
    }
    Ok(out)
}

/// Flatten a widget payload: `id`, `layout` and its definition.
pub fn flatten_widget(
    scope: WidgetScope,
    doc: &JsonMap,
    path: &FieldPath,
) -> Result<Object, MappingError> {
    let empty = JsonMap::new();
    let definition = match doc.get("definition") {
        Some(Json::Object(definition)) => definition,
        None | Some(Json::Null) => &empty,
        Some(other) => return Err(type_mismatch(&path.attr("definition"), "object", other)),
    };
    let mut out = flatten_object(catalog().widget_fields(), doc, path)?;
    out.extend(flatten_definition(scope, definition, path)?);
    Ok(out)
}

pub(crate) fn check_definition(
    scope: WidgetScope,
    obj: &Object,
    path: &FieldPath,
    errors: &mut Vec<MappingError>,
) {
    let catalog = catalog();
    let blocks = catalog.definitions(scope);
    if blocks
        .iter()
        .any(|block| matches!(obj.get(block.hcl_key), Some(Value::Unknown)))
    {
        return;
    }
    let found = blocks
        .iter()
        .filter(|block| obj.get(block.hcl_key).is_some_and(TfValueExt::has_elements))
        .count();
    if found != 1 {
        errors.push(MappingError::WidgetDefinition {
            path: path.clone(),
            found,
        });
    }
    check_object(blocks, obj, path, errors);
}

pub(crate) fn check_widget(
    scope: WidgetScope,
    obj: &Object,
    path: &FieldPath,
    errors: &mut Vec<MappingError>,
) {
    check_object(catalog().widget_fields(), obj, path, errors);
    check_definition(scope, obj, path, errors);
}

pub(crate) fn normalize_definition(scope: WidgetScope, obj: &mut Object) {
    normalize_object(catalog().definitions(scope), obj);
}

pub(crate) fn normalize_widget(scope: WidgetScope, obj: &mut Object) {
    normalize_object(catalog().widget_fields(), obj);
    normalize_definition(scope, obj);
}

/// Terraform block of a widget list element.
pub fn widget_block(scope: WidgetScope) -> Block {
    let mut block = schema::block(catalog().widget_fields(), "");
    block.blocks.extend(definition_block(scope).blocks);
    block
}

/// Terraform block holding one definition block per kind of `scope`.
pub fn definition_block(scope: WidgetScope) -> Block {
    schema::block(catalog().definitions(scope), "")
}
