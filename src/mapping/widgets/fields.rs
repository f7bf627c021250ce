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

//! Field groups shared by several widget definitions.

use crate::mapping::field::FieldSpec;

pub(super) const AGGREGATORS: &[&str] = &["avg", "last", "max", "min", "sum", "percentile"];
pub(super) const SORT_ORDERS: &[&str] = &["asc", "desc"];
const EVENT_AGGREGATIONS: &[&str] = &[
    "count",
    "cardinality",
    "median",
    "pc75",
    "pc90",
    "pc95",
    "pc98",
    "pc99",
    "sum",
    "min",
    "max",
    "avg",
];
const EVENT_DATA_SOURCES: &[&str] = &[
    "logs",
    "spans",
    "network",
    "rum",
    "security_signals",
    "profiles",
    "audit",
    "events",
    "ci_tests",
    "ci_pipelines",
    "incident_analytics",
    "database_queries",
];
const CROSS_ORG_DESCRIPTION: &str =
    "The source organization UUID for cross organization queries. Feature in Private Beta.";
const PALETTE_DESCRIPTION: &str = "A color palette to apply to the widget. The available options are available at: https://docs.datadoghq.com/dashboards/widgets/timeseries/#appearance.";

/// Fields carried by every widget definition.
pub fn common_widget_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("title").describe("The title of the widget."),
        FieldSpec::string("title_size")
            .describe("The size of the widget's title (defaults to 16)."),
        FieldSpec::string("title_align")
            .describe("The alignment of the widget's title.")
            .valid(&["center", "left", "right"]),
        FieldSpec::string("live_span")
            .path("time.live_span")
            .describe("The timeframe to use when displaying the widget."),
        FieldSpec::block_list("custom_link", custom_link_fields())
            .json("custom_links")
            .describe("A nested block describing a custom link. Multiple `custom_link` blocks are allowed using the structure below."),
    ]
}

fn custom_link_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("label").describe("The label for the custom link URL."),
        FieldSpec::string("link").describe("The URL of the custom link."),
        FieldSpec::bool("is_hidden")
            .describe("The flag for toggling context menu link visibility."),
        FieldSpec::string("override_label").describe("The label ID that refers to a context menu link item. When `override_label` is provided, the client request omits the label field."),
    ]
}

pub fn axis_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("label").describe("The label of the axis to display on the graph."),
        FieldSpec::string("min").describe("Specify the minimum value to show on the Y-axis."),
        FieldSpec::string("max").describe("Specify the maximum value to show on the Y-axis."),
        FieldSpec::string("scale")
            .describe("Specify the scale type, options: `linear`, `log`, `pow`, `sqrt`."),
        FieldSpec::bool("include_zero")
            .describe("Always include zero or fit the axis to the data range."),
    ]
}

pub fn marker_field() -> FieldSpec {
    FieldSpec::block_list(
        "marker",
        vec![
            FieldSpec::string("value")
                .required()
                .describe("A mathematical expression describing the marker, for example: `y > 1`, `-5 < y < 0`, `y = 19`."),
            FieldSpec::string("display_type").describe("How the marker lines are displayed, options are one of {`error`, `warning`, `info`, `ok`} combined with one of {`dashed`, `solid`, `bold`}. Example: `error dashed`."),
            FieldSpec::string("label").describe("A label for the line or range."),
        ],
    )
    .json("markers")
    .describe("A nested block describing the marker to use when displaying the widget. The structure of this block is described below. Multiple `marker` blocks are allowed within a given `tile_def` block.")
}

pub fn event_field() -> FieldSpec {
    FieldSpec::block_list(
        "event",
        vec![
            FieldSpec::string("q")
                .required()
                .describe("The event query to use in the widget."),
            FieldSpec::string("tags_execution")
                .describe("The execution method for multi-value filters."),
        ],
    )
    .json("events")
    .describe("The definition of the event to overlay on the graph. Multiple `event` blocks are allowed using the structure below.")
}

pub fn request_style_field() -> FieldSpec {
    FieldSpec::block(
        "style",
        vec![FieldSpec::string("palette").describe(PALETTE_DESCRIPTION)],
    )
    .describe("The style of the widget graph. One nested block is allowed using the structure below.")
}

fn log_compute_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("aggregation")
            .required()
            .describe("The aggregation method."),
        FieldSpec::string("facet").describe("The facet name."),
        FieldSpec::int("interval").describe("Define the time interval in seconds."),
    ]
}

/// Legacy log-style query, reused for APM, RUM, security, network, audit and
/// profiling queries.
pub fn log_query_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("index")
            .required()
            .describe("The name of the index to query."),
        FieldSpec::string("search_query")
            .path("search.query")
            .describe("The search query to use."),
        FieldSpec::block("compute_query", log_compute_fields())
            .json("compute")
            .describe("`compute_query` or `multi_compute` is required. The map keys are listed below."),
        FieldSpec::block_list("multi_compute", log_compute_fields())
            .describe("`compute_query` or `multi_compute` is required. Multiple `multi_compute` blocks are allowed using the structure below."),
        FieldSpec::block_list(
            "group_by",
            vec![
                FieldSpec::string("facet").describe("The facet name."),
                FieldSpec::int("limit").describe("The maximum number of items in the group."),
                FieldSpec::block(
                    "sort_query",
                    vec![
                        FieldSpec::string("aggregation")
                            .required()
                            .describe("The aggregation method."),
                        FieldSpec::string("order")
                            .required()
                            .describe("Widget sorting methods.")
                            .valid(SORT_ORDERS),
                        FieldSpec::string("facet").describe("The facet name."),
                    ],
                )
                .json("sort")
                .describe("A list of exactly one element describing the sort query to use."),
            ],
        )
        .describe("Multiple `group_by` blocks are allowed using the structure below."),
    ]
}

pub fn log_query(hcl_key: &'static str, description: &'static str) -> FieldSpec {
    FieldSpec::block(hcl_key, log_query_fields()).describe(description)
}

pub fn process_query_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("metric")
            .required()
            .describe("Your chosen metric."),
        FieldSpec::string("search_by").describe("Your chosen search term."),
        FieldSpec::string_list("filter_by").describe("A list of processes."),
        FieldSpec::int("limit").describe("The max number of items in the filter list."),
    ]
}

fn cross_org_uuids() -> FieldSpec {
    FieldSpec::string_list("cross_org_uuids")
        .max_items(1)
        .describe(CROSS_ORG_DESCRIPTION)
}

fn metric_query_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("data_source")
            .defaults_to("metrics")
            .describe("The data source for metrics queries."),
        FieldSpec::string("query")
            .required()
            .describe("The metrics query definition."),
        FieldSpec::string("aggregator")
            .describe("The aggregation methods available for metrics queries.")
            .valid(AGGREGATORS),
        FieldSpec::string("name")
            .required()
            .describe("The name of the query for use in formulas."),
        cross_org_uuids(),
        FieldSpec::string("semantic_mode").describe("Semantic mode for metrics queries. This determines how metrics from different sources are combined or displayed."),
    ]
}

fn event_query_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("data_source")
            .required()
            .describe("The data source for event platform-based queries.")
            .valid(EVENT_DATA_SOURCES),
        FieldSpec::string("storage").describe("Storage location (private beta)."),
        FieldSpec::block(
            "search",
            vec![FieldSpec::string("query")
                .required()
                .describe("The events search string.")],
        )
        .describe("The search options."),
        FieldSpec::string_list("indexes")
            .describe("An array of index names to query in the stream."),
        cross_org_uuids(),
        FieldSpec::block_list(
            "compute",
            vec![
                FieldSpec::string("aggregation")
                    .required()
                    .describe("The aggregation methods for event platform queries.")
                    .valid(EVENT_AGGREGATIONS),
                FieldSpec::int("interval").describe("A time interval in milliseconds."),
                FieldSpec::string("metric").describe("The measurable attribute to compute."),
            ],
        )
        .required()
        .keep_empty()
        .describe("The compute options."),
        FieldSpec::block_list(
            "group_by",
            vec![
                FieldSpec::string("facet")
                    .required()
                    .describe("The event facet."),
                FieldSpec::int("limit").describe("The number of groups to return."),
                FieldSpec::block(
                    "sort",
                    vec![
                        FieldSpec::string("aggregation")
                            .required()
                            .describe("The aggregation methods for the event platform queries.")
                            .valid(EVENT_AGGREGATIONS),
                        FieldSpec::string("metric")
                            .describe("The metric used for sorting group by results."),
                        FieldSpec::string("order")
                            .describe("Direction of sort.")
                            .valid(SORT_ORDERS),
                    ],
                )
                .describe("The options for sorting group by results."),
            ],
        )
        .describe("Group by options."),
        FieldSpec::string("name")
            .required()
            .describe("The name of query for use in formulas."),
    ]
}

fn formula_process_query_fields() -> Vec<FieldSpec> {
    vec![
        cross_org_uuids(),
        FieldSpec::string("data_source")
            .required()
            .describe("The data source for process queries.")
            .valid(&["process", "container"]),
        FieldSpec::string("metric")
            .required()
            .describe("The process metric name."),
        FieldSpec::string("text_filter").describe("The text to use as a filter."),
        FieldSpec::string_list("tag_filters").describe("An array of tags to filter by."),
        FieldSpec::int("limit").describe("The number of hits to return."),
        FieldSpec::string("sort")
            .defaults_to("desc")
            .describe("The direction of the sort.")
            .valid(SORT_ORDERS),
        FieldSpec::string("aggregator")
            .describe("The aggregation methods available for metrics queries.")
            .valid(AGGREGATORS),
        FieldSpec::bool("is_normalized_cpu")
            .describe("Whether to normalize the CPU percentages."),
        FieldSpec::string("name")
            .required()
            .describe("The name of query for use in formulas."),
    ]
}

fn apm_primary_tag_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("primary_tag_name").describe("The name of the second primary tag used within APM; required when `primary_tag_value` is specified."),
        FieldSpec::string("primary_tag_value").describe("Filter APM data by the second primary tag. `primary_tag_name` must also be specified."),
    ]
}

fn apm_dependency_stats_query_fields() -> Vec<FieldSpec> {
    let mut fields = vec![
        FieldSpec::string("data_source")
            .required()
            .describe("The data source for APM Dependency Stats queries.")
            .valid(&["apm_dependency_stats"]),
        cross_org_uuids(),
        FieldSpec::string("env").required().describe("APM environment."),
        FieldSpec::string("stat")
            .required()
            .describe("APM statistic.")
            .valid(&[
                "avg_duration",
                "avg_root_duration",
                "avg_spans_per_trace",
                "error_rate",
                "pct_exec_time",
                "pct_of_traces",
                "total_traces_count",
            ]),
        FieldSpec::string("operation_name")
            .required()
            .describe("Name of operation on service."),
        FieldSpec::string("resource_name")
            .required()
            .describe("APM resource."),
        FieldSpec::string("service").required().describe("APM service."),
    ];
    fields.extend(apm_primary_tag_fields());
    fields.push(FieldSpec::bool("is_upstream").describe(
        "Determines whether stats for upstream or downstream dependencies should be queried.",
    ));
    fields.push(
        FieldSpec::string("name")
            .required()
            .describe("The name of query for use in formulas."),
    );
    fields
}

fn apm_resource_stats_query_fields() -> Vec<FieldSpec> {
    let mut fields = vec![
        FieldSpec::string("data_source")
            .required()
            .describe("The data source for APM Resource Stats queries.")
            .valid(&["apm_resource_stats"]),
        cross_org_uuids(),
        FieldSpec::string("env").required().describe("APM environment."),
        FieldSpec::string("name")
            .required()
            .describe("The name of query for use in formulas."),
        FieldSpec::string("stat")
            .required()
            .describe("APM statistic.")
            .valid(&[
                "errors",
                "error_rate",
                "hits",
                "latency_avg",
                "latency_distribution",
                "latency_max",
                "latency_p50",
                "latency_p75",
                "latency_p90",
                "latency_p95",
                "latency_p99",
            ]),
        FieldSpec::string("operation_name").describe("Name of operation on service."),
        FieldSpec::string("resource_name").describe("APM resource."),
        FieldSpec::string("service").required().describe("APM service."),
    ];
    fields.extend(apm_primary_tag_fields());
    fields.push(FieldSpec::string_list("group_by").describe("Array of fields to group results by."));
    fields
}

fn slo_query_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("data_source")
            .required()
            .describe("The data source for SLO queries.")
            .valid(&["slo"]),
        cross_org_uuids(),
        FieldSpec::string("slo_id")
            .required()
            .describe("ID of an SLO to query."),
        FieldSpec::string("measure")
            .required()
            .describe("SLO measures queries.")
            .valid(&[
                "good_events",
                "bad_events",
                "slo_status",
                "error_budget_remaining",
                "burn_rate",
                "error_budget_burndown",
            ]),
        FieldSpec::string("name").describe("The name of query for use in formulas."),
        FieldSpec::string("group_mode")
            .defaults_to("overall")
            .describe("Group mode to query measures.")
            .valid(&["overall", "components"]),
        FieldSpec::string("slo_query_type")
            .defaults_to("metric")
            .describe("type of the SLO to query.")
            .valid(&["metric", "time_slice"]),
        FieldSpec::string("additional_query_filters")
            .describe("Additional filters applied to the SLO query."),
    ]
}

fn cloud_cost_query_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("data_source")
            .required()
            .describe("The data source for cloud cost queries.")
            .valid(&["cloud_cost"]),
        cross_org_uuids(),
        FieldSpec::string("query")
            .required()
            .describe("The cloud cost query definition."),
        FieldSpec::string("aggregator")
            .describe("The aggregation methods available for cloud cost queries.")
            .valid(AGGREGATORS),
        FieldSpec::string("name")
            .required()
            .describe("The name of the query for use in formulas."),
    ]
}

/// Formula and function queries. Each `query` block holds one variant, chosen
/// in JSON by its `data_source`.
pub fn query_field() -> FieldSpec {
    FieldSpec::one_of_list(
        "query",
        vec![
            FieldSpec::block("metric_query", metric_query_fields())
                .matches(&["metrics"])
                .describe("A timeseries formula and functions metrics query."),
            FieldSpec::block("event_query", event_query_fields())
                .matches(EVENT_DATA_SOURCES)
                .describe("A timeseries formula and functions events query."),
            FieldSpec::block("process_query", formula_process_query_fields())
                .matches(&["process", "container"])
                .describe("The process query using formulas and functions."),
            FieldSpec::block(
                "apm_dependency_stats_query",
                apm_dependency_stats_query_fields(),
            )
            .matches(&["apm_dependency_stats"])
            .describe("The APM Dependency Stats query using formulas and functions."),
            FieldSpec::block("apm_resource_stats_query", apm_resource_stats_query_fields())
                .matches(&["apm_resource_stats"])
                .describe("The APM Resource Stats query using formulas and functions."),
            FieldSpec::block("slo_query", slo_query_fields())
                .matches(&["slo"])
                .describe("The SLO query using formulas and functions."),
            FieldSpec::block("cloud_cost_query", cloud_cost_query_fields())
                .matches(&["cloud_cost"])
                .describe("The Cloud Cost query using formulas and functions."),
        ],
    )
    .discriminated_by("data_source")
    .json("queries")
    .describe("A list of queries to use in the widget.")
}

pub fn conditional_format_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("comparator")
            .required()
            .describe("The comparator to use.")
            .valid(&["<", "<=", ">", ">="]),
        FieldSpec::float("value")
            .required()
            .describe("A value for the comparator."),
        FieldSpec::string("palette")
            .required()
            .describe("The color palette to apply.")
            .valid(&[
                "blue",
                "custom_bg",
                "custom_image",
                "custom_text",
                "gray_on_white",
                "grey",
                "green",
                "orange",
                "red",
                "red_on_white",
                "white_on_gray",
                "white_on_green",
                "green_on_white",
                "white_on_red",
                "white_on_yellow",
                "yellow_on_white",
                "black_on_light_yellow",
                "black_on_light_green",
                "black_on_light_red",
            ]),
        FieldSpec::string("custom_bg_color").describe(
            "The color palette to apply to the background, same values available as palette.",
        ),
        FieldSpec::string("custom_fg_color").describe(
            "The color palette to apply to the foreground, same values available as palette.",
        ),
        FieldSpec::string("image_url").describe("Displays an image as the background."),
        FieldSpec::bool("hide_value").describe("Setting this to True hides values."),
        FieldSpec::string("timeframe").describe("Defines the displayed timeframe."),
        FieldSpec::string("metric").describe(
            "The metric from the request to correlate with this conditional format.",
        ),
    ]
}

pub fn conditional_formats_field() -> FieldSpec {
    FieldSpec::block_list("conditional_formats", conditional_format_fields())
        .describe("Conditional formats allow you to set the color of your widget content or background depending on the rule applied to your data. Multiple `conditional_formats` blocks are allowed using the structure below.")
}

fn number_format_field() -> FieldSpec {
    FieldSpec::block(
        "number_format",
        vec![
            FieldSpec::one_of(
                "unit",
                vec![
                    FieldSpec::block(
                        "canonical",
                        vec![
                            FieldSpec::string("per_unit_name").describe("per unit name. If you want to represent megabytes/s, you set 'unit_name' = 'megabyte' and 'per_unit_name = 'second'"),
                            FieldSpec::string("unit_name")
                                .required()
                                .describe("Unit name. It should be in singular form ('megabyte' and not 'megabytes')"),
                        ],
                    )
                    .variant("canonical_unit")
                    .describe("Canonical Units"),
                    FieldSpec::block(
                        "custom",
                        vec![FieldSpec::string("label")
                            .required()
                            .describe("Unit label")],
                    )
                    .variant("custom_unit_label")
                    .describe("Use custom (non canonical metrics)"),
                ],
            )
            .discriminated_by("type")
            .required()
            .describe("Unit of the number format."),
            FieldSpec::block(
                "unit_scale",
                vec![
                    FieldSpec::injected("type", "canonical_unit"),
                    FieldSpec::string("unit_name")
                        .required()
                        .describe("The name of the unit."),
                ],
            )
            .describe("The unit scale of the number format."),
        ],
    )
    .describe("Number formatting options for the formula.")
}

/// Per-formula options. Formulas of every formula-capable request use them.
pub fn formula_field() -> FieldSpec {
    FieldSpec::block_list(
        "formula",
        vec![
            FieldSpec::string("formula_expression")
                .json("formula")
                .required()
                .describe("A string expression built from queries, formulas, and functions."),
            FieldSpec::string("alias").describe("An expression alias."),
            FieldSpec::block(
                "limit",
                vec![
                    FieldSpec::int("count").describe("The number of results to return."),
                    FieldSpec::string("order")
                        .describe("The direction of the sort.")
                        .valid(SORT_ORDERS),
                ],
            )
            .describe("The options for limiting results returned."),
            FieldSpec::string("cell_display_mode")
                .describe("A list of display modes for each table cell.")
                .valid(&["number", "bar", "trend"]),
            FieldSpec::block(
                "cell_display_mode_options",
                vec![
                    FieldSpec::string("trend_type")
                        .describe("The type of trend line to display.")
                        .valid(&["area", "line", "bars"]),
                    FieldSpec::string("y_scale")
                        .describe("The scale of the y-axis.")
                        .valid(&["shared", "independent"]),
                ],
            )
            .describe("Options for the cell display mode. Only used when `cell_display_mode` is set to `trend`."),
            conditional_formats_field(),
            FieldSpec::block(
                "style",
                vec![
                    FieldSpec::string("palette").describe("The color palette used to display the formula. A guide to the available color palettes can be found at https://docs.datadoghq.com/dashboards/guide/widget_colors."),
                    FieldSpec::int("palette_index")
                        .describe("Index specifying which color to use within the palette."),
                ],
            )
            .describe("Styling options for widget formulas."),
            number_format_field(),
        ],
    )
    .json("formulas")
    .describe("A list of formulas to use in the widget.")
}

/// `response_format` tag sent along formula requests.
pub fn response_format(format: &'static str) -> FieldSpec {
    FieldSpec::injected("response_format", format).when_present(&["formulas", "queries"])
}

/// Legacy query sources plus formula queries, accepted by most requests.
pub fn standard_query_fields() -> Vec<FieldSpec> {
    vec![
        log_query("log_query", "The log query to use in the widget."),
        log_query("apm_query", "The APM query to use in the widget."),
        log_query("rum_query", "The RUM query to use in the widget."),
        log_query("security_query", "The security query to use in the widget."),
        FieldSpec::block("process_query", process_query_fields()).describe(
            "The process query to use in the widget. The structure of this block is described below.",
        ),
        query_field(),
        formula_field(),
    ]
}

/// Request-level `sort` of scalar formula requests.
pub fn widget_sort_field() -> FieldSpec {
    FieldSpec::block(
        "sort",
        vec![
            FieldSpec::int("count").describe("The number of items to limit the widget to."),
            FieldSpec::one_of_list(
                "order_by",
                vec![
                    FieldSpec::block(
                        "formula_sort",
                        vec![
                            FieldSpec::int("index")
                                .required()
                                .describe("The index of the formula to sort by."),
                            FieldSpec::string("order")
                                .required()
                                .describe("The direction of the sort.")
                                .valid(SORT_ORDERS),
                        ],
                    )
                    .variant("formula")
                    .describe("The formula to sort the widget by."),
                    FieldSpec::block(
                        "group_sort",
                        vec![
                            FieldSpec::string("name")
                                .required()
                                .describe("The name of the group."),
                            FieldSpec::string("order")
                                .required()
                                .describe("The direction of the sort.")
                                .valid(SORT_ORDERS),
                        ],
                    )
                    .variant("group")
                    .describe("The group to sort the widget by."),
                ],
            )
            .discriminated_by("type")
            .describe("The array of items to sort the widget by in order."),
        ],
    )
    .describe("The options for sorting the widget results.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::build::build_object;
    use crate::mapping::error::FieldPath;
    use crate::mapping::flatten::flatten_object;
    use crate::mapping::value::TfValueExt;
    use serde_json::json;

    #[test]
    fn queries_are_routed_by_data_source() {
        let fields = vec![query_field()];
        let doc = json!({"queries": [
            {"data_source": "metrics", "name": "a", "query": "avg:cpu{*}"},
            {"data_source": "logs", "name": "b", "compute": [{"aggregation": "count"}]},
            {"data_source": "container", "name": "c", "metric": "process.stat.cpu"},
            {"data_source": "slo", "slo_id": "abc", "measure": "slo_status"},
        ]});
        let serde_json::Value::Object(doc) = doc else {
            unreachable!()
        };
        let state = flatten_object(&fields, &doc, &FieldPath::root()).unwrap();
        let queries = state["query"].as_list().unwrap();
        let populated: Vec<&str> = queries
            .iter()
            .map(|q| {
                q.as_object()
                    .unwrap()
                    .iter()
                    .find(|(_, v)| v.has_elements())
                    .map(|(k, _)| k.as_str())
                    .unwrap()
            })
            .collect();
        assert_eq!(
            populated,
            vec!["metric_query", "event_query", "process_query", "slo_query"]
        );

        let rebuilt = build_object(&fields, &state, &FieldPath::root()).unwrap();
        assert_eq!(rebuilt["queries"][1]["data_source"], json!("logs"));
        assert_eq!(rebuilt["queries"][1]["compute"], json!([{"aggregation": "count"}]));
    }

    #[test]
    fn number_format_units_carry_their_type() {
        let fields = vec![formula_field()];
        let doc = json!({"formulas": [{
            "formula": "a / b",
            "number_format": {
                "unit": {"type": "custom_unit_label", "label": "req"},
                "unit_scale": {"type": "canonical_unit", "unit_name": "kilo"}
            }
        }]});
        let serde_json::Value::Object(doc) = doc else {
            unreachable!()
        };
        let state = flatten_object(&fields, &doc, &FieldPath::root()).unwrap();
        let rebuilt = build_object(&fields, &state, &FieldPath::root()).unwrap();
        assert_eq!(
            rebuilt["formulas"][0]["number_format"],
            json!({
                "unit": {"type": "custom_unit_label", "label": "req"},
                "unit_scale": {"type": "canonical_unit", "unit_name": "kilo"}
            })
        );
    }

    #[test]
    fn widget_sort_tags_each_order() {
        let fields = vec![widget_sort_field()];
        let doc = json!({"sort": {"count": 10, "order_by": [
            {"type": "formula", "index": 0, "order": "desc"},
            {"type": "group", "name": "service", "order": "asc"}
        ]}});
        let serde_json::Value::Object(doc) = doc.clone() else {
            unreachable!()
        };
        let state = flatten_object(&fields, &doc, &FieldPath::root()).unwrap();
        let rebuilt = build_object(&fields, &state, &FieldPath::root()).unwrap();
        assert_eq!(serde_json::Value::Object(rebuilt), serde_json::Value::Object(doc));
    }
}
