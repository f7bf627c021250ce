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

//! Tables, streams and the container widgets.

use crate::mapping::field::{FieldSpec, WidgetScope};

use super::fields::{
    conditional_formats_field, formula_field, log_query, process_query_fields, query_field,
    response_format, widget_sort_field, AGGREGATORS, SORT_ORDERS,
};
use super::requests::apm_stats_query;

fn facet_sort(description: &'static str) -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("column")
            .required()
            .describe("The facet path for the column."),
        FieldSpec::string("order")
            .required()
            .describe(description)
            .valid(SORT_ORDERS),
    ]
}

fn text_format_rule() -> Vec<FieldSpec> {
    vec![
        FieldSpec::block(
            "match",
            vec![
                FieldSpec::string("type")
                    .required()
                    .describe("Match or compare option.")
                    .valid(&[
                        "is",
                        "is_not",
                        "contains",
                        "does_not_contain",
                        "starts_with",
                        "ends_with",
                    ]),
                FieldSpec::string("value")
                    .required()
                    .describe("Table Widget Match String."),
            ],
        )
        .required()
        .describe("Match rule for the table widget text format."),
        FieldSpec::string("palette")
            .describe("The color palette to apply.")
            .valid(&[
                "white_on_red",
                "white_on_yellow",
                "white_on_green",
                "black_on_light_red",
                "black_on_light_yellow",
                "black_on_light_green",
                "red_on_white",
                "yellow_on_white",
                "green_on_white",
                "custom_bg",
                "custom_text",
            ]),
        FieldSpec::block(
            "replace",
            vec![
                FieldSpec::string("type")
                    .required()
                    .describe("Table widget text format replace all type.")
                    .valid(&["all", "substring"]),
                FieldSpec::string("with")
                    .required()
                    .describe("Table Widget Match String."),
                FieldSpec::string("substring").describe("Text that will be replaced."),
            ],
        )
        .describe("Match rule for the table widget text format."),
        FieldSpec::string("custom_bg_color").describe(
            "The custom color palette to apply to the background.",
        ),
        FieldSpec::string("custom_fg_color").describe(
            "The custom color palette to apply to the foreground text.",
        ),
    ]
}

fn query_table_request() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("q").describe("The metric query to use for this widget."),
        log_query("apm_query", "The query to use for this widget."),
        log_query("log_query", "The query to use for this widget."),
        FieldSpec::block("process_query", process_query_fields())
            .describe("The process query to use in the widget."),
        log_query("rum_query", "The query to use for this widget."),
        log_query("security_query", "The query to use for this widget."),
        apm_stats_query(),
        conditional_formats_field(),
        FieldSpec::string("aggregator")
            .describe("The aggregator to use for time aggregation.")
            .valid(AGGREGATORS),
        FieldSpec::string("alias")
            .describe("The alias for the column name (defaults to metric name)."),
        FieldSpec::int("limit").describe("The number of lines to show in the table."),
        FieldSpec::string("order")
            .describe("The sort order for the rows.")
            .valid(SORT_ORDERS),
        FieldSpec::string_list("cell_display_mode")
            .describe("A list of display modes for each table cell.")
            .valid(&["number", "bar", "trend"]),
        FieldSpec::matrix(
            "text_formats",
            FieldSpec::block_list("text_format", text_format_rule())
                .describe("The text format to apply to the items in a table widget column."),
        )
        .describe("Text formats define how to format text in table widget content. Multiple `text_formats` blocks are allowed using the structure below. This resource is in beta and is subject to change."),
        query_field(),
        formula_field(),
        widget_sort_field(),
        response_format("scalar"),
    ]
}

pub fn query_table() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("has_search_bar")
            .describe("Controls the display of the search bar.")
            .valid(&["always", "never", "auto"]),
        FieldSpec::block_list("request", query_table_request())
            .json("requests")
            .keep_empty()
            .describe("A nested block describing the request to use when displaying the widget. Multiple `request` blocks are allowed using the structure below (exactly one of `q`, `apm_query`, `log_query`, `rum_query`, `security_query`, `apm_stats_query` or `process_query` is required within the `request` block)."),
    ]
}

fn list_stream_query() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("data_source")
            .required()
            .describe("Source from which to query items to display in the stream.")
            .valid(&[
                "logs_stream",
                "audit_stream",
                "ci_pipeline_stream",
                "ci_test_stream",
                "rum_issue_stream",
                "apm_issue_stream",
                "trace_stream",
                "logs_issue_stream",
                "logs_pattern_stream",
                "logs_transaction_stream",
                "event_stream",
                "rum_stream",
                "llm_observability_stream",
            ]),
        FieldSpec::string("query_string").describe("Widget query."),
        FieldSpec::string("event_size")
            .describe("Size of events displayed in widget. Required if `data_source` is `event_stream`.")
            .valid(&["s", "l"]),
        FieldSpec::string("clustering_pattern_field_path").describe("Specifies the field for logs pattern clustering. Can only be used with `logs_pattern_stream`."),
        FieldSpec::string("storage").describe("Storage location (private beta)."),
        FieldSpec::string_list("indexes").describe("List of indexes."),
        FieldSpec::block_list(
            "group_by",
            vec![FieldSpec::string("facet").required().describe("Facet name")],
        )
        .describe("Group by configuration for the List Stream widget. Group by can only be used with `logs_pattern_stream` (up to 4 items) or `logs_transaction_stream` (one group by item is required) list stream source."),
        FieldSpec::block("sort", facet_sort("Widget sorting methods."))
            .describe("The facet and order to sort the data, for example: `{\"column\": \"time\", \"order\": \"desc\"}`."),
    ]
}

pub fn list_stream() -> Vec<FieldSpec> {
    vec![FieldSpec::block_list(
        "request",
        vec![
            FieldSpec::block_list(
                "columns",
                vec![
                    FieldSpec::string("field")
                        .required()
                        .describe("Widget column field."),
                    FieldSpec::string("width")
                        .required()
                        .describe("Widget column width.")
                        .valid(&["auto", "compact", "full"]),
                ],
            )
            .required()
            .keep_empty()
            .describe("Widget columns."),
            FieldSpec::string("response_format")
                .required()
                .describe("Widget response format.")
                .valid(&["event_list"]),
            FieldSpec::block("query", list_stream_query())
                .required()
                .describe("Updated list stream widget."),
        ],
    )
    .json("requests")
    .required()
    .keep_empty()
    .describe("Nested block describing the requests to use when displaying the widget. Multiple `request` blocks are allowed with the structure below.")]
}

pub fn slo_list() -> Vec<FieldSpec> {
    vec![FieldSpec::block_list(
        "request",
        vec![
            FieldSpec::string("request_type")
                .required()
                .describe("The request type for the SLO List request.")
                .valid(&["slo_list"]),
            FieldSpec::block(
                "query",
                vec![
                    FieldSpec::string("query_string")
                        .required()
                        .describe("Widget query."),
                    FieldSpec::int("limit")
                        .defaults_to(100)
                        .describe("Maximum number of results to display in the table."),
                    FieldSpec::block_list("sort", facet_sort("Widget sorting methods."))
                        .max_items(1)
                        .describe("The facet and order to sort the data, for example: `{\"column\": \"status.sli\", \"order\": \"desc\"}`."),
                ],
            )
            .required()
            .describe("Updated SLO List widget."),
        ],
    )
    .json("requests")
    .required()
    .keep_empty()
    .max_items(1)
    .describe("A nested block describing the request to use when displaying the widget. Exactly one `request` block is allowed.")]
}

fn split_config() -> Vec<FieldSpec> {
    vec![
        FieldSpec::block_list(
            "split_dimensions",
            vec![FieldSpec::string("one_graph_per")
                .required()
                .describe("The system interprets this attribute differently depending on the data source of the query being split. For metrics, it's a tag. For the events platform, it's an attribute or tag.")],
        )
        .required()
        .keep_empty()
        .max_items(1)
        .describe("The property by which the graph splits"),
        FieldSpec::int("limit")
            .describe("Maximum number of graphs to display in the widget."),
        FieldSpec::block(
            "sort",
            vec![
                FieldSpec::string("order")
                    .required()
                    .describe("Widget sorting methods.")
                    .valid(SORT_ORDERS),
                FieldSpec::block(
                    "compute",
                    vec![
                        FieldSpec::string("aggregation").describe(
                            "How to aggregate the sort metric for the purposes of ordering.",
                        ),
                        FieldSpec::string("metric")
                            .required()
                            .describe("The metric to use for sorting graphs."),
                    ],
                )
                .describe("Defines the metric and aggregation used as the sort value"),
            ],
        )
        .required()
        .describe("Controls the order in which graphs appear in the split."),
        FieldSpec::matrix(
            "static_splits",
            FieldSpec::block_list(
                "split_vector",
                vec![
                    FieldSpec::string("tag_key").required(),
                    FieldSpec::string_list("tag_values").required(),
                ],
            )
            .required()
            .describe("The split graph list contains a graph for each value of the split dimension."),
        )
        .max_items(100)
        .describe("The property by which the graph splits"),
    ]
}

pub fn split_graph() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("size")
            .required()
            .describe("Size of the individual graphs in the split.")
            .valid(&["xs", "sm", "md", "lg"]),
        FieldSpec::bool("has_uniform_y_axes").describe("Normalize y axes across graphs."),
        FieldSpec::block("split_config", split_config())
            .required()
            .describe("Encapsulates all user choices about how to split a graph."),
        FieldSpec::widget_definition("source_widget_definition", WidgetScope::SplitSource)
            .required()
            .describe("The original widget we are splitting on."),
    ]
}

pub fn group() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("layout_type")
            .required()
            .describe("The layout type of the group.")
            .valid(&["ordered"]),
        FieldSpec::string("background_color").describe("The background color of the group title, options: `vivid_blue`, `vivid_purple`, `vivid_pink`, `vivid_orange`, `vivid_yellow`, `vivid_green`, `blue`, `purple`, `pink`, `orange`, `yellow`, `green`, `gray` or `white`"),
        FieldSpec::string("banner_img")
            .describe("The image URL to display as a banner for the group."),
        FieldSpec::bool("show_title")
            .defaults_to(true)
            .describe("Whether to show the title or not."),
        FieldSpec::widgets("widget", WidgetScope::Group)
            .json("widgets")
            .keep_empty()
            .describe("The list of widgets in this group."),
    ]
}

fn template_variable_values() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("name")
            .required()
            .describe("The name of the variable."),
        FieldSpec::string("prefix").describe("The tag prefix associated with the variable. Only tags with this prefix appear in the variable dropdown."),
        FieldSpec::string_list("values")
            .required()
            .describe("One or many template variable values within the saved view, which will be unioned together using `OR` if more than one is specified."),
    ]
}

pub fn powerpack() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("powerpack_id")
            .required()
            .describe("UUID of the associated powerpack."),
        FieldSpec::string("background_color")
            .describe("The background color of the powerpack title."),
        FieldSpec::string("banner_img")
            .describe("URL of image to display as a banner for the powerpack."),
        FieldSpec::bool("show_title").describe("Whether to show the title of the powerpack."),
        FieldSpec::block(
            "template_variables",
            vec![
                FieldSpec::block_list("controlled_externally", template_variable_values())
                    .describe("Template variables controlled by the external resource, such as the dashboard this powerpack is on."),
                FieldSpec::block_list("controlled_by_powerpack", template_variable_values())
                    .describe("Template variables controlled at the powerpack level."),
            ],
        )
        .describe("The list of template variables for this powerpack."),
    ]
}
