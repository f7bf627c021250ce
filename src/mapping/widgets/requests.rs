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

//! Widgets driven by metric, log or formula requests.

use crate::mapping::field::FieldSpec;

use super::fields::{
    axis_fields, conditional_formats_field, event_field, formula_field, log_query,
    marker_field, query_field, request_style_field, response_format, standard_query_fields,
    widget_sort_field, AGGREGATORS, SORT_ORDERS,
};

const REQUEST_DESCRIPTION: &str = "A nested block describing the request to use when displaying the widget. Multiple `request` blocks are allowed using the structure below (exactly one of `q`, `apm_query`, `log_query`, `rum_query`, `security_query` or `process_query` is required within the `request` block).";

/// `request` blocks, always sent as a `requests` array.
fn requests(children: Vec<FieldSpec>, description: &'static str) -> FieldSpec {
    FieldSpec::block_list("request", children)
        .json("requests")
        .keep_empty()
        .describe(description)
}

fn q() -> FieldSpec {
    FieldSpec::string("q").describe("The metric query to use for this widget.")
}

fn show_legend() -> FieldSpec {
    FieldSpec::bool("show_legend").describe("Whether or not to show the legend on this widget.")
}

fn with_standard_queries(mut fields: Vec<FieldSpec>) -> Vec<FieldSpec> {
    fields.extend(standard_query_fields());
    fields
}

fn timeseries_request() -> Vec<FieldSpec> {
    let mut fields = vec![
        q(),
        FieldSpec::string("display_type")
            .describe("How to display the marker lines.")
            .valid(&["area", "bars", "line", "overlay"]),
        FieldSpec::bool("on_right_yaxis")
            .describe("A Boolean indicating whether the request uses the right or left Y-Axis."),
        FieldSpec::block(
            "style",
            vec![
                FieldSpec::string("palette").describe("A color palette to apply to the widget. The available options are available at: https://docs.datadoghq.com/dashboards/widgets/timeseries/#appearance."),
                FieldSpec::string("line_type")
                    .describe("The type of lines displayed.")
                    .valid(&["dashed", "dotted", "solid"]),
                FieldSpec::string("line_width")
                    .describe("The width of line displayed.")
                    .valid(&["normal", "thick", "thin"]),
                FieldSpec::string("order_by")
                    .describe("How to order series in timeseries visualizations.")
                    .valid(&["tags", "values"]),
            ],
        )
        .describe("The style of the widget graph. Exactly one `style` block is allowed using the structure below."),
        FieldSpec::block_list(
            "metadata",
            vec![
                FieldSpec::string("expression")
                    .required()
                    .describe("The expression name."),
                FieldSpec::string("alias_name").describe("The expression alias."),
            ],
        )
        .describe("Used to define expression aliases. Multiple `metadata` blocks are allowed using the structure below."),
        log_query("network_query", "The network query to use in the widget."),
        log_query("audit_query", "The audit query to use in the widget."),
        log_query(
            "profile_metrics_query",
            "The profile metrics query to use in the widget.",
        ),
    ];
    fields.extend(standard_query_fields());
    fields.push(response_format("timeseries"));
    fields
}

pub fn timeseries() -> Vec<FieldSpec> {
    vec![
        show_legend(),
        FieldSpec::string("legend_size")
            .describe("The size of the legend displayed in the widget.")
            .valid(&["0", "2", "4", "8", "16", "auto"]),
        FieldSpec::string("legend_layout")
            .describe("The layout of the legend displayed in the widget.")
            .valid(&["auto", "horizontal", "vertical"]),
        FieldSpec::string_list("legend_columns")
            .set()
            .describe("A list of columns to display in the legend.")
            .valid(&["value", "avg", "sum", "min", "max"]),
        FieldSpec::block("yaxis", axis_fields()).describe(
            "A nested block describing the Y-Axis Controls. The structure of this block is described below.",
        ),
        FieldSpec::block("right_yaxis", axis_fields()).describe("A nested block describing the right Y-Axis Controls. See the `on_right_yaxis` property for which request will use this axis. The structure of this block is described below."),
        marker_field(),
        event_field(),
        requests(timeseries_request(), "A nested block describing the request to use when displaying the widget. Multiple `request` blocks are allowed using the structure below (exactly one of `q`, `apm_query`, `log_query`, `rum_query`, `network_query`, `security_query` or `process_query` is required within the `request` block)."),
    ]
}

pub fn change() -> Vec<FieldSpec> {
    let mut request = with_standard_queries(vec![
        q(),
        FieldSpec::string("change_type")
            .describe("Whether to show absolute or relative change.")
            .valid(&["absolute", "relative"]),
        FieldSpec::string("compare_to")
            .describe("Choose from when to compare current data to.")
            .valid(&["hour_before", "day_before", "week_before", "month_before"]),
        FieldSpec::bool("increase_good").describe("A Boolean indicating whether an increase in the value is good (displayed in green) or not (displayed in red)."),
        FieldSpec::string("order_by")
            .describe("What to order by.")
            .valid(&["change", "name", "present", "past"]),
        FieldSpec::string("order_dir")
            .describe("Widget sorting method.")
            .valid(SORT_ORDERS),
        FieldSpec::bool("show_present").describe("If set to `true`, displays the current value."),
    ]);
    request.push(response_format("scalar"));
    vec![requests(request, REQUEST_DESCRIPTION)]
}

pub(super) fn apm_stats_query() -> FieldSpec {
    FieldSpec::block(
        "apm_stats_query",
        vec![
            FieldSpec::string("service")
                .required()
                .describe("The service name."),
            FieldSpec::string("name")
                .required()
                .describe("The operation name associated with the service."),
            FieldSpec::string("env")
                .required()
                .describe("The environment name."),
            FieldSpec::string("primary_tag")
                .required()
                .describe("The organization's host group name and value."),
            FieldSpec::string("row_type")
                .required()
                .describe("The level of detail for the request.")
                .valid(&["service", "resource", "span"]),
            FieldSpec::string("resource").describe("The resource name."),
            FieldSpec::block_list(
                "columns",
                vec![
                    FieldSpec::string("name")
                        .required()
                        .describe("The column name."),
                    FieldSpec::string("alias").describe("A user-assigned alias for the column."),
                    FieldSpec::string("order")
                        .describe("Widget sorting methods.")
                        .valid(SORT_ORDERS),
                    FieldSpec::string("cell_display_mode")
                        .describe("A list of display modes for each table cell.")
                        .valid(&["number", "bar", "trend"]),
                ],
            )
            .describe("Column properties used by the front end for display."),
        ],
    )
    .describe("The APM stats query to use in the widget.")
}

fn distribution_axis(label: bool) -> Vec<FieldSpec> {
    let mut fields = vec![
        FieldSpec::string("scale")
            .describe("Specify the scale type, options: `linear`, `log`, `pow`, `sqrt`."),
        FieldSpec::string("min").describe("Specify the minimum value to show on the Y-axis."),
        FieldSpec::string("max").describe("Specify the maximum value to show on the Y-axis."),
        FieldSpec::bool("include_zero")
            .describe("Always include zero or fit the axis to the data range."),
    ];
    if label {
        fields.push(
            FieldSpec::string("label")
                .describe("The label of the axis to display on the graph."),
        );
    }
    fields
}

pub fn distribution() -> Vec<FieldSpec> {
    let request = with_standard_queries(vec![q(), request_style_field(), apm_stats_query()]);
    vec![
        show_legend(),
        FieldSpec::string("legend_size")
            .describe("The size of the legend displayed in the widget."),
        FieldSpec::block("xaxis", distribution_axis(false)).describe("A nested block describing the X-Axis Controls. Exactly one nested block is allowed using the structure below."),
        FieldSpec::block("yaxis", distribution_axis(true)).describe("A nested block describing the Y-Axis Controls. Exactly one nested block is allowed using the structure below."),
        requests(request, REQUEST_DESCRIPTION),
    ]
}

pub fn heatmap() -> Vec<FieldSpec> {
    let mut request = with_standard_queries(vec![q(), request_style_field()]);
    request.push(response_format("timeseries"));
    vec![
        show_legend(),
        FieldSpec::string("legend_size")
            .describe("The size of the legend displayed in the widget."),
        FieldSpec::block("yaxis", axis_fields()).describe(
            "A nested block describing the Y-Axis Controls. The structure of this block is described below.",
        ),
        event_field(),
        requests(request, REQUEST_DESCRIPTION),
    ]
}

pub fn hostmap() -> Vec<FieldSpec> {
    let fill_or_size = || with_standard_queries(vec![q()]);
    vec![
        FieldSpec::block(
            "request",
            vec![
                FieldSpec::block("fill", fill_or_size()).describe("The query used to fill the map. Exactly one nested block is allowed using the structure below (exactly one of `q`, `apm_query`, `log_query`, `rum_query`, `security_query` or `process_query` is required within the request block)."),
                FieldSpec::block("size", fill_or_size()).describe("The query used to size the map. Exactly one nested block is allowed using the structure below (exactly one of `q`, `apm_query`, `log_query`, `rum_query`, `security_query` or `process_query` is required within the request block)."),
            ],
        )
        .json("requests")
        .describe("A nested block describing the request to use when displaying the widget. Multiple `request` blocks are allowed using the structure below."),
        FieldSpec::string("node_type")
            .describe("The type of node used.")
            .valid(&["host", "container"]),
        FieldSpec::bool("no_metric_hosts")
            .describe("A Boolean indicating whether to show nodes with no metrics."),
        FieldSpec::bool("no_group_hosts")
            .describe("A Boolean indicating whether to show ungrouped nodes."),
        FieldSpec::string_list("group").describe("The list of tags to group nodes by."),
        FieldSpec::string_list("scope").describe("The list of tags to filter nodes by."),
        FieldSpec::block(
            "style",
            vec![
                FieldSpec::string("palette").describe("A color palette to apply to the widget. The available options are available at: https://docs.datadoghq.com/dashboards/widgets/timeseries/#appearance."),
                FieldSpec::bool("palette_flip")
                    .describe("A Boolean indicating whether to flip the palette tones."),
                FieldSpec::string("fill_min").describe("The min value to use to color the map."),
                FieldSpec::string("fill_max").describe("The max value to use to color the map."),
            ],
        )
        .describe("The style of the widget graph. One nested block is allowed using the structure below."),
    ]
}

pub fn query_value() -> Vec<FieldSpec> {
    let mut request = with_standard_queries(vec![
        q(),
        log_query("audit_query", "The audit query to use in the widget."),
        FieldSpec::string("aggregator")
            .describe("The aggregator to use for time aggregation.")
            .valid(AGGREGATORS),
        conditional_formats_field(),
    ]);
    request.push(response_format("scalar"));
    vec![
        FieldSpec::bool("autoscale")
            .describe("A Boolean indicating whether to automatically scale the tile."),
        FieldSpec::string("custom_unit")
            .describe("The unit for the value displayed in the widget."),
        FieldSpec::int("precision").describe("The precision to use when displaying the tile."),
        FieldSpec::string("text_align")
            .describe("The alignment of the widget's text.")
            .valid(&["center", "left", "right"]),
        FieldSpec::block(
            "timeseries_background",
            vec![
                FieldSpec::string("type")
                    .required()
                    .describe("Whether the Timeseries is made using an area or bars.")
                    .valid(&["area", "bars"]),
                FieldSpec::block("yaxis", axis_fields()).describe("A nested block describing the Y-Axis Controls. Exactly one nested block is allowed using the structure below."),
            ],
        )
        .describe("Set a timeseries on the widget background."),
        requests(request, REQUEST_DESCRIPTION),
    ]
}

pub fn toplist() -> Vec<FieldSpec> {
    let mut request = with_standard_queries(vec![
        q(),
        log_query("audit_query", "The audit query to use in the widget."),
        conditional_formats_field(),
        FieldSpec::block(
            "style",
            vec![FieldSpec::string("palette").describe("A color palette to apply to the widget. The available options are available at: https://docs.datadoghq.com/dashboards/widgets/timeseries/#appearance.")],
        )
        .describe("Define request for the widget's style."),
        widget_sort_field(),
    ]);
    request.push(response_format("scalar"));
    vec![
        FieldSpec::block(
            "style",
            vec![
                FieldSpec::one_of(
                    "display",
                    vec![
                        FieldSpec::block(
                            "stacked",
                            vec![FieldSpec::string("legend")
                                .describe("Whether to show the legend.")
                                .valid(&["automatic", "inline", "none"])],
                        )
                        .variant("stacked")
                        .describe("Display the toplist as stacked bars."),
                        FieldSpec::block("flat", vec![])
                            .variant("flat")
                            .describe("Display the toplist as flat bars."),
                    ],
                )
                .discriminated_by("type")
                .describe("The display mode for the widget."),
                FieldSpec::string("palette").describe("The color palette for the widget."),
                FieldSpec::string("scaling")
                    .describe("The scaling mode for the widget.")
                    .valid(&["absolute", "relative"]),
            ],
        )
        .describe("The style of the widget"),
        requests(request, REQUEST_DESCRIPTION),
    ]
}

fn scatterplot_axis_request() -> Vec<FieldSpec> {
    with_standard_queries(vec![
        q(),
        FieldSpec::string("aggregator")
            .describe("Aggregator used for the request.")
            .valid(AGGREGATORS),
    ])
}

pub fn scatterplot() -> Vec<FieldSpec> {
    let table = vec![
        query_field(),
        FieldSpec::block_list(
            "formula",
            vec![
                FieldSpec::string("formula_expression")
                    .json("formula")
                    .required()
                    .describe("A string expression built from queries, formulas, and functions."),
                FieldSpec::string("dimension")
                    .required()
                    .describe("Dimension of the Scatterplot.")
                    .valid(&["x", "y", "radius", "color"]),
                FieldSpec::string("alias").describe("An expression alias."),
            ],
        )
        .json("formulas")
        .describe("A list of formulas to use in the widget."),
        response_format("scalar"),
    ];
    vec![
        FieldSpec::block(
            "request",
            vec![
                FieldSpec::block("x", scatterplot_axis_request()).describe("The query used for the X-Axis. Exactly one nested block is allowed using the structure below (exactly one of `q`, `apm_query`, `log_query`, `rum_query`, `security_query`, `apm_stats_query` or `process_query` is required within the block)."),
                FieldSpec::block("y", scatterplot_axis_request()).describe("The query used for the Y-Axis. Exactly one nested block is allowed using the structure below (exactly one of `q`, `apm_query`, `log_query`, `rum_query`, `security_query`, `apm_stats_query` or `process_query` is required within the block)."),
                FieldSpec::block("scatterplot_table", table)
                    .json("table")
                    .describe("Scatterplot request containing formulas and functions."),
            ],
        )
        .json("requests")
        .describe("A nested block describing the request to use when displaying the widget. Exactly one `request` block is allowed using the structure below."),
        FieldSpec::block("xaxis", axis_fields()).describe("A nested block describing the X-Axis Controls. Exactly one nested block is allowed using the structure below."),
        FieldSpec::block("yaxis", axis_fields()).describe("A nested block describing the Y-Axis Controls. Exactly one nested block is allowed using the structure below."),
        FieldSpec::string_list("color_by_groups").describe("List of groups used for colors."),
    ]
}

pub fn sunburst() -> Vec<FieldSpec> {
    let mut request = with_standard_queries(vec![
        q(),
        log_query("network_query", "The network query to use in the widget."),
        log_query("audit_query", "The audit query to use in the widget."),
        FieldSpec::block(
            "style",
            vec![FieldSpec::string("palette").describe("A color palette to apply to the widget. The available options are available at: https://docs.datadoghq.com/dashboards/widgets/timeseries/#appearance.")],
        )
        .describe("Define style for the widget's request."),
    ]);
    request.push(response_format("scalar"));
    vec![
        FieldSpec::bool("hide_total")
            .describe("Whether or not to show the total value in the widget."),
        FieldSpec::one_of(
            "legend",
            vec![
                FieldSpec::block(
                    "legend_inline",
                    vec![
                        FieldSpec::string("type")
                            .required()
                            .describe("The type of legend (inline or automatic).")
                            .valid(&["inline", "automatic"]),
                        FieldSpec::bool("hide_value")
                            .describe("Whether to hide the values of the groups."),
                        FieldSpec::bool("hide_percent")
                            .describe("Whether to hide the percentages of the groups."),
                    ],
                )
                .matches(&["inline", "automatic"])
                .describe("Used to configure the inline legend. Cannot be used in conjunction with legend_table."),
                FieldSpec::block(
                    "legend_table",
                    vec![FieldSpec::string("type")
                        .required()
                        .describe("The type of legend (table or none).")
                        .valid(&["table", "none"])],
                )
                .matches(&["table", "none"])
                .describe("Used to configure the table legend. Cannot be used in conjunction with legend_inline."),
            ],
        )
        .discriminated_by("type")
        .describe("The legend of the widget, either inline or as a table."),
        requests(request, "Nested block describing the request to use when displaying the widget. Multiple `request` blocks are allowed with the structure below (exactly one of `q`, `log_query` or `rum_query` is required within the `request` block)."),
    ]
}

pub fn geomap() -> Vec<FieldSpec> {
    let request = vec![
        q(),
        log_query("log_query", "The log query to use in the widget."),
        log_query("rum_query", "The RUM query to use in the widget."),
        query_field(),
        formula_field(),
        response_format("scalar"),
    ];
    vec![
        FieldSpec::block(
            "style",
            vec![
                FieldSpec::string("palette")
                    .required()
                    .describe("The color palette to apply to the widget."),
                FieldSpec::bool("palette_flip")
                    .required()
                    .describe("A Boolean indicating whether to flip the palette tones."),
            ],
        )
        .describe("The style of the widget graph. One nested block is allowed using the structure below."),
        FieldSpec::block(
            "view",
            vec![FieldSpec::string("focus")
                .required()
                .describe("The two-letter ISO code of a country to focus the map on (or `WORLD`).")],
        )
        .required()
        .describe("The view of the world that the map should render."),
        requests(request, "A nested block describing the request to use when displaying the widget. Multiple `request` blocks are allowed using the structure below (exactly one of `q`, `log_query` or `rum_query` is required within the `request` block)."),
    ]
}

pub fn treemap() -> Vec<FieldSpec> {
    let request = vec![query_field(), formula_field(), response_format("scalar")];
    vec![
        FieldSpec::block_list("request", request)
            .json("requests")
            .describe("Nested block describing the request to use when displaying the widget."),
        FieldSpec::injected("color_by", "user"),
    ]
}

pub fn topology_map() -> Vec<FieldSpec> {
    let request = vec![
        FieldSpec::string("request_type")
            .required()
            .describe("The request type for the Topology request ('topology').")
            .valid(&["topology"]),
        FieldSpec::block(
            "query",
            vec![
                FieldSpec::string("data_source")
                    .required()
                    .describe("The data source for the Topology request ('service_map' or 'data_streams').")
                    .valid(&["service_map", "data_streams"]),
                FieldSpec::string("service")
                    .required()
                    .describe("The ID of the service to map."),
                FieldSpec::string_list("filters")
                    .required()
                    .describe("Your environment and primary tag (or `*` if enabled for your account)."),
            ],
        )
        .required()
        .describe("The query for a Topology request."),
    ];
    vec![requests(request, "A nested block describing the request to use when displaying the widget. Multiple request blocks are allowed using the structure below (`query` and `request_type` are required within the request).")]
}
