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

//! Widgets without requests.

use crate::mapping::field::FieldSpec;

use super::fields::SORT_ORDERS;

const ALIGNMENTS: &[&str] = &["center", "left", "right"];
const VERTICAL_ALIGNMENTS: &[&str] = &["center", "top", "bottom"];

fn text_align(description: &'static str) -> FieldSpec {
    FieldSpec::string("text_align")
        .describe(description)
        .valid(ALIGNMENTS)
}

fn alert_id() -> FieldSpec {
    FieldSpec::string("alert_id")
        .required()
        .describe("The ID of the monitor used by the widget.")
}

fn tags_execution() -> FieldSpec {
    FieldSpec::string("tags_execution")
        .describe("The execution method for multi-value filters, options: `and` or `or`.")
}

pub fn alert_graph() -> Vec<FieldSpec> {
    vec![
        alert_id(),
        FieldSpec::string("viz_type")
            .required()
            .describe("Type of visualization to use when displaying the widget.")
            .valid(&["timeseries", "toplist"]),
    ]
}

pub fn alert_value() -> Vec<FieldSpec> {
    vec![
        alert_id(),
        FieldSpec::int("precision").describe(
            "The precision to use when displaying the value. Use `*` for maximum precision.",
        ),
        FieldSpec::string("unit").describe("The unit for the value displayed in the widget."),
        text_align("The alignment of the text in the widget."),
    ]
}

pub fn free_text() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("text")
            .required()
            .describe("The text to display in the widget."),
        FieldSpec::string("color").describe("The color of the text in the widget."),
        FieldSpec::string("font_size").describe("The size of the text in the widget."),
        text_align("The alignment of the text in the widget."),
    ]
}

pub fn iframe() -> Vec<FieldSpec> {
    vec![FieldSpec::string("url")
        .required()
        .describe("The URL to use as a data source for the widget.")]
}

pub fn image() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("url")
            .required()
            .describe("The URL to use as a data source for the widget."),
        FieldSpec::string("url_dark_theme")
            .describe("The URL in dark mode to use as a data source for the widget."),
        FieldSpec::string("sizing")
            .describe("The preferred method to adapt the dimensions of the image. The values are based on the image `object-fit` CSS properties. Note: `zoom`, `fit` and `center` values are deprecated.")
            .valid(&["fill", "contain", "cover", "none", "scale-down", "zoom", "fit", "center"]),
        FieldSpec::string("margin")
            .describe("The margins to use around the image. Note: `small` and `large` values are deprecated.")
            .valid(&["sm", "md", "lg", "small", "large"]),
        FieldSpec::bool("has_background")
            .defaults_to(true)
            .describe("Whether to display a background or not."),
        FieldSpec::bool("has_border")
            .defaults_to(true)
            .describe("Whether to display a border or not."),
        FieldSpec::string("horizontal_align")
            .describe("The horizontal alignment for the widget.")
            .valid(ALIGNMENTS),
        FieldSpec::string("vertical_align")
            .describe("The vertical alignment for the widget.")
            .valid(VERTICAL_ALIGNMENTS),
    ]
}

pub fn note() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("content")
            .required()
            .not_empty()
            .describe("The content of the note."),
        FieldSpec::string("background_color").describe("The background color of the note."),
        FieldSpec::string("font_size").describe("The size of the text."),
        text_align("The alignment of the widget's text."),
        FieldSpec::string("vertical_align")
            .describe("The vertical alignment for the widget.")
            .valid(VERTICAL_ALIGNMENTS),
        FieldSpec::bool("has_padding")
            .defaults_to(true)
            .describe("Whether to add padding or not."),
        FieldSpec::bool("show_tick").describe("Whether to show a tick or not."),
        FieldSpec::string("tick_pos").describe("When `tick = true`, a string with a percent sign indicating the position of the tick, for example: `tick_pos = \"50%\"` is centered alignment."),
        FieldSpec::string("tick_edge")
            .describe("When `tick = true`, a string indicating on which side of the widget the tick should be displayed.")
            .valid(&["bottom", "left", "right", "top"]),
    ]
}

pub fn event_stream() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("query")
            .required()
            .describe("The query to use in the widget."),
        FieldSpec::string("event_size")
            .describe("The size to use to display an event.")
            .valid(&["s", "l"]),
        tags_execution(),
    ]
}

pub fn event_timeline() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("query")
            .required()
            .describe("The query to use in the widget."),
        tags_execution(),
    ]
}

pub fn check_status() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("check")
            .required()
            .describe("The check to use in the widget."),
        FieldSpec::string("grouping")
            .required()
            .describe("The kind of grouping to use.")
            .valid(&["check", "cluster"]),
        FieldSpec::string("group").describe("The check group to use in the widget."),
        FieldSpec::string_list("group_by").describe(
            "When `grouping = \"cluster\"`, indicates a list of tags to use for grouping.",
        ),
        FieldSpec::string_list("tags").describe("A list of tags to use in the widget."),
    ]
}

pub fn log_stream() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string_list("indexes")
            .describe("An array of index names to query in the stream."),
        FieldSpec::string("query").describe("The query to use in the widget."),
        FieldSpec::string_list("columns").describe("Stringified list of columns to use, for example: `[\"column1\",\"column2\",\"column3\"]`."),
        FieldSpec::bool("show_date_column").describe("If the date column should be displayed."),
        FieldSpec::bool("show_message_column")
            .describe("If the message column should be displayed."),
        FieldSpec::string("message_display")
            .describe("The number of log lines to display.")
            .valid(&["inline", "expanded-md", "expanded-lg"]),
        FieldSpec::block(
            "sort",
            vec![
                FieldSpec::string("column")
                    .required()
                    .describe("The facet path for the column."),
                FieldSpec::string("order")
                    .required()
                    .describe("Widget sorting methods.")
                    .valid(SORT_ORDERS),
            ],
        )
        .describe("The facet and order to sort the data, for example: `{\"column\": \"time\", \"order\": \"desc\"}`."),
    ]
}

pub fn manage_status() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("query")
            .required()
            .describe("The query to use in the widget."),
        FieldSpec::string("summary_type")
            .describe("The summary type to use.")
            .valid(&["monitors", "groups", "combined"]),
        FieldSpec::string("sort")
            .describe("The method to sort the monitors.")
            .valid(&[
                "name",
                "group",
                "status",
                "tags",
                "triggered",
                "group,asc",
                "group,desc",
                "name,asc",
                "name,desc",
                "status,asc",
                "status,desc",
                "tags,asc",
                "tags,desc",
                "triggered,asc",
                "triggered,desc",
                "priority,asc",
                "priority,desc",
            ]),
        FieldSpec::string("display_format")
            .describe("The display setting to use.")
            .valid(&["counts", "countsAndList", "list"]),
        FieldSpec::string("color_preference")
            .describe("Whether to colorize text or background.")
            .valid(&["background", "text"]),
        FieldSpec::bool("hide_zero_counts")
            .describe("A Boolean indicating whether to hide empty categories."),
        FieldSpec::bool("show_last_triggered")
            .describe("A Boolean indicating whether to show when monitors/groups last triggered."),
        FieldSpec::bool("show_priority").describe("Whether to show the priorities column."),
    ]
}

pub fn run_workflow() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("workflow_id")
            .required()
            .describe("Workflow ID"),
        FieldSpec::block_list(
            "input",
            vec![
                FieldSpec::string("name")
                    .required()
                    .describe("Name of the workflow input."),
                FieldSpec::string("value")
                    .required()
                    .describe("Dashboard template variable. Can be suffixed with `.value` or `.key`."),
            ],
        )
        .json("inputs")
        .describe("Array of workflow inputs to map to dashboard template variables."),
    ]
}

pub fn servicemap() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("service")
            .required()
            .describe("The ID of the service to map."),
        FieldSpec::string_list("filters")
            .required()
            .describe("Your environment and primary tag (or `*` if enabled for your account)."),
    ]
}

pub fn trace_service() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("env").required().describe("APM environment."),
        FieldSpec::string("service").required().describe("APM service."),
        FieldSpec::string("span_name")
            .required()
            .describe("APM span name"),
        FieldSpec::bool("show_hits").describe("Whether to show the hits metrics or not"),
        FieldSpec::bool("show_errors").describe("Whether to show the error metrics or not."),
        FieldSpec::bool("show_latency").describe("Whether to show the latency metrics or not."),
        FieldSpec::bool("show_breakdown")
            .describe("Whether to show the latency breakdown or not."),
        FieldSpec::bool("show_distribution")
            .describe("Whether to show the latency distribution or not."),
        FieldSpec::bool("show_resource_list")
            .describe("Whether to show the resource list or not."),
        FieldSpec::string("size_format")
            .describe("The size of the widget.")
            .valid(&["small", "medium", "large"]),
        FieldSpec::string("display_format")
            .describe("The number of columns to display.")
            .valid(&["one_column", "two_column", "three_column"]),
    ]
}

pub fn service_level_objective() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("slo_id")
            .required()
            .describe("The ID of the service level objective used by the widget."),
        FieldSpec::string("view_type")
            .required()
            .describe("The type of view to use when displaying the widget. Only `detail` is supported."),
        FieldSpec::string("view_mode")
            .required()
            .describe("The view mode for the widget.")
            .valid(&["overall", "component", "both"]),
        FieldSpec::string_list("time_windows")
            .required()
            .describe("A list of time windows to display in the widget.")
            .valid(&[
                "7d",
                "30d",
                "90d",
                "week_to_date",
                "previous_week",
                "month_to_date",
                "previous_month",
                "global_time",
            ]),
        FieldSpec::bool("show_error_budget").describe("Whether to show the error budget or not."),
        FieldSpec::string("global_time_target")
            .describe("The global time target of the widget."),
        FieldSpec::string("additional_query_filters")
            .describe("Additional filters applied to the SLO query."),
    ]
}
