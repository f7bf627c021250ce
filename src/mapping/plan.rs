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

use tf_provider::value::Value;

use super::field::{FieldKind, FieldSpec, Presence};
use super::value::{Node, Object, TfValue};
use super::widgets;

/// Fill literal defaults and mark computed attributes left null as unknown so
/// the server may fill them. Attributes carried over from prior state are
/// already known and stay as they are.
pub fn normalize_object(fields: &[FieldSpec], obj: &mut Object) {
    for field in fields {
        if field.is_injected() || field.schema_only {
            continue;
        }
        let Some(value) = obj.get_mut(field.hcl_key) else {
            continue;
        };
        normalize_field(field, value);
    }
}

fn normalize_field(field: &FieldSpec, value: &mut TfValue) {
    if value.is_null() {
        if let Some(default) = &field.default {
            *value = default.to_value();
        } else if field.presence == Presence::Computed || field.is_optional_computed() {
            *value = Value::Unknown;
        }
        return;
    }
    let Value::Value(Node::List(items)) = value else {
        return;
    };
    for item in items.iter_mut() {
        let Value::Value(Node::Object(obj)) = item else {
            continue;
        };
        match &field.kind {
            FieldKind::Block
            | FieldKind::BlockList
            | FieldKind::OneOf
            | FieldKind::OneOfList
            | FieldKind::Matrix => normalize_object(&field.children, obj),
            FieldKind::Widgets(scope) => widgets::normalize_widget(*scope, obj),
            FieldKind::WidgetDefinition(scope) => {
                widgets::normalize_definition(*scope, obj)
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::value::{boolean, list, object, string};

    #[test]
    fn defaults_fill_nulls_and_computed_become_unknown() {
        let fields = vec![
            FieldSpec::bool("show_title").defaults_to(true),
            FieldSpec::string("title"),
            FieldSpec::string("layout_type").required(),
            FieldSpec::block_list(
                "event",
                vec![
                    FieldSpec::string("q").required(),
                    FieldSpec::string("tags_execution"),
                ],
            ),
        ];
        let mut event = Object::new();
        event.insert("q".into(), string("tags:deploy"));
        event.insert("tags_execution".into(), Value::Null);
        let mut obj = Object::new();
        obj.insert("show_title".into(), Value::Null);
        obj.insert("title".into(), Value::Null);
        obj.insert("layout_type".into(), Value::Null);
        obj.insert("event".into(), list(vec![object(event)]));

        let mut planned = obj;
        normalize_object(&fields, &mut planned);
        assert_eq!(planned["show_title"], boolean(true));
        assert_eq!(planned["title"], Value::Unknown);
        assert_eq!(planned["layout_type"], Value::Null);
        let Value::Value(Node::List(events)) = &planned["event"] else {
            panic!("event must stay a list");
        };
        let Value::Value(Node::Object(event)) = &events[0] else {
            panic!("event item must be an object");
        };
        assert_eq!(event["tags_execution"], Value::Unknown);

        let mut known = Object::new();
        known.insert("title".into(), string("Deploys"));
        normalize_object(&fields, &mut known);
        assert_eq!(known["title"], string("Deploys"));
    }
}
