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

//! Terraform schema generation from field tables.
//!
//! Every nested object is a list block; single blocks are capped at one
//! element by validation.

use std::collections::HashMap;

use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, NestedBlock,
};

use super::field::{FieldKind, FieldSpec, Presence};
use super::widgets;

/// Attributes and nested blocks for a list of fields.
pub fn generate(fields: &[FieldSpec]) -> (HashMap<String, Attribute>, HashMap<String, NestedBlock>) {
    let mut attributes = HashMap::new();
    let mut blocks = HashMap::new();
    for field in fields {
        if field.is_injected() {
            continue;
        }
        if field.is_block() {
            blocks.insert(field.hcl_key.to_owned(), NestedBlock::List(nested_block(field)));
        } else {
            attributes.insert(field.hcl_key.to_owned(), attribute(field));
        }
    }
    (attributes, blocks)
}

/// Block described by `fields`.
pub fn block(fields: &[FieldSpec], description: &str) -> Block {
    let (attributes, blocks) = generate(fields);
    Block {
        attributes,
        blocks,
        description: Description::plain(description.to_owned()),
        ..Default::default()
    }
}

fn nested_block(field: &FieldSpec) -> Block {
    let mut block = match &field.kind {
        FieldKind::Widgets(scope) => widgets::widget_block(*scope),
        FieldKind::WidgetDefinition(scope) => widgets::definition_block(*scope),
        _ => self::block(&field.children, ""),
    };
    block.description = Description::plain(describe(field));
    block.deprecated = field.deprecated.is_some();
    block
}

fn attribute(field: &FieldSpec) -> Attribute {
    let scalar = match field.kind {
        FieldKind::Bool => AttributeType::Bool,
        FieldKind::Int | FieldKind::Float | FieldKind::IntList => AttributeType::Number,
        _ => AttributeType::String,
    };
    let attr_type = match field.kind {
        FieldKind::StringList | FieldKind::IntList if field.use_set => {
            AttributeType::Set(Box::new(scalar))
        }
        FieldKind::StringList | FieldKind::IntList => AttributeType::List(Box::new(scalar)),
        _ => scalar,
    };
    Attribute {
        attr_type,
        description: Description::plain(describe(field)),
        constraint: constraint(field),
        sensitive: field.sensitive,
        deprecated: field.deprecated.is_some(),
    }
}

pub fn constraint(field: &FieldSpec) -> AttributeConstraint {
    match field.presence {
        Presence::Required => AttributeConstraint::Required,
        Presence::Computed => AttributeConstraint::Computed,
        Presence::Optional if field.is_optional_computed() => AttributeConstraint::OptionalComputed,
        Presence::Optional => AttributeConstraint::Optional,
    }
}

/// Field description, completed with its accepted values and deprecation notice.
pub fn describe(field: &FieldSpec) -> String {
    let mut description = field.description.to_owned();
    if let Some(values) = field.allowed_values() {
        if !description.contains("Valid values") {
            let listed = values
                .iter()
                .map(|v| format!("`{v}`"))
                .collect::<Vec<_>>()
                .join(", ");
            if !description.is_empty() {
                description.push(' ');
            }
            description.push_str(&format!("Valid values are {listed}."));
        }
    }
    if let Some(default) = &field.default {
        description.push_str(&format!(" Defaults to `{}`.", default.to_json()));
    }
    if let Some(message) = field.deprecated {
        description.push_str(&format!(" **Deprecated.** {message}"));
    }
    description
}
