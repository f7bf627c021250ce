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

//! Configuration checks driven by the field tables.
//!
//! Unknown values are skipped: they are checked again once known.

use super::build::variant_names;
use super::error::{FieldPath, MappingError};
use super::field::{FieldKind, FieldSpec, Presence, Validator};
use super::value::{Object, TfValue, TfValueExt};
use super::widgets;

/// Collect every violation found in `obj`.
pub fn validate_object(fields: &[FieldSpec], obj: &Object, path: &FieldPath) -> Vec<MappingError> {
    let mut errors = Vec::new();
    check_object(fields, obj, path, &mut errors);
    errors
}

pub(crate) fn check_object(
    fields: &[FieldSpec],
    obj: &Object,
    path: &FieldPath,
    errors: &mut Vec<MappingError>,
) {
    for field in fields {
        if field.is_injected() {
            continue;
        }
        let field_path = path.attr(field.hcl_key);
        match obj.get(field.hcl_key) {
            Some(value) => check_field(field, value, &field_path, errors),
            None if field.presence == Presence::Required => {
                errors.push(MappingError::MissingRequired { path: field_path })
            }
            None => {}
        }
    }
}

fn check_field(field: &FieldSpec, value: &TfValue, path: &FieldPath, errors: &mut Vec<MappingError>) {
    if value.is_unknown() {
        return;
    }
    let required = field.presence == Presence::Required;
    if field.is_block() {
        let items = value.as_list().unwrap_or_default();
        if required && items.is_empty() {
            errors.push(MappingError::MissingRequired { path: path.clone() });
        }
    } else if value.is_null() {
        // Terraform core enforces required attributes.
        return;
    }

    for validator in &field.validators {
        match validator {
            Validator::OneOf(allowed) => {
                if let Some(s) = value.as_str() {
                    if !allowed.contains(&s) {
                        errors.push(MappingError::InvalidValue {
                            path: path.clone(),
                            value: s.to_owned(),
                            allowed: allowed.join(", "),
                        });
                    }
                }
                if let Some(items) = value.as_list() {
                    for (i, item) in items.iter().enumerate() {
                        if let Some(s) = item.as_str().filter(|s| !allowed.contains(s)) {
                            errors.push(MappingError::InvalidValue {
                                path: path.index(i),
                                value: s.to_owned(),
                                allowed: allowed.join(", "),
                            });
                        }
                    }
                }
            }
            Validator::NotEmpty => {
                let empty = value.as_str().is_some_and(str::is_empty)
                    || value.as_list().is_some_and(<[TfValue]>::is_empty);
                if empty {
                    errors.push(MappingError::Empty { path: path.clone() });
                }
            }
            Validator::MaxItems(_) => {}
        }
    }
    if let (Some(max), Some(items)) = (field.max_item_count(), value.as_list()) {
        if items.len() > max {
            errors.push(MappingError::TooManyItems {
                path: path.clone(),
                max,
                count: items.len(),
            });
        }
    }

    let Some(items) = value.as_list() else {
        return;
    };
    for (i, item) in items.iter().enumerate() {
        let item_path = path.index(i);
        if item.is_null() {
            errors.push(MappingError::NullElement { path: item_path });
            continue;
        }
        let Some(obj) = item.as_object() else {
            continue;
        };
        match &field.kind {
            FieldKind::Block | FieldKind::BlockList => {
                check_object(&field.children, obj, &item_path, errors)
            }
            FieldKind::OneOf | FieldKind::OneOfList => {
                check_variants(field, obj, &item_path, errors)
            }
            FieldKind::Matrix => check_object(&field.children, obj, &item_path, errors),
            FieldKind::Widgets(scope) => widgets::check_widget(*scope, obj, &item_path, errors),
            FieldKind::WidgetDefinition(scope) => {
                widgets::check_definition(*scope, obj, &item_path, errors)
            }
            _ => {}
        }
    }
}

fn check_variants(field: &FieldSpec, obj: &Object, path: &FieldPath, errors: &mut Vec<MappingError>) {
    if field
        .children
        .iter()
        .any(|v| obj.get(v.hcl_key).is_some_and(TfValue::is_unknown))
    {
        return;
    }
    let populated = field
        .children
        .iter()
        .filter(|v| obj.get(v.hcl_key).is_some_and(TfValueExt::has_elements))
        .count();
    if populated != 1 {
        errors.push(MappingError::OneOfVariant {
            path: path.clone(),
            variants: variant_names(field),
            found: populated,
        });
    }
    check_object(&field.children, obj, path, errors);
}
