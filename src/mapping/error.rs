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

use std::fmt;

use thiserror::Error;
use tf_provider::{AttributePath, Diagnostics};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Attr(String),
    Index(usize),
}

/// Location of a value inside the Terraform tree, rendered as
/// `widget.0.timeseries_definition.0.request`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<Step>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn attr(&self, name: &str) -> Self {
        let mut steps = self.0.clone();
        steps.push(Step::Attr(name.to_owned()));
        Self(steps)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(Step::Index(index));
        Self(steps)
    }

    pub fn to_attribute_path(&self) -> AttributePath {
        let mut steps = self.0.iter();
        let mut path = match steps.next() {
            Some(Step::Attr(name)) => AttributePath::new(name.clone()),
            _ => return AttributePath::default(),
        };
        for step in steps {
            path = match step {
                Step::Attr(name) => path.attribute(name.clone()),
                Step::Index(index) => path.index(*index as i64),
            };
        }
        path
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        let mut sep = "";
        for step in &self.0 {
            f.write_str(sep)?;
            match step {
                Step::Attr(name) => f.write_str(name)?,
                Step::Index(index) => write!(f, "{index}")?,
            }
            sep = ".";
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    #[error("`{path}` must set exactly one of {variants}, found {found}")]
    OneOfVariant {
        path: FieldPath,
        variants: String,
        found: usize,
    },

    #[error("widget `{path}` must set exactly one definition block, found {found}")]
    WidgetDefinition { path: FieldPath, found: usize },

    #[error("`{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
        found: String,
    },

    #[error("`{path}`: {value} has a fractional part and cannot be stored as an integer")]
    FractionalInteger { path: FieldPath, value: f64 },

    #[error("`{path}` is required")]
    MissingRequired { path: FieldPath },

    #[error("`{path}`: expected one of {allowed}, got {value:?}")]
    InvalidValue {
        path: FieldPath,
        value: String,
        allowed: String,
    },

    #[error("`{path}` accepts at most {max} item(s), got {count}")]
    TooManyItems {
        path: FieldPath,
        max: usize,
        count: usize,
    },

    #[error("`{path}` must not be empty")]
    Empty { path: FieldPath },

    #[error("`{path}`: list elements must not be null")]
    NullElement { path: FieldPath },

    #[error("field table defect at `{path}`: {reason}")]
    SpecDefect { path: String, reason: String },
}

impl MappingError {
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            MappingError::OneOfVariant { path, .. }
            | MappingError::WidgetDefinition { path, .. }
            | MappingError::TypeMismatch { path, .. }
            | MappingError::FractionalInteger { path, .. }
            | MappingError::MissingRequired { path }
            | MappingError::InvalidValue { path, .. }
            | MappingError::TooManyItems { path, .. }
            | MappingError::Empty { path }
            | MappingError::NullElement { path } => Some(path),
            MappingError::SpecDefect { .. } => None,
        }
    }

    /// Report the error as a diagnostic attached to the offending attribute.
    pub fn report(&self, diags: &mut Diagnostics, summary: &str) {
        let attr_path = self
            .path()
            .map(FieldPath::to_attribute_path)
            .unwrap_or_default();
        diags.error(summary.to_owned(), self.to_string(), attr_path);
    }
}

pub(crate) fn type_mismatch(
    path: &FieldPath,
    expected: &'static str,
    found: &serde_json::Value,
) -> MappingError {
    let found = match found {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    };
    MappingError::TypeMismatch {
        path: path.clone(),
        expected,
        found: found.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_render_with_dots() {
        let path = FieldPath::root()
            .attr("widget")
            .index(0)
            .attr("note_definition")
            .index(0)
            .attr("content");
        assert_eq!(path.to_string(), "widget.0.note_definition.0.content");
        assert_eq!(FieldPath::root().to_string(), "<root>");
    }

    #[test]
    fn errors_mention_their_location() {
        let err = MappingError::FractionalInteger {
            path: FieldPath::root().attr("precision"),
            value: 3.5,
        };
        assert_eq!(
            err.to_string(),
            "`precision`: 3.5 has a fractional part and cannot be stored as an integer"
        );
        assert!(err.path().is_some());
    }
}
