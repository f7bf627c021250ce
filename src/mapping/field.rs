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

//! Declarative description of a single field shared by the Terraform schema
//! and the JSON payload.

use super::value::{Node, TfValue};
use tf_provider::value::Value;

/// Which widget definitions may appear in a widget list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetScope {
    Dashboard,
    Group,
    Powerpack,
    SplitSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Bool,
    Int,
    Float,
    StringList,
    IntList,
    /// Single nested object, a Terraform block with at most one element.
    Block,
    BlockList,
    /// Single block whose children are the variant blocks. Exactly one variant
    /// is set; its JSON is emitted directly.
    OneOf,
    /// List of blocks, each holding exactly one variant block.
    OneOfList,
    /// List of blocks wrapping one inner block list. JSON is an array of arrays.
    Matrix,
    Widgets(WidgetScope),
    /// Single block holding exactly one widget definition block.
    WidgetDefinition(WidgetScope),
    /// JSON-only constant, absent from the Terraform schema.
    Injected(Literal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    Required,
    #[default]
    Optional,
    Computed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(&'static str),
}

impl Literal {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::Bool(b) => serde_json::Value::Bool(*b),
            Literal::Int(i) => serde_json::Value::from(*i),
            Literal::Float(f) => serde_json::Value::from(*f),
            Literal::String(s) => serde_json::Value::from(*s),
        }
    }

    pub fn to_value(&self) -> TfValue {
        Value::Value(match self {
            Literal::Bool(b) => Node::Bool(*b),
            Literal::Int(i) => Node::Int(*i),
            Literal::Float(f) => Node::Float(*f),
            Literal::String(s) => Node::String(s.to_string()),
        })
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&'static str> for Literal {
    fn from(value: &'static str) -> Self {
        Literal::String(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    OneOf(&'static [&'static str]),
    MaxItems(usize),
    NotEmpty,
}

/// How a variant block of a oneof is recognised in JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantMatch {
    /// Injected under the parent's discriminator key on build, matched on flatten.
    pub value: Option<&'static str>,
    /// Accepted on flatten only.
    pub values: &'static [&'static str],
    /// Selected when no other variant matches.
    pub default_variant: bool,
}

impl VariantMatch {
    pub fn matches(&self, discriminator: &str) -> bool {
        self.value == Some(discriminator) || self.values.contains(&discriminator)
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub hcl_key: &'static str,
    pub json_key: Option<&'static str>,
    pub json_path: Option<&'static str>,
    pub kind: FieldKind,
    pub omit_empty: bool,
    pub children: Vec<FieldSpec>,
    pub description: &'static str,
    pub presence: Presence,
    pub default: Option<Literal>,
    pub sensitive: bool,
    pub deprecated: Option<&'static str>,
    pub force_new: bool,
    pub use_set: bool,
    pub schema_only: bool,
    pub validators: Vec<Validator>,
    /// JSON key holding the variant discriminator of a oneof.
    pub discriminator: Option<&'static str>,
    pub variant: Option<VariantMatch>,
    /// Injected fields are only emitted when one of these sibling JSON keys
    /// was emitted. Empty means always.
    pub present_when: &'static [&'static str],
}

impl FieldSpec {
    pub fn new(hcl_key: &'static str, kind: FieldKind) -> Self {
        let omit_empty = matches!(
            kind,
            FieldKind::BlockList | FieldKind::OneOfList | FieldKind::Matrix
        );
        Self {
            hcl_key,
            json_key: None,
            json_path: None,
            kind,
            omit_empty,
            children: Vec::new(),
            description: "",
            presence: Presence::Optional,
            default: None,
            sensitive: false,
            deprecated: None,
            force_new: false,
            use_set: false,
            schema_only: false,
            validators: Vec::new(),
            discriminator: None,
            variant: None,
            present_when: &[],
        }
    }

    pub fn string(hcl_key: &'static str) -> Self {
        Self::new(hcl_key, FieldKind::String)
    }

    pub fn bool(hcl_key: &'static str) -> Self {
        Self::new(hcl_key, FieldKind::Bool)
    }

    pub fn int(hcl_key: &'static str) -> Self {
        Self::new(hcl_key, FieldKind::Int)
    }

    pub fn float(hcl_key: &'static str) -> Self {
        Self::new(hcl_key, FieldKind::Float)
    }

    pub fn string_list(hcl_key: &'static str) -> Self {
        Self::new(hcl_key, FieldKind::StringList)
    }

    pub fn int_list(hcl_key: &'static str) -> Self {
        Self::new(hcl_key, FieldKind::IntList)
    }

    pub fn block(hcl_key: &'static str, children: Vec<FieldSpec>) -> Self {
        Self::new(hcl_key, FieldKind::Block).with_children(children)
    }

    pub fn block_list(hcl_key: &'static str, children: Vec<FieldSpec>) -> Self {
        Self::new(hcl_key, FieldKind::BlockList).with_children(children)
    }

    pub fn one_of(hcl_key: &'static str, variants: Vec<FieldSpec>) -> Self {
        Self::new(hcl_key, FieldKind::OneOf).with_children(variants)
    }

    pub fn one_of_list(hcl_key: &'static str, variants: Vec<FieldSpec>) -> Self {
        Self::new(hcl_key, FieldKind::OneOfList).with_children(variants)
    }

    pub fn matrix(hcl_key: &'static str, row: FieldSpec) -> Self {
        Self::new(hcl_key, FieldKind::Matrix).with_children(vec![row])
    }

    pub fn widgets(hcl_key: &'static str, scope: WidgetScope) -> Self {
        Self::new(hcl_key, FieldKind::Widgets(scope))
    }

    pub fn widget_definition(hcl_key: &'static str, scope: WidgetScope) -> Self {
        Self::new(hcl_key, FieldKind::WidgetDefinition(scope))
    }

    pub fn injected(json_key: &'static str, value: impl Into<Literal>) -> Self {
        Self::new(json_key, FieldKind::Injected(value.into()))
    }

    fn with_children(mut self, children: Vec<FieldSpec>) -> Self {
        self.children = children;
        self
    }

    pub fn json(mut self, json_key: &'static str) -> Self {
        self.json_key = Some(json_key);
        self
    }

    pub fn path(mut self, json_path: &'static str) -> Self {
        self.json_path = Some(json_path);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub fn computed(mut self) -> Self {
        self.presence = Presence::Computed;
        self
    }

    pub fn defaults_to(mut self, value: impl Into<Literal>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn deprecated(mut self, message: &'static str) -> Self {
        self.deprecated = Some(message);
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn set(mut self) -> Self {
        self.use_set = true;
        self
    }

    pub fn schema_only(mut self) -> Self {
        self.schema_only = true;
        self
    }

    pub fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    pub fn keep_empty(mut self) -> Self {
        self.omit_empty = false;
        self
    }

    pub fn valid(mut self, values: &'static [&'static str]) -> Self {
        self.validators.push(Validator::OneOf(values));
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.validators.push(Validator::MaxItems(max));
        self
    }

    pub fn not_empty(mut self) -> Self {
        self.validators.push(Validator::NotEmpty);
        self
    }

    pub fn discriminated_by(mut self, json_key: &'static str) -> Self {
        self.discriminator = Some(json_key);
        self
    }

    pub fn variant(mut self, value: &'static str) -> Self {
        self.variant.get_or_insert_with(Default::default).value = Some(value);
        self
    }

    pub fn matches(mut self, values: &'static [&'static str]) -> Self {
        self.variant.get_or_insert_with(Default::default).values = values;
        self
    }

    pub fn default_variant(mut self) -> Self {
        self.variant.get_or_insert_with(Default::default).default_variant = true;
        self
    }

    pub fn when_present(mut self, json_keys: &'static [&'static str]) -> Self {
        self.present_when = json_keys;
        self
    }

    pub fn json_name(&self) -> &'static str {
        self.json_key.unwrap_or(self.hcl_key)
    }

    /// Location of the field inside its parent JSON object.
    pub fn json_segments(&self) -> Vec<&'static str> {
        match self.json_path {
            Some(path) => path.split('.').collect(),
            None => vec![self.json_name()],
        }
    }

    /// Fields represented as Terraform nested blocks. Their "null" state is an
    /// empty block list.
    pub fn is_block(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Block
                | FieldKind::BlockList
                | FieldKind::OneOf
                | FieldKind::OneOfList
                | FieldKind::Matrix
                | FieldKind::Widgets(_)
                | FieldKind::WidgetDefinition(_)
        )
    }

    /// Blocks limited to a single element.
    pub fn is_single_block(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Block | FieldKind::OneOf | FieldKind::WidgetDefinition(_)
        )
    }

    pub fn is_injected(&self) -> bool {
        matches!(self.kind, FieldKind::Injected(_))
    }

    pub fn allowed_values(&self) -> Option<&'static [&'static str]> {
        self.validators.iter().find_map(|v| match v {
            Validator::OneOf(values) => Some(*values),
            _ => None,
        })
    }

    pub fn max_item_count(&self) -> Option<usize> {
        if self.is_single_block() {
            return Some(1);
        }
        self.validators.iter().find_map(|v| match v {
            Validator::MaxItems(max) => Some(*max),
            _ => None,
        })
    }

    /// Optional scalars and primitive lists keep their prior value when unset,
    /// matching the server-side defaults filled by the API.
    pub fn is_optional_computed(&self) -> bool {
        if self.presence != Presence::Optional {
            return false;
        }
        if self.default.is_some() {
            return true;
        }
        match self.kind {
            FieldKind::String
            | FieldKind::Bool
            | FieldKind::Int
            | FieldKind::Float
            | FieldKind::StringList => true,
            _ => false,
        }
    }

    /// Null (rather than empty) value of this field's Terraform type.
    pub fn null_value(&self) -> TfValue {
        if self.is_block() {
            Value::Value(Node::List(Vec::new()))
        } else {
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_segments_follow_path_then_key() {
        let plain = FieldSpec::string("title");
        assert_eq!(plain.json_segments(), vec!["title"]);

        let renamed = FieldSpec::block_list("custom_link", vec![]).json("custom_links");
        assert_eq!(renamed.json_segments(), vec!["custom_links"]);

        let nested = FieldSpec::string("live_span").path("time.live_span");
        assert_eq!(nested.json_segments(), vec!["time", "live_span"]);
    }

    #[test]
    fn block_lists_omit_empty_by_default_but_scalars_do_not() {
        assert!(FieldSpec::block_list("marker", vec![]).omit_empty);
        assert!(!FieldSpec::string_list("exclude_only").omit_empty);
        assert!(!FieldSpec::block_list("request", vec![]).keep_empty().omit_empty);
    }

    #[test]
    fn single_blocks_are_capped_at_one_item() {
        assert_eq!(FieldSpec::block("style", vec![]).max_item_count(), Some(1));
        assert_eq!(FieldSpec::one_of("unit", vec![]).max_item_count(), Some(1));
        assert_eq!(FieldSpec::block_list("request", vec![]).max_item_count(), None);
        assert_eq!(
            FieldSpec::string_list("cross_org_uuids")
                .max_items(1)
                .max_item_count(),
            Some(1)
        );
    }

    #[test]
    fn variant_matching_accepts_value_and_aliases() {
        let variant = FieldSpec::block("legend_inline", vec![]).matches(&["inline", "automatic"]);
        let matcher = variant.variant.unwrap();
        assert!(matcher.matches("automatic"));
        assert!(!matcher.matches("table"));

        let canonical = FieldSpec::block("canonical", vec![]).variant("canonical_unit");
        assert!(canonical.variant.unwrap().matches("canonical_unit"));
    }

    #[test]
    fn optional_scalars_are_computed() {
        assert!(FieldSpec::string("title").is_optional_computed());
        assert!(!FieldSpec::string("title").required().is_optional_computed());
        assert!(!FieldSpec::int_list("dashboard_lists").is_optional_computed());
        assert!(FieldSpec::bool("show_title")
            .defaults_to(true)
            .is_optional_computed());
    }
}
