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

//! Dynamic Terraform value tree.
//!
//! Dashboards and powerpacks have hundreds of nested attributes whose shape is
//! only known through the field tables, so their state is kept as a tagged tree
//! instead of a derived struct. Null and unknown are carried by the
//! [`tf_provider::value::Value`] wrapper around every node.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use tf_provider::value::Value;

pub type TfValue = Value<Node>;
pub type Object = BTreeMap<String, TfValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<TfValue>),
    Object(Object),
}

impl Default for Node {
    fn default() -> Self {
        Node::Object(Default::default())
    }
}

impl Node {
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Bool(_) => "bool",
            Node::Int(_) => "integer",
            Node::Float(_) => "number",
            Node::String(_) => "string",
            Node::List(_) => "list",
            Node::Object(_) => "object",
        }
    }
}

/// Accessors on [`TfValue`] used by the mapping engine.
///
/// Every accessor returns `None` for null and unknown values.
pub trait TfValueExt {
    fn node(&self) -> Option<&Node>;

    fn as_str(&self) -> Option<&str> {
        match self.node()? {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self.node()? {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numbers coming from Terraform may be encoded as integers, floats or
    /// (for very large values) strings.
    fn as_number(&self) -> Option<f64> {
        match self.node()? {
            Node::Int(i) => Some(*i as f64),
            Node::Float(f) => Some(*f),
            Node::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    fn as_list(&self) -> Option<&[TfValue]> {
        match self.node()? {
            Node::List(l) => Some(l),
            _ => None,
        }
    }

    fn as_object(&self) -> Option<&Object> {
        match self.node()? {
            Node::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Known, non-empty list.
    fn has_elements(&self) -> bool {
        self.as_list().is_some_and(|l| !l.is_empty())
    }
}

impl TfValueExt for TfValue {
    fn node(&self) -> Option<&Node> {
        match self {
            Value::Value(node) => Some(node),
            _ => None,
        }
    }
}

pub fn string(s: impl Into<String>) -> TfValue {
    Value::Value(Node::String(s.into()))
}

pub fn int(i: i64) -> TfValue {
    Value::Value(Node::Int(i))
}

pub fn float(f: f64) -> TfValue {
    Value::Value(Node::Float(f))
}

pub fn boolean(b: bool) -> TfValue {
    Value::Value(Node::Bool(b))
}

pub fn list(items: Vec<TfValue>) -> TfValue {
    Value::Value(Node::List(items))
}

pub fn object(entries: Object) -> TfValue {
    Value::Value(Node::Object(entries))
}

/// A single-element block list, the Terraform shape of a nested block with
/// at most one element.
pub fn single_block(entries: Object) -> TfValue {
    list(vec![object(entries)])
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Int(i) => serializer.serialize_i64(*i),
            Node::Float(f) => serializer.serialize_f64(*f),
            Node::String(s) => serializer.serialize_str(s),
            Node::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a terraform value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(match i64::try_from(v) {
            Ok(i) => Node::Int(i),
            Err(_) => Node::Float(v as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Node, E> {
        match std::str::from_utf8(v) {
            Ok(s) => Ok(Node::String(s.to_owned())),
            Err(_) => Err(E::invalid_value(de::Unexpected::Bytes(v), &self)),
        }
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<TfValue>()? {
            items.push(item);
        }
        Ok(Node::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut entries = Object::new();
        while let Some((k, v)) = map.next_entry::<String, TfValue>()? {
            entries.insert(k, v);
        }
        Ok(Node::Object(entries))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_skip_null_and_unknown() {
        let null: TfValue = Value::Null;
        let unknown: TfValue = Value::Unknown;
        assert_eq!(null.as_str(), None);
        assert_eq!(unknown.as_number(), None);
        assert!(!unknown.has_elements());
    }

    #[test]
    fn numbers_accept_every_terraform_encoding() {
        assert_eq!(int(3).as_number(), Some(3.0));
        assert_eq!(float(2.5).as_number(), Some(2.5));
        assert_eq!(string("12").as_number(), Some(12.0));
        assert_eq!(boolean(true).as_number(), None);
    }

    #[test]
    fn scalars_deserialize_to_matching_nodes() {
        assert_eq!(Node::deserialize(serde_json::json!("x")).unwrap(), Node::String("x".into()));
        assert_eq!(Node::deserialize(serde_json::json!(7)).unwrap(), Node::Int(7));
        assert_eq!(Node::deserialize(serde_json::json!(1.5)).unwrap(), Node::Float(1.5));
        assert_eq!(Node::deserialize(serde_json::json!(false)).unwrap(), Node::Bool(false));
    }

    #[test]
    fn huge_unsigned_numbers_fall_back_to_floats() {
        let node = Node::deserialize(serde_json::json!(u64::MAX)).unwrap();
        assert!(matches!(node, Node::Float(_)));
    }
}
