//! Schema-agnostic tree representation of a structured document.
//!
//! A [`Node`] is what an edited document decodes to when no target schema is
//! applied. Mapping keys live in a `BTreeMap`, so the order in which the user
//! wrote them never reaches the canonical output. Sequence order is kept.
//!
//! Decoding into a `Node` is strict: duplicate keys in a mapping are rejected
//! instead of letting the last one win.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A numeric scalar. Integers and floats stay distinct so `3` is emitted
/// as `3` rather than `3.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

impl Number {
    pub fn from_i64(value: i64) -> Self {
        if value >= 0 {
            Number::PosInt(value as u64)
        } else {
            Number::NegInt(value)
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::PosInt(n) => write!(f, "{}", n),
            Number::NegInt(n) => write!(f, "{}", n),
            Number::Float(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Number::PosInt(n) => serializer.serialize_u64(n),
            Number::NegInt(n) => serializer.serialize_i64(n),
            Number::Float(n) => serializer.serialize_f64(n),
        }
    }
}

/// A node representing a value in a structured document (YAML or JSON).
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Node>),
    Object(BTreeMap<String, Node>),
}

impl Node {
    /// Returns a short preview of the node's value, truncated to max_len.
    pub fn preview(&self, max_len: usize) -> String {
        let preview = match self {
            Node::Null => "null".to_string(),
            Node::Bool(b) => b.to_string(),
            Node::Number(n) => n.to_string(),
            Node::String(s) => format!("\"{}\"", s),
            Node::Object(map) => match map.len() {
                0 => "{}".to_string(),
                1 => "{ 1 key }".to_string(),
                count => format!("{{ {} keys }}", count),
            },
            Node::Array(arr) => match arr.len() {
                0 => "[]".to_string(),
                1 => "[ 1 item ]".to_string(),
                count => format!("[ {} items ]", count),
            },
        };

        if preview.chars().count() > max_len {
            let kept: String = preview.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", kept)
        } else {
            preview
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Array(items) => serializer.collect_seq(items),
            Node::Object(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a structured value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Number(Number::from_i64(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(Node::Number(Number::PosInt(v)))
    }

    // Integers beyond 64 bits degrade to floats, as JSON numbers do.
    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Node, E> {
        match i64::try_from(v) {
            Ok(n) => Ok(Node::Number(Number::from_i64(n))),
            Err(_) => Ok(Node::Number(Number::Float(v as f64))),
        }
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Node, E> {
        match u64::try_from(v) {
            Ok(n) => Ok(Node::Number(Number::PosInt(n))),
            Err(_) => Ok(Node::Number(Number::Float(v as f64))),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Number(Number::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Node, A::Error> {
        let mut map = BTreeMap::new();
        while let Some(MapKey(key)) = access.next_key()? {
            if map.contains_key(&key) {
                return Err(de::Error::custom(format_args!("duplicate key `{}`", key)));
            }
            let value = access.next_value()?;
            map.insert(key, value);
        }
        Ok(Node::Object(map))
    }
}

/// A mapping key. YAML allows scalar keys of any type; they are stringified.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

struct MapKeyVisitor;

impl<'de> Visitor<'de> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_unit<E: de::Error>(self) -> Result<MapKey, E> {
        Ok(MapKey("null".to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<MapKey, E> {
        Ok(MapKey(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<MapKey, E> {
        Ok(MapKey(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(content: &str) -> Result<Node, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    #[test]
    fn test_decode_yaml_primitives() {
        assert_eq!(yaml("null").unwrap(), Node::Null);
        assert_eq!(yaml("~").unwrap(), Node::Null);
        assert_eq!(yaml("true").unwrap(), Node::Bool(true));
        assert_eq!(yaml("42").unwrap(), Node::Number(Number::PosInt(42)));
        assert_eq!(yaml("-7").unwrap(), Node::Number(Number::NegInt(-7)));
        assert_eq!(yaml("3.5").unwrap(), Node::Number(Number::Float(3.5)));
        assert_eq!(yaml("hello").unwrap(), Node::String("hello".to_string()));
    }

    #[test]
    fn test_decode_json_object() {
        let node: Node = serde_json::from_str(r#"{"name": "a", "size": 3}"#).unwrap();
        match node {
            Node::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map["name"], Node::String("a".to_string()));
                assert_eq!(map["size"], Node::Number(Number::PosInt(3)));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let err = yaml("name: a\nname: b").unwrap_err();
        assert!(err.to_string().contains("duplicate key `name`"));

        let err = serde_json::from_str::<Node>(r#"{"a": 1, "a": 2}"#).unwrap_err();
        assert!(err.to_string().contains("duplicate key `a`"));
    }

    #[test]
    fn test_integers_wider_than_64_bits() {
        assert_eq!(
            yaml("99999999999999999999999").unwrap(),
            Node::Number(Number::Float(99999999999999999999999u128 as f64))
        );
        assert_eq!(
            yaml("-99999999999999999999999").unwrap(),
            Node::Number(Number::Float(-99999999999999999999999i128 as f64))
        );

        let node = yaml("99999999999999999999999: big").unwrap();
        match node {
            Node::Object(map) => {
                assert_eq!(map["99999999999999999999999"], Node::String("big".to_string()));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let node = yaml("1: first\ntrue: yes").unwrap();
        match node {
            Node::Object(map) => {
                assert_eq!(map["1"], Node::String("first".to_string()));
                assert_eq!(map["true"], Node::String("yes".to_string()));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_key_order_is_irrelevant() {
        assert_eq!(yaml("a: 1\nb: 2").unwrap(), yaml("b: 2\na: 1").unwrap());
    }

    #[test]
    fn test_sequence_order_is_kept() {
        assert_ne!(yaml("[1, 2]").unwrap(), yaml("[2, 1]").unwrap());
    }

    #[test]
    fn test_serialize_sorts_keys() {
        let node = yaml("zeta: 1\nalpha: 2").unwrap();
        assert_eq!(serde_yaml::to_string(&node).unwrap(), "alpha: 2\nzeta: 1\n");
    }

    #[test]
    fn test_preview() {
        assert_eq!(Node::Number(Number::PosInt(3)).preview(80), "3");
        assert_eq!(Node::String("a".to_string()).preview(80), "\"a\"");
        assert_eq!(Node::Array(vec![Node::Null]).preview(80), "[ 1 item ]");
        let long = Node::String("x".repeat(50));
        assert_eq!(long.preview(10).chars().count(), 10);
    }
}
