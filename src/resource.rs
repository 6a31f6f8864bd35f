//! Typed configuration resources that can be edited as text.
//!
//! The set of editable resources is closed: every kind is a variant of
//! [`EditableResource`]. Every struct in the schema denies unknown fields, so
//! strict decoding fails on the first key the schema does not know.

use crate::canonical::{lower, strip_bom, Format};
use crate::error::DecodeError;
use crate::tree::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Cluster-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClusterConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_provider: Option<String>,
    #[serde(
        rename = "networkCIDR",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub network_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnets: Vec<Subnet>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubnetType {
    Public,
    Private,
    Utility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Subnet {
    pub name: String,
    pub zone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(rename = "type")]
    pub subnet_type: SubnetType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    Master,
    Node,
    Bastion,
}

/// A group of identically configured machines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GroupConfig {
    pub name: String,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<GroupRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnets: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_labels: BTreeMap<String, String>,
}

impl ClusterConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl GroupConfig {
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
            role: None,
            machine_type: None,
            max_size: None,
            subnets: Vec::new(),
            node_labels: BTreeMap::new(),
        }
    }
}

/// The kinds of resource that can be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Cluster,
    Group,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Cluster => f.write_str("cluster"),
            ResourceKind::Group => f.write_str("group"),
        }
    }
}

/// A typed resource the caller believes an edit corresponds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditableResource {
    Cluster(ClusterConfig),
    Group(GroupConfig),
}

impl EditableResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            EditableResource::Cluster(_) => ResourceKind::Cluster,
            EditableResource::Group(_) => ResourceKind::Group,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EditableResource::Cluster(cluster) => &cluster.name,
            EditableResource::Group(group) => &group.name,
        }
    }

    /// Decodes raw text as the resource type `T`, rejecting unknown keys.
    pub fn from_str_strict<T>(raw: &str, format: Format) -> Result<Self, DecodeError>
    where
        T: for<'de> Deserialize<'de> + Into<EditableResource>,
    {
        let raw = strip_bom(raw);
        let decoded: T = match format {
            Format::Yaml => serde_yaml::from_str(raw)?,
            Format::Json => serde_json::from_str(raw)?,
        };
        Ok(decoded.into())
    }

    /// Lowers the typed object into a generic tree through the given codec.
    pub fn to_node(&self, format: Format) -> Result<Node, DecodeError> {
        match self {
            EditableResource::Cluster(cluster) => lower(cluster, format),
            EditableResource::Group(group) => lower(group, format),
        }
    }
}

impl From<ClusterConfig> for EditableResource {
    fn from(cluster: ClusterConfig) -> Self {
        EditableResource::Cluster(cluster)
    }
}

impl From<GroupConfig> for EditableResource {
    fn from(group: GroupConfig) -> Self {
        EditableResource::Group(group)
    }
}

/// Decodes raw text into the given resource kind, rejecting unknown keys.
///
/// The error only says that decoding failed; it does not reliably name the
/// offending field, since type mismatches fail the same way.
pub fn decode_strict(
    raw: &str,
    kind: ResourceKind,
    format: Format,
) -> Result<EditableResource, DecodeError> {
    match kind {
        ResourceKind::Cluster => EditableResource::from_str_strict::<ClusterConfig>(raw, format),
        ResourceKind::Group => EditableResource::from_str_strict::<GroupConfig>(raw, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_strict_group() {
        let resource =
            decode_strict("name: a\nsize: 3\n", ResourceKind::Group, Format::Yaml).unwrap();
        assert_eq!(resource, EditableResource::Group(GroupConfig::new("a", 3)));
        assert_eq!(resource.kind(), ResourceKind::Group);
        assert_eq!(resource.name(), "a");
    }

    #[test]
    fn test_decode_strict_rejects_unknown_key() {
        let result = decode_strict("name: a\nsise: 3\n", ResourceKind::Group, Format::Yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_strict_rejects_unknown_nested_key() {
        let raw = r#"
name: prod
subnets:
  - name: us-east-1a
    zone: us-east-1a
    type: public
    cidrr: 10.0.0.0/24
"#;
        assert!(decode_strict(raw, ResourceKind::Cluster, Format::Yaml).is_err());
    }

    #[test]
    fn test_decode_strict_accepts_reordered_keys() {
        let resource =
            decode_strict("size: 3\nname: a\n", ResourceKind::Group, Format::Yaml).unwrap();
        assert_eq!(resource.name(), "a");
    }

    #[test]
    fn test_decode_strict_json() {
        let resource = decode_strict(
            r#"{"name": "prod", "networkCIDR": "10.0.0.0/16"}"#,
            ResourceKind::Cluster,
            Format::Json,
        )
        .unwrap();
        match resource {
            EditableResource::Cluster(cluster) => {
                assert_eq!(cluster.network_cidr.as_deref(), Some("10.0.0.0/16"));
            }
            _ => panic!("Expected cluster"),
        }
        let extra = r#"{"name": "prod", "extra": 1}"#;
        assert!(decode_strict(extra, ResourceKind::Cluster, Format::Json).is_err());
    }

    #[test]
    fn test_from_str_strict_picks_the_variant() {
        let resource =
            EditableResource::from_str_strict::<ClusterConfig>("name: prod\n", Format::Yaml)
                .unwrap();
        assert_eq!(resource.kind(), ResourceKind::Cluster);
        assert_eq!(resource.name(), "prod");
    }

    #[test]
    fn test_decode_strict_skips_byte_order_mark() {
        let resource =
            decode_strict("\u{feff}name: a\nsize: 3\n", ResourceKind::Group, Format::Yaml)
                .unwrap();
        assert_eq!(resource, EditableResource::Group(GroupConfig::new("a", 3)));
    }

    #[test]
    fn test_to_node_omits_unset_fields() {
        let node = EditableResource::from(GroupConfig::new("a", 3))
            .to_node(Format::Yaml)
            .unwrap();
        match node {
            Node::Object(map) => {
                assert_eq!(map.keys().collect::<Vec<_>>(), vec!["name", "size"]);
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_cluster_serializes_camel_case() {
        let mut cluster = ClusterConfig::new("prod");
        cluster.kubernetes_version = Some("1.29.0".to_string());
        cluster.network_cidr = Some("10.0.0.0/16".to_string());
        let text = serde_yaml::to_string(&cluster).unwrap();
        assert!(text.contains("kubernetesVersion:"));
        assert!(text.contains("networkCIDR:"));
        assert!(!text.contains("subnets"));
    }
}
