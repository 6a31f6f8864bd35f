//! Canonical text forms for typed resources and generic trees.
//!
//! Both sides of a comparison go through [`canonicalize`]: the typed object is
//! first lowered into a [`Node`] through serde, and the raw edit is decoded into
//! a [`Node`] directly. Identical content therefore yields identical bytes no
//! matter which side it came from, and any remaining difference is a content
//! difference.
//!
//! # Examples
//!
//! ```
//! use editguard::canonical::{normalize, CanonicalPolicy};
//!
//! let policy = CanonicalPolicy::default();
//! let a = normalize("size: 3\nname: a", &policy).unwrap();
//! let b = normalize("{name: a, size: 3}", &policy).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "name: a\nsize: 3\n");
//! ```

use crate::error::{DecodeError, DetectError};
use crate::resource::EditableResource;
use crate::tree::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text syntax used to decode edits and to emit canonical forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Yaml => f.write_str("YAML"),
            Format::Json => f.write_str("JSON"),
        }
    }
}

/// Ordering and formatting rules for canonical output.
///
/// Mapping keys are always emitted in lexicographic order; the policy selects
/// the syntax they are emitted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanonicalPolicy {
    pub format: Format,
}

impl CanonicalPolicy {
    pub fn new(format: Format) -> Self {
        Self { format }
    }
}

/// Deterministic text produced under a [`CanonicalPolicy`]. Two forms are
/// equal exactly when their bytes are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalForm {
    format: Format,
    text: String,
}

impl CanonicalForm {
    pub fn format(&self) -> Format {
        self.format
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Emits a tree as canonical text. Shared by the typed and generic paths.
pub fn canonicalize(node: &Node, policy: &CanonicalPolicy) -> Result<CanonicalForm, DecodeError> {
    let text = match policy.format {
        Format::Yaml => serde_yaml::to_string(node)?,
        Format::Json => {
            let mut text = serde_json::to_string_pretty(node)?;
            text.push('\n');
            text
        }
    };

    Ok(CanonicalForm {
        format: policy.format,
        text,
    })
}

/// Lowers any serializable value into a [`Node`] through the given codec.
pub fn lower<T: Serialize>(value: &T, format: Format) -> Result<Node, DecodeError> {
    match format {
        Format::Yaml => Ok(Node::deserialize(serde_yaml::to_value(value)?)?),
        Format::Json => Ok(Node::deserialize(serde_json::to_value(value)?)?),
    }
}

/// Drops a leading UTF-8 byte order mark, which neither codec accepts.
pub(crate) fn strip_bom(raw: &str) -> &str {
    raw.strip_prefix('\u{feff}').unwrap_or(raw)
}

/// Decodes raw text into a [`Node`] without applying any schema.
///
/// Malformed syntax and duplicate mapping keys are rejected.
pub fn decode_generic(raw: &str, format: Format) -> Result<Node, DecodeError> {
    let raw = strip_bom(raw);
    match format {
        Format::Yaml => Ok(serde_yaml::from_str(raw)?),
        Format::Json => Ok(serde_json::from_str(raw)?),
    }
}

/// Serializes a typed resource into its canonical form.
///
/// # Errors
///
/// Returns `DetectError::Serialization` if the codec rejects the object.
pub fn to_canonical(
    object: &EditableResource,
    policy: &CanonicalPolicy,
) -> Result<CanonicalForm, DetectError> {
    let node = object
        .to_node(policy.format)
        .map_err(|e| DetectError::serialization(policy.format, e))?;
    canonicalize(&node, policy).map_err(|e| DetectError::serialization(policy.format, e))
}

/// Decodes an edited document generically and re-emits it canonically.
///
/// # Errors
///
/// Returns `DetectError::Malformed` if the text cannot be decoded at all, and
/// `DetectError::Serialization` if the decoded tree cannot be emitted.
pub fn normalize(raw: &str, policy: &CanonicalPolicy) -> Result<CanonicalForm, DetectError> {
    let node =
        decode_generic(raw, policy.format).map_err(|e| DetectError::malformed(policy.format, e))?;
    canonicalize(&node, policy).map_err(|e| DetectError::serialization(policy.format, e))
}
