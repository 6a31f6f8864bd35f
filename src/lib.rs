//! editguard - detect fields an edit carried that the typed schema dropped.
//!
//! When a user edits a configuration resource as text, any key the schema
//! does not know (usually a typo) is silently discarded on decode. This
//! library compares the edit against the typed object it produced and reports
//! exactly what was lost, without flagging differences in key order,
//! indentation or quoting.
//!
//! # Example
//!
//! ```
//! use editguard::{detect_extra_fields, EditableResource, GroupConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let object = EditableResource::from(GroupConfig::new("nodes", 3));
//! let edit = "name: nodes\nsize: 3\nmachinType: m5.large\n";
//!
//! let report = detect_extra_fields(edit, &object)?;
//! if !report.is_empty() {
//!     println!("These changes were discarded:\n{}", report);
//! }
//! # Ok(())
//! # }
//! ```

pub mod canonical;
pub mod detect;
pub mod diff;
pub mod error;
pub mod output;
pub mod report;
pub mod resource;
pub mod tree;

// Re-export commonly used types for convenience
pub use canonical::{normalize, to_canonical, CanonicalForm, CanonicalPolicy, Format};
pub use detect::{detect_extra_fields, DetectConfig, Detector};
pub use diff::{Change, ChangeKind};
pub use error::{DecodeError, DetectError, OutputError};
pub use output::{format_report, OutputFormat, OutputOptions};
pub use report::{report, DiffReport, ReportOptions};
pub use resource::{
    decode_strict, ClusterConfig, EditableResource, GroupConfig, GroupRole, ResourceKind, Subnet,
    SubnetType,
};
pub use tree::Node;
