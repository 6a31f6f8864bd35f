//! Extra-field detection for an edited resource.
//!
//! A comparison runs in up to two stages. The edit is first decoded strictly
//! into the resource's own kind; if that succeeds, no key was dropped and the
//! report is empty. Otherwise the typed object and the edit are both brought
//! to canonical form and compared, and any difference is reported.
//!
//! # Examples
//!
//! ```
//! use editguard::{detect_extra_fields, EditableResource, GroupConfig};
//!
//! let object = EditableResource::from(GroupConfig::new("a", 3));
//!
//! let report = detect_extra_fields("size: 3\nname: a\n", &object).unwrap();
//! assert!(report.is_empty());
//!
//! let report = detect_extra_fields("name: a\nsise: 3\n", &object).unwrap();
//! assert!(report.to_string().contains("sise"));
//! ```

use crate::canonical::{normalize, to_canonical, CanonicalPolicy};
use crate::error::DetectError;
use crate::report::{report, DiffReport, ReportOptions};
use crate::resource::{decode_strict, EditableResource};

/// Configuration for a [`Detector`].
#[derive(Debug, Clone, Default)]
pub struct DetectConfig {
    pub policy: CanonicalPolicy,
    pub report: ReportOptions,
}

/// Runs extra-field detection under a fixed configuration.
///
/// A detector holds no state between calls and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Detector {
    config: DetectConfig,
}

impl Detector {
    pub fn new(config: DetectConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    /// Reports what `raw_edit` contains that `object` does not.
    ///
    /// # Errors
    ///
    /// - `DetectError::Malformed` if the edit cannot be decoded at all
    /// - `DetectError::Serialization` if a canonical form cannot be produced
    ///
    /// Finding discarded fields is not an error.
    pub fn detect(
        &self,
        raw_edit: &str,
        object: &EditableResource,
    ) -> Result<DiffReport, DetectError> {
        let policy = &self.config.policy;

        match decode_strict(raw_edit, object.kind(), policy.format) {
            Ok(_) => {
                log::debug!(
                    "edit of {} `{}` decodes strictly, nothing discarded",
                    object.kind(),
                    object.name()
                );
                return Ok(DiffReport::empty());
            }
            Err(e) => {
                log::debug!(
                    "strict decode of {} `{}` failed, comparing canonical forms: {}",
                    object.kind(),
                    object.name(),
                    e
                );
            }
        }

        let known = to_canonical(object, policy)?;
        let edited = normalize(raw_edit, policy)?;
        log::trace!("known canonical form:\n{}", known);
        log::trace!("edited canonical form:\n{}", edited);

        let report = report(&known, &edited, &self.config.report);
        if report.is_empty() {
            log::debug!("canonical forms match");
        } else {
            log::debug!(
                "canonical forms differ in {} hunk(s), discarded: {:?}",
                report.hunks.len(),
                report.discarded_keys()
            );
        }

        Ok(report)
    }
}

/// Reports what `raw_edit` contains that `object` does not, using YAML and the
/// default report options.
///
/// Returns an empty report when nothing was discarded.
pub fn detect_extra_fields(
    raw_edit: &str,
    object: &EditableResource,
) -> Result<DiffReport, DetectError> {
    Detector::default().detect(raw_edit, object)
}
