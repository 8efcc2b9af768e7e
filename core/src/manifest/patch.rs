// ## 📂 File: `src/manifest/patch.rs`

//! manifest/patch.rs
//! Patch passes: idempotent upserts of fields on named partition records.
//!
//! Design notes:
//! - For each field: find the child element, create it if missing, write the
//!   text only if it differs from the desired value.
//! - Every record whose name matches is patched.
//! - A missing target is `PatchOutcome::NotFound`, never an error; the tree
//!   is left untouched in that case.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::constants::elements;
use crate::manifest::tree::Manifest;
use crate::manifest::types::{parse_flag, ManifestError};

/// How the current text is compared with the desired value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Byte-exact match; surrounding whitespace or case differences are rewritten.
    Exact,
    /// Boolean-as-text; `FALSE`, ` false ` and `false` are equal.
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldUpsert {
    pub field: &'static str,
    pub value: &'static str,
    pub kind: FieldKind,
}

impl FieldUpsert {
    fn satisfied_by(&self, current: &str) -> bool {
        match self.kind {
            FieldKind::Exact => current == self.value,
            FieldKind::Flag => parse_flag(current).is_some_and(|v| Some(v) == parse_flag(self.value)),
        }
    }
}

/// A named set of upserts against one partition name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchPass {
    pub name: &'static str,
    pub target: &'static str,
    pub fields: &'static [FieldUpsert],
}

/// Marks the device-identity partition as flashed so region data is rewritten.
/// Every field must read exactly as written here.
pub const PROVISIONING_ENABLE: PatchPass = PatchPass {
    name: "provisioning-enable",
    target: "proinfo",
    fields: &[
        FieldUpsert { field: elements::FILE_NAME, value: "proinfo", kind: FieldKind::Exact },
        FieldUpsert { field: elements::IS_DOWNLOAD, value: "true", kind: FieldKind::Exact },
        FieldUpsert { field: elements::IS_UPGRADABLE, value: "true", kind: FieldKind::Exact },
    ],
};

/// Excludes user data from the flash so it is not wiped.
/// Flags already reading false in any case are left alone.
pub const DATA_PRESERVING: PatchPass = PatchPass {
    name: "data-preserving",
    target: "userdata",
    fields: &[
        FieldUpsert { field: elements::FILE_NAME, value: "userdata.img", kind: FieldKind::Exact },
        FieldUpsert { field: elements::IS_DOWNLOAD, value: "false", kind: FieldKind::Flag },
        FieldUpsert { field: elements::IS_UPGRADABLE, value: "false", kind: FieldKind::Flag },
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PatchOutcome {
    Applied {
        records: usize,
        created: usize,
        updated: usize,
    },
    NotFound,
}

impl PatchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, PatchOutcome::Applied { .. })
    }

    /// True when the pass wrote anything.
    pub fn changed(&self) -> bool {
        matches!(self, PatchOutcome::Applied { created, updated, .. } if created + updated > 0)
    }
}

impl PatchPass {
    /// Apply this pass to every matching record of `manifest`.
    pub fn apply(&self, manifest: &mut Manifest) -> Result<PatchOutcome, ManifestError> {
        let targets = manifest.find_partitions(self.target)?;
        if targets.is_empty() {
            warn!(pass = self.name, partition = self.target, "partition not found, manifest left unchanged");
            return Ok(PatchOutcome::NotFound);
        }

        let (mut created, mut updated) = (0usize, 0usize);
        for &record in &targets {
            for upsert in self.fields {
                let field = match manifest.child_element(record, upsert.field) {
                    Some(id) => id,
                    None => {
                        created += 1;
                        manifest.append_element(record, upsert.field)
                    }
                };
                let current = manifest.text(field)?;
                if !upsert.satisfied_by(&current) {
                    debug!(
                        pass = self.name,
                        field = upsert.field,
                        from = %current.trim(),
                        to = upsert.value,
                        "field updated"
                    );
                    manifest.set_text(field, upsert.value);
                    updated += 1;
                }
            }
        }

        info!(pass = self.name, partition = self.target, records = targets.len(), created, updated, "patch applied");
        Ok(PatchOutcome::Applied { records: targets.len(), created, updated })
    }
}
