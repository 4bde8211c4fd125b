//! Field annotation parsing
//!
//! Each model field may carry an annotation of the form
//! `"target_path[, keyword]*"`. The first component is the state path the
//! field maps to; the remaining components are case-insensitive keywords:
//!
//! - `addedInNextMajorVersion` - only emitted once the next major version is active
//! - `removedInNextMajorVersion` - no longer emitted once the next major version is active

use crate::error::AnnotationError;
use crate::features::Features;
use crate::kind::FieldSpec;
use std::collections::HashMap;

/// Keyword gating a field on the next major version
pub const ADDED_IN_NEXT_MAJOR_VERSION: &str = "addedInNextMajorVersion";

/// Keyword dropping a field in the next major version
pub const REMOVED_IN_NEXT_MAJOR_VERSION: &str = "removedInNextMajorVersion";

/// Parsed form of a field annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// State path the field maps to
    pub path: String,
    /// Field only exists from the next major version on
    pub added_in_next_major_version: bool,
    /// Field no longer exists from the next major version on
    pub removed_in_next_major_version: bool,
}

impl FieldDescriptor {
    /// Whether the field is part of the state under the given features
    pub fn is_active(&self, features: Features) -> bool {
        if self.removed_in_next_major_version && features.next_major_version {
            return false;
        }
        if self.added_in_next_major_version && !features.next_major_version {
            return false;
        }
        true
    }
}

/// Parse a raw annotation into a [`FieldDescriptor`].
pub fn parse_annotation(raw: &str) -> Result<FieldDescriptor, AnnotationError> {
    if raw.is_empty() {
        return Err(AnnotationError::Empty);
    }

    let mut components = raw.split(',');
    let path = components.next().unwrap_or_default().trim();
    if path.is_empty() {
        return Err(AnnotationError::EmptyPath {
            annotation: raw.to_string(),
        });
    }

    let mut descriptor = FieldDescriptor {
        path: path.to_string(),
        added_in_next_major_version: false,
        removed_in_next_major_version: false,
    };

    for token in components {
        let keyword = token.trim().to_lowercase();
        if keyword == ADDED_IN_NEXT_MAJOR_VERSION.to_lowercase() {
            descriptor.added_in_next_major_version = true;
        } else if keyword == REMOVED_IN_NEXT_MAJOR_VERSION.to_lowercase() {
            descriptor.removed_in_next_major_version = true;
        } else {
            return Err(AnnotationError::UnknownKeyword {
                token: token.trim().to_string(),
                annotation: raw.to_string(),
            });
        }
    }

    if descriptor.added_in_next_major_version && descriptor.removed_in_next_major_version {
        return Err(AnnotationError::ConflictingVersionFlags {
            annotation: raw.to_string(),
        });
    }

    Ok(descriptor)
}

/// Tracks target paths already claimed at one struct level.
#[derive(Debug, Default)]
pub(crate) struct PathClaims {
    claimed: HashMap<String, &'static str>,
}

impl PathClaims {
    pub(crate) fn claim(&mut self, path: &str, field: &'static str) -> Result<(), AnnotationError> {
        if let Some(&first) = self.claimed.get(path) {
            return Err(AnnotationError::DuplicatePath {
                path: path.to_string(),
                first,
                second: field,
            });
        }
        self.claimed.insert(path.to_string(), field);
        Ok(())
    }
}

/// Annotated fields of one struct level, paired with their descriptors.
///
/// Fields without an annotation are left out.
pub(crate) fn annotated_fields(
    fields: Vec<FieldSpec>,
) -> Result<Vec<(FieldSpec, FieldDescriptor)>, (&'static str, AnnotationError)> {
    let mut claims = PathClaims::default();
    let mut out = Vec::with_capacity(fields.len());
    for spec in fields {
        let Some(raw) = spec.annotation else {
            continue;
        };
        let descriptor = parse_annotation(raw).map_err(|e| (spec.name, e))?;
        claims
            .claim(&descriptor.path, spec.name)
            .map_err(|e| (spec.name, e))?;
        out.push((spec, descriptor));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path() {
        let d = parse_annotation("name").unwrap();
        assert_eq!(d.path, "name");
        assert!(!d.added_in_next_major_version);
        assert!(!d.removed_in_next_major_version);
    }

    #[test]
    fn test_keywords_trimmed_and_case_insensitive() {
        let d = parse_annotation(" vnet_image_pull_enabled , ADDEDINNEXTMAJORVERSION ").unwrap();
        assert_eq!(d.path, "vnet_image_pull_enabled");
        assert!(d.added_in_next_major_version);

        let d = parse_annotation("storage_access_key,removedInNextMajorVersion").unwrap();
        assert!(d.removed_in_next_major_version);
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse_annotation(""), Err(AnnotationError::Empty));
        assert!(matches!(
            parse_annotation("  ,addedInNextMajorVersion"),
            Err(AnnotationError::EmptyPath { .. })
        ));
    }

    #[test]
    fn test_unknown_keyword_named() {
        let err = parse_annotation("name,computed").unwrap_err();
        assert_eq!(
            err,
            AnnotationError::UnknownKeyword {
                token: "computed".to_string(),
                annotation: "name,computed".to_string(),
            }
        );
        assert!(err.to_string().contains("\"computed\""));
    }

    #[test]
    fn test_conflicting_flags() {
        let err =
            parse_annotation("name,addedInNextMajorVersion,removedInNextMajorVersion").unwrap_err();
        assert!(matches!(err, AnnotationError::ConflictingVersionFlags { .. }));
    }

    #[test]
    fn test_is_active() {
        let on = Features {
            next_major_version: true,
        };
        let off = Features::default();

        let added = parse_annotation("a,addedInNextMajorVersion").unwrap();
        assert!(added.is_active(on));
        assert!(!added.is_active(off));

        let removed = parse_annotation("a,removedInNextMajorVersion").unwrap();
        assert!(!removed.is_active(on));
        assert!(removed.is_active(off));

        let plain = parse_annotation("a").unwrap();
        assert!(plain.is_active(on) && plain.is_active(off));
    }

    #[test]
    fn test_duplicate_paths_rejected() {
        let fields = vec![
            FieldSpec::new("first", Some("name"), None),
            FieldSpec::new("skipped", None, None),
            FieldSpec::new("second", Some("name"), None),
        ];
        let (field, err) = annotated_fields(fields).unwrap_err();
        assert_eq!(field, "second");
        assert_eq!(
            err,
            AnnotationError::DuplicatePath {
                path: "name".to_string(),
                first: "first",
                second: "second",
            }
        );
    }
}
