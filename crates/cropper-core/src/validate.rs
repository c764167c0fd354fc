//! File validation before a payload is accepted for cropping.
//!
//! Only the declared MIME type and byte length are checked; the content is
//! not inspected until it is decoded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared properties of a candidate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Declared MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Length in bytes.
    pub size: u64,
}

impl FileInfo {
    pub fn new(mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// Type and size limits a file must satisfy.
///
/// `accepted_types` is treated as a set; its order only affects how the
/// accepted list is rendered in error messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    pub accepted_types: Vec<String>,
    pub max_size_bytes: u64,
}

impl Constraints {
    pub fn accepts_type(&self, mime_type: &str) -> bool {
        self.accepted_types.iter().any(|t| t == mime_type)
    }
}

/// Reasons a file is rejected. Only one is reported at a time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The declared type is not in the accepted set.
    #[error("File type not supported. Accepted types: {}", .accepted.join(", "))]
    UnsupportedType {
        mime_type: String,
        accepted: Vec<String>,
    },

    /// The file is larger than the configured maximum.
    #[error("File is too large. Maximum size: {}MB", megabytes_label(.max_size))]
    TooLarge { size: u64, max_size: u64 },
}

/// Check a file against the constraints.
///
/// The type is checked before the size, so a file failing both is reported
/// as `UnsupportedType`. A size equal to the maximum is accepted.
pub fn validate(file: &FileInfo, constraints: &Constraints) -> Result<(), ValidationError> {
    if !constraints.accepts_type(&file.mime_type) {
        return Err(ValidationError::UnsupportedType {
            mime_type: file.mime_type.clone(),
            accepted: constraints.accepted_types.clone(),
        });
    }

    if file.size > constraints.max_size_bytes {
        return Err(ValidationError::TooLarge {
            size: file.size,
            max_size: constraints.max_size_bytes,
        });
    }

    Ok(())
}

/// Render a byte count in MiB the way the upload hint shows it (`5`, `1.5`).
pub(crate) fn megabytes_label(bytes: &u64) -> String {
    format!("{}", *bytes as f64 / (1024.0 * 1024.0))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: A type outside the accepted set is rejected whatever its size.
        #[test]
        fn prop_unknown_type_always_unsupported(
            subtype in "[a-z]{1,8}",
            size in any::<u64>(),
            max_size in any::<u64>(),
        ) {
            let mime_type = format!("application/{}", subtype);
            let constraints = Constraints {
                accepted_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
                max_size_bytes: max_size,
            };

            let result = validate(&FileInfo::new(mime_type, size), &constraints);
            let is_unsupported = matches!(result, Err(ValidationError::UnsupportedType { .. }));
            prop_assert!(is_unsupported);
        }

        /// Property: An accepted type passes exactly when size <= max.
        #[test]
        fn prop_accepted_type_size_rule(
            size in 0u64..=20_000_000,
            max_size in 0u64..=20_000_000,
        ) {
            let constraints = Constraints {
                accepted_types: vec!["image/webp".to_string()],
                max_size_bytes: max_size,
            };

            let result = validate(&FileInfo::new("image/webp", size), &constraints);
            prop_assert_eq!(result.is_ok(), size <= max_size);
        }
    }
}
