//! Strongly-typed identifiers used across the domain.

/// Declare a UUID-backed identifier newtype.
///
/// Every record kind gets its own identifier type so a `VehicleId` can never be
/// passed where a `DriverId` is expected. The generated type is `Copy`, ordered
/// (UUIDv7 keeps creation order), serializes transparently as a string and
/// parses with [`core::str::FromStr`], failing with
/// [`DomainError::InvalidArgument`](crate::DomainError::InvalidArgument).
#[macro_export]
macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $t($crate::uuid::Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self($crate::uuid::Uuid::now_v7())
            }

            pub fn from_uuid(uuid: $crate::uuid::Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &$crate::uuid::Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$crate::uuid::Uuid> for $t {
            fn from(value: $crate::uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for $crate::uuid::Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = $crate::uuid::Uuid::parse_str(s.trim()).map_err(|e| {
                    $crate::DomainError::invalid_argument(format!("{}: {}", $name, e))
                })?;
                Ok(Self(uuid))
            }
        }
    };
}

uuid_newtype!(
    /// Identifier of a user account (the seller who owns a sale).
    UserId,
    "UserId"
);
