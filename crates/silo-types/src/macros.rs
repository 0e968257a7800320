/// Shared plumbing for 32-byte hash identifiers.
///
/// Generates hex encoding, parsing, null handling, and conversions. Each
/// identifier keeps its own `Debug`/`Display` so logs stay distinguishable.
macro_rules! hash_identifier {
    ($name:ident) => {
        impl $name {
            /// Create from a pre-computed 32-byte hash.
            pub const fn from_hash(hash: [u8; 32]) -> Self {
                Self(hash)
            }

            /// The null identifier (all zeros).
            pub const fn null() -> Self {
                Self([0u8; 32])
            }

            /// Returns `true` if this is the null identifier.
            pub fn is_null(&self) -> bool {
                self.0 == [0u8; 32]
            }

            /// The raw 32-byte hash.
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Hex-encoded string representation.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Short hex representation (first 8 characters).
            pub fn short_hex(&self) -> String {
                hex::encode(&self.0[..4])
            }

            /// Parse from a 64-character hex string.
            pub fn from_hex(s: &str) -> Result<Self, $crate::error::TypeError> {
                let bytes =
                    hex::decode(s).map_err(|e| $crate::error::TypeError::InvalidHex(e.to_string()))?;
                let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
                    $crate::error::TypeError::InvalidLength {
                        expected: 32,
                        actual: bytes.len(),
                    }
                })?;
                Ok(Self(arr))
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl From<$name> for [u8; 32] {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }
    };
}
