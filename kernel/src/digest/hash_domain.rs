//! Domain separators for canonical hashing.
//!
//! This module is the only place separator bytes are spelled out. Each
//! domain is declared by its tag; the macro builds `CASCADE::<TAG>::V1\0`
//! so the naming convention cannot drift.

macro_rules! hash_domains {
    ($( $(#[$meta:meta])* $variant:ident => $tag:literal ),+ $(,)?) => {
        /// Typed domain separator for [`super::hash::canonical_hash`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum HashDomain {
            $( $(#[$meta])* $variant, )+
        }

        impl HashDomain {
            /// Every domain, in declaration order.
            pub const ALL: &[HashDomain] = &[ $( Self::$variant, )+ ];

            /// Null-terminated separator prefixed to the hashed bytes.
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => concat!("CASCADE::", $tag, "::V1\0").as_bytes(), )+
                }
            }

            /// The tag between the namespace and the version.
            #[must_use]
            pub const fn tag(&self) -> &'static str {
                match self {
                    $( Self::$variant => $tag, )+
                }
            }
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.tag())
            }
        }
    };
}

hash_domains! {
    /// Structural level content; the validation cache key.
    LevelContent => "LEVEL_CONTENT",
    /// Board fingerprints.
    BoardState => "BOARD_STATE",
    /// Refill spawn sequence seed.
    SpawnSeed => "SPAWN_SEED",
    /// Rollout RNG seed.
    RolloutSeed => "ROLLOUT_SEED",
}
