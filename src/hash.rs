//! Map type backing the bitmap tick source.
//!
//! Keys are small integers (word positions and tick indices), so a fast
//! non-cryptographic hasher pays off. The backend is picked by cargo
//! feature; `std-hash` takes precedence, then `rustc-hash`, then `ahash`.

#[cfg(all(feature = "rustc-hash", not(feature = "std-hash")))]
pub type FastMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[cfg(all(
    feature = "ahash",
    not(any(feature = "rustc-hash", feature = "std-hash"))
))]
pub type FastMap<K, V> = ahash::AHashMap<K, V>;

#[cfg(any(
    feature = "std-hash",
    not(any(feature = "rustc-hash", feature = "ahash"))
))]
pub type FastMap<K, V> = std::collections::HashMap<K, V>;
