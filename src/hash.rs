//! Key hashing for [`HashMap`](crate::HashMap).
//!
//! The map never inspects key types at run time. Instead every map is bound
//! at compile time to a [`KeyHasher`], which turns a key into the 64-bit
//! value the table probes with. Any `Fn(&K) -> u64` is a `KeyHasher<K>`, and
//! [`BuildHasherAdapter`] lifts any [`BuildHasher`] into one.

use core::hash::BuildHasher;
use core::hash::Hash;

/// Produces the 64-bit hash of a key.
///
/// Implementations must be deterministic: the same key must always hash to
/// the same value for the lifetime of the map, and keys that compare equal
/// must hash equally.
pub trait KeyHasher<K: ?Sized> {
    /// Hashes `key`.
    fn hash_key(&self, key: &K) -> u64;
}

impl<K, F> KeyHasher<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> u64,
{
    #[inline(always)]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Adapts a [`BuildHasher`] into a [`KeyHasher`] for every `K: Hash`.
///
/// # Examples
///
/// ```rust
/// use probe_hash::hash::BuildHasherAdapter;
/// use probe_hash::hash::KeyHasher;
/// use siphasher::sip::SipHasher;
/// # use core::hash::BuildHasher;
/// #
/// # #[derive(Default)]
/// # struct SimpleHasher;
/// # impl BuildHasher for SimpleHasher {
/// #     type Hasher = SipHasher;
/// #
/// #     fn build_hasher(&self) -> Self::Hasher {
/// #         SipHasher::new()
/// #     }
/// # }
///
/// let hasher = BuildHasherAdapter(SimpleHasher);
/// assert_eq!(hasher.hash_key("key"), hasher.hash_key("key"));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildHasherAdapter<S>(pub S);

impl<K, S> KeyHasher<K> for BuildHasherAdapter<S>
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hash builder used by [`DefaultHasher`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
        /// The randomly seeded [`KeyHasher`] used by [`HashMap::new`](crate::HashMap::new).
        pub type DefaultHasher = BuildHasherAdapter<DefaultHashBuilder>;
    } else if #[cfg(feature = "std")] {
        /// The hash builder used by [`DefaultHasher`].
        pub type DefaultHashBuilder = std::hash::RandomState;
        /// The randomly seeded [`KeyHasher`] used by [`HashMap::new`](crate::HashMap::new).
        pub type DefaultHasher = BuildHasherAdapter<DefaultHashBuilder>;
    }
}

/// Avalanche finalizer for 64-bit values.
///
/// Three Murmur3-style multiply-xor-shift rounds followed by a Fibonacci
/// multiply. Sequential inputs come out decorrelated, so consecutive integer
/// keys do not land in consecutive slots.
///
/// ```rust
/// use probe_hash::hash::mix64;
///
/// assert_ne!(mix64(1).wrapping_add(1), mix64(2));
/// assert_eq!(mix64(42), mix64(42));
/// ```
#[inline]
pub const fn mix64(mut u: u64) -> u64 {
    u ^= u >> 33;
    u = u.wrapping_mul(0xff51_afd7_ed55_8ccd);
    u ^= u >> 33;
    u = u.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    u ^= u >> 33;
    u = u.wrapping_add(u << 3);
    u ^= u >> 7;
    u = u.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    u ^= u >> 33;
    u
}

/// Primitive integers that [`hash_int`] accepts.
pub trait IntegerKey: Copy {
    /// Widens (or folds, for 128-bit types) the value into 64 bits.
    fn to_u64(self) -> u64;
}

macro_rules! integer_key {
    ($($t:ty => $via:ty),* $(,)?) => {
        $(
            impl IntegerKey for $t {
                #[inline(always)]
                fn to_u64(self) -> u64 {
                    self as $via as u64
                }
            }
        )*
    };
}

integer_key! {
    u8 => u64, u16 => u64, u32 => u64, u64 => u64, usize => u64,
    i8 => i64, i16 => i64, i32 => i64, i64 => i64, isize => i64,
}

impl IntegerKey for u128 {
    #[inline(always)]
    fn to_u64(self) -> u64 {
        (self as u64) ^ ((self >> 64) as u64)
    }
}

impl IntegerKey for i128 {
    #[inline(always)]
    fn to_u64(self) -> u64 {
        (self as u128).to_u64()
    }
}

/// Hashes an integer key with [`mix64`].
///
/// Usable directly as a map's hash function:
///
/// ```rust
/// use probe_hash::HashMap;
/// use probe_hash::hash::hash_int;
///
/// let mut map = HashMap::with_hasher(hash_int::<i32>);
/// map.insert(1, "a");
/// assert_eq!(map.get(&1), Some(&"a"));
/// ```
#[inline]
pub fn hash_int<T: IntegerKey>(key: &T) -> u64 {
    mix64(key.to_u64())
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hashes a string key with a fixed seed, so equal strings hash
        /// equally across maps and runs.
        ///
        /// ```rust
        /// use probe_hash::HashMap;
        /// use probe_hash::hash::hash_str;
        ///
        /// let mut map = HashMap::with_hasher(hash_str::<String>);
        /// map.insert("apple".to_string(), 5);
        /// assert_eq!(map.get(&"apple".to_string()), Some(&5));
        /// ```
        #[inline]
        pub fn hash_str<S: AsRef<str> + ?Sized>(key: &S) -> u64 {
            foldhash::fast::FixedState::with_seed(0).hash_one(key.as_ref())
        }
    } else if #[cfg(feature = "std")] {
        /// Hashes a string key with a fixed seed, so equal strings hash
        /// equally across maps and runs.
        #[inline]
        pub fn hash_str<S: AsRef<str> + ?Sized>(key: &S) -> u64 {
            use core::hash::Hasher;

            let mut hasher = std::hash::DefaultHasher::new();
            key.as_ref().hash(&mut hasher);
            hasher.finish()
        }
    }
}
