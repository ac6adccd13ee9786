//! Hash containers with a fixed-seed hasher, re-exporting *hashbrown*
//! backed by *foldhash*.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0xD1B2_7F09_A64E_33C5);

/// A fixed hasher provided hash results that only related on the input.
pub type FixedHasher = FoldHasher<'static>;

/// Fixed hash state based upon a random but fixed seed, so table iteration
/// order is stable across runs of the same build.
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// Containers

/// The hash map used for codec tables and the dictionary variant.
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;
