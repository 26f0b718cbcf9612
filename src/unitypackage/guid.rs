// src/unitypackage/guid.rs
//! Asset GUID generation

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Length of a Unity asset GUID in hex characters
pub const GUID_LEN: usize = 32;

/// Source of fresh asset GUIDs
///
/// GUIDs are not derived from file content and are not checked for
/// uniqueness within a run; 128 random bits make collisions negligible for
/// the handful of files in one package.
pub trait GuidGenerator {
    fn next_guid(&mut self) -> String;
}

impl<G: GuidGenerator + ?Sized> GuidGenerator for Box<G> {
    fn next_guid(&mut self) -> String {
        (**self).next_guid()
    }
}

impl<G: GuidGenerator + ?Sized> GuidGenerator for &mut G {
    fn next_guid(&mut self) -> String {
        (**self).next_guid()
    }
}

/// GUIDs drawn from a random number generator
#[derive(Debug, Clone)]
pub struct RandomGuids<R = StdRng> {
    rng: R,
}

impl RandomGuids<StdRng> {
    /// Seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible sequence for tests
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for RandomGuids<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: RngCore> RandomGuids<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> GuidGenerator for RandomGuids<R> {
    fn next_guid(&mut self) -> String {
        let mut bytes = [0u8; GUID_LEN / 2];
        self.rng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

/// 32 lowercase hex characters
pub fn is_valid_guid(s: &str) -> bool {
    s.len() == GUID_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
