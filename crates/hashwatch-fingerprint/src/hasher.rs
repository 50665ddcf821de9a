use xxhash_rust::xxh3::Xxh3;

/// Fixed seed so fingerprints survive process restarts.
pub const SEED: u64 = 0;

/// Incremental hash producing a signed machine word.
pub trait ContentHasher {
    fn update(&mut self, data: &[u8]);
    fn finish(self) -> i64;

    fn digest(data: &[u8]) -> i64
    where
        Self: Default + Sized,
    {
        let mut hasher = Self::default();
        hasher.update(data);
        hasher.finish()
    }
}

pub struct Xxh3Hasher(Xxh3);

impl Xxh3Hasher {
    pub fn new() -> Self { Self(Xxh3::with_seed(SEED)) }
}

impl Default for Xxh3Hasher {
    fn default() -> Self { Self::new() }
}

impl ContentHasher for Xxh3Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }

    // Bit-for-bit reinterpretation; the sign is part of the token.
    fn finish(self) -> i64 { self.0.digest() as i64 }
}
