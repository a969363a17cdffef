use blake2::{Blake2b512, Digest};
use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

const KEY_LEN: usize = 32;
const BUFFER_LEN: usize = 512;

/// Source of randomness consumed by the generator.
///
/// Implementors only have to provide [`RandomSource::uniform_int`]; sampling
/// without replacement is derived from it.
pub trait RandomSource {
    /// Uniform integer in `min..=max`. Callers guarantee `min <= max`.
    fn uniform_int(&mut self, min: usize, max: usize) -> usize;

    /// `k` distinct elements of `population`, in random order.
    ///
    /// Runs a partial Fisher-Yates shuffle over the indices, so the result is
    /// a uniformly random ordered sample. Callers guarantee
    /// `k <= population.len()`.
    fn sample_distinct<'a, T>(&mut self, population: &'a [T], k: usize) -> Vec<&'a T> {
        let mut indices: Vec<usize> = (0..population.len()).collect();
        let take = k.min(indices.len());

        for i in 0..take {
            let j = self.uniform_int(i, indices.len() - 1);
            indices.swap(i, j);
        }

        indices[..take].iter().map(|&i| &population[i]).collect()
    }
}

/// ChaCha20 keystream with unbiased rejection sampling.
///
/// Keyed from the operating system for everyday use, or from a seed phrase
/// when reproducible output is wanted.
pub struct KeystreamRng {
    cipher: ChaCha20,
    buffer: Zeroizing<Vec<u8>>,
    pos: usize,
}

impl KeystreamRng {
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        let mut cipher = ChaCha20::new(key.into(), &[0u8; 12].into());
        let mut buffer = Zeroizing::new(vec![0u8; BUFFER_LEN]);
        cipher.apply_keystream(&mut buffer);

        Self {
            cipher,
            buffer,
            pos: 0,
        }
    }

    pub fn from_entropy() -> Self {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(&mut key[..]);
        Self::new(&key)
    }

    /// Same seed, same stream.
    pub fn from_seed(seed: &str) -> Self {
        let mut hasher = Blake2b512::new();
        hasher.update(seed.as_bytes());
        let digest = Zeroizing::new(hasher.finalize().to_vec());

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(&digest[..KEY_LEN]);
        Self::new(&key)
    }

    fn next_u64(&mut self) -> u64 {
        if self.pos + 8 > self.buffer.len() {
            self.cipher.apply_keystream(&mut self.buffer);
            self.pos = 0;
        }

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.buffer[self.pos..self.pos + 8]);
        self.pos += 8;
        u64::from_le_bytes(bytes)
    }
}

impl RandomSource for KeystreamRng {
    fn uniform_int(&mut self, min: usize, max: usize) -> usize {
        let span = (max - min) as u64;
        if span == u64::MAX {
            return min + self.next_u64() as usize;
        }

        let range = span + 1;
        let rejection_threshold = u64::MAX - (u64::MAX % range);

        loop {
            let value = self.next_u64();
            if value < rejection_threshold {
                return min + (value % range) as usize;
            }
        }
    }
}
