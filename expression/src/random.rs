// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

const MULTIPLIER: u64 = 6364136223846793005;

/// A PCG32 (XSH-RR) pseudo-random number generator.
///
/// Seeding and output match the reference implementation, so the sequence for
/// a given seed and stream is the same as everywhere else PCG32 is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcg32 {
    state: u64,
    increment: u64,
}

impl Pcg32 {
    /// Creates a generator on stream 0 from the given seed.
    pub fn new(seed: u64) -> Pcg32 {
        Pcg32::with_stream(seed, 0)
    }

    /// Creates a generator from the given seed on the selected stream.
    /// Generators on different streams produce unrelated sequences even with
    /// the same seed.
    pub fn with_stream(seed: u64, stream: u64) -> Pcg32 {
        let mut rng = Pcg32 {
            state: 0,
            increment: (stream << 1) | 1,
        };
        rng.reseed(seed);
        rng
    }

    /// Restarts the sequence from the given seed, staying on the same stream.
    pub fn reset(&mut self, seed: u64) {
        self.state = 0;
        self.reseed(seed);
    }

    /// Returns the next 32 random bits.
    pub fn next_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.step();
        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rotation = (old_state >> 59) as u32;
        xorshifted.rotate_right(rotation)
    }

    /// Returns a random number in `0..=0xFFFFFF`, from the high bits of
    /// [`Pcg32::next_u32`].
    ///
    /// Engines which mask off the low 24 bits instead (`next_u32() & 0xFFFFFF`)
    /// draw different `R(a,b)` values for the same seed, so seeded results are
    /// only reproducible between users of this crate.
    pub fn next_u24(&mut self) -> u32 {
        self.next_u32() >> 8
    }

    fn reseed(&mut self, seed: u64) {
        self.step();
        self.state = self.state.wrapping_add(seed);
        self.step();
    }

    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(self.increment);
    }
}
