/// 15-bit linear congruential generator.
///
/// Cheap and fully deterministic for a given seed, which keeps the traffic
/// light timeline reproducible in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prng {
    state: u16,
}

const MASK: u16 = 0x7fff;

impl Prng {
    pub const fn new(seed: u16) -> Self {
        Self { state: seed & MASK }
    }

    /// Current state, suitable for persisting as the next seed
    pub const fn state(&self) -> u16 {
        self.state
    }

    /// Advances the generator and returns the raw 15-bit value
    pub const fn next_raw(&mut self) -> u16 {
        self.state = self.state.wrapping_mul(5).wrapping_add(17) & MASK;
        self.state
    }

    /// Value in `min..=max`, drawn from the upper bits of the state.
    ///
    /// Returns `min` when the range is empty.
    pub const fn range(&mut self, min: u16, max: u16) -> u16 {
        let raw = self.next_raw();
        if max < min {
            return min;
        }
        let Some(modulus) = (max - min).checked_add(1) else {
            return raw;
        };
        let bits = match 16 - modulus.leading_zeros() {
            0 => 1,
            n => n,
        };
        let shift = 14u32.saturating_sub(bits);
        (raw >> shift) % modulus + min
    }

    /// Fisher-Yates shuffle
    #[allow(clippy::cast_possible_truncation)]
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.range(0, i as u16) as usize;
            items.swap(i, j);
        }
    }
}

impl Default for Prng {
    fn default() -> Self {
        Self::new(0)
    }
}
