pub fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

/// Folds a millisecond clock reading into a 32-bit seed.
pub fn time_seed(now_ms: u64, salt: u32) -> u32 {
    let lo = now_ms as u32;
    let hi = (now_ms >> 32) as u32;
    splitmix32(lo ^ splitmix32(hi ^ salt.wrapping_add(0x9E37_79B9)))
}

#[derive(Clone, Debug)]
pub struct SplitMix32 {
    state: u32,
}

impl SplitMix32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x9E37_79B9);
        splitmix32(self.state)
    }

    /// Uniform index in `0..upper`.
    pub fn below(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        let unit = (self.next_u32() >> 8) as f64 / (1u32 << 24) as f64;
        ((unit * upper as f64) as usize).min(upper - 1)
    }
}

pub fn shuffle<T>(items: &mut [T], seed: u32) {
    let mut rng = SplitMix32::new(seed);
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_is_a_permutation() {
        let mut items: Vec<usize> = (0..36).collect();
        shuffle(&mut items, 0xDEAD_BEEF);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..36).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_order() {
        let mut a: Vec<u32> = (0..16).collect();
        let mut b = a.clone();
        shuffle(&mut a, 42);
        shuffle(&mut b, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn below_stays_in_range() {
        let mut rng = SplitMix32::new(7);
        for _ in 0..1000 {
            assert!(rng.below(10) < 10);
        }
        assert_eq!(rng.below(0), 0);
        assert_eq!(rng.below(1), 0);
    }
}
