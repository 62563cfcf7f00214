/// Small seeded xorshift64* generator. Layouts must be reproducible from `LayoutConfig::seed`, so
/// nothing here touches thread-local or OS entropy.
#[derive(Debug, Clone)]
pub(crate) struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub(crate) fn new(seed: u64) -> Self {
        // An all-zero state would only ever yield zeros.
        Self { state: seed.max(1) }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub(crate) fn next_f64_unit(&mut self) -> f64 {
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }

    /// Uniform in `[-1, 1)`.
    pub(crate) fn next_f64_signed(&mut self) -> f64 {
        self.next_f64_unit() * 2.0 - 1.0
    }
}
