/// Mulberry32: a 32-bit additive counter mixed through two xorshift-multiply
/// rounds.
///
/// Yields uniforms in [0, 1) with 32 bits of resolution. Cloning the generator
/// snapshots its position, so a clone replays the same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    const INCREMENT: u32 = 0x6D2B_79F5;
    const SCALE: f64 = 4_294_967_296.0; // 2^32

    /// Seeds are reduced modulo 2^32.
    pub fn new(seed: i64) -> Self {
        Self { state: seed as u32 }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(Self::INCREMENT);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(t | 1);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(r | 61));
        r ^ (r >> 14)
    }

    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / Self::SCALE
    }
}

impl Iterator for Mulberry32 {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}
