//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through StreamRng instances derived from the
//! single master seed the engine was built with.
//!
//! Each stochastic concern gets its own stream, seeded deterministically
//! from (master_seed XOR slot_index). This means:
//!   - Adding a new stream never changes existing streams' draws.
//!   - Every stream is fully reproducible in isolation.
//!
//! Streams are persistent: the bank creates them once and each tick
//! continues drawing where the last tick stopped.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single stochastic concern.
pub struct StreamRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StreamRng {
    /// Create a stream from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll a u32 in [lo, hi] inclusive.
    pub fn next_in_range(&mut self, lo: u32, hi: u32) -> u32 {
        assert!(lo <= hi, "empty range");
        lo + self.next_u64_below((hi - lo + 1) as u64) as u32
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform draw in [-spread, +spread]. Used for market moves.
    pub fn symmetric(&mut self, spread: f64) -> f64 {
        (self.next_f64() - 0.5) * 2.0 * spread
    }
}

/// All RNG streams for one engine, indexed by stable slot.
pub struct RngBank {
    sales:  StreamRng,
    market: StreamRng,
    kitchen: StreamRng,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self {
            sales:   StreamRng::new(master_seed, StreamSlot::Sales as u64).with_name("sales"),
            market:  StreamRng::new(master_seed, StreamSlot::Market as u64).with_name("market"),
            kitchen: StreamRng::new(master_seed, StreamSlot::Kitchen as u64).with_name("kitchen"),
        }
    }

    pub fn stream(&mut self, slot: StreamSlot) -> &mut StreamRng {
        match slot {
            StreamSlot::Sales   => &mut self.sales,
            StreamSlot::Market  => &mut self.market,
            StreamSlot::Kitchen => &mut self.kitchen,
        }
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries — only append.
/// Reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    /// Hourly sales resolution draws.
    Sales = 0,
    /// Daily stock-price moves.
    Market = 1,
    /// Cooking success rolls.
    Kitchen = 2,
    // Add new streams here — append only.
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Market => "market",
            Self::Kitchen => "kitchen",
        }
    }
}
