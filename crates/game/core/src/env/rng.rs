//! RNG oracle for deterministic random number generation.
//!
//! Every random draw in the simulation is a pure function of the game seed,
//! the action nonce, a stream id and the draw index within the action, so a
//! replay of the same action sequence reproduces the same spawns and rolls.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&self, seed: u64, sides: u32) -> u32 {
        (self.next_u32(seed) % sides.max(1)) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }

    /// Uniform sample in `[0, 1)`.
    fn unit(&self, seed: u64) -> f64 {
        f64::from(self.next_u32(seed)) / 4_294_967_296.0
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Oracle that always returns the same raw value.
///
/// `FixedRng(14)` rolls 15 on a d20 and samples ~0.0 for probabilities, which
/// makes combat and spawn scenarios reproducible by hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedRng(pub u32);

impl FixedRng {
    /// Oracle whose d20 always shows `face` (1-20).
    pub const fn d20(face: u32) -> Self {
        Self(face.saturating_sub(1))
    }
}

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

/// Compute deterministic seed from game state components.
///
/// * `game_seed` - Base seed set at game start
/// * `nonce` - Action sequence number (increments each applied action)
/// * `stream` - Subsystem drawing the value (see [`RollStream`])
/// * `draw` - Index of the draw within the action
pub fn compute_seed(game_seed: u64, nonce: u64, stream: u32, draw: u32) -> u64 {
    // SplitMix64 / FxHash style combiners
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(stream).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(draw).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Independent draw streams, so adding a roll in one subsystem does not shift
/// every roll in another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RollStream {
    Combat = 1,
    Spawn = 2,
    Effect = 3,
}

/// Per-action dice bound to one RNG stream.
pub struct Dice<'a> {
    rng: &'a (dyn RngOracle + 'a),
    game_seed: u64,
    nonce: u64,
    stream: RollStream,
    draws: u32,
}

impl<'a> Dice<'a> {
    pub fn new(rng: &'a (dyn RngOracle + 'a), game_seed: u64, nonce: u64, stream: RollStream) -> Self {
        Self {
            rng,
            game_seed,
            nonce,
            stream,
            draws: 0,
        }
    }

    fn next_seed(&mut self) -> u64 {
        let seed = compute_seed(self.game_seed, self.nonce, self.stream as u32, self.draws);
        self.draws = self.draws.wrapping_add(1);
        seed
    }

    /// Uniform 1-20.
    pub fn d20(&mut self) -> u32 {
        let seed = self.next_seed();
        self.rng.roll_die(seed, 20)
    }

    /// Uniform in `[min, max]` inclusive.
    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        let seed = self.next_seed();
        self.rng.range(seed, min, max)
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        let seed = self.next_seed();
        self.rng.unit(seed)
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic_and_seed_sensitive() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
        assert_ne!(rng.next_u32(42), rng.next_u32(43));
    }

    #[test]
    fn dice_draws_differ_within_an_action() {
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 9, 1, RollStream::Combat);
        let rolls: Vec<u32> = (0..32).map(|_| dice.d20()).collect();
        assert!(rolls.iter().all(|r| (1..=20).contains(r)));
        assert!(rolls.windows(2).any(|w| w[0] != w[1]));
        assert_eq!(dice.draws(), 32);
    }

    #[test]
    fn fixed_rng_forces_the_requested_face() {
        let rng = FixedRng::d20(15);
        let mut dice = Dice::new(&rng, 0, 0, RollStream::Combat);
        assert_eq!(dice.d20(), 15);
        assert!(dice.unit() < 1e-6);
    }
}
