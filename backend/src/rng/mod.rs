//! Deterministic random number generation
//!
//! Every peg deflection in a simulated drop draws from this module, so a
//! seeded session replays the exact same landings.

mod xorshift;

pub use xorshift::RngManager;
