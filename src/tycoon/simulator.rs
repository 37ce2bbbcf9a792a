//! Balance simulator for Idle Tycoon.
//! Run with: cargo test simulate_greedy -- --nocapture
