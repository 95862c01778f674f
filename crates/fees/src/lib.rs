//! Marketplace fee and break-even math.
//!
//! This crate contains the pricing rules for the marketplace the items are
//! resold on, implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage).

pub mod schedule;

pub use schedule::{break_even_price, fee, payout_after_fees, profit, FLAT_FEE, THRESHOLD};
