#![allow(unexpected_cfgs)]

//! # Token vesting
//!
//! Holds a fixed pool of SPL tokens and releases it to one beneficiary in
//! equal tranches as time passes:
//!  - `initialize` creates the schedule store and funds custody in one step
//!  - `unlock` pays out whatever the elapsed periods newly entitle; anyone may call it
//!  - `quote` reports the current entitlement without moving funds
//!
//! Custody is owned by a program-derived authority seeded by the schedule
//! store address, so no private key can move the pool.

use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

#[allow(ambiguous_glob_reexports)]
pub use instructions::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod token_vesting {
    use super::*;

    /// Create the schedule store, verify the custody authority and deposit the full pool.
    pub fn initialize(
        ctx: Context<Initialize>,
        custody_authority_bump: u8,
        start_time: i64,
        total_amount: u64,
        period_duration: u64,
        unit_amount: u64,
    ) -> Result<()> {
        initialize::handler(
            ctx,
            custody_authority_bump,
            start_time,
            total_amount,
            period_duration,
            unit_amount,
        )
    }

    /// Release everything entitled so far that has not been released yet.
    pub fn unlock(ctx: Context<Unlock>) -> Result<()> {
        unlock::handler(ctx)
    }

    /// Emit the current entitlement breakdown.
    pub fn quote(ctx: Context<Quote>) -> Result<()> {
        quote::handler(ctx)
    }
}
