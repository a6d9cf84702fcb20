use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::state::Vesting;
use crate::utils::checks::{self, TokenAccountView};

pub fn handler(ctx: Context<Quote>) -> Result<()> {
    let schedule = Vesting::load_checked(&ctx.accounts.vesting, ctx.program_id)?;
    checks::check_custody(
        &schedule,
        &TokenAccountView::of(ctx.accounts.custody.key(), &ctx.accounts.custody),
    )?;

    let now = Clock::get()?.unix_timestamp;
    let terms = schedule.terms();
    let quote = terms.entitlement(now, ctx.accounts.custody.amount)?;

    emit!(UnlockQuote {
        vesting: ctx.accounts.vesting.key(),
        timestamp: now,
        periods_elapsed: quote.periods_elapsed,
        entitled: quote.entitled,
        released: quote.released,
        releasable: quote.releasable,
        fully_vested_at: terms.fully_vested_at().unwrap_or(i64::MAX),
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Quote<'info> {
    /// CHECK: owner, discriminator and length validated in-handler.
    pub vesting: UncheckedAccount<'info>,

    pub custody: Account<'info, TokenAccount>,
}

#[event]
pub struct UnlockQuote {
    pub vesting: Pubkey,
    pub timestamp: i64,
    pub periods_elapsed: u64,
    pub entitled: u64,
    pub released: u64,
    pub releasable: u64,
    pub fully_vested_at: i64,
}
