use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::error::VestingError;
use crate::state::Vesting;
use crate::utils::authority;
use crate::utils::checks::{self, TokenAccountView};

/// Permissionless: funds can only reach a token account owned by the recorded
/// beneficiary, so no signature is required.
#[derive(Accounts)]
pub struct Unlock<'info> {
    /// CHECK: owner, discriminator and length validated in-handler.
    pub vesting: UncheckedAccount<'info>,

    /// CHECK: keyless PDA; re-derived from the stored bump in-handler.
    pub custody_authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub custody: Account<'info, TokenAccount>,

    #[account(mut)]
    pub beneficiary_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Unlock>) -> Result<()> {
    let vesting_key = ctx.accounts.vesting.key();
    let schedule = Vesting::load_checked(&ctx.accounts.vesting, ctx.program_id)?;

    checks::check_unlock(
        &schedule,
        &vesting_key,
        &ctx.accounts.custody_authority.key(),
        ctx.program_id,
        &TokenAccountView::of(ctx.accounts.custody.key(), &ctx.accounts.custody),
        &TokenAccountView::of(
            ctx.accounts.beneficiary_token_account.key(),
            &ctx.accounts.beneficiary_token_account,
        ),
    )?;

    let now = Clock::get()?.unix_timestamp;
    let custody_before = ctx.accounts.custody.amount;
    let quote = schedule.terms().entitlement(now, custody_before)?;
    if quote.releasable == 0 {
        msg!(
            "[vesting] unlock no-op vesting={} entitled={} released={}",
            vesting_key,
            quote.entitled,
            quote.released
        );
        return Ok(());
    }

    let bump = [schedule.custody_authority_bump];
    let seeds = authority::custody_authority_seeds(&vesting_key, &bump);
    let signer_seeds: &[&[&[u8]]] = &[&seeds];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.custody.to_account_info(),
                to: ctx.accounts.beneficiary_token_account.to_account_info(),
                authority: ctx.accounts.custody_authority.to_account_info(),
            },
            signer_seeds,
        ),
        quote.releasable,
    )?;

    ctx.accounts.custody.reload()?;
    let custody_after = ctx.accounts.custody.amount;
    require!(
        custody_before.checked_sub(quote.releasable) == Some(custody_after),
        VestingError::ConservationViolation
    );

    let released_total = schedule.terms().released(custody_after);
    emit!(TokensUnlocked {
        vesting: vesting_key,
        beneficiary: schedule.beneficiary,
        amount: quote.releasable,
        periods_elapsed: quote.periods_elapsed,
        released_total,
        remaining: custody_after,
        timestamp: now,
    });

    msg!(
        "[vesting] unlock vesting={} amount={} released_total={}",
        vesting_key,
        quote.releasable,
        released_total
    );
    Ok(())
}

#[event]
pub struct TokensUnlocked {
    pub vesting: Pubkey,
    pub beneficiary: Pubkey,
    pub amount: u64,
    pub periods_elapsed: u64,
    pub released_total: u64,
    pub remaining: u64,
    pub timestamp: i64,
}
