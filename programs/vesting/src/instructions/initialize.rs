use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount};
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, Mint, Token, TokenAccount, Transfer},
};

use crate::error::VestingError;
use crate::state::Vesting;
use crate::utils::checks::{InitializeCheck, TokenAccountView};
use crate::utils::schedule::ScheduleTerms;

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Fresh keypair account; allocated in-handler so reuse surfaces as a typed error.
    #[account(mut)]
    pub vesting: Signer<'info>,

    pub mint: Box<Account<'info, Mint>>,

    #[account(mut)]
    pub deposit_from: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: keyless PDA; re-derived from `custody_authority_bump` in-handler.
    pub custody_authority: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = mint,
        associated_token::authority = custody_authority,
    )]
    pub custody: Box<Account<'info, TokenAccount>>,

    /// CHECK: only the key is recorded; unlock pays into token accounts it owns.
    pub beneficiary: UncheckedAccount<'info>,

    pub depositor: Signer<'info>,

    pub rent: Sysvar<'info, Rent>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<Initialize>,
    custody_authority_bump: u8,
    start_time: i64,
    total_amount: u64,
    period_duration: u64,
    unit_amount: u64,
) -> Result<()> {
    let vesting_ai = ctx.accounts.vesting.to_account_info();
    let vesting_key = vesting_ai.key();
    let beneficiary = ctx.accounts.beneficiary.key();
    let terms = ScheduleTerms {
        start_time,
        total_amount,
        period_duration,
        unit_amount,
    };
    let custody_authority = InitializeCheck {
        program_id: ctx.program_id,
        schedule: &vesting_key,
        schedule_owner: vesting_ai.owner,
        schedule_data: &vesting_ai.try_borrow_data()?,
        custody_authority_bump,
        custody_authority: &ctx.accounts.custody_authority.key(),
        mint: &ctx.accounts.mint.key(),
        beneficiary: &beneficiary,
        depositor: &ctx.accounts.depositor.key(),
        deposit_from: TokenAccountView::of(
            ctx.accounts.deposit_from.key(),
            &ctx.accounts.deposit_from,
        ),
        custody: TokenAccountView::of(ctx.accounts.custody.key(), &ctx.accounts.custody),
        terms,
    }
    .run()?;

    allocate_schedule_store(ctx.accounts, &vesting_ai, ctx.program_id)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.deposit_from.to_account_info(),
                to: ctx.accounts.custody.to_account_info(),
                authority: ctx.accounts.depositor.to_account_info(),
            },
        ),
        total_amount,
    )?;

    ctx.accounts.custody.reload()?;
    require!(
        ctx.accounts.custody.amount == total_amount,
        VestingError::ConservationViolation
    );

    let schedule = Vesting {
        mint: ctx.accounts.mint.key(),
        beneficiary,
        custody: ctx.accounts.custody.key(),
        start_time,
        total_amount,
        period_duration,
        unit_amount,
        custody_authority_bump,
        _padding: [0u8; 7],
    };
    schedule.write_to(&mut vesting_ai.try_borrow_mut_data()?)?;

    emit!(VestingInitialized {
        vesting: vesting_key,
        mint: schedule.mint,
        beneficiary,
        custody: schedule.custody,
        custody_authority,
        start_time,
        total_amount,
        period_duration,
        unit_amount,
    });

    msg!(
        "[vesting] initialized vesting={} total={} unit={} period={}s start={}",
        vesting_key,
        total_amount,
        unit_amount,
        period_duration,
        start_time
    );
    Ok(())
}

/// Create the schedule store at its keypair address. An address that already
/// received lamports is topped up to rent exemption, then allocated and assigned.
fn allocate_schedule_store<'info>(
    accounts: &Initialize<'info>,
    vesting_ai: &AccountInfo<'info>,
    program_id: &Pubkey,
) -> Result<()> {
    let required = accounts.rent.minimum_balance(Vesting::SPACE);
    let system_program = accounts.system_program.to_account_info();
    let current = vesting_ai.lamports();

    if current == 0 {
        return system_program::create_account(
            CpiContext::new(
                system_program,
                CreateAccount {
                    from: accounts.payer.to_account_info(),
                    to: vesting_ai.clone(),
                },
            ),
            required,
            Vesting::SPACE as u64,
            program_id,
        );
    }

    let top_up = required.saturating_sub(current);
    if top_up > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program.clone(),
                system_program::Transfer {
                    from: accounts.payer.to_account_info(),
                    to: vesting_ai.clone(),
                },
            ),
            top_up,
        )?;
    }
    system_program::allocate(
        CpiContext::new(
            system_program.clone(),
            Allocate {
                account_to_allocate: vesting_ai.clone(),
            },
        ),
        Vesting::SPACE as u64,
    )?;
    system_program::assign(
        CpiContext::new(
            system_program,
            Assign {
                account_to_assign: vesting_ai.clone(),
            },
        ),
        program_id,
    )
}

#[event]
pub struct VestingInitialized {
    pub vesting: Pubkey,
    pub mint: Pubkey,
    pub beneficiary: Pubkey,
    pub custody: Pubkey,
    pub custody_authority: Pubkey,
    pub start_time: i64,
    pub total_amount: u64,
    pub period_duration: u64,
    pub unit_amount: u64,
}
