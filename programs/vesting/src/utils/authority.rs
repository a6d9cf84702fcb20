//! Custody authority derivation.
//! The authority is the program address of `[schedule_store, bump]` under this
//! program id. No private key exists for it; the program signs for it by
//! presenting the same seeds to the runtime.

use anchor_lang::prelude::Pubkey;

use crate::error::VestingError;

/// Canonical custody authority and bump for a schedule store. Off-chain helper
/// for building `initialize`.
pub fn find_custody_authority(schedule: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[schedule.as_ref()], program_id)
}

pub fn custody_authority_seeds<'a>(schedule: &'a Pubkey, bump: &'a [u8; 1]) -> [&'a [u8]; 2] {
    [schedule.as_ref(), bump]
}

/// Recompute the custody authority from an explicit bump.
pub fn derive_custody_authority(
    schedule: &Pubkey,
    bump: u8,
    program_id: &Pubkey,
) -> Result<Pubkey, VestingError> {
    let bump = [bump];
    Pubkey::create_program_address(&custody_authority_seeds(schedule, &bump), program_id)
        .map_err(|_| VestingError::AuthorityDerivationMismatch)
}

/// Recompute and compare against the authority the caller passed in.
pub fn verify_custody_authority(
    schedule: &Pubkey,
    bump: u8,
    provided: &Pubkey,
    program_id: &Pubkey,
) -> Result<Pubkey, VestingError> {
    let expected = derive_custody_authority(schedule, bump, program_id)?;
    if expected != *provided {
        return Err(VestingError::AuthorityDerivationMismatch);
    }
    Ok(expected)
}

/// Associated token account of `authority` for `mint`.
pub fn custody_address(authority: &Pubkey, mint: &Pubkey) -> Pubkey {
    let seeds: &[&[u8]] = &[
        authority.as_ref(),
        anchor_spl::token::ID.as_ref(),
        mint.as_ref(),
    ];
    let (ata, _) = Pubkey::find_program_address(seeds, &anchor_spl::associated_token::ID);
    ata
}
