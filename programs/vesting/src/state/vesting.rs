use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_lang::Discriminator;

use crate::constants::DISCRIMINATOR_LEN;
use crate::error::VestingError;
use crate::utils::schedule::ScheduleTerms;

/// Schedule store. Written once by `initialize`, read back by every later call
/// and by off-chain indexers; the field order is the on-chain layout.
#[account(zero_copy)]
#[derive(Debug, PartialEq, Eq)]
pub struct Vesting {
    /// Token mint held in custody.
    pub mint: Pubkey,
    /// Wallet that must own the token account unlocked funds are paid into.
    pub beneficiary: Pubkey,
    /// Custody token account (associated token account of the custody authority).
    pub custody: Pubkey,
    /// Schedule origin (Unix seconds, UTC).
    pub start_time: i64,
    /// Pool size deposited at initialization.
    pub total_amount: u64,
    /// Seconds per tranche.
    pub period_duration: u64,
    /// Tokens entitled per elapsed tranche.
    pub unit_amount: u64,
    /// Bump deriving the custody authority from this account's address.
    pub custody_authority_bump: u8,
    pub _padding: [u8; 7],
}

impl Vesting {
    pub const SIZE: usize =
        32 + // mint
        32 + // beneficiary
        32 + // custody
        8 +  // start_time
        8 +  // total_amount
        8 +  // period_duration
        8 +  // unit_amount
        1 +  // custody_authority_bump
        7;   // _padding

    pub const SPACE: usize = DISCRIMINATOR_LEN + Self::SIZE;

    pub fn terms(&self) -> ScheduleTerms {
        ScheduleTerms {
            start_time: self.start_time,
            total_amount: self.total_amount,
            period_duration: self.period_duration,
            unit_amount: self.unit_amount,
        }
    }

    /// Decode raw account data (discriminator included). Alignment-free, so it
    /// also works on buffers fetched over RPC.
    pub fn try_from_data(data: &[u8]) -> std::result::Result<Self, VestingError> {
        if data.len() < Self::SPACE || !data.starts_with(Self::DISCRIMINATOR) {
            return Err(VestingError::ScheduleNotFound);
        }
        Ok(bytemuck::pod_read_unaligned(
            &data[DISCRIMINATOR_LEN..Self::SPACE],
        ))
    }

    pub fn write_to(&self, data: &mut [u8]) -> std::result::Result<(), VestingError> {
        if data.len() < Self::SPACE {
            return Err(VestingError::ScheduleNotFound);
        }
        data[..DISCRIMINATOR_LEN].copy_from_slice(Self::DISCRIMINATOR);
        data[DISCRIMINATOR_LEN..Self::SPACE].copy_from_slice(bytemuck::bytes_of(self));
        Ok(())
    }

    /// A schedule store identity may only be used once: it must still be a
    /// system-owned account without data. Lamports sent to the address ahead of
    /// time do not count as use.
    pub fn ensure_uninitialized(
        owner: &Pubkey,
        data: &[u8],
    ) -> std::result::Result<(), VestingError> {
        if *owner != system_program::ID || !data.is_empty() {
            return Err(VestingError::AccountAlreadyExists);
        }
        Ok(())
    }

    /// Decode a schedule store only if this program owns it.
    pub fn load_from(
        owner: &Pubkey,
        data: &[u8],
        program_id: &Pubkey,
    ) -> std::result::Result<Self, VestingError> {
        if owner != program_id {
            return Err(VestingError::ScheduleNotFound);
        }
        Self::try_from_data(data)
    }

    /// Read a schedule store passed as an unchecked account.
    pub fn load_checked(info: &AccountInfo, program_id: &Pubkey) -> Result<Self> {
        let data = info.try_borrow_data()?;
        Ok(Self::load_from(info.owner, &data, program_id)?)
    }
}
