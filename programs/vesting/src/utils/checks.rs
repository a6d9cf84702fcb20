//! Account relationship checks run by the instruction handlers.
//! Everything here works on keys and amounts only, so each rejection path can
//! be exercised without a runtime:
//! - initialize: fresh store, valid terms, derived authority, empty custody, funded source
//! - unlock: derived authority owns the recorded custody, target belongs to the beneficiary
//! - quote: recorded custody of the schedule mint

use anchor_lang::prelude::Pubkey;

use crate::error::VestingError;
use crate::state::Vesting;
use crate::utils::authority;
use crate::utils::schedule::ScheduleTerms;

/// The fields of an SPL token account the checks look at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAccountView {
    pub key: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

impl TokenAccountView {
    pub fn of(key: Pubkey, account: &anchor_spl::token::TokenAccount) -> Self {
        Self {
            key,
            owner: account.owner,
            mint: account.mint,
            amount: account.amount,
        }
    }
}

/// Inputs of `initialize` as seen before any state is written.
pub struct InitializeCheck<'a> {
    pub program_id: &'a Pubkey,
    pub schedule: &'a Pubkey,
    pub schedule_owner: &'a Pubkey,
    pub schedule_data: &'a [u8],
    pub custody_authority_bump: u8,
    pub custody_authority: &'a Pubkey,
    pub mint: &'a Pubkey,
    pub beneficiary: &'a Pubkey,
    pub depositor: &'a Pubkey,
    pub deposit_from: TokenAccountView,
    pub custody: TokenAccountView,
    pub terms: ScheduleTerms,
}

impl InitializeCheck<'_> {
    /// Returns the verified custody authority.
    pub fn run(&self) -> Result<Pubkey, VestingError> {
        Vesting::ensure_uninitialized(self.schedule_owner, self.schedule_data)?;
        self.terms.validate()?;
        if *self.beneficiary == Pubkey::default() {
            return Err(VestingError::InvalidScheduleParameters);
        }

        let custody_authority = authority::verify_custody_authority(
            self.schedule,
            self.custody_authority_bump,
            self.custody_authority,
            self.program_id,
        )?;
        if self.custody.owner != custody_authority {
            return Err(VestingError::AuthorityDerivationMismatch);
        }
        if self.custody.mint != *self.mint {
            return Err(VestingError::InvalidTokenMint);
        }
        // A pre-created custody account must not carry a balance.
        if self.custody.amount != 0 {
            return Err(VestingError::CustodyAccountNotEmpty);
        }

        if self.deposit_from.mint != *self.mint {
            return Err(VestingError::InvalidTokenMint);
        }
        if self.deposit_from.owner != *self.depositor {
            return Err(VestingError::InvalidTokenAccount);
        }
        if self.deposit_from.amount < self.terms.total_amount {
            return Err(VestingError::InsufficientSourceBalance);
        }
        Ok(custody_authority)
    }
}

/// Custody passed in must be the recorded one, holding the schedule mint.
pub fn check_custody(schedule: &Vesting, custody: &TokenAccountView) -> Result<(), VestingError> {
    if custody.key != schedule.custody {
        return Err(VestingError::InvalidCustodyAccount);
    }
    if custody.mint != schedule.mint {
        return Err(VestingError::InvalidTokenMint);
    }
    Ok(())
}

/// Returns the verified custody authority.
pub fn check_unlock(
    schedule: &Vesting,
    schedule_key: &Pubkey,
    provided_authority: &Pubkey,
    program_id: &Pubkey,
    custody: &TokenAccountView,
    target: &TokenAccountView,
) -> Result<Pubkey, VestingError> {
    let custody_authority = authority::verify_custody_authority(
        schedule_key,
        schedule.custody_authority_bump,
        provided_authority,
        program_id,
    )?;
    check_custody(schedule, custody)?;
    if custody.owner != custody_authority {
        return Err(VestingError::AuthorityDerivationMismatch);
    }
    if target.owner != schedule.beneficiary || target.mint != schedule.mint {
        return Err(VestingError::BeneficiaryMismatch);
    }
    Ok(custody_authority)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::system_program;

    const TOTAL: u64 = 3_000_000;

    struct Fixture {
        schedule_key: Pubkey,
        authority: Pubkey,
        bump: u8,
        mint: Pubkey,
        beneficiary: Pubkey,
        depositor: Pubkey,
        custody: TokenAccountView,
    }

    impl Fixture {
        fn new() -> Self {
            let schedule_key = Pubkey::new_unique();
            let (authority, bump) =
                authority::find_custody_authority(&schedule_key, &crate::ID);
            let mint = Pubkey::new_unique();
            Self {
                schedule_key,
                authority,
                bump,
                mint,
                beneficiary: Pubkey::new_unique(),
                depositor: Pubkey::new_unique(),
                custody: TokenAccountView {
                    key: authority::custody_address(&authority, &mint),
                    owner: authority,
                    mint,
                    amount: TOTAL,
                },
            }
        }

        fn schedule(&self) -> Vesting {
            Vesting {
                mint: self.mint,
                beneficiary: self.beneficiary,
                custody: self.custody.key,
                start_time: 1_700_000_000,
                total_amount: TOTAL,
                period_duration: 2,
                unit_amount: 1_000_000,
                custody_authority_bump: self.bump,
                _padding: [0u8; 7],
            }
        }

        fn target(&self) -> TokenAccountView {
            TokenAccountView {
                key: Pubkey::new_unique(),
                owner: self.beneficiary,
                mint: self.mint,
                amount: 0,
            }
        }

        fn unlock(
            &self,
            custody: &TokenAccountView,
            target: &TokenAccountView,
        ) -> Result<Pubkey, VestingError> {
            check_unlock(
                &self.schedule(),
                &self.schedule_key,
                &self.authority,
                &crate::ID,
                custody,
                target,
            )
        }

        fn initialize<'a>(
            &'a self,
            schedule_owner: &'a Pubkey,
            schedule_data: &'a [u8],
        ) -> InitializeCheck<'a> {
            InitializeCheck {
                program_id: &crate::ID,
                schedule: &self.schedule_key,
                schedule_owner,
                schedule_data,
                custody_authority_bump: self.bump,
                custody_authority: &self.authority,
                mint: &self.mint,
                beneficiary: &self.beneficiary,
                depositor: &self.depositor,
                deposit_from: TokenAccountView {
                    key: Pubkey::new_unique(),
                    owner: self.depositor,
                    mint: self.mint,
                    amount: TOTAL,
                },
                custody: TokenAccountView { amount: 0, ..self.custody },
                terms: self.schedule().terms(),
            }
        }
    }

    #[test]
    fn unlock_accepts_recorded_accounts() {
        let f = Fixture::new();
        assert_eq!(f.unlock(&f.custody, &f.target()).unwrap(), f.authority);
    }

    #[test]
    fn unlock_rejects_target_of_someone_else() {
        let f = Fixture::new();
        let target = TokenAccountView {
            owner: Pubkey::new_unique(),
            ..f.target()
        };
        assert!(matches!(
            f.unlock(&f.custody, &target),
            Err(VestingError::BeneficiaryMismatch)
        ));
    }

    #[test]
    fn unlock_rejects_target_of_other_mint() {
        let f = Fixture::new();
        let target = TokenAccountView {
            mint: Pubkey::new_unique(),
            ..f.target()
        };
        assert!(matches!(
            f.unlock(&f.custody, &target),
            Err(VestingError::BeneficiaryMismatch)
        ));
    }

    #[test]
    fn unlock_rejects_unrecorded_custody() {
        let f = Fixture::new();
        let custody = TokenAccountView {
            key: Pubkey::new_unique(),
            ..f.custody
        };
        assert!(matches!(
            f.unlock(&custody, &f.target()),
            Err(VestingError::InvalidCustodyAccount)
        ));
    }

    #[test]
    fn unlock_rejects_custody_not_owned_by_authority() {
        let f = Fixture::new();
        let custody = TokenAccountView {
            owner: Pubkey::new_unique(),
            ..f.custody
        };
        assert!(matches!(
            f.unlock(&custody, &f.target()),
            Err(VestingError::AuthorityDerivationMismatch)
        ));

        let impostor = Pubkey::new_unique();
        assert!(matches!(
            check_unlock(
                &f.schedule(),
                &f.schedule_key,
                &impostor,
                &crate::ID,
                &f.custody,
                &f.target()
            ),
            Err(VestingError::AuthorityDerivationMismatch)
        ));
    }

    #[test]
    fn custody_of_other_mint_is_rejected() {
        let f = Fixture::new();
        let custody = TokenAccountView {
            mint: Pubkey::new_unique(),
            ..f.custody
        };
        assert!(matches!(
            check_custody(&f.schedule(), &custody),
            Err(VestingError::InvalidTokenMint)
        ));
        assert!(check_custody(&f.schedule(), &f.custody).is_ok());
    }

    #[test]
    fn initialize_accepts_fresh_store() {
        let f = Fixture::new();
        assert_eq!(
            f.initialize(&system_program::ID, &[]).run().unwrap(),
            f.authority
        );
    }

    #[test]
    fn initialize_twice_is_rejected() {
        let f = Fixture::new();
        let mut data = vec![0u8; Vesting::SPACE];
        f.schedule().write_to(&mut data).unwrap();

        assert!(matches!(
            f.initialize(&crate::ID, &data).run(),
            Err(VestingError::AccountAlreadyExists)
        ));
    }

    #[test]
    fn initialize_rejects_wrong_bump() {
        let f = Fixture::new();
        let mut check = f.initialize(&system_program::ID, &[]);
        check.custody_authority_bump = f.bump.wrapping_sub(1);
        assert!(matches!(
            check.run(),
            Err(VestingError::AuthorityDerivationMismatch)
        ));
    }

    #[test]
    fn initialize_rejects_funded_custody() {
        let f = Fixture::new();
        let mut check = f.initialize(&system_program::ID, &[]);
        check.custody.amount = 1;
        assert!(matches!(
            check.run(),
            Err(VestingError::CustodyAccountNotEmpty)
        ));
    }

    #[test]
    fn initialize_rejects_short_source() {
        let f = Fixture::new();
        let mut check = f.initialize(&system_program::ID, &[]);
        check.deposit_from.amount = TOTAL - 1;
        assert!(matches!(
            check.run(),
            Err(VestingError::InsufficientSourceBalance)
        ));
    }

    #[test]
    fn initialize_rejects_foreign_source() {
        let f = Fixture::new();
        let mut check = f.initialize(&system_program::ID, &[]);
        check.deposit_from.mint = Pubkey::new_unique();
        assert!(matches!(check.run(), Err(VestingError::InvalidTokenMint)));

        let mut check = f.initialize(&system_program::ID, &[]);
        check.deposit_from.owner = Pubkey::new_unique();
        assert!(matches!(check.run(), Err(VestingError::InvalidTokenAccount)));
    }

    #[test]
    fn initialize_rejects_bad_terms_and_beneficiary() {
        let f = Fixture::new();
        let mut check = f.initialize(&system_program::ID, &[]);
        check.terms.period_duration = 0;
        assert!(matches!(
            check.run(),
            Err(VestingError::InvalidScheduleParameters)
        ));

        let nobody = Pubkey::default();
        let mut check = f.initialize(&system_program::ID, &[]);
        check.beneficiary = &nobody;
        assert!(matches!(
            check.run(),
            Err(VestingError::InvalidScheduleParameters)
        ));
    }
}
