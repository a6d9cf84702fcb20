use anchor_lang::prelude::*;

/// Custom error codes for the token vesting program.
#[error_code]
pub enum VestingError {
    #[msg("Schedule store account already exists")]
    AccountAlreadyExists,

    #[msg("Custody authority does not match the derivation from the schedule store and bump")]
    AuthorityDerivationMismatch,

    #[msg("Deposit source balance is below the total vesting amount")]
    InsufficientSourceBalance,

    #[msg("Invalid schedule parameters")]
    InvalidScheduleParameters,

    #[msg("Schedule store not found or not owned by this program")]
    ScheduleNotFound,

    #[msg("Target account does not belong to the recorded beneficiary")]
    BeneficiaryMismatch,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Custody account does not match the schedule")]
    InvalidCustodyAccount,

    #[msg("Custody account must be empty before the initial deposit")]
    CustodyAccountNotEmpty,

    #[msg("Custody balance does not reconcile with the schedule")]
    ConservationViolation,
}
