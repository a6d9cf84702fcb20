//! Period-based vesting arithmetic.
//! - periods_elapsed = floor((now - start) / period), zero strictly before start
//! - entitled = min(periods_elapsed * unit, total); an overflowing product counts as total
//! - released = total - custody balance (derived, never stored)
//! - releasable = entitled - released, saturating at zero and bounded by the custody balance

use crate::error::VestingError;

/// Immutable schedule parameters fixed at initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleTerms {
    pub start_time: i64,
    pub total_amount: u64,
    pub period_duration: u64,
    pub unit_amount: u64,
}

/// Breakdown of a schedule observed at one instant against one custody balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Entitlement {
    pub periods_elapsed: u64,
    pub entitled: u64,
    pub released: u64,
    pub releasable: u64,
}

impl ScheduleTerms {
    /// A start time already in the past is accepted: the tranches it covers
    /// unlock on the first call. Comparing against the clock here would race
    /// clients that pass their own "now".
    pub fn validate(&self) -> Result<(), VestingError> {
        if self.start_time < 0
            || self.total_amount == 0
            || self.period_duration == 0
            || self.unit_amount == 0
        {
            return Err(VestingError::InvalidScheduleParameters);
        }
        Ok(())
    }

    /// Number of whole periods between `start_time` and `now`, inclusive at boundaries.
    pub fn periods_elapsed(&self, now: i64) -> Result<u64, VestingError> {
        if self.period_duration == 0 {
            return Err(VestingError::InvalidScheduleParameters);
        }
        if now < self.start_time {
            return Ok(0);
        }
        Ok(now.abs_diff(self.start_time) / self.period_duration)
    }

    /// Cumulative amount owed to the beneficiary at `now`.
    pub fn entitled_at(&self, now: i64) -> Result<u64, VestingError> {
        let periods = self.periods_elapsed(now)?;
        Ok(self.capped(periods))
    }

    /// Amount already paid out, given the live custody balance.
    pub fn released(&self, custody_balance: u64) -> u64 {
        self.total_amount.saturating_sub(custody_balance)
    }

    pub fn entitlement(&self, now: i64, custody_balance: u64) -> Result<Entitlement, VestingError> {
        let periods_elapsed = self.periods_elapsed(now)?;
        let entitled = self.capped(periods_elapsed);
        let released = self.released(custody_balance);
        let releasable = entitled.saturating_sub(released).min(custody_balance);
        Ok(Entitlement {
            periods_elapsed,
            entitled,
            released,
            releasable,
        })
    }

    /// First instant at which the whole pool is entitled, or `None` if it lies
    /// beyond the representable timestamp range.
    pub fn fully_vested_at(&self) -> Option<i64> {
        if self.unit_amount == 0 {
            return None;
        }
        let periods = self.total_amount.div_ceil(self.unit_amount);
        let offset = periods.checked_mul(self.period_duration)?;
        self.start_time.checked_add_unsigned(offset)
    }

    fn capped(&self, periods: u64) -> u64 {
        periods
            .checked_mul(self.unit_amount)
            .map_or(self.total_amount, |v| v.min(self.total_amount))
    }
}
