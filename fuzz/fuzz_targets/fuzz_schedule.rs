#![no_main]

use libfuzzer_sys::fuzz_target;
use token_vesting::utils::schedule::ScheduleTerms;

fuzz_target!(|data: &[u8]| {
    if data.len() < 32 {
        return;
    }

    let word = |i: usize| u64::from_le_bytes(data[i * 8..i * 8 + 8].try_into().unwrap_or([0; 8]));
    let terms = ScheduleTerms {
        start_time: (word(0) >> 1) as i64,
        total_amount: word(1),
        period_duration: word(2),
        unit_amount: word(3),
    };
    if terms.validate().is_err() {
        return;
    }

    // Remaining bytes drive the clock: each pair is a forward step (0 = duplicate call).
    let mut now = terms.start_time.saturating_sub(1);
    let mut custody = terms.total_amount;
    let mut received: u64 = 0;
    let stride = i64::try_from(terms.period_duration / 64).unwrap_or(i64::MAX).max(1);
    for step in data[32..].chunks(2) {
        let delta = step.iter().fold(0i64, |acc, b| (acc << 8) | *b as i64);
        now = now.saturating_add(delta.saturating_mul(stride));

        let e = terms.entitlement(now, custody).expect("validated terms");
        assert!(e.entitled <= terms.total_amount);
        assert!(e.releasable <= custody);

        custody -= e.releasable;
        let next = received + e.releasable;
        assert!(next >= received);
        received = next;

        assert_eq!(custody + received, terms.total_amount);
        assert_eq!(received, e.entitled);
        assert_eq!(terms.entitlement(now, custody).expect("validated terms").releasable, 0);
    }
});
