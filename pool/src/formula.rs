//! Constant-product swap sizing.

use crate::error::SwapError;

/// Amount of the output asset paid for `amount_in` of the input asset:
/// `floor(reserve_out * amount_in / (reserve_in + amount_in))`, exact in `u128`.
///
/// All arguments must be positive. A swap that buys nothing is an error.
pub fn payout_for_input(reserve_out: u64, reserve_in: u64, amount_in: u64) -> Result<u64, SwapError> {
    let invalid = || SwapError::InvalidSwap { reserve_out, reserve_in, amount_in };
    if reserve_out == 0 || reserve_in == 0 || amount_in == 0 {
        return Err(invalid());
    }

    let numerator = reserve_out as u128 * amount_in as u128;
    let denominator = reserve_in as u128 + amount_in as u128;
    // Bounded by reserve_out since amount_in / (reserve_in + amount_in) < 1
    let payout = (numerator / denominator) as u64;
    if payout == 0 {
        return Err(invalid());
    }
    Ok(payout)
}

/// Units of the output asset one unit of input buys at the current reserves, rounded down.
pub fn spot_rate(reserve_out: u64, reserve_in: u64) -> u64 {
    payout_for_input(reserve_out, reserve_in, 1).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_payout_for_input() {
        struct Test {
            name: &'static str,
            reserve_out: u64,
            reserve_in: u64,
            amount_in: u64,
            expected: Option<u64>,
        }

        let tests = vec![
            Test {
                name: "first trade of the reference run",
                reserve_out: 200_000_000,
                reserve_in: 100_000_000,
                amount_in: 6,
                expected: Some(11),
            },
            Test { name: "balanced pool", reserve_out: 1_000, reserve_in: 1_000, amount_in: 1_000, expected: Some(500) },
            Test { name: "rounds down", reserve_out: 10, reserve_in: 3, amount_in: 1, expected: Some(2) },
            Test { name: "dust input", reserve_out: 100, reserve_in: 1_000, amount_in: 1, expected: None },
            Test { name: "zero input", reserve_out: 100, reserve_in: 100, amount_in: 0, expected: None },
            Test { name: "empty out reserve", reserve_out: 0, reserve_in: 100, amount_in: 10, expected: None },
            Test { name: "empty in reserve", reserve_out: 100, reserve_in: 0, amount_in: 10, expected: None },
            Test {
                name: "maximal values",
                reserve_out: u64::MAX,
                reserve_in: u64::MAX,
                amount_in: u64::MAX,
                expected: Some(u64::MAX / 2),
            },
        ];

        for test in tests {
            let result = payout_for_input(test.reserve_out, test.reserve_in, test.amount_in).ok();
            assert_eq!(result, test.expected, "{}: wrong payout", test.name);
        }
    }

    #[test]
    fn test_dust_input_is_invalid_swap() {
        assert_eq!(
            payout_for_input(100, 1_000, 1),
            Err(SwapError::InvalidSwap { reserve_out: 100, reserve_in: 1_000, amount_in: 1 })
        );
    }

    #[test]
    fn test_spot_rate() {
        assert_eq!(spot_rate(200_000_000, 100_000_000), 1);
        assert_eq!(spot_rate(200_000_010, 99_999_990), 2);
        assert_eq!(spot_rate(100, 1_000), 0);
    }

    proptest! {
        #[test]
        fn payout_is_below_reserve_out(reserve_out in 1u64.., reserve_in in 1u64.., amount_in in 1u64..) {
            if let Ok(payout) = payout_for_input(reserve_out, reserve_in, amount_in) {
                prop_assert!(payout > 0);
                prop_assert!(payout < reserve_out);
            }
        }

        #[test]
        fn payout_is_monotone_in_amount_in(
            reserve_out in 1u64..=u64::MAX / 2,
            reserve_in in 1u64..=u64::MAX / 2,
            a in 1u64..1u64 << 40,
            delta in 0u64..1u64 << 40,
        ) {
            let smaller = payout_for_input(reserve_out, reserve_in, a).unwrap_or(0);
            let larger = payout_for_input(reserve_out, reserve_in, a + delta).unwrap_or(0);
            prop_assert!(smaller <= larger);
        }

        #[test]
        fn payout_keeps_the_product(reserve_out in 1u64..1u64 << 32, reserve_in in 1u64..1u64 << 32, amount_in in 1u64..1u64 << 32) {
            if let Ok(payout) = payout_for_input(reserve_out, reserve_in, amount_in) {
                let before = reserve_out as u128 * reserve_in as u128;
                let after = (reserve_out - payout) as u128 * (reserve_in + amount_in) as u128;
                prop_assert!(after >= before);
            }
        }
    }
}
