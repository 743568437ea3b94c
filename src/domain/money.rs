//! Conversions between API amounts and the integer cents the store keeps.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn to_cents(amount: Decimal) -> Result<i64, String> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(format!("{} is not a valid price.", amount));
    }
    if amount.round_dp(2) != amount {
        return Err(format!("{} has more than two decimal places.", amount));
    }
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| format!("{} is out of range.", amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_ok_eq};
    use std::str::FromStr;

    #[test]
    fn cents_round_trip_keeps_two_places() {
        assert_eq!(from_cents(2500).to_string(), "25.00");
        assert_ok_eq!(to_cents(Decimal::from_str("10.5").unwrap()), 1050);
    }

    #[test]
    fn negative_and_fractional_cents_are_rejected() {
        assert_err!(to_cents(Decimal::from_str("-1.00").unwrap()));
        assert_err!(to_cents(Decimal::from_str("1.005").unwrap()));
    }

    #[test]
    fn amounts_beyond_cent_range_are_rejected() {
        assert_err!(to_cents(Decimal::MAX));
        assert_err!(to_cents(Decimal::from(i64::MAX)));
    }
}
