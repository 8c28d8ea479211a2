use super::error::{Error, Result};
use rust_decimal::Decimal;
use serde::Serialize;

/// Decimal places kept for currency amounts
pub const CURRENCY_DP: u32 = 2;

/// Round to currency precision. `round_dp` is banker's rounding (half to even).
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp(CURRENCY_DP)
}

pub fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or(Error::AmountOverflow)
}

pub fn checked_sub(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_sub(b).ok_or(Error::AmountOverflow)
}

pub fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b).ok_or(Error::AmountOverflow)
}

/// Sum that fails with `AmountOverflow` instead of panicking
pub fn checked_sum<I>(amounts: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, checked_add)
}

pub fn validate_rate(rate: Decimal) -> Result<Decimal> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(Error::InvalidRate(rate));
    }
    Ok(rate)
}

/// An amount divided into its taxable base and the tax on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Split {
    pub base: Decimal,
    pub tax: Decimal,
}

impl Split {
    pub fn total(&self) -> Decimal {
        self.base + self.tax
    }
}

/// Tax on a known base.
pub fn split(base: Decimal, rate: Decimal) -> Result<Split> {
    let rate = validate_rate(rate)?;
    Ok(Split {
        base,
        tax: round_currency(checked_mul(base, rate)?),
    })
}

/// Separate a tax-inclusive amount. Tax takes the rounding remainder so that
/// `base + tax == gross` holds exactly.
pub fn split_inclusive(gross: Decimal, rate: Decimal) -> Result<Split> {
    let rate = validate_rate(rate)?;
    let base = round_currency(gross / (Decimal::ONE + rate));
    Ok(Split {
        base,
        tax: checked_sub(gross, base)?,
    })
}

pub fn format_amount(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn split_known_base() {
        let s = split(dec!(100.00), dec!(0.13)).unwrap();
        assert_eq!(s.base, dec!(100.00));
        assert_eq!(s.tax, dec!(13.00));
        assert_eq!(s.total(), dec!(113.00));
    }

    #[test]
    fn split_rounds_half_even() {
        // 0.125 -> 0.12, 0.135 -> 0.14
        assert_eq!(split(dec!(2.50), dec!(0.05)).unwrap().tax, dec!(0.12));
        assert_eq!(split(dec!(2.70), dec!(0.05)).unwrap().tax, dec!(0.14));
    }

    #[test]
    fn split_inclusive_sums_back() {
        let s = split_inclusive(dec!(113.00), dec!(0.13)).unwrap();
        assert_eq!(s.base, dec!(100.00));
        assert_eq!(s.tax, dec!(13.00));

        let s = split_inclusive(dec!(10.00), dec!(0.13)).unwrap();
        assert_eq!(s.base, dec!(8.85));
        assert_eq!(s.tax, dec!(1.15));
        assert_eq!(s.total(), dec!(10.00));
    }

    #[test]
    fn zero_rate_has_no_tax() {
        let s = split(dec!(42.17), Decimal::ZERO).unwrap();
        assert_eq!(s.tax, Decimal::ZERO);
        let s = split_inclusive(dec!(42.17), Decimal::ZERO).unwrap();
        assert_eq!(s.base, dec!(42.17));
        assert_eq!(s.tax, Decimal::ZERO);
    }

    #[test]
    fn rate_out_of_range() {
        assert_eq!(
            split(dec!(10), dec!(-0.01)),
            Err(Error::InvalidRate(dec!(-0.01)))
        );
        assert_eq!(
            split_inclusive(dec!(10), dec!(1.5)),
            Err(Error::InvalidRate(dec!(1.5)))
        );
        assert!(split(dec!(10), Decimal::ONE).is_ok());
    }

    #[test]
    fn overflow_is_an_error() {
        assert_eq!(checked_mul(Decimal::MAX, dec!(2)), Err(Error::AmountOverflow));
        assert_eq!(
            checked_sum([Decimal::MAX, Decimal::ONE]),
            Err(Error::AmountOverflow)
        );
        assert_eq!(checked_sum([dec!(1.10), dec!(2.20)]), Ok(dec!(3.30)));
        assert_eq!(checked_sum(Vec::new()), Ok(Decimal::ZERO));
    }

    #[test]
    fn format_signed_amounts() {
        assert_eq!(format_amount(dec!(1234.5)), "$1234.50");
        assert_eq!(format_amount(dec!(-12)), "-$12.00");
    }
}
