use alloy_primitives::U256;
use rust_decimal::Decimal;

/// Scales a raw token amount by `decimals` for display. Fractional digits that
/// do not fit a `Decimal` are truncated, integer parts that do not fit
/// saturate to `Decimal::MAX`.
pub fn u256_to_decimal(value: U256, decimals: u8) -> Decimal {
    let digits = value.to_string();
    let decimals = decimals as usize;

    let (int_part, mut frac_part) = if digits.len() > decimals {
        let (int_part, frac_part) = digits.split_at(digits.len() - decimals);
        (int_part.to_string(), frac_part.to_string())
    } else {
        ("0".to_string(), format!("{:0>width$}", digits, width = decimals))
    };

    loop {
        let value_str = if frac_part.is_empty() {
            int_part.clone()
        } else {
            format!("{}.{}", int_part, frac_part)
        };

        match Decimal::from_str_exact(&value_str) {
            Ok(value) => return value.normalize(),
            Err(_) if !frac_part.is_empty() => {
                frac_part.pop();
            }
            Err(_) => return Decimal::MAX,
        }
    }
}
