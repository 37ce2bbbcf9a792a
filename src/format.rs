//! Compact display of large amounts of money.

/// Short-scale names, one per power of 1000 starting at 10^6.
const SCALE_NAMES: [&str; 21] = [
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
    "sextillion",
    "septillion",
    "octillion",
    "nonillion",
    "decillion",
    "undecillion",
    "duodecillion",
    "tredecillion",
    "quattuordecillion",
    "quindecillion",
    "sexdecillion",
    "septendecillion",
    "octodecillion",
    "novemdecillion",
    "vigintillion",
    "unvigintillion",
];

/// Split `n` into a mantissa and a short-scale suffix.
///
/// Below one million the suffix is empty and `n` comes back unchanged.
/// Beyond the last named scale the largest name is used with a growing
/// mantissa. Non-finite values pass through with no suffix.
pub fn scale(n: f64) -> (f64, &'static str) {
    if !n.is_finite() || n.abs() < 1e6 {
        return (n, "");
    }
    let exponent = n.abs().log10().floor() as usize;
    let index = ((exponent - 6) / 3).min(SCALE_NAMES.len() - 1);
    let divisor = 10f64.powi((6 + index * 3) as i32);
    let mut mantissa = n / divisor;
    // log10 can land one ulp short of an exact power of ten.
    if mantissa.abs() >= 1000.0 && index + 1 < SCALE_NAMES.len() {
        mantissa /= 1000.0;
        return (mantissa, SCALE_NAMES[index + 1]);
    }
    (mantissa, SCALE_NAMES[index])
}

/// Format a number with comma separators.
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    if !n.is_finite() {
        return n.to_string();
    }
    let int_part = n.floor() as u64;
    let frac = n - int_part as f64;

    let s = int_part.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let result: String = result.chars().rev().collect();

    if frac > 0.05 && frac < 0.95 {
        format!("{}.{}", result, ((frac * 10.0).round() as u8))
    } else {
        result
    }
}

/// `$12,345` below a million, `$1.235 million` above.
pub fn format_money(n: f64) -> String {
    let sign = if n < 0.0 { "-" } else { "" };
    match scale(n.abs()) {
        (m, "") => format!("{}${}", sign, format_number(m.floor())),
        (m, suffix) => format!("{}${:.3} {}", sign, m, suffix),
    }
}
