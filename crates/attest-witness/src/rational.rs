//! Exact rational arithmetic

use std::cmp::Ordering;
use std::fmt;

/// Largest exponent applied exactly; larger powers go through `f64`
const MAX_EXACT_EXPONENT: u32 = 512;

/// A reduced fraction with a positive denominator
///
/// All operations are checked: `None` means the exact result does not fit in
/// 128 bits and the caller should fall back to floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    num: i128,
    den: i128,
}

impl Rational {
    /// Zero
    pub const ZERO: Rational = Rational { num: 0, den: 1 };

    /// One
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    /// Create a reduced fraction; `None` for a zero denominator
    ///
    /// # Examples
    ///
    /// ```
    /// use attest_witness::Rational;
    ///
    /// assert_eq!(Rational::new(6, -26), Rational::new(-3, 13));
    /// assert!(Rational::new(1, 0).is_none());
    /// ```
    pub fn new(num: i128, den: i128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let divisor = gcd(num.unsigned_abs(), den.unsigned_abs());
        let divisor = i128::try_from(divisor).ok()?;
        let (mut num, mut den) = (num / divisor, den / divisor);
        if den < 0 {
            num = num.checked_neg()?;
            den = den.checked_neg()?;
        }
        Some(Self { num, den })
    }

    /// An integer
    pub fn integer(value: i128) -> Self {
        Self { num: value, den: 1 }
    }

    /// Parse a plain decimal literal such as `12`, `0.200` or `5.33`
    pub fn from_decimal(text: &str) -> Option<Self> {
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (text, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }

        let digits = format!("{}{}", whole, fraction);
        let num: i128 = digits.parse().ok()?;
        let den = 10i128.checked_pow(u32::try_from(fraction.len()).ok()?)?;
        Self::new(num, den)
    }

    /// Numerator
    pub fn numer(&self) -> i128 {
        self.num
    }

    /// Denominator, always positive
    pub fn denom(&self) -> i128 {
        self.den
    }

    /// Whether the value is zero
    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Whether the value is an integer
    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    /// Nearest floating-point value
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Checked addition
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        let num = self
            .num
            .checked_mul(other.den)?
            .checked_add(other.num.checked_mul(self.den)?)?;
        Self::new(num, self.den.checked_mul(other.den)?)
    }

    /// Checked subtraction
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.checked_add(&other.checked_neg()?)
    }

    /// Checked multiplication
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        Self::new(
            self.num.checked_mul(other.num)?,
            self.den.checked_mul(other.den)?,
        )
    }

    /// Checked division; `None` also for a zero divisor
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        self.checked_mul(&other.recip()?)
    }

    /// Checked negation
    pub fn checked_neg(&self) -> Option<Self> {
        Some(Self {
            num: self.num.checked_neg()?,
            den: self.den,
        })
    }

    /// Reciprocal; `None` for zero
    pub fn recip(&self) -> Option<Self> {
        Self::new(self.den, self.num)
    }

    /// Absolute value
    pub fn checked_abs(&self) -> Option<Self> {
        Some(Self {
            num: self.num.checked_abs()?,
            den: self.den,
        })
    }

    /// Checked integer power; `None` for zero to a negative power
    pub fn checked_pow(&self, exponent: i128) -> Option<Self> {
        let magnitude = u32::try_from(exponent.unsigned_abs()).ok()?;
        if magnitude > MAX_EXACT_EXPONENT {
            return None;
        }
        let raised = Self::new(
            self.num.checked_pow(magnitude)?,
            self.den.checked_pow(magnitude)?,
        )?;
        if exponent < 0 {
            raised.recip()
        } else {
            Some(raised)
        }
    }

    /// Exact square root when numerator and denominator are perfect squares
    pub fn checked_sqrt(&self) -> Option<Self> {
        if self.num < 0 {
            return None;
        }
        Self::new(isqrt_exact(self.num)?, isqrt_exact(self.den)?)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        if let (Some(left), Some(right)) =
            (self.num.checked_mul(other.den), other.num.checked_mul(self.den))
        {
            return left.cmp(&right);
        }
        let sign = self.num.signum().cmp(&other.num.signum());
        if sign != Ordering::Equal {
            return sign;
        }
        let magnitude = compare_fractions(
            self.num.unsigned_abs(),
            self.den.unsigned_abs(),
            other.num.unsigned_abs(),
            other.den.unsigned_abs(),
        );
        if self.num < 0 {
            magnitude.reverse()
        } else {
            magnitude
        }
    }
}

/// Compare `a/b` with `c/d` through their continued-fraction expansions,
/// which never needs more than 128 bits
fn compare_fractions(mut a: u128, mut b: u128, mut c: u128, mut d: u128) -> Ordering {
    loop {
        let (p, q) = (a / b, c / d);
        if p != q {
            return p.cmp(&q);
        }
        let (r, s) = (a % b, c % d);
        match (r == 0, s == 0) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }
        // r/b against s/d orders the same as d/s against b/r
        (a, b, c, d) = (d, s, b, r);
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

fn isqrt_exact(value: i128) -> Option<i128> {
    let root = (value as f64).sqrt().round() as i128;
    (root.saturating_sub(1)..=root.saturating_add(1))
        .find(|r| *r >= 0 && r.checked_mul(*r) == Some(value))
}
