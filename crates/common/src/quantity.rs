//! Fixed-precision quantity, unit of measure, and money types.

use serde::{Deserialize, Serialize};

/// A stock quantity stored as thousandths to avoid floating point drift.
///
/// All quantity arithmetic in the core happens on this fixed-point
/// representation; the unit of measure decides how many of the three
/// decimal places a given item may actually use (see [`Unit::accepts`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from whole units (e.g. 3 pieces).
    pub fn from_whole(units: i64) -> Self {
        Self(units * 1_000)
    }

    /// Creates a quantity from thousandths of a unit (e.g. 2500 = 2.5 kg).
    pub fn from_thousandths(thousandths: i64) -> Self {
        Self(thousandths)
    }

    /// Returns zero quantity.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Returns the raw value in thousandths.
    pub fn thousandths(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    pub fn whole_part(&self) -> i64 {
        self.0 / 1_000
    }

    /// Returns true if the quantity is greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Returns true if the quantity is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the quantity is less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl std::ops::Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Self) -> Self::Output {
        Quantity(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Self) -> Self::Output {
        Quantity(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl std::iter::Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), |acc, q| acc + q)
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / 1_000;
        let frac = abs % 1_000;
        if frac == 0 {
            write!(f, "{sign}{whole}")
        } else {
            let s = format!("{frac:03}");
            write!(f, "{sign}{whole}.{}", s.trim_end_matches('0'))
        }
    }
}

/// Unit of measure for a catalog item.
///
/// Each unit fixes how many decimal places a quantity may carry: pieces
/// are counted whole, while mass, length, and volume allow one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Discrete count (fittings, capacitors, filters).
    Piece,
    /// Mass in kilograms (refrigerant, solder).
    Kilogram,
    /// Length in meters (pipe, cable, duct tape).
    Meter,
    /// Volume in liters (oil, cleaning agent).
    Liter,
}

impl Unit {
    /// Returns the number of decimal places quantities of this unit may use.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Unit::Piece => 0,
            Unit::Kilogram | Unit::Meter | Unit::Liter => 1,
        }
    }

    /// Returns the smallest representable step in thousandths.
    pub fn step_thousandths(&self) -> i64 {
        10_i64.pow(3 - self.decimal_places())
    }

    /// Returns true if the quantity conforms to this unit's precision.
    pub fn accepts(&self, quantity: Quantity) -> bool {
        quantity.thousandths() % self.step_thousandths() == 0
    }

    /// Returns the unit symbol as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Piece => "pc",
            Unit::Kilogram => "kg",
            Unit::Meter => "m",
            Unit::Liter => "l",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Money amount represented in cents to avoid floating point issues.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Returns true if the amount is less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}
