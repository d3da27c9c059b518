use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// A life-like rule over the Moore neighborhood.
///
/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// b0s0:                 0000_0000_0000_0000_0000_0000_0000_0000
/// b012345678s012345678: 0000_0001_1111_1111_0000_0001_1111_1111
/// ```
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and
    /// `s`, numbers are set on a bit basis. For instance if bit `i` in `b` is on, it
    /// means `i` is included in the set of births. Any bit past the 8th is ignored.
    ///
    /// Big endian is used here (i.e. `b = 0b1` means b0, and `b = 0b1_0000_0000` means b8).
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// State of a cell in the next generation given its current state and its number of live
    /// neighbors.
    #[inline]
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        let mask = 1u16 << neighbors.min(8);

        if alive {
            self.survivals() & mask != 0
        } else {
            self.births() & mask != 0
        }
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |mask: u16| -> String {
            (0..=8)
                .filter(|n| mask & (1 << n) != 0)
                .map(|n| char::from(b'0' + n as u8))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Empty rule string")]
    Empty,

    #[error("Neighbor count must be between 0 and 8, found '{got}'")]
    CountOutOfRange { got: char },

    #[error("Unexpected character '{got}' in rule string")]
    InvalidChar { got: char },

    #[error("Too many sections in rule string")]
    DuplicateSection,
}

/// Parses `B3/S23`, `b3s23` and the nameless `23/3` form, which lists survivals first.
impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(RuleError::Empty);
        }

        let first = s.chars().next();

        if !matches!(first, Some('b' | 'B' | 's' | 'S')) {
            return parse_nameless(s);
        }

        enum State {
            Birth,
            Survival,
        }

        let mut state = State::Birth;
        let (mut b, mut s_mask) = (0u16, 0u16);

        for c in s.chars() {
            match c {
                'b' | 'B' => state = State::Birth,
                's' | 'S' => state = State::Survival,
                '/' => {}
                n => {
                    let n = to_count(n)?;

                    match state {
                        State::Birth => b |= 1 << n,
                        State::Survival => s_mask |= 1 << n,
                    }
                }
            }
        }

        Ok(RuleSet::new(b, s_mask))
    }
}

// Parse rules that look like 23/3 (survivals, then births).
fn parse_nameless(s: &str) -> Result<RuleSet, RuleError> {
    let mut parts = s.split('/');
    let survivals = parts.next().unwrap_or_default();
    let births = parts.next().unwrap_or_default();

    if parts.next().is_some() {
        return Err(RuleError::DuplicateSection);
    }

    let to_mask = |digits: &str| -> Result<u16, RuleError> {
        digits
            .chars()
            .try_fold(0u16, |mask, c| Ok(mask | 1 << to_count(c)?))
    };

    Ok(RuleSet::new(to_mask(births)?, to_mask(survivals)?))
}

fn to_count(c: char) -> Result<u32, RuleError> {
    let Some(n) = c.to_digit(10) else {
        return Err(RuleError::InvalidChar { got: c });
    };

    if n > 8 {
        return Err(RuleError::CountOutOfRange { got: c });
    }

    Ok(n)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn conway_transitions() {
        for n in 0..=8 {
            assert_eq!(B3S23.next_state(true, n), n == 2 || n == 3, "survive {n}");
            assert_eq!(B3S23.next_state(false, n), n == 3, "birth {n}");
        }
    }

    #[test]
    fn parse_forms() {
        assert_eq!("B3/S23".parse::<RuleSet>(), Ok(B3S23));
        assert_eq!("b3s23".parse::<RuleSet>(), Ok(B3S23));
        assert_eq!("23/3".parse::<RuleSet>(), Ok(B3S23));

        let highlife: RuleSet = "B36/S23".parse().unwrap();
        assert_eq!(highlife.births(), 0b100_1000);
        assert_eq!(highlife.survivals(), 0b1100);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<RuleSet>(), Err(RuleError::Empty));
        assert_eq!(
            "B9/S23".parse::<RuleSet>(),
            Err(RuleError::CountOutOfRange { got: '9' })
        );
        assert_eq!(
            "B3/S2x".parse::<RuleSet>(),
            Err(RuleError::InvalidChar { got: 'x' })
        );
        assert_eq!(
            "23/3/1".parse::<RuleSet>(),
            Err(RuleError::DuplicateSection)
        );
        assert_eq!(
            RuleError::DuplicateSection.to_string(),
            "Too many sections in rule string"
        );
    }

    #[test]
    fn display() {
        assert_eq!(B3S23.to_string(), "B3/S23");
        assert_eq!(RuleSet::new(0, 0).to_string(), "B/S");
    }
}
