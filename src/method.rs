//! Per-byte corruption rules and the selector deciding which rule hits which offset.

use clap::ValueEnum;
use core::fmt;

use crate::error::{CorruptError, Result};
use crate::rng::RandomSource;

/// A pure transformation of a single byte.
///
/// `FlipBit` and `Randomize` consume randomness, `Increment` and `Decrement` do not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum CorruptionMethod {
    /// xor with one uniformly chosen bit
    #[value(name = "flip_bit")]
    FlipBit,
    /// add one, wrapping 0xff to 0x00
    #[value(name = "increment")]
    Increment,
    /// subtract one, wrapping 0x00 to 0xff
    #[value(name = "decrement")]
    Decrement,
    /// replace with a uniformly chosen byte
    #[value(name = "randomize")]
    Randomize,
}

impl CorruptionMethod {
    pub const fn name(self) -> &'static str {
        match self {
            Self::FlipBit => "flip_bit",
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::Randomize => "randomize",
        }
    }

    pub fn apply<R: RandomSource + ?Sized>(self, byte: u8, rng: &mut R) -> u8 {
        match self {
            Self::FlipBit => byte ^ (1 << rng.below(8)),
            Self::Increment => byte.wrapping_add(1),
            Self::Decrement => byte.wrapping_sub(1),
            Self::Randomize => rng.next_u8(),
        }
    }
}

impl fmt::Display for CorruptionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Picks the rule applied at a given absolute offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleSelector {
    /// The same rule everywhere.
    Fixed(CorruptionMethod),
    /// Rules cycled by `offset % pattern.len()`. Never empty.
    Cyclic(Vec<CorruptionMethod>),
}

impl RuleSelector {
    /// A non-empty `pattern` overrides `method` entirely.
    pub fn from_args(method: CorruptionMethod, pattern: Vec<CorruptionMethod>) -> Self {
        if pattern.is_empty() {
            Self::Fixed(method)
        } else {
            Self::Cyclic(pattern)
        }
    }

    /// Rejects a cyclic selector with nothing to cycle through.
    pub fn check(&self) -> Result<()> {
        match self {
            Self::Cyclic(pattern) if pattern.is_empty() => Err(CorruptError::InvalidArgument(
                "corruption pattern must not be empty".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Only meaningful after [`check`](RuleSelector::check) passed.
    pub fn method_for(&self, offset: u64) -> CorruptionMethod {
        match self {
            Self::Fixed(method) => *method,
            Self::Cyclic(pattern) => pattern[(offset % pattern.len() as u64) as usize],
        }
    }
}

impl fmt::Display for RuleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(method) => write!(f, "{}", method),
            Self::Cyclic(pattern) => {
                let names: Vec<&str> = pattern.iter().map(|m| m.name()).collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;

    /// Replays a fixed list of outputs, wrapping around.
    struct Script(Vec<u64>, usize);

    impl RandomSource for Script {
        fn next_u64(&mut self) -> u64 {
            let v = self.0[self.1 % self.0.len()];
            self.1 += 1;
            v
        }
    }

    #[test]
    fn parses_and_prints_method_names() {
        for &method in CorruptionMethod::value_variants() {
            assert_eq!(CorruptionMethod::from_str(&method.to_string(), false).unwrap(), method);
        }
        assert!(CorruptionMethod::from_str("shuffle", false).is_err());
        assert!(CorruptionMethod::from_str("flip-bit", false).is_err());
    }

    #[test]
    fn increment_and_decrement_wrap_and_undo_each_other() {
        let mut rng = SeededRng::new(1);
        assert_eq!(CorruptionMethod::Increment.apply(0xff, &mut rng), 0x00);
        assert_eq!(CorruptionMethod::Decrement.apply(0x00, &mut rng), 0xff);
        for b in 0..=u8::MAX {
            let up = CorruptionMethod::Increment.apply(b, &mut rng);
            assert_eq!(CorruptionMethod::Decrement.apply(up, &mut rng), b);
            let down = CorruptionMethod::Decrement.apply(b, &mut rng);
            assert_eq!(CorruptionMethod::Increment.apply(down, &mut rng), b);
        }
    }

    #[test]
    fn flip_bit_flips_exactly_one_bit_and_is_an_involution() {
        for bit in 0..8u64 {
            let mut rng = Script(vec![bit], 0);
            for b in 0..=u8::MAX {
                let flipped = CorruptionMethod::FlipBit.apply(b, &mut rng);
                assert_eq!((flipped ^ b).count_ones(), 1);
                assert_eq!(flipped ^ b, 1 << bit);
                assert_eq!(CorruptionMethod::FlipBit.apply(flipped, &mut rng), b);
            }
        }
    }

    #[test]
    fn randomize_ignores_input() {
        let mut rng = Script(vec![0x1234_5678_9abc_de42], 0);
        assert_eq!(CorruptionMethod::Randomize.apply(0x00, &mut rng), 0x42);
        assert_eq!(CorruptionMethod::Randomize.apply(0xff, &mut rng), 0x42);
    }

    #[test]
    fn cyclic_selector_uses_absolute_offset() {
        let selector = RuleSelector::Cyclic(vec![CorruptionMethod::FlipBit, CorruptionMethod::Increment]);
        assert!(selector.check().is_ok());
        assert_eq!(selector.method_for(10), CorruptionMethod::FlipBit);
        assert_eq!(selector.method_for(11), CorruptionMethod::Increment);
        assert_eq!(selector.method_for(12), CorruptionMethod::FlipBit);
        assert_eq!(selector.method_for(13), CorruptionMethod::Increment);
    }

    #[test]
    fn empty_pattern_is_rejected_or_ignored() {
        assert!(matches!(
            RuleSelector::Cyclic(vec![]).check(),
            Err(CorruptError::InvalidArgument(_))
        ));
        assert!(RuleSelector::Fixed(CorruptionMethod::Increment).check().is_ok());
        assert_eq!(
            RuleSelector::from_args(CorruptionMethod::Randomize, vec![]),
            RuleSelector::Fixed(CorruptionMethod::Randomize)
        );
        assert_eq!(
            RuleSelector::from_args(CorruptionMethod::Randomize, vec![CorruptionMethod::Decrement]),
            RuleSelector::Cyclic(vec![CorruptionMethod::Decrement])
        );
    }
}
