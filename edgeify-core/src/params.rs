/// Validated operation parameters.
///
/// - `Gamma`: finite exponent, `> 0`. Prompts additionally cap it at `MAX_GAMMA`.
/// - `KernelSize`: odd window side in `3..10` (3, 5, 7, 9).
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const MAX_GAMMA: f64 = 10.0;
pub const MIN_KERNEL_SIZE: usize = 3;
/// Exclusive upper bound on the window side.
pub const KERNEL_SIZE_LIMIT: usize = 10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("gamma must be a finite number greater than 0, got {0}")]
    InvalidGamma(f64),
    #[error("gamma must be in (0, 10], got {0}")]
    GammaOutOfRange(f64),
    #[error("kernel size must be odd and in [3, 10), got {0}")]
    InvalidKernelSize(usize),
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),
}

/// Exponent for the power-law transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gamma(f64);

impl Gamma {
    pub const IDENTITY: Gamma = Gamma(1.0);

    pub fn new(value: f64) -> Result<Self, ParamError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ParamError::InvalidGamma(value))
        }
    }

    /// Parse user input, accepting only `0 < gamma <= MAX_GAMMA`.
    pub fn parse(input: &str) -> Result<Self, ParamError> {
        let s = input.trim();
        let value: f64 = s
            .parse()
            .map_err(|_| ParamError::NotANumber(s.to_string()))?;
        let gamma = Self::new(value)?;
        if value > MAX_GAMMA {
            return Err(ParamError::GammaOutOfRange(value));
        }
        Ok(gamma)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Gamma {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Gamma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Side length of a square filter window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelSize(usize);

impl KernelSize {
    pub const DEFAULT: KernelSize = KernelSize(3);

    pub fn new(size: usize) -> Result<Self, ParamError> {
        if (MIN_KERNEL_SIZE..KERNEL_SIZE_LIMIT).contains(&size) && size % 2 == 1 {
            Ok(Self(size))
        } else {
            Err(ParamError::InvalidKernelSize(size))
        }
    }

    pub fn parse(input: &str) -> Result<Self, ParamError> {
        let s = input.trim();
        let size: usize = s
            .parse()
            .map_err(|_| ParamError::NotANumber(s.to_string()))?;
        Self::new(size)
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Distance from the window center to its edge.
    pub fn margin(self) -> usize {
        (self.0 - 1) / 2
    }
}

impl Default for KernelSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for KernelSize {
    type Error = ParamError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl FromStr for KernelSize {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KernelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamma_accepts_positive() {
        assert_eq!(Gamma::new(0.5).unwrap().value(), 0.5);
        assert_eq!(Gamma::new(25.0).unwrap().value(), 25.0);
    }

    #[test]
    fn test_gamma_rejects_non_positive() {
        assert_eq!(Gamma::new(0.0), Err(ParamError::InvalidGamma(0.0)));
        assert!(Gamma::new(-1.0).is_err());
        assert!(Gamma::new(f64::NAN).is_err());
        assert!(Gamma::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_gamma_parse_range() {
        assert_eq!(Gamma::parse(" 2.5 ").unwrap().value(), 2.5);
        assert_eq!(Gamma::parse("10").unwrap().value(), 10.0);
        assert_eq!(Gamma::parse("10.5"), Err(ParamError::GammaOutOfRange(10.5)));
        assert_eq!(
            Gamma::parse("abc"),
            Err(ParamError::NotANumber("abc".to_string()))
        );
        assert!(Gamma::parse("0").is_err());
    }

    #[test]
    fn test_kernel_size_valid_values() {
        for n in [3, 5, 7, 9] {
            assert_eq!(KernelSize::new(n).unwrap().get(), n);
        }
    }

    #[test]
    fn test_kernel_size_rejects_even_and_out_of_range() {
        for n in [0, 1, 2, 4, 8, 10, 11] {
            assert_eq!(KernelSize::new(n), Err(ParamError::InvalidKernelSize(n)));
        }
    }

    #[test]
    fn test_kernel_size_parse() {
        assert_eq!("5".parse::<KernelSize>().unwrap().get(), 5);
        assert!(KernelSize::parse("-3").is_err());
        assert!(KernelSize::parse("x").is_err());
    }

    #[test]
    fn test_margin() {
        assert_eq!(KernelSize::DEFAULT.margin(), 1);
        assert_eq!(KernelSize::new(9).unwrap().margin(), 4);
    }
}
