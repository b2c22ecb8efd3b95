/// Operation dispatch and named presets.
///
/// Text form of an operation (used by the CLI and in presets):
/// `stretch`, `gamma=<f>`, `mean[=<n>]`, `median[=<n>]`, `prewitt`, `sobel`.
use std::fmt;
use std::str::FromStr;

use crate::buffer::{ImageBuffer, ImageError};
use crate::convolve::{apply_linear_filter, apply_median_filter};
use crate::edge_detect::EdgeOperator;
use crate::params::{Gamma, KernelSize, ParamError};
use crate::point::{apply_power_law, contrast_stretching};

/// One transform from a buffer to a new buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    ContrastStretch,
    PowerLaw(Gamma),
    MeanFilter(KernelSize),
    MedianFilter(KernelSize),
    Edges(EdgeOperator),
}

impl Operation {
    pub fn apply(&self, img: &ImageBuffer) -> Result<ImageBuffer, ImageError> {
        match *self {
            Operation::ContrastStretch => contrast_stretching(img),
            Operation::PowerLaw(gamma) => Ok(apply_power_law(img, gamma)),
            Operation::MeanFilter(size) => Ok(apply_linear_filter(img, size)),
            Operation::MedianFilter(size) => Ok(apply_median_filter(img, size)),
            Operation::Edges(op) => op.detect(img),
        }
    }

    /// Human-readable description for menus and logs.
    pub fn describe(&self) -> String {
        match self {
            Operation::ContrastStretch => "contrast stretching [10, 255]".to_string(),
            Operation::PowerLaw(g) => format!("power law, gamma {}", g),
            Operation::MeanFilter(n) => format!("mean filter {}x{}", n, n),
            Operation::MedianFilter(n) => format!("median filter {}x{}", n, n),
            Operation::Edges(EdgeOperator::Prewitt) => "Prewitt edges".to_string(),
            Operation::Edges(EdgeOperator::Sobel) => "Sobel edges".to_string(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ContrastStretch => write!(f, "stretch"),
            Operation::PowerLaw(g) => write!(f, "gamma={}", g),
            Operation::MeanFilter(n) => write!(f, "mean={}", n),
            Operation::MedianFilter(n) => write!(f, "median={}", n),
            Operation::Edges(op) => write!(f, "{}", op.name()),
        }
    }
}

impl FromStr for Operation {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, arg) = match s.split_once('=') {
            Some((name, arg)) => (name.trim(), Some(arg)),
            None => (s, None),
        };

        match (name.to_ascii_lowercase().as_str(), arg) {
            ("stretch" | "contrast", None) => Ok(Operation::ContrastStretch),
            ("gamma", Some(arg)) => Ok(Operation::PowerLaw(Gamma::parse(arg)?)),
            ("mean", None) => Ok(Operation::MeanFilter(KernelSize::DEFAULT)),
            ("mean", Some(arg)) => Ok(Operation::MeanFilter(KernelSize::parse(arg)?)),
            ("median", None) => Ok(Operation::MedianFilter(KernelSize::DEFAULT)),
            ("median", Some(arg)) => Ok(Operation::MedianFilter(KernelSize::parse(arg)?)),
            ("prewitt", None) => Ok(Operation::Edges(EdgeOperator::Prewitt)),
            ("sobel", None) => Ok(Operation::Edges(EdgeOperator::Sobel)),
            _ => Err(ParamError::UnknownOperation(s.to_string())),
        }
    }
}

/// Apply operations left to right. Stops at the first failure.
pub fn apply_chain(img: &ImageBuffer, ops: &[Operation]) -> Result<ImageBuffer, ImageError> {
    let mut current = img.clone();
    for op in ops {
        current = op.apply(&current)?;
    }
    Ok(current)
}

/// A named, fixed chain of operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub operations: Vec<Operation>,
}

impl Preset {
    /// Stretch the observed range onto [10, 255].
    pub fn enhance() -> Self {
        Self {
            operations: vec![Operation::ContrastStretch],
        }
    }

    /// Brighten midtones, then restretch.
    pub fn brighten() -> Self {
        Self {
            operations: vec![
                Operation::PowerLaw(Gamma::new(0.5).unwrap_or_default()),
                Operation::ContrastStretch,
            ],
        }
    }

    /// Median then mean, both 3x3.
    pub fn denoise() -> Self {
        Self {
            operations: vec![
                Operation::MedianFilter(KernelSize::DEFAULT),
                Operation::MeanFilter(KernelSize::DEFAULT),
            ],
        }
    }

    /// Knock out salt-and-pepper noise before Sobel.
    pub fn sobel_clean() -> Self {
        Self {
            operations: vec![
                Operation::MedianFilter(KernelSize::DEFAULT),
                Operation::Edges(EdgeOperator::Sobel),
            ],
        }
    }

    pub fn prewitt_clean() -> Self {
        Self {
            operations: vec![
                Operation::MedianFilter(KernelSize::DEFAULT),
                Operation::Edges(EdgeOperator::Prewitt),
            ],
        }
    }

    pub fn from_preset(name: &str) -> Option<Self> {
        match name {
            "enhance" => Some(Self::enhance()),
            "brighten" => Some(Self::brighten()),
            "denoise" => Some(Self::denoise()),
            "sobel_clean" => Some(Self::sobel_clean()),
            "prewitt_clean" => Some(Self::prewitt_clean()),
            _ => None,
        }
    }

    pub fn all_presets() -> Vec<(&'static str, Self)> {
        vec![
            ("enhance", Self::enhance()),
            ("brighten", Self::brighten()),
            ("denoise", Self::denoise()),
            ("sobel_clean", Self::sobel_clean()),
            ("prewitt_clean", Self::prewitt_clean()),
        ]
    }

    pub fn apply(&self, img: &ImageBuffer) -> Result<ImageBuffer, ImageError> {
        apply_chain(img, &self.operations)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ops: Vec<String> = self.operations.iter().map(|op| op.to_string()).collect();
        f.write_str(&ops.join(" -> "))
    }
}
