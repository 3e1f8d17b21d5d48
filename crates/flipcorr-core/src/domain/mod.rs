pub mod errors;
mod geometry;
mod logs;
mod spectrum;

pub use errors::{
    ConfigurationError, CorrectionError, CorrectionErrorCategory, CorrectionResult, ExitStatus,
};
pub use geometry::{DNS_DETECTOR_COUNT, DNS_DETECTOR_STEP_DEG, Detector, DetectorBank};
pub use logs::{LogValue, SampleLogs};
pub use spectrum::Spectrum;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlipperState {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl FlipperState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

impl Display for FlipperState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for FlipperState {
    type Err = CorrectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            other => Err(CorrectionError::input_validation(
                "INPUT.FLIPPER_VALUE",
                format!("unknown flipper state '{other}', expected ON or OFF"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    SpinFlip,
    NonSpinFlip,
}

impl Channel {
    pub const fn expected_flipper(self) -> FlipperState {
        match self {
            Self::SpinFlip => FlipperState::On,
            Self::NonSpinFlip => FlipperState::Off,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::SpinFlip => "SF",
            Self::NonSpinFlip => "NSF",
        }
    }
}

/// The six inputs of a flipping-ratio correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputRole {
    SfData,
    NsfData,
    SfCalibration,
    NsfCalibration,
    SfBackground,
    NsfBackground,
}

impl InputRole {
    pub const ALL: [InputRole; 6] = [
        Self::SfData,
        Self::NsfData,
        Self::SfCalibration,
        Self::NsfCalibration,
        Self::SfBackground,
        Self::NsfBackground,
    ];

    pub const fn channel(self) -> Channel {
        match self {
            Self::SfData | Self::SfCalibration | Self::SfBackground => Channel::SpinFlip,
            Self::NsfData | Self::NsfCalibration | Self::NsfBackground => Channel::NonSpinFlip,
        }
    }

    pub const fn is_calibration(self) -> bool {
        matches!(self, Self::SfCalibration | Self::NsfCalibration)
    }

    /// Stable snake_case identifier, used for store names and file stems.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::SfData => "sf_data",
            Self::NsfData => "nsf_data",
            Self::SfCalibration => "sf_nicr",
            Self::NsfCalibration => "nsf_nicr",
            Self::SfBackground => "sf_bkgr",
            Self::NsfBackground => "nsf_bkgr",
        }
    }

    const fn kind(self) -> &'static str {
        match self {
            Self::SfData | Self::NsfData => "data",
            Self::SfCalibration | Self::NsfCalibration => "NiCr",
            Self::SfBackground | Self::NsfBackground => "background",
        }
    }
}

impl Display for InputRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.channel().label(), self.kind())
    }
}
