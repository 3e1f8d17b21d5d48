use super::{FlipperState, InputRole};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CorrectionResult<T> = Result<T, CorrectionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrectionErrorCategory {
    Success,
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl CorrectionErrorCategory {
    pub const fn exit_status(self) -> ExitStatus {
        match self {
            Self::Success => ExitStatus {
                exit_code: 0,
                category_name: "Success",
            },
            Self::InputValidationError => ExitStatus {
                exit_code: 2,
                category_name: "InputValidationError",
            },
            Self::IoSystemError => ExitStatus {
                exit_code: 3,
                category_name: "IoSystemError",
            },
            Self::ComputationError => ExitStatus {
                exit_code: 4,
                category_name: "ComputationError",
            },
            Self::InternalError => ExitStatus {
                exit_code: 5,
                category_name: "InternalError",
            },
        }
    }

    pub const fn exit_code(self) -> i32 {
        self.exit_status().exit_code
    }

    pub const fn category_name(self) -> &'static str {
        self.exit_status().category_name
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    pub exit_code: i32,
    pub category_name: &'static str,
}

/// Precondition failures of the flipping-ratio correction.
///
/// Every variant aborts the call before any channel arithmetic runs, so a
/// caller never sees a partially corrected pair.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{role} workspace '{name}' does not exist")]
    MissingWorkspace { role: InputRole, name: String },
    #[error("normalization workspace for {role} is missing")]
    MissingNormalization { role: InputRole },
    #[error("normalization of {role} is zero or not finite at channel {channel}")]
    InvalidNormalization { role: InputRole, channel: usize },
    #[error("{role} has {actual} channels, expected {expected}")]
    ChannelCountMismatch {
        role: InputRole,
        expected: usize,
        actual: usize,
    },
    #[error("{role} detector bank does not match the SF data detectors")]
    DetectorMismatch { role: InputRole },
    #[error("{role} must have flipper={expected}, found {}", describe_flipper(.actual))]
    FlipperMismatch {
        role: InputRole,
        expected: FlipperState,
        actual: Option<FlipperState>,
    },
    #[error("{role} must have polarisation=x, found {}", describe_polarisation(.actual))]
    PolarisationMismatch {
        role: InputRole,
        actual: Option<String>,
    },
    #[error("double spin-flip scattering probability {value} is outside [0, 1)")]
    InvalidDoubleSpinFlipProbability { value: f64 },
    #[error("background-subtracted calibration gives no usable flipping ratio at channel {channel}")]
    DegenerateCalibration { channel: usize },
    #[error("output workspace name '{name}' is already taken")]
    OutputNameConflict { name: String },
    #[error("{channel} output workspace name must not be empty")]
    EmptyOutputName { channel: &'static str },
}

impl ConfigurationError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingWorkspace { .. } => "INPUT.MISSING_WORKSPACE",
            Self::MissingNormalization { .. } => "INPUT.MISSING_NORMALIZATION",
            Self::InvalidNormalization { .. } => "INPUT.INVALID_NORMALIZATION",
            Self::ChannelCountMismatch { .. } => "INPUT.CHANNEL_COUNT",
            Self::DetectorMismatch { .. } => "INPUT.DETECTOR_BANK",
            Self::FlipperMismatch { .. } => "INPUT.FLIPPER_STATE",
            Self::PolarisationMismatch { .. } => "INPUT.POLARISATION",
            Self::InvalidDoubleSpinFlipProbability { .. } => "INPUT.DOUBLE_SPIN_FLIP",
            Self::DegenerateCalibration { .. } => "INPUT.DEGENERATE_CALIBRATION",
            Self::OutputNameConflict { .. } | Self::EmptyOutputName { .. } => {
                "INPUT.OUTPUT_NAME"
            }
        }
    }
}

fn describe_flipper(actual: &Option<FlipperState>) -> String {
    actual.map_or_else(|| "no flipper log".to_string(), |state| state.to_string())
}

fn describe_polarisation(actual: &Option<String>) -> &str {
    actual.as_deref().unwrap_or("no polarisation log")
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionError {
    category: CorrectionErrorCategory,
    code: &'static str,
    message: String,
    configuration: Option<ConfigurationError>,
}

impl CorrectionError {
    pub fn new(
        category: CorrectionErrorCategory,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code,
            message: message.into(),
            configuration: None,
        }
    }

    pub fn input_validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(CorrectionErrorCategory::InputValidationError, code, message)
    }

    pub fn io_system(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(CorrectionErrorCategory::IoSystemError, code, message)
    }

    pub fn computation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(CorrectionErrorCategory::ComputationError, code, message)
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(CorrectionErrorCategory::InternalError, code, message)
    }

    pub const fn category(&self) -> CorrectionErrorCategory {
        self.category
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The precondition that failed, when this error came from one.
    pub fn configuration(&self) -> Option<&ConfigurationError> {
        self.configuration.as_ref()
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        let severity = if self.category.is_fatal() {
            "ERROR"
        } else {
            "INFO"
        };
        format!("{}: [{}] {}", severity, self.code, self.message)
    }

    pub fn fatal_exit_line(&self) -> Option<String> {
        self.category
            .is_fatal()
            .then(|| format!("FATAL EXIT CODE: {}", self.exit_code()))
    }
}

impl From<ConfigurationError> for CorrectionError {
    fn from(error: ConfigurationError) -> Self {
        Self {
            category: CorrectionErrorCategory::InputValidationError,
            code: error.code(),
            message: error.to_string(),
            configuration: Some(error),
        }
    }
}

impl Display for CorrectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.category_name(),
            self.code,
            self.message
        )
    }
}

impl Error for CorrectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.configuration
            .as_ref()
            .map(|source| source as &(dyn Error + 'static))
    }
}
