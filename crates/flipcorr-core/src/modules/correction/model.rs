use crate::domain::{InputRole, Spectrum};

/// A measured spectrum and the monitor spectrum it is normalized by.
#[derive(Debug, Clone, Copy)]
pub struct Measurement<'a> {
    pub spectrum: &'a Spectrum,
    pub normalization: Option<&'a Spectrum>,
}

impl<'a> Measurement<'a> {
    pub fn new(spectrum: &'a Spectrum, normalization: &'a Spectrum) -> Self {
        Self {
            spectrum,
            normalization: Some(normalization),
        }
    }

    pub fn unnormalized(spectrum: &'a Spectrum) -> Self {
        Self {
            spectrum,
            normalization: None,
        }
    }
}

/// Resolved inputs of one correction. Data are expected background
/// subtracted already; calibration is background subtracted here.
#[derive(Debug, Clone, Copy)]
pub struct CorrectionInputs<'a> {
    pub sf_data: Measurement<'a>,
    pub nsf_data: Measurement<'a>,
    pub sf_calibration: Measurement<'a>,
    pub nsf_calibration: Measurement<'a>,
    pub sf_background: Measurement<'a>,
    pub nsf_background: Measurement<'a>,
}

impl<'a> CorrectionInputs<'a> {
    pub fn measurement(&self, role: InputRole) -> Measurement<'a> {
        match role {
            InputRole::SfData => self.sf_data,
            InputRole::NsfData => self.nsf_data,
            InputRole::SfCalibration => self.sf_calibration,
            InputRole::NsfCalibration => self.nsf_calibration,
            InputRole::SfBackground => self.sf_background,
            InputRole::NsfBackground => self.nsf_background,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (InputRole, Measurement<'a>)> + '_ {
        InputRole::ALL
            .into_iter()
            .map(|role| (role, self.measurement(role)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CorrectionParameters {
    /// Probability `f` that spin-flip scattering shows up in the
    /// non-spin-flip channel; expected in `[0, 1)`.
    pub double_spin_flip_probability: f64,
}

impl CorrectionParameters {
    pub const fn with_double_spin_flip_probability(probability: f64) -> Self {
        Self {
            double_spin_flip_probability: probability,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrectedPair {
    pub sf: Spectrum,
    pub nsf: Spectrum,
}

/// Workspace names for the store-backed entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionRequest {
    pub sf_data: String,
    pub nsf_data: String,
    pub sf_calibration: String,
    pub nsf_calibration: String,
    pub sf_background: String,
    pub nsf_background: String,
    pub sf_output: String,
    pub nsf_output: String,
}

impl CorrectionRequest {
    pub fn input_name(&self, role: InputRole) -> &str {
        match role {
            InputRole::SfData => &self.sf_data,
            InputRole::NsfData => &self.nsf_data,
            InputRole::SfCalibration => &self.sf_calibration,
            InputRole::NsfCalibration => &self.nsf_calibration,
            InputRole::SfBackground => &self.sf_background,
            InputRole::NsfBackground => &self.nsf_background,
        }
    }
}
