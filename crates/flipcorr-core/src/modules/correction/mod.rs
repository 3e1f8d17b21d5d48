//! Flipping-ratio correction of DNS polarization-analysis data.
//!
//! The flipping ratio `F = C_nsf / C_sf` is taken from the normalized,
//! background-subtracted NiCr calibration and applied channel by channel:
//!
//! ```text
//! nsf_out = nsf - sf / F
//! sf_out  = sf - nsf / F
//! nsf_out = nsf_out - f * sf_out      (double spin-flip, f > 0)
//! ```

mod model;
mod validation;

pub use model::{
    CorrectedPair, CorrectionInputs, CorrectionParameters, CorrectionRequest, Measurement,
};

use super::store::WorkspaceStore;
use super::traits::{SpectrumCorrector, StoreCorrector};
use crate::domain::{ConfigurationError, CorrectionResult, InputRole, Spectrum};
use crate::numerics::Measured;
use tracing::{debug, info, warn};
use validation::{ValidatedInputs, validate_inputs, validate_parameters};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlippingRatioCorrector {
    parameters: CorrectionParameters,
}

impl FlippingRatioCorrector {
    pub fn new(parameters: CorrectionParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &CorrectionParameters {
        &self.parameters
    }

    /// Runs every precondition check without computing outputs.
    pub fn validate(&self, inputs: &CorrectionInputs<'_>) -> CorrectionResult<()> {
        validate_parameters(&self.parameters)?;
        validate_inputs(inputs)?;
        Ok(())
    }

    pub fn validate_by_name(
        &self,
        store: &WorkspaceStore,
        request: &CorrectionRequest,
    ) -> CorrectionResult<()> {
        self.validate(&resolve_inputs(store, request)?)?;
        check_output_names(store, request)?;
        Ok(())
    }
}

impl SpectrumCorrector for FlippingRatioCorrector {
    fn correct(&self, inputs: &CorrectionInputs<'_>) -> CorrectionResult<CorrectedPair> {
        validate_parameters(&self.parameters)?;
        let validated = validate_inputs(inputs)?;
        apply_correction(&validated, &self.parameters)
    }
}

/// Corrects already-resolved spectra.
pub fn correct(
    inputs: &CorrectionInputs<'_>,
    parameters: &CorrectionParameters,
) -> CorrectionResult<CorrectedPair> {
    FlippingRatioCorrector::new(*parameters).correct(inputs)
}

/// Resolves the request's input names (and their `_NORM` partners) in the
/// store and corrects them. The store is left untouched.
pub fn correct_by_name(
    store: &WorkspaceStore,
    request: &CorrectionRequest,
    parameters: &CorrectionParameters,
) -> CorrectionResult<CorrectedPair> {
    FlippingRatioCorrector::new(*parameters).correct_by_name(store, request)
}

/// Like [`correct_by_name`], then registers both outputs under the
/// request's output names. Nothing is registered on failure.
pub fn publish_by_name(
    store: &mut WorkspaceStore,
    request: &CorrectionRequest,
    parameters: &CorrectionParameters,
) -> CorrectionResult<()> {
    FlippingRatioCorrector::new(*parameters).publish_by_name(store, request)
}

pub(crate) fn resolve_inputs<'a>(
    store: &'a WorkspaceStore,
    request: &CorrectionRequest,
) -> CorrectionResult<CorrectionInputs<'a>> {
    let resolve = |role: InputRole| -> Result<Measurement<'a>, ConfigurationError> {
        let name = request.input_name(role);
        let spectrum = store
            .get(name)
            .ok_or_else(|| ConfigurationError::MissingWorkspace {
                role,
                name: name.to_string(),
            })?;
        Ok(Measurement {
            spectrum,
            normalization: store.normalization_for(name),
        })
    };

    Ok(CorrectionInputs {
        sf_data: resolve(InputRole::SfData)?,
        nsf_data: resolve(InputRole::NsfData)?,
        sf_calibration: resolve(InputRole::SfCalibration)?,
        nsf_calibration: resolve(InputRole::NsfCalibration)?,
        sf_background: resolve(InputRole::SfBackground)?,
        nsf_background: resolve(InputRole::NsfBackground)?,
    })
}

pub(crate) fn check_output_names(
    store: &WorkspaceStore,
    request: &CorrectionRequest,
) -> Result<(), ConfigurationError> {
    let sf_output = request.sf_output.trim();
    let nsf_output = request.nsf_output.trim();
    for (channel, name) in [("SF", sf_output), ("NSF", nsf_output)] {
        if name.is_empty() {
            return Err(ConfigurationError::EmptyOutputName { channel });
        }
    }
    if sf_output == nsf_output {
        return Err(ConfigurationError::OutputNameConflict {
            name: nsf_output.to_string(),
        });
    }
    for name in [sf_output, nsf_output] {
        if store.contains(name) {
            return Err(ConfigurationError::OutputNameConflict {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn normalized(validated: &ValidatedInputs<'_>, role: InputRole) -> CorrectionResult<Spectrum> {
    let (spectrum, normalization) = validated.get(role);
    spectrum.try_div(normalization)
}

fn flipping_ratios(
    sf_calibration: &Spectrum,
    nsf_calibration: &Spectrum,
) -> CorrectionResult<Vec<Measured>> {
    let negative_channels = sf_calibration
        .signal()
        .iter()
        .chain(nsf_calibration.signal())
        .filter(|value| **value < 0.0)
        .count();
    if negative_channels > 0 {
        warn!(
            negative_channels,
            "background-subtracted calibration has negative channels"
        );
    }

    let mut ratios = Vec::with_capacity(sf_calibration.len());
    for (channel, (nsf, sf)) in nsf_calibration
        .measured()
        .zip(sf_calibration.measured())
        .enumerate()
    {
        let ratio = nsf / sf;
        if !ratio.is_finite() || ratio.value == 0.0 {
            return Err(ConfigurationError::DegenerateCalibration { channel }.into());
        }
        ratios.push(ratio);
    }
    Ok(ratios)
}

fn apply_correction(
    validated: &ValidatedInputs<'_>,
    parameters: &CorrectionParameters,
) -> CorrectionResult<CorrectedPair> {
    let sf_calibration = normalized(validated, InputRole::SfCalibration)?
        .try_sub(&normalized(validated, InputRole::SfBackground)?)?;
    let nsf_calibration = normalized(validated, InputRole::NsfCalibration)?
        .try_sub(&normalized(validated, InputRole::NsfBackground)?)?;
    let ratios = flipping_ratios(&sf_calibration, &nsf_calibration)?;
    debug!(channels = ratios.len(), "flipping ratios computed");

    let sf_data = normalized(validated, InputRole::SfData)?;
    let nsf_data = normalized(validated, InputRole::NsfData)?;

    let (sf_channels, nsf_channels): (Vec<Measured>, Vec<Measured>) = sf_data
        .measured()
        .zip(nsf_data.measured())
        .zip(&ratios)
        .map(|((sf, nsf), &ratio)| (sf - nsf / ratio, nsf - sf / ratio))
        .unzip();

    let probability = parameters.double_spin_flip_probability;
    let nsf_channels: Vec<Measured> = if probability > 0.0 {
        nsf_channels
            .into_iter()
            .zip(&sf_channels)
            .map(|(nsf, &sf)| nsf - sf * probability)
            .collect()
    } else {
        nsf_channels
    };

    let (sf_input, _) = validated.get(InputRole::SfData);
    let (nsf_input, _) = validated.get(InputRole::NsfData);
    let pair = CorrectedPair {
        sf: Spectrum::from_measured(
            sf_channels,
            sf_input.detectors().clone(),
            sf_input.logs().clone(),
        )?,
        nsf: Spectrum::from_measured(
            nsf_channels,
            nsf_input.detectors().clone(),
            nsf_input.logs().clone(),
        )?,
    };

    info!(
        channels = pair.sf.len(),
        double_spin_flip_probability = probability,
        "flipping-ratio correction applied"
    );
    Ok(pair)
}
