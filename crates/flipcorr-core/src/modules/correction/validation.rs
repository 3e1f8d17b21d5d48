use super::model::{CorrectionInputs, CorrectionParameters};
use crate::domain::{ConfigurationError, InputRole, Spectrum};
use tracing::{debug, warn};

pub(crate) const REQUIRED_POLARISATION: &str = "x";

/// Inputs that passed every precondition, each paired with its
/// normalization spectrum.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ValidatedInputs<'a> {
    pairs: [(&'a Spectrum, &'a Spectrum); 6],
}

impl<'a> ValidatedInputs<'a> {
    pub(crate) fn get(&self, role: InputRole) -> (&'a Spectrum, &'a Spectrum) {
        self.pairs[role_index(role)]
    }
}

fn role_index(role: InputRole) -> usize {
    InputRole::ALL
        .iter()
        .position(|candidate| *candidate == role)
        .unwrap_or_default()
}

pub(crate) fn validate_parameters(
    parameters: &CorrectionParameters,
) -> Result<(), ConfigurationError> {
    let value = parameters.double_spin_flip_probability;
    if !value.is_finite() || !(0.0..1.0).contains(&value) {
        return Err(ConfigurationError::InvalidDoubleSpinFlipProbability { value });
    }
    Ok(())
}

pub(crate) fn validate_inputs<'a>(
    inputs: &CorrectionInputs<'a>,
) -> Result<ValidatedInputs<'a>, ConfigurationError> {
    let mut normalizations = Vec::with_capacity(InputRole::ALL.len());
    for (role, measurement) in inputs.iter() {
        let normalization = measurement
            .normalization
            .ok_or(ConfigurationError::MissingNormalization { role })?;
        normalizations.push(normalization);
    }

    let reference = inputs.sf_data.spectrum;
    for (role, measurement) in inputs.iter() {
        check_shape(role, reference, measurement.spectrum)?;
    }
    for ((role, _), normalization) in inputs.iter().zip(&normalizations) {
        check_shape(role, reference, normalization)?;
        check_normalization_values(role, normalization)?;
    }

    for (role, measurement) in inputs.iter() {
        let expected = role.channel().expected_flipper();
        let actual = measurement.spectrum.logs().flipper();
        if actual != Some(expected) {
            return Err(ConfigurationError::FlipperMismatch {
                role,
                expected,
                actual,
            });
        }
    }

    for role in [InputRole::SfCalibration, InputRole::NsfCalibration] {
        let polarisation = inputs.measurement(role).spectrum.logs().polarisation();
        if polarisation != Some(REQUIRED_POLARISATION) {
            return Err(ConfigurationError::PolarisationMismatch {
                role,
                actual: polarisation.map(str::to_string),
            });
        }
    }

    warn_on_metadata_drift(inputs);

    debug!(channels = reference.len(), "all inputs passed validation");
    let pairs = std::array::from_fn(|index| {
        (
            inputs.measurement(InputRole::ALL[index]).spectrum,
            normalizations[index],
        )
    });
    Ok(ValidatedInputs { pairs })
}

fn check_shape(
    role: InputRole,
    reference: &Spectrum,
    candidate: &Spectrum,
) -> Result<(), ConfigurationError> {
    if candidate.len() != reference.len() {
        return Err(ConfigurationError::ChannelCountMismatch {
            role,
            expected: reference.len(),
            actual: candidate.len(),
        });
    }
    if !candidate
        .detectors()
        .is_compatible_with(reference.detectors())
    {
        return Err(ConfigurationError::DetectorMismatch { role });
    }
    Ok(())
}

fn check_normalization_values(
    role: InputRole,
    normalization: &Spectrum,
) -> Result<(), ConfigurationError> {
    match normalization
        .signal()
        .iter()
        .position(|value| *value == 0.0 || !value.is_finite())
    {
        Some(channel) => Err(ConfigurationError::InvalidNormalization { role, channel }),
        None => Ok(()),
    }
}

fn warn_on_metadata_drift(inputs: &CorrectionInputs<'_>) {
    let calibration_logs = inputs.sf_calibration.spectrum.logs();
    for role in [InputRole::SfData, InputRole::NsfData] {
        let logs = inputs.measurement(role).spectrum.logs();
        if logs.polarisation() != calibration_logs.polarisation() {
            warn!(
                %role,
                data = logs.polarisation().unwrap_or("none"),
                calibration = calibration_logs.polarisation().unwrap_or("none"),
                "data polarisation differs from calibration"
            );
        }
        if let (Some(data), Some(calibration)) =
            (logs.wavelength(), calibration_logs.wavelength())
        {
            if (data - calibration).abs() > 1.0e-3 {
                warn!(%role, data, calibration, "data wavelength differs from calibration");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{role_index, validate_parameters};
    use crate::domain::{ConfigurationError, InputRole};
    use crate::modules::correction::CorrectionParameters;

    #[test]
    fn double_spin_flip_probability_must_be_in_unit_interval() {
        for value in [0.0, 0.2, 0.999] {
            assert!(
                validate_parameters(&CorrectionParameters::with_double_spin_flip_probability(
                    value
                ))
                .is_ok()
            );
        }

        for value in [-0.1, 1.0, f64::NAN, f64::INFINITY] {
            let error = validate_parameters(
                &CorrectionParameters::with_double_spin_flip_probability(value),
            )
            .expect_err("out of range probability should fail");
            assert!(matches!(
                error,
                ConfigurationError::InvalidDoubleSpinFlipProbability { .. }
            ));
        }
    }

    #[test]
    fn role_indices_follow_declaration_order() {
        for (index, role) in InputRole::ALL.into_iter().enumerate() {
            assert_eq!(role_index(role), index);
        }
    }
}
