use super::{CorrectionError, CorrectionResult, DetectorBank, SampleLogs};
use crate::numerics::Measured;
use serde::{Deserialize, Serialize};

/// One value per detector channel plus the metadata the correction reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SpectrumRecord")]
pub struct Spectrum {
    signal: Vec<f64>,
    error: Vec<f64>,
    detectors: DetectorBank,
    #[serde(default)]
    logs: SampleLogs,
}

#[derive(Deserialize)]
struct SpectrumRecord {
    signal: Vec<f64>,
    error: Vec<f64>,
    detectors: DetectorBank,
    #[serde(default)]
    logs: SampleLogs,
}

impl TryFrom<SpectrumRecord> for Spectrum {
    type Error = CorrectionError;

    fn try_from(record: SpectrumRecord) -> Result<Self, Self::Error> {
        Spectrum::new(record.signal, record.error, record.detectors, record.logs)
    }
}

impl Spectrum {
    pub fn new(
        signal: Vec<f64>,
        error: Vec<f64>,
        detectors: DetectorBank,
        logs: SampleLogs,
    ) -> CorrectionResult<Self> {
        if signal.len() != error.len() || signal.len() != detectors.len() {
            return Err(CorrectionError::input_validation(
                "INPUT.SPECTRUM_SHAPE",
                format!(
                    "spectrum has {} signal values, {} errors and {} detectors",
                    signal.len(),
                    error.len(),
                    detectors.len()
                ),
            ));
        }

        Ok(Self {
            signal,
            error,
            detectors,
            logs,
        })
    }

    /// Counts with Poisson errors.
    pub fn from_counts(
        counts: Vec<f64>,
        detectors: DetectorBank,
        logs: SampleLogs,
    ) -> CorrectionResult<Self> {
        let error = counts.iter().map(|count| count.abs().sqrt()).collect();
        Self::new(counts, error, detectors, logs)
    }

    pub fn from_measured(
        channels: impl IntoIterator<Item = Measured>,
        detectors: DetectorBank,
        logs: SampleLogs,
    ) -> CorrectionResult<Self> {
        let (signal, error) = channels
            .into_iter()
            .map(|channel| (channel.value, channel.sigma))
            .unzip();
        Self::new(signal, error, detectors, logs)
    }

    /// A spectrum on the same detectors and logs with every channel set to
    /// `value ± sigma`; used for flat normalizations.
    pub fn uniform_like(template: &Spectrum, value: f64, sigma: f64) -> Self {
        let len = template.len();
        Self {
            signal: vec![value; len],
            error: vec![sigma; len],
            detectors: template.detectors.clone(),
            logs: template.logs.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }

    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    pub fn error(&self) -> &[f64] {
        &self.error
    }

    pub fn detectors(&self) -> &DetectorBank {
        &self.detectors
    }

    pub fn detectors_mut(&mut self) -> &mut DetectorBank {
        &mut self.detectors
    }

    pub fn logs(&self) -> &SampleLogs {
        &self.logs
    }

    pub fn logs_mut(&mut self) -> &mut SampleLogs {
        &mut self.logs
    }

    pub fn channel(&self, index: usize) -> Option<Measured> {
        Some(Measured::new(
            *self.signal.get(index)?,
            *self.error.get(index)?,
        ))
    }

    pub fn measured(&self) -> impl Iterator<Item = Measured> + '_ {
        self.signal
            .iter()
            .zip(&self.error)
            .map(|(&value, &sigma)| Measured::new(value, sigma))
    }

    /// Channelwise `self - rhs` keeping this spectrum's metadata.
    pub fn try_sub(&self, rhs: &Spectrum) -> CorrectionResult<Spectrum> {
        self.combine(rhs, |lhs, rhs| lhs - rhs)
    }

    /// Channelwise `self / rhs` keeping this spectrum's metadata.
    pub fn try_div(&self, rhs: &Spectrum) -> CorrectionResult<Spectrum> {
        self.combine(rhs, |lhs, rhs| lhs / rhs)
    }

    fn combine(
        &self,
        rhs: &Spectrum,
        operation: impl Fn(Measured, Measured) -> Measured,
    ) -> CorrectionResult<Spectrum> {
        if self.len() != rhs.len() {
            return Err(CorrectionError::input_validation(
                "INPUT.SPECTRUM_SHAPE",
                format!(
                    "cannot combine spectra with {} and {} channels",
                    self.len(),
                    rhs.len()
                ),
            ));
        }

        Spectrum::from_measured(
            self.measured()
                .zip(rhs.measured())
                .map(|(lhs, rhs)| operation(lhs, rhs)),
            self.detectors.clone(),
            self.logs.clone(),
        )
    }
}
