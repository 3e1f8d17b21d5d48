use super::correction::{
    CorrectedPair, CorrectionInputs, CorrectionRequest, check_output_names, resolve_inputs,
};
use super::store::WorkspaceStore;
use crate::domain::CorrectionResult;

pub trait SpectrumCorrector {
    fn correct(&self, inputs: &CorrectionInputs<'_>) -> CorrectionResult<CorrectedPair>;
}

/// Name-based entry points for any corrector working on resolved spectra.
pub trait StoreCorrector {
    fn correct_by_name(
        &self,
        store: &WorkspaceStore,
        request: &CorrectionRequest,
    ) -> CorrectionResult<CorrectedPair>;

    fn publish_by_name(
        &self,
        store: &mut WorkspaceStore,
        request: &CorrectionRequest,
    ) -> CorrectionResult<()>;
}

impl<T> StoreCorrector for T
where
    T: SpectrumCorrector,
{
    fn correct_by_name(
        &self,
        store: &WorkspaceStore,
        request: &CorrectionRequest,
    ) -> CorrectionResult<CorrectedPair> {
        let inputs = resolve_inputs(store, request)?;
        self.correct(&inputs)
    }

    fn publish_by_name(
        &self,
        store: &mut WorkspaceStore,
        request: &CorrectionRequest,
    ) -> CorrectionResult<()> {
        check_output_names(store, request)?;
        let pair = self.correct_by_name(store, request)?;
        store.insert(&request.sf_output, pair.sf)?;
        store.insert(&request.nsf_output, pair.nsf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{SpectrumCorrector, StoreCorrector};
    use crate::domain::{
        ConfigurationError, CorrectionError, CorrectionErrorCategory, DetectorBank, InputRole,
        SampleLogs, Spectrum,
    };
    use crate::modules::correction::{CorrectedPair, CorrectionInputs, CorrectionRequest};
    use crate::modules::store::WorkspaceStore;

    struct FailingCorrector;

    impl SpectrumCorrector for FailingCorrector {
        fn correct(
            &self,
            _inputs: &CorrectionInputs<'_>,
        ) -> crate::domain::CorrectionResult<CorrectedPair> {
            Err(CorrectionError::computation(
                "RUN.CORRECTION",
                "correction failed",
            ))
        }
    }

    struct PassthroughCorrector;

    impl SpectrumCorrector for PassthroughCorrector {
        fn correct(
            &self,
            inputs: &CorrectionInputs<'_>,
        ) -> crate::domain::CorrectionResult<CorrectedPair> {
            Ok(CorrectedPair {
                sf: inputs.sf_data.spectrum.clone(),
                nsf: inputs.nsf_data.spectrum.clone(),
            })
        }
    }

    fn request() -> CorrectionRequest {
        CorrectionRequest {
            sf_data: "sf".to_string(),
            nsf_data: "nsf".to_string(),
            sf_calibration: "sf".to_string(),
            nsf_calibration: "nsf".to_string(),
            sf_background: "sf".to_string(),
            nsf_background: "nsf".to_string(),
            sf_output: "out_sf".to_string(),
            nsf_output: "out_nsf".to_string(),
        }
    }

    fn populated_store() -> WorkspaceStore {
        let spectrum = Spectrum::from_counts(
            vec![1.0, 2.0],
            DetectorBank::uniform(2, 0.0, 5.0, 0.8),
            SampleLogs::new(),
        )
        .expect("spectrum");
        let mut store = WorkspaceStore::new();
        store.insert("sf", spectrum.clone()).expect("sf");
        store.insert("nsf", spectrum).expect("nsf");
        store
    }

    #[test]
    fn store_adapter_preserves_corrector_errors() {
        let store = populated_store();
        let error = FailingCorrector
            .correct_by_name(&store, &request())
            .expect_err("corrector failure should propagate");

        assert_eq!(error.category(), CorrectionErrorCategory::ComputationError);
        assert_eq!(error.exit_code(), 4);
        assert_eq!(error.code(), "RUN.CORRECTION");
    }

    #[test]
    fn store_adapter_reports_unknown_names() {
        let mut store = populated_store();
        store.remove("nsf");

        let error = FailingCorrector
            .correct_by_name(&store, &request())
            .expect_err("missing workspace should fail");
        assert_eq!(
            error.configuration(),
            Some(&ConfigurationError::MissingWorkspace {
                role: InputRole::NsfData,
                name: "nsf".to_string()
            })
        );
    }

    #[test]
    fn publish_rejects_taken_or_equal_output_names() {
        let mut store = populated_store();
        let mut taken = request();
        taken.sf_output = "nsf".to_string();
        let error = FailingCorrector
            .publish_by_name(&mut store, &taken)
            .expect_err("taken name should fail");
        assert_eq!(error.code(), "INPUT.OUTPUT_NAME");

        let mut equal = request();
        equal.nsf_output = equal.sf_output.clone();
        let error = FailingCorrector
            .publish_by_name(&mut store, &equal)
            .expect_err("equal names should fail");
        assert_eq!(error.code(), "INPUT.OUTPUT_NAME");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn blank_output_name_leaves_store_untouched() {
        let mut store = populated_store();
        let mut blank = request();
        blank.nsf_output = "  ".to_string();

        let error = PassthroughCorrector
            .publish_by_name(&mut store, &blank)
            .expect_err("blank output name should fail");
        assert_eq!(
            error.configuration(),
            Some(&ConfigurationError::EmptyOutputName { channel: "NSF" })
        );
        assert_eq!(store.len(), 2);
        assert!(!store.contains("out_sf"));

        PassthroughCorrector
            .publish_by_name(&mut store, &request())
            .expect("valid names should publish");
        assert!(store.contains("out_sf") && store.contains("out_nsf"));
    }
}
