pub mod config;
pub mod correction;
pub mod serialization;
pub mod store;

mod traits;

pub use correction::{
    CorrectedPair, CorrectionInputs, CorrectionParameters, CorrectionRequest,
    FlippingRatioCorrector, Measurement, correct, correct_by_name, publish_by_name,
};
pub use store::{StoreError, WorkspaceStore, normalization_name};
pub use traits::{SpectrumCorrector, StoreCorrector};
