pub mod analysis;
pub mod params;
pub mod phase;
pub mod phase_vocoder;
pub mod spectrum;
pub mod synthesis;

pub use params::StretchPlan;
pub use phase::PhaseProcessor;
pub use phase_vocoder::PhaseVocoder;
pub use spectrum::SpectralMatrix;
