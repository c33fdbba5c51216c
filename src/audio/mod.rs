pub mod decoder;
pub mod resample;
pub mod silence;
