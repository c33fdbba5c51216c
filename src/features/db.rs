use ndarray::Array2;

/// Power floor applied before taking logarithms.
pub const AMIN: f64 = 1e-10;
/// Dynamic range kept below the peak of a log-mel matrix.
pub const TOP_DB: f64 = 80.0;

/// Convert a power spectrogram to dB relative to its own maximum.
///
/// Values are `10 * log10(max(AMIN, s)) - 10 * log10(max(AMIN, max(s)))`,
/// then clamped from below at `max_db - top_db` when `top_db` is given.
pub fn power_to_db(power: &Array2<f64>, top_db: Option<f64>) -> Array2<f64> {
    let reference = power.iter().copied().fold(0.0_f64, f64::max);
    let reference_db = 10.0 * reference.max(AMIN).log10();
    let mut log_spec = power.mapv(|value| 10.0 * value.max(AMIN).log10() - reference_db);

    if let Some(range) = top_db {
        let peak = log_spec.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if peak.is_finite() {
            let floor = peak - range;
            log_spec.mapv_inplace(|value| value.max(floor));
        }
    }
    log_spec
}
