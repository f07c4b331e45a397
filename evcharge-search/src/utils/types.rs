/// Alias to a scalar floating type.
///
/// NOTE: `f64` is kept as the default floating type: objective values mix magnitudes
/// (monetary cost vs. percentages) and `f32` loses too much precision on their sums.
pub type Float = f64;
