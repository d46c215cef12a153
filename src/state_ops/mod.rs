/// Gate kernels applied in place to amplitude buffers.
pub mod matrix_ops;
/// Measurement probabilities and shot sampling.
pub mod measurement_ops;
