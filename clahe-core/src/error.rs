use thiserror::Error;

/// Errors raised at the `clahe-core` boundary.
///
/// The core never retries and never attempts partial output: any of these
/// variants means the call returned before touching the output buffer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClaheError {
  /// A clip limit, tile grid size, or image/tile-size relationship is out of contract.
  #[error("invalid parameter: {0}")]
  InvalidParameter(String),
  /// The input image is malformed (zero dimensions, or a raw buffer of the wrong length).
  #[error("invalid input: {0}")]
  InvalidInput(String),
  /// Reserved for assertion failures that should be unreachable outside debug builds.
  #[error("internal error: {0}")]
  InternalError(String),
}

pub type ClaheResult<T> = Result<T, ClaheError>;
