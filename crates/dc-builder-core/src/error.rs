use thiserror::Error;

/// Required UI elements are absent; the controller refuses to start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing modal nodes: {}", .0.join(", "))]
    MissingElements(Vec<&'static str>),
}

/// Failure of a single storefront request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("rejected by server: {0}")]
    Rejected(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalculationError {
    #[error("no product selected")]
    MissingProduct,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    Busy,
    #[error("no price available for the current selection")]
    PricingUnavailable,
    #[error("add to cart failed: {0}")]
    Cart(#[source] ApiError),
}
