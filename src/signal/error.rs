//! Typed failures for signal normalization and parsing.
//!
//! Every variant is an expected, user-correctable condition: the caller
//! reports the reason verbatim to the message author and drops the signal.
//! Parsing is never retried.

/// Why an inbound message could not be parsed into a trade signal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    #[error("signal has fewer than 3 usable lines")]
    EmptyInput,
    #[error("no recognizable order type in the first 3 lines")]
    UnrecognizedOrderType,
    #[error("unknown or unsupported symbol in {0:?}")]
    UnknownSymbol(String),
    #[error("no take-profit level found")]
    MissingTakeProfit,
    #[error("no stop-loss level found")]
    MissingStopLoss,
    #[error("expected a number for {what}, got {token:?}")]
    NumericParse { what: &'static str, token: String },
}
