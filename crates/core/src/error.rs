use thiserror::Error;

/// A raw alert field that could not be turned into its canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{field}: not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field}: negative values are not allowed: {value:?}")]
    NegativeNumber { field: &'static str, value: String },

    #[error("{field}: unrecognized timestamp: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("C/P: expected \"Call\" or \"Put\", got {0:?}")]
    InvalidOptionKind(String),

    #[error("Sym: symbol must be non-empty")]
    EmptySymbol,
}

/// Failure to retrieve daily bars for one symbol.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("HTTP {status} for {symbol}")]
    Http { symbol: String, status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected provider response: {0}")]
    ResponseFormat(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no rows to write: every symbol failed or no alerts were read")]
    NoRows,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
