use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Position files must exist. A missing file is a hard failure,
    /// not a diagnostic.
    #[error("cannot open \"{path}\": {source}")]
    FileOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Date string did not match the requested format.
    #[error("failed to parse date \"{0}\"")]
    DateParsing(String),

    /// The seed latitude falls outside both polar stereographic
    /// domains. Mid latitude stations require an explicit EPSG code.
    #[error("no default EPSG for latitude {0:.3}°, supply one explicitly")]
    UnresolvedEpsg(f64),

    /// Only the two polar stereographic systems are supported.
    #[error("unsupported EPSG code {0}")]
    UnsupportedEpsg(u16),

    /// Failed to parse time series method
    #[error("invalid method \"{0}\", must be point or regression")]
    InvalidMethod(String),

    /// Time series sampling interval must be strictly positive.
    #[error("non positive sampling interval ({0} h)")]
    NonPositiveSamplingInterval(f64),
}
