use crate::domain::{PotentialError, PotentialResult};

/// Checks requested symbols against the stored set, keeping the caller's
/// order, length and any repeats.
///
/// Only literal stored symbols are accepted. A wildcard or a bare element
/// name that is not itself a stored symbol is rejected rather than expanded.
pub fn normalize_symbols(stored: &[String], requested: &[String]) -> PotentialResult<Vec<String>> {
    requested
        .iter()
        .map(|symbol| {
            if stored.iter().any(|candidate| candidate == symbol) {
                Ok(symbol.clone())
            } else {
                Err(PotentialError::UnknownSymbol {
                    symbol: symbol.clone(),
                })
            }
        })
        .collect()
}
