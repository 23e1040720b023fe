//! Option-chain payload model.
//!
//! Only the aggregate open-interest totals under `filtered` are decoded; the
//! per-strike rows and everything else in the response are ignored.

use serde::Deserialize;

use crate::error::FetchError;

#[derive(Debug, Deserialize)]
pub struct OptionChainResponse {
    pub filtered: FilteredTotals,
}

#[derive(Debug, Deserialize)]
pub struct FilteredTotals {
    #[serde(rename = "CE")]
    pub ce: TypeTotals,
    #[serde(rename = "PE")]
    pub pe: TypeTotals,
}

#[derive(Debug, Deserialize)]
pub struct TypeTotals {
    #[serde(rename = "totOI")]
    pub tot_oi: u64,
}

/// Call and put open-interest totals, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenInterestTotals {
    pub ce: u64,
    pub pe: u64,
}

/// Decode the CE/PE totals from a raw option-chain body.
///
/// The totals must be non-negative JSON integers at `filtered.CE.totOI` and
/// `filtered.PE.totOI`.
pub fn parse_open_interest(body: &[u8]) -> Result<OpenInterestTotals, FetchError> {
    let response: OptionChainResponse =
        serde_json::from_slice(body).map_err(|e| FetchError::MalformedBody(e.to_string()))?;

    Ok(OpenInterestTotals {
        ce: response.filtered.ce.tot_oi,
        pe: response.filtered.pe.tot_oi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_totals() {
        let body = br#"{"filtered":{"CE":{"totOI":100},"PE":{"totOI":200}}}"#;
        let totals = parse_open_interest(body).unwrap();
        assert_eq!(totals, OpenInterestTotals { ce: 100, pe: 200 });
    }

    #[test]
    fn test_parse_ignores_unrelated_fields() {
        let body = br#"{
            "records": {"expiryDates": ["28-Aug-2025"], "data": []},
            "filtered": {
                "data": [{"strikePrice": 24000}],
                "CE": {"totOI": 1234567, "totVol": 99},
                "PE": {"totOI": 7654321, "totVol": 11}
            }
        }"#;
        let totals = parse_open_interest(body).unwrap();
        assert_eq!(totals.ce, 1234567);
        assert_eq!(totals.pe, 7654321);
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let body = br#"{"filtered":{"CE":{"totOI":100}}}"#;
        let err = parse_open_interest(body).unwrap_err();
        assert!(matches!(err, FetchError::MalformedBody(_)));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_open_interest(b"<html>Access Denied</html>").unwrap_err();
        assert!(matches!(err, FetchError::MalformedBody(_)));

        // NSE answers an empty object when the session is half-established.
        let err = parse_open_interest(b"{}").unwrap_err();
        assert!(matches!(err, FetchError::MalformedBody(_)));
    }

    #[test]
    fn test_parse_rejects_negative_and_fractional_values() {
        let negative = br#"{"filtered":{"CE":{"totOI":-1},"PE":{"totOI":2}}}"#;
        assert!(matches!(
            parse_open_interest(negative),
            Err(FetchError::MalformedBody(_))
        ));

        let fractional = br#"{"filtered":{"CE":{"totOI":1.5},"PE":{"totOI":2}}}"#;
        assert!(matches!(
            parse_open_interest(fractional),
            Err(FetchError::MalformedBody(_))
        ));

        let integral_float = br#"{"filtered":{"CE":{"totOI":100},"PE":{"totOI":100.0}}}"#;
        assert!(matches!(
            parse_open_interest(integral_float),
            Err(FetchError::MalformedBody(_))
        ));
    }
}
