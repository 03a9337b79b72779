//! Code normalization and provider-specific symbol mapping.
//!
//! User-entered codes come in two forms: bare 6-digit strings ("600519")
//! and canonical market-prefixed ones ("sh600519"). Every provider request
//! and every result-set lookup goes through [`normalize`] first so both
//! forms address the same instrument.

/// Canonicalize a user-entered code.
///
/// - Already prefixed with `sh`/`sz`: returned unchanged.
/// - Exactly 6 characters: prefixed with `sh` when the first character is
///   `'6'` (Shanghai listings), otherwise `sz`.
/// - Any other shape: returned unchanged and left to fail downstream
///   lookups, the same as any unrecognized code.
///
/// Pure and idempotent.
pub fn normalize(code: &str) -> String {
    if code.starts_with("sh") || code.starts_with("sz") {
        return code.to_string();
    }
    if code.len() == 6 {
        if code.starts_with('6') {
            format!("sh{}", code)
        } else {
            format!("sz{}", code)
        }
    } else {
        code.to_string()
    }
}

/// Strip the market prefix from a canonical code.
///
/// Returns the input unchanged when it carries no `sh`/`sz` prefix.
pub fn numeric_part(code: &str) -> &str {
    code.strip_prefix("sh")
        .or_else(|| code.strip_prefix("sz"))
        .unwrap_or(code)
}

/// Map a canonical code to Eastmoney's "market-digit.number" secid form.
///
/// Market digit `1` is Shanghai, `0` is Shenzhen. The composite index
/// (000001) and the CSI 300 (000300) are Shanghai-listed despite their
/// leading digit and are mapped explicitly. Non-canonical codes pass
/// through untouched.
pub fn eastmoney_secid(code: &str) -> String {
    if let Some(num) = code.strip_prefix("sh") {
        match num {
            "000001" => "1.000001".to_string(),
            "000300" => "1.000300".to_string(),
            _ => format!("1.{}", num),
        }
    } else if let Some(num) = code.strip_prefix("sz") {
        format!("0.{}", num)
    } else {
        code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_shanghai() {
        assert_eq!(normalize("600519"), "sh600519");
    }

    #[test]
    fn test_normalize_shenzhen() {
        assert_eq!(normalize("000858"), "sz000858");
        assert_eq!(normalize("300750"), "sz300750");
    }

    #[test]
    fn test_normalize_prefixed_passthrough() {
        assert_eq!(normalize("sh600000"), "sh600000");
        assert_eq!(normalize("sz399001"), "sz399001");
    }

    #[test]
    fn test_normalize_other_shapes_passthrough() {
        assert_eq!(normalize("60051"), "60051");
        assert_eq!(normalize("6005190"), "6005190");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for code in ["600519", "000858", "300750", "sh000001", "12345"] {
            assert_eq!(normalize(&normalize(code)), normalize(code));
        }
    }

    #[test]
    fn test_numeric_part() {
        assert_eq!(numeric_part("sh600519"), "600519");
        assert_eq!(numeric_part("sz000858"), "000858");
        assert_eq!(numeric_part("600519"), "600519");
    }

    #[test]
    fn test_secid_mapping() {
        assert_eq!(eastmoney_secid("sh600519"), "1.600519");
        assert_eq!(eastmoney_secid("sz000858"), "0.000858");
        assert_eq!(eastmoney_secid("sz399001"), "0.399001");
    }

    #[test]
    fn test_secid_index_overrides() {
        assert_eq!(eastmoney_secid("sh000001"), "1.000001");
        assert_eq!(eastmoney_secid("sh000300"), "1.000300");
    }

    #[test]
    fn test_secid_passthrough() {
        assert_eq!(eastmoney_secid("hk00700"), "hk00700");
    }
}
