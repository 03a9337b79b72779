//! Ordered text-decoding fallback for the plain-text endpoints.
//!
//! Sina serves UTF-8 or GBK depending on edge node; Tencent is almost
//! always GBK. Each provider declares its preferred order and the chain
//! falls back until something decodes cleanly, ending with a lossy UTF-8
//! pass so a response is never dropped for encoding reasons alone.

use encoding_rs::GBK;

/// Preferred decode order for a provider's response bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOrder {
    /// Try strict UTF-8 first, then GBK, then lossy UTF-8.
    Utf8First,
    /// Try GBK first, then strict UTF-8, then lossy UTF-8.
    GbkFirst,
}

/// Decode response bytes through the fallback chain for `order`.
pub fn decode_text(bytes: &[u8], order: DecodeOrder) -> String {
    match order {
        DecodeOrder::Utf8First => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => {
                let (decoded, _, had_errors) = GBK.decode(bytes);
                if had_errors {
                    String::from_utf8_lossy(bytes).into_owned()
                } else {
                    decoded.into_owned()
                }
            }
        },
        DecodeOrder::GbkFirst => {
            let (decoded, _, had_errors) = GBK.decode(bytes);
            if !had_errors {
                return decoded.into_owned();
            }
            match std::str::from_utf8(bytes) {
                Ok(s) => s.to_string(),
                Err(_) => String::from_utf8_lossy(bytes).into_owned(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_round_trip() {
        let text = "var hq_str_sh600519=\"贵州茅台,1700.00\"";
        assert_eq!(decode_text(text.as_bytes(), DecodeOrder::Utf8First), text);
    }

    #[test]
    fn test_gbk_payload_via_utf8_first_chain() {
        let text = "贵州茅台";
        let (gbk_bytes, _, _) = GBK.encode(text);
        // Not valid UTF-8, so the chain falls through to GBK.
        assert!(std::str::from_utf8(&gbk_bytes).is_err());
        assert_eq!(decode_text(&gbk_bytes, DecodeOrder::Utf8First), text);
    }

    #[test]
    fn test_gbk_first_decodes_gbk() {
        let text = "v_sh600519=\"1~贵州茅台~600519\"";
        let (gbk_bytes, _, _) = GBK.encode(text);
        assert_eq!(decode_text(&gbk_bytes, DecodeOrder::GbkFirst), text);
    }

    #[test]
    fn test_ascii_identical_under_both_orders() {
        let text = "v_sz000858=\"plain ascii\"";
        assert_eq!(decode_text(text.as_bytes(), DecodeOrder::Utf8First), text);
        assert_eq!(decode_text(text.as_bytes(), DecodeOrder::GbkFirst), text);
    }

    #[test]
    fn test_garbage_never_panics() {
        let bytes = [0xff, 0xfe, 0x80, 0x81];
        let _ = decode_text(&bytes, DecodeOrder::Utf8First);
        let _ = decode_text(&bytes, DecodeOrder::GbkFirst);
    }
}
