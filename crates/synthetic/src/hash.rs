/// A stable offset in `0..1000` derived from an instrument symbol.
///
/// 32-bit wrapping `h * 31 + unit` over the UTF-16 code units, then the
/// absolute value of the (sign-preserving) remainder mod 1000.
pub fn instrument_offset(symbol: &str) -> i64 {
    let hash = symbol.encode_utf16().fold(0_i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    });
    i64::from((hash % 1000).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_symbols() {
        assert_eq!(instrument_offset("SPY"), 332);
        assert_eq!(instrument_offset("QQQ"), 433);
        assert_eq!(instrument_offset("GLD"), 655);
        assert_eq!(instrument_offset("EURUSD=X"), 31);
        assert_eq!(instrument_offset("^GSPC"), 445);
        assert_eq!(instrument_offset("BTC-USD"), 314);
    }

    #[test]
    fn empty_symbol_has_zero_offset() {
        assert_eq!(instrument_offset(""), 0);
    }

    #[test]
    fn long_symbols_stay_in_range() {
        let offset = instrument_offset("A-VERY-LONG-INSTRUMENT-SYMBOL-THAT-OVERFLOWS");
        assert!((0..1000).contains(&offset));
    }
}
