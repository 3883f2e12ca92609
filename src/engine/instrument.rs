use std::{fmt, str::FromStr};

use crate::errors::{Error, Result};

/// A traded pair and the price its simulated path starts from.
///
/// Deserializing resolves the symbol through [`Instrument::lookup`]; the table's base price wins
/// over any price in the input.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "InstrumentRef")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instrument {
    symbol: &'static str,
    base_price: f64,
}

impl Instrument {
    /// Every pair the dashboard displays, in display order.
    pub const ALL: [Instrument; 6] = [
        Instrument::new("BTC/USDT", 67_250.0),
        Instrument::new("ETH/USDT", 3_480.0),
        Instrument::new("SOL/USDT", 152.4),
        Instrument::new("BNB/USDT", 584.1),
        Instrument::new("AVAX/USDT", 35.6),
        Instrument::new("LINK/USDT", 14.85),
    ];

    const fn new(symbol: &'static str, base_price: f64) -> Self {
        Self { symbol, base_price }
    }

    /// Returns the pair symbol, e.g. `BTC/USDT`.
    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// Returns the base price the generators start from.
    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    /// Finds a pair in the instrument table.
    ///
    /// Matching ignores case and the separator, so `btc-usdt`, `BTCUSDT` and `BTC/USDT`
    /// resolve to the same pair.
    ///
    /// ### Example
    /// ```rust
    /// use trade_timeline::prelude::*;
    ///
    /// let btc = Instrument::lookup("btc-usdt").unwrap();
    /// assert_eq!(btc.symbol(), "BTC/USDT");
    /// assert!(Instrument::lookup("FOO/BAR").is_err());
    /// ```
    pub fn lookup(symbol: &str) -> Result<Self> {
        let wanted = normalize(symbol);
        Self::ALL
            .iter()
            .find(|i| normalize(i.symbol) == wanted)
            .copied()
            .ok_or_else(|| Error::UnknownInstrument(symbol.to_string()))
    }
}

impl FromStr for Instrument {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(s)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct InstrumentRef {
    symbol: String,
}

#[cfg(feature = "serde")]
impl TryFrom<InstrumentRef> for Instrument {
    type Error = Error;

    fn try_from(value: InstrumentRef) -> Result<Self> {
        Self::lookup(&value.symbol)
    }
}

fn normalize(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
#[test]
fn lookup_accepts_separators_and_case() {
    let eth = Instrument::lookup("eth/usdt").unwrap();
    assert_eq!(eth.symbol(), "ETH/USDT");
    assert_eq!(Instrument::lookup("ETHUSDT").unwrap(), eth);
    assert_eq!("Eth-Usdt".parse::<Instrument>().unwrap(), eth);
}

#[cfg(test)]
#[test]
fn lookup_unknown_pair() {
    let err = Instrument::lookup("DOGE/USDT").unwrap_err();
    assert!(matches!(err, Error::UnknownInstrument(s) if s == "DOGE/USDT"));
}

#[cfg(test)]
#[test]
fn table_prices_are_positive() {
    assert!(Instrument::ALL.iter().all(|i| i.base_price() > 0.0));
    assert_eq!(Instrument::ALL[0].to_string(), "BTC/USDT");
}

#[cfg(all(test, feature = "serde"))]
#[test]
fn deserialize_through_lookup() {
    let sol = serde_json::to_string(&Instrument::ALL[2]).unwrap();
    assert_eq!(serde_json::from_str::<Instrument>(&sol).unwrap(), Instrument::ALL[2]);

    let repriced = r#"{"symbol":"link-usdt","base_price":1.0}"#;
    assert_eq!(serde_json::from_str::<Instrument>(repriced).unwrap(), Instrument::ALL[5]);
    assert!(serde_json::from_str::<Instrument>(r#"{"symbol":"DOGE/USDT"}"#).is_err());
}
