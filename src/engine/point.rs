use chrono::{DateTime, Utc};

/// One sample of a simulated price path.
///
/// Markers are set by the reconciler when a trade opens or closes on this sample; they always
/// carry the sample's own price.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    timestamp: DateTime<Utc>,
    price: f64,
    volume: f64,
    open_marker: Option<f64>,
    close_marker: Option<f64>,
}

impl From<(DateTime<Utc>, f64, f64)> for PricePoint {
    fn from((timestamp, price, volume): (DateTime<Utc>, f64, f64)) -> Self {
        Self {
            timestamp,
            price,
            volume,
            open_marker: None,
            close_marker: None,
        }
    }
}

impl PricePoint {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn open_marker(&self) -> Option<f64> {
        self.open_marker
    }

    pub fn close_marker(&self) -> Option<f64> {
        self.close_marker
    }

    /// Marks a trade opening here and returns the marked price.
    pub(crate) fn mark_open(&mut self) -> f64 {
        self.open_marker = Some(self.price);
        self.price
    }

    /// Marks a trade closing here and returns the marked price.
    pub(crate) fn mark_close(&mut self) -> f64 {
        self.close_marker = Some(self.price);
        self.price
    }
}

#[cfg(test)]
#[test]
fn markers_carry_own_price() {
    let mut point = PricePoint::from((DateTime::default(), 101.25, 12.0));
    assert!(point.open_marker().is_none());
    assert!(point.close_marker().is_none());

    assert_eq!(point.mark_open(), 101.25);
    assert_eq!(point.open_marker(), Some(101.25));
    assert!(point.close_marker().is_none());

    assert_eq!(point.mark_close(), 101.25);
    assert_eq!(point.close_marker(), Some(101.25));
}
