use serde::{Deserialize, Serialize};

/// Look-back used for RSI when the caller does not pick one
pub const DEFAULT_RSI_WINDOW: usize = 14;

/// Indicator values aligned 1:1 with the input samples; `None` where the
/// look-back window is not yet filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSeries(Vec<Option<f64>>);

impl IndicatorSeries {
    pub fn undefined(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }

    /// Value at the final position, if that position is defined
    pub fn latest(&self) -> Option<f64> {
        self.0.last().copied().flatten()
    }

    pub fn defined(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().filter_map(|v| *v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Option<f64>>> for IndicatorSeries {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }
}

/// Simple Moving Average
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// Trailing simple moving average aligned with `data`: the first
/// `window - 1` positions are undefined.
pub fn rolling_mean(data: &[f64], window: usize) -> IndicatorSeries {
    if window == 0 || data.len() < window {
        return IndicatorSeries::undefined(data.len());
    }

    let mut values = vec![None; window - 1];
    values.extend(sma(data, window).into_iter().map(Some));
    IndicatorSeries(values)
}

/// Relative Strength Index, simple-moving-average variant.
///
/// Gains and losses are the `n - 1` first differences of `closes`; each is
/// averaged over a trailing `window` of differences. The first close has no
/// predecessor, so output is aligned with `closes` and undefined for the
/// first `window` positions.
///
/// A zero window, or a series with no more than `window` closes, yields an
/// entirely undefined series.
pub fn rsi(closes: &[f64], window: usize) -> IndicatorSeries {
    let n = closes.len();
    if window == 0 || n <= window {
        return IndicatorSeries::undefined(n);
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|pair| {
            let change = pair[1] - pair[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let avg_gain = rolling_mean(&gains, window);
    let avg_loss = rolling_mean(&losses, window);

    let mut values = Vec::with_capacity(n);
    values.push(None);
    values.extend(avg_gain.values().iter().zip(avg_loss.values()).map(|(gain, loss)| match (gain, loss) {
        (Some(g), Some(l)) => Some(rsi_from_averages(*g, *l)),
        _ => None,
    }));
    values.into()
}

/// RSI from a pair of window averages.
///
/// A window without losses saturates at 100, a flat window included.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Most recent RSI value of a close series, if enough history exists
pub fn latest_rsi(closes: &[f64], window: usize) -> Option<f64> {
    rsi(closes, window).latest()
}
