use serde::{Deserialize, Serialize};

//one fixed-width bucket of pct returns, [lower, upper) except the last which is closed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

//distribution of per-trade pct returns, ready for a plotter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnHistogram {
    pub bins: Vec<HistogramBin>,
}

impl ReturnHistogram {
    pub fn from_returns(returns: &[f64], num_bins: usize) -> Self {
        let values: Vec<f64> = returns.iter().copied().filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return ReturnHistogram::default();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        //every return identical: a single degenerate bin
        if min == max {
            return ReturnHistogram {
                bins: vec![HistogramBin {
                    lower: min,
                    upper: max,
                    count: values.len(),
                }],
            };
        }

        let num_bins = num_bins.max(1);
        let width = (max - min) / num_bins as f64;

        let mut bins: Vec<HistogramBin> = (0..num_bins)
            .map(|i| HistogramBin {
                lower: min + width * i as f64,
                upper: if i + 1 == num_bins {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for value in values {
            let index = (((value - min) / width).floor() as usize).min(num_bins - 1);
            bins[index].count += 1;
        }

        ReturnHistogram { bins }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}
