use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trailing-window statistics at every return of a series.
///
/// `labels` are the source dates minus the first; each metric vector is
/// aligned 1:1 with them. Points before the window fills are `None` (JSON
/// `null`), never a placeholder zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RollingSeries {
    pub labels: Vec<NaiveDate>,
    pub sharpe: Vec<Option<f64>>,
    pub volatility: Vec<Option<f64>>,
    pub beta: Vec<Option<f64>>,
}

impl RollingSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of the first defined point, if the window ever fills.
    pub fn first_defined(&self) -> Option<usize> {
        self.sharpe.iter().position(Option::is_some)
    }
}

/// Pairwise return correlation in caller order.
///
/// Square and symmetric, with ones on the diagonal. `None` marks pairs with
/// fewer than two overlapping returns or no variance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub ids: Vec<String>,
    pub matrix: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.matrix.get(i)?.get(j).copied().flatten()
    }

    /// Looks a pair up by strategy id.
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.ids.iter().position(|id| id == a)?;
        let j = self.ids.iter().position(|id| id == b)?;
        self.get(i, j)
    }
}
