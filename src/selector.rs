pub mod source;
pub mod weighted_random;

use log::{debug, error, trace};
use serde::Serialize;
use source::{RandomSource, ThreadRngSource};
use weighted_random::pick_index;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("selector needs at least one item")]
    NoItems,
    #[error("{labels} labels but {weights} weights")]
    LengthMismatch { labels: usize, weights: usize },
    #[error("weight for '{label}' is negative ({weight})")]
    NegativeWeight { label: String, weight: i64 },
    #[error("weight for '{label}' does not fit in 32 bits ({weight})")]
    WeightTooLarge { label: String, weight: i64 },
    #[error("every weight is zero")]
    ZeroTotalWeight,
    #[error("sample {sample} fell outside every interval (total weight {total})")]
    ScanExhausted { sample: u64, total: u64 },
}

/// A label, its weight, and how many times it has been drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub label: String,
    pub weight: u32,
    pub count: u64,
}

/// Observed against expected selection fraction for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub weight: u32,
    pub count: u64,
    pub observed: f64,
    pub expected: f64,
}

///
/// Draws labels with probability proportional to their weight, with replacement.
///
/// The item table is fixed at construction. Each draw takes one sample in
/// `0..total_weight` from the source and walks the cumulative weights to
/// find the owning item, whose count is then incremented.
///
#[derive(Debug)]
pub struct WeightedSelector<S: RandomSource = ThreadRngSource> {
    items: Vec<Item>,
    total_weight: u64,
    source: S,
}

impl WeightedSelector<ThreadRngSource> {
    /// Builds a selector drawing from the OS-seeded thread RNG.
    pub fn new<L: Into<String>>(items: Vec<(L, u32)>) -> Result<Self, SelectorError> {
        Self::with_source(items, ThreadRngSource)
    }

    ///
    /// Builds a selector from separate label and weight lists.
    ///
    /// The lists must be the same length and every weight must fit in a `u32`.
    ///
    pub fn from_columns(labels: &[&str], weights: &[i64]) -> Result<Self, SelectorError> {
        if labels.len() != weights.len() {
            return Err(SelectorError::LengthMismatch {
                labels: labels.len(),
                weights: weights.len(),
            });
        }
        let items = labels
            .iter()
            .zip(weights)
            .map(|(label, weight)| {
                if *weight < 0 {
                    return Err(SelectorError::NegativeWeight {
                        label: label.to_string(),
                        weight: *weight,
                    });
                }
                u32::try_from(*weight)
                    .map(|w| (label.to_string(), w))
                    .map_err(|_| SelectorError::WeightTooLarge {
                        label: label.to_string(),
                        weight: *weight,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(items)
    }
}

impl<S: RandomSource> WeightedSelector<S> {
    /// Fails with a configuration error if there are no items or every weight is zero.
    pub fn with_source<L: Into<String>>(
        items: Vec<(L, u32)>,
        source: S,
    ) -> Result<Self, SelectorError> {
        if items.is_empty() {
            return Err(SelectorError::NoItems);
        }
        let items: Vec<Item> = items
            .into_iter()
            .map(|(label, weight)| Item {
                label: label.into(),
                weight,
                count: 0,
            })
            .collect();
        let total_weight: u64 = items.iter().map(|item| u64::from(item.weight)).sum();
        if total_weight == 0 {
            return Err(SelectorError::ZeroTotalWeight);
        }
        debug!(
            "Selector built with {} items, total weight {}",
            items.len(),
            total_weight
        );
        Ok(WeightedSelector {
            items,
            total_weight,
            source,
        })
    }

    ///
    /// Draws one label and bumps its count.
    ///
    /// Returns `SelectorError::ScanExhausted` if the source hands back a sample
    /// past the total weight. No count changes in that case.
    ///
    pub fn draw(&mut self) -> Result<&str, SelectorError> {
        let sample = self.source.sample(self.total_weight);
        let index = match pick_index(self.items.iter().map(|item| item.weight), sample) {
            Some(index) => index,
            None => {
                error!(
                    "Sample {} is outside 0..{}, no item selected",
                    sample, self.total_weight
                );
                return Err(SelectorError::ScanExhausted {
                    sample,
                    total: self.total_weight,
                });
            }
        };
        trace!("Sample {} selects index {}", sample, index);
        let item = &mut self.items[index];
        item.count += 1;
        Ok(item.label.as_str())
    }

    pub fn draw_n(&mut self, n: usize) -> Result<Vec<String>, SelectorError> {
        (0..n).map(|_| self.draw().map(str::to_string)).collect()
    }

    /// Times each label has been drawn, in table order.
    pub fn counts(&self) -> Vec<(&str, u64)> {
        self.items
            .iter()
            .map(|item| (item.label.as_str(), item.count))
            .collect()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn total_draws(&self) -> u64 {
        self.items.iter().map(|item| item.count).sum()
    }

    pub fn shares(&self) -> Vec<Share> {
        let draws = self.total_draws();
        self.items
            .iter()
            .map(|item| Share {
                label: item.label.clone(),
                weight: item.weight,
                count: item.count,
                observed: if draws == 0 {
                    0.0
                } else {
                    item.count as f64 / draws as f64
                },
                expected: f64::from(item.weight) / self.total_weight as f64,
            })
            .collect()
    }

    ///
    /// Pearson's chi-square statistic of the counts against the weights.
    ///
    /// Zero-weight items are left out. Degrees of freedom are one less than
    /// the number of items with positive weight.
    ///
    pub fn chi_square(&self) -> f64 {
        let draws = self.total_draws() as f64;
        if draws == 0.0 {
            return 0.0;
        }
        self.items
            .iter()
            .filter(|item| item.weight > 0)
            .map(|item| {
                let expected = draws * f64::from(item.weight) / self.total_weight as f64;
                let diff = item.count as f64 - expected;
                diff * diff / expected
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::source::ScriptedSource;
    use super::*;

    fn fruit_items() -> Vec<(&'static str, u32)> {
        vec![
            ("Seven", 10),
            ("Bell", 15),
            ("Melon", 20),
            ("Plum", 25),
            ("Orange", 15),
            ("Lemon", 10),
            ("Cherry", 5),
        ]
    }

    fn scripted(samples: Vec<u64>) -> WeightedSelector<ScriptedSource> {
        WeightedSelector::with_source(fruit_items(), ScriptedSource::new(samples)).unwrap()
    }

    #[test]
    fn test_boundary_draws() {
        let mut selector = scripted(vec![9, 10, 99, 0]);
        assert_eq!(selector.draw().unwrap(), "Seven");
        assert_eq!(selector.draw().unwrap(), "Bell");
        assert_eq!(selector.draw().unwrap(), "Cherry");
        assert_eq!(selector.draw().unwrap(), "Seven");
    }

    #[test]
    fn test_one_draw_counts() {
        // 50 falls in Plum's interval 45..70
        let mut selector = scripted(vec![50]);
        assert_eq!(selector.draw().unwrap(), "Plum");
        let counts: Vec<u64> = selector.counts().iter().map(|(_, c)| *c).collect();
        assert_eq!(counts, vec![0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_counts_keep_order() {
        let selector = scripted(vec![]);
        let labels: Vec<&str> = selector.counts().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec!["Seven", "Bell", "Melon", "Plum", "Orange", "Lemon", "Cherry"]
        );
        assert_eq!(selector.total_weight(), 100);
        assert_eq!(selector.total_draws(), 0);
    }

    #[test]
    fn test_first_and_last_positive_weight() {
        let items = vec![("none", 0), ("first", 3), ("middle", 4), ("last", 2), ("tail", 0)];
        let mut selector =
            WeightedSelector::with_source(items, ScriptedSource::new(vec![0, 8])).unwrap();
        assert_eq!(selector.draw().unwrap(), "first");
        assert_eq!(selector.draw().unwrap(), "last");
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let result = WeightedSelector::new(vec![("a", 0), ("b", 0), ("c", 0)]);
        assert_eq!(result.unwrap_err(), SelectorError::ZeroTotalWeight);
    }

    #[test]
    fn test_empty_rejected() {
        let result = WeightedSelector::new(Vec::<(String, u32)>::new());
        assert_eq!(result.unwrap_err(), SelectorError::NoItems);
    }

    #[test]
    fn test_from_columns_validation() {
        assert_eq!(
            WeightedSelector::from_columns(&["a", "b"], &[1]).unwrap_err(),
            SelectorError::LengthMismatch {
                labels: 2,
                weights: 1
            }
        );
        assert_eq!(
            WeightedSelector::from_columns(&["a", "b"], &[1, -4]).unwrap_err(),
            SelectorError::NegativeWeight {
                label: "b".to_string(),
                weight: -4
            }
        );
        assert_eq!(
            WeightedSelector::from_columns(&["a"], &[i64::from(u32::MAX) + 1]).unwrap_err(),
            SelectorError::WeightTooLarge {
                label: "a".to_string(),
                weight: i64::from(u32::MAX) + 1
            }
        );
        assert_eq!(
            WeightedSelector::from_columns(&[], &[]).unwrap_err(),
            SelectorError::NoItems
        );
        let selector = WeightedSelector::from_columns(&["a", "b"], &[1, 3]).unwrap();
        assert_eq!(selector.total_weight(), 4);
    }

    #[test]
    fn test_out_of_range_sample_is_an_error() {
        let mut selector = scripted(vec![100, 3]);
        assert_eq!(
            selector.draw().unwrap_err(),
            SelectorError::ScanExhausted {
                sample: 100,
                total: 100
            }
        );
        assert_eq!(selector.total_draws(), 0);
        assert_eq!(selector.draw().unwrap(), "Seven");
        assert_eq!(selector.total_draws(), 1);
    }

    #[test]
    fn test_draw_n_and_totals() {
        let mut selector = scripted(vec![0, 30, 60, 99]);
        let drawn = selector.draw_n(4).unwrap();
        assert_eq!(drawn, vec!["Seven", "Melon", "Plum", "Cherry"]);
        assert_eq!(selector.source.remaining(), 0);
        // the rest come from the thread RNG once the script runs out
        selector.draw_n(96).unwrap();
        assert_eq!(selector.source.drawn(), 100);
        assert_eq!(selector.total_draws(), 100);
    }

    #[test]
    fn test_shares_and_chi_square() {
        let mut selector = WeightedSelector::with_source(
            vec![("a", 1), ("b", 3)],
            ScriptedSource::new(vec![0, 1, 2, 3]),
        )
        .unwrap();
        assert_eq!(selector.chi_square(), 0.0);
        selector.draw_n(4).unwrap();
        let shares = selector.shares();
        assert_eq!(shares[0].count, 1);
        assert_eq!(shares[0].observed, 0.25);
        assert_eq!(shares[0].expected, 0.25);
        assert_eq!(shares[1].observed, 0.75);
        assert!(selector.chi_square().abs() < 1e-12);
    }

    #[test]
    fn test_chi_square_skips_zero_weight() {
        let mut selector = WeightedSelector::with_source(
            vec![("a", 1), ("never", 0), ("b", 1)],
            ScriptedSource::new(vec![0, 0]),
        )
        .unwrap();
        selector.draw_n(2).unwrap();
        // expected 1 each, observed 2 and 0
        assert!((selector.chi_square() - 2.0).abs() < 1e-12);
    }
}
