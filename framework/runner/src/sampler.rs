use anyhow::Context;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Picks values from a fixed set with probability proportional to their weight.
#[derive(Debug, Clone)]
pub struct WeightedSampler<T> {
    values: Vec<T>,
    index: WeightedIndex<u32>,
}

impl<T> WeightedSampler<T> {
    /// Fails if there are no entries or every weight is zero.
    pub fn new(entries: impl IntoIterator<Item = (T, u32)>) -> anyhow::Result<Self> {
        let (values, weights): (Vec<T>, Vec<u32>) = entries.into_iter().unzip();
        let index = WeightedIndex::new(&weights).context("Invalid sampling weights")?;

        Ok(Self { values, index })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.values[self.index.sample(rng)]
    }
}
