use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::classifier::RouterConfig;
use crate::keywords::Category;

/// Reply pools keyed by canonical category name.
#[derive(Debug, Clone, Default)]
pub struct ReplyPools {
    pools: HashMap<String, Vec<String>>,
}

impl ReplyPools {
    pub fn from_categories<'a>(categories: impl IntoIterator<Item = &'a Category>) -> Self {
        let pools = categories
            .into_iter()
            .map(|c| (c.name.clone(), c.replies.clone()))
            .collect();
        Self { pools }
    }

    /// Pools for every greeting and interaction category of a router config.
    pub fn from_config(config: &RouterConfig) -> Self {
        Self::from_categories(config.greetings.iter().chain(config.interactions.iter()))
    }

    /// Pick one reply uniformly from the category's pool.
    ///
    /// Returns `None` for an unknown category or an empty pool.
    pub fn pick<R: Rng + ?Sized>(&self, category: &str, rng: &mut R) -> Option<&str> {
        self.pools
            .get(category)?
            .choose(rng)
            .map(String::as_str)
    }

    pub fn replies(&self, category: &str) -> &[String] {
        self.pools.get(category).map(Vec::as_slice).unwrap_or(&[])
    }
}
