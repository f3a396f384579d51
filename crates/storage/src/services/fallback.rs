//! Ordered fallback over data sources whose read permissions vary.
//!
//! Each [`Resolver`] is one way of answering a lookup (an RPC that bypasses
//! row-level security, a direct query, a full scan). A [`ResolverChain`] asks
//! them in order and keeps the first one that succeeds with a value.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait Resolver<K, V>: Send + Sync
where
    K: Sync + ?Sized,
{
    /// Short label used in diagnostics.
    fn name(&self) -> &'static str;

    /// `Ok(None)` means "no answer here, try the next one".
    async fn resolve(&self, key: &K) -> Result<Option<V>>;
}

pub struct ResolverChain<K: Sync + ?Sized, V> {
    resolvers: Vec<Box<dyn Resolver<K, V>>>,
}

impl<K, V> ResolverChain<K, V>
where
    K: std::fmt::Debug + Sync + ?Sized,
{
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    pub fn with(mut self, resolver: impl Resolver<K, V> + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Returns the first successful answer, or `None` when every resolver
    /// failed or had nothing.
    pub async fn resolve(&self, key: &K) -> Option<V> {
        for resolver in &self.resolvers {
            match resolver.resolve(key).await {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {
                    tracing::debug!(resolver = resolver.name(), ?key, "resolver had no value");
                }
                Err(e) => {
                    tracing::debug!(resolver = resolver.name(), ?key, error = %e, "resolver failed");
                }
            }
        }

        None
    }
}

impl<K, V> Default for ResolverChain<K, V>
where
    K: std::fmt::Debug + Sync + ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}
