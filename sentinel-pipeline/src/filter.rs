use crate::util;

/// Result of a filter operation, partitioning candidates into kept and removed.
#[derive(Debug, Clone)]
pub struct FilterResult<C> {
    pub kept: Vec<C>,
    pub removed: Vec<C>,
}

/// Filters partition candidates into kept and removed sets.
pub trait Filter<C>: Send + Sync {
    /// Evaluate each candidate. Kept candidates continue to the next stage;
    /// removed candidates are excluded from further processing but stay
    /// available for reporting.
    fn filter(&self, candidates: Vec<C>) -> FilterResult<C>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
