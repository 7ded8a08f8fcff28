use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use tracing::trace;

use crate::plural::PluralRule;

/// A caller-supplied plural selector, taking precedence over the rule.
pub type PluralResolver = Arc<dyn Fn(u64) -> usize + Send + Sync>;

/// Plural selection state of a catalog: the compiled rule and an optional
/// override.
#[derive(Clone, Default)]
pub(crate) struct PluralState {
    pub(crate) rule: PluralRule,
    pub(crate) resolver: Option<PluralResolver>,
}

impl PluralState {
    /// The plural-form index for `n`, or `None` on a miss.
    ///
    /// The custom resolver wins over the compiled rule. Either way an index
    /// not below the declared number of forms is a miss.
    pub(crate) fn select(&self, n: u64) -> Option<usize> {
        let index = match &self.resolver {
            Some(resolver) => resolver(n),
            None => {
                let index = self.rule.select(n);
                if index.is_none() {
                    trace!(n, rule = %self.rule, "plural rule has no form for count");
                }
                return index;
            }
        };
        match self.rule.nplurals() {
            Some(count) if index >= count => {
                trace!(n, index, nplurals = count, "custom plural resolver out of range");
                None
            }
            _ => Some(index),
        }
    }

    pub(crate) fn nplurals(&self) -> Option<usize> {
        self.rule.nplurals()
    }
}

impl Debug for PluralState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PluralState")
            .field("rule", &self.rule)
            .field("resolver", &self.resolver.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

/// The index the default two-form rule picks for `n`.
pub(crate) fn default_index(n: u64) -> usize {
    usize::from(n != 1)
}
