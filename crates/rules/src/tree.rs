//! Rule trees as a closed sum type
//!
//! The generic combinators in [`combinators`](crate::combinators) are ideal
//! when the shape of a rule set is known at compile time. When the shape is
//! assembled at runtime (from configuration, feature flags, per-tenant
//! policy), [`RuleTree`] and [`AsyncRuleTree`] give one concrete type with a
//! variant per node kind, so trees can be built, inspected and matched
//! exhaustively.
//!
//! ```rust,ignore
//! use nebula_rules::tree::RuleTree;
//!
//! let tree = RuleTree::all([
//!     RuleTree::leaf(has_items),
//!     RuleTree::any([RuleTree::leaf(is_member), RuleTree::leaf(has_coupon)])?,
//! ])?;
//! assert_eq!(tree.leaf_count(), 3);
//! assert_eq!(tree.depth(), 3);
//! ```

use std::future::Future;

use futures::future::BoxFuture;

use crate::combinators::{And, Conditional, Or};
use crate::foundation::{
    AsyncRule, BoxAsyncRule, BoxRule, CancellationToken, Evaluation, Rule, UsageError,
};

// ============================================================================
// SYNC TREE
// ============================================================================

/// A synchronous rule tree.
///
/// Composite nodes are boxed; `And` and `Or` hold their first child inline,
/// so an unboxed tree would contain itself.
pub enum RuleTree<C: ?Sized, T = ()> {
    /// A leaf rule.
    Leaf(BoxRule<C, T>),
    /// Every child must pass.
    And(Box<And<RuleTree<C, T>>>),
    /// At least one child must pass.
    Or(Box<Or<RuleTree<C, T>>>),
    /// Branch on the primary's verdict.
    Conditional(Box<Conditional<RuleTree<C, T>>>),
}

impl<C: ?Sized, T> RuleTree<C, T> {
    /// Wraps a rule as a leaf.
    pub fn leaf<R>(rule: R) -> Self
    where
        R: Rule<Context = C, Output = T> + Send + Sync + 'static,
    {
        Self::Leaf(Box::new(rule))
    }

    /// An AND node over `children`.
    pub fn all(children: impl IntoIterator<Item = Self>) -> Result<Self, UsageError> {
        And::new(children).map(|node| Self::And(Box::new(node)))
    }

    /// An OR node over `children`.
    pub fn any(children: impl IntoIterator<Item = Self>) -> Result<Self, UsageError> {
        Or::new(children).map(|node| Self::Or(Box::new(node)))
    }

    /// A conditional node.
    pub fn branch(primary: Self, on_success: Option<Self>, on_failure: Option<Self>) -> Self {
        Self::Conditional(Box::new(Conditional::with_branches(
            primary, on_success, on_failure,
        )))
    }

    /// Number of leaf rules in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::And(node) => node.rules().map(Self::leaf_count).sum(),
            Self::Or(node) => node.rules().map(Self::leaf_count).sum(),
            Self::Conditional(node) => {
                node.primary().leaf_count()
                    + node.success_branch().map_or(0, Self::leaf_count)
                    + node.failure_branch().map_or(0, Self::leaf_count)
            }
        }
    }

    /// Length of the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::And(node) => 1 + node.rules().map(Self::depth).max().unwrap_or(0),
            Self::Or(node) => 1 + node.rules().map(Self::depth).max().unwrap_or(0),
            Self::Conditional(node) => {
                1 + std::iter::once(node.primary())
                    .chain(node.success_branch())
                    .chain(node.failure_branch())
                    .map(Self::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}

impl<C: ?Sized, T> Rule for RuleTree<C, T> {
    type Context = C;
    type Output = T;

    fn evaluate(&self, ctx: &C, cancel: &CancellationToken) -> Evaluation<T> {
        match self {
            Self::Leaf(rule) => rule.evaluate(ctx, cancel),
            Self::And(node) => node.evaluate(ctx, cancel),
            Self::Or(node) => node.evaluate(ctx, cancel),
            Self::Conditional(node) => node.evaluate(ctx, cancel),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Leaf(rule) => rule.name(),
            Self::And(_) => "and",
            Self::Or(_) => "or",
            Self::Conditional(_) => "conditional",
        }
    }
}

// ============================================================================
// ASYNC TREE
// ============================================================================

/// An asynchronous rule tree.
pub enum AsyncRuleTree<C: ?Sized, T = ()> {
    /// A leaf rule.
    Leaf(BoxAsyncRule<C, T>),
    /// Every child must pass.
    And(Box<And<AsyncRuleTree<C, T>>>),
    /// At least one child must pass.
    Or(Box<Or<AsyncRuleTree<C, T>>>),
    /// Branch on the primary's verdict.
    Conditional(Box<Conditional<AsyncRuleTree<C, T>>>),
}

impl<C, T> AsyncRuleTree<C, T>
where
    C: ?Sized + Sync,
    T: Send,
{
    /// Wraps an async rule as a leaf.
    pub fn leaf<R>(rule: R) -> Self
    where
        R: AsyncRule<Context = C, Output = T> + 'static,
    {
        Self::Leaf(Box::new(rule))
    }

    /// An AND node over `children`.
    pub fn all(children: impl IntoIterator<Item = Self>) -> Result<Self, UsageError> {
        And::new(children).map(|node| Self::And(Box::new(node)))
    }

    /// An OR node over `children`.
    pub fn any(children: impl IntoIterator<Item = Self>) -> Result<Self, UsageError> {
        Or::new(children).map(|node| Self::Or(Box::new(node)))
    }

    /// A conditional node.
    pub fn branch(primary: Self, on_success: Option<Self>, on_failure: Option<Self>) -> Self {
        Self::Conditional(Box::new(Conditional::with_branches(
            primary, on_success, on_failure,
        )))
    }

    /// Number of leaf rules in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::And(node) => node.rules().map(Self::leaf_count).sum(),
            Self::Or(node) => node.rules().map(Self::leaf_count).sum(),
            Self::Conditional(node) => {
                node.primary().leaf_count()
                    + node.success_branch().map_or(0, Self::leaf_count)
                    + node.failure_branch().map_or(0, Self::leaf_count)
            }
        }
    }

    /// Length of the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::And(node) => 1 + node.rules().map(Self::depth).max().unwrap_or(0),
            Self::Or(node) => 1 + node.rules().map(Self::depth).max().unwrap_or(0),
            Self::Conditional(node) => {
                1 + std::iter::once(node.primary())
                    .chain(node.success_branch())
                    .chain(node.failure_branch())
                    .map(Self::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    // Recursion goes through a boxed future with a concrete type; an opaque
    // `impl Future` that awaits itself would have infinite size.
    fn evaluate_node<'a>(
        &'a self,
        ctx: &'a C,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Evaluation<T>> {
        Box::pin(async move {
            match self {
                Self::Leaf(rule) => rule.evaluate(ctx, cancel).await,
                Self::And(node) => node.evaluate(ctx, cancel).await,
                Self::Or(node) => node.evaluate(ctx, cancel).await,
                Self::Conditional(node) => node.evaluate(ctx, cancel).await,
            }
        })
    }
}

impl<C, T> AsyncRule for AsyncRuleTree<C, T>
where
    C: ?Sized + Sync,
    T: Send,
{
    type Context = C;
    type Output = T;

    fn evaluate(
        &self,
        ctx: &C,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Evaluation<T>> + Send {
        async move { self.evaluate_node(ctx, cancel).await }
    }

    fn name(&self) -> &str {
        match self {
            Self::Leaf(rule) => AsyncRule::name(rule),
            Self::And(_) => "and",
            Self::Or(_) => "or",
            Self::Conditional(_) => "conditional",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{async_rule_fn, ensure};
    use crate::foundation::{RuleError, RuleResult};

    fn above(min: i32) -> RuleTree<i32> {
        RuleTree::leaf(ensure(
            move |n: &i32| *n > min,
            RuleError::validation(format!("above_{min}"), "Too small"),
        ))
    }

    #[test]
    fn test_tree_shape() {
        let tree = RuleTree::all([
            above(0),
            RuleTree::any([above(10), above(20)]).unwrap(),
            RuleTree::branch(above(1), Some(above(2)), None),
        ])
        .unwrap();

        assert_eq!(tree.leaf_count(), 5);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.name(), "and");
    }

    #[test]
    fn test_tree_evaluation() {
        let tree = RuleTree::all([
            above(0),
            RuleTree::any([above(10), above(20)]).unwrap(),
        ])
        .unwrap();
        let cancel = CancellationToken::new();

        assert!(tree.evaluate(&15, &cancel).unwrap().is_success());

        let result = tree.evaluate(&5, &cancel).unwrap();
        let codes: Vec<_> = result.errors().iter().map(RuleError::code).collect();
        assert_eq!(codes, ["above_10", "above_20"]);

        let result = tree.evaluate(&-1, &cancel).unwrap();
        assert_eq!(result.first_error().unwrap().code(), "above_0");
    }

    #[test]
    fn test_nested_nodes_built_from_variants() {
        let inner = RuleTree::And(Box::new(And::pair(above(1), above(2))));
        let alternatives = RuleTree::Or(Box::new(Or::pair(above(50), above(60))));
        let tree = RuleTree::Or(Box::new(Or::pair(inner, alternatives)));

        let inner_and = match &tree {
            RuleTree::Or(node) => node
                .rules()
                .filter(|child| matches!(child, RuleTree::And(_)))
                .count(),
            _ => 0,
        };
        assert_eq!(inner_and, 1);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_count(), 4);

        let cancel = CancellationToken::new();
        assert!(tree.evaluate(&3, &cancel).unwrap().is_success());
        let codes: Vec<_> = tree
            .evaluate(&2, &cancel)
            .unwrap()
            .errors()
            .iter()
            .map(|e| e.code().to_owned())
            .collect();
        assert_eq!(codes, ["above_2", "above_50", "above_60"]);
    }

    #[test]
    fn test_empty_nodes_are_rejected() {
        assert!(RuleTree::<i32>::all([]).is_err());
        assert!(RuleTree::<i32>::any([]).is_err());
    }

    fn async_above(min: i32) -> AsyncRuleTree<i32> {
        AsyncRuleTree::leaf(async_rule_fn(move |n: &i32, _cancel: &CancellationToken| {
            Box::pin(async move {
                tokio::task::yield_now().await;
                if *n > min {
                    Ok(RuleResult::passed())
                } else {
                    Ok(RuleError::validation(format!("above_{min}"), "Too small").into())
                }
            })
        }))
    }

    #[tokio::test]
    async fn test_async_tree_evaluation() {
        let tree = AsyncRuleTree::branch(
            async_above(0),
            Some(AsyncRuleTree::any([async_above(10), async_above(20)]).unwrap()),
            Some(async_above(-10)),
        );
        let cancel = CancellationToken::new();

        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.depth(), 3);
        assert!(tree.evaluate(&11, &cancel).await.unwrap().is_success());
        assert_eq!(tree.evaluate(&5, &cancel).await.unwrap().errors().len(), 2);
        // Primary fails, fallback passes.
        assert!(tree.evaluate(&-5, &cancel).await.unwrap().is_success());
        assert_eq!(
            tree.evaluate(&-20, &cancel).await.unwrap().first_error().unwrap().code(),
            "above_-10"
        );
    }

    #[tokio::test]
    async fn test_async_tree_cancelled() {
        let tree = AsyncRuleTree::all([async_above(0), async_above(1)]).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(tree.evaluate(&5, &cancel).await.is_err());
    }
}
