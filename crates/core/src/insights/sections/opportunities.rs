//! Saving opportunities section.
//!
//! Two shapes: high-volume categories get a percentage-reduction target, and
//! categories full of small transactions get a consolidation suggestion.

use crate::insights::insights_model::{
    InsightsConfig, InsightsSnapshot, OpportunityKind, Priority, SavingOpportunity,
};

/// Scans the most recent window for reduction and consolidation candidates.
/// Output is ordered by category name, then reduction before consolidation.
pub fn find_opportunities(
    snapshot: &InsightsSnapshot,
    config: &InsightsConfig,
) -> Vec<SavingOpportunity> {
    let mut opportunities = Vec::new();

    for (category, spend) in snapshot.category_spend(0, config) {
        if spend.total > config.opportunity_min_monthly_spend
            && spend.transaction_count > config.opportunity_min_transactions
        {
            let priority = if spend.total > config.opportunity_high_priority_spend {
                Priority::High
            } else {
                Priority::Medium
            };
            opportunities.push(SavingOpportunity {
                category: category.clone(),
                kind: OpportunityKind::Reduction,
                monthly_spend: spend.total,
                transaction_count: spend.transaction_count,
                estimated_saving: spend.total * config.reduction_target_ratio,
                priority,
            });
        }

        if spend.small_count > config.consolidation_min_count {
            // Consolidating assumes roughly half the small purchases merge
            // away; the saving is an order-of-magnitude hint, not a promise.
            let small_share = spend.total.min(
                config.small_transaction_limit * spend.small_count as f64,
            );
            opportunities.push(SavingOpportunity {
                category,
                kind: OpportunityKind::Consolidation,
                monthly_spend: spend.total,
                transaction_count: spend.transaction_count,
                estimated_saving: small_share * 0.5,
                priority: Priority::Low,
            });
        }
    }

    opportunities
}
