#![allow(dead_code)]

extern crate std;

use crate::registry::Account;
use crate::types::{CurveState, Project, ProjectStatus, Task};

/// INV-1: Free supply is a subset of total supply.
pub fn assert_curve_backed(curve: &CurveState) {
    assert!(
        curve.total_free_supply <= curve.total_supply,
        "INV-1 violated: free supply {} exceeds total supply {}",
        curve.total_free_supply,
        curve.total_supply
    );
}

/// INV-2: A project never holds more capital than it asked for.
pub fn assert_wei_bal_within_cost(project: &Project) {
    assert!(
        project.wei_bal <= project.wei_cost,
        "INV-2 violated: project {} holds {} of {}",
        project.id,
        project.wei_bal,
        project.wei_cost
    );
}

/// INV-3: Costs are positive.
pub fn assert_costs_positive(project: &Project) {
    assert!(
        project.wei_cost > 0 && project.reputation_cost > 0,
        "INV-3 violated: project {} has a zero cost",
        project.id
    );
}

/// INV-4: Pass amount is a percentage of task weight.
pub fn assert_pass_amount_bounded(project: &Project) {
    assert!(
        project.pass_amount <= 100,
        "INV-4 violated: project {} pass amount {}",
        project.id,
        project.pass_amount
    );
}

/// INV-5: Tasks exist only from Active onwards; expired projects refund
/// in full.
pub fn assert_status_consistent(project: &Project) {
    if project.status < ProjectStatus::Active {
        assert_eq!(
            project.task_count, 0,
            "INV-5 violated: project {} has tasks before activation",
            project.id
        );
    }
    if project.status == ProjectStatus::Expired {
        assert_eq!(
            project.pass_amount, 100,
            "INV-5 violated: expired project {} refunds {}%",
            project.id, project.pass_amount
        );
    }
}

/// INV-6: Status transition validity. Only these moves exist:
///   Proposed   -> Staked | Expired
///   Staked     -> Active | Expired
///   Active     -> Validation
///   Validation -> Voting
///   Voting     -> Complete | Failed
pub fn assert_valid_status_transition(from: ProjectStatus, to: ProjectStatus) {
    let valid = matches!(
        (from, to),
        (ProjectStatus::Proposed, ProjectStatus::Staked)
            | (ProjectStatus::Proposed, ProjectStatus::Expired)
            | (ProjectStatus::Staked, ProjectStatus::Active)
            | (ProjectStatus::Staked, ProjectStatus::Expired)
            | (ProjectStatus::Active, ProjectStatus::Validation)
            | (ProjectStatus::Validation, ProjectStatus::Voting)
            | (ProjectStatus::Voting, ProjectStatus::Complete)
            | (ProjectStatus::Voting, ProjectStatus::Failed)
    );

    assert!(
        valid,
        "INV-6 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// INV-7: A task won by its validators no longer carries a reward.
pub fn assert_denied_task_voided(task: &Task) {
    if task.claimable_by_validators {
        assert!(
            task.reward_paid_or_returned() && task.claimer_stake == 0,
            "INV-7 violated: denied task still holds {} capital",
            task.wei_reward
        );
    }
}

/// INV-8: A task cannot be won by both sides.
pub fn assert_single_winner(task: &Task) {
    assert!(
        !(task.claimable_by_rep && task.claimable_by_validators),
        "INV-8 violated: task claimable by both claimer and validators"
    );
}

/// INV-9: Burning never touches free balances, so an account's free
/// tokens only move through mint, burn and escrow.
pub fn assert_free_tokens_unchanged(before: &Account, after: &Account) {
    assert_eq!(
        before.tokens, after.tokens,
        "INV-9 violated: free tokens moved from {} to {}",
        before.tokens, after.tokens
    );
}

/// Run all stateless project invariants.
pub fn assert_project_invariants(project: &Project) {
    assert_wei_bal_within_cost(project);
    assert_costs_positive(project);
    assert_pass_amount_bounded(project);
    assert_status_consistent(project);
}

/// Run all stateless task invariants.
pub fn assert_task_invariants(task: &Task) {
    assert_denied_task_voided(task);
    assert_single_winner(task);
}
