extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::Events,
    vec, Address, IntoVal, TryIntoVal,
};

use crate::events::{ReputationRefund, TokenRefund};
use crate::test::Fixture;
use crate::{Error, ProjectStatus};

/// Proposer `alice` staked 100 tokens and 500 reputation; the 40% task was
/// approved, so with a threshold of 40 the project completes at 40%.
fn completed_project(f: &Fixture) -> (u64, Address) {
    let alice = f.user();
    let worker = f.user();
    let approver = f.user();
    let id = f.validating_project(&alice, &worker, &[40, 60]);
    f.fund(&approver, 20);
    f.client.validate(&id, &approver, &0, &5, &true);
    assert!(f.check_voting(id));
    assert!(f.check_end(id));
    assert_eq!(f.client.get_project(&id).status, ProjectStatus::Complete);
    (id, alice)
}

#[test]
fn test_token_refund_scales_with_pass_amount() {
    let f = Fixture::new(40);
    let (id, alice) = completed_project(&f);
    let supply = f.client.get_curve().total_supply;

    assert_eq!(f.client.refund_tokens(&id, &alice), 40);

    let account = f.client.get_account(&alice);
    assert_eq!((account.tokens, account.staked_tokens), (135, 5));
    assert_eq!(f.client.get_curve().total_supply, supply - 60);
    assert_eq!(f.client.get_stake(&id, &alice).tokens, 0);

    let last_event = f.env.events().all().last().expect("No events found");
    assert_eq!(last_event.0, f.client.address);
    let expected_topics = vec![
        &f.env,
        symbol_short!("tok_rfnd").into_val(&f.env),
        id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: TokenRefund = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        TokenRefund {
            project_id: id,
            staker: alice.clone(),
            amount: 40,
        }
    );

    // Nothing left to refund.
    assert_eq!(f.client.refund_tokens(&id, &alice), 0);
}

#[test]
fn test_reputation_refund_scales_with_pass_amount() {
    let f = Fixture::new(40);
    let (id, alice) = completed_project(&f);

    assert_eq!(f.client.refund_reputation(&id, &alice), 200);

    let account = f.client.get_account(&alice);
    assert_eq!((account.reputation, account.staked_reputation), (9_700, 0));

    let last_event = f.env.events().all().last().expect("No events found");
    let expected_topics = vec![
        &f.env,
        symbol_short!("rep_rfnd").into_val(&f.env),
        id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: ReputationRefund = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(event_data.amount, 200);
    assert_eq!(f.client.refund_reputation(&id, &alice), 0);
}

#[test]
fn test_refund_staker_formula_follows_caller() {
    let f = Fixture::new(40);
    let (id, alice) = completed_project(&f);
    let stranger = f.user();

    let before = f.client.get_account(&alice);
    assert_eq!(f.client.refund_staker(&stranger, &id, &alice), 0);
    assert_eq!(f.client.get_account(&alice), before);

    assert_eq!(f.client.refund_staker(&f.reputation_registry, &id, &alice), 200);
    assert_eq!(f.client.get_stake(&id, &alice).tokens, 100);
    assert_eq!(f.client.refund_staker(&f.token_registry, &id, &alice), 40);
    assert_eq!(f.client.get_stake(&id, &alice).reputation, 0);
}

#[test]
fn test_refunds_need_refundable_state() {
    let f = Fixture::new(50);
    let alice = f.user();
    let id = f.staked_project(&alice);
    assert_eq!(
        f.client.try_refund_tokens(&id, &alice),
        Err(Ok(Error::InvalidState))
    );
    assert_eq!(
        f.client.try_refund_staker(&f.token_registry, &id, &alice),
        Err(Ok(Error::InvalidState))
    );

    // Unrecognised callers are answered with zero whatever the state.
    let stranger = f.user();
    assert_eq!(f.client.refund_staker(&stranger, &id, &alice), 0);
    assert_eq!(f.client.get_project(&id).status, ProjectStatus::Staked);
}

#[test]
fn test_proposer_refund() {
    let f = Fixture::new(40);
    let alice = f.user();
    f.fund(&alice, 200);
    let id = f.propose(&alice);
    assert_eq!(
        f.client.try_refund_proposer(&id, &alice),
        Err(Ok(Error::InvalidState))
    );

    f.client.register(&alice);
    f.client.stake_tokens(&id, &alice, &200);
    f.client.stake_reputation(&id, &alice, &500);
    assert!(f.client.check_staked(&id));

    assert_eq!(
        f.client.try_refund_proposer(&id, &f.user()),
        Err(Ok(Error::NotAuthorized))
    );
    assert_eq!(f.client.refund_proposer(&id, &alice), 5);
    let account = f.client.get_account(&alice);
    assert_eq!((account.tokens, account.staked_tokens), (100, 100));
    assert_eq!(
        f.client.try_refund_proposer(&id, &alice),
        Err(Ok(Error::NothingToRefund))
    );
}

#[test]
fn test_expired_project_refunds_everyone_in_full() {
    let f = Fixture::new(40);
    let alice = f.user();
    let bob = f.user();
    f.fund(&alice, 200);
    f.fund(&bob, 50);
    f.client.register(&bob);
    let id = f.propose(&alice);
    f.client.stake_tokens(&id, &bob, &50);
    f.client.stake_reputation(&id, &bob, &100);

    f.pass_deadline(id);
    assert!(f.client.check_staked(&id));
    assert_eq!(f.client.get_project(&id).status, ProjectStatus::Expired);

    assert_eq!(f.client.refund_tokens(&id, &bob), 50);
    assert_eq!(f.client.refund_reputation(&id, &bob), 100);
    let account = f.client.get_account(&bob);
    assert_eq!(account.tokens, 50);
    assert_eq!(account.staked_tokens, 0);
    assert_eq!(account.reputation, 10_000);
    assert_eq!(account.staked_reputation, 0);
}
