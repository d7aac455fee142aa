extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::Events,
    vec, Address, Env, IntoVal, TryIntoVal, Val, Vec,
};

use crate::events::{
    Minted, PollStarted, ProjectProposed, StakeChanged, StatusChanged, TaskRewardClaimed,
    TaskValidated, Withdrawn,
};
use crate::test::{Fixture, PERIOD};
use crate::ProjectStatus;

/// Last event published by the protocol contract itself, skipping the
/// capital token's transfer events.
fn last_protocol_event(env: &Env, contract: &Address) -> (Address, Vec<Val>, Val) {
    env.events()
        .all()
        .iter()
        .filter(|event| event.0 == *contract)
        .last()
        .expect("No protocol events found")
}

#[test]
fn test_minted_event() {
    let f = Fixture::new(50);
    let buyer = f.user();
    f.fund(&buyer, 200);

    let last_event = last_protocol_event(&f.env, &f.client.address);

    // Topic: (symbol_short!("minted"),)
    let expected_topics = vec![&f.env, symbol_short!("minted").into_val(&f.env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Minted = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        Minted {
            buyer,
            amount: 200,
            cost: 2_000,
        }
    );
}

#[test]
fn test_withdrawn_event() {
    let f = Fixture::new(50);
    let seller = f.user();
    f.fund(&seller, 200);
    f.client.burn_and_refund(&seller, &20);

    let last_event = last_protocol_event(&f.env, &f.client.address);
    let expected_topics = vec![&f.env, symbol_short!("withdrawn").into_val(&f.env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Withdrawn = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        Withdrawn {
            seller,
            amount: 20,
            reward: 200,
        }
    );
}

#[test]
fn test_project_proposed_event() {
    let f = Fixture::new(50);
    let proposer = f.user();
    f.fund(&proposer, 200);
    let id = f.propose(&proposer);

    let last_event = last_protocol_event(&f.env, &f.client.address);

    // Topic: (symbol_short!("proposed"), project_id)
    let expected_topics = vec![
        &f.env,
        symbol_short!("proposed").into_val(&f.env),
        id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ProjectProposed = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        ProjectProposed {
            project_id: id,
            proposer,
            wei_cost: 1_000,
            reputation_cost: 500,
        }
    );
}

#[test]
fn test_stake_events() {
    let f = Fixture::new(50);
    let staker = f.user();
    f.fund(&staker, 200);
    let id = f.propose(&staker);

    f.client.stake_tokens(&id, &staker, &30);
    let last_event = last_protocol_event(&f.env, &f.client.address);
    let expected_topics = vec![
        &f.env,
        symbol_short!("staked").into_val(&f.env),
        id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: StakeChanged = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        StakeChanged {
            project_id: id,
            staker: staker.clone(),
            tokens: 30,
            reputation: 0,
        }
    );

    f.client.unstake_tokens(&id, &staker, &10);
    let last_event = last_protocol_event(&f.env, &f.client.address);
    let expected_topics = vec![
        &f.env,
        symbol_short!("unstaked").into_val(&f.env),
        id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: StakeChanged = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(event_data.tokens, 10);
}

#[test]
fn test_status_changed_event() {
    let f = Fixture::new(50);
    let proposer = f.user();
    let id = f.staked_project(&proposer);

    let last_event = last_protocol_event(&f.env, &f.client.address);

    // Topic: (symbol_short!("status"), project_id)
    let expected_topics = vec![
        &f.env,
        symbol_short!("status").into_val(&f.env),
        id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: StatusChanged = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        StatusChanged {
            project_id: id,
            from: ProjectStatus::Proposed,
            to: ProjectStatus::Staked,
            next_deadline: PERIOD,
        }
    );
}

#[test]
fn test_validation_and_poll_events() {
    let f = Fixture::new(50);
    let proposer = f.user();
    let worker = f.user();
    let approver = f.user();
    let denier = f.user();
    let id = f.validating_project(&proposer, &worker, &[40, 60]);
    f.fund(&approver, 20);
    f.fund(&denier, 20);

    f.client.validate(&id, &approver, &0, &7, &true);
    let last_event = last_protocol_event(&f.env, &f.client.address);
    let expected_topics = vec![
        &f.env,
        symbol_short!("validated").into_val(&f.env),
        id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: TaskValidated = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        TaskValidated {
            project_id: id,
            index: 0,
            validator: approver,
            tokens: 7,
            approve: true,
        }
    );

    f.client.validate(&id, &denier, &0, &3, &false);
    assert!(f.check_voting(id));

    // The poll is announced before the status change that closes the call.
    let poll_topics = vec![
        &f.env,
        symbol_short!("poll").into_val(&f.env),
        id.into_val(&f.env),
    ];
    let poll_event = f
        .env
        .events()
        .all()
        .iter()
        .find(|event| event.0 == f.client.address && event.1 == poll_topics)
        .expect("No poll event found");
    let event_data: PollStarted = poll_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        PollStarted {
            project_id: id,
            index: 0,
            poll_id: 1,
        }
    );
    assert_eq!(f.voting.poll_params(&1), (51, PERIOD, PERIOD));
}

#[test]
fn test_task_reward_claimed_event() {
    let f = Fixture::new(40);
    let proposer = f.user();
    let worker = f.user();
    let approver = f.user();
    let id = f.validating_project(&proposer, &worker, &[40, 60]);
    f.fund(&approver, 20);
    f.client.validate(&id, &approver, &0, &5, &true);
    assert!(f.check_voting(id));
    assert!(f.check_end(id));

    f.client.claim_task_reward(&id, &0, &worker);

    let last_event = last_protocol_event(&f.env, &f.client.address);
    let expected_topics = vec![
        &f.env,
        symbol_short!("rewarded").into_val(&f.env),
        id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: TaskRewardClaimed = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        TaskRewardClaimed {
            project_id: id,
            index: 0,
            claimer: worker,
            wei: 400,
            reputation: 200,
        }
    );
}
