#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based state machine tests for the StakingPool contract.
//!
//! Random sequences of user and owner operations are replayed against a
//! deployed pool with real token contracts. After every step:
//! - The sum of all deposits equals `total_staked`
//! - The pool holds exactly `total_staked` stake tokens
//! - The pool holds exactly `reward_balance` reward tokens
//! - Rewards paid out, swept and still held equal everything the owner funded
//! - Shares never sum past the whole pool
//!
//! and every successful payout matches what the matching view reported.

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};
use staking::{StakingPool, StakingPoolClient};

const USERS: usize = 4;
const FUNDS: i128 = 1_000_000_000_000_000;

#[derive(Arbitrary, Clone, Debug)]
enum Action {
    Stake { user: u8, amount: u16 },
    Withdraw { user: u8, emergency: bool },
    Claim { user: u8 },
    Renew { user: u8 },
    ClaimOld { user: u8 },
    Advance { blocks: u8 },
    Reset { reward: u16, delay: u8, length: u8 },
    Sweep,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

struct World {
    env: Env,
    client: StakingPoolClient<'static>,
    contract: Address,
    owner: Address,
    users: Vec<Address>,
    stake: TokenClient<'static>,
    reward: TokenClient<'static>,
    funded: i128,
    swept: i128,
}

fn setup() -> World {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(10);

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract = env.register(StakingPool, ());
    let client = StakingPoolClient::new(&env, &contract);
    let owner = Address::generate(&env);
    client.initialize(&owner, &stake_token, &reward_token);

    let expiry = 200_000;
    StellarAssetClient::new(&env, &reward_token).mint(&owner, &FUNDS);
    TokenClient::new(&env, &reward_token).approve(&owner, &contract, &FUNDS, &expiry);

    let mut users = Vec::new();
    for _ in 0..USERS {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &stake_token).mint(&user, &FUNDS);
        TokenClient::new(&env, &stake_token).approve(&user, &contract, &FUNDS, &expiry);
        users.push(user);
    }

    client.reset_and_set_start_end_block(&owner, &10_000, &20, &120);

    World {
        stake: TokenClient::new(&env, &stake_token),
        reward: TokenClient::new(&env, &reward_token),
        env,
        client,
        contract,
        owner,
        users,
        funded: 10_000,
        swept: 0,
    }
}

fn apply(w: &mut World, action: &Action) -> Result<(), TestCaseError> {
    let pick = |user: &u8| w.users[*user as usize % USERS].clone();
    match action {
        Action::Stake { user, amount } => {
            let _ = w.client.try_stake(&pick(user), &(*amount as i128 + 1));
        }
        Action::Withdraw { user, emergency } => {
            let user = pick(user);
            let amount = w.client.user_deposits(&user).amount;
            let result = if *emergency {
                w.client.try_emergency_withdraw(&user)
            } else {
                w.client.try_withdraw(&user)
            };
            if let Ok(Ok(returned)) = result {
                prop_assert_eq!(returned, amount);
                prop_assert_eq!(w.client.user_deposits(&user).amount, 0);
            }
        }
        Action::Claim { user } => {
            let user = pick(user);
            let expected = w.client.calculate(&user);
            if let Ok(Ok(paid)) = w.client.try_claim_rewards(&user) {
                prop_assert_eq!(paid, expected);
                prop_assert_eq!(w.client.calculate(&user), 0);
            }
        }
        Action::Renew { user } => {
            let user = pick(user);
            let owed = w.client.view_old_rewards(&user);
            if let Ok(Ok(_)) = w.client.try_renew(&user) {
                prop_assert_eq!(w.client.view_old_rewards(&user), owed);
                prop_assert_eq!(w.client.user_deposits(&user).last_period, w.client.period());
            }
        }
        Action::ClaimOld { user } => {
            let user = pick(user);
            let expected = w.client.view_old_rewards(&user);
            if let Ok(Ok(paid)) = w.client.try_claim_old_rewards(&user) {
                prop_assert_eq!(paid, expected);
                prop_assert_eq!(w.client.view_old_rewards(&user), 0);
            }
        }
        Action::Advance { blocks } => {
            let next = w.env.ledger().sequence() + *blocks as u32 % 50;
            w.env.ledger().set_sequence_number(next);
        }
        Action::Reset { reward, delay, length } => {
            let reward = *reward as i128 + 1;
            let start = w.env.ledger().sequence() + 1 + *delay as u32 % 20;
            let end = start + 1 + *length as u32;
            if let Ok(Ok(_)) = w
                .client
                .try_reset_and_set_start_end_block(&w.owner, &reward, &start, &end)
            {
                w.funded += reward;
                prop_assert_eq!(w.client.rew_per_block(), reward / (end - start) as i128);
            }
        }
        Action::Sweep => {
            let carried = w.client.carried_reward();
            let swept = w.client.sweep_carried(&w.owner);
            prop_assert!(swept >= carried);
            prop_assert_eq!(w.client.carried_reward(), 0);
            w.swept += swept;
        }
    }
    Ok(())
}

fn check_invariants(w: &World) -> Result<(), TestCaseError> {
    let total_staked = w.client.total_staked();
    let deposits: i128 = w.users.iter().map(|u| w.client.user_deposits(u).amount).sum();
    prop_assert_eq!(deposits, total_staked);
    prop_assert_eq!(w.stake.balance(&w.contract), total_staked);

    let reward_balance = w.client.reward_balance();
    prop_assert_eq!(w.reward.balance(&w.contract), reward_balance);
    let paid: i128 = w.users.iter().map(|u| w.reward.balance(u)).sum();
    prop_assert_eq!(paid + w.swept + reward_balance, w.funded);

    let shares: i128 = w.users.iter().map(|u| w.client.fetch_user_share(u)).sum();
    prop_assert!(shares <= 10_000);
    Ok(())
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any interleaving of operations keeps the pool's books balanced.
    #[test]
    fn prop_random_operations_keep_books_balanced(
        actions in proptest::collection::vec(any::<Action>(), 1..30),
    ) {
        let mut w = setup();
        for action in &actions {
            apply(&mut w, action)?;
            check_invariants(&w)?;
        }
    }

    /// Whatever happened before, every user can always leave with exactly
    /// what they deposited.
    #[test]
    fn prop_everyone_can_exit(
        actions in proptest::collection::vec(any::<Action>(), 1..30),
    ) {
        let mut w = setup();
        for action in &actions {
            apply(&mut w, action)?;
        }
        for user in w.users.clone() {
            let amount = w.client.user_deposits(&user).amount;
            if amount > 0 {
                prop_assert_eq!(w.client.withdraw(&user), amount);
            }
            prop_assert_eq!(w.stake.balance(&user), FUNDS);
        }
        prop_assert_eq!(w.client.total_staked(), 0);
    }
}
