#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};
use staking::{StakingPool, StakingPoolClient};

const FUNDS: i128 = 1_000_000_000_000_000_000;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { amount: u64 },
    Withdraw,
    EmergencyWithdraw,
    ClaimRewards,
    Renew,
    ClaimOldRewards,
    AdvanceBlocks { blocks: u8 },
    ResetPeriod { reward: u64, delay: u8, length: u16 },
    SweepCarried,
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(10);

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(StakingPool, ());
    let client = StakingPoolClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(&owner, &stake_token, &reward_token);

    let expiry = 200_000;
    StellarAssetClient::new(&env, &reward_token).mint(&owner, &FUNDS);
    TokenClient::new(&env, &reward_token).approve(&owner, &contract_id, &FUNDS, &expiry);

    let mut users = vec![owner.clone()];
    for _ in 0..4 {
        users.push(Address::generate(&env));
    }
    for user in &users {
        StellarAssetClient::new(&env, &stake_token).mint(user, &FUNDS);
        TokenClient::new(&env, &stake_token).approve(user, &contract_id, &FUNDS, &expiry);
    }

    // Any error is fine; a host panic or a broken balance is not.
    for (i, action) in actions.into_iter().take(64).enumerate() {
        let caller = &users[i % users.len()];
        match action {
            FuzzAction::Stake { amount } => {
                let _ = client.try_stake(caller, &(amount as i128));
            }
            FuzzAction::Withdraw => {
                let _ = client.try_withdraw(caller);
            }
            FuzzAction::EmergencyWithdraw => {
                let _ = client.try_emergency_withdraw(caller);
            }
            FuzzAction::ClaimRewards => {
                let _ = client.try_claim_rewards(caller);
            }
            FuzzAction::Renew => {
                let _ = client.try_renew(caller);
            }
            FuzzAction::ClaimOldRewards => {
                let _ = client.try_claim_old_rewards(caller);
            }
            FuzzAction::AdvanceBlocks { blocks } => {
                let next = env.ledger().sequence() + blocks as u32 % 50;
                env.ledger().set_sequence_number(next);
            }
            FuzzAction::ResetPeriod { reward, delay, length } => {
                let start = env.ledger().sequence() + delay as u32;
                let end = start + length as u32;
                let _ = client.try_reset_and_set_start_end_block(
                    &owner,
                    &(reward as i128),
                    &start,
                    &end,
                );
            }
            FuzzAction::SweepCarried => {
                let _ = client.try_sweep_carried(&owner);
            }
        }

        let total_staked = client.total_staked();
        let deposits: i128 = users.iter().map(|u| client.user_deposits(u).amount).sum();
        assert_eq!(deposits, total_staked);
        assert_eq!(TokenClient::new(&env, &stake_token).balance(&contract_id), total_staked);
        assert_eq!(
            TokenClient::new(&env, &reward_token).balance(&contract_id),
            client.reward_balance()
        );
    }
});
