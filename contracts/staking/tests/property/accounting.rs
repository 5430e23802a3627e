#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for the pure pool arithmetic.
//!
//! Invariants tested:
//! - A period budget splits exactly into `rate * blocks + dust`
//! - Stakers together never receive more than was released, and lose at
//!   most a couple of units each to rounding
//! - Shares never sum past the whole pool
//! - A single staker earns exactly the rate for every block
//! - The rate is always `reward / length`, whatever is carried
//! - Exits return the stake even when the accumulator is saturated

use proptest::prelude::*;
use staking::rewards::{self, SHARE_SCALE};
use staking::{Pool, UserDeposit};

const START: u32 = 10;

fn open_pool(reward: i128, length: u32) -> Pool {
    let mut pool = Pool::new();
    pool.open_period(reward, START, START + length, 0).unwrap();
    pool
}

proptest! {
    #[test]
    fn prop_budget_splits_exactly(budget in 0i128..=1_000_000_000_000_000_000i128, blocks in 1u32..=100_000u32) {
        let (rate, dust) = rewards::rate_and_dust(budget, blocks).unwrap();
        prop_assert_eq!(rate * blocks as i128 + dust, budget);
        prop_assert!(dust >= 0 && dust < blocks as i128);
    }

    #[test]
    fn prop_distribution_never_exceeds_release(
        amounts in proptest::collection::vec(1i128..=1_000_000_000i128, 1..8),
        reward in 1i128..=1_000_000_000_000i128,
        length in 1u32..=500u32,
        elapsed in 0u32..=600u32,
    ) {
        let mut pool = open_pool(reward, length);
        let mut deposits: Vec<UserDeposit> = Vec::new();
        for amount in &amounts {
            let mut d = UserDeposit::default();
            pool.stake(&mut d, *amount, START).unwrap();
            deposits.push(d);
        }

        let now = START + elapsed;
        let released = pool.rew_per_block * elapsed.min(length) as i128;
        let owed: i128 = deposits.iter().map(|d| pool.calculate(d, now).unwrap()).sum();

        prop_assert!(owed <= released);
        prop_assert!(released - owed <= 2 * amounts.len() as i128);
    }

    #[test]
    fn prop_shares_bounded(amounts in proptest::collection::vec(1i128..=1_000_000_000_000i128, 1..10)) {
        let mut pool = open_pool(1_000, 100);
        let mut deposits: Vec<UserDeposit> = Vec::new();
        for amount in &amounts {
            let mut d = UserDeposit::default();
            pool.stake(&mut d, *amount, START).unwrap();
            deposits.push(d);
        }

        let total: i128 = deposits.iter().map(|d| pool.share(d).unwrap()).sum();
        prop_assert!(total <= SHARE_SCALE);
        prop_assert!(total > SHARE_SCALE - amounts.len() as i128);
        prop_assert_eq!(pool.total_staked, amounts.iter().sum::<i128>());
    }

    #[test]
    fn prop_single_staker_earns_rate_each_block(
        reward in 1i128..=1_000_000_000i128,
        exp in 0u32..=6u32,
        block in 0u32..100u32,
    ) {
        let mut pool = open_pool(reward, 100);
        let mut d = UserDeposit::default();
        pool.stake(&mut d, 10i128.pow(exp), START).unwrap();

        let before = pool.calculate(&d, START + block).unwrap();
        let after = pool.calculate(&d, START + block + 1).unwrap();
        prop_assert_eq!(after - before, pool.rew_per_block);
    }

    #[test]
    fn prop_rate_is_reward_over_length(
        first in 1i128..=1_000_000i128,
        reward in 1i128..=1_000_000_000i128,
        idle in 0u32..100u32,
        length in 1u32..=1_000u32,
    ) {
        let mut pool = open_pool(first, 100);
        let mut d = UserDeposit::default();
        pool.stake(&mut d, 1_000, START + idle).unwrap();

        let now = START + 200;
        pool.open_period(reward, now + 1, now + 1 + length, now).unwrap();
        prop_assert_eq!(pool.rew_per_block, reward / length as i128);
    }

    #[test]
    fn prop_exit_survives_saturated_accumulator(amount in 1i128..=1_000_000i128, at in 0u32..=200u32) {
        let mut pool = open_pool(1_000_000, 100);
        let mut d = UserDeposit::default();
        pool.stake(&mut d, amount, START).unwrap();
        pool.acc_reward_per_share = i128::MAX - 1;

        let exit = pool.exit(&mut d, START + at).unwrap();
        prop_assert_eq!(exit.amount, amount);
        prop_assert_eq!(pool.total_staked, 0);
    }

    #[test]
    fn prop_exit_returns_stake(amount in 1i128..=i64::MAX as i128, at in 0u32..=200u32) {
        let mut pool = open_pool(1_000, 100);
        let mut d = UserDeposit::default();
        pool.stake(&mut d, amount, START).unwrap();

        let exit = pool.exit(&mut d, START + at).unwrap();
        prop_assert_eq!(exit.amount, amount);
        prop_assert_eq!(pool.total_staked, 0);
        prop_assert!(!d.has_staked);
        prop_assert_eq!(pool.carried, exit.forfeited);
    }
}
