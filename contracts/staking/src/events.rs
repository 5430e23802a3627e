#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the pool is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub block: u32,
}

/// Fired when the owner opens a new reward period.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PeriodSetEvent {
    pub period: u32,
    pub reward: i128,
    pub starting_block: u32,
    pub ending_block: u32,
    pub rew_per_block: i128,
    pub carried: i128,
    pub block: u32,
}

/// Fired when a user deposits stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub period: u32,
    pub block: u32,
}

/// Fired on `withdraw` and `emergency_withdraw`; the topic tells them apart.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub amount: i128,
    pub forfeited: i128,
    pub new_total_staked: i128,
    pub block: u32,
}

/// Fired when a user claims current-period rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub staker: Address,
    pub amount: i128,
    pub period: u32,
    pub block: u32,
}

/// Fired when a stale deposit is rolled into the current period.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenewedEvent {
    pub staker: Address,
    pub period: u32,
    pub banked: i128,
    pub block: u32,
}

/// Fired when banked prior-period rewards are paid out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OldRewardsClaimedEvent {
    pub staker: Address,
    pub amount: i128,
    pub block: u32,
}

/// Fired when the owner sweeps the carried reserve.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CarriedSweptEvent {
    pub owner: Address,
    pub amount: i128,
    pub block: u32,
}

/// Fired when an ownership transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferProposedEvent {
    pub current_owner: Address,
    pub proposed_owner: Address,
    pub block: u32,
}

/// Fired when an ownership transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferAcceptedEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub block: u32,
}

/// Fired when a pending ownership transfer is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferCancelledEvent {
    pub owner: Address,
    pub cancelled_proposed: Address,
    pub block: u32,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, owner: Address, stake_token: Address, reward_token: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            stake_token,
            reward_token,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_period_set(
    env: &Env,
    period: u32,
    reward: i128,
    starting_block: u32,
    ending_block: u32,
    rew_per_block: i128,
    carried: i128,
) {
    env.events().publish(
        (symbol_short!("PERIOD"), period),
        PeriodSetEvent {
            period,
            reward,
            starting_block,
            ending_block,
            rew_per_block,
            carried,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, new_total_staked: i128, period: u32) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            new_total_staked,
            period,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    emergency: bool,
    staker: Address,
    amount: i128,
    forfeited: i128,
    new_total_staked: i128,
) {
    let topic = if emergency {
        symbol_short!("EMRG_WD")
    } else {
        symbol_short!("WITHDRAWN")
    };
    env.events().publish(
        (topic, staker.clone()),
        WithdrawnEvent {
            staker,
            amount,
            forfeited,
            new_total_staked,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, staker: Address, amount: i128, period: u32) {
    env.events().publish(
        (symbol_short!("CLMD"), staker.clone()),
        RewardClaimedEvent {
            staker,
            amount,
            period,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_renewed(env: &Env, staker: Address, period: u32, banked: i128) {
    env.events().publish(
        (symbol_short!("RENEWED"), staker.clone()),
        RenewedEvent {
            staker,
            period,
            banked,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_old_rewards_claimed(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("OLD_CLMD"), staker.clone()),
        OldRewardsClaimedEvent {
            staker,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_carried_swept(env: &Env, owner: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("SWEPT"), owner.clone()),
        CarriedSweptEvent {
            owner,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_owner_transfer_proposed(env: &Env, current_owner: Address, proposed_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"), current_owner.clone()),
        OwnerTransferProposedEvent {
            current_owner,
            proposed_owner,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_owner_transfer_accepted(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACPT"), new_owner.clone()),
        OwnerTransferAcceptedEvent {
            old_owner,
            new_owner,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_owner_transfer_cancelled(env: &Env, owner: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("OWN_CNCL"), owner.clone()),
        OwnerTransferCancelledEvent {
            owner,
            cancelled_proposed,
            block: env.ledger().sequence(),
        },
    );
}
