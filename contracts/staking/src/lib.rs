#![no_std]

pub mod clock;
pub mod events;
pub mod pool;
pub mod rewards;
mod storage;

use common::ownable;
use soroban_sdk::{contract, contractimpl, log, token, Address, Env};

use clock::BlockClock;
pub use pool::{PeriodInfo, Pool, UserDeposit};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    RewardNotPositive = 5,
    InsufficientAllowance = 6,
    StartNotInFuture = 7,
    EndBeforeStart = 8,
    InvalidPeriod = 9,
    NoActiveDeposit = 10,
    StaleDeposit = 11,
    DepositCurrent = 12,
    TokensIdentical = 13,
    InsufficientRewardBalance = 14,
    ArithmeticOverflow = 15,
    NoPendingOwner = 16,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingPool;

#[contractimpl]
impl StakingPool {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `owner`        – the only address allowed to open reward periods.
    /// * `stake_token`  – token users deposit.
    /// * `reward_token` – token paid out as rewards.
    ///
    /// The pool starts paused at period 0.
    pub fn initialize(
        env: Env,
        owner: Address,
        stake_token: Address,
        reward_token: Address,
    ) -> Result<(), ContractError> {
        if storage::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if stake_token == reward_token {
            return Err(ContractError::TokensIdentical);
        }

        ownable::set_owner(&env, &owner);
        storage::init(&env, &stake_token, &reward_token, &Pool::new());

        events::publish_initialized(&env, owner, stake_token, reward_token);
        log!(&env, "pool initialized");

        Ok(())
    }

    // ── Period lifecycle ────────────────────────────────────────────────────

    /// Open a new reward period releasing `reward` linearly over
    /// `start..end`. Owner only.
    ///
    /// `rew_per_block` is `reward / (end - start)`. The previous period is
    /// closed first; whatever it did not release (a cut-short tail) and the
    /// new division remainder go to the carried reserve. The reward is
    /// pulled from the owner through the allowance granted to this contract.
    ///
    /// A reward too large for the accumulator's fixed-point scale is
    /// rejected with `InvalidAmount`.
    pub fn reset_and_set_start_end_block(
        env: Env,
        caller: Address,
        reward: i128,
        start: u32,
        end: u32,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !ownable::is_owner(&env, &caller) {
            return Err(ContractError::Unauthorized);
        }
        if reward <= 0 {
            return Err(ContractError::RewardNotPositive);
        }

        let reward_token = token::Client::new(&env, &storage::reward_token(&env)?);
        let this = env.current_contract_address();
        if reward_token.allowance(&caller, &this) < reward {
            return Err(ContractError::InsufficientAllowance);
        }

        let now = env.current_block();
        let mut pool = storage::load_pool(&env)?;
        let rollover = pool.open_period(reward, start, end, now)?;

        // Effects.
        if let Some(close) = &rollover.closed {
            if let Some(mut info) = storage::load_period(&env, close.period) {
                info.close(close);
                storage::save_period(&env, &info);
            }
            log!(&env, "period closed", close.period, close.unemitted);
        }
        storage::save_period(&env, &rollover.opened);
        storage::save_pool(&env, &pool);

        // Interaction.
        reward_token.transfer_from(&this, &caller, &this, &reward);

        events::publish_period_set(
            &env,
            pool.period,
            reward,
            start,
            end,
            pool.rew_per_block,
            pool.carried,
        );
        log!(&env, "period opened", pool.period, reward, start, end, pool.rew_per_block);

        Ok(pool.period)
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens into the current period.
    ///
    /// Only between `starting_block` and `ending_block` inclusive. A deposit
    /// left over from an earlier period must be renewed first. Pending
    /// reward is settled at the old share ratio before the pool grows.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let now = env.current_block();
        let mut pool = storage::load_pool(&env)?;
        let mut deposit = storage::load_deposit(&env, &staker);
        pool.stake(&mut deposit, amount, now)?;

        let stake_token = token::Client::new(&env, &storage::stake_token(&env)?);
        let this = env.current_contract_address();
        if stake_token.allowance(&staker, &this) < amount {
            return Err(ContractError::InsufficientAllowance);
        }

        storage::save_deposit(&env, &staker, &deposit);
        storage::save_pool(&env, &pool);

        stake_token.transfer_from(&this, &staker, &this, &amount);

        events::publish_staked(&env, staker.clone(), amount, pool.total_staked, pool.period);
        log!(&env, "staked", staker, amount, pool.total_staked);

        Ok(())
    }

    /// Leave the pool, returning the full stake. Unclaimed reward is
    /// forfeited; claim it first.
    pub fn withdraw(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::exit(&env, &staker, false)
    }

    /// Same effect as `withdraw`, published under its own event topic.
    pub fn emergency_withdraw(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::exit(&env, &staker, true)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Claim the reward accrued in the current period.
    ///
    /// Works during the period and in the buffer window after it ends. A
    /// deposit from an earlier period gets `NoActiveDeposit` until renewed.
    pub fn claim_rewards(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let now = env.current_block();
        let mut pool = storage::load_pool(&env)?;
        let mut deposit = storage::load_deposit(&env, &staker);
        let payout = pool.claim(&mut deposit, now)?;

        storage::save_deposit(&env, &staker, &deposit);
        storage::save_pool(&env, &pool);

        if payout > 0 {
            Self::pay_reward(&env, &staker, payout)?;
        }

        events::publish_reward_claimed(&env, staker.clone(), payout, pool.period);
        log!(&env, "rewards claimed", staker, payout);

        Ok(payout)
    }

    /// Roll a deposit from an earlier period into the current one.
    ///
    /// Reward earned before the current period opened is banked and paid
    /// by `claim_old_rewards`. Returns the amount banked.
    pub fn renew(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let mut pool = storage::load_pool(&env)?;
        let mut deposit = storage::load_deposit(&env, &staker);
        let banked = pool.renew(&mut deposit)?;

        storage::save_deposit(&env, &staker, &deposit);

        events::publish_renewed(&env, staker.clone(), pool.period, banked);
        log!(&env, "renewed", staker, pool.period, banked);

        Ok(banked)
    }

    /// Pay out banked prior-period reward. Returns 0 when nothing is owed.
    pub fn claim_old_rewards(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let mut pool = storage::load_pool(&env)?;
        let mut deposit = storage::load_deposit(&env, &staker);
        let payout = pool.claim_old(&mut deposit)?;
        if payout <= 0 {
            return Ok(0);
        }

        storage::save_deposit(&env, &staker, &deposit);
        storage::save_pool(&env, &pool);

        Self::pay_reward(&env, &staker, payout)?;

        events::publish_old_rewards_claimed(&env, staker.clone(), payout);
        log!(&env, "old rewards claimed", staker, payout);

        Ok(payout)
    }

    /// Send the carried reserve (reward owed to no staker) to the owner.
    /// Owner only. Returns the amount sent; 0 when the reserve is empty.
    pub fn sweep_carried(env: Env, caller: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !ownable::is_owner(&env, &caller) {
            return Err(ContractError::Unauthorized);
        }

        let mut pool = storage::load_pool(&env)?;
        pool.accrue(env.current_block())?;
        let swept = pool.take_carried()?;
        storage::save_pool(&env, &pool);

        if swept > 0 {
            Self::pay_reward(&env, &caller, swept)?;
        }

        events::publish_carried_swept(&env, caller.clone(), swept);
        log!(&env, "carried swept", caller, swept);

        Ok(swept)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn current_block(env: Env) -> u32 {
        env.current_block()
    }

    pub fn is_paused(env: Env) -> bool {
        storage::pool_or_new(&env).is_paused(env.current_block())
    }

    pub fn period(env: Env) -> u32 {
        storage::pool_or_new(&env).period
    }

    pub fn starting_block(env: Env) -> u32 {
        storage::pool_or_new(&env).starting_block
    }

    pub fn ending_block(env: Env) -> u32 {
        storage::pool_or_new(&env).ending_block
    }

    pub fn total_reward(env: Env) -> i128 {
        storage::pool_or_new(&env).total_reward
    }

    pub fn rew_per_block(env: Env) -> i128 {
        storage::pool_or_new(&env).rew_per_block
    }

    pub fn total_staked(env: Env) -> i128 {
        storage::pool_or_new(&env).total_staked
    }

    /// Reward tokens the pool still holds for payouts.
    pub fn reward_balance(env: Env) -> i128 {
        storage::pool_or_new(&env).reward_balance
    }

    /// Reward owed to no staker, waiting for `sweep_carried`.
    pub fn carried_reward(env: Env) -> i128 {
        storage::pool_or_new(&env).carried
    }

    pub fn token_address(env: Env) -> Result<Address, ContractError> {
        storage::stake_token(&env)
    }

    pub fn reward_token_address(env: Env) -> Result<Address, ContractError> {
        storage::reward_token(&env)
    }

    pub fn user_deposits(env: Env, user: Address) -> UserDeposit {
        storage::load_deposit(&env, &user)
    }

    pub fn has_staked(env: Env, user: Address) -> bool {
        storage::load_deposit(&env, &user).has_staked
    }

    /// The user's share of the pool, where 10_000 is the whole pool.
    pub fn fetch_user_share(env: Env, user: Address) -> Result<i128, ContractError> {
        let pool = storage::pool_or_new(&env);
        pool.share(&storage::load_deposit(&env, &user))
    }

    /// Reward `claim_rewards` would pay right now.
    pub fn calculate(env: Env, user: Address) -> Result<i128, ContractError> {
        let pool = storage::pool_or_new(&env);
        pool.calculate(&storage::load_deposit(&env, &user), env.current_block())
    }

    /// Reward `claim_old_rewards` would pay right now.
    pub fn view_old_rewards(env: Env, user: Address) -> Result<i128, ContractError> {
        let pool = storage::pool_or_new(&env);
        pool.old_rewards(&storage::load_deposit(&env, &user))
    }

    pub fn period_details(env: Env, period: u32) -> Option<PeriodInfo> {
        storage::load_period(&env, period)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    // ── Ownership (two-step) ────────────────────────────────────────────────

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        ownable::get_owner(&env).ok_or(ContractError::NotInitialized)
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        ownable::get_pending_owner(&env)
    }

    /// Propose a new owner. The proposed address completes the transfer
    /// with `accept_owner`.
    pub fn propose_owner(
        env: Env,
        current_owner: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_owner.require_auth();
        if !ownable::propose_owner(&env, &current_owner, &new_owner) {
            return Err(ContractError::Unauthorized);
        }

        events::publish_owner_transfer_proposed(&env, current_owner, new_owner);

        Ok(())
    }

    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_owner.require_auth();

        if ownable::get_pending_owner(&env).is_none() {
            return Err(ContractError::NoPendingOwner);
        }
        let old_owner =
            ownable::accept_owner(&env, &new_owner).ok_or(ContractError::Unauthorized)?;

        events::publish_owner_transfer_accepted(&env, old_owner, new_owner);

        Ok(())
    }

    pub fn cancel_owner_transfer(env: Env, current_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_owner.require_auth();

        if !ownable::is_owner(&env, &current_owner) {
            return Err(ContractError::Unauthorized);
        }
        let pending = ownable::cancel_owner_transfer(&env, &current_owner)
            .ok_or(ContractError::NoPendingOwner)?;

        events::publish_owner_transfer_cancelled(&env, current_owner, pending);

        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !storage::is_initialized(env) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Shared body of `withdraw` and `emergency_withdraw`.
    fn exit(env: &Env, staker: &Address, emergency: bool) -> Result<i128, ContractError> {
        Self::require_initialized(env)?;
        staker.require_auth();

        let now = env.current_block();
        let mut pool = storage::load_pool(env)?;
        let mut deposit = storage::load_deposit(env, staker);
        let exit = pool.exit(&mut deposit, now)?;

        // Deposit and totals are written before the stake leaves the pool.
        storage::save_deposit(env, staker, &deposit);
        storage::save_pool(env, &pool);

        token::Client::new(env, &storage::stake_token(env)?).transfer(
            &env.current_contract_address(),
            staker,
            &exit.amount,
        );

        events::publish_withdrawn(
            env,
            emergency,
            staker.clone(),
            exit.amount,
            exit.forfeited,
            pool.total_staked,
        );
        log!(env, "withdrawn", staker.clone(), exit.amount, exit.forfeited);

        Ok(exit.amount)
    }

    fn pay_reward(env: &Env, to: &Address, amount: i128) -> Result<(), ContractError> {
        token::Client::new(env, &storage::reward_token(env)?).transfer(
            &env.current_contract_address(),
            to,
            &amount,
        );
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
