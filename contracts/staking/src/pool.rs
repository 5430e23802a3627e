//! Pool aggregate and per-user deposit accounting.
//!
//! Everything here is pure: the current block is passed in by the caller,
//! storage and token movements live in the contract layer. Each operation
//! either returns `Ok` with both records updated or an error with neither
//! touched in a way the caller will persist.

use soroban_sdk::contracttype;

use crate::rewards;
use crate::ContractError;

// ── Types ───────────────────────────────────────────────────────────────────

/// Singleton pool state.
///
/// `acc_reward_per_share` is a single accumulator that keeps growing across
/// periods; a period boundary is remembered through `period_start_acc`.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pool {
    pub paused: bool,
    pub period: u32,
    pub starting_block: u32,
    pub ending_block: u32,
    /// Reward committed by the owner for the current period.
    pub total_reward: i128,
    pub rew_per_block: i128,
    /// Reward units held by the pool and not yet paid out.
    pub reward_balance: i128,
    pub total_staked: i128,
    /// Reward per staked unit, scaled by `rewards::PRECISION`.
    pub acc_reward_per_share: i128,
    /// Last block already folded into the accumulator.
    pub last_reward_block: u32,
    /// Accumulator value when the current period was opened.
    pub period_start_acc: i128,
    /// Reward owed to nobody, held until the owner sweeps it.
    pub carried: i128,
}

/// One user's position.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserDeposit {
    pub amount: i128,
    /// Accumulator value at the last settlement.
    pub acc_checkpoint: i128,
    /// Settled, unpaid reward belonging to `last_period`.
    pub accrued: i128,
    /// Prior-period reward banked by `renew` or `claim_old_rewards`.
    pub old_rewards: i128,
    pub last_period: u32,
    /// Block of the last settlement, capped at `ending_block`. Reported
    /// through `user_deposits`; accrual itself runs off `acc_checkpoint`.
    pub last_claim_block: u32,
    pub has_staked: bool,
}

/// Historical record of one period.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PeriodInfo {
    pub period: u32,
    pub starting_block: u32,
    pub ending_block: u32,
    pub total_reward: i128,
    pub rew_per_block: i128,
    pub start_acc: i128,
    /// Accumulator when the period was closed; equals `start_acc` while open.
    pub end_acc: i128,
    /// Last block that released reward; below `ending_block` when the
    /// period was cut short by the next reset.
    pub emitted_until: u32,
    pub closed: bool,
}

/// What closing the previous period produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PeriodClose {
    pub period: u32,
    pub emitted_until: u32,
    pub end_acc: i128,
    /// Reward the period never released, moved into `carried`.
    pub unemitted: i128,
}

/// Result of `Pool::open_period`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PeriodRollover {
    pub closed: Option<PeriodClose>,
    pub opened: PeriodInfo,
}

/// Result of a full exit from the pool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Exit {
    pub amount: i128,
    pub forfeited: i128,
}

impl PeriodInfo {
    pub fn close(&mut self, close: &PeriodClose) {
        self.end_acc = close.end_acc;
        self.emitted_until = close.emitted_until;
        self.closed = true;
    }
}

fn overflow() -> ContractError {
    ContractError::ArithmeticOverflow
}

// ── Pool ────────────────────────────────────────────────────────────────────

impl Pool {
    /// A freshly deployed pool: paused, period 0.
    pub fn new() -> Self {
        Pool {
            paused: true,
            ..Default::default()
        }
    }

    /// Paused before the first period and once the current one has elapsed.
    pub fn is_paused(&self, now: u32) -> bool {
        self.paused || self.period == 0 || now > self.ending_block
    }

    pub fn in_staking_window(&self, now: u32) -> bool {
        !self.paused && self.period > 0 && self.starting_block <= now && now <= self.ending_block
    }

    /// Fold the reward released since `last_reward_block` into the
    /// accumulator. Emission stops at `ending_block`; blocks with nothing
    /// staked release into `carried`, and so does a fold the accumulator
    /// cannot absorb.
    pub fn accrue(&mut self, now: u32) -> Result<(), ContractError> {
        let to = now.min(self.ending_block);
        if self.period == 0 || to <= self.last_reward_block {
            return Ok(());
        }
        let blocks = to - self.last_reward_block;
        let released = rewards::emitted(self.rew_per_block, blocks).ok_or_else(overflow)?;

        let folded = if self.total_staked > 0 {
            rewards::acc_increment(released, self.total_staked)
                .and_then(|inc| self.acc_reward_per_share.checked_add(inc))
        } else {
            None
        };
        match folded {
            Some(acc) => self.acc_reward_per_share = acc,
            None => self.carried = self.carried.checked_add(released).ok_or_else(overflow)?,
        }
        self.last_reward_block = to;
        Ok(())
    }

    /// Accumulator value as `accrue(now)` would leave it, without mutating.
    pub fn projected_acc(&self, now: u32) -> Result<i128, ContractError> {
        let mut preview = self.clone();
        preview.accrue(now)?;
        Ok(preview.acc_reward_per_share)
    }

    /// Close the running period (if any) and open the next one.
    ///
    /// The caller has already authenticated the owner and checked the
    /// reward allowance; the reward transfer itself happens after the new
    /// state is persisted.
    pub fn open_period(
        &mut self,
        reward: i128,
        start: u32,
        end: u32,
        now: u32,
    ) -> Result<PeriodRollover, ContractError> {
        if reward <= 0 {
            return Err(ContractError::RewardNotPositive);
        }
        // The whole budget must fit the accumulator's fixed-point scale.
        if reward.checked_mul(rewards::PRECISION).is_none() {
            return Err(ContractError::InvalidAmount);
        }
        if start <= now {
            return Err(ContractError::StartNotInFuture);
        }
        if end <= start {
            return Err(ContractError::EndBeforeStart);
        }

        self.accrue(now)?;

        let closed = if self.period > 0 {
            let emitted_until = now
                .min(self.ending_block)
                .max(self.starting_block);
            let tail_blocks = self.ending_block - emitted_until;
            let unemitted =
                rewards::emitted(self.rew_per_block, tail_blocks).ok_or_else(overflow)?;
            self.carried = self.carried.checked_add(unemitted).ok_or_else(overflow)?;
            Some(PeriodClose {
                period: self.period,
                emitted_until,
                end_acc: self.acc_reward_per_share,
                unemitted,
            })
        } else {
            None
        };

        let (rate, dust) = rewards::rate_and_dust(reward, end - start).ok_or_else(overflow)?;
        self.carried = self.carried.checked_add(dust).ok_or_else(overflow)?;

        self.period = self.period.checked_add(1).ok_or_else(overflow)?;
        self.starting_block = start;
        self.ending_block = end;
        self.total_reward = reward;
        self.rew_per_block = rate;
        self.last_reward_block = start;
        self.period_start_acc = self.acc_reward_per_share;
        self.paused = false;
        self.reward_balance = self
            .reward_balance
            .checked_add(reward)
            .ok_or_else(overflow)?;

        let opened = PeriodInfo {
            period: self.period,
            starting_block: start,
            ending_block: end,
            total_reward: reward,
            rew_per_block: rate,
            start_acc: self.period_start_acc,
            end_acc: self.period_start_acc,
            emitted_until: start,
            closed: false,
        };

        Ok(PeriodRollover { closed, opened })
    }

    /// Add `amount` to `deposit`, settling its pending reward first.
    pub fn stake(
        &mut self,
        deposit: &mut UserDeposit,
        amount: i128,
        now: u32,
    ) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        if !self.in_staking_window(now) {
            return Err(ContractError::InvalidPeriod);
        }
        if deposit.is_live() && deposit.is_stale(self) {
            return Err(ContractError::StaleDeposit);
        }

        // Settle at the old share ratio before the denominator moves.
        self.accrue(now)?;
        let acc = self.acc_reward_per_share;

        if deposit.is_live() {
            let earned =
                rewards::pending(deposit.amount, acc, deposit.acc_checkpoint).ok_or_else(overflow)?;
            deposit.accrued = deposit.accrued.checked_add(earned).ok_or_else(overflow)?;
            deposit.amount = deposit.amount.checked_add(amount).ok_or_else(overflow)?;
        } else {
            deposit.amount = amount;
            deposit.accrued = 0;
            deposit.last_period = self.period;
            deposit.has_staked = true;
        }
        deposit.acc_checkpoint = acc;
        deposit.last_claim_block = now;

        self.total_staked = self.total_staked.checked_add(amount).ok_or_else(overflow)?;
        Ok(())
    }

    /// Pay out everything `deposit` has earned in the current period.
    pub fn claim(&mut self, deposit: &mut UserDeposit, now: u32) -> Result<i128, ContractError> {
        if !deposit.is_live() || deposit.is_stale(self) {
            return Err(ContractError::NoActiveDeposit);
        }

        self.accrue(now)?;
        let acc = self.acc_reward_per_share;
        let payout = deposit
            .accrued
            .checked_add(
                rewards::pending(deposit.amount, acc, deposit.acc_checkpoint)
                    .ok_or_else(overflow)?,
            )
            .ok_or_else(overflow)?;

        self.debit_rewards(payout)?;
        deposit.accrued = 0;
        deposit.acc_checkpoint = acc;
        deposit.last_claim_block = now.min(self.ending_block);
        Ok(payout)
    }

    /// Remove the whole stake. Prior-period reward is banked into
    /// `old_rewards` and stays claimable; unpaid current reward is
    /// forfeited into `carried`.
    ///
    /// Reward bookkeeping never blocks the exit: a step that overflows is
    /// skipped and the stake is still returned.
    pub fn exit(&mut self, deposit: &mut UserDeposit, now: u32) -> Result<Exit, ContractError> {
        if !deposit.is_live() {
            return Err(ContractError::NoActiveDeposit);
        }

        self.accrue(now).ok();
        self.bank_stale(deposit).ok();
        let acc = self.acc_reward_per_share;
        let forfeited = rewards::pending(deposit.amount, acc, deposit.acc_checkpoint)
            .and_then(|earned| earned.checked_add(deposit.accrued))
            .unwrap_or(deposit.accrued);
        let amount = deposit.amount;

        self.carried = self.carried.saturating_add(forfeited);
        self.total_staked = self.total_staked.saturating_sub(amount).max(0);

        deposit.amount = 0;
        deposit.accrued = 0;
        deposit.acc_checkpoint = acc;
        deposit.has_staked = false;
        Ok(Exit { amount, forfeited })
    }

    /// Roll a prior-period deposit into the current period, banking what it
    /// earned before the current period opened. Returns the banked amount.
    pub fn renew(&mut self, deposit: &mut UserDeposit) -> Result<i128, ContractError> {
        if !deposit.is_live() {
            return Err(ContractError::NoActiveDeposit);
        }
        if !deposit.is_stale(self) {
            return Err(ContractError::DepositCurrent);
        }
        let banked = self.bank_stale(deposit)?;
        deposit.last_period = self.period;
        deposit.last_claim_block = self.starting_block;
        Ok(banked)
    }

    /// Pay the banked prior-period reward, banking any still-unbanked part
    /// first. Zero when there is nothing to pay.
    pub fn claim_old(&mut self, deposit: &mut UserDeposit) -> Result<i128, ContractError> {
        self.bank_stale(deposit)?;
        let payout = deposit.old_rewards;
        if payout <= 0 {
            return Ok(0);
        }
        self.debit_rewards(payout)?;
        deposit.old_rewards = 0;
        Ok(payout)
    }

    /// Reward `deposit` could claim right now through `claim`.
    pub fn calculate(&self, deposit: &UserDeposit, now: u32) -> Result<i128, ContractError> {
        if !deposit.is_live() || deposit.is_stale(self) {
            return Ok(0);
        }
        let acc = self.projected_acc(now)?;
        deposit
            .accrued
            .checked_add(rewards::pending(deposit.amount, acc, deposit.acc_checkpoint).ok_or_else(overflow)?)
            .ok_or_else(overflow)
    }

    /// Banked plus not-yet-banked prior-period reward of `deposit`.
    pub fn old_rewards(&self, deposit: &UserDeposit) -> Result<i128, ContractError> {
        deposit
            .old_rewards
            .checked_add(self.unbanked_old(deposit)?)
            .ok_or_else(overflow)
    }

    /// Hand the whole `carried` reserve out of the pool. Returns the amount.
    pub fn take_carried(&mut self) -> Result<i128, ContractError> {
        let amount = self.carried;
        if amount <= 0 {
            return Ok(0);
        }
        self.debit_rewards(amount)?;
        self.carried = 0;
        Ok(amount)
    }

    pub fn share(&self, deposit: &UserDeposit) -> Result<i128, ContractError> {
        rewards::share(deposit.amount, self.total_staked).ok_or_else(overflow)
    }

    fn unbanked_old(&self, deposit: &UserDeposit) -> Result<i128, ContractError> {
        if !deposit.is_live() || !deposit.is_stale(self) {
            return Ok(0);
        }
        let earned = rewards::pending(deposit.amount, self.period_start_acc, deposit.acc_checkpoint)
            .ok_or_else(overflow)?;
        deposit.accrued.checked_add(earned).ok_or_else(overflow)
    }

    /// Move a stale deposit's reward up to the current period's start into
    /// `old_rewards` and checkpoint it there.
    fn bank_stale(&mut self, deposit: &mut UserDeposit) -> Result<i128, ContractError> {
        let owed = self.unbanked_old(deposit)?;
        if deposit.is_live() && deposit.is_stale(self) {
            deposit.old_rewards = deposit.old_rewards.checked_add(owed).ok_or_else(overflow)?;
            deposit.accrued = 0;
            deposit.acc_checkpoint = self.period_start_acc;
        }
        Ok(owed)
    }

    fn debit_rewards(&mut self, payout: i128) -> Result<(), ContractError> {
        if payout > self.reward_balance {
            return Err(ContractError::InsufficientRewardBalance);
        }
        self.reward_balance -= payout;
        Ok(())
    }
}

// ── UserDeposit ─────────────────────────────────────────────────────────────

impl UserDeposit {
    pub fn is_live(&self) -> bool {
        self.has_staked && self.amount > 0
    }

    /// Created in, or last renewed into, an earlier period.
    pub fn is_stale(&self, pool: &Pool) -> bool {
        self.last_period < pool.period
    }
}

// ── Unit tests ──────────────────────────────────────────────────────────────
