use common::ttl;
use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::pool::{PeriodInfo, Pool, UserDeposit};
use crate::ContractError;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const POOL: Symbol = symbol_short!("POOL");

// Persistent entries use tuple keys: (prefix, id)
const USER_DEPOSIT: Symbol = symbol_short!("DEPOSIT");
const PERIOD_INFO: Symbol = symbol_short!("PERIOD");

fn deposit_key(user: &Address) -> (Symbol, Address) {
    (USER_DEPOSIT, user.clone())
}

fn period_key(period: u32) -> (Symbol, u32) {
    (PERIOD_INFO, period)
}

// ── Instance ─────────────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn init(env: &Env, stake_token: &Address, reward_token: &Address, pool: &Pool) {
    env.storage().instance().set(&INITIALIZED, &true);
    env.storage().instance().set(&STAKE_TOKEN, stake_token);
    env.storage().instance().set(&REWARD_TOKEN, reward_token);
    save_pool(env, pool);
}

pub fn stake_token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&STAKE_TOKEN)
        .ok_or(ContractError::NotInitialized)
}

pub fn reward_token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&REWARD_TOKEN)
        .ok_or(ContractError::NotInitialized)
}

pub fn load_pool(env: &Env) -> Result<Pool, ContractError> {
    env.storage()
        .instance()
        .get(&POOL)
        .ok_or(ContractError::NotInitialized)
}

/// Pool for read-only queries; an uninitialised contract reads as a
/// fresh, paused pool.
pub fn pool_or_new(env: &Env) -> Pool {
    env.storage().instance().get(&POOL).unwrap_or_else(Pool::new)
}

pub fn save_pool(env: &Env, pool: &Pool) {
    env.storage().instance().set(&POOL, pool);
    ttl::extend_instance(env);
}

// ── Persistent ───────────────────────────────────────────────────────────────

/// Deposit of `user`, or an empty one if the user never staked.
pub fn load_deposit(env: &Env, user: &Address) -> UserDeposit {
    let key = deposit_key(user);
    let deposit: Option<UserDeposit> = env.storage().persistent().get(&key);
    match deposit {
        Some(d) => {
            ttl::extend_persistent(env, &key);
            d
        }
        None => UserDeposit::default(),
    }
}

pub fn save_deposit(env: &Env, user: &Address, deposit: &UserDeposit) {
    let key = deposit_key(user);
    env.storage().persistent().set(&key, deposit);
    ttl::extend_persistent(env, &key);
}

pub fn load_period(env: &Env, period: u32) -> Option<PeriodInfo> {
    env.storage().persistent().get(&period_key(period))
}

pub fn save_period(env: &Env, info: &PeriodInfo) {
    let key = period_key(info.period);
    env.storage().persistent().set(&key, info);
    ttl::extend_persistent(env, &key);
}
