use soroban_sdk::{Env, IntoVal, Val};

/// Ledgers below which an entry's TTL gets bumped (~30 days at 5s/ledger).
pub const TTL_THRESHOLD: u32 = 518_400;

/// Ledgers an entry's TTL is bumped to (~180 days at 5s/ledger).
pub const TTL_EXTEND_TO: u32 = 3_110_400;

/// Extends the TTL of the calling contract's instance storage.
/// Instance TTL covers every key kept in instance storage.
pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Extends the TTL of a single persistent key.
pub fn extend_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
