use soroban_sdk::{symbol_short, Address, Env, Symbol};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");

// ── Core Functions ───────────────────────────────────────────────────────────

/// Records the contract owner. Only callable internally during
/// initialisation; later changes go through `propose_owner`/`accept_owner`.
pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
}

/// Returns the current owner, if one has been recorded.
pub fn get_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OWNER)
}

/// Returns `true` when `caller` is the recorded owner.
///
/// The caller must have already been authenticated via `require_auth()`;
/// this only compares identities.
pub fn is_owner(env: &Env, caller: &Address) -> bool {
    match get_owner(env) {
        Some(owner) => owner == *caller,
        None => false,
    }
}

// ── Two-step Transfer ────────────────────────────────────────────────────────

/// Stores `new_owner` as the pending owner.
///
/// Returns `false` (and stores nothing) if `caller` is not the owner.
pub fn propose_owner(env: &Env, caller: &Address, new_owner: &Address) -> bool {
    if !is_owner(env, caller) {
        return false;
    }
    env.storage().instance().set(&PENDING_OWNER, new_owner);
    true
}

/// Returns the pending owner, if a transfer is in flight.
pub fn get_pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_OWNER)
}

/// Completes a transfer started by `propose_owner`.
///
/// Returns the previous owner on success, `None` when `caller` is not the
/// pending owner or no transfer is in flight.
pub fn accept_owner(env: &Env, caller: &Address) -> Option<Address> {
    let pending = get_pending_owner(env)?;
    if pending != *caller {
        return None;
    }
    let previous = get_owner(env)?;
    env.storage().instance().set(&OWNER, caller);
    env.storage().instance().remove(&PENDING_OWNER);
    Some(previous)
}

/// Drops the pending transfer. Returns the address that was pending, or
/// `None` if `caller` is not the owner or nothing was pending.
pub fn cancel_owner_transfer(env: &Env, caller: &Address) -> Option<Address> {
    if !is_owner(env, caller) {
        return None;
    }
    let pending = get_pending_owner(env)?;
    env.storage().instance().remove(&PENDING_OWNER);
    Some(pending)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
