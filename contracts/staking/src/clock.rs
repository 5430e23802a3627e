use soroban_sdk::Env;

/// Source of the current block height.
///
/// The pool only ever needs a monotonically non-decreasing integer. On
/// chain this is the ledger sequence number; tests move it with
/// `testutils::Ledger::set_sequence_number`.
pub trait BlockClock {
    fn current_block(&self) -> u32;
}

impl BlockClock for Env {
    fn current_block(&self) -> u32 {
        self.ledger().sequence()
    }
}
