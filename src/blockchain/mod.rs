pub mod block;
pub mod model;
pub mod statement;

pub use block::Block;
pub use model::{Blockchain, ChainFault, FaultKind, LedgerEntry};
pub use statement::{AccountLookup, StatementEntry};

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Hard ceiling: mining is blocking and cannot be cancelled.
pub const MAX_DIFFICULTY: u32 = 4;

/// Reward credited to the sealing address after each block (cents).
pub const DEFAULT_MINING_REWARD: u64 = 1_000;

/// Address that seals blocks on behalf of the service.
pub const SYSTEM_ADDRESS: &str = "SYSTEM";
