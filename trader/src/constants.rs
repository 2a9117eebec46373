/// Asset A moved into the pool at creation.
pub const POOL_AMOUNT_A: u64 = 100_000_000;

/// Asset B moved into the pool at creation.
pub const POOL_AMOUNT_B: u64 = 2 * POOL_AMOUNT_A;

/// Asset A issued on top of the pool amount and kept by the trader for swaps.
pub const TRADER_AMOUNT_A: u64 = 100_000;

/// Policy asset funding the pool-creation fee.
pub const BOOTSTRAP_FUNDING: u64 = 100_000;

/// Policy asset funded before every swap to pay its fee.
pub const TRADE_FUNDING: u64 = 10_000;

pub const DEFAULT_RPC_SERVER: &str = "localhost:18884";
pub const DEFAULT_RPC_USER: &str = "user";
pub const DEFAULT_RPC_PASSWORD: &str = "pass";

pub const AMOUNT_PROMPT: &str = "Enter the amount of asset A you'd like to enter? ";
