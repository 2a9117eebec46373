//! Pool state tracking.
//!
//! A [`PoolState`] describes the pool after the last confirmed pool transaction. It changes
//! only through [`PoolState::apply_trade`], which consumes it, so at most one trade can be
//! built on top of a given state.

use crate::{
    asset::AssetId,
    error::{PoolResult, TradeError},
    formula::{payout_for_input, spot_rate},
    mode::InvariantMode,
};
use amm_core::debug;
use std::{fmt::Display, future::Future};

/// Largest value the covenant's 64-bit arithmetic accepts.
pub const MAX_SCRIPT_VALUE: u128 = i64::MAX as u128;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reserve {
    pub asset: AssetId,
    pub balance: u64,
}

impl Reserve {
    pub fn new(asset: AssetId, balance: u64) -> Self {
        Self { asset, balance }
    }

    fn with_balance(self, balance: u64) -> Self {
        Self { balance, ..self }
    }
}

/// An outpoint, the txid in display order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UtxoLocation {
    pub txid: String,
    pub vout: u32,
}

impl UtxoLocation {
    pub fn new(txid: impl Into<String>, vout: u32) -> Self {
        Self { txid: txid.into(), vout }
    }
}

impl Display for UtxoLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TradeRequest {
    pub amount_in: u64,
}

impl TradeRequest {
    pub fn new(amount_in: u64) -> Self {
        Self { amount_in }
    }
}

/// A validated trade of asset A for asset B, ready to be settled on chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Swap {
    /// Transaction holding the pool legs at outputs 0 and 1.
    pub pool_txid: String,
    pub reserve_a: Reserve,
    pub reserve_b: Reserve,
    pub user_location: UtxoLocation,
    pub user_balance: u64,
    pub amount_in: u64,
    pub amount_out: u64,
    pub new_reserve_a: u64,
    pub new_reserve_b: u64,
    pub new_user_balance: u64,
    /// Units of B one unit of A bought before this trade.
    pub spot_rate: u64,
    pub new_product: u128,
}

impl Swap {
    /// Binds the swap to the transaction that settled it. `user_vout` is the output of that
    /// transaction holding the trader's remaining asset A.
    pub fn settle(&self, txid: impl Into<String>, user_vout: u32) -> TradeResult {
        let txid = txid.into();
        TradeResult {
            user_location: UtxoLocation::new(txid.clone(), user_vout),
            txid,
            amount_in: self.amount_in,
            new_reserve_a: self.new_reserve_a,
            new_reserve_b: self.new_reserve_b,
            new_user_balance: self.new_user_balance,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradeResult {
    pub txid: String,
    pub amount_in: u64,
    pub new_reserve_a: u64,
    pub new_reserve_b: u64,
    pub new_user_balance: u64,
    pub user_location: UtxoLocation,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PoolState {
    txid: String,
    reserve_a: Reserve,
    reserve_b: Reserve,
    user_balance: u64,
    user_location: UtxoLocation,
    genesis_product: u128,
    mode: InvariantMode,
}

impl PoolState {
    /// State of a freshly created pool whose legs sit at outputs 0 and 1 of `txid`.
    /// The product of the two reserves becomes the genesis product.
    pub fn new(
        txid: impl Into<String>,
        reserve_a: Reserve,
        reserve_b: Reserve,
        user_balance: u64,
        user_location: UtxoLocation,
        mode: InvariantMode,
    ) -> PoolResult<Self> {
        for reserve in [&reserve_a, &reserve_b] {
            if reserve.balance == 0 {
                return Err(TradeError::EmptyReserve(reserve.asset));
            }
        }
        if user_balance == 0 {
            return Err(TradeError::InsufficientBalance { amount_in: 0, balance: 0 });
        }
        let genesis_product = reserve_a.balance as u128 * reserve_b.balance as u128;
        if genesis_product > MAX_SCRIPT_VALUE {
            return Err(TradeError::ProductOverflow(genesis_product));
        }
        Ok(Self { txid: txid.into(), reserve_a, reserve_b, user_balance, user_location, genesis_product, mode })
    }

    pub fn txid(&self) -> &str {
        &self.txid
    }

    pub fn reserve_a(&self) -> Reserve {
        self.reserve_a
    }

    pub fn reserve_b(&self) -> Reserve {
        self.reserve_b
    }

    pub fn user_balance(&self) -> u64 {
        self.user_balance
    }

    pub fn user_location(&self) -> &UtxoLocation {
        &self.user_location
    }

    pub fn genesis_product(&self) -> u128 {
        self.genesis_product
    }

    pub fn mode(&self) -> InvariantMode {
        self.mode
    }

    pub fn product(&self) -> u128 {
        self.reserve_a.balance as u128 * self.reserve_b.balance as u128
    }

    /// Sizes and validates a trade of `request.amount_in` asset A without touching the state.
    ///
    /// Besides balance checks, the quote is held to what the covenant will verify on chain,
    /// so a transaction the node would reject is never built.
    pub fn quote(&self, request: TradeRequest) -> PoolResult<Swap> {
        let amount_in = request.amount_in;
        let (reserve_a, reserve_b) = (self.reserve_a.balance, self.reserve_b.balance);
        let amount_out = payout_for_input(reserve_b, reserve_a, amount_in)?;

        let new_reserve_a =
            reserve_a.checked_add(amount_in).ok_or(TradeError::ProductOverflow(reserve_a as u128 + amount_in as u128))?;
        let new_reserve_b = debit_reserve(reserve_b, amount_out)?;
        let new_user_balance = match self.user_balance.checked_sub(amount_in) {
            Some(balance) if balance > 0 => balance,
            _ => return Err(TradeError::InsufficientBalance { amount_in, balance: self.user_balance }),
        };

        let new_product = new_reserve_a as u128 * new_reserve_b as u128;
        self.check_covenant(new_product)?;

        let swap = Swap {
            pool_txid: self.txid.clone(),
            reserve_a: self.reserve_a,
            reserve_b: self.reserve_b,
            user_location: self.user_location.clone(),
            user_balance: self.user_balance,
            amount_in,
            amount_out,
            new_reserve_a,
            new_reserve_b,
            new_user_balance,
            spot_rate: spot_rate(reserve_b, reserve_a),
            new_product,
        };
        debug!("Quoted {} A for {} B on pool {}, new product {}", amount_in, amount_out, self.txid, new_product);
        Ok(swap)
    }

    /// Mirrors the covenant: the genesis floor, the rolling floor when enabled, and the bound on
    /// rounding drift, all within signed 64-bit arithmetic.
    fn check_covenant(&self, new_product: u128) -> PoolResult<()> {
        let old_product = self.product();
        let drift_bound = old_product + self.reserve_a.balance as u128 + self.reserve_b.balance as u128;
        if new_product > MAX_SCRIPT_VALUE {
            return Err(TradeError::ProductOverflow(new_product));
        }
        if drift_bound > MAX_SCRIPT_VALUE {
            return Err(TradeError::ProductOverflow(drift_bound));
        }
        if new_product < self.genesis_product {
            return Err(TradeError::InvariantViolation { product: new_product, reason: "below the genesis product" });
        }
        if self.mode == InvariantMode::RollingPrevious && new_product < old_product {
            let reason = "below the product before the trade";
            return Err(TradeError::InvariantViolation { product: new_product, reason });
        }
        if new_product > drift_bound {
            return Err(TradeError::InvariantViolation { product: new_product, reason: "drift exceeds the input reserve sum" });
        }
        Ok(())
    }

    /// The only state transition: consumes the state and returns its successor bound to the
    /// settled transaction.
    pub fn apply_trade(self, result: TradeResult) -> PoolResult<PoolState> {
        if result.new_reserve_a == 0 {
            let reserve = self.reserve_a.balance;
            return Err(TradeError::ReserveExhaustion { reserve, amount: reserve });
        }
        if result.new_reserve_b == 0 {
            let reserve = self.reserve_b.balance;
            return Err(TradeError::ReserveExhaustion { reserve, amount: reserve });
        }
        if result.new_user_balance == 0 {
            return Err(TradeError::InsufficientBalance { amount_in: result.amount_in, balance: self.user_balance });
        }
        let new_product = result.new_reserve_a as u128 * result.new_reserve_b as u128;
        if new_product < self.genesis_product {
            return Err(TradeError::InvariantViolation { product: new_product, reason: "below the genesis product" });
        }

        debug!("Pool moved from {} to {}", self.txid, result.txid);
        Ok(PoolState {
            txid: result.txid,
            reserve_a: self.reserve_a.with_balance(result.new_reserve_a),
            reserve_b: self.reserve_b.with_balance(result.new_reserve_b),
            user_balance: result.new_user_balance,
            user_location: result.user_location,
            genesis_product: self.genesis_product,
            mode: self.mode,
        })
    }

    /// Quotes `request`, hands the swap to `settle` and applies the result it returns.
    ///
    /// `settle` builds and broadcasts the transaction. Its errors are returned as is and the
    /// state is dropped with them: after a failed broadcast the caller cannot know whether the
    /// pool moved.
    pub async fn advance<F, Fut, E>(self, request: TradeRequest, settle: F) -> Result<PoolState, E>
    where
        F: FnOnce(Swap) -> Fut,
        Fut: Future<Output = Result<TradeResult, E>>,
        E: From<TradeError>,
    {
        let swap = self.quote(request)?;
        let result = settle(swap).await?;
        Ok(self.apply_trade(result)?)
    }
}

/// Takes `amount` out of a reserve that must stay positive afterwards.
///
/// Quoted payouts are always below the reserve they are paid from, so for quotes this only
/// fails when the formula does.
fn debit_reserve(reserve: u64, amount: u64) -> PoolResult<u64> {
    match reserve.checked_sub(amount) {
        Some(balance) if balance > 0 => Ok(balance),
        _ => Err(TradeError::ReserveExhaustion { reserve, amount }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const POOL_TXID: &str = "5e1f5c3c7b5f0e1b2cf1d3c44f6f0ad9d2e2e9ad14fbe0a8a7e1ec1d4c2b9e01";
    const SWAP_TXID: &str = "a3f0e9b1c2d3e4f5061728394a5b6c7d8e9f00112233445566778899aabbccdd";

    fn asset(byte: u8) -> AssetId {
        AssetId::from_bytes([byte; 32])
    }

    fn pool(reserve_a: u64, reserve_b: u64, user_balance: u64, mode: InvariantMode) -> PoolState {
        PoolState::new(
            POOL_TXID,
            Reserve::new(asset(0xaa), reserve_a),
            Reserve::new(asset(0xbb), reserve_b),
            user_balance,
            UtxoLocation::new("deposit", 0),
            mode,
        )
        .unwrap()
    }

    #[test]
    fn test_quote_reference_trade() {
        let state = pool(100_000_000, 200_000_000, 100_000, InvariantMode::Genesis);
        let swap = state.quote(TradeRequest::new(6)).unwrap();
        assert_eq!(swap.amount_out, 11);
        assert_eq!(swap.new_reserve_a, 100_000_006);
        assert_eq!(swap.new_reserve_b, 199_999_989);
        assert_eq!(swap.new_user_balance, 99_994);
        assert_eq!(swap.spot_rate, 1);
        assert_eq!(swap.new_product, 100_000_006u128 * 199_999_989);
        assert_eq!(swap.pool_txid, POOL_TXID);
    }

    #[test]
    fn test_quote_rejections() {
        struct Test {
            name: &'static str,
            state: PoolState,
            amount_in: u64,
            expected: TradeError,
        }

        let tests = vec![
            Test {
                name: "dust input",
                state: pool(1_000, 100, 10, InvariantMode::Genesis),
                amount_in: 1,
                expected: TradeError::Swap(crate::SwapError::InvalidSwap { reserve_out: 100, reserve_in: 1_000, amount_in: 1 }),
            },
            Test {
                name: "spends the whole balance",
                state: pool(1_000, 1_000, 100, InvariantMode::Genesis),
                amount_in: 100,
                expected: TradeError::InsufficientBalance { amount_in: 100, balance: 100 },
            },
            Test {
                name: "exceeds the balance",
                state: pool(1_000, 1_000, 100, InvariantMode::Genesis),
                amount_in: 500,
                expected: TradeError::InsufficientBalance { amount_in: 500, balance: 100 },
            },
            Test {
                name: "drift bound beyond script arithmetic",
                state: pool(3_037_000_499, 3_037_000_499, 1_000, InvariantMode::Genesis),
                amount_in: 10,
                expected: TradeError::ProductOverflow(9_223_372_037_000_249_999),
            },
        ];

        for test in tests {
            let result = test.state.quote(TradeRequest::new(test.amount_in));
            assert_eq!(result, Err(test.expected), "{}: wrong result", test.name);
        }
    }

    #[test]
    fn test_apply_trade_moves_the_pool() {
        let state = pool(100_000_000, 200_000_000, 100_000, InvariantMode::Genesis);
        let swap = state.quote(TradeRequest::new(6)).unwrap();
        let next = state.apply_trade(swap.settle(SWAP_TXID, 5)).unwrap();

        assert_eq!(next.txid(), SWAP_TXID);
        assert_eq!(next.reserve_a(), Reserve::new(asset(0xaa), 100_000_006));
        assert_eq!(next.reserve_b(), Reserve::new(asset(0xbb), 199_999_989));
        assert_eq!(next.user_balance(), 99_994);
        assert_eq!(next.user_location(), &UtxoLocation::new(SWAP_TXID, 5));
        assert_eq!(next.genesis_product(), 100_000_000u128 * 200_000_000);
    }

    #[test]
    fn test_apply_trade_rejects_drained_results() {
        let state = pool(1_000, 1_000, 100, InvariantMode::Genesis);
        let result = TradeResult {
            txid: SWAP_TXID.into(),
            amount_in: 10,
            new_reserve_a: 1_010,
            new_reserve_b: 0,
            new_user_balance: 90,
            user_location: UtxoLocation::new(SWAP_TXID, 5),
        };
        assert!(matches!(state.apply_trade(result), Err(TradeError::ReserveExhaustion { .. })));

        let state = pool(1_000, 1_000, 100, InvariantMode::Genesis);
        let result = TradeResult {
            txid: SWAP_TXID.into(),
            amount_in: 10,
            new_reserve_a: 1_000,
            new_reserve_b: 900,
            new_user_balance: 90,
            user_location: UtxoLocation::new(SWAP_TXID, 5),
        };
        assert!(matches!(state.apply_trade(result), Err(TradeError::InvariantViolation { .. })));
    }

    #[test]
    fn test_apply_trade_reports_the_requested_amount() {
        let state = pool(1_000, 1_000, 100, InvariantMode::Genesis);
        let result = TradeResult {
            txid: SWAP_TXID.into(),
            amount_in: 40,
            new_reserve_a: 1_040,
            new_reserve_b: 962,
            new_user_balance: 0,
            user_location: UtxoLocation::new(SWAP_TXID, 5),
        };
        assert_eq!(state.apply_trade(result), Err(TradeError::InsufficientBalance { amount_in: 40, balance: 100 }));
    }

    #[test]
    fn test_debit_reserve() {
        assert_eq!(debit_reserve(1_000, 999), Ok(1));
        assert_eq!(debit_reserve(1_000, 1_000), Err(TradeError::ReserveExhaustion { reserve: 1_000, amount: 1_000 }));
        assert_eq!(debit_reserve(1_000, 1_001), Err(TradeError::ReserveExhaustion { reserve: 1_000, amount: 1_001 }));
        assert_eq!(debit_reserve(0, 0), Err(TradeError::ReserveExhaustion { reserve: 0, amount: 0 }));
    }

    #[test]
    fn test_new_rejects_empty_reserves() {
        let result = PoolState::new(
            POOL_TXID,
            Reserve::new(asset(0xaa), 1_000),
            Reserve::new(asset(0xbb), 0),
            100,
            UtxoLocation::new("deposit", 0),
            InvariantMode::Genesis,
        );
        assert_eq!(result, Err(TradeError::EmptyReserve(asset(0xbb))));
    }

    #[test]
    fn test_new_rejects_oversized_genesis() {
        let result = PoolState::new(
            POOL_TXID,
            Reserve::new(asset(0xaa), u64::MAX),
            Reserve::new(asset(0xbb), 2),
            1,
            UtxoLocation::new("deposit", 0),
            InvariantMode::Genesis,
        );
        assert!(matches!(result, Err(TradeError::ProductOverflow(_))));
    }

    #[tokio::test]
    async fn test_advance_settles_and_applies() {
        let state = pool(100_000_000, 200_000_000, 100_000, InvariantMode::RollingPrevious);
        let next = state
            .advance(TradeRequest::new(6), |swap| async move {
                assert_eq!(swap.amount_out, 11);
                Ok::<_, TradeError>(swap.settle(SWAP_TXID, 5))
            })
            .await
            .unwrap();
        assert_eq!(next.txid(), SWAP_TXID);
        assert_eq!(next.mode(), InvariantMode::RollingPrevious);
    }

    #[tokio::test]
    async fn test_advance_skips_settlement_of_invalid_trades() {
        let state = pool(1_000, 1_000, 100, InvariantMode::Genesis);
        let mut settled = false;
        let result = state
            .advance(TradeRequest::new(1_000), |_| {
                settled = true;
                async { Err::<TradeResult, _>(TradeError::ProductOverflow(0)) }
            })
            .await;
        assert_eq!(result, Err(TradeError::InsufficientBalance { amount_in: 1_000, balance: 100 }));
        assert!(!settled);
    }

    proptest! {
        #[test]
        fn quotes_never_exhaust_a_reserve(reserve_a in 1u64..1u64 << 32, reserve_b in 1u64..1u64 << 31, amount_in in 1u64..) {
            let state = pool(reserve_a, reserve_b, u64::MAX, InvariantMode::Genesis);
            let result = state.quote(TradeRequest::new(amount_in));
            prop_assert!(!matches!(result, Err(TradeError::ReserveExhaustion { .. })), "quote exhausted a reserve: {:?}", result);
        }

        #[test]
        fn accepted_quotes_keep_the_invariant(
            reserve_a in 1u64..1u64 << 31,
            reserve_b in 1u64..1u64 << 31,
            amounts in proptest::collection::vec(1u64..1u64 << 24, 1..8),
            rolling in any::<bool>(),
        ) {
            let mode = if rolling { InvariantMode::RollingPrevious } else { InvariantMode::Genesis };
            let mut state = pool(reserve_a, reserve_b, u64::MAX >> 1, mode);
            let genesis = state.genesis_product();
            for (i, amount_in) in amounts.into_iter().enumerate() {
                let previous = state.product();
                let Ok(swap) = state.quote(TradeRequest::new(amount_in)) else { continue };
                prop_assert!(swap.amount_out < swap.reserve_b.balance);
                prop_assert!(swap.new_product >= genesis);
                prop_assert!(swap.new_product >= previous);
                prop_assert!(swap.new_product <= previous + swap.reserve_a.balance as u128 + swap.reserve_b.balance as u128);
                state = state.apply_trade(swap.settle(format!("{i:064x}"), 5)).unwrap();
            }
        }
    }
}
