//! Drives a pool from bootstrap through the interactive trade loop.
//!
//! The phases run in order: `Bootstrapping` funds the trader and issues both assets,
//! `FundingPool` locks the pool amounts into the covenant, `PoolCreated` deposits the trader's
//! asset A and records the first [`PoolState`], and `TradingLoop` swaps until the amount
//! source runs dry or shutdown is signalled.

use crate::{
    constants::{BOOTSTRAP_FUNDING, POOL_AMOUNT_A, POOL_AMOUNT_B, TRADER_AMOUNT_A, TRADE_FUNDING},
    error::{TraderError, TraderResult},
    input::AmountSource,
    report::TradeReport,
};
use amm_core::{info, signals::Shutdown};
use amm_pool::{AssetId, InvariantMode, PoolState, Reserve, TradeRequest};
use amm_txscript::CovenantScript;
use amm_wallet::{CovenantPool, InputRole, RoleMap, UtxoRef, Wallet};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Bootstrapping,
    FundingPool,
    PoolCreated,
    TradingLoop,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Bootstrapping => f.write_str("bootstrapping"),
            Phase::FundingPool => f.write_str("funding the pool"),
            Phase::PoolCreated => f.write_str("pool created"),
            Phase::TradingLoop => f.write_str("trading"),
        }
    }
}

/// Amounts in sats of the bootstrap and of each trade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    pub pool_amount_a: u64,
    pub pool_amount_b: u64,
    pub trader_amount_a: u64,
    pub bootstrap_funding: u64,
    pub trade_funding: u64,
    pub mode: InvariantMode,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            pool_amount_a: POOL_AMOUNT_A,
            pool_amount_b: POOL_AMOUNT_B,
            trader_amount_a: TRADER_AMOUNT_A,
            bootstrap_funding: BOOTSTRAP_FUNDING,
            trade_funding: TRADE_FUNDING,
            mode: InvariantMode::default(),
        }
    }
}

/// Trader outputs ready to seed the pool.
#[derive(Clone, Debug)]
pub struct Bootstrap {
    pub asset_a: AssetId,
    pub asset_b: AssetId,
    pub deposit_a: UtxoRef,
    pub deposit_b: UtxoRef,
    pub funding: UtxoRef,
}

pub struct Controller {
    wallet: Wallet,
    config: ControllerConfig,
    shutdown: Shutdown,
}

impl Controller {
    pub fn new(wallet: Wallet, config: ControllerConfig, shutdown: Shutdown) -> Self {
        Self { wallet, config, shutdown }
    }

    fn enter(&self, phase: Phase) {
        info!("Phase: {}", phase);
    }

    /// Runs every phase and returns the pool state left after the last trade.
    pub async fn run(&self, source: &mut dyn AmountSource) -> TraderResult<PoolState> {
        let bootstrap = self.bootstrap().await?;
        let (pool, pool_txid) = self.fund_pool(&bootstrap).await?;
        let state = self.open_pool(&pool, pool_txid).await?;
        self.trading_loop(&pool, state, source).await
    }

    pub async fn bootstrap(&self) -> TraderResult<Bootstrap> {
        self.enter(Phase::Bootstrapping);
        let node = self.wallet.node();
        let policy = self.wallet.assembler().policy_asset();
        info!("Trader address {}", self.wallet.trader_address()?);

        let funding = self.wallet.fund_trader(self.config.bootstrap_funding, &policy).await?;
        info!("Funded {} sats of the policy asset in {}", funding.value, funding.location.txid);

        let issued_a = node.issue_asset(self.config.pool_amount_a + self.config.trader_amount_a, 0).await?;
        info!("Issued asset A {} in {}", issued_a.asset, issued_a.txid);
        let deposit_a = self.wallet.fund_trader(self.config.pool_amount_a, &issued_a.asset).await?;

        let issued_b = node.issue_asset(self.config.pool_amount_b, 0).await?;
        info!("Issued asset B {} in {}", issued_b.asset, issued_b.txid);
        let deposit_b = self.wallet.fund_trader(self.config.pool_amount_b, &issued_b.asset).await?;

        Ok(Bootstrap { asset_a: issued_a.asset, asset_b: issued_b.asset, deposit_a, deposit_b, funding })
    }

    /// Locks both deposits into a fresh covenant and returns it with the creation txid.
    pub async fn fund_pool(&self, bootstrap: &Bootstrap) -> TraderResult<(CovenantPool, String)> {
        self.enter(Phase::FundingPool);
        let genesis_product = bootstrap.deposit_a.value as u128 * bootstrap.deposit_b.value as u128;
        let script = CovenantScript::build(bootstrap.asset_a, bootstrap.asset_b, genesis_product, self.config.mode)?;
        let pool = CovenantPool::new(script, self.wallet.network())?;
        info!("Covenant address {} ({} mode, genesis product {})", pool.address(), self.config.mode, genesis_product);

        let inputs = RoleMap::from([
            (InputRole::DepositA, bootstrap.deposit_a.clone()),
            (InputRole::DepositB, bootstrap.deposit_b.clone()),
            (InputRole::Funding, bootstrap.funding.clone()),
        ]);
        let txid = self.wallet.create_pool(&pool, inputs).await?;
        Ok((pool, txid))
    }

    /// Deposits the trader's asset A and records the first pool state.
    pub async fn open_pool(&self, pool: &CovenantPool, pool_txid: String) -> TraderResult<PoolState> {
        self.enter(Phase::PoolCreated);
        let trader = self.wallet.fund_trader(self.config.trader_amount_a, &pool.asset_a()).await?;
        let state = PoolState::new(
            pool_txid,
            Reserve::new(pool.asset_a(), self.config.pool_amount_a),
            Reserve::new(pool.asset_b(), self.config.pool_amount_b),
            trader.value,
            trader.location,
            self.config.mode,
        )?;
        let (reserve_a, reserve_b) = (state.reserve_a().balance, state.reserve_b().balance);
        info!("Pool {} holds {} A and {} B, product {}", state.txid(), reserve_a, reserve_b, state.product());
        Ok(state)
    }

    /// Swaps `amount_in` of asset A and returns the successor state.
    pub async fn trade(&self, pool: &CovenantPool, state: PoolState, amount_in: u64) -> TraderResult<PoolState> {
        let wallet = &self.wallet;
        let trade_funding = self.config.trade_funding;
        state
            .advance(TradeRequest::new(amount_in), |swap| async move {
                let funding = wallet.fund_trader(trade_funding, &wallet.assembler().policy_asset()).await?;
                let result = wallet.swap(pool, &swap, funding).await?;
                println!("{}", TradeReport::new(result.txid.clone(), &swap));
                Ok::<_, TraderError>(result)
            })
            .await
    }

    /// Trades one amount per entry of `source` until it is exhausted or shutdown fires.
    pub async fn trading_loop(
        &self,
        pool: &CovenantPool,
        mut state: PoolState,
        source: &mut dyn AmountSource,
    ) -> TraderResult<PoolState> {
        self.enter(Phase::TradingLoop);
        let shutdown = self.shutdown.listener();
        while !self.shutdown.is_triggered() {
            let amount = tokio::select! {
                biased;
                _ = shutdown.clone() => break,
                amount = source.next_amount() => amount?,
            };
            let Some(amount) = amount else {
                info!("No more trade amounts");
                break;
            };
            state = self.trade(pool, state, amount).await?;
        }
        info!("Trading stopped at pool {}", state.txid());
        Ok(state)
    }
}
