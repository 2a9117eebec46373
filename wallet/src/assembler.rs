//! Builds and signs the pool-creation and swap transactions.

use crate::{
    covenant::CovenantPool,
    error::{WalletError, WalletResult},
    keys::TraderKeys,
    layout::{arrange_inputs, AssetRoles, InputRole, OutputRole, RoleMap, TxKind},
    pset::Pset,
    role::{Constructor, Extractor},
    utxo::UtxoRef,
};
use amm_core::debug;
use amm_pool::{AssetId, Swap, UtxoLocation};

/// Fee paid by every assembled transaction, in policy-asset sats.
pub const DEFAULT_FEE: u64 = 3_000;

#[derive(Clone, Debug)]
pub struct Assembler {
    keys: TraderKeys,
    policy_asset: AssetId,
    fee: u64,
}

impl Assembler {
    pub fn new(keys: TraderKeys, policy_asset: AssetId, fee: u64) -> Self {
        Self { keys, policy_asset, fee }
    }

    pub fn keys(&self) -> &TraderKeys {
        &self.keys
    }

    pub fn policy_asset(&self) -> AssetId {
        self.policy_asset
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    fn asset_roles(&self, pool: &CovenantPool) -> AssetRoles {
        AssetRoles { asset_a: pool.asset_a(), asset_b: pool.asset_b(), policy: self.policy_asset }
    }

    fn change(&self, funding: &UtxoRef) -> WalletResult<u64> {
        funding.value.checked_sub(self.fee).ok_or(WalletError::InsufficientFunding { funding: funding.value, fee: self.fee })
    }

    /// Moves both deposits into the covenant: inputs `[DepositA, DepositB, Funding]`,
    /// outputs `[ReserveA, ReserveB, Fee, Change]`.
    pub fn build_pool_create(&self, pool: &CovenantPool, inputs: RoleMap) -> WalletResult<Pset<Extractor>> {
        let assets = self.asset_roles(pool);
        let inputs = arrange_inputs(TxKind::PoolCreate, inputs, &assets)?;
        let value_of = |role| inputs.iter().find(|(r, _)| *r == role).map(|(_, utxo)| utxo.value).unwrap_or_default();
        let change = inputs.iter().find(|(role, _)| *role == InputRole::Funding).map(|(_, utxo)| self.change(utxo)).transpose()?;

        let pset = inputs.iter().cloned().fold(Pset::new(TxKind::PoolCreate), |pset, (role, utxo)| pset.input(role, utxo));
        let pset = pset
            .output(OutputRole::ReserveA, assets.asset_a, value_of(InputRole::DepositA), pool.script_pubkey().to_vec())
            .output(OutputRole::ReserveB, assets.asset_b, value_of(InputRole::DepositB), pool.script_pubkey().to_vec());
        let pset = self.pay_fee(pset, change.unwrap_or_default());
        debug!("pool-create moves {} and {} into {}", value_of(InputRole::DepositA), value_of(InputRole::DepositB), pool.address());
        self.finish(pset, pool)
    }

    /// Spends both pool legs and the trader balance: inputs `[ReserveA, ReserveB, Funding, Trader]`,
    /// outputs `[ReserveA, ReserveB, Payout, Fee, Change, TraderChange]`.
    ///
    /// The trader must keep a positive balance of asset A. Quoted swaps always do, so only a
    /// hand-built [`Swap`] can be refused here.
    pub fn build_swap(&self, pool: &CovenantPool, swap: &Swap, funding: UtxoRef) -> WalletResult<Pset<Extractor>> {
        if swap.new_user_balance == 0 {
            return Err(WalletError::LayoutMismatch(format!("swap of {} leaves no trader change", swap.amount_in)));
        }
        let assets = self.asset_roles(pool);
        let trader = self.keys.script_pubkey();
        let leg = |vout, asset, value| {
            UtxoRef::new(UtxoLocation::new(swap.pool_txid.clone(), vout), asset, value, pool.script_pubkey().to_vec())
        };
        let change = self.change(&funding)?;
        let inputs = RoleMap::from([
            (InputRole::ReserveA, leg(0, swap.reserve_a.asset, swap.reserve_a.balance)),
            (InputRole::ReserveB, leg(1, swap.reserve_b.asset, swap.reserve_b.balance)),
            (InputRole::Funding, funding),
            (InputRole::Trader, UtxoRef::new(swap.user_location.clone(), assets.asset_a, swap.user_balance, trader.clone())),
        ]);
        let inputs = arrange_inputs(TxKind::Swap, inputs, &assets)?;

        let pset = inputs.into_iter().fold(Pset::new(TxKind::Swap), |pset, (role, utxo)| pset.input(role, utxo));
        let pset = pset
            .output(OutputRole::ReserveA, assets.asset_a, swap.new_reserve_a, pool.script_pubkey().to_vec())
            .output(OutputRole::ReserveB, assets.asset_b, swap.new_reserve_b, pool.script_pubkey().to_vec())
            .output(OutputRole::Payout, assets.asset_b, swap.amount_out, trader.clone());
        let pset = self.pay_fee(pset, change).output(OutputRole::TraderChange, assets.asset_a, swap.new_user_balance, trader);
        debug!("swap of {} for {} against pool {}", swap.amount_in, swap.amount_out, swap.pool_txid);
        self.finish(pset, pool)
    }

    fn pay_fee(&self, pset: Pset<Constructor>, change: u64) -> Pset<Constructor> {
        let pset = pset.output(OutputRole::Fee, self.policy_asset, self.fee, vec![]);
        match change {
            0 => pset,
            change => pset.output(OutputRole::Change, self.policy_asset, change, self.keys.script_pubkey()),
        }
    }

    fn finish(&self, pset: Pset<Constructor>, pool: &CovenantPool) -> WalletResult<Pset<Extractor>> {
        pset.signer()?.sign(&self.keys)?.finalizer().finalize(pool)?.extractor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;
    use amm_pool::{InvariantMode, PoolState, TradeRequest};
    use amm_txscript::CovenantScript;

    const POOL_TXID: &str = "1111111111111111111111111111111111111111111111111111111111111111";
    const TXID: &str = "2222222222222222222222222222222222222222222222222222222222222222";

    struct Fixture {
        assembler: Assembler,
        pool: CovenantPool,
        asset_a: AssetId,
        asset_b: AssetId,
        policy: AssetId,
    }

    fn fixture(reserve_a: u64, reserve_b: u64) -> Fixture {
        let (asset_a, asset_b) = (AssetId::from_bytes([0xaa; 32]), AssetId::from_bytes([0xbb; 32]));
        let policy = AssetId::from_bytes([0x01; 32]);
        let script = CovenantScript::build(asset_a, asset_b, reserve_a as u128 * reserve_b as u128, InvariantMode::Genesis).unwrap();
        Fixture {
            assembler: Assembler::new(TraderKeys::generate(), policy, DEFAULT_FEE),
            pool: CovenantPool::new(script, Network::ElementsRegtest).unwrap(),
            asset_a,
            asset_b,
            policy,
        }
    }

    fn funding(f: &Fixture, value: u64) -> UtxoRef {
        UtxoRef::new(UtxoLocation::new(TXID, 0), f.policy, value, f.assembler.keys().script_pubkey())
    }

    fn assert_conserved(pset: &Pset<Extractor>, assets: &[AssetId]) {
        for asset in assets {
            assert_eq!(pset.input_sum(asset), pset.output_sum(asset), "asset {asset} is not conserved");
        }
    }

    fn assert_legs(pset: &Pset<Extractor>, pool: &CovenantPool, f: &Fixture) {
        assert_eq!(pset.outputs[0].asset, f.asset_a);
        assert_eq!(pset.outputs[1].asset, f.asset_b);
        assert!(pset.outputs[..2].iter().all(|output| output.script_pubkey == pool.script_pubkey()));
        assert!(pset.outputs[2..].iter().all(|output| output.script_pubkey != pool.script_pubkey()));
    }

    #[test]
    fn test_pool_create() {
        let f = fixture(100_000_000, 200_000_000);
        let trader = f.assembler.keys().script_pubkey();
        let inputs = RoleMap::from([
            (InputRole::DepositA, UtxoRef::new(UtxoLocation::new(TXID, 1), f.asset_a, 100_000_000, trader.clone())),
            (InputRole::DepositB, UtxoRef::new(UtxoLocation::new(TXID, 2), f.asset_b, 200_000_000, trader)),
            (InputRole::Funding, funding(&f, 100_000)),
        ]);
        let pset = f.assembler.build_pool_create(&f.pool, inputs).unwrap();

        assert_conserved(&pset, &[f.asset_a, f.asset_b, f.policy]);
        assert_legs(&pset, &f.pool, &f);
        assert_eq!(pset.outputs[0].value, 100_000_000);
        assert_eq!(pset.outputs[1].value, 200_000_000);
        assert_eq!(pset.output_index(OutputRole::Fee), Some(2));
        assert!(pset.outputs[2].script_pubkey.is_empty());
        assert_eq!(pset.outputs[3].value, 100_000 - DEFAULT_FEE);

        let tx = pset.extract_tx().unwrap();
        assert!(tx.input.iter().all(|input| input.witness.script_witness.len() == 2));
    }

    #[test]
    fn test_pool_create_rejects_wrong_assets() {
        let f = fixture(1_000, 2_000);
        let trader = f.assembler.keys().script_pubkey();
        let inputs = RoleMap::from([
            (InputRole::DepositA, UtxoRef::new(UtxoLocation::new(TXID, 1), f.asset_b, 1_000, trader.clone())),
            (InputRole::DepositB, UtxoRef::new(UtxoLocation::new(TXID, 2), f.asset_a, 2_000, trader)),
            (InputRole::Funding, funding(&f, 10_000)),
        ]);
        let result = f.assembler.build_pool_create(&f.pool, inputs);
        assert!(matches!(result, Err(WalletError::AssetMismatch { role: InputRole::DepositA, .. })));
    }

    fn quote(f: &Fixture, amount_in: u64, user_balance: u64) -> Swap {
        let state = PoolState::new(
            POOL_TXID.to_string(),
            amm_pool::Reserve::new(f.asset_a, 100_000_000),
            amm_pool::Reserve::new(f.asset_b, 200_000_000),
            user_balance,
            UtxoLocation::new(TXID, 3),
            InvariantMode::Genesis,
        )
        .unwrap();
        state.quote(TradeRequest::new(amount_in)).unwrap()
    }

    #[test]
    fn test_swap() {
        let f = fixture(100_000_000, 200_000_000);
        let swap = quote(&f, 10_000, 100_000);
        let pset = f.assembler.build_swap(&f.pool, &swap, funding(&f, 10_000)).unwrap();

        assert_conserved(&pset, &[f.asset_a, f.asset_b, f.policy]);
        assert_legs(&pset, &f.pool, &f);
        assert_eq!(pset.outputs[0].value, 100_010_000);
        assert_eq!(pset.outputs[1].value, 200_000_000 - swap.amount_out);
        assert_eq!(pset.outputs[2].value, swap.amount_out);
        assert_eq!(pset.output_index(OutputRole::TraderChange), Some(5));
        assert_eq!(pset.outputs[5].value, 90_000);

        let tx = pset.extract_tx().unwrap();
        assert_eq!(tx.input[0].previous_output.vout, 0);
        assert_eq!(tx.input[1].previous_output.vout, 1);
        assert_eq!(tx.input[0].witness.script_witness, f.pool.commitment().witness());
        assert_eq!(tx.input[3].previous_output.vout, 3);
    }

    #[test]
    fn test_swap_draining_the_trader() {
        let f = fixture(100_000_000, 200_000_000);
        let mut swap = quote(&f, 10_000, 100_000);
        swap.user_balance = 10_000;
        swap.new_user_balance = 0;
        let result = f.assembler.build_swap(&f.pool, &swap, funding(&f, DEFAULT_FEE));
        assert!(matches!(result, Err(WalletError::LayoutMismatch(_))));
    }

    #[test]
    fn test_swap_without_change() {
        let f = fixture(100_000_000, 200_000_000);
        let swap = quote(&f, 10_000, 100_000);
        let pset = f.assembler.build_swap(&f.pool, &swap, funding(&f, DEFAULT_FEE)).unwrap();
        assert_conserved(&pset, &[f.asset_a, f.asset_b, f.policy]);
        assert_eq!(pset.outputs.len(), 5);
        assert_eq!(pset.output_index(OutputRole::Change), None);
        assert_eq!(pset.output_index(OutputRole::TraderChange), Some(4));
    }

    #[test]
    fn test_swap_insufficient_funding() {
        let f = fixture(100_000_000, 200_000_000);
        let swap = quote(&f, 10_000, 100_000);
        let result = f.assembler.build_swap(&f.pool, &swap, funding(&f, DEFAULT_FEE - 1));
        assert!(matches!(result, Err(WalletError::InsufficientFunding { funding: 2_999, fee: DEFAULT_FEE })));
    }
}
