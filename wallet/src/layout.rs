//! Input and output roles of the pool transactions.
//!
//! Each [`TxKind`] declares the order of its roles. Asset legs (`A` then `B`) always come
//! first because the covenant inspects inputs and outputs 0 and 1.

use crate::{
    error::{WalletError, WalletResult},
    utxo::UtxoRef,
};
use amm_pool::AssetId;
use std::{collections::BTreeMap, fmt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputRole {
    /// Trader output of asset A moved into the pool at creation.
    DepositA,
    /// Trader output of asset B moved into the pool at creation.
    DepositB,
    /// Pool leg of asset A.
    ReserveA,
    /// Pool leg of asset B.
    ReserveB,
    /// Policy-asset output paying the fee.
    Funding,
    /// Trader balance of asset A paying into the pool.
    Trader,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputRole {
    ReserveA,
    ReserveB,
    /// Asset B paid out to the trader.
    Payout,
    Fee,
    /// Unspent funding back to the trader. Omitted when empty.
    Change,
    /// Unspent trader balance of asset A. Omitted when empty.
    TraderChange,
}

pub trait Role: Copy + Eq + fmt::Display {
    /// Index the role must occupy when it is an asset leg.
    fn leg(self) -> Option<usize>;

    fn is_optional(self) -> bool;
}

impl InputRole {
    pub fn as_str(self) -> &'static str {
        match self {
            InputRole::DepositA => "deposit-a",
            InputRole::DepositB => "deposit-b",
            InputRole::ReserveA => "reserve-a",
            InputRole::ReserveB => "reserve-b",
            InputRole::Funding => "funding",
            InputRole::Trader => "trader",
        }
    }
}

impl Role for InputRole {
    fn leg(self) -> Option<usize> {
        match self {
            InputRole::DepositA | InputRole::ReserveA => Some(0),
            InputRole::DepositB | InputRole::ReserveB => Some(1),
            InputRole::Funding | InputRole::Trader => None,
        }
    }

    fn is_optional(self) -> bool {
        false
    }
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OutputRole {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputRole::ReserveA => "reserve-a",
            OutputRole::ReserveB => "reserve-b",
            OutputRole::Payout => "payout",
            OutputRole::Fee => "fee",
            OutputRole::Change => "change",
            OutputRole::TraderChange => "trader-change",
        }
    }
}

impl Role for OutputRole {
    fn leg(self) -> Option<usize> {
        match self {
            OutputRole::ReserveA => Some(0),
            OutputRole::ReserveB => Some(1),
            _ => None,
        }
    }

    fn is_optional(self) -> bool {
        matches!(self, OutputRole::Change)
    }
}

impl fmt::Display for OutputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxKind {
    PoolCreate,
    Swap,
}

const POOL_CREATE_INPUTS: &[InputRole] = &[InputRole::DepositA, InputRole::DepositB, InputRole::Funding];
const POOL_CREATE_OUTPUTS: &[OutputRole] = &[OutputRole::ReserveA, OutputRole::ReserveB, OutputRole::Fee, OutputRole::Change];
const SWAP_INPUTS: &[InputRole] = &[InputRole::ReserveA, InputRole::ReserveB, InputRole::Funding, InputRole::Trader];
const SWAP_OUTPUTS: &[OutputRole] = &[
    OutputRole::ReserveA,
    OutputRole::ReserveB,
    OutputRole::Payout,
    OutputRole::Fee,
    OutputRole::Change,
    OutputRole::TraderChange,
];

impl TxKind {
    pub fn inputs(self) -> &'static [InputRole] {
        match self {
            TxKind::PoolCreate => POOL_CREATE_INPUTS,
            TxKind::Swap => SWAP_INPUTS,
        }
    }

    pub fn outputs(self) -> &'static [OutputRole] {
        match self {
            TxKind::PoolCreate => POOL_CREATE_OUTPUTS,
            TxKind::Swap => SWAP_OUTPUTS,
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxKind::PoolCreate => f.write_str("pool-create"),
            TxKind::Swap => f.write_str("swap"),
        }
    }
}

/// Outputs to spend, keyed by the role they play.
pub type RoleMap = BTreeMap<InputRole, UtxoRef>;

/// Asset each role carries in a given pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetRoles {
    pub asset_a: AssetId,
    pub asset_b: AssetId,
    pub policy: AssetId,
}

impl AssetRoles {
    pub fn of_input(&self, role: InputRole) -> AssetId {
        match role {
            InputRole::DepositA | InputRole::ReserveA | InputRole::Trader => self.asset_a,
            InputRole::DepositB | InputRole::ReserveB => self.asset_b,
            InputRole::Funding => self.policy,
        }
    }

    pub fn of_output(&self, role: OutputRole) -> AssetId {
        match role {
            OutputRole::ReserveA | OutputRole::TraderChange => self.asset_a,
            OutputRole::ReserveB | OutputRole::Payout => self.asset_b,
            OutputRole::Fee | OutputRole::Change => self.policy,
        }
    }
}

/// Orders `inputs` by the layout of `kind`, checking each output holds the asset of its role.
pub fn arrange_inputs(kind: TxKind, mut inputs: RoleMap, assets: &AssetRoles) -> WalletResult<Vec<(InputRole, UtxoRef)>> {
    let arranged = kind
        .inputs()
        .iter()
        .map(|&role| {
            let utxo = inputs.remove(&role).ok_or_else(|| WalletError::LayoutMismatch(format!("{kind} is missing input {role}")))?;
            let expected = assets.of_input(role);
            if utxo.asset != expected {
                return Err(WalletError::AssetMismatch { role, expected, actual: utxo.asset });
            }
            Ok((role, utxo))
        })
        .collect::<WalletResult<Vec<_>>>()?;

    match inputs.keys().next() {
        Some(role) => Err(WalletError::LayoutMismatch(format!("{kind} does not take input {role}"))),
        None => Ok(arranged),
    }
}

/// Checks `roles` against the declared `layout`, where optional roles may be absent, and
/// that every asset leg sits at its index.
pub fn check_sequence<R: Role>(kind: TxKind, layout: &[R], roles: &[R]) -> WalletResult<()> {
    let mut actual = roles.iter().copied().peekable();
    for &expected in layout {
        match actual.peek() {
            Some(&role) if role == expected => {
                actual.next();
            }
            _ if expected.is_optional() => {}
            Some(&role) => return Err(WalletError::LayoutMismatch(format!("{kind} expects {expected}, found {role}"))),
            None => return Err(WalletError::LayoutMismatch(format!("{kind} is missing {expected}"))),
        }
    }
    if let Some(role) = actual.next() {
        return Err(WalletError::LayoutMismatch(format!("{kind} does not take {role}")));
    }

    roles.iter().enumerate().try_for_each(|(index, role)| match role.leg() {
        Some(leg) if leg != index => Err(WalletError::LayoutMismatch(format!("{role} must sit at index {leg}, found at {index}"))),
        _ => Ok(()),
    })
}
