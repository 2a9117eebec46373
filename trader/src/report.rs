use amm_pool::Swap;
use std::fmt;

/// Summary printed after every settled swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradeReport {
    pub txid: String,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub amount_in: u64,
    pub amount_out: u64,
    pub spot_rate: u64,
    pub new_product: u128,
}

impl TradeReport {
    pub fn new(txid: impl Into<String>, swap: &Swap) -> Self {
        Self {
            txid: txid.into(),
            reserve_a: swap.reserve_a.balance,
            reserve_b: swap.reserve_b.balance,
            amount_in: swap.amount_in,
            amount_out: swap.amount_out,
            spot_rate: swap.spot_rate,
            new_product: swap.new_product,
        }
    }
}

impl fmt::Display for TradeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "swap {}", self.txid)?;
        writeln!(f, "  asset A pool amount: {}", self.reserve_a)?;
        writeln!(f, "  asset B pool amount: {}", self.reserve_b)?;
        writeln!(f, "  asset A swapped in:  {}", self.amount_in)?;
        writeln!(f, "  asset B swapped out: {}", self.amount_out)?;
        writeln!(f, "  1 asset A = {} asset B", self.spot_rate)?;
        write!(f, "  new product: {}", self.new_product)
    }
}
