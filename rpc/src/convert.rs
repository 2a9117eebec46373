//! Conversions between satoshis and the node's decimal units.

pub const SATS_PER_UNIT: u64 = 100_000_000;

/// Node amounts are decimal numbers with 8 places. Float noise is rounded away.
pub fn units_to_sats(units: f64) -> u64 {
    (units * SATS_PER_UNIT as f64).round() as u64
}

pub fn sats_to_units(sats: u64) -> f64 {
    sats as f64 / SATS_PER_UNIT as f64
}
