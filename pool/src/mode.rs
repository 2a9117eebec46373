use std::{fmt::Display, str::FromStr};

/// Which floor the covenant enforces on the product of the reserves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InvariantMode {
    /// The product may never drop below the product the pool was created with.
    /// It does not follow the product of the most recent trade.
    #[default]
    Genesis,
    /// The genesis floor plus: each trade must not decrease the product it started from.
    RollingPrevious,
}

impl InvariantMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvariantMode::Genesis => "genesis",
            InvariantMode::RollingPrevious => "rolling",
        }
    }
}

impl Display for InvariantMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvariantMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "genesis" => Ok(InvariantMode::Genesis),
            "rolling" | "rolling-previous" => Ok(InvariantMode::RollingPrevious),
            _ => Err(format!("unknown invariant mode '{s}', expected 'genesis' or 'rolling'")),
        }
    }
}
