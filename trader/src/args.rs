use crate::{
    constants::{DEFAULT_RPC_PASSWORD, DEFAULT_RPC_SERVER, DEFAULT_RPC_USER},
    error::{TraderError, TraderResult},
};
use amm_core::log::DEFAULT_LOG_FILTERS;
use amm_pool::InvariantMode;
use amm_wallet::{Network, DEFAULT_FEE};
use clap::{Arg, ArgMatches, Command};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub rpc_server: String,
    pub rpc_user: String,
    pub rpc_password: String,
    pub private_key: Option<String>,
    pub network: Network,
    pub fee: u64,
    pub invariant: InvariantMode,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            rpc_server: DEFAULT_RPC_SERVER.to_owned(),
            rpc_user: DEFAULT_RPC_USER.to_owned(),
            rpc_password: DEFAULT_RPC_PASSWORD.to_owned(),
            private_key: None,
            network: Network::default(),
            fee: DEFAULT_FEE,
            invariant: InvariantMode::default(),
            log_level: DEFAULT_LOG_FILTERS.to_owned(),
            log_dir: None,
        }
    }
}

impl Args {
    pub fn parse() -> TraderResult<Self> {
        Self::from_matches(&cli().get_matches())
    }

    pub fn from_matches(m: &ArgMatches) -> TraderResult<Self> {
        let defaults = Args::default();
        let string = |id: &str, default: String| m.get_one::<String>(id).cloned().unwrap_or(default);
        Ok(Args {
            rpc_server: string("rpcserver", defaults.rpc_server),
            rpc_user: string("rpcuser", defaults.rpc_user),
            rpc_password: string("rpcpassword", defaults.rpc_password),
            private_key: m.get_one::<String>("private-key").cloned(),
            network: m
                .get_one::<String>("network")
                .map(|s| s.parse::<Network>())
                .transpose()
                .map_err(TraderError::Argument)?
                .unwrap_or(defaults.network),
            fee: m.get_one::<u64>("fee").copied().unwrap_or(defaults.fee),
            invariant: m
                .get_one::<String>("invariant")
                .map(|s| s.parse::<InvariantMode>())
                .transpose()
                .map_err(TraderError::Argument)?
                .unwrap_or(defaults.invariant),
            log_level: string("loglevel", defaults.log_level),
            log_dir: m.get_one::<String>("logdir").cloned(),
        })
    }
}

pub fn cli() -> Command {
    let defaults = Args::default();
    Command::new("amm-trader")
        .about(format!("{} v{}", env!("CARGO_PKG_DESCRIPTION"), env!("CARGO_PKG_VERSION")))
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("rpcserver")
                .long("rpcserver")
                .short('s')
                .value_name("rpcserver")
                .default_value(defaults.rpc_server)
                .help("Elements node RPC server, host:port with an optional scheme"),
        )
        .arg(Arg::new("rpcuser").long("rpcuser").value_name("rpcuser").default_value(defaults.rpc_user).help("RPC user name"))
        .arg(
            Arg::new("rpcpassword")
                .long("rpcpassword")
                .value_name("rpcpassword")
                .default_value(defaults.rpc_password)
                .help("RPC password"),
        )
        .arg(
            Arg::new("private-key")
                .long("private-key")
                .short('k')
                .value_name("private-key")
                .help("Trader private key in hex format. A fresh key is generated when absent"),
        )
        .arg(
            Arg::new("network")
                .long("network")
                .value_name("network")
                .default_value(defaults.network.as_str())
                .value_parser(["elementsregtest", "liquidtestnet", "liquid"])
                .help("Network the addresses are encoded for"),
        )
        .arg(
            Arg::new("fee")
                .long("fee")
                .value_name("sats")
                .default_value(defaults.fee.to_string())
                .value_parser(clap::value_parser!(u64))
                .help("Fee paid by every transaction, in policy-asset sats"),
        )
        .arg(
            Arg::new("invariant")
                .long("invariant")
                .value_name("mode")
                .default_value(defaults.invariant.as_str())
                .value_parser(["genesis", "rolling"])
                .help("Product floor enforced by the covenant: the genesis product, or also the product before each trade"),
        )
        .arg(
            Arg::new("loglevel")
                .long("loglevel")
                .short('d')
                .value_name("level")
                .default_value(defaults.log_level)
                .help("Logging level or filters, e.g. info,amm_wallet=debug"),
        )
        .arg(
            Arg::new("logdir")
                .long("logdir")
                .value_name("dir")
                .help("Directory for log files. Logs go to the console only when absent"),
        )
}
