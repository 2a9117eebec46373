use amm_core::{error, info, log::init_logger, panic::configure_panic, signals::Shutdown};
use amm_rpc::{HttpNodeClient, NodeRpc};
use amm_trader::{args::Args, Controller, ControllerConfig, StdinAmounts, TraderResult};
use amm_wallet::{Assembler, TraderKeys, Wallet};
use std::sync::Arc;

async fn run(args: Args) -> TraderResult<()> {
    let shutdown = Shutdown::new();
    shutdown.register_termination_handler()?;

    let keys = match &args.private_key {
        Some(private_key) => TraderKeys::from_hex(private_key)?,
        None => {
            let keys = TraderKeys::generate();
            info!("Generated private key {}. Rerun with `--private-key {}` to reuse it", keys.secret_hex(), keys.secret_hex());
            keys
        }
    };

    let node = Arc::new(HttpNodeClient::new(&args.rpc_server, &args.rpc_user, &args.rpc_password));
    info!("Using Elements node at {} on {}", node.url(), args.network);
    let policy_asset = node.policy_asset().await?;
    info!("Policy asset {}", policy_asset);

    let wallet = Wallet::new(node, Assembler::new(keys, policy_asset, args.fee), args.network);
    let config = ControllerConfig { mode: args.invariant, ..Default::default() };
    let controller = Controller::new(wallet, config, shutdown);

    let mut amounts = StdinAmounts::new();
    let state = controller.run(&mut amounts).await?;
    info!("Final pool state: {} A, {} B at {}", state.reserve_a().balance, state.reserve_b().balance, state.txid());
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = init_logger(args.log_dir.as_deref(), &args.log_level) {
        eprintln!("{err}");
        std::process::exit(1);
    }
    configure_panic();

    if let Err(err) = run(args).await {
        error!("{}", err);
        std::process::exit(1);
    }
}
