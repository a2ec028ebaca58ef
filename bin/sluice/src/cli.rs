//! Sluice CLI entry point.

use alloy_primitives::{Address, U256};
use clap::{Parser, Subcommand};
use eyre::Result;
use rand::{Rng, SeedableRng, rngs::StdRng};
use sluice_api::{ChunkView, Timestamp, UnlimitedCredit, UnmeteredPayment, VestingPolicy};
use sluice_market::{MarketArgs, StorageMarket};
use tracing::{debug, info};

/// Seconds between simulated purchase attempts.
const STEP_SECS: u64 = 60;
/// Seconds between simulated flow reports.
const CHARGE_EVERY_SECS: u64 = 300;
/// Seconds between simulated mine claim sweeps.
const CLAIM_EVERY_SECS: u64 = 1_200;

/// Sluice - storage fee-market engine
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct SluiceCli {
    /// Tracing filter directive, overridden by RUST_LOG.
    #[arg(long = "log.filter", default_value = "info", global = true)]
    pub log_filter: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: SluiceCommands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum SluiceCommands {
    /// Print the resolved market parameters.
    Params(ParamsArgs),
    /// Drive a randomized workload against a fresh market.
    Simulate(SimulateArgs),
}

/// Arguments for the 'params' command.
#[derive(Debug, clap::Args)]
pub struct ParamsArgs {
    /// Market configuration.
    #[command(flatten)]
    pub market: MarketArgs,
}

/// Arguments for the 'simulate' command.
#[derive(Debug, clap::Args)]
pub struct SimulateArgs {
    /// Market configuration.
    #[command(flatten)]
    pub market: MarketArgs,

    /// Simulated seconds to run.
    #[arg(long = "sim.duration", default_value_t = 3_600)]
    pub duration: u64,

    /// Largest single purchase, in sectors.
    #[arg(long = "sim.max-sectors", default_value_t = 2_048)]
    pub max_sectors: u64,

    /// Price ceiling as a multiple of the basic price.
    #[arg(long = "sim.price-headroom", default_value_t = 4)]
    pub price_headroom: u128,

    /// Seconds a reward chunk vests before it is claimable.
    #[arg(long = "sim.vesting-delay", default_value_t = 600)]
    pub vesting_delay: u64,

    /// RNG seed for a reproducible run.
    #[arg(long = "sim.seed", default_value_t = 0)]
    pub seed: u64,
}

/// Releases a chunk's locked reward in full once `delay` seconds have
/// passed since finalization.
#[derive(Debug, Clone, Copy)]
struct CliffVesting {
    delay: u64,
}

impl VestingPolicy for CliffVesting {
    fn releasable(&self, chunk: &ChunkView, now: Timestamp) -> U256 {
        match chunk.start_time {
            Some(start) if now >= start.saturating_add(self.delay) => chunk.locked_reward,
            _ => U256::ZERO,
        }
    }
}

/// Parse arguments, initialize tracing and dispatch the subcommand.
pub fn run() -> Result<()> {
    let cli = SluiceCli::parse();
    init_tracing(&cli.log_filter)?;
    match cli.command {
        SluiceCommands::Params(args) => print_params(args),
        SluiceCommands::Simulate(args) => simulate(args),
    }
}

fn init_tracing(filter: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn print_params(args: ParamsArgs) -> Result<()> {
    let params = args.market.market_params()?;
    println!("{params:#?}");
    Ok(())
}

/// Runs a scripted clock against a fresh market: random purchases every
/// step, periodic flow reports that finalize everything prepaid, and
/// periodic claim sweeps under a cliff vesting schedule.
fn simulate(args: SimulateArgs) -> Result<()> {
    let params = args.market.market_params()?;
    let roles = params.roles;
    let basic = params.basic_price;
    let mut market = StorageMarket::new(
        params,
        UnmeteredPayment,
        UnlimitedCredit,
        CliffVesting { delay: args.vesting_delay },
        0,
    );
    let mut rng = StdRng::seed_from_u64(args.seed);
    let buyer = Address::with_last_byte(0xbb);
    let beneficiary = Address::with_last_byte(0xee);
    let max_unit_price = basic.saturating_mul(args.price_headroom);

    let mut rejected = 0u64;
    let mut now: Timestamp = 0;
    while now < args.duration {
        now += STEP_SECS;

        let sectors = rng.random_range(1..=args.max_sectors);
        let tip = rng.random_range(0..=basic / 10);
        match market.purchase(buyer, sectors, max_unit_price, tip, now) {
            Ok(receipt) => debug!(%receipt, "Simulated purchase"),
            Err(err) => {
                rejected += 1;
                debug!(%err, "Purchase rejected");
            }
        }
        if rng.random_bool(0.2) {
            let sectors = rng.random_range(1..=args.max_sectors / 4 + 1);
            market.consume_upload_token(buyer, sectors, now)?;
        }

        if now % CHARGE_EVERY_SECS == 0 {
            let paid = market.paid_upload_amount();
            market.charge_fee(roles.flow, paid, paid, now)?;
            debug!(sectors = paid, "Simulated flow report");
        }
        if now % CLAIM_EVERY_SECS == 0 {
            for index in 0..market.reward_chunk_count() {
                let paid = market.claim_mine_reward(roles.mine, index, beneficiary, now)?;
                if !paid.is_zero() {
                    info!(chunk = index, %paid, "Claimed vested reward");
                }
            }
        }
    }

    info!(rejected, "Simulation complete");
    println!("{:#?}", market.snapshot(now));
    Ok(())
}
