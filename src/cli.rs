//! CLI definition and dispatch.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::DateTime;
use clap::{Parser, Subcommand};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::cache::IndicatorCache;
use crate::domain::config::SimConfig;
use crate::domain::error::StratsimError;
use crate::domain::indicator::IndicatorKind;
use crate::domain::signal::SignalSource;
use crate::domain::simulator;
use crate::domain::validate::{
    monte_carlo, out_of_sample, walk_forward, MonteCarloConfig, OosConfig, WalkForwardConfig,
};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use crate::strategies::RsiReversion;

#[derive(Parser, Debug)]
#[command(name = "stratsim", about = "Trading strategy evaluation engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over a candle CSV
    Backtest {
        /// Candle CSV (timestamp,open,high,low,close,volume)
        #[arg(short, long)]
        data: PathBuf,
        /// INI simulation config; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the full result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// RSI period for the built-in reversion strategy
        #[arg(long, default_value_t = 14)]
        rsi_period: usize,
        /// RSI oversold threshold (long entries)
        #[arg(long, default_value_t = 30.0)]
        oversold: f64,
        /// RSI overbought threshold (short entries)
        #[arg(long, default_value_t = 70.0)]
        overbought: f64,
        /// Run a Monte Carlo validation with this many iterations
        #[arg(long)]
        monte_carlo: Option<usize>,
        /// Seed for the Monte Carlo shuffle (reproducible reports)
        #[arg(long)]
        mc_seed: Option<u64>,
        /// Run a walk-forward validation with this many windows
        #[arg(long)]
        walk_forward: Option<usize>,
        /// Run an out-of-sample split at this in-sample ratio
        #[arg(long)]
        oos: Option<f64>,
    },
    /// Show summary information for a candle CSV
    Info {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            data,
            config,
            output,
            rsi_period,
            oversold,
            overbought,
            monte_carlo,
            mc_seed,
            walk_forward,
            oos,
        } => run_backtest(BacktestArgs {
            data,
            config,
            output,
            rsi_period,
            oversold,
            overbought,
            monte_carlo_iterations: monte_carlo,
            mc_seed,
            walk_forward_windows: walk_forward,
            oos_ratio: oos,
        }),
        Command::Info { data } => run_info(&data),
    }
}

struct BacktestArgs {
    data: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    rsi_period: usize,
    oversold: f64,
    overbought: f64,
    monte_carlo_iterations: Option<usize>,
    mc_seed: Option<u64>,
    walk_forward_windows: Option<usize>,
    oos_ratio: Option<f64>,
}

fn load_sim_config(path: Option<&PathBuf>) -> Result<SimConfig, StratsimError> {
    match path {
        Some(p) => FileConfigAdapter::from_file(p)?.build_sim_config(),
        None => Ok(SimConfig::default()),
    }
}

fn run_backtest(args: BacktestArgs) -> ExitCode {
    // Stage 1: Load config
    let config = match load_sim_config(args.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 2: Ingest candles
    eprintln!("Loading candles from {}", args.data.display());
    let batch = match CsvAdapter::new().fetch_candles(&args.data.display().to_string()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if batch.skipped_rows > 0 {
        eprintln!("warning: skipped {} malformed rows", batch.skipped_rows);
    }
    eprintln!("Loaded {} candles", batch.candles.len());

    // Stage 3: Build the indicator cache
    let make_source = || -> Box<dyn SignalSource> {
        Box::new(RsiReversion::new(
            args.rsi_period,
            args.oversold,
            args.overbought,
        ))
    };
    let mut kinds: Vec<IndicatorKind> = make_source().required_indicators();
    kinds.extend(simulator::engine_indicators(&config));
    let cache = IndicatorCache::build(&batch.candles, &kinds);

    // Stage 4: Simulate
    let mut source = make_source();
    let result = match simulator::run(&batch.candles, &cache, source.as_mut(), &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
    print_metrics(&result);

    // Stage 5: Optional validators
    if let Some(iterations) = args.monte_carlo_iterations {
        let mc = monte_carlo(
            &result.trades,
            config.initial_balance,
            &MonteCarloConfig {
                iterations,
                seed: args.mc_seed,
            },
        );
        println!("\nMonte Carlo ({} iterations)", mc.iterations);
        println!(
            "  final equity  p5 {:.2}  p25 {:.2}  p50 {:.2}  p75 {:.2}  p95 {:.2}",
            mc.final_equity.p5,
            mc.final_equity.p25,
            mc.final_equity.p50,
            mc.final_equity.p75,
            mc.final_equity.p95
        );
        println!(
            "  max drawdown  p5 {:.2}  p25 {:.2}  p50 {:.2}  p75 {:.2}  p95 {:.2}",
            mc.max_drawdown.p5,
            mc.max_drawdown.p25,
            mc.max_drawdown.p50,
            mc.max_drawdown.p75,
            mc.max_drawdown.p95
        );
        println!("  risk of ruin {:.2}%", mc.risk_of_ruin * 100.0);
        println!("  profit probability {:.2}%", mc.profit_probability * 100.0);
    }

    if let Some(windows) = args.walk_forward_windows {
        let wf = WalkForwardConfig {
            windows,
            ..WalkForwardConfig::default()
        };
        match walk_forward(&batch.candles, &cache, &config, &make_source, &wf) {
            Ok(report) => {
                println!("\nWalk-forward ({} windows)", windows);
                for w in &report.windows {
                    println!(
                        "  window {}: train win rate {:.1}% ({} trades), test win rate {:.1}% ({} trades)",
                        w.window,
                        w.train_win_rate * 100.0,
                        w.train_trades,
                        w.test_win_rate * 100.0,
                        w.test_trades
                    );
                }
                println!(
                    "  degradation {:.1} points, consistency {:.2}",
                    report.win_rate_degradation * 100.0,
                    report.consistency_score
                );
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    if let Some(ratio) = args.oos_ratio {
        let oos_config = OosConfig {
            split_ratio: ratio,
            ..OosConfig::default()
        };
        let report = out_of_sample(
            &result.trades,
            batch.candles.len(),
            config.initial_balance,
            &oos_config,
        );
        println!("\nOut-of-sample (split at candle {})", report.split_index);
        println!(
            "  in-sample:  {} trades, win rate {:.1}%, net pnl {:.2}",
            report.in_sample.total_trades,
            report.in_sample.win_rate * 100.0,
            report.in_sample.net_pnl
        );
        println!(
            "  out-sample: {} trades, win rate {:.1}%, net pnl {:.2}",
            report.out_of_sample.total_trades,
            report.out_of_sample.win_rate * 100.0,
            report.out_of_sample.net_pnl
        );
        println!(
            "  overfit: {}",
            if report.is_overfit { "YES" } else { "no" }
        );
        println!("  {}", report.recommendation);
    }

    // Stage 6: Optional JSON export
    if let Some(output) = &args.output {
        let adapter = JsonReportAdapter::new();
        if let Err(e) = adapter.write(&result, &output.display().to_string()) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Result written to {}", output.display());
    }

    ExitCode::SUCCESS
}

fn print_metrics(result: &crate::domain::result::BacktestResult) {
    let m = &result.metrics;
    println!("Trades:          {}", m.total_trades);
    println!(
        "Win rate:        {:.1}% ({} wins / {} losses)",
        m.win_rate * 100.0,
        m.wins,
        m.losses
    );
    if m.profit_factor.is_infinite() {
        println!("Profit factor:   inf (no losing trades)");
    } else {
        println!("Profit factor:   {:.2}", m.profit_factor);
    }
    println!("Net pnl:         {:.2}", m.net_pnl);
    println!("Expectancy:      {:.4}", m.expectancy);
    println!("SQN:             {:.2}", m.sqn);
    println!(
        "Max drawdown:    {:.2} ({:.1}%)",
        m.max_drawdown, m.max_drawdown_pct
    );
    println!("Final balance:   {:.2}", m.final_balance);
}

fn run_info(data: &PathBuf) -> ExitCode {
    let batch = match CsvAdapter::new().fetch_candles(&data.display().to_string()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let first = &batch.candles[0];
    let last = &batch.candles[batch.candles.len() - 1];
    println!("{}: {} candles", data.display(), batch.candles.len());
    println!("  from {}", format_timestamp(first.timestamp));
    println!("  to   {}", format_timestamp(last.timestamp));
    if batch.skipped_rows > 0 {
        println!("  skipped rows: {}", batch.skipped_rows);
    }
    ExitCode::SUCCESS
}

fn format_timestamp(ts: i64) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("unix {ts}"),
    }
}
