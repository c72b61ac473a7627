//! gatenet-demo - Run one forward/backward/forward cycle on the demo network
//!
//! # Usage
//!
//! ```bash
//! # Default: target 4, learning rate 0.5
//! gatenet-demo
//!
//! # Custom target and rate (multiples of 0.125 in [-16, 15.875])
//! gatenet-demo --target 2.5 --learning-rate 0.25
//!
//! # Load a JSON training config ({"learning_rate": 0.5, "overflow": "Error"})
//! gatenet-demo --config training.json
//!
//! # Print gradients and updated weights
//! gatenet-demo -v
//! ```
//!
//! # Exit Codes
//!
//! - 0: Pass completed
//! - 1: Arithmetic error (e.g. overflow under the `Error` policy)
//! - 2: Invalid arguments or unreadable config

use std::fs;
use std::process::ExitCode;

use anyhow::{bail, Context};
use gatenet::{demo_input, demo_weights, FixedPoint, NetworkTrainer, NetworkWeights, TrainingConfig};

struct Args {
    target: FixedPoint,
    learning_rate: Option<f64>,
    config_path: Option<String>,
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}\n", e);
            print_help();
            return ExitCode::from(2);
        }
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match run(&args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_args() -> anyhow::Result<Option<Args>> {
    let mut args = Args {
        target: FixedPoint::from_decimal(4.0)?,
        learning_rate: None,
        config_path: None,
        verbose: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => args.verbose = true,
            "-t" | "--target" => {
                let value = iter.next().context("--target needs a value")?;
                args.target = value
                    .parse()
                    .with_context(|| format!("invalid target '{}'", value))?;
            }
            "-l" | "--learning-rate" => {
                let value = iter.next().context("--learning-rate needs a value")?;
                let rate: f64 = value
                    .parse()
                    .with_context(|| format!("invalid learning rate '{}'", value))?;
                args.learning_rate = Some(rate);
            }
            "-c" | "--config" => {
                args.config_path = Some(iter.next().context("--config needs a path")?);
            }
            "-h" | "--help" => {
                print_help();
                return Ok(None);
            }
            other => bail!("Unknown option: {}", other),
        }
    }

    Ok(Some(args))
}

fn load_config(args: &Args) -> anyhow::Result<TrainingConfig> {
    let mut config = match &args.config_path {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path))?
        }
        None => TrainingConfig::default(),
    };
    if let Some(rate) = args.learning_rate {
        config.learning_rate = rate;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: TrainingConfig) -> anyhow::Result<()> {
    let trainer = NetworkTrainer::new(config)?;
    let weights = demo_weights()?;
    let input = demo_input()?;

    println!("input:           {:?}", input.to_f64s());
    println!("target:          {}", args.target);
    println!(
        "learning rate:   {} ({:?} on overflow)",
        trainer.config().learning_rate,
        trainer.config().overflow
    );

    let before = trainer.predict(&input, &weights).context("forward pass")?;
    println!("prediction:      {}", before);

    if args.verbose {
        let grads = trainer
            .gradients(&input, args.target, &weights)
            .context("computing gradients")?;
        println!();
        println!("output gradient: w={:?} b={}", grads.output.weight.to_f64s(), grads.output.bias);
        for (i, g) in grads.hidden.iter().enumerate() {
            println!("hidden[{}] grad:  w={:?} b={}", i, g.weight.to_f64s(), g.bias);
        }
    }

    let updated = trainer
        .step(&input, args.target, &weights)
        .context("backward pass")?;

    if args.verbose {
        println!();
        print_weights(&updated);
    }

    let after = trainer.predict(&input, &updated).context("forward pass after update")?;
    println!("after one step:  {}", after);
    Ok(())
}

fn print_weights(weights: &NetworkWeights) {
    for (i, neuron) in weights.input_to_hidden().neurons().iter().enumerate() {
        println!("hidden[{}]:       w={:?} b={}", i, neuron.weight.to_f64s(), neuron.bias);
    }
    let output = weights.hidden_to_output();
    println!("output:          w={:?} b={}", output.weight.to_f64s(), output.bias);
}

fn print_help() {
    eprintln!("gatenet-demo - one gradient step on the 2-3-1 demo network");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    gatenet-demo [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -t, --target <X>          Training target (default 4)");
    eprintln!("    -l, --learning-rate <X>   Learning rate, overrides the config");
    eprintln!("    -c, --config <FILE>       JSON training config");
    eprintln!("    -v, --verbose             Print gradients and updated weights");
    eprintln!("    -h, --help                Print help");
}
