use std::{
    io::{self, BufRead},
    path::PathBuf,
    process::exit,
};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use log::{error, info, LevelFilter};
use stack_vm::{
    cache::DEFAULT_CACHE_SIZE,
    config::EngineConfig,
    error::{Fault, VmError},
    memory::DEFAULT_STACK_CAPACITY,
    program::Program,
    render::{FrameRenderer, Renderer},
    Engine,
};

/// Run a stack machine program one instruction at a time.
#[derive(Parser, Debug)]
#[command(name = "stack-vm", version)]
struct Cli {
    /// Program file, one instruction per line. Runs the demo program when omitted.
    program: Option<PathBuf>,

    /// Render every step and wait for Enter before the next one
    #[arg(long)]
    step: bool,

    /// Only render the final state
    #[arg(short, long, conflicts_with = "step")]
    quiet: bool,

    #[arg(long, default_value_t = DEFAULT_STACK_CAPACITY)]
    stack_capacity: usize,

    /// Decoded instructions kept in the decode cache
    #[arg(long, default_value_t = DEFAULT_CACHE_SIZE)]
    cache_size: usize,

    /// Give up after this many executed instructions
    #[arg(long)]
    max_steps: Option<u64>,

    #[arg(long)]
    no_color: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let mut builder = env_logger::builder();
    match verbose {
        0 => {}
        1 => {
            builder.filter(None, LevelFilter::Info);
        }
        2 => {
            builder.filter(None, LevelFilter::Debug);
        }
        _ => {
            builder.filter(None, LevelFilter::Trace);
        }
    }
    builder.init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let program = match &cli.program {
        Some(path) => Program::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Program::reference(),
    };

    let config = EngineConfig::default()
        .with_stack_capacity(cli.stack_capacity)
        .with_decode_cache_size(cli.cache_size);
    let mut vm = Engine::with_config(&program, config)?;
    let renderer = FrameRenderer {
        color: !cli.no_color,
    };

    let stdin = io::stdin();
    let mut line = String::new();

    while !vm.is_halted() {
        if let Some(max) = cli.max_steps {
            if vm.steps() >= max {
                bail!("no halt after {} steps", max);
            }
        }

        vm.step()?;

        if !cli.quiet {
            println!("{}", renderer.render(&vm.snapshot()));
        }
        if cli.step {
            line.clear();
            stdin.lock().read_line(&mut line)?;
        }
    }

    if cli.quiet {
        println!("{}", renderer.render(&vm.snapshot()));
    }

    info!(
        "{} steps, decode cache {} hits / {} misses",
        vm.steps(),
        vm.cache().hits(),
        vm.cache().misses()
    );
    Ok(())
}

/// Status the process exits with after `run` failed.
fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(fault) = err.downcast_ref::<Fault>() {
        fault.exit_code()
    } else if let Some(vm_err) = err.downcast_ref::<VmError>() {
        vm_err.exit_code()
    } else {
        1
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(err) = run(&cli) {
        error!("{:#}", err);
        exit(exit_code(&err));
    }
}
