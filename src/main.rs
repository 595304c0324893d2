use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use clap::Parser;
use log::error;
use race_track_solver::{parse_cases, solve_all, verify_all};

// Input format:
//
// 2            number of test cases
// 5 5          width height
// 4 0 4 4      start x, start y, end x, end y
// 1            number of obstacles
// 1 4 2 3      x1 x2 y1 y2, an inclusive rectangle of obstacles
// 3 3          ...next case
#[derive(Parser)]
#[command(name = "race-track")]
#[command(about = "Find the fewest hops a race car needs to reach the finish")]
struct Args {
    /// Problem file; reads stdin when missing or `-`
    input: Option<PathBuf>,

    /// Worker threads used to solve cases in parallel
    #[arg(short, long)]
    threads: Option<usize>,

    /// Cross-check every answer against an exhaustive breadth-first search
    #[arg(long)]
    verify: bool,
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("reading stdin")?;
            Ok(input)
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring worker threads")?;
    }

    let input = read_input(args.input.as_deref())?;
    let cases = parse_cases(&input).context("parsing cases")?;

    if args.verify {
        let mismatches = verify_all(&cases);
        for m in &mismatches {
            error!(
                "case {}: A* says {:?}, exhaustive search says {:?}",
                m.id, m.astar, m.exhaustive
            );
        }
        if !mismatches.is_empty() {
            bail!("{} case(s) disagree with exhaustive search", mismatches.len());
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (id, outcome) in solve_all(&cases) {
        writeln!(out, "Case {}:\n{}", id, outcome)?;
    }

    Ok(())
}
