use std::process::{exit, Command};

use clap::{Args, Parser, Subcommand, ValueEnum};

const CORE_PACKAGE: &str = "trip_audit_core";

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the trip audit workspace",
    long_about = "Runs CI checks, Criterion benchmarks and the fleet load test\n\
                  for the trip_audit_core crate."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Criterion benchmarks of trip_audit_core
    Bench(BenchArgs),
    /// Run CI checks
    Ci {
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run the ignored large-fleet aggregation test in release mode
    LoadTest,
}

#[derive(Args)]
struct BenchArgs {
    /// Save results under this Criterion baseline name
    #[arg(long, conflicts_with = "baseline")]
    save_baseline: Option<String>,
    /// Compare results against a previously saved baseline
    #[arg(long)]
    baseline: Option<String>,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// fmt, clippy and the full test suite
    Check,
    /// Library build and unit tests without the test-helpers feature
    Features,
    /// Compile the benchmarks without running them
    Bench,
    /// Every job above
    All,
}

fn cargo(label: &str, args: &[&str]) {
    eprintln!("\n=== {label} ===\n+ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo");
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn ci_check() {
    cargo("Formatting", &["fmt", "--all", "--", "--check"]);
    cargo(
        "Clippy",
        &["clippy", "--all-targets", "--all-features", "--", "-D", "warnings"],
    );
    cargo("Tests", &["test", "-p", CORE_PACKAGE]);
}

fn ci_features() {
    cargo(
        "Build without test-helpers",
        &["build", "-p", CORE_PACKAGE, "--no-default-features"],
    );
    cargo(
        "Unit tests without test-helpers",
        &["test", "-p", CORE_PACKAGE, "--no-default-features", "--lib"],
    );
}

fn ci_bench() {
    cargo(
        "Compile benchmarks",
        &["bench", "-p", CORE_PACKAGE, "--bench", "performance", "--no-run"],
    );
}

fn bench(args: &BenchArgs) {
    let mut cargo_args = vec!["bench", "-p", CORE_PACKAGE, "--bench", "performance"];
    if let Some(name) = &args.save_baseline {
        cargo_args.extend(["--", "--save-baseline", name.as_str()]);
    } else if let Some(name) = &args.baseline {
        cargo_args.extend(["--", "--baseline", name.as_str()]);
    }
    cargo("Benchmarks", &cargo_args);
}

fn main() {
    match Cli::parse().command {
        Commands::Bench(args) => bench(&args),
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Features => ci_features(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_features();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LoadTest => cargo(
            "Load test",
            &[
                "test",
                "-p",
                CORE_PACKAGE,
                "--release",
                "--test",
                "load_tests",
                "--",
                "--ignored",
                "--nocapture",
            ],
        ),
    }
}
