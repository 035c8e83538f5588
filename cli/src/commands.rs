pub mod run;
pub mod workloads;

use std::net::IpAddr;

use clap::{Args, Parser, Subcommand};
use pnet::ipnetwork::IpNetwork;

#[derive(Parser)]
#[command(name = "strain")]
#[command(about = "Runs paced traffic workloads against hosts you control.")]
pub struct CommandLine {
    /// Log per-unit failures and registry writes
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a task and report its status until stopped
    #[command(alias = "r")]
    Run(RunArgs),
    /// List the available workloads
    #[command(alias = "w")]
    Workloads,
}

#[derive(Args)]
pub struct RunArgs {
    /// Workload name, see `strain workloads`
    pub workload: String,
    pub target: IpAddr,
    #[arg(short, long)]
    pub port: Option<u16>,
    /// Payload sent with every unit instead of random bytes
    #[arg(long)]
    pub payload: Option<String>,
    /// Worker threads (default 10)
    #[arg(short, long)]
    pub workers: Option<usize>,
    /// Units per second, per worker
    #[arg(long)]
    pub rate: Option<u32>,
    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(short, long)]
    pub duration: Option<u64>,
    /// Task id, defaults to `<target>-<workload>`
    #[arg(long)]
    pub task_id: Option<String>,
    /// Extra network the target may live in, on top of loopback
    #[arg(long = "allow")]
    pub allow: Vec<IpNetwork>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
