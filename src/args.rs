use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "geo-origin")]
#[command(about = "Print the host's coordinates for map centering, falling back to a fixed default")]
#[command(version)]
pub struct Args {
    /// Output format for the resolved coordinate.
    #[arg(long, value_enum, default_value = "plain")]
    pub format: Format,

    /// Which lookup to run. The sensor path never fails; the ip path may.
    #[arg(long, value_enum, default_value = "sensor")]
    pub provider: Provider,

    /// Maximum wait for a sensor fix, in seconds.
    #[arg(long, default_value = "10")]
    pub timeout: u64,

    /// Accept a cached fix no older than this, in seconds.
    #[arg(long, default_value = "300")]
    pub max_age: u64,

    /// Do not ask the sensor for its highest accuracy.
    #[arg(long)]
    pub low_accuracy: bool,

    /// Emit diagnostic output on stderr.
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Clone, ValueEnum)]
pub enum Format {
    Json,
    Csv,
    Env,
    Plain,
}

#[derive(Clone, ValueEnum)]
pub enum Provider {
    Sensor,
    Ip,
}
