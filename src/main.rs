mod args;
mod constants;
mod coord;
mod providers;
mod resolver;

use args::{Args, Format, Provider};
use clap::Parser;
use coord::LngLat;
use log::info;
use providers::corelocation::CoreLocationProvider;
use providers::PositionOptions;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let coord = match args.provider {
        Provider::Sensor => {
            let opts = PositionOptions {
                timeout: Duration::from_secs(args.timeout),
                high_accuracy: !args.low_accuracy,
                maximum_age: Duration::from_secs(args.max_age),
            };
            resolver::resolve(&CoreLocationProvider, &opts).await
        }
        Provider::Ip => match providers::ip::lookup().await {
            Ok(resp) => {
                info!("IP geolocation: {}, {} ({})", resp.city, resp.country, resp.query);
                LngLat::new(resp.lon, resp.lat)
            }
            Err(e) => {
                eprintln!("geo-origin: {e}");
                process::exit(1);
            }
        },
    };

    print!("{}", render(&args.format, coord));
}

fn render(format: &Format, coord: LngLat) -> String {
    match format {
        Format::Json => format!("{}\n", serde_json::to_string(&coord).unwrap()),
        Format::Csv => format!("{},{}\n", coord.lon(), coord.lat()),
        Format::Env => format!("LON={}\nLAT={}\n", coord.lon(), coord.lat()),
        Format::Plain => format!("{} {}\n", coord.lon(), coord.lat()),
    }
}
