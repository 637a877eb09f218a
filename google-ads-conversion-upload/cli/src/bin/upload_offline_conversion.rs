/*
cargo run -p google-ads-conversion-upload-cli --bin upload_offline_conversion -- -c 'customer_id' -a 'conversion_action_id' -g 'gcl_id' -t '2020-01-01 12:32:45+00:00' -v '12.5'

Or

cargo install google-ads-conversion-upload-cli
upload_offline_conversion -c 'customer_id' -a 'conversion_action_id' -g 'gcl_id' -t 'conversion_time' -v 'conversion_value' [--config '/path/google-ads.yaml']
*/

use std::{error, io, path::PathBuf, process::ExitCode};

use clap::Parser;
use google_ads_conversion_upload::{run, ConversionInput, GoogleAdsClient};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Upload an offline conversion.
#[derive(Debug, Parser)]
#[command(name = "upload_offline_conversion")]
struct Args {
    /// The Google Ads customer ID.
    #[arg(short = 'c', long = "customer_id")]
    customer_id: String,

    /// The conversion action ID.
    #[arg(short = 'a', long = "conversion_action_id")]
    conversion_action_id: String,

    /// The Google Click Identifier ID.
    #[arg(short = 'g', long = "gcl_id")]
    gcl_id: String,

    /// The conversion time.
    #[arg(short = 't', long = "conversion_time")]
    conversion_time: String,

    /// The conversion value.
    #[arg(short = 'v', long = "conversion_value")]
    conversion_value: String,

    /// Path to google-ads.yaml, defaults to $GOOGLE_ADS_CONFIGURATION_FILE_PATH or $HOME/google-ads.yaml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Args {
    fn into_parts(self) -> (Option<PathBuf>, ConversionInput) {
        (
            self.config,
            ConversionInput {
                customer_id: self.customer_id,
                conversion_action_id: self.conversion_action_id,
                gcl_id: self.gcl_id,
                conversion_time: self.conversion_time,
                conversion_value: self.conversion_value,
            },
        )
    }
}

fn main() -> Result<ExitCode, Box<dyn error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let (config_path, input) = args.into_parts();

    let client = GoogleAdsClient::load_from_storage(config_path.as_deref())?;
    debug!(endpoint = %client.config().endpoint, "client loaded");

    let outcome = run(&client, &client, &input, &mut io::stdout().lock())?;

    Ok(ExitCode::from(outcome.exit_code()))
}
