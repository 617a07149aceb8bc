//! Command implementations for the FTM CLI.
//!
//! Subcommands submit new study areas to the snow analysis backend and
//! inspect, chart and export the coverage results it produces.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use ftm_core::client::{ApiClient, DEFAULT_API_URL};
use ftm_core::error::ApiError;
use ftm_core::request::{RasterBand, DEFAULT_SAMPLING_DISTANCE_M};
use ftm_utils::dates::parse_date;
use std::time::Duration;

pub mod create;
pub mod results;

/// Backend connection settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// Base URL of the snow analysis backend
    #[arg(long, env = "FTM_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60, global = true)]
    pub timeout_secs: u64,
}

impl ApiArgs {
    pub fn client(&self) -> anyhow::Result<ApiClient> {
        ApiClient::new(&self.api_url, Duration::from_secs(self.timeout_secs))
            .map_err(status_error)
    }
}

/// Corners of the rectangle to analyse, in decimal degrees.
#[derive(Args, Debug, Clone, Copy)]
pub struct RectangleArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub north: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub south: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub east: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub west: f64,
}

/// Which area's results to show.
#[derive(Args, Debug, Clone)]
pub struct AreaArgs {
    /// Area name (defaults to the most recently analysed area)
    #[arg(short, long, conflicts_with = "all")]
    pub area: Option<String>,

    /// Show every area
    #[arg(long)]
    pub all: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Submit a rectangle for snow coverage analysis
    Create {
        /// Area name (letters and digits only)
        #[arg(short, long)]
        name: String,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// End date (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// Distance between sampling points in metres
        #[arg(short, long, default_value = DEFAULT_SAMPLING_DISTANCE_M)]
        distance: String,

        /// Raster band (VV or VH)
        #[arg(short, long, default_value = "VV")]
        band: RasterBand,

        #[command(flatten)]
        rectangle: RectangleArgs,

        /// Hold the request back this many milliseconds before sending
        #[arg(long)]
        submit_delay_ms: Option<u64>,
    },

    /// Estimate how many sampling points a rectangle would get
    Estimate {
        #[command(flatten)]
        rectangle: RectangleArgs,

        /// Distance between sampling points in metres
        #[arg(short, long)]
        distance: f64,
    },

    /// Show coverage results sorted by elevation
    Results {
        #[command(flatten)]
        area: AreaArgs,
    },

    /// Export coverage results as CSV
    Export {
        #[command(flatten)]
        area: AreaArgs,

        /// Output path
        #[arg(short, long, default_value = ftm_data::export::EXPORT_FILE_NAME)]
        output: String,
    },

    /// Print the elevation/coverage chart series with its trend line as JSON
    Chart {
        #[command(flatten)]
        area: AreaArgs,
    },

    /// Print the map center for an area's elevation polygons
    Center {
        /// Area name (defaults to the most recently analysed area)
        #[arg(short, long)]
        area: Option<String>,
    },

    /// List analysed areas and stored submissions
    Areas,

    /// Delete every stored result on the backend
    Reset,
}

pub async fn run(command: Command, api: &ApiArgs) -> anyhow::Result<()> {
    match command {
        Command::Create {
            name,
            start,
            end,
            distance,
            band,
            rectangle,
            submit_delay_ms,
        } => {
            let form = ftm_core::request::FormState {
                name,
                start_date: start,
                end_date: end,
                sampling_distance: distance,
                band,
            };
            create::run_create(api, form, rectangle, submit_delay_ms.map(Duration::from_millis)).await
        }
        Command::Estimate {
            rectangle,
            distance,
        } => create::run_estimate(rectangle, distance),
        Command::Results { area } => results::run_results(api, &area).await,
        Command::Export { area, output } => results::run_export(api, &area, &output).await,
        Command::Chart { area } => results::run_chart(api, &area).await,
        Command::Center { area } => results::run_center(api, area).await,
        Command::Areas => results::run_areas(api).await,
        Command::Reset => results::run_reset(api).await,
    }
}

/// Turn a backend failure into the status line the user sees.
pub(crate) fn status_error(err: ApiError) -> anyhow::Error {
    log::error!("{}", err);
    anyhow::anyhow!("{}", err.user_message())
}
