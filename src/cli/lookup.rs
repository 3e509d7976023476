//! Lookup command handler
//!
//! Reverse geocodes a single coordinate.

use crate::config::Config;
use crate::coord::LonLat;
use crate::error::Result;
use crate::geo::nominatim::NominatimGeocoder;
use crate::geo::ReverseGeocoder;
use clap::Args;

/// Lookup command arguments
#[derive(Args)]
pub struct LookupArgs {
    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the lookup command
pub async fn run(args: LookupArgs) -> Result<()> {
    let config = Config::load()?;

    let at = LonLat::new(args.lon, args.lat);
    at.validate()?;

    let geocoder = NominatimGeocoder::from_config(&config.geocoder)?;
    let address = geocoder.reverse_geocode(at).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&address)?);
    } else {
        println!("{}", address.text);
    }

    Ok(())
}
