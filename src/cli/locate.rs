//! Locate command handler
//!
//! Runs the configured geolocation provider, then reverse geocodes the result.

use crate::config::Config;
use crate::error::Result;
use crate::geo::ip_location::ConfiguredLocator;
use crate::geo::nominatim::NominatimGeocoder;
use crate::geo::{Geolocator, ReverseGeocoder};
use clap::Args;
use tracing::info;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Skip the address lookup
    #[arg(long)]
    pub no_address: bool,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    let config = Config::load()?;

    let locator = ConfiguredLocator::from_config(&config.location)?;
    let position = locator.locate().await?;
    info!(provider = %config.location.provider, %position, "located");

    println!("Coordinates: {}", position);

    if !args.no_address {
        let geocoder = NominatimGeocoder::from_config(&config.geocoder)?;
        let address = geocoder.reverse_geocode(position).await?;
        println!("Address: {}", address.text);
    }

    Ok(())
}
