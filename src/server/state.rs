use crate::config::Config;
use crate::location::Geocoder;
use crate::maps::GoogleMaps;
use crate::quote::QuoteService;

pub struct AppState {
    pub quotes: QuoteService,
    pub geocoder: Geocoder,
}

impl AppState {
    pub fn from_config(config: &Config, offline: bool) -> Self {
        let maps = GoogleMaps::new(&config.maps);

        let mut geocoder = Geocoder::new(Box::new(maps.clone()));
        geocoder.set_offline(offline);

        let mut quotes = QuoteService::new(Box::new(maps.clone()), config.fare, config.display.clone())
            .with_geocoder(Geocoder::new(Box::new(maps)));
        quotes.set_offline(offline);

        Self { quotes, geocoder }
    }
}
