// Service exports
pub mod geocode_cache;
pub mod geocoder;
pub mod postgres;

pub use geocode_cache::{GeocodeCache, GeocodeSession, GeocodeStore, StoreError};
pub use geocoder::{GeocodeError, GeocodeProvider, YandexGeocoder};
pub use postgres::{PostgresClient, PostgresError};
