//! Adapters for external services: geocoding and alert messaging.

pub mod geocoding;
pub mod messaging;
pub mod notify;

pub use geocoding::{whatsapp_link, GeoPoint, Geocoder, NominatimGeocoder, Resolution};
pub use messaging::{LogSender, MessageSender, TwilioSender};
pub use notify::{Alert, AlertQueue, NotificationDispatcher};
