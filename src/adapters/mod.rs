// Adapters layer: concrete implementations of the domain ports.
// Local file storage lives under config::cli next to the CLI settings.

pub mod sidereal;

pub use sidereal::MeanSiderealClock;
