// Domain layer: schedule models, ports, and the time-transformation services.
// Nothing in here touches the filesystem or the logger setup.

pub mod model;
pub mod ports;

pub mod services;
