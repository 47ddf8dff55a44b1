// Domain layer: credential value object, entity models and the API port.

pub mod credential;
pub mod model;
pub mod ports;
