// Domain layer: table models and ports (interfaces).

pub mod model;
pub mod ports;
