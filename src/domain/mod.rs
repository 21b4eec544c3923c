// Domain layer: reading models, the spread catalogue and ports (interfaces).

pub mod model;
pub mod ports;
pub mod spreads;
