// Domain layer: openEO / GRASS models and the GRaaS port. No HTTP framework types here.

pub mod model;
pub mod ports;
