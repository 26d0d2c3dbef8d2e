// Domain layer: plain data types and ports. Engine logic lives in `core`.

pub mod model;
pub mod ports;
