// Domain layer: models, Modelfile parsing and ports. No I/O here.

pub mod model;
pub mod model_ref;
pub mod modelfile;
pub mod ports;
