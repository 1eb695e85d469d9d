// Domain layer: the note command, link settings and the ports the core talks through.

pub mod model;
pub mod ports;
