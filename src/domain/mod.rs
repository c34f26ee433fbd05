// Domain layer: contact/batch models and the ports the send workflow talks through.

pub mod model;
pub mod ports;
