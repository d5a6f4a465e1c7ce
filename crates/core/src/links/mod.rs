//! Link registry: the durable association between the two account kinds.

pub mod ports;
pub mod service;
