//! Identity linking flow: token issue, authorize redirect, callback
//! exchange.

pub mod pkce;
pub mod ports;
pub mod service;
