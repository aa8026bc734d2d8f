#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]

extern crate alloc;

pub(crate) mod fmt;

pub(crate) mod commands;
pub mod config;
pub mod http;
pub(crate) mod matcher;
pub mod responses;
pub mod serial;
pub mod wifi;

#[cfg(feature = "examples")]
pub mod example;

#[cfg(test)]
mod tests;
