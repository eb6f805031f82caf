#[macro_use]
extern crate rocket;

pub mod cache;
pub mod config;
pub mod db;
pub mod entrypoints;
pub mod error;
pub mod warmer;

#[cfg(test)]
mod testing;
