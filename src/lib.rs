//! # kvlite
//!
//! A small in-memory key-value server speaking a Redis-style wire protocol.
//!
//! The codec (`resp`) and the hash table (`store`) are usable on their own;
//! `server` ties them together with one task per client connection and a
//! single reader/writer lock around the store.

pub mod command;
pub mod config;
pub mod connection;
pub mod error;
pub mod resp;
pub mod server;
pub mod store;
