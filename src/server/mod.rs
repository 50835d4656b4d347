// src/server/mod.rs

//! Server layer root module.
//!
//! This module organizes the network-facing components:
//! - TCP listener and shutdown signal
//! - Per-connection actors (frame decoding, outbound serialization)
//! - Lobby (registration, pairing, idle shutdown)
//! - Game session actors (one per paired match)

pub mod connection;
pub mod game_session;
pub mod listener;
pub mod lobby;
pub mod protocol;
