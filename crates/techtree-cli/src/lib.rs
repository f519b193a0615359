//! Command-line front end for the tech tree.
//!
//! Reads a game data directory into a [`techtree_logic::Tree`] plus the
//! module, org and benefit tables, imports saves, and persists the pinned
//! list and known ids between runs.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`cli`] | clap command line definition |
//! | [`commands`] | Command execution |
//! | [`config`] | Settings and on-disk layout |
//! | [`loader`] | Game data loading |
//! | [`report`] | JSON / text views of results |
//! | [`save_file`] | Compressed save decoding |
//! | [`state`] | pinned.json / known.json persistence |

pub mod cli;
pub mod commands;
pub mod config;
pub mod loader;
pub mod report;
pub mod save_file;
pub mod state;
