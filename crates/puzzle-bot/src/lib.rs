//! Posts a random Lichess puzzle to X/Twitter.
//!
//! One run: pick a dataset row, play the setup move, render the board to a
//! PNG, post it with a caption and archive the image.

pub mod clients;
pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod publisher;
pub mod render;
