mod common;
mod filter;
mod scores;
