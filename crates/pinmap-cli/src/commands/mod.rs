pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod config;
pub mod folders;
pub mod friends;
pub mod pins;
pub mod places;
