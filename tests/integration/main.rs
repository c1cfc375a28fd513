#[path = "../fixtures/mod.rs"]
mod fixtures;

mod app_config_test;
mod cli_test;
