pub mod app;
pub mod app_env;
pub mod cli;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod gateway;
pub mod logging;
pub mod navigation;
