pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod player;
pub mod presenter;
pub mod scanner;
pub mod timeline;
