pub(crate) mod backend;
pub(crate) mod command;
pub(crate) mod config;
pub(crate) mod service;
