pub mod alert;
pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod indicator;
pub mod input;
pub mod model;
pub mod poller;
pub mod ui;
