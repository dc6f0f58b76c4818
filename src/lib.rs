pub mod classify;
pub mod geocode;
pub mod notice;
pub mod output;
pub mod runner;
pub mod session;
pub mod settings;
pub mod sources;
