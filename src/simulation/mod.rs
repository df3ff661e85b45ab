pub mod config;
pub mod engine;
pub mod observer;
pub mod random;
pub mod replication;
pub mod statistics;
