pub mod error;
pub mod history;
pub mod ladder;
pub mod message;
pub mod rating;
pub mod stats;
pub mod store;
pub mod team;
