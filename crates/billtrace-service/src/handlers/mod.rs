//! Request handlers.

pub mod bills;
pub mod health;
pub mod leaderboards;
pub mod location;
pub mod track;
pub mod valid_bills;
