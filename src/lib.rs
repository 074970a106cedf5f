pub mod cli;
pub mod portico;
pub mod users;
