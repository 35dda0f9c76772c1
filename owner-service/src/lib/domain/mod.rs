pub mod authentication;
pub mod login;
pub mod owner;
