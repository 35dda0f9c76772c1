pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::authentication;
pub use domain::login;
pub use domain::owner;
pub use outbound::repositories;
