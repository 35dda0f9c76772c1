pub mod owner;

pub use owner::PostgresOwnerRepository;
