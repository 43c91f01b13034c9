pub mod account;
pub mod in_memory;

pub use account::PostgresAccountRepository;
pub use in_memory::InMemoryAccountRepository;
