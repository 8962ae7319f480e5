// Adapters layer: concrete implementations of the domain ports.

pub mod postgrest;

pub use postgrest::PostgrestClient;
