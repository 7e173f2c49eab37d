pub mod filter;
pub mod search;
