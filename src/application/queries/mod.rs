pub mod token_info;

pub use token_info::TokenQueryService;
