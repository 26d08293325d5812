pub mod parsing;

pub use parsing::ParsingService;
