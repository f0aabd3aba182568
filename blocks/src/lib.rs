pub mod block;
pub mod description;
pub mod pages;
pub mod parser;

pub use block::ExampleBlock;
pub use pages::ContentPage;
pub use parser::{ParseWarning, Parser, WarningKind, parse};
