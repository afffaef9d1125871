pub mod exemplars;
pub mod parser;
pub mod prompt;
pub mod references;
pub mod service;
