mod resolver;

pub use resolver::PathResolver;
