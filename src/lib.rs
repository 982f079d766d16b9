//! pyskel turns a freshly rendered python package skeleton into its final layout.
//! It resolves a set of configuration choices, then applies an ordered table of
//! conditional deletions and content rewrites to the rendered tree. A
//! combinatorial harness validates every reachable configuration.

/// Loading of option overrides from files, stdin and the command line
pub mod answers;

/// Command-line interface module for the pyskel application
pub mod cli;

/// Option model and configuration resolution
pub mod config;

/// Common constants: option names and skeleton file names
pub mod constants;

/// Error types and handling for the pyskel application
pub mod error;

/// Combinatorial validation harness
pub mod harness;

/// Typed locations inside a rendered project
pub mod layout;

/// Logger setup for the binary
pub mod logger;

/// Materialization driver
pub mod materialize;

/// User input and interaction handling
pub mod prompt;

/// Template rendering engine
pub mod renderer;

/// Line-based content rewriting
pub mod rewrite;

/// Ordered post-generation rules
pub mod rules;

/// Rendering of skeleton template directories
pub mod skeleton;

/// On-disk project tree
pub mod tree;
