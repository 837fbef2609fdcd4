#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod document;
mod error;
mod options;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use document::ConfigDocument;
pub use error::ConfigError;
pub use options::ConfigOptions;

pub use vc_tree;
