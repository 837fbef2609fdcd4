#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use vc_config as config;
pub use vc_tree as tree;
pub use vc_utils as utils;
