//! Access scoping
//!
//! Resource builders, scope-down policy documents and logical directory maps.

pub mod arn;
pub mod directory;
pub mod document;

pub use arn::{BucketName, Buckets, SubPath};
pub use directory::{DirectoryMap, DirectoryMapEntry};
pub use document::{Effect, PolicyDocument, Statement};
