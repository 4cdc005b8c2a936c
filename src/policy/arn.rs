//! Resource identifier builders
//!
//! Bucket names and sub-paths are validated once, so every ARN and bucket
//! path built from them is well formed and provably inside a configured bucket.

use crate::error::ResourceError;
use serde::Deserialize;
use std::fmt;

/// Prefix shared by every S3 resource ARN
pub const S3_ARN_PREFIX: &str = "arn:aws:s3:::";

const MIN_BUCKET_LEN: usize = 3;
const MAX_BUCKET_LEN: usize = 63;

/// A validated S3 bucket name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    /// Validates `name` against the S3 bucket naming rules.
    pub fn parse(name: &str) -> Result<Self, ResourceError> {
        let len_ok = (MIN_BUCKET_LEN..=MAX_BUCKET_LEN).contains(&name.len());
        let chars_ok = name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
        let edges_ok = name.starts_with(|c: char| c.is_ascii_alphanumeric())
            && name.ends_with(|c: char| c.is_ascii_alphanumeric());

        if len_ok && chars_ok && edges_ok && !name.contains("..") {
            Ok(Self(name.to_string()))
        } else {
            Err(ResourceError::InvalidBucketName(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `arn:aws:s3:::<bucket>`, the resource used for bucket-level actions.
    pub fn bucket_arn(&self) -> String {
        format!("{}{}", S3_ARN_PREFIX, self.0)
    }

    /// `arn:aws:s3:::<bucket>/<sub>/*`, every object under `sub`.
    pub fn objects_arn(&self, sub: &SubPath) -> String {
        format!("{}{}/{}/*", S3_ARN_PREFIX, self.0, sub.as_str())
    }

    /// `/<bucket>`, the bucket root as a directory target.
    pub fn root_path(&self) -> String {
        format!("/{}", self.0)
    }

    /// `/<bucket>/<sub>` as a directory target.
    pub fn path(&self, sub: &SubPath) -> String {
        format!("/{}/{}", self.0, sub.as_str())
    }

    fn owns_arn(&self, arn: &str) -> bool {
        arn.strip_prefix(S3_ARN_PREFIX)
            .is_some_and(|rest| is_self_or_child(rest, &self.0))
    }

    fn owns_path(&self, path: &str) -> bool {
        path.strip_prefix('/')
            .is_some_and(|rest| is_self_or_child(rest, &self.0))
    }
}

fn is_self_or_child(rest: &str, bucket: &str) -> bool {
    match rest.strip_prefix(bucket) {
        Some("") => true,
        Some(tail) => tail.starts_with('/'),
        None => false,
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BucketName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        BucketName::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A validated relative key prefix such as `historical/2019/equities`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubPath(String);

impl SubPath {
    /// Segments must be non-empty, not `.`/`..`, and use only
    /// alphanumerics, `-`, `_` or `.`.
    pub fn parse(path: &str) -> Result<Self, ResourceError> {
        let valid = !path.is_empty()
            && path.split('/').all(|segment| {
                !segment.is_empty()
                    && segment != "."
                    && segment != ".."
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            });

        if valid {
            Ok(Self(path.to_string()))
        } else {
            Err(ResourceError::InvalidSubPath(path.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The two buckets every user policy and directory map is confined to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Buckets {
    pub public: BucketName,
    pub subscription: BucketName,
}

impl Buckets {
    pub fn new(public: BucketName, subscription: BucketName) -> Self {
        Self {
            public,
            subscription,
        }
    }

    /// Parses both names, failing on the first invalid one.
    pub fn parse(public: &str, subscription: &str) -> Result<Self, ResourceError> {
        Ok(Self::new(
            BucketName::parse(public)?,
            BucketName::parse(subscription)?,
        ))
    }

    /// Returns true if `arn` names one of the buckets or something inside it.
    pub fn owns_resource(&self, arn: &str) -> bool {
        self.public.owns_arn(arn) || self.subscription.owns_arn(arn)
    }

    /// Returns true if `path` is one of the bucket roots or below one.
    pub fn owns_target(&self, path: &str) -> bool {
        self.public.owns_path(path) || self.subscription.owns_path(path)
    }
}
