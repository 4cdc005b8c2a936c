//! User registry
//!
//! Immutable directory of users, each with a credential, a scope-down policy
//! and a logical directory map. Built once at startup and shared read-only.

use super::credentials::Credential;
use crate::config::AuthorizerConfig;
use crate::error::{RegistryError, ResourceError};
use crate::policy::document::{GET_OBJECT, GET_OBJECT_VERSION, LIST_BUCKET};
use crate::policy::{Buckets, DirectoryMap, DirectoryMapEntry, PolicyDocument, Statement, SubPath};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Key prefix inside the public bucket every user may read
const PUBLIC_OBJECTS: &str = "global";
/// Virtual path the public bucket is mounted at
const PUBLIC_ENTRY: &str = "/public/research";

/// A subscription to one year of one dataset, written `<year>/<dataset>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Subscription {
    pub year: u16,
    pub dataset: String,
    key_prefix: SubPath,
}

impl Subscription {
    pub fn new(year: u16, dataset: &str) -> Result<Self, ResourceError> {
        // The dataset must be a single path segment.
        if dataset.contains('/') {
            return Err(ResourceError::InvalidSubPath(dataset.to_string()));
        }
        let key_prefix = SubPath::parse(&format!("historical/{}/{}", year, dataset))?;
        Ok(Self {
            year,
            dataset: dataset.to_string(),
            key_prefix,
        })
    }

    /// `historical/<year>/<dataset>` inside the subscription bucket
    pub fn key_prefix(&self) -> &SubPath {
        &self.key_prefix
    }

    /// `/subscribed/<year>/<dataset>` as seen by the client
    pub fn entry(&self) -> String {
        format!("/subscribed/{}/{}", self.year, self.dataset)
    }
}

impl FromStr for Subscription {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResourceError::InvalidSubPath(s.to_string());
        let (year, dataset) = s.split_once('/').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        Subscription::new(year, dataset)
    }
}

impl TryFrom<String> for Subscription {
    type Error = ResourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.dataset)
    }
}

/// Builds the read-only scope-down policy for a set of subscriptions.
///
/// Both buckets may be listed; objects are readable under the public
/// `global/` prefix and under each subscribed `historical/` prefix.
pub fn scope_down_policy(
    buckets: &Buckets,
    subscriptions: &[Subscription],
) -> Result<PolicyDocument, ResourceError> {
    let global = SubPath::parse(PUBLIC_OBJECTS)?;

    let mut objects = vec![buckets.public.objects_arn(&global)];
    objects.extend(
        subscriptions
            .iter()
            .map(|s| buckets.subscription.objects_arn(s.key_prefix())),
    );

    Ok(PolicyDocument::new(vec![
        Statement::allow(
            "AllowListingOfFolder",
            &[LIST_BUCKET],
            vec![buckets.public.bucket_arn(), buckets.subscription.bucket_arn()],
        ),
        Statement::allow("AllowObjectAccess", &[GET_OBJECT, GET_OBJECT_VERSION], objects),
    ]))
}

/// Builds the logical home directory: the public bucket root followed by one
/// entry per subscription, in subscription order.
pub fn directory_map(buckets: &Buckets, subscriptions: &[Subscription]) -> DirectoryMap {
    let mut entries = vec![DirectoryMapEntry::new(
        PUBLIC_ENTRY,
        buckets.public.root_path(),
    )];
    entries.extend(subscriptions.iter().map(|s| {
        DirectoryMapEntry::new(s.entry(), buckets.subscription.path(s.key_prefix()))
    }));
    DirectoryMap::new(entries)
}

/// A registered user.
#[derive(Debug, Clone)]
pub struct UserRecord {
    username: String,
    credential: Credential,
    policy: PolicyDocument,
    directory_map: DirectoryMap,
}

impl UserRecord {
    /// Checks the record against `buckets` before accepting it: every policy
    /// resource and directory target must live in a configured bucket, and
    /// directory entries must be unique.
    pub fn new(
        username: &str,
        credential: Credential,
        policy: PolicyDocument,
        directory_map: DirectoryMap,
        buckets: &Buckets,
    ) -> Result<Self, RegistryError> {
        if username.is_empty() || username.contains(char::is_whitespace) {
            return Err(RegistryError::InvalidUsername(username.to_string()));
        }

        if let Some(resource) = policy.foreign_resource(buckets) {
            return Err(ResourceError::ForeignResource(resource.to_string()).into());
        }

        if let Some(target) = directory_map.foreign_target(buckets) {
            return Err(ResourceError::ForeignTarget(target.to_string()).into());
        }

        if let Some(entry) = directory_map.duplicate_entry() {
            return Err(RegistryError::DuplicateEntry {
                username: username.to_string(),
                entry: entry.to_string(),
            });
        }

        Ok(Self {
            username: username.to_string(),
            credential,
            policy,
            directory_map,
        })
    }

    /// A subscriber whose policy and directory map derive from `subscriptions`.
    pub fn subscriber(
        username: &str,
        credential: Credential,
        subscriptions: &[Subscription],
        buckets: &Buckets,
    ) -> Result<Self, RegistryError> {
        Self::new(
            username,
            credential,
            scope_down_policy(buckets, subscriptions)?,
            directory_map(buckets, subscriptions),
            buckets,
        )
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn policy(&self) -> &PolicyDocument {
        &self.policy
    }

    pub fn directory_map(&self) -> &DirectoryMap {
        &self.directory_map
    }
}

/// Read-only map from username to record.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: HashMap<String, UserRecord>,
}

impl UserRegistry {
    /// Rejects duplicate usernames.
    pub fn from_users(records: Vec<UserRecord>) -> Result<Self, RegistryError> {
        let mut users = HashMap::with_capacity(records.len());
        for record in records {
            if users.contains_key(record.username()) {
                return Err(RegistryError::DuplicateUser(record.username));
            }
            users.insert(record.username.clone(), record);
        }
        Ok(Self { users })
    }

    /// The demo directory: alice and bryan with fixed subscriptions.
    pub fn builtin(buckets: &Buckets) -> Result<Self, RegistryError> {
        let demo: [(&str, &str, &[(u16, &str)]); 2] = [
            (
                "alice",
                "Password01",
                &[(2018, "indices"), (2019, "indices"), (2019, "equities")],
            ),
            (
                "bryan",
                "Password02",
                &[
                    (2018, "indices"),
                    (2018, "equities"),
                    (2019, "credit"),
                    (2019, "equities"),
                ],
            ),
        ];

        let mut records = Vec::with_capacity(demo.len());
        for (username, secret, subs) in demo {
            let subscriptions = subs
                .iter()
                .map(|(year, dataset)| Subscription::new(*year, dataset))
                .collect::<Result<Vec<_>, _>>()?;
            records.push(UserRecord::subscriber(
                username,
                Credential::from_secret(username, secret),
                &subscriptions,
                buckets,
            )?);
        }
        Self::from_users(records)
    }

    /// Uses the configured users, or the demo directory when none are configured.
    pub fn from_config(config: &AuthorizerConfig) -> Result<Self, RegistryError> {
        let buckets = config.buckets();
        if config.users.is_empty() {
            return Self::builtin(&buckets);
        }

        let records = config
            .users
            .iter()
            .map(|user| {
                let credential = Credential::from_hex(&user.salt, &user.password_sha256)
                    .map_err(|_| RegistryError::InvalidCredential(user.username.clone()))?;
                UserRecord::subscriber(&user.username, credential, &user.subscriptions, &buckets)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_users(records)
    }

    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
