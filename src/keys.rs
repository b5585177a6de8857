//! Key naming scheme for the weir run queue keyspace.
//!
//! Every piece of queue state lives in a Redis-Cluster-compatible store under
//! a flat string key, and this module is the single authority for how those
//! keys are spelled. Builders assemble keys out of tenant-scope segments,
//! scan patterns cover whole key families, and the parser recovers the
//! original identifiers from a previously built key.
//!
//! Keys follow a fixed, colon-delimited grammar:
//!
//! ```text
//! {org:<orgId>}:proj:<projectId>:env:<envId>:queue:<queueName>[:ck:<concurrencyKey>][:<suffix>]
//! ```
//!
//! The organization segment is wrapped in `{...}` so a cluster-aware store
//! hashes every key belonging to one organization to the same slot. The
//! wrapper appears exactly once per key, always around the org id.
//!
//! Identifiers are trusted verbatim: callers must not embed `:`, `{` or `}`
//! in org/project/env ids, queue names, concurrency keys, task identifiers,
//! or message ids, since those characters are structural. Nothing here
//! validates that. Likewise the parser assumes its input was produced by one
//! of the builders in this module; feeding it anything else yields garbage
//! field values, not an error.
//!
//! Built keys are unprefixed. The storage client prepends the configured
//! prefix to every key it writes, so only the scan patterns (which run
//! against raw server-side key names) include it, and the parser strips it
//! when present.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scope::{EnvDescriptor, EnvScope};
use crate::settings::KeyspaceConfig;

/// Every label and suffix that can appear in a key, as a closed set so the
/// builders and scan patterns can never drift apart on spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPart {
    /// Organization label, always hash-tag wrapped.
    Org,
    /// Project label.
    Project,
    /// Environment label.
    Env,
    /// Queue name label.
    Queue,
    /// Concurrency partition key label.
    ConcurrencyKey,
    /// Task identifier label.
    Task,
    /// Message storage label.
    Message,
    /// Suffix for live in-flight counters.
    CurrentConcurrency,
    /// Suffix for enforced concurrency limits.
    ConcurrencyLimit,
    /// Suffix for an organization's disabled-limit marker.
    DisabledConcurrencyLimit,
    /// Suffix for capacity reserved separately from the enforced limit.
    ReserveConcurrency,
}

impl KeyPart {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyPart::Org => "org",
            KeyPart::Project => "proj",
            KeyPart::Env => "env",
            KeyPart::Queue => "queue",
            KeyPart::ConcurrencyKey => "ck",
            KeyPart::Task => "task",
            KeyPart::Message => "message",
            KeyPart::CurrentConcurrency => "currentConcurrency",
            KeyPart::ConcurrencyLimit => "concurrency",
            KeyPart::DisabledConcurrencyLimit => "disabledConcurrency",
            KeyPart::ReserveConcurrency => "reserveConcurrency",
        }
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Segment order of a queue key. The parser reads values back out of the
/// same table, so the builder and parser paths cannot disagree on positions.
const QUEUE_KEY_LAYOUT: [KeyPart; 5] = [
    KeyPart::Org,
    KeyPart::Project,
    KeyPart::Env,
    KeyPart::Queue,
    KeyPart::ConcurrencyKey,
];

/// Token index of a segment's value after splitting a queue key on `:`.
///
/// Each segment is a `label:value` pair, so segment `i`'s value sits at
/// token `2 * i + 1`. The org segment's braces land inside tokens 0 and 1
/// and are stripped separately.
fn segment_value_position(segment: KeyPart) -> Option<usize> {
    QUEUE_KEY_LAYOUT
        .iter()
        .position(|part| *part == segment)
        .map(|index| 2 * index + 1)
}

fn org_section(org_id: &str) -> String {
    format!("{{{}:{}}}", KeyPart::Org, org_id)
}

fn proj_section(project_id: &str) -> String {
    format!("{}:{}", KeyPart::Project, project_id)
}

fn env_section(env_id: &str) -> String {
    format!("{}:{}", KeyPart::Env, env_id)
}

fn queue_section(queue: &str) -> String {
    format!("{}:{}", KeyPart::Queue, queue)
}

fn concurrency_key_section(concurrency_key: &str) -> String {
    format!("{}:{}", KeyPart::ConcurrencyKey, concurrency_key)
}

fn task_section(task_identifier: &str) -> String {
    format!("{}:{}", KeyPart::Task, task_identifier)
}

/// Identifiers recovered from a queue key.
///
/// `concurrency_key` is `None` when the key carried no partition segment.
/// For input that was not produced by [`KeyProducer`], field values are
/// unspecified (missing positions come back empty).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDescriptor {
    pub org_id: String,
    pub project_id: String,
    pub env_id: String,
    pub queue: String,
    pub concurrency_key: Option<String>,
}

impl QueueDescriptor {
    /// Re-slice the parsed identifiers into the flat scope shape so the
    /// scope-taking builders can be reused on a parsed key.
    pub fn env_descriptor(&self) -> EnvDescriptor {
        EnvDescriptor {
            org_id: self.org_id.clone(),
            project_id: self.project_id.clone(),
            env_id: self.env_id.clone(),
        }
    }
}

/// Builds and parses every key the run queue stores data under.
///
/// Holds the one piece of configuration this scheme has: the key prefix the
/// storage client prepends to its writes. All methods are pure functions
/// over their arguments and that prefix, so a producer is freely shareable
/// across threads.
#[derive(Clone, Debug)]
pub struct KeyProducer {
    prefix: String,
}

impl KeyProducer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &KeyspaceConfig) -> Self {
        Self::new(config.prefix.clone())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Storage key for a queue, optionally partitioned by a concurrency key.
    pub fn queue_key<'a>(
        &self,
        scope: impl Into<EnvScope<'a>>,
        queue: &str,
        concurrency_key: Option<&str>,
    ) -> String {
        let scope = scope.into();
        let mut sections = vec![
            org_section(scope.org_id()),
            proj_section(scope.project_id()),
            env_section(scope.env_id()),
            queue_section(queue),
        ];
        if let Some(key) = concurrency_key {
            sections.push(concurrency_key_section(key));
        }
        sections.join(":")
    }

    /// Concurrency limit key for a queue. Limits apply to the queue as a
    /// whole, so no partition segment is included.
    pub fn queue_concurrency_limit_key<'a>(
        &self,
        scope: impl Into<EnvScope<'a>>,
        queue: &str,
    ) -> String {
        format!(
            "{}:{}",
            self.queue_key(scope, queue, None),
            KeyPart::ConcurrencyLimit
        )
    }

    /// In-flight counter key for a queue, partitioned if a concurrency key
    /// is given.
    pub fn current_concurrency_key<'a>(
        &self,
        scope: impl Into<EnvScope<'a>>,
        queue: &str,
        concurrency_key: Option<&str>,
    ) -> String {
        format!(
            "{}:{}",
            self.queue_key(scope, queue, concurrency_key),
            KeyPart::CurrentConcurrency
        )
    }

    /// Concurrency limit key for an environment.
    pub fn env_concurrency_limit_key<'a>(&self, scope: impl Into<EnvScope<'a>>) -> String {
        let scope = scope.into();
        [
            org_section(scope.org_id()),
            proj_section(scope.project_id()),
            env_section(scope.env_id()),
            KeyPart::ConcurrencyLimit.to_string(),
        ]
        .join(":")
    }

    /// In-flight counter key for an environment.
    pub fn env_current_concurrency_key<'a>(&self, scope: impl Into<EnvScope<'a>>) -> String {
        let scope = scope.into();
        [
            org_section(scope.org_id()),
            env_section(scope.env_id()),
            KeyPart::CurrentConcurrency.to_string(),
        ]
        .join(":")
    }

    /// Reserved-capacity key for an environment, tracked separately from the
    /// enforced limit.
    pub fn env_reserve_concurrency_key<'a>(&self, scope: impl Into<EnvScope<'a>>) -> String {
        let scope = scope.into();
        [
            org_section(scope.org_id()),
            env_section(scope.env_id()),
            KeyPart::ReserveConcurrency.to_string(),
        ]
        .join(":")
    }

    /// Coarse org+env grouping key, with no project or queue segment.
    pub fn env_queue_key<'a>(&self, scope: impl Into<EnvScope<'a>>) -> String {
        let scope = scope.into();
        [org_section(scope.org_id()), env_section(scope.env_id())].join(":")
    }

    /// In-flight counter key for a project.
    pub fn project_current_concurrency_key<'a>(&self, scope: impl Into<EnvScope<'a>>) -> String {
        let scope = scope.into();
        [
            org_section(scope.org_id()),
            proj_section(scope.project_id()),
            KeyPart::CurrentConcurrency.to_string(),
        ]
        .join(":")
    }

    /// In-flight counter key for a task identifier, scoped to org + project.
    pub fn task_identifier_current_concurrency_key<'a>(
        &self,
        scope: impl Into<EnvScope<'a>>,
        task_identifier: &str,
    ) -> String {
        let scope = scope.into();
        [
            org_section(scope.org_id()),
            proj_section(scope.project_id()),
            task_section(task_identifier),
        ]
        .join(":")
    }

    /// Marker key recording that an organization's concurrency limits are
    /// disabled.
    pub fn disabled_concurrency_limit_key(&self, org_id: &str) -> String {
        format!(
            "{}:{}",
            org_section(org_id),
            KeyPart::DisabledConcurrencyLimit
        )
    }

    /// Storage key for a message payload, scoped to its organization.
    pub fn message_key(&self, org_id: &str, message_id: &str) -> String {
        format!("{}:{}:{}", org_section(org_id), KeyPart::Message, message_id)
    }

    /// Pattern matching every queue key feeding the named master queue.
    pub fn master_queue_scan_pattern(&self, master_queue: &str) -> String {
        format!("{}*{}", self.prefix, master_queue)
    }

    /// Pattern matching the in-flight counter keys of every queue across all
    /// tenants. Built from the same segment grammar as the keys themselves,
    /// with `*` substituted for each value and the literal suffix kept.
    pub fn queue_current_concurrency_scan_pattern(&self) -> String {
        let pattern = [
            org_section("*"),
            proj_section("*"),
            env_section("*"),
            queue_section("*"),
            KeyPart::CurrentConcurrency.to_string(),
        ]
        .join(":");
        format!("{}{}", self.prefix, pattern)
    }

    /// Remove the configured prefix from a key if present. Input without the
    /// prefix passes through unchanged, so the operation is idempotent.
    pub fn strip_key_prefix<'k>(&self, key: &'k str) -> &'k str {
        key.strip_prefix(self.prefix.as_str()).unwrap_or(key)
    }

    /// Recover the identifiers embedded in a queue key, prefixed or not.
    ///
    /// A single tokenizer over the shared segment layout: the key is split
    /// on `:` and each identifier read from its fixed position. Only call
    /// this on keys built by [`Self::queue_key`]; anything else produces
    /// unspecified field values.
    pub fn descriptor_from_queue(&self, queue: &str) -> QueueDescriptor {
        let normalized = self.strip_key_prefix(queue);
        let tokens: Vec<&str> = normalized.split(':').collect();
        let value_of = |segment: KeyPart| {
            segment_value_position(segment)
                .and_then(|position| tokens.get(position))
                .copied()
        };
        QueueDescriptor {
            org_id: value_of(KeyPart::Org)
                .unwrap_or_default()
                .replace(['{', '}'], ""),
            project_id: value_of(KeyPart::Project).unwrap_or_default().to_string(),
            env_id: value_of(KeyPart::Env).unwrap_or_default().to_string(),
            queue: value_of(KeyPart::Queue).unwrap_or_default().to_string(),
            concurrency_key: value_of(KeyPart::ConcurrencyKey).map(str::to_string),
        }
    }

    pub fn org_id_from_queue(&self, queue: &str) -> String {
        self.descriptor_from_queue(queue).org_id
    }

    pub fn env_id_from_queue(&self, queue: &str) -> String {
        self.descriptor_from_queue(queue).env_id
    }

    pub fn project_id_from_queue(&self, queue: &str) -> String {
        self.descriptor_from_queue(queue).project_id
    }

    /// Concurrency limit key for the queue a queue key names, with any
    /// partition segment dropped first. Limits are per queue, never per
    /// partition.
    pub fn concurrency_limit_key_from_queue(&self, queue: &str) -> String {
        let partition_marker = format!(":{}:", KeyPart::ConcurrencyKey);
        let base = match queue.find(&partition_marker) {
            Some(at) => &queue[..at],
            None => queue,
        };
        format!("{}:{}", base, KeyPart::ConcurrencyLimit)
    }

    /// In-flight counter key for the exact queue (and partition, if any) a
    /// queue key names.
    pub fn current_concurrency_key_from_queue(&self, queue: &str) -> String {
        format!("{}:{}", queue, KeyPart::CurrentConcurrency)
    }

    pub fn disabled_concurrency_limit_key_from_queue(&self, queue: &str) -> String {
        let descriptor = self.descriptor_from_queue(queue);
        self.disabled_concurrency_limit_key(&descriptor.org_id)
    }

    /// Per-environment limit key re-derived from a queue key. Rebuilt from
    /// the org and env portions only.
    pub fn env_concurrency_limit_key_from_queue(&self, queue: &str) -> String {
        let descriptor = self.descriptor_from_queue(queue);
        [
            org_section(&descriptor.org_id),
            env_section(&descriptor.env_id),
            KeyPart::ConcurrencyLimit.to_string(),
        ]
        .join(":")
    }

    pub fn env_current_concurrency_key_from_queue(&self, queue: &str) -> String {
        let descriptor = self.descriptor_from_queue(queue).env_descriptor();
        self.env_current_concurrency_key(&descriptor)
    }

    pub fn env_queue_key_from_queue(&self, queue: &str) -> String {
        let descriptor = self.descriptor_from_queue(queue).env_descriptor();
        self.env_queue_key(&descriptor)
    }

    pub fn project_current_concurrency_key_from_queue(&self, queue: &str) -> String {
        let descriptor = self.descriptor_from_queue(queue).env_descriptor();
        self.project_current_concurrency_key(&descriptor)
    }

    /// Iteration prefix (trailing `:` included) for the task-identifier
    /// counter keys of the org + project a queue key belongs to.
    pub fn task_identifier_current_concurrency_key_prefix_from_queue(
        &self,
        queue: &str,
    ) -> String {
        let descriptor = self.descriptor_from_queue(queue);
        format!(
            "{}:{}:{}:",
            org_section(&descriptor.org_id),
            proj_section(&descriptor.project_id),
            KeyPart::Task
        )
    }

    pub fn task_identifier_current_concurrency_key_from_queue(
        &self,
        queue: &str,
        task_identifier: &str,
    ) -> String {
        format!(
            "{}{}",
            self.task_identifier_current_concurrency_key_prefix_from_queue(queue),
            task_identifier
        )
    }

    /// Iteration prefix (trailing `:` included) for the message keys of the
    /// organization a queue key belongs to.
    pub fn message_key_prefix_from_queue(&self, queue: &str) -> String {
        let descriptor = self.descriptor_from_queue(queue);
        format!("{}:{}:", org_section(&descriptor.org_id), KeyPart::Message)
    }
}
