//! Task-to-attempt matching.
//!
//! The scorer only sees [`AttemptLookup`]. The default scheme keys attempts by
//! the task id, or by a content fingerprint when a task has no id, with the
//! bare title accepted as a legacy key.

use std::collections::HashMap;

use md5::{Digest, Md5};
use uuid::{Builder, Uuid};

use crate::types::{AttemptRecord, TaskDescriptor};

const KEY_PREFIX: &str = "task";

/// Resolves the attempt recorded for a task, if any
pub trait AttemptLookup {
    fn find_attempt(&self, task: &TaskDescriptor) -> Option<&AttemptRecord>;
}

impl<T: AttemptLookup + ?Sized> AttemptLookup for &T {
    fn find_attempt(&self, task: &TaskDescriptor) -> Option<&AttemptRecord> {
        (**self).find_attempt(task)
    }
}

impl AttemptLookup for HashMap<String, AttemptRecord> {
    fn find_attempt(&self, task: &TaskDescriptor) -> Option<&AttemptRecord> {
        find_attempt(self, task)
    }
}

/// Attempts keyed by a caller-supplied key function
pub struct KeyedLookup<'a, K> {
    attempts: &'a HashMap<String, AttemptRecord>,
    key_of: K,
}

impl<'a, K> KeyedLookup<'a, K>
where
    K: Fn(&TaskDescriptor) -> String,
{
    pub fn new(attempts: &'a HashMap<String, AttemptRecord>, key_of: K) -> Self {
        Self { attempts, key_of }
    }
}

impl<'a, K> AttemptLookup for KeyedLookup<'a, K>
where
    K: Fn(&TaskDescriptor) -> String,
{
    fn find_attempt(&self, task: &TaskDescriptor) -> Option<&AttemptRecord> {
        self.attempts.get(&(self.key_of)(task))
    }
}

fn trimmed(value: Option<&str>) -> &str {
    value.map(str::trim).unwrap_or("")
}

/// Version 3 name-based UUID of the raw bytes, without a namespace prefix
fn name_uuid_from_bytes(name: &[u8]) -> Uuid {
    let mut digest = [0u8; 16];
    digest.copy_from_slice(&Md5::digest(name));
    Builder::from_md5_bytes(digest).into_uuid()
}

/// Stable key for a task: its id, else `"<title>::<fingerprint>"`
pub fn build_key(task: &TaskDescriptor) -> String {
    if let Some(id) = task.id.as_deref().filter(|id| !id.is_empty()) {
        return id.to_string();
    }

    let title = trimmed(task.title.as_deref());
    let source = format!(
        "{}|{}|{}|{}",
        title,
        trimmed(task.description.as_deref()),
        task.kind().as_str(),
        trimmed(task.status.as_deref()),
    );
    let fingerprint = name_uuid_from_bytes(source.as_bytes());
    let prefix = if title.is_empty() { KEY_PREFIX } else { title };

    format!("{prefix}::{fingerprint}")
}

fn legacy_keys(task: &TaskDescriptor) -> impl Iterator<Item = &str> {
    task.title.as_deref().filter(|title| !title.is_empty()).into_iter()
}

/// Look up by stable key, then by legacy keys
pub fn find_attempt<'a>(
    attempts: &'a HashMap<String, AttemptRecord>,
    task: &TaskDescriptor,
) -> Option<&'a AttemptRecord> {
    if attempts.is_empty() {
        return None;
    }
    attempts
        .get(&build_key(task))
        .or_else(|| legacy_keys(task).find_map(|key| attempts.get(key)))
}

/// Store an attempt under the task's stable key
pub fn put_attempt(
    attempts: &mut HashMap<String, AttemptRecord>,
    task: &TaskDescriptor,
    attempt: AttemptRecord,
) {
    attempts.insert(build_key(task), attempt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskContent;

    #[test]
    fn test_build_key_prefers_id() {
        let task = TaskDescriptor::new(TaskContent::TrueFalse).with_id("tf-1").with_title("Sky");
        assert_eq!(build_key(&task), "tf-1");
    }

    #[test]
    fn test_build_key_empty_id_uses_fingerprint() {
        let mut task = TaskDescriptor::new(TaskContent::TrueFalse).with_title(" Sky ");
        task.id = Some(String::new());
        let key = build_key(&task);
        assert!(key.starts_with("Sky::"), "{key}");
    }

    #[test]
    fn test_build_key_is_stable_and_content_sensitive() {
        let a = TaskDescriptor::new(TaskContent::InfoCard).with_title("Intro");
        let b = TaskDescriptor::new(TaskContent::InfoCard).with_title("Intro");
        let c = TaskDescriptor::new(TaskContent::Ordering).with_title("Intro");
        assert_eq!(build_key(&a), build_key(&b));
        assert_ne!(build_key(&a), build_key(&c));
    }

    #[test]
    fn test_fingerprint_matches_stored_keys() {
        let task = TaskDescriptor::new(TaskContent::InfoCard).with_title("Intro");
        assert_eq!(build_key(&task), "Intro::2a81ec30-0bd6-35ba-bf37-229a5a837ba0");

        let fingerprint = name_uuid_from_bytes(b"Capitals||MATCHING_PAIR|");
        assert_eq!(fingerprint.get_version_num(), 3);
        assert_eq!(fingerprint.to_string(), "3445b258-e5ea-37fe-8ff2-26c78d062d6e");
    }

    #[test]
    fn test_build_key_without_title() {
        let task = TaskDescriptor::new(TaskContent::FillInBlank);
        assert!(build_key(&task).starts_with("task::"));
    }

    #[test]
    fn test_put_then_find() {
        let task = TaskDescriptor::new(TaskContent::MatchingPair).with_title("Pairs");
        let mut attempts = HashMap::new();
        put_attempt(&mut attempts, &task, AttemptRecord::default().with_success(true));
        assert_eq!(find_attempt(&attempts, &task).and_then(|a| a.success), Some(true));
    }

    #[test]
    fn test_legacy_title_key() {
        let task = TaskDescriptor::new(TaskContent::Ordering).with_title("Sort it");
        let mut attempts = HashMap::new();
        attempts.insert("Sort it".to_string(), AttemptRecord::default().with_score_ratio(0.5));
        assert!(attempts.find_attempt(&task).is_some());
    }

    #[test]
    fn test_keyed_lookup() {
        let task = TaskDescriptor::new(TaskContent::CodingChallenge).with_id("c-9");
        let mut attempts = HashMap::new();
        attempts.insert("custom:c-9".to_string(), AttemptRecord::default());
        let lookup = KeyedLookup::new(&attempts, |t: &TaskDescriptor| {
            format!("custom:{}", t.id.as_deref().unwrap_or_default())
        });
        assert!(lookup.find_attempt(&task).is_some());
        assert!(attempts.find_attempt(&task).is_none());
    }
}
