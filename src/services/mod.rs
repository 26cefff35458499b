use crate::idea::IdeaRecord;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, IdeasError>;

#[derive(Debug, Error)]
pub enum IdeasError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("configuration error: {0}")]
    Config(String),
}

/// Key/value bag shared with the host for settings and template data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataBag {
    inner: BTreeMap<String, Value>,
}

impl DataBag {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) {
        self.inner.insert(
            key.to_string(),
            serde_json::to_value(value).unwrap_or(Value::Null),
        );
    }

    pub fn remove(&mut self, key: &str) {
        self.inner.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn bool(&self, key: &str) -> bool {
        self.inner
            .get(key)
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.inner.get(key).and_then(|value| value.as_i64())
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.inner
            .get(key)
            .and_then(|value| value.as_str().map(|s| s.to_string()))
    }

    pub fn require_int(&self, key: &str) -> ServiceResult<i64> {
        self.int(key)
            .ok_or_else(|| IdeasError::Config(format!("missing integer setting `{key}`")))
    }

    pub fn merge_object(&mut self, vars: Value) {
        if let Value::Object(map) = vars {
            for (key, value) in map {
                self.inner.insert(key, value);
            }
        }
    }
}

/// The user the current request runs as.
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub language: String,
}

impl Default for SessionUser {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::from("Guest"),
            language: String::from("en"),
        }
    }
}

pub trait IdeaStore {
    fn idea_by_topic_id(&self, topic_id: i64) -> ServiceResult<Option<IdeaRecord>>;
    fn set_title(&self, idea_id: i64, title: &str) -> ServiceResult<()>;
}

pub trait RouteHelper {
    fn route(&self, name: &str, params: &[(&str, &str)]) -> String;
}

pub trait Authorizer {
    fn moderates(&self, user_id: i64, forum_id: i64) -> bool;
}

pub trait LinkHelper {
    fn idea_link(&self, idea_id: i64) -> String;
}

pub trait Language {
    fn lang(&self, key: &str) -> String;
}

pub trait Template {
    fn assign_var(&self, name: &str, value: Value);
    fn assign_vars(&self, vars: Value);
}

#[derive(Debug, Default)]
struct IdeasState {
    by_topic: BTreeMap<i64, IdeaRecord>,
    lookups: Vec<i64>,
    title_updates: Vec<(i64, String)>,
}

/// Idea storage double backed by shared in-process state. Every lookup
/// and title update is recorded so callers can assert exact call counts.
#[derive(Clone, Default)]
pub struct InMemoryIdeas {
    state: Arc<Mutex<IdeasState>>,
}

impl InMemoryIdeas {
    pub fn new_with_sample() -> Self {
        let store = Self::default();
        store.seed(IdeaRecord {
            id: 1,
            topic_id: 1,
            author_id: 1,
            title: String::from("Allow wider signatures"),
            status: crate::idea::IdeaStatus::New,
            votes_up: 3,
            votes_down: 1,
            submitted_at: Utc::now(),
        });
        store
    }

    pub fn seed(&self, idea: IdeaRecord) {
        let mut state = self.state.lock().unwrap();
        state.by_topic.insert(idea.topic_id, idea);
    }

    pub fn lookups(&self) -> Vec<i64> {
        self.state.lock().unwrap().lookups.clone()
    }

    pub fn title_updates(&self) -> Vec<(i64, String)> {
        self.state.lock().unwrap().title_updates.clone()
    }
}

impl IdeaStore for InMemoryIdeas {
    fn idea_by_topic_id(&self, topic_id: i64) -> ServiceResult<Option<IdeaRecord>> {
        let mut state = self.state.lock().unwrap();
        state.lookups.push(topic_id);
        Ok(state.by_topic.get(&topic_id).cloned())
    }

    fn set_title(&self, idea_id: i64, title: &str) -> ServiceResult<()> {
        let mut state = self.state.lock().unwrap();
        let record = state
            .by_topic
            .values_mut()
            .find(|idea| idea.id == idea_id)
            .ok_or_else(|| IdeasError::Storage(format!("no idea with id {idea_id}")))?;
        record.title = title.to_string();
        state.title_updates.push((idea_id, title.to_string()));
        Ok(())
    }
}

/// Router double that synthesizes deterministic URLs and records calls.
#[derive(Clone)]
pub struct RecordingRouter {
    base: String,
    calls: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
}

impl Default for RecordingRouter {
    fn default() -> Self {
        Self {
            base: String::from("https://forum.local/app"),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl RecordingRouter {
    pub fn with_base(base: &str) -> Self {
        Self {
            base: base.to_string(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl RouteHelper for RecordingRouter {
    fn route(&self, name: &str, params: &[(&str, &str)]) -> String {
        self.calls.lock().unwrap().push((
            name.to_string(),
            params
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        ));
        let mut url = format!("{}/{}", self.base, name);
        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        url
    }
}

/// Authorizer double holding explicit (user, forum) moderator grants.
#[derive(Clone, Default)]
pub struct InMemoryAuth {
    grants: Arc<Mutex<HashSet<(i64, i64)>>>,
}

impl InMemoryAuth {
    pub fn grant_moderator(&self, user_id: i64, forum_id: i64) {
        self.grants.lock().unwrap().insert((user_id, forum_id));
    }
}

impl Authorizer for InMemoryAuth {
    fn moderates(&self, user_id: i64, forum_id: i64) -> bool {
        self.grants.lock().unwrap().contains(&(user_id, forum_id))
    }
}

#[derive(Clone)]
pub struct StaticLinks {
    base: String,
}

impl Default for StaticLinks {
    fn default() -> Self {
        Self {
            base: String::from("https://forum.local/app/ideas"),
        }
    }
}

impl StaticLinks {
    pub fn with_base(base: &str) -> Self {
        Self {
            base: base.to_string(),
        }
    }
}

impl LinkHelper for StaticLinks {
    fn idea_link(&self, idea_id: i64) -> String {
        format!("{}/{}", self.base, idea_id)
    }
}

/// Language provider that resolves every key to itself, matching host
/// behavior when no language pack has been loaded.
#[derive(Clone, Copy, Default)]
pub struct EchoLanguage;

impl Language for EchoLanguage {
    fn lang(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Template double that collects assigned vars into a shared bag.
#[derive(Clone, Default)]
pub struct CollectingTemplate {
    vars: Arc<Mutex<DataBag>>,
}

impl CollectingTemplate {
    pub fn vars(&self) -> DataBag {
        self.vars.lock().unwrap().clone()
    }

    pub fn var(&self, key: &str) -> Option<Value> {
        self.vars.lock().unwrap().get(key).cloned()
    }
}

impl Template for CollectingTemplate {
    fn assign_var(&self, name: &str, value: Value) {
        self.vars.lock().unwrap().set(name, value);
    }

    fn assign_vars(&self, vars: Value) {
        self.vars.lock().unwrap().merge_object(vars);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn databag_reads_typed_values() {
        let mut bag = DataBag::new();
        bag.set("ideas_forum_id", 2);
        bag.set("title", "Ideas");
        bag.set("enabled", true);
        assert_eq!(bag.int("ideas_forum_id"), Some(2));
        assert_eq!(bag.string("title").as_deref(), Some("Ideas"));
        assert!(bag.bool("enabled"));
        assert_eq!(bag.int("missing"), None);
        assert!(bag.require_int("missing").is_err());
    }

    #[test]
    fn databag_merges_objects() {
        let mut bag = DataBag::new();
        bag.merge_object(serde_json::json!({"a": 1, "b": "two"}));
        assert_eq!(bag.int("a"), Some(1));
        assert_eq!(bag.string("b").as_deref(), Some("two"));
        bag.merge_object(Value::Null);
        assert_eq!(bag.int("a"), Some(1));
    }

    #[test]
    fn idea_store_records_calls() {
        let store = InMemoryIdeas::new_with_sample();
        let found = store.idea_by_topic_id(1).unwrap();
        assert!(found.is_some());
        assert!(store.idea_by_topic_id(99).unwrap().is_none());
        assert_eq!(store.lookups(), vec![1, 99]);

        store.set_title(1, "Renamed").unwrap();
        assert_eq!(store.idea_by_topic_id(1).unwrap().unwrap().title, "Renamed");
        assert!(store.set_title(42, "Nope").is_err());
        assert_eq!(store.title_updates(), vec![(1, String::from("Renamed"))]);
    }

    #[test]
    fn router_synthesizes_urls_and_records() {
        let router = RecordingRouter::default();
        let url = router.route("ideas_index_controller", &[]);
        assert_eq!(url, "https://forum.local/app/ideas_index_controller");
        let url = router.route("idea_details", &[("id", "7")]);
        assert_eq!(url, "https://forum.local/app/idea_details?id=7");
        assert_eq!(router.calls().len(), 2);
    }

    #[test]
    fn collecting_template_accumulates_vars() {
        let template = CollectingTemplate::default();
        template.assign_var("IDEA_ID", Value::from(3));
        template.assign_vars(serde_json::json!({"IDEA_TITLE": "Night mode"}));
        assert_eq!(template.var("IDEA_ID"), Some(Value::from(3)));
        assert_eq!(
            template.vars().string("IDEA_TITLE").as_deref(),
            Some("Night mode")
        );
    }
}
