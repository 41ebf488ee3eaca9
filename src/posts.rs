use serde_json::Value;
use std::{collections::HashMap, fs, path::Path};
use tracing::{debug, warn};

/// Trimmed, lowercased lookup key.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Coerces a loosely typed JSON field to text. Falsy values become "".
fn field(post: &Value, name: &str) -> String {
    match post.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}

/// One blog post as embedded by the host page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub url: String,
    pub cover: String,
    pub date: String,
    pub location: String,
    pub summary: String,
    pub country: String,
    pub country_key: Option<String>,
}

impl Post {
    pub fn from_value(value: &Value) -> Self {
        let country_key = field(value, "country_key");
        Self {
            title: field(value, "title"),
            url: field(value, "url"),
            cover: field(value, "cover"),
            date: field(value, "date"),
            location: field(value, "location"),
            summary: field(value, "summary"),
            country: field(value, "country"),
            country_key: (!country_key.is_empty()).then_some(country_key),
        }
    }

    /// `country_key` wins when it normalizes to something, else `country`.
    pub fn index_key(&self) -> String {
        self.country_key
            .as_deref()
            .map(normalize)
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| normalize(&self.country))
    }
}

/// Accepts a JSON array of posts, or a string holding one.
pub fn parse_posts(value: &Value) -> Vec<Post> {
    match value {
        Value::Array(items) => items.iter().map(Post::from_value).collect(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items.iter().map(Post::from_value).collect(),
            Ok(_) => {
                warn!("Embedded post data is not an array, ignoring it");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Embedded post data is not valid JSON, ignoring it");
                Vec::new()
            }
        },
        _ => {
            warn!("Unsupported embedded post data, ignoring it");
            Vec::new()
        }
    }
}

/// Reads post data from disk. Any failure degrades to no posts.
pub fn load_posts(path: &Path) -> Vec<Post> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read post data");
            return Vec::new();
        }
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(value) => parse_posts(&value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Post data is not valid JSON");
            Vec::new()
        }
    }
}

/// Posts grouped by normalized country key. Built once, read-only afterwards.
#[derive(Debug, Default)]
pub struct PostIndex {
    posts: Vec<Post>,
    buckets: HashMap<String, Vec<usize>>,
}

impl PostIndex {
    pub fn build(posts: Vec<Post>) -> Self {
        let mut buckets: HashMap<String, Vec<usize>> = HashMap::new();
        let mut dropped = 0;
        for (i, post) in posts.iter().enumerate() {
            let key = post.index_key();
            if key.is_empty() {
                dropped += 1;
                continue;
            }
            buckets.entry(key).or_default().push(i);
        }
        debug!(posts = posts.len(), countries = buckets.len(), dropped, "Built post index");
        Self { posts, buckets }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Whether a region keyed `key` would list anything, fallback scan included.
    pub fn has_posts(&self, key: &str) -> bool {
        let key = normalize(key);
        if key.is_empty() {
            return false;
        }
        self.buckets.contains_key(&key) || self.posts.iter().any(|post| normalize(&post.country) == key)
    }

    pub fn bucket(&self, key: &str) -> impl Iterator<Item = &Post> {
        self.buckets
            .get(key)
            .into_iter()
            .flatten()
            .map(|&i| &self.posts[i])
    }

    /// Posts for `key` in source order.
    ///
    /// When the bucket is empty and a label was given, falls back to scanning
    /// every post whose `country` normalizes to the key.
    pub fn lookup(&self, key: &str, fallback_label: Option<&str>) -> Vec<&Post> {
        let key = normalize(key);
        if key.is_empty() {
            return Vec::new();
        }
        let found: Vec<&Post> = self.bucket(&key).collect();
        if !found.is_empty() || fallback_label.is_none_or(str::is_empty) {
            return found;
        }
        self.posts
            .iter()
            .filter(|post| normalize(&post.country) == key)
            .collect()
    }
}
