//! Event-stream topic filters.
//!
//! Grammar: a comma-separated list of `Topic` or `Topic:suffix` entries, e.g.
//! `Job,Node:web-*`. Whitespace around entries, topics and suffixes is ignored.
//! A topic may repeat; its suffixes accumulate in input order.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Topics subscribed to when none are configured.
pub const DEFAULT_EVENT_TOPICS: &str = "Job,Allocation,Deployment,Evaluation";

/// Suffix used when an entry names no suffix.
pub const WILDCARD: &str = "*";

/// Scheduler event-stream topic kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    Deployment,
    Evaluation,
    Allocation,
    Job,
    Node,
    Service,
    /// Every topic (`*`)
    All,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Deployment => "Deployment",
            Topic::Evaluation => "Evaluation",
            Topic::Allocation => "Allocation",
            Topic::Job => "Job",
            Topic::Node => "Node",
            Topic::Service => "Service",
            Topic::All => "*",
        }
    }
}

impl FromStr for Topic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Deployment" => Ok(Topic::Deployment),
            "Evaluation" => Ok(Topic::Evaluation),
            "Allocation" => Ok(Topic::Allocation),
            "Job" => Ok(Topic::Job),
            "Node" => Ok(Topic::Node),
            "Service" => Ok(Topic::Service),
            "*" => Ok(Topic::All),
            other => Err(Error::InvalidTopicSyntax(other.to_string())),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mapping from topic to the resource-name suffix patterns subscribed for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTopics(BTreeMap<Topic, Vec<String>>);

impl EventTopics {
    /// Parse a topic list such as `Job,Node:web-*`.
    pub fn parse(input: &str) -> Result<Self> {
        let mut topics = Self::default();
        for entry in input.split(',') {
            let entry = entry.trim();
            let mut parts = entry.split(':');
            let name = parts.next().unwrap_or_default().trim();
            let suffix = parts.next().map(str::trim);
            if parts.next().is_some() {
                return Err(Error::InvalidTopicSyntax(entry.to_string()));
            }

            let topic: Topic = name.parse()?;
            topics.insert(topic, suffix.unwrap_or(WILDCARD));
        }
        Ok(topics)
    }

    /// Add a suffix for a topic, keeping any suffixes already present.
    pub fn insert(&mut self, topic: Topic, suffix: impl Into<String>) {
        self.0.entry(topic).or_default().push(suffix.into());
    }

    /// Suffixes subscribed for a topic.
    pub fn get(&self, topic: Topic) -> Option<&[String]> {
        self.0.get(&topic).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Topic, &Vec<String>)> {
        self.0.iter()
    }

    /// `("topic", "Kind:suffix")` pairs for the event-stream request.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.0
            .iter()
            .flat_map(|(topic, suffixes)| {
                suffixes
                    .iter()
                    .map(move |suffix| ("topic", format!("{}:{}", topic, suffix)))
            })
            .collect()
    }
}
