//! Event filter queries in the jq language.
//!
//! Each event-stream message is passed through the configured query before the
//! dashboard shows it. Queries are parsed and compiled when the configuration is
//! assembled, so a bad query fails at startup rather than mid-session.

use std::fmt;
use std::sync::Arc;

use jaq_interpret::{Ctx, Filter, FilterT, ParseCtx, RcIter, Val};

use crate::{Error, Result};

/// Query applied to event-stream messages when none is configured.
pub const DEFAULT_EVENT_QUERY: &str = r#".Events[] | {"1:Index": .Index, "2:Topic": .Topic, "3:Type": .Type, "4:Name": (.Payload | (.Job // .Allocation // .Deployment // .Evaluation // {}) | (.JobID // .ID)), "5:AllocID": (.Payload | (.Allocation // .Deployment // .Evaluation // {}) | .ID)}"#;

/// A jq query known to parse and compile.
///
/// Compiled filters hold reference-counted values and are not `Send`, so only
/// the validated source is kept and the filter is rebuilt for each application.
#[derive(Clone, PartialEq, Eq)]
pub struct EventQuery {
    source: Arc<str>,
}

impl EventQuery {
    /// Parse and compile `source`, reporting the underlying error on failure.
    pub fn compile(source: &str) -> Result<Self> {
        compile_filter(source)?;
        Ok(Self {
            source: Arc::from(source),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run the query over one event-stream message.
    pub fn apply(&self, input: serde_json::Value) -> Result<Vec<serde_json::Value>> {
        let filter = compile_filter(&self.source)?;
        let inputs = RcIter::new(core::iter::empty());
        filter
            .run((Ctx::new([], &inputs), Val::from(input)))
            .map(|output| {
                output
                    .map(serde_json::Value::from)
                    .map_err(|e| Error::Other(format!("error running event jq query: {}", e)))
            })
            .collect()
    }
}

impl fmt::Debug for EventQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventQuery").field(&self.source).finish()
    }
}

fn compile_filter(source: &str) -> Result<Filter> {
    let (main, errs) = jaq_parse::parse(source, jaq_parse::main());
    if let Some(err) = errs.first() {
        return Err(Error::QueryCompileFailure {
            stage: "parsing",
            message: err.to_string(),
        });
    }
    let main = main.ok_or_else(|| Error::QueryCompileFailure {
        stage: "parsing",
        message: "empty query".to_string(),
    })?;

    let mut defs = ParseCtx::new(Vec::new());
    defs.insert_natives(jaq_core::core());
    defs.insert_defs(jaq_std::std());
    let filter = defs.compile(main);
    if let Some(err) = defs.errs.first() {
        return Err(Error::QueryCompileFailure {
            stage: "compiling",
            message: err.0.to_string(),
        });
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_query_compiles() {
        let query = EventQuery::compile(DEFAULT_EVENT_QUERY).unwrap();
        assert_eq!(query.source(), DEFAULT_EVENT_QUERY);
    }

    #[test]
    fn test_parse_failure_reports_stage() {
        let err = EventQuery::compile(".Events[").unwrap_err();
        assert!(matches!(
            err,
            Error::QueryCompileFailure {
                stage: "parsing",
                ..
            }
        ));
        assert!(err.to_string().starts_with("error parsing event jq query"));
    }

    #[test]
    fn test_compile_failure_on_undefined_function() {
        let err = EventQuery::compile("not_a_real_filter(1)").unwrap_err();
        assert!(matches!(
            err,
            Error::QueryCompileFailure {
                stage: "compiling",
                ..
            }
        ));
    }

    #[test]
    fn test_apply_default_query() {
        let query = EventQuery::compile(DEFAULT_EVENT_QUERY).unwrap();
        let message = json!({
            "Index": 7,
            "Events": [{
                "Index": 7,
                "Topic": "Job",
                "Type": "JobRegistered",
                "Payload": {"Job": {"ID": "web"}}
            }]
        });

        let out = query.apply(message).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["2:Topic"], json!("Job"));
        assert_eq!(out[0]["4:Name"], json!("web"));
        assert_eq!(out[0]["5:AllocID"], json!(null));
    }

    fn default_row(topic: &str, payload: serde_json::Value) -> serde_json::Value {
        let query = EventQuery::compile(DEFAULT_EVENT_QUERY).unwrap();
        let message = json!({
            "Index": 9,
            "Events": [{"Index": 9, "Topic": topic, "Type": "Updated", "Payload": payload}]
        });
        let mut out = query.apply(message).unwrap();
        assert_eq!(out.len(), 1);
        out.remove(0)
    }

    #[test]
    fn test_default_query_allocation_event() {
        let row = default_row("Allocation", json!({"Allocation": {"ID": "a-1", "JobID": "web"}}));
        assert_eq!(row["4:Name"], json!("web"));
        assert_eq!(row["5:AllocID"], json!("a-1"));
    }

    #[test]
    fn test_default_query_deployment_event() {
        let row = default_row("Deployment", json!({"Deployment": {"ID": "d-1", "JobID": "api"}}));
        assert_eq!(row["4:Name"], json!("api"));
        assert_eq!(row["5:AllocID"], json!("d-1"));
    }

    #[test]
    fn test_default_query_evaluation_event() {
        let row = default_row("Evaluation", json!({"Evaluation": {"ID": "e-1", "JobID": "batch"}}));
        assert_eq!(row["4:Name"], json!("batch"));
        assert_eq!(row["5:AllocID"], json!("e-1"));
    }

    #[test]
    fn test_default_query_unrecognized_payload() {
        let row = default_row("Node", json!({"Node": {"ID": "n-1"}}));
        assert_eq!(row["2:Topic"], json!("Node"));
        assert_eq!(row["4:Name"], json!(null));
        assert_eq!(row["5:AllocID"], json!(null));
    }

    #[test]
    fn test_apply_uses_std_library() {
        let query = EventQuery::compile("[.[] | select(. > 1)]").unwrap();
        let out = query.apply(json!([1, 2, 3])).unwrap();
        assert_eq!(out, vec![json!([2, 3])]);
    }
}
