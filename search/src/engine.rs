//! Search orchestration: parse, resolve, compile, conjoin, hand off to the
//! store. Per-token failures are collected and never abort the query.

use crate::compile::{compile, Compiled, Predicate, SortKey};
use crate::config::{EmptyQueryPolicy, SearchConfig};
use crate::errors::{SearchError, SearchFailure};
use crate::explain::{explain, Localizer};
use crate::model::{Model, ModelRegistry};
use crate::parser::parse_query;
use crate::resolve::{resolve, ResolvedArgument};
use crate::store::{CardStore, PageRequest, PageResult};
use crate::types::{Operator, ParsedToken, Qualifier, Span, TokenValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Pipeline stage a token reached, or failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Parsing,
    Resolving,
    Compiling,
    Executing,
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// 1-based, defaults to the first page
    pub page: Option<u32>,
    #[serde(alias = "page_size")]
    pub page_size: Option<u32>,
}

/// One token of the query as the user typed it, with its resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandView {
    pub text: String,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<Qualifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TokenValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_fields: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<Stage>,
}

impl CommandView {
    fn from_token(query: &str, token: &ParsedToken) -> Self {
        Self {
            text: slice(query, token.span),
            span: token.span,
            field: None,
            modifier: token.modifier.clone(),
            operator: token.operator,
            qualifiers: token.qualifiers.clone(),
            value: Some(token.value.clone()),
            pattern_fields: None,
            explanation: None,
            failed_at: None,
        }
    }

    fn resolved(mut self, arg: &ResolvedArgument<'_>, explanation: Option<String>) -> Self {
        self.field = Some(arg.command.id().to_string());
        self.modifier = arg.modifier.map(|m| m.name.clone());
        self.operator = Some(arg.operator);
        self.pattern_fields = arg.pattern_fields.clone();
        self.explanation = explanation;
        self
    }

    fn failed(mut self, stage: Stage) -> Self {
        self.failed_at = Some(stage);
        self
    }
}

/// Everything known about a query before it reaches the store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPlan {
    pub text: String,
    pub commands: Vec<CommandView>,
    pub errors: Vec<SearchError>,
    /// `None` when nothing usable was typed and the policy is `no-predicates`
    pub predicate: Option<Predicate>,
    pub sort: Option<SortKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub text: String,
    pub commands: Vec<CommandView>,
    pub errors: Vec<SearchError>,
    pub result: Option<PageResult>,
}

#[derive(Clone)]
pub struct SearchEngine {
    registry: Arc<ModelRegistry>,
    store: Arc<dyn CardStore>,
    localizer: Arc<dyn Localizer>,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(
        registry: Arc<ModelRegistry>,
        store: Arc<dyn CardStore>,
        localizer: Arc<dyn Localizer>,
        config: SearchConfig,
    ) -> Self {
        Self {
            registry,
            store,
            localizer,
            config,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn model(&self, model_id: &str) -> Result<&Model, SearchFailure> {
        self.registry
            .get(model_id)
            .ok_or_else(|| SearchFailure::UnknownModel(model_id.to_string()))
    }

    /// Runs every pure stage of the pipeline
    pub fn plan(&self, model_id: &str, text: &str) -> Result<QueryPlan, SearchFailure> {
        let model = self.model(model_id)?;
        let mut commands = Vec::new();
        let mut errors = Vec::new();
        let mut filters = Vec::new();
        let mut sort = None;

        for parsed in parse_query(text) {
            let token = match parsed {
                Ok(token) => token,
                Err(err) => {
                    warn!(model = model_id, error = %err, "Failed to parse token");
                    commands.push(syntax_view(text, &err));
                    errors.push(err);
                    continue;
                }
            };
            debug!(model = model_id, token = ?token, "Parsed token");
            let view = CommandView::from_token(text, &token);

            let arg = match resolve(model, &token) {
                Ok(arg) => arg,
                Err(err) => {
                    warn!(model = model_id, error = %err, "Failed to resolve token");
                    commands.push(view.failed(Stage::Resolving));
                    errors.push(err);
                    continue;
                }
            };
            let view = view.resolved(&arg, explain(&arg, self.localizer.as_ref()));

            match compile(&arg) {
                Ok(Compiled::Filter(predicate)) => {
                    debug!(command = arg.command.id(), predicate = ?predicate, "Compiled token");
                    filters.push(predicate);
                    commands.push(view);
                }
                Ok(Compiled::Sort(_)) if sort.is_some() => {
                    let err = SearchError::invalid(
                        arg.command.id(),
                        arg.value.as_str(),
                        "only one sort order is allowed",
                    );
                    warn!(model = model_id, error = %err, "Ignoring extra sort token");
                    commands.push(view.failed(Stage::Compiling));
                    errors.push(err);
                }
                Ok(Compiled::Sort(key)) => {
                    debug!(command = arg.command.id(), sort = ?key, "Compiled sort");
                    sort = Some(key);
                    commands.push(view);
                }
                Err(err) => {
                    warn!(model = model_id, error = %err, "Failed to compile token");
                    commands.push(view.failed(Stage::Compiling));
                    errors.push(err);
                }
            }
        }

        let predicate = match (filters.is_empty(), self.config.empty_query) {
            (true, EmptyQueryPolicy::MatchAll) => Some(Predicate::All),
            (true, EmptyQueryPolicy::NoPredicates) => None,
            (false, _) => Some(Predicate::and(filters)),
        };

        Ok(QueryPlan {
            text: text.to_string(),
            commands,
            errors,
            predicate,
            sort,
        })
    }

    pub async fn search(
        &self,
        model_id: &str,
        text: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, SearchFailure> {
        let plan = self.plan(model_id, text)?;
        let page = PageRequest {
            page: options.page.unwrap_or(1).max(1),
            page_size: options
                .page_size
                .unwrap_or(self.config.default_page_size)
                .clamp(1, self.config.max_page_size.max(1)),
            sort: plan.sort.clone(),
        };

        let result = match &plan.predicate {
            Some(predicate) => {
                debug!(
                    model = model_id,
                    stage = ?Stage::Executing,
                    page = page.page,
                    page_size = page.page_size,
                    "Executing query"
                );
                let result = self
                    .store
                    .fetch(model_id, predicate, &page)
                    .await
                    .map_err(|e| {
                        error!(model = model_id, error = ?e, "Store failed");
                        SearchFailure::StoreUnavailable(format!("{:#}", e))
                    })?;
                debug!(
                    model = model_id,
                    stage = ?Stage::Done,
                    total = result.total,
                    elapsed_ms = result.elapsed_ms,
                    "Query done"
                );
                result
            }
            None => PageResult::default(),
        };

        Ok(SearchResponse {
            text: plan.text,
            commands: plan.commands,
            errors: plan.errors,
            result: Some(result),
        })
    }

    /// Explanation of a single command such as `t:dragon`. `None` when the
    /// command does not resolve or is silent.
    pub fn explain(&self, model_id: &str, command: &str) -> Result<Option<String>, SearchFailure> {
        let model = self.model(model_id)?;
        let Some(Ok(token)) = parse_query(command).into_iter().next() else {
            return Ok(None);
        };
        Ok(resolve(model, &token)
            .ok()
            .and_then(|arg| explain(&arg, self.localizer.as_ref())))
    }
}

fn syntax_view(query: &str, err: &SearchError) -> CommandView {
    let span = match err {
        SearchError::SyntaxError { start, end, .. } => Span::new(*start, *end),
        _ => Span::default(),
    };
    CommandView {
        text: slice(query, span),
        span,
        field: None,
        modifier: None,
        operator: None,
        qualifiers: Vec::new(),
        value: None,
        pattern_fields: None,
        explanation: None,
        failed_at: Some(Stage::Parsing),
    }
}

/// Characters `span.start..span.end` of the query
fn slice(query: &str, span: Span) -> String {
    query
        .chars()
        .skip(span.start)
        .take(span.end.saturating_sub(span.start))
        .collect()
}
