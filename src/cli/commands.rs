//! Command implementations for the coursearch CLI.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

use crate::api::{
    CourseState, DiscoveryRequest, OrderBy, SearchApi, SearchRequest, COURSEWARE_CONTENT_DOC_TYPE,
    COURSE_INFO_DOC_TYPE,
};
use crate::catalog::{CatalogVisibility, CourseCatalog, SqliteCourseCatalog};
use crate::classification::StaticClassifier;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::SearchSettings;
use crate::engine::{MemorySearchEngine, SearchEngine, SearchEngineRegistry};
use crate::error::{Result, SearchApiError};
use crate::user::SearchUser;

/// Execute a CLI command.
pub fn execute_command(args: CoursearchArgs) -> Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    match &args.command {
        Command::Search(search_args) => search_courseware(search_args, settings, &args),
        Command::Discover(discover_args) => discover_courses(discover_args, settings, &args),
        Command::InitCatalog(init_args) => init_catalog(init_args, &args),
    }
}

fn load_settings(path: Option<&Path>) -> Result<SearchSettings> {
    let settings = match path {
        Some(path) => {
            log::info!("Loading settings from: {}", path.display());
            SearchSettings::from_file(path)?
        }
        None => SearchSettings::default(),
    };
    settings.apply_env()
}

/// Read documents from a JSON array file or a JSONL file.
pub fn load_documents(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading documents from {}", path.display()))?;
    if content.trim_start().starts_with('[') {
        let documents = serde_json::from_str(&content)
            .with_context(|| format!("parsing document array in {}", path.display()))?;
        return Ok(documents);
    }

    let mut documents = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(doc) => documents.push(doc),
            Err(e) => log::warn!("Skipping document on line {}: {}", line_num + 1, e),
        }
    }
    Ok(documents)
}

fn build_registry(
    settings: &SearchSettings,
    documents: &Path,
    doc_type: &str,
) -> Result<SearchEngineRegistry> {
    let engine = MemorySearchEngine::new(settings.courseware_index_name.clone());
    let docs = load_documents(documents)?;
    log::info!("Indexing {} document(s) as '{}'", docs.len(), doc_type);
    engine.index(doc_type, docs)?;
    Ok(SearchEngineRegistry::new().with_engine(Arc::new(engine)))
}

/// Search courseware content.
fn search_courseware(
    args: &SearchArgs,
    settings: SearchSettings,
    cli_args: &CoursearchArgs,
) -> Result<()> {
    let registry = build_registry(&settings, &args.documents, COURSEWARE_CONTENT_DOC_TYPE)?;
    let catalog: Arc<dyn CourseCatalog> = Arc::new(SqliteCourseCatalog::open_in_memory()?);
    let api = SearchApi::new(settings, registry, catalog);

    let mut request = SearchRequest::new(args.query.clone())
        .size(args.limit)
        .from(args.offset);
    if let Some(course) = &args.course {
        request = request.course_id(course.clone());
    }
    if let Some(username) = &args.user {
        let user = args
            .enrolled
            .iter()
            .fold(SearchUser::new(username.clone()).staff(args.staff), |user, course| {
                user.enrolled_in(course.clone())
            });
        request = request.user(user);
    }

    let results = api.perform_search(&request)?;
    output_search_results("Courseware search", &results, cli_args)
}

/// Search course descriptions.
fn discover_courses(
    args: &DiscoverArgs,
    settings: SearchSettings,
    cli_args: &CoursearchArgs,
) -> Result<()> {
    let registry = build_registry(&settings, &args.documents, COURSE_INFO_DOC_TYPE)?;
    let catalog: Arc<dyn CourseCatalog> = Arc::new(SqliteCourseCatalog::open(&args.catalog)?);
    let mut api = SearchApi::new(settings, registry, catalog);
    if let Some(path) = &args.classifications {
        api = api.with_classifier(Arc::new(StaticClassifier::from_file(path)?));
    }

    let mut request = DiscoveryRequest::new()
        .size(args.limit)
        .from(args.offset)
        .order_by(OrderBy::from_flag(&args.order_by));
    if let Some(query) = &args.query {
        request = request.search_term(query.clone());
    }
    if let Some(year) = &args.year {
        request = request.year(year.clone());
    }
    if let Some(flag) = &args.state {
        match CourseState::from_flag(flag) {
            Some(state) => request = request.state(state),
            None => log::warn!("Ignoring unknown course state '{flag}'"),
        }
    }
    if let Some(classification) = &args.classification {
        request = request.classification(classification.clone());
    }
    for field in &args.fields {
        let (key, value) = parse_key_value(field).ok_or_else(|| {
            SearchApiError::invalid_argument(format!("expected FIELD=VALUE, got '{field}'"))
        })?;
        request = request.field(key, value);
    }

    let results = api.course_discovery_search(&request)?;
    output_search_results("Course discovery", &results, cli_args)
}

#[derive(Debug, Serialize)]
struct CatalogInitResult {
    path: String,
    courses_written: usize,
    total_courses: u64,
}

/// Create the catalog schema and record course visibilities.
fn init_catalog(args: &InitCatalogArgs, cli_args: &CoursearchArgs) -> Result<()> {
    let catalog = SqliteCourseCatalog::open(&args.catalog)?;
    catalog.create_schema()?;

    for course in &args.courses {
        let (course_id, visibility) = parse_key_value(course).ok_or_else(|| {
            SearchApiError::invalid_argument(format!(
                "expected COURSE_ID=VISIBILITY, got '{course}'"
            ))
        })?;
        catalog.upsert_course(course_id, visibility.parse::<CatalogVisibility>()?)?;
    }

    output_result(
        "Catalog updated",
        &CatalogInitResult {
            path: args.catalog.display().to_string(),
            courses_written: args.courses.len(),
            total_courses: catalog.course_count()?,
        },
        cli_args,
    )
}
