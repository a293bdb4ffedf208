//! Project lifecycle orchestration.
//!
//! `ProjectLifecycleManager` composes the store, the session tracker, the
//! resolver, and the name generator into multi-step operation protocols.
//! Every public method returns a structured result value: business
//! failures (confirmation required, not found, in progress, name exists)
//! and store faults alike are converted at the method boundary, so callers
//! never need their own error handling to use the surface.

use std::collections::HashSet;

use windsite_core::config::LayeredConfig;
use windsite_core::models::{Coordinates, Project, ProjectPatch, ProjectStatus};
use windsite_core::{Result, WindsiteError};
use windsite_geo::models::DuplicateGroup;
use windsite_geo::{proximity, validation};
use windsite_store::ports::{DocumentStore, SessionTracker};
use windsite_store::project::ProjectStore;

use crate::filters::SearchFilters;
use crate::messages;
use crate::names::{self, ProjectNameGenerator};
use crate::resolver::ProjectResolver;
use crate::results::{
    ArchiveResult, CreateResult, DashboardEntry, DashboardResult, DeleteResult, DuplicatesResult,
    ImportResult, MergeResult, RenameResult, SearchResult,
};

pub struct ProjectLifecycleManager<D: DocumentStore, T: SessionTracker> {
    store: ProjectStore<D>,
    sessions: T,
    resolver: ProjectResolver,
    names: ProjectNameGenerator,
    duplicate_radius_km: f64,
    suggestion_limit: usize,
}

impl<D: DocumentStore, T: SessionTracker> ProjectLifecycleManager<D, T> {
    pub fn new(store: ProjectStore<D>, sessions: T, config: &LayeredConfig) -> Self {
        Self {
            store,
            sessions,
            resolver: ProjectResolver::new(),
            names: ProjectNameGenerator::new(config),
            duplicate_radius_km: config.duplicate_radius_km.value,
            suggestion_limit: config.suggestion_limit.value,
        }
    }

    pub fn store(&self) -> &ProjectStore<D> {
        &self.store
    }

    pub fn sessions(&self) -> &T {
        &self.sessions
    }

    /// Create a new project under a normalized, unique name.
    ///
    /// With `auto_suffix` a taken name gets a numeric suffix instead of
    /// failing; without it a collision fails with `NameAlreadyExists`.
    pub async fn create_project(
        &self,
        name: &str,
        coordinates: Option<Coordinates>,
        auto_suffix: bool,
        session_id: Option<&str>,
    ) -> CreateResult {
        match self
            .create_inner(name, coordinates, auto_suffix, session_id)
            .await
        {
            Ok(project) => {
                let message = messages::create_success(&project.project_name);
                CreateResult::ok(project, message)
            }
            Err(error) => {
                self.log_failure("create", &error);
                let message = self.failure_message(&error).await;
                CreateResult::failed(&error, message)
            }
        }
    }

    async fn create_inner(
        &self,
        name: &str,
        coordinates: Option<Coordinates>,
        auto_suffix: bool,
        session_id: Option<&str>,
    ) -> Result<Project> {
        let slug = names::normalize(name);
        if slug.is_empty() {
            return Err(WindsiteError::InvalidProjectName {
                name: name.to_string(),
                reason: "name must contain at least one alphanumeric character".to_string(),
            });
        }
        if let Some(center) = coordinates {
            validation::validate_coordinates(center)?;
        }

        let canonical = if auto_suffix {
            self.names.unique_name(&self.store, &slug).await?
        } else {
            if self.store.load(&slug).await?.is_some() {
                return Err(WindsiteError::NameAlreadyExists { name: slug });
            }
            slug
        };

        let mut patch = ProjectPatch::new();
        if let Some(center) = coordinates {
            patch = patch.with_coordinates(center);
        }
        let project = self.store.save(&canonical, &patch).await?;

        self.track_focus(session_id, &canonical).await?;

        Ok(project)
    }

    /// Import an externally produced project record.
    ///
    /// The name is always suffixed past collisions, so an import never
    /// overwrites an existing project.
    pub async fn import_project(
        &self,
        name: &str,
        payload: &ProjectPatch,
        session_id: Option<&str>,
    ) -> ImportResult {
        match self.import_inner(name, payload, session_id).await {
            Ok(project) => {
                let message = messages::import_success(&project.project_name);
                ImportResult::ok(project, message)
            }
            Err(error) => {
                self.log_failure("import", &error);
                let message = self.failure_message(&error).await;
                ImportResult::failed(&error, message)
            }
        }
    }

    async fn import_inner(
        &self,
        name: &str,
        payload: &ProjectPatch,
        session_id: Option<&str>,
    ) -> Result<Project> {
        let slug = names::normalize(name);
        if slug.is_empty() {
            return Err(WindsiteError::InvalidProjectName {
                name: name.to_string(),
                reason: "name must contain at least one alphanumeric character".to_string(),
            });
        }
        if let Some(center) = payload.coordinates {
            validation::validate_coordinates(center)?;
        }

        let canonical = self.names.unique_name(&self.store, &slug).await?;
        self.store.save(&canonical, payload).await?;
        let project = self.store.mark_as_imported(&canonical).await?;

        self.track_focus(session_id, &canonical).await?;

        Ok(project)
    }

    /// Delete a project behind a confirmation gate.
    ///
    /// Protocol order is fixed: confirmation, existence, in-progress
    /// guard, store delete, session cleanup, resolver invalidation. A
    /// session cleanup error after the durable delete still reports the
    /// whole operation as failed.
    pub async fn delete_project(
        &self,
        name: &str,
        skip_confirmation: bool,
        session_id: Option<&str>,
    ) -> DeleteResult {
        match self.delete_inner(name, skip_confirmation, session_id).await {
            Ok(canonical) => {
                let message = messages::delete_success(&canonical);
                DeleteResult::ok(canonical, message)
            }
            Err(error) => {
                self.log_failure("delete", &error);
                let message = self.failure_message(&error).await;
                DeleteResult::failed(name, &error, message)
            }
        }
    }

    async fn delete_inner(
        &self,
        name: &str,
        skip_confirmation: bool,
        session_id: Option<&str>,
    ) -> Result<String> {
        if !skip_confirmation {
            return Err(WindsiteError::ConfirmationRequired {
                prompt: messages::delete_confirmation(name),
            });
        }

        let project = self.resolver.resolve(&self.store, name).await?;
        let canonical = project.project_name;

        if project.status == ProjectStatus::InProgress {
            return Err(WindsiteError::ProjectInProgress { name: canonical });
        }

        self.store.delete(&canonical).await?;

        // The record is already gone at this point; a session cleanup
        // error still fails the overall result.
        if let Some(session_id) = session_id {
            let active = self.sessions.active_project(session_id).await?;
            if active.as_deref() == Some(canonical.as_str()) {
                self.sessions.set_active_project(session_id, "").await?;
            }
        }

        self.resolver.clear_cache();

        Ok(canonical)
    }

    /// Rename a project, writing the copy before removing the original.
    pub async fn rename_project(
        &self,
        old_name: &str,
        new_name: &str,
        session_id: Option<&str>,
    ) -> RenameResult {
        match self.rename_inner(old_name, new_name, session_id).await {
            Ok((old, new)) => {
                let message = messages::rename_success(&old, &new);
                RenameResult::ok(old, new, message)
            }
            Err(error) => {
                self.log_failure("rename", &error);
                let message = self.failure_message(&error).await;
                RenameResult::failed(old_name, names::normalize(new_name), &error, message)
            }
        }
    }

    async fn rename_inner(
        &self,
        old_name: &str,
        new_name: &str,
        session_id: Option<&str>,
    ) -> Result<(String, String)> {
        let project = self.resolver.resolve(&self.store, old_name).await?;
        let old_canonical = project.project_name.clone();

        let new_canonical = names::normalize(new_name);
        if new_canonical.is_empty() {
            return Err(WindsiteError::InvalidProjectName {
                name: new_name.to_string(),
                reason: "name must contain at least one alphanumeric character".to_string(),
            });
        }
        if new_canonical == old_canonical || self.store.load(&new_canonical).await?.is_some() {
            return Err(WindsiteError::NameAlreadyExists { name: new_canonical });
        }

        // Write the copy first. The original is removed only after the
        // new record is durable, so a failure here leaves it intact.
        self.store
            .save(&new_canonical, &ProjectPatch::from_project(&project))
            .await?;
        self.store.delete(&old_canonical).await?;

        if let Some(session_id) = session_id {
            let active = self.sessions.active_project(session_id).await?;
            if active.as_deref() == Some(old_canonical.as_str()) {
                self.track_focus(Some(session_id), &new_canonical).await?;
            }
        }

        self.resolver.clear_cache();

        Ok((old_canonical, new_canonical))
    }

    /// Search is advisory: a store failure yields an empty success result
    /// rather than an error.
    pub async fn search_projects(&self, filters: &SearchFilters) -> SearchResult {
        if let Err(error) = filters.validate() {
            self.log_failure("search", &error);
            return SearchResult::failed(&error, error.to_string());
        }

        let projects = match self.store.list().await {
            Ok(projects) => projects,
            Err(error) => {
                tracing::warn!(error = %error, "Project listing failed, returning empty search result");
                return SearchResult::ok(Vec::new(), messages::search_summary(0));
            }
        };

        let mut hits: Vec<Project> = projects
            .into_iter()
            .filter(|project| filters.matches(project))
            .collect();

        if let Some(center) = filters.coordinates {
            let radius_km = filters.radius_km.unwrap_or(self.duplicate_radius_km);
            match proximity::projects_within_radius(&hits, center, radius_km) {
                Ok(matches) => {
                    hits = matches.into_iter().map(|hit| hit.project).collect();
                }
                Err(error) => {
                    self.log_failure("search", &error);
                    let message = self.failure_message(&error).await;
                    return SearchResult::failed(&error, message);
                }
            }
        }

        let count = hits.len();
        SearchResult::ok(hits, messages::search_summary(count))
    }

    /// Build the dashboard listing: one entry per project with completion,
    /// stage label, formatted location, and duplicate and active marks.
    ///
    /// Duplicate grouping and session lookup are both best-effort here; a
    /// failure in either leaves its marks cleared instead of failing the
    /// dashboard.
    pub async fn generate_dashboard(&self, session_id: Option<&str>) -> DashboardResult {
        let projects = match self.store.list().await {
            Ok(projects) => projects,
            Err(error) => {
                tracing::error!(error = %error, "Project listing failed, dashboard unavailable");
                return DashboardResult::failed(&error, error.to_string());
            }
        };

        if projects.is_empty() {
            return DashboardResult::ok(Vec::new(), messages::no_projects_yet());
        }

        let duplicate_names: HashSet<String> =
            match proximity::group_duplicates(&projects, self.duplicate_radius_km) {
                Ok(groups) => groups
                    .iter()
                    .flat_map(|group| group.member_names())
                    .map(str::to_string)
                    .collect(),
                Err(error) => {
                    tracing::warn!(error = %error, "Duplicate grouping failed, dashboard continues without duplicate marks");
                    HashSet::new()
                }
            };

        let active_project = match session_id {
            Some(session_id) => match self.sessions.active_project(session_id).await {
                Ok(active) => active,
                Err(error) => {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %error,
                        "Session lookup failed, dashboard continues without an active mark"
                    );
                    None
                }
            },
            None => None,
        };

        let entries: Vec<DashboardEntry> = projects
            .iter()
            .map(|project| DashboardEntry {
                project_name: project.project_name.clone(),
                completion_percentage: project.completion_percentage(),
                status_label: project.stage_label().to_string(),
                location: project.location_label(),
                is_duplicate: duplicate_names.contains(&project.project_name),
                is_active: active_project.as_deref() == Some(project.project_name.as_str()),
            })
            .collect();

        DashboardResult::ok(entries, messages::dashboard_summary(projects.len()))
    }

    /// Group projects whose sites sit within `radius_km` of each other,
    /// defaulting to the configured duplicate radius.
    pub async fn find_duplicates(&self, radius_km: Option<f64>) -> DuplicatesResult {
        let radius_km = radius_km.unwrap_or(self.duplicate_radius_km);
        match self.duplicates_inner(radius_km).await {
            Ok(groups) => {
                let message = messages::duplicates_summary(groups.len(), radius_km);
                DuplicatesResult::ok(radius_km, groups, message)
            }
            Err(error) => {
                self.log_failure("duplicates", &error);
                let message = self.failure_message(&error).await;
                DuplicatesResult::failed(radius_km, &error, message)
            }
        }
    }

    async fn duplicates_inner(&self, radius_km: f64) -> Result<Vec<DuplicateGroup>> {
        if !(radius_km > 0.0 && radius_km.is_finite()) {
            return Err(WindsiteError::InvalidSearchRadius { radius_km });
        }

        let projects = self.store.list().await?;
        proximity::group_duplicates(&projects, radius_km)
    }

    /// Merge two projects into one surviving name.
    ///
    /// Without a `keep` choice the call fails with `ConfirmationRequired`
    /// carrying a side-by-side comparison; re-invoking with `keep` set is
    /// the confirmation. The survivor keeps its own values and fills gaps
    /// from the merged project, which is then deleted.
    pub async fn merge_projects(
        &self,
        first: &str,
        second: &str,
        keep: Option<&str>,
        session_id: Option<&str>,
    ) -> MergeResult {
        match self.merge_inner(first, second, keep, session_id).await {
            Ok((kept, merged)) => {
                let message = messages::merge_success(&kept, &merged);
                MergeResult::ok(kept, merged, message)
            }
            Err(error) => {
                self.log_failure("merge", &error);
                let message = self.failure_message(&error).await;
                MergeResult::failed(&error, message)
            }
        }
    }

    async fn merge_inner(
        &self,
        first: &str,
        second: &str,
        keep: Option<&str>,
        session_id: Option<&str>,
    ) -> Result<(String, String)> {
        let first_project = self.resolver.resolve(&self.store, first).await?;
        let second_project = self.resolver.resolve(&self.store, second).await?;

        if first_project.project_name == second_project.project_name {
            return Err(WindsiteError::InvalidProjectName {
                name: first_project.project_name,
                reason: "cannot merge a project with itself".to_string(),
            });
        }

        let keep_canonical = match keep {
            Some(keep) => names::normalize(keep),
            None => {
                return Err(WindsiteError::ConfirmationRequired {
                    prompt: messages::merge_prompt(&first_project, &second_project),
                });
            }
        };

        let (keeper, merged) = if keep_canonical == first_project.project_name {
            (first_project, second_project)
        } else if keep_canonical == second_project.project_name {
            (second_project, first_project)
        } else {
            return Err(WindsiteError::InvalidProjectName {
                name: keep_canonical,
                reason: format!(
                    "keep must be one of '{}' or '{}'",
                    first_project.project_name, second_project.project_name
                ),
            });
        };

        if merged.status == ProjectStatus::InProgress {
            return Err(WindsiteError::ProjectInProgress {
                name: merged.project_name.clone(),
            });
        }

        // Same durability ordering as rename: the combined record is
        // written before the merged name is removed.
        let patch = merge_patch(&keeper, &merged);
        self.store.save(&keeper.project_name, &patch).await?;
        self.store.delete(&merged.project_name).await?;

        if let Some(session_id) = session_id {
            let active = self.sessions.active_project(session_id).await?;
            if active.as_deref() == Some(merged.project_name.as_str()) {
                self.track_focus(Some(session_id), &keeper.project_name).await?;
            }
        }

        self.resolver.clear_cache();

        Ok((keeper.project_name, merged.project_name))
    }

    /// Archive a project behind a confirmation gate.
    pub async fn archive_project(&self, name: &str, skip_confirmation: bool) -> ArchiveResult {
        match self.archive_inner(name, skip_confirmation).await {
            Ok(canonical) => {
                let message = messages::archive_success(&canonical);
                ArchiveResult::ok(canonical, true, message)
            }
            Err(error) => {
                self.log_failure("archive", &error);
                let message = self.failure_message(&error).await;
                ArchiveResult::failed(name, false, &error, message)
            }
        }
    }

    async fn archive_inner(&self, name: &str, skip_confirmation: bool) -> Result<String> {
        if !skip_confirmation {
            return Err(WindsiteError::ConfirmationRequired {
                prompt: messages::archive_confirmation(name),
            });
        }

        let project = self.resolver.resolve(&self.store, name).await?;
        self.store.archive(&project.project_name).await?;
        self.resolver.clear_cache();

        Ok(project.project_name)
    }

    /// Restore an archived project. Not destructive, so no confirmation
    /// gate.
    pub async fn unarchive_project(&self, name: &str) -> ArchiveResult {
        match self.unarchive_inner(name).await {
            Ok(canonical) => {
                let message = messages::unarchive_success(&canonical);
                ArchiveResult::ok(canonical, false, message)
            }
            Err(error) => {
                self.log_failure("unarchive", &error);
                let message = self.failure_message(&error).await;
                ArchiveResult::failed(name, true, &error, message)
            }
        }
    }

    async fn unarchive_inner(&self, name: &str) -> Result<String> {
        let project = self.resolver.resolve(&self.store, name).await?;
        self.store.unarchive(&project.project_name).await?;
        self.resolver.clear_cache();

        Ok(project.project_name)
    }

    // Point the session at a project and record it in history.
    async fn track_focus(&self, session_id: Option<&str>, name: &str) -> Result<()> {
        if let Some(session_id) = session_id {
            self.sessions.set_active_project(session_id, name).await?;
            self.sessions.add_to_history(session_id, name).await?;
        }
        Ok(())
    }

    fn log_failure(&self, operation: &str, error: &WindsiteError) {
        if error.is_business_failure() {
            tracing::debug!(operation = %operation, error = %error, "Operation refused");
        } else {
            tracing::error!(operation = %operation, error = %error, "Operation failed");
        }
    }

    /// Human message for a failure, enriched with suggestions when the
    /// store can provide them.
    async fn failure_message(&self, error: &WindsiteError) -> String {
        match error {
            WindsiteError::ProjectNotFound { name } => {
                let available = self.available_names().await;
                messages::project_not_found(name, &available, self.suggestion_limit)
            }
            WindsiteError::NameAlreadyExists { name } => {
                let suggestion = self.names.unique_name(&self.store, name).await.ok();
                messages::name_already_exists(name, suggestion.as_deref())
            }
            _ => error.to_string(),
        }
    }

    async fn available_names(&self) -> Vec<String> {
        match self.store.list().await {
            Ok(projects) => projects
                .into_iter()
                .map(|project| project.project_name)
                .collect(),
            Err(error) => {
                tracing::warn!(error = %error, "Project listing failed while building a suggestion message");
                Vec::new()
            }
        }
    }
}

/// Build the patch that folds `merged` into `keeper`. Fields the keeper
/// already has are left untouched.
fn merge_patch(keeper: &Project, merged: &Project) -> ProjectPatch {
    let mut patch = ProjectPatch::new();

    if keeper.coordinates.is_none() {
        patch.coordinates = merged.coordinates;
    }
    if keeper.terrain_results.is_none() {
        patch.terrain_results = merged.terrain_results.clone();
    }
    if keeper.layout_results.is_none() {
        patch.layout_results = merged.layout_results.clone();
    }
    if keeper.simulation_results.is_none() {
        patch.simulation_results = merged.simulation_results.clone();
    }
    if keeper.report_results.is_none() {
        patch.report_results = merged.report_results.clone();
    }

    let mut entries = serde_json::Map::new();
    for (key, value) in &merged.metadata.extra {
        if !keeper.metadata.extra.contains_key(key) {
            entries.insert(key.clone(), value.clone());
        }
    }
    if !entries.is_empty() {
        patch.metadata = Some(entries);
    }

    patch
}
