//! Central formatter for caller-facing operation messages.
//!
//! Every lifecycle operation routes its prompts, confirmations, and
//! summaries through here so wording stays consistent and testable.

use windsite_core::models::Project;

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Not-found message carrying up to `limit` example names, with an
/// "and N more" suffix when the list is longer.
pub fn project_not_found(name: &str, available: &[String], limit: usize) -> String {
    if available.is_empty() {
        return format!("Project '{}' not found.", name);
    }

    let shown: Vec<&str> = available.iter().take(limit).map(String::as_str).collect();
    let mut message = format!(
        "Project '{}' not found. Available projects: {}",
        name,
        shown.join(", ")
    );
    if available.len() > limit {
        message.push_str(&format!(" and {} more", available.len() - limit));
    }
    message.push('.');
    message
}

pub fn name_already_exists(name: &str, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(suggestion) => format!(
            "Project '{}' already exists. Try '{}' instead.",
            name, suggestion
        ),
        None => format!("Project '{}' already exists.", name),
    }
}

pub fn delete_confirmation(name: &str) -> String {
    format!(
        "This will permanently delete project '{}' and all of its results. Re-run with confirmation to proceed.",
        name
    )
}

pub fn delete_success(name: &str) -> String {
    format!("Project '{}' has been deleted.", name)
}

pub fn rename_success(old_name: &str, new_name: &str) -> String {
    format!("Project '{}' has been renamed to '{}'.", old_name, new_name)
}

pub fn archive_confirmation(name: &str) -> String {
    format!(
        "This will archive project '{}' and hide it from active listings. Re-run with confirmation to proceed.",
        name
    )
}

pub fn archive_success(name: &str) -> String {
    format!("Project '{}' has been archived.", name)
}

pub fn unarchive_success(name: &str) -> String {
    format!("Project '{}' has been restored from the archive.", name)
}

/// Side-by-side comparison shown before a merge, asking which name to keep.
pub fn merge_prompt(first: &Project, second: &Project) -> String {
    let mut message = format!(
        "Comparing '{}' and '{}':\n",
        first.project_name, second.project_name
    );
    message.push_str(&merge_comparison_line(first));
    message.push_str(&merge_comparison_line(second));
    message.push_str("Re-run specifying which project name to keep.");
    message
}

fn merge_comparison_line(project: &Project) -> String {
    format!(
        "  {}: {}% complete, {}, location {}\n",
        project.project_name,
        project.completion_percentage(),
        project.stage_label(),
        project.location_label()
    )
}

pub fn merge_success(kept: &str, merged: &str) -> String {
    format!("Project '{}' has been merged into '{}'.", merged, kept)
}

pub fn create_success(name: &str) -> String {
    format!("Project '{}' has been created.", name)
}

pub fn import_success(name: &str) -> String {
    format!("Project '{}' has been imported.", name)
}

pub fn no_projects_yet() -> String {
    "No projects yet. Create your first project to see it here.".to_string()
}

pub fn duplicates_summary(count: usize, radius_km: f64) -> String {
    if count == 0 {
        format!("No duplicate projects within {} km.", radius_km)
    } else {
        format!(
            "Found {} duplicate group{} within {} km.",
            count,
            plural(count),
            radius_km
        )
    }
}

pub fn dashboard_summary(count: usize) -> String {
    format!("Dashboard generated for {} project{}.", count, plural(count))
}

pub fn search_summary(count: usize) -> String {
    format!("Found {} project{}.", count, plural(count))
}
