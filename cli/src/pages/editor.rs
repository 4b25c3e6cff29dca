//! Website editor: create, edit, generate, export and hosting actions.
//!
//! Hosting actions and export are long-running: each emits a keyed loading
//! notification and then its outcome under the same key.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::future::Future;
use std::path::{Path, PathBuf};

use client::query;
use client::types::{GenerateRequest, MessageResponse, Website, WebsiteDraft};
use client::{ApiError, Navigator, Notification, Route};

use super::{PageContext, or_dash};
use crate::{CliError, SiteFields, SiteSubcommand};

const MAX_SUBDOMAIN_LEN: usize = 63;

/// A long-running action and its notification texts.
struct Action {
    key: &'static str,
    pending: &'static str,
    done: &'static str,
    failed: &'static str,
}

const EXPORT: Action =
    Action { key: "export", pending: "Preparing export...", done: "Website exported!", failed: "Export failed" };
const DEPLOY: Action =
    Action { key: "deploy", pending: "Deploying...", done: "Website deployed!", failed: "Deployment failed" };
const UNDEPLOY: Action = Action {
    key: "undeploy",
    pending: "Removing from hosting...",
    done: "Website removed from hosting",
    failed: "Could not remove the website from hosting",
};
const REDEPLOY: Action =
    Action { key: "redeploy", pending: "Redeploying...", done: "Website redeployed!", failed: "Redeployment failed" };
const SSL: Action =
    Action { key: "ssl", pending: "Configuring SSL...", done: "SSL configured!", failed: "SSL configuration failed" };

pub(crate) async fn run(ctx: &PageContext, command: SiteSubcommand) -> Result<(), CliError> {
    match command {
        SiteSubcommand::Show { website_id } => show(ctx, &website_id).await,
        SiteSubcommand::Create(fields) => create(ctx, fields).await,
        SiteSubcommand::Update { website_id, fields } => update(ctx, &website_id, fields).await,
        SiteSubcommand::Delete { website_id } => delete(ctx, &website_id).await,
        SiteSubcommand::Generate(fields) => generate(ctx, fields).await,
        SiteSubcommand::Export { website_id, output } => export(ctx, &website_id, output).await,
        SiteSubcommand::Deploy { website_id, subdomain } => deploy(ctx, &website_id, subdomain.as_deref()).await,
        SiteSubcommand::Undeploy { website_id } => {
            ctx.open_protected(editor_route(&website_id)).await?;
            let reply = track(ctx, &UNDEPLOY, ctx.client.api.websites.undeploy(&website_id)).await?;
            render_message(ctx, &reply)
        }
        SiteSubcommand::Redeploy { website_id } => {
            ctx.open_protected(editor_route(&website_id)).await?;
            let reply = track(ctx, &REDEPLOY, ctx.client.api.websites.redeploy(&website_id)).await?;
            render_message(ctx, &reply)
        }
        SiteSubcommand::Ssl { website_id } => {
            ctx.open_protected(editor_route(&website_id)).await?;
            let reply = track(ctx, &SSL, ctx.client.api.websites.configure_ssl(&website_id)).await?;
            render_message(ctx, &reply)
        }
    }
}

fn editor_route(website_id: &str) -> Route {
    Route::Editor(Some(website_id.to_owned()))
}

async fn show(ctx: &PageContext, website_id: &str) -> Result<(), CliError> {
    let scope = ctx.open_protected(editor_route(website_id)).await?;
    let site = query::fetch(|| ctx.client.api.websites.get(website_id))
        .await
        .map_err(|e| ctx.failed(e, "Could not load the website", None))?;
    PageContext::still_on(&scope)?;
    ctx.render(&site, render_site)
}

async fn create(ctx: &PageContext, fields: SiteFields) -> Result<(), CliError> {
    ctx.open_protected(Route::Editor(None)).await?;
    let draft = validate_draft(fields, true).map_err(|m| ctx.invalid(m))?;
    let site = ctx
        .client
        .api
        .websites
        .create(&draft)
        .await
        .map_err(|e| ctx.failed(e, "Save failed", None))?;
    ctx.notify(Notification::success("Website created"));
    ctx.client.router.navigate(editor_route(&site.id));
    ctx.render(&site, render_site)
}

async fn update(ctx: &PageContext, website_id: &str, fields: SiteFields) -> Result<(), CliError> {
    ctx.open_protected(editor_route(website_id)).await?;
    let draft = validate_draft(fields, false).map_err(|m| ctx.invalid(m))?;
    let site = ctx
        .client
        .api
        .websites
        .update(website_id, &draft)
        .await
        .map_err(|e| ctx.failed(e, "Save failed", None))?;
    ctx.notify(Notification::success("Website updated"));
    ctx.render(&site, render_site)
}

async fn delete(ctx: &PageContext, website_id: &str) -> Result<(), CliError> {
    ctx.open_protected(Route::Dashboard).await?;
    let reply = ctx
        .client
        .api
        .websites
        .delete(website_id)
        .await
        .map_err(|e| ctx.failed(e, "Delete failed", None))?;
    ctx.notify(Notification::success("Website deleted"));
    render_message(ctx, &reply)
}

async fn generate(ctx: &PageContext, fields: SiteFields) -> Result<(), CliError> {
    ctx.open_protected(Route::Editor(None)).await?;
    let request = validate_generate(fields).map_err(|m| ctx.invalid(m))?;
    let site = ctx
        .client
        .api
        .websites
        .generate(&request)
        .await
        .map_err(|e| ctx.failed(e, "Generation failed", None))?;
    ctx.notify(Notification::success("Website generated!"));
    ctx.client.router.navigate(editor_route(&site.id));
    ctx.render(&site, render_site)
}

async fn export(ctx: &PageContext, website_id: &str, output: Option<PathBuf>) -> Result<(), CliError> {
    let scope = ctx.open_protected(editor_route(website_id)).await?;
    let archive = track(ctx, &EXPORT, ctx.client.api.websites.export(website_id)).await?;
    PageContext::still_on(&scope)?;

    let path = match archive_destination(output, archive.filename.as_deref()) {
        Some(path) => path,
        None => {
            let site = query::fetch(|| ctx.client.api.websites.get(website_id))
                .await
                .map_err(|e| ctx.failed(e, "Could not name the export", None))?;
            PathBuf::from(export_filename(&site))
        }
    };
    write_archive(&path, &archive.bytes).await?;
    tracing::info!(website_id, path = %path.display(), "archive written");
    println!("{}", path.display());
    Ok(())
}

async fn deploy(ctx: &PageContext, website_id: &str, subdomain: Option<&str>) -> Result<(), CliError> {
    ctx.open_protected(editor_route(website_id)).await?;
    let subdomain = match subdomain {
        Some(raw) => Some(validate_subdomain(raw).map_err(|m| ctx.invalid(m))?),
        None => None,
    };
    let reply = track(ctx, &DEPLOY, ctx.client.api.websites.deploy(website_id, subdomain.as_deref())).await?;
    render_message(ctx, &reply)
}

/// Wrap `op` in a keyed loading → outcome notification pair.
async fn track<T, F>(ctx: &PageContext, action: &Action, op: F) -> Result<T, CliError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    ctx.notify(Notification::loading(action.key, action.pending));
    match op.await {
        Ok(value) => {
            ctx.notify(Notification::success(action.done).keyed(action.key));
            Ok(value)
        }
        Err(error) => Err(ctx.failed(error, action.failed, Some(action.key))),
    }
}

fn render_message(ctx: &PageContext, reply: &MessageResponse) -> Result<(), CliError> {
    ctx.render(reply, |r| r.message.clone())
}

fn render_site(site: &Website) -> String {
    let hosting = if site.is_hosted {
        format!("{} (ssl: {})", or_dash(site.hosting_url.as_deref()), if site.ssl_enabled { "on" } else { "off" })
    } else {
        "not deployed".to_owned()
    };
    format!(
        "{}\n  id:          {}\n  status:      {}\n  template:    {}\n  views:       {}\n  hosting:     {}\n  description: {}\n  meta title:  {}",
        site.name,
        site.id,
        site.status_label(),
        or_dash(site.template_id.as_deref()),
        site.view_count,
        hosting,
        or_dash(site.description.as_deref()),
        or_dash(site.meta_title.as_deref()),
    )
}

pub(crate) async fn write_archive(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| CliError::Io { path: parent.to_path_buf(), source })?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| CliError::Io { path: path.to_path_buf(), source })
}

// =============================================================================
// PURE HELPERS
// =============================================================================

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Create requires a name and a template; update requires that a given name
/// is not blank and that something changes.
pub(crate) fn validate_draft(fields: SiteFields, creating: bool) -> Result<WebsiteDraft, &'static str> {
    if fields.name.as_deref().is_some_and(|n| n.trim().is_empty()) || (creating && fields.name.is_none()) {
        return Err("Website name is required");
    }
    let draft = WebsiteDraft {
        name: trimmed(fields.name),
        description: fields.description,
        template_id: trimmed(fields.template_id),
        meta_title: fields.meta_title,
        meta_description: fields.meta_description,
    };
    if creating && draft.template_id.is_none() {
        return Err("Please select a template");
    }
    if draft == WebsiteDraft::default() {
        return Err("Nothing to update");
    }
    Ok(draft)
}

pub(crate) fn validate_generate(fields: SiteFields) -> Result<GenerateRequest, &'static str> {
    match (trimmed(fields.name), trimmed(fields.template_id)) {
        (Some(website_name), Some(template_id)) => Ok(GenerateRequest {
            template_id,
            website_name,
            website_description: trimmed(fields.description),
        }),
        _ => Err("Enter a name and select a template"),
    }
}

/// Lowercase letters, digits and inner hyphens; at most 63 characters.
pub(crate) fn validate_subdomain(raw: &str) -> Result<String, &'static str> {
    let subdomain = raw.trim().to_lowercase();
    let valid = !subdomain.is_empty()
        && subdomain.len() <= MAX_SUBDOMAIN_LEN
        && subdomain.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !subdomain.starts_with('-')
        && !subdomain.ends_with('-');
    if valid { Ok(subdomain) } else { Err("Subdomain may only contain letters, digits and inner hyphens") }
}

/// `--output` wins, then the name the server sent with the archive.
pub(crate) fn archive_destination(output: Option<PathBuf>, server_filename: Option<&str>) -> Option<PathBuf> {
    output.or_else(|| server_filename.map(PathBuf::from))
}

/// `<slug>-export.zip`, or the name lowercased with whitespace runs as `-`.
pub(crate) fn export_filename(site: &Website) -> String {
    let base = match site.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slug.to_owned(),
        None => site.name.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase(),
    };
    let base = base.replace(['/', '\\'], "-");
    let base = if base.is_empty() { "website".to_owned() } else { base };
    format!("{base}-export.zip")
}
