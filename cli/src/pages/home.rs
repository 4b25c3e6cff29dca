//! Landing page and API health check.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use std::fmt::Write;

use client::query;
use client::types::{ListParams, MessageResponse, Page, Template};
use client::{Notification, Route};
use serde::Serialize;

use super::PageContext;
use crate::CliError;

const FEATURED_COUNT: u32 = 6;

#[derive(Serialize)]
struct HomeView {
    api: MessageResponse,
    signed_in_as: Option<String>,
    featured: Vec<Template>,
}

pub(crate) async fn show(ctx: &PageContext) -> Result<(), CliError> {
    let scope = ctx.open(Route::Home);
    let api = query::fetch(|| ctx.client.api.health())
        .await
        .map_err(|e| ctx.failed(e, "API unavailable", None))?;

    let params = ListParams { size: Some(FEATURED_COUNT), ..ListParams::default() };
    let templates: Page<Template> = query::fetch(|| ctx.client.api.templates.list(&params))
        .await
        .map_err(|e| ctx.failed(e, "Could not load templates", None))?;
    PageContext::still_on(&scope)?;

    let featured = featured_templates(templates.items, FEATURED_COUNT as usize);
    let view = HomeView {
        api,
        signed_in_as: ctx.client.session().user().map(|u| u.display_name().to_owned()),
        featured,
    };
    ctx.render(&view, render_home)
}

fn render_home(view: &HomeView) -> String {
    let mut out = String::new();
    if let Some(name) = &view.signed_in_as {
        let _ = writeln!(out, "Welcome back, {name}.");
    } else {
        out.push_str("Build a website in minutes. Run `sitegen register` to start.\n");
    }
    let _ = writeln!(out, "API: {}\n\nFeatured templates:", view.api.message);
    for t in &view.featured {
        let _ = writeln!(out, "  {:<12} {}", t.id, t.name);
    }
    out.trim_end().to_owned()
}

pub(crate) async fn health(ctx: &PageContext) -> Result<(), CliError> {
    let status = ctx
        .client
        .api
        .health()
        .await
        .map_err(|e| ctx.failed(e, "API unavailable", None))?;
    if !status.success {
        ctx.notify(Notification::error(&status.message));
    }
    ctx.render(&status, |s| s.message.clone())
}

/// Featured templates first, then the rest in server order.
pub(crate) fn featured_templates(mut templates: Vec<Template>, limit: usize) -> Vec<Template> {
    templates.sort_by_key(|t| !t.is_featured);
    templates.truncate(limit);
    templates
}
