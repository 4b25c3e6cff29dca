//! The signed-in user's websites with summary stats.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use client::query;
use client::types::{ListParams, Website};
use client::Route;
use serde::Serialize;

use super::{PageContext, or_dash};
use crate::CliError;

const PAGE_SIZE: u32 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct DashboardStats {
    pub total: usize,
    pub published: usize,
    pub draft: usize,
    pub total_views: u64,
}

impl DashboardStats {
    pub(crate) fn from_sites(sites: &[Website]) -> Self {
        let with_status = |status: &str| sites.iter().filter(|s| s.status.as_deref() == Some(status)).count();
        Self {
            total: sites.len(),
            published: with_status("published"),
            draft: with_status("draft"),
            total_views: sites.iter().map(|s| s.view_count).sum(),
        }
    }
}

#[derive(Serialize)]
struct DashboardView {
    stats: DashboardStats,
    websites: Vec<Website>,
}

pub(crate) async fn show(ctx: &PageContext) -> Result<(), CliError> {
    let scope = ctx.open_protected(Route::Dashboard).await?;
    let params = ListParams { size: Some(PAGE_SIZE), ..ListParams::default() };
    let page = query::fetch(|| ctx.client.api.websites.list(&params))
        .await
        .map_err(|e| ctx.failed(e, "Could not load your websites", None))?;
    PageContext::still_on(&scope)?;

    let view = DashboardView { stats: DashboardStats::from_sites(&page.items), websites: page.items };
    ctx.render(&view, |v| {
        let s = v.stats;
        let mut lines = vec![format!(
            "{} sites  {} published  {} drafts  {} views",
            s.total, s.published, s.draft, s.total_views
        )];
        if v.websites.is_empty() {
            lines.push("No websites yet. Create one with `sitegen site create`.".to_owned());
        }
        lines.extend(v.websites.iter().map(site_line));
        lines.join("\n")
    })
}

pub(crate) fn site_line(site: &Website) -> String {
    let hosting = if site.is_hosted { or_dash(site.hosting_url.as_deref()) } else { "not deployed" };
    format!("{:<12} {:<28} {:<10} {:>6} views  {}", site.id, site.name, site.status_label(), site.view_count, hosting)
}
