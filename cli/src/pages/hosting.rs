//! Deployed sites.

use client::query;
use client::types::HostedSite;
use client::Route;

use super::{PageContext, or_dash};
use crate::CliError;

pub(crate) async fn show(ctx: &PageContext) -> Result<(), CliError> {
    let scope = ctx.open_protected(Route::Dashboard).await?;
    let sites = query::fetch(|| ctx.client.api.hosting.sites())
        .await
        .map_err(|e| ctx.failed(e, "Could not load hosted sites", None))?;
    PageContext::still_on(&scope)?;

    ctx.render(&sites, |sites| {
        if sites.is_empty() {
            return "No hosted sites. Deploy one with `sitegen site deploy <id>`.".to_owned();
        }
        sites.iter().map(hosted_line).collect::<Vec<_>>().join("\n")
    })
}

fn hosted_line(site: &HostedSite) -> String {
    format!(
        "{:<12} {:<28} {:<40} {:<8} {}",
        or_dash(site.website_id.as_deref()),
        or_dash(site.website_name.as_deref()),
        or_dash(site.hosting_url.as_deref()),
        if site.ssl_enabled { "ssl" } else { "no ssl" },
        or_dash(site.status.as_deref()),
    )
}
