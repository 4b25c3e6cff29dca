//! Public template catalog.

#[cfg(test)]
#[path = "templates_test.rs"]
mod templates_test;

use std::cmp::Reverse;

use client::query;
use client::types::{ListParams, Page, Template};
use client::Route;

use super::{PageContext, or_dash};
use crate::{CliError, TemplateListArgs};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum SortKey {
    /// Most used first.
    Popular,
    Name,
    /// Server order.
    Unsorted,
}

pub(crate) async fn list(ctx: &PageContext, args: TemplateListArgs) -> Result<(), CliError> {
    let scope = ctx.open(Route::Templates);
    let params = ListParams { page: args.page, size: args.size, category: category_filter(args.category.as_deref()) };
    let page: Page<Template> = query::fetch(|| ctx.client.api.templates.list(&params))
        .await
        .map_err(|e| ctx.failed(e, "Could not load templates", None))?;
    PageContext::still_on(&scope)?;

    let mut items = filter_templates(page.items, args.search.as_deref());
    sort_templates(&mut items, args.sort);
    let shown = Page { items, ..page };
    ctx.render(&shown, |p| {
        if p.items.is_empty() {
            return "No templates match.".to_owned();
        }
        let mut lines: Vec<String> = p.items.iter().map(template_line).collect();
        lines.push(format!("page {} of {} ({} templates)", p.page, p.pages.max(1), p.total));
        lines.join("\n")
    })
}

pub(crate) async fn show(ctx: &PageContext, template_id: &str) -> Result<(), CliError> {
    let scope = ctx.open(Route::Templates);
    let template = query::fetch(|| ctx.client.api.templates.get(template_id))
        .await
        .map_err(|e| ctx.failed(e, "Template not found", None))?;
    PageContext::still_on(&scope)?;

    ctx.render(&template, |t| {
        let tags = t.tags.as_deref().map(|tags| tags.join(", "));
        format!(
            "{}\n  id:       {}\n  category: {}\n  price:    {}\n  used:     {} times\n  tags:     {}\n\n{}",
            t.name,
            t.id,
            or_dash(t.category.as_deref()),
            format_price(t),
            t.usage_count,
            or_dash(tags.as_deref()),
            t.description.as_deref().unwrap_or_default(),
        )
        .trim_end()
        .to_owned()
    })
}

fn template_line(t: &Template) -> String {
    format!(
        "{:<12} {:<28} {:<10} {:>8}  {} uses",
        t.id,
        t.name,
        or_dash(t.category.as_deref()),
        format_price(t),
        t.usage_count
    )
}

/// `all` and blanks mean no filter.
pub(crate) fn category_filter(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
        .map(str::to_lowercase)
}

pub(crate) fn filter_templates(templates: Vec<Template>, search: Option<&str>) -> Vec<Template> {
    let Some(needle) = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()) else {
        return templates;
    };
    templates
        .into_iter()
        .filter(|t| {
            t.name.to_lowercase().contains(&needle)
                || t.description.as_deref().is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect()
}

pub(crate) fn sort_templates(templates: &mut [Template], key: SortKey) {
    match key {
        SortKey::Popular => templates.sort_by_key(|t| Reverse(t.usage_count)),
        SortKey::Name => templates.sort_by_key(|t| t.name.to_lowercase()),
        SortKey::Unsorted => {}
    }
}

/// Prices are in cents.
pub(crate) fn format_price(template: &Template) -> String {
    if !template.is_premium || template.price == 0 {
        return "Free".to_owned();
    }
    format!("${}.{:02}", template.price / 100, template.price % 100)
}
