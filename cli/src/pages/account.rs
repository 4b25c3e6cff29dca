//! Login, registration, logout and the navbar's profile menu.

#[cfg(test)]
#[path = "account_test.rs"]
mod account_test;

use client::types::{LoginRequest, ProfileUpdate, RegisterRequest, UserProfile};
use client::{Navigator, Route};

use super::{PageContext, or_dash};
use crate::{CliError, ProfileArgs, RegisterArgs};

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;
const MIN_PASSWORD_LEN: usize = 8;

pub(crate) async fn login(ctx: &PageContext, email: &str, password: &str) -> Result<(), CliError> {
    ctx.open(Route::Login);
    let request = validate_login(email, password).map_err(|m| ctx.invalid(m))?;
    let user = ctx.client.auth.login(&request).await?;
    ctx.client.router.navigate(Route::Dashboard);
    ctx.render(&user, |u| format!("Signed in as {}", u.display_name()))
}

pub(crate) async fn register(ctx: &PageContext, args: RegisterArgs) -> Result<(), CliError> {
    ctx.open(Route::Register);
    let request = validate_registration(&args).map_err(|m| ctx.invalid(m))?;
    ctx.client.auth.register(&request).await?;
    ctx.client.router.navigate(Route::Login);
    println!("Next: sitegen login --email {}", request.email);
    Ok(())
}

pub(crate) fn logout(ctx: &PageContext) {
    ctx.client.auth.logout();
    ctx.client.router.navigate(Route::Home);
}

pub(crate) async fn show_profile(ctx: &PageContext) -> Result<(), CliError> {
    ctx.open_protected(Route::Dashboard).await?;
    let Some(user) = ctx.client.session().user() else {
        return Err(CliError::LoginRequired);
    };
    ctx.render(&user, render_profile)
}

pub(crate) async fn update_profile(ctx: &PageContext, args: ProfileArgs) -> Result<(), CliError> {
    ctx.open_protected(Route::Dashboard).await?;
    let update = profile_update(args).map_err(|m| ctx.invalid(m))?;
    let user = ctx.client.auth.update_profile(&update).await?;
    ctx.render(&user, render_profile)
}

fn render_profile(user: &UserProfile) -> String {
    let plan = user.extra.get("subscription_plan").and_then(|v| v.as_str());
    format!(
        "{}\n  username: {}\n  email:    {}\n  plan:     {}",
        user.display_name(),
        user.username,
        or_dash(user.email.as_deref()),
        or_dash(plan),
    )
}

// =============================================================================
// VALIDATION
// =============================================================================

fn valid_email(email: &str) -> bool {
    email.split_once('@').is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
}

fn valid_username(username: &str) -> bool {
    USERNAME_LEN.contains(&username.chars().count())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

pub(crate) fn validate_login(email: &str, password: &str) -> Result<LoginRequest, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password");
    }
    if !valid_email(email) {
        return Err("Enter a valid email address");
    }
    Ok(LoginRequest { email: email.to_owned(), password: password.to_owned() })
}

pub(crate) fn validate_registration(args: &RegisterArgs) -> Result<RegisterRequest, &'static str> {
    let email = args.email.trim();
    let username = args.username.trim();
    if !valid_email(email) {
        return Err("Enter a valid email address");
    }
    if !valid_username(username) {
        return Err("Username must be between 3 and 50 characters");
    }
    if args.password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters");
    }
    if args.confirm_password.as_ref().is_some_and(|c| c != &args.password) {
        return Err("Passwords do not match");
    }
    Ok(RegisterRequest {
        email: email.to_owned(),
        username: username.to_owned(),
        full_name: non_blank(args.full_name.clone()),
        password: args.password.clone(),
    })
}

pub(crate) fn profile_update(args: ProfileArgs) -> Result<ProfileUpdate, &'static str> {
    let update = ProfileUpdate {
        email: non_blank(args.email),
        username: non_blank(args.username),
        full_name: non_blank(args.full_name),
        bio: args.bio.map(|b| b.trim().to_owned()),
        avatar_url: non_blank(args.avatar_url),
    };
    if update.is_empty() {
        return Err("Nothing to update");
    }
    if update.email.as_deref().is_some_and(|e| !valid_email(e)) {
        return Err("Enter a valid email address");
    }
    if update.username.as_deref().is_some_and(|u| !valid_username(u)) {
        return Err("Username must be between 3 and 50 characters");
    }
    Ok(update)
}
