// Signing in and out.

use std::str::FromStr;

use anyhow::Result;

use super::{busy, Context, GOODBYE};
use crate::api::{Catalog, Profile, Registration};
use crate::console::Console;
use crate::interact;
use crate::session::{Account, Event, Role};
use crate::values::{Email, Password, Rejection, Token, Username};

pub const PASSWORD_MISMATCH: &str = "The two passwords do not match. Please try again";
pub const LOGGED_IN: &str = "Logged in successfully!";
pub const LOGGED_IN_ADMIN: &str = "Logged in as admin successfully!";
pub const LOGGED_OUT: &str = "Logged out";

pub fn login<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let email = interact::read(ctx, "Email", Email::from_str)?;
    let password = interact::read_secret(ctx, "Password", Password::from_str)?;
    let token = busy("Logging in...", || ctx.catalog.login(&email, &password))?;
    sign_in(ctx, token)
}

/// A mismatched confirmation starts the whole form over.
pub fn register<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let registration = loop {
        let username = interact::read(ctx, "Username", Username::from_str)?;
        let email = interact::read(ctx, "Email", Email::from_str)?;
        let password = interact::read_secret(ctx, "Password", Password::from_str)?;
        let confirmation = interact::read_secret(ctx, "Confirm password", |raw: &str| {
            Ok::<_, Rejection>(raw.to_string())
        })?;
        if confirmation == password.as_str() {
            break Registration {
                username,
                email,
                password,
            };
        }
        ctx.say(PASSWORD_MISMATCH)?;
    };

    let token = busy("Registering...", || ctx.catalog.register(&registration))?;
    sign_in(ctx, token)
}

fn sign_in<C: Console, A: Catalog>(ctx: &mut Context<C, A>, token: Token) -> Result<()> {
    let profile = ctx.catalog.me(&token)?;
    let role = role_of(&profile);
    remember(ctx, &token);

    ctx.say("")?;
    ctx.say(match role {
        Role::Admin => LOGGED_IN_ADMIN,
        Role::User => LOGGED_IN,
    })?;
    tracing::info!(username = %profile.username, ?role, "signed in");
    ctx.record(Event::SignedIn(Account {
        token,
        role,
        username: profile.username,
    }));
    Ok(())
}

fn role_of(profile: &Profile) -> Role {
    if profile.is_superuser {
        Role::Admin
    } else {
        Role::User
    }
}

fn remember<C, A>(ctx: &Context<C, A>, token: &Token) {
    if let Some(store) = &ctx.settings.store {
        if let Err(err) = store.save(token) {
            tracing::warn!("{err:#}");
        }
    }
}

pub fn logout<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    if let Some(store) = &ctx.settings.store {
        if let Err(err) = store.clear() {
            tracing::warn!("{err:#}");
        }
    }
    ctx.say(LOGGED_OUT)?;
    ctx.record(Event::SignedOut);
    Ok(())
}

pub fn quit<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    ctx.say(GOODBYE)?;
    ctx.record(Event::Quit);
    Ok(())
}

/// Sign in with the remembered session key, if there is one the service
/// still accepts. A key the service refuses is forgotten.
pub fn resume<C: Console, A: Catalog>(ctx: &mut Context<C, A>) -> Result<()> {
    let Some(store) = ctx.settings.store.clone() else {
        return Ok(());
    };
    let token = match store.load() {
        Ok(Some(token)) => token,
        Ok(None) => return Ok(()),
        Err(err) => {
            tracing::warn!("{err:#}");
            return Ok(());
        }
    };

    match busy("Restoring session...", || ctx.catalog.me(&token)) {
        Ok(profile) => {
            let role = role_of(&profile);
            ctx.say(&format!("Welcome back, {}!", profile.username))?;
            tracing::info!(username = %profile.username, ?role, "session restored");
            ctx.record(Event::SignedIn(Account {
                token,
                role,
                username: profile.username,
            }));
            ctx.apply_pending();
        }
        Err(err) if err.is_refusal() => {
            tracing::info!("remembered session key refused, forgetting it");
            if let Err(err) = store.clear() {
                tracing::warn!("{err:#}");
            }
        }
        Err(err) => tracing::warn!("could not restore session: {err}"),
    }
    Ok(())
}
