// UI layer: the Fiordispino application on top of the menu engine.
//
// There is one menu per session state. The loop in `run` shows the menu of
// the current state; actions record an `Event` on the context and the loop
// applies it once the menu returns.

use std::io;
use std::mem;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{ApiError, Catalog};
use crate::config::Config;
use crate::console::Console;
use crate::interact::{self, PromptError};
use crate::menu::{Entry, Menu, MenuBuilder};
use crate::session::{Event, Role, Session};
use crate::token_store::TokenStore;
use crate::values::{Description, Selection, Token};

mod account;
mod catalog;
mod listing;
mod lists;

pub const TITLE: &str = "Fiordispino App";
pub const GOODBYE: &str = "Goodbye!";
pub const CANCELLED: &str = "Cancelled!";
pub const INDEX_PROMPT: &str = "Index (0 to cancel)";
pub const NOTHING_TO_CHOOSE: &str = "There is nothing to choose from";

/// Knobs of the application that come from the command line.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where the session key is remembered; `None` keeps nothing on disk.
    pub store: Option<TokenStore>,
    /// Box art uploaded when the admin leaves the path empty.
    pub box_art: PathBuf,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Settings {
            store: config.token_store(),
            box_art: config.box_art.clone(),
        }
    }
}

/// Everything a menu action can touch: the terminal, the catalog service
/// and the session.
pub struct Context<C, A> {
    console: C,
    catalog: A,
    settings: Settings,
    session: Session,
    pending: Option<Event>,
}

impl<C: Console, A: Catalog> Context<C, A> {
    pub fn new(console: C, catalog: A, settings: Settings) -> Self {
        Self {
            console,
            catalog,
            settings,
            session: Session::Anonymous,
            pending: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn catalog(&self) -> &A {
        &self.catalog
    }

    /// Event applied when the running menu returns. A later event replaces
    /// an earlier one.
    fn record(&mut self, event: Event) {
        self.pending = Some(event);
    }

    fn apply_pending(&mut self) {
        if let Some(event) = self.pending.take() {
            let session = mem::replace(&mut self.session, Session::Closed);
            self.session = session.apply(event);
            tracing::info!(session = state_name(&self.session), "session changed");
        }
    }

    /// Session key of the signed-in user.
    fn token(&self) -> Result<Token> {
        match self.session.account() {
            Some(account) => Ok(account.token.clone()),
            None => anyhow::bail!("this action needs a signed-in user"),
        }
    }

    fn print<I>(&mut self, lines: I) -> io::Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        for line in lines {
            self.console.say(&line)?;
        }
        Ok(())
    }

    /// Ask for a one-based index into a listing of `len` items. `None` when
    /// the user cancels or there is nothing to pick.
    fn pick(&mut self, len: usize) -> Result<Option<usize>> {
        if len == 0 {
            self.say(NOTHING_TO_CHOOSE)?;
            return Ok(None);
        }
        match interact::read(self, INDEX_PROMPT, |raw: &str| Selection::parse(raw, len))? {
            Selection::Cancel => {
                self.say(CANCELLED)?;
                Ok(None)
            }
            Selection::Item(i) => Ok(Some(i)),
        }
    }
}

impl<C: Console, A> Console for Context<C, A> {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.console.read_line(prompt)
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        self.console.read_secret(prompt)
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        self.console.say(line)
    }
}

fn state_name(session: &Session) -> &'static str {
    match session.account().map(|a| a.role) {
        Some(Role::Admin) => "admin",
        Some(Role::User) => "user",
        None if session.is_closed() => "closed",
        None => "anonymous",
    }
}

/// Run the application until the user exits or the input ends.
pub fn run<C, A>(ctx: &mut Context<C, A>) -> Result<()>
where
    C: Console + 'static,
    A: Catalog + 'static,
{
    let screens = Screens::build()?;
    account::resume(ctx)?;

    loop {
        let menu = match ctx.session() {
            Session::Anonymous => &screens.anonymous,
            Session::Authenticated(account) if account.role == Role::Admin => &screens.admin,
            Session::Authenticated(_) => &screens.user,
            Session::Closed => return Ok(()),
        };
        if let Err(err) = menu.run(ctx) {
            if err.downcast_ref::<PromptError>().is_some_and(PromptError::is_closed) {
                tracing::info!("input closed, leaving");
                return Ok(());
            }
            return Err(err);
        }
        ctx.apply_pending();
    }
}

type Flow<C, A> = fn(&mut Context<C, A>) -> Result<()>;

struct Screens<C, A> {
    anonymous: Menu<Context<C, A>>,
    user: Menu<Context<C, A>>,
    admin: Menu<Context<C, A>>,
}

impl<C, A> Screens<C, A>
where
    C: Console + 'static,
    A: Catalog + 'static,
{
    fn build() -> Result<Self> {
        Ok(Self {
            anonymous: anonymous_menu()?,
            user: user_menu()?,
            admin: admin_menu()?,
        })
    }
}

/// An entry running `flow`. Failures of the catalog service are shown to
/// the user and the menu goes on.
fn entry<C, A>(key: &str, label: &str, flow: Flow<C, A>) -> Result<Entry<Context<C, A>>>
where
    C: Console + 'static,
    A: Catalog + 'static,
{
    Ok(Entry::create(key, label)?.on_selected(move |ctx: &mut Context<C, A>| guarded(ctx, flow)))
}

fn guarded<C: Console, A: Catalog>(ctx: &mut Context<C, A>, flow: Flow<C, A>) -> Result<()> {
    match flow(ctx) {
        Err(err) if err.downcast_ref::<ApiError>().is_some() => {
            tracing::debug!(error = %format!("{err:#}"), "action failed");
            ctx.say(&err.to_string())?;
            Ok(())
        }
        other => other,
    }
}

fn signed_in_banner<C: Console, A>(ctx: &mut Context<C, A>) -> Result<()> {
    let banner = ctx
        .session
        .account()
        .map(|account| format!("Signed in as {}", account.username));
    if let Some(banner) = banner {
        ctx.say(&banner)?;
    }
    Ok(())
}

fn anonymous_menu<C, A>() -> Result<Menu<Context<C, A>>>
where
    C: Console + 'static,
    A: Catalog + 'static,
{
    let entries = [
        entry("1", "Login", account::login)?.exit(),
        entry("2", "Register", account::register)?.exit(),
        entry("3", "Show Games", catalog::show_games)?,
        entry("4", "Show Genres", catalog::show_genres)?,
        entry("0", "Exit", account::quit)?.exit(),
    ];
    let menu = MenuBuilder::new(Description::new(TITLE)?)
        .with_entries(entries)?
        .build()?;
    Ok(menu)
}

fn user_menu<C, A>() -> Result<Menu<Context<C, A>>>
where
    C: Console + 'static,
    A: Catalog + 'static,
{
    let entries = [
        entry("1", "Show Games", catalog::show_games)?,
        entry("2", "Show Genres", catalog::show_genres)?,
        entry("3", "Show games to play", lists::show_to_play)?,
        entry("4", "Show games played", lists::show_played)?,
        entry("5", "Add game to games to play", lists::add_to_play)?,
        entry("6", "Add game to games played", lists::add_played)?,
        entry("7", "Remove game from games to play", lists::remove_to_play)?,
        entry("8", "Remove game from games played", lists::remove_played)?,
        entry(
            "9",
            "Move game from games to play to games played",
            lists::move_to_played,
        )?,
        entry("10", "Logout", account::logout)?.exit(),
        entry("0", "Exit", account::quit)?.exit(),
    ];
    let menu = MenuBuilder::new(Description::new(TITLE)?)
        .auto_select(signed_in_banner)
        .with_entries(entries)?
        .build()?;
    Ok(menu)
}

fn admin_menu<C, A>() -> Result<Menu<Context<C, A>>>
where
    C: Console + 'static,
    A: Catalog + 'static,
{
    let entries = [
        entry("1", "Show Games", catalog::show_games)?,
        entry("2", "Show Genres", catalog::show_genres)?,
        entry("3", "Add game", catalog::add_game)?,
        entry("4", "Add genre", catalog::add_genre)?,
        entry("5", "Remove game", catalog::remove_game)?,
        entry("6", "Remove genre", catalog::remove_genre)?,
        entry("7", "Ban user", catalog::ban_user)?,
        entry("8", "Logout", account::logout)?.exit(),
        entry("0", "Exit", account::quit)?.exit(),
    ];
    let menu = MenuBuilder::new(Description::new(TITLE)?)
        .auto_select(signed_in_banner)
        .with_entries(entries)?
        .build()?;
    Ok(menu)
}

/// Show a spinner on stderr while `call` runs.
fn busy<T>(message: &'static str, call: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = call();
    spinner.finish_and_clear();
    outcome
}
