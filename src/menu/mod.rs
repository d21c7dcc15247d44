// Menu engine: a titled list of keyed entries shown in a loop until the
// user picks an exit entry.
//
// A `Menu` can only be obtained from `MenuBuilder::build`, which checks that
// the keys are unique and that there is a way out. `build` consumes the
// builder, so a published menu can never be changed again.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::console::Console;
use crate::interact;
use crate::values::{Description, Key};

mod entry;

pub use entry::{Action, Entry, EntryError};

/// Printed when the typed line is not the key of any entry.
pub const INVALID_KEY: &str = "Invalid key, please try again";

/// Prompt shown when waiting for a selection.
pub const SELECTION_PROMPT: &str = "? ";

/// Wiring mistakes detected while assembling a menu.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("menu already has an entry with key '{0}'")]
    DuplicateKey(Key),

    #[error("menu '{0}' has no exit entry")]
    NoExit(Description),
}

/// Collects the entries of a menu. The only way to create a [`Menu`].
///
/// ```
/// use fiordispino_cli::console::{Console, ScriptedConsole};
/// use fiordispino_cli::menu::{Entry, MenuBuilder};
/// use fiordispino_cli::values::Description;
///
/// let menu = MenuBuilder::new(Description::new("Demo").unwrap())
///     .with_entry(Entry::create("1", "Greet").unwrap().on_selected(|console: &mut ScriptedConsole| {
///         console.say("hi")?;
///         Ok(())
///     }))
///     .unwrap()
///     .with_entry(Entry::create("0", "Exit").unwrap().exit())
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let mut console = ScriptedConsole::new(["1", "0"]);
/// menu.run(&mut console).unwrap();
/// assert_eq!(console.count("hi"), 1);
/// ```
///
/// Building consumes the builder, so it cannot be used to change the menu
/// afterwards:
///
/// ```compile_fail
/// use fiordispino_cli::console::ScriptedConsole;
/// use fiordispino_cli::menu::{Entry, MenuBuilder};
/// use fiordispino_cli::values::Description;
///
/// let builder = MenuBuilder::<ScriptedConsole>::new(Description::new("Demo").unwrap())
///     .with_entry(Entry::create("0", "Exit").unwrap().exit())
///     .unwrap();
/// let menu = builder.build().unwrap();
/// builder.with_entry(Entry::create("1", "Again").unwrap()).unwrap();
/// ```
pub struct MenuBuilder<C> {
    menu: Menu<C>,
}

impl<C> MenuBuilder<C> {
    pub fn new(title: Description) -> Self {
        Self {
            menu: Menu {
                title,
                auto_select: None,
                entries: Vec::new(),
                index: HashMap::new(),
            },
        }
    }

    /// Hook run on every display cycle, between the title and the entries.
    pub fn auto_select<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut C) -> anyhow::Result<()> + 'static,
    {
        self.menu.auto_select = Some(Box::new(hook));
        self
    }

    /// Append `entry`. An entry whose key is already taken is refused; the
    /// error hands the builder back with the first entry still in place.
    pub fn with_entry(mut self, entry: Entry<C>) -> Result<Self, DuplicateEntry<C>> {
        if self.menu.index.contains_key(entry.key()) {
            return Err(DuplicateEntry {
                key: entry.key().clone(),
                builder: self,
            });
        }
        self.menu
            .index
            .insert(entry.key().clone(), self.menu.entries.len());
        self.menu.entries.push(entry);
        Ok(self)
    }

    /// Add every entry of `entries` in order, stopping at the first
    /// duplicate key.
    pub fn with_entries<I>(self, entries: I) -> Result<Self, MenuError>
    where
        I: IntoIterator<Item = Entry<C>>,
    {
        entries
            .into_iter()
            .try_fold(self, |builder, entry| builder.with_entry(entry).map_err(MenuError::from))
    }

    /// Seal the menu. Fails unless at least one entry is an exit entry.
    pub fn build(self) -> Result<Menu<C>, MenuError> {
        if !self.menu.entries.iter().any(Entry::is_exit) {
            return Err(MenuError::NoExit(self.menu.title));
        }
        Ok(self.menu)
    }
}

impl<C> fmt::Debug for MenuBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuBuilder")
            .field("title", &self.menu.title)
            .field("entries", &self.menu.entries)
            .finish_non_exhaustive()
    }
}

/// Returned by [`MenuBuilder::with_entry`] when the key is already taken.
pub struct DuplicateEntry<C> {
    key: Key,
    builder: MenuBuilder<C>,
}

impl<C> DuplicateEntry<C> {
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The builder as it was before the refused entry.
    pub fn into_builder(self) -> MenuBuilder<C> {
        self.builder
    }
}

impl<C> From<DuplicateEntry<C>> for MenuError {
    fn from(err: DuplicateEntry<C>) -> Self {
        MenuError::DuplicateKey(err.key)
    }
}

impl<C> fmt::Debug for DuplicateEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuplicateEntry")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<C> fmt::Display for DuplicateEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "menu already has an entry with key '{}'", self.key)
    }
}

impl<C> std::error::Error for DuplicateEntry<C> {}

/// A sealed menu, ready to run.
pub struct Menu<C> {
    title: Description,
    auto_select: Option<Action<C>>,
    entries: Vec<Entry<C>>,
    index: HashMap<Key, usize>,
}

impl<C> Menu<C> {
    pub fn title(&self) -> &Description {
        &self.title
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[Entry<C>] {
        &self.entries
    }

    pub fn entry(&self, key: &Key) -> Option<&Entry<C>> {
        self.index.get(key).map(|&i| &self.entries[i])
    }
}

impl<C: Console> Menu<C> {
    /// Show the menu and dispatch selections until an exit entry is picked.
    ///
    /// Errors returned by actions, and console failures, end the loop and
    /// are passed to the caller.
    pub fn run(&self, ctx: &mut C) -> anyhow::Result<()> {
        loop {
            self.render(ctx)?;
            let choice = interact::read_once(ctx, SELECTION_PROMPT, |raw: &str| raw.parse::<Key>())?;
            let Some(entry) = choice.ok().and_then(|key| self.entry(&key)) else {
                ctx.say(INVALID_KEY)?;
                continue;
            };
            tracing::debug!(menu = %self.title, key = %entry.key(), "entry selected");
            entry.select(ctx)?;
            if entry.is_exit() {
                return Ok(());
            }
        }
    }

    fn render(&self, ctx: &mut C) -> anyhow::Result<()> {
        let border = "*".repeat(self.title.as_str().chars().count() + 8);
        ctx.say(&border)?;
        ctx.say(&format!("*** {} ***", self.title))?;
        ctx.say(&border)?;
        if let Some(hook) = &self.auto_select {
            hook(ctx)?;
        }
        for entry in &self.entries {
            ctx.say(&format!("{}:\t{}", entry.key(), entry.label()))?;
        }
        Ok(())
    }
}
