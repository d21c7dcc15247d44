use std::fmt;

use thiserror::Error;

use crate::values::{Description, DescriptionError, Key, KeyError};

/// What happens when an entry is picked. It receives the context the menu
/// is run with and never sees the menu itself.
pub type Action<C> = Box<dyn Fn(&mut C) -> anyhow::Result<()>>;

/// Raised by [`Entry::create`] when the raw key or label is not valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Label(#[from] DescriptionError),
}

/// One selectable option of a menu.
pub struct Entry<C> {
    key: Key,
    label: Description,
    on_selected: Option<Action<C>>,
    is_exit: bool,
}

impl<C> Entry<C> {
    /// An entry that does nothing when selected and does not leave the menu.
    pub fn new(key: Key, label: Description) -> Self {
        Self {
            key,
            label,
            on_selected: None,
            is_exit: false,
        }
    }

    /// Parse `raw_key` and `raw_label`; the key is checked first.
    pub fn create(raw_key: &str, raw_label: &str) -> Result<Self, EntryError> {
        let key = Key::new(raw_key)?;
        let label = Description::new(raw_label)?;
        Ok(Self::new(key, label))
    }

    pub fn on_selected<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) -> anyhow::Result<()> + 'static,
    {
        self.on_selected = Some(Box::new(action));
        self
    }

    /// Selecting this entry ends the menu's loop after its action ran.
    pub fn exit(mut self) -> Self {
        self.is_exit = true;
        self
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn label(&self) -> &Description {
        &self.label
    }

    pub fn is_exit(&self) -> bool {
        self.is_exit
    }

    pub(crate) fn select(&self, ctx: &mut C) -> anyhow::Result<()> {
        match &self.on_selected {
            Some(action) => action(ctx),
            None => Ok(()),
        }
    }
}

impl<C> fmt::Debug for Entry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("is_exit", &self.is_exit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_parses_key_and_label() {
        let entry = Entry::<()>::create("1", "Show Games").unwrap();
        assert_eq!(entry.key().as_str(), "1");
        assert_eq!(entry.label().as_str(), "Show Games");
        assert!(!entry.is_exit());
    }

    #[test]
    fn create_reports_key_error_first() {
        let err = Entry::<()>::create("", "").unwrap_err();
        assert_eq!(err, EntryError::Key(KeyError));
    }

    #[test]
    fn create_reports_label_error() {
        let err = Entry::<()>::create("1", "Nope!").unwrap_err();
        assert_eq!(err, EntryError::Label(DescriptionError));
    }

    #[test]
    fn default_action_is_a_no_op() {
        let entry = Entry::<u32>::create("1", "Nothing").unwrap();
        let mut ctx = 7;
        entry.select(&mut ctx).unwrap();
        assert_eq!(ctx, 7);
    }

    #[test]
    fn action_receives_the_context() {
        let entry = Entry::<Vec<&'static str>>::create("1", "Greet")
            .unwrap()
            .on_selected(|said| {
                said.push("hi");
                Ok(())
            });
        let mut said = Vec::new();
        entry.select(&mut said).unwrap();
        entry.select(&mut said).unwrap();
        assert_eq!(said, ["hi", "hi"]);
    }

    #[test]
    fn exit_flag() {
        let entry = Entry::<()>::create("0", "Exit").unwrap().exit();
        assert!(entry.is_exit());
        assert!(format!("{entry:?}").contains("is_exit: true"));
    }
}
