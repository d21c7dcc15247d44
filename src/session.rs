// Session state machine. The application is always in exactly one of these
// states; the menu shown to the user is chosen from it, and menu actions
// move between states only by recording an `Event`.

use crate::values::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub token: Token,
    pub role: Role,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated(Account),
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SignedIn(Account),
    SignedOut,
    Quit,
}

impl Session {
    /// Next state after `event`. `Closed` is final.
    pub fn apply(self, event: Event) -> Session {
        match (self, event) {
            (Session::Closed, _) | (_, Event::Quit) => Session::Closed,
            (_, Event::SignedIn(account)) => Session::Authenticated(account),
            (_, Event::SignedOut) => Session::Anonymous,
        }
    }

    pub fn account(&self) -> Option<&Account> {
        match self {
            Session::Authenticated(account) => Some(account),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Session::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(role: Role) -> Account {
        Account {
            token: Token::new("a".repeat(40)).unwrap(),
            role,
            username: "domenico".into(),
        }
    }

    #[test]
    fn sign_in_and_out() {
        let session = Session::Anonymous.apply(Event::SignedIn(account(Role::User)));
        assert_eq!(session.account().map(|a| a.role), Some(Role::User));
        assert_eq!(session.apply(Event::SignedOut), Session::Anonymous);
    }

    #[test]
    fn quit_closes_from_any_state() {
        assert!(Session::Anonymous.apply(Event::Quit).is_closed());
        assert!(Session::Authenticated(account(Role::Admin))
            .apply(Event::Quit)
            .is_closed());
    }

    #[test]
    fn closed_is_final() {
        let session = Session::Closed.apply(Event::SignedIn(account(Role::Admin)));
        assert!(session.is_closed());
        assert!(session.apply(Event::SignedOut).is_closed());
    }

    #[test]
    fn signing_out_when_anonymous_stays_anonymous() {
        assert_eq!(Session::Anonymous.apply(Event::SignedOut), Session::Anonymous);
        assert_eq!(Session::Anonymous.account(), None);
    }
}
