// Menu engine and interaction driver, driven the way an application uses
// them: a context type of its own that is also the console.

use std::io;
use std::str::FromStr;

use fiordispino_cli::console::{Console, ScriptedConsole};
use fiordispino_cli::interact;
use fiordispino_cli::menu::{Entry, MenuBuilder, MenuError, INVALID_KEY};
use fiordispino_cli::values::{Description, Email, Key, Pegi, Rejection};

/// A console plus some application state that actions update.
struct Counter {
    console: ScriptedConsole,
    hits: u32,
}

impl Counter {
    fn new(lines: &[&str]) -> Self {
        Self {
            console: ScriptedConsole::new(lines.iter().copied()),
            hits: 0,
        }
    }
}

impl Console for Counter {
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

fn description(text: &str) -> Description {
    Description::new(text).unwrap()
}

#[test]
fn greeting_then_exit() {
    let menu = MenuBuilder::new(description("Demo"))
        .with_entry(Entry::create("1", "Greet").unwrap().on_selected(|ctx: &mut Counter| {
            ctx.say("hi")?;
            Ok(())
        }))
        .unwrap()
        .with_entry(Entry::create("0", "Exit").unwrap().exit())
        .unwrap()
        .build()
        .unwrap();

    let mut ctx = Counter::new(&["1", "0"]);
    menu.run(&mut ctx).unwrap();
    assert_eq!(ctx.console.count("hi"), 1);
    assert_eq!(ctx.console.count("*** Demo ***"), 2);
}

#[test]
fn actions_update_the_context() {
    let menu = MenuBuilder::new(description("Counter"))
        .with_entry(Entry::create("inc", "Increment").unwrap().on_selected(|ctx: &mut Counter| {
            ctx.hits += 1;
            Ok(())
        }))
        .unwrap()
        .with_entry(Entry::create("q", "Quit").unwrap().exit())
        .unwrap()
        .build()
        .unwrap();

    let mut ctx = Counter::new(&["inc", "inc", "nope", "inc", "q"]);
    menu.run(&mut ctx).unwrap();
    assert_eq!(ctx.hits, 3);
    assert_eq!(ctx.console.count(INVALID_KEY), 1);
}

#[test]
fn exit_action_runs_before_leaving() {
    let menu = MenuBuilder::new(description("Bye"))
        .with_entry(Entry::create("0", "Exit").unwrap().exit().on_selected(|ctx: &mut Counter| {
            ctx.say("Goodbye!")?;
            Ok(())
        }))
        .unwrap()
        .build()
        .unwrap();

    let mut ctx = Counter::new(&["0", "0"]);
    menu.run(&mut ctx).unwrap();
    assert_eq!(ctx.console.count("Goodbye!"), 1);
    assert_eq!(ctx.console.remaining(), 1);
}

#[test]
fn the_same_menu_runs_again() {
    let menu = MenuBuilder::new(description("Again"))
        .with_entry(Entry::create("0", "Exit").unwrap().exit())
        .unwrap()
        .build()
        .unwrap();

    let mut ctx = Counter::new(&["0", "0"]);
    menu.run(&mut ctx).unwrap();
    menu.run(&mut ctx).unwrap();
    assert_eq!(ctx.console.count("*** Again ***"), 2);
}

#[test]
fn builder_errors() {
    let builder = MenuBuilder::<Counter>::new(description("Broken"))
        .with_entry(Entry::create("1", "One").unwrap())
        .unwrap();
    let duplicate = builder
        .with_entry(Entry::create("1", "Other").unwrap())
        .unwrap_err();
    assert_eq!(duplicate.key(), &Key::new("1").unwrap());
    assert_eq!(
        MenuError::from(duplicate),
        MenuError::DuplicateKey(Key::new("1").unwrap())
    );

    let builder = MenuBuilder::<Counter>::new(description("Broken"))
        .with_entry(Entry::create("1", "One").unwrap())
        .unwrap();
    let err = builder.build().err().unwrap();
    assert_eq!(err.to_string(), "menu 'Broken' has no exit entry");
}

#[test]
fn read_asks_until_valid() {
    let mut console = ScriptedConsole::new(["not an email", "anna@example.com"]);
    let email = interact::read(&mut console, "Email", Email::from_str).unwrap();
    assert_eq!(email.to_string(), "anna@example.com");
    assert_eq!(console.prompts(), ["Email: ", "Email: "]);
    assert_eq!(console.output(), ["Invalid email: it should look like name@example.com"]);
}

#[test]
fn read_accepts_custom_constructors() {
    let mut console = ScriptedConsole::new(["7", "12"]);
    let pegi = interact::read(&mut console, "Pegi for teenagers", |raw: &str| {
        let pegi = Pegi::from_str(raw)?;
        if pegi.value() < 12 {
            return Err(Rejection::invalid("Too young"));
        }
        Ok(pegi)
    })
    .unwrap();
    assert_eq!(pegi.to_string(), "PEGI 12");
    assert_eq!(console.count("Too young"), 1);
}
