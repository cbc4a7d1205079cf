//! Interactive study shell.
//!
//! The shell is the presentation layer: it renders the login, study, create
//! and manage views as plain text and maps typed commands onto [`App`]
//! actions. Errors from actions are shown as short messages and never end
//! the session; only a failing terminal does.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::app::App;
use crate::error::{Error, Result};

const RULE: &str = "+--------------------------------------------------+";

/// The screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Login,
    Menu,
    Study,
    Create,
    Manage,
    Quit,
}

/// Line-oriented front-end over an [`App`].
#[derive(Debug)]
pub struct Shell<'a, R, W> {
    app: &'a mut App,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    /// Create a shell reading commands from `input` and rendering to `output`.
    pub fn new(app: &'a mut App, input: R, output: W) -> Self {
        Self { app, input, output }
    }

    /// Run until the user quits or input ends.
    ///
    /// Starts at the login view unless the session is already logged in.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self) -> Result<()> {
        let mut view = if self.app.session().logged_in() {
            View::Menu
        } else {
            View::Login
        };

        while view != View::Quit {
            debug!("Entering {:?} view", view);
            view = match view {
                View::Login => self.login_view()?,
                View::Menu => self.menu_view()?,
                View::Study => self.study_view()?,
                View::Create => self.create_view()?,
                View::Manage => self.manage_view()?,
                View::Quit => View::Quit,
            };
        }

        writeln!(self.output, "Goodbye!")?;
        Ok(())
    }

    fn login_view(&mut self) -> Result<View> {
        writeln!(self.output)?;
        writeln!(self.output, "== Login ==")?;
        writeln!(self.output, "Commands: login, signup, quit")?;

        let Some(command) = self.prompt("> ")? else {
            return Ok(View::Quit);
        };

        match command.trim() {
            "login" | "l" => {
                let Some((username, password)) = self.read_credentials("Username", "Password")?
                else {
                    return Ok(View::Quit);
                };
                match self.app.login(&username, &password) {
                    Ok(message) => {
                        writeln!(self.output, "{message}")?;
                        Ok(View::Menu)
                    }
                    Err(e) => {
                        self.show_error(&e)?;
                        Ok(View::Login)
                    }
                }
            }
            "signup" | "s" => {
                let Some((username, password)) =
                    self.read_credentials("Create Username", "Create Password")?
                else {
                    return Ok(View::Quit);
                };
                match self.app.signup(&username, &password) {
                    Ok(message) => writeln!(self.output, "{message}")?,
                    Err(e) => self.show_error(&e)?,
                }
                Ok(View::Login)
            }
            "quit" | "q" => Ok(View::Quit),
            other => {
                writeln!(self.output, "Unknown command: {other}")?;
                Ok(View::Login)
            }
        }
    }

    fn menu_view(&mut self) -> Result<View> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "Logged in as {} | Total Flashcards: {}",
            self.app.session().username().unwrap_or("?"),
            self.app.flashcards().len()
        )?;
        writeln!(
            self.output,
            "[s]tudy  [c]reate  [m]anage  [l]ogout  [q]uit"
        )?;

        let Some(command) = self.prompt("> ")? else {
            return Ok(View::Quit);
        };

        let next = match command.trim() {
            "s" | "study" => View::Study,
            "c" | "create" => View::Create,
            "m" | "manage" => View::Manage,
            "l" | "logout" => {
                self.app.logout();
                writeln!(self.output, "Logged out.")?;
                View::Login
            }
            "q" | "quit" => View::Quit,
            other => {
                writeln!(self.output, "Unknown command: {other}")?;
                View::Menu
            }
        };
        Ok(next)
    }

    fn study_view(&mut self) -> Result<View> {
        loop {
            if self.app.flashcards().is_empty() {
                self.show_error(&Error::EmptyStore)?;
                return Ok(View::Menu);
            }
            self.render_card()?;

            let Some(command) = self.prompt("[n]ext [p]revious [f]lip [b]ack > ")? else {
                return Ok(View::Quit);
            };

            let result = match command.trim() {
                "n" | "next" => self.app.next_card(),
                "p" | "previous" | "prev" => self.app.previous_card(),
                "f" | "flip" => {
                    self.app.flip();
                    Ok(())
                }
                "b" | "back" => return Ok(View::Menu),
                other => {
                    writeln!(self.output, "Unknown command: {other}")?;
                    Ok(())
                }
            };
            if let Err(e) = result {
                self.show_error(&e)?;
            }
        }
    }

    fn render_card(&mut self) -> Result<()> {
        let len = self.app.flashcards().len();
        let navigator = self.app.session().navigator;
        let card = self.app.current_card()?;

        writeln!(self.output)?;
        writeln!(
            self.output,
            "Card {} of {}",
            navigator.position(len).map_or(0, |p| p + 1),
            len
        )?;
        if navigator.is_flipped() {
            writeln!(self.output, "Solution:")?;
            writeln!(self.output, "{}", card.back)?;
        } else {
            writeln!(self.output, "{RULE}")?;
            writeln!(self.output, "  {}", card.front)?;
            writeln!(self.output, "{RULE}")?;
        }
        writeln!(self.output, "Subject: {}", card.subject_label())?;
        Ok(())
    }

    fn create_view(&mut self) -> Result<View> {
        writeln!(self.output)?;
        writeln!(self.output, "== Create Your Own Flashcards ==")?;

        let Some(subject) = self.prompt("Subject: ")? else {
            return Ok(View::Quit);
        };
        let Some(front) = self.prompt("Front: ")? else {
            return Ok(View::Quit);
        };
        let Some(back) = self.prompt("Back: ")? else {
            return Ok(View::Quit);
        };

        match self.app.create_card(&subject, &front, &back) {
            Ok(message) => writeln!(self.output, "{message}")?,
            Err(e) => self.show_error(&e)?,
        }
        Ok(View::Menu)
    }

    fn manage_view(&mut self) -> Result<View> {
        writeln!(self.output)?;
        writeln!(self.output, "== Manage Flashcards ==")?;
        let subjects = self.app.flashcards().subjects().join(", ");
        writeln!(self.output, "Subjects: {subjects}")?;

        let Some(filter) = self.prompt("Filter by subject (Enter for All): ")? else {
            return Ok(View::Quit);
        };
        let filter = filter.trim().to_string();
        let filter = (!filter.is_empty() && filter != "All").then_some(filter);

        loop {
            let listed = self.render_groups(filter.as_deref())?;
            if listed.is_empty() {
                return Ok(View::Menu);
            }

            let Some(choice) = self.prompt("Delete # (Enter to go back): ")? else {
                return Ok(View::Quit);
            };
            let choice = choice.trim();
            if choice.is_empty() {
                return Ok(View::Menu);
            }

            let Some(id) = choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| listed.get(i).copied())
            else {
                writeln!(self.output, "Not a listed card number: {choice}")?;
                continue;
            };

            match self.app.delete_card(id) {
                Ok(card) => writeln!(self.output, "Deleted \"{}\".", card.front)?,
                Err(e) => self.show_error(&e)?,
            }
        }
    }

    /// Print the grouped card list; returns the ids in listed order.
    fn render_groups(&mut self, filter: Option<&str>) -> Result<Vec<Uuid>> {
        let groups = self.app.flashcards().grouped_by_subject(filter);
        let mut listed = Vec::new();

        if groups.is_empty() {
            match filter {
                Some(subject) => writeln!(self.output, "No flashcards for {subject}.")?,
                None => writeln!(self.output, "No flashcards yet.")?,
            }
            return Ok(listed);
        }

        for group in &groups {
            writeln!(self.output, "{} ({})", group.subject, group.entries.len())?;
            for (_, card) in &group.entries {
                listed.push(card.id);
                writeln!(self.output, "  {}. {}", listed.len(), card.front)?;
            }
        }
        Ok(listed)
    }

    fn read_credentials(
        &mut self,
        user_label: &str,
        pass_label: &str,
    ) -> Result<Option<(String, String)>> {
        let Some(username) = self.prompt(&format!("{user_label}: "))? else {
            return Ok(None);
        };
        let Some(password) = self.prompt(&format!("{pass_label}: "))? else {
            return Ok(None);
        };
        Ok(Some((username, password)))
    }

    fn show_error(&mut self, err: &Error) -> Result<()> {
        if err.is_storage_write() {
            warn!("Action failed: {err}");
        } else if err.is_auth_error() {
            info!("Authentication failed: {err}");
        } else {
            debug!("Action failed: {err}");
        }
        writeln!(self.output, "Error: {}", err.user_message())?;
        Ok(())
    }

    /// Print `label` and read one line, without its line ending.
    ///
    /// Returns `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::config::Config;

    fn create_test_app(seed_examples: bool) -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut config = Config::with_data_dir(dir.path());
        config.flashcards.seed_examples = seed_examples;
        let app = App::open(&config).unwrap();
        (dir, app)
    }

    fn run_script(app: &mut App, script: &str) -> String {
        let mut output = Vec::new();
        Shell::new(app, Cursor::new(script.as_bytes()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_eof_quits_cleanly() {
        let (_dir, mut app) = create_test_app(true);
        let out = run_script(&mut app, "");
        assert!(out.contains("== Login =="));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_signup_and_login_flow() {
        let (_dir, mut app) = create_test_app(true);
        let out = run_script(
            &mut app,
            "signup\nalice\npw1\nlogin\nalice\nwrong\nlogin\nalice\npw1\nq\n",
        );

        assert!(out.contains("Signup successful. Please login."));
        assert!(out.contains("Error: Incorrect password"));
        assert!(out.contains("Login successful"));
        assert!(out.contains("Logged in as alice | Total Flashcards: 3"));
        assert_eq!(app.session().username(), Some("alice"));
    }

    #[test]
    fn test_login_unknown_user() {
        let (_dir, mut app) = create_test_app(true);
        let out = run_script(&mut app, "login\nghost\npw\nquit\n");

        assert!(out.contains("Error: User not found"));
        assert!(!app.session().logged_in());
    }

    #[test]
    fn test_study_flip_and_navigate() {
        let (_dir, mut app) = create_test_app(true);
        app.signup("alice", "pw").unwrap();
        app.login("alice", "pw").unwrap();

        let out = run_script(&mut app, "s\nf\nn\np\np\nb\nq\n");

        assert!(out.contains("Card 1 of 3"));
        assert!(out.contains("  ➗ Quadratic Formula"));
        assert!(out.contains("Solution:\nSolution for a quadratic equation"));
        assert!(out.contains("Card 2 of 3"));
        assert!(out.contains("Card 3 of 3"));
        assert!(out.contains("Subject: Chemistry"));
        assert_eq!(app.session().navigator.current_index(), 2);
        assert!(!app.session().navigator.is_flipped());
    }

    #[test]
    fn test_study_empty_store_is_guarded() {
        let (_dir, mut app) = create_test_app(false);
        app.signup("alice", "pw").unwrap();
        app.login("alice", "pw").unwrap();

        let out = run_script(&mut app, "s\nq\n");

        assert!(out.contains("Error: No flashcards yet. Create one first."));
        assert!(!out.contains("Card 1 of"));
    }

    #[test]
    fn test_create_card() {
        let (_dir, mut app) = create_test_app(false);
        app.signup("alice", "pw").unwrap();
        app.login("alice", "pw").unwrap();

        let out = run_script(&mut app, "c\nMath\n\n4\nc\nMath\n2+2\n4\ns\nb\nq\n");

        assert!(out.contains("Error: Fill both front and back"));
        assert!(out.contains("Flashcard added!"));
        assert!(out.contains("Subject: Math"));
        assert_eq!(app.flashcards().len(), 1);
        assert_eq!(app.flashcards().load()[0].front, "2+2");
    }

    #[test]
    fn test_manage_filter_and_delete() {
        let (_dir, mut app) = create_test_app(true);
        app.signup("alice", "pw").unwrap();
        app.login("alice", "pw").unwrap();

        let out = run_script(&mut app, "m\nPhysics\n9\n1\nq\n");

        assert!(out.contains("Subjects: Chemistry, Math, Physics"));
        assert!(out.contains("Physics (1)"));
        assert!(out.contains("  1. 🔬 Newton's Second Law"));
        assert!(out.contains("Not a listed card number: 9"));
        assert!(out.contains("Deleted \"🔬 Newton's Second Law\"."));
        assert!(out.contains("No flashcards for Physics."));
        assert_eq!(app.flashcards().subjects(), ["Chemistry", "Math"]);
        assert_eq!(app.flashcards().load().len(), 2);
    }

    #[test]
    fn test_manage_all_groups() {
        let (_dir, mut app) = create_test_app(true);
        app.create_card("Math", "2+2", "4").unwrap();
        app.signup("alice", "pw").unwrap();
        app.login("alice", "pw").unwrap();

        let out = run_script(&mut app, "m\n\n\nq\n");

        assert!(out.contains("Math (2)"));
        assert!(out.contains("Physics (1)"));
        assert!(out.contains("Chemistry (1)"));
        assert!(out.contains("  2. 2+2"));
        assert_eq!(app.flashcards().len(), 4);
    }

    #[test]
    fn test_manage_blank_subject_as_general() {
        let (_dir, mut app) = create_test_app(true);
        app.create_card("", "Orphan", "x").unwrap();
        app.signup("alice", "pw").unwrap();
        app.login("alice", "pw").unwrap();

        let out = run_script(&mut app, "m\nGeneral\n1\nq\n");

        assert!(out.contains("Subjects: Chemistry, General, Math, Physics"));
        assert!(!out.contains("Subjects: , "));
        assert!(out.contains("General (1)\n  1. Orphan"));
        assert!(out.contains("Deleted \"Orphan\"."));
        assert!(out.contains("No flashcards for General."));
        assert_eq!(app.flashcards().len(), 3);
    }

    #[test]
    fn test_logout_returns_to_login() {
        let (_dir, mut app) = create_test_app(true);
        app.signup("alice", "pw").unwrap();
        app.login("alice", "pw").unwrap();
        app.next_card().unwrap();

        let out = run_script(&mut app, "l\nquit\n");

        assert!(out.contains("Logged out."));
        assert!(out.matches("== Login ==").count() == 1);
        assert!(!app.session().logged_in());
        assert_eq!(app.session().navigator.current_index(), 1);
    }

    #[test]
    fn test_unknown_commands() {
        let (_dir, mut app) = create_test_app(true);
        let out = run_script(&mut app, "dance\nq\n");
        assert!(out.contains("Unknown command: dance"));
    }
}
