//! Line-driven interactive session.
//!
//! The shell reads one command per line and drives a [`Dashboard`]: switching
//! between the add form and the list, editing and submitting the form, and
//! opening or closing the detail view of a school.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::config::ImageConfig;
use crate::dashboard::{Dashboard, Key, Page};
use crate::image::ImageRef;
use crate::render::{self, OutputFormat};
use crate::slot::Slot;
use crate::validate::Field;

const HELP: &str = "\
Commands:
  page add|show         switch between the add form and the list
  set <field> <value>   set a form field (name, address, city, state, contact, email)
  image <path>|none     attach or detach a school image
  submit                validate the form and add the school
  reset                 clear the form
  list                  show the list of schools
  select <n>            open the details of school <n>
  close | esc           close the details
  help                  show this help
  quit                  end the session";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch page.
    Page(Page),
    /// Set a form field.
    Set(Field, String),
    /// Attach an image from a path.
    Image(String),
    /// Detach the image.
    NoImage,
    /// Submit the form.
    Submit,
    /// Clear the form.
    Reset,
    /// Show the list.
    List,
    /// Open the detail view of a 1-based position.
    Select(usize),
    /// Close the detail view.
    Close,
    /// Escape key.
    Escape,
    /// Print help.
    Help,
    /// End the session.
    Quit,
}

impl Command {
    /// Parse one input line.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the line is not a command.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word {
            "page" => match rest {
                "add" => Ok(Self::Page(Page::Add)),
                "show" => Ok(Self::Page(Page::Show)),
                _ => Err("usage: page add|show".to_string()),
            },
            "set" => {
                let (key, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let field =
                    Field::from_key(key).ok_or_else(|| format!("unknown field: {key:?}"))?;
                Ok(Self::Set(field, value.trim().to_string()))
            }
            "image" => match rest {
                "" => Err("usage: image <path>|none".to_string()),
                "none" => Ok(Self::NoImage),
                path => Ok(Self::Image(path.to_string())),
            },
            "submit" => Ok(Self::Submit),
            "reset" => Ok(Self::Reset),
            "list" => Ok(Self::List),
            "select" | "open" => rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(Self::Select)
                .ok_or_else(|| "usage: select <n> (n starts at 1)".to_string()),
            "close" => Ok(Self::Close),
            "esc" | "escape" => Ok(Self::Escape),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(format!("unknown command: {word:?} (try \"help\")")),
        }
    }
}

/// An interactive session over a [`Dashboard`].
#[derive(Debug)]
pub struct Shell<S> {
    dashboard: Dashboard<S>,
    images: ImageConfig,
}

impl<S: Slot> Shell<S> {
    /// Wrap `dashboard` in a shell.
    #[must_use]
    pub fn new(dashboard: Dashboard<S>, images: ImageConfig) -> Self {
        Self { dashboard, images }
    }

    /// The session being driven.
    #[must_use]
    pub fn dashboard(&self) -> &Dashboard<S> {
        &self.dashboard
    }

    /// Read commands from `input` until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        self.show_page(out)?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command, out)?,
                Err(message) => writeln!(out, "{message}")?,
            }
        }
        Ok(())
    }

    /// Run a single command.
    ///
    /// # Errors
    ///
    /// Returns an error if writing output fails.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<()> {
        debug!("Shell command: {:?}", command);
        match command {
            Command::Page(page) => {
                self.dashboard.navigate(page);
                self.show_page(out)?;
            }
            Command::Set(field, value) => {
                self.dashboard.form_mut().set(field, value);
            }
            Command::Image(path) => match ImageRef::from_file(&path, &self.images) {
                Ok(image) => {
                    self.dashboard.form_mut().set_image(Some(&image));
                    writeln!(
                        out,
                        "Image attached: {} (blake3 {})",
                        image.path().display(),
                        image.fingerprint()
                    )?;
                }
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::NoImage => self.dashboard.form_mut().set_image(None),
            Command::Submit => match self.dashboard.submit() {
                Ok(submitted) => {
                    let school = &self.dashboard.store().list()[submitted.index];
                    writeln!(out, "Added {} (#{})", school.name, submitted.index + 1)?;
                    if let Err(e) = submitted.persisted {
                        warn!("Slot write failed: {}", e);
                        writeln!(out, "(not saved: this school lasts only for this session)")?;
                    }
                    self.show_page(out)?;
                }
                Err(errors) => {
                    writeln!(out, "Please fix the following:")?;
                    render::errors(out, &errors)?;
                }
            },
            Command::Reset => self.dashboard.form_mut().reset(),
            Command::List => {
                render::list(out, self.dashboard.store().list(), OutputFormat::Plain)?;
            }
            Command::Select(position) => {
                let Some(index) = position.checked_sub(1) else {
                    return writeln!(out, "positions start at 1");
                };
                match self.dashboard.select(Some(index)) {
                    Ok(()) => self.show_selected(out)?,
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            Command::Close => self.dashboard.close(),
            Command::Escape => {
                self.dashboard.press(Key::Escape);
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn show_page<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.dashboard.nav().page() {
            Page::Add => render::form(out, self.dashboard.form()),
            Page::Show => {
                writeln!(out, "List of Schools")?;
                render::list(out, self.dashboard.store().list(), OutputFormat::Plain)
            }
        }
    }

    fn show_selected<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if let (Some(index), Some(school)) = (
            self.dashboard.nav().selected(),
            self.dashboard.selected_school(),
        ) {
            render::detail(out, index + 1, school)?;
        }
        Ok(())
    }
}
