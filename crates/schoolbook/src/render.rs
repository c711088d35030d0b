//! Text rendering of schools for the terminal.
//!
//! Every renderer writes to an [`io::Write`] so the CLI and the shell share
//! them and tests can capture the output.

use std::io::{self, Write};

use clap::ValueEnum;

use crate::image::status_of;
use crate::school::School;
use crate::session::Rejection;
use crate::validate::{Field, ValidationErrors};

/// Shown when the list is empty.
pub const EMPTY_LIST_MESSAGE: &str =
    "No schools have been added yet. Use \"schools add\" (or \"page add\" in the shell) to get started.";

/// Output format for lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One school per line
    #[default]
    Plain,
    /// Aligned columns
    Table,
    /// JSON array in the slot format
    Json,
}

/// Write the list of schools in `format`.
///
/// Positions shown in plain and table output are 1-based.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn list<W: Write>(out: &mut W, schools: &[School], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, schools)?;
            writeln!(out)
        }
        _ if schools.is_empty() => writeln!(out, "{EMPTY_LIST_MESSAGE}"),
        OutputFormat::Plain => plain(out, schools),
        OutputFormat::Table => table(out, schools),
    }
}

fn plain<W: Write>(out: &mut W, schools: &[School]) -> io::Result<()> {
    for (i, school) in schools.iter().enumerate() {
        writeln!(
            out,
            "{}. {} - {}, {}",
            i + 1,
            school.name,
            school.address,
            school.city
        )?;
    }
    Ok(())
}

fn table<W: Write>(out: &mut W, schools: &[School]) -> io::Result<()> {
    let name_w = column_width(schools.iter().map(|s| s.name.as_str()), "NAME");
    let address_w = column_width(schools.iter().map(|s| s.address.as_str()), "ADDRESS");
    let city_w = column_width(schools.iter().map(|s| s.city.as_str()), "CITY");

    writeln!(
        out,
        "{:>3}  {:<name_w$}  {:<address_w$}  {:<city_w$}  IMAGE",
        "#", "NAME", "ADDRESS", "CITY"
    )?;
    for (i, school) in schools.iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<name_w$}  {:<address_w$}  {:<city_w$}  {}",
            i + 1,
            school.name,
            school.address,
            school.city,
            if school.has_image() { "yes" } else { "-" }
        )?;
    }
    Ok(())
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .fold(header.len(), usize::max)
}

/// Write the detail view for the school at 1-based `position`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn detail<W: Write>(out: &mut W, position: usize, school: &School) -> io::Result<()> {
    writeln!(out, "#{position} {}", school.name)?;
    writeln!(out, "  Address: {}", school.address)?;
    writeln!(out, "  City:    {}", school.city)?;
    writeln!(out, "  State:   {}", school.state)?;
    writeln!(out, "  Contact: {}", school.contact)?;
    writeln!(out, "  Email:   {} <{}>", school.email_id, school.mailto())?;
    match &school.image {
        Some(reference) => writeln!(out, "  Image:   {reference} ({})", status_of(reference)),
        None => writeln!(out, "  Image:   (placeholder)"),
    }
}

/// Write each field error beside its label.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn errors<W: Write>(out: &mut W, errors: &ValidationErrors) -> io::Result<()> {
    for error in errors.iter() {
        writeln!(out, "  {}: {}", error.field.label(), error.message)?;
    }
    Ok(())
}

/// Write why a school was not added: each failing field, then the image.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn rejection<W: Write>(out: &mut W, rejection: &Rejection) -> io::Result<()> {
    errors(out, &rejection.fields)?;
    if let Some(e) = &rejection.image {
        writeln!(out, "  School Image: {e}")?;
    }
    Ok(())
}

/// Write the add form with current values and any errors.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn form<W: Write>(out: &mut W, form: &crate::form::SchoolForm) -> io::Result<()> {
    let draft = form.draft();
    writeln!(out, "Add a New School")?;
    for field in Field::ALL {
        writeln!(
            out,
            "  {:<15} [{}] {}",
            field.label(),
            field.key(),
            draft.value(field)
        )?;
        if let Some(message) = form.errors().get(field) {
            writeln!(out, "  {:<15} ! {}", "", message)?;
        }
    }
    match &draft.image {
        Some(reference) => writeln!(out, "  {:<15} [image] {}", "School Image", reference),
        None => writeln!(out, "  {:<15} [image]", "School Image"),
    }
}
