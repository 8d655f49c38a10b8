//! Line-oriented form session for `certrack add --interactive`.

use std::io::{BufRead, Write};

use crate::certificate::{file_name_of, Certificate};
use crate::error::{Error, Result};
use crate::form::Field;
use crate::storage::Slot;
use crate::tracker::Tracker;
use crate::view::render_form;

use super::commands::parse_assignment;

const HELP: &str = "\
Commands:
  set <field>=<value>   set a field (name, provider, status, progress,
                        date-earned, expiry-date, credential-id, materials, notes)
  material <text>       add one study material line
  file <path>           attach a file (only its name is kept)
  rm <index>            detach the file at <index>
  show                  show the form
  submit                save the certificate
  cancel                discard the form
";

/// Run a form session, reading commands from `input`.
///
/// Returns the stored record on submit, or `None` if the session was
/// cancelled or `input` ended first. Form mistakes are reported on `output`
/// and the session continues.
///
/// # Errors
///
/// Returns an error if reading or writing the terminal fails, or if the
/// record cannot be persisted.
pub fn run_form<S, R, W>(
    tracker: &mut Tracker<S>,
    mut input: R,
    output: &mut W,
) -> Result<Option<Certificate>>
where
    S: Slot,
    R: BufRead,
    W: Write,
{
    tracker.open_form();
    write!(output, "{}\n{HELP}", render_form(tracker.draft()))?;

    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            tracker.cancel();
            writeln!(output)?;
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']);
        let (command, rest) = trimmed
            .trim_start()
            .split_once(' ')
            .unwrap_or((trimmed.trim(), ""));

        let outcome = match command {
            "" => Ok(()),
            "help" => write!(output, "{HELP}").map_err(Error::from),
            "show" => write!(output, "{}", render_form(tracker.draft())).map_err(Error::from),
            "set" => parse_assignment(rest).and_then(|field| tracker.set_field(field)),
            "material" => {
                let mut materials = tracker.draft().study_materials.clone();
                if !materials.is_empty() {
                    materials.push('\n');
                }
                materials.push_str(rest);
                tracker.set_field(Field::StudyMaterials(materials))
            }
            "file" => match file_name_of(rest.trim()) {
                name if name.is_empty() => Err(Error::invalid_field("file", rest)),
                name => tracker.add_files([name]),
            },
            "rm" => rest
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::invalid_field("index", rest))
                .and_then(|index| tracker.remove_file(index))
                .and_then(|name| writeln!(output, "removed {name}").map_err(Error::from)),
            "submit" => match tracker.submit() {
                Ok(record) => return Ok(Some(record.clone())),
                Err(err) => Err(err),
            },
            "cancel" => {
                tracker.cancel();
                return Ok(None);
            }
            other => Err(Error::invalid_field("command", other)),
        };

        match outcome {
            Ok(()) => {}
            Err(err @ Error::FileIndexOutOfRange { .. }) => writeln!(output, "error: {err}")?,
            Err(err) if err.is_validation_error() => writeln!(output, "error: {err}")?,
            Err(err) => return Err(err),
        }
    }
}
