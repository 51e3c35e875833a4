//! Console prompts for parameters not given on the command line.

use std::io::{BufRead, Write};

use crate::error::{Result, TerraformError};
use crate::params::ParamOverrides;

/// Attempts per question before giving up on unparseable input.
const MAX_ATTEMPTS: usize = 3;

/// Asks questions on `output` and reads answers from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for a whole number. Range checks are left to validation.
    pub fn ask_integer(&mut self, question: &str) -> Result<i64> {
        for _ in 0..MAX_ATTEMPTS {
            write!(self.output, "{}", question)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(TerraformError::Prompt(format!(
                    "input ended before answering \"{}\"",
                    question.trim()
                )));
            }
            match line.trim().parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Please enter a whole number.")?,
            }
        }
        Err(TerraformError::Prompt(format!(
            "no valid answer to \"{}\" after {} attempts",
            question.trim(),
            MAX_ATTEMPTS
        )))
    }

    /// Ask for every grid parameter that is still missing, in the usual order.
    pub fn fill(&mut self, overrides: &mut ParamOverrides) -> Result<()> {
        let questions: [(&mut Option<i64>, &str); 6] = [
            (&mut overrides.width, "Enter grid width: "),
            (&mut overrides.height, "Enter grid height: "),
            (&mut overrides.waterline, "Enter value for waterline (40-200): "),
            (&mut overrides.radius, "Enter dirtball radius (minimum 2): "),
            (&mut overrides.power, "Enter dirtball power rating (minimum = radius): "),
            (&mut overrides.dirtballs, "Enter number of dirtballs to drop: "),
        ];
        for (slot, question) in questions {
            if slot.is_none() {
                *slot = Some(self.ask_integer(question)?);
            }
        }
        Ok(())
    }
}
