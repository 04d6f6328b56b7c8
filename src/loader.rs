//! Reads a community description.
//!
//! A description is a sequence of commands, each terminated by a semicolon:
//!
//! ```text
//! // a small town
//! pop 1000;
//! house 3, 2;        // median household size, scatter
//! workplace 20, 30;  // median workplace size, scatter
//! infected 10;
//! employed 0.6;
//! end 30;            // days
//! ```
//!
//! Tokens are separated by whitespace; `,` and `;` are tokens on their own whether or not they
//! are surrounded by whitespace, and `//` starts a comment that runs to the end of the line.
//!
//! Problems do not stop the reader. Each one is logged and recorded, out-of-range values are
//! clamped so reading can continue, and once the whole description has been read the load fails
//! if anything was recorded. A description with more than [`DIAGNOSTIC_LIMIT`] problems is
//! abandoned as soon as the limit is passed.
use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::EpidemicError;
use crate::parameters::CommunityParameters;

pub const DIAGNOSTIC_LIMIT: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    Comma,
    Semicolon,
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for line in input.lines() {
        let line = line.find("//").map_or(line, |comment| &line[..comment]);
        for chunk in line.split_whitespace() {
            let mut rest = chunk;
            while let Some(position) = rest.find([',', ';']) {
                if position > 0 {
                    tokens.push(Token::Word(&rest[..position]));
                }
                tokens.push(if rest.as_bytes()[position] == b',' {
                    Token::Comma
                } else {
                    Token::Semicolon
                });
                rest = &rest[position + 1..];
            }
            if !rest.is_empty() {
                tokens.push(Token::Word(rest));
            }
        }
    }
    tokens
}

/// Raised when more problems have been found than are worth reporting.
struct TooManyProblems;

#[derive(Default)]
struct Diagnostics {
    messages: Vec<String>,
}

impl Diagnostics {
    fn warn(&mut self, message: String) -> Result<(), TooManyProblems> {
        warn!("{message}");
        self.messages.push(message);
        if self.messages.len() > DIAGNOSTIC_LIMIT {
            Err(TooManyProblems)
        } else {
            Ok(())
        }
    }
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
    diagnostics: Diagnostics,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.position).copied()
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.peek();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn warn(&mut self, message: String) -> Result<(), TooManyProblems> {
        self.diagnostics.warn(message)
    }

    /// Consumes a number if the next token is one, otherwise records `missing` and returns
    /// `default` without consuming anything.
    fn number<T: std::str::FromStr>(
        &mut self,
        default: T,
        missing: impl FnOnce() -> String,
    ) -> Result<T, TooManyProblems> {
        if let Some(Token::Word(word)) = self.peek() {
            if let Ok(value) = word.parse() {
                self.position += 1;
                return Ok(value);
            }
        }
        self.warn(missing())?;
        Ok(default)
    }

    /// Consumes `expected` if it is the next token, otherwise records `missing`.
    fn punctuation(
        &mut self,
        expected: Token<'a>,
        missing: impl FnOnce() -> String,
    ) -> Result<(), TooManyProblems> {
        if self.peek() == Some(expected) {
            self.position += 1;
            Ok(())
        } else {
            self.warn(missing())
        }
    }
}

/// Everything read so far. `None` means the command has not been seen yet.
#[derive(Default)]
struct Settings {
    population: Option<usize>,
    household: Option<(f64, f64)>,
    workplace: Option<(f64, f64)>,
    infected: Option<usize>,
    employed: Option<f64>,
    end: Option<f64>,
}

fn read_commands(parser: &mut Parser, settings: &mut Settings) -> Result<(), TooManyProblems> {
    while let Some(token) = parser.next() {
        let command = match token {
            Token::Word(command) => command,
            Token::Comma => ",",
            Token::Semicolon => ";",
        };
        match command {
            "pop" => {
                if settings.population.is_some() {
                    parser.warn("population already set".to_string())?;
                }
                let population = parser.number(1_i64, || "pop with no argument".to_string())?;
                parser.punctuation(Token::Semicolon, || {
                    format!("pop {population}: missed semicolon")
                })?;
                let population = match usize::try_from(population) {
                    Ok(population) if population >= 1 => population,
                    _ => {
                        parser.warn(format!("pop {population}: non-positive population?"))?;
                        0
                    }
                };
                settings.population = Some(population);
            }
            "house" | "workplace" => {
                let (current, label) = if command == "house" {
                    (settings.household, "household")
                } else {
                    (settings.workplace, "workplace")
                };
                if current.is_some() {
                    parser.warn(format!("{label} size already set"))?;
                    parser.warn(format!("{label} scatter already set"))?;
                }
                let mut median =
                    parser.number(1.0_f64, || format!("{command} with no argument"))?;
                parser.punctuation(Token::Comma, || format!("{command} {median}: missed comma"))?;
                let mut scatter =
                    parser.number(0.0_f64, || format!("{command} {median}, missing argument"))?;
                parser.punctuation(Token::Semicolon, || {
                    format!("{command} {median}, {scatter}: missed semicolon")
                })?;
                if !median.is_finite() {
                    parser.warn(format!("{command} {median}, {scatter}: median not finite?"))?;
                    median = 0.0;
                } else if median < 1.0 {
                    parser.warn(format!("{command} {median}, {scatter}: median nonpositive?"))?;
                    median = 0.0;
                }
                if !scatter.is_finite() {
                    parser.warn(format!("{command} {median}, {scatter}: scatter not finite?"))?;
                    scatter = 0.0;
                } else if scatter < 0.0 {
                    parser.warn(format!("{command} {median}, {scatter}: scatter negative?"))?;
                    scatter = 0.0;
                }
                if command == "house" {
                    settings.household = Some((median, scatter));
                } else {
                    settings.workplace = Some((median, scatter));
                }
            }
            "infected" => {
                if settings.infected.is_some() {
                    parser.warn("infected already set".to_string())?;
                }
                let infected = parser.number(1_i64, || "infected with no argument".to_string())?;
                parser.punctuation(Token::Semicolon, || {
                    format!("infected {infected}: missed semicolon")
                })?;
                let infected = match usize::try_from(infected) {
                    Ok(infected) => infected,
                    Err(_) => {
                        parser.warn(format!("infected {infected}: negative value?"))?;
                        0
                    }
                };
                settings.infected = Some(infected);
            }
            "employed" => {
                if settings.employed.is_some() {
                    parser.warn("employed rate already set".to_string())?;
                }
                let mut employed =
                    parser.number(1.0_f64, || "employed with no argument".to_string())?;
                parser.punctuation(Token::Semicolon, || {
                    format!("employed {employed}: missed semicolon")
                })?;
                if !employed.is_finite() {
                    parser.warn(format!("employed {employed}: not finite?"))?;
                    employed = 0.0;
                } else if employed < 0.0 {
                    parser.warn(format!("employed {employed}: negative value?"))?;
                    employed = 0.0;
                } else if employed > 1.0 {
                    parser.warn(format!("employed {employed}: greater than 1.0?"))?;
                    employed = 1.0;
                }
                settings.employed = Some(employed);
            }
            "end" => {
                if settings.end.is_some() {
                    parser.warn("end time already set".to_string())?;
                }
                let end = parser.number(1.0_f64, || {
                    "end: floating point end time expected".to_string()
                })?;
                if !end.is_finite() || end <= 0.0 {
                    parser.warn(format!("end {end}: non positive end of time?"))?;
                }
                parser.punctuation(Token::Semicolon, || format!("end {end}: missed semicolon"))?;
                settings.end = Some(end);
            }
            _ => parser.warn(format!("unknown command: {command}"))?,
        }
    }
    Ok(())
}

/// Checks what can only be checked once everything has been read.
fn check_complete(parser: &mut Parser, settings: &mut Settings) -> Result<(), TooManyProblems> {
    if let (Some(infected), Some(population)) = (settings.infected, settings.population) {
        if infected > population {
            parser.warn(format!("infected {infected}: greater than population?"))?;
            settings.infected = Some(population);
        }
    }

    if settings.population.is_none() {
        parser.warn("population not initialized".to_string())?;
    }
    if settings.household.is_none() {
        parser.warn("median household size not set".to_string())?;
        parser.warn("household scatter not set".to_string())?;
    }
    if settings.workplace.is_none() {
        parser.warn("median workplace size not set".to_string())?;
        parser.warn("workplace scatter not set".to_string())?;
    }
    if settings.infected.is_none() {
        parser.warn("infected number not given".to_string())?;
    }
    if settings.employed.is_none() {
        parser.warn("employment rate not given".to_string())?;
    }
    if settings.end.is_none() {
        parser.warn("end time not given".to_string())?;
    }
    Ok(())
}

/// Parses a community description.
///
/// # Errors
///
/// Returns `EpidemicError::ConfigError` with every problem found if the description is
/// incomplete or contains anything that had to be corrected.
pub fn parse_community_description(input: &str) -> Result<CommunityParameters, EpidemicError> {
    let mut parser = Parser {
        tokens: tokenize(input),
        position: 0,
        diagnostics: Diagnostics::default(),
    };
    let mut settings = Settings::default();

    let complete = read_commands(&mut parser, &mut settings)
        .and_then(|()| check_complete(&mut parser, &mut settings));
    if complete.is_err() {
        warn!("too many problems, giving up");
    }
    if !parser.diagnostics.messages.is_empty() {
        return Err(EpidemicError::ConfigError(parser.diagnostics.messages));
    }

    // check_complete records a diagnostic for every missing setting.
    let (
        Some(population),
        Some((household_median, household_scatter)),
        Some((workplace_median, workplace_scatter)),
        Some(infected),
        Some(employment_probability),
        Some(end_time),
    ) = (
        settings.population,
        settings.household,
        settings.workplace,
        settings.infected,
        settings.employed,
        settings.end,
    )
    else {
        return Err(EpidemicError::EpidemicError(
            "incomplete community description".to_string(),
        ));
    };

    let parameters = CommunityParameters {
        population,
        household_median,
        household_scatter,
        workplace_median,
        workplace_scatter,
        employment_probability,
        initial_infected: infected,
        end_time,
    };
    parameters.validate()?;
    debug!("read community description: {parameters:?}");
    Ok(parameters)
}

/// Reads and parses the community description in `path`.
///
/// # Errors
///
/// Returns `EpidemicError::IoError` if the file cannot be read, otherwise as
/// [`parse_community_description`].
pub fn load_community_file(path: &Path) -> Result<CommunityParameters, EpidemicError> {
    debug!("loading community description from {}", path.display());
    let input = fs::read_to_string(path)?;
    parse_community_description(&input)
}
