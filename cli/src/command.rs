use core::str::FromStr;

use anyhow::{Context, bail};
use mineclear_core::*;

pub(crate) const HELP: &str = "\
commands:
  r ROW COL     reveal a cell (chords when it is already revealed)
  f ROW COL     toggle a flag
  c ROW COL     chord: reveal the neighbors of a satisfied number
  n [PRESET]    new game, presets: easy medium hard dense endless
  p             print the board
  h             this help
  q             quit";

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Chord(Coord2),
    New(Option<Difficulty>),
    Print,
    Help,
    Quit,
}

fn parse_coords<'a>(mut args: impl Iterator<Item = &'a str>) -> anyhow::Result<Coord2> {
    let mut next = |axis: &str| -> anyhow::Result<Coord> {
        let value = args
            .next()
            .with_context(|| format!("missing {}", axis))?;
        value
            .parse()
            .with_context(|| format!("invalid {} {:?}", axis, value))
    };
    let row = next("row")?;
    let col = next("col")?;
    Ok((row, col))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            bail!("empty command");
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Self::Reveal(parse_coords(&mut words)?),
            "f" | "flag" => Self::Flag(parse_coords(&mut words)?),
            "c" | "chord" => Self::Chord(parse_coords(&mut words)?),
            "n" | "new" => Self::New(words.next().map(str::parse::<Difficulty>).transpose()?),
            "p" | "print" => Self::Print,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => bail!("unknown command {:?}, try \"help\"", other),
        };

        if let Some(extra) = words.next() {
            bail!("unexpected argument {:?}", extra);
        }
        Ok(command)
    }
}
