use crate::render::{pending_line, quote_line, result_line};
use gachasim_core::{Cue, DrawBatch, RevealPhase, RevealSequence, RevealStep};
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

/// Input read while the sequence waits for a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Advance,
    Skip,
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        "s" | "skip" => Input::Skip,
        _ => Input::Advance,
    }
}

/// Reveals a batch slot by slot. Enter advances, `s` skips; end of input
/// behaves like a skip.
pub fn run_stepped(
    batch: &DrawBatch,
    skip_all: bool,
    pause: Duration,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut sequence = RevealSequence::new(batch).with_skip_all(skip_all);
    sequence.start()?;
    loop {
        while let Some(cue) = sequence.next_cue() {
            render_cue(batch, cue, pause, out)?;
        }
        match sequence.phase() {
            RevealPhase::Done => return Ok(()),
            RevealPhase::AwaitingAdvance => {
                write!(out, "  [Enter] next, [s] skip > ")?;
                out.flush()?;
                let mut line = String::new();
                let read = input.read_line(&mut line)?;
                if read == 0 || parse_input(&line) == Input::Skip {
                    sequence.skip()?;
                } else {
                    sequence.advance()?;
                }
            }
            phase => anyhow::bail!("reveal stalled in {phase:?}"),
        }
    }
}

fn render_cue(
    batch: &DrawBatch,
    cue: Cue,
    pause: Duration,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match cue.step {
        RevealStep::Gate => writeln!(out, "{}", batch.gate_text)?,
        RevealStep::Highlight { slot } => {
            if let Some(result) = batch.results.get(slot) {
                writeln!(out, "{}", pending_line(slot, result.display_tier))?;
            }
        }
        RevealStep::ShowTier { slot, tier } => {
            if !cue.instant {
                thread::sleep(pause);
            }
            writeln!(out, "    ...{} (slot {})", tier.label(), slot + 1)?;
        }
        RevealStep::ShowQuote { slot } => {
            if let Some(line) = batch.results.get(slot).and_then(|r| quote_line(&r.item)) {
                writeln!(out, "{line}")?;
                if !cue.instant {
                    thread::sleep(pause);
                }
            }
        }
        RevealStep::ShowItem { slot } => {
            if let Some(result) = batch.results.get(slot) {
                writeln!(out, "{}", result_line(slot, result))?;
            }
        }
        RevealStep::Finished => writeln!(out, "-- done --")?,
    }
    Ok(())
}
