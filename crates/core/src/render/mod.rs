use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::{Lane, Result};

/// Visual tag attached to a single sequence index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    #[default]
    Idle,
    Comparing,
    Swapping,
    /// Part of the confirmed sorted prefix. Never cleared within a run.
    Settled,
}

/// One highlight entry per index of the sequence it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    marks: Vec<Highlight>,
}

impl HighlightState {
    pub fn new(len: usize) -> Self {
        Self {
            marks: vec![Highlight::Idle; len],
        }
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn as_slice(&self) -> &[Highlight] {
        &self.marks
    }

    pub fn get(&self, index: usize) -> Option<Highlight> {
        self.marks.get(index).copied()
    }

    /// Clears every transient mark, then tags `indices` with `kind`.
    /// Out of range indices are ignored and settled entries are left alone.
    pub fn apply(&mut self, indices: &[usize], kind: Highlight) {
        for mark in &mut self.marks {
            if *mark != Highlight::Settled {
                *mark = Highlight::Idle;
            }
        }

        for &index in indices {
            if let Some(mark) = self.marks.get_mut(index) {
                if *mark != Highlight::Settled {
                    *mark = kind;
                }
            }
        }
    }

    pub fn settle(&mut self, index: usize) {
        if let Some(mark) = self.marks.get_mut(index) {
            *mark = Highlight::Settled;
        }
    }

    pub fn settled_count(&self) -> usize {
        self.marks
            .iter()
            .filter(|mark| **mark == Highlight::Settled)
            .count()
    }
}

/// Rendering collaborator. Receives the sequence and its highlights after
/// every frame and must never mutate them. Implementations have to cope with
/// empty sequences and redraw identically for identical input.
pub trait Renderer: Send {
    fn render(&mut self, sequence: &[i64], highlights: &[Highlight]) -> Result<()>;
}

const BAR_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const MIN_CEILING: i64 = 10;

/// Draws each frame as a single line of block characters.
#[derive(Debug)]
pub struct BarRenderer<W> {
    out: W,
    label: String,
    color: bool,
}

impl<W: Write + Send> BarRenderer<W> {
    pub fn new(out: W, lane: Lane) -> Self {
        Self {
            out,
            label: lane.to_string(),
            color: false,
        }
    }

    /// Enables ANSI colouring of highlighted bars.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar(value: i64, ceiling: i64) -> char {
        if value <= 0 {
            return BAR_LEVELS[0];
        }
        let top = BAR_LEVELS.len() - 1;
        let level = (value as f64 / ceiling as f64 * top as f64).round() as usize;
        BAR_LEVELS[level.min(top)]
    }

    fn paint(&self, bar: char, highlight: Highlight) -> String {
        if !self.color {
            return bar.to_string();
        }
        let code = match highlight {
            Highlight::Idle => "32",
            Highlight::Comparing => "31",
            Highlight::Swapping => "36",
            Highlight::Settled => "97",
        };
        format!("\x1b[{code}m{bar}\x1b[0m")
    }
}

impl<W: Write + Send> Renderer for BarRenderer<W> {
    fn render(&mut self, sequence: &[i64], highlights: &[Highlight]) -> Result<()> {
        let ceiling = sequence
            .iter()
            .copied()
            .max()
            .unwrap_or(MIN_CEILING)
            .max(MIN_CEILING);

        let mut line = String::with_capacity(sequence.len() + self.label.len() + 2);
        line.push_str(&self.label);
        line.push(' ');
        for (index, &value) in sequence.iter().enumerate() {
            let highlight = highlights.get(index).copied().unwrap_or_default();
            line.push_str(&self.paint(Self::bar(value, ceiling), highlight));
        }

        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Reports frames as trace events instead of drawing them.
#[derive(Debug, Clone, Copy)]
pub struct LogRenderer {
    lane: Lane,
}

impl LogRenderer {
    pub fn new(lane: Lane) -> Self {
        Self { lane }
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, sequence: &[i64], highlights: &[Highlight]) -> Result<()> {
        let active: Vec<usize> = highlights
            .iter()
            .enumerate()
            .filter(|(_, mark)| matches!(mark, Highlight::Comparing | Highlight::Swapping))
            .map(|(index, _)| index)
            .collect();
        tracing::trace!(lane = %self.lane, len = sequence.len(), ?active, "frame");
        Ok(())
    }
}
