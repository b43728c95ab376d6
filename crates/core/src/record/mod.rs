use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::{Highlight, Renderer, Result, SortVizError};

/// Configuration options for frame capture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingSettings {
    /// Keep at most this many frames, dropping the oldest first.
    pub capacity: Option<usize>,
}

/// A single captured frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub sequence: Vec<i64>,
    pub highlights: Vec<Highlight>,
}

impl RecordedFrame {
    /// Indices carrying `kind` in this frame.
    pub fn marked(&self, kind: Highlight) -> Vec<usize> {
        self.highlights
            .iter()
            .enumerate()
            .filter(|(_, mark)| **mark == kind)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn has(&self, kind: Highlight) -> bool {
        self.highlights.contains(&kind)
    }
}

/// Renderer that captures every frame it is handed.
///
/// Clones share the same buffer, so one clone can be moved into a run while
/// another is kept for inspection once the run settles.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    settings: RecordingSettings,
    frames: Arc<Mutex<Vec<RecordedFrame>>>,
}

impl FrameRecorder {
    pub fn new(settings: RecordingSettings) -> Self {
        Self {
            settings,
            frames: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn frames(&self) -> Result<Vec<RecordedFrame>> {
        Ok(self.lock()?.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    pub fn last(&self) -> Result<Option<RecordedFrame>> {
        Ok(self.lock()?.last().cloned())
    }

    /// Number of frames that highlighted at least one index as `kind`.
    pub fn count_with(&self, kind: Highlight) -> Result<usize> {
        Ok(self.lock()?.iter().filter(|frame| frame.has(kind)).count())
    }

    pub fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<RecordedFrame>>> {
        self.frames
            .lock()
            .map_err(|_| SortVizError::msg("frame recorder has been poisoned"))
    }
}

impl Renderer for FrameRecorder {
    fn render(&mut self, sequence: &[i64], highlights: &[Highlight]) -> Result<()> {
        let capacity = self.settings.capacity;
        let mut frames = self.lock()?;
        if let Some(capacity) = capacity {
            if capacity == 0 {
                return Ok(());
            }
            if frames.len() >= capacity {
                let overflow = frames.len() + 1 - capacity;
                frames.drain(..overflow);
            }
        }
        frames.push(RecordedFrame {
            sequence: sequence.to_vec(),
            highlights: highlights.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_captured_frames() {
        let recorder = FrameRecorder::default();
        let mut handle = recorder.clone();
        handle
            .render(&[2, 1], &[Highlight::Comparing, Highlight::Comparing])
            .unwrap();
        handle
            .render(&[1, 2], &[Highlight::Swapping, Highlight::Idle])
            .unwrap();

        assert_eq!(recorder.len().unwrap(), 2);
        assert_eq!(recorder.count_with(Highlight::Swapping).unwrap(), 1);
        let last = recorder.last().unwrap().unwrap();
        assert_eq!(last.sequence, vec![1, 2]);
        assert_eq!(last.marked(Highlight::Swapping), vec![0]);
    }

    #[test]
    fn capacity_drops_oldest_frames() {
        let mut recorder = FrameRecorder::new(RecordingSettings { capacity: Some(2) });
        for value in 0..5 {
            recorder.render(&[value], &[Highlight::Idle]).unwrap();
        }

        let kept: Vec<i64> = recorder
            .frames()
            .unwrap()
            .into_iter()
            .map(|frame| frame.sequence[0])
            .collect();
        assert_eq!(kept, vec![3, 4]);
    }
}
