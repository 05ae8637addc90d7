//! Directory-level driver of the trajectory-to-example pipeline.

use std::path::{Path, PathBuf};

use pushstate_core::config::{ProcessConfig, prepare_directories};
use pushstate_core::error::{DataError, PipelineError};
use pushstate_core::time::Period;
use pushstate_core::types::{Shape, TrajectoryMeta};
use tracing::{debug, error, info, warn};

use crate::align::{AlignedFrame, align_streams};
use crate::assemble::{StateAssembler, StateLayout};
use crate::partition::{MixingMode, OutputPartitioner};
use crate::properties::parse_properties;
use crate::source::read_record;
use crate::states::StateFileWriter;
use crate::window::ExampleWindower;

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

/// Totals of one processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_processed: usize,
    pub files_skipped: usize,
    /// Trajectory segments windowed (one per file unless split on gaps).
    pub trajectories: usize,
    pub examples_written: u64,
    /// Id the next example would receive.
    pub next_example_id: u64,
}

/// Result of processing one recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOutcome {
    pub aligned_steps: usize,
    pub segments: usize,
    pub examples: u64,
}

// ---------------------------------------------------------------------------
// TrajectoryProcessor
// ---------------------------------------------------------------------------

/// Converts every recording of a source directory into example files.
#[derive(Debug)]
pub struct TrajectoryProcessor {
    config: ProcessConfig,
    shape: Shape,
    period: Period,
    partitioner: OutputPartitioner,
    windower: ExampleWindower,
}

impl TrajectoryProcessor {
    /// Validate the configuration and prepare directories.
    ///
    /// Fails when the source directory is missing or the shape is unknown.
    pub fn new(config: ProcessConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        prepare_directories(&config.source_dir, &config.out_dir)?;
        let shape = config.resolve_shape()?;
        let period = config.period()?;
        let partitioner = OutputPartitioner::new(
            &config.out_dir,
            &config.base_filename,
            shape,
            config.number_of_steps,
            MixingMode::from_flags(config.mixed_vel, config.mixed_acc),
        );
        let windower = ExampleWindower::new(config.number_of_steps);
        Ok(Self {
            config,
            shape,
            period,
            partitioner,
            windower,
        })
    }

    pub const fn shape(&self) -> Shape {
        self.shape
    }

    pub const fn partitioner(&self) -> &OutputPartitioner {
        &self.partitioner
    }

    /// Path of the tagged state file written when `write_states` is set.
    pub fn states_path(&self) -> PathBuf {
        self.config.out_dir.join(format!(
            "{}_{}_states.csv",
            self.config.base_filename, self.shape
        ))
    }

    /// Regular files of the source directory in name order.
    pub fn source_files(&self) -> Result<Vec<PathBuf>, DataError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.config.source_dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Process the whole source directory.
    ///
    /// Output files are created up front. A file that fails to read or parse
    /// is logged and skipped.
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        let created = self.partitioner.setup()?;
        info!(
            files = created.len(),
            shape = %self.shape,
            steps = self.windower.steps().get(),
            "initialised output files"
        );
        let mut states = if self.config.write_states {
            Some(StateFileWriter::create(self.states_path())?)
        } else {
            None
        };

        let mut summary = RunSummary::default();
        for path in self.source_files()? {
            let index = summary.files_processed;
            match self.process_file(&path, index, &mut summary.next_example_id, states.as_mut()) {
                Ok(outcome) => {
                    info!(
                        file = %path.display(),
                        trajectory = index,
                        steps = outcome.aligned_steps,
                        examples = outcome.examples,
                        "processed recording"
                    );
                    summary.files_processed += 1;
                    summary.trajectories += outcome.segments;
                    summary.examples_written += outcome.examples;
                }
                Err(e) => {
                    error!(file = %path.display(), "skipping recording: {e}");
                    summary.files_skipped += 1;
                }
            }
        }

        info!(
            processed = summary.files_processed,
            skipped = summary.files_skipped,
            examples = summary.examples_written,
            "run complete"
        );
        Ok(summary)
    }

    /// Process one recording as trajectory `index`.
    ///
    /// Example ids are taken from `next_id`, which is advanced before each
    /// batch is written. Ids handed out to a file that later fails are
    /// never reused.
    pub fn process_file(
        &self,
        path: &Path,
        index: usize,
        next_id: &mut u64,
        states: Option<&mut StateFileWriter>,
    ) -> Result<FileOutcome, DataError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = parse_properties(&file_name)?.with_index(index);
        // Reject parameters without an output partition before writing anything.
        self.partitioner.key_for(1, &meta)?;

        let record = read_record(path)?;
        let (object, tip, wrench) = record.streams();
        for stream in [&object, &tip, &wrench] {
            if !stream.is_strictly_increasing() {
                warn!(
                    file = %file_name,
                    stream = %stream.kind,
                    "timestamps are not strictly increasing"
                );
            }
        }
        let frame = align_streams(&object, &tip, &wrench, self.period)?;
        debug!(
            file = %file_name,
            raw = object.len(),
            aligned = frame.len(),
            "aligned streams"
        );

        let segments = if self.config.split_on_gaps {
            frame.split_on_gaps()
        } else {
            vec![frame.clone()]
        };
        let examples = self.write_examples(&segments, &meta, next_id)?;

        if let Some(writer) = states {
            let tagged = StateAssembler::new(self.shape, StateLayout::Tagged);
            writer.append(&tagged.assemble(&frame, &meta))?;
        }

        Ok(FileOutcome {
            aligned_steps: frame.len(),
            segments: segments.len(),
            examples,
        })
    }

    /// Window every segment, returning how many examples were written.
    fn write_examples(
        &self,
        segments: &[AlignedFrame],
        meta: &TrajectoryMeta,
        next_id: &mut u64,
    ) -> Result<u64, DataError> {
        let nodes = StateAssembler::new(self.shape, StateLayout::Nodes);
        let mut sink = self.partitioner.sink(meta);
        let mut written = 0;
        for states in nodes.assemble_batch(segments, meta) {
            let first = *next_id;
            let count = self.windower.example_count(states.len());
            *next_id += count;
            self.windower.write(&states, first, &mut sink)?;
            written += count;
        }
        Ok(written)
    }
}
