//! Turn raw push recordings into N-step state-tuple
//! examples.
//!
//! The pipeline for one recording:
//!
//! 1. [`source`] reads the three raw sensor streams.
//! 2. [`align`] resamples them onto a fixed grid and trims them to a common,
//!    gap-free index.
//! 3. [`assemble`] turns each aligned timestep into a state vector.
//! 4. [`window`] slices the states into overlapping N-step examples and
//!    appends each step offset to its own output file, chosen by
//!    [`partition`].
//!
//! [`processor::TrajectoryProcessor`] drives this over a directory.
//!
//! # Example
//!
//! ```no_run
//! use pushstate_core::config::ProcessConfig;
//! use pushstate_process::processor::TrajectoryProcessor;
//!
//! let config = ProcessConfig::new("datasets/rect1");
//! let processor = TrajectoryProcessor::new(config).unwrap();
//! let summary = processor.run().unwrap();
//! println!("{} examples", summary.examples_written);
//! ```

pub mod align;
pub mod assemble;
pub mod io;
pub mod partition;
pub mod processor;
pub mod properties;
pub mod source;
pub mod states;
pub mod window;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        align::{AlignedFrame, ResampledStream, align, align_streams, resample},
        assemble::{StateAssembler, StateLayout},
        partition::{MixingMode, OutputPartitioner, PartitionKey},
        processor::{RunSummary, TrajectoryProcessor},
        properties::parse_properties,
        source::{RawRecord, read_record},
        states::StateFileWriter,
        window::{ExampleSink, ExampleWindower},
    };
}
