//! Manager census - Classification and probability analysis for
//! multi-part cellular automaton seeds.
//!
//! Each stored seed decomposes into spatial parts. Running a seed
//! through the management game yields per-part colour censuses, from
//! which every part is classified as a manager (`orange > green`) or a
//! worker. This crate builds the growth tensor holding those censuses,
//! derives the classifications, and aggregates them into population
//! distributions and conditional probabilities that cross-check the
//! classification against independent growth or competition signals.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration and seed/part types
//! - `compute`: Tensor building, classification, aggregation, and the
//!   engine boundary (including transcript replay)
//! - `report`: Text report writers
//!
//! # Example
//!
//! ```rust,no_run
//! use manager_census::{
//!     compute::{
//!         GrowthTensor, ReplaySegmenter, ReplaySimulator, Transcript, admit_seeds,
//!         population_distribution,
//!     },
//!     schema::{TensorParams, load_seeds},
//! };
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! // Load the corpus and the recorded engine transcript
//! let seeds = load_seeds(&["run1/seeds.json", "run2/seeds.json"])?;
//! let transcript = Transcript::load("transcript.json")?;
//! let mut sim = ReplaySimulator::new(&transcript);
//! let seg = ReplaySegmenter::new(&transcript);
//!
//! // Build the growth tensor over the admitted seeds
//! let params = TensorParams::default();
//! let admitted = admit_seeds(&seg, &seeds, params.num_parts)?;
//! let tensor = GrowthTensor::build(&mut sim, &admitted, &params)?;
//!
//! // Manager-count distribution at every sampled step
//! for row in population_distribution(&tensor)? {
//!     println!("step {}: {:?}", row.step, row.probabilities());
//! }
//! # Ok(())
//! # }
//! ```

pub mod compute;
pub mod report;
pub mod schema;

// Re-export commonly used types
pub use compute::{
    Colour, GrowthTensor, ReplaySegmenter, ReplaySimulator, Segmenter, Simulator, Transcript,
};
pub use schema::{AnalysisConfig, Seed, TensorParams};
