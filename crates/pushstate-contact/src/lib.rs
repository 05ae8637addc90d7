//! Flag the states in which the end-effector tip
//! touches the pushed object.
//!
//! For every state the tip's perpendicular distance to the object edge
//! through its two nearest corners is compared against a threshold. State
//! files are rewritten with an `in_contact` column before `trajectory`.

pub mod distance;
pub mod filter;
pub mod inspect;
pub mod rows;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        distance::{edge_distance, nearest_corners, tip_edge_distance},
        filter::{ContactFilter, FileReport},
        inspect::{FlaggedTrajectory, load_flagged_trajectory},
        rows::{RowClass, StateTable, classify_row, extract_max_traj_index},
    };
}
