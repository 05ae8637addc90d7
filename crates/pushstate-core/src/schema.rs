//! Column layouts of the CSV files the pipelines read and write.
//!
//! Example files hold 12 node coordinates per row. State files hold the full
//! tagged state; flagged files add `in_contact` just before `trajectory`.

/// Node coordinate columns shared by every layout.
pub const NODE_COLUMNS: [&str; 10] = [
    "o_t_r_x", "o_t_r_y", "o_t_l_x", "o_t_l_y", "o_b_r_x", "o_b_r_y", "o_b_l_x", "o_b_l_y",
    "o_m_m_x", "o_m_m_y",
];

/// Header of every example (state-tuple part) file.
pub fn example_header() -> Vec<&'static str> {
    let mut header = vec!["id"];
    header.extend(NODE_COLUMNS);
    header.extend(["e_x", "e_y"]);
    header
}

/// Header of a tagged state file, before contact flagging.
pub fn state_header() -> Vec<&'static str> {
    let mut header = vec!["id"];
    header.extend(NODE_COLUMNS);
    header.extend([
        "o_pos_x", "o_pos_y", "o_angle", "e_pos_x", "e_pos_y", "e_angle", "force_x", "force_y",
        "torque", "base_vel", "base_acc", "trajectory",
    ]);
    header
}

/// Header of a flagged state file.
pub fn flagged_header() -> Vec<&'static str> {
    let mut header = state_header();
    header.insert(header.len() - 1, "in_contact");
    header
}

// ---------------------------------------------------------------------------
// Column indices into a state row
// ---------------------------------------------------------------------------

pub const ID: usize = 0;
/// First corner coordinate; the four corners span `CORNERS..CORNERS + 8`.
pub const CORNERS: usize = 1;
/// Node coordinates (corners plus centre) span `NODES..NODES + 10`.
pub const NODES: usize = 1;
pub const OBJECT_POSE: usize = 11;
pub const TIP_POSE: usize = 14;
pub const FORCE_TORQUE: usize = 17;
pub const BASE_VEL: usize = 20;
pub const BASE_ACC: usize = 21;
/// Width of an unflagged state row (trajectory index last).
pub const STATE_WIDTH: usize = 23;
/// Width of a flagged state row.
pub const FLAGGED_WIDTH: usize = 24;
