//! Trajectory parameters encoded in recording file names.
//!
//! Recordings are named like
//! `motion_surface=abs_shape=rect1_a=0.5_v=20_i=1.000_s=0.300_t=0.785.json`.
//! Each `_<key>=` field runs until the next `_`, or the extension for `_t=`.

use std::path::Path;

use pushstate_core::error::DataError;
use pushstate_core::types::TrajectoryMeta;

fn field<'a>(name: &str, stem: &'a str, key: &'static str) -> Result<&'a str, DataError> {
    let malformed = || DataError::MalformedFileName {
        name: name.to_string(),
        field: key,
    };
    let start = stem.find(key).ok_or_else(malformed)? + key.len();
    let rest = &stem[start..];
    let end = rest.find('_').unwrap_or(rest.len());
    Ok(&rest[..end])
}

fn number(name: &str, stem: &str, key: &'static str) -> Result<f64, DataError> {
    field(name, stem, key)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataError::MalformedFileName {
            name: name.to_string(),
            field: key,
        })
}

/// Parse velocity, acceleration, push side, push point and push angle from a
/// recording's file name. The returned index is 0; the processor assigns it.
#[allow(clippy::cast_possible_truncation)]
pub fn parse_properties(file_name: &str) -> Result<TrajectoryMeta, DataError> {
    let stem = Path::new(file_name)
        .file_stem()
        .map_or(file_name, |s| s.to_str().unwrap_or(file_name));

    let velocity = number(file_name, stem, "_v=")?;
    let acceleration = number(file_name, stem, "_a=")?;
    let push_side = number(file_name, stem, "_i=")?.trunc() as i64;
    let push_point = number(file_name, stem, "_s=")?;
    let push_angle = number(file_name, stem, "_t=")?;

    Ok(TrajectoryMeta {
        index: 0,
        velocity,
        acceleration,
        push_angle_deg: push_angle.to_degrees(),
        push_side,
        push_point,
    })
}
