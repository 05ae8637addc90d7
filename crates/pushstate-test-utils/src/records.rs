//! Recording files on disk.

use std::path::{Path, PathBuf};

use serde_json::json;

/// A recording file name carrying the given velocity and acceleration.
pub fn push_file_name(velocity: f64, acceleration: f64, ext: &str) -> String {
    format!("motion_surface=abs_shape=rect1_a={acceleration}_v={velocity}_i=0.000_s=0.000_t=0.000.{ext}")
}

/// Write a JSON recording with the three streams and return its path.
pub fn write_json_record(
    dir: &Path,
    name: &str,
    object_pose: &[[f64; 4]],
    tip_pose: &[[f64; 4]],
    ft_wrench: &[[f64; 4]],
) -> PathBuf {
    let path = dir.join(name);
    let value = json!({
        "object_pose": object_pose,
        "tip_pose": tip_pose,
        "ft_wrench": ft_wrench,
    });
    std::fs::write(&path, value.to_string()).expect("write recording");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_contains_parameters() {
        let name = push_file_name(20.0, 0.5, "json");
        assert!(name.contains("_v=20_"));
        assert!(name.contains("_a=0.5_"));
        assert!(name.ends_with(".json"));
    }
}
