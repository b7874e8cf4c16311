//! src/util/humanize.rs

/// 1024-based size, e.g. `0 B`, `512 B`, `1.5 KB`, `3.2 GB`.
#[must_use]
pub fn human_readable_size(size: u64) -> String {
    if size == 0 {
        return "0 B".to_string();
    }
    let units: [&'static str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];
    #[allow(clippy::cast_precision_loss)]
    let mut size_f: f64 = size as f64;
    let mut unit_idx: usize = 0;

    while size_f >= 1024.0 && unit_idx < units.len() - 1 {
        size_f /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size, units[unit_idx])
    } else {
        format!("{:.1} {}", size_f, units[unit_idx])
    }
}

/// Signed size change: `+1.5 KB`, `-300 B`, `0 B`.
#[must_use]
pub fn delta_label(delta: i64) -> String {
    let magnitude = human_readable_size(delta.unsigned_abs());
    match delta.signum() {
        1 => format!("+{magnitude}"),
        -1 => format!("-{magnitude}"),
        _ => magnitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(human_readable_size(0), "0 B");
        assert_eq!(human_readable_size(1023), "1023 B");
        assert_eq!(human_readable_size(1536), "1.5 KB");
        assert_eq!(human_readable_size(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn deltas_carry_sign() {
        assert_eq!(delta_label(100), "+100 B");
        assert_eq!(delta_label(-2048), "-2.0 KB");
        assert_eq!(delta_label(0), "0 B");
        assert_eq!(delta_label(i64::MIN), "-8.0 EB");
    }
}
