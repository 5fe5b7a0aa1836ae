/// Bytes in one KiB.
pub const KIB: u64 = 1024;
/// Bytes in one MiB.
pub const MIB: u64 = 1024 * 1024;

/// Render a byte count for display.
///
/// `< 1024` → `"N B"`, `< 1 MiB` → `"N.N KB"`, otherwise `"N.N MB"`.
/// The decimal is rounded half-up on the exact quotient.
pub fn human_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{} KB", one_decimal(bytes, KIB))
    } else {
        format!("{} MB", one_decimal(bytes, MIB))
    }
}

fn one_decimal(value: u64, unit: u64) -> String {
    let tenths = (u128::from(value) * 10 + u128::from(unit) / 2) / u128::from(unit);
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_below_one_kib() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1), "1 B");
        assert_eq!(human_size(1023), "1023 B");
    }

    #[test]
    fn kilobytes() {
        assert_eq!(human_size(1024), "1.0 KB");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(1536), "1.5 KB");
        // 1.25 rounds up.
        assert_eq!(human_size(1280), "1.3 KB");
        assert_eq!(human_size(MIB - 1), "1024.0 KB");
    }

    #[test]
    fn megabytes() {
        assert_eq!(human_size(MIB), "1.0 MB");
        assert_eq!(human_size(5 * MIB), "5.0 MB");
        assert_eq!(human_size(6 * MIB + MIB / 2), "6.5 MB");
        assert_eq!(human_size(3 * 1024 * MIB), "3072.0 MB");
    }

    #[test]
    fn huge_values_do_not_overflow() {
        assert!(human_size(u64::MAX).ends_with(" MB"));
    }
}
