//! Benchmark profiles for the pagelog paged log buffer.
//!
//! - [`reference_config`]: 8 pages of 256 bytes, a typical firmware log
//! - [`stress_config`]: 64 pages of 4 KiB
//! - [`sample_lines`]: deterministic log lines of varied length

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use pagelog::arena::ArenaConfig;

/// 8 pages of 256 bytes.
pub fn reference_config() -> ArenaConfig {
    ArenaConfig::new(8, 256)
}

/// 64 pages of 4 KiB.
pub fn stress_config() -> ArenaConfig {
    ArenaConfig::new(64, 4096)
}

/// `count` log lines whose lengths cycle through 8..=71 bytes.
pub fn sample_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let width = 8 + (i * 37) % 64;
            let mut line = format!("evt {i:05} ");
            while line.len() < width {
                line.push('x');
            }
            line.truncate(width);
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagelog::arena::ArenaLayout;

    #[test]
    fn profiles_are_valid() {
        assert!(ArenaLayout::compute(&reference_config()).is_ok());
        assert!(ArenaLayout::compute(&stress_config()).is_ok());
    }

    #[test]
    fn sample_lines_are_deterministic() {
        let a = sample_lines(16);
        assert_eq!(a, sample_lines(16));
        assert!(a.iter().all(|l| (8..=71).contains(&l.len())));
    }
}
