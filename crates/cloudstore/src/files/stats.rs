//! Aggregate storage statistics.

use records::RuntimeFileRecord;
use serde::Serialize;

/// Totals shown by the storage overview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StorageStats {
    /// Sum of all record sizes.
    pub total_size: i64,
    /// Records with `is_public = true`.
    pub public_files: usize,
    /// Records with `is_public = false`.
    pub private_files: usize,
    /// Limit drawn by the storage bar. Nothing enforces it.
    pub limit_bytes: u64,
}

impl StorageStats {
    /// Computes the totals over `records`.
    pub fn from_records(records: &[RuntimeFileRecord], limit_bytes: u64) -> Self {
        let total_size = records
            .iter()
            .fold(0i64, |acc, f| acc.saturating_add(f.size()));
        let public_files = records.iter().filter(|f| f.is_public()).count();

        Self {
            total_size,
            public_files,
            private_files: records.len() - public_files,
            limit_bytes,
        }
    }

    /// Total number of records.
    pub fn file_count(&self) -> usize {
        self.public_files + self.private_files
    }

    /// Fill level of the storage bar, clamped to `0.0..=100.0`.
    pub fn usage_percent(&self) -> f64 {
        if self.limit_bytes == 0 {
            return 100.0;
        }
        let percent = self.total_size as f64 / self.limit_bytes as f64 * 100.0;
        percent.clamp(0.0, 100.0)
    }
}
