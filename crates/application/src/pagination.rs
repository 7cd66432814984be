use taskgate_core::{AppError, AppResult};

/// Offset-based page window over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetPagination {
    offset: u64,
    limit: u64,
}

impl OffsetPagination {
    /// Creates a validated page window.
    pub fn new(offset: i64, limit: i64) -> AppResult<Self> {
        let offset = u64::try_from(offset).map_err(|_| {
            AppError::Configuration(format!("page offset must not be negative, got {offset}"))
        })?;
        let limit = u64::try_from(limit)
            .ok()
            .filter(|limit| *limit >= 1)
            .ok_or_else(|| {
                AppError::Configuration(format!("page limit must be at least 1, got {limit}"))
            })?;

        Ok(Self { offset, limit })
    }

    /// Number of rows skipped.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Maximum number of rows returned.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Zero-based page number.
    #[must_use]
    pub fn page_number(&self) -> u64 {
        self.offset / self.limit
    }

    /// Whether any rows precede this window.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// Whether rows follow this window in a result of `total_records` rows.
    #[must_use]
    pub fn has_next(&self, total_records: u64) -> bool {
        self.offset.saturating_add(self.limit) < total_records
    }

    /// Window directly after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
        }
    }

    /// Window directly before this one, clamped at the first page.
    #[must_use]
    pub fn previous(&self) -> Self {
        Self {
            offset: self.offset.saturating_sub(self.limit),
            limit: self.limit,
        }
    }

    /// First window with the same limit.
    #[must_use]
    pub fn first(&self) -> Self {
        Self {
            offset: 0,
            limit: self.limit,
        }
    }
}
