//! Arena configuration parameters.

use pagelog_core::ConfigError;

/// Configuration for a paged arena.
///
/// Validated before any allocation; all values are immutable after the
/// arena is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Number of pages. Must be at least 1.
    pub page_amount: usize,

    /// Requested capacity of each page in bytes.
    ///
    /// Must be at least 1. Values below [`MIN_PAGE_SIZE`](Self::MIN_PAGE_SIZE)
    /// are raised to it; see [`effective_page_size`](Self::effective_page_size).
    pub page_size: usize,

    /// Alignment of every page buffer in bytes.
    ///
    /// Default: 8. Must be a power of two no larger than
    /// [`MAX_BUFFER_ALIGN`](Self::MAX_BUFFER_ALIGN). Raise it to match DMA or
    /// cache-line requirements of the target.
    pub buffer_align: usize,
}

impl ArenaConfig {
    /// Default page buffer alignment.
    pub const DEFAULT_BUFFER_ALIGN: usize = 8;

    /// Largest supported page buffer alignment.
    pub const MAX_BUFFER_ALIGN: usize = 4096;

    /// A page must hold at least a terminator and a null byte.
    pub const MIN_PAGE_SIZE: usize = 2;

    /// Create a config with the default buffer alignment.
    pub fn new(page_amount: usize, page_size: usize) -> Self {
        Self {
            page_amount,
            page_size,
            buffer_align: Self::DEFAULT_BUFFER_ALIGN,
        }
    }

    /// Create a config from signed parameters, rejecting non-positive values.
    pub fn from_signed(page_amount: i64, page_size: i64) -> Result<Self, ConfigError> {
        let amount = usize::try_from(page_amount)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(ConfigError::InvalidPageAmount { value: page_amount })?;
        let size = usize::try_from(page_size)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(ConfigError::InvalidPageSize { value: page_size })?;
        Ok(Self::new(amount, size))
    }

    /// Override the page buffer alignment.
    pub fn with_buffer_align(mut self, align: usize) -> Self {
        self.buffer_align = align;
        self
    }

    /// Check every structural parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_amount == 0 {
            return Err(ConfigError::InvalidPageAmount { value: 0 });
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize { value: 0 });
        }
        if !self.buffer_align.is_power_of_two() || self.buffer_align > Self::MAX_BUFFER_ALIGN {
            return Err(ConfigError::InvalidBufferAlign {
                align: self.buffer_align,
            });
        }
        Ok(())
    }

    /// Page capacity after applying the minimum size.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(Self::MIN_PAGE_SIZE)
    }
}
