//! Shared DTO types used across multiple endpoints.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::MonitorError;

/// Largest accepted `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl PaginationParams {
    /// Clamps `page` to at least 1 and `per_page` to `1..=100`.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Cuts one page out of `items`.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>) -> (Vec<T>, PaginationMeta) {
        let Self { page, per_page } = self.clamped();
        let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let total_pages = total.div_ceil(per_page);
        let start = usize::try_from(u64::from(page - 1) * u64::from(per_page)).unwrap_or(usize::MAX);

        let data = items
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();
        (
            data,
            PaginationMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        )
    }
}

/// Parses an optional enum-valued query parameter. Blank counts as absent.
///
/// # Errors
///
/// Returns the parse error of `T`.
pub fn parse_choice<T>(raw: Option<&str>) -> Result<Option<T>, MonitorError>
where
    T: FromStr<Err = MonitorError>,
{
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .transpose()
}

/// Parses an optional numeric query parameter. Blank counts as absent.
///
/// # Errors
///
/// Returns [`MonitorError::InvalidField`] naming `field` when the value is
/// not a number.
pub fn parse_number<T: FromStr>(field: &'static str, raw: Option<&str>) -> Result<Option<T>, MonitorError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| MonitorError::invalid_field(field, format!("\"{s}\" is not a number")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BatteryStatus;

    #[test]
    fn per_page_is_clamped() {
        let params = PaginationParams {
            page: 0,
            per_page: 500,
        }
        .clamped();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 100);
    }

    #[test]
    fn paginate_slices_and_counts() {
        let params = PaginationParams {
            page: 2,
            per_page: 2,
        };
        let (data, meta) = params.paginate(vec![1, 2, 3, 4, 5]);
        assert_eq!(data, vec![3, 4]);
        assert_eq!(
            meta,
            PaginationMeta {
                page: 2,
                per_page: 2,
                total: 5,
                total_pages: 3
            }
        );
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let params = PaginationParams {
            page: 9,
            per_page: 20,
        };
        let (data, meta) = params.paginate(vec![1]);
        assert!(data.is_empty());
        assert_eq!(meta.total_pages, 1);
    }

    #[test]
    fn empty_list_has_zero_pages() {
        let (_, meta) = PaginationParams::default().paginate(Vec::<u8>::new());
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn choices_and_numbers_parse() {
        assert_eq!(
            parse_choice::<BatteryStatus>(Some("FAULT")).ok().flatten(),
            Some(BatteryStatus::Fault)
        );
        assert!(parse_choice::<BatteryStatus>(Some("BROKEN")).is_err());
        assert!(matches!(parse_choice::<BatteryStatus>(Some(" ")), Ok(None)));
        assert_eq!(parse_number::<f64>("threshold", Some("42.5")).ok().flatten(), Some(42.5));
        assert!(parse_number::<f64>("threshold", Some("abc")).is_err());
    }
}
