//! Page-cursor walk over an artist's song listing
//!
//! The walker holds nothing but the cursor. It stops when the catalog
//! reports no next page or returns an empty page; the caller stops it early
//! once its own item target is met.

use crate::models::ItemReference;
use crate::services::catalog::{CatalogError, LyricsCatalog, SongSort};

/// Cursor over catalog pages
#[derive(Debug, Clone)]
pub struct PaginationWalker {
    artist_id: u64,
    sort: SongSort,
    per_page: u32,
    cursor: Option<u32>,
}

impl PaginationWalker {
    /// Start at page 1
    pub fn new(artist_id: u64, sort: SongSort, per_page: u32) -> Self {
        Self {
            artist_id,
            sort,
            per_page,
            cursor: Some(1),
        }
    }

    /// Page the next call will request, `None` once exhausted
    pub fn cursor(&self) -> Option<u32> {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_none()
    }

    /// Fetch the next batch in catalog order
    ///
    /// Returns `Ok(None)` at end of data. On error the cursor is left
    /// unchanged.
    pub async fn next_batch<C>(
        &mut self,
        catalog: &C,
    ) -> Result<Option<Vec<ItemReference>>, CatalogError>
    where
        C: LyricsCatalog + ?Sized,
    {
        let Some(page) = self.cursor else {
            return Ok(None);
        };

        let result = catalog
            .list_songs_page(self.artist_id, self.sort, self.per_page, page)
            .await?;

        tracing::debug!(
            page,
            items = result.songs.len(),
            next_page = ?result.next_page,
            "Fetched catalog page"
        );

        if result.songs.is_empty() {
            self.cursor = None;
            return Ok(None);
        }

        self.cursor = result.next_page;
        Ok(Some(result.songs))
    }
}
