//! Partitions rasterized pages into contiguous, bounded-size chunks.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial chunk partitioning + page-range prefix.

use super::rasterize::PageImage;

/// One contiguous run of pages dispatched in a single LLM call.
/// `page_start`/`page_end` are 1-based, inclusive.
pub struct PageChunk {
    pub page_start: usize,
    pub page_end: usize,
    pub pages: std::vec::Vec<PageImage>,
}

/// Splits `pages` into contiguous chunks of at most `chunk_size` pages each,
/// preserving page order (`§4.7`).
pub fn partition(pages: std::vec::Vec<PageImage>, chunk_size: usize) -> std::vec::Vec<PageChunk> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = std::vec::Vec::new();
    let mut remaining = pages;
    let mut page_start = 1usize;

    while !remaining.is_empty() {
        let take = chunk_size.min(remaining.len());
        let chunk_pages: std::vec::Vec<PageImage> = remaining.drain(..take).collect();
        let page_end = page_start + chunk_pages.len() - 1;
        chunks.push(PageChunk {
            page_start,
            page_end,
            pages: chunk_pages,
        });
        page_start = page_end + 1;
    }

    chunks
}

/// The `"Processing pages A:B."` prefix prepended to a chunk's prompt text
/// when the document has more than one chunk; `None` for a single-chunk
/// document, since there's nothing for the model to disambiguate.
pub fn page_range_prefix(chunk: &PageChunk, total_chunks: usize) -> std::option::Option<std::string::String> {
    if total_chunks <= 1 {
        return std::option::Option::None;
    }
    std::option::Option::Some(std::format!("Processing pages {}:{}.", chunk.page_start, chunk.page_end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use idp_llm::ImageFormat;

    fn pages(n: usize) -> std::vec::Vec<PageImage> {
        (0..n)
            .map(|_| PageImage {
                format: ImageFormat::Jpeg,
                bytes: std::vec![0u8],
            })
            .collect()
    }

    #[test]
    fn test_s3_25_pages_chunk_size_10_yields_3_chunks() {
        let chunks = partition(pages(25), 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!((chunks[0].page_start, chunks[0].page_end), (1, 10));
        assert_eq!((chunks[1].page_start, chunks[1].page_end), (11, 20));
        assert_eq!((chunks[2].page_start, chunks[2].page_end), (21, 25));
    }

    #[test]
    fn test_single_page_single_chunk_has_no_prefix() {
        let chunks = partition(pages(1), 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(page_range_prefix(&chunks[0], chunks.len()), std::option::Option::None);
    }

    #[test]
    fn test_multi_chunk_has_page_range_prefix() {
        let chunks = partition(pages(25), 10);
        assert_eq!(
            page_range_prefix(&chunks[0], chunks.len()),
            std::option::Option::Some("Processing pages 1:10.".to_string())
        );
        assert_eq!(
            page_range_prefix(&chunks[2], chunks.len()),
            std::option::Option::Some("Processing pages 21:25.".to_string())
        );
    }

    #[test]
    fn test_chunk_size_larger_than_page_count_yields_one_chunk() {
        let chunks = partition(pages(3), 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!((chunks[0].page_start, chunks[0].page_end), (1, 3));
    }
}
