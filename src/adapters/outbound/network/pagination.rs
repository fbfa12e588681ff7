use super::tracker_error::TrackerError;
use std::future::Future;

/// One page of an offset-paginated search
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Server-reported total across all pages
    pub total: usize,
    pub items: Vec<T>,
}

/// Fetches pages starting at offset 0 until the offset plus page length
/// reaches the reported total
///
/// `fetch` receives the offset of the page to fetch. An empty page before
/// the total is reached also ends the walk, so a shrinking result set cannot
/// loop forever.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, TrackerError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Page<T>, TrackerError>>,
{
    let mut all = Vec::new();
    let mut start_at = 0;

    loop {
        let page = fetch(start_at).await?;
        let received = page.items.len();
        all.extend(page.items);

        if received == 0 || start_at + received >= page.total {
            break;
        }
        start_at += received;
    }

    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_collect_pages_stops_at_total() {
        let offsets = Mutex::new(Vec::new());
        let seen = &offsets;
        let items = collect_pages(move |start_at| async move {
            seen.lock().unwrap().push(start_at);
            let data = [1, 2, 3];
            let end = (start_at + 2).min(data.len());
            Ok(Page {
                total: data.len(),
                items: data[start_at..end].to_vec(),
            })
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(*offsets.lock().unwrap(), vec![0, 2]);
    }

    #[tokio::test]
    async fn test_collect_pages_single_page() {
        let items = collect_pages(|_| async {
            Ok(Page {
                total: 1,
                items: vec!["only"],
            })
        })
        .await
        .unwrap();
        assert_eq!(items, vec!["only"]);
    }

    #[tokio::test]
    async fn test_collect_pages_empty_page_ends_walk() {
        let calls = Mutex::new(0);
        let counter = &calls;
        let items: Vec<u32> = collect_pages(move |_| async move {
            *counter.lock().unwrap() += 1;
            Ok(Page {
                total: 10,
                items: Vec::new(),
            })
        })
        .await
        .unwrap();
        assert!(items.is_empty());
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_error() {
        let result: Result<Vec<u32>, _> = collect_pages(|_| async {
            Err(TrackerError::Status {
                status: 500,
                body: String::new(),
            })
        })
        .await;
        assert!(matches!(result, Err(TrackerError::Status { status: 500, .. })));
    }
}
