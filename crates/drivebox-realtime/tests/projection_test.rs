//! Integration tests for live view projections.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::watch;
use tokio::time::timeout;

use drivebox_blob::MemoryBlobStore;
use drivebox_core::traits::BlobStore;
use drivebox_core::types::OwnerId;
use drivebox_entity::view::ViewContext;
use drivebox_realtime::{Projector, ViewSnapshot};
use drivebox_service::tree::TreeService;
use drivebox_store::{EntryStore, MemoryEntryStore};

struct Harness {
    tree: TreeService,
    projector: Projector,
    owner: OwnerId,
}

fn harness() -> Harness {
    let records: Arc<dyn EntryStore> = Arc::new(MemoryEntryStore::default());
    let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
    Harness {
        tree: TreeService::new(records.clone(), blobs),
        projector: Projector::new(records),
        owner: OwnerId::new("test-user"),
    }
}

/// Waits until the watched value satisfies the predicate, or panics after
/// two seconds. Watch channels collapse intermediate values, so tests
/// assert on convergence rather than on individual updates.
async fn wait_for<T, F>(rx: &mut watch::Receiver<T>, pred: F) -> T
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    timeout(Duration::from_secs(2), async {
        loop {
            if pred(&rx.borrow()) {
                return rx.borrow().clone();
            }
            rx.changed().await.expect("projection task stopped");
        }
    })
    .await
    .expect("view did not converge in time")
}

#[tokio::test]
async fn test_folder_view_reflects_inserts() {
    let h = harness();
    let (mut rx, _sub) = h
        .projector
        .subscribe(h.owner.clone(), ViewContext::Folder { parent: None })
        .await
        .unwrap();
    assert!(rx.borrow().entries.is_empty());

    h.tree
        .upload_file(&h.owner, None, "a.txt", Bytes::from("x"))
        .await
        .unwrap();

    let snapshot = wait_for(&mut rx, |s: &ViewSnapshot| s.entries.len() == 1).await;
    assert_eq!(snapshot.entries[0].name, "a.txt");
}

#[tokio::test]
async fn test_folder_view_drops_trashed_entries() {
    let h = harness();
    let file = h
        .tree
        .upload_file(&h.owner, None, "a.txt", Bytes::from("x"))
        .await
        .unwrap();

    let (mut rx, _sub) = h
        .projector
        .subscribe(h.owner.clone(), ViewContext::Folder { parent: None })
        .await
        .unwrap();
    assert_eq!(rx.borrow().entries.len(), 1);

    h.tree.soft_delete(&file).await.unwrap();
    wait_for(&mut rx, |s: &ViewSnapshot| s.entries.is_empty()).await;
}

#[tokio::test]
async fn test_trash_view_collects_deleted_subtree() {
    let h = harness();
    let (mut rx, _sub) = h
        .projector
        .subscribe(h.owner.clone(), ViewContext::Trash)
        .await
        .unwrap();

    let folder = h.tree.create_folder(&h.owner, None, "docs").await.unwrap();
    h.tree
        .upload_file(&h.owner, Some(folder.id), "a.txt", Bytes::from("x"))
        .await
        .unwrap();
    h.tree.soft_delete(&folder).await.unwrap();

    let snapshot = wait_for(&mut rx, |s: &ViewSnapshot| s.entries.len() == 2).await;
    assert!(snapshot.entries.iter().all(|e| e.is_trashed()));
}

#[tokio::test]
async fn test_root_folders_view_ignores_files_and_subfolders() {
    let h = harness();
    let (mut rx, _sub) = h
        .projector
        .subscribe(h.owner.clone(), ViewContext::RootFolders)
        .await
        .unwrap();

    let docs = h.tree.create_folder(&h.owner, None, "docs").await.unwrap();
    h.tree
        .create_folder(&h.owner, Some(docs.id), "nested")
        .await
        .unwrap();
    h.tree
        .upload_file(&h.owner, None, "loose.txt", Bytes::from("x"))
        .await
        .unwrap();

    let snapshot = wait_for(&mut rx, |s: &ViewSnapshot| !s.entries.is_empty()).await;
    assert_eq!(snapshot.entries.len(), 1);
    assert_eq!(snapshot.entries[0].name, "docs");
}

#[tokio::test]
async fn test_views_are_scoped_to_their_owner() {
    let h = harness();
    let other = OwnerId::new("someone-else");
    let (mut rx, _sub) = h
        .projector
        .subscribe(h.owner.clone(), ViewContext::Folder { parent: None })
        .await
        .unwrap();

    h.tree
        .upload_file(&other, None, "theirs.txt", Bytes::from("x"))
        .await
        .unwrap();
    h.tree
        .upload_file(&h.owner, None, "mine.txt", Bytes::from("x"))
        .await
        .unwrap();

    let snapshot = wait_for(&mut rx, |s: &ViewSnapshot| !s.entries.is_empty()).await;
    assert_eq!(snapshot.entries.len(), 1);
    assert_eq!(snapshot.entries[0].name, "mine.txt");
}

#[tokio::test]
async fn test_usage_tracks_lifecycle_reactively() {
    let h = harness();
    let (mut rx, _sub) = h.projector.subscribe_usage(h.owner.clone()).await.unwrap();
    assert_eq!(*rx.borrow(), 0);

    let file = h
        .tree
        .upload_file(&h.owner, None, "big.bin", Bytes::from(vec![0u8; 500]))
        .await
        .unwrap();
    wait_for(&mut rx, |total| *total == 500).await;

    h.tree
        .upload_file(&h.owner, None, "small.bin", Bytes::from(vec![0u8; 24]))
        .await
        .unwrap();
    wait_for(&mut rx, |total| *total == 524).await;

    h.tree.soft_delete(&file).await.unwrap();
    wait_for(&mut rx, |total| *total == 24).await;

    h.tree.restore(&file).await.unwrap();
    wait_for(&mut rx, |total| *total == 524).await;
}

#[tokio::test]
async fn test_unsubscribe_tears_the_projection_down() {
    let h = harness();
    let (rx, sub) = h
        .projector
        .subscribe(h.owner.clone(), ViewContext::Folder { parent: None })
        .await
        .unwrap();
    let (_usage_rx, usage_sub) = h.projector.subscribe_usage(h.owner.clone()).await.unwrap();
    assert_eq!(h.projector.registry().active(), 2);
    assert_eq!(h.projector.registry().active_for(&h.owner), 2);

    sub.unsubscribe();
    assert_eq!(h.projector.registry().active(), 1);

    drop(usage_sub);
    assert_eq!(h.projector.registry().active(), 0);
    drop(rx);
}

#[tokio::test]
async fn test_snapshot_keeps_store_order() {
    let h = harness();
    h.tree
        .upload_file(&h.owner, None, "first.txt", Bytes::from("1"))
        .await
        .unwrap();
    h.tree
        .upload_file(&h.owner, None, "second.txt", Bytes::from("2"))
        .await
        .unwrap();

    let (rx, _sub) = h
        .projector
        .subscribe(h.owner.clone(), ViewContext::Folder { parent: None })
        .await
        .unwrap();

    let names: Vec<String> = rx.borrow().entries.iter().map(|e| e.name.clone()).collect();
    assert_eq!(names, vec!["first.txt", "second.txt"]);
}
