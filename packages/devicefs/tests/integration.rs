//! End-to-end tests driving `DeviceFs` over the in-memory backend.

use bytes::{Bytes, BytesMut};
use devicefs::{Content, ContentFormat, DeviceFs, Error, OpenMode, ReadOptions, WriteOptions};
use devicefs_memory::{HandleShape, MemoryResolver, MemoryStorage};

fn sdcard_fs() -> DeviceFs {
    DeviceFs::with_resolver(MemoryResolver::with_types(["sdcard"]))
}

#[tokio::test]
async fn write_then_read_round_trips_text_and_bytes() {
    let fs = sdcard_fs();

    fs.write_file("sdcard:notes/a.txt", "hello device", &WriteOptions::default())
        .await
        .unwrap();

    let text = fs
        .read_file("sdcard:notes/a.txt", &ReadOptions::default())
        .await
        .unwrap();
    assert_eq!(text, Content::Text("hello device".to_string()));

    let buffer = fs
        .read_file(
            "sdcard:notes/a.txt",
            &ReadOptions::format(ContentFormat::Buffer),
        )
        .await
        .unwrap();
    assert_eq!(
        buffer,
        Content::Buffer(Bytes::from_static(b"hello device"))
    );
}

#[tokio::test]
async fn binary_payloads_round_trip() {
    let fs = sdcard_fs();
    let payload: Vec<u8> = vec![0, 1, 2, 255, 254, 128];

    fs.write_file(
        "sdcard:blob.bin",
        payload.clone(),
        &WriteOptions::mimetype("application/octet-stream"),
    )
    .await
    .unwrap();

    let content = fs
        .read_file("sdcard:blob.bin", &ReadOptions::format(ContentFormat::Buffer))
        .await
        .unwrap();
    assert_eq!(content.as_buffer(), Some(&Bytes::from(payload)));
}

#[tokio::test]
async fn overwrite_replaces_never_appends() {
    let fs = sdcard_fs();

    fs.write_file("sdcard:a", "first version, quite long", &WriteOptions::default())
        .await
        .unwrap();
    fs.write_file("sdcard:a", "second", &WriteOptions::default())
        .await
        .unwrap();

    let content = fs.read_file("sdcard:a", &ReadOptions::default()).await.unwrap();
    assert_eq!(content.as_text(), Some("second"));
}

#[tokio::test]
async fn exists_flips_on_write() {
    let fs = sdcard_fs();

    assert!(!fs.exists("sdcard:never-written").await.unwrap());

    fs.write_file("sdcard:now-written", "x", &WriteOptions::default())
        .await
        .unwrap();
    assert!(fs.exists("sdcard:now-written").await.unwrap());
}

#[tokio::test]
async fn readdir_filters_by_prefix_in_key_order() {
    let fs = sdcard_fs();

    fs.write_file("sdcard:dir/b", "2", &WriteOptions::default())
        .await
        .unwrap();
    fs.write_file("sdcard:dir/a", "1", &WriteOptions::default())
        .await
        .unwrap();
    fs.write_file("sdcard:other/c", "3", &WriteOptions::default())
        .await
        .unwrap();

    let entries = fs.readdir("sdcard:dir").await.unwrap();
    assert_eq!(entries, vec!["dir/a", "dir/b"]);
}

#[tokio::test]
async fn unlink_removes_and_tolerates_missing() {
    let fs = sdcard_fs();

    fs.write_file("sdcard:doomed", "x", &WriteOptions::default())
        .await
        .unwrap();
    assert!(fs.exists("sdcard:doomed").await.unwrap());

    fs.unlink("sdcard:doomed").await.unwrap();
    assert!(!fs.exists("sdcard:doomed").await.unwrap());

    // Unlinking again completes without error.
    fs.unlink("sdcard:doomed").await.unwrap();
}

#[tokio::test]
async fn read_clamps_instead_of_overrunning() {
    let fs = sdcard_fs();
    fs.write_file("sdcard:short", "abc", &WriteOptions::default())
        .await
        .unwrap();

    let handle = fs.open("sdcard:short", OpenMode::Read).await.unwrap();
    let mut sink = BytesMut::new();
    let n = fs.read(handle, &mut sink, 0, Some(1024), 0).await.unwrap();

    assert_eq!(n, 3);
    assert_eq!(&sink[..], b"abc");
}

#[tokio::test]
async fn unresolvable_storage_is_an_error_value() {
    let fs = sdcard_fs();

    let err = fs.open("videos:clip.mp4", OpenMode::Read).await.unwrap_err();
    assert!(matches!(err, Error::StorageNotFound { .. }));

    let err = fs.unlink("videos:clip.mp4").await.unwrap_err();
    assert!(matches!(err, Error::StorageNotFound { .. }));
}

#[tokio::test]
async fn data_url_format_encodes_mime_and_payload() {
    let fs = sdcard_fs();
    fs.write_file("sdcard:hello", "hello", &WriteOptions::default())
        .await
        .unwrap();

    let content = fs
        .read_file("sdcard:hello", &ReadOptions::format(ContentFormat::DataUrl))
        .await
        .unwrap();
    assert_eq!(
        content,
        Content::DataUrl("data:text/plain;base64,aGVsbG8=".to_string())
    );
}

#[tokio::test]
async fn binary_string_format_is_byte_per_char() {
    let fs = sdcard_fs();
    fs.write_file(
        "sdcard:bin",
        vec![0x68u8, 0x69, 0xff],
        &WriteOptions::default(),
    )
    .await
    .unwrap();

    let content = fs
        .read_file("sdcard:bin", &ReadOptions::format(ContentFormat::Binary))
        .await
        .unwrap();
    assert_eq!(content, Content::Binary("hi\u{ff}".to_string()));
}

#[tokio::test]
async fn deferred_reads_match_snapshot_reads() {
    let snapshot_resolver = MemoryResolver::with_types(["sdcard"]);
    let mut deferred_resolver = MemoryResolver::new();
    deferred_resolver.insert(MemoryStorage::with_shape("sdcard", HandleShape::Deferred));

    let snapshot_fs = DeviceFs::with_resolver(snapshot_resolver);
    let deferred_fs = DeviceFs::with_resolver(deferred_resolver);

    for fs in [&snapshot_fs, &deferred_fs] {
        fs.write_file("sdcard:same", "identical bytes", &WriteOptions::default())
            .await
            .unwrap();
    }

    let a = snapshot_fs
        .read_file("sdcard:same", &ReadOptions::format(ContentFormat::Buffer))
        .await
        .unwrap();
    let b = deferred_fs
        .read_file("sdcard:same", &ReadOptions::format(ContentFormat::Buffer))
        .await
        .unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn write_file_through_existing_entry_keeps_single_entry() {
    let resolver = MemoryResolver::with_types(["sdcard"]);
    let storage = resolver.storage("sdcard").unwrap();
    let fs = DeviceFs::with_resolver(resolver);

    fs.write_file("sdcard:one", "v1", &WriteOptions::default())
        .await
        .unwrap();
    fs.write_file("sdcard:one", "v2", &WriteOptions::default())
        .await
        .unwrap();

    assert_eq!(storage.len(), 1);
    assert!(storage.contains("one"));
}

#[tokio::test]
async fn storage_types_are_isolated() {
    let fs = DeviceFs::with_resolver(MemoryResolver::with_types(["sdcard", "music"]));

    fs.write_file("sdcard:song.ogg", "not audio", &WriteOptions::default())
        .await
        .unwrap();

    assert!(fs.exists("sdcard:song.ogg").await.unwrap());
    assert!(!fs.exists("music:song.ogg").await.unwrap());
}

#[tokio::test]
async fn embedded_colons_address_the_same_entry() {
    let fs = sdcard_fs();

    fs.write_file("sdcard:a:b", "colons", &WriteOptions::default())
        .await
        .unwrap();

    let content = fs.read_file("sdcard:a:b", &ReadOptions::default()).await.unwrap();
    assert_eq!(content.as_text(), Some("colons"));

    let entries = fs.readdir("sdcard:a").await.unwrap();
    assert_eq!(entries, vec!["a:b"]);
}
