//! Short-link resolution scenarios over the in-memory store.

#![allow(clippy::unwrap_used)]

use freshcart_core::{MemoryQrStore, QrKind, Resolution, resolve};
use freshcart_integration_tests::{at, qr_code};

const DEALS: &str = "https://freshcart.example/deals";

fn store_with(codes: impl IntoIterator<Item = freshcart_core::models::QrCode>) -> MemoryQrStore {
    let mut store = MemoryQrStore::new();
    for code in codes {
        assert!(store.insert(code));
    }
    store
}

#[test]
fn test_static_code_redirects_and_counts() {
    let code = qr_code("promo2024", QrKind::Static, DEALS, None);
    let id = code.id;
    let mut store = store_with([code]);
    let now = at(2024, 6, 1, 9, 0);

    for _ in 0..3 {
        let resolution = resolve(&mut store, "promo2024", now).unwrap();
        assert_eq!(resolution, Resolution::RedirectTo(DEALS.to_owned()));
    }
    assert_eq!(store.get(id).unwrap().scan_count, 3);
}

#[test]
fn test_expired_temporary_code_is_not_counted() {
    let expiry = at(2024, 6, 1, 0, 0);
    let code = qr_code("flash", QrKind::Temporary, DEALS, Some(expiry));
    let id = code.id;
    let mut store = store_with([code]);

    let before = resolve(&mut store, "flash", at(2024, 5, 31, 23, 59)).unwrap();
    assert!(before.is_redirect());

    let after = resolve(&mut store, "flash", expiry).unwrap();
    assert_eq!(after, Resolution::Expired);
    assert_eq!(store.get(id).unwrap().scan_count, 1);
}

#[test]
fn test_expiry_ignored_for_non_temporary_codes() {
    let code = qr_code("forever", QrKind::Static, DEALS, Some(at(2020, 1, 1, 0, 0)));
    let mut store = store_with([code]);

    let resolution = resolve(&mut store, "forever", at(2024, 6, 1, 0, 0)).unwrap();
    assert!(resolution.is_redirect());
}

#[test]
fn test_dynamic_code_follows_retarget() {
    let code = qr_code("menu", QrKind::Dynamic, DEALS, None);
    let id = code.id;
    let mut store = store_with([code]);
    let now = at(2024, 6, 1, 9, 0);

    assert_eq!(
        resolve(&mut store, "menu", now).unwrap(),
        Resolution::RedirectTo(DEALS.to_owned())
    );

    assert!(store.set_target_url(id, "https://freshcart.example/summer"));
    assert_eq!(
        resolve(&mut store, "MENU", now).unwrap(),
        Resolution::RedirectTo("https://freshcart.example/summer".to_owned())
    );
    assert_eq!(store.get(id).unwrap().scan_count, 2);
}

#[test]
fn test_unknown_and_malformed_codes() {
    let mut store = store_with([qr_code("promo2024", QrKind::Static, DEALS, None)]);
    let now = at(2024, 6, 1, 9, 0);

    for raw in ["nope1234", "", "a", "promo-2024", "../admin"] {
        assert_eq!(
            resolve(&mut store, raw, now).unwrap(),
            Resolution::NotFound,
            "{raw:?}"
        );
    }
}
