//! Worker version rollout and offline behavior, end to end against the
//! in-memory network and shared cache storage.

use koasa_pwa::{
    shared_cache_storage, FetchRequest, FetchResult, FetchSource, PwaError, ServiceWorker,
    StaticNetwork,
};

const ORIGIN: &str = "https://koasa.example";

const MANIFEST_V1: &[&str] = &["/", "/static/css/style.css", "/static/js/main.js"];
const MANIFEST_V2: &[&str] = &[
    "/",
    "/static/css/style.css",
    "/static/js/main.js",
    "/static/js/cart.js",
];

fn network_with(paths: &[&str]) -> StaticNetwork {
    let mut net = StaticNetwork::new();
    for path in paths {
        net.serve(
            &format!("{}{}", ORIGIN, path),
            format!("asset:{}", path).as_bytes(),
        );
    }
    net
}

#[test]
fn failed_upgrade_keeps_old_version_serving() {
    // Scenario E: the previous worker version is installed and active.
    let caches = shared_cache_storage();
    let net = network_with(MANIFEST_V1);

    let mut v1 = ServiceWorker::with_config(ORIGIN, "koasa-v1.0.0", "koasa-runtime", MANIFEST_V1);
    v1.install(&net, &caches).unwrap();
    v1.activate(&caches);

    // The new version's manifest lists an asset the network cannot
    // provide.
    let mut v2 = ServiceWorker::with_config(ORIGIN, "koasa-v1.1.0", "koasa-runtime", MANIFEST_V2);
    let err = v2.install(&net, &caches).unwrap_err();
    assert!(matches!(err, PwaError::PrecacheFailed { .. }));

    // No v2 cache was created, and the v1 cache is intact.
    assert!(!caches.read().has("koasa-v1.1.0"));
    assert!(caches.read().has("koasa-v1.0.0"));

    // The old worker keeps serving its precached assets — even with the
    // network fully gone.
    let mut offline = network_with(MANIFEST_V1);
    offline.go_offline();
    let request = FetchRequest::get(&format!("{}/static/css/style.css", ORIGIN));
    match v1.handle_fetch(&request, &offline, &caches) {
        FetchResult::Response { response, source } => {
            assert_eq!(source, FetchSource::StaticCache);
            assert_eq!(response.body, b"asset:/static/css/style.css");
        }
        other => panic!("expected cached response, got {:?}", other),
    }
}

#[test]
fn successful_upgrade_retires_old_cache() {
    let caches = shared_cache_storage();
    let net_v1 = network_with(MANIFEST_V1);

    let mut v1 = ServiceWorker::with_config(ORIGIN, "koasa-v1.0.0", "koasa-runtime", MANIFEST_V1);
    v1.install(&net_v1, &caches).unwrap();
    v1.activate(&caches);

    // Runtime cache picks up an opportunistic entry meanwhile.
    let mut net = network_with(MANIFEST_V1);
    net.serve(&format!("{}/static/img/logo.png", ORIGIN), b"logo");
    let request = FetchRequest::get(&format!("{}/static/img/logo.png", ORIGIN));
    assert!(matches!(
        v1.handle_fetch(&request, &net, &caches),
        FetchResult::Response {
            source: FetchSource::Network,
            ..
        }
    ));

    // New version installs and activates.
    let net_v2 = network_with(MANIFEST_V2);
    let mut v2 = ServiceWorker::with_config(ORIGIN, "koasa-v1.1.0", "koasa-runtime", MANIFEST_V2);
    v2.install(&net_v2, &caches).unwrap();
    let deleted = v2.activate(&caches);

    // Only the old versioned cache is collected; the runtime cache
    // survives upgrades.
    assert_eq!(deleted, vec![String::from("koasa-v1.0.0")]);
    assert!(caches.read().has("koasa-runtime"));
    assert!(v2.clients_claimed());

    // The surviving runtime entry still serves.
    let mut offline = StaticNetwork::new();
    offline.go_offline();
    match v2.handle_fetch(&request, &offline, &caches) {
        FetchResult::Response { source, .. } => assert_eq!(source, FetchSource::RuntimeCache),
        other => panic!("expected runtime cache hit, got {:?}", other),
    }
}

#[test]
fn offline_navigation_serves_cached_root() {
    let caches = shared_cache_storage();
    let net = network_with(MANIFEST_V1);

    let mut sw = ServiceWorker::with_config(ORIGIN, "koasa-v1.0.0", "koasa-runtime", MANIFEST_V1);
    sw.install(&net, &caches).unwrap();
    sw.activate(&caches);

    let mut offline = network_with(MANIFEST_V1);
    offline.go_offline();

    // A page the user never visited, requested while offline.
    let request = FetchRequest::navigation(&format!("{}/panier", ORIGIN));
    match sw.handle_fetch(&request, &offline, &caches) {
        FetchResult::Response { response, source } => {
            assert_eq!(source, FetchSource::OfflineFallback);
            assert_eq!(response.body, b"asset:/");
        }
        other => panic!("expected offline fallback, got {:?}", other),
    }
}
