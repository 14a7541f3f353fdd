mod support;

use integration_test_utils::event;
use push_router::{ConnectionId, SessionEvents};
use std::sync::Arc;
use support::{make_router, tenant_config, RecordingHandle};

// Drives the router purely through the trait a transport layer sees.
#[tokio::test(flavor = "multi_thread")]
async fn closing_a_session_silences_its_subscriptions() {
    let router = Arc::new(make_router(tenant_config(&[(
        "acme",
        "http://127.0.0.1:9/check",
        false,
    )])));
    let events: Arc<dyn SessionEvents> = router.clone();
    let closing = ConnectionId::new("conn-1");
    let surviving = ConnectionId::new("conn-2");
    let (handle_a, received_a) = RecordingHandle::new();
    let (handle_b, received_b) = RecordingHandle::new();

    events.on_open(closing.clone()).await;
    events.on_open(surviving.clone()).await;
    events
        .on_subscribe(&closing, handle_a, "acme/a/tok")
        .await
        .expect("subscribe a");
    events
        .on_subscribe(&surviving, handle_b, "acme/b/tok")
        .await
        .expect("subscribe b");

    events.on_close(&closing).await;

    router.route_event(&event("acme", &["a", "b"])).await;
    assert!(received_a.lock().await.is_empty());
    assert_eq!(received_b.lock().await.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn unsubscribe_from_another_session_is_ignored() {
    let router = make_router(tenant_config(&[("acme", "http://127.0.0.1:9/check", false)]));
    let owner = ConnectionId::new("conn-1");
    let stranger = ConnectionId::new("conn-2");
    let (handle, received) = RecordingHandle::new();

    router
        .subscribe(&owner, handle, "acme/42/tok")
        .await
        .expect("subscribe");

    router.on_unsubscribe(&stranger, "acme/42/tok").await;
    router.route_event(&event("acme", &["42"])).await;
    assert_eq!(received.lock().await.len(), 1);

    router.on_unsubscribe(&owner, "acme/42/tok").await;
    router.route_event(&event("acme", &["42"])).await;
    assert_eq!(received.lock().await.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn reconnecting_recipient_is_served_on_the_new_session_only() {
    let router = make_router(tenant_config(&[("acme", "http://127.0.0.1:9/check", false)]));
    let old_session = ConnectionId::new("conn-1");
    let new_session = ConnectionId::new("conn-2");
    let (old_handle, old_received) = RecordingHandle::new();
    let (new_handle, new_received) = RecordingHandle::new();

    router.open(old_session.clone()).await;
    router
        .subscribe(&old_session, old_handle, "acme/42/tok")
        .await
        .expect("first subscribe");

    // Recipient reconnects and re-subscribes before the old session closes.
    router.open(new_session.clone()).await;
    router
        .subscribe(&new_session, new_handle, "acme/42/tok")
        .await
        .expect("second subscribe");

    // The old session's close must not tear down the rebound entry.
    router.close(&old_session).await;

    router.route_event(&event("acme", &["42"])).await;
    assert!(old_received.lock().await.is_empty());
    assert_eq!(new_received.lock().await.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_unsubscribe_key_changes_nothing() {
    let router = make_router(tenant_config(&[("acme", "http://127.0.0.1:9/check", false)]));
    let conn = ConnectionId::new("conn-1");
    let (handle, received) = RecordingHandle::new();

    router
        .subscribe(&conn, handle, "acme/42/tok")
        .await
        .expect("subscribe");

    router.unsubscribe(&conn, "acme/42").await;
    router.unsubscribe(&conn, "").await;

    router.route_event(&event("acme", &["42"])).await;
    assert_eq!(received.lock().await.len(), 1);
}
