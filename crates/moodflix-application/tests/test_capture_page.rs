mod common;

use common::{MockCamera, MockRecommendations, ScriptedDetector, happy, size};
use moodflix_application::SessionContext;
use moodflix_application::capture::{
    CaptureDeps, CapturePage, CaptureView, GateDecision, LoopState, SIGN_IN_NOTICE, SIGN_IN_ROUTE,
};
use moodflix_core::config::CaptureSettings;
use moodflix_core::session::{Session, SessionStore};
use moodflix_infrastructure::{FileSessionStore, ReplayDetector, VirtualCamera};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

struct Fixture {
    page: CapturePage,
    session: SessionContext,
    camera: Arc<MockCamera>,
    detector: Arc<ScriptedDetector>,
    service: Arc<MockRecommendations>,
}

async fn signed_in() -> SessionContext {
    let session = SessionContext::new();
    session
        .login("tok-123", json!({"email": "ada@example.com"}))
        .await;
    session
}

fn fixture(
    session: SessionContext,
    camera: MockCamera,
    detector: ScriptedDetector,
    service: MockRecommendations,
) -> Fixture {
    let camera = Arc::new(camera);
    let detector = Arc::new(detector);
    let service = Arc::new(service);
    let page = CapturePage::new(CaptureDeps::new(
        session.clone(),
        camera.clone(),
        detector.clone(),
        service.clone(),
    ));
    Fixture {
        page,
        session,
        camera,
        detector,
        service,
    }
}

#[tokio::test(start_paused = true)]
async fn test_signed_out_redirects_without_touching_camera() {
    let f = fixture(
        SessionContext::new(),
        MockCamera::default(),
        ScriptedDetector::always(happy()),
        MockRecommendations::new(),
    );

    let decision = f.page.mount();
    assert_eq!(
        decision,
        GateDecision::Redirect {
            to: SIGN_IN_ROUTE,
            notice: SIGN_IN_NOTICE,
        }
    );

    sleep(Duration::from_millis(3000)).await;
    assert_eq!(f.camera.opened(), 0);
    assert_eq!(f.detector.calls(), 0);
    assert_eq!(f.page.loop_state(), LoopState::Idle);
    assert_eq!(
        f.page.view(),
        CaptureView::SignInRequired {
            notice: SIGN_IN_NOTICE,
            redirect_to: SIGN_IN_ROUTE,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_signed_in_mount_shows_recommendations() {
    let f = fixture(
        signed_in().await,
        MockCamera::default(),
        ScriptedDetector::always(happy()),
        MockRecommendations::new(),
    );
    let mut updates = f.page.watch_recommendations();

    assert!(f.page.mount().is_admitted());
    sleep(Duration::from_millis(10)).await;
    assert_eq!(f.camera.opened(), 1);
    assert!(f.page.is_live());
    assert_eq!(f.page.loop_state(), LoopState::Armed);

    updates.changed().await.unwrap();
    assert_eq!(
        updates.borrow().as_ref().map(|r| r.detected_emotion.as_str()),
        Some("happy")
    );

    match f.page.view() {
        CaptureView::Capturing {
            live_feed,
            loop_state,
            detected_emotion,
            recommendations,
        } => {
            assert!(live_feed);
            assert_eq!(loop_state, LoopState::Armed);
            assert_eq!(detected_emotion.as_deref(), Some("happy"));
            assert_eq!(recommendations, vec!["happy movie #1", "happy movie #2"]);
        }
        other => panic!("unexpected view: {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_logout_tears_down_loop_and_stream() {
    let f = fixture(
        signed_in().await,
        MockCamera::default(),
        ScriptedDetector::always(Vec::new()),
        MockRecommendations::new(),
    );
    f.page.mount();

    sleep(Duration::from_millis(2500)).await;
    assert_eq!(f.detector.calls(), 2);
    assert!(f.camera.any_live());

    f.session.logout().await;
    sleep(Duration::from_millis(10)).await;

    assert_eq!(f.page.loop_state(), LoopState::Idle);
    assert!(!f.page.is_live());
    assert!(!f.camera.any_live());

    sleep(Duration::from_millis(5000)).await;
    assert_eq!(f.detector.calls(), 2);
    assert!(matches!(f.page.view(), CaptureView::SignInRequired { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_model_load_failure_never_arms() {
    let f = fixture(
        signed_in().await,
        MockCamera::default(),
        ScriptedDetector::failing_load(),
        MockRecommendations::new(),
    );
    f.page.mount();

    sleep(Duration::from_millis(3000)).await;
    assert_eq!(f.camera.opened(), 0);
    assert_eq!(f.detector.calls(), 0);
    assert_eq!(f.page.loop_state(), LoopState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_camera_denied_keeps_view_without_feed() {
    let f = fixture(
        signed_in().await,
        MockCamera::denying(),
        ScriptedDetector::always(happy()),
        MockRecommendations::new(),
    );
    f.page.mount();

    sleep(Duration::from_millis(3000)).await;
    assert_eq!(f.camera.opened(), 1);
    assert_eq!(f.detector.calls(), 0);
    assert_eq!(
        f.page.view(),
        CaptureView::Capturing {
            live_feed: false,
            loop_state: LoopState::Idle,
            detected_emotion: None,
            recommendations: Vec::new(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_unmount_discards_late_report() {
    let f = fixture(
        signed_in().await,
        MockCamera::default(),
        ScriptedDetector::always(happy()),
        MockRecommendations::slow(Duration::from_millis(2500)),
    );
    f.page.mount();

    sleep(Duration::from_millis(1500)).await;
    assert_eq!(f.service.calls(), 1);
    assert!(f.page.is_capturing());

    f.page.unmount();
    assert_eq!(f.page.loop_state(), LoopState::Idle);
    assert!(!f.camera.any_live());

    sleep(Duration::from_millis(3000)).await;
    assert!(f.page.recommendations().is_none());
    assert!(!f.page.is_capturing());
    assert_eq!(f.detector.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_remount_keeps_single_timer() {
    let f = fixture(
        signed_in().await,
        MockCamera::default(),
        ScriptedDetector::always(Vec::new()),
        MockRecommendations::new(),
    );
    f.page.mount();
    sleep(Duration::from_millis(10)).await;
    f.page.mount();

    sleep(Duration::from_millis(1500)).await;
    assert_eq!(f.detector.calls(), 1);
    assert_eq!(f.camera.opened(), 2);
    assert_eq!(
        f.camera
            .streams
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.is_active())
            .count(),
        1
    );
}

#[tokio::test]
async fn test_replay_end_to_end_with_restored_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileSessionStore::with_path(dir.path().join("session.json")));
    store
        .save(&Session::new("tok-e2e", json!({"firstname": "Ada"})))
        .await
        .unwrap();

    let session = SessionContext::restore(store.clone()).await;
    assert!(session.is_authenticated());

    let settings = CaptureSettings {
        tick_period_ms: 20,
        ..Default::default()
    };
    let page = CapturePage::new(
        CaptureDeps::new(
            session.clone(),
            Arc::new(VirtualCamera::new(size())),
            Arc::new(ReplayDetector::new(vec![Vec::new(), happy()])),
            Arc::new(MockRecommendations::new()),
        )
        .with_settings(settings),
    );
    let mut updates = page.watch_recommendations();

    assert!(page.mount().is_admitted());
    tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .expect("no recommendation within 5s")
        .unwrap();
    assert_eq!(
        page.recommendations().map(|r| r.detected_emotion),
        Some("happy".to_string())
    );

    session.logout().await;
    assert!(store.load().await.unwrap().is_none());
    tokio::time::timeout(Duration::from_secs(5), async {
        while page.is_live() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("stream still live after logout");
    assert_eq!(page.loop_state(), LoopState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_logout_then_login_still_tears_down() {
    let f = fixture(
        signed_in().await,
        MockCamera::default(),
        ScriptedDetector::always(Vec::new()),
        MockRecommendations::new(),
    );
    f.page.mount();
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(f.page.loop_state(), LoopState::Armed);

    // Both transitions land before the watcher runs.
    f.session.logout().await;
    f.session.login("tok-other", json!({"email": "bob@example.com"})).await;
    sleep(Duration::from_millis(10)).await;

    assert_eq!(f.page.loop_state(), LoopState::Idle);
    assert!(!f.page.is_live());
    assert!(!f.camera.any_live());

    sleep(Duration::from_millis(3000)).await;
    assert_eq!(f.detector.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unmount_racing_startup_never_leaves_loop_armed() {
    let f = fixture(
        signed_in().await,
        MockCamera::default(),
        ScriptedDetector::always(Vec::new()),
        MockRecommendations::new(),
    );

    for _ in 0..200 {
        f.page.mount();
        tokio::task::yield_now().await;
        f.page.unmount();
    }
    sleep(Duration::from_millis(20)).await;

    assert_eq!(f.page.loop_state(), LoopState::Idle);
    assert!(!f.page.is_live());
    assert!(!f.camera.any_live());
}
