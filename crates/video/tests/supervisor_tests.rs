use {
    base::Vec2,
    std::{sync::Arc, time::Duration},
    tokio::time::timeout,
    video::*,
};

const WINDOW: Duration = Duration::from_millis(60);

struct Rig {
    driver: Arc<PatternDriver>,
    frames: Arc<FrameBuffer>,
    statuses: StatusReceiver,
    supervisor: SupervisorHandle,
}

fn rig(withhold: bool) -> Rig {
    let driver = Arc::new(PatternDriver::new(PatternConfig {
        size: Vec2::new(4, 4),
        layout: PixelLayout::Rgb,
        frame_interval: Duration::from_millis(5),
    }));
    driver.withhold_frames(withhold);

    let config = PipelineConfig::default()
        .with_watchdog_window(WINDOW)
        .with_capture_timeout(Duration::from_millis(10));
    let frames = Arc::new(FrameBuffer::new());
    let (status, statuses) = status_channel();
    let sink = FrameSink::new(
        Arc::clone(&frames),
        ModeHandle::new(config.initial_mode()),
        Arc::new(|_: &mut Frame| Ok(())),
        status.clone(),
    );
    let session = CaptureSession::new(driver.clone(), sink, &config);
    let supervisor = Supervisor::new(session, &config, status).spawn();
    Rig {
        driver,
        frames,
        statuses,
        supervisor,
    }
}

/// Collect statuses up to and including the first one matching `done`.
async fn collect_until(
    statuses: &mut StatusReceiver,
    done: impl Fn(&Status) -> bool,
) -> Vec<Status> {
    let mut seen = Vec::new();
    let result = timeout(Duration::from_secs(5), async {
        while let Some(status) = statuses.recv().await {
            let finished = done(&status);
            seen.push(status);
            if finished {
                return;
            }
        }
    })
    .await;
    assert!(result.is_ok(), "timed out, saw {:?}", seen);
    seen
}

#[tokio::test(flavor = "multi_thread")]
async fn test_zero_frames_cycles_selectors_then_gives_up() {
    let mut rig = rig(true);

    let seen = collect_until(&mut rig.statuses, |s| *s == Status::RetriesExhausted).await;
    let retries = seen
        .iter()
        .filter_map(|s| match s {
            Status::NoFramesRetrying(attempt) => Some(*attempt),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(retries, vec![1, 2, 3]);
    assert!(seen.contains(&Status::RetryingCamera(3)));
    assert!(!seen.iter().any(|s| matches!(s, Status::FramesOk(_))));

    // no more attempts after giving up
    tokio::time::sleep(WINDOW * 4).await;
    let later = rig.statuses.drain();
    assert!(!later.contains(&Status::RetriesExhausted), "{:?}", later);
    assert!(!later.iter().any(|s| matches!(s, Status::NoFramesRetrying(_))));

    assert_eq!(
        rig.driver.opened(),
        vec![
            DeviceSelector::Any,
            DeviceSelector::Back,
            DeviceSelector::Front,
            DeviceSelector::Any,
        ]
    );

    let session = rig.supervisor.shutdown().await.unwrap();
    assert!(!session.is_running());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_healthy_session_is_left_alone() {
    let mut rig = rig(false);

    let seen = collect_until(&mut rig.statuses, |s| matches!(s, Status::FramesOk(_))).await;
    assert_eq!(seen.first(), Some(&Status::CameraStarted(Vec2::new(4, 4))));
    assert!(rig.frames.published() > 0);

    // a second healthy window, still on the first device
    collect_until(&mut rig.statuses, |s| matches!(s, Status::FramesOk(_))).await;
    assert_eq!(rig.driver.opened(), vec![DeviceSelector::Any]);

    let session = rig.supervisor.shutdown().await.unwrap();
    assert!(!session.is_running());
    assert_eq!(rig.statuses.drain().last(), Some(&Status::CameraStopped));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stall_after_healthy_is_recovered() {
    let mut rig = rig(false);
    collect_until(&mut rig.statuses, |s| matches!(s, Status::FramesOk(_))).await;

    rig.driver.withhold_frames(true);
    collect_until(&mut rig.statuses, |s| *s == Status::NoFramesRetrying(1)).await;
    collect_until(&mut rig.statuses, |s| *s == Status::RetryingCamera(1)).await;

    rig.driver.withhold_frames(false);
    collect_until(&mut rig.statuses, |s| matches!(s, Status::FramesOk(_))).await;

    let opened = rig.driver.opened();
    assert_eq!(opened[..2], [DeviceSelector::Any, DeviceSelector::Back]);

    rig.supervisor.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unavailable_device_is_reported_and_retried() {
    let driver = Arc::new(PatternDriver::new(PatternConfig {
        size: Vec2::new(4, 4),
        layout: PixelLayout::Luma,
        frame_interval: Duration::from_millis(5),
    }));
    driver.set_unavailable(DeviceSelector::Any, true);

    let config = PipelineConfig::default()
        .with_watchdog_window(WINDOW)
        .with_capture_timeout(Duration::from_millis(10));
    let (status, mut statuses) = status_channel();
    let sink = FrameSink::new(
        Arc::new(FrameBuffer::new()),
        ModeHandle::new(PipelineMode::PassThrough),
        Arc::new(|_: &mut Frame| Ok(())),
        status.clone(),
    );
    let session = CaptureSession::new(driver.clone(), sink, &config);
    let supervisor = Supervisor::new(session, &config, status).spawn();

    let seen = collect_until(&mut statuses, |s| matches!(s, Status::FramesOk(_))).await;
    assert!(matches!(seen[0], Status::DeviceUnavailable(_)));
    assert!(seen.contains(&Status::NoFramesRetrying(1)));
    assert_eq!(driver.opened(), vec![DeviceSelector::Any, DeviceSelector::Back]);

    supervisor.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pause_stops_timer_and_session() {
    let mut rig = rig(true);
    collect_until(&mut rig.statuses, |s| matches!(s, Status::CameraStarted(_))).await;

    rig.supervisor.pause();
    collect_until(&mut rig.statuses, |s| *s == Status::CameraStopped).await;

    // paused: no watchdog activity however long it stays paused
    tokio::time::sleep(WINDOW * 3).await;
    assert_eq!(rig.statuses.drain(), Vec::<Status>::new());

    rig.driver.withhold_frames(false);
    rig.supervisor.resume();
    collect_until(&mut rig.statuses, |s| matches!(s, Status::FramesOk(_))).await;
    assert_eq!(rig.driver.opened(), vec![DeviceSelector::Any, DeviceSelector::Any]);

    rig.supervisor.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_fallback_is_not_reported_as_retrying() {
    let rig = rig(true);
    let Rig {
        driver,
        mut statuses,
        supervisor,
        ..
    } = rig;
    driver.set_unavailable(DeviceSelector::Back, true);

    let seen = collect_until(&mut statuses, |s| *s == Status::RetryingCamera(2)).await;
    let outcome = seen
        .iter()
        .skip_while(|s| **s != Status::NoFramesRetrying(1))
        .skip(1)
        .find(|s| **s != Status::CameraStopped);
    assert!(matches!(outcome, Some(Status::DeviceUnavailable(_))), "{:?}", seen);
    assert!(!seen.contains(&Status::RetryingCamera(1)));
    assert_eq!(
        driver.opened(),
        vec![DeviceSelector::Any, DeviceSelector::Back, DeviceSelector::Front]
    );

    supervisor.shutdown().await.unwrap();
}
