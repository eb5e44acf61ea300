use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use pollwatch::config::{CommandSpec, DetectionPolicy, WatchConfig};
use pollwatch::engine::PollLoop;
use pollwatch::errors::WatchError;
use pollwatch::exec::CommandOutcome;
use pollwatch::watch::ScanOutcome;
use pollwatch_test_utils::{RecordingRunner, TreeFixture, init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn echo_hi() -> Result<CommandSpec, WatchError> {
    CommandSpec::from_argv(["echo", "hi"])
}

#[tokio::test]
async fn touching_a_file_runs_the_command_exactly_once() -> TestResult {
    init_tracing();
    let mut fx = TreeFixture::new()?;
    fx.create("a.txt")?;
    let runner = RecordingRunner::new();
    let executed = runner.executed();
    let mut poller = PollLoop::new(WatchConfig::new(fx.root(), echo_hi()?), runner)?;

    let first = poller.poll_once().await?;
    assert!(matches!(first.scan, ScanOutcome::Baseline { .. }));
    assert!(!first.triggered());

    fx.touch("a.txt")?;
    let second = poller.poll_once().await?;
    assert_eq!(second.cycle, 2);
    assert_eq!(second.command, Some(CommandOutcome::Exited(0)));

    // The cycle after a trigger re-records the baseline, then stays quiet.
    assert!(!poller.poll_once().await?.triggered());
    assert!(!poller.poll_once().await?.triggered());

    let executed = executed.lock().unwrap();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].program(), "echo");
    assert_eq!(executed[0].args(), ["hi".to_string()]);
    assert_eq!(poller.runs(), 1);
    assert_eq!(poller.cycles(), 4);
    Ok(())
}

#[tokio::test]
async fn no_change_never_runs_the_command() -> TestResult {
    for policy in [DetectionPolicy::PerPath, DetectionPolicy::HighWater] {
        let mut fx = TreeFixture::new()?;
        fx.create("a.txt")?;
        fx.create("b.txt")?;
        let config = WatchConfig::new(fx.root(), echo_hi()?).policy(policy);
        let mut poller = PollLoop::new(config, RecordingRunner::new())?;

        for _ in 0..3 {
            assert!(!poller.poll_once().await?.triggered(), "{policy:?}");
        }
        assert_eq!(poller.runner().count(), 0);
    }
    Ok(())
}

#[tokio::test]
async fn failing_command_does_not_stop_the_loop() -> TestResult {
    init_tracing();
    let mut fx = TreeFixture::new()?;
    fx.create("a.txt")?;
    let runner = RecordingRunner::with_outcome(CommandOutcome::Exited(1));
    let spec = CommandSpec::from_argv(["false"])?;
    let mut poller = PollLoop::new(WatchConfig::new(fx.root(), spec), runner)?;
    poller.poll_once().await?;

    for _ in 0..3 {
        fx.touch("a.txt")?;
        let report = poller.poll_once().await?;
        assert_eq!(report.command, Some(CommandOutcome::Exited(1)));
        poller.poll_once().await?;
    }

    assert_eq!(poller.runner().count(), 3);
    Ok(())
}

#[tokio::test]
async fn unrelated_touch_after_a_trigger_also_triggers() -> TestResult {
    for policy in [DetectionPolicy::PerPath, DetectionPolicy::HighWater] {
        let mut fx = TreeFixture::new()?;
        fx.create("a.txt")?;
        fx.create("b.txt")?;
        let config = WatchConfig::new(fx.root(), echo_hi()?).policy(policy);
        let mut poller = PollLoop::new(config, RecordingRunner::new())?;
        poller.poll_once().await?;

        fx.touch("a.txt")?;
        assert!(poller.poll_once().await?.triggered(), "{policy:?}");
        poller.poll_once().await?;

        fx.touch("b.txt")?;
        let report = poller.poll_once().await?;
        match report.scan {
            ScanOutcome::Changed { path, .. } => assert_eq!(path, PathBuf::from("b.txt")),
            other => panic!("{policy:?}: expected change on b.txt, got {other:?}"),
        }
        assert_eq!(poller.runner().count(), 2);
    }
    Ok(())
}

#[tokio::test]
async fn high_water_triggers_again_on_the_very_next_cycle() -> TestResult {
    init_tracing();
    let mut fx = TreeFixture::new()?;
    fx.create("a.txt")?;
    fx.create("b.txt")?;
    let config = WatchConfig::new(fx.root(), echo_hi()?).policy(DetectionPolicy::HighWater);
    let mut poller = PollLoop::new(config, RecordingRunner::new())?;
    poller.poll_once().await?;

    fx.touch("a.txt")?;
    assert!(poller.poll_once().await?.triggered());

    // No quiet cycle in between: the mark survives the run.
    fx.touch("b.txt")?;
    let report = poller.poll_once().await?;
    match report.scan {
        ScanOutcome::Changed { path, .. } => assert_eq!(path, PathBuf::from("b.txt")),
        other => panic!("expected change on b.txt, got {other:?}"),
    }
    assert_eq!(poller.runs(), 2);
    assert!(!poller.poll_once().await?.triggered());
    Ok(())
}

#[tokio::test]
async fn recursion_flag_controls_what_is_watched() -> TestResult {
    for recursive in [false, true] {
        let mut fx = TreeFixture::new()?;
        fx.create("top.txt")?;
        fx.create("pkg/mod/inner.txt")?;
        let config = WatchConfig::new(fx.root(), echo_hi()?).recursive(recursive);
        let mut poller = PollLoop::new(config, RecordingRunner::new())?;
        poller.poll_once().await?;

        fx.touch("pkg/mod/inner.txt")?;

        assert_eq!(poller.poll_once().await?.triggered(), recursive);
    }
    Ok(())
}

#[tokio::test]
async fn excluded_paths_never_trigger() -> TestResult {
    let mut fx = TreeFixture::new()?;
    fx.create("src/lib.rs")?;
    fx.create("target/out.bin")?;
    let config = WatchConfig::new(fx.root(), echo_hi()?)
        .recursive(true)
        .exclude(["target"]);
    let mut poller = PollLoop::new(config, RecordingRunner::new())?;
    poller.poll_once().await?;

    fx.touch("target/out.bin")?;
    assert!(!poller.poll_once().await?.triggered());

    fx.touch("src/lib.rs")?;
    assert!(poller.poll_once().await?.triggered());
    Ok(())
}

#[tokio::test]
async fn invalid_exclude_fails_construction() -> TestResult {
    let fx = TreeFixture::new()?;
    let config = WatchConfig::new(fx.root(), echo_hi()?).exclude(["{unclosed"]);

    let res = PollLoop::new(config, RecordingRunner::new());

    assert!(matches!(res, Err(WatchError::Pattern { .. })));
    Ok(())
}

#[tokio::test]
async fn walk_errors_end_the_loop() -> TestResult {
    let fx = TreeFixture::new()?;
    let config =
        WatchConfig::new(fx.path("gone"), echo_hi()?).interval(Duration::from_millis(10));

    let mut poller = PollLoop::new(config.clone(), RecordingRunner::new())?;
    assert!(matches!(poller.poll_once().await, Err(WatchError::Walk(_))));

    let poller = PollLoop::new(config, RecordingRunner::new())?;
    let res = with_timeout(poller.run()).await;
    assert!(matches!(res, Err(WatchError::Walk(_))));
    Ok(())
}

#[tokio::test]
async fn run_keeps_polling_until_the_tree_breaks() -> TestResult {
    let mut fx = TreeFixture::new()?;
    fx.create("a.txt")?;
    let watched = fx.mkdir("watched")?;
    fx.create("watched/f.txt")?;
    let config = WatchConfig::new(&watched, echo_hi()?).interval(Duration::from_millis(20));
    let poller = PollLoop::new(config, RecordingRunner::new())?;

    let remover = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        std::fs::remove_dir_all(&watched)
    });

    let res = with_timeout(poller.run()).await;
    remover.await??;

    assert!(matches!(res, Err(WatchError::Walk(_))));
    Ok(())
}
